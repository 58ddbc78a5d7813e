use serde::{Deserialize, Serialize};

/// Cookie SameSite 策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl std::fmt::Display for SameSitePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "Strict"),
            Self::Lax => write!(f, "Lax"),
            Self::None => write!(f, "None"),
        }
    }
}

impl std::str::FromStr for SameSitePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            "none" => Ok(Self::None),
            _ => Err(format!(
                "Invalid SameSite policy: '{}'. Valid: Strict, Lax, None",
                s
            )),
        }
    }
}

/// 静态配置
///
/// 包含两个组件的配置与日志配置：
/// - capture: 点击标识捕获
/// - relay: 购买事件转发
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：CT，分隔符：__
    /// 示例：CT__CAPTURE__QUERY_PARAM=clid
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path = "config.toml";

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 CT，分隔符 __
            .add_source(
                Environment::with_prefix("CT")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 点击标识捕获配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// 页面 URL 中携带点击标识的 query 参数名
    #[serde(default = "default_query_param")]
    pub query_param: String,
    /// Cookie 名称
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// 本地存储键
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// 捕获时间戳的本地存储键
    #[serde(default = "default_timestamp_key")]
    pub timestamp_key: String,
    /// Cookie 有效期（天）
    #[serde(default = "default_cookie_max_age_days")]
    pub cookie_max_age_days: i64,
    #[serde(default)]
    pub same_site: SameSitePolicy,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            query_param: default_query_param(),
            cookie_name: default_cookie_name(),
            storage_key: default_storage_key(),
            timestamp_key: default_timestamp_key(),
            cookie_max_age_days: default_cookie_max_age_days(),
            same_site: SameSitePolicy::default(),
        }
    }
}

/// 购买事件转发配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// 支付验证端点的 URL 标记子串
    #[serde(default = "default_endpoint_marker")]
    pub endpoint_marker: String,
    /// 上报给 Pixel 的事件名
    #[serde(default = "default_event_name")]
    pub event_name: String,
    /// 事件货币缺省值
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// 事件内容类型缺省值
    #[serde(default = "default_content_type")]
    pub default_content_type: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint_marker: default_endpoint_marker(),
            event_name: default_event_name(),
            default_currency: default_currency(),
            default_content_type: default_content_type(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别（EnvFilter 语法）
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 日志文件路径，空值或缺省输出到控制台
    #[serde(default)]
    pub file: Option<String>,
    /// 输出格式：text 或 json
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
            format: default_log_format(),
        }
    }
}

fn default_query_param() -> String {
    "ttclid".to_string()
}

fn default_cookie_name() -> String {
    "ttclid".to_string()
}

fn default_storage_key() -> String {
    "ttclid".to_string()
}

fn default_timestamp_key() -> String {
    "ttclid_timestamp".to_string()
}

fn default_cookie_max_age_days() -> i64 {
    365
}

fn default_endpoint_marker() -> String {
    "verificar-pix".to_string()
}

fn default_event_name() -> String {
    "CompletePayment".to_string()
}

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_content_type() -> String {
    "product".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}
