use std::fmt;

#[derive(Debug, Clone)]
pub enum ClicktraceError {
    CookieAccess(String),
    StorageAccess(String),
    Validation(String),
    UrlParse(String),
    Serialization(String),
    PixelDispatch(String),
}

impl ClicktraceError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ClicktraceError::CookieAccess(_) => "E001",
            ClicktraceError::StorageAccess(_) => "E002",
            ClicktraceError::Validation(_) => "E003",
            ClicktraceError::UrlParse(_) => "E004",
            ClicktraceError::Serialization(_) => "E005",
            ClicktraceError::PixelDispatch(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ClicktraceError::CookieAccess(_) => "Cookie Access Error",
            ClicktraceError::StorageAccess(_) => "Storage Access Error",
            ClicktraceError::Validation(_) => "Validation Error",
            ClicktraceError::UrlParse(_) => "URL Parse Error",
            ClicktraceError::Serialization(_) => "Serialization Error",
            ClicktraceError::PixelDispatch(_) => "Pixel Dispatch Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ClicktraceError::CookieAccess(msg) => msg,
            ClicktraceError::StorageAccess(msg) => msg,
            ClicktraceError::Validation(msg) => msg,
            ClicktraceError::UrlParse(msg) => msg,
            ClicktraceError::Serialization(msg) => msg,
            ClicktraceError::PixelDispatch(msg) => msg,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ClicktraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ClicktraceError {}

// 便捷的构造函数
impl ClicktraceError {
    pub fn cookie_access<T: Into<String>>(msg: T) -> Self {
        ClicktraceError::CookieAccess(msg.into())
    }

    pub fn storage_access<T: Into<String>>(msg: T) -> Self {
        ClicktraceError::StorageAccess(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ClicktraceError::Validation(msg.into())
    }

    pub fn url_parse<T: Into<String>>(msg: T) -> Self {
        ClicktraceError::UrlParse(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ClicktraceError::Serialization(msg.into())
    }

    pub fn pixel_dispatch<T: Into<String>>(msg: T) -> Self {
        ClicktraceError::PixelDispatch(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<serde_json::Error> for ClicktraceError {
    fn from(err: serde_json::Error) -> Self {
        ClicktraceError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ClicktraceError {
    fn from(err: url::ParseError) -> Self {
        ClicktraceError::UrlParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClicktraceError>;
