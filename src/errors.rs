use actix_web::http::StatusCode;
use std::fmt;

#[derive(Debug, Clone)]
pub enum LaunchlistError {
    CacheConnection(String),
    CachePluginNotFound(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    DuplicateEmail(String),
    DuplicateReferralCode(String),
    DuplicateResource(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    FileOperation(String),
    DateParse(String),
    PasswordHash(String),
    Unauthorized(String),
}

impl LaunchlistError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LaunchlistError::CacheConnection(_) => "E001",
            LaunchlistError::CachePluginNotFound(_) => "E002",
            LaunchlistError::DatabaseConfig(_) => "E003",
            LaunchlistError::DatabaseConnection(_) => "E004",
            LaunchlistError::DatabaseOperation(_) => "E005",
            LaunchlistError::DuplicateEmail(_) => "E006",
            LaunchlistError::DuplicateReferralCode(_) => "E007",
            LaunchlistError::DuplicateResource(_) => "E008",
            LaunchlistError::Validation(_) => "E009",
            LaunchlistError::NotFound(_) => "E010",
            LaunchlistError::Serialization(_) => "E011",
            LaunchlistError::FileOperation(_) => "E012",
            LaunchlistError::DateParse(_) => "E013",
            LaunchlistError::PasswordHash(_) => "E014",
            LaunchlistError::Unauthorized(_) => "E015",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LaunchlistError::CacheConnection(_) => "Cache Connection Error",
            LaunchlistError::CachePluginNotFound(_) => "Cache Plugin Not Found",
            LaunchlistError::DatabaseConfig(_) => "Database Configuration Error",
            LaunchlistError::DatabaseConnection(_) => "Database Connection Error",
            LaunchlistError::DatabaseOperation(_) => "Database Operation Error",
            LaunchlistError::DuplicateEmail(_) => "Duplicate Email",
            LaunchlistError::DuplicateReferralCode(_) => "Duplicate Referral Code",
            LaunchlistError::DuplicateResource(_) => "Duplicate Resource",
            LaunchlistError::Validation(_) => "Validation Error",
            LaunchlistError::NotFound(_) => "Resource Not Found",
            LaunchlistError::Serialization(_) => "Serialization Error",
            LaunchlistError::FileOperation(_) => "File Operation Error",
            LaunchlistError::DateParse(_) => "Date Parse Error",
            LaunchlistError::PasswordHash(_) => "Password Hash Error",
            LaunchlistError::Unauthorized(_) => "Unauthorized",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LaunchlistError::CacheConnection(msg)
            | LaunchlistError::CachePluginNotFound(msg)
            | LaunchlistError::DatabaseConfig(msg)
            | LaunchlistError::DatabaseConnection(msg)
            | LaunchlistError::DatabaseOperation(msg)
            | LaunchlistError::DuplicateEmail(msg)
            | LaunchlistError::DuplicateReferralCode(msg)
            | LaunchlistError::DuplicateResource(msg)
            | LaunchlistError::Validation(msg)
            | LaunchlistError::NotFound(msg)
            | LaunchlistError::Serialization(msg)
            | LaunchlistError::FileOperation(msg)
            | LaunchlistError::DateParse(msg)
            | LaunchlistError::PasswordHash(msg)
            | LaunchlistError::Unauthorized(msg) => msg,
        }
    }

    /// 映射为 HTTP 状态码（HTTP handler 统一使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            LaunchlistError::Validation(_) | LaunchlistError::DateParse(_) => {
                StatusCode::BAD_REQUEST
            }
            LaunchlistError::DuplicateEmail(_)
            | LaunchlistError::DuplicateReferralCode(_)
            | LaunchlistError::DuplicateResource(_) => StatusCode::CONFLICT,
            LaunchlistError::NotFound(_) => StatusCode::NOT_FOUND,
            LaunchlistError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LaunchlistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LaunchlistError {}

// 便捷的构造函数
impl LaunchlistError {
    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::CacheConnection(msg.into())
    }

    pub fn cache_plugin_not_found<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::CachePluginNotFound(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DatabaseOperation(msg.into())
    }

    pub fn duplicate_email<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DuplicateEmail(msg.into())
    }

    pub fn duplicate_referral_code<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DuplicateReferralCode(msg.into())
    }

    pub fn duplicate_resource<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DuplicateResource(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::FileOperation(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::DateParse(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::PasswordHash(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LaunchlistError::Unauthorized(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LaunchlistError {
    fn from(err: sea_orm::DbErr) -> Self {
        LaunchlistError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LaunchlistError {
    fn from(err: std::io::Error) -> Self {
        LaunchlistError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LaunchlistError {
    fn from(err: serde_json::Error) -> Self {
        LaunchlistError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LaunchlistError {
    fn from(err: chrono::ParseError) -> Self {
        LaunchlistError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LaunchlistError>;
