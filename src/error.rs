use std::fmt;

/// enrichr_bot 的统一错误类型
#[derive(Debug)]
pub enum BotError {
    /// 配置错误
    Config(ConfigError),
    /// Checkpoint 存储错误
    Storage(StorageError),
    /// 时间线拉取错误（由 collector 吞掉，不会中断运行）
    Feed(FeedError),
    /// 数据集查找错误
    Lookup(LookupError),
    /// 回复发布错误
    Publish(PublishError),
    /// 采集结束后仍没有任何 checkpoint
    NoCheckpoint,
    /// IO 错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 缺少必需的环境变量
    MissingField(String),
    /// 配置值无效
    InvalidValue { field: String, message: String },
}

/// Checkpoint 存储错误
#[derive(Debug)]
pub enum StorageError {
    /// 目录或文件不可写
    Unwritable { path: String, message: String },
    /// 目录或文件不可读
    Unreadable { path: String, message: String },
    /// 文件内容无法解析
    Corrupt { path: String, message: String },
}

/// 时间线拉取错误
#[derive(Debug)]
pub enum FeedError {
    /// 网络请求失败
    NetworkError(String),
    /// API 返回错误状态码
    ApiError { status: u16, message: String },
    /// 响应格式无效
    InvalidResponse(String),
    /// 获取 bearer token 失败
    AuthFailed(String),
    /// 帖子时间戳无法解析
    InvalidTimestamp(String),
}

/// 数据集查找错误
#[derive(Debug)]
pub enum LookupError {
    /// 没有任何条目匹配
    NotFound(String),
    /// 多个条目同时匹配
    Ambiguous { identifier: String, matches: usize },
    /// 数据集文件无法读取
    DatasetUnreadable { path: String, message: String },
    /// 表头缺少必需列
    MissingColumn(String),
    /// 数据行格式错误
    MalformedRow { line: usize, message: String },
}

/// 回复发布错误
#[derive(Debug)]
pub enum PublishError {
    /// 媒体上传失败
    UploadFailed { path: String, message: String },
    /// 回复提交失败
    SubmitFailed { in_reply_to: String, message: String },
    /// 请求签名失败
    SigningFailed(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotError::Config(e) => write!(f, "Config Error: {}", e),
            BotError::Storage(e) => write!(f, "Storage Error: {}", e),
            BotError::Feed(e) => write!(f, "Feed Error: {}", e),
            BotError::Lookup(e) => write!(f, "Lookup Error: {}", e),
            BotError::Publish(e) => write!(f, "Publish Error: {}", e),
            BotError::NoCheckpoint => write!(f, "No checkpoint available after collection"),
            BotError::Io(e) => write!(f, "IO Error: {}", e),
            BotError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingField(field) => write!(f, "Missing config field: {}", field),
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unwritable { path, message } => {
                write!(f, "Cannot write '{}': {}", path, message)
            }
            StorageError::Unreadable { path, message } => {
                write!(f, "Cannot read '{}': {}", path, message)
            }
            StorageError::Corrupt { path, message } => {
                write!(f, "Corrupt checkpoint '{}': {}", path, message)
            }
        }
    }
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            FeedError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            FeedError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            FeedError::AuthFailed(msg) => write!(f, "Authentication failed: {}", msg),
            FeedError::InvalidTimestamp(ts) => write!(f, "Invalid post timestamp: {}", ts),
        }
    }
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotFound(identifier) => write!(f, "{} not found", identifier),
            LookupError::Ambiguous {
                identifier,
                matches,
            } => write!(f, "{} matched {} results", identifier, matches),
            LookupError::DatasetUnreadable { path, message } => {
                write!(f, "Cannot read dataset '{}': {}", path, message)
            }
            LookupError::MissingColumn(column) => {
                write!(f, "Dataset is missing column '{}'", column)
            }
            LookupError::MalformedRow { line, message } => {
                write!(f, "Malformed dataset row at line {}: {}", line, message)
            }
        }
    }
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::UploadFailed { path, message } => {
                write!(f, "Upload of '{}' failed: {}", path, message)
            }
            PublishError::SubmitFailed {
                in_reply_to,
                message,
            } => write!(f, "Reply to {} failed: {}", in_reply_to, message),
            PublishError::SigningFailed(msg) => write!(f, "Request signing failed: {}", msg),
        }
    }
}

impl std::error::Error for BotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BotError::Io(e) => Some(e),
            BotError::Config(e) => Some(e),
            BotError::Storage(e) => Some(e),
            BotError::Feed(e) => Some(e),
            BotError::Lookup(e) => Some(e),
            BotError::Publish(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for StorageError {}
impl std::error::Error for FeedError {}
impl std::error::Error for LookupError {}
impl std::error::Error for PublishError {}

// From 转换实现
impl From<std::io::Error> for BotError {
    fn from(err: std::io::Error) -> Self {
        BotError::Io(err)
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::NetworkError("Request timeout".to_string())
        } else if err.is_connect() {
            FeedError::NetworkError(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            FeedError::InvalidResponse(err.to_string())
        } else {
            FeedError::NetworkError(err.to_string())
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(err: reqwest::Error) -> Self {
        BotError::Feed(err.into())
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Other(format!("JSON error: {}", err))
    }
}

impl From<ConfigError> for BotError {
    fn from(err: ConfigError) -> Self {
        BotError::Config(err)
    }
}

impl From<StorageError> for BotError {
    fn from(err: StorageError) -> Self {
        BotError::Storage(err)
    }
}

impl From<FeedError> for BotError {
    fn from(err: FeedError) -> Self {
        BotError::Feed(err)
    }
}

impl From<LookupError> for BotError {
    fn from(err: LookupError) -> Self {
        BotError::Lookup(err)
    }
}

impl From<PublishError> for BotError {
    fn from(err: PublishError) -> Self {
        BotError::Publish(err)
    }
}

// 便捷的 Result 类型别名
pub type Result<T> = std::result::Result<T, BotError>;
