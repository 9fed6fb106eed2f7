use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// PDF 渲染错误
    #[error("渲染错误: {0}")]
    Render(#[from] RenderError),
    /// 表单校验错误
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误
    #[error("错误: {0}")]
    Other(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: BoxError,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 请求超时
    #[error("API请求超时 ({endpoint}), 超时时间: {timeout_secs}秒")]
    Timeout { endpoint: String, timeout_secs: u64 },
    /// 记录不存在
    #[error("记录不存在: {endpoint}")]
    NotFound { endpoint: String },
    /// JSON 解析失败
    #[error("JSON解析失败: {source}")]
    JsonParseFailed {
        #[source]
        source: BoxError,
    },
}

impl ApiError {
    /// 是否值得重试（网络抖动、限流、服务端错误）
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::RequestFailed { .. } | ApiError::Timeout { .. } => true,
            ApiError::BadResponse { status, .. } => *status == 429 || *status >= 500,
            ApiError::NotFound { .. } | ApiError::JsonParseFailed { .. } => false,
        }
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: BoxError,
    },
    #[error("CSV生成失败: {source}")]
    CsvFailed {
        #[source]
        source: BoxError,
    },
}

/// PDF 渲染错误
#[derive(Debug, Error)]
pub enum RenderError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: BoxError,
    },
    /// 浏览器启动或配置失败
    #[error("浏览器配置失败: {message}")]
    ConfigurationFailed { message: String },
    /// 生成 PDF 失败
    #[error("生成PDF失败 (内容 #{content_id}): {source}")]
    PrintFailed {
        content_id: i64,
        #[source]
        source: BoxError,
    },
}

/// 单个字段的校验错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// 表单校验错误
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 某一步未填写完整
    #[error("步骤 {step} 未完成: {}", join_fields(.errors))]
    StepIncomplete {
        step: &'static str,
        errors: Vec<FieldError>,
    },
    /// 提交前跨步骤校验失败
    #[error("提交校验失败: {}", join_fields(.errors))]
    SubmitRejected { errors: Vec<FieldError> },
}

impl ValidationError {
    /// 所有字段级错误
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ValidationError::StepIncomplete { errors, .. }
            | ValidationError::SubmitRejected { errors } => errors,
        }
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 没有选中任何记录
    #[error("没有选中任何内容")]
    EmptySelection,
    /// 没有选择批量操作
    #[error("没有选择批量操作")]
    NoActionChosen,
    /// 已有批量操作正在执行
    #[error("已有批量操作正在执行")]
    AlreadyProcessing,
    /// 批量操作被取消
    #[error("批量操作已取消 (已完成 {completed}/{total})")]
    Cancelled { completed: usize, total: usize },
    /// 向导已提交或正在提交
    #[error("向导已处于 {state} 状态，无法继续操作")]
    WizardLocked { state: String },
    /// 向导中没有这个步骤
    #[error("向导中不包含步骤: {step}")]
    StepNotInWizard { step: String },
    /// 状态流转非法
    #[error("状态 {from} 无法继续推进")]
    InvalidTransition { from: String },
    /// 未知的批量操作名称
    #[error("未知的批量操作: {name}")]
    UnknownAction { name: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    EnvVarNotFound { var_name: String },
}

// ========== 从常见错误类型转换 ==========

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_default();
        AppError::Api(ApiError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed {
            source: Box::new(err),
        })
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::File(FileError::CsvFailed {
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::File(FileError::TomlParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器连接错误
    pub fn browser_connection_failed(
        port: u16,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Render(RenderError::ConnectionFailed {
            port,
            source: Box::new(source),
        })
    }

    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建PDF生成错误
    pub fn pdf_print_failed(
        content_id: i64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Render(RenderError::PrintFailed {
            content_id,
            source: Box::new(source),
        })
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
