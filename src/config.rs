use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, FileError};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 内容 API 配置 ---
    pub api_base_url: String,
    pub study_material_base_url: String,
    /// Bearer token，为空时不发送 Authorization 头
    pub auth_token: Option<String>,
    pub user_id: Option<i64>,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 失败后的最大重试次数（不含首次请求）
    pub max_retries: usize,
    pub retry_delay_ms: u64,
    // --- 导出配置 ---
    /// 导出文件存放目录
    pub export_dir: String,
    /// 浏览器调试端口（PDF 渲染）
    pub browser_debug_port: u16,
    // --- 批量处理配置 ---
    /// 逐条操作的并发上限，1 表示严格顺序执行
    pub batch_concurrency: usize,
    /// 要执行的批量操作（export-pdf / export-csv / verify-all / delete-all）
    pub batch_action: Option<String>,
    /// 要选中的内容 ID，为空则全选
    pub batch_select_ids: Vec<i64>,
    // --- 日志配置 ---
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            study_material_base_url: "http://localhost:8000".to_string(),
            auth_token: None,
            user_id: None,
            request_timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 2000,
            export_dir: "exports".to_string(),
            browser_debug_port: 9222,
            batch_concurrency: 1,
            batch_action: None,
            batch_select_ids: Vec::new(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            api_base_url: std::env::var("QAQF_API_BASE_URL").unwrap_or(default.api_base_url),
            study_material_base_url: std::env::var("STUDY_MATERIAL_BASE_URL").unwrap_or(default.study_material_base_url),
            auth_token: std::env::var("QAQF_AUTH_TOKEN").ok().filter(|v| !v.is_empty()).or(default.auth_token),
            user_id: std::env::var("QAQF_USER_ID").ok().and_then(|v| v.parse().ok()).or(default.user_id),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_retries: std::env::var("MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_retries),
            retry_delay_ms: std::env::var("RETRY_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.retry_delay_ms),
            export_dir: std::env::var("EXPORT_DIR").unwrap_or(default.export_dir),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            batch_concurrency: std::env::var("BATCH_CONCURRENCY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.batch_concurrency),
            batch_action: std::env::var("BATCH_ACTION").ok().filter(|v| !v.is_empty()).or(default.batch_action),
            batch_select_ids: std::env::var("BATCH_SELECT_IDS").ok().map(|v| parse_id_list(&v)).unwrap_or(default.batch_select_ids),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(FileError::NotFound { path: display }.into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(display.clone(), e))?;

        toml::from_str(&content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: display,
                source: Box::new(e),
            })
        })
    }
}

/// 解析逗号分隔的 ID 列表，忽略无法解析的项
fn parse_id_list(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
