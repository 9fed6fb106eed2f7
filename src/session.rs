//! 会话上下文
//!
//! 取代浏览器 localStorage 中的全局 token，在构造客户端时显式传入

use crate::config::Config;

/// 访问后端所需的会话信息
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub base_url: String,
    pub token: Option<String>,
    pub user_id: Option<i64>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            user_id: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// 内容 API 的会话
    pub fn for_content_api(config: &Config) -> Self {
        Self::from_parts(&config.api_base_url, config)
    }

    /// 学习资料服务的会话
    pub fn for_study_materials(config: &Config) -> Self {
        Self::from_parts(&config.study_material_base_url, config)
    }

    fn from_parts(base_url: &str, config: &Config) -> Self {
        let mut session = Self::new(base_url);
        session.token = config.auth_token.clone();
        session.user_id = config.user_id;
        session
    }

    /// 拼接完整 URL，`path` 以 `/` 开头
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authorization 头的值
    pub fn bearer(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }
}
