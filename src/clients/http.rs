//! REST 调用的公共部分：会话头、超时、重试

use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::session::Session;
use crate::utils::truncate_text;

/// 超时与重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 单次请求超时
    pub timeout: Duration,
    /// 首次请求之外的重试次数
    pub max_retries: usize,
    /// 两次重试之间的等待时间
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 2,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.max_retries,
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// 带会话的 HTTP 客户端
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
    policy: RetryPolicy,
}

impl ApiClient {
    pub fn new(session: Session, policy: RetryPolicy) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(policy.timeout)
            .build()
            .map_err(|e| AppError::api_request_failed(session.base_url.clone(), e))?;

        Ok(Self {
            http,
            session,
            policy,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// GET 并解析 JSON
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.execute(Method::GET, path, None::<&()>).await?;
        parse_json(path, response).await
    }

    /// 发送 JSON 请求体并解析 JSON 响应
    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(method, path, Some(body)).await?;
        parse_json(path, response).await
    }

    /// 发送请求并丢弃响应体
    pub async fn send_empty(&self, method: Method, path: &str) -> AppResult<()> {
        self.execute(method, path, None::<&()>).await?;
        Ok(())
    }

    async fn execute<B>(&self, method: Method, path: &str, body: Option<&B>) -> AppResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.session.url(path);
        let mut attempt = 0;

        loop {
            debug!("{} {} (尝试 {}/{})", method, url, attempt + 1, self.policy.max_retries + 1);

            let mut request = self.http.request(method.clone(), &url);
            if let Some(bearer) = self.session.bearer() {
                request = request.header(reqwest::header::AUTHORIZATION, bearer);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let error = match request.send().await {
                Ok(response) => match check_status(path, response).await {
                    Ok(response) => return Ok(response),
                    Err(e) => e,
                },
                Err(e) if e.is_timeout() => ApiError::Timeout {
                    endpoint: path.to_string(),
                    timeout_secs: self.policy.timeout.as_secs(),
                },
                Err(e) => ApiError::RequestFailed {
                    endpoint: path.to_string(),
                    source: Box::new(e),
                },
            };

            if !error.is_retryable() || attempt >= self.policy.max_retries {
                return Err(error.into());
            }

            attempt += 1;
            warn!(
                "请求 {} 失败: {}，{}ms 后重试 ({}/{})",
                path,
                error,
                self.policy.delay.as_millis(),
                attempt,
                self.policy.max_retries
            );
            sleep(self.policy.delay).await;
        }
    }
}

async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound {
            endpoint: path.to_string(),
        });
    }

    let message = response
        .text()
        .await
        .ok()
        .filter(|t| !t.is_empty())
        .map(|t| truncate_text(&t, 200));

    Err(ApiError::BadResponse {
        endpoint: path.to_string(),
        status: status.as_u16(),
        message,
    })
}

async fn parse_json<T: DeserializeOwned>(path: &str, response: Response) -> AppResult<T> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::api_request_failed(path, e))?;
    let value = serde_json::from_slice(&bytes)?;
    Ok(value)
}
