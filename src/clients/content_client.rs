/// 内容 API 客户端
///
/// 封装所有与内容后端（RemoteContentStore）相关的调用
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::clients::http::{ApiClient, RetryPolicy};
use crate::error::AppResult;
use crate::models::{
    BritishStandardsCheck, ContentRecord, ContentUpdate, CourseData, GenerateContentRequest,
    GenerateVideoRequest, GenerationResponse, VerificationResult, VerifyContentRequest,
};
use crate::session::Session;

/// 内容存储的能力接口
///
/// 批量操作和向导只依赖这个 trait，测试中用内存实现替换
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_contents(&self) -> AppResult<Vec<ContentRecord>>;

    async fn get_content(&self, id: i64) -> AppResult<ContentRecord>;

    async fn update_content(&self, id: i64, update: &ContentUpdate) -> AppResult<ContentRecord>;

    async fn delete_content(&self, id: i64) -> AppResult<()>;

    /// 按 QAQF 等级校验单条内容
    async fn verify_content(&self, record: &ContentRecord) -> AppResult<VerificationResult>;

    async fn check_british_standards(&self, content: &JsonValue)
        -> AppResult<BritishStandardsCheck>;

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> AppResult<GenerationResponse>;

    async fn generate_video(&self, request: &GenerateVideoRequest)
        -> AppResult<GenerationResponse>;

    async fn generate_course(&self, course: &CourseData) -> AppResult<GenerationResponse>;
}

/// 基于 REST 的内容存储
pub struct HttpContentStore {
    client: ApiClient,
}

impl HttpContentStore {
    /// 创建新的内容客户端
    pub fn new(session: Session, policy: RetryPolicy) -> AppResult<Self> {
        Ok(Self {
            client: ApiClient::new(session, policy)?,
        })
    }
}

#[async_trait]
impl ContentStore for HttpContentStore {
    async fn list_contents(&self) -> AppResult<Vec<ContentRecord>> {
        let contents: Vec<ContentRecord> = self.client.get_json("/api/content").await?;
        info!("✓ 获取到 {} 条内容", contents.len());
        Ok(contents)
    }

    async fn get_content(&self, id: i64) -> AppResult<ContentRecord> {
        self.client.get_json(&format!("/api/content/{}", id)).await
    }

    async fn update_content(&self, id: i64, update: &ContentUpdate) -> AppResult<ContentRecord> {
        debug!("更新内容 #{}: {:?}", id, update);
        self.client
            .send_json(Method::PATCH, &format!("/api/content/{}", id), update)
            .await
    }

    async fn delete_content(&self, id: i64) -> AppResult<()> {
        debug!("删除内容 #{}", id);
        self.client
            .send_empty(Method::DELETE, &format!("/api/content/{}", id))
            .await
    }

    async fn verify_content(&self, record: &ContentRecord) -> AppResult<VerificationResult> {
        let request = VerifyContentRequest {
            content: record.content.clone(),
            qaqf_level: record.qaqf_level,
        };
        self.client
            .send_json(Method::POST, "/api/verify/content", &request)
            .await
    }

    async fn check_british_standards(
        &self,
        content: &JsonValue,
    ) -> AppResult<BritishStandardsCheck> {
        let body = serde_json::json!({ "content": content });
        self.client
            .send_json(Method::POST, "/api/check/british-standards", &body)
            .await
    }

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> AppResult<GenerationResponse> {
        info!("📝 请求生成内容: {}", request.title);
        self.client
            .send_json(Method::POST, "/api/generate/content", request)
            .await
    }

    async fn generate_video(
        &self,
        request: &GenerateVideoRequest,
    ) -> AppResult<GenerationResponse> {
        info!("🎬 请求生成视频: {}", request.title);
        self.client
            .send_json(Method::POST, "/api/generate/video", request)
            .await
    }

    async fn generate_course(&self, course: &CourseData) -> AppResult<GenerationResponse> {
        info!("📚 请求生成课程: {}", course.course_type);
        self.client
            .send_json(Method::POST, "/api/generate/course", course)
            .await
    }
}
