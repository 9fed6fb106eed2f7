//! 学习资料服务客户端
//!
//! 需要 Bearer token，列表接口返回 `{id, title, file_name, ...}` 数组

use tracing::debug;

use crate::clients::http::{ApiClient, RetryPolicy};
use crate::error::AppResult;
use crate::models::{Collection, StudyMaterial};
use crate::session::Session;

pub struct StudyMaterialClient {
    client: ApiClient,
}

impl StudyMaterialClient {
    pub fn new(session: Session, policy: RetryPolicy) -> AppResult<Self> {
        Ok(Self {
            client: ApiClient::new(session, policy)?,
        })
    }

    pub async fn list_study_materials(&self) -> AppResult<Vec<StudyMaterial>> {
        self.client.get_json("/api/study-materials").await
    }

    /// 只保留 PDF 资料（向导中可选为课程来源）
    pub async fn list_pdf_materials(&self) -> AppResult<Vec<StudyMaterial>> {
        let materials = self.list_study_materials().await?;
        let total = materials.len();
        let pdfs: Vec<_> = materials.into_iter().filter(StudyMaterial::is_pdf).collect();
        debug!("学习资料 {} 份，其中 PDF {} 份", total, pdfs.len());
        Ok(pdfs)
    }

    pub async fn list_collections(&self) -> AppResult<Vec<Collection>> {
        self.client.get_json("/api/collection-study-materials").await
    }
}
