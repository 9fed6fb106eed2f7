//! PDF 渲染器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"把一条内容渲染成 PDF"的能力

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::PrintToPdfParams;
use chromiumoxide::Page;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::ContentRecord;
use crate::services::html_export;

/// PDF 渲染能力
#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, record: &ContentRecord) -> AppResult<Vec<u8>>;
}

/// 基于 Chrome DevTools 协议的渲染器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 先生成 HTML，再由浏览器打印为 PDF
/// - 不关心批量流程
pub struct ChromePdfRenderer {
    page: Page,
}

impl ChromePdfRenderer {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }
}

#[async_trait]
impl PdfRenderer for ChromePdfRenderer {
    async fn render(&self, record: &ContentRecord) -> AppResult<Vec<u8>> {
        let html = html_export::render_html(record);
        debug!("渲染内容 #{} 的 HTML ({} 字节)", record.id, html.len());

        self.page
            .set_content(html)
            .await
            .map_err(|e| AppError::pdf_print_failed(record.id, e))?;

        let params = PrintToPdfParams {
            print_background: Some(true),
            ..Default::default()
        };
        let bytes = self
            .page
            .pdf(params)
            .await
            .map_err(|e| AppError::pdf_print_failed(record.id, e))?;

        debug!("内容 #{} 的 PDF 大小: {} 字节", record.id, bytes.len());
        Ok(bytes)
    }
}
