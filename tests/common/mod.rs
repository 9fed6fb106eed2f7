//! 集成测试共用的桩实现

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value as JsonValue};

use qaqf_content_core::clients::ContentStore;
use qaqf_content_core::error::{ApiError, AppError, AppResult};
use qaqf_content_core::infrastructure::PdfRenderer;
use qaqf_content_core::models::{
    BritishStandardsCheck, ContentRecord, ContentType, ContentUpdate, CourseData,
    GenerateContentRequest, GenerateVideoRequest, GenerationResponse, VerificationResult,
    VerificationStatus,
};
use qaqf_content_core::orchestrator::CancelHandle;
use qaqf_content_core::services::{ListInvalidator, ListKey, Notification, Notifier};

pub fn record(id: i64, title: &str) -> ContentRecord {
    ContentRecord {
        id,
        title: title.to_string(),
        description: format!("{} description", title),
        content_type: ContentType::Lecture,
        qaqf_level: 4,
        module_code: None,
        verification_status: VerificationStatus::Pending,
        content: JsonValue::String(format!("# {}\n\nBody", title)),
        characteristics: json!([1, 2]),
        created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    }
}

pub fn records(n: i64) -> Vec<ContentRecord> {
    (1..=n).map(|id| record(id, &format!("Item {}", id))).collect()
}

fn api_failure(endpoint: String) -> AppError {
    ApiError::BadResponse {
        endpoint,
        status: 500,
        message: Some("boom".into()),
    }
    .into()
}

/// 记录每次调用的内容存储
#[derive(Default)]
pub struct RecordingStore {
    pub calls: Mutex<Vec<String>>,
    pub fail_ids: HashSet<i64>,
    pub fail_generate: bool,
    /// 每次删除前等待的时间
    pub delete_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn failing_on(ids: &[i64]) -> Self {
        Self {
            fail_ids: ids.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn slow_deletes(delay: Duration) -> Self {
        Self {
            delete_delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ContentStore for RecordingStore {
    async fn list_contents(&self) -> AppResult<Vec<ContentRecord>> {
        self.push("list".into());
        Ok(records(5))
    }

    async fn get_content(&self, id: i64) -> AppResult<ContentRecord> {
        self.push(format!("get {}", id));
        Ok(record(id, "fetched"))
    }

    async fn update_content(&self, id: i64, _update: &ContentUpdate) -> AppResult<ContentRecord> {
        self.push(format!("update {}", id));
        Ok(record(id, "updated"))
    }

    async fn delete_content(&self, id: i64) -> AppResult<()> {
        self.push(format!("delete {}", id));
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_ids.contains(&id) {
            return Err(api_failure(format!("/api/content/{}", id)));
        }
        Ok(())
    }

    async fn verify_content(&self, record: &ContentRecord) -> AppResult<VerificationResult> {
        self.push(format!("verify {}", record.id));
        if self.fail_ids.contains(&record.id) {
            return Err(api_failure("/api/verify/content".into()));
        }
        Ok(serde_json::from_value(json!({
            "overallScore": 87.5,
            "feedback": "ok"
        }))?)
    }

    async fn check_british_standards(
        &self,
        _content: &JsonValue,
    ) -> AppResult<BritishStandardsCheck> {
        self.push("british".into());
        Ok(serde_json::from_value(json!({ "compliant": true }))?)
    }

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> AppResult<GenerationResponse> {
        self.push(format!("generate content {}", request.title));
        Ok(json!({ "id": 100 }))
    }

    async fn generate_video(
        &self,
        request: &GenerateVideoRequest,
    ) -> AppResult<GenerationResponse> {
        self.push(format!("generate video {}", request.title));
        Ok(json!({ "id": 101 }))
    }

    async fn generate_course(&self, course: &CourseData) -> AppResult<GenerationResponse> {
        self.push(format!("generate course {}", course.course_type));
        if self.fail_generate {
            return Err(api_failure("/api/generate/course".into()));
        }
        Ok(json!({ "id": 102, "title": "Generated course" }))
    }
}

/// 返回固定字节的渲染器
#[derive(Default)]
pub struct FakeRenderer {
    pub rendered: Mutex<Vec<i64>>,
    pub fail_ids: HashSet<i64>,
}

impl FakeRenderer {
    pub fn failing_on(ids: &[i64]) -> Self {
        Self {
            fail_ids: ids.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn rendered(&self) -> Vec<i64> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl PdfRenderer for FakeRenderer {
    async fn render(&self, record: &ContentRecord) -> AppResult<Vec<u8>> {
        self.rendered.lock().unwrap().push(record.id);
        if self.fail_ids.contains(&record.id) {
            return Err(AppError::pdf_print_failed(
                record.id,
                std::io::Error::new(std::io::ErrorKind::Other, "printer jammed"),
            ));
        }
        Ok(format!("%PDF-1.4 fake {}", record.id).into_bytes())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
    pub progress: Mutex<Vec<(usize, usize)>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn progress_events(&self) -> Vec<(usize, usize)> {
        self.progress.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn progress(&self, completed: usize, total: usize) {
        self.progress.lock().unwrap().push((completed, total));
    }
}

/// 处理到第 `cancel_at` 条时触发取消
pub struct CancellingNotifier {
    pub inner: RecordingNotifier,
    pub handle: Mutex<Option<CancelHandle>>,
    pub cancel_at: usize,
}

impl CancellingNotifier {
    pub fn new(cancel_at: usize) -> Self {
        Self {
            inner: RecordingNotifier::default(),
            handle: Mutex::new(None),
            cancel_at,
        }
    }

    pub fn attach(&self, handle: CancelHandle) {
        *self.handle.lock().unwrap() = Some(handle);
    }
}

impl Notifier for CancellingNotifier {
    fn notify(&self, notification: Notification) {
        self.inner.notify(notification);
    }

    fn progress(&self, completed: usize, total: usize) {
        self.inner.progress(completed, total);
        if completed == self.cancel_at {
            if let Some(handle) = self.handle.lock().unwrap().as_ref() {
                handle.cancel();
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingInvalidator {
    pub keys: Mutex<Vec<ListKey>>,
}

impl RecordingInvalidator {
    pub fn keys(&self) -> Vec<ListKey> {
        self.keys.lock().unwrap().clone()
    }
}

impl ListInvalidator for RecordingInvalidator {
    fn invalidate(&self, key: ListKey) {
        self.keys.lock().unwrap().push(key);
    }
}
