//! 批量操作执行器 - 编排层
//!
//! ## 职责
//!
//! 对选中的内容逐条执行一个批量操作，汇报进度和成功/失败统计。
//!
//! ## 核心功能
//!
//! 1. **快速失败**：没有选中内容或没有选择操作时只发一条通知，不做任何调用
//! 2. **互斥执行**：同一时间只允许一个操作（`is_processing`）
//! 3. **失败隔离**：由 `IsolationPolicy` 决定单条失败是跳过还是中止整批
//! 4. **取消**：每处理完一条检查一次取消标记
//! 5. **收尾**：操作结束后清空选中集合和操作选择，需要时通知列表刷新

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, warn};

use crate::clients::ContentStore;
use crate::error::{AppError, AppResult, BusinessError, RenderError};
use crate::infrastructure::PdfRenderer;
use crate::models::{ContentRecord, VerificationResult};
use crate::orchestrator::selection::SelectionSet;
use crate::services::{build_csv, ExportWriter, ListInvalidator, ListKey, Notification, Notifier};
use crate::utils::logging::{log_batch_complete, log_batch_start};

/// 批量操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAction {
    ExportPdf,
    ExportCsv,
    VerifyAll,
    DeleteAll,
}

impl BatchAction {
    pub const ALL: [BatchAction; 4] = [
        BatchAction::ExportPdf,
        BatchAction::ExportCsv,
        BatchAction::VerifyAll,
        BatchAction::DeleteAll,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BatchAction::ExportPdf => "export-pdf",
            BatchAction::ExportCsv => "export-csv",
            BatchAction::VerifyAll => "verify-all",
            BatchAction::DeleteAll => "delete-all",
        }
    }

    pub fn parse(name: &str) -> Result<Self, BusinessError> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| BusinessError::UnknownAction {
                name: name.to_string(),
            })
    }

    /// 单条失败时的处理方式
    pub fn isolation_policy(self) -> IsolationPolicy {
        match self {
            BatchAction::ExportPdf => IsolationPolicy::PerRecord,
            BatchAction::ExportCsv | BatchAction::VerifyAll | BatchAction::DeleteAll => {
                IsolationPolicy::WholeBatch
            }
        }
    }
}

impl std::fmt::Display for BatchAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 失败隔离粒度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationPolicy {
    /// 单条失败记录日志后跳过
    PerRecord,
    /// 任何一条失败都中止剩余工作
    WholeBatch,
}

/// 一次批量操作的结果
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub action: BatchAction,
    pub total: usize,
    pub succeeded: usize,
    /// 按 PerRecord 策略被跳过的记录
    pub skipped: Vec<i64>,
    /// 写出的文件
    pub outputs: Vec<PathBuf>,
    pub verifications: Vec<(i64, VerificationResult)>,
}

impl BatchReport {
    fn new(action: BatchAction, total: usize) -> Self {
        Self {
            action,
            total,
            succeeded: 0,
            skipped: Vec::new(),
            outputs: Vec::new(),
            verifications: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.skipped.len()
    }
}

/// 可跨任务共享的取消句柄
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 逐条执行的结果
struct RunOutcome<T> {
    done: Vec<(i64, T)>,
    skipped: Vec<i64>,
    abort: Option<AppError>,
}

/// 结束时复位 `is_processing`
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// 批量操作执行器
pub struct BatchActionExecutor {
    store: Arc<dyn ContentStore>,
    renderer: Option<Arc<dyn PdfRenderer>>,
    writer: ExportWriter,
    notifier: Arc<dyn Notifier>,
    invalidator: Arc<dyn ListInvalidator>,
    action: Mutex<Option<BatchAction>>,
    is_processing: AtomicBool,
    concurrency: usize,
    cancel: CancelHandle,
}

impl BatchActionExecutor {
    pub fn new(
        store: Arc<dyn ContentStore>,
        writer: ExportWriter,
        notifier: Arc<dyn Notifier>,
        invalidator: Arc<dyn ListInvalidator>,
    ) -> Self {
        Self {
            store,
            renderer: None,
            writer,
            notifier,
            invalidator,
            action: Mutex::new(None),
            is_processing: AtomicBool::new(false),
            concurrency: 1,
            cancel: CancelHandle::default(),
        }
    }

    /// PDF 导出需要渲染器
    pub fn with_renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// 逐条操作的并发数，只对 PerRecord 策略生效
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn choose(&self, action: Option<BatchAction>) {
        *self.lock_action() = action;
    }

    pub fn chosen(&self) -> Option<BatchAction> {
        *self.lock_action()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing.load(Ordering::SeqCst)
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// 对选中记录执行当前选择的操作
    ///
    /// `records` 是当前列表，其顺序即处理顺序。
    /// 操作结束（成功、失败或取消）后选中集合与操作选择都会被清空
    pub async fn execute(
        &self,
        selection: &mut SelectionSet,
        records: &[ContentRecord],
    ) -> AppResult<BatchReport> {
        let current: Vec<i64> = records.iter().map(|r| r.id).collect();
        selection.reconcile(&current);

        if selection.is_empty() {
            self.notifier.notify(Notification::error(
                "No items selected",
                "Please select at least one item",
            ));
            return Err(BusinessError::EmptySelection.into());
        }
        let Some(action) = self.chosen() else {
            self.notifier.notify(Notification::error(
                "No action selected",
                "Please choose a batch action",
            ));
            return Err(BusinessError::NoActionChosen.into());
        };

        if self
            .is_processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("⚠️ 已有批量操作在执行，忽略 {}", action);
            return Err(BusinessError::AlreadyProcessing.into());
        }
        let _guard = ProcessingGuard(&self.is_processing);
        self.cancel.reset();

        let selected: Vec<&ContentRecord> =
            records.iter().filter(|r| selection.contains(r.id)).collect();
        log_batch_start(action.as_str(), selected.len());
        self.notifier.notify(start_notification(action, selected.len()));

        let result = match action {
            BatchAction::ExportPdf => self.export_pdf(&selected).await,
            BatchAction::ExportCsv => self.export_csv(&selected).await,
            BatchAction::VerifyAll => self.verify_all(&selected).await,
            BatchAction::DeleteAll => self.delete_all(&selected).await,
        };

        selection.clear();
        self.choose(None);

        match result {
            Ok(report) => {
                log_batch_complete(action.as_str(), report.succeeded, report.total);
                self.notifier.notify(success_notification(&report));
                Ok(report)
            }
            Err(AppError::Business(BusinessError::Cancelled { completed, total })) => {
                info!("🚫 {} 已取消: {}/{}", action, completed, total);
                self.notifier.notify(Notification::info(
                    "Batch action cancelled",
                    format!("Processed {} of {} items", completed, total),
                ));
                Err(BusinessError::Cancelled { completed, total }.into())
            }
            Err(e) => {
                error!("❌ 批量操作 {} 失败: {}", action, e);
                self.notifier.notify(Notification::error(
                    "Error",
                    "An error occurred while processing the batch action",
                ));
                Err(e)
            }
        }
    }

    // ========== 各操作 ==========

    async fn export_pdf(&self, selected: &[&ContentRecord]) -> AppResult<BatchReport> {
        let action = BatchAction::ExportPdf;
        let renderer = self.renderer.as_ref().ok_or_else(|| RenderError::ConfigurationFailed {
            message: "没有配置 PDF 渲染器".to_string(),
        })?;

        let outcome = self
            .run_records(action.isolation_policy(), selected, |record| async move {
                let bytes = renderer.render(record).await?;
                self.writer.write_pdf(record, &bytes).await
            })
            .await;
        let (mut report, done) = finish(action, selected.len(), outcome)?;
        report.outputs = done.into_iter().map(|(_, path)| path).collect();
        Ok(report)
    }

    async fn export_csv(&self, selected: &[&ContentRecord]) -> AppResult<BatchReport> {
        let csv = build_csv(selected)?;
        let path = self.writer.write_csv(&csv).await?;
        self.notifier.progress(selected.len(), selected.len());

        let mut report = BatchReport::new(BatchAction::ExportCsv, selected.len());
        report.succeeded = selected.len();
        report.outputs.push(path);
        Ok(report)
    }

    async fn verify_all(&self, selected: &[&ContentRecord]) -> AppResult<BatchReport> {
        let action = BatchAction::VerifyAll;
        let outcome = self
            .run_records(action.isolation_policy(), selected, |record| {
                self.store.verify_content(record)
            })
            .await;
        if !outcome.done.is_empty() {
            self.invalidator.invalidate(ListKey::Contents);
        }
        let (mut report, done) = finish(action, selected.len(), outcome)?;
        report.verifications = done;
        Ok(report)
    }

    async fn delete_all(&self, selected: &[&ContentRecord]) -> AppResult<BatchReport> {
        let action = BatchAction::DeleteAll;
        let outcome = self
            .run_records(action.isolation_policy(), selected, |record| {
                self.store.delete_content(record.id)
            })
            .await;
        // 中途失败时已删除的记录也需要从列表中消失
        if !outcome.done.is_empty() {
            self.invalidator.invalidate(ListKey::Contents);
        }
        finish(action, selected.len(), outcome).map(|(report, _)| report)
    }

    // ========== 逐条执行 ==========

    /// 按列表顺序对每条记录执行 `op`
    async fn run_records<'a, T, F, Fut>(
        &self,
        policy: IsolationPolicy,
        records: &[&'a ContentRecord],
        op: F,
    ) -> RunOutcome<T>
    where
        F: Fn(&'a ContentRecord) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if policy == IsolationPolicy::PerRecord && self.concurrency > 1 {
            return self.run_buffered(records, op).await;
        }

        let total = records.len();
        let mut outcome = RunOutcome {
            done: Vec::with_capacity(total),
            skipped: Vec::new(),
            abort: None,
        };

        for (index, record) in records.iter().copied().enumerate() {
            if self.cancel.is_cancelled() {
                outcome.abort = Some(BusinessError::Cancelled { completed: index, total }.into());
                return outcome;
            }

            match op(record).await {
                Ok(value) => {
                    debug!("✓ 内容 #{} 处理完成", record.id);
                    outcome.done.push((record.id, value));
                }
                Err(e) => match policy {
                    IsolationPolicy::PerRecord => {
                        warn!("⚠️ 内容 #{} 处理失败，已跳过: {}", record.id, e);
                        outcome.skipped.push(record.id);
                    }
                    IsolationPolicy::WholeBatch => {
                        error!("❌ 内容 #{} 处理失败，中止剩余 {} 条", record.id, total - index - 1);
                        outcome.abort = Some(e);
                        return outcome;
                    }
                },
            }
            self.notifier.progress(index + 1, total);
        }
        outcome
    }

    /// 有界并发版本，结果仍按列表顺序产出
    async fn run_buffered<'a, T, F, Fut>(
        &self,
        records: &[&'a ContentRecord],
        op: F,
    ) -> RunOutcome<T>
    where
        F: Fn(&'a ContentRecord) -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let total = records.len();
        let mut outcome = RunOutcome {
            done: Vec::with_capacity(total),
            skipped: Vec::new(),
            abort: None,
        };

        let cancel = &self.cancel;
        let mut results = stream::iter(records.iter().copied())
            .map(|record| {
                let fut = op(record);
                async move {
                    if cancel.is_cancelled() {
                        None
                    } else {
                        Some((record.id, fut.await))
                    }
                }
            })
            .buffered(self.concurrency);

        let mut completed = 0;
        while let Some(item) = results.next().await {
            let Some((id, result)) = item else {
                outcome.abort = Some(BusinessError::Cancelled { completed, total }.into());
                return outcome;
            };
            match result {
                Ok(value) => outcome.done.push((id, value)),
                Err(e) => {
                    warn!("⚠️ 内容 #{} 处理失败，已跳过: {}", id, e);
                    outcome.skipped.push(id);
                }
            }
            completed += 1;
            self.notifier.progress(completed, total);
        }
        outcome
    }

    fn lock_action(&self) -> std::sync::MutexGuard<'_, Option<BatchAction>> {
        self.action.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn start_notification(action: BatchAction, n: usize) -> Notification {
    let title = match action {
        BatchAction::ExportPdf => "Exporting PDFs",
        BatchAction::ExportCsv => "Exporting CSV",
        BatchAction::VerifyAll => "Verifying Content",
        BatchAction::DeleteAll => "Deleting Content",
    };
    Notification::info(title, format!("Processing {} items", n))
}

fn success_notification(report: &BatchReport) -> Notification {
    let n = report.succeeded;
    match report.action {
        BatchAction::ExportPdf if report.skipped.is_empty() => {
            Notification::info("Export complete", format!("Exported {} items as PDF", n))
        }
        BatchAction::ExportPdf => Notification::info(
            "Export complete",
            format!(
                "Exported {} items as PDF, {} failed and were skipped",
                n,
                report.skipped.len()
            ),
        ),
        BatchAction::ExportCsv => {
            Notification::info("Export complete", format!("Exported {} items as CSV", n))
        }
        BatchAction::VerifyAll => {
            Notification::info("Verification complete", format!("Verified {} items", n))
        }
        BatchAction::DeleteAll => {
            Notification::info("Deletion complete", format!("Deleted {} items", n))
        }
    }
}

/// 中止时返回中止原因，否则汇总为报告
fn finish<T>(
    action: BatchAction,
    total: usize,
    outcome: RunOutcome<T>,
) -> AppResult<(BatchReport, Vec<(i64, T)>)> {
    if let Some(e) = outcome.abort {
        return Err(e);
    }
    let mut report = BatchReport::new(action, total);
    report.succeeded = outcome.done.len();
    report.skipped = outcome.skipped;
    Ok((report, outcome.done))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_both_separators() {
        assert_eq!(BatchAction::parse("export-pdf").unwrap(), BatchAction::ExportPdf);
        assert_eq!(BatchAction::parse(" Delete_All ").unwrap(), BatchAction::DeleteAll);
        assert!(matches!(
            BatchAction::parse("archive"),
            Err(BusinessError::UnknownAction { .. })
        ));
    }

    #[test]
    fn only_pdf_export_isolates_per_record() {
        for action in BatchAction::ALL {
            let expected = if action == BatchAction::ExportPdf {
                IsolationPolicy::PerRecord
            } else {
                IsolationPolicy::WholeBatch
            };
            assert_eq!(action.isolation_policy(), expected);
        }
    }

    #[test]
    fn cancel_handle_is_shared() {
        let handle = CancelHandle::default();
        let clone = handle.clone();
        clone.cancel();
        assert!(handle.is_cancelled());
        handle.reset();
        assert!(!clone.is_cancelled());
    }
}
