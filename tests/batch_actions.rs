mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    records, CancellingNotifier, FakeRenderer, RecordingInvalidator, RecordingNotifier,
    RecordingStore,
};
use qaqf_content_core::error::{AppError, BusinessError};
use qaqf_content_core::orchestrator::{BatchAction, BatchActionExecutor, SelectionSet};
use qaqf_content_core::services::{ExportWriter, ListKey, NotificationLevel};

struct Harness {
    store: Arc<RecordingStore>,
    renderer: Arc<FakeRenderer>,
    notifier: Arc<RecordingNotifier>,
    invalidator: Arc<RecordingInvalidator>,
    executor: BatchActionExecutor,
    _dir: tempfile::TempDir,
}

fn harness(store: RecordingStore, renderer: FakeRenderer) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(store);
    let renderer = Arc::new(renderer);
    let notifier = Arc::new(RecordingNotifier::default());
    let invalidator = Arc::new(RecordingInvalidator::default());

    let executor = BatchActionExecutor::new(
        store.clone(),
        ExportWriter::new(dir.path()),
        notifier.clone(),
        invalidator.clone(),
    )
    .with_renderer(renderer.clone());

    Harness {
        store,
        renderer,
        notifier,
        invalidator,
        executor,
        _dir: dir,
    }
}

fn select(ids: &[i64]) -> SelectionSet {
    let mut selection = SelectionSet::new();
    for id in ids {
        selection.toggle(*id);
    }
    selection
}

#[tokio::test]
async fn empty_selection_does_no_work_and_notifies_once() {
    let h = harness(RecordingStore::default(), FakeRenderer::default());
    h.executor.choose(Some(BatchAction::DeleteAll));

    let mut selection = SelectionSet::new();
    let err = h.executor.execute(&mut selection, &records(5)).await.unwrap_err();

    assert!(matches!(err, AppError::Business(BusinessError::EmptySelection)));
    assert!(h.store.calls().is_empty());
    assert!(h.renderer.rendered().is_empty());
    let notes = h.notifier.notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    // 快速失败不清空操作选择
    assert_eq!(h.executor.chosen(), Some(BatchAction::DeleteAll));
}

#[tokio::test]
async fn missing_action_does_no_work_and_notifies_once() {
    let h = harness(RecordingStore::default(), FakeRenderer::default());
    let mut selection = select(&[1, 2]);

    let err = h.executor.execute(&mut selection, &records(5)).await.unwrap_err();

    assert!(matches!(err, AppError::Business(BusinessError::NoActionChosen)));
    assert!(h.store.calls().is_empty());
    assert_eq!(h.notifier.notifications().len(), 1);
    assert_eq!(selection.len(), 2);
}

#[tokio::test]
async fn delete_all_clears_selection_and_refreshes_once() {
    let h = harness(RecordingStore::default(), FakeRenderer::default());
    h.executor.choose(Some(BatchAction::DeleteAll));
    let mut selection = select(&[4, 1, 3]);

    let report = h.executor.execute(&mut selection, &records(5)).await.unwrap();

    assert_eq!(report.succeeded, 3);
    assert_eq!(h.store.calls(), vec!["delete 1", "delete 3", "delete 4"]);
    assert!(selection.is_empty());
    assert_eq!(h.invalidator.keys(), vec![ListKey::Contents]);
    assert_eq!(h.executor.chosen(), None);
    assert!(!h.executor.is_processing());
    assert_eq!(h.notifier.progress_events(), vec![(1, 3), (2, 3), (3, 3)]);

    let notes = h.notifier.notifications();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].title, "Deleting Content");
    assert_eq!(notes[0].description, "Processing 3 items");
    assert_eq!(notes[1].title, "Deletion complete");
    assert_eq!(notes[1].description, "Deleted 3 items");
}

#[tokio::test]
async fn export_pdf_skips_failed_records() {
    let h = harness(RecordingStore::default(), FakeRenderer::failing_on(&[2]));
    h.executor.choose(Some(BatchAction::ExportPdf));
    let mut selection = select(&[1, 2, 3]);

    let report = h.executor.execute(&mut selection, &records(5)).await.unwrap();

    assert_eq!(h.renderer.rendered(), vec![1, 2, 3]);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.skipped, vec![2]);
    assert_eq!(report.outputs.len(), 2);
    assert!(report.outputs[0].ends_with("Item_1_1.pdf"));
    assert!(report.outputs.iter().all(|p| p.exists()));
    assert!(h.invalidator.keys().is_empty());
    let titles: Vec<_> = h.notifier.notifications().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Exporting PDFs", "Export complete"]);
}

#[tokio::test]
async fn export_pdf_with_concurrency_keeps_list_order() {
    let mut h = harness(RecordingStore::default(), FakeRenderer::failing_on(&[4]));
    h.executor = h.executor.with_concurrency(3);
    h.executor.choose(Some(BatchAction::ExportPdf));
    let mut selection = SelectionSet::new();
    selection.select_all(1..=5);

    let report = h.executor.execute(&mut selection, &records(5)).await.unwrap();

    assert_eq!(report.succeeded, 4);
    assert_eq!(report.skipped, vec![4]);
    let names: Vec<_> = report
        .outputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["Item_1_1.pdf", "Item_2_2.pdf", "Item_3_3.pdf", "Item_5_5.pdf"]
    );
}

#[tokio::test]
async fn export_csv_writes_one_file_in_display_order() {
    let h = harness(RecordingStore::default(), FakeRenderer::default());
    h.executor.choose(Some(BatchAction::ExportCsv));
    let mut selection = select(&[5, 2]);

    let report = h.executor.execute(&mut selection, &records(5)).await.unwrap();

    assert_eq!(report.outputs.len(), 1);
    let name = report.outputs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("content_export_") && name.ends_with(".csv"));
    assert_eq!(h.notifier.notifications()[0].title, "Exporting CSV");
    let text = std::fs::read_to_string(&report.outputs[0]).unwrap();
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID,Title,Type,QAQF Level,Verification Status,Created At");
    assert!(lines[1].starts_with("2,\"Item 2\""));
    assert!(lines[2].starts_with("5,\"Item 5\""));
    assert!(h.store.calls().is_empty());
}

#[tokio::test]
async fn verify_all_calls_once_per_record_then_refreshes() {
    let h = harness(RecordingStore::default(), FakeRenderer::default());
    h.executor.choose(Some(BatchAction::VerifyAll));
    let mut selection = select(&[1, 2]);

    let report = h.executor.execute(&mut selection, &records(3)).await.unwrap();

    assert_eq!(h.store.calls(), vec!["verify 1", "verify 2"]);
    assert_eq!(report.verifications.len(), 2);
    assert_eq!(report.verifications[0].1.overall_score, 87.5);
    assert_eq!(h.invalidator.keys(), vec![ListKey::Contents]);
}

#[tokio::test]
async fn failure_aborts_remaining_work_and_clears_processing() {
    let h = harness(RecordingStore::failing_on(&[2]), FakeRenderer::default());
    h.executor.choose(Some(BatchAction::DeleteAll));
    let mut selection = select(&[1, 2, 3]);

    let err = h.executor.execute(&mut selection, &records(5)).await;

    assert!(err.is_err());
    assert_eq!(h.store.calls(), vec!["delete 1", "delete 2"]);
    assert!(!h.executor.is_processing());
    assert!(selection.is_empty());
    assert_eq!(h.executor.chosen(), None);
    // 已删除的记录需要刷新列表
    assert_eq!(h.invalidator.keys(), vec![ListKey::Contents]);

    let notes = h.notifier.notifications();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].title, "Deleting Content");
    assert_eq!(notes[1].level, NotificationLevel::Error);
}

#[tokio::test]
async fn stale_selection_is_reconciled_before_running() {
    let h = harness(RecordingStore::default(), FakeRenderer::default());
    h.executor.choose(Some(BatchAction::VerifyAll));
    let mut selection = select(&[2, 9]);

    let report = h.executor.execute(&mut selection, &records(3)).await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(h.store.calls(), vec!["verify 2"]);
}

#[tokio::test]
async fn second_run_is_rejected_while_first_is_processing() {
    let h = harness(
        RecordingStore::slow_deletes(Duration::from_millis(20)),
        FakeRenderer::default(),
    );
    h.executor.choose(Some(BatchAction::DeleteAll));
    let list = records(3);
    let mut first = select(&[1, 2, 3]);
    let mut second = select(&[1, 2, 3]);

    let (a, b) = tokio::join!(
        h.executor.execute(&mut first, &list),
        h.executor.execute(&mut second, &list),
    );

    let results = [a, b];
    let rejected = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Business(BusinessError::AlreadyProcessing))))
        .count();
    assert_eq!(rejected, 1);
    assert!(results.iter().any(|r| matches!(r, Ok(report) if report.succeeded == 3)));
    assert_eq!(h.store.calls(), vec!["delete 1", "delete 2", "delete 3"]);
    // 被拒绝的一次不动自己的选中集合
    let mut sizes = [first.len(), second.len()];
    sizes.sort();
    assert_eq!(sizes, [0, 3]);
    assert!(!h.executor.is_processing());

    let titles: Vec<_> = h.notifier.notifications().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Deleting Content", "Deletion complete"]);
}

#[tokio::test]
async fn cancel_stops_before_next_record_and_resets_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(RecordingStore::default());
    let notifier = Arc::new(CancellingNotifier::new(1));
    let invalidator = Arc::new(RecordingInvalidator::default());
    let executor = BatchActionExecutor::new(
        store.clone(),
        ExportWriter::new(dir.path()),
        notifier.clone(),
        invalidator.clone(),
    );
    notifier.attach(executor.cancel_handle());
    executor.choose(Some(BatchAction::DeleteAll));
    let mut selection = select(&[1, 2, 3]);

    let err = executor.execute(&mut selection, &records(3)).await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Business(BusinessError::Cancelled {
            completed: 1,
            total: 3
        })
    ));
    assert_eq!(store.calls(), vec!["delete 1"]);
    assert!(selection.is_empty());
    assert_eq!(executor.chosen(), None);
    assert!(!executor.is_processing());
    assert_eq!(invalidator.keys(), vec![ListKey::Contents]);

    let notes = notifier.inner.notifications();
    let last = notes.last().unwrap();
    assert_eq!(last.title, "Batch action cancelled");
    assert_eq!(last.description, "Processed 1 of 3 items");

    // 下一次执行前取消标记会被复位
    executor.choose(Some(BatchAction::DeleteAll));
    let mut again = select(&[2]);
    assert_eq!(executor.execute(&mut again, &records(3)).await.unwrap().succeeded, 1);
}
