//! 批量处理程序 - 编排层
//!
//! ## 职责
//!
//! `qaqf-batch` 的入口：初始化资源，拉取内容列表，
//! 按配置选中内容并执行一个批量操作，最后输出统计。
//!
//! ## 资源
//!
//! - 内容 API 客户端（带 Session）
//! - 仅在 PDF 导出时持有浏览器；优先连接调试端口，连不上再启动无头浏览器

use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tracing::{info, warn};

use crate::browser;
use crate::clients::{ContentStore, HttpContentStore, RetryPolicy};
use crate::config::Config;
use crate::infrastructure::ChromePdfRenderer;
use crate::models::ContentRecord;
use crate::orchestrator::batch_processor::{BatchAction, BatchActionExecutor, BatchReport};
use crate::orchestrator::selection::SelectionSet;
use crate::services::{ExportWriter, LogNotifier, NoopInvalidator};
use crate::session::Session;
use crate::utils::logging::{init_log_file, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    action: BatchAction,
    store: Arc<dyn ContentStore>,
    executor: BatchActionExecutor,
    _browser: Option<Browser>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;
        log_startup(&config.api_base_url, config.batch_action.as_deref());

        let action_name = config
            .batch_action
            .as_deref()
            .context("未设置 BATCH_ACTION (export-pdf / export-csv / verify-all / delete-all)")?;
        let action = BatchAction::parse(action_name)?;

        let session = Session::for_content_api(&config);
        let store: Arc<dyn ContentStore> = Arc::new(HttpContentStore::new(
            session,
            RetryPolicy::from_config(&config),
        )?);

        let mut executor = BatchActionExecutor::new(
            store.clone(),
            ExportWriter::new(&config.export_dir),
            Arc::new(LogNotifier),
            Arc::new(NoopInvalidator),
        )
        .with_concurrency(config.batch_concurrency);

        let mut browser_handle = None;
        if action == BatchAction::ExportPdf {
            let (browser, page) = match browser::connect_to_browser(config.browser_debug_port).await
            {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("⚠️ {}，改为启动无头浏览器", e);
                    browser::launch_headless_browser().await?
                }
            };
            executor = executor.with_renderer(Arc::new(ChromePdfRenderer::new(page)));
            browser_handle = Some(browser);
        }
        executor.choose(Some(action));

        Ok(Self {
            config,
            action,
            store,
            executor,
            _browser: browser_handle,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        info!("\n📁 正在获取内容列表...");
        let records = self.store.list_contents().await?;
        if records.is_empty() {
            warn!("⚠️ 内容列表为空，程序结束");
            return Ok(());
        }
        info!("📄 共 {} 条内容", records.len());

        let mut selection = self.select(&records);
        if selection.is_empty() {
            warn!("⚠️ 配置的 ID 都不在内容列表中，程序结束");
            return Ok(());
        }

        let report = self.executor.execute(&mut selection, &records).await?;
        self.log_report(&report);

        print_final_stats(
            report.succeeded,
            report.failed(),
            report.total,
            &self.config.output_log_file,
        );
        Ok(())
    }

    fn select(&self, records: &[ContentRecord]) -> SelectionSet {
        let mut selection = SelectionSet::new();
        if self.config.batch_select_ids.is_empty() {
            selection.select_all(records.iter().map(|r| r.id));
        } else {
            for id in &self.config.batch_select_ids {
                if !records.iter().any(|r| r.id == *id) {
                    warn!("⚠️ 内容 #{} 不在列表中，已忽略", id);
                } else if !selection.contains(*id) {
                    selection.toggle(*id);
                }
            }
        }
        info!("☑️ {}: 选中 {} 条", self.action, selection.len());
        selection
    }

    fn log_report(&self, report: &BatchReport) {
        for path in &report.outputs {
            info!("  📎 {}", path.display());
        }
        for (id, result) in &report.verifications {
            info!("  🔍 内容 #{}: 得分 {}", id, result.overall_score);
        }
        if !report.skipped.is_empty() {
            warn!("  ⏭️ 跳过: {:?}", report.skipped);
        }
    }
}
