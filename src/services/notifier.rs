//! 通知与列表失效 - 业务能力层
//!
//! 批量操作通过这里向调用方报告开始、进度和结果，
//! 以及在修改完成后发出"列表需要刷新"的信号

use tracing::{error, info};

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    /// 错误提示（界面上的 destructive 样式）
    Error,
}

/// 一条可关闭的提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// 通知接收方
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    /// 逐条处理时的进度，默认忽略
    fn progress(&self, _completed: usize, _total: usize) {}
}

/// 把通知写入日志
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => {
                info!("🔔 {}: {}", notification.title, notification.description)
            }
            NotificationLevel::Error => {
                error!("❌ {}: {}", notification.title, notification.description)
            }
        }
    }

    fn progress(&self, completed: usize, total: usize) {
        let percent = if total == 0 { 100 } else { completed * 100 / total };
        info!("⏳ 进度: {}/{} ({}%)", completed, total, percent);
    }
}

/// 需要刷新的列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKey {
    Contents,
    StudyMaterials,
}

/// 列表失效订阅方：收到信号后自行重新拉取
pub trait ListInvalidator: Send + Sync {
    fn invalidate(&self, key: ListKey);
}

/// 不需要刷新时使用
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopInvalidator;

impl ListInvalidator for NoopInvalidator {
    fn invalidate(&self, _key: ListKey) {}
}
