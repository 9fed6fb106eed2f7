//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量操作和流程调度。
//!
//! ## 模块划分
//!
//! ### `selection` - 选中集合
//! - 记录列表中哪些内容被勾选
//! - 列表刷新后去掉已不存在的 ID
//!
//! ### `batch_processor` - 批量操作执行器
//! - 快速失败、互斥执行、失败隔离、取消
//! - 结束后重置选中集合和操作选择
//!
//! ### `app` - 批量处理程序
//! - 初始化 Session、客户端、渲染器
//! - 拉取列表、选中、执行、输出统计
//!
//! ## 层次关系
//!
//! ```text
//! app (拉取列表 + 选中)
//!     ↓
//! batch_processor (逐条执行 Vec<ContentRecord>)
//!     ↓
//! clients (ContentStore) / services (导出、通知)
//!     ↓
//! infrastructure (PdfRenderer)
//! ```

pub mod app;
pub mod batch_processor;
pub mod selection;

pub use app::App;
pub use batch_processor::{
    BatchAction, BatchActionExecutor, BatchReport, CancelHandle, IsolationPolicy,
};
pub use selection::SelectionSet;
