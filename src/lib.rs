//! # QAQF Content Core
//!
//! QAQF 教学内容管理的核心逻辑：课程创建向导、批量操作与内容 API 客户端
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PdfRenderer` - 把一条内容渲染成 PDF
//!
//! ### ② 客户端（Clients）
//! - `clients/` - 内容 API 与学习资料 API，带 Session、超时与重试
//! - `ContentStore` - 内容列表、修改、删除、审核、生成
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - HTML / CSV / JSON 导出、文件写入、通知与列表刷新
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 课程创建向导
//! - `FormStep` - 单个步骤的字段与校验
//! - `WizardController` - 步骤顺序、草稿累积、提交
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/selection` - 选中集合
//! - `orchestrator/batch_processor` - 批量操作执行器
//! - `orchestrator/app` - 批量处理程序
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod session;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ContentStore, HttpContentStore, RetryPolicy, StudyMaterialClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{ChromePdfRenderer, PdfRenderer};
pub use models::{derive_defaults, ContentRecord, CourseData, CourseType, SpecializedContent};
pub use orchestrator::{App, BatchAction, BatchActionExecutor, IsolationPolicy, SelectionSet};
pub use session::Session;
pub use workflow::{FormStep, StepId, StepPayload, WizardController, WizardDraft, WizardState};
