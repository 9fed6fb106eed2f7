//! 流程层：课程创建向导
//!
//! `form_step` 定义单个步骤（字段、校验、payload），
//! `wizard` 负责步骤顺序、草稿累积和提交。

pub mod form_step;
pub mod wizard;

pub use form_step::{
    BasicInfoField, BasicInfoStep, FormStep, ObjectivesField, ObjectivesStep,
    SpecializedContentStep, SpecializedField, StepId, StepPayload,
};
pub use wizard::{
    NextOutcome, StepEdit, WizardController, WizardDraft, WizardState, DEFAULT_STEPS,
};
