//! 课程创建向导
//!
//! 持有有序的步骤列表、当前位置以及逐步累积的草稿。
//! 每次字段修改都会立刻把该步骤的 payload 写回草稿，
//! 课程类型变化时重新计算依赖它的步骤。

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::form_step::{
    BasicInfoField, BasicInfoStep, FormStep, ObjectivesField, ObjectivesStep,
    SpecializedContentStep, SpecializedField, StepId, StepPayload,
};
use crate::clients::ContentStore;
use crate::error::{AppError, AppResult, BusinessError, FieldError, ValidationError};
use crate::models::{
    BasicInfo, CourseData, CourseType, GenerationResponse, LearningObjectives, SpecializedContent,
};

/// 默认步骤顺序
pub const DEFAULT_STEPS: [StepId; 3] = [
    StepId::BasicInfo,
    StepId::Objectives,
    StepId::SpecializedContent,
];

/// 向导状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    /// 停留在第 n 步（从 0 开始）
    Step(usize),
    /// 已提交，等待生成结果
    Submitting,
    /// 生成成功，向导结束
    Submitted,
}

impl std::fmt::Display for WizardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardState::Step(i) => write!(f, "step {}", i + 1),
            WizardState::Submitting => f.write_str("submitting"),
            WizardState::Submitted => f.write_str("submitted"),
        }
    }
}

/// 已访问步骤的最新 payload，按步骤顺序排列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WizardDraft {
    payloads: BTreeMap<StepId, StepPayload>,
}

impl WizardDraft {
    pub fn get(&self, step: StepId) -> Option<&StepPayload> {
        self.payloads.get(&step)
    }

    pub fn contains(&self, step: StepId) -> bool {
        self.payloads.contains_key(&step)
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StepId, &StepPayload)> {
        self.payloads.iter()
    }

    pub fn basic_info(&self) -> Option<&BasicInfo> {
        match self.payloads.get(&StepId::BasicInfo) {
            Some(StepPayload::BasicInfo(info)) => Some(info),
            _ => None,
        }
    }

    pub fn objectives(&self) -> Option<&LearningObjectives> {
        match self.payloads.get(&StepId::Objectives) {
            Some(StepPayload::Objectives(objectives)) => Some(objectives),
            _ => None,
        }
    }

    pub fn specialized(&self) -> Option<&SpecializedContent> {
        match self.payloads.get(&StepId::SpecializedContent) {
            Some(StepPayload::SpecializedContent(content)) => Some(content),
            _ => None,
        }
    }

    fn insert(&mut self, payload: StepPayload) {
        self.payloads.insert(payload.step_id(), payload);
    }
}

/// 对某一步字段的修改
#[derive(Debug, Clone, PartialEq)]
pub enum StepEdit {
    BasicInfo(BasicInfoField),
    Objectives(ObjectivesField),
    Specialized(SpecializedField),
}

impl StepEdit {
    pub fn step_id(&self) -> StepId {
        match self {
            StepEdit::BasicInfo(_) => StepId::BasicInfo,
            StepEdit::Objectives(_) => StepId::Objectives,
            StepEdit::Specialized(_) => StepId::SpecializedContent,
        }
    }
}

/// `go_next` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum NextOutcome {
    /// 前进到第 n 步
    Advanced(usize),
    /// 已在最后一步且校验通过，向导进入 Submitting
    ReadyToSubmit(CourseData),
}

/// 课程创建向导控制器
pub struct WizardController {
    steps: Vec<StepId>,
    state: WizardState,
    course_type: CourseType,
    basic_info: BasicInfoStep,
    objectives: ObjectivesStep,
    specialized: SpecializedContentStep,
    draft: WizardDraft,
    errors: Vec<FieldError>,
}

impl WizardController {
    /// 使用默认步骤顺序
    pub fn new(course_type: CourseType) -> Self {
        Self::with_steps(course_type, DEFAULT_STEPS)
    }

    /// 自定义步骤顺序，重复步骤只保留第一次；列表为空时退回默认顺序
    pub fn with_steps(course_type: CourseType, steps: impl IntoIterator<Item = StepId>) -> Self {
        let mut order: Vec<StepId> = Vec::new();
        for step in steps {
            if !order.contains(&step) {
                order.push(step);
            }
        }
        if order.is_empty() {
            warn!("⚠️ 向导步骤列表为空，使用默认顺序");
            order = DEFAULT_STEPS.to_vec();
        }

        debug!("创建向导: {} 共 {} 步", course_type, order.len());

        Self {
            steps: order,
            state: WizardState::Step(0),
            course_type,
            basic_info: BasicInfoStep::new(),
            objectives: ObjectivesStep::new(course_type),
            specialized: SpecializedContentStep::new(course_type),
            draft: WizardDraft::default(),
            errors: Vec::new(),
        }
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn course_type(&self) -> CourseType {
        self.course_type
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    /// 最近一次校验失败的字段错误
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// 生成请求进行中，界面据此禁用按钮
    pub fn is_generating(&self) -> bool {
        self.state == WizardState::Submitting
    }

    pub fn active_index(&self) -> Option<usize> {
        match self.state {
            WizardState::Step(i) => Some(i),
            _ => None,
        }
    }

    pub fn active_step(&self) -> Option<StepId> {
        self.active_index().and_then(|i| self.steps.get(i).copied())
    }

    pub fn is_last_step(&self) -> bool {
        self.active_index() == Some(self.steps.len() - 1)
    }

    pub fn objectives_step(&self) -> &ObjectivesStep {
        &self.objectives
    }

    pub fn specialized_step(&self) -> &SpecializedContentStep {
        &self.specialized
    }

    /// 修改某一步的字段，随后把该步的 payload 写回草稿
    pub fn update_field(&mut self, edit: StepEdit) -> Result<(), BusinessError> {
        self.ensure_editable()?;
        let step = edit.step_id();
        if !self.steps.contains(&step) {
            return Err(BusinessError::StepNotInWizard {
                step: step.to_string(),
            });
        }

        match edit {
            StepEdit::BasicInfo(field) => self.basic_info.update(field),
            StepEdit::Objectives(field) => self.objectives.update(field),
            StepEdit::Specialized(field) => self.specialized.update(field),
        }

        let payload = self.payload_of(step);
        self.merge(payload);
        Ok(())
    }

    /// 用外部 payload 覆盖某一步（例如恢复草稿），总是成功
    ///
    /// payload 会先载入对应步骤，再以该步骤规整后的形式写入草稿，
    /// 所以空目标会被丢弃，与课程类型不符的专项内容会被重置
    pub fn update_step(&mut self, payload: StepPayload) {
        match &payload {
            StepPayload::BasicInfo(info) => self.basic_info.load(info),
            StepPayload::Objectives(objectives) => {
                self.objectives.load(objectives);
                self.objectives.apply_course_type(self.course_type);
            }
            StepPayload::SpecializedContent(content) => self.specialized.load(content),
        }
        let normalized = self.payload_of(payload.step_id());
        self.merge(normalized);
    }

    /// 切换课程类型，依赖课程类型的步骤重新计算
    pub fn set_course_type(&mut self, course_type: CourseType) -> Result<(), BusinessError> {
        self.ensure_editable()?;
        if course_type == self.course_type {
            return Ok(());
        }

        info!("🔄 课程类型: {} → {}", self.course_type, course_type);
        self.course_type = course_type;
        self.objectives.apply_course_type(course_type);
        self.specialized.apply_course_type(course_type);

        // 已访问过的步骤同步新形状，未访问的等到访问时再写入
        for step in [StepId::Objectives, StepId::SpecializedContent] {
            if self.draft.contains(step) {
                let payload = self.payload_of(step);
                self.merge(payload);
            }
        }
        Ok(())
    }

    /// 校验当前步骤，通过则前进；在最后一步时转为提交
    pub fn go_next(&mut self) -> AppResult<NextOutcome> {
        let index = self.current_index()?;
        let step = self.steps[index];

        let errors = self.validate_step(step);
        if !errors.is_empty() {
            debug!("步骤 {} 校验未通过: {} 个错误", step, errors.len());
            self.errors = errors.clone();
            return Err(ValidationError::StepIncomplete {
                step: step.as_str(),
                errors,
            }
            .into());
        }

        self.errors.clear();
        let payload = self.payload_of(step);
        self.merge(payload);

        if index + 1 < self.steps.len() {
            self.state = WizardState::Step(index + 1);
            Ok(NextOutcome::Advanced(index + 1))
        } else {
            self.submit().map(NextOutcome::ReadyToSubmit)
        }
    }

    /// 回到上一步，第一步时不动
    pub fn go_back(&mut self) -> Option<usize> {
        match self.state {
            WizardState::Step(i) if i > 0 => {
                self.state = WizardState::Step(i - 1);
                Some(i - 1)
            }
            WizardState::Step(i) => Some(i),
            _ => None,
        }
    }

    /// 汇总草稿并做跨步骤校验，通过后进入 Submitting
    pub fn submit(&mut self) -> AppResult<CourseData> {
        let index = self.current_index()?;
        let current = self.steps[index];
        let payload = self.payload_of(current);
        self.merge(payload);

        let mut errors = Vec::new();
        for step in &self.steps {
            if *step != StepId::Objectives {
                errors.extend(self.validate_step(*step));
            }
        }
        match self.draft.objectives() {
            Some(objectives) => {
                if objectives.objectives.is_empty() {
                    errors.push(FieldError::new("objectives", "至少需要一个学习目标"));
                }
                if objectives.duration.is_empty() {
                    errors.push(FieldError::new("duration", "请选择课程时长"));
                } else if !self
                    .course_type
                    .duration_options()
                    .contains(&objectives.duration.as_str())
                {
                    errors.push(FieldError::new(
                        "duration",
                        format!("时长 {} 不适用于当前课程类型", objectives.duration),
                    ));
                }
            }
            None => {
                errors.push(FieldError::new("objectives", "至少需要一个学习目标"));
                errors.push(FieldError::new("duration", "请选择课程时长"));
            }
        }

        if !errors.is_empty() {
            warn!("⚠️ 提交校验失败: {} 个错误", errors.len());
            self.errors = errors.clone();
            return Err(ValidationError::SubmitRejected { errors }.into());
        }

        let course = self.assembled_course();
        self.errors.clear();
        self.state = WizardState::Submitting;
        info!("📤 提交课程: {}", self.course_type.title());
        Ok(course)
    }

    /// 生成请求结束后调用：成功进入 Submitted，失败回到最后一步并保留草稿
    pub fn complete_submission(&mut self, succeeded: bool) -> Result<(), BusinessError> {
        if self.state != WizardState::Submitting {
            return Err(BusinessError::InvalidTransition {
                from: self.state.to_string(),
            });
        }
        self.state = if succeeded {
            WizardState::Submitted
        } else {
            WizardState::Step(self.steps.len() - 1)
        };
        Ok(())
    }

    /// 提交并调用课程生成接口
    pub async fn submit_to(&mut self, store: &dyn ContentStore) -> AppResult<GenerationResponse> {
        let course = match self.state {
            WizardState::Submitting => self.assembled_course(),
            _ => self.submit()?,
        };

        match store.generate_course(&course).await {
            Ok(response) => {
                self.complete_submission(true)?;
                info!("✅ 课程生成成功");
                Ok(response)
            }
            Err(e) => {
                self.complete_submission(false)?;
                warn!("❌ 课程生成失败，草稿已保留: {}", e);
                Err(e)
            }
        }
    }

    /// 丢弃草稿，回到第一步
    pub fn reset(&mut self) {
        debug!("重置向导");
        self.state = WizardState::Step(0);
        self.basic_info = BasicInfoStep::new();
        self.objectives = ObjectivesStep::new(self.course_type);
        self.specialized = SpecializedContentStep::new(self.course_type);
        self.draft = WizardDraft::default();
        self.errors.clear();
    }

    /// 取消向导，草稿随之丢弃
    pub fn cancel(self) {
        info!("🚫 已取消课程创建 ({})", self.state);
    }

    // ========== 内部 ==========

    fn ensure_editable(&self) -> Result<(), BusinessError> {
        match self.state {
            WizardState::Step(_) => Ok(()),
            other => Err(BusinessError::WizardLocked {
                state: other.to_string(),
            }),
        }
    }

    fn current_index(&self) -> Result<usize, AppError> {
        self.active_index().ok_or_else(|| {
            BusinessError::WizardLocked {
                state: self.state.to_string(),
            }
            .into()
        })
    }

    fn payload_of(&self, step: StepId) -> StepPayload {
        match step {
            StepId::BasicInfo => self.basic_info.payload(),
            StepId::Objectives => self.objectives.payload(),
            StepId::SpecializedContent => self.specialized.payload(),
        }
    }

    fn validate_step(&self, step: StepId) -> Vec<FieldError> {
        match step {
            StepId::BasicInfo => self.basic_info.validate(),
            StepId::Objectives => self.objectives.validate(),
            StepId::SpecializedContent => self.specialized.validate(),
        }
    }

    fn merge(&mut self, payload: StepPayload) {
        self.draft.insert(payload);
    }

    fn assembled_course(&self) -> CourseData {
        CourseData {
            course_type: self.course_type,
            basic_info: self.draft.basic_info().cloned(),
            learning_objectives: self.draft.objectives().cloned().unwrap_or_default(),
            specialized_content: self.draft.specialized().cloned(),
        }
    }
}
