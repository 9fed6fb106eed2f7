//! 向导中的单个步骤
//!
//! 每个步骤只持有自己的字段，负责校验并导出规整后的 payload；
//! 步骤之间互不读取，唯一的耦合是把 payload 交给 `WizardController`

use serde::Serialize;
use tracing::debug;

use crate::error::FieldError;
use crate::models::{
    derive_defaults, qaqf, BasicInfo, CourseType, DifficultyLevel, LearningObjective,
    LearningObjectives, SpecializedContent,
};

/// 步骤标识，声明顺序即默认的向导顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    BasicInfo,
    Objectives,
    SpecializedContent,
}

impl StepId {
    pub fn as_str(self) -> &'static str {
        match self {
            StepId::BasicInfo => "basic_info",
            StepId::Objectives => "objectives",
            StepId::SpecializedContent => "specialized_content",
        }
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 某一步导出的 payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepPayload {
    BasicInfo(BasicInfo),
    Objectives(LearningObjectives),
    SpecializedContent(SpecializedContent),
}

impl StepPayload {
    pub fn step_id(&self) -> StepId {
        match self {
            StepPayload::BasicInfo(_) => StepId::BasicInfo,
            StepPayload::Objectives(_) => StepId::Objectives,
            StepPayload::SpecializedContent(_) => StepId::SpecializedContent,
        }
    }
}

/// 表单步骤
pub trait FormStep {
    /// 该步骤可修改的字段
    type Field;

    fn id(&self) -> StepId;

    /// 修改一个字段，除类型外不做约束
    fn update(&mut self, field: Self::Field);

    /// 字段级校验错误，空表示通过
    fn validate(&self) -> Vec<FieldError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// 只包含非空、规整后字段的 payload
    fn payload(&self) -> StepPayload;
}

// ========== 基本信息 ==========

#[derive(Debug, Clone, PartialEq)]
pub enum BasicInfoField {
    Title(String),
    Description(String),
    TargetAudience(String),
    QaqfLevel(Option<u8>),
    Difficulty(Option<DifficultyLevel>),
}

#[derive(Debug, Clone, Default)]
pub struct BasicInfoStep {
    info: BasicInfo,
}

impl BasicInfoStep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, info: &BasicInfo) {
        self.info = info.clone();
    }
}

impl FormStep for BasicInfoStep {
    type Field = BasicInfoField;

    fn id(&self) -> StepId {
        StepId::BasicInfo
    }

    fn update(&mut self, field: BasicInfoField) {
        match field {
            BasicInfoField::Title(v) => self.info.title = v,
            BasicInfoField::Description(v) => self.info.description = v,
            BasicInfoField::TargetAudience(v) => self.info.target_audience = v,
            BasicInfoField::QaqfLevel(v) => self.info.qaqf_level = v,
            BasicInfoField::Difficulty(v) => self.info.difficulty_level = v,
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.info.title.trim().is_empty() {
            errors.push(FieldError::new("title", "请填写课程标题"));
        }
        if self.info.description.trim().is_empty() {
            errors.push(FieldError::new("description", "请填写课程简介"));
        }
        if self.info.target_audience.trim().is_empty() {
            errors.push(FieldError::new("target_audience", "请填写目标受众"));
        }
        match self.info.qaqf_level {
            None => errors.push(FieldError::new("qaqf_level", "请选择 QAQF 等级")),
            Some(level) if !qaqf::is_valid_level(level) => errors.push(FieldError::new(
                "qaqf_level",
                format!("QAQF 等级必须在 {}-{} 之间", qaqf::MIN_LEVEL, qaqf::MAX_LEVEL),
            )),
            Some(_) => {}
        }
        errors
    }

    fn payload(&self) -> StepPayload {
        StepPayload::BasicInfo(BasicInfo {
            title: self.info.title.trim().to_string(),
            description: self.info.description.trim().to_string(),
            target_audience: self.info.target_audience.trim().to_string(),
            qaqf_level: self.info.qaqf_level,
            difficulty_level: self.info.difficulty_level,
        })
    }
}

// ========== 学习目标 ==========

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectivesField {
    /// 追加一个空目标
    AddObjective,
    /// 删除目标，只剩一个时忽略
    RemoveObjective(String),
    ObjectiveText { id: String, text: String },
    Duration(String),
    SelectPdf { id: i64, title: String },
    ClearPdf,
    Collection(Option<i64>),
}

#[derive(Debug, Clone)]
pub struct ObjectivesStep {
    objectives: Vec<LearningObjective>,
    next_id: u32,
    duration: String,
    duration_options: &'static [&'static str],
    selected_pdf: Option<(i64, String)>,
    selected_collection_id: Option<i64>,
}

impl ObjectivesStep {
    pub fn new(course_type: CourseType) -> Self {
        Self {
            objectives: vec![LearningObjective::new("1", "")],
            next_id: 2,
            duration: String::new(),
            duration_options: course_type.duration_options(),
            selected_pdf: None,
            selected_collection_id: None,
        }
    }

    /// 所有目标槽位（含空目标）
    pub fn objectives(&self) -> &[LearningObjective] {
        &self.objectives
    }

    pub fn duration_options(&self) -> &'static [&'static str] {
        self.duration_options
    }

    /// 课程类型变化后重新计算可选时长，已选时长不再适用时清空
    pub fn apply_course_type(&mut self, course_type: CourseType) {
        self.duration_options = course_type.duration_options();
        if !self.duration.is_empty() && !self.duration_options.contains(&self.duration.as_str()) {
            debug!("时长 {} 不适用于 {}，已清空", self.duration, course_type);
            self.duration.clear();
        }
    }

    /// 从外部 payload 恢复，重复的 ID 会重新分配
    pub fn load(&mut self, payload: &LearningObjectives) {
        self.objectives.clear();
        self.next_id = 1;
        for objective in &payload.objectives {
            let numeric = objective.id.parse::<u32>().ok();
            if let Some(n) = numeric {
                self.next_id = self.next_id.max(n.saturating_add(1));
            }
        }
        for objective in &payload.objectives {
            let id = if self.objectives.iter().any(|o| o.id == objective.id) {
                self.fresh_id()
            } else {
                objective.id.clone()
            };
            self.objectives.push(LearningObjective::new(id, objective.text.clone()));
        }
        if self.objectives.is_empty() {
            let id = self.fresh_id();
            self.objectives.push(LearningObjective::new(id, ""));
        }

        self.duration = payload.duration.clone();
        self.selected_pdf = match (payload.selected_pdf_ids.first(), &payload.selected_pdf_title) {
            (Some(id), Some(title)) => Some((*id, title.clone())),
            (Some(id), None) => Some((*id, String::new())),
            _ => None,
        };
        self.selected_collection_id = payload.selected_collection_id;
    }

    /// 取下一个未被占用的编号，到达上限后从 1 重新找空位
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.next_id.to_string();
            self.next_id = self.next_id.wrapping_add(1).max(1);
            if !self.objectives.iter().any(|o| o.id == id) {
                return id;
            }
        }
    }
}

impl FormStep for ObjectivesStep {
    type Field = ObjectivesField;

    fn id(&self) -> StepId {
        StepId::Objectives
    }

    fn update(&mut self, field: ObjectivesField) {
        match field {
            ObjectivesField::AddObjective => {
                let id = self.fresh_id();
                self.objectives.push(LearningObjective::new(id, ""));
            }
            ObjectivesField::RemoveObjective(id) => {
                if self.objectives.len() > 1 {
                    self.objectives.retain(|o| o.id != id);
                }
            }
            ObjectivesField::ObjectiveText { id, text } => {
                if let Some(objective) = self.objectives.iter_mut().find(|o| o.id == id) {
                    objective.text = text;
                }
            }
            ObjectivesField::Duration(duration) => self.duration = duration,
            ObjectivesField::SelectPdf { id, title } => self.selected_pdf = Some((id, title)),
            ObjectivesField::ClearPdf => self.selected_pdf = None,
            ObjectivesField::Collection(id) => self.selected_collection_id = id,
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.objectives.iter().all(LearningObjective::is_blank) {
            errors.push(FieldError::new("objectives", "至少需要一个学习目标"));
        }
        if self.duration.trim().is_empty() {
            errors.push(FieldError::new("duration", "请选择课程时长"));
        } else if !self.duration_options.contains(&self.duration.trim()) {
            errors.push(FieldError::new(
                "duration",
                format!("时长 {} 不适用于当前课程类型", self.duration),
            ));
        }
        errors
    }

    fn payload(&self) -> StepPayload {
        let objectives = self
            .objectives
            .iter()
            .filter(|o| !o.is_blank())
            .map(|o| LearningObjective::new(o.id.clone(), o.text.trim()))
            .collect();

        StepPayload::Objectives(LearningObjectives {
            objectives,
            duration: self.duration.trim().to_string(),
            selected_pdf_ids: self.selected_pdf.iter().map(|(id, _)| *id).collect(),
            selected_pdf_title: self
                .selected_pdf
                .as_ref()
                .map(|(_, title)| title.clone())
                .filter(|t| !t.is_empty()),
            selected_collection_id: self.selected_collection_id,
        })
    }
}

// ========== 专项内容 ==========

/// 按字段名修改专项内容
#[derive(Debug, Clone, PartialEq)]
pub struct SpecializedField {
    pub field: String,
    pub value: String,
}

impl SpecializedField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpecializedContentStep {
    course_type: CourseType,
    content: SpecializedContent,
}

impl SpecializedContentStep {
    pub fn new(course_type: CourseType) -> Self {
        Self {
            course_type,
            content: derive_defaults(course_type),
        }
    }

    pub fn content(&self) -> &SpecializedContent {
        &self.content
    }

    /// 课程类型变化时重置为新类型的默认形状
    pub fn apply_course_type(&mut self, course_type: CourseType) {
        if self.course_type != course_type || self.content.course_type() != course_type {
            debug!(
                "课程类型 {} → {}，专项内容重置为默认形状",
                self.course_type, course_type
            );
            self.course_type = course_type;
            self.content = derive_defaults(course_type);
        }
    }

    /// 从外部 payload 恢复；形状与当前课程类型不符时按默认形状处理
    pub fn load(&mut self, content: &SpecializedContent) {
        if content.course_type() == self.course_type {
            self.content = content.clone();
        } else {
            debug!(
                "专项内容形状 {} 与课程类型 {} 不符，已重置",
                content.course_type(),
                self.course_type
            );
            self.content = derive_defaults(self.course_type);
        }
    }
}

impl FormStep for SpecializedContentStep {
    type Field = SpecializedField;

    fn id(&self) -> StepId {
        StepId::SpecializedContent
    }

    fn update(&mut self, field: SpecializedField) {
        if !self.content.set(&field.field, field.value) {
            debug!("字段 {} 不属于 {} 专项内容，已忽略", field.field, self.course_type);
        }
    }

    fn validate(&self) -> Vec<FieldError> {
        if self.content.course_type() == self.course_type {
            Vec::new()
        } else {
            vec![FieldError::new("specialized_content", "专项内容与课程类型不匹配")]
        }
    }

    fn payload(&self) -> StepPayload {
        StepPayload::SpecializedContent(self.content.normalized())
    }
}
