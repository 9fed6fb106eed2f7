use serde::{Deserialize, Serialize};

/// 课程类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    /// 学术讲座
    Academic,
    /// 企业培训
    Corporate,
    /// 故事化讲座
    Storytelling,
}

impl CourseType {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseType::Academic => "academic",
            CourseType::Corporate => "corporate",
            CourseType::Storytelling => "storytelling",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            CourseType::Academic => "Academic Lecture",
            CourseType::Corporate => "Corporate Training",
            CourseType::Storytelling => "Storytelling Lecture",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "academic" => Some(CourseType::Academic),
            "corporate" => Some(CourseType::Corporate),
            "storytelling" => Some(CourseType::Storytelling),
            _ => None,
        }
    }

    /// 该课程类型可选的时长
    pub fn duration_options(self) -> &'static [&'static str] {
        match self {
            CourseType::Academic => &["4 weeks", "8 weeks", "12 weeks", "16 weeks"],
            CourseType::Corporate => &["1-5 days"],
            CourseType::Storytelling => &["1-8 sessions"],
        }
    }
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// 基本信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub title: String,
    pub description: String,
    pub target_audience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qaqf_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<DifficultyLevel>,
}

/// 学习目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningObjective {
    pub id: String,
    pub text: String,
}

impl LearningObjective {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// 学习目标步骤的产出
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningObjectives {
    /// 只包含非空目标
    pub objectives: Vec<LearningObjective>,
    /// 为空表示未选择
    pub duration: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_pdf_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_pdf_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_collection_id: Option<i64>,
}

/// 专项内容，字段形状由课程类型决定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecializedContent {
    Academic { context: String, industry: String },
    Corporate { industry: String, compliance: String },
    Storytelling { context: String, notes: String },
}

/// 指定课程类型下的专项内容默认形状（全部为空）
pub fn derive_defaults(course_type: CourseType) -> SpecializedContent {
    match course_type {
        CourseType::Academic => SpecializedContent::Academic {
            context: String::new(),
            industry: String::new(),
        },
        CourseType::Corporate => SpecializedContent::Corporate {
            industry: String::new(),
            compliance: String::new(),
        },
        CourseType::Storytelling => SpecializedContent::Storytelling {
            context: String::new(),
            notes: String::new(),
        },
    }
}

impl SpecializedContent {
    pub fn course_type(&self) -> CourseType {
        match self {
            SpecializedContent::Academic { .. } => CourseType::Academic,
            SpecializedContent::Corporate { .. } => CourseType::Corporate,
            SpecializedContent::Storytelling { .. } => CourseType::Storytelling,
        }
    }

    /// 当前形状下的字段名
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            SpecializedContent::Academic { .. } => &["context", "industry"],
            SpecializedContent::Corporate { .. } => &["industry", "compliance"],
            SpecializedContent::Storytelling { .. } => &["context", "notes"],
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match (self, field) {
            (SpecializedContent::Academic { context, .. }, "context") => context,
            (SpecializedContent::Academic { industry, .. }, "industry") => industry,
            (SpecializedContent::Corporate { industry, .. }, "industry") => industry,
            (SpecializedContent::Corporate { compliance, .. }, "compliance") => compliance,
            (SpecializedContent::Storytelling { context, .. }, "context") => context,
            (SpecializedContent::Storytelling { notes, .. }, "notes") => notes,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// 设置字段，字段不属于当前形状时返回 false
    pub fn set(&mut self, field: &str, value: impl Into<String>) -> bool {
        let slot = match (self, field) {
            (SpecializedContent::Academic { context, .. }, "context") => context,
            (SpecializedContent::Academic { industry, .. }, "industry") => industry,
            (SpecializedContent::Corporate { industry, .. }, "industry") => industry,
            (SpecializedContent::Corporate { compliance, .. }, "compliance") => compliance,
            (SpecializedContent::Storytelling { context, .. }, "context") => context,
            (SpecializedContent::Storytelling { notes, .. }, "notes") => notes,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// 去掉首尾空白后的副本
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        for field in self.field_names() {
            if let Some(v) = self.get(field) {
                out.set(field, v.trim());
            }
        }
        out
    }
}

/// 向导最终汇总出的课程数据（`POST /api/generate/course` 请求体）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseData {
    pub course_type: CourseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_info: Option<BasicInfo>,
    pub learning_objectives: LearningObjectives,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialized_content: Option<SpecializedContent>,
}
