use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 教案中的一个环节
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonPlanSection {
    pub id: String,
    pub title: String,
    pub content: String,
    /// 分钟
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    pub editable: bool,
}

/// 教案，导出时原样序列化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub subject: String,
    pub qaqf_level: u8,
    pub duration: u32,
    pub objectives: Vec<String>,
    pub sections: Vec<LessonPlanSection>,
    pub resources: Vec<String>,
    pub assessment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
}

impl LessonPlan {
    /// 各环节时长之和（分钟）
    pub fn total_duration(&self) -> u32 {
        self.sections.iter().filter_map(|s| s.duration).sum()
    }
}
