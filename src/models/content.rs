use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 内容类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    AcademicPaper,
    Assessment,
    Video,
    Lecture,
    Course,
}

impl ContentType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::AcademicPaper => "academic_paper",
            ContentType::Assessment => "assessment",
            ContentType::Video => "video",
            ContentType::Lecture => "lecture",
            ContentType::Course => "course",
        }
    }

    /// 用于展示的名称（下划线换成空格）
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 审核状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    InReview,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
            VerificationStatus::Rejected => "rejected",
            VerificationStatus::InReview => "in_review",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 内容记录（`GET /api/content` 返回的列表项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(alias = "qaqfLevel")]
    pub qaqf_level: u8,
    #[serde(default, alias = "moduleCode", skip_serializing_if = "Option::is_none")]
    pub module_code: Option<String>,
    #[serde(alias = "verificationStatus")]
    pub verification_status: VerificationStatus,
    /// 正文，可能是 markdown 字符串，也可能是结构化 JSON
    #[serde(default)]
    pub content: JsonValue,
    /// QAQF 特征，后端既可能返回 ID 数组也可能返回对象
    #[serde(default)]
    pub characteristics: JsonValue,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// `PATCH /api/content/{id}` 的部分更新
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by_user_id: Option<i64>,
}

/// `POST /api/verify/content` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct VerifyContentRequest {
    pub content: JsonValue,
    #[serde(rename = "qaqfLevel")]
    pub qaqf_level: u8,
}

/// QAQF 校验结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    #[serde(default, alias = "overallScore")]
    pub overall_score: f64,
    #[serde(default)]
    pub feedback: String,
    /// 各特征的得分等明细，结构由服务端决定
    #[serde(flatten)]
    pub details: serde_json::Map<String, JsonValue>,
}

/// 英国标准检查结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BritishStandardsCheck {
    #[serde(default)]
    pub compliant: bool,
    #[serde(default)]
    pub issues: Vec<JsonValue>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// `POST /api/generate/content` 请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub title: String,
    pub content_type: ContentType,
    pub qaqf_level: u8,
    pub subject: String,
    pub characteristics: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_instructions: Option<String>,
}

/// `POST /api/generate/video` 请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub title: String,
    pub description: String,
    pub qaqf_level: u8,
    pub animation_style: String,
    pub duration: String,
}

/// 生成服务的返回结果，结构由服务端决定
pub type GenerationResponse = JsonValue;
