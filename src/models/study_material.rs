use serde::{Deserialize, Serialize};

/// 学习资料（`GET /api/study-materials`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

impl StudyMaterial {
    pub fn is_pdf(&self) -> bool {
        self.file_name
            .as_deref()
            .map(|name| name.to_lowercase().ends_with(".pdf"))
            .unwrap_or(false)
    }
}

/// 资料集合（`GET /api/collection-study-materials`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i64,
    /// 旧接口返回 `title`，新接口返回 `name`
    #[serde(alias = "title")]
    pub name: String,
}
