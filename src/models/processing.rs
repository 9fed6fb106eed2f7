use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::BusinessError;

/// 处理中心条目的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Content,
    Course,
}

/// 处理中心条目的审阅状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Draft,
    Reviewed,
    Approved,
}

impl ItemStatus {
    /// 界面上提供的下一步状态，approved 之后没有
    pub fn next(self) -> Option<ItemStatus> {
        match self {
            ItemStatus::Draft => Some(ItemStatus::Reviewed),
            ItemStatus::Reviewed => Some(ItemStatus::Approved),
            ItemStatus::Approved => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Draft => "draft",
            ItemStatus::Reviewed => "reviewed",
            ItemStatus::Approved => "approved",
        }
    }
}

/// 生成结果（处理中心条目）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    pub description: String,
    pub qaqf_level: u8,
    /// 0-100，超出范围的值在构造时被截断
    pub compliance_score: u8,
    pub content: JsonValue,
    pub created_at: DateTime<Utc>,
    pub status: ItemStatus,
}

impl GeneratedItem {
    pub fn new(
        id: impl Into<String>,
        kind: ItemKind,
        title: impl Into<String>,
        qaqf_level: u8,
        compliance_score: u8,
        content: JsonValue,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            description: String::new(),
            qaqf_level,
            compliance_score: compliance_score.min(100),
            content,
            created_at: Utc::now(),
            status: ItemStatus::Draft,
        }
    }

    /// 沿 draft → reviewed → approved 推进一步
    pub fn advance(&mut self) -> Result<ItemStatus, BusinessError> {
        let next = self.status.next().ok_or_else(|| BusinessError::InvalidTransition {
            from: self.status.as_str().to_string(),
        })?;
        self.status = next;
        Ok(next)
    }

    /// 直接编辑状态，不做流转检查
    pub fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn advance_is_monotonic_and_stops_at_approved() {
        let mut item = GeneratedItem::new("g-1", ItemKind::Course, "Intro", 3, 140, json!({}));
        assert_eq!(item.compliance_score, 100);
        assert_eq!(item.advance().unwrap(), ItemStatus::Reviewed);
        assert_eq!(item.advance().unwrap(), ItemStatus::Approved);
        assert!(item.advance().is_err());
        assert_eq!(item.status, ItemStatus::Approved);
    }

    #[test]
    fn direct_edit_can_move_backwards() {
        let mut item = GeneratedItem::new("g-2", ItemKind::Content, "Essay", 5, 80, json!("x"));
        item.set_status(ItemStatus::Approved);
        item.set_status(ItemStatus::Draft);
        assert_eq!(item.status, ItemStatus::Draft);
    }
}
