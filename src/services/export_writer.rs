//! 导出文件写入服务 - 业务能力层
//!
//! 只负责"把导出结果写到磁盘"，不关心流程

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::{ContentRecord, LessonPlan};

/// 导出文件写入服务
///
/// 职责：
/// - 根据标题生成安全的文件名
/// - 把 PDF / CSV / JSON 写到导出目录
pub struct ExportWriter {
    export_dir: PathBuf,
}

impl ExportWriter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// 写入单条内容的 PDF
    pub async fn write_pdf(&self, record: &ContentRecord, bytes: &[u8]) -> AppResult<PathBuf> {
        let file_name = format!("{}_{}.pdf", file_stem(&record.title), record.id);
        self.write(&file_name, bytes).await
    }

    /// 写入批量 CSV
    pub async fn write_csv(&self, csv: &str) -> AppResult<PathBuf> {
        let file_name = format!(
            "content_export_{}.csv",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        self.write(&file_name, csv.as_bytes()).await
    }

    /// 导出教案 JSON（带缩进）
    pub async fn write_lesson_plan(&self, plan: &LessonPlan) -> AppResult<PathBuf> {
        let json = serde_json::to_string_pretty(plan)?;
        let file_name = lesson_plan_file_name(&plan.title);
        self.write(&file_name, json.as_bytes()).await
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.export_dir).await.map_err(|e| {
            AppError::file_write_failed(self.export_dir.display().to_string(), e)
        })?;

        let path = self.export_dir.join(file_name);
        debug!("写入导出文件: {} ({} 字节)", path.display(), bytes.len());

        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("💾 已导出: {}", path.display());
        Ok(path)
    }
}

/// `<标题>_lesson_plan.json`
pub fn lesson_plan_file_name(title: &str) -> String {
    format!("{}_lesson_plan.json", file_stem(title))
}

/// 空白替换为下划线，去掉文件系统不安全的字符
pub fn file_stem(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join("_");

    let stem: String = collapsed
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect();

    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LessonPlanSection;

    #[test]
    fn file_stem_is_safe() {
        assert_eq!(file_stem("Intro to  QAQF"), "Intro_to_QAQF");
        assert_eq!(file_stem("a/b:c?"), "abc");
        assert_eq!(file_stem("   "), "untitled");
        assert_eq!(file_stem(" Week\t1\n\nPlan "), "Week_1_Plan");
        assert_eq!(lesson_plan_file_name("Week 1 Plan"), "Week_1_Plan_lesson_plan.json");
    }

    #[tokio::test]
    async fn lesson_plan_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().join("nested"));
        let plan = LessonPlan {
            id: None,
            title: "Week 1".into(),
            subject: "Ethics".into(),
            qaqf_level: 2,
            duration: 60,
            objectives: vec!["Define ethics".into()],
            sections: vec![LessonPlanSection {
                id: "s1".into(),
                title: "Warm-up".into(),
                content: "Discussion".into(),
                duration: Some(10),
                editable: true,
            }],
            resources: vec![],
            assessment: "Quiz".into(),
            metadata: None,
        };

        let path = writer.write_lesson_plan(&plan).await.unwrap();
        assert!(path.ends_with("Week_1_lesson_plan.json"));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"title\": \"Week 1\""));
        let back: LessonPlan = serde_json::from_str(&text).unwrap();
        assert_eq!(back.total_duration(), 10);
    }
}
