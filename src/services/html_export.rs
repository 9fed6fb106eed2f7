//! HTML 导出 - 业务能力层
//!
//! 把一条内容渲染成独立的 HTML 文档，PDF 渲染也以此为输入

use regex::Regex;
use serde_json::Value as JsonValue;

use crate::models::{qaqf, ContentRecord};

const STYLE: &str = r#"
      body { font-family: Arial, sans-serif; line-height: 1.6; max-width: 800px; margin: 0 auto; padding: 20px; color: #333; }
      h1, h2, h3 { color: #2563eb; }
      h1 { border-bottom: 2px solid #e5e7eb; padding-bottom: 10px; }
      .metadata { background-color: #f9fafb; padding: 15px; border-radius: 5px; margin-bottom: 20px; }
      .content { padding: 15px; border: 1px solid #e5e7eb; border-radius: 5px; }
      .characteristics { display: flex; flex-wrap: wrap; gap: 8px; margin-top: 10px; }
      .characteristic { background-color: #eff6ff; color: #2563eb; padding: 4px 8px; border-radius: 4px; font-size: 0.875rem; }
      .footer { margin-top: 40px; font-size: 0.875rem; color: #6b7280; text-align: center; }
"#;

/// 生成完整的 HTML 文档
pub fn render_html(record: &ContentRecord) -> String {
    let title = escape_html(&record.title);
    let level = match qaqf::level_name(record.qaqf_level) {
        Some(name) => format!("{} ({})", record.qaqf_level, name),
        None => record.qaqf_level.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <h1>{title}</h1>
    <div class="metadata">
      <p><strong>Module Code:</strong> {module_code}</p>
      <p><strong>QAQF Level:</strong> {level}</p>
      <p><strong>Type:</strong> {content_type}</p>
      <p><strong>Created:</strong> {created}</p>
      <p><strong>QAQF Characteristics:</strong></p>
      <div class="characteristics">{characteristics}</div>
    </div>
    <div class="content">
      <p>{body}</p>
    </div>
    <div class="footer">
      <p>Generated from QAQF Academic Content Platform</p>
      <p>Document ID: {id} | Verification Status: {status}</p>
    </div>
</body>
</html>
"#,
        title = title,
        style = STYLE,
        module_code = record
            .module_code
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "N/A".to_string()),
        level = level,
        content_type = record.content_type.label(),
        created = record.created_at.format("%Y-%m-%d"),
        characteristics = render_characteristics(&record.characteristics),
        body = render_body(&record.content),
        id = record.id,
        status = record.verification_status,
    )
}

/// 正文：字符串按简化 markdown 转换，其他 JSON 原样美化输出
fn render_body(content: &JsonValue) -> String {
    match content {
        JsonValue::String(text) => markdown_to_html(text),
        JsonValue::Null => String::new(),
        other => format!(
            "<pre>{}</pre>",
            escape_html(&serde_json::to_string_pretty(other).unwrap_or_default())
        ),
    }
}

fn render_characteristics(characteristics: &JsonValue) -> String {
    let labels: Vec<String> = match characteristics {
        JsonValue::Array(ids) => ids
            .iter()
            .map(|id| match id.as_u64().and_then(|n| u8::try_from(n).ok()) {
                Some(n) => qaqf::characteristic_name(n)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Characteristic {}", n)),
                None => format!("Characteristic {}", id),
            })
            .collect(),
        JsonValue::Object(map) => map.keys().cloned().collect(),
        _ => Vec::new(),
    };

    if labels.is_empty() {
        return "None".to_string();
    }

    labels
        .iter()
        .map(|l| format!(r#"<span class="characteristic">{}</span>"#, escape_html(l)))
        .collect()
}

/// 简化的 markdown 转换：标题、粗体、斜体、段落与换行
pub fn markdown_to_html(text: &str) -> String {
    let mut html = escape_html(text);
    html = replace_all(&html, r"(?m)^### (.*)$", "<h3>$1</h3>");
    html = replace_all(&html, r"(?m)^## (.*)$", "<h2>$1</h2>");
    html = replace_all(&html, r"(?m)^# (.*)$", "<h1>$1</h1>");
    html = replace_all(&html, r"\*\*(.+?)\*\*", "<strong>$1</strong>");
    html = replace_all(&html, r"\*(.+?)\*", "<em>$1</em>");
    html = html.replace("\n\n", "</p><p>");
    html.replace('\n', "<br>")
}

fn replace_all(text: &str, pattern: &str, replacement: &str) -> String {
    match Regex::new(pattern) {
        Ok(re) => re.replace_all(text, replacement).into_owned(),
        Err(_) => text.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, VerificationStatus};
    use chrono::TimeZone;
    use serde_json::json;

    fn record(content: JsonValue, characteristics: JsonValue) -> ContentRecord {
        ContentRecord {
            id: 42,
            title: "Ethics <Intro>".into(),
            description: String::new(),
            content_type: ContentType::AcademicPaper,
            qaqf_level: 3,
            module_code: None,
            verification_status: VerificationStatus::Verified,
            content,
            characteristics,
            created_at: chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn markdown_headings_and_emphasis() {
        let html = markdown_to_html("# Title\n## Sub\nSome **bold** and *soft* text");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2>Sub</h2>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>soft</em>"));
    }

    #[test]
    fn document_has_metadata_and_footer() {
        let html = render_html(&record(json!("Body"), json!([1, 6])));
        assert!(html.contains("<title>Ethics &lt;Intro&gt;</title>"));
        assert!(html.contains("3 (Crucial)"));
        assert!(html.contains("academic paper"));
        assert!(html.contains("Knowledge and understanding"));
        assert!(html.contains("Document ID: 42 | Verification Status: verified"));
        assert!(html.contains("Module Code:</strong> N/A"));
    }

    #[test]
    fn structured_body_is_pretty_printed() {
        let html = render_html(&record(json!({"modules": 2}), json!({"Communication": true})));
        assert!(html.contains("<pre>"));
        assert!(html.contains("&quot;modules&quot;"));
        assert!(html.contains(r#"<span class="characteristic">Communication</span>"#));
    }
}
