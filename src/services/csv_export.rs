//! CSV 导出 - 业务能力层
//!
//! 把选中的内容元数据整理成一个 CSV，列顺序固定

use chrono::SecondsFormat;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{AppError, AppResult};
use crate::models::ContentRecord;

/// 表头
pub const CSV_HEADER: &str = "ID,Title,Type,QAQF Level,Verification Status,Created At";

/// 生成 CSV 文本
///
/// 表头不加引号；数据行中非数字字段加引号（标题中的逗号、引号由 csv 转义）。
/// 记录按传入顺序输出。
pub fn build_csv(records: &[&ContentRecord]) -> AppResult<String> {
    let mut buffer = Vec::with_capacity(64 * (records.len() + 1));
    buffer.extend_from_slice(CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buffer);

    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.title.clone(),
            record.content_type.to_string(),
            record.qaqf_level.to_string(),
            record.verification_status.to_string(),
            record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Other(format!("CSV 缓冲区写入失败: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Other(format!("CSV 不是合法的 UTF-8: {}", e)))
}
