//! Operator-facing text for decode results
//!
//! The outcome tag is the contract; the strings here are what the field tools
//! show next to it.

use crate::decoder::DecodeOutcome;
use crate::field::ResultField;

/// Column headings, in `ResultField` order
pub const COLUMN_TITLES: [&str; 4] = ["原始数据", "解析值", "含义", "详细说明"];

/// Message shown to operators for an outcome
pub fn outcome_message(outcome: &DecodeOutcome) -> &'static str {
    match outcome {
        DecodeOutcome::ParseComplete(_) => "解析完成",
        DecodeOutcome::EmptyInput => "输入为空",
        DecodeOutcome::ByteIncomplete => "字节不完整: 报文长度必须为偶数个十六进制字符",
        DecodeOutcome::FormatIncomplete => "格式错误: 请检查起始符、结束符、长度及功能码",
        DecodeOutcome::ChecksumFailed => "校验和错误",
    }
}

/// Render fields as tab-separated text with a heading row
///
/// Line breaks inside the details column are flattened to `; ` so that each
/// field stays on one line.
pub fn format_fields(fields: &[ResultField]) -> String {
    let mut out = COLUMN_TITLES.join("\t");
    for field in fields {
        out.push('\n');
        out.push_str(&format!(
            "{}\t{}\t{}\t{}",
            field.origin,
            field.analyzed,
            field.meaning,
            field.meaning_details.replace('\n', "; ")
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_messages_are_distinct() {
        let outcomes = [
            DecodeOutcome::ParseComplete(Vec::new()),
            DecodeOutcome::EmptyInput,
            DecodeOutcome::ByteIncomplete,
            DecodeOutcome::FormatIncomplete,
            DecodeOutcome::ChecksumFailed,
        ];
        let mut messages: Vec<_> = outcomes.iter().map(outcome_message).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), outcomes.len());
    }

    #[test]
    fn test_format_fields() {
        let fields = [
            ResultField::hex("E9", "帧起始符", "固定为E9"),
            ResultField::hex("22", "状态", "bit7-4 工作状态: a\nbit1-0 操作员卡: b"),
        ];
        let text = format_fields(&fields);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "原始数据\t解析值\t含义\t详细说明");
        assert_eq!(lines[1], "E9\tE9\t帧起始符\t固定为E9");
        assert_eq!(lines[2], "22\t22\t状态\tbit7-4 工作状态: a; bit1-0 操作员卡: b");
    }
}
