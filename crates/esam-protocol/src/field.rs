//! Decoded field records and the cursor layouts use to emit them

use crate::frame::FrameContext;
use crate::hex::{
    byte_at, parse_hex_as_date, parse_hex_as_decimal, split_length_prefixed,
    to_zero_prefix_hex_string,
};

/// One row of a decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultField {
    /// Raw bytes as zero-padded uppercase hex
    pub origin: String,
    /// Decoded value: hex, decimal or date
    pub analyzed: String,
    /// Short label
    pub meaning: String,
    /// Long description, possibly several lines
    pub meaning_details: String,
}

impl ResultField {
    /// Create a field from its four columns
    pub fn new(
        origin: impl Into<String>,
        analyzed: impl Into<String>,
        meaning: impl Into<String>,
        meaning_details: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            analyzed: analyzed.into(),
            meaning: meaning.into(),
            meaning_details: meaning_details.into(),
        }
    }

    /// Field whose analyzed value is the hex itself
    pub fn hex(origin: impl Into<String>, meaning: impl Into<String>, details: impl Into<String>) -> Self {
        let origin = origin.into();
        Self::new(origin.clone(), origin, meaning, details)
    }

    /// Field whose analyzed value is the hex read as a decimal number
    pub fn decimal(origin: impl Into<String>, meaning: impl Into<String>, details: impl Into<String>) -> Self {
        let origin = origin.into();
        let analyzed = parse_hex_as_decimal(&origin);
        Self::new(origin, analyzed, meaning, details)
    }
}

/// Signature shared by every data-domain layout
pub type LayoutFn = fn(&mut FieldWriter<'_>);

/// Cursor over the data domain that appends fields in wire order
///
/// Once the data domain is exhausted every further call is a no-op, so a
/// layout describes the full field sequence and short frames simply stop
/// early. A fixed-width field cut short is emitted with the bytes present,
/// left zero-padded to its nominal width.
pub struct FieldWriter<'a> {
    context: &'a FrameContext,
    data: &'a str,
    pos: usize,
    fields: &'a mut Vec<ResultField>,
}

impl<'a> FieldWriter<'a> {
    /// Start at the first byte of `data`, appending into `fields`
    pub fn new(context: &'a FrameContext, data: &'a str, fields: &'a mut Vec<ResultField>) -> Self {
        Self {
            context,
            data,
            pos: 0,
            fields,
        }
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        (self.data.len() - self.pos) / 2
    }

    /// Whether every byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Take up to `bytes` bytes, returning fewer if the data ends first
    fn take(&mut self, bytes: usize) -> Option<&'a str> {
        if self.is_exhausted() {
            return None;
        }
        let end = (self.pos + bytes * 2).min(self.data.len() - self.data.len() % 2);
        let data: &'a str = self.data;
        let slice = &data[self.pos..end];
        self.pos = end;
        Some(slice)
    }

    fn push(&mut self, field: ResultField) {
        self.fields.push(field);
    }

    /// Fixed-width field shown as hex
    pub fn hex(&mut self, bytes: usize, meaning: &str, details: &str) -> &mut Self {
        if let Some(raw) = self.take(bytes) {
            let origin = to_zero_prefix_hex_string(raw, bytes);
            self.push(ResultField::hex(origin, meaning, details));
        }
        self
    }

    /// Fixed-width field shown as a decimal number
    pub fn decimal(&mut self, bytes: usize, meaning: &str, details: &str) -> &mut Self {
        self.decimal_value(bytes, meaning, details);
        self
    }

    /// Fixed-width decimal field that also hands the value back
    ///
    /// Counters that size a later repeated group use this.
    pub fn decimal_value(&mut self, bytes: usize, meaning: &str, details: &str) -> Option<usize> {
        let raw = self.take(bytes)?;
        let origin = to_zero_prefix_hex_string(raw, bytes);
        let value = usize::from_str_radix(&origin, 16).ok();
        self.push(ResultField::decimal(origin, meaning, details));
        value
    }

    /// Fixed-width BCD date (6 bytes: two-digit year, 7 bytes: four-digit year)
    pub fn date(&mut self, bytes: usize, meaning: &str, details: &str) -> &mut Self {
        if let Some(raw) = self.take(bytes) {
            let origin = to_zero_prefix_hex_string(raw, bytes);
            let analyzed = parse_hex_as_date(&origin);
            self.push(ResultField::new(origin, analyzed, meaning, details));
        }
        self
    }

    /// One-byte code resolved through a meaning table
    ///
    /// The analyzed column keeps the hex; the table text leads the details.
    pub fn code(&mut self, meaning: &str, details: &str, table: fn(u8) -> &'static str) -> &mut Self {
        if let Some(raw) = self.take(1) {
            let origin = to_zero_prefix_hex_string(raw, 1);
            let value = byte_at(&origin, 0).unwrap_or(0);
            let details = format!("{}\n{}", table(value), details);
            self.push(ResultField::hex(origin, meaning, details));
        }
        self
    }

    /// One byte split into independent bit groups
    ///
    /// Each group is `(label, shift, mask, table)`. The analyzed column keeps
    /// the hex; the details column has one `bitH-L label: text` line per group.
    pub fn bit_groups(
        &mut self,
        meaning: &str,
        groups: &[(&str, u8, u8, fn(u8) -> &'static str)],
    ) -> &mut Self {
        if let Some(raw) = self.take(1) {
            let origin = to_zero_prefix_hex_string(raw, 1);
            let value = byte_at(&origin, 0).unwrap_or(0);

            let details = groups
                .iter()
                .map(|(label, shift, mask, table)| {
                    let width = mask.count_ones() as u8;
                    let high = shift + width - 1;
                    let text = table((value >> shift) & mask);
                    if width == 1 {
                        format!("bit{} {}: {}", shift, label, text)
                    } else {
                        format!("bit{}-{} {}: {}", high, shift, label, text)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");

            self.push(ResultField::hex(origin, meaning, details));
        }
        self
    }

    /// "2+N" field: a 2-byte length then that many payload bytes
    ///
    /// Emits `<meaning>长度` and the payload. A declared length larger than the
    /// remaining data is cut to what is present.
    pub fn prefixed(&mut self, meaning: &str, details: &str) -> &mut Self {
        if self.is_exhausted() {
            return self;
        }
        let data: &'a str = self.data;
        let split = split_length_prefixed(&data[self.pos..]);
        self.pos += split.consumed();

        let length_origin = to_zero_prefix_hex_string(split.length_hex, 2);
        self.push(ResultField::decimal(
            length_origin,
            format!("{}长度", meaning),
            format!("{}的字节数(2字节, 高字节在前)", meaning),
        ));

        if !split.payload.is_empty() {
            let mut layout = format!(
                "{}\n[LL LL][DATA x N]\nN = {}",
                details,
                split.declared
            );
            if split.is_truncated() {
                tracing::debug!(
                    "{:04X}: {} declares {} bytes, {} present",
                    self.context.dispatch_key(),
                    meaning,
                    split.declared,
                    split.payload_len()
                );
                layout.push_str(&format!(", 实际仅 {} 字节", split.payload_len()));
            }
            self.push(ResultField::hex(split.payload, meaning, layout));
        }
        self
    }

    /// Everything left except `reserve` bytes kept for trailing fields
    pub fn rest(&mut self, reserve: usize, meaning: &str, details: &str) -> &mut Self {
        let bytes = self.remaining().saturating_sub(reserve);
        if bytes == 0 {
            return self;
        }
        self.hex(bytes, meaning, details)
    }

    /// `count` fixed-width blocks labelled `<meaning>1..=count`
    ///
    /// Stops early if the data runs out.
    pub fn blocks(&mut self, count: usize, width: usize, meaning: &str, details: &str) -> &mut Self {
        for index in 1..=count {
            if self.is_exhausted() {
                break;
            }
            let label = format!("{}{}", meaning, index);
            let details = format!("{} (第{}/{}块, 每块{}字节)", details, index, count, width);
            self.hex(width, &label, &details);
        }
        self
    }

    /// [`blocks`](Self::blocks) that leave `reserve` bytes for trailing fields
    ///
    /// A declared count larger than the data can hold is cut to the blocks
    /// that fit, so the trailing fields still land on their own bytes.
    pub fn blocks_before(
        &mut self,
        reserve: usize,
        count: usize,
        width: usize,
        meaning: &str,
        details: &str,
    ) -> &mut Self {
        let fit = self.remaining().saturating_sub(reserve) / width.max(1);
        if count > fit {
            tracing::debug!(
                "{:04X}: {} declares {} blocks, {} fit",
                self.context.dispatch_key(),
                meaning,
                count,
                fit
            );
        }
        self.blocks(count.min(fit), width, meaning, details)
    }

    /// `count` repeated records, each emitted by `record` with its 1-based index
    pub fn records(&mut self, count: usize, record: fn(&mut FieldWriter<'_>, usize)) -> &mut Self {
        for index in 1..=count {
            if self.is_exhausted() {
                break;
            }
            record(self, index);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{validate, FrameContext};

    fn context() -> FrameContext {
        // 00 02 command with a three-byte data domain
        FrameContext::from_frame(&validate("E9000500021234568CE6").unwrap())
    }

    fn run(data: &str, layout: impl FnOnce(&mut FieldWriter<'_>)) -> Vec<ResultField> {
        let ctx = context();
        let mut fields = Vec::new();
        let mut writer = FieldWriter::new(&ctx, data, &mut fields);
        layout(&mut writer);
        fields
    }

    #[test]
    fn test_fixed_fields_in_order() {
        let fields = run("AABBCC000A20240131235958", |w| {
            w.hex(3, "a", "")
                .decimal(2, "b", "")
                .date(7, "c", "");
        });
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].origin, "AABBCC");
        assert_eq!(fields[0].analyzed, "AABBCC");
        assert_eq!(fields[1].analyzed, "10");
        assert_eq!(fields[2].analyzed, "2024-01-31 23:59:58");
    }

    #[test]
    fn test_short_field_is_zero_padded_and_rest_skipped() {
        let fields = run("ABCD", |w| {
            w.hex(3, "a", "").hex(1, "b", "");
        });
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].origin, "00ABCD");
    }

    #[test]
    fn test_prefixed_field() {
        let fields = run("0002AABB11", |w| {
            w.prefixed("数据", "参数").hex(1, "尾", "");
        });
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].origin, "0002");
        assert_eq!(fields[0].analyzed, "2");
        assert_eq!(fields[0].meaning, "数据长度");
        assert_eq!(fields[1].origin, "AABB");
        assert!(fields[1].meaning_details.contains("N = 2"));
        assert_eq!(fields[2].origin, "11");
    }

    #[test]
    fn test_prefixed_uses_actual_length_when_declared_is_larger() {
        let fields = run("0009AABB", |w| {
            w.prefixed("数据", "");
        });
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].origin, "AABB");
        assert!(fields[1].meaning_details.contains("实际仅 2 字节"));
    }

    #[test]
    fn test_rest_reserves_trailing_bytes() {
        let fields = run("0102030405060708", |w| {
            w.rest(4, "密文", "").hex(4, "MAC", "");
        });
        assert_eq!(fields[0].origin, "01020304");
        assert_eq!(fields[1].origin, "05060708");
    }

    #[test]
    fn test_rest_with_nothing_left_for_it() {
        let fields = run("01020304", |w| {
            w.rest(4, "密文", "").hex(4, "MAC", "");
        });
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].meaning, "MAC");
    }

    #[test]
    fn test_blocks_labelled_sequentially() {
        let fields = run("AAAABBBBCC", |w| {
            w.blocks(3, 2, "密钥", "");
        });
        let labels: Vec<_> = fields.iter().map(|f| f.meaning.as_str()).collect();
        assert_eq!(labels, ["密钥1", "密钥2", "密钥3"]);
        assert_eq!(fields[2].origin, "00CC");
    }

    #[test]
    fn test_code_field() {
        fn table(code: u8) -> &'static str {
            if code == 0x1A {
                "跳闸"
            } else {
                "未知"
            }
        }
        let fields = run("1A", |w| {
            w.code("控制命令", "", table);
        });
        assert_eq!(fields[0].analyzed, "1A");
        assert_eq!(fields[0].meaning_details, "跳闸\n");
    }

    #[test]
    fn test_bit_groups() {
        fn on_off(v: u8) -> &'static str {
            if v == 0 {
                "off"
            } else {
                "on"
            }
        }
        let fields = run("21", |w| {
            w.bit_groups("状态", &[("高", 4, 0x0F, on_off), ("低", 0, 0x01, on_off)]);
        });
        assert_eq!(fields[0].analyzed, "21");
        assert_eq!(fields[0].meaning_details, "bit7-4 高: on\nbit0 低: on");
    }

    #[test]
    fn test_blocks_before_keeps_reserved_tail() {
        // Declares 3 blocks but only one fits before the 2-byte tail
        let fields = run("AAAABBBB", |w| {
            w.blocks_before(2, 3, 2, "块", "").hex(2, "尾", "");
        });
        let labels: Vec<_> = fields.iter().map(|f| f.meaning.as_str()).collect();
        assert_eq!(labels, ["块1", "尾"]);
        assert_eq!(fields[1].origin, "BBBB");
    }

    #[test]
    fn test_blocks_before_honours_smaller_count() {
        let fields = run("AAAABBBBCCCC", |w| {
            w.blocks_before(2, 1, 2, "块", "").hex(2, "尾", "");
        });
        let labels: Vec<_> = fields.iter().map(|f| f.meaning.as_str()).collect();
        assert_eq!(labels, ["块1", "尾"]);
        assert_eq!(fields[1].origin, "BBBB");
    }

    #[test]
    fn test_decimal_value_returns_count() {
        let ctx = context();
        let mut fields = Vec::new();
        let mut writer = FieldWriter::new(&ctx, "03", &mut fields);
        assert_eq!(writer.decimal_value(1, "条数", ""), Some(3));
        assert_eq!(writer.decimal_value(1, "条数", ""), None);
    }
}
