//! Decode orchestration: validate, emit header, expand data domain, emit trailer
//!
//! # Output Order
//!
//! ```text
//! 帧起始符, 帧长度, 主功能标识, [命令/应答码], [状态字], data fields..., 校验和, 帧结束符
//! ```
//!
//! The command/ack field is absent on the upgrade-end acknowledgement, and the
//! status field is only present on acknowledgements.

use crate::field::ResultField;
use crate::frame::{self, FrameContext, ValidatedFrame, END_MARKER, START_MARKER};
use crate::layout;
use crate::meaning;

/// Result of decoding one frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "outcome", content = "fields")
)]
pub enum DecodeOutcome {
    /// Frame passed every check; fields are in wire order
    ParseComplete(Vec<ResultField>),
    /// Input held nothing but whitespace
    EmptyInput,
    /// Empty input or an odd number of hex digits
    ByteIncomplete,
    /// Bad hex, markers, length, main function or command code
    FormatIncomplete,
    /// Trailing checksum does not match the byte sum
    ChecksumFailed,
}

impl DecodeOutcome {
    /// Whether the frame decoded successfully
    pub fn is_complete(&self) -> bool {
        matches!(self, DecodeOutcome::ParseComplete(_))
    }

    /// Decoded fields, if any
    pub fn fields(&self) -> Option<&[ResultField]> {
        match self {
            DecodeOutcome::ParseComplete(fields) => Some(fields),
            _ => None,
        }
    }

    /// Take the decoded fields, if any
    pub fn into_fields(self) -> Option<Vec<ResultField>> {
        match self {
            DecodeOutcome::ParseComplete(fields) => Some(fields),
            _ => None,
        }
    }

    /// Variant name, stable across releases
    pub fn name(&self) -> &'static str {
        match self {
            DecodeOutcome::ParseComplete(_) => "ParseComplete",
            DecodeOutcome::EmptyInput => "EmptyInput",
            DecodeOutcome::ByteIncomplete => "ByteIncomplete",
            DecodeOutcome::FormatIncomplete => "FormatIncomplete",
            DecodeOutcome::ChecksumFailed => "ChecksumFailed",
        }
    }
}

/// Decode one frame given as hex text
///
/// Whitespace anywhere in `input` is ignored and letters may be in either
/// case. Never panics; every malformed input maps to one of the failure
/// variants.
pub fn decode(input: &str) -> DecodeOutcome {
    let frame = frame::preprocess(input);
    if frame.is_empty() && !input.is_empty() {
        return DecodeOutcome::EmptyInput;
    }

    match frame::validate(&frame) {
        Ok(validated) => DecodeOutcome::ParseComplete(decode_validated(&validated)),
        Err(e) => {
            tracing::debug!("Rejected frame {:?}: {}", frame, e);
            e.outcome()
        }
    }
}

/// Field breakdown of a frame that already passed validation
pub fn decode_validated(frame: &ValidatedFrame) -> Vec<ResultField> {
    let context = FrameContext::from_frame(frame);
    let hex = frame.hex();

    let mut fields = Vec::new();
    push_header(&context, hex, &mut fields);
    layout::decode_data_domain(&context, hex, &mut fields);
    push_trailer(&context, &mut fields);
    fields
}

fn push_header(context: &FrameContext, hex: &str, fields: &mut Vec<ResultField>) {
    fields.push(ResultField::hex(
        format!("{:02X}", START_MARKER),
        "帧起始符",
        "固定为E9",
    ));
    fields.push(ResultField::decimal(
        &hex[2..6],
        "帧长度",
        "2字节, 从主功能标识到数据域末尾的字节数",
    ));
    fields.push(ResultField::hex(
        format!("{:02X}", context.main_function),
        meaning::main_function(context.main_function),
        "主功能标识: 00安全单元 01电能表 02 698电能表 03采集终端 04电子封印 05主站 06用户卡 FE程序升级",
    ));

    if context.is_fe03_special {
        return;
    }

    let command = meaning::command(context.main_function, context.command_or_ack);
    fields.push(ResultField::hex(
        format!("{:02X}", context.command_or_ack),
        command.label(),
        command.details(),
    ));

    if let Some(status) = context.status {
        fields.push(ResultField::hex(
            format!("{:02X}", status),
            meaning::status(context.main_function, context.command_or_ack, status),
            "应答状态字, 00表示成功",
        ));
    }
}

fn push_trailer(context: &FrameContext, fields: &mut Vec<ResultField>) {
    fields.push(ResultField::decimal(
        format!("{:02X}", context.checksum),
        "校验和",
        "从帧起始符到数据域末尾所有字节之和, 模256",
    ));
    fields.push(ResultField::hex(
        format!("{:02X}", END_MARKER),
        "帧结束符",
        "固定为E6",
    ));
}
