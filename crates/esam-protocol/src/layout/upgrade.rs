//! Main function FE: firmware upgrade
//!
//! The end-of-upgrade ack (FE 83) is the special frame with no command
//! field and no data domain, so it has no layout.

use super::key;
use crate::field::{FieldWriter, LayoutFn};

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0xFE, 0x01), start),
    (key(0xFE, 0x81), start_response),
    (key(0xFE, 0x02), transfer),
    (key(0xFE, 0x82), transfer_response),
    (key(0xFE, 0x03), finish),
];

fn start(w: &mut FieldWriter<'_>) {
    w.decimal(4, "文件总长度", "升级文件字节数")
        .decimal(2, "总包数", "升级文件分包总数")
        .decimal(2, "单包长度", "每包字节数, 最后一包可能较短")
        .hex(4, "目标版本号", "升级后的软件版本")
        .hex(4, "文件校验码", "整个升级文件的校验码");
}

fn start_response(w: &mut FieldWriter<'_>) {
    w.decimal(2, "续传起始包号", "0表示从头开始, 否则从该包续传");
}

fn transfer(w: &mut FieldWriter<'_>) {
    w.decimal(2, "包序号", "从0开始的包序号")
        .prefixed("包数据", "升级文件分包数据");
}

fn transfer_response(w: &mut FieldWriter<'_>) {
    w.decimal(2, "已接收包序号", "安全单元确认接收的包序号");
}

fn finish(w: &mut FieldWriter<'_>) {
    w.hex(4, "文件校验码", "与开始升级时下发的校验码比对");
}
