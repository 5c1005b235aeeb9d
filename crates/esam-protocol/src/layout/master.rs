//! Main function 05: master station

use super::security_unit::operation_records;
use super::{key, mac, MAC_BYTES};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

/// Width of one meter number in the blacklist
const METER_NUMBER_BYTES: usize = 8;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x05, 0x01), identity_request),
    (key(0x05, 0x81), identity_response),
    (key(0x05, 0x02), identity_confirm),
    (key(0x05, 0x03), operator_permission),
    (key(0x05, 0x04), record_upload_request),
    (key(0x05, 0x84), operation_records),
    (key(0x05, 0x05), blacklist),
    (key(0x05, 0x06), time_sync),
    (key(0x05, 0x86), time_sync_response),
];

fn identity_request(w: &mut FieldWriter<'_>) {
    w.hex(16, "主站随机数", "主站生成的16字节随机数");
}

fn identity_response(w: &mut FieldWriter<'_>) {
    w.hex(8, "安全单元编号", "安全单元出厂编号")
        .hex(16, "安全单元随机数", "安全单元生成的16字节随机数")
        .rest(0, "认证密文", "主站随机数的认证密文");
}

fn identity_confirm(w: &mut FieldWriter<'_>) {
    w.rest(0, "主站认证密文", "安全单元随机数的认证密文");
}

fn operator_permission(w: &mut FieldWriter<'_>) {
    w.hex(4, "操作员编号", "被授权的操作员")
        .code("操作员权限", "01普通操作员 02管理员 03超级管理员", meaning::operator_role)
        .date(6, "权限有效期", "6字节BCD, yyMMddHHmmss");
    mac(w);
}

fn record_upload_request(w: &mut FieldWriter<'_>) {
    w.decimal(2, "起始记录序号", "从该序号开始上传")
        .decimal(1, "读取条数", "本次上传的记录条数");
}

fn blacklist(w: &mut FieldWriter<'_>) {
    let count = w
        .decimal_value(1, "名单条数", "黑名单中的表号个数")
        .unwrap_or(0);
    w.blocks_before(MAC_BYTES, count, METER_NUMBER_BYTES, "表号", "禁止操作的电能表表号");
    mac(w);
}

fn time_sync(w: &mut FieldWriter<'_>) {
    w.date(7, "主站时间", "7字节BCD, yyyyMMddHHmmss");
    mac(w);
}

fn time_sync_response(w: &mut FieldWriter<'_>) {
    w.date(7, "安全单元当前时间", "校准后的安全单元时钟");
}
