//! Main function 00: housekeeping of the security unit itself

use super::{key, mac, MAC_BYTES};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

/// Width of one symmetric key block in a key-update command
const KEY_BLOCK_BYTES: usize = 32;
/// Width of one stored operation record
const RECORD_BYTES: usize = 18;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x00, 0x81), unit_info),
    (key(0x00, 0x02), verify_password),
    (key(0x00, 0x82), password_attempts),
    (key(0x00, 0x03), change_password),
    (key(0x00, 0x04), random_request),
    (key(0x00, 0x84), random_response),
    (key(0x00, 0x05), set_clock),
    (key(0x00, 0x86), clock),
    (key(0x00, 0x07), login),
    (key(0x00, 0x87), login_response),
    (key(0x00, 0x88), record_counts),
    (key(0x00, 0x09), record_query),
    (key(0x00, 0x89), operation_records),
    (key(0x00, 0x0A), key_update),
    (key(0x00, 0x0B), certificate_request),
    (key(0x00, 0x8B), certificate),
    (key(0x00, 0x0C), sign_request),
    (key(0x00, 0x8C), signature),
    (key(0x00, 0x0D), factory_reset),
    (key(0x00, 0x0E), lock),
    (key(0x00, 0x8E), unit_status_only),
];

/// Composite status byte: work state, ESAM chip, operator card
fn unit_status(w: &mut FieldWriter<'_>) {
    w.bit_groups(
        "安全单元状态",
        &[
            ("工作状态", 4, 0x0F, meaning::unit_work_state),
            ("ESAM芯片", 2, 0x03, meaning::unit_chip_state),
            ("操作员卡", 0, 0x03, meaning::unit_card_state),
        ],
    );
}

fn unit_info(w: &mut FieldWriter<'_>) {
    w.hex(8, "安全单元编号", "安全单元出厂编号")
        .hex(8, "ESAM序列号", "安全单元内ESAM芯片序列号")
        .hex(4, "软件版本号", "安全单元固件版本")
        .hex(4, "硬件版本号", "安全单元硬件版本");
    unit_status(w);
}

fn unit_status_only(w: &mut FieldWriter<'_>) {
    unit_status(w);
}

fn verify_password(w: &mut FieldWriter<'_>) {
    w.hex(3, "操作员密码", "3字节BCD码操作员密码");
}

fn password_attempts(w: &mut FieldWriter<'_>) {
    w.decimal(1, "剩余尝试次数", "密码锁定前剩余的验证次数");
}

fn change_password(w: &mut FieldWriter<'_>) {
    w.hex(3, "原操作员密码", "3字节BCD码, 用于校验")
        .hex(3, "新操作员密码", "3字节BCD码, 校验通过后生效");
}

fn random_request(w: &mut FieldWriter<'_>) {
    w.decimal(1, "随机数长度", "请求生成的随机数字节数");
}

fn random_response(w: &mut FieldWriter<'_>) {
    w.rest(0, "随机数", "安全单元生成的随机数");
}

fn set_clock(w: &mut FieldWriter<'_>) {
    w.date(7, "设置时间", "7字节BCD, yyyyMMddHHmmss");
}

fn clock(w: &mut FieldWriter<'_>) {
    w.date(7, "安全单元当前时间", "7字节BCD, yyyyMMddHHmmss");
}

fn login(w: &mut FieldWriter<'_>) {
    w.hex(4, "操作员编号", "主站分配的操作员编号")
        .hex(3, "操作员密码", "3字节BCD码操作员密码");
}

fn login_response(w: &mut FieldWriter<'_>) {
    w.code("操作员权限", "01普通操作员 02管理员 03超级管理员", meaning::operator_role)
        .date(6, "权限有效期", "6字节BCD, yyMMddHHmmss");
}

fn record_counts(w: &mut FieldWriter<'_>) {
    w.decimal(2, "操作记录总条数", "安全单元内保存的操作记录数")
        .decimal(2, "未上传记录条数", "尚未上传主站的操作记录数");
}

fn record_query(w: &mut FieldWriter<'_>) {
    w.decimal(2, "起始记录序号", "从该序号开始读取")
        .decimal(1, "读取条数", "本次读取的记录条数");
}

/// Record count followed by fixed-size operation records
pub(super) fn operation_records(w: &mut FieldWriter<'_>) {
    let details = format!("本帧包含的操作记录条数, 每条{}字节", RECORD_BYTES);
    let count = w.decimal_value(1, "记录条数", &details).unwrap_or(0);
    w.records(count, operation_record);
}

fn operation_record(w: &mut FieldWriter<'_>, index: usize) {
    let label = |name: &str| format!("记录{}-{}", index, name);
    w.decimal(2, &label("序号"), "记录序号")
        .date(6, &label("操作时间"), "6字节BCD, yyMMddHHmmss")
        .code(&label("操作类型"), "操作业务类型", meaning::operation_kind)
        .hex(8, &label("对象地址"), "被操作设备的表号或地址")
        .code(&label("操作结果"), "00成功 01失败 02中止", meaning::operation_result);
}

fn key_update(w: &mut FieldWriter<'_>) {
    let count = w
        .decimal_value(1, "密钥条数", "本次更新的密钥条数")
        .unwrap_or(0);
    w.blocks_before(MAC_BYTES, count, KEY_BLOCK_BYTES, "密钥", "密钥密文");
    mac(w);
}

fn certificate_request(w: &mut FieldWriter<'_>) {
    w.code("证书类型", "01安全单元证书 02CA证书 03主站证书", meaning::certificate_kind);
}

fn certificate(w: &mut FieldWriter<'_>) {
    w.prefixed("证书数据", "X.509证书DER编码");
}

fn sign_request(w: &mut FieldWriter<'_>) {
    w.prefixed("待签名数据", "需由安全单元私钥签名的原文");
}

fn signature(w: &mut FieldWriter<'_>) {
    w.prefixed("签名数据", "SM2签名值");
}

fn factory_reset(w: &mut FieldWriter<'_>) {
    w.hex(8, "授权随机数", "主站下发的授权随机数")
        .hex(4, "授权MAC", "对授权随机数计算的MAC");
}

fn lock(w: &mut FieldWriter<'_>) {
    w.code("锁定命令", "00解锁 01锁定", meaning::lock_command);
}
