//! Main function 01: DL/T 645 meters
//!
//! Most write commands open with the meter number and the 4-byte random
//! number returned by identity authentication; their acks carry a
//! ciphertext closed by a MAC.
//!
//! # Common Layouts
//!
//! ```text
//! command: [表号 x8][随机数2 x4][command fields...]
//! ack:     [命令密文 x N][MAC x4]
//! ```

use super::{cipher_with_mac, key, mac, meter_number, meter_session};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

const KEY_BLOCK_BYTES: usize = 32;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x01, 0x01), identity_request),
    (key(0x01, 0x81), identity_response),
    (key(0x01, 0x02), remote_control),
    (key(0x01, 0x82), remote_control_response),
    (key(0x01, 0x03), parameter_set),
    (key(0x01, 0x83), plain_parameter_response),
    (key(0x01, 0x04), parameter_set),
    (key(0x01, 0x84), cipher_parameter_response),
    (key(0x01, 0x05), recharge),
    (key(0x01, 0x85), recharge_response),
    (key(0x01, 0x06), key_update_request),
    (key(0x01, 0x86), key_update_response),
    (key(0x01, 0x07), energy_clear),
    (key(0x01, 0x87), cipher_with_mac),
    (key(0x01, 0x08), infrared_auth),
    (key(0x01, 0x88), infrared_auth_response),
    (key(0x01, 0x09), event_clear),
    (key(0x01, 0x89), cipher_with_mac),
    (key(0x01, 0x0A), wallet_init),
    (key(0x01, 0x8A), wallet_init_response),
    (key(0x01, 0x0B), readback_check),
    (key(0x01, 0x8B), readback_check_response),
    (key(0x01, 0x0C), clock_sync),
    (key(0x01, 0x8C), cipher_with_mac),
    (key(0x01, 0x0D), refund),
    (key(0x01, 0x8D), cipher_with_mac),
    (key(0x01, 0x0E), auth_validity),
    (key(0x01, 0x8E), auth_validity_response),
];

fn identity_request(w: &mut FieldWriter<'_>) {
    meter_number(w);
}

fn identity_response(w: &mut FieldWriter<'_>) {
    w.hex(8, "随机数1", "下发给电能表的8字节随机数")
        .hex(8, "密文1", "随机数1经身份认证密钥加密的结果");
}

fn remote_control(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.code(
        "控制命令",
        "1A跳闸 1B合闸允许 1C直接合闸 2A报警 2B报警解除 3A保电 3B保电解除",
        meaning::meter_control,
    )
    .hex(1, "保留", "保留字节, 固定为00")
    .date(6, "命令截止时间", "6字节BCD, yyMMddHHmmss, 超时后电能表拒绝执行");
}

fn remote_control_response(w: &mut FieldWriter<'_>) {
    w.rest(0, "控制命令密文", "直接下发给电能表的控制命令密文");
}

/// Shared by the plaintext (03) and ciphertext (04) parameter settings
fn parameter_set(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.hex(4, "数据标识", "DL/T 645数据标识DI3-DI0")
        .prefixed("参数数据", "待设置的参数内容");
}

fn plain_parameter_response(w: &mut FieldWriter<'_>) {
    w.rest(4, "参数数据", "明文参数数据");
    mac(w);
}

fn cipher_parameter_response(w: &mut FieldWriter<'_>) {
    w.prefixed("参数密文", "ESAM加密后的参数数据");
    mac(w);
}

fn recharge(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.hex(6, "客户编号", "用户的6字节客户编号")
        .decimal(4, "购电金额", "单位: 分")
        .decimal(4, "购电次数", "累计购电次数");
}

fn recharge_response(w: &mut FieldWriter<'_>) {
    w.decimal(4, "购电金额", "单位: 分")
        .decimal(4, "购电次数", "累计购电次数")
        .hex(4, "MAC1", "购电金额与购电次数的MAC")
        .hex(6, "客户编号", "用户的6字节客户编号")
        .hex(4, "MAC2", "客户编号的MAC");
}

fn key_update_request(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.hex(8, "ESAM序列号", "电能表ESAM序列号")
        .decimal(1, "密钥总条数", "需要更新的密钥总条数");
}

fn key_update_response(w: &mut FieldWriter<'_>) {
    let count = w
        .decimal_value(1, "密钥条数", "本帧包含的密钥条数")
        .unwrap_or(0);
    w.blocks(count, KEY_BLOCK_BYTES, "密钥", "密钥密文及MAC");
}

fn energy_clear(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.date(6, "清零时间", "6字节BCD, yyMMddHHmmss");
}

fn infrared_auth(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.hex(8, "ESAM序列号", "电能表ESAM序列号")
        .hex(8, "随机数1", "掌机下发的随机数1")
        .hex(8, "随机数1密文", "电能表返回的随机数1密文")
        .hex(8, "随机数2", "电能表返回的随机数2");
}

fn infrared_auth_response(w: &mut FieldWriter<'_>) {
    w.hex(8, "随机数2密文", "下发给电能表的随机数2密文");
}

fn event_clear(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.date(6, "清零时间", "6字节BCD, yyMMddHHmmss")
        .hex(4, "事件清零标识", "FFFFFFFF表示全部事件, 否则为事件数据标识");
}

fn wallet_init(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.decimal(4, "预置金额", "单位: 分");
}

fn wallet_init_response(w: &mut FieldWriter<'_>) {
    w.decimal(4, "预置金额", "单位: 分")
        .hex(4, "MAC1", "预置金额的MAC")
        .decimal(4, "购电次数", "初始化后的购电次数, 通常为0")
        .hex(4, "MAC2", "购电次数的MAC");
}

fn readback_check(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.hex(8, "随机数1", "身份认证时下发的随机数1")
        .hex(4, "数据标识", "回抄数据的数据标识")
        .prefixed("回抄数据", "电能表返回的数据");
    mac(w);
}

fn readback_check_response(w: &mut FieldWriter<'_>) {
    w.code("校验结果", "00校验通过 01校验不通过", meaning::check_result);
}

fn clock_sync(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.date(6, "校时时间", "6字节BCD, yyMMddHHmmss");
}

fn refund(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.decimal(4, "退费金额", "单位: 分");
}

fn auth_validity(w: &mut FieldWriter<'_>) {
    meter_session(w);
    w.decimal(2, "身份认证时效", "单位: 分钟");
}

fn auth_validity_response(w: &mut FieldWriter<'_>) {
    w.decimal(2, "身份认证时效", "单位: 分钟");
    mac(w);
}
