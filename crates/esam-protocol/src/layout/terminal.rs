//! Main function 03: concentrators and collection terminals

use super::{cipher_with_mac, key, mac, prefixed_cipher_with_mac, MAC_BYTES};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

const KEY_BLOCK_BYTES: usize = 32;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x03, 0x01), terminal_address),
    (key(0x03, 0x81), identity_response),
    (key(0x03, 0x02), clock_sync),
    (key(0x03, 0x82), cipher_with_mac),
    (key(0x03, 0x03), parameter_set),
    (key(0x03, 0x83), prefixed_cipher_with_mac),
    (key(0x03, 0x04), control),
    (key(0x03, 0x84), prefixed_cipher_with_mac),
    (key(0x03, 0x05), key_request),
    (key(0x03, 0x85), key_blocks),
    (key(0x03, 0x06), key_request),
    (key(0x03, 0x86), key_blocks),
    (key(0x03, 0x07), report_check),
    (key(0x03, 0x87), report_check_response),
];

fn terminal_address(w: &mut FieldWriter<'_>) {
    w.hex(6, "终端地址", "行政区划码 + 终端地址");
}

/// Terminal address plus the 16-byte session random number
fn terminal_session(w: &mut FieldWriter<'_>) {
    terminal_address(w);
    w.hex(16, "随机数", "终端身份认证时生成的16字节随机数");
}

fn identity_response(w: &mut FieldWriter<'_>) {
    w.hex(16, "随机数", "下发给终端的16字节随机数")
        .hex(16, "认证密文", "随机数经终端认证密钥加密的结果");
}

fn clock_sync(w: &mut FieldWriter<'_>) {
    terminal_session(w);
    w.date(7, "对时时间", "7字节BCD, yyyyMMddHHmmss");
}

fn parameter_set(w: &mut FieldWriter<'_>) {
    terminal_session(w);
    w.prefixed("参数数据", "待下发的终端参数明文");
}

fn control(w: &mut FieldWriter<'_>) {
    terminal_session(w);
    w.code(
        "控制类型",
        "01遥控跳闸 02允许合闸 03保电投入 04保电解除 05剔除投入 06剔除解除",
        meaning::terminal_control,
    )
    .decimal(1, "控制轮次", "遥控跳闸的轮次");
}

/// Shared by key update (05) and key recovery (06)
fn key_request(w: &mut FieldWriter<'_>) {
    terminal_session(w);
    w.hex(1, "密钥版本", "终端当前的密钥版本")
        .decimal(1, "密钥条数", "需要更新的密钥条数");
}

/// Key blocks filling everything but the trailing MAC
fn key_blocks(w: &mut FieldWriter<'_>) {
    let count = w.remaining().saturating_sub(MAC_BYTES) / KEY_BLOCK_BYTES;
    w.blocks(count, KEY_BLOCK_BYTES, "密钥", "终端密钥密文");
    mac(w);
}

fn report_check(w: &mut FieldWriter<'_>) {
    terminal_address(w);
    w.prefixed("上报数据", "终端主动上报的数据");
    mac(w);
}

fn report_check_response(w: &mut FieldWriter<'_>) {
    w.code("校验结果", "00校验通过 01校验不通过", meaning::check_result);
}
