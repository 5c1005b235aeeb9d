//! Data-domain layouts, keyed by `(main_function << 8) | command_or_ack`
//!
//! Each submodule covers one main function and exports a `LAYOUTS` table.
//! Aliased codes register the same function, so they decode identically.
//! Keys without an entry are not an error: the data domain is simply left
//! unexpanded.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::field::{FieldWriter, LayoutFn, ResultField};
use crate::frame::FrameContext;

mod card;
mod master;
mod meter;
mod oop_meter;
mod seal;
mod security_unit;
mod terminal;
mod upgrade;

static REGISTRY: LazyLock<HashMap<u16, LayoutFn>> = LazyLock::new(|| {
    [
        security_unit::LAYOUTS,
        meter::LAYOUTS,
        oop_meter::LAYOUTS,
        terminal::LAYOUTS,
        seal::LAYOUTS,
        master::LAYOUTS,
        card::LAYOUTS,
        upgrade::LAYOUTS,
    ]
    .into_iter()
    .flatten()
    .copied()
    .collect()
});

/// Pack a main function and command/ack byte into a registry key
pub const fn key(main_function: u8, command_or_ack: u8) -> u16 {
    ((main_function as u16) << 8) | command_or_ack as u16
}

/// Layout registered for `key`, if any
pub fn lookup(key: u16) -> Option<LayoutFn> {
    REGISTRY.get(&key).copied()
}

/// All registered keys, ascending
pub fn registered_keys() -> Vec<u16> {
    let mut keys: Vec<u16> = REGISTRY.keys().copied().collect();
    keys.sort_unstable();
    keys
}

/// Expand the data domain of a frame into `fields`
///
/// Returns whether a layout was found. Frames with an empty data domain are
/// never dispatched.
pub fn decode_data_domain(context: &FrameContext, frame_hex: &str, fields: &mut Vec<ResultField>) -> bool {
    if context.data_domain_byte_length == 0 {
        return false;
    }
    let key = context.dispatch_key();
    let Some(layout) = lookup(key) else {
        tracing::trace!("No data-domain layout for {:04X}", key);
        return false;
    };
    tracing::trace!("Decoding data domain with layout {:04X}", key);

    let data = context.data_domain(frame_hex);
    let mut writer = FieldWriter::new(context, data, fields);
    layout(&mut writer);
    true
}

// ============================================================================
// Fields shared across main functions
// ============================================================================

pub(crate) const MAC_DETAILS: &str = "4字节消息认证码";
const MAC_BYTES: usize = 4;

fn mac(w: &mut FieldWriter<'_>) {
    w.hex(MAC_BYTES, "MAC", MAC_DETAILS);
}

fn meter_number(w: &mut FieldWriter<'_>) {
    w.hex(8, "表号", "电能表表号, 作为密钥分散因子");
}

/// 表号 + 随机数2, the prefix of most DL/T 645 write commands
fn meter_session(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.hex(4, "随机数2", "电能表身份认证时返回的4字节随机数");
}

/// Ciphertext taking all but the trailing MAC
fn cipher_with_mac(w: &mut FieldWriter<'_>) {
    w.rest(MAC_BYTES, "命令密文", "ESAM加密后的命令数据, 长度为数据域减去MAC");
    mac(w);
}

/// 2+N ciphertext followed by a MAC
fn prefixed_cipher_with_mac(w: &mut FieldWriter<'_>) {
    w.prefixed("密文数据", "ESAM加密后的数据");
    mac(w);
}
