//! Main function 02: DL/T 698.45 (object-oriented) meters
//!
//! Variable parts are 2+N fields: a big-endian length then the payload.

use super::{key, mac, meter_number};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x02, 0x01), connect_request),
    (key(0x02, 0x81), connect_response),
    (key(0x02, 0x02), session_verify),
    (key(0x02, 0x03), encrypt_request),
    (key(0x02, 0x83), encrypt_response),
    (key(0x02, 0x04), decrypt_request),
    (key(0x02, 0x84), decrypt_response),
    (key(0x02, 0x05), key_update_request),
    (key(0x02, 0x85), key_update_response),
    (key(0x02, 0x06), certificate_request),
    (key(0x02, 0x86), certificate_response),
    (key(0x02, 0x07), broadcast_request),
    (key(0x02, 0x87), broadcast_response),
];

fn security_mode(w: &mut FieldWriter<'_>) {
    w.code("安全模式", "01明文+MAC 02密文 03密文+MAC", meaning::security_mode);
}

fn connect_request(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.decimal(4, "会话计数器", "ESAM会话计数器, 每次建立连接递增");
}

fn connect_response(w: &mut FieldWriter<'_>) {
    w.prefixed("会话协商数据", "下发给电能表的应用连接密文")
        .prefixed("客户机签名", "会话协商数据的签名");
}

fn session_verify(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.prefixed("服务器随机数", "电能表返回的随机数")
        .prefixed("服务器签名", "电能表对随机数的签名");
}

fn encrypt_request(w: &mut FieldWriter<'_>) {
    security_mode(w);
    w.prefixed("应用数据", "待保护的APDU明文");
}

fn encrypt_response(w: &mut FieldWriter<'_>) {
    w.prefixed("安全数据", "按安全模式处理后的APDU")
        .rest(0, "数据验证信息", "MAC或随机数, 明文+MAC模式下存在");
}

fn decrypt_request(w: &mut FieldWriter<'_>) {
    security_mode(w);
    w.prefixed("安全数据", "电能表返回的安全APDU")
        .rest(0, "数据验证信息", "MAC或随机数");
}

fn decrypt_response(w: &mut FieldWriter<'_>) {
    w.prefixed("明文数据", "解密或验证后的APDU明文");
}

fn key_update_request(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.hex(8, "ESAM序列号", "电能表ESAM序列号")
        .hex(16, "当前密钥版本", "电能表ESAM当前的密钥版本信息");
}

fn key_update_response(w: &mut FieldWriter<'_>) {
    w.prefixed("密钥更新数据", "密钥密文");
    mac(w);
}

fn certificate_request(w: &mut FieldWriter<'_>) {
    meter_number(w);
    w.code("证书类型", "01安全单元证书 02CA证书 03主站证书", meaning::certificate_kind);
}

fn certificate_response(w: &mut FieldWriter<'_>) {
    w.prefixed("证书数据", "待写入电能表的证书")
        .prefixed("签名数据", "证书数据的签名");
}

fn broadcast_request(w: &mut FieldWriter<'_>) {
    w.prefixed("广播数据", "待加密的广播APDU");
}

fn broadcast_response(w: &mut FieldWriter<'_>) {
    w.prefixed("广播密文", "广播APDU密文");
    mac(w);
}
