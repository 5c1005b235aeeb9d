//! Main function 06: user (prepayment) cards

use super::{key, mac, prefixed_cipher_with_mac};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x06, 0x01), external_auth),
    (key(0x06, 0x81), external_auth_response),
    (key(0x06, 0x02), file_check),
    (key(0x06, 0x82), purchase_info),
    (key(0x06, 0x03), write_back),
    (key(0x06, 0x83), prefixed_cipher_with_mac),
    (key(0x06, 0x04), issue),
    (key(0x06, 0x84), prefixed_cipher_with_mac),
];

fn card_serial(w: &mut FieldWriter<'_>) {
    w.hex(8, "卡片序列号", "用户卡唯一序列号");
}

fn external_auth(w: &mut FieldWriter<'_>) {
    card_serial(w);
    w.hex(8, "卡片随机数", "用户卡返回的随机数");
}

fn external_auth_response(w: &mut FieldWriter<'_>) {
    w.hex(8, "外部认证密文", "卡片随机数的外部认证密文");
}

fn file_check(w: &mut FieldWriter<'_>) {
    card_serial(w);
    w.hex(1, "文件标识", "用户卡文件短标识")
        .prefixed("文件数据", "从用户卡读出的文件内容");
    mac(w);
}

fn purchase_info(w: &mut FieldWriter<'_>) {
    w.decimal(4, "购电金额", "单位: 分")
        .decimal(4, "购电次数", "卡内记录的购电次数")
        .hex(6, "客户编号", "用户的6字节客户编号");
}

fn write_back(w: &mut FieldWriter<'_>) {
    card_serial(w);
    w.hex(4, "随机数", "用户卡返回的4字节随机数")
        .prefixed("返写数据", "电能表返写到用户卡的数据");
}

fn issue(w: &mut FieldWriter<'_>) {
    card_serial(w);
    w.code("卡类型", "01开户卡 02购电卡 03补卡", meaning::card_kind)
        .hex(6, "客户编号", "用户的6字节客户编号")
        .hex(8, "表号", "绑定的电能表表号");
}

#[cfg(test)]
mod tests {
    use crate::field::{FieldWriter, ResultField};
    use crate::frame::{validate, FrameContext};

    fn run(layout: fn(&mut FieldWriter<'_>), data: &str) -> Vec<ResultField> {
        let ctx = FrameContext::from_frame(&validate("E9000500021234568CE6").unwrap());
        let mut fields = Vec::new();
        layout(&mut FieldWriter::new(&ctx, data, &mut fields));
        fields
    }

    #[test]
    fn test_issue() {
        let data = format!("{}03{}{}", "AA".repeat(8), "000000123456", "0000000000000009");
        let fields = run(super::issue, &data);
        assert_eq!(fields[1].analyzed, "03");
        assert!(fields[1].meaning_details.starts_with("补卡\n"));
        assert_eq!(fields[3].origin, "0000000000000009");
    }

    #[test]
    fn test_file_check() {
        let data = format!("{}050002BEEF01020304", "AA".repeat(8));
        let fields = run(super::file_check, &data);
        let labels: Vec<_> = fields.iter().map(|f| f.meaning.as_str()).collect();
        assert_eq!(labels, ["卡片序列号", "文件标识", "文件数据长度", "文件数据", "MAC"]);
    }
}
