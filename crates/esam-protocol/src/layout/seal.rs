//! Main function 04: electronic seals

use super::{key, mac, prefixed_cipher_with_mac};
use crate::field::{FieldWriter, LayoutFn};
use crate::meaning;

pub(super) const LAYOUTS: &[(u16, LayoutFn)] = &[
    (key(0x04, 0x01), identity_request),
    (key(0x04, 0x81), identity_response),
    (key(0x04, 0x02), read_request),
    (key(0x04, 0x82), read_response),
    (key(0x04, 0x03), write_request),
    (key(0x04, 0x83), prefixed_cipher_with_mac),
    (key(0x04, 0x04), registration),
    (key(0x04, 0x84), registration_response),
];

fn seal_uid(w: &mut FieldWriter<'_>) {
    w.hex(8, "封印UID", "电子封印唯一标识");
}

fn identity_request(w: &mut FieldWriter<'_>) {
    seal_uid(w);
    w.hex(8, "随机数", "电子封印返回的随机数");
}

fn identity_response(w: &mut FieldWriter<'_>) {
    w.hex(8, "认证密文", "封印随机数的认证密文")
        .hex(8, "封印随机数", "用于封印反向认证的随机数");
}

fn read_request(w: &mut FieldWriter<'_>) {
    seal_uid(w);
    w.decimal(2, "起始地址", "封印存储区起始地址")
        .decimal(1, "读取长度", "读取的字节数");
}

fn read_response(w: &mut FieldWriter<'_>) {
    w.prefixed("封印数据", "封印存储区数据");
    mac(w);
}

fn write_request(w: &mut FieldWriter<'_>) {
    seal_uid(w);
    w.decimal(2, "起始地址", "封印存储区起始地址")
        .prefixed("写入数据", "待写入封印存储区的明文");
}

fn registration(w: &mut FieldWriter<'_>) {
    seal_uid(w);
    w.code("操作类型", "01施封 02拆封", meaning::seal_operation)
        .date(7, "操作时间", "7字节BCD, yyyyMMddHHmmss")
        .hex(4, "操作员编号", "执行施封/拆封的操作员");
}

fn registration_response(w: &mut FieldWriter<'_>) {
    w.decimal(2, "登记序号", "安全单元内的登记记录序号");
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
    fn test_registration() {
        let data = "0102030405060708022024061510300000000042";
        let fields = run(super::registration, data);
        assert_eq!(fields[1].analyzed, "02");
        assert!(fields[1].meaning_details.starts_with("拆封\n"));
        assert_eq!(fields[2].analyzed, "2024-06-15 10:30:00");
        assert_eq!(fields[3].origin, "00000042");
    }

    #[test]
    fn test_read_request_decimal_address() {
        let fields = run(super::read_request, "0102030405060708010010");
        assert_eq!(fields[1].analyzed, "256");
        assert_eq!(fields[2].analyzed, "16");
    }
}
