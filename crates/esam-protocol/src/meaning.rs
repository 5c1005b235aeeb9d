//! Meaning tables for header bytes and coded data-domain fields
//!
//! Every lookup here is total: codes without an entry resolve to an explicit
//! "unknown" string instead of failing.

/// Fallback label for a main-function byte without an entry
pub const UNKNOWN_MAIN_FUNCTION: &str = "未知主功能";
/// Fallback label for a (main function, command) pair without an entry
pub const UNKNOWN_COMMAND: &str = "未知命令";
/// Fallback text for a status byte without an entry
pub const UNKNOWN_STATUS: &str = "未知状态码";
/// Fallback text for coded data-domain values
pub const UNKNOWN_CODE: &str = "未知";

/// Label for a main-function byte
pub fn main_function(f: u8) -> &'static str {
    match f {
        0x00 => "安全单元自身",
        0x01 => "与电能表交互",
        0x02 => "与698电能表交互",
        0x03 => "与采集终端交互",
        0x04 => "与电子封印交互",
        0x05 => "与主站交互",
        0x06 => "与用户卡交互",
        0xFE => "程序升级",
        _ => UNKNOWN_MAIN_FUNCTION,
    }
}

/// Name and description of one command, shared by its command and ack frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMeaning {
    /// Short operation name
    pub name: &'static str,
    /// One-line description of what the operation does
    pub description: &'static str,
    /// Whether the byte that produced this was an acknowledgement
    pub is_ack: bool,
}

impl CommandMeaning {
    /// Whether the lookup hit a defined entry
    pub fn is_known(&self) -> bool {
        self.name != UNKNOWN_COMMAND
    }

    /// Short label shown in the meaning column
    pub fn label(&self) -> String {
        if self.is_ack && self.is_known() {
            format!("{}应答", self.name)
        } else {
            self.name.to_string()
        }
    }

    /// Long description shown in the details column
    pub fn details(&self) -> String {
        match (self.is_known(), self.is_ack) {
            (false, _) => "主功能标识与命令码组合未定义".to_string(),
            (true, false) => format!("命令帧: {}", self.description),
            (true, true) => format!("应答帧: {}", self.description),
        }
    }
}

/// Look up a (main function, command-or-ack) pair
///
/// Bit 7 of `command_or_ack` marks an acknowledgement; the low 7 bits select
/// the operation.
pub fn command(f: u8, command_or_ack: u8) -> CommandMeaning {
    let is_ack = command_or_ack & 0x80 != 0;
    let (name, description) = command_entry(f, command_or_ack & 0x7F);
    CommandMeaning {
        name,
        description,
        is_ack,
    }
}

fn command_entry(f: u8, code: u8) -> (&'static str, &'static str) {
    match (f, code) {
        // Security unit housekeeping
        (0x00, 0x01) => ("获取安全单元信息", "读取安全单元编号、ESAM序列号、软硬件版本及工作状态"),
        (0x00, 0x02) => ("验证操作员密码", "校验操作员输入的3字节密码, 连续失败将锁定操作员"),
        (0x00, 0x03) => ("修改操作员密码", "校验原密码后写入新的操作员密码"),
        (0x00, 0x04) => ("获取随机数", "由安全单元生成指定长度的随机数"),
        (0x00, 0x05) => ("设置安全单元时钟", "以7字节BCD(yyyyMMddHHmmss)设置安全单元时钟"),
        (0x00, 0x06) => ("读取安全单元时钟", "读取安全单元当前时钟"),
        (0x00, 0x07) => ("操作员登录", "以操作员编号和密码登录, 返回权限及有效期"),
        (0x00, 0x08) => ("读取操作记录条数", "读取安全单元内操作记录总条数及未上传条数"),
        (0x00, 0x09) => ("读取操作记录", "按起始序号读取若干条操作记录"),
        (0x00, 0x0A) => ("安全单元密钥更新", "以密文方式写入安全单元的对称密钥"),
        (0x00, 0x0B) => ("读取证书", "读取安全单元证书或CA证书"),
        (0x00, 0x0C) => ("数字签名", "使用安全单元私钥对数据进行签名"),
        (0x00, 0x0D) => ("恢复出厂设置", "经授权后清除安全单元业务数据"),
        (0x00, 0x0E) => ("安全单元锁定/解锁", "锁定或解锁安全单元业务功能"),

        // DL/T 645 meters
        (0x01, 0x01) => ("电能表身份认证", "以表号为分散因子生成随机数1及密文1"),
        (0x01, 0x02) => ("远程控制", "生成拉闸、合闸、报警、保电等控制命令密文"),
        (0x01, 0x03) => ("一类参数设置", "生成带MAC的明文参数设置数据"),
        (0x01, 0x04) => ("二类参数设置", "生成密文加MAC的参数设置数据"),
        (0x01, 0x05) => ("远程开户充值", "生成开户或充值数据及MAC"),
        (0x01, 0x06) => ("电能表密钥更新", "生成电能表密钥更新数据"),
        (0x01, 0x07) => ("电量清零", "生成电能表电量清零命令密文"),
        (0x01, 0x08) => ("红外认证", "校验电能表随机数1密文并生成随机数2密文"),
        (0x01, 0x09) => ("事件清零", "生成电能表事件清零命令密文"),
        (0x01, 0x0A) => ("钱包初始化", "生成电能表钱包初始化数据及MAC"),
        (0x01, 0x0B) => ("数据回抄校验", "校验电能表回抄数据的MAC"),
        (0x01, 0x0C) => ("广播校时", "生成电能表校时命令密文"),
        (0x01, 0x0D) => ("远程退费", "生成电能表退费命令密文"),
        (0x01, 0x0E) => ("身份认证时效设置", "生成身份认证有效时长设置数据及MAC"),

        // DL/T 698.45 meters
        (0x02, 0x01) => ("建立应用连接", "生成应用连接会话协商数据及客户机签名"),
        (0x02, 0x02) => ("会话协商验证", "校验服务器随机数及签名, 完成会话密钥协商"),
        (0x02, 0x03) => ("安全数据加密", "按安全模式对应用数据加密或计算MAC"),
        (0x02, 0x04) => ("安全数据解密", "按安全模式对应用数据解密或验证MAC"),
        (0x02, 0x05) => ("698电能表密钥更新", "生成698电能表密钥更新数据"),
        (0x02, 0x06) => ("698电能表证书更新", "生成698电能表证书更新数据及签名"),
        (0x02, 0x07) => ("广播数据加密", "生成广播数据密文及MAC"),

        // Concentrators and collection terminals
        (0x03, 0x01) => ("终端身份认证", "生成终端身份认证随机数及密文"),
        (0x03, 0x02) => ("终端对时", "生成终端对时命令密文"),
        (0x03, 0x03) => ("终端参数下发", "生成终端参数设置密文"),
        (0x03, 0x04) => ("终端控制命令", "生成终端遥控、保电、剔除等控制命令密文"),
        (0x03, 0x05) => ("终端密钥更新", "生成终端密钥更新数据"),
        (0x03, 0x06) => ("终端密钥恢复", "生成终端密钥恢复数据"),
        (0x03, 0x07) => ("终端上报数据校验", "校验终端上报数据的MAC"),

        // Electronic seals
        (0x04, 0x01) => ("封印身份认证", "与电子封印进行双向身份认证"),
        (0x04, 0x02) => ("读取封印信息", "读取电子封印存储区数据"),
        (0x04, 0x03) => ("写入封印信息", "生成写入电子封印存储区的密文"),
        (0x04, 0x04) => ("施封/拆封登记", "记录电子封印的施封或拆封操作"),

        // Master station
        (0x05, 0x01) => ("主站身份认证", "安全单元与主站之间的身份认证"),
        (0x05, 0x02) => ("主站认证确认", "提交主站认证密文完成双向认证"),
        (0x05, 0x03) => ("下载操作员权限", "写入主站下发的操作员权限及有效期"),
        (0x05, 0x04) => ("上传操作记录", "读取待上传主站的操作记录"),
        (0x05, 0x05) => ("下发表号黑名单", "写入禁止操作的电能表表号名单"),
        (0x05, 0x06) => ("主站时间同步", "以主站时间校准安全单元时钟"),

        // User (prepayment) cards
        (0x06, 0x01) => ("用户卡外部认证", "生成用户卡外部认证密文"),
        (0x06, 0x02) => ("用户卡数据校验", "校验用户卡文件数据的MAC并解析购电信息"),
        (0x06, 0x03) => ("用户卡返写", "生成用户卡返写数据密文"),
        (0x06, 0x04) => ("用户卡开户/补卡", "生成用户卡开户或补卡写卡数据"),

        // Firmware upgrade
        (0xFE, 0x01) => ("开始升级", "下发升级文件信息, 启动程序升级"),
        (0xFE, 0x02) => ("升级数据传输", "按包序号传输升级文件数据"),
        (0xFE, 0x03) => ("升级结束", "下发文件校验码, 结束程序升级"),

        _ => (UNKNOWN_COMMAND, ""),
    }
}

/// Text for an acknowledgement status byte
///
/// The same code means different things depending on the main function and
/// on which command is being answered, so resolution goes from the most
/// specific table (main function + ack) to the per-function one.
pub fn status(f: u8, ack: u8, status: u8) -> &'static str {
    if status == 0x00 {
        return "成功";
    }
    specific_status(f, ack, status)
        .or_else(|| function_status(f, status))
        .unwrap_or(UNKNOWN_STATUS)
}

fn specific_status(f: u8, ack: u8, status: u8) -> Option<&'static str> {
    let text = match (f, ack, status) {
        (0x00, 0x82, 0x01) => "操作员密码错误",
        (0x00, 0x82, 0x02) => "操作员密码已锁定",
        (0x00, 0x82, 0x03) => "密码格式错误",
        (0x00, 0x83, 0x01) => "原密码错误",
        (0x00, 0x83, 0x02) => "新密码格式错误",
        (0x00, 0x83, 0x03) => "操作员密码已锁定",
        (0x00, 0x87, 0x01) => "操作员不存在",
        (0x00, 0x87, 0x02) => "操作员密码错误",
        (0x00, 0x87, 0x03) => "操作员权限已过期",
        (0x00, 0x8A, 0x01) => "密钥MAC校验失败",
        (0x00, 0x8A, 0x02) => "密钥版本错误",
        (0x00, 0x8D, 0x01) => "授权校验失败",

        (0x01, 0x81, 0x01) => "分散因子错误",
        (0x01, 0x81, 0x02) => "随机数生成失败",
        (0x01, 0x85, 0x01) => "充值次数错误",
        (0x01, 0x85, 0x02) => "客户编号不匹配",
        (0x01, 0x85, 0x03) => "购电金额超囤积限值",
        (0x01, 0x86, 0x01) => "密钥版本错误",
        (0x01, 0x86, 0x02) => "密钥条数错误",
        (0x01, 0x88, 0x01) => "随机数1密文校验失败",
        (0x01, 0x8B, 0x01) => "回抄数据MAC校验失败",
        (0x01, 0x8D, 0x01) => "退费金额超限",

        (0x02, 0x83, 0x01) | (0x02, 0x84, 0x01) => "数据长度超限",
        (0x02, 0x83, 0x02) | (0x02, 0x84, 0x02) => "MAC校验失败",
        (0x02, 0x82, 0x01) => "服务器签名验证失败",

        (0x03, 0x81, 0x01) => "终端地址错误",
        (0x03, 0x84, 0x01) => "控制类型不支持",
        (0x03, 0x87, 0x01) => "上报数据MAC校验失败",

        (0x04, 0x82, 0x01) | (0x04, 0x83, 0x01) => "封印地址越界",
        (0x04, 0x84, 0x03) => "封印状态冲突",

        (0x05, 0x82, 0x01) => "主站认证密文错误",
        (0x05, 0x84, 0x01) => "无待上传操作记录",

        (0x06, 0x82, 0x01) => "卡片文件MAC校验失败",
        (0x06, 0x84, 0x01) => "卡片非空卡",

        (0xFE, 0x81, 0x01) => "升级版本不匹配",
        (0xFE, 0x81, 0x02) => "升级文件长度超限",
        (0xFE, 0x82, 0x01) => "升级包序号错误",
        (0xFE, 0x82, 0x02) => "升级包长度错误",
        (0xFE, 0x82, 0x03) => "升级数据写入失败",
        _ => return None,
    };
    Some(text)
}

fn function_status(f: u8, status: u8) -> Option<&'static str> {
    let text = match (f, status) {
        (0x00, 0x01) => "参数错误",
        (0x00, 0x02) => "安全单元芯片故障",
        (0x00, 0x03) => "操作员未登录",
        (0x00, 0x04) => "安全单元已锁定",

        (0x01, 0x01) => "ESAM运算失败",
        (0x01, 0x02) => "表号不匹配",
        (0x01, 0x03) => "身份认证未通过",
        (0x01, 0x04) => "操作员无权限",

        (0x02, 0x01) => "会话未建立",
        (0x02, 0x02) => "会话已失效",
        (0x02, 0x03) => "签名验证失败",
        (0x02, 0x04) => "安全模式不支持",

        (0x03, 0x01) => "终端认证失败",
        (0x03, 0x02) => "终端密钥版本错误",
        (0x03, 0x03) => "操作员无权限",

        (0x04, 0x01) => "封印认证失败",
        (0x04, 0x02) => "封印通信失败",
        (0x04, 0x03) => "封印已施封",

        (0x05, 0x01) => "主站认证失败",
        (0x05, 0x02) => "MAC校验失败",
        (0x05, 0x03) => "权限数据错误",

        (0x06, 0x01) => "卡片认证失败",
        (0x06, 0x02) => "卡片类型错误",
        (0x06, 0x03) => "卡片已损坏",
        (0x06, 0x04) => "客户编号不匹配",

        (0xFE, 0x01) => "升级失败",
        (0xFE, 0x02) => "升级未启动",
        _ => return None,
    };
    Some(text)
}

// ============================================================================
// Coded data-domain values
// ============================================================================

/// Operator permission level
pub fn operator_role(code: u8) -> &'static str {
    match code {
        0x01 => "普通操作员",
        0x02 => "管理员",
        0x03 => "超级管理员",
        _ => UNKNOWN_CODE,
    }
}

/// Operation type stored in an operation record
pub fn operation_kind(code: u8) -> &'static str {
    match code {
        0x01 => "身份认证",
        0x02 => "远程控制",
        0x03 => "参数设置",
        0x04 => "开户充值",
        0x05 => "密钥更新",
        0x06 => "清零",
        0x07 => "校时",
        0x08 => "封印操作",
        0x09 => "用户卡操作",
        _ => UNKNOWN_CODE,
    }
}

/// Result code stored in an operation record
pub fn operation_result(code: u8) -> &'static str {
    match code {
        0x00 => "成功",
        0x01 => "失败",
        0x02 => "中止",
        _ => UNKNOWN_CODE,
    }
}

/// Certificate selector
pub fn certificate_kind(code: u8) -> &'static str {
    match code {
        0x01 => "安全单元证书",
        0x02 => "CA证书",
        0x03 => "主站证书",
        _ => UNKNOWN_CODE,
    }
}

/// Lock/unlock request
pub fn lock_command(code: u8) -> &'static str {
    match code {
        0x00 => "解锁",
        0x01 => "锁定",
        _ => UNKNOWN_CODE,
    }
}

/// Meter remote control command (DL/T 645)
pub fn meter_control(code: u8) -> &'static str {
    match code {
        0x1A => "跳闸",
        0x1B => "合闸允许",
        0x1C => "直接合闸",
        0x2A => "报警",
        0x2B => "报警解除",
        0x3A => "保电",
        0x3B => "保电解除",
        _ => UNKNOWN_CODE,
    }
}

/// Verification verdict
pub fn check_result(code: u8) -> &'static str {
    match code {
        0x00 => "校验通过",
        0x01 => "校验不通过",
        _ => UNKNOWN_CODE,
    }
}

/// DL/T 698.45 security mode
pub fn security_mode(code: u8) -> &'static str {
    match code {
        0x01 => "明文+MAC",
        0x02 => "密文",
        0x03 => "密文+MAC",
        _ => UNKNOWN_CODE,
    }
}

/// Terminal control type
pub fn terminal_control(code: u8) -> &'static str {
    match code {
        0x01 => "遥控跳闸",
        0x02 => "允许合闸",
        0x03 => "保电投入",
        0x04 => "保电解除",
        0x05 => "剔除投入",
        0x06 => "剔除解除",
        _ => UNKNOWN_CODE,
    }
}

/// Seal operation type
pub fn seal_operation(code: u8) -> &'static str {
    match code {
        0x01 => "施封",
        0x02 => "拆封",
        _ => UNKNOWN_CODE,
    }
}

/// User card type
pub fn card_kind(code: u8) -> &'static str {
    match code {
        0x01 => "开户卡",
        0x02 => "购电卡",
        0x03 => "补卡",
        _ => UNKNOWN_CODE,
    }
}

// ============================================================================
// Composite unit status byte
// ============================================================================

/// Work state, bits 7-4 of the unit status byte
pub fn unit_work_state(nibble: u8) -> &'static str {
    match nibble {
        0x0 => "正常",
        0x1 => "初始化中",
        0x2 => "已锁定",
        0x3 => "故障",
        _ => UNKNOWN_CODE,
    }
}

/// ESAM chip state, bits 3-2 of the unit status byte
pub fn unit_chip_state(bits: u8) -> &'static str {
    match bits {
        0b00 => "正常",
        0b01 => "未检测到",
        0b10 => "故障",
        _ => UNKNOWN_CODE,
    }
}

/// Operator card state, bits 1-0 of the unit status byte
pub fn unit_card_state(bits: u8) -> &'static str {
    match bits {
        0b00 => "未插卡",
        0b01 => "已插卡",
        0b10 => "已认证",
        _ => "异常",
    }
}
