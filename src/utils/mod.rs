pub mod password;

/// Base-36 字符表（推荐码使用大写形式）
const BASE36_CHARS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// 将数值编码为定宽 base-36 字符串（高位补零）
fn encode_base36(mut value: u64, width: u32) -> String {
    let mut buf = vec![b'0'; width as usize];
    for slot in buf.iter_mut().rev() {
        *slot = BASE36_CHARS[(value % 36) as usize];
        value /= 36;
    }
    // 宽度之外的高位直接截断
    String::from_utf8(buf).expect("base36 chars are valid utf8")
}

/// 邮箱字符的 base-31 滚动哈希，按 32 位截断
pub fn referral_hash(email: &str) -> u32 {
    let mut hash: u32 = 0;
    for b in email.bytes() {
        hash = hash.wrapping_mul(31).wrapping_add(b as u32);
    }
    hash
}

/// 生成推荐码：5 位哈希段 + 4 位时间戳段，全大写，共 9 个字符
///
/// 哈希段来自邮箱的 base-31 滚动哈希，时间戳段取毫秒时间戳的
/// base-36 低位。码本身不保证全局唯一，最终由数据库唯一约束兜底；
/// 冲突时调用方带盐重新生成（见 WaitlistService::create_entry）。
pub fn generate_referral_code(email: &str) -> String {
    generate_referral_code_salted(email, 0)
}

/// 带盐变体：盐混入哈希段，用于唯一冲突后的重试
pub fn generate_referral_code_salted(email: &str, salt: u32) -> String {
    let hash = referral_hash(email) ^ salt;
    let millis = chrono::Utc::now().timestamp_millis() as u64;

    let mut code = encode_base36(hash as u64, 5);
    code.push_str(&encode_base36(millis, 4));
    code
}

/// 校验邮箱格式（与原始表单校验同级别的轻量检查，不做 RFC 全量解析）
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 255 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    // 域名必须带点且点不在首尾
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// 校验推荐码格式：大写字母数字，长度 6-16
///
/// 生成的码固定 9 位，但种子导入的历史码长度不一，这里放宽到 6-16。
pub fn is_valid_referral_code(code: &str) -> bool {
    (6..=16).contains(&code.len())
        && code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
