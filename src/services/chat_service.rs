//! 营销站"AI 助手"的关键词应答
//!
//! 没有真实模型，按关键词匹配返回固定话术；匹配不到时回退到
//! 默认回答。

/// 关键词 → 固定话术
const KEYWORD_REPLIES: &[(&[&str], &str)] = &[
    (
        &["hello", "hi", "hey"],
        "Hi there! I'm the Launchlist assistant. Ask me about the waitlist, referrals or the upcoming launch.",
    ),
    (
        &["waitlist", "signup", "sign up", "join"],
        "You can join the waitlist right from the landing page - just submit your name and email. You'll get a personal referral code to share.",
    ),
    (
        &["referral", "refer", "invite", "code"],
        "Every waitlist member gets a unique referral code. Share it with friends: each signup that uses your code moves you up the list.",
    ),
    (
        &["launch", "when", "release", "date"],
        "We haven't announced an exact launch date yet. Waitlist members will be the first to know - watch your inbox!",
    ),
    (
        &["course", "learn", "education", "tutorial"],
        "Our learning track covers blockchain fundamentals through advanced DeFi topics. Early waitlist members get first access to the curriculum.",
    ),
];

const DEFAULT_REPLY: &str =
    "I can help with questions about the waitlist, referral codes and the launch. What would you like to know?";

/// Chat 应答服务
pub struct ChatService;

impl ChatService {
    pub fn new() -> Self {
        Self
    }

    /// 关键词匹配，命中第一条规则即返回
    pub fn reply(&self, message: &str) -> &'static str {
        let normalized = message.to_lowercase();

        for (keywords, reply) in KEYWORD_REPLIES {
            if keywords.iter().any(|kw| normalized.contains(kw)) {
                return reply;
            }
        }

        DEFAULT_REPLY
    }
}

impl Default for ChatService {
    fn default() -> Self {
        Self::new()
    }
}
