/// 内置订阅源，按顺序抓取
pub const DEFAULT_SOURCES: [&str; 3] = [
    "https://raw.githubusercontent.com/MahsaNetConfigTopic/config/refs/heads/main/xray_final.txt",
    "https://raw.githubusercontent.com/code3-dev/v-data/refs/heads/main/vip",
    "https://raw.githubusercontent.com/10ium/HiN-VPN/refs/heads/main/subscription/base64/vless",
];

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
