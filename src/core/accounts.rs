use log::warn;

pub const ACCOUNTS_ENV: &str = "UNICOM_ACCOUNTS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginMethod {
    /// `ecs_token` used as is
    SessionToken(String),
    /// exchanged against an `ecs_token` through the online login
    OnlineToken { token_online: String, app_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountCredential {
    pub phone: String,
    pub login: LoginMethod,
}

/// Parses newline separated `phone#ecs_token` or `phone#token_online#appid` lines.
///
/// Lines with a single field cannot be used and are skipped.
pub fn parse_accounts(raw: &str) -> Vec<AccountCredential> {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Option<AccountCredential> {
    let parts: Vec<&str> = line.split('#').collect();
    let phone = parts[0].to_string();

    let login = match parts.len() {
        2 => LoginMethod::SessionToken(parts[1].to_string()),
        n if n >= 3 => LoginMethod::OnlineToken {
            token_online: parts[1].to_string(),
            app_id: parts[2].to_string(),
        },
        _ => {
            warn!("ignoring account line without token: {phone}");
            return None;
        }
    };

    Some(AccountCredential { phone, login })
}

/// Raw content of the accounts variable, `None` when unset or blank
pub fn read_accounts_from_env() -> Option<String> {
    match std::env::var(ACCOUNTS_ENV) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

pub fn print_usage() {
    eprintln!("❌ 未设置环境变量 {ACCOUNTS_ENV}");
    eprintln!("示例：");
    eprintln!("  手机号#ecs_token");
    eprintln!("  手机号#token_online#appid");
}
