pub const ONLINE_LOGIN_FAILED: &str = "token登录失败";
pub const TICKET_FAILED: &str = "获取ticket失败";
pub const USER_TOKEN_FAILED: &str = "获取userToken失败";

/// Terminal failure of one authentication step, the reason ends up in the account report
#[derive(Debug)]
pub struct AuthenticationError {
    reason: String,
}

impl AuthenticationError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for AuthenticationError {}
