use percent_encoding::percent_decode_str;

/// Supplies the cross-site token attached to mutating requests.
pub trait TokenSource: Send + Sync {
    /// Looks up a token by name. Absence is not an error.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads tokens from a `Cookie`-style header value (`a=1; csrftoken=xyz`).
#[derive(Debug, Clone, Default)]
pub struct CookieTokenSource {
    cookies: String,
}

impl CookieTokenSource {
    pub fn new(cookies: impl Into<String>) -> Self {
        Self {
            cookies: cookies.into(),
        }
    }
}

impl TokenSource for CookieTokenSource {
    fn lookup(&self, name: &str) -> Option<String> {
        if name.is_empty() {
            return None;
        }
        self.cookies.split(';').map(str::trim).find_map(|cookie| {
            let value = cookie.strip_prefix(name)?.strip_prefix('=')?;
            Some(percent_decode_str(value).decode_utf8_lossy().into_owned())
        })
    }
}

/// A fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenSource {
    token: Option<String>,
}

impl StaticTokenSource {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl TokenSource for StaticTokenSource {
    fn lookup(&self, _name: &str) -> Option<String> {
        self.token.clone()
    }
}
