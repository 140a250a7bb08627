//! Bearer token supply
//!
//! Login and session invalidation live outside the console; the client only
//! asks for the current token before each request.

/// Source of the bearer token attached to API requests
pub trait TokenSource: Send + Sync {
    /// Current token, or `None` to send the request unauthenticated
    fn bearer_token(&self) -> Option<String>;
}

/// A fixed token, e.g. from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl From<Option<String>> for StaticToken {
    fn from(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.trim().is_empty()))
    }
}

impl TokenSource for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_configured_token_is_anonymous() {
        assert_eq!(StaticToken::from(Some("  ".to_string())).bearer_token(), None);
        assert_eq!(StaticToken::from(None).bearer_token(), None);
        assert_eq!(
            StaticToken::from(Some("abc".to_string())).bearer_token().as_deref(),
            Some("abc")
        );
    }
}
