//! Cookie-based gate in front of the Subscribe control.

/// Whether the page may offer Subscribe or must offer Login instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthGate {
    /// No authentication required.
    Open,
    /// The session cookie carries a token.
    Authenticated,
    /// No token: Subscribe is replaced by a Login redirect.
    Anonymous,
}

impl AuthGate {
    /// Classify a raw `document.cookie` string.
    pub fn from_cookie(cookie: &str, marker: &str) -> Self {
        if !marker.is_empty() && cookie.contains(marker) {
            Self::Authenticated
        } else {
            Self::Anonymous
        }
    }

    /// Whether the Subscribe control may be shown.
    pub fn allows_subscribe(self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}
