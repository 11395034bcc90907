//! API credential newtype with placeholder detection and masked display.

/// Placeholder value shipped in scaffolded config; treated as "no real key".
pub const PLACEHOLDER_KEY: &str = "YOUR_API_KEY";

/// An opaque bearer token. The inner value is never shown by `Debug`
/// (`[REDACTED]`) and only ever surfaced masked via [`Credential::masked`].
#[derive(Clone)]
pub struct Credential {
    inner: String,
}

impl Credential {
    /// Build a credential from a raw token, trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { inner: raw.into().trim().to_string() }
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Whether the token is blank or the well-known placeholder, in which
    /// case it must never be used to authenticate a request.
    pub fn is_placeholder(&self) -> bool {
        self.inner.is_empty() || self.inner == PLACEHOLDER_KEY
    }

    /// A masked form safe to print: the first four characters followed by
    /// `****`, so the full token never appears in output.
    pub fn masked(&self) -> String {
        let prefix: String = self.inner.chars().take(4).collect();
        format!("{prefix}****")
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}
