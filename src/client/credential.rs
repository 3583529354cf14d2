use std::collections::BTreeMap;

/// Supplies the session credentials attached to every request, playing the
/// part of the browser cookie jar.
pub trait CredentialProvider: Send + Sync {
    /// Value of the `Cookie` header, `None` to send nothing.
    fn cookie_header(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn cookie_header(&self) -> Option<String> {
        None
    }
}

/// A fixed set of session cookies for the auth endpoint.
#[derive(Debug, Clone, Default)]
pub struct SessionCookies {
    cookies: BTreeMap<String, String>,
}

impl SessionCookies {
    pub fn new(cookies: BTreeMap<String, String>) -> Self {
        Self { cookies }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }
}

impl CredentialProvider for SessionCookies {
    fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }

        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }
}
