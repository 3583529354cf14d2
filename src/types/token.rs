use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body returned by the auth endpoint on success. Only `id_token` is read;
/// anything else the endpoint sends is kept as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub id_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<Value>,
}

impl TokenResponse {
    /// Read the response from any json document. A document that is not an
    /// object carries no token. A non-string `id_token` is an error.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        match value {
            Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }

    pub fn token(&self) -> Option<Token> {
        self.id_token.as_deref().map(Token::new)
    }
}

/// Identity token held in memory by the dashboard. Opaque, never validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token(<{} bytes>)", self.0.len())
    }
}
