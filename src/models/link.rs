use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

/// Random alphanumeric token addressing one payment request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LinkToken(String);

impl LinkToken {
    /// Draw a fresh token of `len` characters from `[A-Za-z0-9]`
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Self {
        let token = rng
            .sample_iter(&Alphanumeric)
            .take(len)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Wrap an existing token (used for seeded sample activity)
    pub fn from_static(token: &str) -> Self {
        Self(token.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LinkToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shareable link in the form `<host>/<token>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentLink {
    host: String,
    token: LinkToken,
}

impl PaymentLink {
    pub fn new(host: &str, token: LinkToken) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn token(&self) -> &LinkToken {
        &self.token
    }

    pub fn url(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PaymentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.token)
    }
}

impl Serialize for PaymentLink {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
