use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::ArtifactError;

/// Opaque caller token used as the key of an artifact set.
///
/// Only `[A-Za-z0-9_-]{1,64}` is accepted so the token can name files
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

fn identity_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("identity pattern compiles"))
}

impl CallerIdentity {
    pub fn new(token: impl Into<String>) -> Result<Self, ArtifactError> {
        let token = token.into();
        if identity_pattern().is_match(&token) {
            Ok(Self(token))
        } else {
            Err(ArtifactError::InvalidIdentity(token))
        }
    }

    /// Fresh random identity: 128 bits as 32 hex digits
    pub fn generate() -> Self {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().gen();
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
