//! Credential resolution for the synthesis provider.
//!
//! The secret lives outside the slideshow directory by operator convention.
//! Resolution is pluggable: the binary chains the environment variable and the
//! conventional key file, tests inject a static value. Every source is a
//! cheap, side-effect-free read and may be called repeatedly.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Result, SlidevoxError};

/// Environment variable consulted by [`EnvCredential`].
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// A source of the provider API key.
pub trait CredentialSource: Send + Sync {
    /// Resolve the secret, or fail with a Configuration error naming the
    /// location the operator should fix.
    fn resolve(&self) -> Result<String>;

    /// Human-readable location, for diagnostics.
    fn describe(&self) -> String;
}

/// Fixed secret, for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticCredential(pub String);

impl CredentialSource for StaticCredential {
    fn resolve(&self) -> Result<String> {
        if self.0.trim().is_empty() {
            return Err(SlidevoxError::Configuration(
                "static credential is empty".to_string(),
            ));
        }
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "static credential".to_string()
    }
}

/// Reads the key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(API_KEY_ENV_VAR)
    }
}

impl CredentialSource for EnvCredential {
    fn resolve(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(SlidevoxError::Configuration(format!(
                "environment variable {} is not set",
                self.var
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

/// Reads the key from a text file containing an `OPENAI_API_KEY = "..."`
/// assignment (the conventional `~/keys/openai-key.js` export).
#[derive(Debug, Clone)]
pub struct KeyFileCredential {
    path: PathBuf,
}

static KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn key_pattern() -> &'static Regex {
    KEY_PATTERN.get_or_init(|| {
        Regex::new(r#"OPENAI_API_KEY\s*=\s*["']([^"']+)["']"#).expect("valid key pattern")
    })
}

impl KeyFileCredential {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSource for KeyFileCredential {
    fn resolve(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            SlidevoxError::Configuration(format!(
                "key file not found at {}: {e}",
                self.path.display()
            ))
        })?;

        match key_pattern().captures(&content) {
            Some(captures) => Ok(captures[1].trim().to_string()),
            None => Err(SlidevoxError::Configuration(format!(
                "could not find OPENAI_API_KEY assignment in {}",
                self.path.display()
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("key file {}", self.path.display())
    }
}

/// First source that resolves wins.
pub struct ChainCredential {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl ChainCredential {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// The operator-convention chain: `OPENAI_API_KEY` from the environment
    /// (a `.env` file in the slideshow directory works once the caller has
    /// loaded it), then `~/keys/openai-key.js`.
    pub fn conventional() -> Self {
        let mut sources: Vec<Box<dyn CredentialSource>> = vec![Box::new(EnvCredential::default())];
        if let Some(home) = std::env::var_os("HOME") {
            let key_file = PathBuf::from(home).join("keys").join("openai-key.js");
            sources.push(Box::new(KeyFileCredential::new(key_file)));
        }
        Self::new(sources)
    }
}

impl CredentialSource for ChainCredential {
    fn resolve(&self) -> Result<String> {
        for source in &self.sources {
            match source.resolve() {
                Ok(key) => return Ok(key),
                Err(e) => tracing::debug!(source = %source.describe(), error = %e, "credential source skipped"),
            }
        }
        Err(SlidevoxError::Configuration(format!(
            "no API key found; checked {}",
            self.describe()
        )))
    }

    fn describe(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.describe())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
