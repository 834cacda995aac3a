//! Broker credentials.

use std::fmt;

use crate::error::ConfigError;

/// Environment variable holding the broker username.
pub const USER_VAR: &str = "MQTT_USER";

/// Environment variable holding the broker password.
pub const PASSWORD_VAR: &str = "MQTT_PASSWORD";

/// Username and password for the MQTT broker.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Source of broker credentials, loaded once before the sampling loop starts.
pub trait CredentialSource {
    fn load(&self) -> Result<Credentials, ConfigError>;
}

impl CredentialSource for Credentials {
    fn load(&self) -> Result<Credentials, ConfigError> {
        Ok(self.clone())
    }
}

/// Reads [`USER_VAR`] and [`PASSWORD_VAR`] through a lookup function.
///
/// [`EnvCredentialSource::from_env`] reads the process environment after
/// loading `.env`; [`EnvCredentialSource::with_lookup`] takes any lookup.
pub struct EnvCredentialSource<F> {
    lookup: F,
}

fn process_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

impl EnvCredentialSource<fn(&str) -> Option<String>> {
    /// Load `.env` from the working directory (if present) and read the
    /// process environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
        }

        Self {
            lookup: process_var,
        }
    }
}

impl<F> EnvCredentialSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    fn var(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }
}

impl<F> CredentialSource for EnvCredentialSource<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn load(&self) -> Result<Credentials, ConfigError> {
        let username = self.var(USER_VAR);
        let password = self.var(PASSWORD_VAR);

        match (username, password) {
            (Some(username), Some(password)) => Ok(Credentials { username, password }),
            (username, password) => {
                let mut missing = Vec::new();
                if username.is_none() {
                    missing.push(USER_VAR);
                }
                if password.is_none() {
                    missing.push(PASSWORD_VAR);
                }
                Err(ConfigError::MissingCredentials { missing })
            }
        }
    }
}
