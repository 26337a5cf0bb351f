//! Admin authentication
//!
//! Commands that write to the store ask an [`Authenticator`] whether the
//! supplied credentials are acceptable. Which credentials are valid is a
//! configuration concern (see [`Config`]).

use crate::core::Config;

/// Something that can check an admin login
pub trait Authenticator {
    fn validate(&self, username: &str, password: &str) -> bool;
}

/// A single user name and password pair taken from configuration
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build from config; `None` unless both user and password are set
    pub fn from_config(config: &Config) -> Option<Self> {
        match (&config.admin_user, &config.admin_password) {
            (Some(user), Some(password)) if !user.is_empty() => {
                Some(Self::new(user.clone(), password.clone()))
            }
            _ => None,
        }
    }
}

impl Authenticator for StaticCredentials {
    fn validate(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

/// Accepts everyone. Used when no admin credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAccess;

impl Authenticator for OpenAccess {
    fn validate(&self, _username: &str, _password: &str) -> bool {
        true
    }
}

/// Pick the authenticator implied by the configuration
pub fn from_config(config: &Config) -> Box<dyn Authenticator> {
    match StaticCredentials::from_config(config) {
        Some(credentials) => Box::new(credentials),
        None => Box::new(OpenAccess),
    }
}
