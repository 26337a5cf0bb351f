//! Shared helper functions for CLI commands

use miette::Result;

use crate::cli::args::AdminLogin;
use crate::core::{auth, Config};

pub use crate::import::preview::truncate_str;

/// Check the admin login against the configured authenticator
pub fn require_admin(config: &Config, login: &AdminLogin) -> Result<()> {
    let authenticator = auth::from_config(config);
    let user = login.user.as_deref().unwrap_or_default();
    let password = login.password.as_deref().unwrap_or_default();

    if authenticator.validate(user, password) {
        Ok(())
    } else {
        tracing::warn!(user, "rejected admin login");
        Err(miette::miette!(
            help = "Pass --user and --password (or set FOLIO_USER / FOLIO_PASSWORD)",
            "Invalid admin credentials"
        ))
    }
}
