//! Configuration for the Kerberos mechanism plugin.

use std::path::PathBuf;

use identity_provider_sdk::MechanismError;
use serde::Deserialize;

/// Environment variable the GSS library reads the acceptor keytab from.
pub const KEYTAB_ENV: &str = "KRB5_KTNAME";

/// Plugin configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KerberosMechanismPluginConfig {
    /// Expected keytab path. Checked against `KRB5_KTNAME` at start-up.
    pub keytab: Option<PathBuf>,
}

impl KerberosMechanismPluginConfig {
    /// Check the configured keytab against the value of `KRB5_KTNAME`.
    ///
    /// Passes when no keytab is configured.
    ///
    /// # Errors
    ///
    /// Returns [`MechanismError::CredentialUnavailable`] if the keytab is not
    /// a file, or `KRB5_KTNAME` is unset or names another keytab.
    pub fn check_keytab(&self, ktname: Option<&str>) -> Result<(), MechanismError> {
        let Some(keytab) = &self.keytab else {
            return Ok(());
        };
        if !keytab.is_file() {
            return Err(MechanismError::CredentialUnavailable(format!(
                "keytab {} is not a file",
                keytab.display()
            )));
        }

        let expected = keytab.to_string_lossy();
        match ktname.map(|v| v.strip_prefix("FILE:").unwrap_or(v)) {
            Some(named) if named == expected => Ok(()),
            Some(named) => Err(MechanismError::CredentialUnavailable(format!(
                "{KEYTAB_ENV} names {named} but the configured keytab is {expected}"
            ))),
            None => Err(MechanismError::CredentialUnavailable(format!(
                "{KEYTAB_ENV} is not set; export {KEYTAB_ENV}=FILE:{expected}"
            ))),
        }
    }
}
