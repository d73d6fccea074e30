//! Acceptor credential acquired from the system GSS library.

use identity_provider_sdk::{AcceptorCredential, Mechanism, MechanismError, NegotiationContext};
use libgssapi::context::ServerCtx;
use libgssapi::credential::{Cred, CredUsage};
use libgssapi::name::Name;
use libgssapi::oid::{GSS_MECH_KRB5, GSS_MECH_SPNEGO, GSS_NT_HOSTBASED_SERVICE, Oid, OidSet};

use super::client::KerberosContext;
use crate::config::{KEYTAB_ENV, KerberosMechanismPluginConfig};

/// Kerberos acceptor credential.
///
/// Acquired once at start-up; every context it derives shares the same GSS
/// credential handle.
pub struct KerberosCredential {
    target_name: String,
    mechanisms: Vec<Mechanism>,
    cred: Cred,
}

impl KerberosCredential {
    /// Acquire the acceptor credential for a target name and mechanism set.
    ///
    /// # Errors
    ///
    /// Returns [`MechanismError::CredentialUnavailable`] if the target name is
    /// empty, no mechanism is requested, the keytab check fails, or the GSS
    /// library cannot acquire the credential.
    pub fn new(
        target_name: impl Into<String>,
        mechanisms: Vec<Mechanism>,
        cfg: &KerberosMechanismPluginConfig,
    ) -> Result<Self, MechanismError> {
        let target_name = target_name.into();
        if target_name.trim().is_empty() {
            return Err(MechanismError::CredentialUnavailable(
                "target name is empty".to_owned(),
            ));
        }
        if mechanisms.is_empty() {
            return Err(MechanismError::CredentialUnavailable(
                "no mechanisms requested".to_owned(),
            ));
        }
        cfg.check_keytab(std::env::var(KEYTAB_ENV).ok().as_deref())?;

        let cred = acquire(&target_name, &mechanisms).map_err(|e| {
            MechanismError::CredentialUnavailable(format!(
                "cannot acquire an acceptor credential for {target_name}: {e}"
            ))
        })?;

        tracing::info!(
            target_name = %target_name,
            mechanisms = ?mechanisms,
            keytab = ?cfg.keytab,
            "Kerberos acceptor credential acquired"
        );

        Ok(Self {
            target_name,
            mechanisms,
            cred,
        })
    }
}

fn mechanism_oid(mechanism: Mechanism) -> &'static Oid {
    match mechanism {
        Mechanism::Krb5 => &GSS_MECH_KRB5,
        Mechanism::Spnego => &GSS_MECH_SPNEGO,
    }
}

fn acquire(target_name: &str, mechanisms: &[Mechanism]) -> Result<Cred, libgssapi::error::Error> {
    let name = Name::new(target_name.as_bytes(), Some(&GSS_NT_HOSTBASED_SERVICE))?
        .canonicalize(Some(&GSS_MECH_KRB5))?;
    let mut desired = OidSet::new()?;
    for mechanism in mechanisms {
        desired.add(mechanism_oid(*mechanism))?;
    }
    Cred::acquire(Some(&name), None, CredUsage::Accept, Some(&desired))
}

impl AcceptorCredential for KerberosCredential {
    fn new_context(&self) -> Result<Box<dyn NegotiationContext>, MechanismError> {
        Ok(Box::new(KerberosContext::new(ServerCtx::new(Some(
            self.cred.clone(),
        )))))
    }

    fn target_name(&self) -> &str {
        &self.target_name
    }

    fn mechanisms(&self) -> &[Mechanism] {
        &self.mechanisms
    }
}
