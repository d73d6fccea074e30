//! Start-up wiring: builds every collaborator from configuration and hands
//! them to the gateway.

use std::sync::Arc;

use anyhow::Context as _;
use authorizor::RoleAuthorizor;
use authorizor_sdk::AuthorizorPluginClient;
use identity_provider::NegotiateIdentityProvider;
use identity_provider_sdk::AcceptorCredential;
use service_gateway::{GatewayDeps, OperationRegistry, ServiceGateway, StatusInfo};
use static_mechanism_plugin::StaticCredential;
use svcgate_audit::TracingAuditSink;

use crate::config::{AppConfig, BackendSelection, MechanismProvider};
use crate::demo;

/// Assemble the gateway with the configured backends and the demo services.
///
/// # Errors
/// Returns an error if a backend cannot be created or the configuration is
/// rejected by the gateway.
pub fn build_gateway(cfg: &AppConfig) -> anyhow::Result<ServiceGateway> {
    let identity = Arc::new(NegotiateIdentityProvider::new(acceptor_credential(cfg)?));

    let backend = authorizor_backend(cfg)?;
    let authorizor = Arc::new(RoleAuthorizor::new(backend));
    tracing::info!(backend = authorizor.backend_name(), "Authorizor ready");

    let mut registry = OperationRegistry::new();
    demo::register(&mut registry, &cfg.negotiate.realm).context("failed to register services")?;

    let deps = GatewayDeps {
        identity,
        authorizor,
        audit: Arc::new(TracingAuditSink),
        sanitizer: None,
    };
    ServiceGateway::new(cfg.gateway(), deps, registry, status_info())
        .context("invalid gateway configuration")
}

fn acceptor_credential(cfg: &AppConfig) -> anyhow::Result<Arc<dyn AcceptorCredential>> {
    let target_name = cfg.negotiate.target_name.clone();
    let mechanisms = cfg.negotiate.mechanisms.clone();
    match cfg.mechanism.provider {
        MechanismProvider::Static => {
            let plugin_cfg = cfg.mechanism.static_plugin();
            if plugin_cfg.static_tokens.is_empty() {
                tracing::warn!("No static tokens configured: every Negotiate login will fail");
            }
            let credential = StaticCredential::new(target_name, mechanisms, &plugin_cfg)
                .context("failed to create the acceptor credential")?;
            Ok(Arc::new(credential))
        }
        #[cfg(feature = "kerberos")]
        MechanismProvider::Kerberos => {
            let credential = kerberos_mechanism_plugin::KerberosCredential::new(
                target_name,
                mechanisms,
                &cfg.mechanism.kerberos_plugin(),
            )
            .context("failed to acquire the Kerberos acceptor credential")?;
            Ok(Arc::new(credential))
        }
        #[cfg(not(feature = "kerberos"))]
        MechanismProvider::Kerberos => {
            anyhow::bail!("the kerberos provider is not compiled into this server")
        }
    }
}

fn authorizor_backend(cfg: &AppConfig) -> anyhow::Result<Arc<dyn AuthorizorPluginClient>> {
    match cfg.authorizor.selection()? {
        BackendSelection::Static(static_cfg) => {
            let service = static_authz_plugin::Service::from_config(&static_cfg)
                .context("failed to load the role file")?;
            Ok(Arc::new(service))
        }
        BackendSelection::PolicyServer(spocp_cfg) => {
            Ok(Arc::new(spocp_authz_plugin::Service::from_config(&spocp_cfg)))
        }
    }
}

fn status_info() -> StatusInfo {
    StatusInfo::new(
        Some(env!("CARGO_PKG_NAME")),
        Some(env!("CARGO_PKG_VERSION")),
        option_env!("SVCGATE_BUILD_TIME"),
    )
}
