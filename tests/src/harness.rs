//! Test gateway: the real submission service and registry client wired to
//! a `SimulatedLedger` through one commit event hub.

use lg_01_submission::{
    ConfigError, EnrollmentDirectory, GatewayConfig, NetworkHandle, SimulatedLedger,
    SubmissionService,
};
use lg_02_registry::{IntoOperation, NewEmployee, RegistryClient};
use shared_bus::CommitEventHub;
use shared_types::{Operation, PeerEndpoint, SigningIdentity};
use std::sync::Arc;

pub struct TestGateway {
    pub hub: Arc<CommitEventHub>,
    pub ledger: Arc<SimulatedLedger>,
    pub service: Arc<SubmissionService>,
    pub registry: RegistryClient,
}

impl TestGateway {
    /// Default configuration with the given endorsing peers.
    pub fn with_peers(peers: &[&str]) -> Self {
        let mut config = GatewayConfig::default();
        config.network.peers = peers
            .iter()
            .enumerate()
            .map(|(i, name)| PeerEndpoint::new(*name, format!("grpc://localhost:{}", 7051 + i * 1000)))
            .collect();
        Self::from_config(&config).expect("default submission limits are valid")
    }

    /// Gateway for `config`. Unusable submission limits are refused here.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ConfigError> {
        let hub = Arc::new(CommitEventHub::new());
        let ledger = Arc::new(SimulatedLedger::new(hub.clone()));
        let identities = EnrollmentDirectory::new(config.identity.label.clone()).with_identity(
            SigningIdentity::enrolled(
                config.identity.label.clone(),
                config.identity.msp_id.clone(),
                "-----BEGIN CERTIFICATE-----\nTEST\n-----END CERTIFICATE-----",
            ),
        );

        let service = Arc::new(SubmissionService::with_config(
            Arc::new(NetworkHandle::from(&config.network)),
            ledger.clone(),
            Arc::new(identities),
            hub.clone(),
            config.submission.clone(),
        )?);
        let registry = RegistryClient::new(service.clone());

        Ok(Self {
            hub,
            ledger,
            service,
            registry,
        })
    }
}

/// A complete init-employee request for record `id`.
pub fn new_employee(id: &str) -> NewEmployee {
    NewEmployee {
        id: id.to_string(),
        employee_name: format!("Employee {id}"),
        designation: "Engineer".to_string(),
        dob: "1990-01-01".to_string(),
        domain_id: "d1".to_string(),
        domain_name: "Engineering".to_string(),
        company_id: "c1".to_string(),
        company_name: "Acme".to_string(),
    }
}

/// init-employee as a raw operation.
pub fn init_employee(id: &str) -> Operation {
    new_employee(id)
        .into_operation()
        .expect("init-employee takes eight arguments")
}
