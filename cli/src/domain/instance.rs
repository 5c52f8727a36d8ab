//! The instance handle: the one provisioned VM a run owns.

use serde::Serialize;

use crate::domain::config::InstanceConfig;

/// Creation parameters for a new instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRequest {
    pub name: String,
    pub cpus: u32,
    pub memory_gb: u32,
    pub disk_gb: u32,
    pub tier: String,
    /// Public key material (the contents of the `.pub` file).
    pub public_key: String,
    pub static_ip: bool,
}

impl InstanceRequest {
    #[must_use]
    pub fn from_config(cfg: &InstanceConfig, public_key: &str) -> Self {
        Self {
            name: cfg.name.clone(),
            cpus: cfg.cpus,
            memory_gb: cfg.memory_gb,
            disk_gb: cfg.disk_gb,
            tier: cfg.tier.clone(),
            public_key: public_key.trim().to_string(),
            static_ip: cfg.static_ip,
        }
    }
}

/// How far the instance has come towards being usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    /// Nothing exists yet.
    Pending,
    /// Create was accepted but the id is not known yet.
    Created,
    /// Create was accepted and an id is known.
    Requested,
    /// A network address was reported.
    Addressed,
    /// SSH login succeeded.
    Reachable,
}

/// In-memory record of the provisioned instance.
///
/// Only the pipeline driver mutates it. `id` is `None` until the provider
/// hands one back, which is what gates the destroy call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceHandle {
    pub name: String,
    pub id: Option<String>,
    pub address: Option<String>,
    pub cpus: u32,
    pub memory_gb: u32,
    pub disk_gb: u32,
    pub tier: String,
    pub readiness: Readiness,
}

impl InstanceHandle {
    #[must_use]
    pub fn new(cfg: &InstanceConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            id: None,
            address: None,
            cpus: cfg.cpus,
            memory_gb: cfg.memory_gb,
            disk_gb: cfg.disk_gb,
            tier: cfg.tier.clone(),
            readiness: Readiness::Pending,
        }
    }

    pub fn mark_created(&mut self) {
        self.readiness = Readiness::Created;
    }

    /// `true` when create was accepted but no id was learned, so the
    /// instance cannot be destroyed by id.
    #[must_use]
    pub fn is_unidentified(&self) -> bool {
        self.id.is_none() && self.readiness == Readiness::Created
    }

    pub fn assign_id(&mut self, id: String) {
        self.id = Some(id);
        self.readiness = Readiness::Requested;
    }

    pub fn assign_address(&mut self, address: String) {
        self.address = Some(address);
        self.readiness = Readiness::Addressed;
    }

    pub fn mark_reachable(&mut self) {
        self.readiness = Readiness::Reachable;
    }
}
