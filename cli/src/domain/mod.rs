//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod instance;
pub mod parse;
pub mod poll;
pub mod stage;
pub mod workload;

pub use config::{
    DestroyVariant, OutputFormat, SkiffConfig, validate_config_key, validate_config_value,
};
pub use error::{
    CleanupError, ConfigError, PreflightError, ProvisionError, ReadinessError, RemoteError,
};
pub use instance::{InstanceHandle, InstanceRequest, Readiness};
pub use parse::{JsonOutputParser, ProviderOutputParser, TextOutputParser, parser_for};
pub use poll::PollPolicy;
pub use stage::{CleanupOutcome, RunOutcome, RunReport, Stage};
