//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod archive;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod run;

pub use config::{HubConfig, ResolvedPaths, StorageBackend, validate_config_key, validate_config_value};
pub use descriptor::{BuildDescriptor, Directive, generate};
pub use error::{ConfigError, PipelineError};
pub use run::{BuildResult, RunId};
