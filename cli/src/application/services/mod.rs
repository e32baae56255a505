//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports` and never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod catalog;
pub mod config_service;
pub mod fetch;
pub mod image;
pub mod launch;
pub mod pipeline;
pub mod publish;
pub mod scaffold;
