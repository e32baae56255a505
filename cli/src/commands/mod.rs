//! Command implementations

pub mod config;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod run;
pub mod version;
