//! Integration tests for mcphub CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They never reach a container engine or the network.

mod config_command;
mod init_command;
