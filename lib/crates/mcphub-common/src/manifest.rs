// lib/crates/mcphub-common/src/manifest.rs

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// File name the manifest must carry inside an uploaded archive.
pub const MANIFEST_FILENAME: &str = "mcp.json";

/// Errors produced while decoding or validating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot decode manifest: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("manifest missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Server manifest (`mcp.json`).
///
/// Every field is optional on the wire; missing or `null` values take their
/// empty default. Only `name` and `run.command` are required, see
/// [`ServerDescriptor::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerDescriptor {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub license: String,
    /// Search keywords. Order carries no meaning.
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: BTreeSet<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub repository: Repository,
    #[serde(deserialize_with = "null_as_default")]
    pub run: RunConfig,
}

/// Source repository of the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// How the server is started inside its container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    #[serde(deserialize_with = "null_as_default")]
    pub args: Vec<String>,
    /// Listening port. `0` means the server exposes nothing.
    #[serde(deserialize_with = "null_as_default")]
    pub port: u16,
}

impl ServerDescriptor {
    /// Decode a manifest document and enforce its required fields.
    ///
    /// No partially valid descriptor is ever returned.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ManifestError> {
        let descriptor: Self = serde_json::from_slice(bytes)?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Names of the required fields that are empty, in declaration order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.run.command.trim().is_empty() {
            missing.push("run.command");
        }
        missing
    }

    /// Check that `name` and `run.command` are present.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ManifestError::MissingFields(missing))
        }
    }

    /// Tag the built image is registered under.
    #[must_use]
    pub fn image_tag(&self) -> String {
        self.name.to_lowercase()
    }

    /// `run.command` followed by `run.args`.
    #[must_use]
    pub fn entrypoint(&self) -> Vec<String> {
        std::iter::once(self.run.command.clone())
            .chain(self.run.args.iter().cloned())
            .collect()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
