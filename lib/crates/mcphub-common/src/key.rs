// lib/crates/mcphub-common/src/key.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Suffix of every stored image archive.
pub const ARCHIVE_SUFFIX: &str = ".tar";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{field} must not contain '/': {value}")]
    Separator { field: &'static str, value: String },

    #[error("invalid reference '{0}': expected <author>/<name>")]
    InvalidReference(String),
}

/// A published server identified by `<author>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerRef {
    pub author: String,
    pub name: String,
}

impl ServerRef {
    pub fn new(author: &str, name: &str) -> Result<Self, KeyError> {
        Ok(Self {
            author: segment("author", author)?,
            name: segment("name", name)?,
        })
    }

    /// Storage key of this server's image archive.
    #[must_use]
    pub fn object_key(&self) -> ObjectKey {
        ObjectKey(format!("{}/{}{ARCHIVE_SUFFIX}", self.author, self.name))
    }
}

impl FromStr for ServerRef {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split('/').collect::<Vec<_>>().as_slice() {
            [author, name] => Self::new(author, name),
            _ => Err(KeyError::InvalidReference(s.to_string())),
        }
    }
}

impl fmt::Display for ServerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.name)
    }
}

/// Key of an object in the image store, always `<author>/<name>.tar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(author: &str, name: &str) -> Result<Self, KeyError> {
        Ok(ServerRef::new(author, name)?.object_key())
    }

    /// Rebuild a key read back from a store listing. Returns `None` for
    /// objects that are not image archives.
    #[must_use]
    pub fn from_listing(raw: &str) -> Option<Self> {
        let stem = raw.strip_suffix(ARCHIVE_SUFFIX)?;
        let (author, name) = stem.split_once('/')?;
        Self::new(author, name).ok()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `<author>/<name>` reference this key stores.
    #[must_use]
    pub fn reference(&self) -> &str {
        self.0.strip_suffix(ARCHIVE_SUFFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn segment(field: &'static str, value: &str) -> Result<String, KeyError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(KeyError::Empty(field));
    }
    if value.contains('/') {
        return Err(KeyError::Separator {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}
