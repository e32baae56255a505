pub mod key;
pub mod manifest;

pub use key::{KeyError, ObjectKey, ServerRef};
pub use manifest::{MANIFEST_FILENAME, ManifestError, Repository, RunConfig, ServerDescriptor};
