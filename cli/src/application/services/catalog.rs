//! Application service: list published servers.

use mcphub_common::ObjectKey;

use crate::application::ports::ObjectStore;
use crate::domain::PipelineError;

/// `author/name` references stored under `prefix`, sorted and deduplicated.
///
/// Keys that are not image archives are skipped.
pub async fn list_servers(
    store: &impl ObjectStore,
    prefix: &str,
) -> Result<Vec<String>, PipelineError> {
    let mut refs: Vec<String> = store
        .list(prefix)
        .await?
        .iter()
        .filter_map(|raw| ObjectKey::from_listing(raw))
        .map(|key| key.reference().to_string())
        .collect();
    refs.sort();
    refs.dedup();
    Ok(refs)
}
