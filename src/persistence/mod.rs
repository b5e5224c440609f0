//! Per-tick snapshots of every actor, pushed to an external store

pub mod record;
pub mod store;

pub use record::ActorRecord;
pub use store::{DirectoryStore, MemoryStore, SnapshotStore};

use crate::actor::Actor;
use crate::core::error::{BrainsError, Result};

/// Write one record per actor, overwriting earlier ones
///
/// Every actor is attempted even if some writes fail; the failures are
/// reported together. Returns the number of records written.
pub fn save_actors<'a, S>(actors: impl IntoIterator<Item = &'a Actor>, store: &mut S) -> Result<usize>
where
    S: SnapshotStore + ?Sized,
{
    let mut written = 0;
    let mut failures = Vec::new();

    for actor in actors {
        let record = ActorRecord::from(actor);
        let outcome = record.encode().and_then(|raw| store.put(&record.key(), &raw));
        match outcome {
            Ok(()) => written += 1,
            Err(e) => failures.push(format!("{}: {}", record.id, e)),
        }
    }

    if failures.is_empty() {
        Ok(written)
    } else {
        Err(BrainsError::Store(format!(
            "{} of {} records not saved ({})",
            failures.len(),
            written + failures.len(),
            failures.join("; ")
        )))
    }
}

/// Read every record back, skipping ones that fail to decode
pub fn load_records<S: SnapshotStore + ?Sized>(store: &S) -> Result<Vec<ActorRecord>> {
    let mut records = Vec::new();
    for key in store.keys()? {
        let Some(raw) = store.get(&key)? else {
            continue;
        };
        match ActorRecord::decode(&raw) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping unreadable record {}: {}", key, e),
        }
    }
    Ok(records)
}
