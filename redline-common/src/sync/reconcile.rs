//! Catalog reconciler
//!
//! Ensures every source record's identity tuple is present in the catalog,
//! inserting an entry for each one that is missing and leaving all
//! pre-existing rows untouched.

use crate::db::wireframes::{self, Wireframe};
use crate::sync::source::SourceRecord;
use crate::{Error, Result};
use sqlx::SqlitePool;
use tracing::debug;

/// Reclassify a storage error raised inside the reconciliation transaction.
fn tx_err(e: Error) -> Error {
    match e {
        Error::Database(e) => Error::StorageTransactionFailed(e),
        other => other,
    }
}

/// Reconcile the catalog against the source records, in input order.
///
/// The membership check and all insertions run inside one transaction: the
/// batch commits as a unit or rolls back entirely, and two processes sharing
/// one store cannot both insert the same tuple. Duplicate tuples within the
/// source collapse to a single entry. Returns the number of rows inserted.
pub async fn reconcile(pool: &SqlitePool, records: &[SourceRecord]) -> Result<u64> {
    // Empty source is a no-op, not an error
    if records.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await.map_err(Error::StorageUnavailable)?;

    let mut present = wireframes::load_identity_set(&mut tx)
        .await
        .map_err(tx_err)?;

    let mut staged: Vec<Wireframe> = Vec::new();
    for record in records {
        let key = record.identity();
        if present.contains(&key) {
            continue;
        }

        debug!(
            "Staging new catalog entry: {}/{}/{} ({})",
            record.project, record.device, record.page_name, record.page_path
        );
        staged.push(Wireframe::new(
            record.project.clone(),
            record.device.clone(),
            record.page_name.clone(),
            record.page_path.clone(),
        ));

        // Marks the tuple present so repeated source rows collapse
        present.insert(key);
    }

    let inserted = wireframes::insert_batch(&mut tx, &staged)
        .await
        .map_err(tx_err)?;

    tx.commit().await.map_err(Error::StorageTransactionFailed)?;

    Ok(inserted)
}
