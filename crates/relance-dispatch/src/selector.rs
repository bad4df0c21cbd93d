//! Eligibility selection for a dispatch run.

use chrono::{DateTime, Utc};

use relance_core::{tz, Client};
use relance_store::{ClientStore, StoreError};

/// Clients due for a reminder at `now` that have not already received one
/// today (Europe/Paris).
///
/// The store narrows to `date_relance ≤ end of today` (UTC cutoff computed
/// from the Paris day); the same-day filter on the last-sent marker runs
/// in-process because the store's query language has no zone-aware per-row
/// date comparison. Records come back in store order — no sort is applied.
///
/// A store error aborts the whole selection; no partial result is returned.
pub async fn select_due_clients(
    store: &dyn ClientStore,
    now: DateTime<Utc>,
) -> Result<Vec<Client>, StoreError> {
    let cutoff = tz::end_of_paris_day(now);
    let candidates = store.due_on_or_before(cutoff).await?;

    let today = tz::paris_day(now);
    Ok(candidates
        .into_iter()
        .filter(|client| match client.relance_envoyee_at {
            Some(sent_at) => tz::paris_day(sent_at) < today,
            None => true,
        })
        .collect())
}
