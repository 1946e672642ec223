//! Auto-delete after inactivity.

use crate::entry::Entry;
use crate::errors::AppResult;
use crate::settings::SettingsRecord;
use crate::store::ObjectStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Deletes every entry if the app has not been opened within the configured period.
///
/// Call this before stamping the current launch with [`SettingsRecord::touch`].
/// Returns the number of entries deleted.
pub fn purge_if_inactive(
    entries: &dyn ObjectStore<Entry>,
    record: &SettingsRecord,
    now: DateTime<Utc>,
) -> AppResult<usize> {
    let Some(period) = record.settings.auto_delete.period() else {
        return Ok(0);
    };

    let inactive_for = now.signed_duration_since(record.last_active_at);
    if inactive_for <= period {
        debug!(
            "Inactive for {} days, below the {} auto-delete period",
            inactive_for.num_days(),
            record.settings.auto_delete
        );
        return Ok(0);
    }

    let doomed = entries.fetch_all()?;
    for entry in &doomed {
        entries.delete(entry)?;
    }
    info!(
        "Deleted {} entries after {} days of inactivity",
        doomed.len(),
        inactive_for.num_days()
    );
    Ok(doomed.len())
}
