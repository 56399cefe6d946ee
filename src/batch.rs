//! Sequential Batch Executor
//!
//! Removes a selection of accounts one request at a time, in selection
//! order. A failed removal is recorded and the batch moves on; only
//! removals the backend confirmed are applied to the local store.

use crate::accounts::AccountStore;
use crate::api::{self, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub address: String,
    pub removed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl BatchReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn removed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.removed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.removed).count()
    }
}

/// Remove `addresses` strictly sequentially. Never issues a request
/// before the previous one completed; never aborts on a failure.
pub fn remove_accounts_sequential<S: AsRef<str>>(
    transport: &dyn Transport,
    store: &mut AccountStore,
    addresses: &[S],
) -> BatchReport {
    let mut report = BatchReport::default();

    for address in addresses {
        let address = address.as_ref();
        let removed = match api::account_remove(transport, address) {
            Ok(()) => {
                store.remove(address);
                true
            }
            Err(e) => {
                crate::log_warn!("batch", "Account removal failed, continuing", error = e);
                false
            }
        };
        report.outcomes.push(BatchOutcome {
            address: address.to_string(),
            removed,
        });
    }

    crate::log_info!(
        "batch",
        "Removal batch finished",
        attempted = report.attempted(),
        removed = report.removed_count()
    );
    report
}
