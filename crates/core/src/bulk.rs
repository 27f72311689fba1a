//! Per-ID outcome reporting for bulk deletes.
//!
//! A bulk delete never stops at the first failure and never rolls back: each
//! ID gets its own outcome and the caller decides how to present them.

use serde::Serialize;

use crate::types::DbId;

/// What happened to a single ID in a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted,
    /// The entity did not exist when the delete ran.
    Skipped,
    Failed { reason: String },
}

/// One row of a [`BulkDeleteReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdOutcome {
    pub id: DbId,
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
}

/// Ordered collection of per-ID outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    pub outcomes: Vec<IdOutcome>,
}

impl BulkDeleteReport {
    pub fn record(&mut self, id: DbId, outcome: DeleteOutcome) {
        self.outcomes.push(IdOutcome { id, outcome });
    }

    /// True when every existing ID was deleted. Skipped IDs do not count as failures.
    pub fn all_succeeded(&self) -> bool {
        self.failed_ids().is_empty()
    }

    pub fn deleted_ids(&self) -> Vec<DbId> {
        self.ids_where(|o| matches!(o, DeleteOutcome::Deleted))
    }

    pub fn skipped_ids(&self) -> Vec<DbId> {
        self.ids_where(|o| matches!(o, DeleteOutcome::Skipped))
    }

    pub fn failed_ids(&self) -> Vec<DbId> {
        self.ids_where(|o| matches!(o, DeleteOutcome::Failed { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn ids_where(&self, pred: impl Fn(&DeleteOutcome) -> bool) -> Vec<DbId> {
        self.outcomes
            .iter()
            .filter(|row| pred(&row.outcome))
            .map(|row| row.id)
            .collect()
    }
}
