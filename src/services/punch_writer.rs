//! Punch writes with bounded retry on lock conflicts.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, warn};

use crate::config::AutoCloseSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{NewPunch, PunchEvent, PunchSlot, PunchSource};
use crate::store::{StoreError, TimeStore};

/// Result of a punch write.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    /// The punch now occupying the target slot.
    pub punch: PunchEvent,
    /// False if a concurrent writer had already filled the slot.
    pub created: bool,
}

/// Writes system punches, treating an occupied slot as success.
///
/// Lock conflicts are retried up to `max_attempts` times with linear
/// backoff; unique-key violations re-read the slot and return whatever
/// is there.
pub struct PunchWriter<S> {
    store: Arc<S>,
    settings: AutoCloseSettings,
}

impl<S: TimeStore> PunchWriter<S> {
    /// Creates a writer.
    pub fn new(store: Arc<S>, settings: AutoCloseSettings) -> Self {
        Self { store, settings }
    }

    fn max_attempts(&self) -> u32 {
        self.settings.max_attempts.max(1)
    }

    async fn back_off(&self, employee_id: &str, date: NaiveDate, attempt: u32, message: &str) {
        warn!(
            employee_id,
            date = %date,
            attempt,
            max_attempts = self.max_attempts(),
            error = message,
            "Lock conflict writing punch"
        );
        if attempt < self.max_attempts() {
            tokio::time::sleep(self.settings.backoff_for(attempt)).await;
        }
    }

    fn exhausted(&self, employee_id: &str, date: NaiveDate) -> EngineError {
        error!(
            employee_id,
            date = %date,
            attempts = self.max_attempts(),
            "Giving up on punch write after repeated lock conflicts"
        );
        EngineError::TransientConflict {
            employee_id: employee_id.to_string(),
            date,
            attempts: self.max_attempts(),
        }
    }

    async fn existing(
        &self,
        employee_id: &str,
        date: NaiveDate,
        slot: PunchSlot,
    ) -> EngineResult<Option<WriteOutcome>> {
        let found = self.store.find_punch(employee_id, date, slot).await?;
        if found.is_some() {
            debug!(
                employee_id,
                date = %date,
                slot = slot.ordinal(),
                "Slot already filled by another writer"
            );
        }
        Ok(found.map(|punch| WriteOutcome {
            punch,
            created: false,
        }))
    }

    /// Inserts a punch, or returns the one already in its slot.
    pub async fn create_punch(&self, punch: NewPunch) -> EngineResult<WriteOutcome> {
        let employee_id = punch.employee_id.clone();
        let date = punch.date();

        for attempt in 1..=self.max_attempts() {
            match self.store.insert_punch(punch.clone()).await {
                Ok(created) => {
                    debug!(
                        employee_id = %employee_id,
                        date = %date,
                        slot = created.slot.ordinal(),
                        punch_id = %created.id,
                        "Inserted punch"
                    );
                    return Ok(WriteOutcome {
                        punch: created,
                        created: true,
                    });
                }
                Err(StoreError::UniqueViolation { .. }) => {
                    if let Some(outcome) = self.existing(&employee_id, date, punch.slot).await? {
                        return Ok(outcome);
                    }
                    // The occupying punch was moved away before the re-read.
                    warn!(
                        employee_id = %employee_id,
                        date = %date,
                        attempt,
                        "Slot freed after unique violation, retrying"
                    );
                }
                Err(StoreError::LockConflict { message }) => {
                    self.back_off(&employee_id, date, attempt, &message).await;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(self.exhausted(&employee_id, date))
    }

    /// Moves an existing punch into `slot` at `timestamp` as a system correction.
    ///
    /// If the target slot is already filled, nothing changes and the
    /// occupant is returned with `created == false`.
    pub async fn relabel_punch(
        &self,
        punch: &PunchEvent,
        slot: PunchSlot,
        timestamp: NaiveDateTime,
        note: Option<String>,
    ) -> EngineResult<WriteOutcome> {
        let employee_id = punch.employee_id.as_str();
        let date = punch.date();

        for attempt in 1..=self.max_attempts() {
            let result = self
                .store
                .relabel_punch(
                    punch.id,
                    slot,
                    timestamp,
                    PunchSource::SystemAutoClose,
                    note.clone(),
                )
                .await;
            match result {
                Ok(relabeled) => {
                    debug!(
                        employee_id,
                        date = %date,
                        punch_id = %relabeled.id,
                        slot = slot.ordinal(),
                        "Relabeled punch"
                    );
                    return Ok(WriteOutcome {
                        punch: relabeled,
                        created: true,
                    });
                }
                Err(StoreError::UniqueViolation { .. } | StoreError::PunchNotFound { .. }) => {
                    if let Some(outcome) = self.existing(employee_id, date, slot).await? {
                        return Ok(outcome);
                    }
                    return Err(StoreError::PunchNotFound { punch_id: punch.id }.into());
                }
                Err(StoreError::LockConflict { message }) => {
                    self.back_off(employee_id, date, attempt, &message).await;
                }
                Err(other) => return Err(other.into()),
            }
        }

        Err(self.exhausted(employee_id, date))
    }
}
