//! Board store: owner of the task collection.
//!
//! The board holds the ordered task sequence, the subscriber list, and a
//! pluggable persistence sink. Every committed mutation serializes the
//! whole collection under the configured storage key and then notifies
//! subscribers; validation failures and no-ops commit nothing. Observers
//! receive read-only views and their failures are isolated: a subscriber
//! error never rolls back the mutation or starves other subscribers.

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::BoardConfig;
use crate::error::{Error, Result};
use crate::storage::SnapshotStore;
use crate::task::{is_valid_task_data, Level, Status, Task, TaskId};

/// Handle returned by [`Board::subscribe`].
///
/// Passing it back to [`Board::unsubscribe`] removes exactly that
/// subscriber, so teardown is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Change subscriber.
///
/// Invoked after every committed mutation with a read-only view of the
/// task sequence. Returning an error is tolerated and logged.
pub trait BoardObserver {
    fn board_changed(&self, tasks: &[Task]) -> Result<()>;
}

/// Per-column counts plus the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardStats {
    pub todo: usize,
    pub progress: usize,
    pub done: usize,
    pub total: usize,
}

/// Outcome of an import: records kept and records filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// The task store.
pub struct Board {
    tasks: Vec<Task>,
    observers: Vec<(SubscriptionId, Rc<dyn BoardObserver>)>,
    next_subscription: u64,
    store: Box<dyn SnapshotStore>,
    config: BoardConfig,
}

impl Board {
    /// Create a board backed by `store`, reloading the latest snapshot.
    ///
    /// A missing snapshot starts an empty board; a corrupt or unreadable
    /// one is logged and discarded rather than propagated.
    pub fn load(store: Box<dyn SnapshotStore>, config: BoardConfig) -> Self {
        let tasks = match store.load() {
            Ok(Some(payload)) => match serde_json::from_str::<Vec<Task>>(&payload) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!("discarding corrupt snapshot: {err}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("could not load snapshot: {err}");
                Vec::new()
            }
        };

        Self {
            tasks,
            observers: Vec::new(),
            next_subscription: 0,
            store,
            config,
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Create a task at the end of the sequence, in the `todo` column.
    pub fn add_task(&mut self, description: &str) -> Result<TaskId> {
        self.check_description_len(description)?;
        let task = Task::new(description)?;
        let id = task.id();
        self.tasks.push(task);
        debug!(id, "task added");
        self.commit();
        Ok(id)
    }

    /// Replace a task's description. `Ok(false)` when nothing changed.
    pub fn update_task(&mut self, id: TaskId, description: &str) -> Result<bool> {
        self.check_description_len(description)?;
        let task = self.find_task_mut(id)?;
        let changed = task.update_description(description)?;
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Move a task to another column. `Ok(false)` when it is already there.
    pub fn update_task_status(&mut self, id: TaskId, status: Status) -> Result<bool> {
        let task = self.find_task_mut(id)?;
        let changed = task.update_status(status);
        if changed {
            debug!(id, status = %status, "task status changed");
            self.commit();
        }
        Ok(changed)
    }

    /// Replace a task's free-text details. `Ok(false)` when unchanged.
    pub fn update_task_details(&mut self, id: TaskId, text: &str) -> Result<bool> {
        let task = self.find_task_mut(id)?;
        let changed = task.update_detailed_description(text);
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Set a task's urgency level. `Ok(false)` when unchanged.
    pub fn update_task_urgency(&mut self, id: TaskId, level: Level) -> Result<bool> {
        let task = self.find_task_mut(id)?;
        let changed = task.update_urgency_level(level);
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Set a task's priority. `Ok(false)` when unchanged.
    pub fn update_task_priority(&mut self, id: TaskId, level: Level) -> Result<bool> {
        let task = self.find_task_mut(id)?;
        let changed = task.update_priority(level);
        if changed {
            self.commit();
        }
        Ok(changed)
    }

    /// Remove the task with `id`.
    pub fn delete_task(&mut self, id: TaskId) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(Error::TaskNotFound(id))?;
        self.tasks.remove(index);
        debug!(id, "task deleted");
        self.commit();
        Ok(())
    }

    /// Reorder a task within the sequence. `Ok(false)` when `new_index`
    /// is the task's current position.
    pub fn move_task(&mut self, id: TaskId, new_index: usize) -> Result<bool> {
        let current = self
            .tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(Error::TaskNotFound(id))?;
        if new_index >= self.tasks.len() {
            return Err(Error::IndexOutOfRange {
                index: new_index,
                len: self.tasks.len(),
            });
        }
        if new_index == current {
            return Ok(false);
        }
        let task = self.tasks.remove(current);
        self.tasks.insert(new_index, task);
        self.commit();
        Ok(true)
    }

    /// Empty the board. Returns false (and notifies nobody) when the
    /// board was already empty.
    pub fn clear_all(&mut self) -> bool {
        if self.tasks.is_empty() {
            return false;
        }
        self.tasks.clear();
        self.commit();
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Look a task up by id.
    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Defensive copy of the task sequence, in board order.
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in one column, in board order.
    pub fn tasks_by_status(&self, status: Status) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.status() == status)
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search on descriptions. A blank term
    /// matches everything.
    pub fn search(&self, term: &str) -> Vec<Task> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.tasks();
        }
        self.tasks
            .iter()
            .filter(|task| task.description().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Per-column counts.
    pub fn stats(&self) -> BoardStats {
        let mut stats = BoardStats::default();
        for task in &self.tasks {
            match task.status() {
                Status::Todo => stats.todo += 1,
                Status::Progress => stats.progress += 1,
                Status::Done => stats.done += 1,
            }
        }
        stats.total = self.tasks.len();
        stats
    }

    // =========================================================================
    // Import / export
    // =========================================================================

    /// Serialize the whole collection as the snapshot format
    /// (pretty-printed JSON array of flat records).
    pub fn export_tasks(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.tasks)?)
    }

    /// Replace the collection from an exported payload.
    ///
    /// Malformed top-level JSON or a non-array payload rejects the whole
    /// import and keeps the prior state. Structurally invalid records are
    /// filtered out with a warning; the remaining records replace the
    /// collection in one step.
    pub fn import_tasks(&mut self, payload: &str) -> Result<ImportReport> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|err| Error::MalformedImport(err.to_string()))?;
        let records = value
            .as_array()
            .ok_or_else(|| Error::MalformedImport("expected a JSON array of task records".to_string()))?;

        let mut imported = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for record in records {
            if !is_valid_task_data(record) {
                warn!("skipping structurally invalid task record");
                skipped += 1;
                continue;
            }
            match serde_json::from_value::<Task>(record.clone()) {
                Ok(task) => imported.push(task),
                Err(err) => {
                    warn!("skipping undecodable task record: {err}");
                    skipped += 1;
                }
            }
        }

        let report = ImportReport {
            imported: imported.len(),
            skipped,
        };
        self.tasks = imported;
        self.commit();
        Ok(report)
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Register a change subscriber and return its handle.
    pub fn subscribe(&mut self, observer: Rc<dyn BoardObserver>) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, observer));
        id
    }

    /// Remove a subscriber. Returns false for an unknown handle.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    /// Notify every subscriber of the current state.
    ///
    /// Each subscriber runs independently; a failure is logged and the
    /// remaining subscribers are still notified.
    pub fn notify_observers(&self) {
        for (id, observer) in &self.observers {
            if let Err(err) = observer.board_changed(&self.tasks) {
                warn!(subscription = id.0, "observer failed: {err}");
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn check_description_len(&self, description: &str) -> Result<()> {
        let limit = self.config.max_description_len;
        if description.trim().chars().count() > limit {
            return Err(Error::DescriptionTooLong { limit });
        }
        Ok(())
    }

    fn find_task_mut(&mut self, id: TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Persist and notify after a committed mutation.
    fn commit(&mut self) {
        self.persist();
        self.notify_observers();
    }

    /// Snapshot the collection. Save failures are logged, never fatal.
    fn persist(&self) {
        match serde_json::to_string_pretty(&self.tasks) {
            Ok(payload) => {
                if let Err(err) = self.store.save(&payload) {
                    warn!("snapshot save failed: {err}");
                }
            }
            Err(err) => warn!("snapshot serialize failed: {err}"),
        }
    }
}
