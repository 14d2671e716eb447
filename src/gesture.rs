//! Drag-and-drop coordinator.
//!
//! One drag gesture is an explicit state machine,
//! `Idle -> Dragging -> (Dropped | Cancelled) -> Idle`, modelled
//! independently of any event-delivery mechanism so it is testable
//! without a rendering surface. The coordinator resolves drop targets,
//! delegates the status transition to the board, and guarantees that the
//! transient drag state is cleared on every exit path.

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::board::Board;
use crate::error::{Error, Result};
use crate::task::{Status, TaskId};

/// The in-gesture record: the dragged task, the column it started in,
/// and the current drop candidate.
///
/// The serialized form (`taskId`, `sourceStatus`) is the transient drop
/// payload handed to host surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gesture {
    pub task_id: TaskId,
    pub source_status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_candidate: Option<Status>,
}

/// How a drop resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// The task changed column.
    Moved {
        task_id: TaskId,
        from: Status,
        to: Status,
    },
    /// Dropped on the column it came from: a no-op cancellation with
    /// zero mutations.
    SameColumn,
}

/// Transient visual hooks for the host surface.
///
/// Default implementations do nothing, so hosts override only the
/// affordances they render. Effect failures are logged and never
/// interfere with gesture cleanup.
pub trait GestureEffects {
    /// A gesture started: highlight the valid drop targets.
    fn drag_started(&self, gesture: &Gesture) -> Result<()> {
        let _ = gesture;
        Ok(())
    }

    /// A drop committed: play the success affordance.
    fn drop_committed(&self, task_id: TaskId, to: Status) -> Result<()> {
        let _ = (task_id, to);
        Ok(())
    }

    /// The gesture ended (dropped or cancelled): remove the affordances.
    fn gesture_ended(&self) -> Result<()> {
        Ok(())
    }
}

/// Resolve a drop target's column from its ancestor chain, innermost
/// first. A node nested inside a column resolves to that column's status
/// even when it carries none of its own.
pub fn resolve_drop_status(chain: &[Option<Status>]) -> Option<Status> {
    chain.iter().copied().flatten().next()
}

#[derive(Debug, Default, Clone, Copy)]
enum Phase {
    #[default]
    Idle,
    Dragging(Gesture),
}

/// Coordinator for drag gestures.
///
/// At most one gesture is active at a time; a new drag while one is in
/// progress implicitly cancels the prior gesture.
#[derive(Default)]
pub struct DragCoordinator {
    phase: Phase,
    effects: Vec<Rc<dyn GestureEffects>>,
}

impl DragCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a visual-effects sink.
    pub fn add_effects(&mut self, effects: Rc<dyn GestureEffects>) {
        self.effects.push(effects);
    }

    /// Whether a gesture is currently in progress.
    pub fn is_drag_active(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    /// The in-progress gesture record, if any.
    pub fn current_gesture(&self) -> Option<&Gesture> {
        match &self.phase {
            Phase::Dragging(gesture) => Some(gesture),
            Phase::Idle => None,
        }
    }

    /// Begin a gesture on `task_id`.
    ///
    /// Overlapping gestures are not expected; if one is active it is
    /// cancelled (with a warning) before the new gesture starts.
    pub fn begin_drag(&mut self, board: &Board, task_id: TaskId) -> Result<()> {
        if self.is_drag_active() {
            warn!(task_id, "drag started while another gesture was active; cancelling prior gesture");
            self.cancel();
        }

        let task = board.find_task(task_id).ok_or(Error::TaskNotFound(task_id))?;
        let gesture = Gesture {
            task_id,
            source_status: task.status(),
            target_candidate: None,
        };
        self.phase = Phase::Dragging(gesture);
        debug!(task_id, source = %gesture.source_status, "drag started");
        self.emit(|effects| effects.drag_started(&gesture));
        Ok(())
    }

    /// Refresh the drop candidate from the hovered target's ancestor
    /// chain. Ignored while idle.
    pub fn update_target(&mut self, chain: &[Option<Status>]) {
        if let Phase::Dragging(gesture) = &mut self.phase {
            gesture.target_candidate = resolve_drop_status(chain);
        }
    }

    /// Drop the dragged task on a target.
    ///
    /// The target's column is resolved through its ancestor chain. A
    /// same-column drop is a no-op cancellation; an unresolvable target
    /// cancels the gesture with [`Error::MissingDropTarget`]. Whatever
    /// happens, the gesture is over afterwards and the affordances are
    /// removed.
    pub fn drop_on(&mut self, board: &mut Board, chain: &[Option<Status>]) -> Result<DropOutcome> {
        let Phase::Dragging(gesture) = std::mem::take(&mut self.phase) else {
            return Err(Error::NoActiveGesture);
        };

        let outcome = self.commit_drop(board, gesture, chain);
        self.emit(|effects| effects.gesture_ended());
        outcome
    }

    /// Cancel any in-progress gesture. Idempotent; a cancelled gesture
    /// never mutates the board.
    pub fn cancel(&mut self) {
        if let Phase::Dragging(gesture) = std::mem::take(&mut self.phase) {
            debug!(task_id = gesture.task_id, "drag cancelled");
            self.emit(|effects| effects.gesture_ended());
        }
    }

    fn commit_drop(
        &self,
        board: &mut Board,
        gesture: Gesture,
        chain: &[Option<Status>],
    ) -> Result<DropOutcome> {
        let Some(target) = resolve_drop_status(chain) else {
            warn!(task_id = gesture.task_id, "drop target carries no column status; gesture cancelled");
            return Err(Error::MissingDropTarget);
        };

        if target == gesture.source_status {
            debug!(task_id = gesture.task_id, "dropped on the source column; nothing to do");
            return Ok(DropOutcome::SameColumn);
        }

        let changed = board.update_task_status(gesture.task_id, target)?;
        if !changed {
            return Ok(DropOutcome::SameColumn);
        }

        self.emit(|effects| effects.drop_committed(gesture.task_id, target));
        Ok(DropOutcome::Moved {
            task_id: gesture.task_id,
            from: gesture.source_status,
            to: target,
        })
    }

    fn emit(&self, call: impl Fn(&dyn GestureEffects) -> Result<()>) {
        for effects in &self.effects {
            if let Err(err) = call(effects.as_ref()) {
                warn!("gesture effect failed: {err}");
            }
        }
    }
}
