//! Mutating board commands.
//!
//! Each command subscribes the column renderer before touching the board
//! (unless output is JSON or quiet), so every committed change re-renders
//! through the ordinary notification path.

use std::rc::Rc;

use crate::board::Board;
use crate::error::{Error, Result};
use crate::gesture::{DragCoordinator, DropOutcome};
use crate::output::{emit_success, OutputOptions};
use crate::task::{Level, Status, TaskId};

use super::view::ColumnRenderer;

fn attach_renderer(board: &mut Board, options: OutputOptions) {
    if !options.json && !options.quiet {
        board.subscribe(Rc::new(ColumnRenderer));
    }
}

fn cloned_task(board: &Board, id: TaskId) -> Result<crate::task::Task> {
    board
        .find_task(id)
        .cloned()
        .ok_or(Error::TaskNotFound(id))
}

/// Options for `quadro add`
pub struct AddOptions {
    pub description: String,
    pub urgency: Option<String>,
    pub priority: Option<String>,
    pub details: Option<String>,
    pub board: Board,
    pub options: OutputOptions,
}

pub fn run_add(opts: AddOptions) -> Result<()> {
    let AddOptions {
        description,
        urgency,
        priority,
        details,
        mut board,
        options,
    } = opts;

    let urgency = urgency.map(|raw| raw.parse::<Level>()).transpose()?;
    let priority = priority.map(|raw| raw.parse::<Level>()).transpose()?;

    attach_renderer(&mut board, options);

    let id = board.add_task(&description)?;
    if let Some(level) = urgency {
        board.update_task_urgency(id, level)?;
    }
    if let Some(level) = priority {
        board.update_task_priority(id, level)?;
    }
    if let Some(text) = details {
        board.update_task_details(id, &text)?;
    }

    let task = cloned_task(&board, id)?;
    emit_success(
        options,
        "add",
        &task,
        &[format!("Task {id} added to todo")],
    )
}

/// Options for `quadro edit`
pub struct EditOptions {
    pub id: TaskId,
    pub description: String,
    pub board: Board,
    pub options: OutputOptions,
}

pub fn run_edit(opts: EditOptions) -> Result<()> {
    let EditOptions {
        id,
        description,
        mut board,
        options,
    } = opts;

    attach_renderer(&mut board, options);
    let changed = board.update_task(id, &description)?;

    let task = cloned_task(&board, id)?;
    let line = if changed {
        format!("Task {id} updated")
    } else {
        format!("Task {id} unchanged")
    };
    emit_success(options, "edit", &task, &[line])
}

/// Options for `quadro status`
pub struct StatusOptions {
    pub id: TaskId,
    pub status: String,
    pub board: Board,
    pub options: OutputOptions,
}

pub fn run_status(opts: StatusOptions) -> Result<()> {
    let StatusOptions {
        id,
        status,
        mut board,
        options,
    } = opts;

    let status: Status = status.parse()?;
    attach_renderer(&mut board, options);
    let changed = board.update_task_status(id, status)?;

    let task = cloned_task(&board, id)?;
    let line = if changed {
        format!("Task {id} moved to {status}")
    } else {
        format!("Task {id} is already in {status}")
    };
    emit_success(options, "status", &task, &[line])
}

/// Which classification axis a level applies to
#[derive(Debug, Clone, Copy)]
pub enum LevelAxis {
    Urgency,
    Priority,
}

/// Options for `quadro urgency` / `quadro priority`
pub struct LevelOptions {
    pub id: TaskId,
    pub level: String,
    pub axis: LevelAxis,
    pub board: Board,
    pub options: OutputOptions,
}

pub fn run_level(opts: LevelOptions) -> Result<()> {
    let LevelOptions {
        id,
        level,
        axis,
        mut board,
        options,
    } = opts;

    let level: Level = level.parse()?;
    attach_renderer(&mut board, options);
    let (command, changed) = match axis {
        LevelAxis::Urgency => ("urgency", board.update_task_urgency(id, level)?),
        LevelAxis::Priority => ("priority", board.update_task_priority(id, level)?),
    };

    let task = cloned_task(&board, id)?;
    let line = if changed {
        format!("Task {id} {command} set to {level}")
    } else {
        format!("Task {id} {command} already {level}")
    };
    emit_success(options, command, &task, &[line])
}

/// Options for `quadro details`
pub struct DetailsOptions {
    pub id: TaskId,
    pub text: String,
    pub board: Board,
    pub options: OutputOptions,
}

pub fn run_details(opts: DetailsOptions) -> Result<()> {
    let DetailsOptions {
        id,
        text,
        mut board,
        options,
    } = opts;

    attach_renderer(&mut board, options);
    let changed = board.update_task_details(id, &text)?;

    let task = cloned_task(&board, id)?;
    let line = if changed {
        format!("Task {id} details updated")
    } else {
        format!("Task {id} details unchanged")
    };
    emit_success(options, "details", &task, &[line])
}

pub fn run_rm(mut board: Board, id: TaskId, options: OutputOptions) -> Result<()> {
    attach_renderer(&mut board, options);
    board.delete_task(id)?;

    emit_success(
        options,
        "rm",
        &serde_json::json!({ "id": id, "deleted": true }),
        &[format!("Task {id} deleted")],
    )
}

pub fn run_move(mut board: Board, id: TaskId, index: usize, options: OutputOptions) -> Result<()> {
    attach_renderer(&mut board, options);
    let moved = board.move_task(id, index)?;

    let line = if moved {
        format!("Task {id} moved to position {index}")
    } else {
        format!("Task {id} already at position {index}")
    };
    emit_success(
        options,
        "move",
        &serde_json::json!({ "id": id, "index": index, "moved": moved }),
        &[line],
    )
}

pub fn run_clear(mut board: Board, options: OutputOptions) -> Result<()> {
    attach_renderer(&mut board, options);
    let cleared = board.clear_all();

    let line = if cleared {
        "Board cleared".to_string()
    } else {
        "Board already empty".to_string()
    };
    emit_success(
        options,
        "clear",
        &serde_json::json!({ "cleared": cleared }),
        &[line],
    )
}

/// Options for `quadro drag`
pub struct DragOptions {
    pub id: TaskId,
    pub column: String,
    pub board: Board,
    pub options: OutputOptions,
}

/// Drive a full drag gesture from the CLI: begin on the task, drop on
/// the named column.
pub fn run_drag(opts: DragOptions) -> Result<()> {
    let DragOptions {
        id,
        column,
        mut board,
        options,
    } = opts;

    let column: Status = column.parse()?;
    attach_renderer(&mut board, options);

    let mut coordinator = DragCoordinator::new();
    coordinator.begin_drag(&board, id)?;
    let outcome = coordinator.drop_on(&mut board, &[Some(column)])?;

    let (line, data) = match outcome {
        DropOutcome::Moved { task_id, from, to } => (
            format!("Task {task_id} dragged from {from} to {to}"),
            serde_json::json!({
                "taskId": task_id,
                "outcome": "moved",
                "from": from,
                "to": to,
            }),
        ),
        DropOutcome::SameColumn => (
            format!("Task {id} stayed in {column}"),
            serde_json::json!({ "taskId": id, "outcome": "same_column" }),
        ),
    };
    emit_success(options, "drag", &data, &[line])
}
