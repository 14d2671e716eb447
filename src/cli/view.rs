//! Read-side commands and the column renderer.

use crate::board::{Board, BoardObserver};
use crate::error::{Error, Result};
use crate::output::{emit_success, OutputOptions};
use crate::task::{Status, Task, TaskId};

/// View synchronizer for the terminal: subscribed to the board by the
/// mutating commands, it re-renders a compact column summary after every
/// committed change.
pub struct ColumnRenderer;

impl BoardObserver for ColumnRenderer {
    fn board_changed(&self, tasks: &[Task]) -> Result<()> {
        println!("{}", render_summary(tasks));
        Ok(())
    }
}

/// One-line column summary, e.g. `todo:2 | progress:1 | done:0`.
pub fn render_summary(tasks: &[Task]) -> String {
    let parts: Vec<String> = Status::ALL
        .iter()
        .map(|status| {
            let count = tasks.iter().filter(|t| t.status() == *status).count();
            format!("{status}:{count}")
        })
        .collect();
    parts.join(" | ")
}

/// Full column rendering for `quadro board`.
pub fn render_columns(tasks: &[Task]) -> Vec<String> {
    let mut lines = Vec::new();
    for status in Status::ALL {
        let column: Vec<&Task> = tasks.iter().filter(|t| t.status() == status).collect();
        lines.push(format!("{status} ({}):", column.len()));
        if column.is_empty() {
            lines.push("  (empty)".to_string());
            continue;
        }
        for task in column {
            lines.push(format!("  {}", task_line(task)));
        }
    }
    lines
}

fn task_line(task: &Task) -> String {
    let mut line = format!("[{}] {}", task.id(), task.description());
    if task.urgency_level() != crate::task::Level::Normal {
        line.push_str(&format!("  urgency:{}", task.urgency_level()));
    }
    if task.priority() != crate::task::Level::Normal {
        line.push_str(&format!("  priority:{}", task.priority()));
    }
    line
}

/// Options for `quadro ls`
pub struct LsOptions {
    pub status: Option<String>,
    pub search: Option<String>,
    pub board: Board,
    pub options: OutputOptions,
}

pub fn run_ls(opts: LsOptions) -> Result<()> {
    let LsOptions {
        status,
        search,
        board,
        options,
    } = opts;

    let status = status.map(|raw| raw.parse::<Status>()).transpose()?;

    let mut tasks = match search.as_deref() {
        Some(term) => board.search(term),
        None => board.tasks(),
    };
    if let Some(status) = status {
        tasks.retain(|task| task.status() == status);
    }

    let mut lines = Vec::new();
    if tasks.is_empty() {
        lines.push("No tasks".to_string());
    }
    for task in &tasks {
        lines.push(format!("{:>8}  {}", task.status().to_string(), task_line(task)));
    }

    emit_success(options, "ls", &tasks, &lines)
}

pub fn run_board(board: &Board, options: OutputOptions) -> Result<()> {
    let tasks = board.tasks();
    emit_success(options, "board", &tasks, &render_columns(&tasks))
}

pub fn run_show(board: &Board, id: TaskId, options: OutputOptions) -> Result<()> {
    let task = board.find_task(id).ok_or(Error::TaskNotFound(id))?;

    let lines = vec![
        format!("id:          {}", task.id()),
        format!("description: {}", task.description()),
        format!("details:     {}", task.detailed_description()),
        format!("status:      {}", task.status()),
        format!("urgency:     {}", task.urgency_level()),
        format!("priority:    {}", task.priority()),
        format!("created:     {}", task.created_at().to_rfc3339()),
        format!("updated:     {}", task.updated_at().to_rfc3339()),
    ];
    emit_success(options, "show", task, &lines)
}

pub fn run_stats(board: &Board, options: OutputOptions) -> Result<()> {
    let stats = board.stats();
    let lines = vec![
        format!("todo:     {}", stats.todo),
        format!("progress: {}", stats.progress),
        format!("done:     {}", stats.done),
        format!("total:    {}", stats.total),
    ];
    emit_success(options, "stats", &stats, &lines)
}
