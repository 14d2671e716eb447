use std::cell::{Cell, RefCell};
use std::rc::Rc;

use quadro::board::{Board, BoardObserver};
use quadro::config::BoardConfig;
use quadro::error::{Error, Result};
use quadro::storage::MemoryStore;
use quadro::task::Task;

/// A board on an inspectable in-memory snapshot store.
pub struct TestBoard {
    pub board: Board,
    pub store: Rc<MemoryStore>,
}

#[allow(dead_code)]
pub fn board() -> TestBoard {
    board_with_snapshot(None)
}

pub fn board_with_snapshot(payload: Option<&str>) -> TestBoard {
    let store = Rc::new(match payload {
        Some(payload) => MemoryStore::with_payload(payload),
        None => MemoryStore::new(),
    });
    let board = Board::load(Box::new(Rc::clone(&store)), BoardConfig::default());
    TestBoard { board, store }
}

/// Observer that counts notifications and keeps the last view it saw.
#[derive(Default)]
pub struct RecordingObserver {
    pub notifications: Cell<usize>,
    pub last_seen: RefCell<Vec<Task>>,
}

impl BoardObserver for RecordingObserver {
    fn board_changed(&self, tasks: &[Task]) -> Result<()> {
        self.notifications.set(self.notifications.get() + 1);
        *self.last_seen.borrow_mut() = tasks.to_vec();
        Ok(())
    }
}

/// Observer that always fails.
#[allow(dead_code)]
pub struct FailingObserver;

impl BoardObserver for FailingObserver {
    fn board_changed(&self, _tasks: &[Task]) -> Result<()> {
        Err(Error::OperationFailed("render surface gone".to_string()))
    }
}
