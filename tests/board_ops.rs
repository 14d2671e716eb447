mod support;

use std::rc::Rc;

use quadro::error::Error;
use quadro::task::Status;
use support::{board, FailingObserver, RecordingObserver};

#[test]
fn add_increases_count_by_one_and_lands_in_todo() {
    let mut test = board();
    let before = test.board.len();

    let id = test.board.add_task("Buy milk").unwrap();

    assert_eq!(test.board.len(), before + 1);
    assert_eq!(test.board.find_task(id).unwrap().status(), Status::Todo);
}

#[test]
fn delete_then_find_returns_none() {
    let mut test = board();
    let id = test.board.add_task("Buy milk").unwrap();
    test.board.add_task("Call the bank").unwrap();

    test.board.delete_task(id).unwrap();

    assert!(test.board.find_task(id).is_none());
    assert_eq!(test.board.len(), 1);
}

#[test]
fn status_update_drives_stats() {
    let mut test = board();
    let id = test.board.add_task("Buy milk").unwrap();

    test.board.update_task_status(id, Status::Done).unwrap();

    let stats = test.board.stats();
    assert_eq!((stats.todo, stats.progress, stats.done), (0, 0, 1));
    assert_eq!(stats.total, 1);
}

#[test]
fn committed_mutations_notify_exactly_once() {
    let mut test = board();
    let observer = Rc::new(RecordingObserver::default());
    test.board.subscribe(observer.clone());

    let id = test.board.add_task("demo").unwrap();
    assert_eq!(observer.notifications.get(), 1);

    test.board.update_task_status(id, Status::Progress).unwrap();
    assert_eq!(observer.notifications.get(), 2);

    assert_eq!(observer.last_seen.borrow().len(), 1);
    assert_eq!(
        observer.last_seen.borrow()[0].status(),
        Status::Progress
    );
}

#[test]
fn noop_mutations_do_not_notify() {
    let mut test = board();
    let id = test.board.add_task("demo").unwrap();

    let observer = Rc::new(RecordingObserver::default());
    test.board.subscribe(observer.clone());

    assert!(!test.board.update_task_status(id, Status::Todo).unwrap());
    assert!(!test.board.update_task(id, "demo").unwrap());
    assert!(!test.board.move_task(id, 0).unwrap());
    assert_eq!(observer.notifications.get(), 0);
}

#[test]
fn clear_on_empty_board_does_not_notify() {
    let mut test = board();
    let observer = Rc::new(RecordingObserver::default());
    test.board.subscribe(observer.clone());

    assert!(!test.board.clear_all());
    assert_eq!(observer.notifications.get(), 0);

    test.board.add_task("demo").unwrap();
    assert!(test.board.clear_all());
    assert_eq!(observer.notifications.get(), 2);
}

#[test]
fn failing_observer_does_not_starve_the_rest() {
    let mut test = board();
    test.board.subscribe(Rc::new(FailingObserver));
    let observer = Rc::new(RecordingObserver::default());
    test.board.subscribe(observer.clone());

    let id = test.board.add_task("demo").unwrap();

    // The mutation committed and the healthy observer still ran.
    assert!(test.board.find_task(id).is_some());
    assert_eq!(observer.notifications.get(), 1);
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut test = board();
    let observer = Rc::new(RecordingObserver::default());
    let subscription = test.board.subscribe(observer.clone());

    test.board.add_task("one").unwrap();
    assert_eq!(observer.notifications.get(), 1);

    assert!(test.board.unsubscribe(subscription));
    assert!(!test.board.unsubscribe(subscription));

    test.board.add_task("two").unwrap();
    assert_eq!(observer.notifications.get(), 1);
}

#[test]
fn observers_see_read_only_copies() {
    let mut test = board();
    let observer = Rc::new(RecordingObserver::default());
    test.board.subscribe(observer.clone());

    let id = test.board.add_task("demo").unwrap();

    // Mutating the observed view must not reach the board.
    observer.last_seen.borrow_mut()[0].update_status(Status::Done);
    assert_eq!(test.board.find_task(id).unwrap().status(), Status::Todo);
}

#[test]
fn update_task_rejects_unknown_id_without_side_effects() {
    let mut test = board();
    test.board.add_task("demo").unwrap();

    let observer = Rc::new(RecordingObserver::default());
    test.board.subscribe(observer.clone());

    assert!(matches!(
        test.board.update_task(9999, "new"),
        Err(Error::TaskNotFound(9999))
    ));
    assert_eq!(observer.notifications.get(), 0);
}

#[test]
fn move_task_failure_keeps_ordering() {
    let mut test = board();
    let a = test.board.add_task("a").unwrap();
    let b = test.board.add_task("b").unwrap();

    assert!(matches!(
        test.board.move_task(a, 5),
        Err(Error::IndexOutOfRange { index: 5, len: 2 })
    ));

    let order: Vec<_> = test.board.tasks().iter().map(|t| t.id()).collect();
    assert_eq!(order, vec![a, b]);
}

#[test]
fn search_filters_by_substring() {
    let mut test = board();
    test.board.add_task("Buy milk").unwrap();
    test.board.add_task("Buy bread").unwrap();
    test.board.add_task("Walk the dog").unwrap();

    assert_eq!(test.board.search("buy").len(), 2);
    assert_eq!(test.board.search("DOG").len(), 1);
    assert_eq!(test.board.search("").len(), 3);
}

#[test]
fn tasks_by_status_keeps_board_order() {
    let mut test = board();
    let a = test.board.add_task("a").unwrap();
    let b = test.board.add_task("b").unwrap();
    let c = test.board.add_task("c").unwrap();
    test.board.update_task_status(b, Status::Done).unwrap();

    let todo: Vec<_> = test
        .board
        .tasks_by_status(Status::Todo)
        .iter()
        .map(|t| t.id())
        .collect();
    assert_eq!(todo, vec![a, c]);
}
