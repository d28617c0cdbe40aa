use taskpad::board::TaskBoard;
use taskpad::storage::{KeyValueStore, MemoryStore, Storage, FILTER_KEY, TASKS_KEY};
use taskpad::task::{FilterStatus, Priority, Task};
use taskpad::view;

fn assert_consistent(board: &TaskBoard) {
    let counts = board.counts();
    assert_eq!(counts.all, board.tasks().len());
    assert_eq!(counts.completed + counts.pending, counts.all);

    for filter in [FilterStatus::All, FilterStatus::Completed, FilterStatus::Pending] {
        let visible = view::visible_tasks(board.tasks(), filter);
        assert_eq!(visible.len(), counts.for_filter(filter));
        assert!(visible.iter().all(|task| filter.matches(task.completed)));
    }

    let visible = board.visible_tasks();
    assert_eq!(visible, view::visible_tasks(board.tasks(), board.filter()));

    let mut ids: Vec<&str> = board.tasks().iter().map(|t| t.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), board.tasks().len(), "ids must be unique");

    for task in board.tasks() {
        assert!(task.updated_at >= task.created_at);
        assert!(!task.title.trim().is_empty());
    }
    assert!(board.completion_rate() <= 100);
}

#[test]
fn operation_sequence_keeps_invariants() {
    let backend = MemoryStore::new();
    let mut board = TaskBoard::load(Storage::new(backend.clone()));

    let mut ids = Vec::new();
    for (n, priority) in Priority::ALL.iter().cycle().take(12).enumerate() {
        ids.push(board.add(&format!("task {n}"), *priority).id.clone());
        assert_consistent(&board);
    }

    for id in ids.iter().step_by(3) {
        board.toggle(id);
        assert_consistent(&board);
    }
    board.set_filter(FilterStatus::Completed);
    assert_consistent(&board);
    assert_eq!(board.visible_tasks().len(), 4);

    board.delete(&ids[0]);
    board.edit_title(&ids[1], "renamed");
    board.set_priority(&ids[2], Priority::High);
    board.set_filter(FilterStatus::Pending);
    assert_consistent(&board);

    assert_eq!(board.counts().all, 11);
    assert_eq!(board.counts().completed, 3);
    assert_eq!(board.completion_rate(), 27);

    // most recently added first
    assert_eq!(board.tasks()[0].title, "task 11");
    assert_eq!(board.tasks().last().map(|t| t.id.as_str()), Some(ids[1].as_str()));
}

#[test]
fn reload_restores_tasks_and_filter() {
    let backend = MemoryStore::new();
    let mut board = TaskBoard::load(Storage::new(backend.clone()));
    let id = board.add("Persist me", Priority::High).id.clone();
    board.toggle(&id);
    board.set_filter(FilterStatus::Completed);
    let saved: Vec<Task> = board.tasks().to_vec();

    let reloaded = TaskBoard::load(Storage::new(backend.clone()));
    assert_eq!(reloaded.tasks(), saved.as_slice());
    assert_eq!(reloaded.filter(), FilterStatus::Completed);
    assert_eq!(reloaded.visible_tasks().len(), 1);
    assert!(backend.get(TASKS_KEY).unwrap().is_some());
    assert!(backend.get(FILTER_KEY).unwrap().is_some());
}

#[test]
fn double_toggle_restores_completion() {
    let mut board = TaskBoard::load(Storage::new(MemoryStore::new()));
    let id = board.add("Flip", Priority::Medium).id.clone();
    let created = board.get(&id).unwrap().created_at;

    board.toggle(&id);
    board.toggle(&id);
    let task = board.get(&id).unwrap();
    assert!(!task.completed);
    assert_eq!(task.created_at, created);
    assert!(task.updated_at >= created);
}

#[test]
fn file_store_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut board = TaskBoard::load(Storage::open_dir(dir.path(), 1000));
    board.add("On disk", Priority::Low);
    board.set_filter(FilterStatus::Pending);

    assert!(dir.path().join("tasks.json").exists());
    assert!(dir.path().join("taskFilter.json").exists());

    let reloaded = TaskBoard::load(Storage::open_dir(dir.path(), 1000));
    assert_eq!(reloaded.tasks()[0].title, "On disk");
    assert_eq!(reloaded.tasks()[0].priority, Priority::Low);
    assert_eq!(reloaded.filter(), FilterStatus::Pending);
}
