mod common;

use common::{days_later, fixed_now};
use lexicard_core::{
    is_due, next_phase, select_due_words, CoreError, Difficulty, IntervalTable, MemoryStore,
    Progress, Scheduler, Storage, Word,
};
use chrono::Duration;
use std::collections::HashMap;

#[test]
fn next_review_is_none_exactly_past_the_table() {
    let now = fixed_now();
    for days in [vec![1], vec![1, 3, 7, 14, 30, 60, 120], vec![2, 5, 9]] {
        let table = IntervalTable::new(days).unwrap();
        let len = table.len();
        let s = Scheduler::new(table);
        for p in 0..len + 5 {
            assert_eq!(s.next_review_at(p, now).is_none(), p >= len, "phase {p}");
        }
    }
}

#[test]
fn phase_transitions() {
    for p in 0..50 {
        assert_eq!(next_phase(p, Difficulty::Forgot), 0);
        assert_eq!(next_phase(p, Difficulty::Remembered), p + 1);
        let expected = if p == 0 { 0 } else { p - 1 };
        assert_eq!(next_phase(p, Difficulty::Vague), expected);
    }
}

#[test]
fn invalid_interval_tables_are_rejected() {
    assert!(matches!(IntervalTable::new(vec![]), Err(CoreError::Invalid(_))));
    assert!(matches!(IntervalTable::new(vec![1, 0, 3]), Err(CoreError::Invalid(_))));
}

#[test]
fn is_due_has_no_side_effects() {
    let now = fixed_now();
    let mut p = Progress::new(now);
    p.next_review = Some(now + Duration::hours(1));
    let first = is_due(Some(&p), now);
    let second = is_due(Some(&p), now);
    assert_eq!(first, second);
    assert!(!first);
    assert!(is_due(Some(&p), now + Duration::hours(1)));

    p.completed = true;
    p.next_review = None;
    assert!(!is_due(Some(&p), now));
}

#[test]
fn word_without_progress_is_always_due() {
    let w = Word::new("perro", "dog", "el perro ladra");
    let none = HashMap::new();
    let due = select_due_words(std::slice::from_ref(&w), &none, fixed_now() - Duration::days(10_000));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, w.id);
}

#[test]
fn select_due_skips_future_and_completed() {
    let now = fixed_now();
    let a = Word::new("a", "1", "");
    let b = Word::new("b", "2", "");
    let c = Word::new("c", "3", "");
    let mut progress = HashMap::new();
    progress.insert(a.id, Progress::new(now));
    let mut future = Progress::new(now);
    future.next_review = Some(now + Duration::days(2));
    progress.insert(b.id, future);
    let mut done = Progress::new(now);
    done.completed = true;
    done.next_review = None;
    progress.insert(c.id, done);

    let due = select_due_words(&[a.clone(), b, c], &progress, now);
    assert_eq!(due, vec![a]);
}

#[test]
fn seven_remembered_ratings_graduate_and_retire() {
    let store = MemoryStore::new();
    let w = store.add_word("casa", "house", "mi casa").unwrap();
    let s = Scheduler::default();
    let now = fixed_now();

    for expected in 1..=6u32 {
        let out = s.apply_review(&store, w.id, Difficulty::Remembered, now).unwrap();
        assert_eq!(out.progress.phase, expected);
        assert!(!out.graduated);
        assert!(out.progress.next_review.is_some());
    }

    let out = s.apply_review(&store, w.id, Difficulty::Remembered, now).unwrap();
    assert_eq!(out.progress.phase, 7);
    assert_eq!(out.progress.review_count, 7);
    assert!(out.progress.completed);
    assert!(out.progress.next_review.is_none());
    assert!(out.graduated);
    assert!(matches!(store.get_word(w.id), Err(CoreError::NotFound(_))));
    assert_eq!(store.get_progress(w.id).unwrap(), None);
    assert_eq!(store.list_reviews().unwrap().len(), 7);
}

#[test]
fn graduated_word_can_be_kept() {
    let store = MemoryStore::new();
    let w = store.add_word("uno", "one", "").unwrap();
    let s = Scheduler::new(IntervalTable::new(vec![1]).unwrap()).with_retire_graduated(false);
    let now = fixed_now();

    let out = s.apply_review(&store, w.id, Difficulty::Remembered, now).unwrap();
    assert!(out.graduated);
    assert!(store.get_word(w.id).is_ok());
    let p = store.get_progress(w.id).unwrap().unwrap();
    assert!(p.completed);
    assert!(!is_due(Some(&p), now + Duration::days(365)));
}

#[test]
fn forgot_from_phase_three_resets() {
    let store = MemoryStore::new();
    let w = store.add_word("gato", "cat", "").unwrap();
    let now = fixed_now();
    let mut p = Progress::new(now);
    p.phase = 3;
    store.set_progress(w.id, &p).unwrap();

    let out = Scheduler::default()
        .apply_review(&store, w.id, Difficulty::Forgot, now)
        .unwrap();
    assert_eq!(out.progress.phase, 0);
    assert_eq!(out.progress.next_review, Some(days_later(now, 1)));
    assert_eq!(out.progress.difficulty, Difficulty::Forgot);
    assert_eq!(out.progress.last_reviewed, Some(now));
}

#[test]
fn vague_from_phase_two_steps_back() {
    let store = MemoryStore::new();
    let w = store.add_word("luna", "moon", "").unwrap();
    let now = fixed_now();
    let mut p = Progress::new(now);
    p.phase = 2;
    store.set_progress(w.id, &p).unwrap();

    let out = Scheduler::default()
        .apply_review(&store, w.id, Difficulty::Vague, now)
        .unwrap();
    assert_eq!(out.progress.phase, 1);
    assert_eq!(out.progress.next_review, Some(days_later(now, 3)));
    assert!(!out.progress.completed);
}

#[test]
fn missing_progress_is_created_lazily() {
    let store = common::FlakyStore::default();
    let w = store.add_word("sol", "sun", "").unwrap();
    let mut p = Progress::new(fixed_now());
    p.phase = 4;
    store.set_progress(w.id, &p).unwrap();
    store.set_hiding(true);

    let out = Scheduler::default()
        .apply_review(&store, w.id, Difficulty::Remembered, fixed_now())
        .unwrap();
    assert_eq!(out.progress.phase, 1);
    assert_eq!(out.progress.review_count, 1);

    store.set_hiding(false);
    assert_eq!(store.get_progress(w.id).unwrap().unwrap().phase, 1);
}

#[test]
fn write_failure_is_propagated() {
    let store = common::FlakyStore::default();
    let w = store.add_word("agua", "water", "").unwrap();
    store.set_failing(true);
    let err = Scheduler::default()
        .apply_review(&store, w.id, Difficulty::Remembered, fixed_now())
        .unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert_eq!(store.get_progress(w.id).unwrap().unwrap().phase, 0);
}

#[test]
fn shortened_table_does_not_graduate_on_vague() {
    let store = MemoryStore::new();
    let w = store.add_word("arena", "sand", "").unwrap();
    let now = fixed_now();
    let mut p = Progress::new(now);
    p.phase = 5;
    store.set_progress(w.id, &p).unwrap();

    let short = Scheduler::new(IntervalTable::new(vec![1, 3, 7]).unwrap());
    let out = short.apply_review(&store, w.id, Difficulty::Vague, now).unwrap();
    assert!(!out.graduated);
    assert_eq!(out.progress.phase, 1);
    assert_eq!(out.progress.next_review, Some(days_later(now, 3)));
    assert!(store.get_word(w.id).is_ok());

    let mut p = store.get_progress(w.id).unwrap().unwrap();
    p.phase = 9;
    store.set_progress(w.id, &p).unwrap();
    let out = short.apply_review(&store, w.id, Difficulty::Remembered, now).unwrap();
    assert!(out.graduated);
    assert_eq!(out.progress.phase, 3);
}
