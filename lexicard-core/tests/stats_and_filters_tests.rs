mod common;

use common::fixed_now;
use lexicard_core::{
    daily_streak, filter_by_text, local_day, mastered_count, phase_histogram, reviewed_on, sort_by_phase,
    summarize, Difficulty, Progress, Review, Word,
};
use chrono::Duration;
use std::collections::HashMap;

#[test]
fn filters_text() {
    let w1 = Word::new("hola", "hello", "hola amigo");
    let w2 = Word::new("adios", "goodbye", "");
    let v = vec![w1.clone(), w2.clone()];

    let by_word = filter_by_text(&v, "HOL");
    assert_eq!(by_word.len(), 1);
    assert_eq!(by_word[0].word, "hola");

    let by_def = filter_by_text(&v, "good");
    assert_eq!(by_def, vec![w2]);

    assert_eq!(filter_by_text(&v, "  ").len(), 2);
}

#[test]
fn sorts_by_phase_then_word() {
    let now = fixed_now();
    let a = Word::new("b-word", "x", "");
    let b = Word::new("a-word", "x", "");
    let c = Word::new("c-word", "x", "");
    let mut progress = HashMap::new();
    let mut p = Progress::new(now);
    p.phase = 3;
    progress.insert(a.id, p);

    let mut v = vec![a.clone(), b.clone(), c.clone()];
    sort_by_phase(&mut v, &progress);
    let order: Vec<_> = v.iter().map(|w| w.word.as_str()).collect();
    assert_eq!(order, ["a-word", "c-word", "b-word"]);
}

#[test]
fn stats_and_streak() {
    let now = fixed_now();
    let w = Word::new("hola", "hello", "");
    let r0 = Review::new(w.id, Difficulty::Remembered, now - Duration::days(2), 1, Some(3));
    let r1 = Review::new(w.id, Difficulty::Vague, now - Duration::days(1), 0, Some(1));
    let r2 = Review::new(w.id, Difficulty::Forgot, now, 0, Some(1));
    let r3 = Review::new(w.id, Difficulty::Remembered, now, 1, Some(3));
    let all = [r0, r1, r2, r3];

    let s = summarize(&all);
    assert_eq!(s.totals.total, 4);
    assert_eq!(s.totals.remembered, 2);
    assert_eq!(s.totals.forgot, 1);
    assert!((s.totals.accuracy() - 0.5).abs() < f32::EPSILON);
    assert_eq!(s.per_day.len(), 3);

    let today = local_day(now);
    assert_eq!(daily_streak(&all, today), 3);
    assert_eq!(daily_streak(&all, today + Duration::days(1)), 0);
    assert_eq!(reviewed_on(&all, today), 2);
}

#[test]
fn histogram_puts_graduated_words_last() {
    let now = fixed_now();
    let mut progress = HashMap::new();
    for phase in [0, 0, 2, 7] {
        let mut p = Progress::new(now);
        p.phase = phase;
        p.completed = phase == 7;
        progress.insert(uuid::Uuid::new_v4(), p);
    }
    let h = phase_histogram(&progress, 7);
    assert_eq!(h.len(), 8);
    assert_eq!(h[0], 2);
    assert_eq!(h[2], 1);
    assert_eq!(h[7], 1);
    assert_eq!(mastered_count(&progress), 1);
}

#[test]
fn review_days_follow_the_local_calendar() {
    use chrono::{Local, TimeZone};
    let w = Word::new("noche", "night", "");
    let late = Local.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap().with_timezone(&chrono::Utc);
    let early = Local.with_ymd_and_hms(2024, 3, 2, 0, 30, 0).unwrap().with_timezone(&chrono::Utc);
    let all = [
        Review::new(w.id, Difficulty::Remembered, late, 1, Some(3)),
        Review::new(w.id, Difficulty::Remembered, early, 2, Some(7)),
    ];
    let day1 = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let day2 = chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    assert_eq!(reviewed_on(&all, day1), 1);
    assert_eq!(reviewed_on(&all, day2), 1);
    assert_eq!(daily_streak(&all, day2), 2);
}
