use chrono::{DateTime, NaiveDate, Utc};
use homestead::calendar::{build, DayCell, MonthRef};
use homestead::filters::{due_on, progress, urgent_pending, CategoryFilter, TaskFilter, UrgencyFilter};
use homestead::models::{Category, Task, TaskDraft, Urgency};

fn task(id: &str, date: Option<(i32, u32, u32)>) -> Task {
    TaskDraft {
        specific_date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        ..TaskDraft::new(format!("task {id}"))
    }
    .into_task(id.into(), DateTime::<Utc>::from_timestamp_millis(0).unwrap())
}

fn tagged(id: &str, urgency: Urgency, category: Category, done: bool) -> Task {
    let mut t = TaskDraft {
        urgency,
        category,
        ..TaskDraft::new(format!("task {id}"))
    }
    .into_task(id.into(), Utc::now());
    t.is_completed = done;
    t
}

#[test]
fn leap_february_has_29_days_after_4_blanks() {
    let tasks = vec![task("leap", Some((2024, 2, 29))), task("undated", None)];
    let cells = build(2, 2024, &tasks);

    let blanks = cells.iter().take_while(|c| **c == DayCell::Blank).count();
    assert_eq!(blanks, 4);
    let days: Vec<u32> = cells.iter().filter_map(DayCell::day).collect();
    assert_eq!(days, (1..=29).collect::<Vec<_>>());
    assert_eq!(cells.len(), 33);

    let holding: Vec<u32> = cells
        .iter()
        .filter(|c| c.tasks().iter().any(|t| t.id == "leap"))
        .filter_map(DayCell::day)
        .collect();
    assert_eq!(holding, vec![29]);
    assert!(cells.iter().all(|c| c.tasks().iter().all(|t| t.id != "undated")));
}

#[test]
fn month_starting_on_sunday_has_no_blanks() {
    // 2023-10-01 was a Sunday.
    let cells = build(10, 2023, &[]);
    assert_eq!(cells.first().and_then(DayCell::day), Some(1));
    assert_eq!(cells.len(), 31);
}

#[test]
fn day_keeps_source_order_and_duplicates() {
    let tasks = vec![
        task("b", Some((2024, 5, 10))),
        task("a", Some((2024, 5, 10))),
        task("other-month", Some((2024, 6, 10))),
        task("b", Some((2024, 5, 10))),
    ];
    let cells = build(5, 2024, &tasks);
    let tenth = cells.iter().find(|c| c.day() == Some(10)).unwrap();
    let ids: Vec<&str> = tenth.tasks().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "b"]);
    assert_eq!(cells.iter().map(|c| c.tasks().len()).sum::<usize>(), 3);
}

#[test]
fn navigating_across_new_year() {
    let dec = MonthRef::new(2024, 12).unwrap();
    let jan = dec.shift(1).unwrap();
    assert_eq!((jan.year, jan.month), (2025, 1));
    assert_eq!(jan.shift(-1), Some(dec));
    // 2025-01-01 was a Wednesday.
    let cells = build(jan.month, jan.year, &[]);
    assert_eq!(cells.iter().filter(|c| c.day().is_none()).count(), 3);
}

#[test]
fn urgency_and_category_compose_with_and() {
    let tasks = vec![
        tagged("1", Urgency::High, Category::Animals, false),
        tagged("2", Urgency::High, Category::Planting, false),
        tagged("3", Urgency::Low, Category::Animals, false),
        tagged("4", Urgency::High, Category::Animals, true),
    ];
    let filter = TaskFilter {
        urgency: UrgencyFilter::Only(Urgency::High),
        category: CategoryFilter::Only(Category::Animals),
    };
    let ids: Vec<&str> = filter.apply(&tasks).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "4"]);

    let everything = TaskFilter::default();
    assert_eq!(everything.apply(&tasks).len(), 4);

    let none = TaskFilter {
        urgency: UrgencyFilter::Only(Urgency::Medium),
        category: CategoryFilter::All,
    };
    assert!(none.apply(&tasks).is_empty());
}

#[test]
fn today_and_urgent_views() {
    let mut tasks = vec![
        task("today", Some((2024, 7, 1))),
        task("tomorrow", Some((2024, 7, 2))),
        tagged("urgent", Urgency::High, Category::General, false),
        tagged("urgent-done", Urgency::High, Category::General, true),
    ];
    tasks[0].is_completed = true;

    let day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
    let ids: Vec<&str> = due_on(&tasks, day).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["today"]);

    let ids: Vec<&str> = urgent_pending(&tasks).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["urgent"]);

    let counts = progress(&tasks);
    assert_eq!((counts.pending, counts.done), (2, 2));
}
