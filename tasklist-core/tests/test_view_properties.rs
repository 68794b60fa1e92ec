use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;
use std::collections::HashSet;
use tasklist_core::{build_view, compare_tasks, sort_tasks, Filter, Task};

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 2, 19)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn arb_task() -> impl Strategy<Value = (Option<i64>, Option<u32>, bool, bool, u8)> {
    (
        proptest::option::of(-72i64..96),
        proptest::option::of(0u32..24),
        any::<bool>(),
        any::<bool>(),
        0u8..4,
    )
}

fn build(seeds: Vec<(Option<i64>, Option<u32>, bool, bool, u8)>) -> Vec<Task> {
    seeds
        .into_iter()
        .enumerate()
        .map(|(i, (hours, hour_of_day, important, done, name))| {
            let mut t = Task::new(format!("t{i}"), format!("task {name}"))
                .with_important(important)
                .with_done(done);
            if let Some(h) = hours {
                t.date = Some((base() + Duration::hours(h)).date());
                t.time = hour_of_day.map(|hh| NaiveTime::from_hms_opt(hh, 0, 0).unwrap());
            }
            t
        })
        .collect()
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![
        Just(Filter::All),
        Just(Filter::Active),
        Just(Filter::Completed),
        Just(Filter::Important),
    ]
}

fn arb_record() -> impl Strategy<Value = Task> {
    (
        "[ -~]{1,20}",
        proptest::option::of((2000i32..2100, 1u32..=12, 1u32..=28)),
        proptest::option::of((0u32..24, 0u32..60, 0u32..60, 0u32..1_000_000_000)),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, date, time, important, done)| {
            let mut t = Task::new(tasklist_core::TaskId::generate(), name)
                .with_important(important)
                .with_done(done);
            t.date = date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap());
            t.time = time.map(|(h, mi, s, ns)| NaiveTime::from_hms_nano_opt(h, mi, s, ns).unwrap());
            t
        })
}

proptest! {
    #[test]
    fn storage_encoding_reproduces_the_collection(tasks in proptest::collection::vec(arb_record(), 0..20)) {
        let json = serde_json::to_string(&tasks).unwrap();
        let back: Vec<Task> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, tasks);
    }

    #[test]
    fn sort_keeps_input_order_among_equal_tasks(seeds in proptest::collection::vec(arb_task(), 0..40)) {
        let tasks = build(seeds);
        let sorted = sort_tasks(&tasks);
        for pair in sorted.windows(2) {
            prop_assert!(compare_tasks(pair[0], pair[1]).is_le());
            if compare_tasks(pair[0], pair[1]).is_eq() {
                let pos = |t: &Task| tasks.iter().position(|x| x.id == t.id).unwrap();
                prop_assert!(pos(pair[0]) < pos(pair[1]));
            }
        }
    }

    #[test]
    fn groups_partition_the_filtered_set(
        seeds in proptest::collection::vec(arb_task(), 0..40),
        filter in arb_filter(),
        search in prop_oneof![Just(""), Just("task 1"), Just("TASK")],
    ) {
        let tasks = build(seeds);
        let view = build_view(&tasks, filter, search, base());

        let expected: HashSet<&str> = tasks
            .iter()
            .filter(|t| filter.admits(t) && t.name.to_lowercase().contains(&search.to_lowercase()))
            .map(|t| t.id.as_str())
            .collect();

        let mut seen = HashSet::new();
        for section in &view {
            prop_assert!(!section.items.is_empty());
            for item in &section.items {
                prop_assert!(seen.insert(item.task.id.as_str()));
            }
        }
        prop_assert_eq!(seen, expected);

        let order: Vec<_> = view.iter().map(|s| s.section).collect();
        let mut sorted_order = order.clone();
        sorted_order.sort();
        prop_assert_eq!(order, sorted_order);
    }
}
