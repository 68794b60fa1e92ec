//! View builder: sort → filter → group.
//!
//! Pure functions over a task slice. Nothing here mutates or persists, and
//! every display hint is derived from `now` on each call.
//!
//! Sort tiers (stable, each tier falls through to the next):
//! - not done before done
//! - important before not important
//! - dated before undated
//! - earlier due instant first
//!
//! Grouping against `now`:
//! - no date → No Date
//! - not done and due before `now` → Overdue
//! - due in [today, tomorrow) → Today
//! - due in [tomorrow, day after) → Tomorrow
//! - anything else → Upcoming

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::TaskError;
use crate::task::Task;
use crate::time::DayBounds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
    Important,
}

impl Filter {
    pub fn admits(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.done,
            Filter::Completed => task.done,
            Filter::Important => task.important,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
            Filter::Important => "important",
        }
    }
}

impl FromStr for Filter {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" => Ok(Filter::Completed),
            "important" => Ok(Filter::Important),
            _ => Err(TaskError::UnknownFilter(s.to_string())),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporal bucket, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Overdue,
    Today,
    Tomorrow,
    Upcoming,
    NoDate,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overdue,
        Section::Today,
        Section::Tomorrow,
        Section::Upcoming,
        Section::NoDate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Overdue => "Overdue",
            Section::Today => "Today",
            Section::Tomorrow => "Tomorrow",
            Section::Upcoming => "Upcoming",
            Section::NoDate => "No Date",
        }
    }

    /// Bucket for a task relative to `now`.
    pub fn of(task: &Task, now: NaiveDateTime, bounds: &DayBounds) -> Section {
        let Some(due) = task.due_instant() else {
            return Section::NoDate;
        };
        if !task.done && due < now {
            Section::Overdue
        } else if due >= bounds.start_of_today && due < bounds.start_of_tomorrow {
            Section::Today
        } else if due >= bounds.start_of_tomorrow && due < bounds.start_of_day_after_tomorrow {
            Section::Tomorrow
        } else {
            Section::Upcoming
        }
    }
}

impl FromStr for Section {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        Section::ALL
            .into_iter()
            .find(|sec| sec.label().to_ascii_lowercase() == norm)
            .ok_or_else(|| TaskError::UnknownSection(s.to_string()))
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render-time hints; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayFlags {
    pub overdue: bool,
    pub due_today: bool,
    /// Important and due today.
    pub urgent: bool,
    pub upcoming: bool,
}

impl DisplayFlags {
    fn derive(task: &Task, section: Section, now: NaiveDateTime) -> Self {
        if task.done {
            return Self::default();
        }
        let overdue = task.due_instant().is_some_and(|due| due < now);
        let due_today = !overdue && section == Section::Today;
        Self {
            overdue,
            due_today,
            urgent: due_today && task.important,
            upcoming: !overdue && section == Section::Upcoming,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewItem<'a> {
    pub task: &'a Task,
    pub flags: DisplayFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView<'a> {
    pub section: Section,
    /// Filled in by `TaskList::view`; `build_view` leaves every section expanded.
    pub collapsed: bool,
    pub items: Vec<ViewItem<'a>>,
}

/// Total order used for display.
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.done
        .cmp(&b.done)
        .then_with(|| b.important.cmp(&a.important))
        .then_with(|| match (a.due_instant(), b.due_instant()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Stable sort by `compare_tasks`.
pub fn sort_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| compare_tasks(a, b));
    sorted
}

/// Case-insensitive substring match on the name. Empty search matches everything.
pub fn matches_search(task: &Task, search: &str) -> bool {
    search.is_empty() || task.name.to_lowercase().contains(&search.to_lowercase())
}

/// Build the grouped view. Empty sections are omitted.
pub fn build_view<'a>(
    tasks: &'a [Task],
    filter: Filter,
    search: &str,
    now: NaiveDateTime,
) -> Vec<SectionView<'a>> {
    let bounds = DayBounds::around(now);
    let mut groups: BTreeMap<Section, Vec<ViewItem<'a>>> = BTreeMap::new();

    for task in sort_tasks(tasks) {
        if !filter.admits(task) || !matches_search(task, search) {
            continue;
        }
        let section = Section::of(task, now, &bounds);
        groups.entry(section).or_default().push(ViewItem {
            task,
            flags: DisplayFlags::derive(task, section, now),
        });
    }

    groups
        .into_iter()
        .map(|(section, items)| SectionView {
            section,
            collapsed: false,
            items,
        })
        .collect()
}

/// Per-section collapse state, keyed by section label in storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapsedSections(BTreeMap<String, bool>);

impl CollapsedSections {
    pub fn is_collapsed(&self, section: Section) -> bool {
        self.0.get(section.label()).copied().unwrap_or(false)
    }

    /// Flip a section and return its new state.
    pub fn toggle(&mut self, section: Section) -> bool {
        let entry = self.0.entry(section.label().to_string()).or_insert(false);
        *entry = !*entry;
        *entry
    }
}

/// Receives the grouped view for display.
pub trait DisplaySink {
    fn render(&mut self, sections: &[SectionView<'_>], now: NaiveDateTime) -> std::io::Result<()>;
}
