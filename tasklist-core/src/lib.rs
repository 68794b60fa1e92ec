//! tasklist-core: task store, view builder and persistence for the task list.

pub mod error;
pub mod store;
pub mod task;
pub mod task_list;
pub mod time;
pub mod view;

pub use error::TaskError;
pub use store::{FileStore, MemoryStore, PersistenceStore, COLLAPSED_KEY, TASKS_KEY};
pub use task::{Task, TaskDraft, TaskEdit, TaskId};
pub use task_list::{IdMatch, TaskList};
pub use time::{local_now, parse_date, parse_time, DayBounds};
pub use view::{
    build_view, compare_tasks, matches_search, sort_tasks, CollapsedSections, DisplayFlags,
    DisplaySink, Filter, Section, SectionView, ViewItem,
};
