//! TaskList — the session object that owns the tasks.
//!
//! Every mutating call is read-modify-persist: the collection is written back
//! to the store before the call returns. Unknown ids are a silent no-op
//! (`Ok(false)`), since a stale view may still reference a deleted task.

use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Result, TaskError};
use crate::store::{PersistenceStore, COLLAPSED_KEY, TASKS_KEY};
use crate::task::{Task, TaskDraft, TaskEdit, TaskId};
use crate::view::{build_view, CollapsedSections, Filter, Section, SectionView};

/// Outcome of `TaskList::resolve_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdMatch {
    Unique(TaskId),
    Ambiguous,
    None,
}

#[derive(Debug)]
pub struct TaskList<S> {
    tasks: Vec<Task>,
    collapsed: CollapsedSections,
    store: S,
}

impl<S: PersistenceStore> TaskList<S> {
    /// Rehydrate from `store`. Corrupt slots fall back to empty state.
    pub fn open(store: S) -> Result<Self> {
        let tasks: Vec<Task> = load_or_default(&store, TASKS_KEY)?;
        let collapsed: CollapsedSections = load_or_default(&store, COLLAPSED_KEY)?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(Self {
            tasks,
            collapsed,
            store,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look a task up by full id or id prefix. A blank prefix matches nothing.
    pub fn resolve_id(&self, prefix: &str) -> IdMatch {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return IdMatch::None;
        }
        let mut hits = self.tasks.iter().filter(|t| t.id.as_str().starts_with(prefix));
        match (hits.next(), hits.next()) {
            (None, _) => IdMatch::None,
            (Some(t), None) => IdMatch::Unique(t.id.clone()),
            (Some(_), Some(_)) => IdMatch::Ambiguous,
        }
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<TaskId> {
        let task = draft.into_task(TaskId::generate())?;
        let id = task.id.clone();
        debug!(%id, name = %task.name, "add task");
        self.tasks.push(task);
        self.save_tasks()?;
        Ok(id)
    }

    /// Flip `done`. Returns whether a task matched.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            debug!(%id, "toggle: unknown id");
            return Ok(false);
        };
        task.done = !task.done;
        debug!(%id, done = task.done, "toggle task");
        self.save_tasks()?;
        Ok(true)
    }

    /// Remove unconditionally; confirmation is the caller's job.
    pub fn delete_task(&mut self, id: &TaskId) -> Result<bool> {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        let removed = self.tasks.len() != before;
        debug!(%id, removed, "delete task");
        self.save_tasks()?;
        Ok(removed)
    }

    /// Apply `edit`. An edit that only carries a blank name fails with
    /// `EmptyName` and writes nothing; mixed with other fields, the blank
    /// name is ignored and the previous name kept.
    pub fn edit_task(&mut self, id: &TaskId, edit: TaskEdit) -> Result<bool> {
        if edit.is_blank_rename() {
            return Err(TaskError::EmptyName);
        }
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            debug!(%id, "edit: unknown id");
            return Ok(false);
        };
        if edit.apply(task) {
            warn!(%id, "edit: blank name ignored");
        }
        debug!(%id, "edit task");
        self.save_tasks()?;
        Ok(true)
    }

    /// Drop every done task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.done);
        let removed = before - self.tasks.len();
        debug!(removed, "clear completed");
        self.save_tasks()?;
        Ok(removed)
    }

    pub fn is_collapsed(&self, section: Section) -> bool {
        self.collapsed.is_collapsed(section)
    }

    /// Flip a section's collapsed state. Returns the new state.
    pub fn toggle_section(&mut self, section: Section) -> Result<bool> {
        let collapsed = self.collapsed.toggle(section);
        debug!(%section, collapsed, "toggle section");
        let json = serde_json::to_string(&self.collapsed)?;
        self.store.save(COLLAPSED_KEY, &json)?;
        Ok(collapsed)
    }

    /// Grouped view with each section's collapsed state attached.
    pub fn view(&self, filter: Filter, search: &str, now: NaiveDateTime) -> Vec<SectionView<'_>> {
        let mut sections = build_view(&self.tasks, filter, search, now);
        for s in &mut sections {
            s.collapsed = self.collapsed.is_collapsed(s.section);
        }
        sections
    }

    fn save_tasks(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks)?;
        self.store.save(TASKS_KEY, &json)
    }
}

fn load_or_default<S, T>(store: &S, key: &str) -> Result<T>
where
    S: PersistenceStore,
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.load(key)? else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(v) => Ok(v),
        Err(e) => {
            warn!(key, error = %e, "unreadable persisted data; starting empty");
            Ok(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, NaiveTime};

    fn list() -> TaskList<MemoryStore> {
        TaskList::open(MemoryStore::new()).unwrap()
    }

    #[test]
    fn add_then_get_returns_trimmed_record() {
        let mut l = list();
        let date = NaiveDate::from_ymd_opt(2026, 2, 20).unwrap();
        let time = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let id = l
            .add_task(TaskDraft::new("  file taxes ").with_date(date).with_time(time).important())
            .unwrap();

        let t = l.get(&id).unwrap();
        assert_eq!(t.name, "file taxes");
        assert_eq!(t.date, Some(date));
        assert_eq!(t.time, Some(time));
        assert!(t.important);
        assert!(!t.done);
    }

    #[test]
    fn blank_names_are_rejected_without_writing() {
        let store = MemoryStore::new();
        let mut l = TaskList::open(store.clone()).unwrap();
        for name in ["", "   "] {
            let err = l.add_task(TaskDraft::new(name)).unwrap_err();
            assert!(matches!(err, TaskError::EmptyName));
        }
        assert!(l.is_empty());
        assert!(store.get(TASKS_KEY).is_none());
    }

    #[test]
    fn toggle_twice_restores_done() {
        let mut l = list();
        let id = l.add_task(TaskDraft::new("a")).unwrap();
        assert!(l.toggle_complete(&id).unwrap());
        assert!(l.get(&id).unwrap().done);
        assert!(l.toggle_complete(&id).unwrap());
        assert!(!l.get(&id).unwrap().done);
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut l = list();
        l.add_task(TaskDraft::new("a")).unwrap();
        let ghost = TaskId::from("ghost");
        assert!(!l.toggle_complete(&ghost).unwrap());
        assert!(!l.edit_task(&ghost, TaskEdit::default().important(true)).unwrap());
        assert!(!l.delete_task(&ghost).unwrap());
        assert_eq!(l.len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one_and_is_idempotent() {
        let mut l = list();
        let a = l.add_task(TaskDraft::new("a")).unwrap();
        let b = l.add_task(TaskDraft::new("b")).unwrap();
        assert!(l.delete_task(&a).unwrap());
        assert!(!l.delete_task(&a).unwrap());
        assert_eq!(l.len(), 1);
        assert!(l.get(&b).is_some());
    }

    #[test]
    fn blank_rename_fails_without_writing() {
        let store = MemoryStore::new();
        let mut l = TaskList::open(store.clone()).unwrap();
        let id = l.add_task(TaskDraft::new("keep")).unwrap();
        let mut marker = store.clone();
        marker.save(TASKS_KEY, "untouched").unwrap();

        let err = l.edit_task(&id, TaskEdit::default().name("   ")).unwrap_err();
        assert!(matches!(err, TaskError::EmptyName));
        assert_eq!(store.get(TASKS_KEY).as_deref(), Some("untouched"));
        assert_eq!(l.get(&id).unwrap().name, "keep");
    }

    #[test]
    fn edit_ignores_blank_name_alongside_other_fields() {
        let mut l = list();
        let id = l.add_task(TaskDraft::new("keep me")).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(l.edit_task(&id, TaskEdit::default().name("   ").date(Some(date))).unwrap());
        assert_eq!(l.get(&id).unwrap().name, "keep me");
        assert_eq!(l.get(&id).unwrap().date, Some(date));

        l.edit_task(&id, TaskEdit::default().important(true)).unwrap();
        let t = l.get(&id).unwrap();
        assert!(t.important);
        assert_eq!(t.name, "keep me");
        assert_eq!(t.date, Some(date));
    }

    #[test]
    fn clear_completed_keeps_only_open_tasks() {
        let mut l = list();
        let ids: Vec<TaskId> = ["x", "y", "z"]
            .into_iter()
            .map(|n| l.add_task(TaskDraft::new(n)).unwrap())
            .collect();
        l.toggle_complete(&ids[0]).unwrap();
        l.toggle_complete(&ids[2]).unwrap();

        assert_eq!(l.clear_completed().unwrap(), 2);
        assert_eq!(l.len(), 1);
        assert_eq!(l.tasks()[0].id, ids[1]);
    }

    #[test]
    fn every_mutation_writes_through() {
        let store = MemoryStore::new();
        let mut l = TaskList::open(store.clone()).unwrap();
        let id = l.add_task(TaskDraft::new("a")).unwrap();
        l.toggle_complete(&id).unwrap();

        let saved: Vec<Task> = serde_json::from_str(&store.get(TASKS_KEY).unwrap()).unwrap();
        assert_eq!(saved, l.tasks());
        assert!(saved[0].done);
    }

    #[test]
    fn corrupt_slots_fall_back_to_empty() {
        let store = MemoryStore::new()
            .with_slot(TASKS_KEY, "{not json")
            .with_slot(COLLAPSED_KEY, "[1,2]");
        let l = TaskList::open(store).unwrap();
        assert!(l.is_empty());
        assert!(!l.is_collapsed(Section::Today));
    }

    #[test]
    fn collapsed_state_persists_separately() {
        let store = MemoryStore::new();
        let mut l = TaskList::open(store.clone()).unwrap();
        assert!(l.toggle_section(Section::NoDate).unwrap());
        assert!(store.get(TASKS_KEY).is_none());

        let reopened = TaskList::open(store).unwrap();
        assert!(reopened.is_collapsed(Section::NoDate));
    }

    #[test]
    fn view_marks_collapsed_sections() {
        let mut l = list();
        l.add_task(TaskDraft::new("undated")).unwrap();
        l.toggle_section(Section::NoDate).unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 2, 19).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let view = l.view(Filter::All, "", now);
        assert_eq!(view.len(), 1);
        assert!(view[0].collapsed);
        assert_eq!(view[0].items.len(), 1);
    }

    #[test]
    fn resolves_prefixes_three_ways() {
        let store = MemoryStore::new().with_slot(
            TASKS_KEY,
            r#"[{"id":"abc1","name":"a"},{"id":"abc2","name":"b"},{"id":"xyz","name":"c"}]"#,
        );
        let l = TaskList::open(store).unwrap();
        assert_eq!(l.resolve_id("x"), IdMatch::Unique(TaskId::from("xyz")));
        assert_eq!(l.resolve_id("abc2"), IdMatch::Unique(TaskId::from("abc2")));
        assert_eq!(l.resolve_id("abc"), IdMatch::Ambiguous);
        assert_eq!(l.resolve_id("nope"), IdMatch::None);
        assert_eq!(l.resolve_id(""), IdMatch::None);
        assert_eq!(l.resolve_id("   "), IdMatch::None);
    }
}
