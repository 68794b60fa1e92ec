//! Task model for the task list.
//!
//! The persisted shape is a flat record:
//! `{id, name, date: "YYYY-MM-DD"|null, time: "HH:MM"|null, important, done}`.
//! Display hints (overdue, due today, ...) are not stored; see `view`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{Result, TaskError};

/// Opaque, probabilistically-unique task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, enough to tell tasks apart in a terminal.
    pub fn short(&self) -> &str {
        self.0.get(..8).unwrap_or(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,

    #[serde(default)]
    pub date: Option<NaiveDate>,

    /// Only meaningful when `date` is set; absent means midnight.
    #[serde(default, with = "hhmm")]
    pub time: Option<NaiveTime>,

    #[serde(default)]
    pub important: bool,

    #[serde(default)]
    pub done: bool,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date: None,
            time: None,
            important: false,
            done: false,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Date at the given time, or at midnight when no time is set.
    pub fn due_instant(&self) -> Option<NaiveDateTime> {
        self.date
            .map(|d| d.and_time(self.time.unwrap_or(NaiveTime::MIN)))
    }
}

/// Input for `TaskList::add_task`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub important: bool,
}

impl TaskDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn important(mut self) -> Self {
        self.important = true;
        self
    }

    /// Turn the draft into a fresh, not-done task. Fails on a blank name.
    pub(crate) fn into_task(self, id: TaskId) -> Result<Task> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TaskError::EmptyName);
        }
        Ok(Task {
            id,
            name: name.to_string(),
            date: self.date,
            time: self.time,
            important: self.important,
            done: false,
        })
    }
}

/// Partial update for `TaskList::edit_task`. `None` leaves a field untouched;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub date: Option<Option<NaiveDate>>,
    pub time: Option<Option<NaiveTime>>,
    pub important: Option<bool>,
}

impl TaskEdit {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn time(mut self, time: Option<NaiveTime>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn important(mut self, important: bool) -> Self {
        self.important = Some(important);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.time.is_none() && self.important.is_none()
    }

    /// True when the only change requested is a name that trims to empty.
    pub fn is_blank_rename(&self) -> bool {
        self.name.as_deref().is_some_and(|n| n.trim().is_empty())
            && self.date.is_none()
            && self.time.is_none()
            && self.important.is_none()
    }

    /// Apply onto `task`. A blank name keeps the previous one.
    /// Returns whether the name was rejected.
    pub(crate) fn apply(self, task: &mut Task) -> bool {
        let mut name_rejected = false;
        if let Some(name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                name_rejected = true;
            } else {
                task.name = name.to_string();
            }
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(time) = self.time {
            task.time = time;
        }
        if let Some(important) = self.important {
            task.important = important;
        }
        name_rejected
    }
}

/// `Option<NaiveTime>` as `"HH:MM"`, widened to `"HH:MM:SS[.f]"` only when the
/// time carries seconds. `""` reads as no time.
mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) if t.second() == 0 && t.nanosecond() == 0 => {
                s.serialize_str(&t.format("%H:%M").to_string())
            }
            Some(t) => s.serialize_str(&t.format("%H:%M:%S%.f").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => crate::time::parse_time(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
