//! Terminal display sink.

use chrono::{Datelike, NaiveDateTime};
use std::io::{self, Write};
use tasklist_core::{DisplaySink, SectionView, Task, ViewItem};

pub struct TerminalSink<W> {
    out: W,
    show_ids: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, show_ids: bool) -> Self {
        Self { out, show_ids }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn item(&mut self, item: &ViewItem<'_>, now: NaiveDateTime) -> io::Result<()> {
        let task = item.task;
        let mut line = String::from("  ");
        if self.show_ids {
            line.push_str(task.id.short());
            line.push(' ');
        }
        line.push_str(if task.done { "[x] " } else { "[ ] " });
        line.push_str(if task.important { "! " } else { "  " });
        line.push_str(&task.name);

        if let Some(due) = format_due(task, now) {
            line.push_str("  ⏰ ");
            line.push_str(&due);
        }

        let flags = item.flags;
        if flags.overdue {
            line.push_str("  (overdue)");
        } else if flags.due_today {
            line.push_str("  (due today)");
            if flags.urgent {
                line.push_str(" 🔥Urgent");
            }
        } else if flags.upcoming {
            line.push_str("  (upcoming)");
        }
        writeln!(self.out, "{line}")
    }
}

impl<W: Write> DisplaySink for TerminalSink<W> {
    fn render(&mut self, sections: &[SectionView<'_>], now: NaiveDateTime) -> io::Result<()> {
        if sections.is_empty() {
            return writeln!(self.out, "No tasks.");
        }
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                writeln!(self.out)?;
            }
            if section.collapsed {
                writeln!(self.out, "▸ {} ({})", section.section, section.items.len())?;
                continue;
            }
            writeln!(self.out, "▾ {}", section.section)?;
            for item in &section.items {
                self.item(item, now)?;
            }
        }
        self.out.flush()
    }
}

/// "Oct 19, 9:00 AM"; the year is added when it differs from `now`.
pub fn format_due(task: &Task, now: NaiveDateTime) -> Option<String> {
    let due = task.due_instant()?;
    let fmt = if due.year() == now.year() {
        "%b %-d, %-I:%M %p"
    } else {
        "%b %-d, %Y, %-I:%M %p"
    };
    Some(due.format(fmt).to_string())
}
