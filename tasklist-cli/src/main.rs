use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::io;
use tasklist_core::{
    local_now, parse_date, parse_time, DisplaySink, FileStore, Filter, IdMatch, PersistenceStore,
    Section, TaskDraft, TaskEdit, TaskError, TaskId, TaskList,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod config;
mod prompt;
mod render;
mod state;

use config::Config;
use render::TerminalSink;

#[derive(Parser, Debug)]
#[command(name = "tasklist", version, about = "Task list with due-date sections")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Task(TaskCommand),

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TaskCommand {
    /// Add a task
    Add {
        name: String,

        /// Due date, YYYY-MM-DD
        #[arg(long, value_parser = parse_date)]
        date: Option<chrono::NaiveDate>,

        /// Due time, HH:MM (midnight when omitted)
        #[arg(long, value_parser = parse_time)]
        time: Option<chrono::NaiveTime>,

        #[arg(long, default_value_t = false)]
        important: bool,
    },

    /// Show tasks grouped by due date
    List {
        /// all, active, completed or important (default from config)
        #[arg(long)]
        filter: Option<Filter>,

        /// Case-insensitive substring match on the name
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Toggle a task between done and not done
    Done { id: String },

    /// Delete a task
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },

    /// Edit fields of a task
    Edit(EditArgs),

    /// Remove all completed tasks
    ClearCompleted,

    /// Collapse or expand a section (Overdue, Today, Tomorrow, Upcoming, "No Date")
    Collapse { section: Section },
}

#[derive(Args, Debug)]
struct EditArgs {
    id: String,

    #[arg(long)]
    name: Option<String>,

    #[arg(long, value_parser = parse_date, conflicts_with = "clear_date")]
    date: Option<chrono::NaiveDate>,

    #[arg(long, default_value_t = false)]
    clear_date: bool,

    #[arg(long, value_parser = parse_time, conflicts_with = "clear_time")]
    time: Option<chrono::NaiveTime>,

    #[arg(long, default_value_t = false)]
    clear_time: bool,

    #[arg(long, default_value_t = false, conflicts_with = "not_important")]
    important: bool,

    #[arg(long, default_value_t = false)]
    not_important: bool,
}

impl EditArgs {
    fn to_edit(&self) -> TaskEdit {
        let mut edit = TaskEdit::default();
        if let Some(name) = &self.name {
            edit = edit.name(name.clone());
        }
        if self.clear_date {
            edit = edit.date(None);
        } else if let Some(d) = self.date {
            edit = edit.date(Some(d));
        }
        if self.clear_time {
            edit = edit.time(None);
        } else if let Some(t) = self.time {
            edit = edit.time(Some(t));
        }
        if self.important {
            edit = edit.important(true);
        } else if self.not_important {
            edit = edit.important(false);
        }
        edit
    }
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
            ConfigCommand::Show => config::show_config(),
        },
        Command::Task(command) => run(command),
    }
}

fn run(command: TaskCommand) -> Result<()> {
    let cfg = config::load_config()?;
    let data_dir = cfg.data_dir()?;
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("open task store at {}", data_dir.display()))?;
    let mut list = TaskList::open(store).context("load tasks")?;
    let now = local_now(cfg.time.timezone.as_deref())?;
    debug!(dir = %data_dir.display(), %now, tasks = list.len(), "session ready");

    match command {
        TaskCommand::Add {
            name,
            date,
            time,
            important,
        } => {
            let draft = TaskDraft {
                name,
                date,
                time,
                important,
            };
            match list.add_task(draft) {
                Ok(id) => println!("Added {}", id.short()),
                Err(TaskError::EmptyName) => bail!("Please enter a task name."),
                Err(e) => return Err(e.into()),
            }
        }

        TaskCommand::List { filter, search } => {
            let filter = filter.unwrap_or(cfg.display.default_filter);
            return show(&list, &cfg, filter, &search, now);
        }

        TaskCommand::Done { id } => {
            let id = resolve(&list, &id)?;
            list.toggle_complete(&id)?;
            if let Some(t) = list.get(&id) {
                println!("{} {}", if t.done { "Completed" } else { "Reopened" }, t.name);
            }
        }

        TaskCommand::Delete { id, yes } => {
            let id = resolve(&list, &id)?;
            if !yes
                && cfg.display.confirm_delete
                && !prompt::confirm("Are you sure you want to delete this task?")?
            {
                println!("Kept.");
                return Ok(());
            }
            if list.delete_task(&id)? {
                println!("Deleted {}", id.short());
            }
        }

        TaskCommand::Edit(args) => {
            let id = resolve(&list, &args.id)?;
            let edit = args.to_edit();
            if edit.is_empty() {
                bail!("nothing to edit (pass --name, --date, --time or --important)");
            }
            match list.edit_task(&id, edit) {
                Ok(true) => println!("Updated {}", id.short()),
                Ok(false) => println!("No task {}", id.short()),
                Err(TaskError::EmptyName) => bail!("Task name cannot be empty."),
                Err(e) => return Err(e.into()),
            }
        }

        TaskCommand::ClearCompleted => {
            let n = list.clear_completed()?;
            println!("Cleared {n} completed task(s).");
        }

        TaskCommand::Collapse { section } => {
            let collapsed = list.toggle_section(section)?;
            println!("{section} {}", if collapsed { "collapsed" } else { "expanded" });
        }
    }

    println!();
    show(&list, &cfg, cfg.display.default_filter, "", now)
}

fn show(
    list: &TaskList<FileStore>,
    cfg: &Config,
    filter: Filter,
    search: &str,
    now: NaiveDateTime,
) -> Result<()> {
    let view = list.view(filter, search, now);
    let mut sink = TerminalSink::new(io::stdout().lock(), cfg.display.show_ids);
    sink.render(&view, now).context("write task list")?;
    Ok(())
}

/// Full id or unique prefix. Unknown ids pass through so the store can treat
/// them as a no-op.
fn resolve<S: PersistenceStore>(list: &TaskList<S>, raw: &str) -> Result<TaskId> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("missing task id");
    }
    match list.resolve_id(raw) {
        IdMatch::Unique(id) => Ok(id),
        IdMatch::Ambiguous => bail!("id prefix '{raw}' matches more than one task"),
        IdMatch::None => Ok(TaskId::from(raw)),
    }
}
