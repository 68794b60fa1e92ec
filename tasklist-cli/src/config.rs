use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tasklist_core::{local_now, Filter};

use crate::state::tasklist_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub time: TimeSection,
    pub display: DisplaySection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSection {
    /// IANA zone such as "America/Chicago". Unset means the system zone.
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub default_filter: Filter,
    pub show_ids: bool,
    pub confirm_delete: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            default_filter: Filter::All,
            show_ids: true,
            confirm_delete: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Where `tasks.json` and `collapsedSections.json` live. Defaults to the tasklist home.
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Read `path`, or defaults when it does not exist. An unknown timezone is
    /// rejected here rather than on the first command that needs "now".
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        if let Some(tz) = cfg.time.timezone.as_deref() {
            local_now(Some(tz)).with_context(|| format!("[time] timezone in {}", path.display()))?;
        }
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self).context("serialize config")?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))
    }

    /// Directory for the persisted slots.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => tasklist_home(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tasklist_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    Config::load(&config_path()?)
}

/// Write defaults to `path` unless a file is already there. Returns whether it wrote.
pub fn init_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Config::default().save(path)?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(&Config::load(&p)?).context("serialize config")?;
    println!("# {}", p.display());
    print!("{s}");
    Ok(())
}
