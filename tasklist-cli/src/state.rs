use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

/// Overrides the default `~/.tasklist` home.
pub const HOME_ENV: &str = "TASKLIST_HOME";

/// Resolve and create the tasklist home directory.
pub fn tasklist_home() -> Result<PathBuf> {
    let dir = home_from(std::env::var(HOME_ENV).ok(), std::env::var("HOME").ok())?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

fn home_from(override_dir: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(dir) = override_dir.filter(|d| !d.trim().is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".tasklist")),
        _ => bail!("neither {HOME_ENV} nor HOME is set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_home() {
        let dir = home_from(Some("/tmp/tl".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/tl"));
    }

    #[test]
    fn blank_override_falls_back_to_home() {
        let dir = home_from(Some("  ".into()), Some("/home/me".into())).unwrap();
        assert_eq!(dir, PathBuf::from("/home/me/.tasklist"));
    }

    #[test]
    fn no_home_at_all_is_an_error() {
        assert!(home_from(None, None).is_err());
    }
}
