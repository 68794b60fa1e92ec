use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N]: ");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().lock().read_line(&mut s)?;
    Ok(is_yes(&s))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
