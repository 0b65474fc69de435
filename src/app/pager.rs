//! Paging long listings on an interactive terminal

use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// Pager used when `$PAGER` is unset or empty
pub const DEFAULT_PAGER: &str = "less -R";

/// When and how listings are paged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerPolicy {
    /// Terminal height; `None` when stdout is not a terminal
    rows: Option<usize>,
    command: String,
}

impl PagerPolicy {
    /// Page on the current terminal with `$PAGER`
    pub fn detect() -> Self {
        use std::io::IsTerminal;
        let rows = if std::io::stdout().is_terminal() {
            terminal_rows()
        } else {
            None
        };
        let command = std::env::var("PAGER")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAGER.to_string());
        Self { rows, command }
    }

    /// Never page
    pub fn disabled() -> Self {
        Self {
            rows: None,
            command: DEFAULT_PAGER.to_string(),
        }
    }

    pub fn with_rows(rows: usize, command: impl Into<String>) -> Self {
        Self {
            rows: Some(rows),
            command: command.into(),
        }
    }

    /// True when `text` is taller than the terminal
    pub fn should_page(&self, text: &str) -> bool {
        self.rows.is_some_and(|rows| text.lines().count() > rows)
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// Height of the terminal attached to stdout
#[cfg(unix)]
fn terminal_rows() -> Option<usize> {
    let mut size = libc::winsize {
        ws_row: 0,
        ws_col: 0,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
    if rc == 0 && size.ws_row > 0 {
        Some(size.ws_row as usize)
    } else {
        lines_from_env()
    }
}

#[cfg(not(unix))]
fn terminal_rows() -> Option<usize> {
    lines_from_env()
}

fn lines_from_env() -> Option<usize> {
    std::env::var("LINES").ok()?.trim().parse().ok().filter(|&n| n > 0)
}

/// Feed `text` to the pager command and wait for the operator to leave it
pub async fn page(command: &str, text: &str) -> std::io::Result<()> {
    let mut parts = command.split_whitespace();
    let program = parts.next().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty pager command")
    })?;

    let mut child = tokio::process::Command::new(program)
        .args(parts)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        // The pager may quit before reading everything
        if let Err(e) = stdin.write_all(text.as_bytes()).await {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
        if !text.ends_with('\n') {
            let _ = stdin.write_all(b"\n").await;
        }
    }
    let status = child.wait().await?;
    log::debug!("pager '{}' finished with {}", command, status);
    Ok(())
}
