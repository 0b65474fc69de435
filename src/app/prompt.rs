//! Line prompts, prompt history and topic completion
//!
//! Prompts read whole lines from any async reader so the console can be
//! driven by a terminal or by a script alike.

use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// History file for topic prompts
pub const TOPIC_HISTORY_FILE: &str = "topics.txt";

pub struct Prompt<R, W> {
    lines: Lines<R>,
    writer: W,
}

/// Prompt bound to the process's stdin and stdout
pub type StdPrompt = Prompt<BufReader<tokio::io::Stdin>, tokio::io::Stdout>;

impl StdPrompt {
    pub fn stdio() -> Self {
        Prompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Prompt<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: reader.lines(),
            writer,
        }
    }

    /// Show `text` and read one line; `None` once input is exhausted
    pub async fn ask(&mut self, text: &str) -> std::io::Result<Option<String>> {
        self.writer.write_all(text.as_bytes()).await?;
        self.writer.flush().await?;
        let line = self.lines.next_line().await?;
        Ok(line.map(|l| l.trim_end_matches('\r').to_string()))
    }

    /// Yes/no question defaulting to no; asks again on anything else
    pub async fn confirm(&mut self, text: &str) -> std::io::Result<Option<bool>> {
        let question = format!("{} [y/N] ", text);
        loop {
            let Some(answer) = self.ask(&question).await? else {
                return Ok(None);
            };
            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Some(true)),
                "" | "n" | "no" => return Ok(Some(false)),
                _ => continue,
            }
        }
    }
}

/// Entries previously accepted at one kind of prompt, persisted one per line
#[derive(Debug, Clone, Default)]
pub struct History {
    path: Option<PathBuf>,
    entries: Vec<String>,
}

impl History {
    /// History kept only for this session
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load `dir/name`; a missing file starts an empty history
    pub async fn load(dir: &Path, name: &str) -> std::io::Result<Self> {
        let path = dir.join(name);
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Remember `entry` and append it to the history file
    pub async fn record(&mut self, entry: &str) -> std::io::Result<()> {
        let entry = entry.trim();
        if entry.is_empty() {
            return Ok(());
        }
        self.entries.push(entry.to_string());

        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(format!("{}\n", entry).as_bytes()).await?;
        file.flush().await
    }
}

/// Expand `input` to the single candidate it is a prefix of
///
/// Input that already names a candidate, or that matches none or several,
/// is left alone.
pub fn complete<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    if input.is_empty() {
        return None;
    }
    let mut matched: Option<&String> = None;
    for candidate in candidates {
        if candidate == input {
            return None;
        }
        if candidate.starts_with(input) {
            match matched {
                Some(existing) if existing != candidate => return None,
                _ => matched = Some(candidate),
            }
        }
    }
    matched.cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(input: &'static str) -> Prompt<&'static [u8], tokio::io::Sink> {
        Prompt::new(input.as_bytes(), tokio::io::sink())
    }

    #[tokio::test]
    async fn test_ask_reads_lines_until_eof() {
        let mut p = prompt("one\r\ntwo\n");
        assert_eq!(p.ask("> ").await.unwrap().as_deref(), Some("one"));
        assert_eq!(p.ask("> ").await.unwrap().as_deref(), Some("two"));
        assert_eq!(p.ask("> ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_ask_writes_prompt_text() {
        let mut out = Vec::new();
        {
            let mut p = Prompt::new("x\n".as_bytes(), &mut out);
            p.ask("topic: ").await.unwrap();
        }
        assert_eq!(out, b"topic: ");
    }

    #[tokio::test]
    async fn test_confirm_defaults_to_no_and_retries() {
        let mut p = prompt("maybe\nY\n\nno\n");
        assert_eq!(p.confirm("bg?").await.unwrap(), Some(true));
        assert_eq!(p.confirm("bg?").await.unwrap(), Some(false));
        assert_eq!(p.confirm("bg?").await.unwrap(), Some(false));
        assert_eq!(p.confirm("bg?").await.unwrap(), None);
    }

    #[test]
    fn test_complete_unique_prefix() {
        let topics = vec!["orders".to_string(), "payments".to_string(), "pay-dlq".to_string()];
        assert_eq!(complete("ord", &topics), Some("orders".to_string()));
        assert_eq!(complete("pay", &topics), None);
        assert_eq!(complete("orders", &topics), None);
        assert_eq!(complete("zzz", &topics), None);
        assert_eq!(complete("", &topics), None);
    }

    #[test]
    fn test_complete_ignores_duplicate_candidates() {
        let topics = vec!["orders".to_string(), "orders".to_string()];
        assert_eq!(complete("o", &topics), Some("orders".to_string()));
    }

    #[tokio::test]
    async fn test_history_persists_entries() {
        let dir = tempfile::tempdir().unwrap();
        let history_dir = dir.path().join("nested");

        let mut history = History::load(&history_dir, TOPIC_HISTORY_FILE).await.unwrap();
        assert!(history.entries().is_empty());
        history.record("orders").await.unwrap();
        history.record("  ").await.unwrap();
        history.record("payments").await.unwrap();

        let reloaded = History::load(&history_dir, TOPIC_HISTORY_FILE).await.unwrap();
        assert_eq!(reloaded.entries(), ["orders", "payments"]);
    }

    #[tokio::test]
    async fn test_in_memory_history_writes_nothing() {
        let mut history = History::in_memory();
        history.record("orders").await.unwrap();
        assert_eq!(history.entries(), ["orders"]);
    }
}
