//! Sending lines to a topic from a file or from the prompt

use super::error::{AppError, AppResult};
use super::prompt::Prompt;
use crate::broker::{BrokerResult, Producer};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncWrite};

/// Send each line as one record, returning how many were sent
pub async fn send_lines<I, S>(producer: &dyn Producer, topic: &str, lines: I) -> BrokerResult<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sent = 0;
    for line in lines {
        producer.send(topic, line.as_ref().as_bytes().to_vec()).await?;
        sent += 1;
    }
    Ok(sent)
}

/// Send every line of `path`, empty lines included
pub async fn produce_file(producer: &dyn Producer, topic: &str, path: &Path) -> AppResult<usize> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
    let sent = send_lines(producer, topic, contents.lines()).await?;
    log::info!("sent {} line(s) from {} to '{}'", sent, path.display(), topic);
    Ok(sent)
}

/// Send each line typed at the prompt until input ends
pub async fn produce_interactive<R, W>(
    prompt: &mut Prompt<R, W>,
    producer: &dyn Producer,
    topic: &str,
) -> AppResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut sent = 0;
    while let Some(line) = prompt.ask("> ").await? {
        producer.send(topic, line.into_bytes()).await?;
        sent += 1;
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{Broker, MemoryBroker};
    use std::io::Write;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_produce_file_sends_every_line() {
        let broker = MemoryBroker::new(vec!["k:9092".to_string()]);
        let mut stream = broker.subscribe("orders", "test").await.unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first\n\nthird\n").unwrap();

        let sent = produce_file(broker.producer().as_ref(), "orders", file.path())
            .await
            .unwrap();
        assert_eq!(sent, 3);

        let mut values = Vec::new();
        while let Some(record) = stream.poll(WAIT).await.unwrap() {
            values.push(record.value);
        }
        assert_eq!(values, vec![b"first".to_vec(), b"".to_vec(), b"third".to_vec()]);
    }

    #[tokio::test]
    async fn test_produce_file_missing() {
        let broker = MemoryBroker::new(vec!["k:9092".to_string()]);
        let dir = tempfile::tempdir().unwrap();
        let result = produce_file(
            broker.producer().as_ref(),
            "orders",
            &dir.path().join("missing.txt"),
        )
        .await;
        assert!(matches!(result, Err(AppError::ReadFile { .. })));
        assert_eq!(broker.head_offset("orders").unwrap(), None);
    }

    #[tokio::test]
    async fn test_produce_interactive_until_eof() {
        let broker = MemoryBroker::new(vec!["k:9092".to_string()]);
        let mut prompt = Prompt::new("a\nb\n".as_bytes(), tokio::io::sink());
        let sent = produce_interactive(&mut prompt, broker.producer().as_ref(), "orders")
            .await
            .unwrap();
        assert_eq!(sent, 2);
        assert_eq!(broker.head_offset("orders").unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_send_lines_rejects_bad_topic() {
        let broker = MemoryBroker::new(vec!["k:9092".to_string()]);
        let result = send_lines(broker.producer().as_ref(), "bad topic", ["x"]).await;
        assert!(result.is_err());
    }
}
