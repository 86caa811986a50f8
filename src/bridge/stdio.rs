use super::BridgeError;
use crate::flight_control::Command;
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Line-oriented inbound transport.
#[async_trait]
pub trait MessageSource: Send {
    /// Next raw line, `None` once the stream has ended.
    async fn next_line(&mut self) -> Result<Option<String>, BridgeError>;
}

pub struct StdinSource {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinSource {
    pub fn new() -> Self { Self { lines: BufReader::new(tokio::io::stdin()).lines() } }
}

impl Default for StdinSource {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl MessageSource for StdinSource {
    async fn next_line(&mut self) -> Result<Option<String>, BridgeError> {
        self.lines.next_line().await.map_err(BridgeError::Io)
    }
}

/// Fixed script of lines standing in for stdin in tests.
pub struct ScriptedSource {
    lines: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }
}

#[async_trait]
impl MessageSource for ScriptedSource {
    async fn next_line(&mut self) -> Result<Option<String>, BridgeError> { Ok(self.lines.pop_front()) }
}

/// Writes every command as one JSON line until the channel closes or
/// `c_tok` is cancelled.
pub async fn run_outbound<W>(mut rx: mpsc::Receiver<Command>, mut out: W, c_tok: CancellationToken) -> Result<(), BridgeError>
where
    W: AsyncWrite + Unpin + Send,
{
    loop {
        let command = tokio::select! {
            () = c_tok.cancelled() => break,
            command = rx.recv() => match command {
                Some(command) => command,
                None => break,
            },
        };
        let mut line = serde_json::to_vec(&command).map_err(BridgeError::Malformed)?;
        line.push(b'\n');
        out.write_all(&line).await.map_err(BridgeError::Io)?;
        out.flush().await.map_err(BridgeError::Io)?;
    }
    out.flush().await.map_err(BridgeError::Io)
}
