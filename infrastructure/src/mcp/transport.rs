//! Line-framed transports to tool-provider servers.
//!
//! Two kinds, selected by the server descriptor:
//!
//! - **Subprocess**: spawn `command args...` and speak over its standard
//!   input/output pipes. The child inherits the ambient environment
//!   merged with the descriptor's `env` entries, and dies with us
//!   (`kill_on_drop`, plus `PR_SET_PDEATHSIG` on Linux for the cases
//!   where Drop never runs).
//! - **Network stream**: a persistent TCP connection to the descriptor's
//!   `base_url` (`tcp://host:port` or bare `host:port`).
//!
//! Both carry one JSON document per line in each direction.

use std::collections::BTreeMap;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tracing::{debug, trace};

use crate::mcp::error::{McpError, Result};

/// A live, line-framed connection to one tool-provider server.
pub struct Transport {
    reader: Box<dyn tokio::io::AsyncBufRead + Send + Unpin>,
    writer: Box<dyn AsyncWrite + Send + Unpin>,
    /// Held so a spawned server lives exactly as long as its transport.
    _child: Option<Child>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("has_child", &self._child.is_some())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Spawn a subprocess server and attach to its pipes.
    pub async fn spawn(
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
    ) -> Result<Self> {
        debug!("Spawning tool server: {} {}", command, args.join(" "));

        let mut cmd = Command::new(command);
        cmd.args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(|source| McpError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            McpError::UnexpectedResponse("Failed to capture server stdin".into())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            McpError::UnexpectedResponse("Failed to capture server stdout".into())
        })?;

        let mut transport = Self::from_io(stdout, stdin);
        transport._child = Some(child);
        Ok(transport)
    }

    /// Connect a persistent stream to a network server.
    pub async fn connect(base_url: &str) -> Result<Self> {
        let address = stream_address(base_url);
        debug!("Connecting to tool server at {}", address);

        let stream = TcpStream::connect(&address)
            .await
            .map_err(|source| McpError::Connect {
                address: address.clone(),
                source,
            })?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self::from_io(read_half, write_half))
    }

    /// Build a transport from raw I/O halves. Used by both constructors
    /// and by in-memory test peers.
    pub fn from_io(
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            reader: Box::new(BufReader::new(reader)),
            writer: Box::new(writer),
            _child: None,
        }
    }

    /// Write one JSON document as a single line.
    pub async fn send(&mut self, payload: &str) -> Result<()> {
        trace!("Transport sending: {}", payload);
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    /// Read the next non-empty line.
    ///
    /// Returns [`McpError::TransportClosed`] on EOF (the peer exited or
    /// hung up).
    pub async fn recv(&mut self) -> Result<String> {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self.reader.read_line(&mut line).await?;
            if bytes_read == 0 {
                return Err(McpError::TransportClosed);
            }
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                trace!("Transport received: {}", trimmed);
                return Ok(trimmed.to_string());
            }
        }
    }
}

/// Reduce a configured `base_url` to a socket address.
///
/// Accepts `tcp://host:port` or bare `host:port`; a trailing slash is
/// tolerated.
fn stream_address(base_url: &str) -> String {
    base_url
        .strip_prefix("tcp://")
        .unwrap_or(base_url)
        .trim_end_matches('/')
        .to_string()
}
