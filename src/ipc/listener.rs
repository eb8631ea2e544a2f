//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and serves one connection at a time.  Each
//! line received is parsed as a JSON-encoded [`Command`]; blank lines are
//! skipped and malformed ones are logged and dropped without closing the
//! connection.
//!
//! # Wire format
//!
//! ```json
//! {"AddStream":{"url":"https://www.twitch.tv/somechannel"}}
//! {"SetActiveWorkspace":{"id":"preset-news"}}
//! {"ToggleMute":{"id":"preset-news-1"}}
//! "ResetLayout"
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one line of the wire protocol.
///
/// Returns `None` for blank lines.
pub fn parse_line(line: &str) -> Option<Result<Command, UnixSocketError>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line).map_err(UnixSocketError::from))
}

impl UnixSocketListener {
    /// Create a listener for `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called
    /// and removed when the listener is dropped.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forward every command of one connection.  Returns `false` once the
    /// sink is gone.
    fn serve<R: BufRead>(reader: R, sink: &mpsc::Sender<Command>) -> bool {
        for line in reader.lines() {
            let text = match line {
                Ok(text) => text,
                Err(e) => {
                    warn!("read error: {}", e);
                    break;
                }
            };
            match parse_line(&text) {
                None => continue,
                Some(Ok(cmd)) => {
                    debug!("received {:?}", cmd);
                    if sink.send(cmd).is_err() {
                        return false;
                    }
                }
                Some(Err(e)) => error!("bad command {:?}: {}", text, e),
            }
        }
        true
    }
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the receiving end of `sink` is dropped.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // A previous instance may have left its socket behind.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    debug!("client connected");
                    if !Self::serve(BufReader::new(stream), &sink) {
                        info!("sink closed, shutting down");
                        return Ok(());
                    }
                    debug!("client disconnected");
                }
                Err(e) => error!("accept error: {}", e),
            }
        }
        Ok(())
    }
}

impl Drop for UnixSocketListener {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

//  Tests
