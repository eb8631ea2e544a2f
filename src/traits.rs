//! Core traits that decouple the dashboard from any specific storage medium
//! or command transport.
//!
//! The [`Dashboard`](crate::dashboard::Dashboard) only depends on these
//! abstractions; concrete backends live in [`storage`](crate::storage) and
//! [`ipc`](crate::ipc).

use crate::command::Command;
use std::sync::mpsc;

/// A key-value blob store holding serialized documents.
///
/// This is the persistence boundary of the state store: one string value
/// per key, last write wins.  An implementation might be a directory of
/// files, an in-memory map used in tests, or a browser's origin-scoped
/// local storage behind a bridge.
pub trait StateStorage {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Read the value stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

//  Command Source

/// A source of [`Command`]s.
///
/// Implementations listen on some transport (a Unix socket, a web-view
/// bridge, a test harness, …) and forward parsed commands into the provided
/// [`mpsc::Sender`].  The dashboard does not know where commands come from.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received command must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming [`Command`] into `sink`.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error>;
}
