//! IPC command source backed by a Unix socket.
//!
//! Front-end bridges and scripts connect to the socket and send
//! newline-delimited JSON [`Command`](crate::command::Command)s.

pub mod listener;
