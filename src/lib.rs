//! **newsgrid** — the state store behind a multi-stream monitoring
//! dashboard.
//!
//! Live video streams are arranged as tiles on a 12-column grid, grouped
//! into up to five named workspaces.  This crate holds the single source of
//! truth for that arrangement: which workspaces exist, which streams each
//! one shows, every stream's mute flag and grid rectangle, and the global
//! mute toggle.  The state is persisted as one versioned JSON document and
//! migrated forward when an older schema is found.
//!
//! # Architecture
//!
//! * [`store::MonitorStore`] — the aggregate and its total, no-op-on-stale
//!   mutators.
//! * [`persistence`] and [`migration`] — the versioned document and the
//!   ordered chain of pure migration steps.
//! * [`dashboard::Dashboard`] — owns the store, applies the control
//!   surface's input policy, and saves after every [`command::Command`].
//! * [`layout`] and [`provider`] — what the grid renderer and the stream
//!   tiles need to draw: auto placement and URL classification.
//!
//! Two traits keep the core independent of its surroundings:
//!
//! * [`traits::StateStorage`] — where the document lives
//!   ([`storage::FileStorage`], [`storage::MemoryStorage`], …).
//! * [`traits::CommandSource`] — where commands come from
//!   ([`ipc::listener::UnixSocketListener`], …).

pub mod command;
pub mod config;
pub mod dashboard;
pub mod ipc;
pub mod layout;
pub mod migration;
pub mod model;
pub mod persistence;
pub mod provider;
pub mod storage;
pub mod store;
pub mod traits;
