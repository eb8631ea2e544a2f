//! The control layer that ties the store, its storage and the command
//! sources together.
//!
//! [`Dashboard`] owns the [`MonitorStore`] and reacts to [`Command`]s by
//! applying the input policy of the control surface, mutating the store,
//! and writing the result back to the [`StateStorage`].

use crate::command::Command;
use crate::config::LimitsConfig;
use crate::persistence::{self, PersistError};
use crate::store::MonitorStore;
use crate::traits::StateStorage;
use log::{debug, info, warn};

/// Orchestrates store mutations and persistence.
///
/// The dashboard is generic over any [`StateStorage`] implementation, so the
/// same policy runs against a directory on disk, an in-memory map, or a
/// bridge to browser storage.
///
/// # Typical usage
///
/// ```ignore
/// let storage = FileStorage::new("/var/lib/newsgrid");
/// let mut dashboard = Dashboard::open(storage, STORAGE_KEY, LimitsConfig::default());
/// dashboard.handle(Command::AddStream { url: "https://youtu.be/abc".into() });
/// ```
pub struct Dashboard<S: StateStorage> {
    storage: S,
    key: String,
    store: MonitorStore,
    limits: LimitsConfig,
}

impl<S: StateStorage> Dashboard<S> {
    /// Load the store from `storage` (falling back to the builtin defaults)
    /// and wrap it.
    pub fn open(storage: S, key: impl Into<String>, limits: LimitsConfig) -> Self {
        let key = key.into();
        let store = persistence::load_or_default(&storage, &key);
        info!(
            "dashboard ready: {} workspace(s), active {}",
            store.workspaces().len(),
            store.active_workspace_id()
        );
        Self {
            storage,
            key,
            store,
            limits,
        }
    }

    /// Read access to the store for the renderers.
    pub fn store(&self) -> &MonitorStore {
        &self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Apply a single [`Command`] and persist the result.
    ///
    /// Commands never fail: stale ids and limits turn into no-ops, and a
    /// failed save is logged and otherwise ignored (the next mutation writes
    /// the whole document again).
    pub fn handle(&mut self, cmd: Command) {
        debug!("handling: {}", cmd);
        match cmd {
            Command::AddWorkspace { name } => {
                let name = name
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("Workspace {}", self.store.workspaces().len() + 1));
                if self.store.add_workspace(name).is_none() {
                    debug!("workspace limit reached");
                }
            }

            Command::RemoveWorkspace { id } => self.store.remove_workspace(&id),

            Command::RenameWorkspace { id, name } => {
                let name = name.trim();
                if name.is_empty() {
                    debug!("ignoring blank name for workspace {}", id);
                    return;
                }
                self.store.rename_workspace(&id, name);
            }

            Command::SetActiveWorkspace { id } => {
                if self.store.workspace(&id).is_none() {
                    warn!("activating unknown workspace {}", id);
                }
                self.store.set_active_workspace(id);
            }

            Command::AddStream { url } => {
                if url.trim().is_empty() {
                    debug!("ignoring empty stream url");
                    return;
                }
                let count = self
                    .store
                    .active_workspace()
                    .map(|ws| ws.streams.len())
                    .unwrap_or(0);
                if count >= self.limits.max_streams {
                    info!("stream limit ({}) reached, ignoring {}", self.limits.max_streams, url);
                    return;
                }
                if self.store.add_stream(url.as_str()).is_none() {
                    warn!("no active workspace to add {} to", url);
                }
            }

            Command::RemoveStream { id } => self.store.remove_stream(&id),

            Command::ToggleMute { id } => self.store.toggle_mute(&id),

            Command::ToggleGlobalMute => self.store.toggle_global_mute(),

            Command::UpdateLayout(entries) => self.store.update_layout(&entries),

            Command::ResetLayout => self.store.reset_layout(),
        }
        self.persist();
    }

    /// Write the current store back to storage.
    pub fn save(&self) -> Result<(), PersistError> {
        persistence::save(&self.storage, &self.key, &self.store)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("failed to persist state: {}", e);
        }
    }
}

//  Tests
