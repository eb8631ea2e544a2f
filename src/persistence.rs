//! Persistence boundary of the state store.
//!
//! The whole store is saved as a single versioned JSON document under a
//! fixed key:
//!
//! ```json
//! {
//!   "version": 2,
//!   "state": {
//!     "workspaces": [{ "id": "preset-news", "name": "News", "streams": [] }],
//!     "activeWorkspaceId": "preset-news",
//!     "isGlobalMuted": true
//!   }
//! }
//! ```
//!
//! Loading runs the [`migration`](crate::migration) chain when the stored
//! version is older than [`CURRENT_VERSION`].  Anything that goes wrong on
//! load (nothing stored, unreadable storage, malformed JSON, a newer
//! version, an empty workspace list) ends in the builtin defaults; see
//! [`load_or_default`].

use crate::migration::{migrate, MigrationError, CURRENT_VERSION};
use crate::store::{MonitorStore, StoreState};
use crate::traits::StateStorage;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// Key the document is stored under.
pub const STORAGE_KEY: &str = "newsgrid-state";

/// Errors from loading or saving the persisted document.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] MigrationError),
    #[error("invalid state: {0}")]
    Invalid(String),
}

#[derive(Serialize)]
struct Document<'a> {
    version: u32,
    state: &'a StoreState,
}

/// Serialize `store` as a current-version document.
pub fn encode(store: &MonitorStore) -> Result<String, PersistError> {
    let doc = Document {
        version: CURRENT_VERSION,
        state: store.state(),
    };
    Ok(serde_json::to_string(&doc)?)
}

/// Parse a stored document, migrating it to the current schema.
///
/// Documents without a `state` member are taken to be a bare state from
/// before the document was versioned, i.e. version 0.
pub fn decode(blob: &str) -> Result<MonitorStore, PersistError> {
    let doc: Value = serde_json::from_str(blob)?;
    let (version, state) = split_document(doc)?;
    if version < CURRENT_VERSION {
        info!("migrating stored state from v{} to v{}", version, CURRENT_VERSION);
    }
    let state = migrate(state, version)?;
    let state: StoreState = serde_json::from_value(state)?;
    Ok(MonitorStore::from_state(validate(state)?))
}

/// Read and decode the document under `key`.
///
/// Returns `Ok(None)` when nothing is stored.
pub fn load<S: StateStorage>(storage: &S, key: &str) -> Result<Option<MonitorStore>, PersistError> {
    let blob = storage
        .read(key)
        .map_err(|e| PersistError::Storage(e.to_string()))?;
    blob.as_deref().map(decode).transpose()
}

/// Load the store, falling back to the builtin defaults on any failure.
pub fn load_or_default<S: StateStorage>(storage: &S, key: &str) -> MonitorStore {
    match load(storage, key) {
        Ok(Some(store)) => {
            debug!("loaded {} workspace(s) from {:?}", store.workspaces().len(), key);
            store
        }
        Ok(None) => {
            info!("no stored state under {:?}, using defaults", key);
            MonitorStore::default()
        }
        Err(e) => {
            warn!("discarding stored state under {:?} ({}), using defaults", key, e);
            MonitorStore::default()
        }
    }
}

/// Write `store` under `key`.
pub fn save<S: StateStorage>(storage: &S, key: &str, store: &MonitorStore) -> Result<(), PersistError> {
    let blob = encode(store)?;
    storage
        .write(key, &blob)
        .map_err(|e| PersistError::Storage(e.to_string()))
}

//  Internal

fn split_document(doc: Value) -> Result<(u32, Value), PersistError> {
    let Value::Object(mut fields) = doc else {
        return Err(PersistError::Invalid("document is not an object".into()));
    };
    let Some(state) = fields.remove("state") else {
        return Ok((0, Value::Object(fields)));
    };
    let version = match fields.get("version") {
        None | Some(Value::Null) => 0,
        Some(v) => v
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| PersistError::Invalid(format!("bad version tag {}", v)))?,
    };
    Ok((version, state))
}

/// Reject states the store cannot work with and repair a dangling active id.
///
/// Ids must be unique: workspace ids across the store, stream ids within
/// their workspace.  Removal by id would otherwise take out every copy.
fn validate(mut state: StoreState) -> Result<StoreState, PersistError> {
    let mut workspace_ids = HashSet::new();
    for ws in &state.workspaces {
        if !workspace_ids.insert(&ws.id) {
            return Err(PersistError::Invalid(format!("duplicate workspace id {}", ws.id)));
        }
        let mut stream_ids = HashSet::new();
        if let Some(dup) = ws.streams.iter().find(|s| !stream_ids.insert(&s.id)) {
            return Err(PersistError::Invalid(format!(
                "duplicate stream id {} in workspace {}",
                dup.id, ws.id
            )));
        }
    }

    let Some(first) = state.workspaces.first() else {
        return Err(PersistError::Invalid("no workspaces".into()));
    };
    let active = &state.active_workspace_id;
    if !state.workspaces.iter().any(|w| &w.id == active) {
        warn!("stored active workspace {} does not exist, activating {}", active, first.id);
        state.active_workspace_id = first.id.clone();
    }
    Ok(state)
}

//  Tests
