//! Commands understood by the dashboard.
//!
//! [`Command`] is the shared vocabulary of every external surface: the
//! control surface (add stream, global mute, reset layout), the workspace
//! strip, the stream tiles (mute, remove) and the grid renderer (layout
//! commits).
//!
//! Commands travel as externally tagged JSON, one per line:
//!
//! ```json
//! {"AddStream":{"url":"https://youtu.be/abc"}}
//! {"AddWorkspace":{}}
//! {"RenameWorkspace":{"id":"preset-news","name":"Headlines"}}
//! "ToggleGlobalMute"
//! {"UpdateLayout":[{"i":"preset-news-1","x":0,"y":0,"w":6,"h":4}]}
//! ```

use crate::model::{LayoutEntry, StreamId, WorkspaceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every action the dashboard can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Dashboard`](crate::dashboard::Dashboard).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Create a workspace and switch to it.  Without a name the workspace
    /// strip's default `"Workspace N"` is used.
    AddWorkspace {
        #[serde(default)]
        name: Option<String>,
    },

    /// Delete a workspace (never the last one).
    RemoveWorkspace { id: WorkspaceId },

    /// Rename a workspace.  Blank names are ignored.
    RenameWorkspace { id: WorkspaceId, name: String },

    /// Switch the visible workspace.
    SetActiveWorkspace { id: WorkspaceId },

    /// Add a stream to the active workspace from the URL input.
    AddStream { url: String },

    /// Close a tile in the active workspace.
    RemoveStream { id: StreamId },

    /// Flip one tile's mute flag.
    ToggleMute { id: StreamId },

    /// Flip global mute and apply it to every stream everywhere.
    ///
    /// On the wire this is encoded as the JSON string `"ToggleGlobalMute"`.
    ToggleGlobalMute,

    /// A drag/resize commit from the grid renderer: the full list of tile
    /// rectangles of the active workspace.
    UpdateLayout(Vec<LayoutEntry>),

    /// Forget every stored rectangle in the active workspace.
    ResetLayout,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::AddWorkspace { name: Some(name) } => write!(f, "add workspace {:?}", name),
            Command::AddWorkspace { name: None } => write!(f, "add workspace"),
            Command::RemoveWorkspace { id } => write!(f, "remove workspace {}", id),
            Command::RenameWorkspace { id, name } => write!(f, "rename workspace {} to {:?}", id, name),
            Command::SetActiveWorkspace { id } => write!(f, "activate workspace {}", id),
            Command::AddStream { url } => write!(f, "add stream {}", url),
            Command::RemoveStream { id } => write!(f, "remove stream {}", id),
            Command::ToggleMute { id } => write!(f, "toggle mute {}", id),
            Command::ToggleGlobalMute => write!(f, "toggle global mute"),
            Command::UpdateLayout(entries) => write!(f, "update layout ({} tiles)", entries.len()),
            Command::ResetLayout => write!(f, "reset layout"),
        }
    }
}
