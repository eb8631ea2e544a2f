//! Auto-layout policy and the render view handed to the grid renderer.
//!
//! Streams that have never been placed by the renderer (or whose layout was
//! reset) get a deterministic position derived from their index in the
//! workspace: three 4×4 tiles per row on a 12-column grid.  Any renderer
//! must reproduce [`auto_layout`] exactly so that fresh and reset
//! workspaces look the same everywhere.

use crate::model::{Layout, LayoutEntry, StreamId, Workspace, WorkspaceId};
use crate::provider::Provider;
use crate::store::MonitorStore;
use serde::Serialize;

/// Number of columns of the grid.
pub const GRID_COLUMNS: u32 = 12;

/// Width and height of an auto-placed tile.
pub const TILE_SIZE: u32 = 4;

/// Placement for the stream at `index` (0-based) when it has no layout.
///
/// `x = (index * 4) mod 12`, `y = floor(index / 3) * 4`, `w = h = 4`.
pub fn auto_layout(index: usize) -> Layout {
    let tiles_per_row = (GRID_COLUMNS / TILE_SIZE) as usize;
    let x = (index * TILE_SIZE as usize) % GRID_COLUMNS as usize;
    let y = (index / tiles_per_row) * TILE_SIZE as usize;
    Layout::new(x as u32, y as u32, TILE_SIZE, TILE_SIZE)
}

/// The layout of every stream in `workspace`, in stream order: the stored
/// rectangle if there is one, the auto placement otherwise.
pub fn resolve_layout(workspace: &Workspace) -> Vec<LayoutEntry> {
    workspace
        .streams
        .iter()
        .enumerate()
        .map(|(i, s)| LayoutEntry::new(s.id.clone(), s.layout.unwrap_or_else(|| auto_layout(i))))
        .collect()
}

/// Everything a stream tile needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub id: StreamId,
    pub url: String,
    pub is_muted: bool,
    /// `None` means the tile shows its "unsupported stream" indicator.
    pub provider: Option<Provider>,
    pub layout: Layout,
}

/// Render view of one workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceView {
    pub id: WorkspaceId,
    pub name: String,
    pub tiles: Vec<TileView>,
}

impl WorkspaceView {
    pub fn new(workspace: &Workspace) -> Self {
        let tiles = workspace
            .streams
            .iter()
            .zip(resolve_layout(workspace))
            .map(|(s, entry)| TileView {
                id: s.id.clone(),
                url: s.url.clone(),
                is_muted: s.is_muted,
                provider: Provider::detect(&s.url),
                layout: entry.layout(),
            })
            .collect();
        Self {
            id: workspace.id.clone(),
            name: workspace.name.clone(),
            tiles,
        }
    }
}

/// Render view of the store's active workspace, if it resolves.
pub fn workspace_view(store: &MonitorStore) -> Option<WorkspaceView> {
    store.active_workspace().map(WorkspaceView::new)
}
