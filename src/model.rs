//! Data model shared by the store, the migration chain and the renderers.
//!
//! [`Stream`] is one video tile, [`Workspace`] a named tab holding an ordered
//! list of streams, and [`Layout`] the rectangle a tile occupies on the grid.
//! Field names serialize in camelCase because the persisted document and the
//! front-end both use that spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a [`Stream`].
///
/// Freshly created streams get a v4 UUID; ids read back from storage (or
/// fixed by the builtin preset) are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(String);

impl StreamId {
    /// Generate a new collision-resistant id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StreamId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for StreamId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier of a [`Workspace`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(String);

impl WorkspaceId {
    /// Generate a new collision-resistant id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkspaceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for WorkspaceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tile rectangle in grid-cell units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Layout {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// One `{ i, x, y, w, h }` record as reported by the grid renderer after a
/// drag or resize.  `i` is the id of the stream the rectangle belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    #[serde(rename = "i")]
    pub id: StreamId,
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl LayoutEntry {
    pub fn new(id: impl Into<StreamId>, layout: Layout) -> Self {
        Self {
            id: id.into(),
            x: layout.x,
            y: layout.y,
            w: layout.w,
            h: layout.h,
        }
    }

    /// The rectangle without the stream id.
    pub fn layout(&self) -> Layout {
        Layout::new(self.x, self.y, self.w, self.h)
    }
}

/// One video source tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub id: StreamId,
    pub url: String,
    pub is_muted: bool,
    /// Absent until the grid renderer first reports a position.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
}

impl Stream {
    /// A new muted stream with a fresh id and no layout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: StreamId::generate(),
            url: url.into(),
            is_muted: true,
            layout: None,
        }
    }
}

/// A named, independently laid-out collection of streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    /// Insertion order is tile creation order.
    #[serde(default)]
    pub streams: Vec<Stream>,
}

impl Workspace {
    /// An empty workspace with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WorkspaceId::generate(),
            name: name.into(),
            streams: Vec::new(),
        }
    }

    pub fn stream(&self, id: &StreamId) -> Option<&Stream> {
        self.streams.iter().find(|s| &s.id == id)
    }

    pub(crate) fn stream_mut(&mut self, id: &StreamId) -> Option<&mut Stream> {
        self.streams.iter_mut().find(|s| &s.id == id)
    }
}
