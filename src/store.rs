//! The workspace / stream state store.
//!
//! [`MonitorStore`] holds the canonical [`StoreState`] and is the only place
//! it is mutated.  Every operation is total: stale ids and capacity limits
//! degrade to no-ops instead of errors, because the callers are UI event
//! handlers that may still reference entities removed a moment ago.
//!
//! The store is a plain owned value.  Whoever constructs it (normally the
//! [`Dashboard`](crate::dashboard::Dashboard)) passes it by reference to the
//! renderers; there is no global instance.

use crate::model::{LayoutEntry, Stream, StreamId, Workspace, WorkspaceId};
use log::debug;
use serde::{Deserialize, Serialize};

/// Hard cap on the number of workspaces.
pub const MAX_WORKSPACES: usize = 5;

/// Id of the builtin preset workspace.
pub const PRESET_WORKSPACE_ID: &str = "preset-news";

/// Display name of the builtin preset workspace.
pub const PRESET_WORKSPACE_NAME: &str = "News";

/// Id and name of the workspace that unversioned stream lists are wrapped in.
pub const MAIN_WORKSPACE_ID: &str = "default";
pub const MAIN_WORKSPACE_NAME: &str = "Main";

const PRESET_STREAMS: [(&str, &str); 3] = [
    ("preset-news-1", "https://www.youtube.com/@SkyNews/live"),
    ("preset-news-2", "https://www.youtube.com/@aljazeeraenglish/live"),
    ("preset-news-3", "https://www.youtube.com/@dwnews/live"),
];

/// The builtin preset workspace: fixed id, fixed name, three muted streams.
pub fn preset_workspace() -> Workspace {
    Workspace {
        id: PRESET_WORKSPACE_ID.into(),
        name: PRESET_WORKSPACE_NAME.into(),
        streams: PRESET_STREAMS
            .iter()
            .map(|(id, url)| Stream {
                id: (*id).into(),
                url: (*url).into(),
                is_muted: true,
                layout: None,
            })
            .collect(),
    }
}

/// The serializable root aggregate.
///
/// This is exactly the `state` part of the persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub workspaces: Vec<Workspace>,
    pub active_workspace_id: WorkspaceId,
    pub is_global_muted: bool,
}

impl Default for StoreState {
    /// The builtin workspace set used when nothing usable is persisted: the
    /// preset (active) followed by an empty "Main" workspace.
    fn default() -> Self {
        Self {
            workspaces: vec![
                preset_workspace(),
                Workspace {
                    id: MAIN_WORKSPACE_ID.into(),
                    name: MAIN_WORKSPACE_NAME.into(),
                    streams: Vec::new(),
                },
            ],
            active_workspace_id: PRESET_WORKSPACE_ID.into(),
            is_global_muted: true,
        }
    }
}

/// Owner of the canonical [`StoreState`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorStore {
    state: StoreState,
}

impl MonitorStore {
    /// Wrap an already validated state.
    pub fn from_state(state: StoreState) -> Self {
        Self { state }
    }

    //  Reads

    pub fn workspaces(&self) -> &[Workspace] {
        &self.state.workspaces
    }

    pub fn active_workspace_id(&self) -> &WorkspaceId {
        &self.state.active_workspace_id
    }

    /// The active workspace, or `None` if the active id does not resolve
    /// (possible only after [`set_active_workspace`](Self::set_active_workspace)
    /// with an unknown id).
    pub fn active_workspace(&self) -> Option<&Workspace> {
        self.workspace(&self.state.active_workspace_id)
    }

    pub fn workspace(&self, id: &WorkspaceId) -> Option<&Workspace> {
        self.state.workspaces.iter().find(|w| &w.id == id)
    }

    pub fn is_global_muted(&self) -> bool {
        self.state.is_global_muted
    }

    /// An owned copy of the whole aggregate, suitable for serialization.
    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    /// Borrow the aggregate without cloning.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    //  Workspace operations

    /// Append a new empty workspace and make it active.
    ///
    /// Returns the new id, or `None` when [`MAX_WORKSPACES`] is reached.
    pub fn add_workspace(&mut self, name: impl Into<String>) -> Option<WorkspaceId> {
        if self.state.workspaces.len() >= MAX_WORKSPACES {
            debug!("workspace limit reached, not adding");
            return None;
        }
        let ws = Workspace::new(name);
        let id = ws.id.clone();
        self.state.workspaces.push(ws);
        self.state.active_workspace_id = id.clone();
        Some(id)
    }

    /// Remove a workspace, keeping at least one.
    ///
    /// When the active workspace is removed, the first remaining one
    /// becomes active.
    pub fn remove_workspace(&mut self, id: &WorkspaceId) {
        if self.state.workspaces.len() <= 1 {
            debug!("refusing to remove the last workspace");
            return;
        }
        let before = self.state.workspaces.len();
        self.state.workspaces.retain(|w| &w.id != id);
        if self.state.workspaces.len() == before {
            return;
        }
        if &self.state.active_workspace_id == id {
            if let Some(first) = self.state.workspaces.first() {
                self.state.active_workspace_id = first.id.clone();
            }
        }
    }

    /// Rename a workspace.  Empty names are accepted here; rejecting them is
    /// the control layer's job.
    pub fn rename_workspace(&mut self, id: &WorkspaceId, name: impl Into<String>) {
        if let Some(ws) = self.state.workspaces.iter_mut().find(|w| &w.id == id) {
            ws.name = name.into();
        }
    }

    /// Set the active workspace id as given, without checking it exists.
    pub fn set_active_workspace(&mut self, id: WorkspaceId) {
        self.state.active_workspace_id = id;
    }

    //  Stream operations (active workspace)

    /// Append a new muted stream to the active workspace.
    ///
    /// The URL is not validated.  Returns `None` if the active id does not
    /// resolve.
    pub fn add_stream(&mut self, url: impl Into<String>) -> Option<StreamId> {
        let ws = self.active_workspace_mut()?;
        let stream = Stream::new(url);
        let id = stream.id.clone();
        ws.streams.push(stream);
        Some(id)
    }

    pub fn remove_stream(&mut self, id: &StreamId) {
        if let Some(ws) = self.active_workspace_mut() {
            ws.streams.retain(|s| &s.id != id);
        }
    }

    /// Flip one stream's mute flag.  `is_global_muted` is left alone.
    pub fn toggle_mute(&mut self, id: &StreamId) {
        if let Some(stream) = self.active_workspace_mut().and_then(|ws| ws.stream_mut(id)) {
            stream.is_muted = !stream.is_muted;
        }
    }

    /// Flip the global flag and force every stream in every workspace to the
    /// new value.  Individual mute choices are overwritten.
    pub fn toggle_global_mute(&mut self) {
        let muted = !self.state.is_global_muted;
        self.state.is_global_muted = muted;
        for stream in self
            .state
            .workspaces
            .iter_mut()
            .flat_map(|w| w.streams.iter_mut())
        {
            stream.is_muted = muted;
        }
    }

    /// Fold renderer-reported rectangles into the active workspace.
    ///
    /// Streams without a matching entry keep their previous layout; entries
    /// for unknown ids are ignored.
    pub fn update_layout(&mut self, entries: &[LayoutEntry]) {
        let Some(ws) = self.active_workspace_mut() else {
            return;
        };
        for entry in entries {
            if let Some(stream) = ws.stream_mut(&entry.id) {
                stream.layout = Some(entry.layout());
            }
        }
    }

    /// Clear every stored layout in the active workspace so the renderer
    /// falls back to auto placement.
    pub fn reset_layout(&mut self) {
        if let Some(ws) = self.active_workspace_mut() {
            for stream in &mut ws.streams {
                stream.layout = None;
            }
        }
    }

    //  Internal

    fn active_workspace_mut(&mut self) -> Option<&mut Workspace> {
        let active = &self.state.active_workspace_id;
        self.state.workspaces.iter_mut().find(|w| &w.id == active)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Layout;

    /// A store with one workspace "w1" holding streams "s1" and "s2".
    fn two_stream_store() -> MonitorStore {
        let ws = Workspace {
            id: "w1".into(),
            name: "One".into(),
            streams: vec![
                Stream {
                    id: "s1".into(),
                    url: "u1".into(),
                    is_muted: true,
                    layout: None,
                },
                Stream {
                    id: "s2".into(),
                    url: "u2".into(),
                    is_muted: false,
                    layout: Some(Layout::new(4, 0, 4, 4)),
                },
            ],
        };
        MonitorStore::from_state(StoreState {
            workspaces: vec![ws],
            active_workspace_id: "w1".into(),
            is_global_muted: false,
        })
    }

    #[test]
    fn default_store_starts_on_preset() {
        let store = MonitorStore::default();
        assert_eq!(store.workspaces().len(), 2);
        assert_eq!(store.active_workspace_id().as_str(), PRESET_WORKSPACE_ID);
        assert_eq!(store.active_workspace().unwrap().streams.len(), 3);
        assert!(store.is_global_muted());
    }

    #[test]
    fn snapshot_is_detached_from_later_mutations() {
        let mut store = two_stream_store();
        let snap = store.snapshot();
        assert_eq!(&snap, store.state());

        store.toggle_global_mute();
        store.remove_stream(&"s1".into());
        assert!(!snap.is_global_muted);
        assert_eq!(snap.workspaces[0].streams.len(), 2);
        assert_ne!(&snap, store.state());
        assert_eq!(MonitorStore::from_state(snap), two_stream_store());
    }

    #[test]
    fn add_workspace_activates_new_workspace() {
        let mut store = two_stream_store();
        let id = store.add_workspace("Two").unwrap();
        assert_eq!(store.active_workspace_id(), &id);
        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.name, "Two");
        assert!(ws.streams.is_empty());
    }

    #[test]
    fn add_workspace_never_exceeds_limit() {
        let mut store = two_stream_store();
        for i in 0..10 {
            store.add_workspace(format!("ws {}", i));
            assert!(store.workspaces().len() <= MAX_WORKSPACES);
        }
        assert_eq!(store.workspaces().len(), MAX_WORKSPACES);
    }

    #[test]
    fn add_workspace_at_limit_keeps_active() {
        let mut store = two_stream_store();
        while store.workspaces().len() < MAX_WORKSPACES {
            store.add_workspace("x");
        }
        let active = store.active_workspace_id().clone();
        assert!(store.add_workspace("overflow").is_none());
        assert_eq!(store.active_workspace_id(), &active);
    }

    #[test]
    fn remove_last_workspace_is_noop() {
        let mut store = two_stream_store();
        store.remove_workspace(&"w1".into());
        assert_eq!(store.workspaces().len(), 1);
    }

    #[test]
    fn remove_active_workspace_activates_first_remaining() {
        let mut store = MonitorStore::default();
        let added = store.add_workspace("Third").unwrap();
        store.remove_workspace(&added);
        assert_eq!(store.active_workspace_id().as_str(), PRESET_WORKSPACE_ID);
        assert!(store.active_workspace().is_some());

        store.remove_workspace(&PRESET_WORKSPACE_ID.into());
        assert_eq!(store.active_workspace_id().as_str(), MAIN_WORKSPACE_ID);
        assert!(store.active_workspace().is_some());
    }

    #[test]
    fn remove_inactive_workspace_keeps_active() {
        let mut store = MonitorStore::default();
        store.remove_workspace(&MAIN_WORKSPACE_ID.into());
        assert_eq!(store.workspaces().len(), 1);
        assert_eq!(store.active_workspace_id().as_str(), PRESET_WORKSPACE_ID);
    }

    #[test]
    fn remove_unknown_workspace_is_noop() {
        let mut store = MonitorStore::default();
        let before = store.clone();
        store.remove_workspace(&"nope".into());
        assert_eq!(store, before);
    }

    #[test]
    fn rename_workspace() {
        let mut store = two_stream_store();
        store.rename_workspace(&"w1".into(), "Renamed");
        assert_eq!(store.workspace(&"w1".into()).unwrap().name, "Renamed");
        store.rename_workspace(&"missing".into(), "Ghost");
        assert_eq!(store.workspaces().len(), 1);
    }

    #[test]
    fn set_active_workspace_accepts_unknown_id() {
        let mut store = two_stream_store();
        store.set_active_workspace("ghost".into());
        assert_eq!(store.active_workspace_id().as_str(), "ghost");
        assert!(store.active_workspace().is_none());
        // Active-workspace operations degrade to no-ops.
        assert!(store.add_stream("u").is_none());
        store.reset_layout();
    }

    #[test]
    fn add_stream_appends_muted_stream_to_active_workspace() {
        let mut store = MonitorStore::default();
        store.set_active_workspace(MAIN_WORKSPACE_ID.into());
        let id = store.add_stream("not even a url").unwrap();
        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.streams.len(), 1);
        let s = ws.stream(&id).unwrap();
        assert!(s.is_muted);
        assert!(s.layout.is_none());
        assert_eq!(s.url, "not even a url");
        // The preset workspace is untouched.
        assert_eq!(store.workspace(&PRESET_WORKSPACE_ID.into()).unwrap().streams.len(), 3);
    }

    #[test]
    fn remove_stream_only_in_active_workspace() {
        let mut store = MonitorStore::default();
        store.set_active_workspace(MAIN_WORKSPACE_ID.into());
        store.remove_stream(&"preset-news-1".into());
        assert_eq!(store.workspace(&PRESET_WORKSPACE_ID.into()).unwrap().streams.len(), 3);

        store.set_active_workspace(PRESET_WORKSPACE_ID.into());
        store.remove_stream(&"preset-news-1".into());
        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.streams.len(), 2);
        assert!(ws.stream(&"preset-news-1".into()).is_none());
    }

    #[test]
    fn toggle_mute_flips_single_stream() {
        let mut store = two_stream_store();
        store.toggle_mute(&"s1".into());
        let ws = store.active_workspace().unwrap();
        assert!(!ws.stream(&"s1".into()).unwrap().is_muted);
        assert!(!ws.stream(&"s2".into()).unwrap().is_muted);
        assert!(!store.is_global_muted());
        store.toggle_mute(&"absent".into());
    }

    #[test]
    fn toggle_global_mute_broadcasts_to_every_workspace() {
        let mut store = MonitorStore::default();
        store.set_active_workspace(MAIN_WORKSPACE_ID.into());
        store.add_stream("u");
        store.toggle_global_mute();
        assert!(!store.is_global_muted());
        for ws in store.workspaces() {
            for s in &ws.streams {
                assert!(!s.is_muted, "stream {} in {} still muted", s.id, ws.id);
            }
        }
    }

    #[test]
    fn toggle_global_mute_twice_restores_state() {
        // Every stream starts aligned with the global flag.
        let mut store = MonitorStore::default();
        let before = store.clone();
        store.toggle_global_mute();
        store.toggle_global_mute();
        assert_eq!(store, before);
    }

    #[test]
    fn toggle_global_mute_overwrites_individual_choice() {
        let mut store = two_stream_store();
        store.toggle_global_mute();
        let ws = store.active_workspace().unwrap();
        assert!(ws.streams.iter().all(|s| s.is_muted));
    }

    #[test]
    fn update_layout_is_partial() {
        let mut store = two_stream_store();
        store.update_layout(&[LayoutEntry::new("s1", Layout::new(1, 2, 3, 4))]);
        let ws = store.active_workspace().unwrap();
        assert_eq!(ws.stream(&"s1".into()).unwrap().layout, Some(Layout::new(1, 2, 3, 4)));
        assert_eq!(ws.stream(&"s2".into()).unwrap().layout, Some(Layout::new(4, 0, 4, 4)));
    }

    #[test]
    fn update_layout_ignores_unknown_ids_and_keeps_order() {
        let mut store = two_stream_store();
        store.update_layout(&[
            LayoutEntry::new("s2", Layout::new(0, 0, 4, 4)),
            LayoutEntry::new("ghost", Layout::new(8, 8, 1, 1)),
        ]);
        let ids: Vec<&str> = store
            .active_workspace()
            .unwrap()
            .streams
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["s1", "s2"]);
    }

    #[test]
    fn reset_layout_clears_only_active_workspace() {
        let mut store = MonitorStore::default();
        store.update_layout(&[LayoutEntry::new("preset-news-1", Layout::new(0, 0, 6, 6))]);
        store.set_active_workspace(MAIN_WORKSPACE_ID.into());
        let id = store.add_stream("u").unwrap();
        store.update_layout(&[LayoutEntry::new(id.clone(), Layout::new(2, 2, 2, 2))]);

        store.reset_layout();
        assert!(store.active_workspace().unwrap().stream(&id).unwrap().layout.is_none());
        let preset = store.workspace(&PRESET_WORKSPACE_ID.into()).unwrap();
        assert_eq!(
            preset.stream(&"preset-news-1".into()).unwrap().layout,
            Some(Layout::new(0, 0, 6, 6))
        );
    }
}
