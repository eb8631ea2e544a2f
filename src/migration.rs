//! Schema migration for the persisted state.
//!
//! Every schema change is one pure step `fn(Value) -> Result<Value, _>` that
//! takes a state written at version `n` and returns the same state at
//! version `n + 1`.  [`migrate`] applies the steps from the stored version up
//! to [`CURRENT_VERSION`] strictly in order, never skipping one.  Steps only
//! wrap or add data; no user workspace is ever dropped.
//!
//! | from | to | change |
//! |------|----|--------|
//! | 0 | 1 | flat stream list wrapped into a single "Main" workspace |
//! | 1 | 2 | builtin "News" preset prepended and activated |

use crate::store::{
    preset_workspace, MAIN_WORKSPACE_ID, MAIN_WORKSPACE_NAME, PRESET_WORKSPACE_ID,
};
use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 2;

/// One migration step.
pub type Step = fn(Value) -> Result<Value, MigrationError>;

/// `(from_version, step)`, sorted by version.
const STEPS: &[(u32, Step)] = &[(0, v0_to_v1 as Step), (1, v1_to_v2 as Step)];

/// Errors from the migration chain.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The stored state does not have the shape its version promises.
    #[error("state does not match schema v{version}: {source}")]
    Shape {
        version: u32,
        #[source]
        source: serde_json::Error,
    },
    /// The state was written by a newer build.
    #[error("unsupported schema version {0} (current is {current})", current = CURRENT_VERSION)]
    UnsupportedVersion(u32),
}

/// Bring `state`, written at schema `from`, up to [`CURRENT_VERSION`].
///
/// A state that is already current is returned untouched.
pub fn migrate(state: Value, from: u32) -> Result<Value, MigrationError> {
    if from > CURRENT_VERSION {
        return Err(MigrationError::UnsupportedVersion(from));
    }
    STEPS
        .iter()
        .filter(|(version, _)| *version >= from)
        .try_fold(state, |state, (version, step)| {
            debug!("migrating state v{} -> v{}", version, version + 1);
            step(state)
        })
}

//  v0 -> v1

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateV0 {
    #[serde(default)]
    streams: Vec<Value>,
    is_global_muted: Option<bool>,
}

/// Wrap the flat stream list into one workspace `{ id: "default", name:
/// "Main" }`.
///
/// The earliest builds stored bare URL strings; those become muted streams
/// with positional ids so the step stays deterministic.
pub fn v0_to_v1(state: Value) -> Result<Value, MigrationError> {
    let old: StateV0 =
        serde_json::from_value(state).map_err(|source| MigrationError::Shape { version: 0, source })?;

    let streams: Vec<Value> = old
        .streams
        .into_iter()
        .enumerate()
        .map(|(i, stream)| match stream {
            Value::String(url) => json!({
                "id": format!("legacy-{}", i),
                "url": url,
                "isMuted": true,
            }),
            Value::Object(mut fields) => {
                fields.entry("isMuted").or_insert(Value::Bool(true));
                Value::Object(fields)
            }
            other => other,
        })
        .collect();

    Ok(json!({
        "workspaces": [{
            "id": MAIN_WORKSPACE_ID,
            "name": MAIN_WORKSPACE_NAME,
            "streams": streams,
        }],
        "activeWorkspaceId": MAIN_WORKSPACE_ID,
        "isGlobalMuted": old.is_global_muted.unwrap_or(true),
    }))
}

//  v1 -> v2

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StateV1 {
    #[serde(default)]
    workspaces: Vec<Value>,
}

/// Prepend the builtin preset workspace and make it active; global mute is
/// forced on.  If the preset is already present it is only re-activated.
pub fn v1_to_v2(state: Value) -> Result<Value, MigrationError> {
    let old: StateV1 =
        serde_json::from_value(state).map_err(|source| MigrationError::Shape { version: 1, source })?;

    let has_preset = old
        .workspaces
        .iter()
        .any(|ws| ws.get("id").and_then(Value::as_str) == Some(PRESET_WORKSPACE_ID));

    let mut workspaces = Vec::with_capacity(old.workspaces.len() + 1);
    if !has_preset {
        let preset = serde_json::to_value(preset_workspace())
            .map_err(|source| MigrationError::Shape { version: 1, source })?;
        workspaces.push(preset);
    }
    workspaces.extend(old.workspaces);

    Ok(json!({
        "workspaces": workspaces,
        "activeWorkspaceId": PRESET_WORKSPACE_ID,
        "isGlobalMuted": true,
    }))
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreState, PRESET_WORKSPACE_NAME};

    fn ids(state: &Value) -> Vec<String> {
        state["workspaces"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn steps_are_contiguous_and_end_at_current() {
        for (i, (version, _)) in STEPS.iter().enumerate() {
            assert_eq!(*version, i as u32);
        }
        assert_eq!(STEPS.len() as u32, CURRENT_VERSION);
    }

    #[test]
    fn v0_wraps_streams_into_main() {
        let v0 = json!({ "streams": [{ "id": "a", "url": "u", "isMuted": false }] });
        let v1 = v0_to_v1(v0).unwrap();
        assert_eq!(
            v1,
            json!({
                "workspaces": [{
                    "id": "default",
                    "name": "Main",
                    "streams": [{ "id": "a", "url": "u", "isMuted": false }],
                }],
                "activeWorkspaceId": "default",
                "isGlobalMuted": true,
            })
        );
    }

    #[test]
    fn v0_preserves_global_mute() {
        let v1 = v0_to_v1(json!({ "streams": [], "isGlobalMuted": false })).unwrap();
        assert_eq!(v1["isGlobalMuted"], json!(false));
    }

    #[test]
    fn v0_bare_url_strings_become_streams() {
        let v1 = v0_to_v1(json!({ "streams": ["https://youtu.be/x", "https://youtu.be/y"] })).unwrap();
        let streams = &v1["workspaces"][0]["streams"];
        assert_eq!(streams[0], json!({ "id": "legacy-0", "url": "https://youtu.be/x", "isMuted": true }));
        assert_eq!(streams[1]["id"], json!("legacy-1"));
    }

    #[test]
    fn v0_rejects_non_object() {
        let err = v0_to_v1(json!("nope")).unwrap_err();
        assert!(matches!(err, MigrationError::Shape { version: 0, .. }));
    }

    #[test]
    fn v1_prepends_preset_and_activates_it() {
        let v1 = json!({
            "workspaces": [{ "id": "custom", "name": "Mine", "streams": [] }],
            "activeWorkspaceId": "custom",
            "isGlobalMuted": false,
        });
        let v2 = v1_to_v2(v1).unwrap();
        assert_eq!(ids(&v2), ["preset-news", "custom"]);
        assert_eq!(v2["activeWorkspaceId"], json!(PRESET_WORKSPACE_ID));
        assert_eq!(v2["isGlobalMuted"], json!(true));
        assert_eq!(v2["workspaces"][0]["name"], json!(PRESET_WORKSPACE_NAME));
        assert_eq!(v2["workspaces"][0]["streams"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn v1_step_does_not_duplicate_preset() {
        let v2 = v1_to_v2(json!({ "workspaces": [] })).unwrap();
        let again = v1_to_v2(v2.clone()).unwrap();
        assert_eq!(ids(&again), ["preset-news"]);
        assert_eq!(again, v2);
    }

    #[test]
    fn full_chain_from_v0() {
        let v0 = json!({ "streams": [{ "id": "a", "url": "u", "isMuted": false }], "isGlobalMuted": false });
        let current = migrate(v0, 0).unwrap();
        assert_eq!(ids(&current), ["preset-news", "default"]);
        let state: StoreState = serde_json::from_value(current).unwrap();
        assert_eq!(state.active_workspace_id.as_str(), PRESET_WORKSPACE_ID);
        assert!(state.is_global_muted);
        let main = &state.workspaces[1];
        assert_eq!(main.name, "Main");
        assert_eq!(main.streams[0].id.as_str(), "a");
        assert!(!main.streams[0].is_muted);
    }

    #[test]
    fn current_state_is_untouched() {
        let state = serde_json::to_value(StoreState::default()).unwrap();
        assert_eq!(migrate(state.clone(), CURRENT_VERSION).unwrap(), state);
    }

    #[test]
    fn future_version_is_rejected() {
        let err = migrate(json!({}), CURRENT_VERSION + 1).unwrap_err();
        assert!(matches!(err, MigrationError::UnsupportedVersion(v) if v == CURRENT_VERSION + 1));
    }

    #[test]
    fn unsupported_version_message_names_both_versions() {
        let err = MigrationError::UnsupportedVersion(CURRENT_VERSION + 1);
        assert_eq!(
            err.to_string(),
            format!("unsupported schema version {} (current is {})", CURRENT_VERSION + 1, CURRENT_VERSION)
        );
    }
}
