//! Stream provider lookup.
//!
//! A stream tile resolves its URL into playable media by asking which
//! [`Provider`] recognises the URL shape.  The store never consults this;
//! an unrecognised URL is only a per-tile "unsupported or invalid stream"
//! indicator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Media file extensions a plain `<video>`/`<audio>` player can open.
const FILE_EXTENSIONS: &[&str] = &[
    "mp4", "webm", "ogv", "ogg", "mov", "m3u8", "mpd", "mp3", "wav",
];

/// Twitch top-level paths that are not channels.
const TWITCH_RESERVED: &[&str] = &["directory", "settings", "p", "search", "downloads", "jobs"];

/// The kind of player able to play a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    YouTube,
    Twitch,
    File,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::YouTube => write!(f, "youtube"),
            Provider::Twitch => write!(f, "twitch"),
            Provider::File => write!(f, "file"),
        }
    }
}

impl Provider {
    /// Classify `url` by its shape.  Returns `None` for anything no
    /// provider can play.
    pub fn detect(url: &str) -> Option<Provider> {
        let parts = UrlParts::parse(url)?;
        if is_youtube(&parts) {
            Some(Provider::YouTube)
        } else if is_twitch(&parts) {
            Some(Provider::Twitch)
        } else if is_media_file(&parts) {
            Some(Provider::File)
        } else {
            None
        }
    }
}

/// The pieces of an http(s) URL the lookup cares about.
struct UrlParts<'a> {
    host: String,
    path: &'a str,
    query: &'a str,
}

impl<'a> UrlParts<'a> {
    fn parse(url: &'a str) -> Option<Self> {
        let url = url.trim();
        let (scheme, rest) = url.split_once("://")?;
        if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
            return None;
        }
        let rest = rest.split('#').next().unwrap_or_default();
        let (authority, path_and_query) = match rest.find(['/', '?']) {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };
        // Drop credentials and port.  IPv6 literals keep their brackets.
        let host = authority.rsplit('@').next().unwrap_or_default();
        let host = match host.strip_prefix('[') {
            Some(v6) => match v6.split_once(']') {
                Some((addr, _port)) if !addr.is_empty() => format!("[{}]", addr),
                _ => return None,
            },
            None => host.split(':').next().unwrap_or_default().to_string(),
        }
        .to_ascii_lowercase();
        if host.is_empty() {
            return None;
        }
        let (path, query) = path_and_query
            .split_once('?')
            .unwrap_or((path_and_query, ""));
        Some(Self { host, path, query })
    }

    fn segments(&self) -> impl Iterator<Item = &'a str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    fn query_param(&self, key: &str) -> Option<&'a str> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

fn is_youtube(parts: &UrlParts<'_>) -> bool {
    match parts.host.as_str() {
        "youtu.be" => parts.segments().next().is_some(),
        "youtube.com" | "www.youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let segments: Vec<&str> = parts.segments().collect();
            match segments.as_slice() {
                ["watch"] => parts.query_param("v").is_some_and(|v| !v.is_empty()),
                ["live" | "embed" | "shorts", _id] => true,
                ["channel", _id, "live"] => true,
                [handle, "live"] => handle.starts_with('@'),
                _ => false,
            }
        }
        _ => false,
    }
}

fn is_twitch(parts: &UrlParts<'_>) -> bool {
    if !matches!(parts.host.as_str(), "twitch.tv" | "www.twitch.tv" | "m.twitch.tv") {
        return false;
    }
    let segments: Vec<&str> = parts.segments().collect();
    match segments.as_slice() {
        ["videos", id] => id.chars().all(|c| c.is_ascii_digit()),
        [channel] | [channel, "videos" | "clip", ..] => !TWITCH_RESERVED.contains(channel),
        _ => false,
    }
}

fn is_media_file(parts: &UrlParts<'_>) -> bool {
    let Some(last) = parts.segments().last() else {
        return false;
    };
    match last.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => FILE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext)),
        _ => false,
    }
}
