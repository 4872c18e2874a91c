// ── Streaming app presets ──
//
// The single table of well-known streaming apps used for one-click
// service creation and for resolving kiosk allow-list names to tvOS
// bundle identifiers.

use innkeep_api::models::{EntityId, StreamingInput};
use serde::Serialize;

const LOGO_BASE: &str = "https://cdn.innkeep.app/logos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamingPreset {
    /// CLI handle, e.g. `prime-video`.
    pub key: &'static str,
    pub name: &'static str,
    pub service_type: &'static str,
    pub app_url_scheme: &'static str,
    pub logo: &'static str,
    pub bundle_id: &'static str,
    pub requires_login: bool,
}

macro_rules! preset {
    ($key:literal, $name:literal, $kind:literal, $scheme:literal, $bundle:literal) => {
        StreamingPreset {
            key: $key,
            name: $name,
            service_type: $kind,
            app_url_scheme: $scheme,
            logo: concat!($key, ".svg"),
            bundle_id: $bundle,
            requires_login: true,
        }
    };
}

pub const STREAMING_PRESETS: &[StreamingPreset] = &[
    preset!("netflix", "Netflix", "video", "nflx://", "com.netflix.Netflix"),
    preset!("disney", "Disney+", "video", "disneyplus://", "com.disney.disneyplus"),
    preset!("prime-video", "Prime Video", "video", "aiv://", "com.amazon.aiv.AIVApp"),
    preset!("youtube", "YouTube", "video", "youtube://", "com.google.ios.youtube"),
    preset!("apple-tv", "Apple TV+", "video", "videos://", "com.apple.TVWatchList"),
    preset!("spotify", "Spotify", "music", "spotify://", "com.spotify.client"),
    preset!("zdf", "ZDF Mediathek", "broadcaster", "zdf://", "de.zdf.mediathek"),
    preset!("ard", "ARD Mediathek", "broadcaster", "ardmediathek://", "de.ard.mediathek"),
    preset!("joyn", "Joyn", "broadcaster", "joyn://", "de.joyn.app"),
    preset!("rtl-plus", "RTL+", "broadcaster", "rtlplus://", "de.rtli.tvnow"),
    preset!("wow", "WOW", "video", "wow://", "de.sky.wow"),
    preset!("dazn", "DAZN", "sports", "dazn://", "com.dazn.theapp"),
    preset!("plex", "Plex", "media-server", "plex://", "com.plexapp.plex"),
    preset!("twitch", "Twitch", "live", "twitch://", "tv.twitch"),
];

impl StreamingPreset {
    pub fn logo_url(&self) -> String {
        format!("{LOGO_BASE}/{}", self.logo)
    }

    /// Create payload for this preset under `property_id`.
    pub fn to_input(&self, property_id: Option<EntityId>) -> StreamingInput {
        StreamingInput {
            property_id,
            service_name: Some(self.name.to_owned()),
            service_type: Some(self.service_type.to_owned()),
            app_url_scheme: Some(self.app_url_scheme.to_owned()),
            logo_url: Some(self.logo_url()),
            requires_login: Some(self.requires_login),
            is_active: Some(true),
        }
    }
}

/// Look a preset up by key, display name or bundle id. Matching ignores
/// case and punctuation, so `"Disney+"`, `"disney"` and `"prime video"`
/// all resolve.
pub fn find(query: &str) -> Option<&'static StreamingPreset> {
    let wanted = normalize(query);
    if wanted.is_empty() {
        return None;
    }
    STREAMING_PRESETS.iter().find(|p| {
        normalize(p.key) == wanted || normalize(p.name) == wanted || p.bundle_id == query.trim()
    })
}

/// Map a kiosk app name to its bundle id, passing unknown names through.
pub fn bundle_id_for(app: &str) -> String {
    find(app).map_or_else(|| app.trim().to_owned(), |p| p.bundle_id.to_owned())
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn lookups_are_forgiving() {
        assert_eq!(find("Disney+").unwrap().key, "disney");
        assert_eq!(find("prime video").unwrap().key, "prime-video");
        assert_eq!(find("com.netflix.Netflix").unwrap().name, "Netflix");
        assert!(find("").is_none());
        assert!(find("betamax").is_none());
    }

    #[test]
    fn table_has_unique_keys_and_bundles() {
        let keys: HashSet<_> = STREAMING_PRESETS.iter().map(|p| p.key).collect();
        let bundles: HashSet<_> = STREAMING_PRESETS.iter().map(|p| p.bundle_id).collect();
        assert_eq!(keys.len(), STREAMING_PRESETS.len());
        assert_eq!(bundles.len(), STREAMING_PRESETS.len());
    }

    #[test]
    fn bundle_resolution() {
        assert_eq!(bundle_id_for("netflix"), "com.netflix.Netflix");
        assert_eq!(bundle_id_for(" com.example.app "), "com.example.app");
    }

    #[test]
    fn preset_input_is_complete() {
        let input = find("spotify").unwrap().to_input(Some(EntityId::from(4)));
        assert_eq!(input.service_name.as_deref(), Some("Spotify"));
        assert_eq!(
            input.logo_url.as_deref(),
            Some("https://cdn.innkeep.app/logos/spotify.svg")
        );
    }
}
