//! timeline::track
//!
//! Audio tracks.

use serde::Serialize;

use crate::core::container::{HasMetas, MetaContainer};

/// Caps an audio track accepts by default.
pub const DEFAULT_AUDIO_CAPS: &str = "audio/x-raw(ANY)";

/// Raw format an audio track mixes to by default.
pub const DEFAULT_AUDIO_RESTRICTION_CAPS: &str =
    "audio/x-raw, format=S32LE, channels=2, rate=44100, layout=interleaved";

/// A track carrying audio clips.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioTrack {
    pub caps: String,
    pub restriction_caps: String,
    /// Whether overlapping clips are mixed
    pub mixing: bool,
    metas: MetaContainer,
}

impl AudioTrack {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for AudioTrack {
    fn default() -> Self {
        Self {
            caps: DEFAULT_AUDIO_CAPS.to_string(),
            restriction_caps: DEFAULT_AUDIO_RESTRICTION_CAPS.to_string(),
            mixing: true,
            metas: MetaContainer::new(),
        }
    }
}

impl HasMetas for AudioTrack {
    fn metas(&self) -> &MetaContainer {
        &self.metas
    }

    fn metas_mut(&mut self) -> &mut MetaContainer {
        &mut self.metas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MetaFlags;

    #[test]
    fn defaults() {
        let track = AudioTrack::new();
        assert_eq!(track.caps, "audio/x-raw(ANY)");
        assert_eq!(
            track.restriction_caps,
            "audio/x-raw, format=S32LE, channels=2, rate=44100, layout=interleaved"
        );
        assert!(track.mixing);
    }

    #[test]
    fn registered_volume() {
        let mut track = AudioTrack::new();
        track
            .metas_mut()
            .register_meta_double(MetaFlags::READ_WRITE, "volume", 1.0)
            .unwrap();
        track.metas_mut().set_double("volume", 0.25).unwrap();
        assert!(track.metas_mut().set_string("volume", "loud").is_err());
        assert_eq!(track.metas().get_double("volume").unwrap(), 0.25);
    }
}
