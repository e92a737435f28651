//! timeline::clip
//!
//! Source and title clips.

use std::fmt;

use serde::Serialize;

use super::TimelineError;
use crate::core::container::{HasMetas, MetaContainer};

/// A clip that reads from a source, placed on the timeline.
///
/// Times are in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceClip {
    pub name: String,
    /// Position on the timeline
    pub start: u64,
    /// Offset into the source
    pub inpoint: u64,
    pub duration: u64,
    metas: MetaContainer,
}

impl SourceClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Timeline position just past the clip.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.duration)
    }
}

impl HasMetas for SourceClip {
    fn metas(&self) -> &MetaContainer {
        &self.metas
    }

    fn metas_mut(&mut self) -> &mut MetaContainer {
        &mut self.metas
    }
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextVAlign {
    /// Align the text baseline to the bottom of the frame
    #[default]
    Baseline,
    Bottom,
    Top,
    /// Use [`TitleClip::ypos`]
    Position,
    Center,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextHAlign {
    Left,
    #[default]
    Center,
    Right,
    /// Use [`TitleClip::xpos`]
    Position,
}

impl fmt::Display for TextVAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextVAlign::Baseline => "baseline",
            TextVAlign::Bottom => "bottom",
            TextVAlign::Top => "top",
            TextVAlign::Position => "position",
            TextVAlign::Center => "center",
        })
    }
}

impl fmt::Display for TextHAlign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextHAlign::Left => "left",
            TextHAlign::Center => "center",
            TextHAlign::Right => "right",
            TextHAlign::Position => "position",
        })
    }
}

/// A clip rendering text over a background.
///
/// Colors are ARGB.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleClip {
    #[serde(flatten)]
    clip: SourceClip,
    text: String,
    font_desc: String,
    valignment: TextVAlign,
    halignment: TextHAlign,
    color: u32,
    background: u32,
    xpos: f64,
    ypos: f64,
}

impl Default for TitleClip {
    fn default() -> Self {
        Self {
            clip: SourceClip::default(),
            text: String::new(),
            font_desc: "Serif 36".to_string(),
            valignment: TextVAlign::default(),
            halignment: TextHAlign::default(),
            color: 0xffff_ffff,
            background: 0x0000_0000,
            xpos: 0.5,
            ypos: 0.5,
        }
    }
}

fn check_unit(property: &'static str, value: f64) -> Result<f64, TimelineError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TimelineError::OutOfRange {
            property,
            min: 0.0,
            max: 1.0,
            value,
        })
    }
}

impl TitleClip {
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying clip timing.
    pub fn clip(&self) -> &SourceClip {
        &self.clip
    }

    pub fn clip_mut(&mut self) -> &mut SourceClip {
        &mut self.clip
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Pango font description, e.g. `"Sans Bold 24"`.
    pub fn font_desc(&self) -> &str {
        &self.font_desc
    }

    pub fn set_font_desc(&mut self, font_desc: impl Into<String>) {
        self.font_desc = font_desc.into();
    }

    pub fn valignment(&self) -> TextVAlign {
        self.valignment
    }

    pub fn set_valignment(&mut self, valign: TextVAlign) {
        self.valignment = valign;
    }

    pub fn halignment(&self) -> TextHAlign {
        self.halignment
    }

    pub fn set_halignment(&mut self, halign: TextHAlign) {
        self.halignment = halign;
    }

    pub fn color(&self) -> u32 {
        self.color
    }

    pub fn set_color(&mut self, color: u32) {
        self.color = color;
    }

    pub fn background(&self) -> u32 {
        self.background
    }

    pub fn set_background(&mut self, background: u32) {
        self.background = background;
    }

    pub fn xpos(&self) -> f64 {
        self.xpos
    }

    /// Horizontal position, as a fraction of the frame width.
    ///
    /// # Errors
    ///
    /// Returns `TimelineError::OutOfRange` outside `0.0..=1.0`; the old
    /// value is kept.
    pub fn set_xpos(&mut self, position: f64) -> Result<(), TimelineError> {
        self.xpos = check_unit("xpos", position)?;
        Ok(())
    }

    pub fn ypos(&self) -> f64 {
        self.ypos
    }

    /// Vertical position, as a fraction of the frame height.
    pub fn set_ypos(&mut self, position: f64) -> Result<(), TimelineError> {
        self.ypos = check_unit("ypos", position)?;
        Ok(())
    }
}

impl HasMetas for TitleClip {
    fn metas(&self) -> &MetaContainer {
        &self.clip.metas
    }

    fn metas_mut(&mut self) -> &mut MetaContainer {
        &mut self.clip.metas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod source_clip {
        use super::*;

        #[test]
        fn new_is_empty() {
            let clip = SourceClip::new("intro.mov");
            assert_eq!(clip.name, "intro.mov");
            assert_eq!(clip.start, 0);
            assert!(!clip.metas().is_initialized());
        }

        #[test]
        fn end_saturates() {
            let clip = SourceClip {
                start: u64::MAX - 1,
                duration: 10,
                ..SourceClip::new("x")
            };
            assert_eq!(clip.end(), u64::MAX);
        }
    }

    mod title_clip {
        use super::*;

        #[test]
        fn defaults() {
            let title = TitleClip::new();
            assert_eq!(title.text(), "");
            assert_eq!(title.font_desc(), "Serif 36");
            assert_eq!(title.valignment(), TextVAlign::Baseline);
            assert_eq!(title.halignment(), TextHAlign::Center);
            assert_eq!(title.color(), 0xffffffff);
            assert_eq!(title.background(), 0);
            assert_eq!(title.xpos(), 0.5);
            assert_eq!(title.ypos(), 0.5);
        }

        #[test]
        fn positions_in_range() {
            let mut title = TitleClip::new();
            title.set_xpos(0.0).unwrap();
            title.set_ypos(1.0).unwrap();
            assert_eq!(title.xpos(), 0.0);
            assert_eq!(title.ypos(), 1.0);
        }

        #[test]
        fn positions_out_of_range_keep_old_value() {
            let mut title = TitleClip::new();
            let err = title.set_xpos(1.5).unwrap_err();
            assert!(matches!(err, TimelineError::OutOfRange { property: "xpos", .. }));
            assert_eq!(title.xpos(), 0.5);

            assert!(title.set_ypos(-0.1).is_err());
            assert!(title.set_ypos(f64::NAN).is_err());
            assert_eq!(title.ypos(), 0.5);
        }

        #[test]
        fn metas_live_on_the_clip() {
            let mut title = TitleClip::new();
            title.set_text("Chapter 1");
            title.metas_mut().set_string("lang", "en").unwrap();
            assert_eq!(title.clip().metas().get_string("lang").unwrap(), "en");
        }

        #[test]
        fn alignment_names() {
            assert_eq!(TextVAlign::Position.to_string(), "position");
            assert_eq!(TextHAlign::Right.to_string(), "right");
        }
    }
}
