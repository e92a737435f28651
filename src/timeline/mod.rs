//! timeline
//!
//! Timeline entities that carry a metadata container.
//!
//! Every entity here implements
//! [`HasMetas`](crate::core::container::HasMetas), so generic code can annotate a
//! clip, a track or a marker the same way:
//!
//! ```
//! use clipmeta::core::container::HasMetas;
//! use clipmeta::timeline::{AudioTrack, TitleClip};
//!
//! fn tag<T: HasMetas>(entity: &mut T, author: &str) {
//!     entity.metas_mut().set_string("author", author).unwrap();
//! }
//!
//! let mut title = TitleClip::new();
//! let mut track = AudioTrack::new();
//! tag(&mut title, "ana");
//! tag(&mut track, "ana");
//! assert_eq!(title.metas().get_string("author").unwrap(), "ana");
//! ```

pub mod clip;
pub mod track;

pub use clip::{SourceClip, TextHAlign, TextVAlign, TitleClip};
pub use track::AudioTrack;

use thiserror::Error;

/// Errors from timeline entity setters.
#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("{property} must be within {min}..={max}, got {value}")]
    OutOfRange {
        property: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}
