//! core::marker
//!
//! Ordered lists of positioned markers.
//!
//! A [`MarkerList`] is a metadata value in its own right: it can be stored
//! under a key of any container. Each [`Marker`] carries a position (in
//! nanoseconds) and its own [`MetaContainer`], so markers can be annotated
//! exactly like clips.
//!
//! # Invariants
//!
//! - Markers are always sorted by position
//! - Markers sharing a position keep their insertion order
//!
//! # Example
//!
//! ```
//! use clipmeta::core::container::HasMetas;
//! use clipmeta::core::marker::{MarkerFlags, MarkerList};
//!
//! let mut list = MarkerList::with_flags(MarkerFlags::Snappable);
//! list.add(5_000).metas_mut().set_string("name", "chorus").unwrap();
//! list.add(1_000);
//!
//! let positions: Vec<u64> = list.iter().map(|m| m.position()).collect();
//! assert_eq!(positions, vec![1_000, 5_000]);
//! ```

use std::fmt;

use serde::Serialize;

use super::container::{HasMetas, MetaContainer};

/// Behaviour flags of a marker list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerFlags {
    /// Plain annotations.
    #[default]
    None,
    /// Markers are snapping targets when moving timeline elements.
    Snappable,
}

impl MarkerFlags {
    pub fn name(self) -> &'static str {
        match self {
            MarkerFlags::None => "none",
            MarkerFlags::Snappable => "snappable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(MarkerFlags::None),
            "snappable" => Some(MarkerFlags::Snappable),
            _ => None,
        }
    }
}

impl fmt::Display for MarkerFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single positioned marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    position: u64,
    metas: MetaContainer,
}

impl Marker {
    /// Create a marker with an empty container.
    pub fn new(position: u64) -> Self {
        Self {
            position,
            metas: MetaContainer::new(),
        }
    }

    pub(crate) fn with_metas(position: u64, metas: MetaContainer) -> Self {
        Self { position, metas }
    }

    /// Position in nanoseconds.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl HasMetas for Marker {
    fn metas(&self) -> &MetaContainer {
        &self.metas
    }

    fn metas_mut(&mut self) -> &mut MetaContainer {
        &mut self.metas
    }
}

/// Position-ordered list of markers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarkerList {
    flags: MarkerFlags,
    markers: Vec<Marker>,
}

impl MarkerList {
    /// Create an empty list with [`MarkerFlags::None`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty list with the given flags.
    pub fn with_flags(flags: MarkerFlags) -> Self {
        Self {
            flags,
            markers: Vec::new(),
        }
    }

    pub fn flags(&self) -> MarkerFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: MarkerFlags) {
        self.flags = flags;
    }

    /// Add a marker at `position` and return it for annotation.
    pub fn add(&mut self, position: u64) -> &mut Marker {
        let index = self.insert(Marker::new(position));
        &mut self.markers[index]
    }

    /// Insert an existing marker, keeping the list sorted. Returns its index.
    pub(crate) fn insert(&mut self, marker: Marker) -> usize {
        let index = self
            .markers
            .partition_point(|m| m.position <= marker.position);
        self.markers.insert(index, marker);
        index
    }

    /// Remove the marker at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Marker> {
        if index < self.markers.len() {
            Some(self.markers.remove(index))
        } else {
            None
        }
    }

    /// Move the marker at `index` to a new position.
    ///
    /// Returns the marker's new index, or `None` if `index` is out of range.
    pub fn move_marker(&mut self, index: usize, position: u64) -> Option<usize> {
        let mut marker = self.remove(index)?;
        marker.position = position;
        Some(self.insert(marker))
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Marker> {
        self.markers.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }

    /// The marker nearest to `position`; the earlier one wins a tie.
    pub fn closest(&self, position: u64) -> Option<&Marker> {
        self.markers
            .iter()
            .min_by_key(|m| m.position.abs_diff(position))
    }
}

impl<'a> IntoIterator for &'a MarkerList {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(list: &MarkerList) -> Vec<u64> {
        list.iter().map(Marker::position).collect()
    }

    #[test]
    fn add_keeps_sorted() {
        let mut list = MarkerList::new();
        list.add(30);
        list.add(10);
        list.add(20);
        assert_eq!(positions(&list), vec![10, 20, 30]);
    }

    #[test]
    fn equal_positions_keep_insertion_order() {
        let mut list = MarkerList::new();
        list.add(10).metas_mut().set_string("name", "first").unwrap();
        list.add(10).metas_mut().set_string("name", "second").unwrap();

        assert_eq!(list.get(0).unwrap().metas().get_string("name").unwrap(), "first");
        assert_eq!(list.get(1).unwrap().metas().get_string("name").unwrap(), "second");
    }

    #[test]
    fn remove_out_of_range() {
        let mut list = MarkerList::new();
        list.add(1);
        assert!(list.remove(3).is_none());
        assert_eq!(list.remove(0).unwrap().position(), 1);
        assert!(list.is_empty());
    }

    #[test]
    fn move_marker_resorts() {
        let mut list = MarkerList::new();
        list.add(10);
        list.add(20);
        list.add(30);

        let index = list.move_marker(0, 25).unwrap();
        assert_eq!(index, 1);
        assert_eq!(positions(&list), vec![20, 25, 30]);
        assert!(list.move_marker(9, 0).is_none());
    }

    #[test]
    fn closest_prefers_earlier_on_tie() {
        let mut list = MarkerList::new();
        assert!(list.closest(5).is_none());

        list.add(10);
        list.add(20);
        assert_eq!(list.closest(14).unwrap().position(), 10);
        assert_eq!(list.closest(15).unwrap().position(), 10);
        assert_eq!(list.closest(16).unwrap().position(), 20);
        assert_eq!(list.closest(u64::MAX).unwrap().position(), 20);
    }

    #[test]
    fn equality_includes_marker_metas() {
        let mut a = MarkerList::with_flags(MarkerFlags::Snappable);
        a.add(1).metas_mut().set_int("n", 1).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);

        b.get_mut(0).unwrap().metas_mut().set_int("n", 2).unwrap();
        assert_ne!(a, b);

        let mut c = a.clone();
        c.set_flags(MarkerFlags::None);
        assert_ne!(a, c);
    }
}
