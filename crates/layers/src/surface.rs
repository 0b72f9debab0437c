//! The marker API a map widget has to offer.
//!
//! Tile rendering, pan/zoom and popup DOM stay in the widget; the marker layer
//! only places and removes markers and toggles their popups.

use std::collections::BTreeMap;

use foundation::bounds::LatLng;

use crate::symbology::MarkerStyle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupContent {
    pub title: String,
    /// Date part of the entity's point in time.
    pub date: Option<String>,
    pub entity_url: String,
    pub article_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub style: MarkerStyle,
    pub tooltip: String,
    pub popup: PopupContent,
}

pub trait MarkerSurface {
    fn place(&mut self, marker: MarkerSpec) -> MarkerHandle;

    fn remove(&mut self, handle: MarkerHandle);

    fn set_popup_open(&mut self, handle: MarkerHandle, open: bool);

    /// Release the widget. Called once when its owner lets go of it.
    fn destroy(&mut self) {}
}

/// In-memory surface; records what a real widget would show.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next: u64,
    markers: BTreeMap<MarkerHandle, MarkerSpec>,
    open_popups: Vec<MarkerHandle>,
    placed_total: usize,
    destroyed: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> impl Iterator<Item = (MarkerHandle, &MarkerSpec)> {
        self.markers.iter().map(|(h, m)| (*h, m))
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&MarkerSpec> {
        self.markers.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn is_popup_open(&self, handle: MarkerHandle) -> bool {
        self.open_popups.contains(&handle)
    }

    /// Markers ever placed, including removed ones.
    pub fn placed_total(&self) -> usize {
        self.placed_total
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl MarkerSurface for RecordingSurface {
    fn place(&mut self, marker: MarkerSpec) -> MarkerHandle {
        let handle = MarkerHandle(self.next);
        self.next += 1;
        self.placed_total += 1;
        self.markers.insert(handle, marker);
        handle
    }

    fn remove(&mut self, handle: MarkerHandle) {
        self.markers.remove(&handle);
        self.open_popups.retain(|h| *h != handle);
    }

    fn set_popup_open(&mut self, handle: MarkerHandle, open: bool) {
        if !self.markers.contains_key(&handle) {
            return;
        }
        self.open_popups.retain(|h| *h != handle);
        if open {
            self.open_popups.push(handle);
        }
    }

    fn destroy(&mut self) {
        self.markers.clear();
        self.open_popups.clear();
        self.destroyed = true;
    }
}
