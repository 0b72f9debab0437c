use crate::surface::MarkerSurface;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Something that owns markers on a [`MarkerSurface`].
pub trait Layer {
    fn id(&self) -> LayerId;

    fn marker_count(&self) -> usize;

    /// Remove every marker this layer placed.
    fn clear_from(&mut self, surface: &mut dyn MarkerSurface);
}
