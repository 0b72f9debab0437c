use layers::surface::MarkerSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapSlotError {
    AlreadyMounted,
}

impl std::fmt::Display for MapSlotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapSlotError::AlreadyMounted => write!(f, "a map widget is already mounted"),
        }
    }
}

impl std::error::Error for MapSlotError {}

/// Owner of the one map widget of a mounted view.
///
/// The widget is created on mount and destroyed on unmount or when the slot
/// is dropped. A slot never holds more than one widget.
#[derive(Debug)]
pub struct MapSlot<S: MarkerSurface> {
    widget: Option<S>,
}

impl<S: MarkerSurface> Default for MapSlot<S> {
    fn default() -> Self {
        Self { widget: None }
    }
}

impl<S: MarkerSurface> MapSlot<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_mounted(&self) -> bool {
        self.widget.is_some()
    }

    /// Create the widget with `create`. The factory is not called when a
    /// widget is already mounted.
    pub fn mount_with(&mut self, create: impl FnOnce() -> S) -> Result<&mut S, MapSlotError> {
        if self.widget.is_some() {
            return Err(MapSlotError::AlreadyMounted);
        }
        Ok(self.widget.insert(create()))
    }

    pub fn get(&self) -> Option<&S> {
        self.widget.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut S> {
        self.widget.as_mut()
    }

    /// Destroy the mounted widget. Returns `false` if nothing was mounted.
    pub fn unmount(&mut self) -> bool {
        match self.widget.take() {
            Some(mut w) => {
                w.destroy();
                true
            }
            None => false,
        }
    }
}

impl<S: MarkerSurface> Drop for MapSlot<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
