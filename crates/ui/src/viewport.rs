use std::sync::Arc;

use arc_swap::ArcSwap;
use gpui::{Pixels, Size};
use perch_core::{Viewport, ViewportProvider};

/// Window content size shared between the bounds observer and the widget.
#[derive(Clone)]
pub struct WindowViewport {
    current: Arc<ArcSwap<Viewport>>,
}

impl WindowViewport {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(viewport)),
        }
    }

    pub fn from_size(size: Size<Pixels>) -> Self {
        Self::new(viewport_from_size(size))
    }

    /// Stores the new size and reports whether it differs from the previous one.
    pub fn update(&self, size: Size<Pixels>) -> bool {
        let next = viewport_from_size(size);
        let previous = self.current.swap(Arc::new(next));
        *previous != next
    }
}

impl ViewportProvider for WindowViewport {
    fn viewport(&self) -> Viewport {
        **self.current.load()
    }
}

pub fn viewport_from_size(size: Size<Pixels>) -> Viewport {
    Viewport::new(
        f64::from(f32::from(size.width)),
        f64::from(f32::from(size.height)),
    )
}

#[cfg(test)]
mod tests {
    use gpui::{px, size};

    use super::*;

    #[test]
    fn update_reports_only_real_changes() {
        let viewport = WindowViewport::from_size(size(px(800.), px(600.)));
        assert_eq!(viewport.viewport(), Viewport::new(800.0, 600.0));

        assert!(!viewport.update(size(px(800.), px(600.))));
        assert!(viewport.update(size(px(640.), px(480.))));
        assert_eq!(viewport.viewport(), Viewport::new(640.0, 480.0));
    }

    #[test]
    fn clones_observe_the_same_size() {
        let viewport = WindowViewport::new(Viewport::new(800.0, 600.0));
        let shared: Arc<dyn ViewportProvider> = Arc::new(viewport.clone());

        viewport.update(size(px(300.), px(200.)));
        assert_eq!(shared.viewport(), Viewport::new(300.0, 200.0));
    }
}
