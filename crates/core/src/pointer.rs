use std::fmt;

use snafu::Snafu;

use crate::geometry::Coordinate;

/// Identifier a host assigns to one physical pointer for the life of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl PointerId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PointerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Device class that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Carries the DOM-style button index: 0 primary, 1 auxiliary, 2 secondary.
    Mouse { button: u16 },
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub kind: PointerKind,
    pub position: Coordinate,
}

impl PointerEvent {
    pub const fn new(id: PointerId, kind: PointerKind, position: Coordinate) -> Self {
        Self { id, kind, position }
    }

    pub const fn mouse(id: PointerId, button: u16, position: Coordinate) -> Self {
        Self::new(id, PointerKind::Mouse { button }, position)
    }

    pub const fn touch(id: PointerId, position: Coordinate) -> Self {
        Self::new(id, PointerKind::Touch, position)
    }

    /// Touch and pen contacts always qualify; mice only with the primary button.
    pub fn is_primary(&self) -> bool {
        match self.kind {
            PointerKind::Mouse { button } => button == 0,
            PointerKind::Touch | PointerKind::Pen => true,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CaptureError {
    #[snafu(display("pointer {pointer_id} is not captured"))]
    NotCaptured {
        stage: &'static str,
        pointer_id: PointerId,
    },
    #[snafu(display("host refused to release pointer {pointer_id}: {details}"))]
    ReleaseRejected {
        stage: &'static str,
        pointer_id: PointerId,
        details: String,
    },
}

/// Host hook that routes a pointer's later events to the launcher.
pub trait PointerCapture {
    fn capture(&mut self, pointer_id: PointerId);
    fn release(&mut self, pointer_id: PointerId) -> Result<(), CaptureError>;
}

/// Capture bookkeeping for hosts that already deliver every pointer event to
/// the widget. Tracks a single captured pointer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackedCapture {
    captured: Option<PointerId>,
}

impl TrackedCapture {
    pub fn captured(&self) -> Option<PointerId> {
        self.captured
    }
}

impl PointerCapture for TrackedCapture {
    fn capture(&mut self, pointer_id: PointerId) {
        self.captured = Some(pointer_id);
    }

    fn release(&mut self, pointer_id: PointerId) -> Result<(), CaptureError> {
        match self.captured {
            Some(active) if active == pointer_id => {
                self.captured = None;
                Ok(())
            }
            _ => NotCapturedSnafu {
                stage: "release-pointer-capture",
                pointer_id,
            }
            .fail(),
        }
    }
}
