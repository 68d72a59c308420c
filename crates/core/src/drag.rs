use crate::geometry::{Coordinate, Viewport};
use crate::pointer::{PointerCapture, PointerEvent, PointerId};

/// Cumulative Manhattan displacement beyond which a gesture counts as a drag.
pub const DRAG_THRESHOLD: f64 = 4.0;

/// State of one pointer gesture, alive between press and release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub pointer_id: PointerId,
    pub start_pointer: Coordinate,
    pub start_position: Coordinate,
    pub live_position: Coordinate,
    /// Latches once the threshold is crossed, even if the pointer returns.
    pub moved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// How a finished gesture is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Displacement never crossed the threshold; the launcher stays put.
    Click { position: Coordinate },
    Drag { position: Coordinate },
}

impl DragOutcome {
    pub fn position(&self) -> Coordinate {
        match self {
            Self::Click { position } | Self::Drag { position } => *position,
        }
    }

    pub fn is_click(&self) -> bool {
        matches!(self, Self::Click { .. })
    }
}

/// Turns raw pointer events on the launcher into live positions and a final
/// click-or-drag verdict.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    phase: DragPhase,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn active_pointer(&self) -> Option<PointerId> {
        match self.phase {
            DragPhase::Dragging(session) => Some(session.pointer_id),
            DragPhase::Idle => None,
        }
    }

    /// Starts a session for a primary press. Returns `false` when the press is
    /// ignored (secondary button, or a session is already running).
    pub fn pointer_down(
        &mut self,
        event: PointerEvent,
        current_position: Coordinate,
        capture: &mut dyn PointerCapture,
    ) -> bool {
        if !event.is_primary() {
            return false;
        }

        if let DragPhase::Dragging(session) = self.phase {
            tracing::trace!(
                active = %session.pointer_id,
                ignored = %event.id,
                "pointer down ignored while a drag is active"
            );
            return false;
        }

        capture.capture(event.id);
        self.phase = DragPhase::Dragging(DragSession {
            pointer_id: event.id,
            start_pointer: event.position,
            start_position: current_position,
            live_position: current_position,
            moved: false,
        });
        true
    }

    /// Returns the new live position, or `None` when the event does not belong
    /// to the active session.
    pub fn pointer_move(
        &mut self,
        event: PointerEvent,
        viewport: &Viewport,
    ) -> Option<Coordinate> {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return None;
        };
        if session.pointer_id != event.id {
            return None;
        }

        let dx = event.position.x - session.start_pointer.x;
        let dy = event.position.y - session.start_pointer.y;
        if dx.abs() + dy.abs() > DRAG_THRESHOLD {
            session.moved = true;
        }

        session.live_position = viewport.clamp(session.start_position.offset(dx, dy));
        Some(session.live_position)
    }

    /// Ends the session on release. Capture release is best effort.
    pub fn pointer_up(
        &mut self,
        event: PointerEvent,
        viewport: &Viewport,
        capture: &mut dyn PointerCapture,
    ) -> Option<DragOutcome> {
        let DragPhase::Dragging(session) = self.phase else {
            return None;
        };
        if session.pointer_id != event.id {
            return None;
        }

        self.phase = DragPhase::Idle;

        if let Err(error) = capture.release(session.pointer_id) {
            tracing::debug!(
                pointer_id = %session.pointer_id,
                error = %error,
                "pointer capture release failed"
            );
        }

        let outcome = if session.moved {
            // The viewport may have shrunk since the last move.
            DragOutcome::Drag {
                position: viewport.clamp(session.live_position),
            }
        } else {
            DragOutcome::Click {
                position: viewport.clamp(session.start_position),
            }
        };
        Some(outcome)
    }

    /// Cancellation resolves exactly like a release.
    pub fn pointer_cancel(
        &mut self,
        event: PointerEvent,
        viewport: &Viewport,
        capture: &mut dyn PointerCapture,
    ) -> Option<DragOutcome> {
        self.pointer_up(event, viewport, capture)
    }
}
