use gpui::{MouseButton, Pixels, Point};
use perch_core::{Coordinate, PointerEvent, PointerId};

/// gpui reports a single mouse, so every mouse gesture shares one id.
pub const MOUSE_POINTER_ID: PointerId = PointerId::new(0);

/// Maps gpui buttons onto DOM-style indices: 0 primary, 1 auxiliary, 2 secondary.
pub fn button_index(button: MouseButton) -> u16 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::Navigate(_) => 3,
    }
}

pub fn coordinate(position: Point<Pixels>) -> Coordinate {
    Coordinate::new(
        f64::from(f32::from(position.x)),
        f64::from(f32::from(position.y)),
    )
}

pub fn mouse_event(button: MouseButton, position: Point<Pixels>) -> PointerEvent {
    PointerEvent::mouse(MOUSE_POINTER_ID, button_index(button), coordinate(position))
}

#[cfg(test)]
mod tests {
    use gpui::{NavigationDirection, point, px};

    use super::*;

    #[test]
    fn only_left_button_is_primary() {
        let at = point(px(12.), px(34.));
        assert!(mouse_event(MouseButton::Left, at).is_primary());
        assert!(!mouse_event(MouseButton::Right, at).is_primary());
        assert!(!mouse_event(MouseButton::Middle, at).is_primary());
        assert!(!mouse_event(MouseButton::Navigate(NavigationDirection::Back), at).is_primary());
    }

    #[test]
    fn window_points_become_coordinates() {
        let event = mouse_event(MouseButton::Left, point(px(12.5), px(34.)));
        assert_eq!(event.id, MOUSE_POINTER_ID);
        assert_eq!(event.position, Coordinate::new(12.5, 34.0));
    }
}
