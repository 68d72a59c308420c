#![deny(unsafe_code)]

//! Toolkit-independent core of the floating chat launcher: geometry, the
//! persisted placement, the click-or-drag gesture machine and the chat session.

pub mod chat;
pub mod drag;
pub mod geometry;
pub mod pointer;
pub mod position;
pub mod widget;

pub use chat::{
    ChatPhrases, ChatSession, DEFAULT_APOLOGY, DEFAULT_GREETING, DEFAULT_NO_ANSWER, Message,
    OutgoingQuestion, RequestTicket, Sender,
};
pub use drag::{DRAG_THRESHOLD, DragController, DragOutcome, DragPhase, DragSession};
pub use geometry::{
    CLAMP_MARGIN, Coordinate, DEFAULT_CORNER_INSET, FixedViewport, Viewport, ViewportProvider,
    WIDGET_SIZE, clamp,
};
pub use pointer::{
    CaptureError, PointerCapture, PointerEvent, PointerId, PointerKind, TrackedCapture,
};
pub use position::{POSITION_KEY, PositionStore};
pub use widget::{PanelSnapshot, Widget, WidgetSnapshot};
