use std::sync::Arc;

use perch_llm::{Answer, AssistantError};

use crate::chat::{ChatPhrases, ChatSession, Message, OutgoingQuestion, RequestTicket};
use crate::drag::{DragController, DragOutcome};
use crate::geometry::{Coordinate, ViewportProvider};
use crate::pointer::{PointerCapture, PointerEvent};
use crate::position::PositionStore;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    /// Present iff the panel is closed and a placement is known.
    pub launcher: Option<Coordinate>,
    /// Present iff the panel is open.
    pub panel: Option<PanelSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub messages: Vec<Message>,
    pub pending_input: String,
    pub is_loading: bool,
}

/// Floating launcher plus chat panel, independent of any rendering toolkit.
pub struct Widget {
    positions: PositionStore,
    viewport: Arc<dyn ViewportProvider>,
    position: Option<Coordinate>,
    drag: DragController,
    chat: ChatSession,
}

impl Widget {
    pub fn new(
        positions: PositionStore,
        viewport: Arc<dyn ViewportProvider>,
        phrases: ChatPhrases,
    ) -> Self {
        Self {
            positions,
            viewport,
            position: None,
            drag: DragController::new(),
            chat: ChatSession::new(phrases),
        }
    }

    /// Reads the persisted placement; call once when the host is ready.
    pub fn start(&mut self) -> Coordinate {
        let viewport = self.viewport.viewport();
        let position = self.positions.load(&viewport);
        tracing::debug!(x = position.x, y = position.y, "launcher placed");
        self.position = Some(position);
        position
    }

    pub fn position(&self) -> Option<Coordinate> {
        self.position
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn pointer_down(&mut self, event: PointerEvent, capture: &mut dyn PointerCapture) -> bool {
        // The launcher is only hit-testable while it is shown.
        if self.chat.is_open() {
            return false;
        }
        let current = self.position.unwrap_or_default();
        self.drag.pointer_down(event, current, capture)
    }

    pub fn pointer_move(&mut self, event: PointerEvent) -> Option<Coordinate> {
        let viewport = self.viewport.viewport();
        let live = self.drag.pointer_move(event, &viewport)?;
        self.position = Some(live);
        Some(live)
    }

    pub fn pointer_up(
        &mut self,
        event: PointerEvent,
        capture: &mut dyn PointerCapture,
    ) -> Option<DragOutcome> {
        let viewport = self.viewport.viewport();
        let outcome = self.drag.pointer_up(event, &viewport, capture)?;
        self.finish_gesture(outcome);
        Some(outcome)
    }

    pub fn pointer_cancel(
        &mut self,
        event: PointerEvent,
        capture: &mut dyn PointerCapture,
    ) -> Option<DragOutcome> {
        let viewport = self.viewport.viewport();
        let outcome = self.drag.pointer_cancel(event, &viewport, capture)?;
        self.finish_gesture(outcome);
        Some(outcome)
    }

    fn finish_gesture(&mut self, outcome: DragOutcome) {
        let position = outcome.position();
        self.position = Some(position);

        if let Err(error) = self.positions.save(position) {
            tracing::warn!(
                key = %self.positions.key(),
                error = %error,
                "failed to persist launcher position"
            );
        }

        if outcome.is_click() {
            self.chat.open();
        }
    }

    /// Re-clamps the known placement to the provider's current size.
    /// Returns the new placement when it changed.
    pub fn handle_resize(&mut self) -> Option<Coordinate> {
        let current = self.position?;
        let clamped = self.viewport.viewport().clamp(current);
        if clamped == current {
            return None;
        }
        self.position = Some(clamped);
        Some(clamped)
    }

    pub fn open(&mut self) {
        self.chat.open();
    }

    pub fn close(&mut self) {
        self.chat.close();
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.chat.set_pending_input(text);
    }

    /// Sends whatever the input box last reported through `set_pending_input`.
    pub fn submit_pending(&mut self) -> Option<OutgoingQuestion> {
        self.chat.submit_pending()
    }

    pub fn resolve(
        &mut self,
        ticket: RequestTicket,
        result: Result<Answer, AssistantError>,
    ) -> bool {
        self.chat.resolve(ticket, result)
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        if self.chat.is_open() {
            return WidgetSnapshot {
                launcher: None,
                panel: Some(PanelSnapshot {
                    messages: self.chat.messages().to_vec(),
                    pending_input: self.chat.pending_input().to_string(),
                    is_loading: self.chat.is_loading(),
                }),
            };
        }

        WidgetSnapshot {
            launcher: self.position,
            panel: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use perch_storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};

    use super::*;
    use crate::chat::DEFAULT_GREETING;
    use crate::geometry::{FixedViewport, Viewport};
    use crate::pointer::{PointerId, TrackedCapture};
    use crate::position::POSITION_KEY;

    struct ResizableViewport(Mutex<Viewport>);

    impl ResizableViewport {
        fn resize(&self, viewport: Viewport) {
            *self.0.lock().expect("viewport lock") = viewport;
        }
    }

    impl ViewportProvider for ResizableViewport {
        fn viewport(&self) -> Viewport {
            *self.0.lock().expect("viewport lock")
        }
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: String) -> StorageResult<()> {
            Err(StorageError::WriteStore {
                stage: "test-read-only",
                path: "/read-only".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }
    }

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    fn widget_with(store: Arc<dyn KeyValueStore>) -> Widget {
        let mut widget = Widget::new(
            PositionStore::new(store),
            Arc::new(FixedViewport(VIEWPORT)),
            ChatPhrases::default(),
        );
        widget.start();
        widget
    }

    fn mouse(x: f64, y: f64) -> PointerEvent {
        PointerEvent::mouse(PointerId::new(0), 0, Coordinate::new(x, y))
    }

    fn run_gesture(widget: &mut Widget, path: &[(f64, f64)]) -> DragOutcome {
        let mut capture = TrackedCapture::default();
        let (first, rest) = path.split_first().expect("non-empty path");
        assert!(widget.pointer_down(mouse(first.0, first.1), &mut capture));
        for (x, y) in rest {
            widget.pointer_move(mouse(*x, *y));
        }
        let end = path.last().expect("non-empty path");
        widget
            .pointer_up(mouse(end.0, end.1), &mut capture)
            .expect("gesture resolves")
    }

    #[test]
    fn launcher_starts_at_default_anchor() {
        let widget = widget_with(Arc::new(MemoryStore::new()));
        assert_eq!(
            widget.snapshot(),
            WidgetSnapshot {
                launcher: Some(Coordinate::new(720.0, 520.0)),
                panel: None,
            }
        );
    }

    #[test]
    fn unstarted_widget_hides_launcher() {
        let widget = Widget::new(
            PositionStore::new(Arc::new(MemoryStore::new())),
            Arc::new(FixedViewport(VIEWPORT)),
            ChatPhrases::default(),
        );
        assert_eq!(widget.snapshot().launcher, None);
    }

    #[test]
    fn click_opens_panel_and_keeps_position() {
        let store = Arc::new(MemoryStore::new());
        let mut widget = widget_with(store.clone());
        let before = widget.position();

        let outcome = run_gesture(&mut widget, &[(730.0, 530.0), (732.0, 531.0), (733.0, 529.0)]);

        assert!(outcome.is_click());
        assert_eq!(widget.position(), before);
        let snapshot = widget.snapshot();
        assert_eq!(snapshot.launcher, None);
        let panel = snapshot.panel.expect("panel open");
        assert_eq!(panel.messages, vec![Message::bot(DEFAULT_GREETING)]);
        assert!(!panel.is_loading);
        assert!(store.get(POSITION_KEY).expect("get").is_some());
    }

    #[test]
    fn drag_moves_launcher_and_leaves_panel_closed() {
        let store = Arc::new(MemoryStore::new());
        let mut widget = widget_with(store.clone());

        let outcome = run_gesture(&mut widget, &[(730.0, 530.0), (600.0, 500.0), (400.0, 300.0)]);

        let expected = Coordinate::new(390.0, 290.0);
        assert_eq!(outcome, DragOutcome::Drag { position: expected });
        assert!(!widget.chat().is_open());
        assert_eq!(widget.snapshot().launcher, Some(expected));

        let reloaded = widget_with(store);
        assert_eq!(reloaded.position(), Some(expected));
    }

    #[test]
    fn drag_does_not_close_an_open_panel() {
        let mut widget = widget_with(Arc::new(MemoryStore::new()));
        let mut capture = TrackedCapture::default();
        assert!(widget.pointer_down(mouse(730.0, 530.0), &mut capture));
        widget.open();
        widget.pointer_move(mouse(600.0, 400.0));
        let outcome = widget
            .pointer_up(mouse(600.0, 400.0), &mut capture)
            .expect("resolves");

        assert!(!outcome.is_click());
        assert!(widget.chat().is_open());
    }

    #[test]
    fn pointer_down_ignored_while_panel_open() {
        let mut widget = widget_with(Arc::new(MemoryStore::new()));
        widget.open();

        let mut capture = TrackedCapture::default();
        assert!(!widget.pointer_down(mouse(730.0, 530.0), &mut capture));
        assert!(!widget.is_dragging());
    }

    #[test]
    fn failed_save_keeps_gesture_outcome() {
        let mut widget = widget_with(Arc::new(ReadOnlyStore));

        let outcome = run_gesture(&mut widget, &[(730.0, 530.0), (730.0, 530.0)]);

        assert!(outcome.is_click());
        assert!(widget.chat().is_open());
    }

    #[test]
    fn resize_reclamps_without_persisting() {
        let store = Arc::new(MemoryStore::new());
        let viewport = Arc::new(ResizableViewport(Mutex::new(VIEWPORT)));
        let mut widget = Widget::new(
            PositionStore::new(store.clone()),
            viewport.clone(),
            ChatPhrases::default(),
        );
        widget.start();

        viewport.resize(Viewport::new(400.0, 300.0));
        assert_eq!(widget.handle_resize(), Some(Coordinate::new(328.0, 228.0)));
        assert_eq!(widget.handle_resize(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn release_after_shrinking_mid_drag_stays_in_bounds() {
        let store = Arc::new(MemoryStore::new());
        let viewport = Arc::new(ResizableViewport(Mutex::new(VIEWPORT)));
        let mut widget = Widget::new(
            PositionStore::new(store.clone()),
            viewport.clone(),
            ChatPhrases::default(),
        );
        widget.start();

        let mut capture = TrackedCapture::default();
        assert!(widget.pointer_down(mouse(730.0, 530.0), &mut capture));
        assert_eq!(
            widget.pointer_move(mouse(700.0, 500.0)),
            Some(Coordinate::new(690.0, 490.0))
        );

        viewport.resize(Viewport::new(400.0, 300.0));
        assert_eq!(widget.handle_resize(), Some(Coordinate::new(328.0, 228.0)));

        let outcome = widget
            .pointer_up(mouse(700.0, 500.0), &mut capture)
            .expect("gesture resolves");

        let expected = Coordinate::new(328.0, 228.0);
        assert_eq!(outcome, DragOutcome::Drag { position: expected });
        assert_eq!(widget.position(), Some(expected));

        let reloaded = PositionStore::new(store).load(&Viewport::new(400.0, 300.0));
        assert_eq!(reloaded, expected);
    }

    #[test]
    fn edited_input_is_what_gets_submitted() {
        let mut widget = widget_with(Arc::new(MemoryStore::new()));
        widget.open();
        widget.set_pending_input("draft");
        widget.set_pending_input("final question");

        let outgoing = widget.submit_pending().expect("accepted");

        assert_eq!(outgoing.question, "final question");
        assert_eq!(widget.chat().pending_input(), "");
        assert_eq!(
            widget.chat().messages().last(),
            Some(&Message::user("final question"))
        );
    }

    #[test]
    fn blank_pending_input_is_not_submitted() {
        let mut widget = widget_with(Arc::new(MemoryStore::new()));
        widget.open();
        widget.set_pending_input("   ");

        assert_eq!(widget.submit_pending(), None);
        assert_eq!(widget.chat().pending_input(), "   ");
        assert!(!widget.chat().is_loading());
    }

    #[test]
    fn loading_row_tracks_outstanding_request() {
        let mut widget = widget_with(Arc::new(MemoryStore::new()));
        widget.open();
        widget.set_pending_input("hello");

        let outgoing = widget.submit_pending().expect("accepted");
        let panel = widget.snapshot().panel.expect("panel open");
        assert!(panel.is_loading);
        assert_eq!(panel.pending_input, "");

        assert!(widget.resolve(outgoing.ticket, Ok(Answer::Text("X".to_string()))));
        let panel = widget.snapshot().panel.expect("panel open");
        assert!(!panel.is_loading);
        assert_eq!(
            panel.messages,
            vec![
                Message::bot(DEFAULT_GREETING),
                Message::user("hello"),
                Message::bot("X"),
            ]
        );
    }
}
