use std::sync::Arc;

use gpui::prelude::FluentBuilder;
use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    v_flex,
};
use gpui_tokio_bridge::Tokio;
use perch_core::{
    Coordinate, OutgoingQuestion, PanelSnapshot, PositionStore, RequestTicket, TrackedCapture,
    WIDGET_SIZE, Widget,
};
use perch_llm::{Answer, AssistantClient, AssistantError};

use crate::chat::{InputEdited, MessageInput, Submit, transcript};
use crate::pointer::mouse_event;
use crate::settings::WidgetSettings;
use crate::viewport::WindowViewport;

gpui::actions!(perch, [Quit]);

const PANEL_WIDTH: Pixels = px(384.);
const PANEL_HEIGHT: Pixels = px(600.);
const PANEL_INSET: Pixels = px(24.);

/// Window content: the draggable launcher while closed, the chat panel while open.
pub struct WidgetView {
    widget: Widget,
    viewport: WindowViewport,
    client: Arc<dyn AssistantClient>,
    capture: TrackedCapture,
    message_input: Entity<MessageInput>,
    scroll_handle: ScrollHandle,
    assistant_name: SharedString,
    status_label: SharedString,
    request_task: Option<Task<()>>,
    // Transcript rows seen by the last render; a change scrolls to the bottom.
    rendered_rows: usize,
    _subscriptions: Vec<Subscription>,
}

impl WidgetView {
    pub fn new(
        positions: PositionStore,
        client: Arc<dyn AssistantClient>,
        settings: &WidgetSettings,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let viewport = WindowViewport::from_size(window.viewport_size());
        let mut widget = Widget::new(positions, Arc::new(viewport.clone()), settings.phrases());
        widget.start();

        let placeholder = SharedString::from(settings.input_placeholder.clone());
        let message_input = cx.new(|cx| MessageInput::new(placeholder, window, cx));

        let subscriptions = vec![
            cx.subscribe_in(
                &message_input,
                window,
                |this, _, _: &Submit, window, cx| {
                    this.handle_submit(window, cx);
                },
            ),
            cx.subscribe(&message_input, |this, _, event: &InputEdited, _cx| {
                this.widget.set_pending_input(event.content.clone());
            }),
            cx.observe_window_bounds(window, |this, window, cx| {
                this.handle_window_resize(window, cx);
            }),
        ];

        Self {
            widget,
            viewport,
            client,
            capture: TrackedCapture::default(),
            message_input,
            scroll_handle: ScrollHandle::new(),
            assistant_name: SharedString::from(settings.assistant_name.clone()),
            status_label: SharedString::from(settings.status_label.clone()),
            request_task: None,
            rendered_rows: 0,
            _subscriptions: subscriptions,
        }
    }

    fn handle_window_resize(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if !self.viewport.update(window.viewport_size()) {
            return;
        }

        if let Some(position) = self.widget.handle_resize() {
            tracing::debug!(x = position.x, y = position.y, "launcher re-clamped after resize");
        }
        cx.notify();
    }

    fn handle_launcher_down(
        &mut self,
        event: &MouseDownEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let pointer = mouse_event(event.button, event.position);
        if self.widget.pointer_down(pointer, &mut self.capture) {
            cx.stop_propagation();
            cx.notify();
        }
    }

    fn handle_mouse_move(
        &mut self,
        event: &MouseMoveEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !self.widget.is_dragging() {
            return;
        }

        let Some(button) = event.pressed_button else {
            // The release happened where the window could not see it.
            let pointer = mouse_event(MouseButton::Left, event.position);
            if let Some(outcome) = self.widget.pointer_cancel(pointer, &mut self.capture) {
                self.after_gesture(outcome.is_click(), window, cx);
            }
            return;
        };

        if self
            .widget
            .pointer_move(mouse_event(button, event.position))
            .is_some()
        {
            cx.notify();
        }
    }

    fn handle_mouse_up(
        &mut self,
        event: &MouseUpEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let pointer = mouse_event(event.button, event.position);
        if let Some(outcome) = self.widget.pointer_up(pointer, &mut self.capture) {
            self.after_gesture(outcome.is_click(), window, cx);
        }
    }

    fn after_gesture(&mut self, opened: bool, window: &mut Window, cx: &mut Context<Self>) {
        if opened {
            self.message_input.update(cx, |input, cx| {
                input.focus(window, cx);
            });
        }
        cx.notify();
    }

    fn close_panel(&mut self, cx: &mut Context<Self>) {
        self.widget.close();
        cx.notify();
    }

    fn handle_submit(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        let Some(outgoing) = self.widget.submit_pending() else {
            return;
        };

        self.message_input.update(cx, |input, cx| {
            input.clear(window, cx);
            input.set_loading(true, cx);
        });
        self.spawn_request(outgoing, cx);
        cx.notify();
    }

    fn spawn_request(&mut self, outgoing: OutgoingQuestion, cx: &mut Context<Self>) {
        let OutgoingQuestion { ticket, question } = outgoing;
        let client = self.client.clone();
        tracing::debug!(ticket = ticket.0, endpoint = %client.endpoint(), "sending question");

        let exchange = Tokio::spawn(cx, async move { client.ask(&question).await });

        self.request_task = Some(cx.spawn(async move |this, cx| {
            let result = exchange.await.unwrap_or_else(|error| {
                Err(AssistantError::Interrupted {
                    stage: "join-assistant-request",
                    details: error.to_string(),
                })
            });

            let _ = this.update(cx, |this, cx| {
                this.finish_request(ticket, result, cx);
            });
        }));
    }

    fn finish_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<Answer, AssistantError>,
        cx: &mut Context<Self>,
    ) {
        self.widget.resolve(ticket, result);

        let is_loading = self.widget.chat().is_loading();
        self.message_input.update(cx, |input, cx| {
            input.set_loading(is_loading, cx);
        });
        cx.notify();
    }

    fn render_launcher(&self, position: Coordinate, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let size = px(WIDGET_SIZE as f32);

        div()
            .id("chat-launcher")
            .absolute()
            .left(px(position.x as f32))
            .top(px(position.y as f32))
            .w(size)
            .h(size)
            .rounded_full()
            .flex()
            .items_center()
            .justify_center()
            .bg(theme.primary)
            .text_color(theme.primary_foreground)
            .text_2xl()
            .shadow_lg()
            .cursor_pointer()
            .on_mouse_down(MouseButton::Left, cx.listener(Self::handle_launcher_down))
            .child("🤖")
    }

    fn render_panel(&self, panel: &PanelSnapshot, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let close = Button::new("close-chat")
            .small()
            .ghost()
            .label("Close")
            .on_click(cx.listener(|this, _, _window, cx| {
                this.close_panel(cx);
            }));

        v_flex()
            .id("chat-panel")
            .absolute()
            .right(PANEL_INSET)
            .bottom(PANEL_INSET)
            .w(PANEL_WIDTH)
            .h(PANEL_HEIGHT)
            .rounded_2xl()
            .shadow_xl()
            .overflow_hidden()
            .bg(theme.muted)
            .child(transcript::render_header(
                self.assistant_name.clone(),
                self.status_label.clone(),
                close,
                cx,
            ))
            .child(transcript::render_messages(
                &panel.messages,
                panel.is_loading,
                &self.scroll_handle,
                cx,
            ))
            .child(self.message_input.clone())
    }
}

impl Render for WidgetView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let snapshot = self.widget.snapshot();

        if let Some(panel) = &snapshot.panel {
            let rows = panel.messages.len() + usize::from(panel.is_loading);
            if rows != self.rendered_rows {
                self.rendered_rows = rows;
                self.scroll_handle.scroll_to_bottom();
            }
        }

        div()
            .size_full()
            .relative()
            .bg(cx.theme().background)
            .on_mouse_move(cx.listener(Self::handle_mouse_move))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::handle_mouse_up))
            .when_some(snapshot.launcher, |this, position| {
                this.child(self.render_launcher(position, cx))
            })
            .when_some(snapshot.panel.as_ref(), |this, panel| {
                this.child(self.render_panel(panel, cx))
            })
    }
}
