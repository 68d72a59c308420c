use gpui::*;
use gpui_component::{
    ActiveTheme, Disableable, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};

use crate::chat::events::{InputEdited, Submit};

pub struct MessageInput {
    input_state: Entity<InputState>,
    is_loading: bool,
}

impl EventEmitter<Submit> for MessageInput {}
impl EventEmitter<InputEdited> for MessageInput {}

impl MessageInput {
    pub fn new(placeholder: SharedString, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| InputState::new(window, cx).placeholder(placeholder));

        cx.subscribe_in(
            &input_state,
            window,
            |this, state, event: &InputEvent, _window, cx| match event {
                InputEvent::PressEnter { .. } => this.handle_submit(cx),
                InputEvent::Change { .. } => {
                    let content = state.read(cx).value().to_string();
                    cx.emit(InputEdited { content });
                }
                _ => {}
            },
        )
        .detach();

        Self {
            input_state,
            is_loading: false,
        }
    }

    /// Typing stays enabled while loading; only sending is blocked.
    pub fn set_loading(&mut self, loading: bool, cx: &mut Context<Self>) {
        if self.is_loading != loading {
            self.is_loading = loading;
            cx.notify();
        }
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
    }

    pub fn focus(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.focus(window, cx);
        });
    }

    /// The widget decides whether the pending text is accepted and clears us if so.
    fn handle_submit(&mut self, cx: &mut Context<Self>) {
        cx.emit(Submit);
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex()
            .w_full()
            .gap_2()
            .p_3()
            .border_t_1()
            .border_color(theme.border)
            .bg(theme.background)
            .child(div().flex_1().child(Input::new(&self.input_state).w_full()))
            .child(
                Button::new("send")
                    .small()
                    .primary()
                    .icon(IconName::ArrowUp)
                    .disabled(self.is_loading)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.handle_submit(cx);
                    })),
            )
    }
}
