use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, h_flex, v_flex};
use perch_core::{Message, Sender};

pub const LOADING_LABEL: &str = "…thinking";
const BUBBLE_MAX_WIDTH: Pixels = px(280.);

pub fn render_messages(
    messages: &[Message],
    is_loading: bool,
    scroll_handle: &ScrollHandle,
    cx: &App,
) -> impl IntoElement {
    let rows = messages
        .iter()
        .enumerate()
        .map(|(index, message)| render_message(index, message, cx));

    div()
        .id("chat-transcript")
        .flex_1()
        .min_h_0()
        .overflow_y_scroll()
        .track_scroll(scroll_handle)
        .child(
            v_flex()
                .gap_4()
                .p_4()
                .children(rows)
                .when(is_loading, |this| this.child(render_loading_row(cx))),
        )
}

fn render_message(index: usize, message: &Message, cx: &App) -> AnyElement {
    let theme = cx.theme();
    let text = SharedString::from(message.text.clone());

    match message.sender {
        Sender::User => h_flex()
            .id(("message", index))
            .w_full()
            .justify_end()
            .items_start()
            .gap_2()
            .child(
                div()
                    .max_w(BUBBLE_MAX_WIDTH)
                    .p_3()
                    .rounded_2xl()
                    .bg(theme.primary)
                    .text_color(theme.primary_foreground)
                    .child(text),
            )
            .child(avatar("🙂", theme.muted, theme.foreground))
            .into_any_element(),
        Sender::Bot => h_flex()
            .id(("message", index))
            .w_full()
            .justify_start()
            .items_start()
            .gap_2()
            .child(avatar("🤖", theme.primary, theme.primary_foreground))
            .child(
                div()
                    .max_w(BUBBLE_MAX_WIDTH)
                    .p_3()
                    .rounded_2xl()
                    .bg(theme.background)
                    .text_color(theme.foreground)
                    .child(text),
            )
            .into_any_element(),
    }
}

fn render_loading_row(cx: &App) -> impl IntoElement {
    div()
        .text_sm()
        .text_color(cx.theme().muted_foreground)
        .child(LOADING_LABEL)
}

fn avatar(glyph: &'static str, background: Hsla, foreground: Hsla) -> impl IntoElement {
    div()
        .flex_none()
        .size_8()
        .rounded_full()
        .flex()
        .items_center()
        .justify_center()
        .bg(background)
        .text_color(foreground)
        .text_sm()
        .child(glyph)
}

pub fn render_header(
    assistant_name: SharedString,
    status_label: SharedString,
    close: impl IntoElement,
    cx: &App,
) -> Div {
    let theme = cx.theme();

    h_flex()
        .w_full()
        .justify_between()
        .items_center()
        .p_4()
        .rounded_t_2xl()
        .bg(theme.primary)
        .text_color(theme.primary_foreground)
        .child(
            h_flex()
                .gap_3()
                .items_center()
                .child(avatar(
                    "🤖",
                    theme.primary_foreground.opacity(0.2),
                    theme.primary_foreground,
                ))
                .child(
                    v_flex()
                        .child(
                            div()
                                .text_lg()
                                .font_weight(FontWeight::SEMIBOLD)
                                .child(assistant_name),
                        )
                        .child(div().text_xs().text_color(theme.success).child(status_label)),
                ),
        )
        .child(close)
}
