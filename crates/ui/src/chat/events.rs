/// Emitted when the user asks to send; the text travels through [`InputEdited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submit;

/// Emitted on every edit so the widget can mirror the pending text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEdited {
    pub content: String,
}
