/// Events the input box emits towards the widget view.
pub mod events;
pub mod message_input;
/// Transcript, loading row and header rendering.
pub mod transcript;

pub use events::{InputEdited, Submit};
pub use message_input::MessageInput;
