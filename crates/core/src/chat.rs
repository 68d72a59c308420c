use perch_llm::{Answer, AssistantClient, AssistantError};

pub const DEFAULT_GREETING: &str = "👋 Hi! I’m the Interas Labs assistant. How can I help you?";
pub const DEFAULT_APOLOGY: &str = "⚠️ Sorry, something went wrong. Try again later.";
pub const DEFAULT_NO_ANSWER: &str = "No answer returned";

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Fixed bot lines the session emits on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPhrases {
    pub greeting: String,
    pub apology: String,
    pub no_answer: String,
}

impl Default for ChatPhrases {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            apology: DEFAULT_APOLOGY.to_string(),
            no_answer: DEFAULT_NO_ANSWER.to_string(),
        }
    }
}

/// Identifies one request/response exchange.
///
/// A fresh ticket is minted per submit so a late or repeated completion can be
/// told apart from the one currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(pub u64);

/// A question accepted by [`ChatSession::submit`] that the host must deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingQuestion {
    pub ticket: RequestTicket,
    pub question: String,
}

/// Transcript, input box and in-flight flag of the chat panel.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    pending_input: String,
    is_open: bool,
    in_flight: Option<RequestTicket>,
    next_ticket: u64,
    phrases: ChatPhrases,
}

impl ChatSession {
    pub fn new(phrases: ChatPhrases) -> Self {
        Self {
            phrases,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phrases(&self) -> &ChatPhrases {
        &self.phrases
    }

    /// Shows the panel, greeting only on the first open of an empty transcript.
    pub fn open(&mut self) {
        self.is_open = true;
        if self.messages.is_empty() {
            self.messages.push(Message::bot(self.phrases.greeting.clone()));
        }
    }

    /// Hides the panel. An outstanding request keeps running and still lands.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn submit_pending(&mut self) -> Option<OutgoingQuestion> {
        let text = self.pending_input.clone();
        self.submit(text)
    }

    /// Records the user's message and starts an exchange.
    ///
    /// Returns `None` without side effects when `text` is blank or another
    /// exchange is still outstanding.
    pub fn submit(&mut self, text: impl Into<String>) -> Option<OutgoingQuestion> {
        let text = text.into();
        if text.trim().is_empty() || self.in_flight.is_some() {
            return None;
        }

        self.next_ticket = self.next_ticket.saturating_add(1);
        let ticket = RequestTicket(self.next_ticket);

        self.messages.push(Message::user(text.clone()));
        self.pending_input.clear();
        self.in_flight = Some(ticket);

        Some(OutgoingQuestion {
            ticket,
            question: text,
        })
    }

    /// Completes the outstanding exchange and appends the bot reply.
    ///
    /// Returns `false` and leaves state untouched when `ticket` is not the one
    /// in flight.
    pub fn resolve(
        &mut self,
        ticket: RequestTicket,
        result: Result<Answer, AssistantError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            tracing::debug!(ticket = ticket.0, "ignoring completion for stale chat request");
            return false;
        }

        let reply = match result {
            Ok(Answer::Text(text)) => text,
            Ok(Answer::Missing) => self.phrases.no_answer.clone(),
            Err(error) => {
                tracing::warn!(ticket = ticket.0, error = %error, "chat request failed");
                self.phrases.apology.clone()
            }
        };

        self.messages.push(Message::bot(reply));
        self.in_flight = None;
        true
    }

    /// Runs a whole exchange against `client`. Returns `false` if `text` was
    /// not accepted.
    pub async fn ask(&mut self, client: &dyn AssistantClient, text: impl Into<String>) -> bool {
        let Some(outgoing) = self.submit(text) else {
            return false;
        };

        let result = client.ask(&outgoing.question).await;
        self.resolve(outgoing.ticket, result)
    }
}
