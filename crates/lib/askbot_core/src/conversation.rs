//! Conversation view: transcript plus the idle / awaiting-response machine.
//!
//! ```text
//!            submit(non-blank)               relay settles (ok or err)
//!   Idle ─────────────────────────▶ Awaiting ─────────────────────────▶ Idle
//!     ▲   append {user}, clear input,           ok  → append {assistant}
//!     │   busy = true                           err → log, last_error = Some
//!     └── submit(blank) / submit while busy: no change
//! ```
//!
//! [`ConversationView::submit`] drives a whole round trip. Front-ends with
//! their own event loop can drive the two halves separately through
//! [`ConversationView::begin_submit`] and [`ConversationView::settle`].

use log::{debug, error};

use crate::hello::GREETING;
use crate::message::Message;
use crate::relay::{Relay, RelayError};

/// Phase of the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// What a call to [`ConversationView::submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or a request already in flight; nothing happened.
    Ignored,
    /// The reply was appended to the transcript.
    Answered,
    /// The relay failed; only the user entry was appended.
    Failed,
}

/// Clears the busy flag when dropped, whether the round trip completed,
/// failed or was abandoned mid-await.
struct BusyGuard<'a>(&'a mut ViewState);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.0 = ViewState::Idle;
    }
}

/// In-memory chat transcript with input gating.
#[derive(Debug, Clone)]
pub struct ConversationView {
    transcript: Vec<Message>,
    input: String,
    state: ViewState,
    last_error: Option<String>,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    /// A view whose transcript opens with the assistant greeting.
    pub fn new() -> Self {
        Self::with_greeting(GREETING)
    }

    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            transcript: vec![Message::assistant(greeting)],
            input: String::new(),
            state: ViewState::Idle,
            last_error: None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the pending input text (the text field contents).
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// True while a request is outstanding; front-ends disable input and show
    /// a "Thinking..." indicator.
    pub fn is_busy(&self) -> bool {
        self.state == ViewState::AwaitingResponse
    }

    /// Message of the most recent failed round trip, cleared by the next
    /// submission. Never part of the transcript.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// First half of a round trip.
    ///
    /// Returns the question to send, or `None` when the input is blank or a
    /// request is already outstanding. On `Some`, the user entry has been
    /// appended, the input cleared and the view is busy.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_busy() {
            debug!("submit ignored: request already in flight");
            return None;
        }
        if is_blank(&self.input) {
            return None;
        }

        let question = std::mem::take(&mut self.input);
        self.transcript.push(Message::user(question.as_str()));
        self.last_error = None;
        self.state = ViewState::AwaitingResponse;
        Some(question)
    }

    /// Second half of a round trip: records the relay result and returns to
    /// idle unconditionally.
    pub fn settle(&mut self, result: Result<String, RelayError>) -> SubmitOutcome {
        let outcome = record(&mut self.transcript, &mut self.last_error, result);
        self.state = ViewState::Idle;
        outcome
    }

    /// Submits the pending input through `relay` and waits for the answer.
    pub async fn submit(&mut self, relay: &dyn Relay) -> SubmitOutcome {
        let Some(question) = self.begin_submit() else {
            return SubmitOutcome::Ignored;
        };

        let _busy = BusyGuard(&mut self.state);
        let result = relay.ask(&question).await;
        record(&mut self.transcript, &mut self.last_error, result)
    }

    /// Convenience: set the input to `text` and submit it.
    pub async fn ask(&mut self, relay: &dyn Relay, text: impl Into<String>) -> SubmitOutcome {
        self.set_input(text);
        self.submit(relay).await
    }
}

/// Whitespace-only text, counting a stray byte-order mark as whitespace.
fn is_blank(text: &str) -> bool {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .is_empty()
}

fn record(
    transcript: &mut Vec<Message>,
    last_error: &mut Option<String>,
    result: Result<String, RelayError>,
) -> SubmitOutcome {
    match result {
        Ok(reply) => {
            transcript.push(Message::assistant(reply));
            SubmitOutcome::Answered
        }
        Err(e) => {
            error!("Error fetching from API: {e}");
            *last_error = Some(e.to_string());
            SubmitOutcome::Failed
        }
    }
}
