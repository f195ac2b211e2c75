//! Chat Loop
//!
//! Alternates operator turns and generated turns over any [`ChatIo`]:
//!
//! ```text
//! prompt_for_input(user) ──► conversation ──► generator ──► snapshots
//!          ▲                                                    │
//!          └──────── stream_output ◄── prompt_for_output ◄──────┘
//! ```
//!
//! An empty message or `!!exit` ends the session; `!!reset` starts a fresh
//! conversation.

use parlor_core::GenerationSnapshot;

use crate::chat_io::ChatIo;
use crate::error::ConsoleError;

/// Ends the session
pub const EXIT_COMMAND: &str = "!!exit";
/// Clears the conversation
pub const RESET_COMMAND: &str = "!!reset";

/// Labels used for the two sides of the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roles {
    pub user: String,
    pub assistant: String,
}

impl Default for Roles {
    fn default() -> Self {
        Self {
            user: "USER".to_string(),
            assistant: "ASSISTANT".to_string(),
        }
    }
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: String,
    pub text: String,
}

/// Ordered message history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: impl Into<String>, text: impl Into<String>) {
        self.turns.push(Turn {
            role: role.into(),
            text: text.into(),
        });
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Text of the most recent turn
    pub fn last_text(&self) -> Option<&str> {
        self.turns.last().map(|turn| turn.text.as_str())
    }
}

/// Source of generation snapshots for a conversation
pub trait Generator {
    /// Start generating a reply to `conversation`
    ///
    /// Each item is the full answer so far.
    fn generate(
        &mut self,
        conversation: &Conversation,
    ) -> Box<dyn Iterator<Item = GenerationSnapshot> + '_>;
}

/// Run the chat loop until the operator exits
///
/// Returns the conversation as it stood when the session ended.
pub fn run(
    io: &mut dyn ChatIo,
    generator: &mut dyn Generator,
    roles: &Roles,
) -> Result<Conversation, ConsoleError> {
    let mut conversation = Conversation::new();

    loop {
        let input = io.prompt_for_input(&roles.user)?;

        if input.is_empty() || input == EXIT_COMMAND {
            tracing::info!(turns = conversation.turns().len(), "Chat session ended");
            return Ok(conversation);
        }
        if input == RESET_COMMAND {
            tracing::info!("Conversation reset");
            conversation.clear();
            io.announce("resetting...")?;
            continue;
        }

        conversation.push(roles.user.as_str(), input);

        io.prompt_for_output(&roles.assistant)?;
        let answer = {
            let mut snapshots = generator.generate(&conversation);
            io.stream_output(&mut *snapshots)?
        };
        tracing::debug!(chars = answer.len(), "Answer complete");
        conversation.push(roles.assistant.as_str(), answer);
    }
}
