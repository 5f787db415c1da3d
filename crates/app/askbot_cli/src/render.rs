//! Plain-text rendering of transcript entries.

use askbot_core::message::{Message, Role};
use askbot_core::theme::Theme;

const RESET: &str = "\x1b[0m";

/// ANSI colours for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    user: &'static str,
    bot: &'static str,
    muted: &'static str,
    error: &'static str,
    enabled: bool,
}

impl Palette {
    pub fn new(theme: Theme, enabled: bool) -> Self {
        match theme {
            Theme::Dark => Self {
                user: "\x1b[92m",
                bot: "\x1b[97m",
                muted: "\x1b[90m",
                error: "\x1b[91m",
                enabled,
            },
            Theme::Light => Self {
                user: "\x1b[32m",
                bot: "\x1b[30m",
                muted: "\x1b[37m",
                error: "\x1b[31m",
                enabled,
            },
        }
    }

    fn paint(&self, colour: &str, text: &str) -> String {
        if self.enabled {
            format!("{colour}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn entry(&self, message: &Message) -> String {
        match message.role {
            Role::User => self.paint(self.user, &format!("You: {}", message.content)),
            Role::Assistant => self.paint(self.bot, &format!("AskBot: {}", message.content)),
            Role::System => self.paint(self.muted, &format!("[system] {}", message.content)),
        }
    }

    pub fn thinking(&self) -> String {
        self.paint(self.muted, "Thinking...")
    }

    pub fn failure(&self, reason: &str) -> String {
        self.paint(
            self.error,
            &format!("Could not get an answer ({reason}). Please try again."),
        )
    }

    pub fn notice(&self, text: &str) -> String {
        self.paint(self.muted, text)
    }
}

/// True when colour output should be used.
pub fn colour_enabled(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}
