use std::path::PathBuf;

use askbot_core::auth::SignInMethod;
use askbot_core::theme::Theme;
use clap::{Args, Parser, Subcommand};

/// Default relay endpoint of a locally running `askbot_server`.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3100/api/chat";

#[derive(Parser, Debug)]
#[command(name = "askbot", version, about = "Ask questions, get answers", long_about = None)]
pub struct Cli {
    /// Preference file (theme). Defaults to `<config dir>/askbot/preferences.json`.
    #[arg(long, global = true, env = "ASKBOT_PREFS")]
    pub prefs: Option<PathBuf>,

    /// Disable ANSI colours (also honoured: a non-empty `NO_COLOR`).
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print name and version
    Version,

    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Ask a single question and print the answer
    Ask {
        question: String,

        #[command(flatten)]
        relay: RelayArgs,
    },

    /// Start an interactive conversation
    Chat {
        /// Sign in before chatting (otherwise continue without logging in)
        #[arg(long, value_name = "PROVIDER")]
        sign_in: Option<SignInMethod>,

        #[command(flatten)]
        relay: RelayArgs,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
    /// Set the theme explicitly
    Set { theme: Theme },
}

/// Where questions are sent.
#[derive(Args, Debug, Clone)]
pub struct RelayArgs {
    /// Call the completion provider directly; `--server` is then ignored
    #[arg(long)]
    pub direct: bool,

    /// Relay endpoint URL
    #[arg(long, env = "ASKBOT_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server: String,
}
