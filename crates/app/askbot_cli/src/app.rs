//! Command implementations.
//!
//! [`AppContext`] is built once per process and owns the theme and auth
//! contexts; commands borrow it instead of reaching for globals.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use askbot_core::auth::{AuthContext, GuestIdentityProvider, SignInFlow, SignInMethod};
use askbot_core::config::{IdentityConfig, ProviderConfig};
use askbot_core::preferences::FileStore;
use askbot_core::provider::ProviderClient;
use askbot_core::relay::HttpRelay;
use askbot_core::theme::ThemeContext;
use askbot_core::{ConversationView, Relay, SubmitOutcome};
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{RelayArgs, ThemeAction};
use crate::render::{Palette, colour_enabled};
use crate::{Error, Result};

pub struct AppContext {
    pub theme: ThemeContext,
    pub auth: AuthContext,
    colour: bool,
}

impl AppContext {
    pub fn start(prefs: Option<PathBuf>, no_color: bool) -> Result<Self> {
        let theme = load_theme(prefs);

        let identity = IdentityConfig::from_env();
        debug!("identity settings: {identity:?}");
        let display_name = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_else(|_| "guest".to_string());
        let auth = AuthContext::new(Arc::new(GuestIdentityProvider::new(
            display_name,
            &identity,
        )));

        Ok(Self {
            theme,
            auth,
            colour: colour_enabled(no_color),
        })
    }

    fn palette(&self) -> Palette {
        Palette::new(self.theme.theme(), self.colour)
    }
}

/// Loads the theme from the preference file. An unusable file never blocks a
/// command: preferences then live in memory for this process only.
fn load_theme(prefs: Option<PathBuf>) -> ThemeContext {
    let opened = match prefs {
        Some(path) => Ok(FileStore::new(path)),
        None => FileStore::open_default(),
    };
    let loaded = opened.and_then(|store| ThemeContext::load(Arc::new(store)));
    match loaded {
        Ok(theme) => theme,
        Err(e) => {
            warn!("{e}; preferences will not be saved this session");
            ThemeContext::ephemeral()
        }
    }
}

pub fn theme(ctx: &mut AppContext, action: Option<ThemeAction>) -> Result<()> {
    match action.unwrap_or(ThemeAction::Show) {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            ctx.theme.toggle()?;
        }
        ThemeAction::Set { theme } => ctx.theme.set(theme)?,
    }
    println!("{}", ctx.theme.theme());
    Ok(())
}

/// Builds the relay selected on the command line.
pub fn relay_from(args: &RelayArgs) -> Result<Box<dyn Relay>> {
    if args.direct {
        let config = ProviderConfig::from_env()?;
        config.validate()?;
        info!("asking {} directly with model {}", config.base_url, config.model);
        Ok(Box::new(ProviderClient::new(config)?))
    } else {
        info!("asking relay server at {}", args.server);
        Ok(Box::new(HttpRelay::new(args.server.clone())))
    }
}

/// One question, one answer. Blank questions are silently skipped.
pub async fn ask(ctx: &AppContext, question: String, relay: &dyn Relay) -> Result<()> {
    let mut view = ConversationView::new();
    let palette = ctx.palette();

    match view.ask(relay, question).await {
        SubmitOutcome::Ignored => Ok(()),
        SubmitOutcome::Answered => {
            if let Some(reply) = view.transcript().last() {
                println!("{}", reply.content);
            }
            Ok(())
        }
        SubmitOutcome::Failed => {
            let reason = view.last_error().unwrap_or("unknown error");
            eprintln!("{}", palette.failure(reason));
            Err(Error::Custom("question could not be answered".into()))
        }
    }
}

/// Interactive loop over stdin.
pub async fn chat(
    ctx: &mut AppContext,
    sign_in: Option<SignInMethod>,
    relay: &dyn Relay,
) -> Result<()> {
    let mut flow = SignInFlow::new();
    match sign_in {
        Some(method) => {
            println!("{}", ctx.palette().notice(&flow.button_label(method)));
            match flow.sign_in(&ctx.auth, method).await {
                Some(user) => println!(
                    "{}",
                    ctx.palette().notice(&format!(
                        "Signed in as {}",
                        user.display_name.as_deref().unwrap_or(&user.uid)
                    ))
                ),
                None => {
                    if let Some(msg) = flow.error() {
                        eprintln!("{}", ctx.palette().failure(msg));
                    }
                }
            }
        }
        None => println!(
            "{}",
            ctx.palette().notice("Continuing without logging in.")
        ),
    }
    println!(
        "{}",
        ctx.palette()
            .notice("Commands: /theme, /whoami, /signout, /quit")
    );

    let mut view = ConversationView::new();
    for entry in view.transcript() {
        println!("{}", ctx.palette().entry(entry));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/theme" => {
                let theme = ctx.theme.toggle()?;
                println!("{}", ctx.palette().notice(&format!("Theme: {theme}")));
            }
            "/whoami" => {
                let who = ctx
                    .auth
                    .current_user()
                    .map(|u| u.display_name.unwrap_or(u.uid))
                    .unwrap_or_else(|| "not signed in".to_string());
                println!("{}", ctx.palette().notice(&who));
            }
            "/signout" => {
                if ctx.auth.current_user().is_none() {
                    println!("{}", ctx.palette().notice("not signed in"));
                } else if flow.sign_out(&ctx.auth).await {
                    println!("{}", ctx.palette().notice("Signed out."));
                } else if let Some(msg) = flow.error() {
                    eprintln!("{}", ctx.palette().failure(msg));
                }
            }
            _ => {
                view.set_input(line);
                let Some(question) = view.begin_submit() else {
                    continue;
                };
                if view.is_busy() {
                    println!("{}", ctx.palette().thinking());
                }
                let result = relay.ask(&question).await;
                match view.settle(result) {
                    SubmitOutcome::Answered => {
                        if let Some(reply) = view.transcript().last() {
                            println!("{}", ctx.palette().entry(reply));
                        }
                    }
                    SubmitOutcome::Failed => {
                        let reason = view.last_error().unwrap_or("unknown error");
                        eprintln!("{}", ctx.palette().failure(reason));
                    }
                    SubmitOutcome::Ignored => {}
                }
            }
        }
    }

    debug!("conversation ended with {} entries", view.transcript().len());
    Ok(())
}
