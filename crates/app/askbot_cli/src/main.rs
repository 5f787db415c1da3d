// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};

mod app;
mod cli;
mod logging;
mod render;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init()?;

    let args = Cli::parse();

    match args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Theme { action } => {
            let mut ctx = app::AppContext::start(args.prefs, args.no_color)?;
            app::theme(&mut ctx, action)?;
        }
        Commands::Ask { question, relay } => {
            let ctx = app::AppContext::start(args.prefs, args.no_color)?;
            let relay = app::relay_from(&relay)?;
            runtime()?.block_on(app::ask(&ctx, question, relay.as_ref()))?;
        }
        Commands::Chat { sign_in, relay } => {
            let mut ctx = app::AppContext::start(args.prefs, args.no_color)?;
            let relay = app::relay_from(&relay)?;
            runtime()?.block_on(app::chat(&mut ctx, sign_in, relay.as_ref()))?;
        }
    }

    Ok(())
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
