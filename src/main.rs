use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use studybeat::{app::App, cli, config, error, types, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Remove the cached Spotify credential
    Logout,

    /// Run the local control server
    Serve,

    /// Resume playback
    Play,

    /// Pause playback
    Pause,

    /// Toggle between play and pause
    Toggle,

    /// Skip to the next track
    Next,

    /// Go back to the previous track
    Previous,

    /// Show authorization and playback state
    Status,

    /// Show the current track
    Now,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let app = match App::from_settings(config::Settings::from_env()).await {
        Ok(app) => app,
        Err(e) => error!("Cannot initialize. Err: {}", e),
    };

    match cli.command {
        Command::Auth => cli::auth(&app).await,
        Command::Logout => cli::logout(&app).await,
        Command::Serve => cli::serve(&app).await,
        Command::Play => cli::control(&app, types::Command::Play).await,
        Command::Pause => cli::control(&app, types::Command::Pause).await,
        Command::Toggle => cli::control(&app, types::Command::TogglePlayPause).await,
        Command::Next => cli::control(&app, types::Command::Next).await,
        Command::Previous => cli::control(&app, types::Command::Previous).await,
        Command::Status => cli::status(&app).await,
        Command::Now => cli::now_playing(&app).await,
        Command::Completions(_) => {}
    }
}
