// Entrypoint for the CLI application.
// - Parses flags, loads the config, sets up logging.
// - With no subcommand runs the interactive menu; `free`/`paid` run one
//   extraction and exit non-zero unless something was copied.

use clap::{Parser, Subcommand};
use itch_meta::api::{ApiClient, HttpTransport};
use itch_meta::clipboard::{choose_sink, ClipboardSink, SystemClipboard};
use itch_meta::config::Config;
use itch_meta::extract::{extract, EmitPolicy, Outcome};
use itch_meta::lookup::Mode;
use itch_meta::ui::{main_menu, SpinnerTransport};
use itch_meta::{logging, notify};
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "itch-meta",
    version,
    about = "Copy itch.io upload metadata to the clipboard"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "itch.io API key (overrides ITCH_API_KEY and config.toml)"
    )]
    api_key: Option<String>,
    #[arg(long, global = true, help = "Show messages in native dialog windows")]
    dialogs: bool,
    #[arg(long, global = true, help = "Also print each copied document to stdout")]
    print: bool,
    #[arg(
        long,
        global = true,
        default_value_t = 10,
        value_name = "SECS",
        help = "Seconds a one-shot run keeps serving the clipboard (Linux) until another program takes it"
    )]
    hold: u64,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (the default).
    Menu,
    /// Look up uploads of a free game.
    Free { url: String },
    /// Look up uploads of a game unlocked by one of your download keys.
    Paid { url: String },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Prefer a log file under the state dir; stderr if that is not possible.
    if let Err(e) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", e);
    }

    // The API key is required before anything touches the network.
    let config = Config::load(cli.api_key.clone())?;
    // Every request goes through the spinner so slow calls are visible.
    let api = ApiClient::new(SpinnerTransport::new(HttpTransport::new()?), config);
    let notifier = notify::notifier(cli.dialogs);

    // Open the clipboard only now that the command line and config are
    // valid. With `--print` a missing clipboard degrades to stdout.
    let mut clipboard = choose_sink(
        SystemClipboard::new(Duration::from_secs(cli.hold)),
        cli.print,
    )?;

    let (mode, url) = match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            // The clipboard is served while the menu runs; hand the last
            // copy off when the user exits.
            main_menu(&api, clipboard.as_mut(), notifier.as_ref())?;
            clipboard.finish()?;
            return Ok(ExitCode::SUCCESS);
        }
        Command::Free { url } => (Mode::Free, url),
        Command::Paid { url } => (Mode::Paid, url),
    };

    let outcome = extract(
        &api,
        &url,
        mode,
        EmitPolicy::EachInOrder,
        clipboard.as_mut(),
        notifier.as_ref(),
    )?;
    match outcome {
        Outcome::Copied { .. } => {
            // We are about to exit: hand the last copy off before the
            // clipboard owner (this process) goes away.
            clipboard.finish()?;
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(ExitCode::FAILURE),
    }
}
