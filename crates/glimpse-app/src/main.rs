//! Glimpse application binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing (stderr)
//! 3. Build the Tesseract OCR service, clipboard, and extraction session
//! 4. Run the requested subcommand: one-shot convert, demo link, or the
//!    interactive shell with a background renderer

mod cli;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use glimpse_core::config::GlimpseConfig;
use glimpse_core::types::Notice;
use glimpse_ocr::{OcrService, TesseractOcrService};
use glimpse_session::{
    CommandClipboard, ConvertOutcome, DemoLinkHelper, ExtractionSession, Notifier, View,
};

use cli::{CliArgs, Command};
use shell::{ShellCommand, HELP};

type Session = ExtractionSession<TesseractOcrService>;

/// Prints notices to stdout as alert lines.
struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        println!("[!] {}", notice);
    }
}

fn print_view<O: OcrService>(session: &ExtractionSession<O>) {
    match session.snapshot() {
        Ok(state) => print!("{}", View::from_state(&state)),
        Err(e) => tracing::error!(error = %e, "Failed to read session state"),
    }
}

/// Exit status for a one-shot conversion: 0 whenever text was recognized.
fn exit_status(outcome: &ConvertOutcome) -> u8 {
    match outcome {
        ConvertOutcome::Extracted(_) | ConvertOutcome::NoMatch => 0,
        ConvertOutcome::InputMissing | ConvertOutcome::Failed | ConvertOutcome::Superseded => 1,
    }
}

/// One-shot conversion of `image`; prints the resulting view.
async fn run_convert<O: OcrService>(
    session: &ExtractionSession<O>,
    image: String,
) -> Result<ConvertOutcome, Box<dyn std::error::Error>> {
    session.set_image_reference(image)?;
    let outcome = session.convert().await?;
    print_view(session);
    Ok(outcome)
}

/// Interactive loop over stdin lines.
///
/// Conversions run as background tasks so a new one can start while another
/// is in flight; a renderer task redraws the view after each settled trigger.
async fn run_shell(
    session: Arc<Session>,
    demo: Arc<DemoLinkHelper>,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut events = session.subscribe();
    let renderer = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if event.is_terminal() => print_view(&session),
                    Ok(event) => tracing::trace!(event = ?event, "Session event"),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Renderer lagged behind session events");
                        print_view(&session);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ShellCommand::parse(&line) {
            ShellCommand::Url(value) => session.set_image_reference(value)?,
            ShellCommand::Convert => {
                let session = Arc::clone(&session);
                tokio::spawn(async move {
                    if let Err(e) = session.convert().await {
                        tracing::error!(error = %e, "Conversion aborted");
                    }
                });
            }
            ShellCommand::Demo => {
                let demo = Arc::clone(&demo);
                tokio::spawn(async move {
                    demo.copy_demo_link().await;
                });
            }
            ShellCommand::View => print_view(&session),
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => break,
            ShellCommand::Nothing => {}
            ShellCommand::Unknown(word) => println!("Unknown command: {} (try `help`)", word),
        }
    }

    renderer.abort();
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing exists so its log level can apply.
    let config_file = args.resolve_config_path();
    let config = GlimpseConfig::load_or_default(&config_file);

    // Tracing. RUST_LOG wins over the flag and the config value.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Glimpse v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let language = args.resolve_language(&config.ocr.language);
    let ocr = TesseractOcrService::new(config.ocr.clone())?;
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    let session =
        Arc::new(ExtractionSession::new(ocr, Arc::clone(&notifier)).with_language(language));

    let clipboard = Arc::new(CommandClipboard::from_config(&config.clipboard));
    tracing::debug!(program = clipboard.program(), "Clipboard command selected");
    let demo = Arc::new(DemoLinkHelper::new(
        clipboard,
        notifier,
        config.demo.image_url.clone(),
    ));

    match args.command() {
        Command::Convert { image } => {
            let outcome = run_convert(&session, image).await?;
            Ok(ExitCode::from(exit_status(&outcome)))
        }
        Command::DemoLink => {
            if demo.copy_demo_link().await.is_failure() {
                return Ok(ExitCode::FAILURE);
            }
            println!("{}", demo.url());
            Ok(ExitCode::SUCCESS)
        }
        Command::Shell => run_shell(session, demo).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_ocr::MockOcrService;
    use glimpse_session::RecordingNotifier;

    fn make_session(ocr: MockOcrService) -> ExtractionSession<MockOcrService> {
        ExtractionSession::new(ocr, Arc::new(RecordingNotifier::new()))
    }

    #[tokio::test]
    async fn test_convert_extracted_exits_zero() {
        let session = make_session(MockOcrService::with_text("Name: Bob\nDOR: 12/31/1999"));
        let outcome = run_convert(&session, "card.png".to_string()).await.unwrap();
        assert!(matches!(outcome, ConvertOutcome::Extracted(_)));
        assert_eq!(exit_status(&outcome), 0);
    }

    #[tokio::test]
    async fn test_convert_no_match_exits_zero() {
        let session = make_session(MockOcrService::with_text("hello world"));
        let outcome = run_convert(&session, "card.png".to_string()).await.unwrap();
        assert_eq!(outcome, ConvertOutcome::NoMatch);
        assert_eq!(exit_status(&outcome), 0);
    }

    #[tokio::test]
    async fn test_convert_missing_input_exits_one() {
        let ocr = MockOcrService::new();
        let session = make_session(ocr.clone());
        let outcome = run_convert(&session, String::new()).await.unwrap();
        assert_eq!(outcome, ConvertOutcome::InputMissing);
        assert_eq!(exit_status(&outcome), 1);
        assert_eq!(ocr.calls(), 0);
    }

    #[tokio::test]
    async fn test_convert_ocr_failure_exits_one() {
        let session = make_session(MockOcrService::failing("engine offline"));
        let outcome = run_convert(&session, "card.png".to_string()).await.unwrap();
        assert_eq!(outcome, ConvertOutcome::Failed);
        assert_eq!(exit_status(&outcome), 1);
    }

    #[test]
    fn test_superseded_exits_one() {
        assert_eq!(exit_status(&ConvertOutcome::Superseded), 1);
    }
}
