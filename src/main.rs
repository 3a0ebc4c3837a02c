use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use tutorchat::adapters::ReqwestHttpClient;
use tutorchat::api::ChatApi;
use tutorchat::auth::{AuthSession, AuthState};
use tutorchat::config::ChatConfig;
use tutorchat::input::SlashCommand;
use tutorchat::session::{ChatSession, SendOutcome};
use tutorchat::ui::TranscriptPrinter;
use tutorchat::view_state::VisibilityState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

type Printer = TranscriptPrinter<io::Stdout>;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tutorchat=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Run one send while printing the reply as the store changes.
async fn send_and_render(
    session: &ChatSession,
    printer: &mut Printer,
    line: &str,
) -> Result<SendOutcome> {
    let mut revisions = session.store().subscribe();
    let send = session.send(line);
    tokio::pin!(send);

    loop {
        tokio::select! {
            outcome = &mut send => {
                printer.render(&session.messages())?;
                return Ok(outcome);
            }
            changed = revisions.changed() => {
                if changed.is_err() {
                    break;
                }
                if session.visibility().current().is_expanded() {
                    printer.render(&session.messages())?;
                }
            }
        }
    }
    Ok(send.await)
}

enum Flow {
    Continue,
    Quit,
}

async fn handle_command(
    command: SlashCommand,
    session: &ChatSession,
    auth: &AuthState,
    printer: &mut Printer,
) -> Result<Flow> {
    match command {
        SlashCommand::Login { token } => auth.sign_in(AuthSession::new(token)),
        SlashCommand::Logout => auth.sign_out(),
        SlashCommand::Problem => match session.refresh_problem().await {
            Ok(problem) => println!("{}", problem.greeting()),
            Err(err) => println!("{}", err.user_message()),
        },
        SlashCommand::History => {
            session.focus_input();
            printer.reprint(&session.messages())?;
        }
        SlashCommand::Hide => {
            session.visibility().on_outside_interaction();
        }
        SlashCommand::Help => println!("{}", SlashCommand::help_text()),
        SlashCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

async fn run(config: ChatConfig) -> Result<()> {
    let http = ReqwestHttpClient::from_config(&config)?;

    let auth = Arc::new(AuthState::new());
    if let Some(token) = config.auth_token.clone() {
        auth.sign_in(AuthSession::new(token));
    }
    let auth_listener = auth.on_auth_change(|session| match session {
        Some(_) => println!("[signed in]"),
        None => println!("[signed out]"),
    });

    let api = Arc::new(ChatApi::new(Arc::new(http), config));
    let session = Arc::new(ChatSession::new(
        api,
        auth.clone(),
        Arc::new(VisibilityState::new()),
    ));
    let mut printer = TranscriptPrinter::new(io::stdout()).without_user_echo();

    session.bootstrap().await;
    printer.render(&session.messages())?;
    println!("Type a message, or /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };

        match SlashCommand::parse(&line) {
            Err(err) => println!("{}", err),
            Ok(Some(command)) => {
                if let Flow::Quit = handle_command(command, &session, &auth, &mut printer).await? {
                    break;
                }
            }
            Ok(None) => {
                session.focus_input();
                tokio::select! {
                    outcome = send_and_render(&session, &mut printer, &line) => {
                        tracing::debug!(?outcome, "send finished");
                    }
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
        }
    }

    session.dispose();
    auth_listener.abort();
    Ok(())
}

fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("tutorchat {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;
    init_tracing();

    let config = ChatConfig::from_env();
    tracing::info!(base_url = %config.base_url, streaming = config.streaming, "starting");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(config))
}
