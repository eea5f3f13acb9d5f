use std::future::Future;
use std::io;

use auth_session::{SessionState, SessionStore};
use remote_authority::{RemoteAuthority, RemoteError};
use remote_authority_http::{HttpAuthorityClient, Registration};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::commands::{parse_command, ShellCommand, HELP_TEXT};

const PROMPT: &str = "auth> ";

/// Authority that can also create accounts.
pub trait Registrar: RemoteAuthority {
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send;
}

impl Registrar for HttpAuthorityClient {
    fn register(
        &self,
        registration: &Registration,
    ) -> impl Future<Output = Result<String, RemoteError>> + Send {
        HttpAuthorityClient::register(self, registration)
    }
}

/// One-line rendering of the local session state.
pub fn describe_state(state: &SessionState) -> String {
    let identity = match &state.identity {
        Some(identity) => format!("{} ({})", identity.username(), identity.role()),
        None => "logged out".to_string(),
    };
    let last_error = state.last_error.as_deref().unwrap_or("-");

    format!(
        "session: {identity} busy={} last_error={last_error}",
        state.busy
    )
}

/// Probes the existing session, then executes commands until `quit` or end of
/// input.
pub async fn run_shell<R, I, O>(
    store: &SessionStore<R>,
    input: I,
    output: &mut O,
) -> io::Result<()>
where
    R: Registrar,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    store.acquire_from_existing_credentials().await;
    write_line(output, &describe_state(&store.snapshot())).await?;

    let mut lines = input.lines();
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let Some(command) = parse_command(&line) else {
            continue;
        };
        debug!(command = command_name(&command), "shell command");

        if command == ShellCommand::Quit {
            break;
        }
        execute(store, command, output).await?;
    }

    Ok(())
}

fn command_name(command: &ShellCommand) -> &'static str {
    match command {
        ShellCommand::WhoAmI => "whoami",
        ShellCommand::Login { .. } => "login",
        ShellCommand::Logout => "logout",
        ShellCommand::Register { .. } => "register",
        ShellCommand::Status => "status",
        ShellCommand::Help => "help",
        ShellCommand::Quit => "quit",
        ShellCommand::Usage(_) => "usage",
        ShellCommand::Unknown(_) => "unknown",
    }
}

async fn execute<R, O>(
    store: &SessionStore<R>,
    command: ShellCommand,
    output: &mut O,
) -> io::Result<()>
where
    R: Registrar,
    O: AsyncWrite + Unpin,
{
    match command {
        ShellCommand::WhoAmI => {
            let message = match store.acquire_from_existing_credentials().await {
                Some(identity) => format!("signed in as {}", identity.username()),
                None => "no active session".to_string(),
            };
            write_line(output, &message).await?;
        }
        ShellCommand::Login { username, password } => {
            let message = match store.authenticate(username, password).await {
                Ok(identity) => {
                    format!("welcome, {} ({})", identity.username(), identity.role())
                }
                Err(error) => format!("login failed: {error}"),
            };
            write_line(output, &message).await?;
        }
        ShellCommand::Logout => {
            store.deauthenticate().await;
            write_line(output, "signed out").await?;
        }
        ShellCommand::Register {
            username,
            password,
            email,
            phone,
        } => {
            let mut registration = Registration::new(username, password);
            if let Some(email) = email {
                registration = registration.with_email(email);
            }
            if let Some(phone) = phone {
                registration = registration.with_phone(phone);
            }

            let message = match store.remote().register(&registration).await {
                Ok(message) => message,
                Err(error) => match error.server_message() {
                    Some(reason) => format!("registration failed: {reason}"),
                    None => format!("registration failed: {error}"),
                },
            };
            write_line(output, &message).await?;
        }
        ShellCommand::Status => {}
        ShellCommand::Help => {
            write_line(output, HELP_TEXT).await?;
            return Ok(());
        }
        ShellCommand::Quit => return Ok(()),
        ShellCommand::Usage(usage) => {
            write_line(output, &format!("usage: {usage}")).await?;
            return Ok(());
        }
        ShellCommand::Unknown(name) => {
            write_line(output, &format!("unknown command '{name}', try 'help'")).await?;
            return Ok(());
        }
    }

    write_line(output, &describe_state(&store.snapshot())).await
}

async fn write_line<O: AsyncWrite + Unpin>(output: &mut O, line: &str) -> io::Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await
}
