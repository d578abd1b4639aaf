//! TCP client session management.

use std::path::{Path, PathBuf};

use lanchat_shared::{
    protocol::{CodecError, Message, Payload, read_message, write_message},
    time::now_millis,
};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncWrite, BufReader},
    net::TcpStream,
    sync::mpsc,
};

use crate::{
    command::{Command, build_message, parse_input},
    download::save_file,
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

const LOGIN_CONTENT: &str = "Login";

/// Run one connection to the relay until the user quits or the link drops
pub async fn run_client_session(
    addr: &str,
    username: &str,
    download_dir: &Path,
) -> Result<(), ClientError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let (read, mut write) = stream.into_split();
    let mut read = BufReader::new(read);

    write_message(&mut write, &Message::text(username, LOGIN_CONTENT))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    // An admitted session always receives the user list first; a rejected
    // login is closed without a reply.
    let first = match read_message(&mut read).await {
        Ok(Some(message)) => message,
        Ok(None) => return Err(ClientError::LoginRejected(username.to_string())),
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat server at {}", addr);
    println!(
        "\nYou are '{}'. Type messages and press Enter to send. \
         Use '@user: text' for private messages, '/file <path> [@user]' to send a file \
         and '/quit' to exit.\n",
        username
    );
    print!("{}", render_incoming(&first, username, download_dir).await);
    redisplay_prompt(username);

    // Spawn a task to handle incoming messages
    let username_for_read = username.to_string();
    let download_dir = download_dir.to_path_buf();
    let mut read_task = tokio::spawn(async move {
        loop {
            match read_message(&mut read).await {
                Ok(Some(message)) => {
                    let formatted =
                        render_incoming(&message, &username_for_read, &download_dir).await;
                    print!("{}", formatted);
                    redisplay_prompt(&username_for_read);
                }
                Ok(None) => {
                    tracing::info!("Server closed the connection");
                    return true;
                }
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    return true;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt = format!("{}> ", username);

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn input lines into frames on the socket
    let username_for_write = username.to_string();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            match handle_input(&mut write, &line, &username_for_write).await {
                InputOutcome::Quit => return false,
                InputOutcome::ConnectionLost => return true,
                InputOutcome::Sent | InputOutcome::Skipped => {
                    redisplay_prompt(&username_for_write)
                }
            }
        }

        false
    });

    // If any one of the tasks completes, abort the other
    let connection_lost = tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            read_result.unwrap_or(true)
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.unwrap_or(false)
        }
    };

    if connection_lost {
        return Err(ClientError::ConnectionError("Connection lost".to_string()));
    }

    Ok(())
}

/// What the write task does after one input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputOutcome {
    Sent,
    /// Nothing was written; the connection is still usable
    Skipped,
    Quit,
    ConnectionLost,
}

/// Parse one input line and write the resulting message to `writer`
async fn handle_input<W>(writer: &mut W, line: &str, username: &str) -> InputOutcome
where
    W: AsyncWrite + Unpin,
{
    let command = match parse_input(line) {
        Ok(Command::Quit) => return InputOutcome::Quit,
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return InputOutcome::Skipped;
        }
    };

    let message = match build_message(command, username).await {
        Ok(Some(message)) => message,
        Ok(None) => return InputOutcome::Quit,
        Err(e) => {
            println!("Cannot send file: {}", e);
            return InputOutcome::Skipped;
        }
    };

    match write_message(writer, &message).await {
        Ok(()) => {
            print!("{}", MessageFormatter::format_sent_confirmation(now_millis()));
            InputOutcome::Sent
        }
        // Refused before any byte was written
        Err(e @ CodecError::FrameTooLarge { .. }) => {
            println!("Cannot send {} message: {}", message.kind(), e);
            InputOutcome::Skipped
        }
        Err(e) => {
            tracing::warn!("Failed to send message: {}", e);
            InputOutcome::ConnectionLost
        }
    }
}

/// Format an incoming message for display, saving any attached file first
async fn render_incoming(message: &Message, username: &str, download_dir: &Path) -> String {
    match message.payload() {
        Payload::Text { content } if message.is_from_server() => {
            MessageFormatter::format_server_notice(content)
        }
        Payload::Text { content } => MessageFormatter::format_chat_message(
            message.sender(),
            content,
            message.target().is_some(),
            now_millis(),
        ),
        Payload::UserList { names } => MessageFormatter::format_user_list(names, username),
        Payload::File {
            file_name,
            file_data,
            ..
        } => {
            let saved: Option<PathBuf> = match save_file(download_dir, file_name, file_data).await
            {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Failed to save '{}': {}", file_name, e);
                    None
                }
            };
            MessageFormatter::format_file_received(
                message.sender(),
                file_name,
                file_data.len(),
                saved.as_deref(),
            )
        }
    }
}
