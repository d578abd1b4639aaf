//! Parsing of lines typed at the prompt.
//!
//! - `@bob: hi` sends "hi" to bob only
//! - `/file <path>` sends a file to everyone, `/file <path> @bob` to bob only
//! - `/quit` leaves the chat
//! - anything else is broadcast as text

use std::{io, path::PathBuf};

use lanchat_shared::protocol::{MAX_FILE_LEN, Message};
use thiserror::Error;

const QUIT_COMMAND: &str = "/quit";
const FILE_COMMAND: &str = "/file";
const TARGET_PREFIX: char = '@';
const TARGET_SEPARATOR: char = ':';

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a line of text
    Chat {
        target: Option<String>,
        content: String,
    },
    /// Send the contents of a file
    SendFile {
        path: PathBuf,
        target: Option<String>,
    },
    /// Leave the chat
    Quit,
}

/// Input parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("nothing to send")]
    Empty,

    #[error("usage: /file <path> [@user]")]
    MissingFilePath,
}

/// Parse one line of user input
pub fn parse_input(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }

    if line.eq_ignore_ascii_case(QUIT_COMMAND) {
        return Ok(Command::Quit);
    }

    if let Some(rest) = line.strip_prefix(FILE_COMMAND)
        && (rest.is_empty() || rest.starts_with(char::is_whitespace))
    {
        return parse_file_command(rest.trim());
    }

    Ok(parse_chat(line))
}

fn parse_file_command(args: &str) -> Result<Command, CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingFilePath);
    }

    // A trailing `@user` token addresses the file; the rest is the path.
    let (path, target) = match args.rsplit_once(char::is_whitespace) {
        Some((path, last)) if last.len() > 1 && last.starts_with(TARGET_PREFIX) => {
            (path.trim(), Some(last[1..].to_string()))
        }
        _ => (args, None),
    };

    if path.is_empty() {
        return Err(CommandError::MissingFilePath);
    }

    Ok(Command::SendFile {
        path: PathBuf::from(path),
        target,
    })
}

fn parse_chat(line: &str) -> Command {
    if let Some(rest) = line.strip_prefix(TARGET_PREFIX)
        && let Some((target, content)) = rest.split_once(TARGET_SEPARATOR)
    {
        let target = target.trim();
        if !target.is_empty() {
            return Command::Chat {
                target: Some(target.to_string()),
                content: content.trim().to_string(),
            };
        }
    }

    Command::Chat {
        target: None,
        content: line.to_string(),
    }
}

/// Turn a send command into the message to put on the wire.
///
/// Reads the file for [`Command::SendFile`]; a file larger than
/// [`MAX_FILE_LEN`] is refused before it is read. Returns `Ok(None)` for
/// [`Command::Quit`].
pub async fn build_message(command: Command, username: &str) -> io::Result<Option<Message>> {
    let (message, target) = match command {
        Command::Chat { target, content } => (Message::text(username, content), target),
        Command::SendFile { path, target } => {
            let size = tokio::fs::metadata(&path).await?.len();
            if size > MAX_FILE_LEN as u64 {
                return Err(io::Error::new(
                    io::ErrorKind::FileTooLarge,
                    format!(
                        "{} is {} bytes, the limit is {} bytes",
                        path.display(),
                        size,
                        MAX_FILE_LEN
                    ),
                ));
            }
            let file_data = tokio::fs::read(&path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "not a file path"))?;
            (Message::file(username, file_name, file_data), target)
        }
        Command::Quit => return Ok(None),
    };

    Ok(Some(match target {
        Some(target) => message.with_target(target),
        None => message,
    }))
}

#[cfg(test)]
mod tests {
    use lanchat_shared::protocol::Payload;

    use super::*;

    #[test]
    fn test_plain_text_is_broadcast() {
        // テスト項目: 通常の入力は宛先なしのチャットになる
        // given (前提条件):
        let line = "  hello there  ";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Chat {
                target: None,
                content: "hello there".to_string()
            })
        );
    }

    #[test]
    fn test_at_prefix_with_colon_is_private() {
        // テスト項目: "@user: text" 形式は宛先付きのチャットになる
        // given (前提条件):
        let line = "@bob: see you at 5";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Chat {
                target: Some("bob".to_string()),
                content: "see you at 5".to_string()
            })
        );
    }

    #[test]
    fn test_at_prefix_without_colon_is_broadcast() {
        // テスト項目: コロンのない "@user" は通常のチャットとして扱われる
        // given (前提条件):
        let line = "@bob hello";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(
            command,
            Ok(Command::Chat {
                target: None,
                content: "@bob hello".to_string()
            })
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        // テスト項目: 空白のみの入力はエラーになる
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(command, Err(CommandError::Empty));
    }

    #[test]
    fn test_quit_is_case_insensitive() {
        // テスト項目: /quit は大文字小文字を区別しない
        // given (前提条件):
        let line = "/QUIT";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert_eq!(command, Ok(Command::Quit));
    }

    #[test]
    fn test_file_command_with_and_without_target() {
        // テスト項目: /file はパスと任意の宛先を解釈する
        // given (前提条件):
        let broadcast = "/file ./photos/cat.png";
        let private = "/file my notes.txt @carol";

        // when (操作):
        let broadcast_command = parse_input(broadcast);
        let private_command = parse_input(private);

        // then (期待する結果):
        assert_eq!(
            broadcast_command,
            Ok(Command::SendFile {
                path: PathBuf::from("./photos/cat.png"),
                target: None
            })
        );
        assert_eq!(
            private_command,
            Ok(Command::SendFile {
                path: PathBuf::from("my notes.txt"),
                target: Some("carol".to_string())
            })
        );
    }

    #[test]
    fn test_file_command_without_path_is_rejected() {
        // テスト項目: パスのない /file はエラーになる
        // given (前提条件):
        let bare = "/file";
        let blank = "/file    ";

        // when (操作):
        let bare_command = parse_input(bare);
        let blank_command = parse_input(blank);

        // then (期待する結果):
        assert_eq!(bare_command, Err(CommandError::MissingFilePath));
        assert_eq!(blank_command, Err(CommandError::MissingFilePath));
    }

    #[test]
    fn test_file_prefix_inside_word_is_text() {
        // テスト項目: "/files" のような入力はファイル送信コマンドではない
        // given (前提条件):
        let line = "/files are great";

        // when (操作):
        let command = parse_input(line);

        // then (期待する結果):
        assert!(matches!(command, Ok(Command::Chat { target: None, .. })));
    }

    #[tokio::test]
    async fn test_build_message_reads_file() {
        // テスト項目: ファイル送信コマンドからファイル内容を含むメッセージが作成される
        // given (前提条件):
        let dir = std::env::temp_dir().join(format!("lanchat-command-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("data.bin");
        tokio::fs::write(&path, [1u8, 2, 3, 0, 255]).await.unwrap();
        let command = Command::SendFile {
            path: path.clone(),
            target: Some("bob".to_string()),
        };

        // when (操作):
        let message = build_message(command, "alice").await.unwrap().unwrap();

        // then (期待する結果):
        assert_eq!(message.sender(), "alice");
        assert_eq!(message.target(), Some("bob"));
        match message.payload() {
            Payload::File {
                file_name,
                file_data,
                ..
            } => {
                assert_eq!(file_name, "data.bin");
                assert_eq!(file_data, &vec![1u8, 2, 3, 0, 255]);
            }
            other => panic!("unexpected payload: {:?}", other),
        }
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_build_message_refuses_oversized_file() {
        // テスト項目: 上限を超えるファイルは読み込まれずにエラーになる
        // given (前提条件):
        let dir = std::env::temp_dir().join(format!("lanchat-command-big-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("huge.bin");
        let file = tokio::fs::File::create(&path).await.unwrap();
        file.set_len(MAX_FILE_LEN as u64 + 1).await.unwrap();
        let command = Command::SendFile { path, target: None };

        // when (操作):
        let result = build_message(command, "alice").await;

        // then (期待する結果):
        let error = result.unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::FileTooLarge);
        assert!(error.to_string().contains("huge.bin"));
        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_build_message_for_missing_file_fails() {
        // テスト項目: 存在しないファイルの送信はエラーになる
        // given (前提条件):
        let command = Command::SendFile {
            path: PathBuf::from("/definitely/not/here.bin"),
            target: None,
        };

        // when (操作):
        let result = build_message(command, "alice").await;

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_build_message_for_quit_is_none() {
        // テスト項目: /quit からはメッセージが作成されない
        // given (前提条件):
        let command = Command::Quit;

        // when (操作):
        let result = build_message(command, "alice").await.unwrap();

        // then (期待する結果):
        assert!(result.is_none());
    }
}
