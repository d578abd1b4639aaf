//! Per-connection session handling.
//!
//! Each accepted connection runs [`handle_connection`] in its own task:
//! login handshake, admission, the receive loop that feeds routing, and
//! eviction once the peer goes away. Outbound frames are written by a
//! separate writer task that drains the session's queue.

use std::{net::SocketAddr, sync::Arc};

use lanchat_shared::{
    protocol::{CodecError, read_message, write_message},
    time::{elapsed_millis, timestamp_to_rfc3339},
};
use thiserror::Error;
use tokio::{
    io::{AsyncRead, BufReader},
    net::{TcpStream, tcp::OwnedWriteHalf},
    task::JoinHandle,
};

use crate::{
    domain::{Session, SessionId, Timestamp, Username, UsernameError},
    infrastructure::message_pusher::{ChannelMessagePusher, OutboundReceiver},
    ui::state::AppState,
};

/// Reasons a connection is dropped before admission
#[derive(Debug, Error)]
enum HandshakeError {
    #[error("connection closed before login")]
    ConnectionClosed,

    #[error("unreadable login message: {0}")]
    Codec(#[from] CodecError),

    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),
}

/// Drive one client connection from accept to close.
///
/// The socket is owned here and dropped exactly once when this function
/// returns. Eviction happens only after the receive loop ends.
pub async fn handle_connection(stream: TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    let mut session = Session::new(SessionId::generate(), peer, Timestamp::now());
    let (reader, writer) = stream.into_split();
    let mut reader = BufReader::new(reader);

    let username = match perform_handshake(&mut reader).await {
        Ok(username) => username,
        Err(e) => {
            tracing::info!("Dropping {} before admission: {}", peer, e);
            close_session(&mut session);
            return;
        }
    };

    if let Err(e) = session.admit(username.clone()) {
        tracing::error!("Session {} lifecycle error: {}", session.id(), e);
        return;
    }

    let (pusher, outbound) = ChannelMessagePusher::channel(session.id());
    let writer_task = pusher_loop(outbound, writer, session.id());

    if let Err(e) = state
        .admit_session_usecase
        .execute(session.id(), username.clone(), Arc::new(pusher))
        .await
    {
        tracing::error!("Failed to admit '{}' from {}: {}", username, peer, e);
        writer_task.abort();
        close_session(&mut session);
        return;
    }

    receive_loop(&mut reader, &state, session.id(), &username).await;

    if state
        .evict_session_usecase
        .execute(&session.id())
        .await
        .is_none()
    {
        tracing::error!(
            "Session {} ('{}') was not in the registry at eviction",
            session.id(),
            username
        );
    }

    writer_task.abort();
    let _ = writer_task.await;
    close_session(&mut session);
}

/// Read the login message and adopt its sender as the username
async fn perform_handshake<R>(reader: &mut R) -> Result<Username, HandshakeError>
where
    R: AsyncRead + Unpin,
{
    let login = read_message(reader)
        .await?
        .ok_or(HandshakeError::ConnectionClosed)?;
    let username = Username::new(login.sender().to_string())?;
    tracing::debug!("Login handshake as '{}' ({} message)", username, login.kind());
    Ok(username)
}

/// Hand every inbound message to routing until the stream ends or fails
async fn receive_loop<R>(reader: &mut R, state: &AppState, session_id: SessionId, username: &Username)
where
    R: AsyncRead + Unpin,
{
    loop {
        match read_message(reader).await {
            Ok(Some(message)) => {
                match state
                    .route_message_usecase
                    .execute(&session_id, message)
                    .await
                {
                    Ok(outcome) => {
                        tracing::debug!("Routed message from '{}': {:?}", username, outcome)
                    }
                    Err(e) => tracing::error!("Failed to route message from '{}': {}", username, e),
                }
            }
            Ok(None) => {
                tracing::info!("'{}' closed the connection", username);
                break;
            }
            Err(e) => {
                tracing::warn!("Read from '{}' failed: {}", username, e);
                break;
            }
        }
    }
}

/// Spawn the task that writes queued messages to the socket.
///
/// A write failure stops this task only; the session itself ends when its
/// receive loop observes the broken connection.
fn pusher_loop(
    mut outbound: OutboundReceiver,
    mut writer: OwnedWriteHalf,
    session_id: SessionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if let Err(e) = write_message(&mut writer, &message).await {
                tracing::debug!("Failed to write to session {}: {}", session_id, e);
                break;
            }
        }
    })
}

fn close_session(session: &mut Session) {
    match session.remove() {
        Ok(username) => tracing::info!(
            "Session {} from {} ({}) closed after {} ms (connected at {})",
            session.id(),
            session.peer(),
            username.as_ref().map_or("not logged in", Username::as_str),
            elapsed_millis(session.connected_at().value()),
            timestamp_to_rfc3339(session.connected_at().value())
        ),
        Err(e) => tracing::error!("Session {} lifecycle error: {}", session.id(), e),
    }
}

#[cfg(test)]
mod tests {
    use lanchat_shared::protocol::Message;
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn test_handshake_adopts_sender_as_username() {
        // テスト項目: 最初のメッセージの送信者名がユーザー名になる
        // given (前提条件):
        let (mut client, mut server) = tokio::io::duplex(1024);
        write_message(&mut client, &Message::text("alice", "Login"))
            .await
            .unwrap();

        // when (操作):
        let result = perform_handshake(&mut server).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[tokio::test]
    async fn test_handshake_accepts_any_kind() {
        // テスト項目: ハンドシェイクのメッセージ種別は問わない
        // given (前提条件):
        let (mut client, mut server) = tokio::io::duplex(1024);
        write_message(&mut client, &Message::file("bob", "hello.txt", b"hi".to_vec()))
            .await
            .unwrap();

        // when (操作):
        let result = perform_handshake(&mut server).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "bob");
    }

    #[tokio::test]
    async fn test_handshake_rejects_empty_sender() {
        // テスト項目: 送信者名が空のハンドシェイクは拒否される
        // given (前提条件):
        let (mut client, mut server) = tokio::io::duplex(1024);
        write_message(&mut client, &Message::text("  ", "Login"))
            .await
            .unwrap();

        // when (操作):
        let result = perform_handshake(&mut server).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(HandshakeError::InvalidUsername(UsernameError::Empty))
        ));
    }

    #[tokio::test]
    async fn test_handshake_rejects_server_sentinel() {
        // テスト項目: "Server" を名乗るハンドシェイクは拒否される
        // given (前提条件):
        let (mut client, mut server) = tokio::io::duplex(1024);
        write_message(&mut client, &Message::server_notice("Login"))
            .await
            .unwrap();

        // when (操作):
        let result = perform_handshake(&mut server).await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(HandshakeError::InvalidUsername(UsernameError::Reserved(_)))
        ));
    }

    #[tokio::test]
    async fn test_handshake_fails_when_closed_early() {
        // テスト項目: ログイン前に切断された場合はハンドシェイク失敗になる
        // given (前提条件):
        let (client, mut server) = tokio::io::duplex(1024);
        drop(client);

        // when (操作):
        let result = perform_handshake(&mut server).await;

        // then (期待する結果):
        assert!(matches!(result, Err(HandshakeError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_handshake_fails_on_garbage() {
        // テスト項目: 不正なフレームはハンドシェイク失敗になる
        // given (前提条件):
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&3u32.to_be_bytes()).await.unwrap();
        client.write_all(b"???").await.unwrap();

        // when (操作):
        let result = perform_handshake(&mut server).await;

        // then (期待する結果):
        assert!(matches!(result, Err(HandshakeError::Codec(CodecError::Json(_)))));
    }
}
