//! Session entity: the lifecycle of one accepted connection.
//!
//! ```text
//! Connected --admit--> Admitted --remove--> Removed
//!     \______________remove______________/
//! ```
//!
//! `Removed` is terminal; a removed session is never reused.

use std::net::SocketAddr;

use super::{
    error::SessionError,
    value_object::{SessionId, Timestamp, Username},
};

/// Lifecycle state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, login handshake not yet completed
    Connected,
    /// Handshake completed, visible to routing
    Admitted(Username),
    /// Terminated
    Removed,
}

/// One accepted connection
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    peer: SocketAddr,
    connected_at: Timestamp,
    state: SessionState,
}

impl Session {
    /// Create a session in the `Connected` state
    pub fn new(id: SessionId, peer: SocketAddr, connected_at: Timestamp) -> Self {
        Self {
            id,
            peer,
            connected_at,
            state: SessionState::Connected,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Username adopted at handshake, `None` before admission and after removal
    pub fn username(&self) -> Option<&Username> {
        match &self.state {
            SessionState::Admitted(username) => Some(username),
            _ => None,
        }
    }

    /// Record a completed handshake
    pub fn admit(&mut self, username: Username) -> Result<(), SessionError> {
        match self.state {
            SessionState::Connected => {
                self.state = SessionState::Admitted(username);
                Ok(())
            }
            SessionState::Admitted(_) => Err(SessionError::AlreadyAdmitted(self.id)),
            SessionState::Removed => Err(SessionError::AlreadyRemoved(self.id)),
        }
    }

    /// Terminate the session.
    ///
    /// Returns the username if the session had been admitted.
    pub fn remove(&mut self) -> Result<Option<Username>, SessionError> {
        match std::mem::replace(&mut self.state, SessionState::Removed) {
            SessionState::Connected => Ok(None),
            SessionState::Admitted(username) => Ok(Some(username)),
            SessionState::Removed => Err(SessionError::AlreadyRemoved(self.id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_session() -> Session {
        Session::new(
            SessionId::generate(),
            "127.0.0.1:40000".parse().unwrap(),
            Timestamp::new(1000),
        )
    }

    fn username(name: &str) -> Username {
        Username::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_new_session_is_connected_without_username() {
        // テスト項目: 作成直後のセッションは Connected 状態でユーザー名を持たない
        // given (前提条件):
        let session = create_test_session();

        // when (操作):
        let state = session.state();

        // then (期待する結果):
        assert_eq!(state, &SessionState::Connected);
        assert!(session.username().is_none());
        assert_eq!(session.connected_at().value(), 1000);
    }

    #[test]
    fn test_admit_assigns_username() {
        // テスト項目: admit するとユーザー名が設定される
        // given (前提条件):
        let mut session = create_test_session();

        // when (操作):
        let result = session.admit(username("alice"));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(session.username().map(Username::as_str), Some("alice"));
    }

    #[test]
    fn test_admit_twice_is_rejected() {
        // テスト項目: ユーザー名は一度設定されたら変更できない
        // given (前提条件):
        let mut session = create_test_session();
        session.admit(username("alice")).unwrap();

        // when (操作):
        let result = session.admit(username("mallory"));

        // then (期待する結果):
        assert_eq!(result, Err(SessionError::AlreadyAdmitted(session.id())));
        assert_eq!(session.username().map(Username::as_str), Some("alice"));
    }

    #[test]
    fn test_remove_before_handshake_returns_none() {
        // テスト項目: ハンドシェイク前に削除されたセッションはユーザー名を返さない
        // given (前提条件):
        let mut session = create_test_session();

        // when (操作):
        let result = session.remove();

        // then (期待する結果):
        assert_eq!(result, Ok(None));
        assert_eq!(session.state(), &SessionState::Removed);
    }

    #[test]
    fn test_remove_after_admit_returns_username() {
        // テスト項目: 参加済みセッションを削除するとユーザー名が返される
        // given (前提条件):
        let mut session = create_test_session();
        session.admit(username("alice")).unwrap();

        // when (操作):
        let result = session.remove();

        // then (期待する結果):
        assert_eq!(result, Ok(Some(username("alice"))));
        assert!(session.username().is_none());
    }

    #[test]
    fn test_removed_session_is_never_reused() {
        // テスト項目: 削除済みセッションは再利用できない
        // given (前提条件):
        let mut session = create_test_session();
        session.remove().unwrap();

        // when (操作):
        let admit_result = session.admit(username("alice"));
        let remove_result = session.remove();

        // then (期待する結果):
        assert_eq!(admit_result, Err(SessionError::AlreadyRemoved(session.id())));
        assert_eq!(remove_result, Err(SessionError::AlreadyRemoved(session.id())));
    }
}
