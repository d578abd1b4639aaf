//! Domain layer: value objects, the session entity, the registry aggregate
//! and the outbound delivery seam.

pub mod error;
pub mod pusher;
pub mod registry;
pub mod session;
pub mod value_object;

pub use error::{RegistryError, SessionError, UsernameError};
pub use pusher::{MessagePushError, MessagePusher};
#[cfg(test)]
pub use pusher::MockMessagePusher;
pub use registry::{Registry, RegistryEntry};
pub use session::{Session, SessionState};
pub use value_object::{SessionId, Timestamp, Username};
