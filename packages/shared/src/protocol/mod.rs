//! Wire protocol shared by the relay server and its clients.
//!
//! - [`message`]: the self-describing [`Message`] envelope.
//! - [`codec`]: length-prefixed JSON framing over any async byte stream.

pub mod codec;
pub mod message;

pub use codec::{CodecError, MAX_FILE_LEN, MAX_FRAME_LEN, read_message, write_message};
pub use message::{Message, MessageKind, Payload, SERVER_SENDER, USER_LIST_DELIMITER};
