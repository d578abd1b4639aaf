//! Shared library for the LAN chat relay.
//!
//! Holds everything both the server and the client need: the message data
//! model, the length-prefixed wire codec, logger setup and time helpers.

pub mod logger;
pub mod protocol;
pub mod time;
