//! Infrastructure layer: concrete implementations of domain seams.

pub mod message_pusher;
