//! メッセージ送信（通知）の実装
//!
//! ## 実装
//!
//! - `channel`: 接続ごとの mpsc キューを使った実装

pub mod channel;

pub use channel::{ChannelMessagePusher, OutboundReceiver};
