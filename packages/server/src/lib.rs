//! LAN chat relay server library.
//!
//! Accepts TCP connections, tracks online users and routes text messages,
//! file transfers and user-list snapshots to everyone or to one named user.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
