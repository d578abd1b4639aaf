//! Message formatting utilities for client display.

use std::path::Path;

use lanchat_shared::time::timestamp_to_local_clock;

use crate::download::is_image;

const SEPARATOR: &str = "------------------------------------------------------------";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a text message from another user
    ///
    /// # Arguments
    ///
    /// * `from` - The sender's username
    /// * `content` - The message content
    /// * `private` - Whether the message was addressed to this user only
    /// * `received_at` - Unix timestamp when the message arrived (milliseconds)
    pub fn format_chat_message(from: &str, content: &str, private: bool, received_at: i64) -> String {
        let marker = if private { " (private)" } else { "" };
        format!(
            "\n\n{}\n[{}] {}{}: {}\n{}\n",
            SEPARATOR,
            timestamp_to_local_clock(received_at),
            from,
            marker,
            content,
            SEPARATOR
        )
    }

    /// Format a notice sent by the relay itself
    pub fn format_server_notice(content: &str) -> String {
        format!("\n*** {} ***\n", content)
    }

    /// Format the online user list, marking the current user
    pub fn format_user_list(names: &[String], current_username: &str) -> String {
        if names.is_empty() {
            return "\nOnline: (nobody)\n".to_string();
        }

        let names: Vec<String> = names
            .iter()
            .map(|name| {
                if name == current_username {
                    format!("{} (me)", name)
                } else {
                    name.clone()
                }
            })
            .collect();
        format!("\nOnline: {}\n", names.join(", "))
    }

    /// Format a received file notification
    ///
    /// # Arguments
    ///
    /// * `from` - The sender's username
    /// * `file_name` - The file name as sent
    /// * `size` - The file size in bytes
    /// * `saved_to` - Where the file was stored, if saving succeeded
    pub fn format_file_received(
        from: &str,
        file_name: &str,
        size: usize,
        saved_to: Option<&Path>,
    ) -> String {
        let kind = if is_image(file_name) { "image" } else { "file" };
        let location = match saved_to {
            Some(path) => format!("saved to {}", path.display()),
            None => "could not be saved".to_string(),
        };
        format!(
            "\n{} sent {} '{}' ({} bytes), {}\n",
            from, kind, file_name, size, location
        )
    }

    /// Format a confirmation message after sending
    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("sent at {}\n", timestamp_to_local_clock(sent_at))
    }
}
