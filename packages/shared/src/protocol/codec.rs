//! Length-prefixed JSON framing.
//!
//! Every frame is a 4-byte big-endian length followed by that many bytes of
//! JSON encoding a single [`Message`]. A clean close at a frame boundary is
//! end-of-stream; a close in the middle of a frame is an error.

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::message::Message;

/// Largest accepted frame body (64 MiB)
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Space kept for everything in a file message besides the encoded contents
const FILE_FRAME_HEADROOM: usize = 64 * 1024;

/// Largest file that fits in one frame once base64-encoded
pub const MAX_FILE_LEN: usize = (MAX_FRAME_LEN - FILE_FRAME_HEADROOM) / 4 * 3;

const LEN_PREFIX_SIZE: usize = 4;

/// Framing and serialization errors
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },
}

/// Read the next message from `reader`.
///
/// Returns `Ok(None)` when the peer closed the stream before sending any
/// byte of a new frame.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<Message>, CodecError>
where
    R: AsyncRead + Unpin,
{
    let mut len_bytes = [0u8; LEN_PREFIX_SIZE];
    let mut filled = 0;
    while filled < LEN_PREFIX_SIZE {
        let n = reader.read(&mut len_bytes[filled..]).await?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        filled += n;
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge {
            len,
            max: MAX_FRAME_LEN,
        });
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;

    let message = serde_json::from_slice(&body)?;
    Ok(Some(message))
}

/// Encode `message` as one frame and flush it to `writer`.
pub async fn write_message<W>(writer: &mut W, message: &Message) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(message)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge {
            len: body.len(),
            max: MAX_FRAME_LEN,
        });
    }

    let mut frame = Vec::with_capacity(LEN_PREFIX_SIZE + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);

    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}
