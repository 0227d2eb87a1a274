//! JSON document codec for the launcher socket.
//!
//! Messages are plain JSON documents with no length prefix; the decoder
//! buffers until one complete value parses. Whitespace (including newlines)
//! between documents is skipped. The encoder terminates each document with
//! a newline for readability with tools like `socat`.

use bytes::{Buf, BufMut, BytesMut};
use serde::Serialize;
use serde_json::Value;
use std::io;
use tokio_util::codec::{Decoder, Encoder};

/// Maximum size of one pending message (1 MiB)
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Codec for whitespace-separated JSON documents
#[derive(Debug, Default)]
pub struct JsonCodec;

impl JsonCodec {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn skip_whitespace(src: &mut BytesMut) {
    let start = src
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(src.len());
    src.advance(start);
}

impl Decoder for JsonCodec {
    type Item = Value;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        skip_whitespace(src);
        if src.is_empty() {
            return Ok(None);
        }

        let mut stream = serde_json::Deserializer::from_slice(src).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let consumed = stream.byte_offset();
                src.advance(consumed);
                Ok(Some(value))
            }
            Some(Err(e)) if e.is_eof() => {
                if src.len() > MAX_MESSAGE_SIZE {
                    return Err(CodecError::MessageTooLarge(src.len()));
                }
                src.reserve(4096);
                Ok(None)
            }
            Some(Err(e)) => Err(CodecError::Json(e)),
            None => Ok(None),
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(value) = self.decode(src)? {
            return Ok(Some(value));
        }
        if src.is_empty() {
            return Ok(None);
        }

        // Peer closed in the middle of a document
        let err = serde_json::from_slice::<Value>(src).err();
        src.clear();
        match err {
            Some(e) => Err(CodecError::Json(e)),
            None => Ok(None),
        }
    }
}

impl<T: Serialize> Encoder<T> for JsonCodec {
    type Error = CodecError;

    fn encode(&mut self, item: T, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_vec(&item)?;
        if json.len() > MAX_MESSAGE_SIZE {
            return Err(CodecError::MessageTooLarge(json.len()));
        }

        dst.reserve(json.len() + 1);
        dst.put_slice(&json);
        dst.put_u8(b'\n');
        Ok(())
    }
}

/// Errors that can occur during codec operations
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Message too large: {0} bytes (max: {MAX_MESSAGE_SIZE})")]
    MessageTooLarge(usize),
}
