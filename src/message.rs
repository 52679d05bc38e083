//! Shared message-envelope machinery.
//!
//! Every protocol family shares one envelope shape:
//!
//! ```text
//! ┌───────────┬───────┬───────────────────┐
//! │ Signature │ Tag   │ Fields            │
//! │ 2 bytes   │ 1 byte│ variant-specific  │
//! │ u16 BE    │       │                   │
//! └───────────┴───────┴───────────────────┘
//! ```
//!
//! The signature is `0xAAA0 | family id` and distinguishes protocol
//! families sharing a transport. The tag selects the variant (1-indexed;
//! tag 0 is never valid). Variants with an opaque payload carry it in a
//! separate content frame after the envelope, never inside it.
//!
//! [`WireMessage`] is implemented once per family; the envelope encode
//! and decode paths live here so field codecs are all a family module
//! has to supply.

use bytes::Bytes;

use crate::error::{Result, ZwireError};
use crate::wire::{WireReader, WireWriter};

/// Base of every family signature; the low nibble is the family id.
pub const SIGNATURE_BASE: u16 = 0xAAA0;

/// Width of the signature + tag envelope prefix.
pub const ENVELOPE_PREFIX_SIZE: usize = 3;

/// One protocol family's tagged union of message variants.
pub trait WireMessage: Sized {
    /// Wire signature of this family (`0xAAA0 | family id`).
    const SIGNATURE: u16;

    /// Family name, used in log events.
    const PROTOCOL: &'static str;

    /// The variant's 1-indexed wire tag.
    fn tag(&self) -> u8;

    /// The variant's message-type name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Exact encoded width of the variant's fields, excluding the
    /// signature and tag.
    fn body_size(&self) -> usize;

    /// Encode the variant's fields in declaration order.
    fn encode_body(&self, writer: &mut WireWriter) -> Result<()>;

    /// Decode the fields of the variant selected by `tag`.
    ///
    /// An unknown tag is a malformed message. Content-bearing variants
    /// decode with empty content; the socket attaches the content frame.
    fn decode_body(tag: u8, reader: &mut WireReader<'_>) -> Result<Self>;

    /// Whether this variant carries a trailing raw-content frame.
    fn has_content(&self) -> bool {
        false
    }

    /// The raw-content frame, for content-bearing variants.
    fn content(&self) -> Option<&Bytes> {
        None
    }

    /// Attach a received content frame. No-op for variants without one.
    fn set_content(&mut self, _content: Bytes) {}

    /// Serialize the full envelope frame: signature, tag, fields.
    ///
    /// The output buffer is allocated at its exact final size.
    fn encode_envelope(&self) -> Result<Bytes> {
        let size = ENVELOPE_PREFIX_SIZE + self.body_size();
        let mut writer = WireWriter::with_capacity(size);
        writer.put_u16(Self::SIGNATURE);
        writer.put_u8(self.tag());
        self.encode_body(&mut writer)?;
        debug_assert_eq!(writer.len(), size, "body_size out of step with encode_body");
        Ok(writer.finish())
    }

    /// Parse a full envelope frame back into a variant.
    ///
    /// Returns [`ZwireError::BadSignature`] when the frame belongs to a
    /// different family, [`ZwireError::Malformed`] for anything else
    /// that cannot be decoded. Trailing bytes after the last field are
    /// ignored.
    fn decode_envelope(frame: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(frame);
        let signature = reader.get_u16()?;
        if signature != Self::SIGNATURE {
            return Err(ZwireError::BadSignature(signature));
        }
        let tag = reader.get_u8()?;
        Self::decode_body(tag, &mut reader)
    }
}

/// Peek the leading signature of an envelope frame, if it has one.
pub(crate) fn peek_signature(frame: &[u8]) -> Option<u16> {
    if frame.len() < 2 {
        return None;
    }
    Some(u16::from_be_bytes([frame[0], frame[1]]))
}
