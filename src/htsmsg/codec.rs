//! HTSMSG binary encoder and decoder
//!
//! HTSMSG is the serialization used by HTSP. A message on the wire is a
//! 4-byte big-endian body length followed by the body. The body is a run of
//! fields, each laid out as:
//!
//! ```text
//! +------+---------+-------------+--------+--------+
//! | type | namelen | datalen     | name   | data   |
//! | u8   | u8      | u32 BE      | bytes  | bytes  |
//! +------+---------+-------------+--------+--------+
//! ```
//!
//! Field types:
//! ```text
//! 1 - MAP  (data is a nested body)
//! 2 - S64  (little-endian, shortest form, zero length means 0)
//! 3 - STR  (UTF-8)
//! 4 - BIN  (raw bytes)
//! 5 - LIST (nested body, field names empty)
//! 6 - DBL  (not used by channel messages, skipped)
//! 7 - BOOL (decoded as S64 0/1)
//! 8 - UUID (skipped)
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::message::HtsMessage;
use super::value::HtsValue;
use crate::error::HtsmsgError;

const TYPE_MAP: u8 = 1;
const TYPE_S64: u8 = 2;
const TYPE_STR: u8 = 3;
const TYPE_BIN: u8 = 4;
const TYPE_LIST: u8 = 5;
const TYPE_BOOL: u8 = 7;

/// Size of the type + namelen + datalen header
const FIELD_HEADER_LEN: usize = 6;

/// Maximum nesting depth for maps/lists
const MAX_NESTING_DEPTH: usize = 32;

/// Default upper bound on a single frame
pub const DEFAULT_MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// HTSMSG decoder
pub struct HtsmsgDecoder {
    /// Skip unknown field types instead of failing
    lenient: bool,
    /// Largest accepted frame body
    max_frame_len: usize,
    /// Current nesting depth
    depth: usize,
}

impl HtsmsgDecoder {
    /// Create a lenient decoder with the default frame limit
    pub fn new() -> Self {
        Self {
            lenient: true,
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
            depth: 0,
        }
    }

    /// Create decoder with explicit lenient mode setting
    pub fn with_lenient(lenient: bool) -> Self {
        Self {
            lenient,
            ..Self::new()
        }
    }

    /// Set the largest accepted frame body
    pub fn max_frame_len(mut self, len: usize) -> Self {
        self.max_frame_len = len;
        self
    }

    /// Decode one length-prefixed frame from a streaming buffer
    ///
    /// Returns `Ok(None)` and leaves the buffer alone until a whole frame is
    /// available. On success the frame is consumed from `buf`.
    pub fn decode_frame(&mut self, buf: &mut BytesMut) -> Result<Option<HtsMessage>, HtsmsgError> {
        if buf.len() < 4 {
            return Ok(None);
        }

        let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
        if len > self.max_frame_len {
            return Err(HtsmsgError::FrameTooLarge(len));
        }
        if buf.len() < 4 + len {
            return Ok(None);
        }

        let mut frame = buf.split_to(4 + len).freeze();
        frame.advance(4);
        self.decode_body(&mut frame).map(Some)
    }

    /// Decode a frame body (no length prefix) into a message
    pub fn decode_body(&mut self, buf: &mut Bytes) -> Result<HtsMessage, HtsmsgError> {
        self.depth = 0;
        let mut msg = HtsMessage::new();
        for (name, value) in self.decode_fields(buf)? {
            msg.put(name, value);
        }
        Ok(msg)
    }

    fn decode_fields(&mut self, buf: &mut Bytes) -> Result<Vec<(String, HtsValue)>, HtsmsgError> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(HtsmsgError::NestingTooDeep);
        }

        let mut fields = Vec::new();
        while buf.has_remaining() {
            if buf.remaining() < FIELD_HEADER_LEN {
                return Err(HtsmsgError::UnexpectedEof);
            }

            let field_type = buf.get_u8();
            let name_len = buf.get_u8() as usize;
            let data_len = buf.get_u32() as usize;

            if buf.remaining() < name_len + data_len {
                return Err(HtsmsgError::UnexpectedEof);
            }

            let name = buf.copy_to_bytes(name_len);
            let name = String::from_utf8(name.to_vec()).map_err(|_| HtsmsgError::InvalidUtf8)?;
            let mut data = buf.copy_to_bytes(data_len);

            if let Some(value) = self.decode_value(field_type, &mut data)? {
                fields.push((name, value));
            }
        }

        self.depth -= 1;
        Ok(fields)
    }

    fn decode_value(
        &mut self,
        field_type: u8,
        data: &mut Bytes,
    ) -> Result<Option<HtsValue>, HtsmsgError> {
        let value = match field_type {
            TYPE_MAP => {
                let mut msg = HtsMessage::new();
                for (name, value) in self.decode_fields(data)? {
                    msg.put(name, value);
                }
                HtsValue::Map(msg)
            }
            TYPE_S64 => HtsValue::S64(read_s64(data)),
            TYPE_STR => {
                let s = String::from_utf8(data.to_vec()).map_err(|_| HtsmsgError::InvalidUtf8)?;
                HtsValue::Str(s)
            }
            TYPE_BIN => HtsValue::Bin(data.clone()),
            TYPE_LIST => {
                let items = self.decode_fields(data)?;
                HtsValue::List(items.into_iter().map(|(_, v)| v).collect())
            }
            TYPE_BOOL => HtsValue::S64(data.first().map_or(0, |b| (*b != 0) as i64)),
            _ => {
                if self.lenient {
                    return Ok(None);
                }
                return Err(HtsmsgError::UnknownFieldType(field_type));
            }
        };
        Ok(Some(value))
    }
}

impl Default for HtsmsgDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read an S64 payload: little-endian, up to 8 bytes, no sign extension
fn read_s64(data: &Bytes) -> i64 {
    let mut u: u64 = 0;
    for b in data.iter().take(8).rev() {
        u = (u << 8) | *b as u64;
    }
    u as i64
}

/// HTSMSG encoder
pub struct HtsmsgEncoder {
    buf: BytesMut,
}

impl HtsmsgEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self {
            buf: BytesMut::with_capacity(256),
        }
    }

    /// Get the encoded bytes and reset encoder
    pub fn finish(&mut self) -> Bytes {
        self.buf.split().freeze()
    }

    /// Get current encoded length
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if encoder is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append a length-prefixed frame for `msg`
    pub fn encode(&mut self, msg: &HtsMessage) -> Result<(), HtsmsgError> {
        let mut body = BytesMut::new();
        write_map(&mut body, msg)?;
        self.buf.put_u32(body.len() as u32);
        self.buf.put_slice(&body);
        Ok(())
    }
}

impl Default for HtsmsgEncoder {
    fn default() -> Self {
        Self::new()
    }
}

fn write_map(out: &mut BytesMut, msg: &HtsMessage) -> Result<(), HtsmsgError> {
    for (name, value) in msg.iter() {
        write_field(out, name, value)?;
    }
    Ok(())
}

fn write_field(out: &mut BytesMut, name: &str, value: &HtsValue) -> Result<(), HtsmsgError> {
    if name.len() > u8::MAX as usize {
        return Err(HtsmsgError::NameTooLong(name.len()));
    }

    let (field_type, data) = match value {
        HtsValue::Map(m) => {
            let mut nested = BytesMut::new();
            write_map(&mut nested, m)?;
            (TYPE_MAP, nested.freeze())
        }
        HtsValue::S64(n) => (TYPE_S64, s64_bytes(*n)),
        HtsValue::Str(s) => (TYPE_STR, Bytes::copy_from_slice(s.as_bytes())),
        HtsValue::Bin(b) => (TYPE_BIN, b.clone()),
        HtsValue::List(items) => {
            let mut nested = BytesMut::new();
            for item in items {
                write_field(&mut nested, "", item)?;
            }
            (TYPE_LIST, nested.freeze())
        }
    };

    out.put_u8(field_type);
    out.put_u8(name.len() as u8);
    out.put_u32(data.len() as u32);
    out.put_slice(name.as_bytes());
    out.put_slice(&data);
    Ok(())
}

/// Shortest little-endian form of an S64
fn s64_bytes(n: i64) -> Bytes {
    let mut u = n as u64;
    let mut out = BytesMut::with_capacity(8);
    while u != 0 {
        out.put_u8((u & 0xFF) as u8);
        u >>= 8;
    }
    out.freeze()
}

/// Convenience function to encode a single message as a frame
pub fn encode_message(msg: &HtsMessage) -> Result<Bytes, HtsmsgError> {
    let mut encoder = HtsmsgEncoder::new();
    encoder.encode(msg)?;
    Ok(encoder.finish())
}

/// Convenience function to decode a single complete frame
pub fn decode_message(data: &[u8]) -> Result<HtsMessage, HtsmsgError> {
    let mut decoder = HtsmsgDecoder::new();
    let mut buf = BytesMut::from(data);
    decoder
        .decode_frame(&mut buf)?
        .ok_or(HtsmsgError::UnexpectedEof)
}
