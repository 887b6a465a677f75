//! HTSMSG message model and codec
//!
//! HTSP carries every request, reply and async update as an HTSMSG: a
//! self-describing map of named fields. This module provides:
//! - `HtsValue`, the field value union
//! - `HtsMessage`, the field map with typed accessors
//! - the length-prefixed binary encoder and decoder

pub mod codec;
pub mod message;
pub mod value;

pub use codec::{decode_message, encode_message, HtsmsgDecoder, HtsmsgEncoder};
pub use message::HtsMessage;
pub use value::HtsValue;
