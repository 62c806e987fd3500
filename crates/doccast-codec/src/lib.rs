//! Binary serialization for doccast session recordings.
//!
//! Round-trips a [`Recording`](doccast_core::Recording) to a compact,
//! self-describing binary blob suitable for embedding in an exported
//! document.
//!
//! # Format
//!
//! ```text
//! [MAGIC "DCST"] [VERSION u8]
//! [audio_url: presence u8 (+ length-prefixed str)]
//! [initial_snapshot: length-prefixed bytes]
//! [step_count u32]   ([at f64] [op_count u32] [op bytes]*)*
//! [scroll_count u32] ([at f64] [anchor str] [offset f64])*
//! ```
//!
//! All integers are little-endian; strings and byte arrays are
//! length-prefixed with a `u32`; timestamps are `f64::to_bits()` so they
//! round-trip bit-exactly. No compression, no alignment padding.
//!
//! Decoding validates the magic, version, structure, and the log's
//! timestamp invariants, and returns a recoverable [`CodecError`] rather
//! than panicking on any malformed input.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;

pub use codec::{decode_recording, encode_recording};
pub use error::CodecError;

/// Magic bytes at the start of every recording blob.
pub const MAGIC: [u8; 4] = *b"DCST";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;
