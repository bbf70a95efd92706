//! # Payment Intents & the Envelope Codec
//!
//! A [`PaymentIntent`] is the minimal, transient payload two devices
//! exchange: amount, payee UPI handle, and the moment the intent was
//! composed. It has no identity and no status — it exists only between
//! the sender's encode call and the receiver's enqueue call, at which
//! point it becomes a brand-new, independent transaction on the
//! receiver's queue.
//!
//! ## Wire Format
//!
//! The envelope is a single opaque string: standard-alphabet base64 of
//! a compact JSON object with exactly three keys,
//!
//! ```text
//! base64( {"amount":99.5,"payeeUpi":"bob@pay","timestamp":1700000000000} )
//! ```
//!
//! No whitespace, no extra keys on encode. Decode is forward-compatible
//! and ignores unknown keys, so a future field (e.g. a correlation id
//! for cross-device dedup) can be added without breaking deployed
//! decoders. Both the proximity and visual-code transports carry this
//! envelope unmodified; the codec neither knows nor cares which one.

mod codec;
mod types;

pub use codec::{decode, encode, CodecError};
pub use types::PaymentIntent;
