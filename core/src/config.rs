//! # Protocol Constants
//!
//! Every magic number and well-known name in SETU lives here. The record
//! names in particular are a compatibility surface: they match the
//! snapshot keys written by earlier generations of the app, so a store
//! created by one can be opened by the other.

/// Named record holding the full transaction collection plus the
/// last-known connectivity flag. Written as a complete JSON snapshot on
/// every queue mutation.
pub const RECORD_TRANSACTIONS: &str = "transaction-storage";

/// Named record holding the current user's identity and balance.
/// Owned by the authentication collaborator; the core only defines the
/// shape (see [`crate::store::AuthRecord`]).
pub const RECORD_AUTH: &str = "auth-storage";

/// Named record holding scheduled payment reminders. Entirely outside
/// the core's lifecycle; the shape is defined for compatibility only.
pub const RECORD_REMINDERS: &str = "payment-reminders";

/// Prefix for transaction identifiers. The rest of the id is a UUIDv4,
/// so ids are unique across the queue's lifetime and across devices.
pub const TX_ID_PREFIX: &str = "txn_";

/// Length (hex characters) of the transaction fingerprint. 16 hex chars
/// = 64 bits of the blake3 digest — plenty for a dedup/audit key at
/// wallet scale, and short enough to show in a UI.
pub const FINGERPRINT_LEN: usize = 16;

/// JSON field names of the intent envelope. Encode emits exactly these
/// three keys and nothing else; decode tolerates (and ignores) extras.
pub const ENVELOPE_FIELD_AMOUNT: &str = "amount";
pub const ENVELOPE_FIELD_PAYEE: &str = "payeeUpi";
pub const ENVELOPE_FIELD_TIMESTAMP: &str = "timestamp";
