//! # The Transaction Queue
//!
//! The single source of truth for "what has the user instructed, and
//! what state is it in". Entries are created exactly once by
//! [`TransactionQueue::enqueue`], owned by the queue for their entire
//! life, mutated only through [`TransactionQueue::update_status`], and
//! never deleted by the core (retention is a collaborator policy).
//!
//! ## Two Orders, On Purpose
//!
//! The canonical collection order is newest-first — that is what a
//! human wants to see, and it is the order `list_recent` and
//! `queued_entries` return. Settlement is the opposite: the authority
//! should see instructions in the order the user gave them, so
//! `settlement_batch` returns queued entries oldest-first and the sync
//! engine consumes that. Keeping both orders explicit (instead of one
//! ambiguous iteration order) is a deliberate divergence from the app
//! this replaces, which settled newest-first by accident.

mod collection;
mod types;

pub use collection::{StatusUpdate, TransactionQueue};
pub use types::{derive_fingerprint, Transaction, TxStatus};
