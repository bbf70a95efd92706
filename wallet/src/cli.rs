//! # CLI Interface
//!
//! Defines the command-line argument structure for the `setu` wallet
//! using `clap` derive. Every subcommand operates on the same local
//! data directory; connectivity is driven explicitly (`online` /
//! `offline`) because a CLI process has no network-change events of
//! its own.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// SETU offline-first payment wallet.
///
/// Captures payment instructions locally, settles them with the
/// (simulated) settlement authority when told the network is back,
/// and exchanges payment intents with another device as envelopes.
#[derive(Parser, Debug)]
#[command(
    name = "setu",
    about = "SETU offline-first payment wallet",
    version,
    propagate_version = true
)]
pub struct SetuCli {
    /// Path to the wallet data directory.
    ///
    /// Created on first use if it does not exist.
    #[arg(long, short = 'd', env = "SETU_DATA_DIR", default_value = ".setu", global = true)]
    pub data_dir: PathBuf,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "SETU_LOG_FORMAT", default_value = "pretty", global = true)]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the `setu` binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Queue a payment instruction (works offline; that is the point).
    Pay(PayArgs),
    /// Split a total across several payees, queueing one payment each.
    Split(SplitArgs),
    /// Show recent transactions, newest first.
    History(HistoryArgs),
    /// Report that connectivity is back and drain the queue.
    Online,
    /// Report that connectivity is gone.
    Offline,
    /// Print the newest transaction as a shareable intent envelope.
    Share,
    /// Accept an intent envelope from another device.
    Receive(ReceiveArgs),
    /// Show queue counts, connectivity, and balance.
    Status,
}

/// Arguments for the `pay` subcommand.
#[derive(Parser, Debug)]
pub struct PayArgs {
    /// Amount to pay (positive).
    pub amount: f64,

    /// Recipient UPI handle, e.g. `alice@bank`.
    pub payee_upi: String,
}

/// Arguments for the `split` subcommand.
///
/// Two modes: positional payees share the total equally, or repeated
/// `--member upi=amount` entries give each member a custom share. The
/// custom shares must add up to the total (within a rounding paisa).
#[derive(Parser, Debug)]
pub struct SplitArgs {
    /// Total amount to split (positive).
    pub total: f64,

    /// Payees for an equal split, e.g. `alice@bank bob@pay`.
    #[arg(required_unless_present = "member", conflicts_with = "member")]
    pub payees: Vec<String>,

    /// Custom split member as `upi=amount`; repeat once per member.
    #[arg(long = "member", short = 'm', value_name = "UPI=AMOUNT")]
    pub member: Vec<String>,
}

/// Arguments for the `history` subcommand.
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Maximum number of entries to show.
    #[arg(long, short = 'n', default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for the `receive` subcommand.
#[derive(Parser, Debug)]
pub struct ReceiveArgs {
    /// The envelope string produced by the peer's `share`.
    pub envelope: String,
}
