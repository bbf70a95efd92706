//! # SETU Wallet
//!
//! Entry point for the `setu` binary: a thin CLI over the core payment
//! queue. Each invocation composes the device services over a
//! sled-backed store in the data directory, runs one command, and
//! exits — the queue snapshot carries all state between invocations,
//! exactly as it would across app restarts on a phone.
//!
//! Settlement uses the simulated authority until real rails
//! integration lands; `online` therefore always "succeeds" upstream,
//! which is the honest current behavior, not an aspiration.

mod cli;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use setu_core::config;
use setu_core::store::{AuthRecord, SledStore, StateStore};
use setu_core::sync::SimulatedSettlement;
use setu_core::{Device, TxStatus};

use cli::{Commands, SetuCli};
use logging::LogFormat;

/// Per-submission delay of the simulated authority, approximating one
/// network round trip per entry.
const SIMULATED_SETTLEMENT_LATENCY: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = SetuCli::parse();
    logging::init_logging(
        "setu=info,setu_wallet=info,setu_core=info",
        LogFormat::from_str_lossy(&cli.log_format),
    );

    let store = open_store(&cli)?;
    let mut device = Device::new(
        Arc::clone(&store) as Arc<dyn StateStore>,
        Arc::new(SimulatedSettlement::new().with_latency(SIMULATED_SETTLEMENT_LATENCY)),
    )
    .context("failed to open the transaction queue")?;

    match cli.command {
        Commands::Pay(args) => cmd_pay(&mut device, args.amount, &args.payee_upi),
        Commands::Split(args) => cmd_split(&mut device, &args),
        Commands::History(args) => cmd_history(&device, args.limit),
        Commands::Online => cmd_online(&mut device).await,
        Commands::Offline => cmd_offline(&mut device).await,
        Commands::Share => cmd_share(&device),
        Commands::Receive(args) => cmd_receive(&mut device, &args.envelope),
        Commands::Status => cmd_status(&device, store.as_ref()),
    }
}

fn open_store(cli: &SetuCli) -> Result<Arc<SledStore>> {
    let db_path = cli.data_dir.join("db");
    std::fs::create_dir_all(&db_path)
        .with_context(|| format!("failed to create data directory: {}", db_path.display()))?;
    let store = SledStore::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;
    tracing::debug!(path = %db_path.display(), "store opened");
    Ok(Arc::new(store))
}

fn cmd_pay(device: &mut Device, amount: f64, payee_upi: &str) -> Result<()> {
    // The queue accepts anything; validation is this caller's job.
    if !amount.is_finite() || amount <= 0.0 {
        bail!("amount must be a positive number, got {amount}");
    }
    if payee_upi.is_empty() || !payee_upi.contains('@') {
        bail!("payee must look like handle@provider, got {payee_upi:?}");
    }

    let tx = device.pay(amount, payee_upi)?;
    println!(
        "queued {}: ₹{:.2} to {} (fingerprint {})",
        tx.id, tx.amount, tx.payee_upi, tx.fingerprint
    );
    if !device.is_online() {
        println!("offline — will settle on the next `setu online`");
    }
    Ok(())
}

/// Tolerance for a custom split's sum against the stated total — one
/// rounding paisa, so `30 + 30 + 30.0001` of 90 passes and an actual
/// mismatch does not.
const SPLIT_TOLERANCE: f64 = 0.01;

/// Resolve split arguments into one (payee, share) pair per member.
///
/// Equal mode divides the total evenly across the positional payees;
/// custom mode parses `upi=amount` entries and requires their sum to
/// match the total within [`SPLIT_TOLERANCE`]. Every member needs a
/// plausible UPI handle and a positive share.
fn plan_split(total: f64, payees: &[String], members: &[String]) -> Result<Vec<(String, f64)>> {
    if !total.is_finite() || total <= 0.0 {
        bail!("total must be a positive number, got {total}");
    }

    let shares: Vec<(String, f64)> = if members.is_empty() {
        let per_member = total / payees.len() as f64;
        payees.iter().map(|p| (p.clone(), per_member)).collect()
    } else {
        members
            .iter()
            .map(|entry| {
                let (upi, amount) = entry
                    .split_once('=')
                    .with_context(|| format!("expected upi=amount, got {entry:?}"))?;
                let amount: f64 = amount
                    .parse()
                    .with_context(|| format!("bad amount in {entry:?}"))?;
                Ok((upi.to_string(), amount))
            })
            .collect::<Result<_>>()?
    };

    for (upi, amount) in &shares {
        if upi.is_empty() || !upi.contains('@') {
            bail!("payee must look like handle@provider, got {upi:?}");
        }
        if !amount.is_finite() || *amount <= 0.0 {
            bail!("share for {upi} must be positive, got {amount}");
        }
    }

    let sum: f64 = shares.iter().map(|(_, amount)| amount).sum();
    if (total - sum).abs() > SPLIT_TOLERANCE {
        bail!("split amounts sum to ₹{sum:.2}, which does not match the total ₹{total:.2}");
    }
    Ok(shares)
}

fn cmd_split(device: &mut Device, args: &cli::SplitArgs) -> Result<()> {
    let shares = plan_split(args.total, &args.payees, &args.member)?;

    // One independent queued transaction per member, same as paying
    // each of them by hand.
    for (payee, amount) in &shares {
        let tx = device.pay(*amount, payee.clone())?;
        println!("queued {}: ₹{:.2} to {}", tx.id, tx.amount, tx.payee_upi);
    }
    println!(
        "split ₹{:.2} across {} payees",
        args.total,
        shares.len()
    );
    if !device.is_online() {
        println!("offline — will settle on the next `setu online`");
    }
    Ok(())
}

fn cmd_history(device: &Device, limit: usize) -> Result<()> {
    let recent = device.queue().list_recent(limit);
    if recent.is_empty() {
        println!("no transactions yet");
        return Ok(());
    }
    for tx in recent {
        println!(
            "{:<9} ₹{:>10.2}  {:<24} {}  {}",
            tx.status.to_string(),
            tx.amount,
            tx.payee_upi,
            tx.created_at.format("%Y-%m-%d %H:%M:%S"),
            tx.id,
        );
    }
    Ok(())
}

async fn cmd_online(device: &mut Device) -> Result<()> {
    // A repeated `online` is not a transition, but "drain whatever is
    // pending" is still what the user meant.
    let report = match device.set_online(true).await? {
        Some(report) => report,
        None => device.drain_now().await?,
    };
    println!(
        "online — {} submitted, {} settled, {} deferred{}",
        report.attempted,
        report.synced,
        report.deferred,
        if report.stopped_offline {
            " (stopped: connectivity lost)"
        } else {
            ""
        }
    );
    Ok(())
}

async fn cmd_offline(device: &mut Device) -> Result<()> {
    device.set_online(false).await?;
    println!("offline — new payments will queue locally");
    Ok(())
}

fn cmd_share(device: &Device) -> Result<()> {
    match device.share_latest() {
        Some(envelope) => {
            // Envelope on stdout so it can be piped straight into a QR
            // renderer or the peer's `receive`.
            println!("{envelope}");
            Ok(())
        }
        None => bail!("nothing to share — queue a payment first"),
    }
}

fn cmd_receive(device: &mut Device, envelope: &str) -> Result<()> {
    let tx = device
        .receive_envelope(envelope)
        .context("envelope rejected")?;
    println!(
        "received {}: ₹{:.2} to {} — queued for settlement",
        tx.id, tx.amount, tx.payee_upi
    );
    Ok(())
}

fn cmd_status(device: &Device, store: &dyn StateStore) -> Result<()> {
    let all = device.queue().list_recent(usize::MAX);
    let count = |s: TxStatus| all.iter().filter(|t| t.status == s).count();
    println!(
        "transactions: {} total — {} queued, {} synced, {} completed, {} failed",
        all.len(),
        count(TxStatus::Queued),
        count(TxStatus::Synced),
        count(TxStatus::Completed),
        count(TxStatus::Failed),
    );
    println!(
        "connectivity: last known {}",
        if device.queue().last_online_flag() {
            "online"
        } else {
            "offline"
        }
    );

    if let Some(json) = store.read(config::RECORD_AUTH)? {
        let auth: AuthRecord = serde_json::from_str(&json)
            .with_context(|| format!("corrupt {} record", config::RECORD_AUTH))?;
        if let Some(user) = auth.user {
            println!("balance: ₹{:.2} ({})", user.balance, user.email);
        }
    }
    Ok(())
}
