use anyhow::{Context, Result};
use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Install a Ctrl-C handler that raises the returned flag.
///
/// Long-running work polls the flag and stops before starting anything new.
pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        warn!("Interrupt received, stopping after the current frames");
        eprintln!("\nInterrupt received, shutting down safely...");
    })
    .context("Failed to install Ctrl-C handler")?;

    Ok(shutdown_signal)
}
