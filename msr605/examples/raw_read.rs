//! Read tracks in raw format
//!
//! Prints the undecoded reply bytes; no bit unpacking is done.

use msr605::{BitsPerChar, Device};

#[tokio::main]
async fn main() -> msr605::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = std::env::var("MSR_DEVICE").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::new(path);
    device.connect().await?;

    // Raw mode reads whole bytes
    let bpc = BitsPerChar::default();
    device.set_bpc(bpc, bpc, bpc).await?;

    println!("Swipe a card...");
    let raw = device.read_raw_tracks().await?;
    println!("{} bytes: {}", raw.len(), hex::encode(&raw));

    device.disconnect().await?;

    Ok(())
}
