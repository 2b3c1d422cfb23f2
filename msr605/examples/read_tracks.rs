//! Read all tracks in ISO format

use msr605::Device;

#[tokio::main]
async fn main() -> msr605::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Use "ttyUSB0" / "/dev/ttyUSB0" on Linux/macOS or "COM1" on Windows
    let path = std::env::var("MSR_DEVICE").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::new(path);
    device.connect().await?;

    println!("Swipe a card...");
    let tracks = device.read_tracks().await?;
    println!("{}", tracks);

    device.disconnect().await?;

    Ok(())
}
