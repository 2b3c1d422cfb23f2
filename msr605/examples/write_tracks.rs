//! Write sample data to all tracks and read it back

use msr605::{Coercivity, Device, TrackData};

#[tokio::main]
async fn main() -> msr605::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = std::env::var("MSR_DEVICE").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut device = Device::new(path);
    device.connect().await?;

    println!("Setting high coercivity...");
    device.set_coercivity(Coercivity::High).await?;

    let tracks = TrackData::new(
        "%B1234567890123445^DOE/JOHN^49121010000000000000?",
        ";1234567890123445=49121010000000000?",
        ";011234567890123445=724724100000000000000000000000000000000000000000000000000000000000000000?",
    );

    println!("Swipe a card to write...");
    device.write_tracks(&tracks).await?;
    println!("✓ Written");

    println!("Swipe again to verify...");
    let read_back = device.read_tracks().await?;
    println!("{}", read_back);

    if read_back == tracks {
        println!("✓ Verified");
    } else {
        println!("✗ Read back data differs");
    }

    device.disconnect().await?;

    Ok(())
}
