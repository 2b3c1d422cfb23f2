//! Command line front end for the MSR605
//!
//! ```text
//! msr -d /dev/ttyUSB0 -r                  # read all tracks
//! msr -d COM1 -r -t 12                    # read tracks 1 and 2
//! msr -d /dev/ttyUSB0 -w -t 13 "t1" "t3"  # write tracks 1 and 3
//! msr -d /dev/ttyUSB0 -e -t 123           # erase all tracks
//! msr -d /dev/ttyUSB0 -C                  # high coercivity
//! msr -d /dev/ttyUSB0 -b hhl              # BPI: high, high, low
//! ```

use clap::{ArgGroup, CommandFactory, Parser, error::ErrorKind};

use msr605::{BitsPerChar, BpiMode, Coercivity, Device, TrackData, TrackSelection};

#[derive(Debug, Parser)]
#[command(
    name = "msr",
    about = "Driver for the magnetic stripe card reader/writer MSR605",
    group(
        ArgGroup::new("operation")
            .required(true)
            .args(["read", "write", "erase", "hico", "loco", "bpi"])
    )
)]
struct Args {
    /// Path to the serial device
    #[arg(short = 'd', long)]
    device: String,

    /// Read magnetic tracks
    #[arg(short = 'r', long)]
    read: bool,

    /// Write magnetic tracks
    #[arg(short = 'w', long)]
    write: bool,

    /// Erase magnetic tracks
    #[arg(short = 'e', long)]
    erase: bool,

    /// Select high coercivity mode
    #[arg(short = 'C', long)]
    hico: bool,

    /// Select low coercivity mode
    #[arg(short = 'c', long)]
    loco: bool,

    /// Bits per inch for each track, `h` or `l` (e.g. `hhl`)
    #[arg(short = 'b', long)]
    bpi: Option<String>,

    /// Bits per character for each track, 5 to 8 (e.g. `755`)
    #[arg(short = 'B', long)]
    bpc: Option<String>,

    /// Skip ISO encoding and decoding
    #[arg(short = '0', long)]
    raw: bool,

    /// Tracks to act on (1, 2, 3, 12, 13, 23, 123)
    #[arg(short = 't', long, default_value = "123")]
    tracks: String,

    /// Track data, one argument per selected track, in `-t` order
    data: Vec<String>,
}

fn fail(kind: ErrorKind, message: impl std::fmt::Display) -> ! {
    Args::command().error(kind, message).exit()
}

/// Spread write arguments over the tracks, in the order `-t` lists them
fn track_data(tracks: &str, data: &[String]) -> [Vec<u8>; 3] {
    let mut out: [Vec<u8>; 3] = Default::default();
    for (c, value) in tracks.chars().zip(data) {
        if let Some(slot) = c.to_digit(10).and_then(|n| out.get_mut(n as usize - 1)) {
            *slot = value.clone().into_bytes();
        }
    }
    out
}

#[tokio::main]
async fn main() -> msr605::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let selection: TrackSelection = args
        .tracks
        .parse()
        .unwrap_or_else(|e| fail(ErrorKind::InvalidValue, e));

    if (args.read || args.erase) && !args.data.is_empty() {
        fail(ErrorKind::TooManyValues, "read and erase take no data arguments");
    }
    if args.write && args.data.len() != args.tracks.len() {
        fail(
            ErrorKind::WrongNumberOfValues,
            "number of data arguments must match number of tracks",
        );
    }

    let bpc = match args.bpc.as_deref() {
        Some(s) => Some(
            BitsPerChar::parse_triple(s).unwrap_or_else(|e| fail(ErrorKind::InvalidValue, e)),
        ),
        // Raw transfers are always set up for 8 bits per character
        None if args.raw => Some([BitsPerChar::default(); 3]),
        None => None,
    };

    let bpi = args
        .bpi
        .as_deref()
        .map(|s| BpiMode::parse_triple(s).unwrap_or_else(|e| fail(ErrorKind::InvalidValue, e)));

    let mut device = Device::new(&args.device);
    device.connect().await?;

    if let Some([t1, t2, t3]) = bpc {
        device.set_bpc(t1, t2, t3).await?;
    }

    if args.read && args.raw {
        let data = device.read_raw_tracks().await?;
        println!("{}", hex::encode(&data));
    } else if args.read {
        let tracks = device.read_tracks().await?;
        for number in (1..=3).filter(|&n| selection.includes(n)) {
            if let Some(track) = tracks.track(number) {
                println!("{}={}", number, String::from_utf8_lossy(track));
            }
        }
    } else if args.write {
        let [t1, t2, t3] = track_data(&args.tracks, &args.data);
        if args.raw {
            device.write_raw_tracks(&t1, &t2, &t3).await?;
        } else {
            device.write_tracks(&TrackData::new(t1, t2, t3)).await?;
        }
    } else if args.erase {
        device.erase_tracks(selection).await?;
    } else if args.hico {
        device.set_coercivity(Coercivity::High).await?;
    } else if args.loco {
        device.set_coercivity(Coercivity::Low).await?;
    } else if let Some([t1, t2, t3]) = bpi {
        device.set_bpi(t1, t2, t3).await?;
    }

    device.disconnect().await?;

    Ok(())
}
