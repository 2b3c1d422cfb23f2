//! Protocol constants

/// Escape code. Prefixes every command and delimits track fields.
pub const ESCAPE: u8 = 0x1B;

/// End code (ASCII FS), last byte of a track data block
pub const END_CODE: u8 = 0x1C;

/// Status byte reported by the device on success
pub const STATUS_OK: u8 = b'0';

/// Default response timeout (seconds)
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Delay after every write before the device accepts more input (milliseconds)
pub const SETTLE_DELAY_MS: u64 = 100;

/// Wait between polls when a read returns no data (milliseconds)
pub const POLL_INTERVAL_MS: u64 = 10;

/// Size of a single read from the transport
pub const READ_CHUNK_SIZE: usize = 1024;

/// Default serial line speed
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Track 1 alphabet (6 data bits per character)
pub const TRACK1_MAP: &[u8; 64] =
    b" !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_";

/// Track 2/3 alphabet (4 data bits per character)
pub const TRACK23_MAP: &[u8; 16] = b"0123456789:;<=>?";

/// Bits-per-inch mode bytes for the `b` command
pub mod bpi {
    /// Track 1, 210 bpi
    pub const TRACK1_HIGH: u8 = 0xA1;

    /// Track 1, 75 bpi
    pub const TRACK1_LOW: u8 = 0xA0;

    /// Track 2, 210 bpi
    pub const TRACK2_HIGH: u8 = 0xD2;

    /// Track 2, 75 bpi
    pub const TRACK2_LOW: u8 = 0x4B;

    /// Track 3, 210 bpi
    pub const TRACK3_HIGH: u8 = 0xC1;

    /// Track 3, 75 bpi
    pub const TRACK3_LOW: u8 = 0xC0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_maps() {
        assert_eq!(TRACK1_MAP[0], b' ');
        assert_eq!(TRACK1_MAP[63], b'_');
        assert_eq!(TRACK23_MAP[0], b'0');
        assert_eq!(TRACK23_MAP[15], b'?');
    }

    #[test]
    fn test_track1_map_is_contiguous_ascii() {
        // ISO 7811 track 1 is ASCII 0x20..=0x5F
        for (i, c) in TRACK1_MAP.iter().enumerate() {
            assert_eq!(*c as usize, 0x20 + i);
        }
    }

    #[test]
    fn test_bpi_modes_distinct() {
        let modes = [
            bpi::TRACK1_HIGH,
            bpi::TRACK1_LOW,
            bpi::TRACK2_HIGH,
            bpi::TRACK2_LOW,
            bpi::TRACK3_HIGH,
            bpi::TRACK3_LOW,
        ];
        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
