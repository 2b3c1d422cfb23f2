//! Track data block encoding/decoding
//!
//! # Block Structure
//!
//! ```text
//! ┌──────────────┬────────┬────────┬────────┬────────┬────────┬────────┬──────┐
//! │    Header    │ Mark 1 │ Track1 │ Mark 2 │ Track2 │ Mark 3 │ Track3 │ End  │
//! │ ESC 's'      │ (in    │ N bytes│ ESC    │ N bytes│ ESC    │ N bytes│ '?'  │
//! │              │ header)│        │ 0x02   │        │ 0x03   │        │ FS   │
//! └──────────────┴────────┴────────┴────────┴────────┴────────┴────────┴──────┘
//! ```
//!
//! The header `ESC 's' ESC 0x01` already carries the track 1 marker. Track
//! payloads are not escaped: they must not contain `ESC`.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    constants::{END_CODE, ESCAPE},
    error::{Error, Result},
};

/// Block header, including the track 1 marker
pub const HEADER: [u8; 4] = [ESCAPE, b's', ESCAPE, 0x01];

/// Block trailer
pub const TRAILER: [u8; 2] = [b'?', END_CODE];

/// Marker byte following `ESC` before track 2
const TRACK2_MARKER: u8 = 0x02;

/// Marker byte following `ESC` before track 3
const TRACK3_MARKER: u8 = 0x03;

/// Maximum length of a single raw track payload (one length byte)
pub const MAX_RAW_TRACK_LEN: usize = u8::MAX as usize;

/// Encode three ISO track payloads into a data block
///
/// # Examples
///
/// ```
/// use msr605_core::frame;
///
/// let block = frame::encode(b"A", b"", b"C");
/// assert_eq!(&block[..], b"\x1bs\x1b\x01A\x1b\x02\x1b\x03C?\x1c");
/// ```
pub fn encode(track1: &[u8], track2: &[u8], track3: &[u8]) -> BytesMut {
    let size = HEADER.len() + 4 + TRAILER.len() + track1.len() + track2.len() + track3.len();
    let mut buf = BytesMut::with_capacity(size);

    buf.put_slice(&HEADER);
    buf.put_slice(track1);
    buf.put_slice(&[ESCAPE, TRACK2_MARKER]);
    buf.put_slice(track2);
    buf.put_slice(&[ESCAPE, TRACK3_MARKER]);
    buf.put_slice(track3);
    buf.put_slice(&TRAILER);

    buf
}

/// Encode three raw track payloads, each preceded by its length byte
///
/// # Errors
///
/// Returns [`Error::PayloadTooLarge`] if a payload exceeds 255 bytes.
pub fn encode_raw(track1: &[u8], track2: &[u8], track3: &[u8]) -> Result<BytesMut> {
    for track in [track1, track2, track3] {
        if track.len() > MAX_RAW_TRACK_LEN {
            return Err(Error::PayloadTooLarge {
                size: track.len(),
                max: MAX_RAW_TRACK_LEN,
            });
        }
    }

    let size = HEADER.len() + 7 + TRAILER.len() + track1.len() + track2.len() + track3.len();
    let mut buf = BytesMut::with_capacity(size);

    buf.put_slice(&HEADER);
    buf.put_u8(track1.len() as u8);
    buf.put_slice(track1);
    buf.put_slice(&[ESCAPE, TRACK2_MARKER]);
    buf.put_u8(track2.len() as u8);
    buf.put_slice(track2);
    buf.put_slice(&[ESCAPE, TRACK3_MARKER]);
    buf.put_u8(track3.len() as u8);
    buf.put_slice(track3);
    buf.put_slice(&TRAILER);

    Ok(buf)
}

/// Decode a data block into its three ISO track payloads
///
/// The returned payloads are zero-copy slices of `block`.
///
/// # Errors
///
/// Returns an error if:
/// - The block doesn't start with `ESC 's' ESC 0x01`
/// - The block doesn't end with `'?' FS`
/// - A track delimiter is missing or carries the wrong marker
///
/// # Examples
///
/// ```
/// use msr605_core::frame;
///
/// let block = frame::encode(b"", b"B", b"C").freeze();
/// let [t1, t2, t3] = frame::decode(block).unwrap();
/// assert!(t1.is_empty());
/// assert_eq!(&t2[..], b"B");
/// assert_eq!(&t3[..], b"C");
/// ```
pub fn decode(block: Bytes) -> Result<[Bytes; 3]> {
    if block.len() < HEADER.len() || block[..HEADER.len()] != HEADER {
        return Err(Error::MalformedHeader { len: block.len() });
    }

    if !block.ends_with(&TRAILER) {
        return Err(Error::MissingTerminator);
    }

    let body_end = block.len() - TRAILER.len();

    let (track1, next) = field(
        &block,
        HEADER.len(),
        body_end,
        TRACK2_MARKER,
        "after track 1",
        "track 2 marker",
    )?;
    let (track2, next) = field(
        &block,
        next,
        body_end,
        TRACK3_MARKER,
        "after track 2",
        "track 3 marker",
    )?;

    // Track 3 runs up to the trailer unless it opens with an escape code
    let track3 = if next < body_end && block[next] != ESCAPE {
        block.slice(next..body_end)
    } else {
        Bytes::new()
    };

    Ok([track1, track2, track3])
}

/// Slice the field starting at `start` and check the marker that closes it.
///
/// Returns the field and the start of the next one.
fn field(
    block: &Bytes,
    start: usize,
    body_end: usize,
    marker: u8,
    missing: &'static str,
    bad_marker: &'static str,
) -> Result<(Bytes, usize)> {
    let end = block[start..body_end]
        .iter()
        .position(|&b| b == ESCAPE)
        .map(|offset| start + offset)
        .ok_or(Error::MissingDelimiter(missing))?;

    if end + 1 >= body_end || block[end + 1] != marker {
        return Err(Error::MissingDelimiter(bad_marker));
    }

    Ok((block.slice(start..end), end + 2))
}
