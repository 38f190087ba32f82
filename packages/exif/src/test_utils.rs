//! Minimal in-memory TIFF images for exercising GPS extraction.

/// `[(numerator, denominator); 3]` for degrees, minutes, seconds.
pub type Dms = [(u32, u32); 3];

const ASCII: u16 = 2;
const SHORT: u16 = 3;
const LONG: u16 = 4;
const RATIONAL: u16 = 5;

fn push_entry(buf: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: [u8; 4]) {
    buf.extend_from_slice(&tag.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(&count.to_le_bytes());
    buf.extend_from_slice(&value);
}

fn push_header(buf: &mut Vec<u8>) {
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&8u32.to_le_bytes());
}

/// Builds a little-endian TIFF whose IFD0 points at a GPS IFD holding
/// latitude/longitude rationals and their one-letter references.
#[must_use]
pub fn tiff_with_gps(lat: Dms, lat_ref: u8, lng: Dms, lng_ref: u8) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128);
    push_header(&mut buf);

    // IFD0 at 8: just the GPS IFD pointer. GPS IFD follows at 26.
    buf.extend_from_slice(&1u16.to_le_bytes());
    push_entry(&mut buf, 0x8825, LONG, 1, 26u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());

    // GPS IFD at 26; rational payloads at 80 and 104.
    buf.extend_from_slice(&4u16.to_le_bytes());
    push_entry(&mut buf, 0x0001, ASCII, 2, [lat_ref, 0, 0, 0]);
    push_entry(&mut buf, 0x0002, RATIONAL, 3, 80u32.to_le_bytes());
    push_entry(&mut buf, 0x0003, ASCII, 2, [lng_ref, 0, 0, 0]);
    push_entry(&mut buf, 0x0004, RATIONAL, 3, 104u32.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes());
    debug_assert_eq!(buf.len(), 80);

    for (num, denom) in lat.iter().chain(lng.iter()) {
        buf.extend_from_slice(&num.to_le_bytes());
        buf.extend_from_slice(&denom.to_le_bytes());
    }

    buf
}

/// A TIFF with an orientation tag and no GPS IFD.
#[must_use]
pub fn tiff_without_gps() -> Vec<u8> {
    let mut buf = Vec::with_capacity(26);
    push_header(&mut buf);
    buf.extend_from_slice(&1u16.to_le_bytes());
    push_entry(&mut buf, 0x0112, SHORT, 1, [1, 0, 0, 0]);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf
}
