//! MIDI variable-length quantities
//!
//! Seven bits per byte, most significant group first, continuation bit set
//! on every byte but the last. At most four bytes, so the largest encodable
//! value is `0x0FFF_FFFF`.

use crate::error::AnalysisError;

/// Largest value a four-byte VLQ can hold
pub const MAX_VLQ: u32 = 0x0FFF_FFFF;

/// Append `value` as a VLQ
///
/// # Errors
///
/// `EncodingError` if `value` exceeds [`MAX_VLQ`].
pub fn write_vlq(buf: &mut Vec<u8>, value: u32) -> Result<(), AnalysisError> {
    if value > MAX_VLQ {
        return Err(AnalysisError::EncodingError(format!(
            "Delta time {} exceeds VLQ maximum {}",
            value, MAX_VLQ
        )));
    }

    let mut bytes = [0u8; 4];
    let mut i = 3;
    let mut rest = value;
    bytes[i] = (rest & 0x7F) as u8;
    rest >>= 7;
    while rest > 0 {
        i -= 1;
        bytes[i] = ((rest & 0x7F) | 0x80) as u8;
        rest >>= 7;
    }
    buf.extend_from_slice(&bytes[i..]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        write_vlq(&mut buf, value).unwrap();
        buf
    }

    #[test]
    fn test_known_sequences() {
        assert_eq!(vlq(0), [0x00]);
        assert_eq!(vlq(0x40), [0x40]);
        assert_eq!(vlq(0x7F), [0x7F]);
        assert_eq!(vlq(0x80), [0x81, 0x00]);
        assert_eq!(vlq(0x2000), [0xC0, 0x00]);
        assert_eq!(vlq(0x3FFF), [0xFF, 0x7F]);
        assert_eq!(vlq(0x4000), [0x81, 0x80, 0x00]);
        assert_eq!(vlq(0x1F_FFFF), [0xFF, 0xFF, 0x7F]);
        assert_eq!(vlq(0x20_0000), [0x81, 0x80, 0x80, 0x00]);
        assert_eq!(vlq(MAX_VLQ), [0xFF, 0xFF, 0xFF, 0x7F]);
    }

    #[test]
    fn test_rejects_oversized_value() {
        let mut buf = vec![0xAA];
        let err = write_vlq(&mut buf, MAX_VLQ + 1).unwrap_err();
        assert!(matches!(err, AnalysisError::EncodingError(_)));
        assert_eq!(buf, [0xAA], "buffer must be untouched on error");
    }

    #[test]
    fn test_appends() {
        let mut buf = vec![0x90];
        write_vlq(&mut buf, 960).unwrap();
        assert_eq!(buf, [0x90, 0x87, 0x40]);
    }
}
