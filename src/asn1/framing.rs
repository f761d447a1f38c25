//! Structural walk over DER tag-length-value framing.
//!
//! This runs before any typed decoding so that a length prefix which does
//! not fit the buffer is always reported as [`HdbError::TruncatedInput`],
//! no matter which field it appears in. Lengths are big-endian base 256 as
//! X.690 requires; nothing else in the crate reads multi-byte integers by
//! hand.

use crate::error::HdbError;
use tracing::error;

/// Records nest about six levels deep, this leaves room for extensions.
const MAX_NESTING_DEPTH: usize = 32;

/// Long form lengths beyond four octets cannot describe a record we could
/// hold in memory.
const MAX_LENGTH_OCTETS: usize = 4;

const CONSTRUCTED: u8 = 0x20;
const HIGH_TAG_NUMBER: u8 = 0x1f;

/// Check that `bytes` holds exactly one well framed TLV.
pub(crate) fn check_record(bytes: &[u8]) -> Result<(), HdbError> {
    let consumed = check_tlv(bytes, 0)?;
    if consumed != bytes.len() {
        error!(
            consumed,
            remaining = bytes.len() - consumed,
            "trailing bytes after record"
        );
        return Err(HdbError::TrailingData);
    }
    Ok(())
}

/// Check that `bytes` is a run of zero or more well framed TLVs, as found in
/// the content octets of a constructed element.
pub(crate) fn check_contents(bytes: &[u8]) -> Result<(), HdbError> {
    let mut position = 0;
    while let Some(rest) = bytes.get(position..).filter(|rest| !rest.is_empty()) {
        position += check_tlv(rest, 1)?;
    }
    Ok(())
}

/// Returns the number of bytes the TLV at the start of `bytes` occupies.
fn check_tlv(bytes: &[u8], depth: usize) -> Result<usize, HdbError> {
    if depth > MAX_NESTING_DEPTH {
        error!(depth, "der nesting too deep");
        return Err(HdbError::DerDecode);
    }

    let identifier = *bytes.first().ok_or(HdbError::TruncatedInput)?;
    let mut offset = 1;

    if identifier & HIGH_TAG_NUMBER == HIGH_TAG_NUMBER {
        // Base 128 tag number, high bit set on all but the last octet.
        loop {
            let octet = *bytes.get(offset).ok_or(HdbError::TruncatedInput)?;
            offset += 1;
            if octet & 0x80 == 0 {
                break;
            }
            if offset > 1 + MAX_LENGTH_OCTETS {
                error!("der tag number too large");
                return Err(HdbError::DerDecode);
            }
        }
    }

    let initial = *bytes.get(offset).ok_or(HdbError::TruncatedInput)?;
    offset += 1;

    let length = if initial & 0x80 == 0 {
        usize::from(initial)
    } else {
        let count = usize::from(initial & 0x7f);
        if count == 0 {
            error!("indefinite length is not permitted in der");
            return Err(HdbError::DerDecode);
        }
        if count > MAX_LENGTH_OCTETS {
            error!(count, "der length too large");
            return Err(HdbError::DerDecode);
        }
        let octets = bytes
            .get(offset..offset + count)
            .ok_or(HdbError::TruncatedInput)?;
        offset += count;
        octets
            .iter()
            .fold(0usize, |acc, octet| (acc << 8) | usize::from(*octet))
    };

    let end = offset
        .checked_add(length)
        .ok_or(HdbError::TruncatedInput)?;
    let content = bytes.get(offset..end).ok_or(HdbError::TruncatedInput)?;

    if identifier & CONSTRUCTED == CONSTRUCTED {
        let mut position = 0;
        while let Some(rest) = content.get(position..).filter(|rest| !rest.is_empty()) {
            position += check_tlv(rest, depth + 1)?;
        }
    }

    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::{check_contents, check_record};
    use crate::error::HdbError;

    #[test]
    fn framing_accepts_nested() {
        // SEQUENCE { [1] { INTEGER 5 } }
        assert_eq!(check_record(&[0x30, 0x05, 0xa1, 0x03, 0x02, 0x01, 0x05]), Ok(()));
        assert_eq!(check_record(&[0x30, 0x00]), Ok(()));
    }

    #[test]
    fn framing_truncation() {
        let record = [0x30, 0x05, 0xa1, 0x03, 0x02, 0x01, 0x05];
        for cut in 0..record.len() {
            assert_eq!(
                check_record(&record[..cut]),
                Err(HdbError::TruncatedInput),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn framing_inner_overrun() {
        // Outer length is fine, the inner INTEGER claims two bytes but has one.
        assert_eq!(
            check_record(&[0x30, 0x05, 0xa1, 0x03, 0x02, 0x02, 0x05]),
            Err(HdbError::TruncatedInput)
        );
    }

    #[test]
    fn framing_long_form_is_big_endian() {
        let mut record = vec![0x04, 0x82, 0x01, 0x00];
        record.extend(std::iter::repeat(0u8).take(256));
        assert_eq!(check_record(&record), Ok(()));
        // Little endian reading would claim one byte and leave trailing data.
        record.truncate(5);
        assert_eq!(check_record(&record), Err(HdbError::TruncatedInput));
    }

    #[test]
    fn framing_rejects_trailing_and_indefinite() {
        assert_eq!(
            check_record(&[0x30, 0x00, 0x00]),
            Err(HdbError::TrailingData)
        );
        assert_eq!(
            check_record(&[0x30, 0x80, 0x00, 0x00]),
            Err(HdbError::DerDecode)
        );
    }

    #[test]
    fn framing_contents_run() {
        assert_eq!(check_contents(&[]), Ok(()));
        assert_eq!(check_contents(&[0x02, 0x01, 0x05, 0x05, 0x00]), Ok(()));
        assert_eq!(
            check_contents(&[0x02, 0x01, 0x05, 0x04]),
            Err(HdbError::TruncatedInput)
        );
    }
}
