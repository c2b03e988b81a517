//! LEB128 variable-length integer decoding.
//!
//! All variants share one accumulation loop; they differ in how many bytes
//! may be consumed and in whether the result is sign-extended.

use super::error::DecodeError;
use super::reader::Reader;

/// Accumulates up to `max_bytes` groups of 7 bits. Returns the raw
/// accumulator, the total shift consumed and the final byte.
fn read_groups(reader: &mut Reader, max_bytes: u32) -> Result<(u64, u32, u8), DecodeError> {
    let start = reader.pos();
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    for _ in 0..max_bytes {
        let byte = reader.read_byte()?;
        // shift stays below 64 for every byte we are allowed to read
        result |= u64::from(byte & 0x7f) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            return Ok((result, shift, byte));
        }
    }

    Err(DecodeError::IntegerTooLong { offset: start })
}

fn read_vu(reader: &mut Reader, size: u32) -> Result<u64, DecodeError> {
    let (result, _, _) = read_groups(reader, (size + 6) / 7)?;
    Ok(result)
}

fn read_vs(reader: &mut Reader, size: u32) -> Result<i64, DecodeError> {
    let (mut result, shift, last) = read_groups(reader, (size + 6) / 7)?;
    if shift < 64 && (last & 0x40) != 0 {
        result |= !0u64 << shift;
    }
    Ok(result as i64)
}

/// Unsigned 32-bit, at most 5 bytes.
pub fn read_vu32(reader: &mut Reader) -> Result<u32, DecodeError> {
    read_vu(reader, 32).map(|v| v as u32)
}

/// Signed 32-bit, at most 5 bytes.
pub fn read_vs32(reader: &mut Reader) -> Result<i32, DecodeError> {
    read_vs(reader, 32).map(|v| v as i32)
}

/// Signed 33-bit, the encoding of block type indices. At most 5 bytes.
pub fn read_vs33(reader: &mut Reader) -> Result<i64, DecodeError> {
    read_vs(reader, 33).map(|v| (v << 31) >> 31)
}

/// Signed 64-bit, at most 10 bytes.
pub fn read_vs64(reader: &mut Reader) -> Result<i64, DecodeError> {
    read_vs(reader, 64)
}
