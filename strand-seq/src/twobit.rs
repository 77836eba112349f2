//! 2-bit nucleotide packing as used by UCSC twoBit containers.
//!
//! Packs nucleotides into 2 bits per base, 4 bases per byte, most significant
//! pair first. The code table is fixed by the container format:
//!
//! | bits | base |
//! |------|------|
//! | `00` | T    |
//! | `01` | C    |
//! | `10` | A    |
//! | `11` | G    |
//!
//! Packed data carries no case and no unknown bases; those are layered on top
//! by the container's block tables.

use strand_core::{Result, StrandError};

/// Base for each 2-bit code, indexed by code.
pub const CODE_TABLE: [u8; 4] = [b'T', b'C', b'A', b'G'];

/// Encode a single ASCII base to its 2-bit code.
///
/// Case-insensitive. `N` and other non-ACGT bytes have no 2-bit code.
#[inline]
pub fn encode_base(b: u8) -> Option<u8> {
    match b {
        b'T' | b't' => Some(0b00),
        b'C' | b'c' => Some(0b01),
        b'A' | b'a' => Some(0b10),
        b'G' | b'g' => Some(0b11),
        _ => None,
    }
}

/// Decode a 2-bit code back to an uppercase ASCII base.
#[inline]
pub fn decode_base(bits: u8) -> u8 {
    CODE_TABLE[(bits & 0b11) as usize]
}

/// Number of packed bytes holding `n` bases.
#[inline]
pub fn packed_len(n: usize) -> usize {
    (n + 3) / 4
}

/// Unpack `len` bases from `packed`, skipping the first `skip` bases of the
/// first byte, and append them to `out`.
///
/// `skip` must be below 4 and `packed` must hold at least
/// `packed_len(skip + len)` bytes; both are checked.
pub fn unpack_into(packed: &[u8], skip: usize, len: usize, out: &mut Vec<u8>) -> Result<()> {
    if skip > 3 {
        return Err(StrandError::InvalidInput(format!(
            "2-bit skip must be below 4, got {}",
            skip
        )));
    }
    let needed = packed_len(skip + len);
    if packed.len() < needed {
        return Err(StrandError::Format(format!(
            "packed data holds {} bytes, {} needed for {} bases",
            packed.len(),
            needed,
            len
        )));
    }
    if len == 0 {
        return Ok(());
    }

    out.reserve(len);
    let mut remaining = len;
    for (i, &byte) in packed[..needed].iter().enumerate() {
        let first = if i == 0 { skip } else { 0 };
        for slot in first..4 {
            if remaining == 0 {
                break;
            }
            let bit_offset = 6 - slot * 2; // 6, 4, 2, 0
            out.push(decode_base(byte >> bit_offset));
            remaining -= 1;
        }
    }
    Ok(())
}

/// Pack ASCII nucleotides into 2-bit bytes.
///
/// Bytes outside `ACGT` (any case) are packed as `T`, the all-zero code, which
/// is how container writers store bases later covered by an unknown-base block.
pub fn pack(seq: &[u8]) -> Vec<u8> {
    let mut data = vec![0u8; packed_len(seq.len())];
    for (i, &base) in seq.iter().enumerate() {
        let bits = encode_base(base).unwrap_or(0b00);
        let bit_offset = 6 - (i % 4) * 2;
        data[i / 4] |= bits << bit_offset;
    }
    data
}
