//! Nucleotide translations: complement, reverse complement, transcription.
//!
//! All functions work on raw bytes, preserve case, and pass through any byte
//! they do not know (gaps, stops, digits).

// ---------------------------------------------------------------------------
// Complement table (full IUPAC)
// ---------------------------------------------------------------------------

/// Complement of one upper-case base. `U` complements to `A`.
fn complement_upper(b: u8) -> u8 {
    match b {
        b'A' => b'T',
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y', // A|G → T|C
        b'Y' => b'R',
        b'S' => b'S', // G|C → C|G
        b'W' => b'W', // A|T → T|A
        b'K' => b'M', // G|T → C|A
        b'M' => b'K',
        b'B' => b'V', // C|G|T → G|C|A
        b'V' => b'B',
        b'D' => b'H', // A|G|T → T|C|A
        b'H' => b'D',
        b'N' => b'N',
        other => other,
    }
}

/// Complement of a single base, keeping its case.
#[inline]
pub fn complement_base(b: u8) -> u8 {
    if b.is_ascii_lowercase() {
        complement_upper(b.to_ascii_uppercase()).to_ascii_lowercase()
    } else {
        complement_upper(b)
    }
}

/// Complement every base.
pub fn complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().map(|&b| complement_base(b)).collect()
}

/// Reverse complement.
pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement_base(b)).collect()
}

/// DNA to RNA (`T` → `U`, `t` → `u`).
pub fn transcribe(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&b| match b {
            b'T' => b'U',
            b't' => b'u',
            other => other,
        })
        .collect()
}

/// RNA to DNA (`U` → `T`, `u` → `t`).
pub fn back_transcribe(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .map(|&b| match b {
            b'U' => b'T',
            b'u' => b't',
            other => other,
        })
        .collect()
}
