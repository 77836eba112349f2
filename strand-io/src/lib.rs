//! Container readers for the strand genome toolkit.
//!
//! Supported formats:
//! - **twoBit**: UCSC 2-bit packed genomes, decoded lazily by random access.
//!   Memory-mapped opening is available with the `mmap` feature (enabled by
//!   default).
//!
//! ```no_run
//! use strand_io::twobit::TwoBitFile;
//! use strand_seq::SeqOps;
//!
//! # fn main() -> strand_core::Result<()> {
//! let genome = TwoBitFile::open("hg38.2bit")?;
//! let chr1 = genome.record("chr1")?.into_seq();
//! let window = chr1.slice(1_000_000, 1_000_100)?;
//! println!("{} GC: {}", window.to_text()?, window.count("G", ..)? + window.count("C", ..)?);
//! # Ok(())
//! # }
//! ```

pub mod twobit;

pub use twobit::{ByteOrder, TwoBitFile, TwoBitOptions, TwoBitRecord};
