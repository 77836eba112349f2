//! Sequence values and string operations for the strand toolkit.
//!
//! A [`Seq`] behaves like a read-only byte string whatever backs it:
//!
//! - **Eager**: content held in memory, shared by slices
//! - **Lazy**: content produced on demand by [`RangeProvider`]s, one window at a time
//! - **Undefined**: a known length with no content; inspecting it fails
//!
//! On top of that:
//!
//! - **Comparison**: [`ContentView`] / [`ContentCompare`], usable in either operand order
//! - **String operations**: [`SeqOps`] for search, split, strip, case, complement, repeat
//! - **2-bit codec**: [`twobit`] packing with the UCSC `TCAG` code order
//!
//! # Example
//!
//! ```
//! use strand_seq::{ContentCompare, Seq, SeqOps};
//!
//! let seq = Seq::from("GTATACCCCTGGG");
//! assert_eq!(seq.find("CT", ..).unwrap(), Some(8));
//! assert!(seq.slice(0, 4).unwrap().try_eq("GTAT").unwrap());
//! assert_eq!(seq.reverse_complement().unwrap().to_bytes().unwrap(), b"CCCAGGGGTATAC");
//!
//! // Known length, unknown content.
//! let gap = Seq::undefined(10);
//! assert_eq!(gap.len(), 10);
//! assert!(seq.try_eq(&gap).unwrap_err().is_undefined_content());
//! ```

pub mod content;
pub mod nucleotide;
pub mod ops;
pub mod seq;
pub mod twobit;

pub use content::{concat, ContentCompare, ContentView};
pub use ops::SeqOps;
pub use seq::{Backing, LazySegment, RangeProvider, Seq};
