//! Sequence values with eager, lazy, or undefined content.
//!
//! [`Seq`] is an immutable run of single-byte symbols with an exact, always
//! known length. Its content is backed by one of three variants:
//!
//! - **Eager**: the bytes are held in a shared buffer; slicing shares it.
//! - **Lazy**: ordered [`LazySegment`]s tile `[0, len)`, each forwarding to a
//!   [`RangeProvider`] that materializes exactly the sub-range it is asked for.
//! - **Undefined**: only the length is known; any content inspection fails
//!   with [`StrandError::UndefinedContent`].
//!
//! Length queries and slicing behave identically across the variants and never
//! touch content. Everything that inspects content goes through
//! [`Seq::materialize`], which is the single place the undefined case fails.

use std::borrow::Cow;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use strand_core::hash::ContentHasher;
use strand_core::{ContentAddressable, Result, StrandError, Summarizable};

/// Symbols beyond this length are abbreviated by [`Seq::repr`].
const REPR_MAX: usize = 60;
const REPR_HEAD: usize = 54;
const REPR_TAIL: usize = 3;

/// Window size used when hashing lazily backed content.
const HASH_CHUNK: usize = 1 << 20;

/// Source of content for a lazily backed [`Seq`].
///
/// A provider covers `[0, len())` in its own coordinates and must return
/// exactly `end - start` bytes for any `start <= end <= len()`.
pub trait RangeProvider: Send + Sync {
    /// Number of symbols the provider can produce.
    fn len(&self) -> usize;

    /// Whether the provider is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize `[start, end)` in provider coordinates.
    fn fetch(&self, start: usize, end: usize) -> Result<Vec<u8>>;
}

/// A sub-range of a lazy sequence mapped onto a provider.
///
/// Covers `[start, end)` in sequence coordinates; position `start` maps to
/// `offset` in the provider.
#[derive(Clone)]
pub struct LazySegment {
    start: usize,
    end: usize,
    offset: usize,
    provider: Arc<dyn RangeProvider>,
}

impl LazySegment {
    /// Map `range` (sequence coordinates) onto `provider` starting at `offset`.
    ///
    /// Fails if the provider cannot serve `range.len()` symbols from `offset`.
    pub fn new(
        range: Range<usize>,
        provider: Arc<dyn RangeProvider>,
        offset: usize,
    ) -> Result<Self> {
        if range.start > range.end {
            return Err(StrandError::InvalidInput(format!(
                "lazy segment [{}..{}) is reversed",
                range.start, range.end
            )));
        }
        let span = range.end - range.start;
        if offset.checked_add(span).filter(|&e| e <= provider.len()).is_none() {
            return Err(StrandError::InvalidInput(format!(
                "lazy segment needs {} symbols from provider offset {} but provider has length {}",
                span,
                offset,
                provider.len()
            )));
        }
        Ok(Self {
            start: range.start,
            end: range.end,
            offset,
            provider,
        })
    }

    /// Covered range in sequence coordinates.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Provider position of the first covered symbol.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn fetch(&self, lo: usize, hi: usize) -> Result<Vec<u8>> {
        let from = self.offset + (lo - self.start);
        let to = self.offset + (hi - self.start);
        let data = self.provider.fetch(from, to)?;
        if data.len() != hi - lo {
            return Err(StrandError::Other(format!(
                "provider returned {} bytes for a {}-byte range",
                data.len(),
                hi - lo
            )));
        }
        Ok(data)
    }

    /// The part of this segment inside `[start, end)`, rebased so that
    /// `start` becomes 0.
    fn clip(&self, start: usize, end: usize) -> Option<Self> {
        let lo = self.start.max(start);
        let hi = self.end.min(end);
        if lo >= hi {
            return None;
        }
        Some(Self {
            start: lo - start,
            end: hi - start,
            offset: self.offset + (lo - self.start),
            provider: Arc::clone(&self.provider),
        })
    }
}

impl fmt::Debug for LazySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazySegment")
            .field("range", &(self.start..self.end))
            .field("offset", &self.offset)
            .finish()
    }
}

#[derive(Clone)]
enum SeqData {
    Eager { buf: Arc<[u8]>, offset: usize },
    Lazy(Vec<LazySegment>),
    Undefined,
}

/// Which variant backs a [`Seq`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    Eager,
    Lazy,
    Undefined,
}

/// An immutable sequence with eager, lazy, or undefined content.
#[derive(Clone)]
pub struct Seq {
    data: SeqData,
    len: usize,
}

impl Seq {
    /// Create an eagerly backed sequence holding `bytes` as-is.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        let len = bytes.len();
        let buf: Arc<[u8]> = Arc::from(bytes);
        Self {
            data: SeqData::Eager { buf, offset: 0 },
            len,
        }
    }

    /// Create a sequence of known length and unknown content.
    pub fn undefined(len: usize) -> Self {
        Self {
            data: SeqData::Undefined,
            len,
        }
    }

    /// Create a lazily backed sequence from segments that tile `[0, len)`.
    ///
    /// Segments must be in ascending order, must not overlap, and must leave
    /// no gaps. Empty segments are dropped.
    pub fn lazy(len: usize, segments: Vec<LazySegment>) -> Result<Self> {
        let mut covered = 0;
        let mut kept = Vec::with_capacity(segments.len());
        for seg in segments {
            if seg.start == seg.end {
                continue;
            }
            if seg.start != covered {
                return Err(StrandError::InvalidInput(format!(
                    "lazy segments must tile [0..{}): segment [{}..{}) follows position {}",
                    len, seg.start, seg.end, covered
                )));
            }
            covered = seg.end;
            kept.push(seg);
        }
        if covered != len {
            return Err(StrandError::InvalidInput(format!(
                "lazy segments cover [0..{}) but the sequence has length {}",
                covered, len
            )));
        }
        Ok(Self {
            data: SeqData::Lazy(kept),
            len,
        })
    }

    /// Create a lazily backed sequence covering the whole of `provider`.
    pub fn from_provider(provider: Arc<dyn RangeProvider>) -> Self {
        let len = provider.len();
        let segments = if len == 0 {
            Vec::new()
        } else {
            vec![LazySegment {
                start: 0,
                end: len,
                offset: 0,
                provider,
            }]
        };
        Self {
            data: SeqData::Lazy(segments),
            len,
        }
    }

    /// Length in symbols. Defined for every backing.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the sequence has no symbols.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Which variant backs this sequence.
    pub fn backing(&self) -> Backing {
        match self.data {
            SeqData::Eager { .. } => Backing::Eager,
            SeqData::Lazy(_) => Backing::Lazy,
            SeqData::Undefined => Backing::Undefined,
        }
    }

    /// Whether content can be inspected.
    pub fn is_defined(&self) -> bool {
        !matches!(self.data, SeqData::Undefined)
    }

    /// Whether content is produced on demand.
    pub fn is_lazy(&self) -> bool {
        matches!(self.data, SeqData::Lazy(_))
    }

    /// Ranges whose content can be inspected, in ascending order.
    pub fn defined_ranges(&self) -> Vec<Range<usize>> {
        if self.is_defined() && self.len > 0 {
            vec![0..self.len]
        } else {
            Vec::new()
        }
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end || end > self.len {
            return Err(StrandError::Bounds {
                start,
                end,
                len: self.len,
            });
        }
        Ok(())
    }

    /// A new sequence over `[start, end)` sharing this one's backing.
    ///
    /// Never reads content.
    pub fn slice(&self, start: usize, end: usize) -> Result<Seq> {
        self.check_range(start, end)?;
        let len = end - start;
        let data = match &self.data {
            SeqData::Eager { buf, offset } => SeqData::Eager {
                buf: Arc::clone(buf),
                offset: offset + start,
            },
            SeqData::Lazy(segments) => {
                let first = segments.partition_point(|s| s.end <= start);
                let clipped = segments[first..]
                    .iter()
                    .take_while(|s| s.start < end)
                    .filter_map(|s| s.clip(start, end))
                    .collect();
                SeqData::Lazy(clipped)
            }
            SeqData::Undefined => SeqData::Undefined,
        };
        Ok(Seq { data, len })
    }

    /// The literal content of `[start, end)`.
    ///
    /// Eager content is borrowed; lazy content is fetched from the providers
    /// covering the window and concatenated in order. Fails with
    /// [`StrandError::UndefinedContent`] for undefined sequences, even for an
    /// empty window.
    pub fn materialize(&self, start: usize, end: usize) -> Result<Cow<'_, [u8]>> {
        self.check_range(start, end)?;
        match &self.data {
            SeqData::Eager { buf, offset } => Ok(Cow::Borrowed(&buf[offset + start..offset + end])),
            SeqData::Lazy(segments) => {
                if start == end {
                    return Ok(Cow::Borrowed(&[]));
                }
                let first = segments.partition_point(|s| s.end <= start);
                let mut out: Vec<u8> = Vec::new();
                let mut fetched = 0;
                for seg in segments[first..].iter().take_while(|s| s.start < end) {
                    let lo = seg.start.max(start);
                    let hi = seg.end.min(end);
                    let chunk = seg.fetch(lo, hi)?;
                    fetched += 1;
                    if out.is_empty() && lo == start && hi == end {
                        out = chunk;
                    } else {
                        out.reserve(end - start - out.len());
                        out.extend_from_slice(&chunk);
                    }
                }
                tracing::trace!(start, end, segments = fetched, "materialized lazy window");
                Ok(Cow::Owned(out))
            }
            SeqData::Undefined => Err(StrandError::UndefinedContent { len: self.len }),
        }
    }

    /// The full content as an owned buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.materialize(0, self.len)?.into_owned())
    }

    /// The full content as text. Non-UTF-8 bytes are replaced.
    pub fn to_text(&self) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.materialize(0, self.len)?).into_owned())
    }

    /// A printable representation, e.g. `Seq('ACGT')`.
    ///
    /// Long content is abbreviated to its head and tail, and only those two
    /// windows are materialized. Undefined sequences render their length
    /// instead of failing.
    pub fn repr(&self) -> Result<String> {
        if !self.is_defined() {
            return Ok(format!("Seq(None, length={})", self.len));
        }
        if self.len > REPR_MAX {
            let head = self.materialize(0, REPR_HEAD)?;
            let tail = self.materialize(self.len - REPR_TAIL, self.len)?;
            Ok(format!(
                "Seq('{}...{}')",
                String::from_utf8_lossy(&head),
                String::from_utf8_lossy(&tail)
            ))
        } else {
            Ok(format!("Seq('{}')", String::from_utf8_lossy(&self.materialize(0, self.len)?)))
        }
    }
}

impl From<Vec<u8>> for Seq {
    fn from(bytes: Vec<u8>) -> Self {
        Seq::new(bytes)
    }
}

impl From<&[u8]> for Seq {
    fn from(bytes: &[u8]) -> Self {
        Seq::new(bytes)
    }
}

impl From<&str> for Seq {
    fn from(text: &str) -> Self {
        Seq::new(text.as_bytes())
    }
}

impl From<String> for Seq {
    fn from(text: String) -> Self {
        Seq::new(text.into_bytes())
    }
}

impl ContentAddressable for Seq {
    fn content_hash(&self) -> Result<String> {
        let mut hasher = ContentHasher::new();
        let mut start = 0;
        loop {
            let end = (start + HASH_CHUNK).min(self.len);
            hasher.update(&self.materialize(start, end)?);
            if end == self.len {
                break;
            }
            start = end;
        }
        Ok(hasher.finish_hex())
    }
}

impl Summarizable for Seq {
    fn summary(&self) -> String {
        match &self.data {
            SeqData::Eager { buf, offset } => {
                let preview_len = self.len.min(20);
                let preview = String::from_utf8_lossy(&buf[*offset..offset + preview_len]);
                if self.len > 20 {
                    format!("sequence ({} bp): {}...", self.len, preview)
                } else {
                    format!("sequence ({} bp): {}", self.len, preview)
                }
            }
            SeqData::Lazy(segments) => {
                format!("lazy sequence ({} bp, {} segments)", self.len, segments.len())
            }
            SeqData::Undefined => format!("undefined sequence ({} bp)", self.len),
        }
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            SeqData::Eager { buf, offset } => {
                let bytes = &buf[*offset..offset + self.len];
                if self.len > REPR_MAX {
                    write!(
                        f,
                        "Seq(\"{}...{}\")",
                        String::from_utf8_lossy(&bytes[..REPR_HEAD]),
                        String::from_utf8_lossy(&bytes[self.len - REPR_TAIL..])
                    )
                } else {
                    write!(f, "Seq(\"{}\")", String::from_utf8_lossy(bytes))
                }
            }
            SeqData::Lazy(segments) => {
                write!(f, "Seq(<lazy>, length={}, segments={})", self.len, segments.len())
            }
            SeqData::Undefined => write!(f, "Seq(None, length={})", self.len),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Seq {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let text = self.to_text().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Seq {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Seq::from(s))
    }
}
