//! UCSC twoBit container reader.
//!
//! A twoBit file stores many nucleotide records packed at 2 bits per base,
//! plus per-record tables of unknown-base (`N`) blocks and soft-mask
//! (lower-case) blocks. The byte order is self-describing through the magic
//! number; every multi-byte field uses the detected order.
//!
//! ```text
//! header   magic u32 | version u32 | count u32 | reserved u32
//! index    count × (name_len u8 | name | offset u32)
//! record   dna_size u32
//!          n_count u32 | n_starts u32[n_count] | n_sizes u32[n_count]
//!          mask_count u32 | mask_starts u32[..] | mask_sizes u32[..]
//!          reserved u32
//!          packed bases, ceil(dna_size / 4) bytes
//! ```
//!
//! Opening reads the header and index only. Each record's header is read when
//! the record is requested, and its bases are decoded window by window when
//! the record's lazily backed [`Seq`] is materialized. Nothing decoded is
//! cached: repeated reads of a window re-read and re-decode it.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use strand_core::{Annotated, Result, StrandError};
use strand_seq::twobit::{packed_len, unpack_into};
use strand_seq::{RangeProvider, Seq};

/// twoBit magic number, as read in the file's own byte order.
pub const TWOBIT_MAGIC: u32 = 0x1A41_2743;

// ---------------------------------------------------------------------------
// Byte order
// ---------------------------------------------------------------------------

/// Byte order of a twoBit file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Detect the byte order from the first four bytes of a file.
    pub fn detect(magic: [u8; 4]) -> Result<Self> {
        if u32::from_le_bytes(magic) == TWOBIT_MAGIC {
            Ok(ByteOrder::Little)
        } else if u32::from_be_bytes(magic) == TWOBIT_MAGIC {
            Ok(ByteOrder::Big)
        } else {
            Err(StrandError::Format(format!(
                "not a twoBit file (magic {:02X}{:02X}{:02X}{:02X})",
                magic[0], magic[1], magic[2], magic[3]
            )))
        }
    }

    #[inline]
    fn u32(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => f.write_str("little"),
            ByteOrder::Big => f.write_str("big"),
        }
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Decoding options for a twoBit file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TwoBitOptions {
    /// Lower-case bases inside soft-mask blocks (default: true).
    pub soft_mask: bool,
    /// Symbol written for bases inside unknown-base blocks (default: `N`).
    pub unknown_base: u8,
}

impl Default for TwoBitOptions {
    fn default() -> Self {
        Self {
            soft_mask: true,
            unknown_base: b'N',
        }
    }
}

// ---------------------------------------------------------------------------
// Binary reading helpers
// ---------------------------------------------------------------------------

/// `read_exact`, with a short read reported as a truncated container.
fn read_exact_or_truncated<R: Read + ?Sized>(
    reader: &mut R,
    buf: &mut [u8],
    what: &str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            StrandError::Format(format!("truncated twoBit file: incomplete {}", what))
        } else {
            StrandError::Io(e)
        }
    })
}

fn read_u32<R: Read + ?Sized>(reader: &mut R, order: ByteOrder, what: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_exact_or_truncated(reader, &mut buf, what)?;
    Ok(order.u32(buf))
}

fn read_u32_array<R: Read + ?Sized>(
    reader: &mut R,
    order: ByteOrder,
    n: usize,
    what: &str,
) -> Result<Vec<u32>> {
    // Grow only as bytes arrive; a corrupt count must not drive the allocation.
    let want = n as u64 * 4;
    let mut buf = Vec::new();
    Read::take(&mut *reader, want).read_to_end(&mut buf)?;
    if (buf.len() as u64) < want {
        return Err(StrandError::Format(format!(
            "truncated twoBit file: incomplete {} ({} of {} bytes)",
            what,
            buf.len(),
            want
        )));
    }
    Ok(buf
        .chunks_exact(4)
        .map(|c| order.u32([c[0], c[1], c[2], c[3]]))
        .collect())
}

fn lock<R>(source: &Mutex<R>) -> Result<MutexGuard<'_, R>> {
    source
        .lock()
        .map_err(|_| StrandError::Other("twoBit source lock poisoned".into()))
}

// ---------------------------------------------------------------------------
// Block tables
// ---------------------------------------------------------------------------

/// Ascending, non-overlapping `[start, end)` ranges of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockList {
    starts: Vec<usize>,
    ends: Vec<usize>,
}

impl BlockList {
    /// Zip parallel start and size tables, checking order and bounds.
    fn from_tables(kind: &str, starts: Vec<u32>, sizes: Vec<u32>, dna_size: usize) -> Result<Self> {
        let mut list = BlockList {
            starts: Vec::with_capacity(starts.len()),
            ends: Vec::with_capacity(starts.len()),
        };
        let mut prev_end = 0;
        for (i, (&start, &size)) in starts.iter().zip(&sizes).enumerate() {
            let start = start as usize;
            let end = start + size as usize;
            if start < prev_end {
                return Err(StrandError::Format(format!(
                    "{} block {} at {} overlaps or precedes the previous block ending at {}",
                    kind, i, start, prev_end
                )));
            }
            if end > dna_size {
                return Err(StrandError::Format(format!(
                    "{} block {} [{}..{}) extends past the record length {}",
                    kind, i, start, end, dna_size
                )));
            }
            list.starts.push(start);
            list.ends.push(end);
            prev_end = end;
        }
        Ok(list)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// All blocks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.starts.iter().zip(&self.ends).map(|(&s, &e)| s..e)
    }

    /// Blocks intersecting `[start, end)`, clipped to it.
    ///
    /// Binary-searches for the first candidate, then walks forward only while
    /// blocks still begin before `end`.
    pub fn overlapping(&self, start: usize, end: usize) -> impl Iterator<Item = Range<usize>> + '_ {
        let first = self.ends.partition_point(|&e| e <= start);
        self.starts[first..]
            .iter()
            .zip(&self.ends[first..])
            .take_while(move |&(&s, _)| s < end)
            .filter_map(move |(&s, &e)| {
                let lo = s.max(start);
                let hi = e.min(end);
                (lo < hi).then_some(lo..hi)
            })
    }
}

// ---------------------------------------------------------------------------
// Record decoding
// ---------------------------------------------------------------------------

/// Per-record header: decoded length, block tables, and where the packed
/// bases start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    /// Decoded length in bases.
    pub dna_size: usize,
    /// File offset of the first packed byte.
    pub packed_offset: u64,
    /// Ranges decoded as the unknown base.
    pub n_blocks: BlockList,
    /// Ranges decoded in lower case.
    pub mask_blocks: BlockList,
}

impl RecordDescriptor {
    fn read<R: Read + Seek + ?Sized>(
        reader: &mut R,
        offset: u64,
        order: ByteOrder,
    ) -> Result<Self> {
        reader.seek(SeekFrom::Start(offset))?;
        let dna_size = read_u32(reader, order, "record header")? as usize;
        let n_blocks = Self::read_blocks(reader, order, dna_size, "unknown-base")?;
        let mask_blocks = Self::read_blocks(reader, order, dna_size, "soft-mask")?;
        read_u32(reader, order, "record header")?; // reserved
        let packed_offset = reader.stream_position()?;
        Ok(Self {
            dna_size,
            packed_offset,
            n_blocks,
            mask_blocks,
        })
    }

    fn read_blocks<R: Read + ?Sized>(
        reader: &mut R,
        order: ByteOrder,
        dna_size: usize,
        kind: &str,
    ) -> Result<BlockList> {
        let count = read_u32(reader, order, "block table")? as usize;
        // Non-empty blocks cannot outnumber the bases they cover.
        if count > dna_size {
            return Err(StrandError::Format(format!(
                "{} block count {} exceeds record length {}",
                kind, count, dna_size
            )));
        }
        let starts = read_u32_array(reader, order, count, "block table")?;
        let sizes = read_u32_array(reader, order, count, "block table")?;
        BlockList::from_tables(kind, starts, sizes, dna_size)
    }
}

/// Random-access decoder for one record, shared by every slice of its [`Seq`].
struct RecordDecoder<R> {
    source: Arc<Mutex<R>>,
    name: String,
    descriptor: Arc<RecordDescriptor>,
    options: TwoBitOptions,
}

impl<R: Read + Seek> RecordDecoder<R> {
    /// Decode bases `[start, end)`, reading only the packed bytes that hold them.
    fn decode(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        let desc = &*self.descriptor;
        if start > end || end > desc.dna_size {
            return Err(StrandError::Bounds {
                start,
                end,
                len: desc.dna_size,
            });
        }
        if start == end {
            return Ok(Vec::new());
        }

        let first_byte = start / 4;
        let mut packed = vec![0u8; packed_len(end) - first_byte];
        {
            let mut source = lock(&self.source)?;
            source.seek(SeekFrom::Start(desc.packed_offset + first_byte as u64))?;
            read_exact_or_truncated(&mut *source, &mut packed, "packed data")?;
        }

        let mut out = Vec::with_capacity(end - start);
        unpack_into(&packed, start % 4, end - start, &mut out)?;

        for block in desc.n_blocks.overlapping(start, end) {
            out[block.start - start..block.end - start].fill(self.options.unknown_base);
        }
        if self.options.soft_mask {
            for block in desc.mask_blocks.overlapping(start, end) {
                out[block.start - start..block.end - start].make_ascii_lowercase();
            }
        }

        tracing::trace!(
            record = %self.name,
            start,
            end,
            packed_bytes = packed.len(),
            "decoded twoBit window"
        );
        Ok(out)
    }
}

impl<R: Read + Seek + Send> RangeProvider for RecordDecoder<R> {
    fn len(&self) -> usize {
        self.descriptor.dna_size
    }

    fn fetch(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        self.decode(start, end)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A named record whose sequence is decoded on demand.
#[derive(Debug, Clone)]
pub struct TwoBitRecord {
    name: String,
    seq: Seq,
    descriptor: Arc<RecordDescriptor>,
}

impl TwoBitRecord {
    /// The lazily backed sequence, of the record's exact decoded length.
    pub fn seq(&self) -> &Seq {
        &self.seq
    }

    pub fn into_seq(self) -> Seq {
        self.seq
    }

    /// Decoded length in bases.
    pub fn len(&self) -> usize {
        self.descriptor.dna_size
    }

    pub fn is_empty(&self) -> bool {
        self.descriptor.dna_size == 0
    }

    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    pub fn n_blocks(&self) -> &BlockList {
        &self.descriptor.n_blocks
    }

    pub fn mask_blocks(&self) -> &BlockList {
        &self.descriptor.mask_blocks
    }
}

impl Annotated for TwoBitRecord {
    fn name(&self) -> &str {
        &self.name
    }
}

// ---------------------------------------------------------------------------
// Container
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct IndexEntry {
    name: String,
    offset: u64,
}

/// An open twoBit container.
///
/// The underlying reader is shared with every record sequence handed out and
/// is released when the last of them, and the container, are dropped.
pub struct TwoBitFile<R> {
    source: Arc<Mutex<R>>,
    byte_order: ByteOrder,
    version: u32,
    entries: Vec<IndexEntry>,
    name_to_idx: HashMap<String, usize>,
    options: TwoBitOptions,
}

impl TwoBitFile<BufReader<File>> {
    /// Open a twoBit file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, TwoBitOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: TwoBitOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            StrandError::Io(io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        Self::from_reader_with_options(BufReader::new(file), options)
    }
}

#[cfg(feature = "mmap")]
impl TwoBitFile<io::Cursor<strand_core::mmap::MappedFile>> {
    /// Open a twoBit file through a read-only memory mapping.
    pub fn open_mmap(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_mmap_with_options(path, TwoBitOptions::default())
    }

    pub fn open_mmap_with_options(path: impl AsRef<Path>, options: TwoBitOptions) -> Result<Self> {
        let mapped = strand_core::mmap::MappedFile::open(path)?;
        Self::from_reader_with_options(mapped.into_cursor(), options)
    }
}

impl<R: Read + Seek + Send + 'static> TwoBitFile<R> {
    /// Read the header and index from any seekable source.
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, TwoBitOptions::default())
    }

    pub fn from_reader_with_options(mut reader: R, options: TwoBitOptions) -> Result<Self> {
        reader.seek(SeekFrom::Start(0))?;
        let mut magic = [0u8; 4];
        read_exact_or_truncated(&mut reader, &mut magic, "header")?;
        let byte_order = ByteOrder::detect(magic)?;

        let version = read_u32(&mut reader, byte_order, "header")?;
        if version != 0 {
            return Err(StrandError::UnsupportedVersion { version });
        }
        let count = read_u32(&mut reader, byte_order, "header")? as usize;
        read_u32(&mut reader, byte_order, "header")?; // reserved

        let mut entries = Vec::new();
        let mut name_to_idx = HashMap::new();
        for i in 0..count {
            let mut name_len = [0u8; 1];
            read_exact_or_truncated(&mut reader, &mut name_len, "index")?;
            let mut name = vec![0u8; name_len[0] as usize];
            read_exact_or_truncated(&mut reader, &mut name, "index")?;
            let name = String::from_utf8(name).map_err(|_| {
                StrandError::Format(format!("index entry {} has a non-UTF-8 name", i))
            })?;
            let offset = read_u32(&mut reader, byte_order, "index")? as u64;
            if name_to_idx.insert(name.clone(), entries.len()).is_some() {
                return Err(StrandError::Format(format!(
                    "duplicate record name in index: {}",
                    name
                )));
            }
            entries.push(IndexEntry { name, offset });
        }

        tracing::debug!(%byte_order, version, records = count, "opened twoBit file");

        Ok(Self {
            source: Arc::new(Mutex::new(reader)),
            byte_order,
            version,
            entries,
            name_to_idx,
            options,
        })
    }

    /// Byte order detected from the magic number.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Format version (always 0 for files this reader accepts).
    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn options(&self) -> &TwoBitOptions {
        &self.options
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record names in file order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_idx.contains_key(name)
    }

    /// Read the header of the `i`-th record and wrap it in a lazy sequence.
    pub fn record_at(&self, i: usize) -> Result<TwoBitRecord> {
        let entry = self.entries.get(i).ok_or_else(|| {
            StrandError::InvalidInput(format!(
                "record index {} out of range for {} records",
                i,
                self.entries.len()
            ))
        })?;

        let descriptor = {
            let mut source = lock(&self.source)?;
            Arc::new(RecordDescriptor::read(&mut *source, entry.offset, self.byte_order)?)
        };
        tracing::debug!(
            record = %entry.name,
            length = descriptor.dna_size,
            n_blocks = descriptor.n_blocks.len(),
            mask_blocks = descriptor.mask_blocks.len(),
            "read twoBit record header"
        );

        let decoder: Arc<dyn RangeProvider> = Arc::new(RecordDecoder {
            source: Arc::clone(&self.source),
            name: entry.name.clone(),
            descriptor: Arc::clone(&descriptor),
            options: self.options.clone(),
        });
        Ok(TwoBitRecord {
            name: entry.name.clone(),
            seq: Seq::from_provider(decoder),
            descriptor,
        })
    }

    /// Look up a record by name.
    pub fn record(&self, name: &str) -> Result<TwoBitRecord> {
        let idx = *self
            .name_to_idx
            .get(name)
            .ok_or_else(|| StrandError::InvalidInput(format!("sequence not found: {}", name)))?;
        self.record_at(idx)
    }

    /// All records in file order.
    pub fn records(&self) -> Records<'_, R> {
        Records { file: self, next: 0 }
    }
}

impl<R> fmt::Debug for TwoBitFile<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoBitFile")
            .field("byte_order", &self.byte_order)
            .field("version", &self.version)
            .field("records", &self.entries.len())
            .finish()
    }
}

/// Iterator over the records of a [`TwoBitFile`], in file order.
pub struct Records<'a, R> {
    file: &'a TwoBitFile<R>,
    next: usize,
}

impl<'a, R: Read + Seek + Send + 'static> Iterator for Records<'a, R> {
    type Item = Result<TwoBitRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.file.len() {
            return None;
        }
        let record = self.file.record_at(self.next);
        self.next += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.file.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<'a, R: Read + Seek + Send + 'static> ExactSizeIterator for Records<'a, R> {}

impl<'a, R: Read + Seek + Send + 'static> IntoIterator for &'a TwoBitFile<R> {
    type Item = Result<TwoBitRecord>;
    type IntoIter = Records<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records()
    }
}
