//! String operations over any materializable sequence.
//!
//! [`SeqOps`] needs two primitives, a length and [`SeqOps::materialize`] over an
//! arbitrary window, and provides search, splitting, stripping, case folding,
//! nucleotide translations, repetition and joining on top of them. Every
//! provided method reads content only through `materialize`, so a sequence
//! whose content is undefined fails each of them with the same
//! [`StrandError::UndefinedContent`] error, and a lazily backed sequence only
//! reads the window a search actually needs.
//!
//! Search windows follow conventional string semantics: they are clamped to
//! the sequence length rather than rejected, and a window that starts past the
//! end (or ends before it starts) matches nothing except where noted.
//! Transforms are terminal with respect to laziness: they return eagerly
//! backed sequences.

use std::borrow::Cow;
use std::ops::{Bound, RangeBounds};

use bstr::ByteSlice;
use strand_core::{Result, StrandError};

use crate::content::ContentView;
use crate::nucleotide;
use crate::seq::Seq;

/// Bytes treated as whitespace by `split`/`strip` without explicit arguments.
const WHITESPACE: &[u8] = b" \t\n\r\x0b\x0c";

fn is_space(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

/// A search window resolved against a sequence length.
///
/// `start..end` is always a readable window; `valid` is false when the
/// requested window was empty by construction (start past the end, or end
/// before start).
struct Window {
    start: usize,
    end: usize,
    valid: bool,
}

impl Window {
    fn resolve(len: usize, bounds: impl RangeBounds<usize>) -> Self {
        let start = match bounds.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match bounds.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);
        let valid = start <= len && start <= end;
        let start = start.min(len);
        Window {
            start,
            end: end.max(start),
            valid,
        }
    }
}

fn split_whitespace(bytes: &[u8], maxsplit: Option<usize>) -> Vec<&[u8]> {
    let mut parts = Vec::new();
    let mut i = 0;
    loop {
        while i < bytes.len() && is_space(bytes[i]) {
            i += 1;
        }
        if i == bytes.len() {
            break;
        }
        if maxsplit == Some(parts.len()) {
            parts.push(&bytes[i..]);
            break;
        }
        let mut j = i;
        while j < bytes.len() && !is_space(bytes[j]) {
            j += 1;
        }
        parts.push(&bytes[i..j]);
        i = j;
    }
    parts
}

fn rsplit_whitespace(bytes: &[u8], maxsplit: Option<usize>) -> Vec<&[u8]> {
    let mut parts = Vec::new();
    let mut end = bytes.len();
    loop {
        while end > 0 && is_space(bytes[end - 1]) {
            end -= 1;
        }
        if end == 0 {
            break;
        }
        if maxsplit == Some(parts.len()) {
            parts.push(&bytes[..end]);
            break;
        }
        let mut start = end;
        while start > 0 && !is_space(bytes[start - 1]) {
            start -= 1;
        }
        parts.push(&bytes[start..end]);
        end = start;
    }
    parts.reverse();
    parts
}

fn strip_bounds(bytes: &[u8], chars: Option<&[u8]>, left: bool, right: bool) -> (usize, usize) {
    let strip = |b: u8| match chars {
        Some(set) => set.contains(&b),
        None => is_space(b),
    };
    let mut start = 0;
    let mut end = bytes.len();
    if left {
        while start < end && strip(bytes[start]) {
            start += 1;
        }
    }
    if right {
        while end > start && strip(bytes[end - 1]) {
            end -= 1;
        }
    }
    (start, end)
}

fn separator<P: ContentView + ?Sized>(sep: Option<&P>) -> Result<Option<Cow<'_, [u8]>>> {
    match sep {
        None => Ok(None),
        Some(sep) => {
            let sep = sep.content()?;
            if sep.is_empty() {
                return Err(StrandError::InvalidInput("empty separator".into()));
            }
            Ok(Some(sep))
        }
    }
}

fn to_seqs(parts: Vec<&[u8]>) -> Vec<Seq> {
    parts.into_iter().map(Seq::from).collect()
}

/// String operations defined on top of windowed materialization.
pub trait SeqOps {
    /// Length in symbols.
    fn length(&self) -> usize;

    /// Content of `[start, end)`.
    fn materialize(&self, start: usize, end: usize) -> Result<Cow<'_, [u8]>>;

    /// Full content.
    fn materialize_all(&self) -> Result<Cow<'_, [u8]>> {
        self.materialize(0, self.length())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Lowest position of `sub` within `window`, or `None`.
    fn find<P: ContentView + ?Sized>(
        &self,
        sub: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let w = Window::resolve(self.length(), window);
        let hay = self.materialize(w.start, w.end)?;
        let needle = sub.content()?;
        if !w.valid {
            return Ok(None);
        }
        Ok(hay.find(&*needle).map(|i| w.start + i))
    }

    /// Highest position of `sub` within `window`, or `None`.
    fn rfind<P: ContentView + ?Sized>(
        &self,
        sub: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<Option<usize>> {
        let w = Window::resolve(self.length(), window);
        let hay = self.materialize(w.start, w.end)?;
        let needle = sub.content()?;
        if !w.valid {
            return Ok(None);
        }
        Ok(hay.rfind(&*needle).map(|i| w.start + i))
    }

    /// Like [`find`](SeqOps::find), but absence is a [`StrandError::NotFound`].
    fn index<P: ContentView + ?Sized>(
        &self,
        sub: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<usize> {
        self.find(sub, window)?.ok_or_else(|| not_found(sub))
    }

    /// Like [`rfind`](SeqOps::rfind), but absence is a [`StrandError::NotFound`].
    fn rindex<P: ContentView + ?Sized>(
        &self,
        sub: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<usize> {
        self.rfind(sub, window)?.ok_or_else(|| not_found(sub))
    }

    /// Non-overlapping occurrences of `sub` within `window`.
    ///
    /// An empty `sub` matches at every position, `window.len() + 1` times.
    fn count<P: ContentView + ?Sized>(
        &self,
        sub: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<usize> {
        let w = Window::resolve(self.length(), window);
        let hay = self.materialize(w.start, w.end)?;
        let needle = sub.content()?;
        if !w.valid {
            return Ok(0);
        }
        Ok(hay.find_iter(&*needle).count())
    }

    /// Occurrences of `sub` within `window`, overlaps included.
    fn count_overlap<P: ContentView + ?Sized>(
        &self,
        sub: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<usize> {
        let w = Window::resolve(self.length(), window);
        let hay = self.materialize(w.start, w.end)?;
        let needle = sub.content()?;
        if !w.valid {
            return Ok(0);
        }
        if needle.is_empty() {
            return Ok(hay.len() + 1);
        }
        Ok(hay.windows(needle.len()).filter(|win| *win == &needle[..]).count())
    }

    /// Whether `window` begins with `prefix`.
    fn starts_with<P: ContentView + ?Sized>(
        &self,
        prefix: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let w = Window::resolve(self.length(), window);
        let needle = prefix.content()?;
        if !w.valid || w.end - w.start < needle.len() {
            // Still inspect content so undefined sequences fail uniformly.
            self.materialize(w.start, w.start)?;
            return Ok(false);
        }
        let head = self.materialize(w.start, w.start + needle.len())?;
        Ok(head[..] == needle[..])
    }

    /// Whether `window` ends with `suffix`.
    fn ends_with<P: ContentView + ?Sized>(
        &self,
        suffix: &P,
        window: impl RangeBounds<usize>,
    ) -> Result<bool> {
        let w = Window::resolve(self.length(), window);
        let needle = suffix.content()?;
        if !w.valid || w.end - w.start < needle.len() {
            self.materialize(w.end, w.end)?;
            return Ok(false);
        }
        let tail = self.materialize(w.end - needle.len(), w.end)?;
        Ok(tail[..] == needle[..])
    }

    /// Whether `sub` occurs anywhere.
    fn contains<P: ContentView + ?Sized>(&self, sub: &P) -> Result<bool> {
        Ok(self.find(sub, ..)?.is_some())
    }

    // -----------------------------------------------------------------------
    // Transforms
    // -----------------------------------------------------------------------

    fn upper(&self) -> Result<Seq> {
        Ok(Seq::new(self.materialize_all()?.to_ascii_uppercase()))
    }

    fn lower(&self) -> Result<Seq> {
        Ok(Seq::new(self.materialize_all()?.to_ascii_lowercase()))
    }

    /// Remove leading and trailing bytes found in `chars` (whitespace if `None`).
    fn strip<P: ContentView + ?Sized>(&self, chars: Option<&P>) -> Result<Seq> {
        let data = self.materialize_all()?;
        let chars = chars.map(|c| c.content()).transpose()?;
        let (start, end) = strip_bounds(&data, chars.as_deref(), true, true);
        Ok(Seq::from(&data[start..end]))
    }

    fn lstrip<P: ContentView + ?Sized>(&self, chars: Option<&P>) -> Result<Seq> {
        let data = self.materialize_all()?;
        let chars = chars.map(|c| c.content()).transpose()?;
        let (start, end) = strip_bounds(&data, chars.as_deref(), true, false);
        Ok(Seq::from(&data[start..end]))
    }

    fn rstrip<P: ContentView + ?Sized>(&self, chars: Option<&P>) -> Result<Seq> {
        let data = self.materialize_all()?;
        let chars = chars.map(|c| c.content()).transpose()?;
        let (start, end) = strip_bounds(&data, chars.as_deref(), false, true);
        Ok(Seq::from(&data[start..end]))
    }

    /// Split on `sep`, at most `maxsplit` times, from the left.
    ///
    /// Without a separator, runs of whitespace separate the pieces and empty
    /// pieces are dropped. An empty separator is invalid.
    fn split<P: ContentView + ?Sized>(
        &self,
        sep: Option<&P>,
        maxsplit: Option<usize>,
    ) -> Result<Vec<Seq>> {
        let data = self.materialize_all()?;
        let parts = match separator(sep)? {
            None => to_seqs(split_whitespace(&data, maxsplit)),
            Some(sep) => match maxsplit {
                Some(n) => to_seqs(data.splitn_str(n.saturating_add(1), &*sep).collect()),
                None => to_seqs(data.split_str(&*sep).collect()),
            },
        };
        Ok(parts)
    }

    /// Split on `sep`, at most `maxsplit` times, from the right.
    fn rsplit<P: ContentView + ?Sized>(
        &self,
        sep: Option<&P>,
        maxsplit: Option<usize>,
    ) -> Result<Vec<Seq>> {
        let data = self.materialize_all()?;
        let parts = match separator(sep)? {
            None => to_seqs(rsplit_whitespace(&data, maxsplit)),
            Some(sep) => {
                let mut parts: Vec<&[u8]> = match maxsplit {
                    Some(n) => data.rsplitn_str(n.saturating_add(1), &*sep).collect(),
                    None => data.rsplit_str(&*sep).collect(),
                };
                parts.reverse();
                to_seqs(parts)
            }
        };
        Ok(parts)
    }

    /// Replace every non-overlapping occurrence of `old` with `new`.
    fn replace<O, N>(&self, old: &O, new: &N) -> Result<Seq>
    where
        O: ContentView + ?Sized,
        N: ContentView + ?Sized,
    {
        let data = self.materialize_all()?;
        let old = old.content()?;
        let new = new.content()?;
        Ok(Seq::new(data.replace(&*old, &*new)))
    }

    fn complement(&self) -> Result<Seq> {
        Ok(Seq::new(nucleotide::complement(&self.materialize_all()?)))
    }

    fn reverse_complement(&self) -> Result<Seq> {
        Ok(Seq::new(nucleotide::reverse_complement(&self.materialize_all()?)))
    }

    /// DNA to RNA.
    fn transcribe(&self) -> Result<Seq> {
        Ok(Seq::new(nucleotide::transcribe(&self.materialize_all()?)))
    }

    /// RNA to DNA.
    fn back_transcribe(&self) -> Result<Seq> {
        Ok(Seq::new(nucleotide::back_transcribe(&self.materialize_all()?)))
    }

    // -----------------------------------------------------------------------
    // Concatenation
    // -----------------------------------------------------------------------

    /// This content followed by `other`'s.
    fn concat<P: ContentView + ?Sized>(&self, other: &P) -> Result<Seq> {
        let left = self.materialize_all()?;
        let right = other.content()?;
        let mut out = Vec::with_capacity(left.len() + right.len());
        out.extend_from_slice(&left);
        out.extend_from_slice(&right);
        Ok(Seq::new(out))
    }

    /// This content repeated `n` times.
    fn repeat(&self, n: usize) -> Result<Seq> {
        Ok(Seq::new(self.materialize_all()?.repeat(n)))
    }

    /// `items` joined with this content as the separator.
    fn join<I>(&self, items: I) -> Result<Seq>
    where
        I: IntoIterator,
        I::Item: ContentView,
    {
        let sep = self.materialize_all()?;
        let mut out = Vec::new();
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(&sep);
            }
            out.extend_from_slice(&item.content()?);
        }
        Ok(Seq::new(out))
    }
}

fn not_found<P: ContentView + ?Sized>(sub: &P) -> StrandError {
    match sub.content() {
        Ok(pattern) => StrandError::NotFound(format!(
            "subsequence '{}' not found",
            String::from_utf8_lossy(&pattern)
        )),
        Err(e) => e,
    }
}

impl SeqOps for Seq {
    fn length(&self) -> usize {
        self.len()
    }

    fn materialize(&self, start: usize, end: usize) -> Result<Cow<'_, [u8]>> {
        Seq::materialize(self, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentCompare;
    use crate::seq::test_helpers::{lazy_from, CountingProvider};
    use std::sync::Arc;

    // First record of the reference fixture, truncated.
    const TEXT: &[u8] = b"GTATACCCCTGGGAAACTTTTACCGGCACGCACCGCCTCTGAATCTGCACCG";

    fn pair() -> (Seq, Seq) {
        (lazy_from(TEXT, &[7, 8, 30]), Seq::from(TEXT))
    }

    fn bytes(seqs: Vec<Seq>) -> Vec<Vec<u8>> {
        seqs.iter().map(|s| s.to_bytes().unwrap()).collect()
    }

    #[test]
    fn find_matches_reference_for_windows() {
        let (lazy, eager) = pair();
        assert_eq!(lazy.find("CT", ..).unwrap(), eager.find("CT", ..).unwrap());
        assert_eq!(lazy.find("CT", ..).unwrap(), Some(8));
        assert_eq!(lazy.find("CT", 20..).unwrap(), Some(36));
        assert_eq!(lazy.find("CT", 20..35).unwrap(), None);
        assert_eq!(lazy.find("CT", ..9).unwrap(), None);
        assert_eq!(lazy.find("CT", ..10).unwrap(), Some(8));
        assert_eq!(lazy.find("CT", 100..).unwrap(), None);
    }

    #[test]
    fn rfind_matches_reference() {
        let (lazy, eager) = pair();
        assert_eq!(lazy.rfind("CT", ..).unwrap(), eager.rfind("CT", ..).unwrap());
        assert_eq!(lazy.rfind("CT", ..).unwrap(), Some(44));
        assert_eq!(lazy.rfind("CT", ..30).unwrap(), Some(16));
        assert_eq!(lazy.rfind("CT", 45..).unwrap(), None);
    }

    #[test]
    fn empty_pattern_positions() {
        let seq = Seq::from("ACGT");
        assert_eq!(seq.find("", ..).unwrap(), Some(0));
        assert_eq!(seq.find("", 2..).unwrap(), Some(2));
        assert_eq!(seq.rfind("", ..).unwrap(), Some(4));
        assert_eq!(seq.find("", 4..).unwrap(), Some(4));
        assert_eq!(seq.find("", 5..).unwrap(), None);
        assert_eq!(seq.count("", ..).unwrap(), 5);
        assert_eq!(seq.count("", 3..1).unwrap(), 0);
    }

    #[test]
    fn index_fails_when_absent() {
        let (lazy, eager) = pair();
        assert_eq!(lazy.index("CT", ..).unwrap(), eager.index("CT", ..).unwrap());
        assert_eq!(lazy.index("CT", ..100).unwrap(), 8);
        for seq in [&lazy, &eager] {
            assert!(matches!(seq.index("CT", 20..30), Err(StrandError::NotFound(_))));
            assert!(matches!(seq.rindex("CT", 45..), Err(StrandError::NotFound(_))));
            assert!(matches!(seq.index("ACGTACGT", ..), Err(StrandError::NotFound(_))));
        }
        assert_eq!(lazy.rindex("CT", ..).unwrap(), 44);
    }

    #[test]
    fn count_is_non_overlapping() {
        let seq = lazy_from(b"AAAAA", &[2]);
        assert_eq!(seq.count("AA", ..).unwrap(), 2);
        assert_eq!(seq.count_overlap("AA", ..).unwrap(), 4);
        assert_eq!(seq.count_overlap("AA", 1..4).unwrap(), 2);

        let (lazy, eager) = pair();
        assert_eq!(lazy.count("CT", ..).unwrap(), eager.count("CT", ..).unwrap());
        assert_eq!(lazy.count("CT", 20..).unwrap(), eager.count("CT", 20..).unwrap());
        assert_eq!(lazy.count("CC", 5..30).unwrap(), eager.count("CC", 5..30).unwrap());
    }

    #[test]
    fn prefix_and_suffix_windows() {
        let (lazy, _) = pair();
        assert!(lazy.starts_with("GTAT", ..).unwrap());
        assert!(lazy.starts_with("TGGG", 9..).unwrap());
        assert!(lazy.starts_with("TGGG", 9..13).unwrap());
        assert!(!lazy.starts_with("TGGG", 9..11).unwrap());
        assert!(lazy.ends_with("CACCG", ..).unwrap());
        assert!(lazy.ends_with("GCAC", 46..50).unwrap());
        assert!(lazy.ends_with("GCAC", ..50).unwrap());
        assert!(!lazy.ends_with("GCAC", 47..50).unwrap());
        assert!(!lazy.starts_with("G", 60..).unwrap());
    }

    #[test]
    fn search_reads_only_the_window() {
        let provider = CountingProvider::new(TEXT);
        let seq = Seq::from_provider(provider.clone());
        assert!(seq.starts_with("TGGG", 9..).unwrap());
        assert_eq!(provider.fetched(), 4);
        seq.find("AAA", 10..20).unwrap();
        assert_eq!(provider.fetched(), 14);
    }

    #[test]
    fn contains_pattern() {
        let (lazy, eager) = pair();
        for seq in [&lazy, &eager] {
            assert!(seq.contains("ACCCCT").unwrap());
            assert!(!seq.contains("ACGTACGT").unwrap());
            assert!(seq.contains(&Seq::from("GGCAC")).unwrap());
        }
    }

    #[test]
    fn split_with_separator() {
        let (lazy, eager) = pair();
        assert_eq!(
            bytes(lazy.split(Some("C"), None).unwrap()),
            bytes(eager.split(Some("C"), None).unwrap())
        );
        let parts = bytes(lazy.split(Some("C"), Some(1)).unwrap());
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], b"GTATA");
        assert_eq!(parts[1], &TEXT[6..]);

        let parts = bytes(Seq::from("ACCA").split(Some("C"), None).unwrap());
        assert_eq!(parts, vec![b"A".to_vec(), Vec::new(), b"A".to_vec()]);
    }

    #[test]
    fn rsplit_with_separator() {
        let parts = bytes(lazy_from(b"A,B,C", &[2]).rsplit(Some(","), Some(1)).unwrap());
        assert_eq!(parts, vec![b"A,B".to_vec(), b"C".to_vec()]);
        let (lazy, eager) = pair();
        assert_eq!(
            bytes(lazy.rsplit(Some("C"), Some(1)).unwrap()),
            bytes(eager.rsplit(Some("C"), Some(1)).unwrap())
        );
    }

    #[test]
    fn split_on_whitespace() {
        let seq = Seq::from("  AC GT\t\nNN  ");
        assert_eq!(
            bytes(seq.split::<str>(None, None).unwrap()),
            vec![b"AC".to_vec(), b"GT".to_vec(), b"NN".to_vec()]
        );
        assert_eq!(
            bytes(seq.split::<str>(None, Some(1)).unwrap()),
            vec![b"AC".to_vec(), b"GT\t\nNN  ".to_vec()]
        );
        assert_eq!(
            bytes(seq.rsplit::<str>(None, Some(1)).unwrap()),
            vec![b"  AC GT".to_vec(), b"NN".to_vec()]
        );
        let (lazy, _) = pair();
        assert_eq!(bytes(lazy.split::<str>(None, None).unwrap()), vec![TEXT.to_vec()]);
        assert!(Seq::from("   ").split::<str>(None, None).unwrap().is_empty());
    }

    #[test]
    fn empty_separator_is_invalid() {
        let seq = Seq::from("ACGT");
        assert!(matches!(seq.split(Some(""), None), Err(StrandError::InvalidInput(_))));
        assert!(matches!(seq.rsplit(Some(""), None), Err(StrandError::InvalidInput(_))));
    }

    #[test]
    fn strip_family() {
        let seq = lazy_from(b"GGACGTGG", &[1, 6]);
        assert_eq!(seq.strip(Some("G")).unwrap().to_bytes().unwrap(), b"ACGT");
        assert_eq!(seq.lstrip(Some("G")).unwrap().to_bytes().unwrap(), b"ACGTGG");
        assert_eq!(seq.rstrip(Some("G")).unwrap().to_bytes().unwrap(), b"GGACGT");
        assert_eq!(Seq::from(" AC \n").strip(None::<&str>).unwrap().to_bytes().unwrap(), b"AC");
        assert!(Seq::from("GGG").strip(Some("G")).unwrap().is_empty());
        assert_eq!(seq.strip(Some(&Seq::from("G"))).unwrap().to_bytes().unwrap(), b"ACGT");
    }

    #[test]
    fn case_and_translation() {
        let seq = lazy_from(b"ACgtNn", &[3]);
        assert_eq!(seq.upper().unwrap().to_bytes().unwrap(), b"ACGTNN");
        assert_eq!(seq.lower().unwrap().to_bytes().unwrap(), b"acgtnn");
        assert_eq!(seq.complement().unwrap().to_bytes().unwrap(), b"TGcaNn");
        assert_eq!(seq.reverse_complement().unwrap().to_bytes().unwrap(), b"nNacGT");
        assert_eq!(seq.transcribe().unwrap().to_bytes().unwrap(), b"ACguNn");
        assert_eq!(
            seq.transcribe().unwrap().back_transcribe().unwrap().to_bytes().unwrap(),
            b"ACgtNn"
        );
        assert!(!seq.upper().unwrap().is_lazy());
    }

    #[test]
    fn replace_occurrences() {
        let seq = lazy_from(b"ACGTACGT", &[4]);
        assert_eq!(seq.replace("CG", "--").unwrap().to_bytes().unwrap(), b"A--TA--T");
        assert_eq!(seq.replace("X", "Y").unwrap().to_bytes().unwrap(), b"ACGTACGT");
    }

    #[test]
    fn concat_repeat_join() {
        let (lazy, eager) = pair();
        assert!(lazy.concat("ABCD").unwrap().try_eq(&eager.concat("ABCD").unwrap()).unwrap());
        let twice = lazy.repeat(2).unwrap();
        assert_eq!(twice.len(), 2 * TEXT.len());
        assert!(twice.try_eq(&eager.repeat(2).unwrap()).unwrap());
        assert!(lazy.repeat(0).unwrap().is_empty());

        let joined = Seq::from("NN").join(["AC", "GT", "TT"]).unwrap();
        assert_eq!(joined.to_bytes().unwrap(), b"ACNNGTNNTT");
        let joined = Seq::from("-").join([&lazy_from(b"AC", &[1]), &Seq::from("G")]).unwrap();
        assert_eq!(joined.to_bytes().unwrap(), b"AC-G");
    }

    #[test]
    fn undefined_fails_every_operation() {
        let seq = Seq::undefined(52);
        let checks: Vec<StrandError> = vec![
            seq.find("CT", ..).unwrap_err(),
            seq.find("CT", 100..).unwrap_err(),
            seq.rfind("CT", ..).unwrap_err(),
            seq.index("CT", ..).unwrap_err(),
            seq.rindex("CT", ..).unwrap_err(),
            seq.count("CT", ..).unwrap_err(),
            seq.count_overlap("CT", ..).unwrap_err(),
            seq.starts_with("GTAT", ..).unwrap_err(),
            seq.starts_with("GTAT", 60..).unwrap_err(),
            seq.ends_with("ACCG", ..).unwrap_err(),
            seq.contains("A").unwrap_err(),
            seq.upper().unwrap_err(),
            seq.lower().unwrap_err(),
            seq.strip(None::<&str>).unwrap_err(),
            seq.split(Some("C"), None).unwrap_err(),
            seq.rsplit::<str>(None, None).unwrap_err(),
            seq.replace("A", "T").unwrap_err(),
            seq.complement().unwrap_err(),
            seq.reverse_complement().unwrap_err(),
            seq.transcribe().unwrap_err(),
            seq.concat("AC").unwrap_err(),
            seq.repeat(2).unwrap_err(),
            Seq::from("AC").concat(&seq).unwrap_err(),
            Seq::from("AC").find(&seq, ..).unwrap_err(),
        ];
        for err in checks {
            assert!(err.is_undefined_content(), "unexpected error: {}", err);
        }
    }

    #[test]
    fn provider_errors_propagate() {
        struct Failing;
        impl crate::seq::RangeProvider for Failing {
            fn len(&self) -> usize {
                4
            }
            fn fetch(&self, _start: usize, _end: usize) -> Result<Vec<u8>> {
                Err(StrandError::Format("truncated packed data".into()))
            }
        }
        let seq = Seq::from_provider(Arc::new(Failing));
        assert!(matches!(seq.find("A", ..), Err(StrandError::Format(_))));
        assert!(matches!(seq.upper(), Err(StrandError::Format(_))));
    }
}
