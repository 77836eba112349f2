//! Content views and content-based comparison.
//!
//! [`ContentView`] is the narrow capability that makes a value comparable to a
//! [`Seq`]: anything that can present its content as a byte slice. Plain byte
//! and string types always succeed; a [`Seq`] materializes its full content and
//! so fails for undefined sequences.
//!
//! [`ContentCompare`] is implemented for every [`ContentView`], so comparisons
//! read the same in both operand orders (`seq.try_lt("TT")` and
//! `"AA".try_lt(&seq)`) and fail the same way when either side is undefined.
//! There is no shortcut on length: an undefined operand fails equality even
//! when the lengths already differ.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use strand_core::Result;

use crate::seq::Seq;

/// A value whose content can be viewed as bytes.
pub trait ContentView {
    /// The full content.
    fn content(&self) -> Result<Cow<'_, [u8]>>;
}

impl ContentView for [u8] {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<const N: usize> ContentView for [u8; N] {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl ContentView for Vec<u8> {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl ContentView for str {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

impl ContentView for String {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        Ok(Cow::Borrowed(self.as_bytes()))
    }
}

impl ContentView for Seq {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        self.materialize(0, self.len())
    }
}

impl<T: ContentView + ?Sized> ContentView for &T {
    fn content(&self) -> Result<Cow<'_, [u8]>> {
        (**self).content()
    }
}

/// Fallible, content-based comparison and hashing.
///
/// Ordering is lexicographic over bytes, with a proper prefix ordered first.
pub trait ContentCompare: ContentView {
    fn try_cmp<O: ContentView + ?Sized>(&self, other: &O) -> Result<Ordering> {
        let lhs = self.content()?;
        let rhs = other.content()?;
        Ok(lhs[..].cmp(&rhs[..]))
    }

    fn try_eq<O: ContentView + ?Sized>(&self, other: &O) -> Result<bool> {
        let lhs = self.content()?;
        let rhs = other.content()?;
        Ok(lhs == rhs)
    }

    fn try_ne<O: ContentView + ?Sized>(&self, other: &O) -> Result<bool> {
        Ok(!self.try_eq(other)?)
    }

    fn try_lt<O: ContentView + ?Sized>(&self, other: &O) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Less)
    }

    fn try_le<O: ContentView + ?Sized>(&self, other: &O) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Greater)
    }

    fn try_gt<O: ContentView + ?Sized>(&self, other: &O) -> Result<bool> {
        Ok(self.try_cmp(other)? == Ordering::Greater)
    }

    fn try_ge<O: ContentView + ?Sized>(&self, other: &O) -> Result<bool> {
        Ok(self.try_cmp(other)? != Ordering::Less)
    }

    /// Feed the content into `state`.
    ///
    /// Values with equal content hash equal regardless of their type or
    /// backing, matching a plain `<[u8] as Hash>::hash` of the same bytes.
    fn try_hash<H: Hasher>(&self, state: &mut H) -> Result<()> {
        self.content()?[..].hash(state);
        Ok(())
    }
}

impl<T: ContentView + ?Sized> ContentCompare for T {}

/// Concatenate two values into an eagerly backed sequence.
///
/// Covers both `seq + text` and `text + seq`.
pub fn concat<A, B>(lhs: &A, rhs: &B) -> Result<Seq>
where
    A: ContentView + ?Sized,
    B: ContentView + ?Sized,
{
    let left = lhs.content()?;
    let right = rhs.content()?;
    let mut out = Vec::with_capacity(left.len() + right.len());
    out.extend_from_slice(&left);
    out.extend_from_slice(&right);
    Ok(Seq::new(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seq::test_helpers::lazy_from;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of<T: ContentView + ?Sized>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.try_hash(&mut hasher).unwrap();
        hasher.finish()
    }

    #[test]
    fn ordering_against_plain_values() {
        let seq = lazy_from(b"GTATACCCCT", &[4]);
        assert!(seq.try_lt("TT").unwrap());
        assert!("AA".try_lt(&seq).unwrap());
        assert!(b"AA".try_lt(&seq).unwrap());
        assert!(seq.try_gt(&b"GC".to_vec()).unwrap());
        assert!(seq.try_ge(&Seq::from("GC")).unwrap());
        assert!(Seq::from("GTAT").try_le(&seq).unwrap());
    }

    #[test]
    fn prefix_orders_first() {
        let seq = Seq::from("ACG");
        assert_eq!(seq.try_cmp("ACGT").unwrap(), Ordering::Less);
        assert_eq!("ACGT".try_cmp(&seq).unwrap(), Ordering::Greater);
        assert_eq!(seq.try_cmp("ACG").unwrap(), Ordering::Equal);
    }

    #[test]
    fn equality_across_backings() {
        let lazy = lazy_from(b"ACGTACGT", &[1, 5]);
        let eager = Seq::from("ACGTACGT");
        assert!(lazy.try_eq(&eager).unwrap());
        assert!(eager.try_eq(&lazy).unwrap());
        assert!(lazy.try_eq("ACGTACGT").unwrap());
        assert!(lazy.try_ne("ACGTACGA").unwrap());
        assert!(lazy.try_ne("ACG").unwrap());
    }

    #[test]
    fn undefined_fails_every_comparison_in_both_orders() {
        let defined = lazy_from(b"ACGTACGT", &[3]);
        for undefined in [Seq::undefined(8), Seq::undefined(10), Seq::undefined(0)] {
            let checks: Vec<Result<bool>> = vec![
                defined.try_eq(&undefined),
                defined.try_ne(&undefined),
                defined.try_lt(&undefined),
                defined.try_le(&undefined),
                defined.try_gt(&undefined),
                defined.try_ge(&undefined),
                undefined.try_eq(&defined),
                undefined.try_ne(&defined),
                undefined.try_lt(&defined),
                undefined.try_le(&defined),
                undefined.try_gt(&defined),
                undefined.try_ge(&defined),
                "ACGT".try_eq(&undefined),
                undefined.try_ne("ACGT"),
            ];
            for result in checks {
                assert!(result.unwrap_err().is_undefined_content());
            }
        }
    }

    #[test]
    fn hash_matches_plain_bytes() {
        let lazy = lazy_from(b"GATTACA", &[2]);
        assert_eq!(hash_of(&lazy), hash_of(b"GATTACA".as_slice()));
        assert_eq!(hash_of(&lazy), hash_of("GATTACA"));
        assert_eq!(hash_of(&lazy), hash_of(&Seq::from("GATTACA")));

        let mut hasher = DefaultHasher::new();
        let err = Seq::undefined(7).try_hash(&mut hasher).unwrap_err();
        assert!(err.is_undefined_content());
    }

    #[test]
    fn concat_either_order() {
        let lazy = lazy_from(b"ACGT", &[2]);
        assert_eq!(concat(&lazy, "NN").unwrap().to_bytes().unwrap(), b"ACGTNN");
        assert_eq!(concat("NN", &lazy).unwrap().to_bytes().unwrap(), b"NNACGT");
        assert!(concat(&lazy, &Seq::undefined(2)).is_err());
    }

    #[test]
    fn concat_identity_and_associativity() {
        let a = lazy_from(b"AC", &[1]);
        let b = Seq::from("GT");
        let c = lazy_from(b"TTG", &[]);
        let empty = Seq::from("");

        assert!(concat(&a, &empty).unwrap().try_eq(&a).unwrap());
        assert!(concat(&empty, &a).unwrap().try_eq(&a).unwrap());

        let left = concat(&concat(&a, &b).unwrap(), &c).unwrap();
        let right = concat(&a, &concat(&b, &c).unwrap()).unwrap();
        assert!(left.try_eq(&right).unwrap());
    }
}
