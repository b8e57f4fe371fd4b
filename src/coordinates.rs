//! Reference coordinates and intervals.
//!
//! A [`Coord`] names a single base on one strand of one reference sequence:
//! a reference id, a 0-based offset and an orientation (forward = Watson).
//! An [`Interval`] is a half-open span `[off, off + len)` anchored at an
//! upstream `Coord`.
//!
//! ## Validity
//!
//! A default-constructed `Coord` carries the all-bits-set sentinel in both the
//! reference id and the offset and is *invalid*. Reading the strand of an
//! invalid coordinate, or comparing one, is a programming error and panics.
//!
//! ## Ordering
//!
//! Coordinates sort by reference id, then offset, then strand (forward before
//! reverse). Intervals sort by upstream coordinate, then by length.

use std::cmp::Ordering;
use std::fmt;

use crate::error::PeError;

/// Reference sequence identifier
pub type RefId = u64;
/// 0-based offset into a reference sequence
pub type RefOff = i64;

const INVALID_REF: RefId = RefId::MAX;
const INVALID_OFF: RefOff = RefOff::MAX;

/// A position on one strand of a reference sequence.
#[derive(Debug, Clone, Copy)]
pub struct Coord {
    ref_id: RefId,
    off: RefOff,
    fw: bool,
}

impl Default for Coord {
    fn default() -> Self {
        Self {
            ref_id: INVALID_REF,
            off: INVALID_OFF,
            fw: true,
        }
    }
}

impl Coord {
    pub fn new(ref_id: RefId, off: RefOff, fw: bool) -> Self {
        Self { ref_id, off, fw }
    }

    pub fn init(&mut self, ref_id: RefId, off: RefOff, fw: bool) {
        self.ref_id = ref_id;
        self.off = off;
        self.fw = fw;
    }

    /// Reset to the sentinel state; `valid()` is false afterwards.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    /// True iff both the reference id and the offset have been set since the
    /// last `invalidate()`.
    #[inline]
    pub fn valid(&self) -> bool {
        self.ref_id != INVALID_REF && self.off != INVALID_OFF
    }

    /// Strand of the coordinate (true = forward/Watson).
    ///
    /// Panics if the coordinate is invalid.
    #[inline]
    pub fn fw(&self) -> bool {
        assert!(self.valid(), "strand of an invalid coordinate");
        self.fw
    }

    #[inline]
    pub fn ref_id(&self) -> RefId {
        self.ref_id
    }

    #[inline]
    pub fn off(&self) -> RefOff {
        self.off
    }

    /// True iff a span of `len` bases starting here fits inside
    /// `[begin, end)`.
    #[inline]
    pub fn within(&self, len: i64, begin: RefOff, end: RefOff) -> bool {
        self.off >= begin && self.off.checked_add(len).is_some_and(|e| e <= end)
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        assert!(
            self.valid() && other.valid(),
            "comparing an invalid coordinate"
        );
        self.ref_id == other.ref_id && self.off == other.off && self.fw == other.fw
    }
}

impl Eq for Coord {}

impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        assert!(
            self.valid() && other.valid(),
            "comparing an invalid coordinate"
        );
        self.ref_id
            .cmp(&other.ref_id)
            .then(self.off.cmp(&other.off))
            // forward sorts before reverse
            .then(other.fw.cmp(&self.fw))
    }
}

impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid() {
            return write!(f, "*");
        }
        let strand = if self.fw { '+' } else { '-' };
        write!(f, "{}:{}{}", self.ref_id, self.off, strand)
    }
}

/// A half-open reference span `[upstream.off(), upstream.off() + len)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interval {
    upstream: Coord,
    len: RefOff,
}

impl Interval {
    pub fn new(upstream: Coord, len: RefOff) -> Self {
        Self { upstream, len }
    }

    /// Interval between two offsets on the same reference. The smaller offset
    /// becomes the (forward) upstream end and the length is the distance
    /// between them.
    pub fn spanning(
        id1: RefId,
        id2: RefId,
        off1: RefOff,
        off2: RefOff,
    ) -> Result<Self, PeError> {
        if id1 != id2 {
            return Err(PeError::ConstraintViolation(format!(
                "interval endpoints on different references ({} vs {})",
                id1, id2
            )));
        }
        let upstream = off1.min(off2);
        let downstream = off1.max(off2);
        Ok(Self::new(Coord::new(id1, upstream, true), downstream - upstream))
    }

    pub fn init(&mut self, upstream: Coord, len: RefOff) {
        self.upstream = upstream;
        self.len = len;
    }

    pub fn invalidate(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn valid(&self) -> bool {
        self.upstream.valid() && self.len > 0
    }

    #[inline]
    pub fn upstream(&self) -> &Coord {
        &self.upstream
    }

    #[inline]
    pub fn len(&self) -> RefOff {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len <= 0
    }

    /// Exclusive end offset, saturating at the top of offset space.
    #[inline]
    pub fn end(&self) -> RefOff {
        self.upstream.off.saturating_add(self.len)
    }

    /// True iff the two spans share at least one position.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.upstream.ref_id == other.upstream.ref_id
            && self.upstream.off < other.end()
            && other.upstream.off < self.end()
    }

    /// True iff `other` lies entirely inside this span.
    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        self.upstream.ref_id == other.upstream.ref_id
            && self.upstream.off <= other.upstream.off
            && self.end() >= other.end()
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.upstream == other.upstream && self.len == other.len
    }
}

impl Eq for Interval {}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.upstream
            .cmp(&other.upstream)
            .then(self.len.cmp(&other.len))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.upstream, self.len)
    }
}

#[cfg(test)]
#[path = "coordinates_test.rs"]
mod coordinates_test;
