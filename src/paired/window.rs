// Opposite-mate search window module
//
// Given where one mate aligned, compute the reference window (inclusive
// offsets) and orientation in which the other mate must be found for the pair
// to be concordant. The window is the hull of every placement `[s, e)` of the
// other mate that `classify_pair` would accept under the tolerance flags:
// - Direction and strand come straight from the orientation policy
// - Each accepted class (normal, overlap, contain, dovetail) is a region
//   bounded on `s` and `e`
// - The fragment extent is linear in `s` and `e` on each of four pieces,
//   split at the known mate's start and end
// - Footprints run from the mate length minus its indel slack to the length
//   plus the slack (down to one base under local alignment)
// - Placements must touch the reference and may hang `max_ohang` bases off
//   either end
//
// Every one of these is a bound on `s`, `e` or `e - s`, so each intersection
// has a closed-form earliest start and latest end.

use crate::coordinates::{Coord, Interval, RefId, RefOff};

use super::classify::PairClass;
use super::policy::opposite_direction;
use super::{PairedEndPolicy, to_off};

/// Which mate of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mate {
    One,
    Two,
}

impl Mate {
    pub fn other(self) -> Mate {
        match self {
            Mate::One => Mate::Two,
            Mate::Two => Mate::One,
        }
    }
}

/// What is known about the placed mate and the search that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MateFacts {
    pub known: Mate,     // Which mate already aligned
    pub fw: bool,        // Its orientation
    pub off: RefOff,     // Its leftmost reference offset
    pub len: u64,        // Its reference length
    pub other_len: u64,  // Length of the mate still to be found
    pub ref_len: u64,    // Length of the reference both mates are on
    pub max_gaps: u32,   // Indel slack allowed in the opposite mate's alignment
    pub max_ohang: u32,  // How far the DP window may hang off a reference end
}

/// Where and how to look for the opposite mate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    /// Opposite mate lies to the left of the placed mate
    pub left: bool,
    /// Opposite mate must align to the forward strand
    pub fw: bool,
    /// Leftmost reference offset to include (may be negative with overhang)
    pub left_off: RefOff,
    /// Rightmost reference offset to include
    pub right_off: RefOff,
}

impl SearchWindow {
    #[inline]
    pub fn len(&self) -> i64 {
        self.right_off - self.left_off + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.right_off < self.left_off
    }

    /// The window as a reference interval carrying the required strand.
    pub fn as_interval(&self, ref_id: RefId) -> Interval {
        Interval::new(Coord::new(ref_id, self.left_off, self.fw), self.len())
    }

    /// True iff `placement` lies wholly inside the window.
    #[inline]
    pub fn admits(&self, placement: &Interval) -> bool {
        placement
            .upstream()
            .within(placement.len(), self.left_off, self.right_off + 1)
    }
}

const OPEN: (i64, i64) = (i64::MIN, i64::MAX);

/// Placements `[s, e)` with inclusive bounds on the start, the exclusive end
/// and the footprint `e - s`.
#[derive(Debug, Clone, Copy)]
struct Zone {
    s: (i64, i64),
    e: (i64, i64),
    d: (i64, i64),
}

#[inline]
fn clip(r: (i64, i64), lo: i64, hi: i64) -> (i64, i64) {
    (r.0.max(lo), r.1.min(hi))
}

impl Zone {
    fn anywhere() -> Self {
        Zone {
            s: OPEN,
            e: OPEN,
            d: OPEN,
        }
    }

    fn start(self, lo: i64, hi: i64) -> Self {
        Zone {
            s: clip(self.s, lo, hi),
            ..self
        }
    }

    fn end(self, lo: i64, hi: i64) -> Self {
        Zone {
            e: clip(self.e, lo, hi),
            ..self
        }
    }

    fn footprint(self, lo: i64, hi: i64) -> Self {
        Zone {
            d: clip(self.d, lo, hi),
            ..self
        }
    }

    fn meet(self, other: &Zone) -> Self {
        self.start(other.s.0, other.s.1)
            .end(other.e.0, other.e.1)
            .footprint(other.d.0, other.d.1)
    }

    /// Earliest start and latest exclusive end of any placement in the zone.
    fn extremes(&self) -> Option<(i64, i64)> {
        let (s_lo, s_hi) = self.s;
        let (e_lo, e_hi) = self.e;
        let (d_lo, d_hi) = self.d;
        if d_lo > d_hi || e_lo > e_hi {
            return None;
        }
        let first = s_lo.max(e_lo.saturating_sub(d_hi));
        let last = s_hi.min(e_hi.saturating_sub(d_lo));
        if first > last {
            return None;
        }
        Some((first, e_hi.min(s_hi.saturating_add(d_hi))))
    }
}

impl PairedEndPolicy {
    /// Regions of `[s, e)` where the opposite mate forms a pair with the
    /// known mate `[a, b)` whose class `is_concordant` accepts.
    fn concordant_regions(&self, left: bool, a: i64, b: i64) -> Vec<Zone> {
        let any = Zone::anywhere();
        let (min, max) = OPEN;
        let mut regions = Vec::with_capacity(5);

        if left {
            // Opposite mate is upstream
            regions.push(any.end(min, a));
            if self.is_concordant(PairClass::Overlap) {
                regions.push(
                    any.start(min, a.saturating_sub(1))
                        .end(a.saturating_add(1), b.saturating_sub(1)),
                );
            }
            if self.is_concordant(PairClass::Contain) {
                regions.push(any.start(min, a).end(b, max));
                regions.push(any.start(a, a).end(min, b));
            }
            if self.is_concordant(PairClass::Dovetail) {
                regions.push(any.start(a.saturating_add(1), b.saturating_sub(1)));
            }
        } else {
            // Opposite mate is downstream
            regions.push(any.start(b, max));
            if self.is_concordant(PairClass::Overlap) {
                regions.push(
                    any.start(a.saturating_add(1), b.saturating_sub(1))
                        .end(b.saturating_add(1), max),
                );
            }
            if self.is_concordant(PairClass::Contain) {
                regions.push(any.start(a, max).end(min, b));
                regions.push(any.start(a, a).end(b, max));
            }
            if self.is_concordant(PairClass::Dovetail) {
                regions.push(
                    any.start(min, a.saturating_sub(1))
                        .end(a.saturating_add(1), max),
                );
            }
        }
        regions
    }

    /// Compute the window in which the opposite mate has to align for the
    /// pair to be concordant. `None` means no such window exists: a mate is
    /// longer than the maximum fragment and `expand_to_fit` is off, or no
    /// placement touching the reference (plus overhang) yields a fragment
    /// the policy accepts.
    pub fn other_mate_window(&self, facts: &MateFacts) -> Option<SearchWindow> {
        let dir = opposite_direction(self.policy, facts.known == Mate::One, facts.fw);

        if !self.expand_to_fit && facts.len.max(facts.other_len) > self.max_frag {
            log::trace!(
                "no window: mate length {}/{} exceeds max fragment {}",
                facts.len,
                facts.other_len,
                self.max_frag
            );
            return None;
        }

        let (min, max) = OPEN;
        let fmin = to_off(self.floor_min_frag());
        // The opposite mate's own length is handled by the covering piece
        let fmax = to_off(self.expanded_max_frag(facts.len, 0));

        let a = facts.off;
        let klen = to_off(facts.len);
        let b = a.saturating_add(klen);
        let olen = to_off(facts.other_len);
        let gaps = i64::from(facts.max_gaps);
        let ohang = i64::from(facts.max_ohang);
        let ref_len = to_off(facts.ref_len);

        // Local alignment may soft-clip all but one base of the mate
        let min_footprint = if self.local {
            1
        } else {
            olen.saturating_sub(gaps).max(1)
        };
        let max_footprint = olen.saturating_add(gaps);

        let any = Zone::anywhere();
        let base = any
            .start(-ohang, ref_len.saturating_sub(1))
            .end(1, ref_len.saturating_add(ohang))
            .footprint(min_footprint, max_footprint);

        let pieces = [
            // Starts and ends no later than the known mate: extent is b - s
            Some(
                any.start(min, a)
                    .end(min, b)
                    .start(b.saturating_sub(fmax), b.saturating_sub(fmin)),
            ),
            // Covers the known mate: extent is the footprint itself, which
            // expand_to_fit always lets through
            Some(any.start(min, a).end(b, max).footprint(
                fmin,
                if self.expand_to_fit { max } else { fmax },
            )),
            // Inside the known mate: extent is the known length
            (klen >= fmin && klen <= fmax).then(|| any.start(a, max).end(min, b)),
            // Starts and ends no earlier than the known mate: extent is e - a
            Some(
                any.start(a, max)
                    .end(b, max)
                    .end(a.saturating_add(fmin), a.saturating_add(fmax)),
            ),
        ];

        let mut hull: Option<(i64, i64)> = None;
        for region in self.concordant_regions(dir.left, a, b) {
            let region = base.meet(&region);
            for piece in pieces.iter().flatten() {
                if let Some((first, end)) = region.meet(piece).extremes() {
                    hull = Some(match hull {
                        Some((lo, hi)) => (lo.min(first), hi.max(end)),
                        None => (first, end),
                    });
                }
            }
        }

        let Some((left_off, end)) = hull else {
            log::trace!(
                "no window: no concordant placement of a {}bp mate {} of {}+{}",
                facts.other_len,
                if dir.left { "left" } else { "right" },
                a,
                klen
            );
            return None;
        };

        Some(SearchWindow {
            left: dir.left,
            fw: dir.fw,
            left_off,
            right_off: end - 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paired::PePolicy;
    use crate::pe_opt::PeOpt;

    fn fr_policy(min_frag: u64, max_frag: u64) -> PairedEndPolicy {
        PairedEndPolicy::new(&PeOpt {
            policy: PePolicy::Fr,
            min_frag,
            max_frag,
            ..PeOpt::default()
        })
        .unwrap()
    }

    fn facts(known: Mate, fw: bool, off: i64, len: u64, other_len: u64) -> MateFacts {
        MateFacts {
            known,
            fw,
            off,
            len,
            other_len,
            ref_len: 10_000,
            max_gaps: 0,
            max_ohang: 0,
        }
    }

    fn frag_len(known_off: i64, known_len: i64, start: i64, len: i64) -> i64 {
        (known_off + known_len).max(start + len) - known_off.min(start)
    }

    #[test]
    fn test_zone_extremes() {
        let z = Zone::anywhere().start(0, 100).end(50, 300).footprint(20, 30);
        // earliest start is held back by the end bound, latest end by the
        // start bound
        assert_eq!(z.extremes(), Some((20, 130)));
        let z = Zone::anywhere().start(0, 10).end(100, 200).footprint(1, 50);
        assert_eq!(z.extremes(), None);
        assert_eq!(Zone::anywhere().footprint(5, 4).extremes(), None);
    }

    #[test]
    fn test_window_to_the_right() {
        let pe = fr_policy(200, 400);
        let w = pe
            .other_mate_window(&facts(Mate::One, true, 100, 50, 50))
            .expect("window");

        assert!(!w.left);
        assert!(!w.fw, "FR: opposite of a forward mate 1 is reverse");
        assert_eq!((w.left_off, w.right_off), (250, 499));
        assert!(w.left_off > 150);

        let at = |start| Interval::new(Coord::new(0, start, false), 50);
        assert!(w.admits(&at(250)));
        assert_eq!(frag_len(100, 50, 250, 50), 200);
        assert!(w.admits(&at(450)));
        assert_eq!(frag_len(100, 50, 450, 50), 400);
        assert!(!w.admits(&at(249)));
        assert!(!w.admits(&at(451)));
    }

    #[test]
    fn test_window_to_the_left() {
        let pe = fr_policy(200, 400);
        let w = pe
            .other_mate_window(&facts(Mate::One, false, 1000, 50, 50))
            .expect("window");

        assert!(w.left);
        assert!(w.fw);
        assert_eq!((w.left_off, w.right_off), (650, 899));

        let at = |start| Interval::new(Coord::new(0, start, true), 50);
        assert!(w.admits(&at(650)));
        assert_eq!(frag_len(1000, 50, 650, 50), 400);
        assert!(w.admits(&at(850)));
        assert_eq!(frag_len(1000, 50, 850, 50), 200);
        assert!(!w.admits(&at(851)));
        assert!(!w.admits(&at(649)));
    }

    #[test]
    fn test_upstream_mate_may_contain_known_mate() {
        // FF, mate 2 forward at [2891, 2989): mate 1 is upstream and may run
        // past mate 2's end as long as it starts no later
        let pe = PairedEndPolicy::new(&PeOpt {
            policy: PePolicy::Ff,
            ..PeOpt::default()
        })
        .unwrap();
        let w = pe
            .other_mate_window(&facts(Mate::Two, true, 2891, 98, 171))
            .expect("window");
        assert!(w.left);
        assert!(w.fw);
        assert_eq!((w.left_off, w.right_off), (2489, 3061));

        let placement = Interval::new(Coord::new(0, 2819, true), 171);
        assert!(w.admits(&placement));
        assert_eq!(
            pe.classify_pair(2819, 171, true, 2891, 98, true),
            PairClass::Contain
        );

        // Without containment the mate has to end before mate 2 does
        let no_contain = PairedEndPolicy::new(&PeOpt {
            policy: PePolicy::Ff,
            contain_ok: false,
            ..PeOpt::default()
        })
        .unwrap();
        let w = no_contain
            .other_mate_window(&facts(Mate::Two, true, 2891, 98, 171))
            .expect("window");
        assert_eq!((w.left_off, w.right_off), (2489, 2987));
        assert!(!w.admits(&placement));
    }

    #[test]
    fn test_overlap_flag_keeps_mates_apart() {
        let f = facts(Mate::One, true, 100, 50, 50);

        let w = fr_policy(0, 400).other_mate_window(&f).expect("window");
        assert_eq!((w.left_off, w.right_off), (100, 499));

        let apart = PairedEndPolicy::new(&PeOpt {
            max_frag: 400,
            overlap_ok: false,
            ..PeOpt::default()
        })
        .unwrap();
        let w = apart.other_mate_window(&f).expect("window");
        assert_eq!((w.left_off, w.right_off), (150, 499));
    }

    #[test]
    fn test_dovetail_flag_reaches_behind_known_mate() {
        let pe = PairedEndPolicy::new(&PeOpt {
            max_frag: 400,
            dovetail_ok: true,
            ..PeOpt::default()
        })
        .unwrap();
        let w = pe
            .other_mate_window(&facts(Mate::One, true, 100, 50, 50))
            .expect("window");
        // a reverse mate 2 at [51, 101) still touches mate 1
        assert_eq!((w.left_off, w.right_off), (51, 499));
        assert_eq!(
            pe.classify_pair(100, 50, true, 51, 50, false),
            PairClass::Dovetail
        );
        assert!(pe.is_concordant(PairClass::Dovetail));
    }

    #[test]
    fn test_known_mate_longer_than_min_frag() {
        // A 300bp mate already satisfies min_frag=200, so the opposite mate
        // may start anywhere from the known start
        let pe = fr_policy(200, 400);
        let w = pe
            .other_mate_window(&facts(Mate::One, true, 100, 300, 50))
            .expect("window");
        assert_eq!((w.left_off, w.right_off), (100, 499));
    }

    #[test]
    fn test_gaps_widen_near_edge() {
        let pe = fr_policy(200, 400);
        let mut f = facts(Mate::One, true, 100, 50, 50);
        f.max_gaps = 5;
        let w = pe.other_mate_window(&f).expect("window");
        // a 55bp footprint ending at 300 starts at 245
        assert_eq!((w.left_off, w.right_off), (245, 499));
    }

    #[test]
    fn test_mate_two_known() {
        // FR with mate 2 forward: mate 1 must be reverse and to the right
        let pe = fr_policy(200, 400);
        let w = pe
            .other_mate_window(&facts(Mate::Two, true, 100, 50, 50))
            .expect("window");
        assert!(!w.left);
        assert!(!w.fw);
        assert_eq!((w.left_off, w.right_off), (250, 499));
    }

    #[test]
    fn test_long_mate_without_expand_has_no_window() {
        let pe = PairedEndPolicy::new(&PeOpt {
            min_frag: 0,
            max_frag: 100,
            expand_to_fit: false,
            ..PeOpt::default()
        })
        .unwrap();
        assert!(pe.other_mate_window(&facts(Mate::One, true, 100, 50, 150)).is_none());
        assert!(pe.other_mate_window(&facts(Mate::One, true, 100, 50, 80)).is_some());
    }

    #[test]
    fn test_long_mate_with_expand_gets_window() {
        let pe = fr_policy(0, 100);
        let w = pe
            .other_mate_window(&facts(Mate::One, true, 100, 50, 150))
            .expect("window");
        // the 150bp mate covering mate 1 is its own fragment
        assert_eq!((w.left_off, w.right_off), (100, 249));
        assert_eq!(pe.max_frag_len(), 100);
    }

    #[test]
    fn test_reference_end_and_overhang() {
        let pe = fr_policy(200, 400);

        let f = facts(Mate::One, true, 9800, 50, 50);
        let w = pe.other_mate_window(&f).expect("window");
        assert_eq!((w.left_off, w.right_off), (9950, 9999));

        let w = pe
            .other_mate_window(&MateFacts { max_ohang: 20, ..f })
            .expect("window");
        assert_eq!((w.left_off, w.right_off), (9950, 10019));

        // Minimum fragment would end at 10060 > 10000
        let f = facts(Mate::One, true, 9860, 50, 100);
        assert!(pe.other_mate_window(&f).is_none());
        // With overhang the last placement still has to start at 9999
        let w = pe
            .other_mate_window(&MateFacts { max_ohang: 100, ..f })
            .expect("window");
        assert_eq!((w.left_off, w.right_off), (9960, 10098));

        // Overhang alone cannot help when the mate could never touch the
        // reference
        let f = facts(Mate::One, true, 9900, 50, 50);
        assert!(pe
            .other_mate_window(&MateFacts { max_ohang: 150, ..f })
            .is_none());
    }

    #[test]
    fn test_reference_start_and_overhang() {
        let pe = fr_policy(200, 400);

        // Reverse mate 1 at 100: mate 2 must start at or before -50
        let f = facts(Mate::One, false, 100, 50, 50);
        assert!(pe.other_mate_window(&f).is_none());

        // Enough overhang, but the mate would lie entirely off the reference
        assert!(pe
            .other_mate_window(&MateFacts { max_ohang: 60, ..f })
            .is_none());

        let f = facts(Mate::One, false, 200, 50, 50);
        let w = pe.other_mate_window(&f).expect("window");
        assert_eq!((w.left_off, w.right_off), (0, 99));
        let w = pe
            .other_mate_window(&MateFacts { max_ohang: 60, ..f })
            .expect("window");
        // the earliest placement still has one base on the reference
        assert_eq!((w.left_off, w.right_off), (-49, 99));
    }

    #[test]
    fn test_local_mode_allows_partial_fit() {
        let f = facts(Mate::One, true, 9950, 50, 100);

        let end_to_end = fr_policy(0, 400);
        assert!(end_to_end.other_mate_window(&f).is_none());

        let local = PairedEndPolicy::new(&PeOpt {
            min_frag: 0,
            max_frag: 400,
            local: true,
            ..PeOpt::default()
        })
        .unwrap();
        let w = local.other_mate_window(&f).expect("window");
        assert_eq!((w.left_off, w.right_off), (9950, 9999));
    }

    #[test]
    fn test_unbounded_max_frag() {
        let pe = fr_policy(0, u64::MAX);
        let w = pe
            .other_mate_window(&facts(Mate::One, true, 100, 50, 50))
            .expect("window");
        assert_eq!((w.left_off, w.right_off), (100, 9999));

        let w = pe
            .other_mate_window(&facts(Mate::One, false, 100, 50, 50))
            .expect("window");
        assert_eq!((w.left_off, w.right_off), (0, 149));
    }

    #[test]
    fn test_window_as_interval() {
        let w = SearchWindow {
            left: false,
            fw: false,
            left_off: 250,
            right_off: 499,
        };
        let iv = w.as_interval(3);
        assert_eq!(iv.len(), 250);
        assert_eq!(iv.upstream().off(), 250);
        assert_eq!(iv.upstream().ref_id(), 3);
        assert!(!iv.upstream().fw());
        assert!(!w.is_empty());
    }

    #[test]
    fn test_window_is_pure() {
        let pe = fr_policy(200, 400);
        let f = facts(Mate::Two, false, 5000, 75, 100);
        let first = pe.other_mate_window(&f);
        for _ in 0..10 {
            assert_eq!(pe.other_mate_window(&f), first);
        }
    }

    #[test]
    fn test_mate_other() {
        assert_eq!(Mate::One.other(), Mate::Two);
        assert_eq!(Mate::Two.other(), Mate::One);
    }
}
