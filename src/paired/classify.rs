// Pair classification module
//
// Labels a finished pair of mate placements by its geometry. The result is the
// intrinsic category only; whether overlap, containment or dovetailing counts
// as concordant is left to `PairedEndPolicy::is_concordant`.
//
// Precedence, first match wins:
// 1. strands incompatible with the policy         -> Discord
// 2. fragment extent outside [min_frag, max_frag] -> Discord
// 3. mates in swapped order and not touching      -> Discord
// 4. one mate contains the other, order kept      -> Contain
// 5. swapped order, or upstream end past downstream end -> Dovetail
// 6. mates share a position                       -> Overlap
// 7.                                              -> Normal

use std::fmt;

use rayon::prelude::*;

use crate::coordinates::{Coord, Interval, RefOff};

use super::policy::compatible;
use super::{PairedEndPolicy, to_off};

/// Geometric relationship between two aligned mates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairClass {
    /// Expected order, no shared positions
    Normal,
    /// Mates share positions but neither contains the other
    Overlap,
    /// One mate's span contains the other's
    Contain,
    /// Mates extend past each other's expected ends
    Dovetail,
    /// Orientation or fragment length rules out the pair
    Discord,
}

impl PairClass {
    pub fn is_discordant(self) -> bool {
        self == PairClass::Discord
    }

    pub fn name(self) -> &'static str {
        match self {
            PairClass::Normal => "normal",
            PairClass::Overlap => "overlap",
            PairClass::Contain => "contain",
            PairClass::Dovetail => "dovetail",
            PairClass::Discord => "discord",
        }
    }
}

impl fmt::Display for PairClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Final placement of both mates of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairPlacement {
    pub off1: RefOff,
    pub len1: u64,
    pub fw1: bool,
    pub off2: RefOff,
    pub len2: u64,
    pub fw2: bool,
}

impl PairedEndPolicy {
    /// Classify a pair given each mate's leftmost offset, reference length and
    /// orientation.
    ///
    /// Mate 1 counts as "left" only when it starts strictly before mate 2.
    /// When the strands fit the policy but the observed order is the reverse
    /// of what it expects, the pair is treated as a possible dovetail rather
    /// than rejected outright.
    pub fn classify_pair(
        &self,
        off1: RefOff,
        len1: u64,
        fw1: bool,
        off2: RefOff,
        len2: u64,
        fw2: bool,
    ) -> PairClass {
        debug_assert!(len1 > 0 && len2 > 0, "mates must have positive length");

        let one_left = off1 < off2;
        let expect_one_left = if compatible(self.policy, one_left, fw1, fw2) {
            one_left
        } else if compatible(self.policy, !one_left, fw1, fw2) {
            !one_left
        } else {
            log::trace!(
                "discord: strands {}/{} incompatible with {}",
                fw1,
                fw2,
                self.policy
            );
            return PairClass::Discord;
        };

        let mate1 = Interval::new(Coord::new(0, off1, fw1), to_off(len1));
        let mate2 = Interval::new(Coord::new(0, off2, fw2), to_off(len2));

        let frag_lo = off1.min(off2);
        let frag_hi = mate1.end().max(mate2.end());
        let frag = frag_hi.saturating_sub(frag_lo).max(0) as u64;
        let max_frag = self.expanded_max_frag(len1, len2);
        if frag < self.floor_min_frag() || frag > max_frag {
            log::trace!(
                "discord: fragment {} outside [{}, {}]",
                frag,
                self.floor_min_frag(),
                max_frag
            );
            return PairClass::Discord;
        }

        let (up, down) = if expect_one_left {
            (mate1, mate2)
        } else {
            (mate2, mate1)
        };
        let inverted = down.upstream().off() < up.upstream().off();
        let overlap = up.overlaps(&down);
        let containment = up.contains(&down) || down.contains(&up);

        if inverted && !overlap {
            log::trace!("discord: mates in swapped order {} / {}", up, down);
            PairClass::Discord
        } else if containment && !inverted {
            PairClass::Contain
        } else if inverted || up.end() > down.end() {
            PairClass::Dovetail
        } else if overlap {
            PairClass::Overlap
        } else {
            PairClass::Normal
        }
    }

    pub fn classify_placement(&self, p: &PairPlacement) -> PairClass {
        self.classify_pair(p.off1, p.len1, p.fw1, p.off2, p.len2, p.fw2)
    }

    /// Classify many pairs on the rayon pool. Output order matches input.
    pub fn classify_pairs(&self, placements: &[PairPlacement]) -> Vec<PairClass> {
        placements
            .par_iter()
            .map(|p| self.classify_placement(p))
            .collect()
    }
}
