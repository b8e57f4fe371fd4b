//! Paired-end mate geometry.
//!
//! These modules decide where the opposite mate of a pair may align and how a
//! finished pair of mate placements should be labelled:
//! - Orientation policy table (FF, RR, FR, RF)
//! - Search window for the unseen mate, given the placed one
//! - Classification of a completed pair (normal, overlap, contain, dovetail,
//!   discord)
//!
//! `PairedEndPolicy` is built once from a validated `PeOpt` and is read-only
//! afterwards, so one instance can be shared by every worker thread.

pub mod classify;
pub mod policy;
pub mod window;

pub use classify::{PairClass, PairPlacement};
pub use policy::{MateDirection, PePolicy, compatible, opposite_direction};
pub use window::{Mate, MateFacts, SearchWindow};

use crate::error::PeError;
use crate::pe_opt::PeOpt;

/// Immutable paired-end policy: orientation, fragment bounds and tolerance
/// flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedEndPolicy {
    policy: PePolicy,
    min_frag: u64,
    max_frag: u64,
    local: bool,
    dovetail_ok: bool,
    contain_ok: bool,
    overlap_ok: bool,
    expand_to_fit: bool,
}

impl PairedEndPolicy {
    /// Freeze `opt` into an engine. Invalid options are rejected here so the
    /// per-read calls never have to check them again.
    pub fn new(opt: &PeOpt) -> Result<Self, PeError> {
        opt.validate().map_err(PeError::InvalidOptions)?;

        log::debug!("paired-end policy: {}", opt.describe());

        Ok(PairedEndPolicy {
            policy: opt.policy,
            min_frag: opt.min_frag,
            max_frag: opt.max_frag,
            local: opt.local,
            dovetail_ok: opt.dovetail_ok,
            contain_ok: opt.contain_ok,
            overlap_ok: opt.overlap_ok,
            expand_to_fit: opt.expand_to_fit,
        })
    }

    pub fn policy(&self) -> PePolicy {
        self.policy
    }

    pub fn min_frag_len(&self) -> u64 {
        self.min_frag
    }

    pub fn max_frag_len(&self) -> u64 {
        self.max_frag
    }

    pub fn local(&self) -> bool {
        self.local
    }

    pub fn expand_to_fit(&self) -> bool {
        self.expand_to_fit
    }

    /// Minimum fragment length actually enforced; a fragment always covers at
    /// least one base.
    #[inline]
    pub(crate) fn floor_min_frag(&self) -> u64 {
        self.min_frag.max(1)
    }

    /// Maximum fragment length for a pair with these mate lengths, raised to
    /// the longer mate when `expand_to_fit` is set.
    #[inline]
    pub(crate) fn expanded_max_frag(&self, len_a: u64, len_b: u64) -> u64 {
        if self.expand_to_fit {
            self.max_frag.max(len_a).max(len_b)
        } else {
            self.max_frag
        }
    }

    /// Apply the tolerance flags to an intrinsic pair class.
    ///
    /// Containment and dovetailing are forms of overlap, so both also require
    /// `overlap_ok`.
    pub fn is_concordant(&self, class: PairClass) -> bool {
        match class {
            PairClass::Normal => true,
            PairClass::Overlap => self.overlap_ok,
            PairClass::Contain => self.overlap_ok && self.contain_ok,
            PairClass::Dovetail => self.overlap_ok && self.dovetail_ok,
            PairClass::Discord => false,
        }
    }
}

impl TryFrom<&PeOpt> for PairedEndPolicy {
    type Error = PeError;

    fn try_from(opt: &PeOpt) -> Result<Self, Self::Error> {
        PairedEndPolicy::new(opt)
    }
}

/// Clamp an unsigned length into offset space.
#[inline]
pub(crate) fn to_off(len: u64) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}
