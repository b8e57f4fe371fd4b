// src/pe_opt.rs
//
// Paired-end options: orientation policy, fragment length bounds and the
// flags deciding which mate arrangements count as concordant.

use crate::defaults;
use crate::paired::policy::PePolicy;

/// User-facing paired-end options.
///
/// This is the mutable bundle filled in from the command line; the engine
/// (`PairedEndPolicy`) is built from it once and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeOpt {
    pub policy: PePolicy,
    pub min_frag: u64, // Minimum fragment length (-I)
    pub max_frag: u64, // Maximum fragment length (-X); u64::MAX = unbounded

    pub local: bool,         // Opposite mate searched with local (soft-clipping) alignment
    pub dovetail_ok: bool,   // Dovetailed mates count as concordant
    pub contain_ok: bool,    // One mate containing the other counts as concordant
    pub overlap_ok: bool,    // Overlapping mates count as concordant
    pub expand_to_fit: bool, // Raise max_frag to a mate's length when the mate is longer
}

impl Default for PeOpt {
    fn default() -> Self {
        PeOpt {
            policy: PePolicy::Fr,
            min_frag: defaults::MIN_FRAG_LEN,
            max_frag: defaults::MAX_FRAG_LEN,
            local: defaults::LOCAL_ALIGNMENT,
            dovetail_ok: defaults::DOVETAIL_OK,
            contain_ok: defaults::CONTAIN_OK,
            overlap_ok: defaults::OVERLAP_OK,
            expand_to_fit: defaults::EXPAND_TO_FIT,
        }
    }
}

impl PeOpt {
    pub fn max_frag_is_unbounded(&self) -> bool {
        self.max_frag == defaults::UNBOUNDED_FRAG_LEN
    }

    /// Validate parameters for consistency
    /// Returns Ok(()) if valid, or Err with description of issues
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.max_frag == 0 {
            errors.push("max_frag must be >= 1, got 0".to_string());
        }
        if !self.max_frag_is_unbounded() && self.min_frag > self.max_frag {
            errors.push(format!(
                "min_frag must be <= max_frag, got {} > {}",
                self.min_frag, self.max_frag
            ));
        }
        if !self.overlap_ok && (self.contain_ok || self.dovetail_ok) {
            // Containment and dovetailing imply overlap; the flags still work
            // but the combination is almost always a mistake.
            log::warn!(
                "overlap disallowed: contain_ok/dovetail_ok have no effect on concordance"
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Parse a fragment length; `inf`, `unbounded` and `*` mean no limit.
    pub fn parse_frag_len(s: &str) -> Result<u64, String> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inf" | "unbounded" | "*" => Ok(defaults::UNBOUNDED_FRAG_LEN),
            v => v
                .parse::<u64>()
                .map_err(|_| format!("Invalid fragment length: {}", s)),
        }
    }

    /// Parse a fragment range "MIN,MAX" (either side may be empty to keep
    /// the default).
    pub fn parse_frag_range(s: &str) -> Result<(u64, u64), String> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 2 {
            return Err(format!("Fragment range must be MIN,MAX: {}", s));
        }
        let min = if parts[0].trim().is_empty() {
            defaults::MIN_FRAG_LEN
        } else {
            Self::parse_frag_len(parts[0])?
        };
        let max = if parts[1].trim().is_empty() {
            defaults::MAX_FRAG_LEN
        } else {
            Self::parse_frag_len(parts[1])?
        };
        Ok((min, max))
    }

    /// One-line summary for logging.
    pub fn describe(&self) -> String {
        let max = if self.max_frag_is_unbounded() {
            "inf".to_string()
        } else {
            self.max_frag.to_string()
        };
        format!(
            "policy={} frag=[{},{}] local={} dovetail={} contain={} overlap={} expand={}",
            self.policy,
            self.min_frag,
            max,
            self.local,
            self.dovetail_ok,
            self.contain_ok,
            self.overlap_ok,
            self.expand_to_fit
        )
    }
}
