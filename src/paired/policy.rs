// Orientation policy module
//
// "Left" below means upstream with respect to the forward (Watson) strand.
//
// FF: both mates forward with mate 1 on the left, or both reverse with mate 2 on the left
// RR: both mates reverse with mate 1 on the left, or both forward with mate 2 on the left
// FR: mate 1 forward, mate 2 reverse, mate 1 on the left (or the mirror image)
// RF: mate 1 reverse, mate 2 forward, mate 1 on the left (or the mirror image)

use std::fmt;
use std::str::FromStr;

use crate::error::PeError;

/// How mates 1 and 2 must be oriented relative to the reference and to each
/// other for the pair to be concordant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PePolicy {
    Ff,
    Rr,
    Fr,
    Rf,
}

impl PePolicy {
    pub const ALL: [PePolicy; 4] = [PePolicy::Ff, PePolicy::Rr, PePolicy::Fr, PePolicy::Rf];

    pub fn name(self) -> &'static str {
        match self {
            PePolicy::Ff => "FF",
            PePolicy::Rr => "RR",
            PePolicy::Fr => "FR",
            PePolicy::Rf => "RF",
        }
    }
}

impl fmt::Display for PePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PePolicy {
    type Err = PeError;

    /// Accepts `ff`, `rr`, `fr`, `rf` in any case, with or without the
    /// leading `--` used on aligner command lines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().trim_start_matches("--").to_ascii_lowercase();
        match key.as_str() {
            "ff" => Ok(PePolicy::Ff),
            "rr" => Ok(PePolicy::Rr),
            "fr" => Ok(PePolicy::Fr),
            "rf" => Ok(PePolicy::Rf),
            _ => Err(PeError::UnknownPolicy(s.to_string())),
        }
    }
}

impl TryFrom<i32> for PePolicy {
    type Error = PeError;

    /// Numeric policy codes as written in index/option dumps: 1=FF, 2=RR,
    /// 3=FR, 4=RF.
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PePolicy::Ff),
            2 => Ok(PePolicy::Rr),
            3 => Ok(PePolicy::Fr),
            4 => Ok(PePolicy::Rf),
            _ => Err(PeError::UnknownPolicy(code.to_string())),
        }
    }
}

/// Where, and on which strand, the opposite mate has to align.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MateDirection {
    /// Opposite mate must lie to the left of the known mate
    pub left: bool,
    /// Opposite mate must align to the forward strand
    pub fw: bool,
}

/// True iff the orientations and relative positions of mates 1 and 2 agree
/// with `policy`.
#[inline]
pub fn compatible(policy: PePolicy, one_left: bool, one_fw: bool, two_fw: bool) -> bool {
    match policy {
        PePolicy::Ff => one_fw == two_fw && one_fw == one_left,
        PePolicy::Rr => one_fw == two_fw && one_fw != one_left,
        PePolicy::Fr => one_fw != two_fw && one_fw == one_left,
        PePolicy::Rf => one_fw != two_fw && one_fw != one_left,
    }
}

/// Given that mate 1 (`known_is_one`) or mate 2 aligned with orientation
/// `known_fw`, where and how must the other mate align?
#[inline]
pub fn opposite_direction(policy: PePolicy, known_is_one: bool, known_fw: bool) -> MateDirection {
    let (left, fw) = match policy {
        PePolicy::Ff => (known_is_one != known_fw, known_fw),
        PePolicy::Rr => (known_is_one == known_fw, known_fw),
        PePolicy::Fr => (!known_fw, !known_fw),
        PePolicy::Rf => (known_fw, !known_fw),
    };
    MateDirection { left, fw }
}
