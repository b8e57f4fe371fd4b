// src/defaults.rs

// Orientation policy
pub const POLICY: &str = "fr";

// Fragment length bounds
pub const MIN_FRAG_LEN: u64 = 0;
pub const MAX_FRAG_LEN: u64 = 500;
pub const UNBOUNDED_FRAG_LEN: u64 = u64::MAX;

// Tolerance flags
pub const DOVETAIL_OK: bool = false;
pub const CONTAIN_OK: bool = true;
pub const OVERLAP_OK: bool = true;
pub const EXPAND_TO_FIT: bool = true;
pub const LOCAL_ALIGNMENT: bool = false;

// Dynamic-programming slack for the mate search
pub const MAX_GAPS: u32 = 15;
pub const MAX_OVERHANG: u32 = 0;

// Other Constants
pub const VERBOSITY: i32 = 3;
