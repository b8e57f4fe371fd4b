//! Paired-end mate geometry for short-read aligners.
//!
//! Once one mate of a read pair has been placed, [`PairedEndPolicy`] tells the
//! aligner where (and on which strand) to search for the other mate, and once
//! both are placed it labels the pair as normal, overlapping, containing,
//! dovetailed or discordant.
//!
//! ```
//! use ferrous_pairing::{Mate, MateFacts, PairClass, PairedEndPolicy, PeOpt};
//!
//! let pe = PairedEndPolicy::new(&PeOpt::default()).unwrap();
//! let window = pe.other_mate_window(&MateFacts {
//!     known: Mate::One,
//!     fw: true,
//!     off: 1000,
//!     len: 100,
//!     other_len: 100,
//!     ref_len: 1_000_000,
//!     max_gaps: 0,
//!     max_ohang: 0,
//! });
//! assert!(window.is_some());
//! assert_eq!(
//!     pe.classify_pair(1000, 100, true, 1200, 100, false),
//!     PairClass::Normal
//! );
//! ```

pub mod coordinates; // Reference coordinates and intervals
pub mod defaults;
pub mod error;
pub mod paired; // Orientation policy, mate search window, pair classification
pub mod pe_opt; // Paired-end options

pub use coordinates::{Coord, Interval, RefId, RefOff};
pub use error::PeError;
pub use paired::{
    Mate, MateDirection, MateFacts, PairClass, PairPlacement, PairedEndPolicy, PePolicy,
    SearchWindow, compatible, opposite_direction,
};
pub use pe_opt::PeOpt;
