//! Mutable collator configuration.
//!
//! The weight table is immutable and shared; everything a caller may tweak
//! after construction lives in this small copyable struct. Cloning a
//! collator copies the config and shares the table by reference.

use crate::normalize::Decomposition;

/// Comparison depth.
///
/// Ordered: a strength includes every level below it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum Strength {
    /// Base letters only.
    Primary,
    /// Base letters and accents.
    Secondary,
    /// Base letters, accents and case. The default.
    #[default]
    Tertiary,
    /// All of the above, then exact code points as the final tie-break.
    Identical,
}

/// Snapshot of a collator's tunable state. Iterators capture one of these
/// at bind time; later changes on the collator leave bound iterators alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollatorConfig {
    pub strength: Strength,
    pub decomposition: Decomposition,
    pub french_secondary: bool,
}
