/// Cross-match accounting totals.
///
/// A passive holder: the saved pot is fed by normal match ends, drained by a
/// full-house payout, and `total_matches` ticks once per completed (not
/// cancelled) match. Nothing else writes to it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accounting {
    pub(crate) total_bank: f64,
    pub(crate) saved_pot: f64,
    pub(crate) total_matches: u32,
}

impl Accounting {
    /// A fresh, zeroed ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from persisted totals.
    pub fn with_totals(total_bank: f64, saved_pot: f64, total_matches: u32) -> Self {
        Self { total_bank, saved_pot, total_matches }
    }

    pub fn total_bank(&self) -> f64 {
        self.total_bank
    }

    /// Reserve accumulated for the next full-house payout.
    pub fn saved_pot(&self) -> f64 {
        self.saved_pot
    }

    /// Completed matches; cancellations do not count.
    pub fn total_matches(&self) -> u32 {
        self.total_matches
    }
}
