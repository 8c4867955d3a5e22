//! Run totals

use taskcheck_domain::Outcome;

/// Accumulated failed/succeeded counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Scenarios that failed
    pub failed: u32,
    /// Scenarios that passed
    pub succeeded: u32,
}

impl Tally {
    /// Creates an empty tally.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            failed: 0,
            succeeded: 0,
        }
    }

    /// Adds one scenario outcome.
    pub const fn record(&mut self, outcome: &Outcome) {
        self.failed += outcome.failed();
        self.succeeded += outcome.succeeded();
    }

    /// Number of scenarios recorded.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.failed + self.succeeded
    }

    /// Returns whether no scenario failed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskcheck_domain::FailureReason;

    #[test]
    fn test_record() {
        let mut tally = Tally::new();
        tally.record(&Outcome::passed());
        tally.record(&Outcome::passed_with(4));
        tally.record(&Outcome::failed_with(FailureReason::OutOfOrder));

        assert_eq!(
            tally,
            Tally {
                failed: 1,
                succeeded: 2
            }
        );
        assert_eq!(tally.total(), 3);
        assert!(!tally.all_passed());
    }

    #[test]
    fn test_empty_tally_passes() {
        assert!(Tally::new().all_passed());
        assert_eq!(Tally::default().total(), 0);
    }
}
