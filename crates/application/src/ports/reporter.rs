//! Reporter port

use taskcheck_domain::Outcome;

use crate::tally::Tally;

/// Sink for scenario progress.
///
/// Called strictly in order: `scenario_started`, then `scenario_finished`,
/// for each scenario, and `finished` once at the end of the run.
pub trait Reporter {
    /// A scenario is about to send its request.
    fn scenario_started(&mut self, title: &str);

    /// A scenario produced its outcome.
    fn scenario_finished(&mut self, outcome: &Outcome);

    /// The run is complete.
    fn finished(&mut self, tally: &Tally);
}
