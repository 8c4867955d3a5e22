//! Console reporter

use std::io::{self, Write};

use colored::Colorize;
use taskcheck_application::{Reporter, Tally};
use taskcheck_domain::Outcome;

const RULE: &str = "------------------------------------------------------------------";

/// Prints each scenario as a titled block and the tally as a footer.
///
/// Write errors do not interrupt the run; the first one is kept and handed
/// back by [`ConsoleReporter::into_inner`].
pub struct ConsoleReporter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub const fn new(out: W) -> Self {
        Self { out, error: None }
    }

    /// Returns the writer, or the first write error.
    pub fn into_inner(self) -> io::Result<W> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.out),
        }
    }

    fn emit(&mut self, lines: &[String]) {
        if self.error.is_some() {
            return;
        }
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|()| self.out.flush());
        if let Err(error) = result {
            self.error = Some(error);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn scenario_started(&mut self, title: &str) {
        self.emit(&[
            RULE.to_string(),
            title.magenta().bold().to_string(),
            RULE.to_string(),
        ]);
    }

    fn scenario_finished(&mut self, outcome: &Outcome) {
        match outcome.reason() {
            None => self.emit(&[format!("Status: {}", "Success".green())]),
            Some(reason) => self.emit(&[
                format!("Status: {}", "Fail".red()),
                format!("Reason: {reason}"),
            ]),
        }
    }

    fn finished(&mut self, tally: &Tally) {
        let failed = format!("Failed: {}", tally.failed).red().bold();
        let succeeded = format!(" Succeeded: {}", tally.succeeded).green().bold();
        self.emit(&[RULE.to_string(), format!("{failed}{succeeded}"), RULE.to_string()]);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use taskcheck_domain::FailureReason;

    fn render(drive: impl FnOnce(&mut ConsoleReporter<Vec<u8>>)) -> String {
        colored::control::set_override(false);
        let mut reporter = ConsoleReporter::new(Vec::new());
        drive(&mut reporter);
        String::from_utf8(reporter.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_passing_scenario() {
        let text = render(|r| {
            r.scenario_started("Empty database HEAD request");
            r.scenario_finished(&Outcome::passed());
        });
        assert_eq!(
            text,
            format!("{RULE}\nEmpty database HEAD request\n{RULE}\nStatus: Success\n")
        );
    }

    #[test]
    fn test_failing_scenario_prints_reason() {
        let text = render(|r| {
            r.scenario_started("Valid POST request");
            r.scenario_finished(&Outcome::failed_with(FailureReason::StatusMismatch {
                expected: 200,
                actual: 500,
            }));
        });
        assert!(text.ends_with("Status: Fail\nReason: Status code 500 != 200\n"));
    }

    #[test]
    fn test_summary() {
        let text = render(|r| {
            r.finished(&Tally {
                failed: 2,
                succeeded: 29,
            });
        });
        assert_eq!(text, format!("{RULE}\nFailed: 2 Succeeded: 29\n{RULE}\n"));
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_is_kept() {
        let mut reporter = ConsoleReporter::new(Broken);
        reporter.scenario_started("Task GET request");
        reporter.scenario_finished(&Outcome::passed());
        let error = reporter.into_inner().err().unwrap();
        assert_eq!(error.kind(), io::ErrorKind::BrokenPipe);
    }
}
