//! Relocation plans and their outcomes.
//!
//! A move, copy or delete is turned into an explicit list of per-secret
//! units before anything is written. There is no transaction across stores:
//! each unit succeeds or fails on its own and the [`Report`] says which.

use std::fmt;

use crate::core::types::Key;
use crate::error::{Error, FailedUnit, PartialFailure, Result, StoreError};

/// One secret moving (or being copied) from one key to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub from: Key,
    pub to: Key,
}

impl Relocation {
    pub fn new(from: impl Into<Key>, to: impl Into<Key>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Relocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Result of a single unit.
#[derive(Debug)]
pub enum Outcome {
    Done,
    Failed(StoreError),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

/// Kind of unit carried by a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Relocate(Relocation),
    Remove(Key),
}

impl Unit {
    /// The key the unit started from.
    pub fn source(&self) -> &str {
        match self {
            Unit::Relocate(r) => &r.from,
            Unit::Remove(key) => key,
        }
    }
}

/// Per-unit outcomes of one operation, in execution order.
#[derive(Debug)]
pub struct Report {
    operation: &'static str,
    entries: Vec<(Unit, Outcome)>,
}

impl Report {
    pub(crate) fn new(operation: &'static str) -> Self {
        Self {
            operation,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, unit: Unit, outcome: Outcome) {
        self.entries.push((unit, outcome));
    }

    /// Operation name (`move`, `copy`, `delete`).
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Every unit with its outcome.
    pub fn entries(&self) -> &[(Unit, Outcome)] {
        &self.entries
    }

    /// Number of units that completed.
    pub fn completed(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_done()).count()
    }

    /// Whether nothing had to be done.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relocations that completed.
    pub fn relocations(&self) -> impl Iterator<Item = &Relocation> {
        self.entries.iter().filter_map(|(unit, outcome)| match unit {
            Unit::Relocate(r) if outcome.is_done() => Some(r),
            _ => None,
        })
    }

    /// Turn the report into an error if any unit failed.
    pub(crate) fn into_result(self) -> Result<Self> {
        if self.entries.iter().all(|(_, o)| o.is_done()) {
            return Ok(self);
        }

        let attempted = self.entries.len();
        let failed = self
            .entries
            .into_iter()
            .filter_map(|(unit, outcome)| match outcome {
                Outcome::Failed(error) => Some(FailedUnit {
                    key: unit.source().to_string(),
                    error,
                }),
                Outcome::Done => None,
            })
            .collect();

        Err(Error::Partial(PartialFailure {
            operation: self.operation,
            attempted,
            failed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_all_done() {
        let mut report = Report::new("copy");
        report.record(Unit::Relocate(Relocation::new("a", "b")), Outcome::Done);

        let report = report.into_result().unwrap();
        assert_eq!(report.completed(), 1);
        assert_eq!(report.relocations().count(), 1);
    }

    #[test]
    fn test_report_partial() {
        let mut report = Report::new("move");
        report.record(Unit::Relocate(Relocation::new("a", "x/a")), Outcome::Done);
        report.record(
            Unit::Relocate(Relocation::new("b", "x/b")),
            Outcome::Failed(StoreError::NotFound("b".to_string())),
        );

        match report.into_result() {
            Err(Error::Partial(failure)) => {
                assert_eq!(failure.attempted, 2);
                assert_eq!(failure.failed_keys(), vec!["b"]);
            }
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[test]
    fn test_relocation_display() {
        assert_eq!(Relocation::new("a/b", "c").to_string(), "a/b -> c");
    }
}
