// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outcome aggregation for partial-failure tolerant batch operations.

/// Per-item results of a batch: each item is attempted independently.
#[derive(Debug)]
pub struct BatchReport<K, E> {
    /// Items that were processed
    pub completed: Vec<K>,
    /// Items skipped with a warning (batch continues, nothing changed)
    pub skipped: Vec<(K, E)>,
    /// Items that failed outright
    pub failed: Vec<(K, E)>,
}

impl<K, E> Default for BatchReport<K, E> {
    fn default() -> Self {
        Self {
            completed: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<K, E> BatchReport<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn complete(&mut self, item: K) {
        self.completed.push(item);
    }

    pub fn skip(&mut self, item: K, reason: E) {
        self.skipped.push((item, reason));
    }

    pub fn fail(&mut self, item: K, error: E) {
        self.failed.push((item, error));
    }

    /// True when nothing failed (skips are warnings)
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of items attempted
    pub fn attempted(&self) -> usize {
        self.completed.len() + self.skipped.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_outcome() {
        let mut report: BatchReport<u32, &str> = BatchReport::new();
        report.complete(1);
        report.skip(2, "no variant");
        assert!(report.is_success());
        report.fail(3, "scan failed");
        assert!(!report.is_success());
        assert_eq!(report.attempted(), 3);
    }
}
