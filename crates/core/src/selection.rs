//! Selection state machine for the package browser.
//!
//! `Idle` → `PackageSelected` → `TestActive` → back to `PackageSelected` on
//! finish. Selecting any package always lands in `PackageSelected` with no
//! active test. There is no terminal state.

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::model::{Package, PackageId, TestId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("no package is selected")]
    NoPackageSelected,

    #[error("test {test_id} does not belong to the selected package")]
    InvalidSelection { test_id: TestId },

    #[error("test {test_id} is already completed")]
    AlreadyCompleted { test_id: TestId },
}

/// What happens to completed tests when a package is (re-)selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProgressPolicy {
    /// Every selection starts from an empty completed set.
    #[default]
    ResetOnSelect,
    /// Completed sets are kept per package for the rest of the session.
    KeepPerPackage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    PackageSelected,
    TestActive,
}

/// Outcome of finishing a test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    Recorded,
    /// The test was already marked completed; the set is unchanged.
    AlreadyRecorded,
}

/// Set of completed test ids. Insertion order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletedTests(BTreeSet<TestId>);

impl CompletedTests {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &TestId) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of completed ids that belong to `package`.
    #[must_use]
    pub fn count_in(&self, package: &Package) -> usize {
        package
            .tests()
            .iter()
            .filter(|test| self.0.contains(test.id()))
            .count()
    }

    /// True when every test in `package` is completed.
    ///
    /// Ids from other packages are not counted, so a stray id can never
    /// make a package look finished.
    #[must_use]
    pub fn covers(&self, package: &Package) -> bool {
        self.count_in(package) == package.tests().len()
    }

    fn insert(&mut self, id: TestId) -> bool {
        self.0.insert(id)
    }
}

impl FromIterator<TestId> for CompletedTests {
    fn from_iter<I: IntoIterator<Item = TestId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Session-scoped UI selection: which package, which test, what is done.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    policy: ProgressPolicy,
    selected_package: Option<PackageId>,
    active_test: Option<TestId>,
    completed: CompletedTests,
    retained: HashMap<PackageId, CompletedTests>,
}

impl SelectionState {
    #[must_use]
    pub fn new(policy: ProgressPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn policy(&self) -> ProgressPolicy {
        self.policy
    }

    #[must_use]
    pub fn selected_package(&self) -> Option<PackageId> {
        self.selected_package
    }

    #[must_use]
    pub fn active_test(&self) -> Option<&TestId> {
        self.active_test.as_ref()
    }

    #[must_use]
    pub fn completed(&self) -> &CompletedTests {
        &self.completed
    }

    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        match (self.selected_package, &self.active_test) {
            (None, _) => SelectionPhase::Idle,
            (Some(_), None) => SelectionPhase::PackageSelected,
            (Some(_), Some(_)) => SelectionPhase::TestActive,
        }
    }

    /// Select a package, clearing the active test.
    ///
    /// Under `ResetOnSelect` the completed set is emptied, even when the
    /// same package is selected again.
    pub fn select_package(&mut self, id: PackageId) {
        let previous = std::mem::take(&mut self.completed);
        if self.policy == ProgressPolicy::KeepPerPackage {
            if let Some(prev_id) = self.selected_package {
                self.retained.insert(prev_id, previous);
            }
            self.completed = self.retained.remove(&id).unwrap_or_default();
        }
        self.selected_package = Some(id);
        self.active_test = None;
    }

    /// Make `test_id` the active test.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoPackageSelected` when nothing is selected,
    /// `SelectionError::InvalidSelection` when the test is not part of the
    /// selected package, and `SelectionError::AlreadyCompleted` when the test
    /// is already done.
    pub fn start_test(&mut self, package: &Package, test_id: TestId) -> Result<(), SelectionError> {
        self.ensure_in_selection(package, &test_id)?;
        if self.completed.contains(&test_id) {
            return Err(SelectionError::AlreadyCompleted { test_id });
        }
        self.active_test = Some(test_id);
        Ok(())
    }

    /// Mark `test_id` completed and return to the package.
    ///
    /// Finishing a test twice leaves it completed and reports
    /// `Completion::AlreadyRecorded`.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::NoPackageSelected` or
    /// `SelectionError::InvalidSelection` under the same rules as `start_test`.
    pub fn finish_test(
        &mut self,
        package: &Package,
        test_id: TestId,
    ) -> Result<Completion, SelectionError> {
        self.ensure_in_selection(package, &test_id)?;
        let recorded = self.completed.insert(test_id);
        self.active_test = None;
        Ok(if recorded {
            Completion::Recorded
        } else {
            Completion::AlreadyRecorded
        })
    }

    /// Leave the active test without completing it.
    pub fn abandon_test(&mut self) {
        self.active_test = None;
    }

    fn ensure_in_selection(
        &self,
        package: &Package,
        test_id: &TestId,
    ) -> Result<(), SelectionError> {
        let selected = self
            .selected_package
            .ok_or(SelectionError::NoPackageSelected)?;
        if selected != package.id() || !package.contains_test(test_id) {
            return Err(SelectionError::InvalidSelection {
                test_id: test_id.clone(),
            });
        }
        Ok(())
    }
}
