use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{PackageId, TestId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackageError {
    #[error("package name cannot be empty")]
    EmptyName,

    #[error("test name cannot be empty")]
    EmptyTestName,

    #[error("test {0} appears more than once in the package")]
    DuplicateTest(TestId),
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// A single assessable unit inside a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    id: TestId,
    name: String,
}

impl Test {
    /// Create a test with a trimmed, non-empty name.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::EmptyTestName` if the name is blank.
    pub fn new(id: TestId, name: impl Into<String>) -> Result<Self, PackageError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(PackageError::EmptyTestName);
        }
        Ok(Self { id, name })
    }

    #[must_use]
    pub fn id(&self) -> &TestId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

//
// ─── PACKAGE ───────────────────────────────────────────────────────────────────
//

/// A purchasable bundle: a guide plus an ordered list of tests.
///
/// Packages are immutable once loaded. Test order is the order the catalog
/// lists them in and is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    id: PackageId,
    name: String,
    description: String,
    guide: String,
    tests: Vec<Test>,
    price: u32,
    estimated_time: Option<String>,
}

impl Package {
    /// Creates a validated package.
    ///
    /// # Errors
    ///
    /// Returns `PackageError::EmptyName` if the name is blank, or
    /// `PackageError::DuplicateTest` if two tests share an id.
    pub fn new(
        id: PackageId,
        name: impl Into<String>,
        description: impl Into<String>,
        guide: impl Into<String>,
        tests: Vec<Test>,
    ) -> Result<Self, PackageError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(PackageError::EmptyName);
        }

        let mut seen = HashSet::with_capacity(tests.len());
        for test in &tests {
            if !seen.insert(test.id()) {
                return Err(PackageError::DuplicateTest(test.id().clone()));
            }
        }

        Ok(Self {
            id,
            name,
            description: description.into(),
            guide: guide.into(),
            tests,
            price: 0,
            estimated_time: None,
        })
    }

    #[must_use]
    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn with_estimated_time(mut self, estimated_time: Option<String>) -> Self {
        self.estimated_time = estimated_time
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }

    #[must_use]
    pub fn id(&self) -> PackageId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn guide(&self) -> &str {
        &self.guide
    }

    #[must_use]
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    #[must_use]
    pub fn price(&self) -> u32 {
        self.price
    }

    #[must_use]
    pub fn estimated_time(&self) -> Option<&str> {
        self.estimated_time.as_deref()
    }

    #[must_use]
    pub fn test(&self, id: &TestId) -> Option<&Test> {
        self.tests.iter().find(|test| test.id() == id)
    }

    #[must_use]
    pub fn contains_test(&self, id: &TestId) -> bool {
        self.test(id).is_some()
    }
}
