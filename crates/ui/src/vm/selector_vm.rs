use packs_core::model::{Package, PackageId, Test, TestId};
use packs_core::{CompletedTests, ProgressPolicy, SelectionError, SelectionPhase, SelectionState};
use services::CatalogSnapshot;

/// User intents emitted by the selector's child views.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorIntent {
    SelectPackage(PackageId),
    BuyRequested,
    TestSelected(TestId),
    TestFinished(TestId),
    BackToPackage,
}

/// Work the container must do after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorEffect {
    None,
    Purchase(PackageId),
    TestStarted(PackageId, TestId),
}

/// What the selector should render below the package buttons.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorScreen {
    Empty,
    Package {
        package: Package,
        owned: bool,
        completed: CompletedTests,
    },
    Test {
        package_name: String,
        test: Test,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackageSelectorVm {
    state: SelectionState,
}

impl PackageSelectorVm {
    #[must_use]
    pub fn new(policy: ProgressPolicy) -> Self {
        Self {
            state: SelectionState::new(policy),
        }
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        self.state.phase()
    }

    /// Apply one intent against the current catalog.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError` when the intent does not fit the current
    /// selection; the state is left unchanged in that case.
    pub fn dispatch(
        &mut self,
        intent: SelectorIntent,
        catalog: &CatalogSnapshot,
    ) -> Result<SelectorEffect, SelectionError> {
        match intent {
            SelectorIntent::SelectPackage(id) => {
                self.state.select_package(id);
                Ok(SelectorEffect::None)
            }
            SelectorIntent::BuyRequested => {
                let package = self.selected(catalog)?;
                Ok(SelectorEffect::Purchase(package.id()))
            }
            SelectorIntent::TestSelected(test_id) => {
                let package = self.selected(catalog)?;
                if !catalog.owns(package.id()) {
                    return Err(SelectionError::InvalidSelection { test_id });
                }
                self.state.start_test(package, test_id.clone())?;
                Ok(SelectorEffect::TestStarted(package.id(), test_id))
            }
            SelectorIntent::TestFinished(test_id) => {
                let package = self.selected(catalog)?;
                if !catalog.owns(package.id()) {
                    return Err(SelectionError::InvalidSelection { test_id });
                }
                self.state.finish_test(package, test_id)?;
                Ok(SelectorEffect::None)
            }
            SelectorIntent::BackToPackage => {
                self.state.abandon_test();
                Ok(SelectorEffect::None)
            }
        }
    }

    #[must_use]
    pub fn screen(&self, catalog: &CatalogSnapshot) -> SelectorScreen {
        let Ok(package) = self.selected(catalog) else {
            return SelectorScreen::Empty;
        };

        if let Some(test) = self.state.active_test().and_then(|id| package.test(id)) {
            return SelectorScreen::Test {
                package_name: package.name().to_string(),
                test: test.clone(),
            };
        }

        SelectorScreen::Package {
            package: package.clone(),
            owned: catalog.owns(package.id()),
            completed: self.state.completed().clone(),
        }
    }

    fn selected<'a>(&self, catalog: &'a CatalogSnapshot) -> Result<&'a Package, SelectionError> {
        self.state
            .selected_package()
            .and_then(|id| catalog.package(id))
            .ok_or(SelectionError::NoPackageSelected)
    }
}
