use packs_core::CompletedTests;
use packs_core::model::{Package, TestId};

use crate::vm::guide_vm::guide_to_html;

pub const COMPLETION_MARKER: &str = "✅";
pub const COMPLETION_BANNER: &str = "All tests completed! 🎉";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestButtonVm {
    pub id: TestId,
    pub label: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackageViewVm {
    Locked {
        title: String,
        description: String,
        price_label: String,
        estimated_time: Option<String>,
    },
    Unlocked {
        title: String,
        guide_html: String,
        tests: Vec<TestButtonVm>,
        progress_label: String,
        show_banner: bool,
    },
}

/// Map a package and the caller's facts about it to what the view shows.
///
/// The locked variant carries no guide or tests at all.
#[must_use]
pub fn map_package_view(
    package: &Package,
    owned: bool,
    completed: &CompletedTests,
) -> PackageViewVm {
    if !owned {
        let price_label = if package.price() == 0 {
            "Free".to_string()
        } else {
            format!("Price: {}", package.price())
        };
        return PackageViewVm::Locked {
            title: package.name().to_string(),
            description: package.description().to_string(),
            price_label,
            estimated_time: package
                .estimated_time()
                .map(|time| format!("Estimated time: {time}")),
        };
    }

    let tests = package
        .tests()
        .iter()
        .map(|test| {
            let done = completed.contains(test.id());
            let label = if done {
                format!("{} {COMPLETION_MARKER}", test.name())
            } else {
                test.name().to_string()
            };
            TestButtonVm {
                id: test.id().clone(),
                label,
                completed: done,
            }
        })
        .collect::<Vec<_>>();

    let done = completed.count_in(package);
    PackageViewVm::Unlocked {
        title: package.name().to_string(),
        guide_html: guide_to_html(package.guide()),
        progress_label: format!("{done} of {} completed", package.tests().len()),
        show_banner: completed.covers(package),
        tests,
    }
}
