use packs_core::model::{PackageId, TestId};

/// Hook invoked when the user starts a test.
///
/// Reserved for an external test runner. The selector only notifies it and
/// never waits on or reacts to the result.
pub trait TestLauncher: Send + Sync {
    fn test_started(&self, package_id: PackageId, test_id: &TestId);
}

/// Default launcher: records the event in the log and nothing else.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTestLauncher;

impl TestLauncher for NoopTestLauncher {
    fn test_started(&self, package_id: PackageId, test_id: &TestId) {
        tracing::debug!(%package_id, %test_id, "test started");
    }
}
