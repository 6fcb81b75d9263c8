use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use packs_core::model::{OwnershipSet, Package, PackageId, Test, TestId};
use packs_core::{CompletedTests, ProgressPolicy};
use services::CatalogSnapshot;
use storage::repository::{PackageRepository, Storage, StorageError, WalletRepository};

use super::test_harness::{
    render_package_view, setup_catalog_harness, setup_selector_harness, storage_from_json,
};
use crate::vm::{COMPLETION_BANNER, COMPLETION_MARKER, SelectorIntent};

const MATH_GUIDE: &str = "Take the tests in order.";

fn tid(raw: &str) -> TestId {
    TestId::new(raw).unwrap()
}

fn math() -> Package {
    Package::new(
        PackageId::new(1),
        "Math",
        "Numbers and shapes",
        MATH_GUIDE,
        vec![
            Test::new(tid("a"), "Algebra").unwrap(),
            Test::new(tid("b"), "Geometry").unwrap(),
        ],
    )
    .unwrap()
    .with_price(120)
}

fn snapshot(owned: bool) -> CatalogSnapshot {
    let art = Package::new(PackageId::new(2), "Art", "Colours", "", Vec::new()).unwrap();
    let owned: OwnershipSet = if owned {
        [PackageId::new(1)].into_iter().collect()
    } else {
        OwnershipSet::new()
    };
    CatalogSnapshot {
        packages: vec![math(), art],
        owned,
    }
}

fn completed(ids: &[&str]) -> CompletedTests {
    ids.iter().map(|raw| tid(raw)).collect()
}

#[test]
fn locked_package_view_offers_purchase_only() {
    let html = render_package_view(math(), false, CompletedTests::default());
    assert!(html.contains("Math"), "missing title in {html}");
    assert!(html.contains("Numbers and shapes"), "missing description in {html}");
    assert!(html.contains("Buy Package"), "missing buy button in {html}");
    assert!(html.contains("Price: 120"), "missing price in {html}");
    assert!(!html.contains(MATH_GUIDE), "guide leaked in {html}");
    assert!(!html.contains("package-tests"), "tests leaked in {html}");
}

#[test]
fn locked_package_view_ignores_completed_tests() {
    let html = render_package_view(math(), false, completed(&["a", "b"]));
    assert!(html.contains("Buy Package"));
    assert!(!html.contains(COMPLETION_BANNER), "banner on locked view: {html}");
    assert!(!html.contains(COMPLETION_MARKER));
}

#[test]
fn unlocked_package_view_tracks_progress() {
    let html = render_package_view(math(), true, CompletedTests::default());
    assert!(html.contains(MATH_GUIDE), "missing guide in {html}");
    assert!(html.contains("Algebra"));
    assert!(html.contains("Geometry"));
    assert!(!html.contains("Buy Package"));
    assert!(!html.contains(COMPLETION_MARKER));
    assert!(!html.contains(COMPLETION_BANNER));

    let html = render_package_view(math(), true, completed(&["a"]));
    assert!(html.contains("Algebra ✅"), "missing marker in {html}");
    assert_eq!(html.matches(COMPLETION_MARKER).count(), 1);
    assert!(html.contains("1 of 2 completed"));
    assert!(!html.contains(COMPLETION_BANNER));

    let html = render_package_view(math(), true, completed(&["a", "b"]));
    assert_eq!(html.matches(COMPLETION_MARKER).count(), 2);
    assert!(html.contains(COMPLETION_BANNER), "missing banner in {html}");
}

#[test]
fn selector_starts_with_package_buttons_and_hint() {
    let mut harness = setup_selector_harness(snapshot(true), ProgressPolicy::ResetOnSelect);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Math"));
    assert!(html.contains("Art"));
    assert!(html.contains("Pick a package"), "missing hint in {html}");
    assert!(!html.contains("package-card"));
    assert!(!html.contains("package-button--selected"));
}

#[test]
fn selector_finishing_tests_marks_them_and_shows_banner() {
    let mut harness = setup_selector_harness(snapshot(true), ProgressPolicy::ResetOnSelect);
    harness.rebuild();

    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    let html = harness.render();
    assert!(html.contains("package-button--selected"));
    assert!(html.contains(MATH_GUIDE), "missing guide in {html}");
    assert!(!html.contains(COMPLETION_MARKER));

    harness.dispatch(SelectorIntent::TestFinished(tid("a")));
    let html = harness.render();
    assert!(html.contains("Algebra ✅"), "missing marker in {html}");
    assert!(!html.contains(COMPLETION_BANNER));

    harness.dispatch(SelectorIntent::TestFinished(tid("b")));
    let html = harness.render();
    assert!(html.contains(COMPLETION_BANNER), "missing banner in {html}");
}

#[test]
fn selector_active_test_replaces_package_view() {
    let mut harness = setup_selector_harness(snapshot(true), ProgressPolicy::ResetOnSelect);
    harness.rebuild();
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    harness.dispatch(SelectorIntent::TestSelected(tid("b")));

    let html = harness.render();
    assert!(html.contains("Finish test"), "missing test view in {html}");
    assert!(html.contains("Part of Math"));
    assert!(!html.contains("package-card"), "package view still shown: {html}");
    assert_eq!(
        harness.recorded.started.borrow().as_slice(),
        &[(PackageId::new(1), tid("b"))]
    );

    harness.dispatch(SelectorIntent::TestFinished(tid("b")));
    let html = harness.render();
    assert!(!html.contains("Finish test"));
    assert!(html.contains("Geometry ✅"), "missing marker in {html}");
}

#[test]
fn selector_back_returns_without_completing() {
    let mut harness = setup_selector_harness(snapshot(true), ProgressPolicy::ResetOnSelect);
    harness.rebuild();
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    harness.dispatch(SelectorIntent::TestSelected(tid("a")));
    harness.dispatch(SelectorIntent::BackToPackage);

    let html = harness.render();
    assert!(html.contains("package-card"));
    assert!(!html.contains(COMPLETION_MARKER));
}

#[test]
fn selector_reselecting_resets_progress() {
    let mut harness = setup_selector_harness(snapshot(true), ProgressPolicy::ResetOnSelect);
    harness.rebuild();
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    harness.dispatch(SelectorIntent::TestFinished(tid("a")));
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));

    let html = harness.render();
    assert!(!html.contains(COMPLETION_MARKER), "progress survived in {html}");
}

#[test]
fn selector_keep_policy_restores_progress() {
    let mut harness = setup_selector_harness(snapshot(true), ProgressPolicy::KeepPerPackage);
    harness.rebuild();
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    harness.dispatch(SelectorIntent::TestFinished(tid("a")));
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(2)));
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));

    let html = harness.render();
    assert!(html.contains("Algebra ✅"), "progress lost in {html}");
}

#[test]
fn selector_locked_package_forwards_buy() {
    let mut harness = setup_selector_harness(snapshot(false), ProgressPolicy::ResetOnSelect);
    harness.rebuild();
    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    let html = harness.render();
    assert!(html.contains("Buy Package"));
    assert!(!html.contains(MATH_GUIDE));

    harness.dispatch(SelectorIntent::TestSelected(tid("a")));
    assert!(!harness.render().contains("Finish test"));
    assert!(harness.recorded.started.borrow().is_empty());

    harness.dispatch(SelectorIntent::BuyRequested);
    assert_eq!(
        harness.recorded.buys.borrow().as_slice(),
        &[PackageId::new(1)]
    );
}

const CATALOG_JSON: &str = r#"{
    "packages": [
        {
            "id": 1,
            "name": "Math",
            "description": "Numbers and shapes",
            "guide": "Take the tests in order.",
            "price": 120,
            "tests": [{"id": "a", "name": "Algebra"}, {"id": "b", "name": "Geometry"}]
        }
    ],
    "balance": 500
}"#;

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_loads_packages() {
    let storage = storage_from_json(CATALOG_JSON);
    let mut harness = setup_catalog_harness(&storage);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Smart Packages"));
    assert!(html.contains("package-button"), "missing selector in {html}");
    assert!(html.contains("Pick a package"));
    assert!(html.contains("Wallet balance: 500"), "missing balance in {html}");
    assert!(html.contains("Online top-up is not configured."));
    assert!(!html.contains("Get payment link"));
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_reports_empty_catalog() {
    let storage = storage_from_json(r#"{"packages": []}"#);
    let mut harness = setup_catalog_harness(&storage);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("No packages are available yet."), "got {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_purchase_unlocks_package() {
    let storage = storage_from_json(CATALOG_JSON);
    let mut harness = setup_catalog_harness(&storage);
    harness.rebuild();
    harness.drive_async().await;

    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    assert!(harness.render().contains("Buy Package"));

    harness.dispatch(SelectorIntent::BuyRequested);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains(MATH_GUIDE), "package still locked: {html}");
    assert!(html.contains("Algebra"));
    assert!(!html.contains("Buy Package"));
    assert!(html.contains("Wallet balance: 380"), "stale balance in {html}");
    assert_eq!(storage.wallet.balance().await.unwrap(), 380);
}

struct CountingPackages {
    inner: Arc<dyn PackageRepository>,
    lookups: Arc<AtomicUsize>,
}

#[async_trait]
impl PackageRepository for CountingPackages {
    async fn list_packages(&self) -> Result<Vec<Package>, StorageError> {
        self.inner.list_packages().await
    }

    async fn get_package(&self, id: PackageId) -> Result<Package, StorageError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get_package(id).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_double_buy_charges_once() {
    let mut storage = storage_from_json(CATALOG_JSON);
    let lookups = Arc::new(AtomicUsize::new(0));
    storage.packages = Arc::new(CountingPackages {
        inner: Arc::clone(&storage.packages),
        lookups: Arc::clone(&lookups),
    });
    let mut harness = setup_catalog_harness(&storage);
    harness.rebuild();
    harness.drive_async().await;

    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    // Both clicks land before the purchase task gets to run.
    harness.dispatch(SelectorIntent::BuyRequested);
    harness.dispatch(SelectorIntent::BuyRequested);
    harness.drive_async().await;

    assert_eq!(lookups.load(Ordering::SeqCst), 1, "second click reached the service");
    assert_eq!(storage.wallet.balance().await.unwrap(), 380);
    let html = harness.render();
    assert!(html.contains(MATH_GUIDE), "package still locked: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_shows_purchase_failure() {
    let storage = storage_from_json(&CATALOG_JSON.replace("\"balance\": 500", "\"balance\": 50"));
    let mut harness = setup_catalog_harness(&storage);
    harness.rebuild();
    harness.drive_async().await;

    harness.dispatch(SelectorIntent::SelectPackage(PackageId::new(1)));
    harness.dispatch(SelectorIntent::BuyRequested);
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("is below the package price"), "missing error in {html}");
    assert!(html.contains("Buy Package"));
    assert!(!html.contains(MATH_GUIDE));
}

struct FailingPackages;

#[async_trait]
impl PackageRepository for FailingPackages {
    async fn list_packages(&self) -> Result<Vec<Package>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_package(&self, _id: PackageId) -> Result<Package, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_view_renders_error_state() {
    let mut storage = Storage::in_memory();
    storage.packages = Arc::new(FailingPackages);
    let mut harness = setup_catalog_harness(&storage);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"));
}
