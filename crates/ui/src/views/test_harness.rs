use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use packs_core::model::{Package, PackageId, TestId};
use packs_core::{CompletedTests, ProgressPolicy};
use services::{
    AppServices, CatalogService, CatalogSnapshot, PaymentLinkService, PurchaseService,
    TestLauncher, WalletService,
};
use storage::{CatalogFile, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::package_selector::SelectorTestHandles;
use crate::views::{CatalogView, PackageSelector, PackageView};
use crate::vm::SelectorIntent;

#[derive(Clone)]
struct TestApp {
    services: AppServices,
    policy: ProgressPolicy,
}

impl UiApp for TestApp {
    fn progress_policy(&self) -> ProgressPolicy {
        self.policy
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn purchases(&self) -> Arc<PurchaseService> {
        self.services.purchases()
    }

    fn test_launcher(&self) -> Arc<dyn TestLauncher> {
        self.services.test_launcher()
    }

    fn wallet(&self) -> Arc<WalletService> {
        self.services.wallet()
    }
}

/// Everything the selector asked its container to do.
#[derive(Clone, Default)]
pub struct Recorded {
    pub buys: Rc<RefCell<Vec<PackageId>>>,
    pub started: Rc<RefCell<Vec<(PackageId, TestId)>>>,
}

#[derive(Props, Clone)]
struct SelectorHarnessProps {
    catalog: CatalogSnapshot,
    policy: ProgressPolicy,
    handles: SelectorTestHandles,
    recorded: Recorded,
}

impl PartialEq for SelectorHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn SelectorHarness(props: SelectorHarnessProps) -> Element {
    use_context_provider(|| props.handles.clone());
    let buys = Rc::clone(&props.recorded.buys);
    let started = Rc::clone(&props.recorded.started);
    rsx! {
        PackageSelector {
            catalog: props.catalog.clone(),
            policy: props.policy,
            on_buy: move |package_id: PackageId| buys.borrow_mut().push(package_id),
            on_test_start: move |event: (PackageId, TestId)| started.borrow_mut().push(event),
        }
    }
}

#[derive(Props, Clone)]
struct CatalogHarnessProps {
    app: Arc<TestApp>,
    handles: SelectorTestHandles,
}

impl PartialEq for CatalogHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn CatalogHarness(props: CatalogHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { CatalogView {} }
}

#[derive(Props, Clone, PartialEq)]
struct PackageViewHarnessProps {
    package: Package,
    owned: bool,
    completed: CompletedTests,
}

#[component]
fn PackageViewHarness(props: PackageViewHarnessProps) -> Element {
    rsx! {
        PackageView {
            package: props.package.clone(),
            owned: props.owned,
            completed: props.completed.clone(),
            on_buy: move |_: ()| {},
            on_test_select: move |_: TestId| {},
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub handles: SelectorTestHandles,
    pub recorded: Recorded,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    /// Send an intent through the selector's dispatcher and re-render.
    pub fn dispatch(&mut self, intent: SelectorIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_selector_harness(catalog: CatalogSnapshot, policy: ProgressPolicy) -> ViewHarness {
    let handles = SelectorTestHandles::default();
    let recorded = Recorded::default();
    let dom = VirtualDom::new_with_props(
        SelectorHarness,
        SelectorHarnessProps {
            catalog,
            policy,
            handles: handles.clone(),
            recorded: recorded.clone(),
        },
    );
    ViewHarness {
        dom,
        handles,
        recorded,
    }
}

pub fn setup_catalog_harness(storage: &Storage) -> ViewHarness {
    let services = AppServices::new(storage, PaymentLinkService::new(None));
    let app = Arc::new(TestApp {
        services,
        policy: ProgressPolicy::ResetOnSelect,
    });
    let handles = SelectorTestHandles::default();
    let dom = VirtualDom::new_with_props(
        CatalogHarness,
        CatalogHarnessProps {
            app,
            handles: handles.clone(),
        },
    );
    ViewHarness {
        dom,
        handles,
        recorded: Recorded::default(),
    }
}

pub fn storage_from_json(raw: &str) -> Storage {
    CatalogFile::from_json(raw)
        .expect("parse catalog")
        .into_storage()
        .expect("valid catalog")
}

pub fn render_package_view(package: Package, owned: bool, completed: CompletedTests) -> String {
    let mut dom = VirtualDom::new_with_props(
        PackageViewHarness,
        PackageViewHarnessProps {
            package,
            owned,
            completed,
        },
    );
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}
