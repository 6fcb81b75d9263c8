use dioxus::prelude::*;
use packs_core::ProgressPolicy;
use packs_core::model::{PackageId, TestId};
use services::CatalogSnapshot;

use crate::views::{PackageView, TestView};
use crate::vm::{PackageSelectorVm, PurchaseStatus, SelectorEffect, SelectorIntent, SelectorScreen};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

/// Owns the selection state machine and routes child intents through it.
///
/// Ownership comes in with `catalog`; buying is handed to `on_buy` and the
/// caller is expected to pass a fresh catalog once the purchase lands.
#[component]
pub fn PackageSelector(
    catalog: CatalogSnapshot,
    #[props(default)] policy: ProgressPolicy,
    #[props(default)] purchase: PurchaseStatus,
    on_buy: EventHandler<PackageId>,
    on_test_start: EventHandler<(PackageId, TestId)>,
) -> Element {
    let mut vm = use_signal(|| PackageSelectorVm::new(policy));

    let dispatch_catalog = catalog.clone();
    let dispatch = use_callback(move |intent: SelectorIntent| {
        let result = vm.write().dispatch(intent.clone(), &dispatch_catalog);
        match result {
            Ok(SelectorEffect::None) => {}
            Ok(SelectorEffect::Purchase(package_id)) => on_buy.call(package_id),
            Ok(SelectorEffect::TestStarted(package_id, test_id)) => {
                on_test_start.call((package_id, test_id));
            }
            Err(err) => {
                tracing::warn!(?intent, error = %err, "ignored selector intent");
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<SelectorTestHandles>() {
                handles.register(dispatch);
            }
        }
    }

    let screen = vm.read().screen(&catalog);
    let selected = vm.read().state().selected_package();

    let package_buttons = catalog.packages.iter().map(|package| {
        let package_id = package.id();
        let name = package.name().to_string();
        let class = if selected == Some(package_id) {
            "package-button package-button--selected"
        } else {
            "package-button"
        };
        rsx! {
            button {
                key: "{package_id}",
                class: "{class}",
                r#type: "button",
                onclick: move |_| dispatch.call(SelectorIntent::SelectPackage(package_id)),
                "{name}"
            }
        }
    });

    rsx! {
        div { class: "package-selector",
            nav { class: "package-buttons",
                {package_buttons}
            }
            match screen {
                SelectorScreen::Empty => rsx! {
                    p { class: "view-hint", "Pick a package to see what is inside." }
                },
                SelectorScreen::Package { package, owned, completed } => rsx! {
                    PackageView {
                        package,
                        owned,
                        completed,
                        purchase: purchase.clone(),
                        on_buy: move |_: ()| dispatch.call(SelectorIntent::BuyRequested),
                        on_test_select: move |test_id: TestId| dispatch.call(SelectorIntent::TestSelected(test_id)),
                    }
                },
                SelectorScreen::Test { package_name, test } => rsx! {
                    TestView {
                        package_name,
                        test,
                        on_finish: move |test_id: TestId| dispatch.call(SelectorIntent::TestFinished(test_id)),
                        on_back: move |_: ()| dispatch.call(SelectorIntent::BackToPackage),
                    }
                },
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct SelectorTestHandles {
    dispatch: Rc<RefCell<Option<Callback<SelectorIntent>>>>,
}

#[cfg(test)]
impl SelectorTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<SelectorIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<SelectorIntent> {
        (*self.dispatch.borrow()).expect("selector dispatch registered")
    }
}
