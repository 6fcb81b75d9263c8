use dioxus::prelude::*;
use packs_core::model::{PackageId, TestId};

use crate::context::AppContext;
use crate::views::{PackageSelector, ViewError, ViewState, WalletPanel, view_state_from_resource};
use crate::vm::{PurchaseStatus, purchase_failure_message};

/// Loads the catalog and wires purchases into the package selector.
#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog_service = ctx.catalog();
    let purchases = ctx.purchases();
    let test_launcher = ctx.test_launcher();
    let policy = ctx.progress_policy();
    let wallet = ctx.wallet();
    let mut purchase = use_signal(PurchaseStatus::default);

    let resource = use_resource(move || {
        let catalog_service = catalog_service.clone();
        async move {
            catalog_service.snapshot().await.map_err(|err| {
                tracing::error!(error = %err, "failed to load catalog");
                ViewError::Unknown
            })
        }
    });

    let balance = use_resource(move || {
        let wallet = wallet.clone();
        async move {
            wallet
                .balance()
                .await
                .inspect_err(|err| tracing::warn!(error = %err, "failed to read wallet balance"))
                .ok()
        }
    });

    let on_buy = move |package_id: PackageId| {
        if purchase().is_pending_for(package_id) {
            return;
        }
        // Pending must be visible before the task runs.
        purchase.set(PurchaseStatus::Pending(package_id));
        let purchases = purchases.clone();
        let mut resource = resource;
        let mut balance = balance;
        spawn(async move {
            match purchases.buy(package_id).await {
                Ok(_) => {
                    purchase.set(PurchaseStatus::Idle);
                    resource.restart();
                    balance.restart();
                }
                Err(err) => {
                    purchase.set(PurchaseStatus::Failed {
                        package_id,
                        message: purchase_failure_message(&err),
                    });
                }
            }
        });
    };

    let on_test_start = move |(package_id, test_id): (PackageId, TestId)| {
        test_launcher.test_started(package_id, &test_id);
    };

    let on_charged = move |_: ()| {
        let mut balance = balance;
        balance.restart();
    };

    let state = view_state_from_resource(&resource);
    let balance_now = balance().flatten();
    rsx! {
        div { class: "page catalog-page",
            header { class: "view-header",
                h2 { class: "view-title", "Smart Packages" }
                p { class: "view-subtitle", "Pick a package, read its guide, and work through the tests." }
            }
            WalletPanel { balance: balance_now, on_charged }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(catalog) => rsx! {
                    if catalog.packages.is_empty() {
                        p { class: "view-hint", "No packages are available yet." }
                    } else {
                        PackageSelector {
                            catalog,
                            policy,
                            purchase: purchase(),
                            on_buy,
                            on_test_start,
                        }
                    }
                },
            }
        }
    }
}
