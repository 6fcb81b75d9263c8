use dioxus::prelude::*;
use packs_core::CompletedTests;
use packs_core::model::{Package, TestId};

use crate::vm::{COMPLETION_BANNER, PackageViewVm, PurchaseStatus, map_package_view};

/// Locked (buy) or unlocked (guide + tests) view of one package.
///
/// Holds no state. `on_buy` carries no package id; the parent closes over it.
#[component]
pub fn PackageView(
    package: Package,
    owned: bool,
    completed: CompletedTests,
    #[props(default)] purchase: PurchaseStatus,
    on_buy: EventHandler<()>,
    on_test_select: EventHandler<TestId>,
) -> Element {
    let package_id = package.id();

    match map_package_view(&package, owned, &completed) {
        PackageViewVm::Locked {
            title,
            description,
            price_label,
            estimated_time,
        } => {
            let pending = purchase.is_pending_for(package_id);
            let failure = purchase.failure_for(package_id).map(str::to_owned);
            let buy_label = if pending { "Purchasing..." } else { "Buy Package" };
            rsx! {
                div { class: "package-card package-card--locked",
                    h2 { class: "package-title", "{title}" }
                    p { class: "package-description", "{description}" }
                    div { class: "package-meta",
                        span { class: "package-price", "{price_label}" }
                        if let Some(time) = estimated_time {
                            span { class: "package-time", "{time}" }
                        }
                    }
                    if let Some(message) = failure {
                        p { class: "package-error", "{message}" }
                    }
                    button {
                        class: "btn btn-primary package-buy",
                        r#type: "button",
                        disabled: pending,
                        onclick: move |_| on_buy.call(()),
                        "{buy_label}"
                    }
                }
            }
        }
        PackageViewVm::Unlocked {
            title,
            guide_html,
            tests,
            progress_label,
            show_banner,
        } => {
            let test_buttons = tests.into_iter().map(|test| {
                let id = test.id.clone();
                let class = if test.completed {
                    "package-test package-test--done"
                } else {
                    "package-test"
                };
                rsx! {
                    li { key: "{test.id}",
                        button {
                            class: "{class}",
                            r#type: "button",
                            disabled: test.completed,
                            onclick: move |_| on_test_select.call(id.clone()),
                            "{test.label}"
                        }
                    }
                }
            });
            rsx! {
                div { class: "package-card package-card--owned",
                    h2 { class: "package-title", "{title}" }
                    div { class: "package-guide", dangerous_inner_html: "{guide_html}" }
                    p { class: "package-progress", "{progress_label}" }
                    ul { class: "package-tests",
                        {test_buttons}
                    }
                    if show_banner {
                        div { class: "package-complete", "{COMPLETION_BANNER}" }
                    }
                }
            }
        }
    }
}
