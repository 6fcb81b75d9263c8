use dioxus::prelude::*;
use packs_core::model::{Test, TestId};

#[component]
pub fn TestView(
    package_name: String,
    test: Test,
    on_finish: EventHandler<TestId>,
    on_back: EventHandler<()>,
) -> Element {
    let test_id = test.id().clone();
    let test_name = test.name().to_string();
    rsx! {
        div { class: "test-card",
            header { class: "view-header",
                h2 { class: "view-title", "{test_name}" }
                p { class: "view-subtitle", "Part of {package_name}" }
            }
            div { class: "test-actions",
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| on_back.call(()),
                    "Back to package"
                }
                button {
                    class: "btn btn-primary test-finish",
                    r#type: "button",
                    onclick: move |_| on_finish.call(test_id.clone()),
                    "Finish test"
                }
            }
        }
    }
}
