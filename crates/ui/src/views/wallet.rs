use dioxus::prelude::*;

use crate::context::AppContext;
use crate::vm::{
    PendingTopup, TopupStatus, balance_label, parse_topup_amount, wallet_failure_message,
};

/// Wallet balance with an online top-up form.
///
/// The balance comes from the parent; `on_charged` fires after a verified
/// top-up so the parent can re-read it.
#[component]
pub fn WalletPanel(balance: Option<u32>, on_charged: EventHandler<()>) -> Element {
    let wallet = use_context::<AppContext>().wallet();
    let enabled = wallet.topups_enabled();
    let mut amount = use_signal(String::new);
    let mut authority = use_signal(String::new);
    let mut pending = use_signal(|| None::<PendingTopup>);
    let mut status = use_signal(TopupStatus::default);

    let link_wallet = wallet.clone();
    let request_link = move |_: MouseEvent| {
        if status.read().is_working() {
            return;
        }
        let requested = match parse_topup_amount(&amount.read()) {
            Ok(requested) => requested,
            Err(message) => {
                status.set(TopupStatus::Failed(message));
                return;
            }
        };
        status.set(TopupStatus::Working);
        let wallet = link_wallet.clone();
        spawn(async move {
            match wallet.topup_link(requested).await {
                Ok(link) => {
                    pending.set(Some(PendingTopup {
                        link,
                        amount: requested,
                    }));
                    status.set(TopupStatus::Idle);
                }
                Err(err) => status.set(TopupStatus::Failed(wallet_failure_message(&err))),
            }
        });
    };

    let confirm = move |_: MouseEvent| {
        if status.read().is_working() {
            return;
        }
        let Some(topup) = pending() else {
            return;
        };
        let code = authority.read().trim().to_string();
        if code.is_empty() {
            status.set(TopupStatus::Failed(
                "Paste the authority code from the payment page first.".to_string(),
            ));
            return;
        }
        status.set(TopupStatus::Working);
        let wallet = wallet.clone();
        spawn(async move {
            match wallet.confirm_topup(&code, topup.amount).await {
                Ok(receipt) => {
                    pending.set(None);
                    authority.set(String::new());
                    status.set(TopupStatus::Credited {
                        ref_id: receipt.ref_id,
                        amount: receipt.credited,
                    });
                    on_charged.call(());
                }
                Err(err) => status.set(TopupStatus::Failed(wallet_failure_message(&err))),
            }
        });
    };

    let working = status.read().is_working();
    let amount_text = amount();
    let authority_text = authority();

    rsx! {
        section { class: "wallet",
            p { class: "wallet-balance", "{balance_label(balance)}" }
            if !enabled {
                p { class: "view-hint", "Online top-up is not configured." }
            } else {
                div { class: "wallet-topup",
                    input {
                        class: "wallet-input",
                        r#type: "number",
                        min: "1",
                        placeholder: "Amount (toman)",
                        value: "{amount_text}",
                        oninput: move |evt| amount.set(evt.value()),
                    }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        disabled: working,
                        onclick: request_link,
                        "Get payment link"
                    }
                }
                if let Some(topup) = pending() {
                    div { class: "wallet-topup wallet-topup--pending",
                        a { class: "wallet-link", href: "{topup.link}", target: "_blank",
                            "Pay {topup.amount} toman"
                        }
                        input {
                            class: "wallet-input",
                            placeholder: "Authority code",
                            value: "{authority_text}",
                            oninput: move |evt| authority.set(evt.value()),
                        }
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            disabled: working,
                            onclick: confirm,
                            "Confirm payment"
                        }
                    }
                }
            }
            match status() {
                TopupStatus::Credited { ref_id, amount } => rsx! {
                    p { class: "wallet-ok",
                        "Wallet charged with {amount} toman. Reference: {ref_id}"
                    }
                },
                TopupStatus::Failed(message) => rsx! {
                    p { class: "package-error", "{message}" }
                },
                TopupStatus::Idle | TopupStatus::Working => rsx! {},
            }
        }
    }
}
