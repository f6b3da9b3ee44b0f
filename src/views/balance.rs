use super::api;
use super::widgets::{Banners, ConfirmModal, LoadingSpinner};
use crate::Route;
use crate::error::ClientError;
use crate::flows::{self, Dashboard};
use crate::forms::{Confirmation, TransferForm, TransferOrder};
use crate::qr::QrScanner;
use crate::session::LocalStorageStore;
use dioxus::prelude::*;

// balance and grade of the logged-in user, the transfer form and the message list
#[component]
pub fn Balance() -> Element {
    let mut dashboard = use_signal(|| None::<Dashboard>);
    let mut transfer = use_signal(TransferForm::default);
    let mut show_transfer = use_signal(|| false);
    let mut pending = use_signal(Confirmation::<TransferOrder>::default);
    let mut show_scanner = use_signal(|| false);
    let mut error = use_signal(String::new);
    let mut success = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let navigator = use_navigator();

    let refresh = move || {
        loading.set(true);
        spawn(async move {
            let result = flows::load_dashboard(&api(), &LocalStorageStore).await;
            loading.set(false);
            match result {
                Ok(data) => dashboard.set(Some(data)),
                Err(ClientError::NoSession) => {
                    navigator.replace(Route::Login {});
                }
                Err(e) => {
                    log::error!("Could not load balance: {}", e);
                    error.set(e.user_message("Failed to fetch data."));
                }
            }
        });
    };

    use_effect(move || refresh());

    let open_confirmation = move |evt: FormEvent| {
        evt.prevent_default();
        match transfer.read().validate() {
            Ok(order) => {
                error.set(String::new());
                pending.write().stage(order);
            }
            Err(e) => {
                log::warn!("Transfer form rejected: {}", e);
                error.set(e.user_message(""));
            }
        }
    };

    let confirm_transfer = move |_| {
        let Some(order) = pending.write().send() else {
            return;
        };
        loading.set(true);
        spawn(async move {
            let result = flows::send_transfer(&api(), &LocalStorageStore, &order).await;
            loading.set(false);
            pending.write().settle();
            match result {
                Ok(receipt) => {
                    success.set(receipt.summary());
                    error.set(String::new());
                    transfer.set(TransferForm::default());
                    show_transfer.set(false);
                    match receipt.refreshed {
                        Ok(data) => dashboard.set(Some(data)),
                        Err(e) => error.set(e.user_message("Failed to fetch data.")),
                    }
                }
                Err(ClientError::NoSession) => {
                    navigator.replace(Route::Login {});
                }
                Err(e) => {
                    log::error!("Transfer failed: {}", e);
                    success.set(String::new());
                    error.set(e.user_message("Transfer failed. Please try again."));
                }
            }
        });
    };

    let on_scan = move |payload: String| {
        if !transfer.write().apply_scan(&payload) {
            log::warn!("Ignoring empty QR payload");
        }
        show_scanner.set(false);
    };

    let balance_text = dashboard
        .read()
        .as_ref()
        .map(|d| d.balance.to_string())
        .unwrap_or_default();
    let grade_text = dashboard
        .read()
        .as_ref()
        .and_then(|d| d.grade.clone())
        .unwrap_or_default();
    let messages = dashboard
        .read()
        .as_ref()
        .map(|d| d.messages.clone())
        .unwrap_or_default();

    rsx! {
        div { id: "balance-page", class: "page",
            div { class: "card",
                button {
                    class: "corner",
                    onclick: move |_| {
                        navigator.push(Route::About {});
                    },
                    "Profile"
                }
                h2 { "Your Balance" }
                Banners { error: error(), success: success() }
                p {
                    "Balance: "
                    span { class: "amount", "{balance_text} " }
                    span { "Bonus points" }
                }
                p {
                    "Grade: "
                    span { class: "grade", "{grade_text}" }
                }

                if !show_transfer() {
                    div { class: "actions",
                        button {
                            disabled: loading(),
                            onclick: move |_| show_transfer.set(true),
                            if loading() {
                                "Loading..."
                            } else {
                                "Send Bonus"
                            }
                        }
                        button { disabled: loading(), onclick: move |_| refresh(), "Refresh" }
                    }
                } else {
                    form { onsubmit: open_confirmation,
                        label { r#for: "recipient", "Recipient Username or phoneNumber" }
                        div { class: "inline",
                            input {
                                r#type: "text",
                                id: "recipient",
                                value: "{transfer.read().recipient}",
                                required: true,
                                disabled: loading(),
                                oninput: move |evt| transfer.write().recipient = evt.value(),
                            }
                            button {
                                r#type: "button",
                                disabled: loading(),
                                onclick: move |_| show_scanner.set(true),
                                "Scan QR"
                            }
                        }
                        label { r#for: "amount", "Amount" }
                        input {
                            r#type: "number",
                            id: "amount",
                            step: 0.01,
                            value: "{transfer.read().amount}",
                            required: true,
                            disabled: loading(),
                            oninput: move |evt| transfer.write().amount = evt.value(),
                        }
                        div { class: "actions",
                            button {
                                r#type: "submit",
                                disabled: loading(),
                                if loading() {
                                    "Loading..."
                                } else {
                                    "Confirm Transfer"
                                }
                            }
                            button {
                                r#type: "button",
                                class: "secondary",
                                disabled: loading(),
                                onclick: move |_| show_transfer.set(false),
                                "Cancel"
                            }
                        }
                    }
                }

                if show_scanner() {
                    div { class: "modal-backdrop",
                        div { class: "modal",
                            h3 { "Scan QR Code" }
                            QrScanner { on_scan: on_scan }
                            button {
                                class: "secondary",
                                onclick: move |_| show_scanner.set(false),
                                "Close Scanner"
                            }
                        }
                    }
                }

                if let Some(order) = pending.read().staged().cloned() {
                    ConfirmModal {
                        title: "Are you sure?",
                        confirm_label: "Yes, Transfer",
                        busy: pending.read().is_sending(),
                        on_confirm: confirm_transfer,
                        on_cancel: move |_| pending.write().cancel(),
                        p {
                            "You are about to transfer "
                            strong { "{order.amount()} bonus" }
                            " to "
                            strong { "{order.recipient()}" }
                            ". This action cannot be undone."
                        }
                    }
                }

                if loading() {
                    LoadingSpinner {}
                }
            }

            div { class: "messages",
                h3 { "Messages" }
                if messages.is_empty() {
                    p { class: "hint", "No messages found." }
                } else {
                    for (index , message) in messages.iter().enumerate() {
                        div { key: "{index}-{message.date}", class: "message",
                            p { "{message.content}" }
                            p { class: "hint", "{message.when()}" }
                        }
                    }
                }
            }
        }
    }
}
