use super::api;
use super::widgets::{Banners, ConfirmModal, LoadingSpinner, SecretInput};
use crate::Route;
use crate::config::REDIRECT_DELAY_MS;
use crate::flows;
use crate::forms::{NewAccount, RegisterForm};
use dioxus::prelude::*;

// collect the account fields, warn that nothing can be recovered, then create the account
#[component]
pub fn Register() -> Element {
    let mut form = use_signal(RegisterForm::default);
    let mut pending = use_signal(|| None::<NewAccount>);
    let mut error = use_signal(String::new);
    let mut success = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let navigator = use_navigator();

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        match form.read().validate() {
            Ok(account) => {
                error.set(String::new());
                pending.set(Some(account));
            }
            Err(e) => {
                log::warn!("Registration form rejected: {}", e);
                error.set(e.user_message(""));
            }
        }
    };

    let confirm_registration = move |_| {
        if loading() {
            return;
        }
        let Some(account) = pending.write().take() else {
            return;
        };
        loading.set(true);
        spawn(async move {
            let result = flows::register(&api(), &account).await;
            loading.set(false);
            match result {
                Ok(()) => {
                    error.set(String::new());
                    success.set("Registration successful! Redirecting to login...".to_string());
                    gloo_timers::future::TimeoutFuture::new(REDIRECT_DELAY_MS).await;
                    navigator.push(Route::Login {});
                }
                Err(e) => {
                    log::error!("Registration failed: {}", e);
                    success.set(String::new());
                    error.set(e.user_message("Failed to register. Please try again."));
                }
            }
        });
    };

    rsx! {
        div { id: "register-page", class: "page",
            if loading() {
                LoadingSpinner {}
            }
            div { class: "card",
                h1 { "Register" }
                Banners { error: error(), success: success() }
                form { onsubmit: handle_submit,
                    label { r#for: "reg-display-name", "Display Name" }
                    input {
                        r#type: "text",
                        id: "reg-display-name",
                        placeholder: "Enter display name (optional)",
                        value: "{form.read().display_name}",
                        disabled: loading(),
                        oninput: move |evt| form.write().display_name = evt.value(),
                    }
                    label { r#for: "reg-username", "Username" }
                    input {
                        r#type: "text",
                        id: "reg-username",
                        placeholder: "Enter username",
                        value: "{form.read().username}",
                        required: true,
                        disabled: loading(),
                        oninput: move |evt| form.write().username = evt.value(),
                    }
                    label { r#for: "reg-password", "Password" }
                    SecretInput {
                        id: "reg-password",
                        placeholder: "Enter password",
                        value: form.read().password.clone(),
                        disabled: loading(),
                        on_input: move |value| form.write().password = value,
                    }
                    label { r#for: "reg-confirm", "Confirm Password" }
                    SecretInput {
                        id: "reg-confirm",
                        placeholder: "Confirm password",
                        value: form.read().confirm_password.clone(),
                        disabled: loading(),
                        on_input: move |value| form.write().confirm_password = value,
                    }
                    label { r#for: "reg-phone", "Phone Number" }
                    input {
                        r#type: "text",
                        id: "reg-phone",
                        placeholder: "Enter phone number",
                        value: "{form.read().phone_number}",
                        required: true,
                        disabled: loading(),
                        oninput: move |evt| form.write().phone_number = evt.value(),
                    }
                    button {
                        r#type: "submit",
                        class: "primary",
                        disabled: loading(),
                        if loading() {
                            "Registering..."
                        } else {
                            "Register"
                        }
                    }
                }
                p { class: "hint",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Login here" }
                }
            }

            if pending.read().is_some() {
                ConfirmModal {
                    title: "Important Notice",
                    confirm_label: "Confirm",
                    busy: loading(),
                    on_confirm: confirm_registration,
                    on_cancel: move |_| pending.set(None),
                    p { "By proceeding, you acknowledge that:" }
                    p { "- You cannot change your data after signing up." }
                    p { "- You cannot recover your password if you forget it." }
                }
            }
        }
    }
}
