use super::api;
use super::widgets::{Banners, LoadingSpinner, SecretInput};
use crate::Route;
use crate::flows;
use crate::forms::LoginForm;
use crate::session::LocalStorageStore;
use dioxus::prelude::*;

#[component]
pub fn Login() -> Element {
    let mut form = use_signal(LoginForm::default);
    let mut error = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let navigator = use_navigator();

    // a session that is still valid skips the form
    use_future(move || async move {
        match flows::resume_session(&api(), &LocalStorageStore).await {
            Ok(Some(destination)) => {
                navigator.replace(Route::from(destination));
            }
            Ok(None) => {}
            Err(e) => log::warn!("Could not check stored session: {}", e),
        }
    });

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        if loading() {
            return;
        }
        let submitted = form.read().clone();
        loading.set(true);
        spawn(async move {
            let result = flows::login(&api(), &LocalStorageStore, &submitted).await;
            loading.set(false);
            match result {
                Ok(destination) => {
                    error.set(String::new());
                    navigator.push(Route::from(destination));
                }
                Err(e) => {
                    log::error!("Login failed: {}", e);
                    error.set(e.user_message("Login failed. Please try again."));
                }
            }
        });
    };

    rsx! {
        div { id: "login-page", class: "page",
            if loading() {
                LoadingSpinner {}
            }
            div { class: "card",
                h2 { "Login" }
                Banners { error: error(), success: String::new() }
                form { onsubmit: handle_login,
                    label { r#for: "login-username", "Username" }
                    input {
                        r#type: "text",
                        id: "login-username",
                        value: "{form.read().username}",
                        required: true,
                        disabled: loading(),
                        oninput: move |evt| form.write().username = evt.value(),
                    }
                    label { r#for: "login-password", "Password" }
                    SecretInput {
                        id: "login-password",
                        placeholder: "",
                        value: form.read().password.clone(),
                        disabled: loading(),
                        on_input: move |value| form.write().password = value,
                    }
                    button {
                        r#type: "submit",
                        class: "primary",
                        disabled: loading(),
                        if loading() {
                            "Logging in..."
                        } else {
                            "Login"
                        }
                    }
                    button {
                        r#type: "button",
                        class: "secondary",
                        disabled: loading(),
                        onclick: move |_| {
                            navigator.push(Route::Register {});
                        },
                        "Register"
                    }
                }
            }
        }
    }
}
