use super::api;
use super::widgets::{Banners, ConfirmModal, LoadingSpinner, SecretInput};
use crate::Route;
use crate::error::ClientError;
use crate::flows;
use crate::forms::PasswordChangeForm;
use crate::payload::Profile;
use crate::qr;
use crate::session::LocalStorageStore;
use dioxus::prelude::*;

// account details, own QR code, password change and logout
#[component]
pub fn About() -> Element {
    let mut error = use_signal(String::new);
    let mut show_qr = use_signal(|| false);
    let mut show_password = use_signal(|| false);
    let mut show_logout = use_signal(|| false);
    let navigator = use_navigator();

    let profile = use_resource(move || async move {
        let result = flows::load_profile(&api(), &LocalStorageStore).await;
        match &result {
            Err(ClientError::NoSession) => {
                navigator.replace(Route::Login {});
            }
            Err(e) => {
                log::error!("Could not load profile: {}", e);
                error.set(e.user_message("Failed to fetch user data."));
            }
            Ok(_) => {}
        }
        result.ok()
    });

    let logout = move |_| {
        let destination = flows::logout(&LocalStorageStore);
        navigator.replace(Route::from(destination));
    };

    let Some(loaded) = profile.read().clone() else {
        return rsx! {
            LoadingSpinner {}
        };
    };

    rsx! {
        div { id: "about-page", class: "page",
            div { class: "card",
                h1 { "About Me" }
                button {
                    class: "secondary",
                    onclick: move |_| {
                        navigator.push(Route::Balance {});
                    },
                    "Back to Balance"
                }
                Banners { error: error(), success: String::new() }

                h2 { "User Details" }
                match &loaded {
                    Some(user) => rsx! {
                        p {
                            strong { "Display Name:" }
                            " {user.display_name}"
                        }
                        p {
                            strong { "Username:" }
                            " {user.username}"
                        }
                        p {
                            strong { "Phone Number:" }
                            " {user.phone_number}"
                        }
                    },
                    None => rsx! {
                        p { class: "hint", "No user data found." }
                    },
                }

                div { class: "actions",
                    button {
                        disabled: loaded.is_none(),
                        onclick: move |_| show_qr.set(true),
                        "Generate QR Code"
                    }
                    button {
                        disabled: loaded.is_none(),
                        onclick: move |_| show_password.set(true),
                        "Change Password"
                    }
                    button { class: "danger", onclick: move |_| show_logout.set(true), "Logout" }
                }
            }

            if let (true, Some(user)) = (show_qr(), loaded.clone()) {
                QrModal { username: user.username, on_close: move |_| show_qr.set(false) }
            }

            if let (true, Some(user)) = (show_password(), loaded.clone()) {
                PasswordModal { profile: user, on_close: move |_| show_password.set(false) }
            }

            if show_logout() {
                ConfirmModal {
                    title: "Logout",
                    confirm_label: "Logout",
                    busy: false,
                    on_confirm: logout,
                    on_cancel: move |_| show_logout.set(false),
                    p { "Are you sure you want to log out?" }
                }
            }
        }
    }
}

#[component]
fn QrModal(username: String, on_close: EventHandler<()>) -> Element {
    let markup = match qr::username_svg(&username) {
        Ok(svg) => svg,
        Err(e) => {
            log::error!("Could not render QR code: {}", e);
            String::new()
        }
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                h3 { "Your QR Code" }
                div { class: "qr", dangerous_inner_html: "{markup}" }
                p { class: "hint", "{username}" }
                button { class: "secondary", onclick: move |_| on_close.call(()), "Close" }
            }
        }
    }
}

#[component]
fn PasswordModal(profile: Profile, on_close: EventHandler<()>) -> Element {
    let mut form = use_signal(PasswordChangeForm::default);
    let mut error = use_signal(String::new);
    let mut success = use_signal(String::new);
    let mut changing = use_signal(|| false);
    let username = profile.username.clone();

    let submit = move |_| {
        if changing() {
            return;
        }
        let change = match form.read().validate() {
            Ok(change) => change,
            Err(e) => {
                log::warn!("Password change rejected: {}", e);
                error.set(e.user_message(""));
                return;
            }
        };
        let username = username.clone();
        changing.set(true);
        spawn(async move {
            error.set(String::new());
            success.set(String::new());
            let result = flows::change_password(&api(), &username, &change).await;
            changing.set(false);
            match result {
                Ok(message) => {
                    success.set(message);
                    form.set(PasswordChangeForm::default());
                }
                Err(e) => {
                    log::error!("Password change failed: {}", e);
                    error.set(e.user_message("Failed to update password."));
                }
            }
        });
    };

    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                h3 { "Change Password" }
                Banners { error: error(), success: success() }
                SecretInput {
                    id: "current-password",
                    placeholder: "Current password",
                    value: form.read().current.clone(),
                    disabled: changing(),
                    on_input: move |value| form.write().current = value,
                }
                SecretInput {
                    id: "new-password",
                    placeholder: "New password",
                    value: form.read().new.clone(),
                    disabled: changing(),
                    on_input: move |value| form.write().new = value,
                }
                SecretInput {
                    id: "confirm-new-password",
                    placeholder: "Confirm new password",
                    value: form.read().confirm.clone(),
                    disabled: changing(),
                    on_input: move |value| form.write().confirm = value,
                }
                div { class: "modal-actions",
                    button { class: "primary", disabled: changing(), onclick: submit,
                        if changing() {
                            "Updating..."
                        } else {
                            "Update Password"
                        }
                    }
                    button {
                        class: "secondary",
                        disabled: changing(),
                        onclick: move |_| on_close.call(()),
                        "Close"
                    }
                }
            }
        }
    }
}
