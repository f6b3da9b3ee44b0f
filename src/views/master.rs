use super::api;
use super::widgets::{Banners, LoadingSpinner, SecretInput};
use crate::flows;
use crate::forms::AdminTargetForm;
use crate::payload::BalanceAction;
use dioxus::prelude::*;

// Admin dashboard. Every action sends the master key along; the backend decides
// whether it is accepted.
#[component]
pub fn Master() -> Element {
    let mut target = use_signal(AdminTargetForm::default);
    let mut balance = use_signal(|| None::<f64>);
    let mut grade = use_signal(|| None::<String>);
    let mut amount = use_signal(String::new);
    let mut action = use_signal(BalanceAction::default);
    let mut new_grade = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut error = use_signal(String::new);
    let mut success = use_signal(String::new);
    let mut loading = use_signal(|| false);

    let mut fail = move |message: String| {
        error.set(message);
        success.set(String::new());
    };
    let mut succeed = move |message: String| {
        success.set(message);
        error.set(String::new());
    };

    let fetch_balance = move |_| {
        if loading() {
            return;
        }
        let checked = match target.read().validate() {
            Ok(checked) => checked,
            Err(e) => return fail(e.user_message("")),
        };
        loading.set(true);
        spawn(async move {
            let result = flows::admin_view_balance(&api(), &checked).await;
            loading.set(false);
            match result {
                Ok(standing) => {
                    balance.set(Some(standing.account_balance));
                    grade.set(standing.grade);
                    succeed("Balance fetched successfully.".to_string());
                }
                Err(e) => {
                    log::error!("Admin balance lookup failed: {}", e);
                    balance.set(None);
                    grade.set(None);
                    fail(e.user_message("Failed to fetch balance."));
                }
            }
        });
    };

    let update_balance = move |_| {
        if loading() {
            return;
        }
        let (checked, value) = match target.read().validate_balance_update(&amount.read()) {
            Ok(checked) => checked,
            Err(e) => return fail(e.user_message("")),
        };
        let direction = action();
        loading.set(true);
        spawn(async move {
            let result = flows::admin_update_balance(&api(), &checked, value, direction).await;
            loading.set(false);
            match result {
                Ok(updated) => {
                    balance.set(Some(updated));
                    succeed(format!(
                        "Balance updated successfully. New balance: {}",
                        updated
                    ));
                }
                Err(e) => {
                    log::error!("Admin balance update failed: {}", e);
                    fail(e.user_message("Failed to update balance."));
                }
            }
        });
    };

    let update_grade = move |_| {
        if loading() {
            return;
        }
        let (checked, value) = match target.read().validate_grade_update(&new_grade.read()) {
            Ok(checked) => checked,
            Err(e) => return fail(e.user_message("")),
        };
        loading.set(true);
        spawn(async move {
            let result = flows::admin_update_grade(&api(), &checked, &value).await;
            loading.set(false);
            match result {
                Ok(recorded) => {
                    grade.set(Some(recorded));
                    succeed("Grade updated successfully.".to_string());
                }
                Err(e) => {
                    log::error!("Admin grade update failed: {}", e);
                    fail(e.user_message("Failed to update grade."));
                }
            }
        });
    };

    let reset_password = move |_| {
        if loading() {
            return;
        }
        let (checked, value) = match target.read().validate_password_reset(&new_password.read()) {
            Ok(checked) => checked,
            Err(e) => return fail(e.user_message("")),
        };
        loading.set(true);
        spawn(async move {
            let result = flows::admin_force_password(&api(), &checked, &value).await;
            loading.set(false);
            match result {
                Ok(_) => {
                    new_password.set(String::new());
                    succeed("Password updated successfully.".to_string());
                }
                Err(e) => {
                    log::error!("Admin password reset failed: {}", e);
                    fail(e.user_message("Failed to update password."));
                }
            }
        });
    };

    rsx! {
        div { id: "master-page", class: "page",
            if loading() {
                LoadingSpinner {}
            }
            div { class: "card wide",
                h1 { "Master Dashboard" }
                Banners { error: error(), success: success() }

                label { r#for: "master-key", "Master Key" }
                SecretInput {
                    id: "master-key",
                    placeholder: "Enter master key",
                    value: target.read().master_key.clone(),
                    disabled: loading(),
                    on_input: move |value| target.write().master_key = value,
                }

                h2 { "User Details" }
                input {
                    r#type: "text",
                    placeholder: "Enter username",
                    value: "{target.read().username}",
                    disabled: loading(),
                    oninput: move |evt| target.write().username = evt.value(),
                }
                input {
                    r#type: "text",
                    placeholder: "Enter phone number",
                    value: "{target.read().phone_number}",
                    disabled: loading(),
                    oninput: move |evt| target.write().phone_number = evt.value(),
                }

                section {
                    button { disabled: loading(), onclick: fetch_balance, "Fetch Balance" }
                    if let Some(current) = balance() {
                        p { "Balance: {current}" }
                    }
                    if let Some(current) = grade() {
                        p { "Grade: {current}" }
                    }
                }

                section {
                    h2 { "Update Balance" }
                    input {
                        r#type: "number",
                        placeholder: "Enter amount",
                        value: "{amount}",
                        disabled: loading(),
                        oninput: move |evt| amount.set(evt.value()),
                    }
                    select {
                        disabled: loading(),
                        onchange: move |evt| {
                            match evt.value().parse::<BalanceAction>() {
                                Ok(parsed) => action.set(parsed),
                                Err(e) => log::warn!("{}", e),
                            }
                        },
                        option {
                            value: "add",
                            selected: action() == BalanceAction::Add,
                            "Add"
                        }
                        option {
                            value: "subtract",
                            selected: action() == BalanceAction::Subtract,
                            "Subtract"
                        }
                    }
                    button { disabled: loading(), onclick: update_balance, "Update Balance" }
                }

                section {
                    h2 { "Update Grade" }
                    input {
                        r#type: "text",
                        placeholder: "Enter new grade",
                        value: "{new_grade}",
                        disabled: loading(),
                        oninput: move |evt| new_grade.set(evt.value()),
                    }
                    button { disabled: loading(), onclick: update_grade, "Update Grade" }
                }

                section {
                    h2 { "Update Password" }
                    SecretInput {
                        id: "admin-new-password",
                        placeholder: "Enter new password",
                        value: new_password(),
                        disabled: loading(),
                        on_input: move |value| new_password.set(value),
                    }
                    button { disabled: loading(), onclick: reset_password, "Update Password" }
                }
            }
        }
    }
}
