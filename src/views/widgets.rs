use crate::Route;
use dioxus::prelude::*;

/// Full-page overlay shown while a request is in flight.
#[component]
pub fn LoadingSpinner() -> Element {
    rsx! {
        div { class: "spinner-overlay",
            div { class: "spinner" }
        }
    }
}

/// Error and success lines shown above a form.
#[component]
pub fn Banners(error: String, success: String) -> Element {
    rsx! {
        if !error.is_empty() {
            div { class: "banner error", "{error}" }
        }
        if !success.is_empty() {
            div { class: "banner success", "{success}" }
        }
    }
}

#[component]
pub fn ConfirmModal(
    title: String,
    confirm_label: String,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
    children: Element,
) -> Element {
    rsx! {
        div { class: "modal-backdrop",
            div { class: "modal",
                h3 { "{title}" }
                div { class: "modal-body", {children} }
                div { class: "modal-actions",
                    button {
                        class: "primary",
                        disabled: busy,
                        onclick: move |_| on_confirm.call(()),
                        if busy {
                            "Working..."
                        } else {
                            "{confirm_label}"
                        }
                    }
                    button {
                        class: "secondary",
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}

/// Password field with a show/hide toggle.
#[component]
pub fn SecretInput(
    id: String,
    placeholder: String,
    value: String,
    disabled: bool,
    on_input: EventHandler<String>,
) -> Element {
    let mut visible = use_signal(|| false);
    let kind = if visible() { "text" } else { "password" };

    rsx! {
        div { class: "secret-input",
            input {
                r#type: kind,
                id: "{id}",
                placeholder: "{placeholder}",
                value: "{value}",
                disabled: disabled,
                oninput: move |evt| on_input.call(evt.value()),
            }
            button {
                r#type: "button",
                class: "toggle",
                disabled: disabled,
                onclick: move |_| visible.set(!visible()),
                if visible() {
                    "Hide"
                } else {
                    "Show"
                }
            }
        }
    }
}

/// Any unknown path goes back to the login page.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    let path = segments.join("/");

    use_effect(move || {
        log::debug!("Unknown path /{}, back to login", path);
        navigator.replace(Route::Login {});
    });

    rsx! {}
}
