use std::rc::Rc;

use log::{debug, warn};
use web_sys::{HtmlInputElement, KeyboardEvent, Node};
use wasm_bindgen::JsCast;
use yew::prelude::*;
use yew_hooks::prelude::*;

use super::controller::{ModalView, SignupController};
use super::machine::{DismissReason, ModalSnapshot, ModalState};
use super::validation::FormInput;
use crate::clock::BrowserClock;
use crate::storage::{LocalStore, MemoryStore, SessionStore};

/// Pushes snapshots into component state and locks page scrolling while open.
struct YewModalView {
    snapshot: UseStateSetter<ModalSnapshot>,
}

impl ModalView for YewModalView {
    fn render(&self, snapshot: &ModalSnapshot) {
        self.snapshot.set(snapshot.clone());
    }

    fn set_scroll_locked(&self, locked: bool) {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());
        if let Some(body) = body {
            let _ = body.class_list().toggle_with_force("no-scroll", locked);
        }
    }
}

fn open_store() -> Rc<dyn SessionStore> {
    match LocalStore::open() {
        Ok(store) => Rc::new(store),
        Err(e) => {
            warn!("{}, join state will not survive a reload", e);
            Rc::new(MemoryStore::new())
        }
    }
}

fn viewport() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let scroll_y = window.scroll_y().ok()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((scroll_y, height))
}

#[function_component(SignupModal)]
pub fn signup_modal() -> Html {
    let snapshot = use_state(ModalSnapshot::default);
    let name = use_state(String::new);
    let age = use_state(String::new);
    let email = use_state(String::new);
    let overlay_ref = use_node_ref();
    let name_ref = use_node_ref();

    let controller = {
        let setter = snapshot.setter();
        use_memo(
            move |_| {
                let view = Rc::new(YewModalView { snapshot: setter });
                SignupController::new(open_store(), Rc::new(BrowserClock::new()), view)
            },
            (),
        )
    };

    {
        let controller = controller.clone();
        use_effect_with_deps(
            move |_| {
                controller.start();
                || ()
            },
            (),
        );
    }

    {
        let controller = controller.clone();
        use_event_with_window("scroll", move |_: Event| {
            if controller.snapshot().state != ModalState::Hidden {
                return;
            }
            if let Some((scroll_y, height)) = viewport() {
                controller.on_scroll(scroll_y, height);
            }
        });
    }

    {
        let controller = controller.clone();
        use_event_with_window("keydown", move |e: KeyboardEvent| {
            if e.key() == "Escape" {
                controller.dismiss(DismissReason::Escape);
            }
        });
    }

    // Move focus into the dialog when it opens.
    {
        let name_ref = name_ref.clone();
        use_effect_with_deps(
            move |state| {
                if *state == ModalState::Visible {
                    if let Some(input) = name_ref.cast::<HtmlInputElement>() {
                        let _ = input.focus();
                    }
                }
                || ()
            },
            snapshot.state,
        );
    }

    if !snapshot.open {
        return html! {};
    }

    let dismiss = |reason: DismissReason| {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| controller.dismiss(reason))
    };

    let on_overlay = {
        let controller = controller.clone();
        let overlay_ref = overlay_ref.clone();
        Callback::from(move |e: MouseEvent| {
            let target = e.target().and_then(|t| t.dyn_into::<Node>().ok());
            if let Some(overlay) = overlay_ref.get() {
                if overlay.is_same_node(target.as_ref()) {
                    controller.dismiss(DismissReason::Overlay);
                }
            }
        })
    };

    let onsubmit = {
        let controller = controller.clone();
        let name = name.clone();
        let age = age.clone();
        let email = email.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let input = FormInput {
                name: (*name).clone(),
                age: (*age).clone(),
                email: (*email).clone(),
            };
            debug!("Signup form submitted");
            controller.submit(&input);
        })
    };

    let bind = |field: UseStateHandle<String>| {
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            field.set(input.value());
        })
    };

    let submitting = snapshot.state == ModalState::Submitting;
    let completed = snapshot.state == ModalState::Completed;

    html! {
        <div class="signup-overlay" ref={overlay_ref} onclick={on_overlay}>
            <style>
                {r#"
                    body.no-scroll {
                        overflow: hidden;
                    }
                    .signup-overlay {
                        position: fixed;
                        inset: 0;
                        background: rgba(0, 0, 0, 0.6);
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        z-index: 1000;
                        padding: 1rem;
                    }
                    .signup-panel {
                        position: relative;
                        background: rgba(30, 30, 30, 0.95);
                        border: 1px solid rgba(30, 144, 255, 0.1);
                        border-radius: 16px;
                        padding: 2.5rem 2rem 2rem;
                        width: 100%;
                        max-width: 420px;
                        box-shadow: 0 8px 32px rgba(0, 0, 0, 0.3);
                        color: #fff;
                    }
                    .signup-panel h2 {
                        margin: 0 0 0.5rem;
                        font-size: 1.6rem;
                    }
                    .signup-panel form {
                        display: flex;
                        flex-direction: column;
                        gap: 0.75rem;
                    }
                    .signup-panel input {
                        padding: 0.75rem;
                        border-radius: 8px;
                        border: 1px solid rgba(255, 255, 255, 0.2);
                        background: rgba(0, 0, 0, 0.3);
                        color: #fff;
                    }
                    .signup-close {
                        position: absolute;
                        top: 0.75rem;
                        right: 0.75rem;
                        background: none;
                        border: none;
                        color: rgba(255, 255, 255, 0.7);
                        font-size: 1.5rem;
                        cursor: pointer;
                    }
                    .signup-actions {
                        display: flex;
                        gap: 0.75rem;
                        justify-content: flex-end;
                    }
                    .signup-error {
                        color: #ff6b6b;
                        font-size: 0.9rem;
                    }
                    .signup-success {
                        color: #4caf50;
                    }
                "#}
            </style>
            <div class="signup-panel" role="dialog" aria-modal="true" aria-labelledby="signup-title">
                <button
                    type="button"
                    class="signup-close"
                    aria-label="Close"
                    onclick={dismiss(DismissReason::CloseButton)}
                    disabled={submitting || completed}
                >
                    {"×"}
                </button>
                <h2 id="signup-title">{"Join the crew"}</h2>
                {
                    if let Some(message) = snapshot.confirmation.as_ref() {
                        html! { <p class="signup-success" role="status">{message}</p> }
                    } else {
                        html! {
                            <form onsubmit={onsubmit} novalidate=true>
                                <p>{"Get early access and monthly challenges. Takes ten seconds."}</p>
                                <input
                                    ref={name_ref}
                                    type="text"
                                    name="name"
                                    placeholder="Your name"
                                    value={(*name).clone()}
                                    oninput={bind(name.clone())}
                                />
                                <input
                                    type="number"
                                    name="age"
                                    placeholder="Age"
                                    min="13"
                                    max="19"
                                    value={(*age).clone()}
                                    oninput={bind(age.clone())}
                                />
                                <input
                                    type="email"
                                    name="email"
                                    placeholder="Email (optional)"
                                    value={(*email).clone()}
                                    oninput={bind(email.clone())}
                                />
                                {
                                    if let Some(error) = snapshot.error.as_ref() {
                                        html! { <p class="signup-error" role="alert">{error}</p> }
                                    } else {
                                        html! {}
                                    }
                                }
                                <div class="signup-actions">
                                    <button
                                        type="button"
                                        class="signup-later"
                                        onclick={dismiss(DismissReason::MaybeLater)}
                                        disabled={submitting}
                                    >
                                        {"Maybe later"}
                                    </button>
                                    <button type="submit" class="signup-submit" disabled={submitting}>
                                        { if submitting { "Joining..." } else { "Join" } }
                                    </button>
                                </div>
                            </form>
                        }
                    }
                }
            </div>
        </div>
    }
}
