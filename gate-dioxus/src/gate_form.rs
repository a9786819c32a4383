use dioxus::prelude::*;

use crate::config::GateConfig;
use crate::effects::{EffectsEmitter, EmojiLayer, use_effects_emitter};
use crate::gate::{GateController, GateEffect, GateEvent};
use crate::modal::{ClickTarget, Modal, ModalId};

fn dispatch(mut controller: Signal<GateController>, mut emitter: EffectsEmitter, event: GateEvent) {
    let effects = controller.write().dispatch(event);
    for effect in effects {
        if effect == GateEffect::Celebrate {
            emitter.celebrate();
        }
    }
}

#[component]
pub fn GateForm(config: GateConfig) -> Element {
    let controller = use_signal(|| GateController::new(config.variant, config.copy.clone()));
    let emitter = use_effects_emitter(config.effects.clone());

    let gate = controller.read().clone();
    let state = gate.state();
    let copy = gate.copy();
    let name = state.name().to_string();
    let selected = state.gender().map(|g| g.as_str()).unwrap_or("");
    let message = state.message().unwrap_or_default().to_string();
    let message_class = if state.message().is_some() { "message error" } else { "message" };

    let on_modal_click = move |(modal, target): (ModalId, ClickTarget)| {
        dispatch(controller, emitter, GateEvent::ModalClicked { modal, target })
    };
    let on_close = move |dom_id: String| {
        let mut controller = controller;
        controller.write().close_named(&dom_id);
    };

    rsx! {
        div { class: "gate-card",
            h1 { "{copy.title}" }

            div { class: "field",
                label { r#for: "name", "Your name" }
                input {
                    id: "name",
                    r#type: "text",
                    value: "{name}",
                    placeholder: "Type your name",
                    autocomplete: "off",
                    spellcheck: "false",
                    oninput: move |evt| dispatch(controller, emitter, GateEvent::NameChanged(evt.value())),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            dispatch(controller, emitter, GateEvent::EnterPressed);
                        }
                    },
                }
                button {
                    id: "startBtn",
                    onclick: move |_| {
                        let name = controller.peek().state().name().to_string();
                        dispatch(controller, emitter, GateEvent::StartRequested(name));
                    },
                    "Start"
                }
            }

            if state.control_visible() {
                div { id: "genderSection", class: "field",
                    label { r#for: "gender", "Gender" }
                    select {
                        id: "gender",
                        value: "{selected}",
                        onchange: move |evt| dispatch(controller, emitter, GateEvent::GenderChanged(evt.value())),
                        option { value: "", selected: selected.is_empty(), "Choose…" }
                        for g in state.visible_options() {
                            option {
                                key: "{g}",
                                value: "{g}",
                                selected: selected == g.as_str(),
                                {g.label()}
                            }
                        }
                    }
                }
            }

            p {
                id: "message",
                class: "{message_class}",
                "{message}"
            }

            Modal {
                id: ModalId::Error,
                open: gate.modals().is_open(ModalId::Error),
                title: copy.error_modal.clone(),
                on_click: on_modal_click,
                on_close,
                p { "{copy.wrong_gender}" }
            }
            Modal {
                id: ModalId::Success,
                open: gate.modals().is_open(ModalId::Success),
                title: copy.success.clone(),
                on_click: on_modal_click,
                on_close,
                p { "🐻💖" }
            }

            EmojiLayer { pieces: emitter.pieces() }
        }
    }
}
