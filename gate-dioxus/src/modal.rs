use dioxus::prelude::*;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalId {
    Error,
    Success,
}

impl ModalId {
    pub const ALL: [ModalId; 2] = [ModalId::Error, ModalId::Success];

    pub fn dom_id(&self) -> &'static str {
        match self {
            ModalId::Error => "errorModal",
            ModalId::Success => "successModal",
        }
    }

    pub fn from_dom_id(dom_id: &str) -> Option<ModalId> {
        ModalId::ALL.into_iter().find(|m| m.dom_id() == dom_id)
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dom_id())
    }
}

/// Where a click on an open modal landed. The content element stops
/// propagation and reports `Content` itself, so the backdrop handler only
/// ever sees clicks whose target is the backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Backdrop,
    Content,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalPresenter {
    error_open: bool,
    success_open: bool,
}

impl ModalPresenter {
    fn slot(&mut self, modal: ModalId) -> &mut bool {
        match modal {
            ModalId::Error => &mut self.error_open,
            ModalId::Success => &mut self.success_open,
        }
    }

    pub fn open(&mut self, modal: ModalId) {
        *self.slot(modal) = true;
    }

    pub fn close(&mut self, modal: ModalId) {
        *self.slot(modal) = false;
    }

    pub fn is_open(&self, modal: ModalId) -> bool {
        match modal {
            ModalId::Error => self.error_open,
            ModalId::Success => self.success_open,
        }
    }
}

#[component]
pub fn Modal(
    id: ModalId,
    open: bool,
    title: String,
    on_click: EventHandler<(ModalId, ClickTarget)>,
    on_close: EventHandler<String>,
    children: Element,
) -> Element {
    let class = if open { "modal" } else { "modal hidden" };
    let aria_hidden = if open { "false" } else { "true" };

    rsx! {
        div {
            class: "{class}",
            id: "{id}",
            role: "dialog",
            "aria-modal": "true",
            aria_hidden: "{aria_hidden}",
            onclick: move |_| on_click.call((id, ClickTarget::Backdrop)),

            div {
                class: "modal-content",
                onclick: move |evt| {
                    evt.stop_propagation();
                    on_click.call((id, ClickTarget::Content));
                },
                h2 { "{title}" }
                {children}
                CloseButton { target: id.dom_id().to_string(), on_close }
            }
        }
    }
}

/// A dismiss control that names the modal it closes, like `data-close`.
#[component]
pub fn CloseButton(target: String, on_close: EventHandler<String>) -> Element {
    let target_for_click = target.clone();
    rsx! {
        button {
            class: "modal-close",
            "data-close": "{target}",
            onclick: move |evt| {
                evt.stop_propagation();
                on_close.call(target_for_click.clone());
            },
            "Close"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_and_close_are_independent() {
        let mut modals = ModalPresenter::default();
        modals.open(ModalId::Success);
        assert!(modals.is_open(ModalId::Success));
        assert!(!modals.is_open(ModalId::Error));

        modals.open(ModalId::Error);
        modals.close(ModalId::Success);
        assert!(modals.is_open(ModalId::Error));
        assert!(!modals.is_open(ModalId::Success));
    }

    #[test]
    fn closing_a_closed_modal_is_harmless() {
        let mut modals = ModalPresenter::default();
        modals.close(ModalId::Error);
        assert_eq!(modals, ModalPresenter::default());
    }

    #[test]
    fn dom_ids_round_trip() {
        for modal in ModalId::ALL {
            assert_eq!(ModalId::from_dom_id(modal.dom_id()), Some(modal));
        }
    }
}
