use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GateError;
use crate::modal::{ClickTarget, ModalId, ModalPresenter};

/// The only name that unlocks the gender control.
pub const UNLOCK_NAME: &str = "shreya";

/// Whitespace and line terminators as a browser's `String.prototype.trim`
/// sees them. Differs from `char::is_whitespace` on U+FEFF and U+0085.
fn is_page_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

pub fn normalize_name(raw: &str) -> String {
    raw.trim_matches(is_page_whitespace).to_lowercase()
}

pub fn is_unlock_name(raw: &str) -> bool {
    normalize_name(raw) == UNLOCK_NAME
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Angel,
    Bhaluu,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Angel, Gender::Bhaluu];

    /// Option value as it appears in the select element.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Angel => "angel",
            Gender::Bhaluu => "bhaluu",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Angel => "Angel",
            Gender::Bhaluu => "Bhaluu 🐻",
        }
    }

    /// The option that is only offered once the gate is unlocked.
    pub fn is_special(&self) -> bool {
        matches!(self, Gender::Bhaluu)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| GateError::UnknownGender(s.to_string()))
    }
}

/// Which of the two page flows is in use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateVariant {
    /// The gender control follows the name field live.
    #[default]
    HideControl,
    /// The control is revealed by the start action; leaving the unlock name
    /// only hides the special option.
    HideOption,
}

impl FromStr for GateVariant {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hide-control" => Ok(GateVariant::HideControl),
            "hide-option" => Ok(GateVariant::HideOption),
            other => Err(GateError::InvalidConfig(format!("unknown gate variant {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    NoNameYet,
    WrongName,
    AwaitingGender,
    Rejected,
    Accepted,
}

/// Message copy shown inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateCopy {
    pub title: String,
    pub not_allowed: String,
    pub wrong_gender: String,
    pub success: String,
    pub error_modal: String,
}

impl Default for GateCopy {
    fn default() -> Self {
        Self {
            title: "Who goes there?".to_string(),
            not_allowed: "Hi there! This flow is for Shreya only ✋".to_string(),
            wrong_gender: "❌ Shreya, you are not belonging to this gender.".to_string(),
            success: "Correct! Welcome, Bhaluu 🐻".to_string(),
            error_modal: "Nope. Try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GateEvent {
    NameChanged(String),
    StartRequested(String),
    EnterPressed,
    GenderChanged(String),
    CloseRequested(ModalId),
    ModalClicked { modal: ModalId, target: ClickTarget },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEffect {
    OpenModal(ModalId),
    CloseModal(ModalId),
    Celebrate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateState {
    variant: GateVariant,
    name: String,
    gender: Option<Gender>,
    control_visible: bool,
    special_option_visible: bool,
    message: Option<String>,
}

impl GateState {
    pub fn new(variant: GateVariant) -> Self {
        Self {
            variant,
            name: String::new(),
            gender: None,
            control_visible: false,
            special_option_visible: false,
            message: None,
        }
    }

    pub fn variant(&self) -> GateVariant {
        self.variant
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn control_visible(&self) -> bool {
        self.control_visible
    }

    pub fn special_option_visible(&self) -> bool {
        self.special_option_visible
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Options currently offered by the gender select.
    pub fn visible_options(&self) -> Vec<Gender> {
        Gender::ALL
            .into_iter()
            .filter(|g| !g.is_special() || self.special_option_visible)
            .collect()
    }

    pub fn is_unlocked(&self) -> bool {
        is_unlock_name(&self.name)
    }

    pub fn outcome(&self) -> GateOutcome {
        let normalized = normalize_name(&self.name);
        if normalized.is_empty() {
            GateOutcome::NoNameYet
        } else if normalized != UNLOCK_NAME {
            GateOutcome::WrongName
        } else {
            match self.gender {
                None => GateOutcome::AwaitingGender,
                Some(Gender::Bhaluu) => GateOutcome::Accepted,
                Some(_) => GateOutcome::Rejected,
            }
        }
    }

    fn lock(&mut self) {
        match self.variant {
            GateVariant::HideControl => {
                self.control_visible = false;
                self.special_option_visible = false;
            }
            GateVariant::HideOption => self.special_option_visible = false,
        }
        self.gender = None;
    }

    fn on_name_changed(&mut self, raw: String) -> Vec<GateEffect> {
        self.name = raw;
        if self.is_unlocked() {
            if self.variant == GateVariant::HideControl {
                self.control_visible = true;
                self.special_option_visible = true;
            }
        } else {
            self.lock();
            self.message = None;
        }
        vec![]
    }

    fn on_start_requested(&mut self, raw: String, copy: &GateCopy) -> Vec<GateEffect> {
        self.message = None;
        self.name = raw;
        let unlocked = self.is_unlocked();
        self.control_visible = unlocked;
        self.special_option_visible = unlocked;
        if !unlocked {
            self.gender = None;
            self.message = Some(copy.not_allowed.clone());
            tracing::info!(name = %self.name, "start rejected for name");
        }
        vec![]
    }

    fn on_gender_changed(&mut self, value: &str, copy: &GateCopy) -> Vec<GateEffect> {
        if value.is_empty() {
            return vec![];
        }
        let gender = match value.parse::<Gender>() {
            Ok(gender) => gender,
            Err(e) => {
                tracing::warn!("ignoring gender change: {e}");
                return vec![];
            }
        };
        if !self.is_unlocked() || !self.control_visible {
            tracing::debug!(%gender, "gender change while locked, ignored");
            return vec![];
        }
        if gender.is_special() && !self.special_option_visible {
            tracing::debug!(%gender, "special option is hidden, ignored");
            return vec![];
        }

        self.message = None;
        self.gender = Some(gender);
        match self.outcome() {
            GateOutcome::Accepted => {
                tracing::info!(%gender, "gate accepted");
                vec![GateEffect::OpenModal(ModalId::Success), GateEffect::Celebrate]
            }
            GateOutcome::Rejected => {
                tracing::info!(%gender, "gate rejected");
                self.message = Some(copy.wrong_gender.clone());
                vec![GateEffect::OpenModal(ModalId::Error)]
            }
            _ => vec![],
        }
    }
}

/// Owns the gate state and the modal presenter; every UI event goes through
/// [`GateController::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct GateController {
    state: GateState,
    modals: ModalPresenter,
    copy: GateCopy,
}

impl GateController {
    pub fn new(variant: GateVariant, copy: GateCopy) -> Self {
        Self {
            state: GateState::new(variant),
            modals: ModalPresenter::default(),
            copy,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn modals(&self) -> &ModalPresenter {
        &self.modals
    }

    pub fn copy(&self) -> &GateCopy {
        &self.copy
    }

    /// Applies `event` and returns the side effects it produced. Modal effects
    /// are already applied to [`GateController::modals`] when this returns.
    pub fn dispatch(&mut self, event: GateEvent) -> Vec<GateEffect> {
        tracing::debug!(?event, "gate event");
        let effects = match event {
            GateEvent::NameChanged(raw) => self.state.on_name_changed(raw),
            GateEvent::StartRequested(raw) => self.state.on_start_requested(raw, &self.copy),
            GateEvent::EnterPressed => {
                let raw = self.state.name.clone();
                self.state.on_start_requested(raw, &self.copy)
            }
            GateEvent::GenderChanged(value) => self.state.on_gender_changed(&value, &self.copy),
            GateEvent::CloseRequested(modal) => vec![GateEffect::CloseModal(modal)],
            GateEvent::ModalClicked { modal, target } => match target {
                ClickTarget::Backdrop => vec![GateEffect::CloseModal(modal)],
                ClickTarget::Content => vec![],
            },
        };

        for effect in &effects {
            match effect {
                GateEffect::OpenModal(modal) => self.modals.open(*modal),
                GateEffect::CloseModal(modal) => self.modals.close(*modal),
                GateEffect::Celebrate => {}
            }
        }
        effects
    }

    /// Close by DOM id, the way a `data-close` control names its target.
    /// Unknown ids are ignored.
    pub fn close_named(&mut self, dom_id: &str) -> Vec<GateEffect> {
        match ModalId::from_dom_id(dom_id) {
            Some(modal) => self.dispatch(GateEvent::CloseRequested(modal)),
            None => {
                tracing::debug!(dom_id, "no modal to close");
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(variant: GateVariant) -> GateController {
        GateController::new(variant, GateCopy::default())
    }

    fn celebrations(effects: &[GateEffect]) -> usize {
        effects.iter().filter(|e| **e == GateEffect::Celebrate).count()
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert!(is_unlock_name("  ShReYa \n"));
        assert!(!is_unlock_name("shreyaa"));
        assert!(!is_unlock_name(""));
    }

    #[test]
    fn trims_like_the_page_does() {
        assert!(is_unlock_name("\u{FEFF}Shreya"));
        assert!(is_unlock_name("\u{3000}shreya\u{2028}"));
        assert!(!is_unlock_name("\u{0085}shreya"));
    }

    #[test]
    fn content_clicks_never_close_a_modal() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::NameChanged("shreya".into()));
        gate.dispatch(GateEvent::GenderChanged("male".into()));
        gate.dispatch(GateEvent::GenderChanged("bhaluu".into()));

        for modal in ModalId::ALL {
            let effects = gate.dispatch(GateEvent::ModalClicked {
                modal,
                target: ClickTarget::Content,
            });
            assert!(effects.is_empty());
            assert!(gate.modals().is_open(modal));
        }
    }

    #[test]
    fn gender_parses_option_values() {
        assert_eq!("bhaluu".parse::<Gender>().unwrap(), Gender::Bhaluu);
        assert!(matches!("Male".parse::<Gender>(), Err(GateError::UnknownGender(_))));
    }

    #[test]
    fn outcome_follows_name_and_gender() {
        let mut gate = controller(GateVariant::HideControl);
        assert_eq!(gate.state().outcome(), GateOutcome::NoNameYet);
        gate.dispatch(GateEvent::NameChanged("bob".into()));
        assert_eq!(gate.state().outcome(), GateOutcome::WrongName);
        gate.dispatch(GateEvent::NameChanged("Shreya".into()));
        assert_eq!(gate.state().outcome(), GateOutcome::AwaitingGender);
        gate.dispatch(GateEvent::GenderChanged("angel".into()));
        assert_eq!(gate.state().outcome(), GateOutcome::Rejected);
        gate.dispatch(GateEvent::GenderChanged("bhaluu".into()));
        assert_eq!(gate.state().outcome(), GateOutcome::Accepted);
    }

    #[test]
    fn live_unlock_shows_control_in_hide_control_variant() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::NameChanged("Shreya".into()));
        assert!(gate.state().control_visible());
        assert!(gate.state().visible_options().contains(&Gender::Bhaluu));
    }

    #[test]
    fn hide_option_variant_waits_for_start() {
        let mut gate = controller(GateVariant::HideOption);
        gate.dispatch(GateEvent::NameChanged("shreya".into()));
        assert!(!gate.state().control_visible());

        let effects = gate.dispatch(GateEvent::GenderChanged("bhaluu".into()));
        assert!(effects.is_empty());
        assert_eq!(gate.state().gender(), None);

        gate.dispatch(GateEvent::EnterPressed);
        assert!(gate.state().control_visible());
        assert!(gate.state().special_option_visible());
    }

    #[test]
    fn hide_option_variant_only_hides_special_option() {
        let mut gate = controller(GateVariant::HideOption);
        gate.dispatch(GateEvent::StartRequested("shreya".into()));
        gate.dispatch(GateEvent::GenderChanged("male".into()));
        gate.dispatch(GateEvent::NameChanged("shrey".into()));

        assert!(gate.state().control_visible());
        assert!(!gate.state().special_option_visible());
        assert_eq!(gate.state().gender(), None);
        assert_eq!(gate.state().message(), None);
        assert!(!gate.state().visible_options().contains(&Gender::Bhaluu));
    }

    #[test]
    fn enter_uses_current_name() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::NameChanged("Bob".into()));
        gate.dispatch(GateEvent::EnterPressed);
        assert_eq!(gate.state().message(), Some(GateCopy::default().not_allowed.as_str()));
    }

    #[test]
    fn start_clears_previous_message() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::StartRequested("Bob".into()));
        assert!(gate.state().message().is_some());
        gate.dispatch(GateEvent::StartRequested(" shreya ".into()));
        assert_eq!(gate.state().message(), None);
        assert!(gate.state().control_visible());
    }

    #[test]
    fn empty_and_unknown_selections_are_noops() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::NameChanged("shreya".into()));
        assert!(gate.dispatch(GateEvent::GenderChanged(String::new())).is_empty());
        assert!(gate.dispatch(GateEvent::GenderChanged("robot".into())).is_empty());
        assert_eq!(gate.state().gender(), None);
        assert_eq!(gate.state().outcome(), GateOutcome::AwaitingGender);
    }

    #[test]
    fn reselecting_after_acceptance_keeps_both_modals_open() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::NameChanged("shreya".into()));
        let effects = gate.dispatch(GateEvent::GenderChanged("bhaluu".into()));
        assert_eq!(celebrations(&effects), 1);
        assert_eq!(gate.state().message(), None);

        let effects = gate.dispatch(GateEvent::GenderChanged("female".into()));
        assert_eq!(effects, vec![GateEffect::OpenModal(ModalId::Error)]);
        assert!(gate.modals().is_open(ModalId::Error));
        assert!(gate.modals().is_open(ModalId::Success));
    }

    #[test]
    fn close_events_close_modals() {
        let mut gate = controller(GateVariant::HideControl);
        gate.dispatch(GateEvent::NameChanged("shreya".into()));
        gate.dispatch(GateEvent::GenderChanged("male".into()));
        assert!(gate.modals().is_open(ModalId::Error));

        gate.dispatch(GateEvent::CloseRequested(ModalId::Error));
        assert!(!gate.modals().is_open(ModalId::Error));

        gate.dispatch(GateEvent::GenderChanged("angel".into()));
        gate.close_named("errorModal");
        assert!(!gate.modals().is_open(ModalId::Error));
        assert!(gate.close_named("noSuchModal").is_empty());
    }
}
