#![allow(non_snake_case)]

pub mod config;
pub mod effects;
pub mod error;
pub mod gate;
pub mod gate_form;
pub mod modal;

pub use config::{GateConfig, load_config};
pub use error::GateError;
pub use gate::{
    Gender, GateController, GateCopy, GateEffect, GateEvent, GateOutcome, GateState, GateVariant,
    UNLOCK_NAME, is_unlock_name, normalize_name,
};
pub use gate_form::GateForm;
pub use modal::{ClickTarget, ModalId, ModalPresenter};
