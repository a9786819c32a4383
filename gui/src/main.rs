#![allow(non_snake_case)]

use dioxus::{
    desktop::{Config, LogicalSize, WindowBuilder},
    prelude::*,
};
use gate_dioxus::{GateConfig, GateForm, load_config};
use tracing_subscriber::EnvFilter;

static CSS_STYLE: Asset = asset!("/assets/gate.css");

// Optional; celebrations degrade to nothing if this never loads.
const CONFETTI_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/canvas-confetti@1.9.3/dist/confetti.browser.min.js";

#[component]
fn App() -> Element {
    let config = use_context::<GateConfig>();

    rsx! {
        document::Stylesheet { href: CSS_STYLE }
        document::Script { src: CONFETTI_SCRIPT }
        div { class: "page",
            GateForm { config }
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn settings() -> anyhow::Result<GateConfig> {
    let config = load_config(None)?;
    tracing::info!(variant = ?config.variant, effect = ?config.effects.strategy, "gate config loaded");
    Ok(config)
}

fn main() {
    init_logging();

    let config = settings().unwrap_or_else(|e| {
        tracing::warn!("falling back to default gate config: {e:#}");
        GateConfig::default()
    });

    LaunchBuilder::new()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title("Who goes there?")
                    .with_always_on_top(false)
                    .with_inner_size(LogicalSize::new(720.0, 640.0)),
            ),
        )
        .with_context(config)
        .launch(App);
}
