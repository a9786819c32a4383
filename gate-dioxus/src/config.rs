use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::effects::EffectSettings;
use crate::error::{GateError, Result};
use crate::gate::{GateCopy, GateVariant};

pub const DEFAULT_CONFIG_PATH: &str = "gate.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub variant: GateVariant,
    pub effects: EffectSettings,
    pub copy: GateCopy,
}

impl GateConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: GateConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let emoji = &self.effects.emoji;
        if emoji.count == 0 {
            return Err(GateError::InvalidConfig("emoji count must be positive".into()));
        }
        if !(emoji.min_secs > 0.0 && emoji.min_secs.is_finite() && emoji.max_secs.is_finite()) {
            return Err(GateError::InvalidConfig("emoji durations must be positive".into()));
        }
        if emoji.min_secs > emoji.max_secs {
            return Err(GateError::InvalidConfig(format!(
                "emoji duration band is inverted: {} > {}",
                emoji.min_secs, emoji.max_secs
            )));
        }
        if self.effects.confetti.colors.is_empty() {
            return Err(GateError::InvalidConfig("confetti palette is empty".into()));
        }
        Ok(())
    }

    /// `GATE_VARIANT` and `GATE_EFFECT` win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GATE_VARIANT") {
            self.variant = v.parse()?;
        }
        if let Some(v) = lookup("GATE_EFFECT") {
            self.effects.strategy = v.parse()?;
        }
        Ok(())
    }
}

fn config_path() -> PathBuf {
    std::env::var("GATE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Reads `path` (or `GATE_CONFIG`, or `gate.toml`), then applies env
/// overrides. A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<GateConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(config_path);

    let mut config = match fs::read_to_string(&path) {
        Ok(raw) => GateConfig::from_toml_str(&raw)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(?path, "no config file, using defaults");
            GateConfig::default()
        }
        Err(source) => return Err(GateError::ConfigRead { path, source }),
    };

    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}
