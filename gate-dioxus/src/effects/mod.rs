pub mod confetti;
pub mod emoji;

use dioxus::core::Task;
use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::GateError;
pub use confetti::{ConfettiBurst, ConfettiOptions, ConfettiSettings};
pub use emoji::{EmojiLayer, EmojiPiece, EmojiSettings};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectStrategy {
    /// Frame bursts through the page's global `confetti` function.
    Confetti,
    #[default]
    Emoji,
}

impl FromStr for EffectStrategy {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confetti" => Ok(EffectStrategy::Confetti),
            "emoji" => Ok(EffectStrategy::Emoji),
            other => Err(GateError::InvalidConfig(format!("unknown effect strategy {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectSettings {
    pub strategy: EffectStrategy,
    pub confetti: ConfettiSettings,
    pub emoji: EmojiSettings,
}

/// Outstanding celebration handles keyed by burst id.
#[derive(Debug)]
pub struct BurstRegistry<H> {
    next_id: u64,
    running: HashMap<u64, H>,
}

impl<H> Default for BurstRegistry<H> {
    fn default() -> Self {
        Self {
            next_id: 0,
            running: HashMap::new(),
        }
    }
}

impl<H> BurstRegistry<H> {
    pub fn reserve(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn insert(&mut self, burst: u64, handle: H) {
        self.running.insert(burst, handle);
    }

    /// Forget a burst that ran to completion.
    pub fn finish(&mut self, burst: u64) -> Option<H> {
        self.running.remove(&burst)
    }

    pub fn len(&self) -> usize {
        self.running.len()
    }

    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Take every outstanding handle, for cancellation on teardown.
    pub fn drain(&mut self) -> Vec<H> {
        self.running.drain().map(|(_, handle)| handle).collect()
    }
}

/// Runs celebrations for the component that created it.
#[derive(Clone, Copy)]
pub struct EffectsEmitter {
    settings: Signal<EffectSettings>,
    pieces: Signal<Vec<EmojiPiece>>,
    bursts: Signal<BurstRegistry<Task>>,
}

pub fn use_effects_emitter(settings: EffectSettings) -> EffectsEmitter {
    let settings = use_signal(|| settings);
    let pieces = use_signal(Vec::new);
    let mut bursts = use_signal(BurstRegistry::<Task>::default);

    use_drop(move || {
        let Ok(mut registry) = bursts.try_write() else {
            return;
        };
        let stale = registry.drain();
        if !stale.is_empty() {
            tracing::debug!(count = stale.len(), "cancelling celebrations");
        }
        for task in stale {
            task.cancel();
        }
    });

    EffectsEmitter {
        settings,
        pieces,
        bursts,
    }
}

impl EffectsEmitter {
    pub fn pieces(&self) -> Vec<EmojiPiece> {
        self.pieces.read().clone()
    }

    /// Starts a celebration and returns immediately. Overlapping calls run
    /// side by side.
    pub fn celebrate(&mut self) {
        let settings = self.settings.read().clone();
        let strategy = settings.strategy;
        let burst = self.bursts.write().reserve();
        let mut bursts = self.bursts;
        let mut pieces = self.pieces;

        let task = match strategy {
            EffectStrategy::Confetti => spawn(async move {
                confetti::run(settings.confetti).await;
                bursts.write().finish(burst);
            }),
            EffectStrategy::Emoji => {
                let batch = emoji::scatter(&mut rand::thread_rng(), &settings.emoji, burst);
                pieces.write().extend(batch.iter().cloned());
                spawn(async move {
                    emoji::expire(pieces, batch).await;
                    bursts.write().finish(burst);
                })
            }
        };
        tracing::debug!(burst, ?strategy, "celebration started");
        self.bursts.write().insert(burst, task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_tracks_and_drains_bursts() {
        let mut registry = BurstRegistry::<&str>::default();
        let first = registry.reserve();
        let second = registry.reserve();
        assert_ne!(first, second);

        registry.insert(first, "a");
        registry.insert(second, "b");
        assert_eq!(registry.finish(first), Some("a"));
        assert_eq!(registry.finish(first), None);
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.drain(), vec!["b"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn strategy_parses_case_insensitively() {
        assert_eq!("Confetti".parse::<EffectStrategy>().unwrap(), EffectStrategy::Confetti);
        assert_eq!(" emoji ".parse::<EffectStrategy>().unwrap(), EffectStrategy::Emoji);
        assert!("fireworks".parse::<EffectStrategy>().is_err());
    }
}
