use dioxus::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const GLYPHS: [&str; 6] = ["🎉", "✨", "💫", "🌟", "🎊", "🐻"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiSettings {
    pub count: usize,
    pub min_secs: f64,
    pub max_secs: f64,
    /// Extra time a piece stays mounted after its animation ends.
    pub linger_ms: u64,
}

impl Default for EmojiSettings {
    fn default() -> Self {
        Self {
            count: 60,
            min_secs: 2.0,
            max_secs: 3.5,
            linger_ms: 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId {
    pub burst: u64,
    pub index: usize,
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.burst, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmojiPiece {
    pub id: PieceId,
    pub glyph: &'static str,
    pub left_vw: f64,
    pub duration: Duration,
    pub lifetime: Duration,
}

impl EmojiPiece {
    pub fn style(&self) -> String {
        format!(
            "left: {:.2}vw; animation-duration: {:.2}s;",
            self.left_vw,
            self.duration.as_secs_f64()
        )
    }
}

pub fn scatter<R: Rng>(rng: &mut R, settings: &EmojiSettings, burst: u64) -> Vec<EmojiPiece> {
    let linger = Duration::from_millis(settings.linger_ms);
    (0..settings.count)
        .map(|index| {
            let secs = if settings.max_secs > settings.min_secs {
                rng.gen_range(settings.min_secs..settings.max_secs)
            } else {
                settings.min_secs
            };
            let duration = Duration::from_secs_f64(secs);
            EmojiPiece {
                id: PieceId { burst, index },
                glyph: GLYPHS[rng.gen_range(0..GLYPHS.len())],
                left_vw: rng.gen_range(0.0..100.0),
                duration,
                lifetime: duration + linger,
            }
        })
        .collect()
}

/// Removal order for a batch as (wait since previous removal, piece).
pub fn removal_schedule(batch: &[EmojiPiece]) -> Vec<(Duration, PieceId)> {
    let mut by_lifetime: Vec<(Duration, PieceId)> =
        batch.iter().map(|p| (p.lifetime, p.id)).collect();
    by_lifetime.sort();

    let mut elapsed = Duration::ZERO;
    by_lifetime
        .into_iter()
        .map(|(lifetime, id)| {
            let wait = lifetime.saturating_sub(elapsed);
            elapsed = lifetime;
            (wait, id)
        })
        .collect()
}

/// Calls `remove` for each piece once its lifetime has passed.
pub async fn expire_with<F>(batch: &[EmojiPiece], mut remove: F)
where
    F: FnMut(PieceId),
{
    for (wait, id) in removal_schedule(batch) {
        tokio::time::sleep(wait).await;
        remove(id);
    }
}

pub async fn expire(mut pieces: Signal<Vec<EmojiPiece>>, batch: Vec<EmojiPiece>) {
    expire_with(&batch, |id| pieces.write().retain(|p| p.id != id)).await;
}

#[component]
pub fn EmojiLayer(pieces: Vec<EmojiPiece>) -> Element {
    rsx! {
        div { id: "confetti", class: "confetti-root", aria_hidden: "true",
            for piece in pieces {
                span {
                    key: "{piece.id}",
                    class: "piece",
                    style: piece.style(),
                    "{piece.glyph}"
                }
            }
        }
    }
}
