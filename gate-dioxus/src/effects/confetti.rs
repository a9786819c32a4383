use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use crate::error::Result;

pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub const DEFAULT_PALETTE: [&str; 5] = ["#f9c74f", "#90be6d", "#f94144", "#577590", "#f9844a"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiSettings {
    pub duration_ms: u64,
    pub particles_per_side: u32,
    pub spread: f64,
    pub colors: Vec<String>,
}

impl Default for ConfettiSettings {
    fn default() -> Self {
        Self {
            duration_ms: 2000,
            particles_per_side: 3,
            spread: 55.0,
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Origin {
    pub x: f64,
}

/// Argument object for the global `confetti` function.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiOptions {
    pub particle_count: u32,
    pub angle: f64,
    pub spread: f64,
    pub origin: Origin,
    pub colors: Vec<String>,
}

/// One timed run of edge bursts.
#[derive(Debug, Clone)]
pub struct ConfettiBurst {
    settings: ConfettiSettings,
    ends_at: Instant,
}

impl ConfettiBurst {
    pub fn start(settings: ConfettiSettings, now: Instant) -> Self {
        let ends_at = now + Duration::from_millis(settings.duration_ms);
        Self { settings, ends_at }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        now < self.ends_at
    }

    /// The left and right edge bursts for a single frame.
    pub fn frame(&self) -> [ConfettiOptions; 2] {
        let side = |angle: f64, x: f64| ConfettiOptions {
            particle_count: self.settings.particles_per_side,
            angle,
            spread: self.settings.spread,
            origin: Origin { x },
            colors: self.settings.colors.clone(),
        };
        [side(60.0, 0.0), side(120.0, 1.0)]
    }

    /// Script for one frame. Does nothing when `confetti` is not loaded.
    pub fn frame_script(&self) -> Result<String> {
        let [left, right] = self.frame();
        let left = serde_json::to_string(&left)?;
        let right = serde_json::to_string(&right)?;
        Ok(format!(
            "if (typeof confetti === \"function\") {{ confetti({left}); confetti({right}); }}"
        ))
    }
}

/// Emits one frame script per tick until the burst's duration elapses and
/// returns the number of frames. The first frame is always emitted.
pub async fn run_with<F>(settings: ConfettiSettings, mut emit: F) -> Result<usize>
where
    F: FnMut(String),
{
    let burst = ConfettiBurst::start(settings, Instant::now());
    let mut frames = 0;
    loop {
        emit(burst.frame_script()?);
        frames += 1;
        if !burst.is_running(Instant::now()) {
            return Ok(frames);
        }
        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}

pub async fn run(settings: ConfettiSettings) {
    let played = run_with(settings, |script| {
        // fire and forget, the result is never awaited
        let _eval = dioxus::document::eval(&script);
    })
    .await;
    match played {
        Ok(frames) => tracing::debug!(frames, "confetti burst finished"),
        Err(e) => tracing::warn!("confetti burst aborted: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_fires_from_both_edges() {
        let burst = ConfettiBurst::start(ConfettiSettings::default(), Instant::now());
        let [left, right] = burst.frame();
        assert_eq!(left.origin.x, 0.0);
        assert_eq!(right.origin.x, 1.0);
        assert_eq!(left.angle, 60.0);
        assert_eq!(right.angle, 120.0);
        assert_eq!(left.particle_count, 3);
        assert_eq!(left.colors, right.colors);
        assert_eq!(left.colors.len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn stops_after_duration() {
        let now = Instant::now();
        let burst = ConfettiBurst::start(ConfettiSettings::default(), now);
        assert!(burst.is_running(now));
        assert!(burst.is_running(now + Duration::from_millis(1999)));
        assert!(!burst.is_running(now + Duration::from_millis(2000)));
    }

    #[test]
    fn script_is_guarded_and_camel_cased() {
        let burst = ConfettiBurst::start(ConfettiSettings::default(), Instant::now());
        let script = burst.frame_script().unwrap();
        assert!(script.starts_with("if (typeof confetti === \"function\")"));
        assert!(script.contains("\"particleCount\":3"));
        assert!(script.contains("\"origin\":{\"x\":1.0}"));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_duration_still_fires_one_frame() {
        let settings = ConfettiSettings { duration_ms: 0, ..Default::default() };
        let mut scripts = Vec::new();
        let frames = run_with(settings, |script| scripts.push(script)).await.unwrap();

        assert_eq!(frames, 1);
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].matches("confetti({").count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_emits_every_frame_then_returns() {
        let started = Instant::now();
        let mut scripts = 0;
        let frames = run_with(ConfettiSettings::default(), |_| scripts += 1).await.unwrap();

        assert_eq!(frames, scripts);
        assert!((120..=130).contains(&frames), "frames {frames}");
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(2000), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(2000) + FRAME_INTERVAL * 2);
    }
}
