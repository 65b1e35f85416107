use anyhow::Result;
use serde::Serialize;
use tracing::info;

/// Short celebratory chime played when the proposal is accepted.
pub const CELEBRATION_SOUND_URL: &str =
    "https://assets.mixkit.co/active_storage/sfx/2013/2013-preview.mp3";

/// Particle colors, light to dark pink.
pub const CELEBRATION_COLORS: [&str; 3] = ["#ff69b4", "#ff1493", "#ffe4e1"];

const CELEBRATION_DURATION_MS: u64 = 3_000;

/// A single particle burst within the celebration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Burst {
    /// Milliseconds after acceptance at which the burst fires.
    pub at_ms: u64,
    pub particle_count: u32,
    /// Launch angle in degrees (90 = straight up).
    pub angle: f32,
    pub spread: f32,
    /// Origin in viewport fractions, (0,0) top-left to (1,1) bottom-right.
    pub origin_x: f32,
    pub origin_y: f32,
}

/// Timed burst sequence emitted on acceptance: one centered opening burst,
/// then paired bursts from the left and right screen edges at increasing
/// intervals until the window closes.
#[derive(Debug, Clone, Serialize)]
pub struct CelebrationPlan {
    pub duration_ms: u64,
    pub colors: [&'static str; 3],
    pub bursts: Vec<Burst>,
}

impl CelebrationPlan {
    pub fn standard() -> Self {
        let mut bursts = vec![Burst {
            at_ms: 0,
            particle_count: 100,
            angle: 90.0,
            spread: 70.0,
            origin_x: 0.5,
            origin_y: 0.6,
        }];

        // Edge pairs: the gap between rounds grows by 100ms each time.
        let mut at_ms = 100;
        let mut step = 100;
        while at_ms < CELEBRATION_DURATION_MS {
            bursts.push(Burst {
                at_ms,
                particle_count: 2,
                angle: 60.0,
                spread: 55.0,
                origin_x: 0.0,
                origin_y: 0.5,
            });
            bursts.push(Burst {
                at_ms,
                particle_count: 2,
                angle: 120.0,
                spread: 55.0,
                origin_x: 1.0,
                origin_y: 0.5,
            });
            step += 100;
            at_ms += step;
        }

        Self {
            duration_ms: CELEBRATION_DURATION_MS,
            colors: CELEBRATION_COLORS,
            bursts,
        }
    }
}

/// Playback seam for the celebratory chime. Playback is best-effort
/// enrichment; callers ignore failures.
pub trait SoundPlayer: Send + Sync {
    fn play(&self, asset_url: &str) -> Result<()>;
}

/// Default player: records the cue in the log and leaves actual playback
/// to whatever renders the page.
pub struct LogSoundPlayer;

impl SoundPlayer for LogSoundPlayer {
    fn play(&self, asset_url: &str) -> Result<()> {
        info!("Playing celebration sound: {}", asset_url);
        Ok(())
    }
}
