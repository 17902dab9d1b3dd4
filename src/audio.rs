//! Sound seam. The terminal build has no sound device, so the default
//! implementation records the cues in the log instead; the world still calls
//! them at exactly the moments a real backend would need.

use log::info;

/// Fire-and-forget sound cues raised by the simulation.
pub trait Audio {
    fn play_shoot(&mut self);
    fn play_explosion(&mut self);
}

/// Logs each cue instead of playing it.
pub struct LogAudio;

impl Audio for LogAudio {
    fn play_shoot(&mut self) {
        info!("audio: shoot");
    }

    fn play_explosion(&mut self) {
        info!("audio: explosion");
    }
}
