// The playback simulator. Everything here is a pure transition on a copy of
// the state; the middle layer decides when to call them.

use super::deck::resting_crossfade;
use super::setlist::Setlist;

pub const DEFAULT_VOLUME: f64 = 0.8;

// progress (percent) where the crossfader starts moving to the other deck
pub const CROSSFADE_START: f64 = 90.0;

// Summing 100/d d times in floating point can land a hair under 100.
const ROLLOVER_EPSILON: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub current_track_index: usize,
    pub progress: f64,  // 0 to 100, percent of the current track elapsed
    pub crossfade: f64, // -1 (left deck) to 1 (right deck)
    pub playing: bool,
    pub volume: f64, // 0 to 1
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current_track_index: 0,
            progress: 0.0,
            crossfade: -1.0, // full left
            playing: false,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl PlaybackState {
    /// Fresh state for a newly loaded setlist, keeping the listener's volume.
    pub fn started(volume: f64) -> Self {
        Self {
            playing: true,
            ..Self::default()
        }
        .set_volume(volume)
    }

    /// Advances one tick (one second) through the current track.
    ///
    /// Past 90% the crossfader slides linearly toward the other deck. When
    /// the track finishes, playback moves to the next index (wrapping to the
    /// start) and the crossfader snaps to the new track's deck.
    pub fn tick(self, setlist: &Setlist) -> Self {
        if !self.playing || setlist.is_empty() {
            return self;
        }
        let Some(track) = setlist.get(self.current_track_index) else {
            return self;
        };

        let increment = 100.0 / f64::from(track.duration_seconds);
        let next_progress = self.progress + increment;

        if next_progress >= 100.0 - ROLLOVER_EPSILON {
            let next_index = (self.current_track_index + 1) % setlist.len();
            return Self {
                current_track_index: next_index,
                progress: 0.0,
                crossfade: resting_crossfade(next_index),
                ..self
            };
        }

        let mut crossfade = self.crossfade;
        if next_progress > CROSSFADE_START {
            let side = resting_crossfade(self.current_track_index);
            let target = -side;
            let t = ((next_progress - CROSSFADE_START) / (100.0 - CROSSFADE_START)).clamp(0.0, 1.0);
            crossfade = side + (target - side) * t;
        }

        Self {
            progress: next_progress,
            crossfade,
            ..self
        }
    }

    pub fn toggle(self) -> Self {
        Self {
            playing: !self.playing,
            ..self
        }
    }

    pub fn set_volume(self, volume: f64) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Back to the creation defaults.
    pub fn stop(self) -> Self {
        Self::default()
    }
}
