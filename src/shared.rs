// The current input plan:
//
// Setup form:
//   Tab / Down        //  NextField
//   Shift-Tab / Up    //  PrevField
//   any character     //  TypeChar(c) into the scene / music profile fields
//   Backspace         //  DeleteChar
//   Left / Right      //  AdjustField(-1 or 1) on the duration and energy fields
//   Enter             //  Submit
//
// While the set is loading:
//   x                 //  StopSet (cancels the pending fetch)
//
// Live set:
//   Space             //  TogglePlay
//   [ / ] or arrows   //  AdjustVolume(-0.05 or 0.05)
//   x                 //  StopSet (back to the setup form)
//
// Quit:
//   Esc               //  Quit
//
// The idea of the rendering process is the same as before: only the middle
// layer owns the session and the playback state, the TUI just calls
// `middle.display_state()` every frame and draws what it's handed.

use crate::pipeline::deck::DeckSide;
use crate::pipeline::setlist::{Intensity, TransitionType};

pub const APP_NAME: &str = "VIBE-RA";
pub const VOLUME_STEP: f64 = 0.05;
pub const DURATION_STEP: u32 = 15;
pub const MAX_TEXT_LEN: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Loading,
    Live,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Scene,
    MusicProfile,
    Duration,
    Intensity,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Scene,
        FormField::MusicProfile,
        FormField::Duration,
        FormField::Intensity,
    ];

    pub fn next(self) -> Self {
        match self {
            FormField::Scene => FormField::MusicProfile,
            FormField::MusicProfile => FormField::Duration,
            FormField::Duration => FormField::Intensity,
            FormField::Intensity => FormField::Scene,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Scene => FormField::Intensity,
            FormField::MusicProfile => FormField::Scene,
            FormField::Duration => FormField::MusicProfile,
            FormField::Intensity => FormField::Duration,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, FormField::Scene | FormField::MusicProfile)
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Scene => "THE SCENE",
            FormField::MusicProfile => "MUSIC DNA (REGION/GENRE)",
            FormField::Duration => "DURATION (MIN)",
            FormField::Intensity => "ENERGY",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    // setup form
    NextField,
    PrevField,
    TypeChar(char),
    DeleteChar,
    AdjustField(i32), // step the duration / energy selectors
    Submit,

    // live set
    TogglePlay,
    AdjustVolume(f64),
    StopSet, // also cancels a pending fetch

    // quit button (esc)
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormView {
    pub scene: String,
    pub music_profile: String,
    pub duration_minutes: u32,
    pub intensity: Intensity,
    pub focus: FormField,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeckView {
    pub side: DeckSide,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub bpm: Option<f64>,
    pub energy_level: Option<u8>,
    pub progress: f64,
    pub rotation_degrees: f64,
    pub spinning: bool, // active deck and the set is playing
    pub elapsed_label: String,
    pub duration_label: String, // "--:--" when the deck is empty
}

#[derive(Clone, Debug, PartialEq)]
pub struct QueueRow {
    pub position: usize, // 1-based position in the set
    pub title: String,
    pub artist: String,
    pub bpm: f64,
    pub transition: TransitionType,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetView {
    pub music_profile: String,
    pub caption: String, // empty until the caption arrives
    pub tracks_remaining: usize,
    pub playing: bool,
    pub volume: f64,
    pub crossfade: f64,
    pub left: DeckView,
    pub right: DeckView,
    pub upcoming: Vec<QueueRow>,
    pub last_track: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DisplayState {
    pub phase: Phase,
    pub form: FormView,
    pub status_text: Option<String>, // validation message under the form
    pub set: Option<SetView>,        // only while live
}
