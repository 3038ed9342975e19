// defines the setlist structs that the middle layer and the decks read from

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize}; // serde does json
use thiserror::Error;

pub const MIN_SET_MINUTES: u32 = 15;
pub const MAX_SET_MINUTES: u32 = 240;

/// How the DJ moves from one track into the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransitionType {
    #[default]
    Crossfade, // smooth blend
    Beatmatch, // tempo-matched blend
    EchoOut,   // fade to silence and back
}

impl TransitionType {
    // The model doesn't always stick to the schema labels, so be lenient.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "beatmatch" | "beatmatched" | "tempomatch" => TransitionType::Beatmatch,
            "echoout" | "echo" | "fade" | "fadeout" => TransitionType::EchoOut,
            _ => TransitionType::Crossfade,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransitionType::Crossfade => "crossfade",
            TransitionType::Beatmatch => "beatmatch",
            TransitionType::EchoOut => "echo-out",
        }
    }
}

impl<'de> Deserialize<'de> for TransitionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(TransitionType::from_label(&label))
    }
}

/// One entry of a generated setlist. Immutable once received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub bpm: f64,
    #[serde(deserialize_with = "whole_seconds")]
    pub duration_seconds: u32,
    #[serde(deserialize_with = "energy_level")]
    pub energy_level: u8, // 1-10
    pub transition_type: TransitionType,
    pub genre: String,
}

impl Track {
    // a track the simulator can actually advance through
    pub fn is_playable(&self) -> bool {
        self.duration_seconds > 0 && self.bpm.is_finite() && self.bpm > 0.0
    }

    /// Formats the track length as `m:ss`.
    pub fn duration_label(&self) -> String {
        format_clock(self.duration_seconds)
    }
}

pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

// json numbers from the model come back as floats half the time
fn whole_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw < 0.0 {
        return Ok(0);
    }
    Ok(raw.round().min(f64::from(u32::MAX)) as u32)
}

fn energy_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Ok(1);
    }
    Ok(raw.round().clamp(1.0, 10.0) as u8)
}

/// Ordered, immutable list of tracks. Insertion order is play order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Setlist {
    tracks: Vec<Track>,
}

impl Setlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.tracks.iter().map(|t| t.title.as_str()).collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Chill,
    #[default]
    Mid,
    High,
    Peak,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Chill,
        Intensity::Mid,
        Intensity::High,
        Intensity::Peak,
    ];

    pub fn next(self) -> Self {
        match self {
            Intensity::Chill => Intensity::Mid,
            Intensity::Mid => Intensity::High,
            Intensity::High => Intensity::Peak,
            Intensity::Peak => Intensity::Chill,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Intensity::Chill => Intensity::Peak,
            Intensity::Mid => Intensity::Chill,
            Intensity::High => Intensity::Mid,
            Intensity::Peak => Intensity::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Chill => "chill",
            Intensity::Mid => "mid",
            Intensity::High => "high",
            Intensity::Peak => "peak",
        }
    }

    // what the setup form shows
    pub fn label(self) -> &'static str {
        match self {
            Intensity::Chill => "Chill",
            Intensity::Mid => "Mid-Tempo",
            Intensity::High => "High Energy",
            Intensity::Peak => "Peak Hours",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chill" => Ok(Intensity::Chill),
            "mid" => Ok(Intensity::Mid),
            "high" => Ok(Intensity::High),
            "peak" => Ok(Intensity::Peak),
            other => Err(format!(
                "unknown intensity '{other}' (expected chill, mid, high or peak)"
            )),
        }
    }
}

/// What the setup form collects and the setlist source is asked about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetlistParams {
    pub scene: String,
    pub music_profile: String,
    pub duration_minutes: u32,
    pub intensity: Intensity,
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ParamsError {
    #[error("the scene can't be empty")]
    BlankScene,
    #[error("the music profile can't be empty")]
    BlankMusicProfile,
}

impl SetlistParams {
    // trims the text fields and clamps the duration into range
    pub fn new(
        scene: &str,
        music_profile: &str,
        duration_minutes: u32,
        intensity: Intensity,
    ) -> Result<Self, ParamsError> {
        let scene = scene.trim();
        let music_profile = music_profile.trim();
        if scene.is_empty() {
            return Err(ParamsError::BlankScene);
        }
        if music_profile.is_empty() {
            return Err(ParamsError::BlankMusicProfile);
        }
        Ok(Self {
            scene: scene.to_string(),
            music_profile: music_profile.to_string(),
            duration_minutes: duration_minutes.clamp(MIN_SET_MINUTES, MAX_SET_MINUTES),
            intensity,
        })
    }
}

impl Default for SetlistParams {
    fn default() -> Self {
        Self {
            scene: String::from("House Party"),
            music_profile: String::from("Global Top 40"),
            duration_minutes: 60,
            intensity: Intensity::Mid,
        }
    }
}
