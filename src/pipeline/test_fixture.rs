// Purely for testing: canned tracks and setlists so the simulator and the
// middle layer can be driven without a setlist source.

use super::setlist::{Setlist, Track, TransitionType};

pub fn track(id: &str, duration_seconds: u32) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {id}"),
        artist: format!("Artist {id}"),
        bpm: 124.0,
        duration_seconds,
        energy_level: 6,
        transition_type: TransitionType::Crossfade,
        genre: String::from("House"),
    }
}

// one track per duration, ids are their positions
pub fn setlist_of(durations: &[u32]) -> Setlist {
    Setlist::new(
        durations
            .iter()
            .enumerate()
            .map(|(i, d)| track(&i.to_string(), *d))
            .collect(),
    )
}
