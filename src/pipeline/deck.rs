// Which track sits on which deck. Even indices always play on the left deck,
// odd indices on the right one, so the crossfader and the deck views both read
// from here instead of redoing the parity math.

use super::playback::PlaybackState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeckSide {
    Left,
    Right,
}

impl DeckSide {
    pub fn opposite(self) -> Self {
        match self {
            DeckSide::Left => DeckSide::Right,
            DeckSide::Right => DeckSide::Left,
        }
    }

    // crossfader extreme for this deck
    pub fn crossfade(self) -> f64 {
        match self {
            DeckSide::Left => -1.0,
            DeckSide::Right => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DeckSide::Left => "LEFT",
            DeckSide::Right => "RIGHT",
        }
    }

    pub fn number(self) -> u8 {
        match self {
            DeckSide::Left => 1,
            DeckSide::Right => 2,
        }
    }
}

pub fn active_deck(track_index: usize) -> DeckSide {
    if track_index % 2 == 0 {
        DeckSide::Left
    } else {
        DeckSide::Right
    }
}

/// Crossfader value when the track at `track_index` is playing on its own.
pub fn resting_crossfade(track_index: usize) -> f64 {
    active_deck(track_index).crossfade()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeckSlot {
    pub side: DeckSide,
    pub track_index: Option<usize>, // None when there's nothing left to cue
    pub progress: f64,
    pub active: bool,
}

impl DeckSlot {
    // how far the record has turned, the ui spins the platter by this
    pub fn rotation_degrees(&self) -> f64 {
        self.progress * 3.6
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeckAssignment {
    pub left: DeckSlot,
    pub right: DeckSlot,
}

impl DeckAssignment {
    pub fn slot(&self, side: DeckSide) -> &DeckSlot {
        match side {
            DeckSide::Left => &self.left,
            DeckSide::Right => &self.right,
        }
    }
}

/// Derives both deck slots from the playback state.
///
/// The active deck shows the current track at the current progress. The
/// other deck either holds the track that just finished (shown at 100) or
/// the next one queued up (shown at 0).
pub fn assign_decks(state: &PlaybackState, setlist_len: usize) -> DeckAssignment {
    let i = state.current_track_index;
    let in_range = |idx: usize| (idx < setlist_len).then_some(idx);

    match active_deck(i) {
        DeckSide::Left => DeckAssignment {
            left: DeckSlot {
                side: DeckSide::Left,
                track_index: in_range(i),
                progress: state.progress,
                active: true,
            },
            right: DeckSlot {
                side: DeckSide::Right,
                track_index: in_range(i + 1),
                progress: 0.0,
                active: false,
            },
        },
        DeckSide::Right => DeckAssignment {
            left: DeckSlot {
                side: DeckSide::Left,
                track_index: in_range(i - 1), // odd, so i >= 1
                progress: 100.0,
                active: false,
            },
            right: DeckSlot {
                side: DeckSide::Right,
                track_index: in_range(i),
                progress: state.progress,
                active: true,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(index: usize, progress: f64) -> PlaybackState {
        PlaybackState {
            current_track_index: index,
            progress,
            ..PlaybackState::default()
        }
    }

    #[test]
    fn even_index_plays_left() {
        let decks = assign_decks(&at(2, 40.0), 5);
        assert_eq!(decks.left.track_index, Some(2));
        assert_eq!(decks.left.progress, 40.0);
        assert!(decks.left.active);
        assert_eq!(decks.right.track_index, Some(3));
        assert_eq!(decks.right.progress, 0.0);
        assert!(!decks.right.active);
    }

    #[test]
    fn odd_index_plays_right() {
        let decks = assign_decks(&at(3, 12.5), 5);
        assert_eq!(decks.left.track_index, Some(2));
        assert_eq!(decks.left.progress, 100.0);
        assert_eq!(decks.right.track_index, Some(3));
        assert_eq!(decks.right.progress, 12.5);
        assert!(decks.right.active);
    }

    #[test]
    fn last_even_track_leaves_right_deck_empty() {
        let decks = assign_decks(&at(4, 10.0), 5);
        assert_eq!(decks.left.track_index, Some(4));
        assert_eq!(decks.right.track_index, None);
    }

    #[test]
    fn empty_setlist_has_no_tracks_on_either_deck() {
        let decks = assign_decks(&PlaybackState::default(), 0);
        assert_eq!(decks.left.track_index, None);
        assert_eq!(decks.right.track_index, None);
    }

    #[test]
    fn assignment_is_idempotent() {
        let state = at(7, 55.0);
        assert_eq!(assign_decks(&state, 10), assign_decks(&state, 10));
    }

    #[test]
    fn resting_crossfade_follows_parity() {
        assert_eq!(resting_crossfade(0), -1.0);
        assert_eq!(resting_crossfade(1), 1.0);
        assert_eq!(active_deck(6).opposite(), DeckSide::Right);
    }
}
