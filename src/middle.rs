// The middle layer: owns the setup form, the pending fetch and the live
// session, turns semantic input events into state changes, and builds the
// DisplayState the TUI draws every frame.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::loader::{FetchRequest, LoadedSession};
use crate::pipeline::clock::TickClock;
use crate::pipeline::deck::{DeckSlot, assign_decks};
use crate::pipeline::playback::{DEFAULT_VOLUME, PlaybackState};
use crate::pipeline::setlist::{
    MAX_SET_MINUTES, MIN_SET_MINUTES, Setlist, SetlistParams, format_clock,
};
use crate::shared::{
    DURATION_STEP, DeckView, DisplayState, FormField, FormView, InputEvent, MAX_TEXT_LEN, Phase,
    QueueRow, SetView,
};

/// One loaded setlist and everything that plays it. Dropping the session
/// drops its tick clock with it.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: u64,
    pub params: SetlistParams,
    pub setlist: Setlist,
    pub caption: String,
    pub state: PlaybackState,
    clock: TickClock,
}

// a fetch handed to the loader and not yet back
#[derive(Debug)]
struct Pending {
    id: u64,
    params: SetlistParams,
    cancel: CancellationToken,
}

pub struct Middle {
    form: FormView,
    phase: Phase,
    pending: Option<Pending>,
    session: Option<Session>,
    next_session_id: u64,
    volume: f64, // master gain, kept across sessions
    status_text: Option<String>,
}

impl Middle {
    pub fn with_params(params: SetlistParams) -> Self {
        Self {
            form: FormView {
                scene: params.scene,
                music_profile: params.music_profile,
                duration_minutes: params.duration_minutes,
                intensity: params.intensity,
                focus: FormField::Scene,
            },
            phase: Phase::Setup,
            pending: None,
            session: None,
            next_session_id: 1,
            volume: DEFAULT_VOLUME,
            status_text: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn playback(&self) -> Option<&PlaybackState> {
        self.session.as_ref().map(|s| &s.state)
    }

    pub fn pending_session(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.id)
    }

    // Returns the fetch requests the loader should run, if any.
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<FetchRequest> {
        match (self.phase, event) {
            (Phase::Setup, InputEvent::NextField) => self.form.focus = self.form.focus.next(),
            (Phase::Setup, InputEvent::PrevField) => self.form.focus = self.form.focus.prev(),
            (Phase::Setup, InputEvent::TypeChar(c)) => self.type_char(c),
            (Phase::Setup, InputEvent::DeleteChar) => {
                if let Some(text) = self.focused_text() {
                    text.pop();
                }
            }
            (Phase::Setup, InputEvent::AdjustField(delta)) => self.adjust_field(delta),
            (Phase::Setup, InputEvent::Submit) => return self.submit(),

            (Phase::Loading, InputEvent::StopSet) => {
                if let Some(pending) = self.pending.take() {
                    pending.cancel.cancel();
                    info!(session = pending.id, "Cancelled pending set");
                }
                self.phase = Phase::Setup;
            }

            (Phase::Live, InputEvent::TogglePlay) => {
                if let Some(session) = self.session.as_mut() {
                    session.state = session.state.toggle();
                    session.clock.reset(); // fresh interval on resume
                    debug!(playing = session.state.playing, "Toggled playback");
                }
            }
            (Phase::Live, InputEvent::AdjustVolume(delta)) => {
                if let Some(session) = self.session.as_mut() {
                    session.state = session.state.set_volume(session.state.volume + delta);
                    self.volume = session.state.volume;
                }
            }
            (Phase::Live, InputEvent::StopSet) => {
                if let Some(session) = self.session.take() {
                    info!(session = session.id, "Stopped set");
                }
                self.phase = Phase::Setup;
            }

            _ => {}
        }
        vec![]
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.form.focus {
            FormField::Scene => Some(&mut self.form.scene),
            FormField::MusicProfile => Some(&mut self.form.music_profile),
            _ => None,
        }
    }

    fn type_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(text) = self.focused_text() {
            if text.chars().count() < MAX_TEXT_LEN {
                text.push(c);
            }
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.form.focus {
            FormField::Duration => {
                let step = DURATION_STEP as i64 * i64::from(delta);
                let next = (i64::from(self.form.duration_minutes) + step)
                    .clamp(i64::from(MIN_SET_MINUTES), i64::from(MAX_SET_MINUTES));
                self.form.duration_minutes = next as u32;
            }
            FormField::Intensity => {
                self.form.intensity = if delta >= 0 {
                    self.form.intensity.next()
                } else {
                    self.form.intensity.prev()
                };
            }
            _ => {}
        }
    }

    fn submit(&mut self) -> Vec<FetchRequest> {
        let params = match SetlistParams::new(
            &self.form.scene,
            &self.form.music_profile,
            self.form.duration_minutes,
            self.form.intensity,
        ) {
            Ok(params) => params,
            Err(e) => {
                self.status_text = Some(e.to_string());
                return vec![];
            }
        };

        let session_id = self.next_session_id;
        self.next_session_id += 1;
        self.status_text = None;
        self.session = None;
        let cancel = CancellationToken::new();
        self.pending = Some(Pending {
            id: session_id,
            params: params.clone(),
            cancel: cancel.clone(),
        });
        self.phase = Phase::Loading;
        info!(
            session = session_id,
            scene = %params.scene,
            profile = %params.music_profile,
            minutes = params.duration_minutes,
            intensity = %params.intensity,
            "Requesting setlist"
        );
        vec![FetchRequest {
            session_id,
            params,
            cancel,
        }]
    }

    /// The loader refused a request. Back to setup with the reason shown.
    pub fn on_fetch_failed(&mut self, session_id: u64, reason: &str) {
        if self.pending_session() != Some(session_id) {
            return;
        }
        self.pending = None;
        self.phase = Phase::Setup;
        self.status_text = Some(reason.to_string());
        warn!(session = session_id, reason, "Fetch failed");
    }

    /// Takes a finished fetch from the loader. Returns false when the result
    /// belongs to a session that was cancelled or replaced in the meantime.
    pub fn on_session_loaded(&mut self, loaded: LoadedSession) -> bool {
        let params = match self.pending.take() {
            Some(p) if p.id == loaded.session_id => p.params,
            other => {
                self.pending = other;
                debug!(session = loaded.session_id, "Ignoring stale setlist");
                return false;
            }
        };

        info!(
            session = loaded.session_id,
            tracks = loaded.setlist.len(),
            "Set is live"
        );
        self.session = Some(Session {
            id: loaded.session_id,
            params,
            setlist: loaded.setlist,
            caption: loaded.caption,
            state: PlaybackState::started(self.volume),
            clock: TickClock::default(),
        });
        self.phase = Phase::Live;
        true
    }

    // called every frame with the time since the last one
    pub fn tick(&mut self, elapsed: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.state.playing || session.setlist.is_empty() {
            session.clock.reset();
            return;
        }

        for _ in 0..session.clock.advance(elapsed) {
            let before = session.state.current_track_index;
            session.state = session.state.tick(&session.setlist);
            if session.state.current_track_index != before {
                if let Some(track) = session.setlist.get(session.state.current_track_index) {
                    info!(
                        index = session.state.current_track_index,
                        title = %track.title,
                        artist = %track.artist,
                        "Now playing"
                    );
                }
            }
        }
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            phase: self.phase,
            form: self.form.clone(),
            status_text: self.status_text.clone(),
            set: self.session.as_ref().map(set_view),
        }
    }
}

fn set_view(session: &Session) -> SetView {
    let state = &session.state;
    let setlist = &session.setlist;
    let decks = assign_decks(state, setlist.len());
    let index = state.current_track_index;

    let upcoming = setlist
        .iter()
        .enumerate()
        .skip(index + 1)
        .map(|(i, t)| QueueRow {
            position: i + 1,
            title: t.title.clone(),
            artist: t.artist.clone(),
            bpm: t.bpm,
            transition: t.transition_type,
        })
        .collect();

    SetView {
        music_profile: session.params.music_profile.clone(),
        caption: session.caption.clone(),
        tracks_remaining: setlist.len().saturating_sub(index),
        playing: state.playing,
        volume: state.volume,
        crossfade: state.crossfade,
        left: deck_view(&decks.left, setlist, state.playing),
        right: deck_view(&decks.right, setlist, state.playing),
        upcoming,
        last_track: !setlist.is_empty() && index + 1 == setlist.len(),
    }
}

fn deck_view(slot: &DeckSlot, setlist: &Setlist, playing: bool) -> DeckView {
    let track = slot.track_index.and_then(|i| setlist.get(i));
    let elapsed_label = match track {
        Some(t) => {
            let secs = (slot.progress.clamp(0.0, 100.0) / 100.0) * f64::from(t.duration_seconds);
            format_clock(secs.floor() as u32)
        }
        None => String::from("--:--"),
    };
    DeckView {
        side: slot.side,
        title: track.map(|t| t.title.clone()),
        artist: track.map(|t| t.artist.clone()),
        bpm: track.map(|t| t.bpm),
        energy_level: track.map(|t| t.energy_level),
        progress: slot.progress,
        rotation_degrees: slot.rotation_degrees(),
        spinning: playing && slot.active && track.is_some(),
        elapsed_label,
        duration_label: track
            .map(|t| t.duration_label())
            .unwrap_or_else(|| String::from("--:--")),
    }
}

impl Default for Middle {
    fn default() -> Self {
        Self::with_params(SetlistParams::default())
    }
}
