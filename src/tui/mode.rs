use crate::shared::{DisplayState, FormField, Phase};

// state local to tui, mirrors what the middle layer is showing so key
// presses can be resolved into semantic inputevents.
// phase and focus are synced from DisplayState per loop
#[derive(Clone, Debug)]
pub struct TuiState {
    pub phase: Phase,
    pub focus: FormField,
}

impl TuiState {
    pub fn sync(&mut self, ds: &DisplayState) {
        self.phase = ds.phase;
        self.focus = ds.form.focus;
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            phase: Phase::Setup,
            focus: FormField::Scene,
        }
    }
}
