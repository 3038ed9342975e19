//! Where setlists come from.
//!
//! A [`SetlistSource`] is an opaque remote collaborator. The free functions in
//! this module wrap it so that callers always get a usable answer: an empty
//! setlist or a fallback caption instead of an error.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::pipeline::setlist::{Setlist, SetlistParams, Track};

mod error;
mod gemini;
pub mod prompt;

pub use error::{Result, SourceError};
pub use gemini::{
    DEFAULT_API_BASE, DEFAULT_MODEL, GeminiClient, GeminiConfig, GenerateContentResponse,
    parse_tracks,
};

pub const FALLBACK_CAPTION: &str = "Getting the party started...";

#[async_trait]
pub trait SetlistSource: Send + Sync {
    async fn generate_setlist(&self, params: &SetlistParams) -> Result<Vec<Track>>;

    async fn describe_vibe(&self, setlist: &Setlist) -> Result<String>;
}

/// Asks the source for a setlist. Failures come back as an empty setlist.
pub async fn generate_setlist(source: &dyn SetlistSource, params: &SetlistParams) -> Setlist {
    match source.generate_setlist(params).await {
        Ok(tracks) => {
            let total = tracks.len();
            let playable: Vec<Track> = tracks
                .into_iter()
                .filter(|t| {
                    let ok = t.is_playable();
                    if !ok {
                        warn!(
                            id = %t.id,
                            title = %t.title,
                            "Dropping track with no usable duration or bpm"
                        );
                    }
                    ok
                })
                .collect();
            if playable.len() < total {
                info!(kept = playable.len(), total, "Filtered generated setlist");
            }
            Setlist::new(playable)
        }
        Err(e) => {
            warn!(error = %e, "Setlist generation failed, continuing with an empty set");
            Setlist::empty()
        }
    }
}

/// Asks the source for a hype caption. Failures come back as [`FALLBACK_CAPTION`].
pub async fn describe_vibe(source: &dyn SetlistSource, setlist: &Setlist) -> String {
    if setlist.is_empty() {
        return FALLBACK_CAPTION.to_string();
    }
    match source.describe_vibe(setlist).await {
        Ok(caption) if !caption.trim().is_empty() => caption,
        Ok(_) => FALLBACK_CAPTION.to_string(),
        Err(e) => {
            warn!(error = %e, "Vibe description failed, using fallback caption");
            FALLBACK_CAPTION.to_string()
        }
    }
}

/// Setlist first, then the caption derived from it.
pub async fn load_session(
    source: &dyn SetlistSource,
    params: &SetlistParams,
) -> (Setlist, String) {
    let setlist = generate_setlist(source, params).await;
    let caption = describe_vibe(source, &setlist).await;
    (setlist, caption)
}
