// Prompt text and the response schema sent along with the setlist request.

use serde_json::{Value, json};

use crate::pipeline::setlist::{Setlist, SetlistParams};

pub fn setlist_prompt(params: &SetlistParams) -> String {
    format!(
        "Act as a world-class professional DJ. Create a detailed, high-energy setlist for a \
         \"{scene}\" event featuring \"{profile}\" music.\n\
         The set should last approximately {minutes} minutes.\n\
         The overall vibe should be {intensity}.\n\
         Provide a list of actual popular songs that fit this context, with estimated BPMs and \
         transition styles (crossfade, beatmatch or echo-out).",
        scene = params.scene,
        profile = params.music_profile,
        minutes = params.duration_minutes,
        intensity = params.intensity,
    )
}

pub fn vibe_prompt(setlist: &Setlist) -> String {
    format!(
        "Write a 2-sentence hype description for a DJ set containing these songs: {}. \
         Make it sound like a professional club promoter.",
        setlist.titles().join(", ")
    )
}

// every track field is required, the model fills them all in
pub fn setlist_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "title": { "type": "STRING" },
                "artist": { "type": "STRING" },
                "bpm": { "type": "NUMBER" },
                "durationSeconds": { "type": "NUMBER" },
                "energyLevel": { "type": "NUMBER" },
                "transitionType": { "type": "STRING" },
                "genre": { "type": "STRING" }
            },
            "required": [
                "id", "title", "artist", "bpm",
                "durationSeconds", "energyLevel", "transitionType", "genre"
            ]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::setlist::Intensity;
    use crate::pipeline::test_fixture::setlist_of;

    #[test]
    fn setlist_prompt_mentions_every_param() {
        let params = SetlistParams::new("Wedding", "Bollywood", 90, Intensity::Peak).unwrap();
        let prompt = setlist_prompt(&params);
        assert!(prompt.contains("\"Wedding\""));
        assert!(prompt.contains("\"Bollywood\""));
        assert!(prompt.contains("90 minutes"));
        assert!(prompt.contains("peak"));
    }

    #[test]
    fn vibe_prompt_lists_titles_in_order() {
        let prompt = vibe_prompt(&setlist_of(&[10, 20]));
        assert!(prompt.contains("Track 0, Track 1"));
    }

    #[test]
    fn schema_requires_all_track_fields() {
        let schema = setlist_schema();
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 8);
        assert_eq!(schema["type"], "ARRAY");
    }
}
