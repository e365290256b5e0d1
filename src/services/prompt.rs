//! Prompt construction for karaoke recommendations.
//!
//! Everything here is pure: a request plus an exclusion list maps to the
//! instruction text, the system persona and the response shape the model must
//! follow. The shape is only a request; the service validates what comes back.

use serde_json::{json, Value};

use crate::models::RequestDescriptor;

/// Number of songs asked for per call
pub const SONGS_PER_REQUEST: usize = 5;

pub const SYSTEM_INSTRUCTION: &str = "You are a professional Karaoke DJ in Korea. \
Recommend songs that are popular in Korean karaoke (Noraebang). \
Ensure the artist and title are accurate in Korean. \
Provide a short, witty reason why this song is good for the specific request. \
Return the response in strictly valid JSON format.";

/// Everything the external generation call needs
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub response_schema: Value,
}

impl GenerationRequest {
    pub fn for_request(request: &RequestDescriptor, exclude: &[String]) -> Self {
        Self {
            prompt: build_prompt(request, exclude),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            response_schema: response_schema(),
        }
    }
}

/// Builds the user prompt for `request`, asking the model to skip `exclude`
///
/// Entries of `exclude` are `"title - artist"` labels.
pub fn build_prompt(request: &RequestDescriptor, exclude: &[String]) -> String {
    let n = SONGS_PER_REQUEST;
    let body = match request {
        RequestDescriptor::Today => format!(
            "대한민국 노래방에서 오늘 부르기 좋은 인기 곡 {n}개를 추천해줘. 최신 유행곡이나 스테디셀러 위주로."
        ),
        RequestDescriptor::Mood(mood) => format!(
            "기분이 '{mood}'일 때 대한민국 노래방에서 부르기 좋은 노래 {n}곡을 추천해줘. 분위기에 딱 맞는 곡으로 선정해줘."
        ),
        RequestDescriptor::Genre(genre) => {
            format!("장르가 '{genre}'인 대한민국 노래방 인기 곡 {n}개를 추천해줘.")
        }
        RequestDescriptor::Artist(artist) => {
            format!("가수 '{artist}'의 노래 중 노래방에서 가장 인기 있는 곡 {n}개를 추천해줘.")
        }
        RequestDescriptor::Custom(profile) => format!(
            "사용자가 다음과 같은 스타일의 노래를 좋아해: \"{profile}\". 이 취향을 분석해서 대한민국 노래방에서 부르기 좋은 노래 {n}곡을 추천해줘."
        ),
    };

    if exclude.is_empty() {
        body
    } else {
        format!(
            "{body} 다음 노래들은 이미 추천했으니 제외하고 추천해줘: {}.",
            exclude.join(", ")
        )
    }
}

/// JSON schema for the expected response: an array of songs with every field required
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "Song title in Korean" },
                "artist": { "type": "STRING", "description": "Artist name in Korean" },
                "reason": {
                    "type": "STRING",
                    "description": "Short reason for recommendation (max 50 chars)"
                },
                "tags": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "description": "2-3 hashtags related to the song vibe e.g. #HighNote #Sad"
                }
            },
            "required": ["title", "artist", "reason", "tags"]
        }
    })
}
