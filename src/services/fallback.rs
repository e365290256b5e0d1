use crate::models::Song;

/// Songs shown whenever no model-derived result is available
pub fn fallback_songs() -> Vec<Song> {
    vec![
        Song::new(
            "응급실",
            "izi",
            "노래방 영원한 1위, 남자들의 국룰 곡!",
            &["#이별", "#락발라드", "#국룰"],
        ),
        Song::new(
            "소주 한 잔",
            "임창정",
            "술 한잔 생각나는 날 무조건 불러야 함.",
            &["#술", "#고음", "#감성"],
        ),
        Song::new(
            "첫눈처럼 너에게 가겠다",
            "에일리",
            "겨울 감성 끝판왕, 가창력 뽐내기 좋음.",
            &["#도깨비", "#겨울", "#발라드"],
        ),
    ]
}
