//! YouTube URL recognition

use once_cell::sync::Lazy;
use regex::Regex;

static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(https?://)?(www\.|m\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|shorts/|.+\?v=)?([A-Za-z0-9_-]{11})",
    )
    .expect("static regex")
});

static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?:v=|/)([0-9A-Za-z_-]{11})",
        r"(?:embed/)([0-9A-Za-z_-]{11})",
        r"(?:youtu\.be/)([0-9A-Za-z_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Whether `url` looks like a single YouTube video link
pub fn validate_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url.trim())
}

/// Extract the 11-character video id
pub fn video_id(url: &str) -> Option<String> {
    let url = url.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
