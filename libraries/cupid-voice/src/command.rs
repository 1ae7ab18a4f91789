//! Transcript normalization and intent matching

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading wake/politeness phrases stripped before intent matching
///
/// Longer phrases come first so "hey cupid" wins over "cupid".
pub const LEADING_PHRASES: [&str; 10] = [
    "hey cupid",
    "okay cupid",
    "ok cupid",
    "ansh baby",
    "baby",
    "jaan",
    "cupid",
    "sunao",
    "please",
    "hello",
];

/// Minimum characters a search query needs
pub const MIN_QUERY_LEN: usize = 3;

/// Command recognized from speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Skip to next track
    Next,
    /// Go to previous track
    Previous,
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
    /// Open the player panel
    OpenPlayer,
    /// Close the player panel
    ClosePlayer,
    /// Toggle shuffle
    ToggleShuffle,
    /// Search for a song and play it
    Search(String),
}

static WAKE_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(cupid|baby|jaan|hello|sunao)\b").expect("valid regex"));

static NEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(next|skip|agla)\b").expect("valid regex"));
static PREVIOUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(previous|back|pichla)\b").expect("valid regex"));
static PAUSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(stop|pause|ruko)\b").expect("valid regex"));
static RESUME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(resume|start)\b|^(play|chalao)$|\bplay$").expect("valid regex"));
static OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bopen\b|\bshow player\b").expect("valid regex"));
static CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclose\b|\bhide player\b").expect("valid regex"));
static SHUFFLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(shuffle|random)\b").expect("valid regex"));

static PLAY_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:play|sunao|bajao|baja do|chalao|lagao)\s+(.+)$").expect("valid regex")
});
static TRAILING_FILLER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\s+(?:please|song|gana|bajao|chalao|lagao|sunao|baja do))+$").expect("valid regex")
});

/// Lowercase, drop punctuation and strip leading wake/politeness phrases
pub fn normalize(transcript: &str) -> String {
    let cleaned: String = transcript
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let mut text = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    'strip: loop {
        for phrase in LEADING_PHRASES {
            if text == phrase {
                text.clear();
                break 'strip;
            }
            if let Some(rest) = text
                .strip_prefix(phrase)
                .and_then(|rest| rest.strip_prefix(' '))
            {
                text = rest.to_string();
                continue 'strip;
            }
        }
        break;
    }

    text
}

/// Whether a raw transcript contains a background wake phrase
pub fn contains_wake_phrase(transcript: &str) -> bool {
    WAKE_PHRASE.is_match(&transcript.to_lowercase())
}

/// Map a transcript onto a command
///
/// Intents are tried in a fixed order; anything else becomes a search when
/// at least [`MIN_QUERY_LEN`] characters remain.
pub fn parse_command(transcript: &str) -> Option<VoiceCommand> {
    let text = normalize(transcript);
    if text.is_empty() {
        return None;
    }

    let intents: [(&Lazy<Regex>, VoiceCommand); 7] = [
        (&NEXT, VoiceCommand::Next),
        (&PREVIOUS, VoiceCommand::Previous),
        (&PAUSE, VoiceCommand::Pause),
        (&RESUME, VoiceCommand::Resume),
        (&OPEN, VoiceCommand::OpenPlayer),
        (&CLOSE, VoiceCommand::ClosePlayer),
        (&SHUFFLE, VoiceCommand::ToggleShuffle),
    ];
    for (pattern, command) in intents {
        if pattern.is_match(&text) {
            return Some(command);
        }
    }

    extract_query(&text).map(VoiceCommand::Search)
}

/// Song query from normalized text, minus play verbs and filler
fn extract_query(text: &str) -> Option<String> {
    let query = PLAY_VERB
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str());
    let query = TRAILING_FILLER.replace(query, "");
    let query = query.trim();

    if query.chars().count() < MIN_QUERY_LEN {
        None
    } else {
        Some(query.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_wake_phrases_repeatedly() {
        assert_eq!(normalize("Hey Cupid, please pause!"), "pause");
        assert_eq!(normalize("baby jaan next"), "next");
        assert_eq!(normalize("ok cupid"), "");
    }

    #[test]
    fn normalize_respects_word_boundaries() {
        assert_eq!(normalize("babylon by bus"), "babylon by bus");
        assert_eq!(normalize("cupidity"), "cupidity");
    }

    #[test]
    fn wake_phrase_detection() {
        assert!(contains_wake_phrase("hey cupid pause"));
        assert!(contains_wake_phrase("Jaan next song"));
        assert!(!contains_wake_phrase("pause"));
        assert!(!contains_wake_phrase("babylon"));
    }

    #[test]
    fn intents_in_order() {
        assert_eq!(parse_command("skip this one"), Some(VoiceCommand::Next));
        assert_eq!(parse_command("go back"), Some(VoiceCommand::Previous));
        assert_eq!(parse_command("ruko"), Some(VoiceCommand::Pause));
        assert_eq!(parse_command("stop"), Some(VoiceCommand::Pause));
        assert_eq!(parse_command("play"), Some(VoiceCommand::Resume));
        assert_eq!(parse_command("resume music"), Some(VoiceCommand::Resume));
        assert_eq!(parse_command("show player"), Some(VoiceCommand::OpenPlayer));
        assert_eq!(parse_command("hide player"), Some(VoiceCommand::ClosePlayer));
        assert_eq!(parse_command("shuffle"), Some(VoiceCommand::ToggleShuffle));
    }

    #[test]
    fn play_verb_is_stripped_from_search() {
        assert_eq!(
            parse_command("play shape of you"),
            Some(VoiceCommand::Search("shape of you".into()))
        );
        assert_eq!(
            parse_command("hey cupid play tum hi ho song please"),
            Some(VoiceCommand::Search("tum hi ho".into()))
        );
        assert_eq!(
            parse_command("kesariya bajao"),
            Some(VoiceCommand::Search("kesariya".into()))
        );
        assert_eq!(
            parse_command("baja do raabta"),
            Some(VoiceCommand::Search("raabta".into()))
        );
    }

    #[test]
    fn short_queries_are_dropped() {
        assert_eq!(parse_command("play hi"), None);
        assert_eq!(parse_command("ok"), None);
        assert_eq!(parse_command("hey cupid"), None);
    }

    #[test]
    fn words_inside_titles_do_not_trigger_intents() {
        assert_eq!(
            parse_command("play backstreet boys"),
            Some(VoiceCommand::Search("backstreet boys".into()))
        );
    }
}
