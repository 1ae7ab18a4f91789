//! Track metadata cache and local track matching

use cupid_core::{TrackId, TrackMetadata};
use std::collections::HashMap;

/// Query words shorter than this never count towards a match
const MIN_WORD_LEN: usize = 3;

/// Words too common in video titles to identify a song
const STOP_WORDS: [&str; 14] = [
    "the", "and", "for", "with", "you", "your", "song", "video", "official", "lyrics",
    "lyrical", "full", "audio", "music",
];

/// Cache of track metadata, keyed by track id
///
/// Never invalidated; a later fetch overwrites an earlier one.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    entries: HashMap<TrackId, TrackMetadata>,
}

impl MetadataCache {
    /// Create empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Store metadata for a track
    pub fn insert(&mut self, id: TrackId, metadata: TrackMetadata) {
        self.entries.insert(id, metadata);
    }

    /// Cached metadata for a track
    pub fn get(&self, id: &TrackId) -> Option<&TrackMetadata> {
        self.entries.get(id)
    }

    /// Whether a usable title is cached for a track
    pub fn has_title(&self, id: &TrackId) -> bool {
        self.get(id).is_some_and(TrackMetadata::has_title)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the playlist track best matching a free-text query
    ///
    /// Tries, in order: the whole query as a run of title words, the title
    /// with the most significant query words, the whole query as a run of
    /// author words. Words are compared whole; short words and stop-words
    /// never score. Only tracks in `tracks` with cached metadata are
    /// considered.
    pub fn find_track_by_query(&self, tracks: &[TrackId], query: &str) -> Option<TrackId> {
        let query = words(query);
        if query.is_empty() || query.concat().len() < MIN_WORD_LEN {
            return None;
        }

        let titled: Vec<(&TrackId, Vec<String>)> = tracks
            .iter()
            .filter_map(|id| {
                self.get(id)
                    .filter(|meta| meta.has_title())
                    .map(|meta| (id, words(&meta.title)))
            })
            .collect();

        if let Some((id, _)) = titled.iter().find(|(_, title)| contains_run(title, &query)) {
            return Some((*id).clone());
        }

        let significant: Vec<&str> = query
            .iter()
            .map(String::as_str)
            .filter(|word| word.len() >= MIN_WORD_LEN && !STOP_WORDS.contains(word))
            .collect();
        let mut best: Option<(&TrackId, usize)> = None;
        for (id, title) in &titled {
            let score = significant
                .iter()
                .filter(|&&word| title.iter().any(|t| t == word))
                .count();
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((*id, score));
            }
        }
        if let Some((id, _)) = best {
            return Some(id.clone());
        }

        tracks
            .iter()
            .find(|id| {
                self.get(id)
                    .is_some_and(|meta| contains_run(&words(&meta.author), &query))
            })
            .cloned()
    }
}

/// Whether `query` appears as consecutive whole words of `text`
fn contains_run(text: &[String], query: &[String]) -> bool {
    text.windows(query.len()).any(|window| window == query)
}

/// Lowercased ASCII words, punctuation dropped
fn words(text: &str) -> Vec<String> {
    normalize_query(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Lowercase and keep only ASCII letters, digits and whitespace
fn normalize_query(query: &str) -> String {
    query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Cover art URLs for a track, best quality first
pub fn thumbnail_candidates(id: &TrackId) -> [String; 3] {
    ["maxresdefault", "hqdefault", "default"]
        .map(|size| format!("https://img.youtube.com/vi/{id}/{size}.jpg"))
}
