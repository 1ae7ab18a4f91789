/// Generation features exposed under `/api/<slug>`
use serde::{Deserialize, Serialize};
use std::fmt;

/// One text-generation feature of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    /// Love letter from keywords
    LoveLetter,
    /// Playful fortune for a question
    Oracle,
    /// One more reason "why I love you"
    InfiniteReason,
    /// Rewrite a message in a chosen format
    TranslateLove,
    /// Relationship trivia quiz (structured)
    Trivia,
    /// Conversation with Cupid
    CupidChat,
    /// Date plan for a location and vibe
    DatePlanner,
    /// Love story from milestones
    StoryNarrator,
    /// Song lyrics in a style
    SongWriter,
    /// Compatibility reading for two names
    Compatibility,
    /// Make a message more romantic
    TextEnhancer,
    /// Rom-com scene from a situation
    MovieScene,
    /// Future together from traits
    FuturePredictor,
    /// Honeymoon itinerary for a vibe
    Honeymoon,
    /// Romantic recipe from ingredients
    LoveChef,
    /// Wedding vows in a tone
    VowGenerator,
    /// Interactive quest, one stage at a time
    CupidQuest,
}

impl Feature {
    /// Every feature, in page order
    pub const ALL: [Feature; 17] = [
        Feature::LoveLetter,
        Feature::Oracle,
        Feature::InfiniteReason,
        Feature::TranslateLove,
        Feature::Trivia,
        Feature::CupidChat,
        Feature::DatePlanner,
        Feature::StoryNarrator,
        Feature::SongWriter,
        Feature::Compatibility,
        Feature::TextEnhancer,
        Feature::MovieScene,
        Feature::FuturePredictor,
        Feature::Honeymoon,
        Feature::LoveChef,
        Feature::VowGenerator,
        Feature::CupidQuest,
    ];

    /// URL slug used in `/api/<slug>`
    pub fn slug(self) -> &'static str {
        match self {
            Feature::LoveLetter => "love-letter",
            Feature::Oracle => "oracle",
            Feature::InfiniteReason => "infinite-reason",
            Feature::TranslateLove => "translate-love",
            Feature::Trivia => "trivia",
            Feature::CupidChat => "cupid-chat",
            Feature::DatePlanner => "date-planner",
            Feature::StoryNarrator => "story-narrator",
            Feature::SongWriter => "song-writer",
            Feature::Compatibility => "compatibility",
            Feature::TextEnhancer => "text-enhancer",
            Feature::MovieScene => "movie-scene",
            Feature::FuturePredictor => "future-predictor",
            Feature::Honeymoon => "honeymoon",
            Feature::LoveChef => "love-chef",
            Feature::VowGenerator => "vow-generator",
            Feature::CupidQuest => "cupid-quest",
        }
    }

    /// Look a feature up by its slug
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.slug() == slug)
    }

    /// Whether the feature returns structured data instead of plain text
    pub fn is_structured(self) -> bool {
        matches!(self, Feature::Trivia)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
