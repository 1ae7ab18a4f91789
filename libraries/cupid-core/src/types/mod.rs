mod feature;
mod ids;
mod metadata;
mod trivia;

pub use feature::Feature;
pub use ids::TrackId;
pub use metadata::TrackMetadata;
pub use trivia::{TriviaQuestion, TRIVIA_LABELS};
