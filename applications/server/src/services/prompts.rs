/// Prompt construction for the generation features
///
/// Each feature takes the page's request body, fills in defaults for missing
/// fields, and produces a system/user prompt pair. Nothing here touches the
/// network.
use crate::error::{Result, ServerError};
use crate::services::gateway::PromptPair;
use cupid_core::{CupidError, Feature, TriviaQuestion};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

const PERSONA: &str = "You are Cupid, a warm, witty and playful romantic assistant on a \
Valentine's Day website. Keep answers heartfelt, family friendly and free of clichés \
where you can. Never mention that you are an AI.";

// =============================================================================
// Request bodies
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoveLetterRequest {
    pub keywords: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OracleRequest {
    pub question: String,
}

impl Default for OracleRequest {
    fn default() -> Self {
        Self {
            question: "What does our future hold?".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InfiniteReasonRequest {
    /// Earlier reasons joined with "; ", to avoid repeats
    pub previous_reasons: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TranslateLoveRequest {
    pub message: String,
    pub format: String,
}

impl Default for TranslateLoveRequest {
    fn default() -> Self {
        Self {
            message: "I love you".to_string(),
            format: "emoji".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CupidChatRequest {
    pub message: String,
    /// Recent turns, one per line
    pub history: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatePlannerRequest {
    pub location: String,
    pub vibe: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoryNarratorRequest {
    pub milestones: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SongWriterRequest {
    pub style: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompatibilityRequest {
    pub name1: String,
    pub name2: String,
    pub facts: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TextEnhancerRequest {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MovieSceneRequest {
    pub situation: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FuturePredictorRequest {
    pub traits: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HoneymoonRequest {
    pub vibe: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoveChefRequest {
    pub ingredients: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VowGeneratorRequest {
    pub tone: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CupidQuestRequest {
    #[serde(deserialize_with = "number_or_string")]
    pub stage: u32,
    pub answer: String,
}

impl Default for CupidQuestRequest {
    fn default() -> Self {
        Self {
            stage: 1,
            answer: String::new(),
        }
    }
}

/// Accepts `3` as well as `"3"`
fn number_or_string<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Stage {
        Number(u32),
        Text(String),
    }

    match Stage::deserialize(deserializer)? {
        Stage::Number(n) => Ok(n),
        Stage::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Empty strings count as missing
fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn parse_fields<T: DeserializeOwned>(feature: Feature, fields: Value) -> Result<T> {
    let fields = match fields {
        Value::Null => Value::Object(serde_json::Map::new()),
        other => other,
    };
    serde_json::from_value(fields)
        .map_err(|e| ServerError::BadRequest(format!("Invalid {} request: {}", feature, e)))
}

// =============================================================================
// Prompt builders
// =============================================================================

/// Build the prompt pair for `feature` from its request body
pub fn build_prompt(feature: Feature, fields: Value) -> Result<PromptPair> {
    let prompt = match feature {
        Feature::LoveLetter => {
            let req: LoveLetterRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You write short, tender love letters of about 150 words, signed simply \"Forever yours\"."),
                format!(
                    "Write a love letter inspired by these words: {}.",
                    or_default(&req.keywords, "sunsets, laughter, holding hands")
                ),
            )
        }
        Feature::Oracle => {
            let req: OracleRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You are the Love Oracle: answer in two or three mystical, playful sentences, like a fortune teller who is always on the side of love."),
                format!(
                    "The seeker asks: \"{}\"",
                    or_default(&req.question, "What does our future hold?")
                ),
            )
        }
        Feature::InfiniteReason => {
            let req: InfiniteReasonRequest = parse_fields(feature, fields)?;
            let mut user =
                "Give one new, specific reason why I love you, in a single sentence.".to_string();
            if !req.previous_reasons.trim().is_empty() {
                user.push_str(&format!(
                    " Do not repeat any of these: {}",
                    req.previous_reasons.trim()
                ));
            }
            PromptPair::new(
                format!("{PERSONA} Reply with the reason only, no preamble and no quotes."),
                user,
            )
        }
        Feature::TranslateLove => {
            let req: TranslateLoveRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You translate love messages into playful formats and reply with the translation only."),
                format!(
                    "Translate this message into {} format: \"{}\"",
                    or_default(&req.format, "emoji"),
                    or_default(&req.message, "I love you")
                ),
            )
        }
        Feature::Trivia => PromptPair::new(
            format!("{PERSONA} You write relationship and love trivia. Reply with a JSON array only, no markdown and no commentary."),
            "Create 5 fun multiple-choice trivia questions about love, romance and famous couples. \
Each element must be an object with the keys \"q\" (question text), \"options\" (exactly 4 strings \
prefixed \"A) \", \"B) \", \"C) \", \"D) \"), \"answer\" (the correct letter A, B, C or D) and \
\"funFact\" (one short sentence)."
                .to_string(),
        ),
        Feature::CupidChat => {
            let req: CupidChatRequest = parse_fields(feature, fields)?;
            let message = or_default(&req.message, "Hi Cupid!");
            let user = if req.history.trim().is_empty() {
                message.to_string()
            } else {
                format!(
                    "Conversation so far:\n{}\n\nUser: {}",
                    req.history.trim(),
                    message
                )
            };
            PromptPair::new(
                format!("{PERSONA} You are chatting with a visitor. Keep replies under 80 words, sprinkle in an emoji now and then, and give kind, practical love advice when asked."),
                user,
            )
        }
        Feature::DatePlanner => {
            let req: DatePlannerRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You plan dates as a short itinerary: a title, then 3 to 5 timed steps, then one sweet tip."),
                format!(
                    "Plan a {} date in {}.",
                    or_default(&req.vibe, "romantic"),
                    or_default(&req.location, "our city")
                ),
            )
        }
        Feature::StoryNarrator => {
            let req: StoryNarratorRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You narrate a couple's love story like the opening of a fairy tale, in about 200 words."),
                format!(
                    "Tell our love story using these milestones: {}",
                    or_default(&req.milestones, "we met, we laughed, we fell in love")
                ),
            )
        }
        Feature::SongWriter => {
            let req: SongWriterRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You write song lyrics with a title, two short verses and a chorus, labelled."),
                format!(
                    "Write a love song in the style of {}.",
                    or_default(&req.style, "a soft acoustic ballad")
                ),
            )
        }
        Feature::Compatibility => {
            let req: CompatibilityRequest = parse_fields(feature, fields)?;
            let mut user = format!(
                "Give a playful compatibility reading for {} and {}, with a percentage score and three reasons.",
                or_default(&req.name1, "Partner 1"),
                or_default(&req.name2, "Partner 2")
            );
            if !req.facts.trim().is_empty() {
                user.push_str(&format!(" Things to know about them: {}", req.facts.trim()));
            }
            PromptPair::new(
                format!("{PERSONA} Compatibility readings are always encouraging; the score is never below 80%."),
                user,
            )
        }
        Feature::TextEnhancer => {
            let req: TextEnhancerRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You rewrite messages to be more romantic while keeping their meaning. Reply with the rewritten message only."),
                format!(
                    "Make this message more romantic: \"{}\"",
                    or_default(&req.message, "Good morning")
                ),
            )
        }
        Feature::MovieScene => {
            let req: MovieSceneRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You write short rom-com screenplay scenes with a scene heading, action lines and dialogue."),
                format!(
                    "Write a rom-com scene about this situation: {}",
                    or_default(&req.situation, "two strangers reach for the last umbrella")
                ),
            )
        }
        Feature::FuturePredictor => {
            let req: FuturePredictorRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You predict a couple's future as a light-hearted timeline: in 1 year, 5 years, 10 years and 50 years."),
                format!(
                    "Predict our future together. About us: {}",
                    or_default(&req.traits, "we love travel and late-night talks")
                ),
            )
        }
        Feature::Honeymoon => {
            let req: HoneymoonRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You suggest one honeymoon destination with a 5-day itinerary, one line per day."),
                format!(
                    "Plan a honeymoon with a {} vibe.",
                    or_default(&req.vibe, "relaxing beach")
                ),
            )
        }
        Feature::LoveChef => {
            let req: LoveChefRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You invent romantic recipes for two: a cute dish name, an ingredient list and numbered steps."),
                format!(
                    "Create a romantic recipe using: {}",
                    or_default(&req.ingredients, "chocolate, strawberries, cream")
                ),
            )
        }
        Feature::VowGenerator => {
            let req: VowGeneratorRequest = parse_fields(feature, fields)?;
            PromptPair::new(
                format!("{PERSONA} You write wedding vows of about 120 words in the first person."),
                format!(
                    "Write wedding vows with a {} tone.",
                    or_default(&req.tone, "heartfelt")
                ),
            )
        }
        Feature::CupidQuest => {
            let req: CupidQuestRequest = parse_fields(feature, fields)?;
            let user = if req.answer.trim().is_empty() {
                format!(
                    "Begin stage {} of the quest with a riddle or a small romantic challenge.",
                    req.stage.max(1)
                )
            } else {
                format!(
                    "We are at stage {}. The player answered: \"{}\". React to the answer, then present the next stage.",
                    req.stage.max(1),
                    req.answer.trim()
                )
            };
            PromptPair::new(
                format!("{PERSONA} You run Cupid's Quest, a five-stage interactive love adventure. Keep each stage under 100 words and end every stage with a question for the player. After stage 5, crown the player a Master of Love."),
                user,
            )
        }
    };

    Ok(prompt)
}

// =============================================================================
// Trivia parsing
// =============================================================================

/// Parse a provider reply into a validated quiz
///
/// Accepts the array wrapped in markdown fences or surrounded by chatter.
/// Any invalid question fails the whole quiz.
pub fn parse_trivia(text: &str) -> std::result::Result<Vec<TriviaQuestion>, CupidError> {
    let text = strip_code_fences(text);

    let start = text
        .find('[')
        .ok_or_else(|| CupidError::invalid_trivia("no JSON array in response"))?;
    let end = text
        .rfind(']')
        .filter(|end| *end > start)
        .ok_or_else(|| CupidError::invalid_trivia("unterminated JSON array"))?;

    let questions: Vec<TriviaQuestion> = serde_json::from_str(&text[start..=end])?;
    if questions.is_empty() {
        return Err(CupidError::invalid_trivia("quiz has no questions"));
    }

    for (i, question) in questions.iter().enumerate() {
        question.validate().map_err(|e| {
            CupidError::invalid_trivia(format!("question {}: {}", i + 1, e))
        })?;
    }

    Ok(questions)
}

fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line ("```json")
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const QUIZ: &str = r#"[
        {"q":"Which planet is named after the goddess of love?","options":["A) Mars","B) Venus","C) Jupiter","D) Saturn"],"answer":"B","funFact":"Venus spins backwards."},
        {"q":"Where is the Taj Mahal?","options":["A) Agra","B) Delhi","C) Jaipur","D) Mumbai"],"answer":"A","funFact":"It took about 20 years to build."}
    ]"#;

    #[test]
    fn every_feature_builds_with_empty_body() {
        for feature in Feature::ALL {
            let prompt = build_prompt(feature, Value::Null).unwrap();
            assert!(prompt.system.starts_with("You are Cupid"), "{feature}");
            assert!(!prompt.user.trim().is_empty(), "{feature}");
        }
    }

    #[test]
    fn oracle_defaults_question() {
        let prompt = build_prompt(Feature::Oracle, json!({})).unwrap();
        assert!(prompt.user.contains("What does our future hold?"));

        let prompt = build_prompt(Feature::Oracle, json!({ "question": "  " })).unwrap();
        assert!(prompt.user.contains("What does our future hold?"));
    }

    #[test]
    fn translate_defaults_to_emoji() {
        let prompt = build_prompt(Feature::TranslateLove, json!({ "message": "miss you" })).unwrap();
        assert!(prompt.user.contains("emoji format"));
        assert!(prompt.user.contains("miss you"));
    }

    #[test]
    fn fields_reach_the_prompt() {
        let prompt = build_prompt(
            Feature::Compatibility,
            json!({ "name1": "Ansh", "name2": "Riya", "facts": "both love chai" }),
        )
        .unwrap();
        assert!(prompt.user.contains("Ansh and Riya"));
        assert!(prompt.user.contains("both love chai"));

        let prompt = build_prompt(
            Feature::InfiniteReason,
            json!({ "previousReasons": "your smile; your laugh" }),
        )
        .unwrap();
        assert!(prompt.user.contains("your smile; your laugh"));
    }

    #[test]
    fn quest_continues_from_answer() {
        let prompt = build_prompt(
            Feature::CupidQuest,
            json!({ "stage": 3, "answer": "a rose" }),
        )
        .unwrap();
        assert!(prompt.user.contains("stage 3"));
        assert!(prompt.user.contains("a rose"));

        let prompt = build_prompt(Feature::CupidQuest, json!({ "stage": "2" })).unwrap();
        assert!(prompt.user.contains("Begin stage 2"));
    }

    #[test]
    fn wrong_field_type_is_bad_request() {
        let err = build_prompt(Feature::LoveLetter, json!({ "keywords": 42 })).unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }

    #[test]
    fn trivia_parses_plain_array() {
        let quiz = parse_trivia(QUIZ).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz[0].answer_index(), Some(1));
    }

    #[test]
    fn trivia_parses_fenced_array_with_chatter() {
        let text = format!("Here is your quiz!\n```json\n{QUIZ}\n```\nEnjoy!");
        assert_eq!(parse_trivia(&text).unwrap().len(), 2);

        let fenced = format!("```json\n{QUIZ}\n```");
        assert_eq!(parse_trivia(&fenced).unwrap().len(), 2);
    }

    #[test]
    fn trivia_rejects_prose() {
        assert!(parse_trivia("Sorry, I can't make a quiz right now.").is_err());
    }

    #[test]
    fn trivia_rejects_empty_and_partial() {
        assert!(parse_trivia("[]").is_err());

        let bad = r#"[{"q":"Q?","options":["A) a","B) b","C) c","D) d"],"answer":"A","funFact":""},
                      {"q":"Q2?","options":["A) a","B) b"],"answer":"A","funFact":""}]"#;
        let err = parse_trivia(bad).unwrap_err();
        assert!(err.to_string().contains("question 2"));
    }
}
