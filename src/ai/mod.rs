//! AI card generation.
//!
//! This module encapsulates the generative-AI integration:
//! - `prompt`: instruction templating per category, difficulty and language
//! - `parse`: prompt-array extraction from model output
//! - `gemini`: HTTP client for the Gemini `generateContent` endpoint
//!
//! Calls are plain request/response. Batches wait a fixed delay between
//! calls and nothing is retried.

mod gemini;
mod parse;
mod prompt;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::clock::Clock;
use crate::models::{Card, Category, Difficulty, Language};

pub use gemini::GeminiClient;
pub use parse::extract_prompts;
pub use prompt::{card_prompt, PROMPTS_PER_REQUEST};

/// Pause between consecutive calls of one batch
pub const BATCH_DELAY: Duration = Duration::from_millis(500);

#[cfg(test)]
const PARSE_ERROR_MESSAGE: &str = "Failed to parse AI response. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("Gemini API key not configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(String),

    #[error("Gemini API returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Gemini API returned no text")]
    EmptyResponse,

    #[error("malformed AI response: {0}")]
    Malformed(String),

    /// Model output without a usable prompt array
    #[error("Failed to parse AI response. Please try again.")]
    Unparseable,
}

/// Text-completion backend used to produce card prompts
pub trait CardGenerator: Send + Sync {
    fn complete(&self, prompt: &str) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// Single-card request issued by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRequest {
    pub category: Category,
    pub difficulty: Difficulty,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCardsOptions {
    pub category: Category,
    pub difficulty: Difficulty,
    pub count: usize,
    pub language: Language,
}

/// Outcome of a batch. Cards built before a failure are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerateCardsResponse {
    pub cards: Vec<Card>,
    pub error: Option<String>,
}

fn clean_prompts(prompts: Vec<String>) -> impl Iterator<Item = String> {
    prompts
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

/// Generate `options.count` cards, one prompt per card.
pub async fn generate_cards<G: CardGenerator>(
    generator: &G,
    options: &GenerateCardsOptions,
    clock: &dyn Clock,
    batch_delay: Duration,
) -> GenerateCardsResponse {
    let mut response = GenerateCardsResponse::default();
    if options.count == 0 {
        return response;
    }

    let batch_size = options.count.min(PROMPTS_PER_REQUEST);
    let batches = options.count.div_ceil(batch_size);

    for batch in 0..batches {
        let prompt = card_prompt(options.category, options.difficulty, options.language);

        let text = match generator.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, batch, "error generating cards with Gemini");
                response.error = Some(e.to_string());
                return response;
            }
        };

        let prompts = match extract_prompts(&text) {
            Ok(prompts) => prompts,
            Err(e) => {
                tracing::error!(error = %e, response = %text, "failed to parse Gemini response");
                response.error = Some(GenerationError::Unparseable.to_string());
                return response;
            }
        };

        let remaining = options.count - response.cards.len();
        let to_create = prompts.len().min(remaining);
        let now = clock.now_millis();
        for (index, prompt) in prompts.into_iter().take(to_create).enumerate() {
            let prompt = prompt.trim();
            if !prompt.is_empty() {
                response.cards.push(Card::new(
                    format!("gemini-{}-{}-{}", now, batch, index),
                    options.category,
                    vec![prompt.to_string()],
                ));
            }
        }

        if batch + 1 < batches {
            tokio::time::sleep(batch_delay).await;
        }
    }

    tracing::info!(cards = response.cards.len(), "generated AI cards");
    response
}

/// Generate one card holding every prompt of a single response
pub async fn generate_single_card<G: CardGenerator>(
    generator: &G,
    request: GenerationRequest,
    clock: &dyn Clock,
) -> Result<Card, GenerationError> {
    let prompt = card_prompt(request.category, request.difficulty, request.language);
    let text = generator.complete(&prompt).await?;
    let prompts = extract_prompts(&text).map_err(|e| {
        tracing::error!(error = %e, response = %text, "failed to parse Gemini response");
        GenerationError::Unparseable
    })?;

    let prompts: Vec<String> = clean_prompts(prompts).take(PROMPTS_PER_REQUEST).collect();
    if prompts.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(Card::new(
        format!("gemini-{}-s", clock.now_millis()),
        request.category,
        prompts,
    ))
}

/// Check a key with a minimal request
pub async fn validate_api_key<G: CardGenerator>(generator: &G) -> bool {
    match generator.complete("Test").await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "API key validation failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Generator that replays canned responses and records prompts
    struct Scripted {
        responses: Mutex<VecDeque<Result<String, GenerationError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<&str, GenerationError>>) -> Self {
            Self {
                responses: Mutex::new(
                    responses.into_iter().map(|r| r.map(str::to_string)).collect(),
                ),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    impl CardGenerator for Scripted {
        async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(GenerationError::EmptyResponse))
        }
    }

    fn options(count: usize) -> GenerateCardsOptions {
        GenerateCardsOptions {
            category: Category::Animal,
            difficulty: Difficulty::Easy,
            count,
            language: Language::PtBr,
        }
    }

    #[tokio::test]
    async fn test_batch_of_three_uses_one_call() {
        let generator = Scripted::new(vec![Ok(r#"["gato", "cão", "rato", "boi", "pato"]"#)]);
        let clock = ManualClock::new(1000);
        let response = generate_cards(&generator, &options(3), &clock, Duration::ZERO).await;

        assert_eq!(generator.calls(), 1);
        assert!(response.error.is_none());
        let ids: Vec<&str> = response.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["gemini-1000-0-0", "gemini-1000-0-1", "gemini-1000-0-2"]);
        assert!(response.cards.iter().all(|c| c.category == Category::Animal));
        assert_eq!(response.cards[1].prompts, vec!["cão"]);
    }

    #[tokio::test]
    async fn test_batch_of_seven_uses_two_calls() {
        let generator = Scripted::new(vec![
            Ok(r#"["a", "b", "c", "d", "e"]"#),
            Ok(r#"["f", "g", "h", "i", "j"]"#),
        ]);
        let clock = ManualClock::new(0);
        let response = generate_cards(&generator, &options(7), &clock, Duration::ZERO).await;

        assert_eq!(generator.calls(), 2);
        assert_eq!(response.cards.len(), 7);
        assert_eq!(response.cards[6].prompts, vec!["g"]);
    }

    #[tokio::test]
    async fn test_parse_failure_keeps_partial_batch() {
        let generator = Scripted::new(vec![
            Ok(r#"["a", "b", "c", "d", "e"]"#),
            Ok("sorry, no array today"),
        ]);
        let clock = ManualClock::new(0);
        let response = generate_cards(&generator, &options(10), &clock, Duration::ZERO).await;

        assert_eq!(response.cards.len(), 5);
        assert_eq!(response.error.as_deref(), Some(PARSE_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn test_network_error_surfaces_message() {
        let generator = Scripted::new(vec![Err(GenerationError::Http("timeout".into()))]);
        let clock = ManualClock::new(0);
        let response = generate_cards(&generator, &options(2), &clock, Duration::ZERO).await;

        assert!(response.cards.is_empty());
        assert_eq!(response.error.as_deref(), Some("request failed: timeout"));
    }

    #[tokio::test]
    async fn test_blank_prompts_are_skipped() {
        let generator = Scripted::new(vec![Ok(r#"["  ", "leão", ""]"#)]);
        let clock = ManualClock::new(0);
        let response = generate_cards(&generator, &options(3), &clock, Duration::ZERO).await;
        assert_eq!(response.cards.len(), 1);
        assert_eq!(response.cards[0].prompts, vec!["leão"]);
    }

    #[tokio::test]
    async fn test_zero_count_makes_no_calls() {
        let generator = Scripted::new(vec![]);
        let clock = ManualClock::new(0);
        let response = generate_cards(&generator, &options(0), &clock, Duration::ZERO).await;
        assert_eq!(generator.calls(), 0);
        assert_eq!(response, GenerateCardsResponse::default());
    }

    #[tokio::test]
    async fn test_single_card_holds_all_prompts() {
        let generator = Scripted::new(vec![Ok("```json\n[\" Praia \", \"Museu\", \"Ponte\"]\n```")]);
        let clock = ManualClock::new(55);
        let request = GenerationRequest {
            category: Category::Place,
            difficulty: Difficulty::Medium,
            language: Language::En,
        };
        let card = generate_single_card(&generator, request, &clock).await.unwrap();

        assert_eq!(card.id, "gemini-55-s");
        assert_eq!(card.category, Category::Place);
        assert_eq!(card.prompts, vec!["Praia", "Museu", "Ponte"]);
        assert!(generator.prompts.lock().unwrap()[0].contains("Category: Lugar"));
    }

    #[tokio::test]
    async fn test_single_card_malformed() {
        let generator = Scripted::new(vec![Ok("nothing useful")]);
        let clock = ManualClock::new(0);
        let request = GenerationRequest {
            category: Category::Thing,
            difficulty: Difficulty::Hard,
            language: Language::PtBr,
        };
        let err = generate_single_card(&generator, request, &clock).await.unwrap_err();
        assert_eq!(err, GenerationError::Unparseable);
        assert_eq!(err.to_string(), PARSE_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn test_single_and_batch_ids_differ_in_same_millisecond() {
        let generator = Scripted::new(vec![Ok(r#"["a", "b"]"#), Ok(r#"["c", "d"]"#)]);
        let clock = ManualClock::new(77);
        let request = GenerationRequest {
            category: Category::Object,
            difficulty: Difficulty::Easy,
            language: Language::PtBr,
        };
        let single = generate_single_card(&generator, request, &clock).await.unwrap();
        let batch = generate_cards(&generator, &options(2), &clock, Duration::ZERO).await;

        assert!(batch.cards.iter().all(|c| c.id != single.id));
        assert!(single.is_generated());
    }

    #[tokio::test]
    async fn test_single_card_empty_array() {
        let generator = Scripted::new(vec![Ok("[]")]);
        let clock = ManualClock::new(0);
        let request = GenerationRequest {
            category: Category::Thing,
            difficulty: Difficulty::Hard,
            language: Language::PtBr,
        };
        let err = generate_single_card(&generator, request, &clock).await.unwrap_err();
        assert_eq!(err, GenerationError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_validate_api_key() {
        assert!(validate_api_key(&Scripted::new(vec![Ok("hi")])).await);
        let bad = Scripted::new(vec![Err(GenerationError::Status {
            status: 400,
            message: "API key not valid".into(),
        })]);
        assert!(!validate_api_key(&bad).await);
    }
}
