//! Snake trivia shown on the game-over screen.
//!
//! A remote text-generation model is asked for a fact when a session ends.
//! The request never blocks the game: providers deliver results later,
//! tagged with the session generation that asked, and the game drops any
//! answer that arrives after a restart.

use crate::config::FunFactConfig;
use crate::error::{Error, Result};
use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;

pub const NO_KEY_FALLBACK: &str =
    "No API key is configured, so no fun fact today. Snakes are still cool!";
pub const EMPTY_FALLBACK: &str = "Could not get a fun fact: the model returned an empty answer.";
pub const FAILED_FALLBACK: &str =
    "Could not get a fun fact. Maybe snakes are too mysterious even for AI!";

/// Shown while the remote answer is pending.
pub const LOCAL_FACTS: &[&str] = &[
    "Snakes in the wild can go several months without eating!",
    "Some snakes can swim and even dive under water.",
    "Snakes smell with their tongues!",
    "The largest snakes can reach 10 meters in length.",
    "Snakes shed their skin several times a year.",
    "Snakes have no eyelids, so they sleep with their eyes open!",
    "Snakes can feel vibrations through the ground.",
    "Some snakes can change the color of their skin.",
];

pub fn local_fact<R: Rng>(rng: &mut R) -> &'static str {
    LOCAL_FACTS.choose(rng).copied().unwrap_or(FAILED_FALLBACK)
}

/// A fact produced for a given session generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunFact {
    pub generation: u64,
    pub text: String,
}

/// Source of fun facts. `request` returns immediately; answers are
/// collected with `poll` from the game loop.
pub trait FunFactProvider {
    fn request(&mut self, generation: u64);
    fn poll(&mut self) -> Option<FunFact>;
}

/// Answers every request with the same text.
#[derive(Debug, Clone)]
pub struct FixedProvider {
    text: String,
    ready: Vec<FunFact>,
}

impl FixedProvider {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ready: Vec::new(),
        }
    }
}

impl FunFactProvider for FixedProvider {
    fn request(&mut self, generation: u64) {
        self.ready.push(FunFact {
            generation,
            text: self.text.clone(),
        });
    }

    fn poll(&mut self) -> Option<FunFact> {
        if self.ready.is_empty() {
            None
        } else {
            Some(self.ready.remove(0))
        }
    }
}

/// Builds the remote provider with `remote` when `api_key` is non-blank.
/// Without a key every request is answered with [`NO_KEY_FALLBACK`].
pub fn provider_for_key<F>(api_key: Option<String>, remote: F) -> Box<dyn FunFactProvider>
where
    F: FnOnce(String) -> Box<dyn FunFactProvider>,
{
    match api_key.filter(|key| !key.trim().is_empty()) {
        Some(key) => remote(key),
        None => {
            warn!("no API key given; fun facts are disabled");
            Box::new(FixedProvider::new(NO_KEY_FALLBACK))
        }
    }
}

pub fn request_url(config: &FunFactConfig, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        config.endpoint.trim_end_matches('/'),
        config.model,
        api_key
    )
}

pub fn request_body(config: &FunFactConfig) -> serde_json::Value {
    json!({
        "contents": [
            { "parts": [ { "text": config.prompt } ] }
        ]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extracts the first candidate's text. `Ok(None)` means the model
/// answered but said nothing.
pub fn parse_response(body: &str) -> Result<Option<String>> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|source| Error::Parse {
        what: "generateContent response",
        source,
    })?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim();
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text.to_string()))
    }
}

/// Turns a fetch result into display text, substituting the fallbacks.
pub fn resolve(result: Result<Option<String>>) -> String {
    match result {
        Ok(Some(text)) => text,
        Ok(None) => EMPTY_FALLBACK.to_string(),
        Err(e) => {
            warn!("fun fact request failed: {}", e);
            FAILED_FALLBACK.to_string()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ThreadedProvider;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread;
    use std::time::Duration;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Runs each request on its own thread with a blocking HTTP client.
    pub struct ThreadedProvider {
        config: FunFactConfig,
        api_key: String,
        tx: Sender<FunFact>,
        rx: Receiver<FunFact>,
    }

    impl ThreadedProvider {
        pub fn new(config: FunFactConfig, api_key: String) -> Self {
            let (tx, rx) = mpsc::channel();
            Self {
                config,
                api_key,
                tx,
                rx,
            }
        }

        /// Reads `GEMINI_API_KEY`, falling back to `API_KEY`.
        pub fn from_env(config: FunFactConfig) -> Box<dyn FunFactProvider> {
            let key = std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("API_KEY"))
                .ok();
            provider_for_key(key, |key| {
                Box::new(ThreadedProvider::new(config, key))
            })
        }
    }

    fn fetch(config: &FunFactConfig, api_key: &str) -> Result<Option<String>> {
        let response = ureq::post(&request_url(config, api_key))
            .timeout(REQUEST_TIMEOUT)
            .set("Content-Type", "application/json")
            .send_json(request_body(config))
            .map_err(|e| Error::Http(e.to_string()))?;
        let body = response.into_string()?;
        parse_response(&body)
    }

    impl FunFactProvider for ThreadedProvider {
        fn request(&mut self, generation: u64) {
            let api_key = self.api_key.clone();
            let config = self.config.clone();
            let tx = self.tx.clone();
            thread::spawn(move || {
                let text = resolve(fetch(&config, &api_key));
                // The receiver is gone only when the game has shut down.
                let _ = tx.send(FunFact { generation, text });
            });
        }

        fn poll(&mut self) -> Option<FunFact> {
            self.rx.try_recv().ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn url_includes_model_and_key() {
        let config = FunFactConfig {
            endpoint: "https://example.test/v1/".to_string(),
            model: "tiny".to_string(),
            prompt: "p".to_string(),
        };
        assert_eq!(
            request_url(&config, "abc"),
            "https://example.test/v1/models/tiny:generateContent?key=abc"
        );
    }

    #[test]
    fn body_carries_prompt() {
        let config = FunFactConfig::default();
        let body = request_body(&config);
        assert_eq!(
            body["contents"][0]["parts"][0]["text"].as_str(),
            Some(config.prompt.as_str())
        );
    }

    #[test]
    fn parses_candidate_text() {
        let body = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "Snakes " }, { "text": "can't blink." } ], "role": "model" } }
            ]
        }"#;
        assert_eq!(
            parse_response(body).unwrap().as_deref(),
            Some("Snakes can't blink.")
        );
    }

    #[test]
    fn empty_answer_is_none() {
        assert_eq!(parse_response(r#"{ "candidates": [] }"#).unwrap(), None);
        assert_eq!(parse_response("{}").unwrap(), None);
        let blank = r#"{ "candidates": [ { "content": { "parts": [ { "text": "  " } ] } } ] }"#;
        assert_eq!(parse_response(blank).unwrap(), None);
    }

    #[test]
    fn malformed_answer_is_error() {
        assert!(parse_response("<html>").is_err());
    }

    #[test]
    fn resolve_substitutes_fallbacks() {
        assert_eq!(resolve(Ok(Some("fact".to_string()))), "fact");
        assert_eq!(resolve(Ok(None)), EMPTY_FALLBACK);
        assert_eq!(
            resolve(Err(Error::Http("timeout".to_string()))),
            FAILED_FALLBACK
        );
    }

    #[test]
    fn local_fact_comes_from_list() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            assert!(LOCAL_FACTS.contains(&local_fact(&mut rng)));
        }
    }

    #[test]
    fn fixed_provider_tags_generation() {
        let mut provider = FixedProvider::new("hi");
        assert_eq!(provider.poll(), None);
        provider.request(4);
        assert_eq!(
            provider.poll(),
            Some(FunFact {
                generation: 4,
                text: "hi".to_string()
            })
        );
        assert_eq!(provider.poll(), None);
    }

    #[test]
    fn blank_key_answers_with_fallback() {
        for key in [None, Some(String::new()), Some("  ".to_string())] {
            let mut provider = provider_for_key(key, |_| panic!("remote provider built"));
            provider.request(9);
            let fact = provider.poll().unwrap();
            assert_eq!(fact.generation, 9);
            assert_eq!(fact.text, NO_KEY_FALLBACK);
        }
    }

    #[test]
    fn usable_key_builds_remote_provider() {
        let mut provider = provider_for_key(Some("secret".to_string()), |key| {
            assert_eq!(key, "secret");
            Box::new(FixedProvider::new("remote"))
        });
        provider.request(1);
        assert_eq!(provider.poll().unwrap().text, "remote");
    }
}
