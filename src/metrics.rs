//! Response metrics derivation and per-turn model comparison.

use std::time::Duration;

use crate::models::{Message, ResponseMetrics};
use crate::registry;

/// Rough token-per-word ratio used when the backend reports only words.
const TOKENS_PER_WORD: f64 = 1.3;

impl ResponseMetrics {
    /// Derives metrics from the observed latency and response text.
    pub fn measure(elapsed: Duration, content: &str) -> Self {
        let response_time_ms = elapsed.as_millis() as u64;
        let word_count = content.split_whitespace().count() as u32;
        Self::new(response_time_ms, word_count)
    }

    pub fn new(response_time_ms: u64, word_count: u32) -> Self {
        let tokens_per_second = if response_time_ms > 0 {
            (word_count as f64 * TOKENS_PER_WORD) / (response_time_ms as f64 / 1000.0)
        } else {
            0.0
        };
        Self { response_time_ms, word_count, tokens_per_second }
    }

    pub fn response_secs(&self) -> f64 {
        self.response_time_ms as f64 / 1000.0
    }
}

/// One row of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub model_id: String,
    pub display_name: String,
    pub response_secs: f64,
    pub word_count: u32,
    pub tokens_per_second: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnComparison {
    pub entries: Vec<ComparisonEntry>,
}

impl TurnComparison {
    /// Compares the model responses that followed the most recent user
    /// message. Returns `None` unless at least two responses carry metrics.
    pub fn latest(messages: &[Message]) -> Option<Self> {
        let last_user = messages.iter().rposition(|m| m.is_user())?;
        let entries: Vec<ComparisonEntry> = messages[last_user + 1..]
            .iter()
            .filter_map(|m| {
                let model_id = m.author.model_id()?;
                let metrics = m.metrics?;
                Some(ComparisonEntry {
                    model_id: model_id.to_string(),
                    display_name: registry::display_name(model_id).to_string(),
                    response_secs: metrics.response_secs(),
                    word_count: metrics.word_count,
                    tokens_per_second: metrics.tokens_per_second,
                })
            })
            .collect();

        (entries.len() >= 2).then_some(Self { entries })
    }

    pub fn fastest(&self) -> Option<&ComparisonEntry> {
        self.entries
            .iter()
            .min_by(|a, b| a.response_secs.total_cmp(&b.response_secs))
    }

    pub fn most_detailed(&self) -> Option<&ComparisonEntry> {
        self.entries.iter().max_by_key(|e| e.word_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_counts_words_and_rate() {
        let m = ResponseMetrics::measure(Duration::from_millis(2000), "one two  three\nfour");
        assert_eq!(m.word_count, 4);
        assert_eq!(m.response_time_ms, 2000);
        assert!((m.tokens_per_second - 2.6).abs() < 1e-9);
    }

    #[test]
    fn zero_latency_yields_zero_rate() {
        let m = ResponseMetrics::new(0, 12);
        assert_eq!(m.tokens_per_second, 0.0);
    }

    fn reply(model: &str, ms: u64, words: u32) -> Message {
        Message::from_model("c1", model, "x", ResponseMetrics::new(ms, words))
    }

    #[test]
    fn comparison_only_covers_latest_turn() {
        let messages = vec![
            Message::user("c1", "first"),
            reply("gpt5", 100, 5),
            reply("grok", 100, 5),
            Message::user("c1", "second"),
            reply("gpt5", 400, 50),
            reply("grok", 900, 80),
        ];
        let cmp = TurnComparison::latest(&messages).unwrap();
        assert_eq!(cmp.entries.len(), 2);
        assert_eq!(cmp.fastest().unwrap().model_id, "gpt5");
        assert_eq!(cmp.most_detailed().unwrap().model_id, "grok");
        assert_eq!(cmp.entries[0].display_name, "GPT-5 Chat");
    }

    #[test]
    fn single_response_is_not_a_comparison() {
        let messages = vec![Message::user("c1", "q"), reply("gpt5", 400, 50)];
        assert!(TurnComparison::latest(&messages).is_none());
        assert!(TurnComparison::latest(&[]).is_none());
    }
}
