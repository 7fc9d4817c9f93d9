//! Local prompt-strength heuristic shown while the user types.

const KEYWORDS: &[&str] = &[
    "how", "why", "what", "explain", "compare", "analyze", "debug", "code", "example",
];

/// Minimum prompt length accepted by the remote optimizer.
pub const MIN_OPTIMIZE_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strength {
    Weak,
    Fair,
    Strong,
}

impl Strength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=3 => Strength::Weak,
            4..=6 => Strength::Fair,
            _ => Strength::Strong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::Weak => "weak",
            Strength::Fair => "fair",
            Strength::Strong => "strong",
        }
    }
}

/// Scores a prompt from 0 to 10. Blank prompts score 0.
pub fn score(text: &str) -> u8 {
    if text.trim().is_empty() {
        return 0;
    }
    let length = text.chars().count() as f64;
    let mut score = (length / 30.0 + 1.0).min(10.0);

    let lower = text.to_lowercase();
    score += 0.5 * KEYWORDS.iter().filter(|k| lower.contains(*k)).count() as f64;
    if text.contains('?') {
        score += 1.0;
    }
    if text.split_whitespace().count() > 15 {
        score += 2.0;
    }
    score.floor().min(10.0) as u8
}
