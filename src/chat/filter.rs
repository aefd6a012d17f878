//! Screens out messages that have nothing to do with starting a business.

use once_cell::sync::Lazy;
use regex::Regex;

static DEGENERATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\s\-\+\(\)]+$").unwrap());

/// Off-topic themes: relationships, entertainment, weather, eating, holidays,
/// health, politics, religion, school and gadgets.
const OFF_TOPIC: &[&str] = &[
    "girlfriend", "boyfriend", "dating", "marriage", "love life", "crush",
    "movie", "movies", "music", "song", "songs", "football", "soccer", "celebrity", "netflix", "game tonight",
    "weather", "forecast", "temperature", "sunny",
    "recipe", "hungry", "dinner", "lunch", "breakfast", "food",
    "vacation", "holiday", "flight", "flights",
    "doctor", "medicine", "sick", "headache", "hospital",
    "election", "politics", "president",
    "religion", "church", "prayer", "mosque",
    "homework", "exam", "exams", "essay",
    "iphone", "smartphone", "laptop", "playstation",
];

/// Any of these keeps an otherwise off-topic message in scope.
const BUSINESS_CONTEXT: &[&str] = &[
    "business", "businesses", "start", "starting", "invest", "investment", "profit", "revenue",
    "market", "sell", "selling", "customer", "customers", "budget", "rwf", "plan", "startup",
    "entrepreneur", "processing", "restaurant", "cafe", "hotel", "tourism", "coffee", "farm",
    "farming", "shop", "income", "money", "cost", "costs", "export", "loan", "company",
    "guesthouse", "guest house", "bed and breakfast", "lodge", "hiking", "trekking", "souvenir",
];

/// Pads the message's words with spaces so terms match on word boundaries.
fn words(message: &str) -> String {
    let joined = message
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!(" {} ", joined)
}

fn mentions(words: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| words.contains(&format!(" {} ", term)))
}

/// True when the message is degenerate, or names an off-topic theme with no
/// business signal alongside it.
pub fn is_irrelevant(message: &str) -> bool {
    let trimmed = message.trim();
    if trimmed.chars().count() < 3 || DEGENERATE.is_match(trimmed) {
        return true;
    }
    let words = words(trimmed);
    mentions(&words, OFF_TOPIC) && !mentions(&words, BUSINESS_CONTEXT)
}
