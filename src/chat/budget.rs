use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use super::{ChatTurn, Role};

/// A startup budget in RWF. `max == None` means open-ended ("50M+").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: u64,
    #[serde(default)]
    pub max: Option<u64>,
}

impl BudgetRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max: Some(max) }
    }

    pub fn open(min: u64) -> Self {
        Self { min, max: None }
    }

    /// Whether a business whose cheapest start costs `cost` fits this budget.
    pub fn covers(&self, cost: u64) -> bool {
        self.max.map_or(true, |max| cost <= max)
    }

    pub fn describe(&self) -> String {
        match self.max {
            Some(max) if self.min == 0 => format!("up to {} RWF", format_rwf(max)),
            Some(max) => format!("{} - {} RWF", format_rwf(self.min), format_rwf(max)),
            None => format!("{}+ RWF", format_rwf(self.min)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedBudget {
    Range(BudgetRange),
    /// "write any" / "custom": the user still has to name an amount.
    Custom,
}

static RWF_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d[\d,]*)\s*(?:-|–|to)\s*(\d[\d,]*)\s*rwf").unwrap());
static MILLION_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:million|m)?\s*(?:-|–|to)\s*(\d+(?:\.\d+)?)\s*(?:million|m)\b")
        .unwrap()
});
static MILLION_PLUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:million|m)\s*\+").unwrap());
static RWF_PLUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d[\d,]*)\s*\+\s*rwf").unwrap());
static RWF_SINGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d[\d,]*)\s*rwf").unwrap());
static MILLION_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*(?:million|m)\b").unwrap());
static CUSTOM: Lazy<Regex> = Lazy::new(|| Regex::new(r"write any|custom|any amount").unwrap());

type Extract = fn(&Captures) -> Option<BudgetRange>;

/// Tried in order, first hit wins.
static PATTERNS: Lazy<[(&'static Regex, Extract); 6]> = Lazy::new(|| {
    [
        (&*RWF_RANGE, |c| Some(BudgetRange::new(digits(&c[1])?, digits(&c[2])?))),
        (&*MILLION_RANGE, |c| {
            Some(BudgetRange::new(millions(&c[1])?, millions(&c[2])?))
        }),
        (&*MILLION_PLUS, |c| Some(BudgetRange::open(millions(&c[1])?))),
        (&*RWF_PLUS, |c| Some(BudgetRange::open(digits(&c[1])?))),
        (&*RWF_SINGLE, |c| Some(BudgetRange::new(0, digits(&c[1])?))),
        (&*MILLION_SINGLE, |c| Some(BudgetRange::new(0, millions(&c[1])?))),
    ]
});

fn digits(raw: &str) -> Option<u64> {
    raw.replace(',', "").parse().ok()
}

fn millions(raw: &str) -> Option<u64> {
    let value: f64 = raw.parse().ok()?;
    let amount = (value * 1_000_000.0).round();
    // `as` would saturate silently
    (amount < u64::MAX as f64).then_some(amount as u64)
}

/// Extracts a budget from free text, or `None` when the text is not budget-shaped.
pub fn parse(text: &str) -> Option<ParsedBudget> {
    let lower = text.to_lowercase();
    for (pattern, extract) in PATTERNS.iter() {
        // An amount too large to hold is no budget at all, not a cue to try a looser pattern.
        if let Some(captures) = pattern.captures(&lower) {
            return extract(&captures).map(ParsedBudget::Range);
        }
    }
    CUSTOM.is_match(&lower).then_some(ParsedBudget::Custom)
}

/// The budget in force for one request: the current message first, then the
/// explicit request field, then the latest user turn in the history.
pub fn resolve(
    message: Option<ParsedBudget>,
    requested: Option<BudgetRange>,
    history: &[ChatTurn],
) -> Option<BudgetRange> {
    if let Some(ParsedBudget::Range(range)) = message {
        return Some(range);
    }
    requested.or_else(|| {
        history
            .iter()
            .rev()
            .filter(|turn| turn.role == Role::User)
            .find_map(|turn| match parse(&turn.content) {
                Some(ParsedBudget::Range(range)) => Some(range),
                _ => None,
            })
    })
}

pub fn format_rwf(amount: u64) -> String {
    let raw = amount.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
