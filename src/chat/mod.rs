//! Rule-based chat engine.
//!
//! A message runs through an ordered rule table; the first rule whose
//! predicate holds produces the reply. All state a rule may look at lives in
//! [`Turn`], built fresh for every request from the message and the history
//! the client replays.

pub mod budget;
pub mod filter;
pub mod intent;
pub mod matcher;
pub mod responses;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalog::{self, BusinessProfile, Sector};
use crate::generator::TextGenerator;
use budget::{BudgetRange, ParsedBudget};
use intent::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), timestamp: None }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), timestamp: None }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
    #[serde(default)]
    pub budget: Option<BudgetRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ml_enhanced: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_powered: Option<bool>,
}

impl ChatReply {
    fn canned(response: String) -> Self {
        Self {
            response,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ml_enhanced: None,
            ai_powered: None,
        }
    }

    fn generated(response: String) -> Self {
        Self { ml_enhanced: Some(true), ..Self::canned(response) }
    }
}

/// Everything the rules know about one incoming message.
struct Turn<'a> {
    message: &'a str,
    lower: String,
    history: &'a [ChatTurn],
    business: Option<&'static BusinessProfile>,
    sector: Option<Sector>,
    parsed_budget: Option<ParsedBudget>,
    budget: Option<BudgetRange>,
}

impl<'a> Turn<'a> {
    fn new(message: &'a str, history: &'a [ChatTurn], requested: Option<BudgetRange>) -> Self {
        let lower = message.trim().to_lowercase();
        let business = matcher::match_business(&lower);
        let sector = if business.is_none() { matcher::match_sector(&lower) } else { None };
        let parsed_budget = budget::parse(&lower);
        let budget = budget::resolve(parsed_budget, requested, history);
        Self { message, lower, history, business, sector, parsed_budget, budget }
    }
}

static PLAN_REQUEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(generate|export|create)\b.*\bbusiness plan\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Irrelevant,
    PlanRequest,
    SpecificBusiness,
    SectorWithoutBudget,
    SectorWithBudget,
    BudgetOnly,
    Intent,
}

struct Rule {
    name: &'static str,
    applies: fn(&Turn) -> bool,
    route: Route,
}

/// Evaluated top to bottom; order is priority.
static RULES: &[Rule] = &[
    Rule { name: "irrelevant", applies: |t| filter::is_irrelevant(t.message), route: Route::Irrelevant },
    Rule { name: "plan_request", applies: |t| PLAN_REQUEST.is_match(&t.lower), route: Route::PlanRequest },
    Rule { name: "specific_business", applies: |t| t.business.is_some(), route: Route::SpecificBusiness },
    Rule {
        name: "sector_without_budget",
        applies: |t| t.sector.is_some() && t.budget.is_none(),
        route: Route::SectorWithoutBudget,
    },
    Rule {
        name: "sector_with_budget",
        applies: |t| t.sector.is_some() && t.budget.is_some(),
        route: Route::SectorWithBudget,
    },
    Rule { name: "budget_only", applies: |t| t.parsed_budget.is_some(), route: Route::BudgetOnly },
    Rule { name: "intent", applies: |_| true, route: Route::Intent },
];

/// Category prompts tried for a bare budget, in order.
const BUDGET_CATEGORIES: &[&str] = &["retail", "coffee", "tourism", "general"];

pub struct ChatEngine {
    generator: Arc<dyn TextGenerator>,
}

impl ChatEngine {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    async fn ask(&self, prompt: &str) -> Option<String> {
        match self.generator.generate(prompt).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::debug!("generator fell through: {}", e);
                None
            }
        }
    }

    pub async fn respond(&self, message: &str, history: &[ChatTurn], budget: Option<BudgetRange>) -> ChatReply {
        let turn = Turn::new(message, history, budget);
        let rule = RULES.iter().find(|rule| (rule.applies)(&turn));
        let route = rule.map_or(Route::Intent, |rule| rule.route);
        log::debug!("chat rule: {}", rule.map_or("intent", |rule| rule.name));

        match route {
            Route::Irrelevant => ChatReply::canned(responses::REDIRECT.to_string()),
            Route::PlanRequest => ChatReply::canned(responses::PLAN_REQUEST.to_string()),
            Route::SpecificBusiness => match turn.business {
                Some(business) => self.business_reply(business).await,
                None => self.intent_reply(&turn).await,
            },
            Route::SectorWithoutBudget | Route::SectorWithBudget => match (turn.sector, turn.budget) {
                (Some(sector), Some(budget)) => {
                    ChatReply::canned(responses::sector_opportunities(sector, &budget))
                }
                (Some(sector), None) => ChatReply::canned(responses::ask_budget(sector)),
                _ => self.intent_reply(&turn).await,
            },
            Route::BudgetOnly => match turn.parsed_budget {
                Some(ParsedBudget::Range(range)) => self.budget_reply(&range).await,
                _ => ChatReply::canned(responses::CUSTOM_BUDGET.to_string()),
            },
            Route::Intent => self.intent_reply(&turn).await,
        }
    }

    async fn business_reply(&self, business: &BusinessProfile) -> ChatReply {
        let prompt = format!("Describe a {} business in Musanze, Rwanda", business.name);
        match self.ask(&prompt).await {
            Some(text) => ChatReply::generated(responses::business_block(business, Some(&text))),
            None => ChatReply::canned(responses::business_block(business, None)),
        }
    }

    async fn budget_reply(&self, range: &BudgetRange) -> ChatReply {
        for category in BUDGET_CATEGORIES {
            let prompt = format!(
                "{} business opportunities in Musanze for a budget of {}",
                category,
                range.describe()
            );
            if let Some(text) = self.ask(&prompt).await {
                return ChatReply::generated(text);
            }
        }
        ChatReply::canned(responses::budget_opportunities(range))
    }

    async fn intent_reply(&self, turn: &Turn<'_>) -> ChatReply {
        let intent = intent::classify(&turn.lower, turn.history);
        let prompt = format!("[{}] {}", intent.tag(), turn.message.trim());

        let mut reply = match self.ask(&prompt).await {
            Some(text) => ChatReply::generated(text),
            None => ChatReply::canned(Self::fallback(&intent)),
        };
        reply.ai_powered = Some(true);
        reply
    }

    fn fallback(intent: &Intent) -> String {
        if let Intent::Contextual(name) = intent {
            if let Some(business) = catalog::find(name) {
                return responses::follow_up(business);
            }
        }
        responses::for_intent(intent).unwrap_or_else(|| {
            responses::DEFAULT_REPLIES
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(responses::DEFAULT_REPLIES[0])
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{DisabledGenerator, GeneratorError};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    fn engine() -> ChatEngine {
        ChatEngine::new(Arc::new(DisabledGenerator))
    }

    /// Records prompts and answers only those containing `accept`.
    struct Recording {
        accept: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Recording {
        async fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
            self.prompts.lock().push(prompt.to_string());
            if prompt.contains(self.accept) {
                Ok(format!("generated for: {}", prompt))
            } else {
                Err(GeneratorError::NoResponse)
            }
        }
    }

    #[tokio::test]
    async fn coffee_processing_gets_its_business_block() {
        let reply = engine().respond("coffee processing", &[], None).await;
        assert!(reply.response.contains("33,000,000-93,000,000 RWF"));
        assert!(reply.response.contains("PowerPoint Export"));
        assert_eq!(reply.ml_enhanced, None);
    }

    #[tokio::test]
    async fn every_business_name_beats_sector_answers() {
        for business in catalog::BUSINESSES {
            let reply = engine().respond(&business.name.to_uppercase(), &[], None).await;
            let header = format!("{} Business in Musanze", business.name);
            assert!(reply.response.contains(&header), "{}", business.name);
        }
    }

    #[tokio::test]
    async fn hello_is_a_greeting() {
        let reply = engine().respond("hello", &[], None).await;
        assert!(reply.response.starts_with("Hello! I'm InnoStart AI"));
        assert_eq!(reply.ai_powered, Some(true));
    }

    #[tokio::test]
    async fn irrelevant_messages_never_reach_the_matchers() {
        let gen = Arc::new(Recording { accept: "", prompts: Mutex::new(Vec::new()) });
        let engine = ChatEngine::new(gen.clone());
        for text in ["hi", "12345", "what's the weather forecast"] {
            let reply = engine.respond(text, &[], None).await;
            assert_eq!(reply.response, responses::REDIRECT);
        }
        assert!(gen.prompts.lock().is_empty());
    }

    #[tokio::test]
    async fn plan_requests_win_over_business_names() {
        let reply = engine().respond("please generate a business plan for my guesthouse", &[], None).await;
        assert_eq!(reply.response, responses::PLAN_REQUEST);
    }

    #[tokio::test]
    async fn sector_asks_for_budget_then_filters_by_it() {
        let first = engine().respond("show me agriculture opportunities", &[], None).await;
        assert!(first.response.contains("What's your budget range?"));

        let history = vec![
            ChatTurn::user("I can invest 10M - 30M"),
            ChatTurn::assistant(first.response.clone()),
        ];
        let second = engine().respond("show me agriculture opportunities", &history, None).await;
        assert!(second.response.contains("Organic Farming"));
        assert!(!second.response.contains("Coffee Processing"));
    }

    #[tokio::test]
    async fn budget_is_scoped_to_the_request() {
        let engine = engine();
        let with_field = engine
            .respond("tourism please", &[], Some(BudgetRange::new(0, 5_000_000)))
            .await;
        assert!(with_field.response.contains("Mountain Hiking Tours"));

        // A later request without a budget starts from nothing.
        let without = engine.respond("tourism please", &[], None).await;
        assert!(without.response.contains("What's your budget range?"));
    }

    #[tokio::test]
    async fn bare_budgets_try_category_prompts_in_order() {
        let gen = Arc::new(Recording { accept: "tourism", prompts: Mutex::new(Vec::new()) });
        let reply = ChatEngine::new(gen.clone()).respond("1,000,000 - 3,000,000 RWF", &[], None).await;

        assert_eq!(reply.ml_enhanced, Some(true));
        let prompts = gen.prompts.lock();
        let order: Vec<_> = prompts.iter().map(|p| p.split(' ').next().unwrap_or("")).collect();
        assert_eq!(order, ["retail", "coffee", "tourism"]);
    }

    #[tokio::test]
    async fn bare_budget_without_generator_lists_affordable_businesses() {
        let reply = engine().respond("1,000,000 - 3,000,000 RWF", &[], None).await;
        assert!(reply.response.contains("Local Transport"));
        assert!(!reply.response.contains("Eco-lodges"));

        let custom = engine().respond("write any amount", &[], None).await;
        assert_eq!(custom.response, responses::CUSTOM_BUDGET);
    }

    #[tokio::test]
    async fn generator_text_is_flagged() {
        let gen = Arc::new(Recording { accept: "[greeting]", prompts: Mutex::new(Vec::new()) });
        let reply = ChatEngine::new(gen).respond("hey there", &[], None).await;
        assert_eq!(reply.ml_enhanced, Some(true));
        assert_eq!(reply.ai_powered, Some(true));
        assert!(reply.response.contains("generated for: [greeting] hey there"));
    }

    #[tokio::test]
    async fn follow_ups_refer_back_to_the_last_business() {
        let history = vec![
            ChatTurn::user("guesthouse"),
            ChatTurn::assistant("**Guesthouse Business in Musanze**"),
        ];
        let reply = engine().respond("what about the break-even?", &history, None).await;
        assert!(reply.response.contains("Sticking with **Guesthouse**"));
    }

    #[tokio::test]
    async fn follow_ups_after_full_replies_keep_the_business() {
        for name in ["Coffee Processing", "Eco-lodges", "Local Restaurant", "Guesthouse"] {
            let first = engine().respond(&name.to_lowercase(), &[], None).await;
            let history = vec![ChatTurn::user(name.to_lowercase()), ChatTurn::assistant(first.response)];
            let reply = engine().respond("what about the break-even?", &history, None).await;
            assert!(reply.response.contains(&format!("Sticking with **{}**", name)), "{}", reply.response);
        }
    }

    #[tokio::test]
    async fn bed_and_breakfast_reaches_the_guesthouse() {
        let reply = engine().respond("bed and breakfast near kinigi", &[], None).await;
        assert!(reply.response.contains("Guesthouse Business in Musanze"), "{}", reply.response);
    }

    #[test]
    fn reply_omits_absent_flags() {
        let json = serde_json::to_value(ChatReply::canned("x".into())).unwrap();
        assert!(json.get("ml_enhanced").is_none());
        assert!(json.get("ai_powered").is_none());
        assert_eq!(json["timestamp"].as_str().unwrap().len(), 19);
    }
}
