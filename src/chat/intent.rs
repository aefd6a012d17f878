use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::matcher;
use super::{ChatTurn, Role};
use crate::catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Musanze,
    Kigali,
    Anywhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Funding,
    MarketResearch,
    Marketing,
    Financial,
    Legal,
    Team,
    Technology,
    Ideas(Location),
}

impl Topic {
    pub fn tag(&self) -> &'static str {
        match self {
            Topic::Funding => "funding",
            Topic::MarketResearch => "market_research",
            Topic::Marketing => "marketing",
            Topic::Financial => "financial",
            Topic::Legal => "legal",
            Topic::Team => "team",
            Topic::Technology => "technology",
            Topic::Ideas(_) => "ideas",
        }
    }
}

// The output of the classifier, telling the composer what it found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Help,
    Planning,
    Export,
    Topic(Topic),
    /// Follow-up question; carries the business last discussed.
    Contextual(&'static str),
    Default,
}

impl Intent {
    pub fn tag(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Planning => "planning",
            Intent::Export => "export_request",
            Intent::Topic(topic) => topic.tag(),
            Intent::Contextual(_) => "follow_up",
            Intent::Default => "general_inquiry",
        }
    }
}

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "muraho", "greetings", "hallo"];
const GREETING_PHRASES: &[&str] = &["good morning", "good afternoon", "good evening"];

/// Ordered topic table, first hit wins.
const TOPICS: &[(Topic, &[&str])] = &[
    (Topic::Funding, &["funding", "investor", "loan", "money"]),
    (Topic::MarketResearch, &["market research", "competitor", "competition"]),
    (Topic::Marketing, &["marketing", "advertis", "promotion"]),
    (Topic::Financial, &["financial", "budget", "cash flow", "break-even", "break even"]),
    (Topic::Legal, &["legal", "registration", "license", "licence", "permit", "rdb"]),
    (Topic::Team, &["team", "hiring", "employee", "staff"]),
    (Topic::Technology, &["technology", "tech", "software", "website", "mobile app"]),
];

fn is_follow_up(lower: &str) -> bool {
    lower.starts_with("and ") || lower.starts_with("what about") || lower.starts_with("how about")
}

/// Headings the assistant puts on business replies: the profile block and
/// the follow-up answer.
static REPLY_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^*\n]+?) Business in Musanze\*\*|Sticking with \*\*([^*\n]+)\*\*").unwrap()
});

fn business_in_turn(turn: &ChatTurn) -> Option<&'static str> {
    let business = match turn.role {
        // Assistant replies mention other businesses in passing, so only the
        // heading counts.
        Role::Assistant => REPLY_HEADING
            .captures(&turn.content)
            .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
            .and_then(|name| catalog::find(name.as_str())),
        _ => matcher::match_business(&turn.content.to_lowercase()),
    };
    business.map(|business| business.name)
}

/// The most recent business named anywhere in the conversation.
fn last_business(history: &[ChatTurn]) -> Option<&'static str> {
    history.iter().rev().find_map(business_in_turn)
}

/// Classifies a message that no business, sector or budget rule claimed.
pub fn classify(lower: &str, history: &[ChatTurn]) -> Intent {
    // Rule 1: follow-ups only make sense once the assistant has answered.
    if is_follow_up(lower) && history.iter().any(|t| t.role == Role::Assistant) {
        if let Some(name) = last_business(history) {
            return Intent::Contextual(name);
        }
    }

    let tokens: HashSet<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if GREETING_WORDS.iter().any(|w| tokens.contains(w))
        || GREETING_PHRASES.iter().any(|p| lower.contains(p))
    {
        return Intent::Greeting;
    }
    if tokens.contains("help") {
        return Intent::Help;
    }
    if ["plan", "planning", "strategy"].iter().any(|w| tokens.contains(w)) {
        return Intent::Planning;
    }
    if ["export", "download", "pdf"].iter().any(|w| tokens.contains(w)) {
        return Intent::Export;
    }
    if let Some((topic, _)) = TOPICS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
    {
        return Intent::Topic(*topic);
    }
    if lower.contains("idea") {
        let location = if lower.contains("musanze") {
            Location::Musanze
        } else if lower.contains("kigali") {
            Location::Kigali
        } else {
            Location::Anywhere
        };
        return Intent::Topic(Topic::Ideas(location));
    }

    Intent::Default
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::responses;

    #[test]
    fn greetings_are_whole_words() {
        assert_eq!(classify("hello", &[]), Intent::Greeting);
        assert_eq!(classify("muraho!", &[]), Intent::Greeting);
        assert_eq!(classify("good morning there", &[]), Intent::Greeting);
        // "hi" inside "this" is not a greeting
        assert_ne!(classify("this is odd", &[]), Intent::Greeting);
    }

    #[test]
    fn keyword_intents() {
        assert_eq!(classify("can you help me", &[]), Intent::Help);
        assert_eq!(classify("i need a plan", &[]), Intent::Planning);
        assert_eq!(classify("download as pdf", &[]), Intent::Export);
        assert_eq!(classify("where do i find investors", &[]), Intent::Topic(Topic::Funding));
        assert_eq!(classify("how do i get a trading license", &[]), Intent::Topic(Topic::Legal));
        assert_eq!(
            classify("give me ideas for musanze", &[]),
            Intent::Topic(Topic::Ideas(Location::Musanze))
        );
        assert_eq!(classify("something vague", &[]), Intent::Default);
    }

    #[test]
    fn follow_ups_need_an_earlier_answer_about_a_business() {
        let history = vec![
            ChatTurn::user("tell me about guesthouse"),
            ChatTurn::assistant("**Guesthouse Business in Musanze** ..."),
        ];
        assert_eq!(classify("what about the costs?", &history), Intent::Contextual("Guesthouse"));
        assert_eq!(classify("what about the costs?", &history[..1]), Intent::Default);
        assert_eq!(classify("what about the costs?", &[]), Intent::Default);
    }

    #[test]
    fn follow_ups_read_the_heading_of_real_replies() {
        for business in catalog::BUSINESSES {
            let history = vec![
                ChatTurn::user(format!("tell me about {}", business.name.to_lowercase())),
                ChatTurn::assistant(responses::business_block(business, None)),
            ];
            assert_eq!(
                classify("what about the break-even?", &history),
                Intent::Contextual(business.name),
                "after the {} block",
                business.name
            );

            // the follow-up answer itself keeps the thread going
            let chained = vec![ChatTurn::user("what about the costs?"), ChatTurn::assistant(responses::follow_up(business))];
            assert_eq!(classify("and the roi?", &chained), Intent::Contextual(business.name));
        }
    }

    #[test]
    fn user_turns_still_name_the_business_without_a_heading() {
        let history = vec![
            ChatTurn::user("i am thinking about a coffee business"),
            ChatTurn::assistant("Happy to help with that."),
        ];
        assert_eq!(classify("how about marketing?", &history), Intent::Contextual("Coffee Processing"));
    }
}
