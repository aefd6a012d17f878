//! Business-idea suggestions from a location, a list of interests and a budget band.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const TOP_IDEAS: usize = 5;

struct Template {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    budget: &'static str,
    difficulty: &'static str,
}

const fn t(
    title: &'static str,
    description: &'static str,
    category: &'static str,
    budget: &'static str,
    difficulty: &'static str,
) -> Template {
    Template { title, description, category, budget, difficulty }
}

/// Location substrings and the ideas they unlock.
static LOCATION_IDEAS: &[(&[&str], &[Template])] = &[
    (
        &["city", "urban"],
        &[
            t("Urban Food Delivery Service", "Fast food delivery service for busy urban professionals, focusing on healthy and local options.", "Food & Delivery", "Medium", "Medium"),
            t("Co-working Space Management", "Manage and operate flexible co-working spaces for freelancers and remote workers.", "Real Estate", "High", "Hard"),
        ],
    ),
    (
        &["rural", "country"],
        &[
            t("Agricultural Consulting Service", "Provide consulting services to local farmers on modern farming techniques and technology.", "Agriculture", "Low", "Medium"),
            t("Rural Tourism Experience", "Create unique rural tourism experiences like farm stays, nature tours, and local crafts workshops.", "Tourism", "Medium", "Medium"),
        ],
    ),
    (
        &["coast", "beach"],
        &[t("Marine Equipment Rental", "Rent out water sports equipment, boats, and fishing gear to tourists and locals.", "Tourism", "Medium", "Medium")],
    ),
];

/// Exact interest keywords.
static INTEREST_IDEAS: &[(&[&str], &[Template])] = &[
    (
        &["technology", "tech"],
        &[
            t("Local Tech Support Service", "Provide in-home and remote tech support for individuals and small businesses.", "Technology", "Low", "Easy"),
            t("Mobile App Development Agency", "Create custom mobile applications for local businesses and startups.", "Technology", "Medium", "Hard"),
        ],
    ),
    (
        &["food", "cooking"],
        &[
            t("Home-based Catering Service", "Provide catering services for small events, parties, and corporate meetings.", "Food & Beverage", "Low", "Easy"),
            t("Cooking Classes & Workshops", "Offer cooking classes for different skill levels and dietary preferences.", "Education", "Low", "Easy"),
        ],
    ),
    (
        &["fashion", "clothing"],
        &[
            t("Online Fashion Boutique", "Curate and sell unique fashion items through an online store.", "E-commerce", "Medium", "Medium"),
            t("Personal Styling Service", "Offer personal styling and wardrobe consulting services.", "Services", "Low", "Easy"),
        ],
    ),
    (
        &["fitness", "health"],
        &[
            t("Personal Training Service", "Provide one-on-one fitness training and wellness coaching.", "Health & Fitness", "Low", "Medium"),
            t("Online Fitness Coaching", "Offer virtual fitness programs and nutrition coaching.", "Health & Fitness", "Low", "Easy"),
        ],
    ),
    (
        &["art", "creative"],
        &[
            t("Art Classes & Workshops", "Teach various art forms including painting, drawing, and crafts.", "Education", "Low", "Easy"),
            t("Custom Art Commission Service", "Create custom artwork for individuals and businesses.", "Creative Services", "Low", "Medium"),
        ],
    ),
];

/// Budget bands, matched exactly.
static BUDGET_IDEAS: &[(&str, &[Template])] = &[
    (
        "0-1000",
        &[
            t("Virtual Assistant Services", "Provide remote administrative and support services to businesses.", "Services", "Low", "Easy"),
            t("Content Writing Service", "Offer blog writing, copywriting, and content creation services.", "Services", "Low", "Easy"),
            t("Social Media Management", "Manage social media accounts for small businesses and entrepreneurs.", "Marketing", "Low", "Easy"),
        ],
    ),
    (
        "1000-5000",
        &[
            t("E-commerce Store", "Launch an online store selling curated products in a specific niche.", "E-commerce", "Medium", "Medium"),
            t("Local Service Business", "Start a service-based business like cleaning, landscaping, or home repairs.", "Services", "Medium", "Medium"),
        ],
    ),
    (
        "5000-10000",
        &[
            t("Retail Store", "Open a physical retail store in a high-traffic location.", "Retail", "High", "Hard"),
            t("Restaurant or Cafe", "Launch a small restaurant or cafe with a unique concept.", "Food & Beverage", "High", "Hard"),
        ],
    ),
    (
        "10000+",
        &[
            t("Manufacturing Business", "Start a small manufacturing operation for specialized products.", "Manufacturing", "High", "Hard"),
            t("Technology Startup", "Develop and launch a technology product or platform.", "Technology", "High", "Hard"),
        ],
    ),
];

static GENERAL_IDEAS: &[Template] = &[
    t("Local Service Business", "Start a service-based business tailored to your local community needs.", "Services", "Medium", "Medium"),
    t("Online Consulting", "Offer consulting services in your area of expertise through online platforms.", "Services", "Low", "Easy"),
    t("E-commerce Store", "Create an online store selling products in a niche you're passionate about.", "E-commerce", "Medium", "Medium"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Location,
    Interest,
    Budget,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Idea {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub budget: &'static str,
    pub difficulty: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_relevance: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_relevance: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_relevance: Option<&'static str>,
}

impl Idea {
    fn new(template: &'static Template, source: Source) -> Self {
        let high = |s| (source == s).then_some("high");
        Self {
            title: template.title,
            description: template.description,
            category: template.category,
            budget: template.budget,
            difficulty: template.difficulty,
            location_relevance: high(Source::Location),
            interest_relevance: high(Source::Interest),
            budget_relevance: high(Source::Budget),
        }
    }

    pub fn score(&self) -> u32 {
        let mut score = 1;
        if self.location_relevance.is_some() {
            score += 3;
        }
        if self.interest_relevance.is_some() {
            score += 3;
        }
        if self.budget_relevance.is_some() {
            score += 2;
        }
        score
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdeaRequest {
    pub location: String,
    /// Comma-separated.
    pub interests: String,
    pub budget: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdeaResponse {
    pub ideas: Vec<Idea>,
    pub location: String,
    pub interests: String,
    pub budget: String,
    pub timestamp: String,
}

/// Best five ideas for the request, or the general suggestions when nothing matches.
pub fn suggest(request: &IdeaRequest) -> Vec<Idea> {
    let location = request.location.to_lowercase();
    let interests: Vec<String> = request
        .interests
        .to_lowercase()
        .split(',')
        .map(|s| s.trim().to_string())
        .collect();

    let from_location = LOCATION_IDEAS
        .iter()
        .filter(|(needles, _)| needles.iter().any(|n| location.contains(n)))
        .flat_map(|&(_, ideas)| ideas.iter().map(|i| Idea::new(i, Source::Location)));
    let from_interests = interests.iter().flat_map(|interest| {
        INTEREST_IDEAS
            .iter()
            .filter(move |(keys, _)| keys.contains(&interest.as_str()))
            .flat_map(|&(_, ideas)| ideas.iter().map(|i| Idea::new(i, Source::Interest)))
    });
    let from_budget = BUDGET_IDEAS
        .iter()
        .filter(|(band, _)| *band == request.budget)
        .flat_map(|&(_, ideas)| ideas.iter().map(|i| Idea::new(i, Source::Budget)));

    let mut seen = HashSet::new();
    let mut ideas: Vec<Idea> = from_location
        .chain(from_interests)
        .chain(from_budget)
        .filter(|idea| seen.insert((idea.title, idea.description)))
        .collect();

    if ideas.is_empty() {
        return GENERAL_IDEAS.iter().map(|i| Idea::new(i, Source::General)).collect();
    }

    // stable: equal scores keep discovery order
    ideas.sort_by(|a, b| b.score().cmp(&a.score()));
    ideas.truncate(TOP_IDEAS);
    ideas
}

pub fn respond(request: IdeaRequest) -> IdeaResponse {
    IdeaResponse {
        ideas: suggest(&request),
        location: request.location,
        interests: request.interests,
        budget: request.budget,
        timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(location: &str, interests: &str, budget: &str) -> IdeaRequest {
        IdeaRequest { location: location.into(), interests: interests.into(), budget: budget.into() }
    }

    fn titles(ideas: &[Idea]) -> Vec<&str> {
        ideas.iter().map(|i| i.title).collect()
    }

    #[test]
    fn empty_request_gets_general_suggestions() {
        let ideas = suggest(&IdeaRequest::default());
        assert_eq!(titles(&ideas), ["Local Service Business", "Online Consulting", "E-commerce Store"]);
        assert!(ideas.iter().all(|i| i.score() == 1));
    }

    #[test]
    fn interest_and_location_outrank_budget() {
        let ideas = suggest(&request("Rural Musanze", " Food , tech", "10000+"));
        assert_eq!(ideas.len(), 5);
        assert_eq!(
            titles(&ideas),
            [
                "Agricultural Consulting Service",
                "Rural Tourism Experience",
                "Home-based Catering Service",
                "Cooking Classes & Workshops",
                "Local Tech Support Service",
            ]
        );
    }

    #[test]
    fn duplicate_interests_do_not_repeat_ideas() {
        let ideas = suggest(&request("", "art,creative,art", ""));
        assert_eq!(titles(&ideas), ["Art Classes & Workshops", "Custom Art Commission Service"]);
        assert_eq!(ideas[0].score(), 4);
    }

    #[test]
    fn relevance_markers_serialise_only_when_set() {
        let ideas = suggest(&request("", "", "0-1000"));
        let json = serde_json::to_value(&ideas[0]).unwrap();
        assert_eq!(json["budget_relevance"], "high");
        assert!(json.get("location_relevance").is_none());
    }

    #[test]
    fn response_echoes_the_request() {
        let response = respond(request("beach town", "", ""));
        assert_eq!(response.location, "beach town");
        assert_eq!(titles(&response.ideas), ["Marine Equipment Rental"]);
    }
}
