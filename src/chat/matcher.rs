//! Maps free text onto a catalog business or, failing that, a sector.

use crate::catalog::{self, BusinessProfile, Sector};

/// Ordered alias table; the first entry with an alias contained in the
/// message wins. Broad words ("tours", "shop", "lodge", "cafe") sit early
/// and shadow later entries: "volcano tours" resolves to Mountain Hiking
/// Tours and "coffee shop" to Souvenir Shop.
const BUSINESS_ALIASES: &[(&str, &[&str])] = &[
    ("Mountain Hiking Tours", &["mountain hiking", "hiking tour", "hiking"]),
    ("Mountain Hiking Tours", &["tours"]),
    ("Volcano Trekking", &["volcano", "trekking", "gorilla trek"]),
    ("Local Guide Services", &["local guide", "tour guide", "guide service"]),
    ("Eco-lodges", &["eco-lodge", "eco lodge", "ecolodge", "lodge"]),
    ("Guesthouse", &["guesthouse", "guest house", "hotel", "bed and breakfast"]),
    ("Souvenir Shop", &["souvenir", "gift shop", "craft", "shop"]),
    ("Food Processing", &["food processing"]),
    ("Coffee Processing", &["coffee"]),
    ("Local Restaurant", &["restaurant"]),
    ("Internet Cafe", &["internet cafe", "internet café", "cyber cafe", "cafe"]),
    ("Organic Farming", &["organic"]),
    ("Local Transport", &["transport", "motorcycle taxi", "moto taxi"]),
];

pub fn match_business(lower: &str) -> Option<&'static BusinessProfile> {
    BUSINESS_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| lower.contains(alias)))
        .and_then(|(name, _)| catalog::find(name))
}

struct SectorRule {
    sector: Sector,
    keywords: &'static [&'static str],
    /// A keyword hit is ignored when any of these also appear.
    unless: &'static [&'static str],
}

const SECTOR_RULES: &[SectorRule] = &[
    SectorRule {
        sector: Sector::Tourism,
        keywords: &["tourism", "tourist", "travel"],
        unless: &["hiking", "trekking", "tour guide"],
    },
    SectorRule {
        sector: Sector::Hospitality,
        keywords: &["hospitality", "accommodation"],
        unless: &["guesthouse", "lodge", "hotel"],
    },
    SectorRule {
        sector: Sector::Services,
        keywords: &["services", "service business"],
        unless: &["guide service", "transport"],
    },
    SectorRule {
        sector: Sector::Retail,
        keywords: &["retail"],
        unless: &["souvenir", "shop"],
    },
    SectorRule {
        sector: Sector::Agriculture,
        keywords: &["agriculture", "agricultural", "farming", "agribusiness"],
        unless: &["organic", "coffee"],
    },
    SectorRule {
        sector: Sector::Food,
        keywords: &["food"],
        unless: &["food processing", "restaurant"],
    },
    SectorRule {
        sector: Sector::Beverage,
        keywords: &["beverage", "drinks"],
        unless: &["coffee"],
    },
];

pub fn match_sector(lower: &str) -> Option<Sector> {
    SECTOR_RULES
        .iter()
        .find(|rule| {
            rule.keywords.iter().any(|k| lower.contains(k))
                && !rule.unless.iter().any(|g| lower.contains(g))
        })
        .map(|rule| rule.sector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BUSINESSES;

    #[test]
    fn every_canonical_name_selects_itself() {
        for business in BUSINESSES {
            let matched = match_business(&business.name.to_lowercase()).map(|b| b.name);
            assert_eq!(matched, Some(business.name));
        }
    }

    #[test]
    fn aliases() {
        assert_eq!(match_business("i want to run a moto taxi").unwrap().name, "Local Transport");
        assert_eq!(match_business("bed and breakfast near kinigi").unwrap().name, "Guesthouse");
        assert_eq!(match_business("gorilla trekking permits").unwrap().name, "Volcano Trekking");
        assert!(match_business("what should i do").is_none());
    }

    #[test]
    fn broad_words_shadow_later_entries() {
        assert_eq!(match_business("volcano tours").unwrap().name, "Mountain Hiking Tours");
        assert_eq!(match_business("a coffee shop").unwrap().name, "Souvenir Shop");
        assert_eq!(match_business("internet cafe with coffee").unwrap().name, "Coffee Processing");
    }

    #[test]
    fn sectors_respect_their_guards() {
        assert_eq!(match_sector("tourism opportunities"), Some(Sector::Tourism));
        assert_eq!(match_sector("agriculture"), Some(Sector::Agriculture));
        assert_eq!(match_sector("a food business"), Some(Sector::Food));
        assert_eq!(match_sector("food processing"), None);
        assert_eq!(match_sector("tourism with hiking"), None);
        assert_eq!(match_sector("something else"), None);
    }
}
