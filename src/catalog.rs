//! Static catalog of the business archetypes the assistant knows about.
//!
//! Profiles are identified only by their display name; chat matching, export
//! templates and the analytics success table all key on that string.

use serde::{Deserialize, Serialize};

const SERVICE_SECTIONS: &[&str] = &[
    "Business Overview",
    "Startup Investment",
    "Revenue Potential",
    "Prime Locations",
    "Target Customers",
    "Service Offerings",
    "Marketing Strategy",
    "Operational Tips",
    "Legal Requirements",
    "Success Factors",
    "Growth Opportunities",
    "Challenges & Solutions",
    "Financial Projections",
    "Business Plan Generation",
];

const RESTAURANT_SECTIONS: &[&str] = &[
    "Business Overview",
    "Startup Investment",
    "Revenue Potential",
    "Prime Locations",
    "Target Customers",
    "Menu Categories",
    "Marketing Strategy",
    "Operational Tips",
    "Legal Requirements",
    "Success Factors",
    "Growth Opportunities",
    "Challenges & Solutions",
    "Financial Projections",
    "Business Plan Generation",
];

const PROCESSING_SECTIONS: &[&str] = &[
    "Business Overview",
    "Startup Investment",
    "Revenue Potential",
    "Prime Locations",
    "Target Customers",
    "Product Categories",
    "Processing Methods",
    "Marketing Strategy",
    "Operational Tips",
    "Legal Requirements",
    "Success Factors",
    "Growth Opportunities",
    "Challenges & Solutions",
    "Financial Projections",
    "Business Plan Generation",
];

const RETAIL_SECTIONS: &[&str] = &[
    "Business Overview",
    "Startup Investment",
    "Revenue Potential",
    "Prime Locations",
    "Target Customers",
    "Product Categories",
    "Marketing Strategy",
    "Operational Tips",
    "Legal Requirements",
    "Success Factors",
    "Growth Opportunities",
    "Seasonal Considerations",
    "Financial Projections",
    "Business Plan Generation",
];

const FARMING_SECTIONS: &[&str] = &[
    "Business Overview",
    "Startup Investment",
    "Revenue Potential",
    "Prime Locations",
    "Target Customers",
    "Product Categories",
    "Farming Methods",
    "Marketing Strategy",
    "Operational Tips",
    "Legal Requirements",
    "Success Factors",
    "Growth Opportunities",
    "Challenges & Solutions",
    "Financial Projections",
    "Business Plan Generation",
];

#[derive(Debug)]
pub struct BusinessProfile {
    pub name: &'static str,
    /// Startup cost bounds in RWF, used for budget filtering.
    pub startup_cost: (u64, u64),
    pub startup_investment: &'static str,
    pub revenue_potential: &'static str,
    pub break_even: &'static str,
    pub roi: &'static str,
    pub success_rate: u32,
    pub overview: &'static str,
    pub locations: &'static [&'static str],
    pub customers: &'static [&'static str],
    pub offerings: &'static [&'static str],
    pub sections: &'static [&'static str],
}

pub static BUSINESSES: &[BusinessProfile] = &[
    BusinessProfile {
        name: "Mountain Hiking Tours",
        startup_cost: (4_300_000, 16_000_000),
        startup_investment: "4,300,000-16,000,000 RWF",
        revenue_potential: "1,500,000-8,000,000 RWF per month",
        break_even: "6-10 months",
        roi: "250-400% by Year 3",
        success_rate: 92,
        overview: "Guided hikes through the Virunga foothills, crater lakes and the twin lakes of Burera and Ruhondo.",
        locations: &["Kinigi near Volcanoes National Park", "Musanze town centre", "Lake Burera shoreline"],
        customers: &["International tourists", "Kigali weekend travellers", "Student and school groups"],
        offerings: &["Half-day and full-day hikes", "Multi-day trekking packages", "Equipment rental", "Photography tours"],
        sections: SERVICE_SECTIONS,
    },
    BusinessProfile {
        name: "Volcano Trekking",
        startup_cost: (5_000_000, 18_000_000),
        startup_investment: "5,000,000-18,000,000 RWF",
        revenue_potential: "2,000,000-10,000,000 RWF per month",
        break_even: "6-10 months",
        roi: "300-500% by Year 3",
        success_rate: 88,
        overview: "Treks to Bisoke, Karisimbi and the other Virunga volcanoes, bundled with park permits and porters.",
        locations: &["Kinigi park headquarters", "Bisoke trailhead", "Karisimbi base camp area"],
        customers: &["Adventure tourists", "Gorilla trekking visitors", "Mountaineering clubs"],
        offerings: &["Bisoke day treks", "Karisimbi overnight expeditions", "Porter and cook services", "Gear rental"],
        sections: SERVICE_SECTIONS,
    },
    BusinessProfile {
        name: "Local Restaurant",
        startup_cost: (4_800_000, 18_000_000),
        startup_investment: "4,800,000-18,000,000 RWF",
        revenue_potential: "1,500,000-6,000,000 RWF per month",
        break_even: "6-12 months",
        roi: "200-350% by Year 3",
        success_rate: 95,
        overview: "A restaurant serving Rwandan dishes such as brochettes, isombe and fresh tilapia to locals and visitors.",
        locations: &["Musanze town centre", "Near the bus park", "Along the Kinigi road"],
        customers: &["Local residents and workers", "Tourists heading to the park", "Tour groups"],
        offerings: &["Traditional Rwandan buffet", "Grilled brochettes and tilapia", "Coffee and tea service", "Catering for events"],
        sections: RESTAURANT_SECTIONS,
    },
    BusinessProfile {
        name: "Eco-lodges",
        startup_cost: (26_000_000, 86_000_000),
        startup_investment: "26,000,000-86,000,000 RWF",
        revenue_potential: "3,000,000-12,000,000 RWF per month",
        break_even: "12-18 months",
        roi: "150-300% by Year 3",
        success_rate: 90,
        overview: "Sustainable lodging built from local materials, close to the national park and the crater lakes.",
        locations: &["Kinigi", "Lake Ruhondo hillsides", "Nyange sector"],
        customers: &["Eco-conscious tourists", "Gorilla trekking visitors", "Honeymoon and retreat guests"],
        offerings: &["Cottage accommodation", "Farm-to-table dining", "Guided nature walks", "Cultural evenings"],
        sections: SERVICE_SECTIONS,
    },
    BusinessProfile {
        name: "Food Processing",
        startup_cost: (26_000_000, 81_000_000),
        startup_investment: "26,000,000-81,000,000 RWF",
        revenue_potential: "1,400,000-6,300,000 RWF per month",
        break_even: "8-12 months",
        roi: "200-400% by Year 3",
        success_rate: 87,
        overview: "Turning Musanze's potato, maize and vegetable harvests into flour, chips and packaged goods.",
        locations: &["Musanze industrial zone", "Busogo", "Near the main market"],
        customers: &["Supermarkets in Kigali", "Hotels and restaurants", "Schools and institutions"],
        offerings: &["Potato chips and crisps", "Maize flour", "Dried vegetables", "Fruit juices"],
        sections: PROCESSING_SECTIONS,
    },
    BusinessProfile {
        name: "Coffee Processing",
        startup_cost: (33_000_000, 93_000_000),
        startup_investment: "33,000,000-93,000,000 RWF",
        revenue_potential: "2,800,000-13,000,000 RWF per month",
        break_even: "10-15 months",
        roi: "250-450% by Year 3",
        success_rate: 94,
        overview: "A washing station and roastery processing high-altitude arabica from the volcanic slopes.",
        locations: &["Coffee-growing hills of Musanze", "Near cooperative collection points", "Musanze town for the roastery"],
        customers: &["Specialty coffee exporters", "Kigali cafes", "Tourists buying roasted beans"],
        offerings: &["Washed green coffee", "Roasted and ground coffee", "Coffee farm tours", "Barista training"],
        sections: PROCESSING_SECTIONS,
    },
    BusinessProfile {
        name: "Local Transport",
        startup_cost: (1_000_000, 6_000_000),
        startup_investment: "1,000,000-6,000,000 RWF",
        revenue_potential: "1,500,000-4,500,000 RWF per month",
        break_even: "4-8 months",
        roi: "250-400% by Year 3",
        success_rate: 96,
        overview: "Motorcycle taxis, shuttles and vehicle hire connecting Musanze town with the park and the lakes.",
        locations: &["Musanze bus park", "Kinigi junction", "Hotel and lodge pick-up points"],
        customers: &["Residents commuting in town", "Tourists travelling to the park", "Lodges needing transfers"],
        offerings: &["Motorcycle taxi service", "Airport and Kigali shuttles", "Park transfers", "Vehicle hire with driver"],
        sections: SERVICE_SECTIONS,
    },
    BusinessProfile {
        name: "Souvenir Shop",
        startup_cost: (1_500_000, 8_000_000),
        startup_investment: "1,500,000-8,000,000 RWF",
        revenue_potential: "1,500,000-4,500,000 RWF per month",
        break_even: "6-10 months",
        roi: "200-350% by Year 3",
        success_rate: 89,
        overview: "Crafts, baskets, imigongo art and gorilla-themed gifts sourced from local cooperatives.",
        locations: &["Kinigi visitor centre area", "Musanze town centre", "Lodge gift corners"],
        customers: &["International tourists", "Tour operators", "Kigali gift buyers"],
        offerings: &["Agaseke baskets", "Imigongo paintings", "Wood carvings", "Locally branded apparel"],
        sections: RETAIL_SECTIONS,
    },
    BusinessProfile {
        name: "Local Guide Services",
        startup_cost: (4_300_000, 18_000_000),
        startup_investment: "4,300,000-18,000,000 RWF",
        revenue_potential: "2,000,000-12,000,000 RWF per month",
        break_even: "6-10 months",
        roi: "300-500% by Year 3",
        success_rate: 91,
        overview: "Certified local guides offering cultural, village and city experiences around Musanze.",
        locations: &["Musanze town", "Iby'Iwacu cultural village", "Musanze caves"],
        customers: &["Independent travellers", "Tour agencies", "Researchers and students"],
        offerings: &["Cultural village visits", "Musanze caves tours", "Market and city walks", "Multilingual guiding"],
        sections: SERVICE_SECTIONS,
    },
    BusinessProfile {
        name: "Organic Farming",
        startup_cost: (10_000_000, 38_000_000),
        startup_investment: "10,000,000-38,000,000 RWF",
        revenue_potential: "4,000,000-15,500,000 RWF per month",
        break_even: "8-12 months",
        roi: "200-400% by Year 3",
        success_rate: 93,
        overview: "Organic vegetables, potatoes and fruit grown on the fertile volcanic soils of the region.",
        locations: &["Kinigi farmland", "Busogo", "Gataraga"],
        customers: &["Lodges and restaurants", "Kigali supermarkets", "Export aggregators"],
        offerings: &["Organic Irish potatoes", "Vegetables and herbs", "Fruit", "Farm visits"],
        sections: FARMING_SECTIONS,
    },
    BusinessProfile {
        name: "Guesthouse",
        startup_cost: (5_000_000, 30_000_000),
        startup_investment: "5,000,000-30,000,000 RWF",
        revenue_potential: "2,000,000-6,000,000 RWF per month",
        break_even: "8-12 months",
        roi: "200-350% by Year 3",
        success_rate: 88,
        overview: "Affordable rooms with breakfast for budget travellers, volunteers and visiting professionals.",
        locations: &["Musanze town centre", "Near Kinigi", "Along the Kigali road"],
        customers: &["Budget travellers", "NGO staff and volunteers", "Domestic business visitors"],
        offerings: &["Private rooms", "Breakfast and dinner", "Tour booking desk", "Laundry service"],
        sections: SERVICE_SECTIONS,
    },
    BusinessProfile {
        name: "Internet Cafe",
        startup_cost: (20_000_000, 38_000_000),
        startup_investment: "20,000,000-38,000,000 RWF",
        revenue_potential: "1,500,000-6,000,000 RWF per month",
        break_even: "6-10 months",
        roi: "200-350% by Year 3",
        success_rate: 85,
        overview: "Computers, printing and mobile money services for students, travellers and small businesses.",
        locations: &["Near INES-Ruhengeri campus", "Musanze town centre", "Bus park area"],
        customers: &["University students", "Travellers", "Small business owners"],
        offerings: &["Internet access", "Printing and scanning", "Computer training", "Mobile money services"],
        sections: SERVICE_SECTIONS,
    },
];

/// Looks up a profile by its exact display name, ignoring case.
pub fn find(name: &str) -> Option<&'static BusinessProfile> {
    BUSINESSES.iter().find(|b| b.name.eq_ignore_ascii_case(name.trim()))
}

/// Profile whose lowest startup cost still fits under `max`.
pub fn affordable(max: u64) -> impl Iterator<Item = &'static BusinessProfile> {
    BUSINESSES.iter().filter(move |b| b.startup_cost.0 <= max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    Tourism,
    Hospitality,
    Services,
    Retail,
    Agriculture,
    Food,
    Beverage,
}

impl Sector {
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Tourism => "Tourism",
            Sector::Hospitality => "Hospitality",
            Sector::Services => "Services",
            Sector::Retail => "Retail",
            Sector::Agriculture => "Agriculture",
            Sector::Food => "Food",
            Sector::Beverage => "Beverage",
        }
    }

    pub fn business_names(&self) -> &'static [&'static str] {
        match self {
            Sector::Tourism => &["Mountain Hiking Tours", "Volcano Trekking", "Local Guide Services"],
            Sector::Hospitality => &["Guesthouse", "Eco-lodges", "Local Restaurant"],
            Sector::Services => &["Local Transport", "Internet Cafe", "Local Guide Services"],
            Sector::Retail => &["Souvenir Shop", "Internet Cafe"],
            Sector::Agriculture => &["Organic Farming", "Coffee Processing", "Food Processing"],
            Sector::Food => &["Local Restaurant", "Food Processing"],
            Sector::Beverage => &["Coffee Processing", "Local Restaurant"],
        }
    }

    pub fn businesses(&self) -> impl Iterator<Item = &'static BusinessProfile> {
        self.business_names().iter().filter_map(|name| find(name))
    }
}

/// Owned, mergeable form of a profile used by the export generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub title: String,
    pub executive_summary: String,
    pub startup_investment: String,
    pub revenue_potential: String,
    pub break_even: String,
    pub roi: String,
    pub sections: Vec<String>,
}

impl BusinessProfile {
    /// What the plan is for, as it reads after "starting".
    fn venture(&self) -> String {
        match self.name {
            "Eco-lodges" => "an eco-lodge business".into(),
            "Local Restaurant" => "a local restaurant".into(),
            "Souvenir Shop" => "a souvenir shop".into(),
            name => {
                let article = match name.chars().next() {
                    Some('A' | 'E' | 'I' | 'O' | 'U') => "an",
                    _ => "a",
                };
                format!("{} {} business", article, name.to_lowercase())
            }
        }
    }

    pub fn plan_template(&self) -> PlanTemplate {
        PlanTemplate {
            title: format!("{} Business Plan", self.name),
            executive_summary: format!(
                "A comprehensive guide to starting {} in Musanze, Rwanda.",
                self.venture()
            ),
            startup_investment: self.startup_investment.to_string(),
            revenue_potential: self.revenue_potential.to_string(),
            break_even: self.break_even.to_string(),
            roi: self.roi.to_string(),
            sections: self.sections.iter().map(|s| s.to_string()).collect(),
        }
    }
}
