//! Canned reply text. Markdown-ish: the dashboard renders `**bold**` and
//! turns the export block into buttons.

use crate::catalog::{self, BusinessProfile, Sector};

use super::budget::{format_rwf, BudgetRange};
use super::intent::{Intent, Location, Topic};

pub const REDIRECT: &str = "I'm your business assistant for Musanze, Rwanda, so I can only help with \
starting and growing a business. 😊\n\n\
Try asking me about:\n\
• **Business opportunities** in tourism, agriculture, hospitality or retail\n\
• **Startup costs** for a specific business\n\
• **Business planning** and export of a complete plan\n\n\
For example: \"What can I start with 1,000,000 - 3,000,000 RWF?\" or \"Tell me about coffee processing\".";

pub const PLAN_REQUEST: &str = "📄 **Generate Your Business Plan**\n\n\
I can turn any of the Musanze business profiles into a complete plan document.\n\n\
**How it works:**\n\
1. Tell me the business you're interested in (e.g. \"Guesthouse\" or \"Coffee Processing\")\n\
2. Review the startup costs, revenue potential and key sections\n\
3. Pick an export format from the buttons under the answer\n\n\
**Available formats:**\n\
• **PDF** - printable plan (use your browser's print to PDF)\n\
• **Word** - editable document\n\
• **Excel** - figures and section list as CSV\n\
• **PowerPoint** - slide-style presentation\n\n\
Which business should the plan cover?";

pub const CUSTOM_BUDGET: &str = "💰 **Custom Budget**\n\n\
No problem! Tell me the amount you can invest, for example:\n\
• \"2,000,000 - 4,000,000 RWF\"\n\
• \"10M\" or \"15 million\"\n\
• \"50M+\"\n\n\
I'll list the Musanze businesses you can start with it.";

pub const DEFAULT_REPLIES: [&str; 5] = [
    "I'd be happy to help you find a business in Musanze! Popular categories:\n\n\
🏔️ **Tourism:** hiking tours, volcano trekking, local guides\n\
🏨 **Hospitality:** guesthouses, eco-lodges, restaurants\n\
🌱 **Agriculture:** organic farming, coffee and food processing\n\
🏪 **Retail & Services:** souvenir shops, transport, internet cafes\n\n\
Which category interests you most?",
    "Great question! Musanze's economy is driven by visitors to Volcanoes National Park and by its fertile volcanic soil.\n\n\
That makes **tourism**, **hospitality** and **agriculture** the strongest sectors for a new business.\n\n\
What's your budget range? I'll show you what fits.",
    "Let's find the right opportunity for you. It helps to know:\n\n\
🎯 **Your skills** - what are you good at?\n\
💰 **Your budget** - how much can you invest in RWF?\n\
📍 **Your location** - town centre, Kinigi or near the lakes?\n\n\
Tell me a bit more and I'll suggest specific businesses.",
    "I can help with business opportunities, startup costs and complete business plans for Musanze.\n\n\
Try: \"Tell me about eco-lodges\", \"What can I start with 5M?\" or \"Show me agriculture opportunities\".",
    "Every successful business starts with a clear idea and a realistic budget.\n\n\
🔎 Pick a sector (tourism, hospitality, agriculture, retail, services)\n\
💰 Share your budget in RWF\n\
📄 Export a business plan once you've chosen\n\n\
Where would you like to start?",
];

/// Block the dashboard recognises and replaces with export buttons.
pub fn export_options() -> &'static str {
    "💼 **Export Options:** PDF, Word, Excel, PowerPoint formats available\n\
📄 **PDF Export:** Click to generate PDF business plan\n\
📝 **Word Export:** Click to generate Word document\n\
📊 **Excel Export:** Click to generate Excel spreadsheet\n\
📽️ **PowerPoint Export:** Click to generate presentation"
}

fn bullets(items: &[&str]) -> String {
    items.iter().map(|i| format!("• {}\n", i)).collect()
}

fn key_figures(business: &BusinessProfile) -> String {
    format!(
        "💰 **Startup Investment:** {}\n📈 **Revenue Potential:** {}\n⏱️ **Break-even:** {}\n📊 **ROI:** {}\n",
        business.startup_investment, business.revenue_potential, business.break_even, business.roi
    )
}

/// Detailed business answer. `generated` replaces the catalog overview when
/// the external generator supplied text.
pub fn business_block(business: &BusinessProfile, generated: Option<&str>) -> String {
    let offerings_label = business
        .sections
        .iter()
        .find(|s| s.ends_with("Offerings") || s.ends_with("Categories"))
        .copied()
        .unwrap_or("Service Offerings");

    format!(
        "🏢 **{name} Business in Musanze**\n\n{overview}\n\n{figures}\n\
📍 **Prime Locations:**\n{locations}\n\
🎯 **Target Customers:**\n{customers}\n\
🛍️ **{offerings_label}:**\n{offerings}\n\
📋 **Plan Sections:** {sections}\n\n{export}",
        name = business.name,
        overview = generated.unwrap_or(business.overview).trim(),
        figures = key_figures(business),
        locations = bullets(business.locations),
        customers = bullets(business.customers),
        offerings = bullets(business.offerings),
        sections = business.sections.join(", "),
        export = export_options(),
    )
}

pub fn ask_budget(sector: Sector) -> String {
    let names = sector.business_names().join(", ");
    format!(
        "Great choice! **{label}** has strong potential in Musanze ({names}).\n\n\
💰 **What's your budget range?**\n\n\
• **1,000,000 - 5,000,000 RWF** - small services and retail\n\
• **5,000,000 - 15,000,000 RWF** - tours, restaurants, guesthouses\n\
• **15,000,000 - 50,000,000 RWF** - farming, processing, eco-lodges\n\
• **50,000,000+ RWF** - large processing plants and lodges\n\
• **Write any amount** - custom budget\n\n\
Tell me your budget and I'll show the {label_lower} businesses that fit.",
        label = sector.label(),
        label_lower = sector.label().to_lowercase(),
    )
}

fn numbered(businesses: &[&BusinessProfile]) -> String {
    businesses
        .iter()
        .enumerate()
        .map(|(i, b)| {
            format!(
                "{}. **{}** - startup {}, revenue {}, break-even {}\n",
                i + 1,
                b.name,
                b.startup_investment,
                b.revenue_potential,
                b.break_even
            )
        })
        .collect()
}

pub fn sector_opportunities(sector: Sector, budget: &BudgetRange) -> String {
    let fits: Vec<_> = sector.businesses().filter(|b| budget.covers(b.startup_cost.0)).collect();
    if fits.is_empty() {
        let cheapest = sector.businesses().map(|b| b.startup_cost.0).min().unwrap_or(0);
        return format!(
            "With a budget of **{}**, none of the {} businesses fit yet. \
The most affordable one starts at **{} RWF**.\n\n\
You could start smaller in another sector, look for a partner, or ask me about funding options.",
            budget.describe(),
            sector.label().to_lowercase(),
            format_rwf(cheapest),
        );
    }
    format!(
        "🎯 **{} Opportunities for {}**\n\n{}\nName any of these businesses for full details and an exportable business plan.",
        sector.label(),
        budget.describe(),
        numbered(&fits),
    )
}

pub fn budget_opportunities(budget: &BudgetRange) -> String {
    let fits: Vec<_> = catalog::affordable(budget.max.unwrap_or(u64::MAX)).collect();
    if fits.is_empty() {
        return format!(
            "A budget of **{}** is below the startup cost of every business I track. \
The most affordable option is **Local Transport** from 1,000,000 RWF.",
            budget.describe()
        );
    }
    format!(
        "💰 **Business Opportunities for {}**\n\n{}\nWhich one would you like to explore? Name it for the full breakdown.",
        budget.describe(),
        numbered(&fits),
    )
}

pub fn follow_up(business: &BusinessProfile) -> String {
    format!(
        "Sticking with **{}**, here are the key numbers again:\n\n{}\n\
Ask about locations, customers or marketing, or export the full plan below.\n\n{}",
        business.name,
        key_figures(business),
        export_options(),
    )
}

/// Fallback text for an intent when the generator had nothing.
pub fn for_intent(intent: &Intent) -> Option<String> {
    let text = match intent {
        Intent::Greeting => "Hello! I'm InnoStart AI, your business assistant for Musanze, Rwanda. \
I can help you with:\n\n\
🎯 **Business Opportunities** - find the right business for you\n\
💰 **Startup Costs** - understand investment requirements\n\
📋 **Planning** - create and export business plans\n\n\
What would you like to start with?",
        Intent::Help => "I'm here to help with starting a business in Musanze, Rwanda!\n\n\
💡 **How to use me:**\n\
1. Tell me your budget range\n\
2. Choose a sector that interests you\n\
3. Get detailed business information with export options\n\n\
📊 **What you'll get:** startup costs, revenue projections, locations, customers and a downloadable plan.",
        Intent::Planning => "📋 **Planning Services**\n\n\
• **Business Plan Creation** - a complete plan for one of the Musanze businesses\n\
• **Financial Projections** - costs, revenue and break-even\n\
• **Market Research** - target customers and competition\n\
• **Marketing Strategy** - reaching tourists and locals\n\n\
Tell me which business you're planning and I'll build on its profile.",
        Intent::Export => "📄 **Export Options Available:**\n\n\
• **PDF Export** - professional business plan document\n\
• **Word Export** - editable business plan document\n\
• **Excel Export** - figures and data spreadsheet\n\
• **PowerPoint Export** - presentation slides\n\n\
Name the business you want to export and pick a format from the buttons under its details.",
        Intent::Topic(topic) => topic_text(*topic),
        Intent::Contextual(_) | Intent::Default => return None,
    };
    Some(text.to_string())
}

fn topic_text(topic: Topic) -> &'static str {
    match topic {
        Topic::Funding => "💰 **Funding Options in Rwanda**\n\n\
• **Savings and family** - keep full control of the business\n\
• **SACCOs and microfinance** - small loans for first-time owners\n\
• **Bank loans** - BRD and commercial banks, usually need collateral\n\
• **BDF guarantees** - the Business Development Fund backs SME loans\n\
• **Investors and partners** - share ownership for capital and experience\n\n\
What budget do you have so far?",
        Topic::MarketResearch => "Market research helps you understand customers and competitors. \
Define your target market, visit competing businesses, talk to tourists and locals, \
and check seasonal visitor numbers for Volcanoes National Park. Which business are you researching?",
        Topic::Marketing => "Effective marketing in Musanze mixes online presence (Google Maps, TripAdvisor, \
social media) with partnerships: tour operators, lodges and the park office send most visitors. \
What type of business are you planning to market?",
        Topic::Financial => "Financial planning should cover startup costs, operating expenses, revenue \
projections, cash flow and break-even. Share your budget in RWF and I'll match it with businesses \
that fit, each with its own revenue and ROI figures.",
        Topic::Legal => "To operate legally in Rwanda: register the business with RDB (online, usually within \
a day), get a TIN from RRA, obtain sector licences (tourism operators need an RDB tourism licence), \
and register employees with RSSB. Which business are you setting up?",
        Topic::Team => "A strong team matters: define roles early, hire locally where possible, train guides \
and staff in customer service and languages, and keep clear contracts. What positions do you need to fill?",
        Topic::Technology => "Technology can set you apart: online booking, mobile money payments, a simple \
website and social media. An internet cafe is also a tech-friendly business in Musanze. \
What technology needs does your business have?",
        Topic::Ideas(Location::Musanze) => "Here are business ideas for Musanze, Rwanda:\n\n\
🏔️ **Tourism & Hospitality:** mountain hiking tours, eco-lodges, guesthouses, volcano trekking\n\
🌱 **Agriculture & Food:** organic farming, coffee processing, local restaurants\n\
🏪 **Retail & Services:** souvenir shops, internet cafes, motorcycle taxi services\n\n\
Which of these interests you most? I can provide detailed guidance!",
        Topic::Ideas(Location::Kigali) => "Here are business ideas for Kigali, Rwanda:\n\n\
🏢 **Tech & Innovation:** software development, digital marketing, e-commerce\n\
🍽️ **Food & Beverage:** restaurants, food delivery, coffee shops\n\
🚗 **Transportation:** logistics and delivery, car rental\n\n\
I know Musanze best, so ask me about Musanze if you're open to it!",
        Topic::Ideas(Location::Anywhere) => "Here are profitable business ideas you can start:\n\n\
🏔️ **Tourism:** guided tours, trekking, cultural experiences\n\
🍽️ **Food & Beverage:** restaurant, food processing, coffee\n\
🏪 **Retail & Services:** souvenir shop, transport, internet cafe\n\
🌱 **Agriculture:** organic farming\n\n\
What type of business interests you most?",
    }
}
