//! Business-plan documents: catalog-driven exports and the free-form plan.
//!
//! No binary formats are produced. PDF and Word exports are printable HTML,
//! Excel is CSV and PowerPoint is a slide-per-screen HTML page.

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write;
use std::str::FromStr;

use crate::catalog::{self, PlanTemplate};

/// Used when the requested business type is not in the catalog.
pub const FALLBACK_BUSINESS: &str = "Mountain Hiking Tours";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Missing required parameters")]
    MissingParameters,
    #[error("Invalid format. Allowed: pdf, word, excel, powerpoint")]
    InvalidFormat,
    #[error("Invalid business_data: {0}")]
    InvalidBusinessData(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Word,
    Excel,
    PowerPoint,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "word" => Ok(ExportFormat::Word),
            "excel" => Ok(ExportFormat::Excel),
            "powerpoint" => Ok(ExportFormat::PowerPoint),
            _ => Err(ExportError::InvalidFormat),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportRequest {
    pub business_type: Option<String>,
    pub format: Option<String>,
    #[serde(default)]
    pub business_data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportFile {
    pub success: bool,
    pub format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
    pub filename: String,
    pub message: &'static str,
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Keeps `[A-Za-z0-9_-]`, folds everything else into single underscores.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

/// Catalog template for `business_type` with `overrides` merged over its top-level fields.
pub fn plan_data(business_type: &str, overrides: Option<&Map<String, Value>>) -> Result<PlanTemplate, ExportError> {
    let template = catalog::find(business_type)
        .or_else(|| catalog::find(FALLBACK_BUSINESS))
        .map(|b| b.plan_template())
        .ok_or(ExportError::MissingParameters)?;

    match overrides {
        Some(overrides) if !overrides.is_empty() => {
            let mut merged = match serde_json::to_value(&template)? {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
            Ok(serde_json::from_value(Value::Object(merged))?)
        }
        _ => Ok(template),
    }
}

pub fn export(request: &ExportRequest) -> Result<ExportFile, ExportError> {
    let (business_type, format) = match (&request.business_type, &request.format) {
        (Some(t), Some(f)) => (t.as_str(), f.parse::<ExportFormat>()?),
        _ => return Err(ExportError::MissingParameters),
    };
    let plan = plan_data(business_type, request.business_data.as_ref())?;
    let stem = sanitize_filename(&plan.title);

    let file = match format {
        ExportFormat::Pdf => ExportFile {
            success: true,
            format,
            html: Some(plan_html(&plan)),
            csv: None,
            filename: format!("{}.html", stem),
            message: "Business plan generated successfully. Use browser print to PDF function.",
        },
        ExportFormat::Word => ExportFile {
            success: true,
            format,
            html: Some(plan_html(&plan)),
            csv: None,
            filename: format!("{}.html", stem),
            message: "Business plan generated successfully. Open in Word and save as .docx",
        },
        ExportFormat::Excel => ExportFile {
            success: true,
            format,
            html: None,
            csv: Some(plan_csv(&plan, business_type)),
            filename: format!("{}.csv", stem),
            message: "Business plan data generated successfully for Excel import.",
        },
        ExportFormat::PowerPoint => ExportFile {
            success: true,
            format,
            html: Some(presentation_html(&plan)),
            csv: None,
            filename: format!("{}_presentation.html", stem),
            message: "Business plan presentation generated successfully.",
        },
    };
    log::info!("exported '{}' as {:?}", plan.title, format);
    Ok(file)
}

fn today_long() -> String {
    Local::now().format("%B %-d, %Y").to_string()
}

fn list_items(items: &[String]) -> String {
    items.iter().fold(String::new(), |mut out, item| {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
        out
    })
}

const DOCUMENT_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; margin: 40px; color: #333; }
        .header { text-align: center; border-bottom: 3px solid #2c3e50; padding-bottom: 20px; margin-bottom: 30px; }
        .header h1 { color: #2c3e50; margin: 0; font-size: 28px; }
        .header p { color: #7f8c8d; margin: 10px 0 0 0; font-size: 16px; }
        .section { margin-bottom: 30px; }
        .section h2 { color: #34495e; border-left: 4px solid #3498db; padding-left: 15px; margin-bottom: 15px; }
        .section h3 { color: #2c3e50; margin-top: 20px; margin-bottom: 10px; }
        .highlight { background-color: #ecf0f1; padding: 15px; border-radius: 5px; margin: 15px 0; }
        .financial { background-color: #e8f5e8; padding: 15px; border-radius: 5px; margin: 15px 0; }
        ul { margin: 10px 0; }
        li { margin: 5px 0; }
        .footer { text-align: center; margin-top: 50px; padding-top: 20px; border-top: 1px solid #bdc3c7; color: #7f8c8d; }
        @media print { body { margin: 20px; } .no-print { display: none; } }
"#;

const DOCUMENT_TAIL: &str = r#"
    <div class="section">
        <h2>Financial Projections (5-Year Plan)</h2>
        <div class="financial">
            <h3>Revenue Forecast</h3>
            <ul>
                <li><strong>Year 1:</strong> Startup phase - Initial revenue generation</li>
                <li><strong>Year 2:</strong> Growth phase - Market expansion</li>
                <li><strong>Year 3:</strong> Expansion phase - Scale operations</li>
                <li><strong>Year 4:</strong> Maturity phase - Optimize efficiency</li>
                <li><strong>Year 5:</strong> Optimization phase - Maximize profits</li>
            </ul>
        </div>
    </div>

    <div class="section">
        <h2>Next Steps</h2>
        <ol>
            <li>Review this business plan thoroughly</li>
            <li>Conduct market research in Musanze</li>
            <li>Secure funding and permits</li>
            <li>Develop detailed operational procedures</li>
            <li>Create marketing and sales strategies</li>
            <li>Establish partnerships and suppliers</li>
            <li>Launch your business</li>
        </ol>
    </div>

    <div class="footer">
        <p>This business plan was generated by InnoStart AI Assistant</p>
    </div>
</body>
</html>"#;

/// Printable plan document shared by the PDF and Word exports.
pub fn plan_html(plan: &PlanTemplate) -> String {
    let title = escape_html(&plan.title);
    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="header">
        <h1>{title}</h1>
        <p>Musanze, Rwanda Business Plan</p>
        <p>Generated on {date}</p>
    </div>

    <div class="section">
        <h2>Executive Summary</h2>
        <p>{summary}</p>
    </div>

    <div class="section">
        <h2>Key Investment Information</h2>
        <div class="highlight">
            <h3>Startup Investment</h3>
            <p><strong>{investment}</strong></p>
            <h3>Revenue Potential</h3>
            <p><strong>{revenue}</strong></p>
            <h3>Break-even Point</h3>
            <p><strong>{break_even}</strong></p>
            <h3>Expected ROI</h3>
            <p><strong>{roi}</strong></p>
        </div>
    </div>

    <div class="section">
        <h2>Business Plan Sections</h2>
        <ul>{sections}</ul>
    </div>
"#,
        title = title,
        style = DOCUMENT_STYLE,
        date = today_long(),
        summary = escape_html(&plan.executive_summary),
        investment = escape_html(&plan.startup_investment),
        revenue = escape_html(&plan.revenue_potential),
        break_even = escape_html(&plan.break_even),
        roi = escape_html(&plan.roi),
        sections = list_items(&plan.sections),
    );
    html.push_str(DOCUMENT_TAIL);
    html
}

const SLIDES_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 0; padding: 0; background: #f8f9fa; }
        .slide { width: 100%; height: 100vh; display: flex; flex-direction: column; justify-content: center; align-items: center; text-align: center; padding: 40px; box-sizing: border-box; }
        .slide h1 { font-size: 48px; color: #2c3e50; margin-bottom: 20px; }
        .slide h2 { font-size: 36px; color: #34495e; margin-bottom: 30px; }
        .slide h3 { font-size: 24px; color: #2c3e50; margin-bottom: 20px; }
        .slide p { font-size: 20px; color: #7f8c8d; max-width: 800px; line-height: 1.6; }
        .slide ul { font-size: 18px; color: #34495e; text-align: left; max-width: 600px; }
        .slide li { margin: 10px 0; }
        .highlight { background: #3498db; color: white; padding: 20px; border-radius: 10px; margin: 20px 0; }
        .financial { background: #27ae60; color: white; padding: 20px; border-radius: 10px; margin: 20px 0; }
        .navigation { position: fixed; bottom: 20px; right: 20px; z-index: 1000; }
        .nav-btn { background: #3498db; color: white; border: none; padding: 10px 20px; margin: 0 5px; border-radius: 5px; cursor: pointer; }
"#;

pub fn presentation_html(plan: &PlanTemplate) -> String {
    let title = escape_html(&plan.title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Presentation</title>
    <style>{style}</style>
</head>
<body>
    <div class="slide">
        <h1>{title}</h1>
        <p>Musanze, Rwanda</p>
        <p>Generated on {date}</p>
    </div>
    <div class="slide">
        <h2>Executive Summary</h2>
        <p>{summary}</p>
    </div>
    <div class="slide">
        <h2>Investment Overview</h2>
        <div class="highlight"><h3>Startup Investment</h3><p>{investment}</p></div>
        <div class="highlight"><h3>Revenue Potential</h3><p>{revenue}</p></div>
    </div>
    <div class="slide">
        <h2>Financial Projections</h2>
        <div class="financial">
            <h3>5-Year Plan</h3>
            <ul>
                <li>Year 1: Startup Phase</li>
                <li>Year 2: Growth Phase</li>
                <li>Year 3: Expansion Phase</li>
                <li>Year 4: Maturity Phase</li>
                <li>Year 5: Optimization Phase</li>
            </ul>
            <p>Break-even: {break_even}</p>
            <p>ROI: {roi}</p>
        </div>
    </div>
    <div class="slide">
        <h2>Business Plan Sections</h2>
        <ul>{sections}</ul>
    </div>
    <div class="slide">
        <h2>Next Steps</h2>
        <ol>
            <li>Review business plan</li>
            <li>Conduct market research</li>
            <li>Secure funding</li>
            <li>Obtain permits</li>
            <li>Launch business</li>
        </ol>
    </div>
    <div class="navigation">
        <button class="nav-btn" onclick="window.print()">Print</button>
        <button class="nav-btn" onclick="window.close()">Close</button>
    </div>
</body>
</html>"#,
        title = title,
        style = SLIDES_STYLE,
        date = today_long(),
        summary = escape_html(&plan.executive_summary),
        investment = escape_html(&plan.startup_investment),
        revenue = escape_html(&plan.revenue_potential),
        break_even = escape_html(&plan.break_even),
        roi = escape_html(&plan.roi),
        sections = list_items(&plan.sections),
    )
}

/// Two-column CSV. Values are written unquoted, so embedded commas split cells.
pub fn plan_csv(plan: &PlanTemplate, business_type: &str) -> String {
    let mut csv = String::from("Business Plan Data\n");
    let rows = [
        ("Business Type", business_type),
        ("Title", plan.title.as_str()),
        ("Executive Summary", plan.executive_summary.as_str()),
        ("Startup Investment", plan.startup_investment.as_str()),
        ("Revenue Potential", plan.revenue_potential.as_str()),
        ("Break Even", plan.break_even.as_str()),
        ("ROI", plan.roi.as_str()),
    ];
    for (label, value) in rows {
        let _ = writeln!(csv, "{},{}", label, value);
    }
    let _ = writeln!(csv, "Generated Date,{}\n", Local::now().format("%Y-%m-%d"));

    csv.push_str("Business Plan Sections\n");
    for (i, section) in plan.sections.iter().enumerate() {
        let _ = writeln!(csv, "{},{}", i + 1, section);
    }
    csv
}

/// Inputs of the free-form plan form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanBrief {
    pub business_name: String,
    pub business_type: String,
    pub target_market: String,
    pub mission_statement: String,
    pub competitive_advantage: String,
    pub funding_needs: String,
}

impl Default for PlanBrief {
    fn default() -> Self {
        Self {
            business_name: "My Business".into(),
            business_type: "General".into(),
            target_market: String::new(),
            mission_statement: String::new(),
            competitive_advantage: String::new(),
            funding_needs: String::new(),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const BRIEF_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 40px; line-height: 1.6; color: #333; }
        h1 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; text-align: center; }
        h2 { color: #34495e; margin-top: 30px; border-left: 4px solid #3498db; padding-left: 15px; }
        h3 { color: #7f8c8d; margin-top: 20px; }
        .header { text-align: center; margin-bottom: 40px; }
        .section { margin-bottom: 30px; }
        .highlight { background-color: #f8f9fa; padding: 15px; border-left: 4px solid #3498db; margin: 15px 0; }
        ul { margin: 10px 0; padding-left: 25px; }
        li { margin: 5px 0; }
        .footer { margin-top: 50px; text-align: center; color: #7f8c8d; font-style: italic; }
        .print-instructions { background: #e3f2fd; padding: 20px; margin: 20px 0; border-radius: 8px; border-left: 4px solid #2196f3; text-align: center; }
        .print-instructions h2 { border: none; padding: 0; margin: 0 0 15px 0; color: #1976d2; }
        .steps { display: flex; justify-content: space-around; margin: 20px 0; }
        .step { text-align: center; flex: 1; margin: 0 10px; }
        .step-number { background: #2196f3; color: white; border-radius: 50%; width: 30px; height: 30px; display: flex; align-items: center; justify-content: center; margin: 0 auto 10px; font-weight: bold; }
        @media print { .print-instructions { display: none; } }
"#;

const PRINT_INSTRUCTIONS: &str = r#"
    <div class='print-instructions'>
        <h2>📄 Convert to PDF - Easy Steps</h2>
        <div class='steps'>
            <div class='step'><div class='step-number'>1</div><p><strong>Press Ctrl+P</strong><br>(Windows) or <strong>Cmd+P</strong> (Mac)</p></div>
            <div class='step'><div class='step-number'>2</div><p><strong>Select 'Save as PDF'</strong></p></div>
            <div class='step'><div class='step-number'>3</div><p><strong>Set margins to 'Minimum'</strong></p></div>
            <div class='step'><div class='step-number' style='background: #4caf50;'>✓</div><p><strong>Click 'Save'</strong></p></div>
        </div>
        <p style='margin: 15px 0 0 0; color: #e65100;'><strong>💡 Pro Tip:</strong> This creates a professional PDF identical to a PDF generator!</p>
    </div>
"#;

const BRIEF_BOILERPLATE: &str = r#"
    <div class='section'>
        <h2>5. Marketing Strategy</h2>
        <h3>Marketing Objectives</h3>
        <ul>
            <li>Increase brand awareness in target market</li>
            <li>Generate qualified leads and conversions</li>
            <li>Build customer loyalty and retention</li>
            <li>Establish strategic partnerships</li>
        </ul>
    </div>

    <div class='section'>
        <h2>6. Operations Plan</h2>
        <h3>Business Operations</h3>
        <p>The business will operate efficiently through streamlined processes and effective resource management.</p>
        <h3>Key Operational Activities</h3>
        <ul>
            <li>Product/service delivery and quality control</li>
            <li>Customer relationship management</li>
            <li>Inventory and supply chain management</li>
            <li>Financial management and reporting</li>
        </ul>
    </div>
"#;

const BRIEF_RISKS: &str = r#"
    <div class='section'>
        <h2>8. Risk Analysis</h2>
        <h3>Potential Risks</h3>
        <ul>
            <li>Market competition and saturation</li>
            <li>Economic downturns affecting customer spending</li>
            <li>Regulatory changes impacting operations</li>
            <li>Technology disruptions in the industry</li>
        </ul>
        <h3>Risk Mitigation Strategies</h3>
        <ul>
            <li>Diversification of revenue streams</li>
            <li>Strong financial management and cash reserves</li>
            <li>Continuous market monitoring and adaptation</li>
            <li>Investment in technology and innovation</li>
        </ul>
    </div>

    <div class='section'>
        <h2>9. Implementation Timeline</h2>
        <h3>Phase 1: Foundation (Months 1-3)</h3>
        <ul>
            <li>Business registration and legal setup</li>
            <li>Initial funding acquisition</li>
            <li>Team building and hiring</li>
            <li>Basic infrastructure setup</li>
        </ul>
        <h3>Phase 2: Launch (Months 4-6)</h3>
        <ul>
            <li>Product/service development and testing</li>
            <li>Marketing campaign launch</li>
            <li>Customer acquisition and onboarding</li>
            <li>Operational process refinement</li>
        </ul>
        <h3>Phase 3: Growth (Months 7-12)</h3>
        <ul>
            <li>Market expansion and scaling</li>
            <li>Product/service line extensions</li>
            <li>Strategic partnerships development</li>
            <li>Performance optimization and growth</li>
        </ul>
    </div>
"#;

/// Ten-section plan document with print-to-PDF instructions on top.
pub fn brief_html(brief: &PlanBrief) -> String {
    let name = escape_html(&brief.business_name);
    let mission = escape_html(&brief.mission_statement);
    let funding = escape_html(&brief.funding_needs);
    let now = Local::now();

    let mut html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset='UTF-8'>
    <title>Business Plan - {name}</title>
    <style>{style}</style>
</head>
<body>{instructions}
    <div class='header'>
        <h1>BUSINESS PLAN</h1>
        <h2>{name}</h2>
        <p>Generated on {date}</p>
    </div>

    <div class='section'>
        <h2>1. Executive Summary</h2>
        <p><strong>Business Name:</strong> {name}</p>
        <p><strong>Business Type:</strong> {kind}</p>
        <p><strong>Mission Statement:</strong> {mission}</p>
        <p><strong>Funding Requirements:</strong> {funding}</p>
    </div>

    <div class='section'>
        <h2>2. Company Description</h2>
        <p>{name} is a {kind_lower} business that aims to serve the market through innovative solutions and exceptional service delivery.</p>
        <h3>Mission Statement</h3>
        <div class='highlight'><p>{mission}</p></div>
        <h3>Business Objectives</h3>
        <ul>
            <li>Establish a strong market presence within the first year</li>
            <li>Achieve profitability within 18 months</li>
            <li>Build a loyal customer base through quality service</li>
            <li>Expand operations based on market demand</li>
        </ul>
    </div>

    <div class='section'>
        <h2>3. Market Analysis</h2>
        <h3>Target Market</h3>
        <p>{market}</p>
        <h3>Market Opportunity</h3>
        <p>The target market presents significant opportunities for growth and expansion. Market research indicates strong demand for the proposed products/services.</p>
    </div>

    <div class='section'>
        <h2>4. Competitive Advantage</h2>
        <div class='highlight'><p>{advantage}</p></div>
        <h3>Key Differentiators</h3>
        <ul>
            <li>Superior customer service and support</li>
            <li>Innovative approach to market challenges</li>
            <li>Competitive pricing strategy</li>
            <li>Strong brand positioning</li>
        </ul>
    </div>
"#,
        name = name,
        style = BRIEF_STYLE,
        instructions = PRINT_INSTRUCTIONS,
        date = now.format("%B %-d, %Y"),
        kind = escape_html(&capitalize(&brief.business_type)),
        kind_lower = escape_html(&brief.business_type.to_lowercase()),
        mission = mission,
        funding = funding,
        market = escape_html(&brief.target_market),
        advantage = escape_html(&brief.competitive_advantage),
    );

    html.push_str(BRIEF_BOILERPLATE);
    let _ = write!(
        html,
        r#"
    <div class='section'>
        <h2>7. Financial Projections</h2>
        <h3>Funding Requirements</h3>
        <p><strong>Total Funding Needed:</strong> {funding}</p>
        <p>Funding will be used for:</p>
        <ul>
            <li>Initial setup and equipment costs</li>
            <li>Working capital for first 6 months</li>
            <li>Marketing and customer acquisition</li>
            <li>Technology and infrastructure</li>
        </ul>
    </div>
"#,
        funding = funding,
    );
    html.push_str(BRIEF_RISKS);
    let _ = write!(
        html,
        r#"
    <div class='section'>
        <h2>10. Conclusion</h2>
        <p>{name} presents a compelling business opportunity with strong market potential and clear competitive advantages. With proper execution of this business plan, the company is positioned for sustainable growth and profitability.</p>
        <p>The combination of market opportunity, competitive positioning, and strategic planning provides a solid foundation for business success. Continued focus on customer satisfaction, operational excellence, and market adaptation will be key to achieving long-term objectives.</p>
    </div>

    <div class='footer'>
        <p><em>This business plan was generated by InnoStart AI Assistant</em></p>
        <p><em>Generated on {stamp}</em></p>
    </div>
</body>
</html>"#,
        name = name,
        stamp = now.format("%B %-d, %Y at %-I:%M %p"),
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(business_type: &str, format: &str) -> ExportRequest {
        ExportRequest {
            business_type: Some(business_type.into()),
            format: Some(format.into()),
            business_data: None,
        }
    }

    #[test]
    fn filenames_are_sanitised() {
        assert_eq!(sanitize_filename("Eco-lodges Business Plan"), "Eco-lodges_Business_Plan");
        assert_eq!(sanitize_filename("  Café & Bar!! "), "Caf_Bar");
        assert_eq!(sanitize_filename("___"), "");
    }

    #[test]
    fn html_is_escaped() {
        assert_eq!(escape_html(r#"<b>"Tom's" & co</b>"#), "&lt;b&gt;&quot;Tom&#039;s&quot; &amp; co&lt;/b&gt;");
    }

    #[test]
    fn each_format_has_its_payload() {
        let pdf = export(&request("Coffee Processing", "PDF")).unwrap();
        assert_eq!(pdf.format, ExportFormat::Pdf);
        assert_eq!(pdf.filename, "Coffee_Processing_Business_Plan.html");
        assert!(pdf.html.as_deref().unwrap().contains("<h1>Coffee Processing Business Plan</h1>"));

        let excel = export(&request("Coffee Processing", "excel")).unwrap();
        assert_eq!(excel.filename, "Coffee_Processing_Business_Plan.csv");
        let csv = excel.csv.unwrap();
        assert!(csv.starts_with("Business Plan Data\nBusiness Type,Coffee Processing\nTitle,Coffee Processing Business Plan\n"));
        assert!(csv.contains("\n\nBusiness Plan Sections\n1,Business Overview\n"));

        let slides = export(&request("Coffee Processing", "powerpoint")).unwrap();
        assert_eq!(slides.filename, "Coffee_Processing_Business_Plan_presentation.html");
        assert!(slides.html.unwrap().contains("Coffee Processing Business Plan - Presentation"));
    }

    #[test]
    fn unknown_business_falls_back_to_hiking_tours() {
        let file = export(&request("Space Elevator", "word")).unwrap();
        assert_eq!(file.filename, "Mountain_Hiking_Tours_Business_Plan.html");
    }

    #[test]
    fn overrides_replace_top_level_fields() {
        let overrides = json!({"title": "<Kinigi> Treks", "roi": "500%"});
        let plan = plan_data("Volcano Trekking", overrides.as_object()).unwrap();
        assert_eq!(plan.title, "<Kinigi> Treks");
        assert_eq!(plan.roi, "500%");
        assert_eq!(plan.break_even, crate::catalog::find("Volcano Trekking").unwrap().break_even);

        let html = plan_html(&plan);
        assert!(html.contains("&lt;Kinigi&gt; Treks"));
        assert!(!html.contains("<Kinigi>"));

        let bad = json!({"sections": "not a list"});
        assert!(matches!(plan_data("Volcano Trekking", bad.as_object()), Err(ExportError::InvalidBusinessData(_))));
    }

    #[test]
    fn request_validation() {
        let missing = ExportRequest { business_type: Some("Guesthouse".into()), ..Default::default() };
        assert!(matches!(export(&missing), Err(ExportError::MissingParameters)));
        let bad = export(&request("Guesthouse", "docx")).unwrap_err();
        assert_eq!(bad.to_string(), "Invalid format. Allowed: pdf, word, excel, powerpoint");
    }

    #[test]
    fn brief_uses_defaults_and_escapes_input() {
        let brief: PlanBrief = serde_json::from_value(json!({"missionStatement": "Feed <everyone>"})).unwrap();
        let html = brief_html(&brief);
        assert!(html.contains("<title>Business Plan - My Business</title>"));
        assert!(html.contains("My Business is a general business"));
        assert!(html.contains("Feed &lt;everyone&gt;"));
        assert!(html.contains("Convert to PDF"));
    }
}
