//! Dashboard analytics.
//!
//! Everything here is *simulated*: the figures are seeded from the dashboard
//! document and the usage log, then jittered so the charts look alive. None of
//! it is a real measurement and nothing downstream should treat it as one.

use chrono::{Datelike, Local};
use rand::Rng;
use serde_json::{json, Map, Value};
use std::str::FromStr;

use crate::activity_log::ActivityLog;
use crate::catalog::{BusinessProfile, BUSINESSES};
use crate::dashboard::{DashboardStore, StoreError};

const CHART_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const BASE_REVENUE: f64 = 12_000_000.0;
const BASE_REGISTRATIONS: f64 = 8.0;
const DEFAULT_TOTAL_USERS: i64 = 2847;
const TOTAL_BUSINESSES: i64 = 156;
/// The dashboard document records revenue in thousands of RWF.
const DEFAULT_REVENUE_THOUSANDS: i64 = 32_450;

/// Demand multiplier for a month in Musanze's tourism calendar. `month` is 1-based.
pub fn seasonal_factor(month: u32) -> f64 {
    match month {
        1 => 1.1,
        2 => 1.2,
        3 => 0.9,
        4 => 1.0,
        5 => 1.1,
        6 => 1.3,
        7 => 1.4,
        8 => 1.3,
        9 => 1.0,
        10 => 0.9,
        11 => 0.8,
        12 => 1.2,
        _ => 1.0,
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn growth_rate(new: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(new as f64 / total as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    RevenueTrends,
    BusinessRegistrations,
    UserMetrics,
    BusinessMetrics,
    SuccessRates,
    MonthlyStats,
    Realtime,
    All,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown analytics report '{0}'")]
pub struct UnknownReport(pub String);

impl FromStr for Report {
    type Err = UnknownReport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "revenue_trends" => Report::RevenueTrends,
            "business_registrations" => Report::BusinessRegistrations,
            "user_metrics" => Report::UserMetrics,
            "business_metrics" => Report::BusinessMetrics,
            "success_rates" => Report::SuccessRates,
            "monthly_stats" => Report::MonthlyStats,
            "realtime" => Report::Realtime,
            "all_analytics" => Report::All,
            other => return Err(UnknownReport(other.to_string())),
        })
    }
}

pub struct SimulatedAnalytics<'a> {
    dashboard: &'a DashboardStore,
    activity: &'a ActivityLog,
}

impl<'a> SimulatedAnalytics<'a> {
    pub fn new(dashboard: &'a DashboardStore, activity: &'a ActivityLog) -> Self {
        Self { dashboard, activity }
    }

    pub fn report(&self, report: Report) -> Result<Value, StoreError> {
        Ok(match report {
            Report::RevenueTrends => self.revenue_trends(),
            Report::BusinessRegistrations => self.business_registrations(),
            Report::UserMetrics => self.user_metrics()?,
            Report::BusinessMetrics => self.business_metrics(),
            Report::SuccessRates => self.success_rates(),
            Report::MonthlyStats => self.monthly_stats()?,
            Report::Realtime => self.realtime(),
            Report::All => self.all()?,
        })
    }

    fn stored_stat(&self, key: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.dashboard.document()?.stats.get(key).and_then(Value::as_i64))
    }

    pub fn revenue_trends(&self) -> Value {
        let mut rng = rand::thread_rng();
        let data: Vec<f64> = CHART_MONTHS
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let growth = 1.0 + i as f64 * 0.15;
                let variation = 0.8 + rng.gen_range(0..=40) as f64 / 100.0;
                let revenue = BASE_REVENUE * seasonal_factor(i as u32 + 1) * growth * variation;
                round1(revenue / 1_000_000.0)
            })
            .collect();

        json!({
            "labels": CHART_MONTHS,
            "datasets": [{
                "label": "Business Revenue (M RWF)",
                "data": data,
                "borderColor": "#007bff",
                "backgroundColor": "rgba(0, 123, 255, 0.1)",
                "tension": 0.4,
                "fill": true,
            }],
        })
    }

    pub fn business_registrations(&self) -> Value {
        let mut rng = rand::thread_rng();
        let data: Vec<i64> = CHART_MONTHS
            .iter()
            .enumerate()
            .map(|(i, _)| {
                let growth = 1.0 + i as f64 * 0.25;
                let variation = 0.7 + rng.gen_range(0..=60) as f64 / 100.0;
                (BASE_REGISTRATIONS * seasonal_factor(i as u32 + 1) * growth * variation).round() as i64
            })
            .collect();

        json!({
            "labels": CHART_MONTHS,
            "datasets": [{
                "label": "New Business Registrations",
                "data": data,
                "backgroundColor": "rgba(40, 167, 69, 0.8)",
                "borderColor": "#28a745",
                "borderWidth": 2,
                "borderRadius": 4,
            }],
        })
    }

    pub fn user_metrics(&self) -> Result<Value, StoreError> {
        let mut rng = rand::thread_rng();
        let total = self.stored_stat("total_users")?.unwrap_or(DEFAULT_TOTAL_USERS);
        let new = rng.gen_range(15..=35);
        Ok(json!({
            "total_users": total,
            "active_users": total.saturating_add(rng.gen_range(-100..=200)),
            "new_users": new,
            "growth_rate": growth_rate(new, total),
        }))
    }

    pub fn business_metrics(&self) -> Value {
        let mut rng = rand::thread_rng();
        let new = rng.gen_range(8..=15);
        json!({
            "total_businesses": TOTAL_BUSINESSES,
            "active_businesses": TOTAL_BUSINESSES + rng.gen_range(-5..=10),
            "new_businesses": new,
            "growth_rate": growth_rate(new, TOTAL_BUSINESSES),
        })
    }

    /// Fixed per-business rates from the catalog. Ties go to the earlier entry.
    pub fn success_rates(&self) -> Value {
        let rates: Map<String, Value> = BUSINESSES
            .iter()
            .map(|b| (b.name.to_string(), json!(b.success_rate)))
            .collect();
        let sum: u32 = BUSINESSES.iter().map(|b| b.success_rate).sum();
        let overall = round1(sum as f64 / BUSINESSES.len().max(1) as f64);

        let pick = |better: fn(u32, u32) -> bool| {
            BUSINESSES
                .iter()
                .fold(None::<&BusinessProfile>, |best, b| match best {
                    Some(cur) if !better(b.success_rate, cur.success_rate) => Some(cur),
                    _ => Some(b),
                })
                .map(|b| b.name)
        };

        json!({
            "overall_success_rate": overall,
            "business_type_rates": rates,
            "top_performing": pick(|a, b| a > b),
            "improvement_areas": pick(|a, b| a < b),
        })
    }

    pub fn monthly_stats(&self) -> Result<Value, StoreError> {
        let mut rng = rand::thread_rng();
        let now = Local::now();
        let base = self
            .stored_stat("revenue_generated")?
            .unwrap_or(DEFAULT_REVENUE_THOUSANDS)
            .saturating_mul(1000);
        Ok(json!({
            "month": now.format("%b").to_string(),
            "year": now.year().to_string(),
            "revenue_generated": base.saturating_add(rng.gen_range(-2_000_000..=5_000_000)),
            "active_users": rng.gen_range(2500..=3000),
            "total_businesses": rng.gen_range(150..=165),
            "new_registrations": rng.gen_range(12..=25),
            "success_rate": rng.gen_range(90..=98),
        }))
    }

    /// Today's traffic from the usage log; invented numbers when there is no log.
    pub fn realtime(&self) -> Value {
        let mut rng = rand::thread_rng();
        let today = self.activity.today().unwrap_or_else(|e| {
            log::warn!("usage log unreadable, falling back to simulated traffic: {}", e);
            None
        });
        let (online, sessions, views) = match today {
            Some(day) => (
                day.unique_visitors as i64,
                day.entries as i64,
                day.entries as i64 * rng.gen_range(2..=5),
            ),
            None => (
                rng.gen_range(45..=85),
                rng.gen_range(12..=28),
                rng.gen_range(150..=300),
            ),
        };
        json!({
            "online_users": online,
            "active_sessions": sessions,
            "page_views_today": views,
            "business_plans_generated": rng.gen_range(8..=15),
            "chat_messages": rng.gen_range(25..=50),
        })
    }

    pub fn all(&self) -> Result<Value, StoreError> {
        Ok(json!({
            "revenue_trends": self.revenue_trends(),
            "business_registrations": self.business_registrations(),
            "user_metrics": self.user_metrics()?,
            "business_metrics": self.business_metrics(),
            "success_rates": self.success_rates(),
            "monthly_stats": self.monthly_stats()?,
            "last_updated": Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            "data_source": "InnoStart Analytics Engine",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ClientInfo;

    struct Fixture {
        _dir: tempfile::TempDir,
        dashboard: DashboardStore,
        activity: ActivityLog,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let dashboard = DashboardStore::open(dir.path().join("dashboard.json")).unwrap();
        let activity = ActivityLog::new(dir.path().join("activity.log"));
        Fixture { _dir: dir, dashboard, activity }
    }

    #[test]
    fn report_names_parse() {
        assert_eq!("all_analytics".parse::<Report>().unwrap(), Report::All);
        assert_eq!("realtime".parse::<Report>().unwrap(), Report::Realtime);
        assert!("nope".parse::<Report>().is_err());
    }

    #[test]
    fn revenue_chart_stays_in_its_envelope() {
        let f = fixture();
        let chart = SimulatedAnalytics::new(&f.dashboard, &f.activity).revenue_trends();
        let data = chart["datasets"][0]["data"].as_array().unwrap();
        assert_eq!(data.len(), 6);
        for (i, v) in data.iter().enumerate() {
            let expected = 12.0 * seasonal_factor(i as u32 + 1) * (1.0 + i as f64 * 0.15);
            let v = v.as_f64().unwrap();
            assert!(v >= round1(expected * 0.8) - 0.1 && v <= round1(expected * 1.2) + 0.1);
        }
        assert_eq!(chart["datasets"][0]["label"], "Business Revenue (M RWF)");
    }

    #[test]
    fn user_metrics_start_from_the_stored_total() {
        let f = fixture();
        let metrics = SimulatedAnalytics::new(&f.dashboard, &f.activity).user_metrics().unwrap();
        assert_eq!(metrics["total_users"], 847);
        let active = metrics["active_users"].as_i64().unwrap();
        assert!((747..=1047).contains(&active));
    }

    #[test]
    fn huge_stored_values_saturate() {
        let f = fixture();
        let patch = json!({"total_users": i64::MAX, "revenue_generated": i64::MAX / 10});
        f.dashboard.update_stats(patch.as_object().cloned().unwrap()).unwrap();
        let analytics = SimulatedAnalytics::new(&f.dashboard, &f.activity);

        let metrics = analytics.user_metrics().unwrap();
        assert!(metrics["active_users"].as_i64().unwrap() >= i64::MAX - 100);
        let monthly = analytics.monthly_stats().unwrap();
        assert!(monthly["revenue_generated"].as_i64().unwrap() >= i64::MAX - 2_000_000);
    }

    #[test]
    fn success_rates_summarise_the_catalog() {
        let f = fixture();
        let rates = SimulatedAnalytics::new(&f.dashboard, &f.activity).success_rates();
        assert_eq!(rates["overall_success_rate"], 90.7);
        assert_eq!(rates["top_performing"], "Local Transport");
        assert_eq!(rates["improvement_areas"], "Internet Cafe");
        assert_eq!(rates["business_type_rates"]["Eco-lodges"], 90);
    }

    #[test]
    fn realtime_counts_the_usage_log() {
        let f = fixture();
        let analytics = SimulatedAnalytics::new(&f.dashboard, &f.activity);

        let simulated = analytics.realtime();
        assert!((45..=85).contains(&simulated["online_users"].as_i64().unwrap()));

        let visitor = ClientInfo { ip: Some("10.1.1.1".into()), user_agent: None };
        f.activity.record("chat", Value::Null, &visitor).unwrap();
        f.activity.record("ideas", Value::Null, &visitor).unwrap();

        let live = analytics.realtime();
        assert_eq!(live["online_users"], 1);
        assert_eq!(live["active_sessions"], 2);
        assert!((4..=10).contains(&live["page_views_today"].as_i64().unwrap()));
    }

    #[test]
    fn all_analytics_bundles_every_report() {
        let f = fixture();
        let all = SimulatedAnalytics::new(&f.dashboard, &f.activity).report(Report::All).unwrap();
        for key in ["revenue_trends", "business_registrations", "user_metrics", "business_metrics", "success_rates", "monthly_stats"] {
            assert!(all.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(all["data_source"], "InnoStart Analytics Engine");
    }
}
