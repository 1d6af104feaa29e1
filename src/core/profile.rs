//! Profile business logic - spending windows, history filters and lifetime stats.
//!
//! Spending is bucketed by the shopper's local calendar: a purchase belongs to a day,
//! week (Sunday to Saturday) or month according to its date in the time zone passed in.
//! The window functions are pure; [`build_profile`] loads what they need.

use crate::{
    core::{
        account,
        purchase::{PurchaseRecord, get_purchase_history},
    },
    entities::{purchase, purchase_item, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeDelta, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use std::{collections::BTreeMap, str::FromStr};

/// A calendar window around a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// The reference date itself
    Day,
    /// Sunday through Saturday of the reference date's week
    Week,
    /// The reference date's calendar month
    Month,
}

impl Period {
    /// Whether `date` falls inside this period around `reference`.
    #[must_use]
    pub fn contains(self, reference: NaiveDate, date: NaiveDate) -> bool {
        match self {
            Self::Day => date == reference,
            Self::Week => {
                let offset = i64::from(reference.weekday().num_days_from_sunday());
                let days_from_start = date.signed_duration_since(reference).num_days() + offset;
                (0..7).contains(&days_from_start)
            }
            Self::Month => date.year() == reference.year() && date.month() == reference.month(),
        }
    }

    /// First and last date of this period around `reference`, both inclusive.
    ///
    /// `None` only at the edges of the representable calendar.
    #[must_use]
    pub fn bounds(self, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::Day => Some((reference, reference)),
            Self::Week => {
                let offset = u64::from(reference.weekday().num_days_from_sunday());
                let start = reference.checked_sub_days(Days::new(offset))?;
                let end = start.checked_add_days(Days::new(6))?;
                Some((start, end))
            }
            Self::Month => {
                let start = reference.with_day(1)?;
                let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
                Some((start, end))
            }
        }
    }
}

/// Sum of `total_spent` over the purchases whose local date falls inside `period`.
#[must_use]
pub fn spending_in<Tz: TimeZone>(
    purchases: &[purchase::Model],
    reference: NaiveDate,
    period: Period,
    tz: &Tz,
) -> f64 {
    purchases
        .iter()
        .filter(|p| period.contains(reference, p.date.with_timezone(tz).date_naive()))
        .map(|p| p.total_spent)
        .sum()
}

/// Day, week and month spending around one reference date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendingSummary {
    /// Date the windows are built around
    pub reference: NaiveDate,
    /// Spent on the reference date
    pub daily: f64,
    /// Spent in the reference date's Sunday–Saturday week
    pub weekly: f64,
    /// Spent in the reference date's calendar month
    pub monthly: f64,
}

/// Computes [`SpendingSummary`] for a set of purchases.
#[must_use]
pub fn spending_summary<Tz: TimeZone>(
    purchases: &[purchase::Model],
    reference: NaiveDate,
    tz: &Tz,
) -> SpendingSummary {
    SpendingSummary {
        reference,
        daily: spending_in(purchases, reference, Period::Day, tz),
        weekly: spending_in(purchases, reference, Period::Week, tz),
        monthly: spending_in(purchases, reference, Period::Month, tz),
    }
}

/// Which part of the purchase history to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    /// Purchases made today
    Day,
    /// Purchases made in the last seven days
    Week,
    /// Purchases made this calendar month
    Month,
    /// Every purchase
    #[default]
    All,
}

impl HistoryFilter {
    /// Whether a purchase made at `date` passes the filter, relative to `now`.
    #[must_use]
    pub fn matches<Tz: TimeZone>(self, now: &DateTime<Tz>, date: DateTime<Utc>) -> bool {
        let local = date.with_timezone(&now.timezone()).date_naive();
        let today = now.date_naive();
        match self {
            Self::Day => local == today,
            Self::Week => now
                .with_timezone(&Utc)
                .checked_sub_signed(TimeDelta::days(7))
                .is_none_or(|since| date >= since),
            Self::Month => local.year() == today.year() && local.month() == today.month(),
            Self::All => true,
        }
    }
}

impl FromStr for HistoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "today" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all" => Ok(Self::All),
            other => Err(Error::InvalidInput {
                message: format!("Unknown history filter '{other}'"),
            }),
        }
    }
}

/// Keeps the purchase records that pass `filter`.
#[must_use]
pub fn filter_history<Tz: TimeZone>(
    records: Vec<PurchaseRecord>,
    filter: HistoryFilter,
    now: &DateTime<Tz>,
) -> Vec<PurchaseRecord> {
    records
        .into_iter()
        .filter(|r| filter.matches(now, r.purchase.date))
        .collect()
}

/// Category with the greatest purchased quantity. Ties go to the alphabetically first.
#[must_use]
pub fn favorite_category(items: &[purchase_item::Model]) -> Option<String> {
    let mut units: BTreeMap<&str, i64> = BTreeMap::new();
    for item in items {
        *units.entry(item.category.as_str()).or_default() += i64::from(item.quantity);
    }

    let mut favorite: Option<(&str, i64)> = None;
    for (category, count) in units {
        if favorite.is_none_or(|(_, best)| count > best) {
            favorite = Some((category, count));
        }
    }
    favorite.map(|(category, _)| category.to_string())
}

/// Everything the `/profile` view shows.
#[derive(Debug, Clone)]
pub struct Profile {
    /// The account with its lifetime stats
    pub user: user::Model,
    /// Spending around the reference date
    pub spending: SpendingSummary,
    /// Σ `total_savings` over the whole history
    pub lifetime_savings: f64,
    /// History after applying the filter, newest first
    pub history: Vec<PurchaseRecord>,
}

/// Loads a user's history and builds their profile view.
///
/// Spending windows are built around `reference` in `now`'s time zone; the history
/// filter is applied relative to `now`.
///
/// # Errors
/// Returns [`Error::NotSignedUp`] if the user does not exist.
pub async fn build_profile<Tz: TimeZone>(
    db: &DatabaseConnection,
    user_id: i64,
    reference: NaiveDate,
    filter: HistoryFilter,
    now: &DateTime<Tz>,
) -> Result<Profile> {
    let user = account::get_user_by_id(db, user_id)
        .await?
        .ok_or(Error::NotSignedUp)?;
    let records = get_purchase_history(db, user_id).await?;

    let purchases: Vec<purchase::Model> = records.iter().map(|r| r.purchase.clone()).collect();
    let spending = spending_summary(&purchases, reference, &now.timezone());
    let lifetime_savings = purchases.iter().map(|p| p.total_savings).sum();

    Ok(Profile {
        user,
        spending,
        lifetime_savings,
        history: filter_history(records, filter, now),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{cart, purchase::close_purchase};
    use crate::test_utils::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn purchase_at(id: i64, when: &str, total_spent: f64) -> purchase::Model {
        purchase::Model {
            id,
            user_id: 1,
            date: at(when),
            total_spent,
            total_savings: 0.0,
        }
    }

    fn item(category: &str, quantity: i32) -> purchase_item::Model {
        purchase_item::Model {
            id: 0,
            purchase_id: 0,
            product_id: 0,
            name: "Item".to_string(),
            price: 1.0,
            store: "A".to_string(),
            category: category.to_string(),
            quantity,
            savings: 0.0,
        }
    }

    #[test]
    fn test_week_runs_sunday_to_saturday() {
        // 2024-05-15 is a Wednesday
        let reference = date(2024, 5, 15);
        assert!(Period::Week.contains(reference, date(2024, 5, 12)));
        assert!(Period::Week.contains(reference, date(2024, 5, 18)));
        assert!(!Period::Week.contains(reference, date(2024, 5, 11)));
        assert!(!Period::Week.contains(reference, date(2024, 5, 19)));

        assert_eq!(
            Period::Week.bounds(reference),
            Some((date(2024, 5, 12), date(2024, 5, 18)))
        );
        // A Sunday starts its own week
        assert_eq!(
            Period::Week.bounds(date(2024, 5, 19)),
            Some((date(2024, 5, 19), date(2024, 5, 25)))
        );
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            Period::Month.bounds(date(2024, 2, 10)),
            Some((date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(
            Period::Month.bounds(date(2023, 12, 31)),
            Some((date(2023, 12, 1), date(2023, 12, 31)))
        );
        assert!(Period::Month.contains(date(2024, 2, 10), date(2024, 2, 29)));
        assert!(!Period::Month.contains(date(2024, 2, 10), date(2023, 2, 10)));
    }

    #[test]
    fn test_spending_summary_windows() {
        let purchases = vec![
            purchase_at(1, "2024-05-15T10:00:00Z", 100.0), // same day
            purchase_at(2, "2024-05-12T00:00:00Z", 40.0),  // Sunday, same week
            purchase_at(3, "2024-05-11T23:59:59Z", 25.0),  // Saturday before, same month
            purchase_at(4, "2024-04-30T12:00:00Z", 999.0), // previous month
            purchase_at(5, "2025-05-15T10:00:00Z", 500.0), // next year
        ];

        let summary = spending_summary(&purchases, date(2024, 5, 15), &Utc);
        assert_eq!(summary.daily, 100.0);
        assert_eq!(summary.weekly, 140.0);
        assert_eq!(summary.monthly, 165.0);
    }

    #[test]
    fn test_spending_empty_history() {
        let summary = spending_summary(&[], date(2024, 5, 15), &Utc);
        assert_eq!(summary.daily, 0.0);
        assert_eq!(summary.weekly, 0.0);
        assert_eq!(summary.monthly, 0.0);
    }

    #[test]
    fn test_spending_uses_local_calendar() {
        // 01:00 UTC on the 16th is still the 15th in UTC-3
        let purchases = vec![purchase_at(1, "2024-05-16T01:00:00Z", 80.0)];
        let buenos_aires = FixedOffset::west_opt(3 * 3600).unwrap();

        assert_eq!(
            spending_in(&purchases, date(2024, 5, 15), Period::Day, &buenos_aires),
            80.0
        );
        assert_eq!(
            spending_in(&purchases, date(2024, 5, 15), Period::Day, &Utc),
            0.0
        );
    }

    #[test]
    fn test_history_filter_matches() {
        let now = at("2024-05-15T12:00:00Z");

        assert!(HistoryFilter::Day.matches(&now, at("2024-05-15T00:30:00Z")));
        assert!(!HistoryFilter::Day.matches(&now, at("2024-05-14T23:30:00Z")));

        assert!(HistoryFilter::Week.matches(&now, at("2024-05-08T12:00:00Z")));
        assert!(!HistoryFilter::Week.matches(&now, at("2024-05-08T11:59:59Z")));

        assert!(HistoryFilter::Month.matches(&now, at("2024-05-01T00:00:00Z")));
        assert!(!HistoryFilter::Month.matches(&now, at("2024-04-30T23:59:59Z")));

        assert!(HistoryFilter::All.matches(&now, at("2001-01-01T00:00:00Z")));
    }

    #[test]
    fn test_history_filter_from_str() {
        assert_eq!("today".parse::<HistoryFilter>().unwrap(), HistoryFilter::Day);
        assert_eq!(" Week ".parse::<HistoryFilter>().unwrap(), HistoryFilter::Week);
        assert_eq!("month".parse::<HistoryFilter>().unwrap(), HistoryFilter::Month);
        assert_eq!("ALL".parse::<HistoryFilter>().unwrap(), HistoryFilter::All);
        assert!(matches!(
            "year".parse::<HistoryFilter>(),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_favorite_category() {
        assert_eq!(favorite_category(&[]), None);

        let items = vec![item("Snacks", 2), item("Bebidas", 1), item("Bebidas", 2)];
        assert_eq!(favorite_category(&items).as_deref(), Some("Bebidas"));

        // Tie between Cocina and Limpieza goes to Cocina
        let tied = vec![item("Limpieza", 2), item("Cocina", 2)];
        assert_eq!(favorite_category(&tied).as_deref(), Some("Cocina"));
    }

    #[tokio::test]
    async fn test_build_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "user1").await?;
        let milk = create_test_product(&db, "Milk", 100.0, "A").await?;
        create_test_product(&db, "Milk", 150.0, "B").await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;
        cart::add_to_cart(&db, user.id, milk.id).await?;
        close_purchase(&db, user.id).await?;

        let now = Utc::now();
        let profile = build_profile(&db, user.id, now.date_naive(), HistoryFilter::Day, &now).await?;
        assert_eq!(profile.user.total_purchases, 1);
        assert_eq!(profile.spending.daily, 200.0);
        assert_eq!(profile.spending.monthly, 200.0);
        assert_eq!(profile.lifetime_savings, 100.0);
        assert_eq!(profile.history.len(), 1);

        let result = build_profile(&db, 404, now.date_naive(), HistoryFilter::All, &now).await;
        assert!(matches!(result, Err(Error::NotSignedUp)));
        Ok(())
    }
}
