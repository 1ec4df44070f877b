//! Sales analytics over a set of orders.
//!
//! Windows and per-day buckets use the restaurant's local clock; see [`crate::clock`].

use crate::clock::{local_date_in, start_of_day_in};
use crate::model::{Order, OrderStatus};
use crate::money::{to_decimal, to_f64};
use chrono::{DateTime, Datelike, Local, Months, NaiveDate, TimeDelta, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Window over `created_at`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFilter {
    #[default]
    Today,
    /// Last 7 days.
    Week,
    /// Last 3 months.
    Month,
}

impl TimeFilter {
    /// Earliest `created_at` inside the window ending at `now`.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.since_in(now, &Local)
    }

    pub fn since_in<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
        match self {
            TimeFilter::Today => start_of_day_in(now, tz),
            TimeFilter::Week => now - TimeDelta::days(7),
            TimeFilter::Month => now
                .checked_sub_months(Months::new(3))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    pub fn contains(&self, order: &Order, now: DateTime<Utc>) -> bool {
        order.created_at >= self.since(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    pub product_id: String,
    pub name: String,
    pub total_sold: u32,
    pub revenue: f64,
    /// Units sold per day, oldest first.
    pub sales_over_time: Vec<(NaiveDate, u32)>,
    /// e.g. `"Fridays"`; `None` without sales.
    pub most_active_day: Option<String>,
    pub trend: Trend,
}

#[derive(Default)]
struct Tally {
    name: String,
    sold: u32,
    revenue: Decimal,
    by_date: BTreeMap<NaiveDate, u32>,
    by_weekday: HashMap<Weekday, u32>,
}

/// Per-product sales, best sellers first. Cancelled and denied orders do not count.
pub fn product_sales<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Vec<ProductSales> {
    product_sales_in(orders, &Local)
}

/// [`product_sales`] with days counted in `tz`.
pub fn product_sales_in<'a, Tz: TimeZone>(
    orders: impl IntoIterator<Item = &'a Order>,
    tz: &Tz,
) -> Vec<ProductSales> {
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for order in orders {
        if matches!(order.status, OrderStatus::Cancelled | OrderStatus::Denied) {
            continue;
        }
        let date = local_date_in(order.created_at, tz);
        for item in &order.metadata {
            let tally = tallies.entry(item.menu_item_id.clone()).or_default();
            if tally.name.is_empty() {
                tally.name = item.name.clone();
            }
            tally.sold += item.quantity;
            tally.revenue += to_decimal(item.line_total());
            *tally.by_date.entry(date).or_default() += item.quantity;
            *tally.by_weekday.entry(date.weekday()).or_default() += item.quantity;
        }
    }

    let mut sales: Vec<ProductSales> = tallies
        .into_iter()
        .map(|(product_id, tally)| {
            let sales_over_time: Vec<(NaiveDate, u32)> = tally.by_date.into_iter().collect();
            ProductSales {
                product_id,
                name: tally.name,
                total_sold: tally.sold,
                revenue: to_f64(tally.revenue),
                trend: trend(&sales_over_time),
                most_active_day: busiest_weekday(&tally.by_weekday).map(plural_weekday),
                sales_over_time,
            }
        })
        .collect();
    sales.sort_by(|a, b| {
        b.total_sold
            .cmp(&a.total_sold)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    sales
}

/// Compares the units of the first half of the series with the second half.
fn trend(series: &[(NaiveDate, u32)]) -> Trend {
    if series.len() < 2 {
        return Trend::Flat;
    }
    let (first, second) = series.split_at(series.len() / 2);
    let sum = |half: &[(NaiveDate, u32)]| half.iter().map(|(_, units)| *units).sum::<u32>();
    match sum(second).cmp(&sum(first)) {
        std::cmp::Ordering::Greater => Trend::Up,
        std::cmp::Ordering::Less => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Flat,
    }
}

// Ties go to the earlier day of the week, Sunday first.
fn busiest_weekday(by_weekday: &HashMap<Weekday, u32>) -> Option<Weekday> {
    by_weekday
        .iter()
        .max_by(|(day_a, a), (day_b, b)| {
            a.cmp(b).then_with(|| {
                day_b
                    .num_days_from_sunday()
                    .cmp(&day_a.num_days_from_sunday())
            })
        })
        .map(|(day, _)| *day)
}

fn plural_weekday(day: Weekday) -> String {
    let name = match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    format!("{name}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderId, OrderLineItem, OrderType, PaymentStatus};
    use chrono::TimeZone;

    fn order(id: u32, day: u32, status: OrderStatus, items: &[(&str, u32, f64)]) -> Order {
        let created_at = Utc.with_ymd_and_hms(2024, 6, day, 18, 0, 0).unwrap();
        Order {
            id: OrderId(id),
            user_id: None,
            status,
            payment_status: PaymentStatus::Paid,
            order_type: OrderType::Pickup,
            subtotal: 0.0,
            delivery_fee: 0.0,
            points_redeemed: 0,
            points_discount: 0.0,
            order_total: 0.0,
            points_earned: None,
            delivery_address: None,
            phone: "555-0100".to_string(),
            full_name: "Sam".to_string(),
            payment_intent_id: None,
            payment_error: None,
            metadata: items
                .iter()
                .map(|(id, quantity, price)| OrderLineItem {
                    menu_item_id: id.to_string(),
                    name: id.to_uppercase(),
                    quantity: *quantity,
                    price: *price,
                    image_url: None,
                    options: Default::default(),
                })
                .collect(),
            created_at,
            accepted_at: None,
            completed_at: None,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_product_sales_ranks_and_excludes_cancelled() {
        // 2024-06-03 is a Monday.
        let orders = vec![
            order(1, 3, OrderStatus::Completed, &[("burger", 2, 8.0), ("fries", 1, 3.5)]),
            order(2, 4, OrderStatus::Completed, &[("fries", 4, 3.5)]),
            order(3, 4, OrderStatus::Cancelled, &[("burger", 10, 8.0)]),
            order(4, 10, OrderStatus::Ready, &[("fries", 1, 3.5)]),
        ];

        let sales = product_sales_in(&orders, &Utc);
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].product_id, "fries");
        assert_eq!(sales[0].total_sold, 6);
        assert_eq!(sales[0].revenue, 21.0);
        assert_eq!(sales[0].most_active_day.as_deref(), Some("Tuesdays"));
        assert_eq!(sales[0].sales_over_time.len(), 3);

        assert_eq!(sales[1].product_id, "burger");
        assert_eq!(sales[1].total_sold, 2);
        assert_eq!(sales[1].revenue, 16.0);
        assert_eq!(sales[1].most_active_day.as_deref(), Some("Mondays"));
        assert_eq!(sales[1].trend, Trend::Flat);
    }

    #[test]
    fn test_trend_compares_halves() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        assert_eq!(trend(&[(d(1), 1), (d(2), 5)]), Trend::Up);
        assert_eq!(trend(&[(d(1), 5), (d(2), 1), (d(3), 1)]), Trend::Down);
        assert_eq!(trend(&[(d(1), 2), (d(2), 2)]), Trend::Flat);
    }

    #[test]
    fn test_time_filter_windows() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 15, 30, 0).unwrap();
        assert_eq!(
            TimeFilter::Today.since_in(now, &Utc),
            Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap()
        );
        assert_eq!(
            TimeFilter::Week.since_in(now, &Utc),
            Utc.with_ymd_and_hms(2024, 6, 3, 15, 30, 0).unwrap()
        );
        assert_eq!(
            TimeFilter::Month.since_in(now, &Utc),
            Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_days_are_counted_on_the_local_clock() {
        // 18:00 UTC on Monday the 3rd is already Tuesday in UTC+8.
        let orders = vec![order(1, 3, OrderStatus::Completed, &[("fries", 1, 3.5)])];
        let east = chrono::FixedOffset::east_opt(8 * 3600).unwrap();

        let sales = product_sales_in(&orders, &east);
        assert_eq!(
            sales[0].sales_over_time,
            vec![(NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(), 1)]
        );
        assert_eq!(sales[0].most_active_day.as_deref(), Some("Tuesdays"));

        let now = Utc.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap();
        assert_eq!(
            TimeFilter::Today.since_in(now, &east),
            Utc.with_ymd_and_hms(2024, 6, 10, 16, 0, 0).unwrap()
        );
    }
}
