//! Summary statistics over rollups and snapshot datasets.
//!
//! Every division goes through [`safe_div`], so empty or zero inputs produce
//! zeros rather than NaN or infinity.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::Record;
use crate::rollup::DailyRollup;
use crate::snapshot::{DailyUserActivity, PoolSnapshot};

/// Number of trailing periods in [`Metrics::trailing_average`].
pub const TRAILING_WINDOW: usize = 7;

/// `numerator / denominator`, or 0 when the denominator is zero or the result
/// is not finite.
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        0.0
    }
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
pub fn calculate_growth(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    safe_div(current - previous, previous) * 100.0
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    safe_div(part, whole) * 100.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TopPeriod {
    pub date: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Metrics {
    pub total: f64,
    /// Total divided by the requested window length, not the populated days.
    pub average_per_period: f64,
    pub trailing_average: f64,
    pub growth_percentage: f64,
    pub top_period: TopPeriod,
}

/// Derives summary metrics from an ascending rollup.
///
/// `window_periods` is the length of the requested window in periods (for a
/// daily rollup over `30d`, 30), as counted by
/// [`Granularity::periods_in`](crate::rollup::Granularity::periods_in).
/// Growth compares the last two entries; the top period keeps the earliest
/// entry on ties.
pub fn compute_metrics(rollup: &[DailyRollup], window_periods: usize) -> Metrics {
    let total: f64 = rollup.iter().map(|r| r.total).sum();

    let average_per_period = safe_div(total, window_periods as f64);

    let trailing = &rollup[rollup.len().saturating_sub(TRAILING_WINDOW)..];
    let trailing_sum: f64 = trailing.iter().map(|r| r.total).sum();
    let trailing_average = safe_div(trailing_sum, trailing.len() as f64);

    let growth_percentage = match rollup {
        [.., prev, last] => calculate_growth(last.total, prev.total),
        _ => 0.0,
    };

    let mut top_period = TopPeriod::default();
    if let Some((first, rest)) = rollup.split_first() {
        top_period = TopPeriod {
            date: first.date.clone(),
            total: first.total,
        };
        for entry in rest {
            if entry.total > top_period.total {
                top_period = TopPeriod {
                    date: entry.date.clone(),
                    total: entry.total,
                };
            }
        }
    }

    Metrics {
        total,
        average_per_period,
        trailing_average,
        growth_percentage,
        top_period,
    }
}

/// Limit-order counts and filled volume.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OrderStats {
    pub total_orders: usize,
    pub open_orders: usize,
    pub filled_orders: usize,
    pub canceled_orders: usize,
    /// USD value of filled orders.
    pub total_volume: f64,
    /// Mean USD value of filled orders.
    pub average_order_size: f64,
}

pub fn order_stats(orders: &[Record]) -> OrderStats {
    let mut stats = OrderStats {
        total_orders: orders.len(),
        ..OrderStats::default()
    };
    for order in orders {
        let status = order.status.as_deref().unwrap_or("open").to_lowercase();
        match status.as_str() {
            "open" => stats.open_orders += 1,
            "filled" => {
                stats.filled_orders += 1;
                stats.total_volume += order.usd_value;
            }
            "canceled" | "cancelled" => stats.canceled_orders += 1,
            _ => {}
        }
    }
    stats.average_order_size = safe_div(stats.total_volume, stats.filled_orders as f64);
    stats
}

/// Groups orders by trading pair. Orders without a pair go under `unknown`.
pub fn orders_by_pair(orders: &[Record]) -> BTreeMap<String, Vec<&Record>> {
    let mut grouped: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for order in orders {
        let pair = order
            .pair
            .clone()
            .unwrap_or_else(|| crate::record::UNKNOWN_CATEGORY.to_string());
        grouped.entry(pair).or_default().push(order);
    }
    grouped
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeader {
    pub name: String,
    pub value: f64,
}

/// The category with the largest value summed across all periods, e.g. the
/// most liquidated token. `None` when no category has a positive value.
pub fn top_category(rollup: &[DailyRollup]) -> Option<CategoryLeader> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for period in rollup {
        for (name, cat) in &period.categories {
            *totals.entry(name.as_str()).or_default() += cat.value;
        }
    }
    totals
        .into_iter()
        .filter(|(_, value)| *value > 0.0)
        .fold(None, |best: Option<CategoryLeader>, (name, value)| match best {
            Some(b) if b.value >= value => Some(b),
            _ => Some(CategoryLeader {
                name: name.to_string(),
                value,
            }),
        })
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PoolSummary {
    pub total_tvl: f64,
    pub total_volume: f64,
    pub average_utilization: f64,
}

pub fn pool_summary(pools: &[PoolSnapshot]) -> PoolSummary {
    let total_tvl = pools.iter().map(|p| p.tvl).sum();
    let total_volume = pools.iter().map(|p| p.volume_24h).sum();
    let utilization: f64 = pools.iter().map(|p| p.utilization_rate).sum();
    PoolSummary {
        total_tvl,
        total_volume,
        average_utilization: safe_div(utilization, pools.len() as f64),
    }
}

/// Active-user metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UserMetrics {
    /// Unique users on the latest day.
    pub dau: f64,
    /// Mean daily unique users over the latest 7 days.
    pub wau: f64,
    /// Mean daily unique users over the latest 30 days.
    pub mau: f64,
    /// Returning users as a percentage of unique users, across all days.
    pub retention_rate: f64,
    pub average_transactions_per_user: f64,
}

/// Computes active-user metrics. Input order does not matter; days are
/// sorted by date first.
pub fn user_metrics(activity: &[DailyUserActivity]) -> UserMetrics {
    let mut days: Vec<&DailyUserActivity> = activity.iter().collect();
    days.sort_by_key(|d| d.date);

    let mean_unique = |n: usize| {
        let window = &days[days.len().saturating_sub(n)..];
        let sum: u64 = window.iter().map(|d| d.unique_users).sum();
        safe_div(sum as f64, window.len() as f64)
    };

    let unique: u64 = days.iter().map(|d| d.unique_users).sum();
    let returning: u64 = days.iter().map(|d| d.returning_users).sum();
    let transactions: u64 = days.iter().map(|d| d.total_transactions).sum();

    UserMetrics {
        dau: days.last().map(|d| d.unique_users as f64).unwrap_or(0.0),
        wau: mean_unique(7),
        mau: mean_unique(30),
        retention_rate: percentage_of(returning as f64, unique as f64),
        average_transactions_per_user: safe_div(transactions as f64, unique as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollup::CategoryTotals;
    use chrono::NaiveDate;

    fn day(date: &str, total: f64) -> DailyRollup {
        DailyRollup {
            date: date.to_string(),
            total,
            count: 1,
            ..DailyRollup::default()
        }
    }

    #[test]
    fn two_day_scenario() {
        let rollup = vec![day("2024-01-01", 100.0), day("2024-01-02", 200.0)];
        let m = compute_metrics(&rollup, 2);
        assert_eq!(m.total, 300.0);
        assert_eq!(m.growth_percentage, 100.0);
        assert_eq!(m.average_per_period, 150.0);
        assert_eq!(m.trailing_average, 150.0);
        assert_eq!(m.top_period.date, "2024-01-02");
        assert_eq!(m.top_period.total, 200.0);
    }

    #[test]
    fn average_divides_by_window_not_populated_days() {
        let rollup = vec![day("2024-01-01", 300.0)];
        assert_eq!(compute_metrics(&rollup, 30).average_per_period, 10.0);
        assert_eq!(compute_metrics(&rollup, 0).average_per_period, 0.0);
    }

    #[test]
    fn trailing_average_uses_last_seven() {
        let rollup: Vec<DailyRollup> = (1..=10)
            .map(|i| day(&format!("2024-01-{i:02}"), i as f64))
            .collect();
        // mean of 4..=10
        assert_eq!(compute_metrics(&rollup, 10).trailing_average, 7.0);
    }

    #[test]
    fn growth_edge_cases() {
        assert_eq!(compute_metrics(&[day("d", 5.0)], 1).growth_percentage, 0.0);
        let from_zero = vec![day("a", 0.0), day("b", 50.0)];
        assert_eq!(compute_metrics(&from_zero, 2).growth_percentage, 0.0);
        let flat = vec![day("a", 42.0), day("b", 42.0), day("c", 42.0)];
        assert_eq!(compute_metrics(&flat, 3).growth_percentage, 0.0);
        let down = vec![day("a", 200.0), day("b", 50.0)];
        assert_eq!(compute_metrics(&down, 2).growth_percentage, -75.0);
    }

    #[test]
    fn top_period_ties_keep_earliest() {
        let rollup = vec![day("a", 10.0), day("b", 30.0), day("c", 30.0)];
        assert_eq!(compute_metrics(&rollup, 3).top_period.date, "b");
    }

    #[test]
    fn empty_rollup_zeroed() {
        let m = compute_metrics(&[], 7);
        assert_eq!(m, Metrics::default());
        assert_eq!(m.top_period.date, "");
    }

    #[test]
    fn helpers_are_zero_guarded() {
        assert_eq!(safe_div(1.0, 0.0), 0.0);
        assert_eq!(safe_div(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert_eq!(calculate_growth(10.0, 0.0), 0.0);
        assert_eq!(calculate_growth(150.0, 100.0), 50.0);
        assert_eq!(percentage_of(1.0, 0.0), 0.0);
        assert_eq!(percentage_of(1.0, 4.0), 25.0);
    }

    #[test]
    fn order_stats_counts_by_status() {
        let orders = vec![
            Record::new(0, "a").with_status("open").with_usd_value(10.0),
            Record::new(0, "a").with_status("FILLED").with_usd_value(100.0),
            Record::new(0, "a").with_status("filled").with_usd_value(300.0),
            Record::new(0, "a").with_status("cancelled").with_usd_value(7.0),
            Record::new(0, "a").with_usd_value(1.0),
        ];
        let stats = order_stats(&orders);
        assert_eq!(stats.total_orders, 5);
        assert_eq!(stats.open_orders, 2);
        assert_eq!(stats.filled_orders, 2);
        assert_eq!(stats.canceled_orders, 1);
        assert_eq!(stats.total_volume, 400.0);
        assert_eq!(stats.average_order_size, 200.0);
    }

    #[test]
    fn order_stats_empty() {
        assert_eq!(order_stats(&[]), OrderStats::default());
    }

    #[test]
    fn orders_grouped_by_pair() {
        let orders = vec![
            Record::new(0, "a").with_pair("SOL/USDC"),
            Record::new(1, "b").with_pair("SOL/USDC"),
            Record::new(2, "c"),
        ];
        let grouped = orders_by_pair(&orders);
        assert_eq!(grouped["SOL/USDC"].len(), 2);
        assert_eq!(grouped["unknown"].len(), 1);
    }

    #[test]
    fn top_category_across_periods() {
        let mut a = day("a", 0.0);
        a.categories.insert(
            "SOL".into(),
            CategoryTotals {
                amount: 1.0,
                value: 20.0,
            },
        );
        a.categories.insert(
            "BONK".into(),
            CategoryTotals {
                amount: 1e6,
                value: 30.0,
            },
        );
        let mut b = day("b", 0.0);
        b.categories.insert(
            "SOL".into(),
            CategoryTotals {
                amount: 1.0,
                value: 20.0,
            },
        );
        let leader = top_category(&[a, b]).unwrap();
        assert_eq!(leader.name, "SOL");
        assert_eq!(leader.value, 40.0);
        assert!(top_category(&[day("x", 5.0)]).is_none());
    }

    #[test]
    fn pool_summary_averages_utilization() {
        let pools = vec![
            PoolSnapshot {
                tvl: 100.0,
                volume_24h: 10.0,
                utilization_rate: 20.0,
                ..PoolSnapshot::default()
            },
            PoolSnapshot {
                tvl: 300.0,
                volume_24h: 5.0,
                utilization_rate: 60.0,
                ..PoolSnapshot::default()
            },
        ];
        let summary = pool_summary(&pools);
        assert_eq!(summary.total_tvl, 400.0);
        assert_eq!(summary.total_volume, 15.0);
        assert_eq!(summary.average_utilization, 40.0);
        assert_eq!(pool_summary(&[]), PoolSummary::default());
    }

    fn activity(day: u32, unique: u64, returning: u64, tx: u64) -> DailyUserActivity {
        DailyUserActivity {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            unique_users: unique,
            new_users: unique - returning,
            returning_users: returning,
            total_transactions: tx,
        }
    }

    #[test]
    fn user_metrics_windows() {
        let mut days: Vec<DailyUserActivity> =
            (1..=10).map(|d| activity(d, d as u64 * 10, 5, 20)).collect();
        days.reverse();
        let m = user_metrics(&days);
        assert_eq!(m.dau, 100.0);
        // mean of 40..=100 step 10
        assert_eq!(m.wau, 70.0);
        assert_eq!(m.mau, 55.0);
        assert_eq!(m.retention_rate, percentage_of(50.0, 550.0));
        assert_eq!(m.average_transactions_per_user, 200.0 / 550.0);
    }

    #[test]
    fn user_metrics_empty() {
        assert_eq!(user_metrics(&[]), UserMetrics::default());
    }
}
