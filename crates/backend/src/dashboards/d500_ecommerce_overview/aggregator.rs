//! Summary tables derived from a (date-filtered) set of order rows.
//!
//! Every function is pure and total: empty input gives an empty table,
//! zero counts or `None` statistics.

use chrono::NaiveDate;
use contracts::dashboards::d500_ecommerce_overview::{
    CategoryItemCount, CountEntry, DailyOrders, DailySpend, DeliveryTimeliness, Distribution,
    PaymentMethodShare, PaymentReviewCorrelation, SellerCityCount,
};
use contracts::domain::a025_order_record::OrderRow;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

/// Order count and summed payment value per approval date, date ascending.
/// Rows without an approval date are not counted.
pub fn daily_orders(rows: &[OrderRow]) -> Vec<DailyOrders> {
    let mut by_date: BTreeMap<NaiveDate, (u64, f64)> = BTreeMap::new();

    for row in rows {
        if let Some(date) = row.approval_date() {
            let entry = by_date.entry(date).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += row.payment_amount();
        }
    }

    by_date
        .into_iter()
        .map(|(date, (order_count, revenue))| DailyOrders {
            date,
            order_count,
            revenue,
        })
        .collect()
}

/// Summed payment value per approval date, date ascending
pub fn spend_over_time(rows: &[OrderRow]) -> Vec<DailySpend> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for row in rows {
        if let Some(date) = row.approval_date() {
            *by_date.entry(date).or_insert(0.0) += row.payment_amount();
        }
    }

    by_date
        .into_iter()
        .map(|(date, total_spend)| DailySpend { date, total_spend })
        .collect()
}

/// Items sold per product category, count descending then name ascending.
/// Only rows carrying both a product id and a category are items.
pub fn item_counts(rows: &[OrderRow]) -> Vec<CategoryItemCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for row in rows {
        if let (Some(_), Some(category)) = (&row.product_id, &row.product_category) {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }
    }

    let mut items: Vec<CategoryItemCount> = counts
        .into_iter()
        .map(|(category, product_count)| CategoryItemCount {
            category: category.to_string(),
            product_count,
        })
        .collect();
    items.sort_by(|a, b| {
        b.product_count
            .cmp(&a.product_count)
            .then_with(|| a.category.cmp(&b.category))
    });
    items
}

/// First `n` categories of an `item_counts` table
pub fn best_sellers(items: &[CategoryItemCount], n: usize) -> Vec<CategoryItemCount> {
    items.iter().take(n).cloned().collect()
}

/// The `n` least sold categories, least sold first
pub fn worst_sellers(items: &[CategoryItemCount], n: usize) -> Vec<CategoryItemCount> {
    let mut ascending = items.to_vec();
    ascending.sort_by(|a, b| {
        a.product_count
            .cmp(&b.product_count)
            .then_with(|| a.category.cmp(&b.category))
    });
    ascending.truncate(n);
    ascending
}

/// Occurrences of each review score, rows without a review skipped
pub fn review_distribution(rows: &[OrderRow]) -> Distribution<u8> {
    count_distribution(rows.iter().filter_map(|row| row.review_score))
}

/// Distinct customers per customer state
pub fn state_distribution(rows: &[OrderRow]) -> Distribution<String> {
    let mut customers: HashMap<&str, HashSet<&str>> = HashMap::new();

    for row in rows {
        customers
            .entry(row.customer_state.as_str())
            .or_default()
            .insert(row.customer_id.as_str());
    }

    let counts = customers
        .into_iter()
        .map(|(state, ids)| (state.to_string(), ids.len() as u64))
        .collect();
    distribution_from_counts(counts)
}

/// Occurrences of each order status label
pub fn status_distribution(rows: &[OrderRow]) -> Distribution<String> {
    count_distribution(rows.iter().map(|row| row.order_status.clone()))
}

pub fn delivery_timeliness(rows: &[OrderRow]) -> DeliveryTimeliness {
    let mut result = DeliveryTimeliness::default();

    for row in rows {
        match row.delivered_on_time() {
            Some(true) => result.on_time += 1,
            Some(false) => result.late += 1,
            None => result.undelivered += 1,
        }
    }

    result
}

/// Rows per payment type with percentage share, `not_defined` excluded
pub fn payment_method_mix(rows: &[OrderRow]) -> Vec<PaymentMethodShare> {
    let distribution = count_distribution(
        rows.iter()
            .filter(|row| row.has_defined_payment_type())
            .map(|row| row.payment_type.clone()),
    );
    let total = distribution.total();

    distribution
        .entries
        .into_iter()
        .map(|entry| PaymentMethodShare {
            share_percent: entry.count as f64 * 100.0 / total as f64,
            payment_type: entry.key,
            count: entry.count,
        })
        .collect()
}

/// Cities ranked by number of distinct sellers, truncated to `n`
pub fn top_seller_cities(rows: &[OrderRow], n: usize) -> Vec<SellerCityCount> {
    let mut sellers: HashMap<&str, HashSet<&str>> = HashMap::new();

    for row in rows {
        sellers
            .entry(row.seller_city.as_str())
            .or_default()
            .insert(row.seller_id.as_str());
    }

    let mut cities: Vec<SellerCityCount> = sellers
        .into_iter()
        .map(|(city, ids)| SellerCityCount {
            seller_city: city.to_string(),
            seller_count: ids.len() as u64,
        })
        .collect();
    cities.sort_by(|a, b| {
        b.seller_count
            .cmp(&a.seller_count)
            .then_with(|| a.seller_city.cmp(&b.seller_city))
    });
    cities.truncate(n);
    cities
}

/// Pearson correlation of payment value against review score over rows
/// that carry both a payment and a review
pub fn payment_review_correlation(rows: &[OrderRow]) -> PaymentReviewCorrelation {
    let pairs: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|row| {
            let score = row.review_score?;
            row.payment_value.map(|value| (value, score as f64))
        })
        .collect();

    PaymentReviewCorrelation {
        coefficient: pearson(&pairs),
        sample_size: pairs.len() as u64,
    }
}

pub fn average_review_score(rows: &[OrderRow]) -> Option<f64> {
    mean(rows.iter().filter_map(|row| row.review_score.map(f64::from)))
}

/// Mean of the daily spend values
pub fn average_daily_spend(spend: &[DailySpend]) -> Option<f64> {
    mean(spend.iter().map(|s| s.total_spend))
}

/// Mean item count per category
pub fn average_items_per_category(items: &[CategoryItemCount]) -> Option<f64> {
    mean(items.iter().map(|i| i.product_count as f64))
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

fn count_distribution<K>(values: impl Iterator<Item = K>) -> Distribution<K>
where
    K: Eq + Hash + Ord + Clone,
{
    let mut counts: HashMap<K, u64> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    distribution_from_counts(counts)
}

/// Count descending, key ascending on ties; the mode is the first entry
fn distribution_from_counts<K>(counts: HashMap<K, u64>) -> Distribution<K>
where
    K: Ord + Clone,
{
    let mut entries: Vec<CountEntry<K>> = counts
        .into_iter()
        .map(|(key, count)| CountEntry { key, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));

    let mode = entries.first().map(|e| e.key.clone());
    Distribution { entries, mode }
}
