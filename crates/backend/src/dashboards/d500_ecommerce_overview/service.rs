use contracts::dashboards::d500_ecommerce_overview::{
    DateRangeResponse, GeolocationResponse, OverviewRequest, OverviewResponse, OverviewSummary,
};

use super::aggregator;
use super::filter::{filter_by_approval, DateRange};
use super::geo_reducer::dedupe_by_customer;
use super::DashboardError;
use crate::shared::config::DashboardSettings;
use crate::shared::data::dataset::Dataset;

/// Approval dates available for the date selector
pub fn available_range(dataset: &Dataset) -> DateRangeResponse {
    let bounds = dataset.approval_bounds();
    DateRangeResponse {
        min_date: bounds.map(|(min, _)| min),
        max_date: bounds.map(|(_, max)| max),
    }
}

/// Resolve the requested range against the dataset bounds.
/// A missing end defaults to the dataset bound, or to the other end when the
/// dataset has no approved rows at all.
pub fn resolve_range(
    dataset: &Dataset,
    request: &OverviewRequest,
) -> Result<DateRange, DashboardError> {
    let bounds = dataset.approval_bounds();

    let from = request
        .date_from
        .or(bounds.map(|(min, _)| min))
        .or(request.date_to);
    let to = request
        .date_to
        .or(bounds.map(|(_, max)| max))
        .or(request.date_from);

    match (from, to) {
        (Some(from), Some(to)) => DateRange::new(from, to),
        _ => Err(DashboardError::NoApprovalDates),
    }
}

/// Filter the dataset and compute every dashboard table
pub fn build_overview(
    dataset: &Dataset,
    request: &OverviewRequest,
    settings: &DashboardSettings,
) -> Result<OverviewResponse, DashboardError> {
    let range = resolve_range(dataset, request)?;
    let rows = filter_by_approval(&dataset.orders, range);

    tracing::debug!(
        "D500 Dashboard: {} of {} rows in {}..{}",
        rows.len(),
        dataset.orders.len(),
        range.start(),
        range.end()
    );

    let top_n = request.top_n.unwrap_or(settings.top_seller_cities);

    let daily_orders = aggregator::daily_orders(&rows);
    let spend_over_time = aggregator::spend_over_time(&rows);
    let item_counts = aggregator::item_counts(&rows);
    let review_scores = aggregator::review_distribution(&rows);
    let states = aggregator::state_distribution(&rows);
    let order_statuses = aggregator::status_distribution(&rows);

    let summary = OverviewSummary {
        total_orders: daily_orders.iter().map(|d| d.order_count).sum(),
        total_revenue: daily_orders.iter().map(|d| d.revenue).sum(),
        total_spend: spend_over_time.iter().map(|s| s.total_spend).sum(),
        average_spend: aggregator::average_daily_spend(&spend_over_time),
        total_items: item_counts.iter().map(|i| i.product_count).sum(),
        average_items: aggregator::average_items_per_category(&item_counts),
        average_review_score: aggregator::average_review_score(&rows),
        most_common_review_score: review_scores.mode,
        most_common_state: states.mode.clone(),
        most_common_status: order_statuses.mode.clone(),
    };

    Ok(OverviewResponse {
        date_from: range.start(),
        date_to: range.end(),
        row_count: rows.len(),
        summary,
        best_sellers: aggregator::best_sellers(&item_counts, settings.top_categories),
        worst_sellers: aggregator::worst_sellers(&item_counts, settings.top_categories),
        delivery: aggregator::delivery_timeliness(&rows),
        payment_methods: aggregator::payment_method_mix(&rows),
        top_seller_cities: aggregator::top_seller_cities(&rows, top_n),
        payment_review_correlation: aggregator::payment_review_correlation(&rows),
        daily_orders,
        spend_over_time,
        item_counts,
        review_scores,
        states,
        order_statuses,
    })
}

/// Customer locations for the map, one point per customer
pub fn geolocation_points(dataset: &Dataset) -> GeolocationResponse {
    GeolocationResponse {
        total_records: dataset.geolocations.len(),
        points: dedupe_by_customer(&dataset.geolocations),
    }
}
