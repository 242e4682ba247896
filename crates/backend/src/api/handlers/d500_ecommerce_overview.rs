use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d500_ecommerce_overview::{
    DateRangeResponse, GeolocationResponse, OverviewRequest, OverviewResponse,
};

use crate::dashboards::d500_ecommerce_overview::{service, DashboardError};
use crate::shared::config::dashboard_settings;
use crate::shared::data::dataset::{get_dataset, Dataset};

fn dataset() -> Result<&'static Dataset, StatusCode> {
    get_dataset().ok_or_else(|| {
        tracing::error!("D500 Dashboard: {}", DashboardError::DatasetNotLoaded);
        StatusCode::SERVICE_UNAVAILABLE
    })
}

fn status_for(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
        DashboardError::NoApprovalDates => StatusCode::NOT_FOUND,
        DashboardError::DatasetNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /api/d500/date_range
pub async fn get_date_range() -> Result<Json<DateRangeResponse>, StatusCode> {
    let dataset = dataset()?;
    Ok(Json(service::available_range(dataset)))
}

/// GET /api/d500/overview?date_from=2017-01-01&date_to=2017-12-31&top_n=10
pub async fn get_overview(
    Query(request): Query<OverviewRequest>,
) -> Result<Json<OverviewResponse>, StatusCode> {
    tracing::info!(
        "D500 Dashboard: Getting overview for {:?}..{:?}",
        request.date_from,
        request.date_to
    );

    let dataset = dataset()?;
    match service::build_overview(dataset, &request, &dashboard_settings()) {
        Ok(response) => {
            tracing::info!(
                "D500 Dashboard: Returning overview of {} rows over {} days",
                response.row_count,
                response.daily_orders.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::warn!("D500 Dashboard: Failed to build overview: {}", e);
            Err(status_for(&e))
        }
    }
}

/// GET /api/d500/geolocation
pub async fn get_geolocation() -> Result<Json<GeolocationResponse>, StatusCode> {
    let dataset = dataset()?;
    let response = service::geolocation_points(dataset);
    tracing::info!(
        "D500 Dashboard: Returning {} unique customer locations out of {}",
        response.points.len(),
        response.total_records
    );
    Ok(Json(response))
}
