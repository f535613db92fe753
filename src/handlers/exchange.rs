//! Display currency rate handler

use axum::extract::{Path, State};
use axum::Json;

use crate::services::ExchangeRate;
use crate::utils::errors::{Result, TourbookError};

use super::AppState;

/// Display rate for the storefront currency switcher.
///
/// Rates are for presentation only; charges always settle in the base
/// currency.
pub async fn get_rate(
    State(state): State<AppState>,
    Path(currency): Path<String>,
) -> Result<Json<ExchangeRate>> {
    if !state.settings.features.exchange_rates {
        return Err(TourbookError::ServiceUnavailable(
            "Currency conversion is disabled".to_string(),
        ));
    }

    let rate = state.services.exchange_service.rate(&currency).await?;
    Ok(Json(rate))
}
