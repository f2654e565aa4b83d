//! Donation API handlers

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{
    ApiResponse, DonateRequest, Donation, NonRegisteredDonateRequest, SubCampaignDonateRequest,
};
use crate::services::DonationService;

/// POST /api/donations - Donate to a campaign
pub async fn donate(
    State(donation_service): State<Arc<DonationService>>,
    Json(request): Json<DonateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Donation>>), ApiError> {
    let donation = donation_service.donate(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(donation))))
}

/// POST /api/donations/sub-campaign - Donate to a sub-campaign
pub async fn donate_to_sub_campaign(
    State(donation_service): State<Arc<DonationService>>,
    Json(request): Json<SubCampaignDonateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Donation>>), ApiError> {
    let donation = donation_service.donate_to_sub_campaign(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(donation))))
}

/// POST /api/donations/non-registered - Donate without an account
pub async fn donate_non_registered(
    State(donation_service): State<Arc<DonationService>>,
    Json(request): Json<NonRegisteredDonateRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Donation>>), ApiError> {
    let donation = donation_service.donate_non_registered(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(donation))))
}
