//! Campaign API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{
    AddNewsRequest, ApiResponse, Campaign, CampaignDetail, CreateCampaignRequest,
    LeaderboardEntry, LeaderboardQuery, SubCampaign,
};
use crate::services::{CampaignService, LeaderboardService, SubCampaignService};

/// POST /api/campaigns - Create a campaign
pub async fn create_campaign(
    State(campaign_service): State<Arc<CampaignService>>,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Campaign>>), ApiError> {
    let campaign = campaign_service.create_campaign(request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(campaign))))
}

/// GET /api/campaigns - List campaigns
pub async fn list_campaigns(
    State(campaign_service): State<Arc<CampaignService>>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, ApiError> {
    let campaigns = campaign_service.list_campaigns().await?;

    Ok(Json(ApiResponse::ok(campaigns)))
}

/// GET /api/campaigns/:id - Campaign detail with donations and leaderboard
pub async fn get_campaign(
    State(campaign_service): State<Arc<CampaignService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<CampaignDetail>>, ApiError> {
    let detail = campaign_service.get_campaign_detail(id).await?;

    Ok(Json(ApiResponse::ok(detail)))
}

/// GET /api/campaigns/:id/leaderboard - Top donors for a campaign
pub async fn get_campaign_leaderboard(
    State(leaderboard_service): State<Arc<LeaderboardService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiResponse<Vec<LeaderboardEntry>>>, ApiError> {
    let leaderboard = leaderboard_service
        .campaign_leaderboard(id, query.limit)
        .await?;

    Ok(Json(ApiResponse::ok(leaderboard)))
}

/// GET /api/campaigns/:id/sub-campaigns - Sub-campaigns of a campaign
pub async fn list_campaign_sub_campaigns(
    State(sub_campaign_service): State<Arc<SubCampaignService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<SubCampaign>>>, ApiError> {
    let sub_campaigns = sub_campaign_service.list_by_campaign(id).await?;

    Ok(Json(ApiResponse::ok(sub_campaigns)))
}

/// GET /api/campaigns/search/:name - Case-insensitive name search
pub async fn search_campaigns(
    State(campaign_service): State<Arc<CampaignService>>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<Vec<Campaign>>>, ApiError> {
    let campaigns = campaign_service.search_campaigns(&name).await?;

    Ok(Json(ApiResponse::ok(campaigns)))
}

/// POST /api/campaigns/:id/news - Append an announcement
pub async fn add_campaign_news(
    State(campaign_service): State<Arc<CampaignService>>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddNewsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<String>>>), ApiError> {
    let news_dashboard = campaign_service.add_news(id, request).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(news_dashboard))))
}

/// DELETE /api/campaigns/:id/news/:index - Remove an announcement
pub async fn remove_campaign_news(
    State(campaign_service): State<Arc<CampaignService>>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let news_dashboard = campaign_service.remove_news(id, index).await?;

    Ok(Json(ApiResponse::ok(news_dashboard)))
}
