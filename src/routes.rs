//! Route definitions for the PalHope API

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::*;
use crate::state::AppState;

// Donation routes
pub fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/donations", post(donate))
        .route("/api/donations/sub-campaign", post(donate_to_sub_campaign))
        .route("/api/donations/non-registered", post(donate_non_registered))
}

// Campaign routes
pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/api/campaigns", post(create_campaign))
        .route("/api/campaigns", get(list_campaigns))
        .route("/api/campaigns/:id", get(get_campaign))
        .route("/api/campaigns/:id/leaderboard", get(get_campaign_leaderboard))
        .route("/api/campaigns/:id/sub-campaigns", get(list_campaign_sub_campaigns))
        .route("/api/campaigns/search/:name", get(search_campaigns))
        .route("/api/campaigns/:id/news", post(add_campaign_news))
        .route("/api/campaigns/:id/news/:index", delete(remove_campaign_news))
}

// Sub-campaign routes
pub fn sub_campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sub-campaigns", post(create_sub_campaign))
        .route("/api/sub-campaigns", get(list_sub_campaigns))
        .route("/api/sub-campaigns/:id", get(get_sub_campaign))
        .route("/api/sub-campaigns/:id/leaderboard", get(get_sub_campaign_leaderboard))
        .route("/api/sub-campaigns/:id/approve", post(approve_sub_campaign))
        .route("/api/sub-campaigns/:id/merge-donations", post(merge_sub_campaign_donations))
        .route("/api/influencers/:id/sub-campaigns", get(list_influencer_sub_campaigns))
}

// Badge routes
pub fn badge_routes() -> Router<AppState> {
    Router::new()
        .route("/api/badges/check", post(check_all_badges))
        .route("/api/badges/check/:user_id", post(check_user_badges))
        .route("/api/users/:id/badges", get(get_user_badges))
}

// User routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/:id", get(get_user))
        .route("/api/users/:id/donations", get(get_user_donations))
}
