//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::services::{
    BadgeService, CampaignService, DonationService, LeaderboardService, SubCampaignService,
    UserService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub donation_service: Arc<DonationService>,
    pub campaign_service: Arc<CampaignService>,
    pub sub_campaign_service: Arc<SubCampaignService>,
    pub badge_service: Arc<BadgeService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    pub fn new(
        donation_service: Arc<DonationService>,
        campaign_service: Arc<CampaignService>,
        sub_campaign_service: Arc<SubCampaignService>,
        badge_service: Arc<BadgeService>,
        leaderboard_service: Arc<LeaderboardService>,
        user_service: Arc<UserService>,
    ) -> Self {
        Self {
            donation_service,
            campaign_service,
            sub_campaign_service,
            badge_service,
            leaderboard_service,
            user_service,
        }
    }
}

impl FromRef<AppState> for Arc<DonationService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.donation_service.clone()
    }
}

impl FromRef<AppState> for Arc<CampaignService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.campaign_service.clone()
    }
}

impl FromRef<AppState> for Arc<SubCampaignService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.sub_campaign_service.clone()
    }
}

impl FromRef<AppState> for Arc<BadgeService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.badge_service.clone()
    }
}

impl FromRef<AppState> for Arc<LeaderboardService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.leaderboard_service.clone()
    }
}

impl FromRef<AppState> for Arc<UserService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.user_service.clone()
    }
}
