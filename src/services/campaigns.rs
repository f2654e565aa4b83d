//! Campaign service layer - campaign management and detail views

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AddNewsRequest, Campaign, CampaignDetail, CreateCampaignRequest, Donation, DonationView, User,
};
use crate::services::leaderboard::LeaderboardService;

/// Campaign management service
pub struct CampaignService {
    db_pool: PgPool,
    leaderboard_service: LeaderboardService,
}

impl CampaignService {
    pub fn new(db_pool: PgPool, leaderboard_service: LeaderboardService) -> Self {
        Self {
            db_pool,
            leaderboard_service,
        }
    }

    /// Create a campaign owned by an organization
    pub async fn create_campaign(&self, request: CreateCampaignRequest) -> ApiResult<Campaign> {
        request.validate()?;

        let organization = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(request.user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .filter(|user| user.role.is_organization())
            .ok_or_else(|| ApiError::NotFound("Organization not found".to_string()))?;

        let campaign = sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO campaigns (
                id, campaign_name, campaign_image, organization_name,
                goal_amount, current_amount, status, start_date, end_date, description
            )
            VALUES ($1, $2, $3, $4, $5, 0, 'active', $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.campaign_name)
        .bind(&request.campaign_image)
        .bind(&organization.name)
        .bind(request.goal_amount)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.description)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(
            campaign_id = %campaign.id,
            organization = %organization.name,
            "Campaign created"
        );

        Ok(campaign)
    }

    /// List every campaign, newest first
    pub async fn list_campaigns(&self) -> ApiResult<Vec<Campaign>> {
        let campaigns =
            sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns ORDER BY created_at DESC")
                .fetch_all(&self.db_pool)
                .await?;

        Ok(campaigns)
    }

    /// Campaign detail: the campaign, its donations with an anonymity flag,
    /// and its computed leaderboard
    pub async fn get_campaign_detail(&self, id: Uuid) -> ApiResult<CampaignDetail> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE campaign_id = $1 ORDER BY donation_date DESC",
        )
        .bind(id)
        .fetch_all(&self.db_pool)
        .await?;

        let leaderboard = self
            .leaderboard_service
            .campaign_leaderboard(id, None)
            .await?;

        let donations = donations
            .into_iter()
            .map(|donation| DonationView {
                is_anonymous: donation.anonymous,
                donation,
            })
            .collect();

        Ok(CampaignDetail {
            campaign,
            donations,
            leaderboard,
        })
    }

    /// Case-insensitive name search
    pub async fn search_campaigns(&self, name: &str) -> ApiResult<Vec<Campaign>> {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("Invalid search query".to_string()));
        }

        let pattern = format!("%{}%", name);
        let campaigns = sqlx::query_as::<_, Campaign>(
            "SELECT * FROM campaigns WHERE campaign_name ILIKE $1 ORDER BY created_at DESC",
        )
        .bind(pattern)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(campaigns)
    }

    /// Append an announcement to the campaign's news dashboard
    pub async fn add_news(&self, id: Uuid, request: AddNewsRequest) -> ApiResult<Vec<String>> {
        request.validate()?;

        let news_dashboard = sqlx::query_scalar::<_, Vec<String>>(
            r#"
            UPDATE campaigns
            SET news_dashboard = array_append(news_dashboard, $1), updated_at = now()
            WHERE id = $2
            RETURNING news_dashboard
            "#,
        )
        .bind(&request.news)
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

        Ok(news_dashboard)
    }

    /// Remove the announcement at the given index
    pub async fn remove_news(&self, id: Uuid, index: usize) -> ApiResult<Vec<String>> {
        let mut news_dashboard =
            sqlx::query_scalar::<_, Vec<String>>("SELECT news_dashboard FROM campaigns WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?;

        if index >= news_dashboard.len() {
            return Err(ApiError::BadRequest("Invalid index".to_string()));
        }
        news_dashboard.remove(index);

        let news_dashboard = sqlx::query_scalar::<_, Vec<String>>(
            r#"
            UPDATE campaigns
            SET news_dashboard = $1, updated_at = now()
            WHERE id = $2
            RETURNING news_dashboard
            "#,
        )
        .bind(&news_dashboard)
        .bind(id)
        .fetch_one(&self.db_pool)
        .await?;

        Ok(news_dashboard)
    }
}
