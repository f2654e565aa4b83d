//! Sub-campaign service layer - influencer campaign management

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateSubCampaignRequest, Donation, SubCampaign, SubCampaignDetail};
use crate::services::aggregate::{self, CascadeOutcome};

/// Outcome of a manual merge-donations call
#[derive(Debug, serde::Serialize)]
pub struct MergeResult {
    pub merged: bool,
    pub total_amount: i64,
}

/// Sub-campaign management service
pub struct SubCampaignService {
    db_pool: PgPool,
}

impl SubCampaignService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a sub-campaign under a parent campaign. Starts unapproved.
    pub async fn create_sub_campaign(
        &self,
        request: CreateSubCampaignRequest,
    ) -> ApiResult<SubCampaign> {
        request.validate()?;

        let parent_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaigns WHERE id = $1")
                .bind(request.parent_campaign_id)
                .fetch_one(&self.db_pool)
                .await?;
        if parent_exists == 0 {
            return Err(ApiError::NotFound("Parent campaign not found".to_string()));
        }

        let influencer_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
                .bind(request.influencer_id)
                .fetch_one(&self.db_pool)
                .await?;
        if influencer_exists == 0 {
            return Err(ApiError::NotFound("Influencer not found".to_string()));
        }

        let sub_campaign = sqlx::query_as::<_, SubCampaign>(
            r#"
            INSERT INTO sub_campaigns (
                id, parent_campaign_id, influencer_id, name, description,
                goal_amount, current_amount, status, start_date, end_date, approved
            )
            VALUES ($1, $2, $3, $4, $5, $6, 0, 'active', $7, $8, FALSE)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.parent_campaign_id)
        .bind(request.influencer_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.goal_amount)
        .bind(request.start_date)
        .bind(request.end_date)
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(sub_campaign_id = %sub_campaign.id, "Sub-campaign created");

        Ok(sub_campaign)
    }

    /// List every sub-campaign
    pub async fn list_sub_campaigns(&self) -> ApiResult<Vec<SubCampaign>> {
        let sub_campaigns = sqlx::query_as::<_, SubCampaign>(
            "SELECT * FROM sub_campaigns ORDER BY created_at DESC",
        )
        .fetch_all(&self.db_pool)
        .await?;

        Ok(sub_campaigns)
    }

    /// Sub-campaign detail with its donation ledger entries
    pub async fn get_sub_campaign_detail(&self, id: Uuid) -> ApiResult<SubCampaignDetail> {
        let sub_campaign =
            sqlx::query_as::<_, SubCampaign>("SELECT * FROM sub_campaigns WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.db_pool)
                .await?
                .ok_or_else(|| ApiError::NotFound("Sub-campaign not found".to_string()))?;

        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE sub_campaign_id = $1 ORDER BY donation_date DESC",
        )
        .bind(id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(SubCampaignDetail {
            sub_campaign,
            donations,
        })
    }

    /// Sub-campaigns belonging to a parent campaign
    pub async fn list_by_campaign(&self, campaign_id: Uuid) -> ApiResult<Vec<SubCampaign>> {
        let sub_campaigns = sqlx::query_as::<_, SubCampaign>(
            "SELECT * FROM sub_campaigns WHERE parent_campaign_id = $1 ORDER BY created_at DESC",
        )
        .bind(campaign_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(sub_campaigns)
    }

    /// Sub-campaigns run by an influencer
    pub async fn list_by_influencer(&self, influencer_id: Uuid) -> ApiResult<Vec<SubCampaign>> {
        let influencer_exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
                .bind(influencer_id)
                .fetch_one(&self.db_pool)
                .await?;
        if influencer_exists == 0 {
            return Err(ApiError::NotFound("Influencer not found".to_string()));
        }

        let sub_campaigns = sqlx::query_as::<_, SubCampaign>(
            "SELECT * FROM sub_campaigns WHERE influencer_id = $1 ORDER BY created_at DESC",
        )
        .bind(influencer_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(sub_campaigns)
    }

    /// Approve a sub-campaign for public listing
    pub async fn approve(&self, id: Uuid) -> ApiResult<SubCampaign> {
        let sub_campaign = sqlx::query_as::<_, SubCampaign>(
            r#"
            UPDATE sub_campaigns
            SET approved = TRUE, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Sub-campaign not found".to_string()))?;

        tracing::info!(sub_campaign_id = %id, "Sub-campaign approved");

        Ok(sub_campaign)
    }

    /// Manually fold a sub-campaign's donation total into its parent.
    ///
    /// Uses the same guarded transition as the automatic cascade, so calling
    /// this on an already-Ended sub-campaign (or calling it twice) never
    /// credits the parent a second time.
    pub async fn merge_donations(&self, id: Uuid) -> ApiResult<MergeResult> {
        let mut tx = self.db_pool.begin().await?;

        let parent_campaign_id =
            sqlx::query_scalar::<_, Uuid>("SELECT parent_campaign_id FROM sub_campaigns WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| ApiError::NotFound("Sub-campaign not found".to_string()))?;

        let outcome = aggregate::end_and_cascade(&mut tx, id, parent_campaign_id).await?;

        tx.commit().await?;

        match outcome {
            CascadeOutcome::Fired { total } => Ok(MergeResult {
                merged: true,
                total_amount: total,
            }),
            CascadeOutcome::NotFired => Ok(MergeResult {
                merged: false,
                total_amount: 0,
            }),
        }
    }
}
