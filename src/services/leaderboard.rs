//! Leaderboard queries - the read side of donor rankings
//!
//! Campaign leaderboards are aggregated from the donation ledger on demand;
//! sub-campaign leaderboards read the incrementally maintained table. Both
//! exclude anonymous and non-registered donations, and entries whose user no
//! longer exists are dropped.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::LeaderboardEntry;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Read-only leaderboard service
#[derive(Clone)]
pub struct LeaderboardService {
    db_pool: PgPool,
}

impl LeaderboardService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Top donors for a campaign, aggregated from the ledger
    pub async fn campaign_leaderboard(
        &self,
        campaign_id: Uuid,
        limit: Option<i64>,
    ) -> ApiResult<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM campaigns WHERE id = $1")
            .bind(campaign_id)
            .fetch_one(&self.db_pool)
            .await?;
        if exists == 0 {
            return Err(ApiError::NotFound("Campaign not found".to_string()));
        }

        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT d.donor_id AS donor_id, u.name AS donor_name, SUM(d.amount)::BIGINT AS total_amount
            FROM donations d
            JOIN users u ON u.id = d.donor_id
            WHERE d.campaign_id = $1 AND d.donor_id IS NOT NULL
            GROUP BY d.donor_id, u.name
            ORDER BY total_amount DESC
            LIMIT $2
            "#,
        )
        .bind(campaign_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(entries)
    }

    /// Top donors for a sub-campaign, from the maintained leaderboard table
    pub async fn sub_campaign_leaderboard(
        &self,
        sub_campaign_id: Uuid,
        limit: Option<i64>,
    ) -> ApiResult<Vec<LeaderboardEntry>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sub_campaigns WHERE id = $1")
                .bind(sub_campaign_id)
                .fetch_one(&self.db_pool)
                .await?;
        if exists == 0 {
            return Err(ApiError::NotFound("Sub-campaign not found".to_string()));
        }

        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT l.donor_id AS donor_id, u.name AS donor_name, l.amount AS total_amount
            FROM sub_campaign_leaderboard l
            JOIN users u ON u.id = l.donor_id
            WHERE l.sub_campaign_id = $1
            ORDER BY l.amount DESC
            LIMIT $2
            "#,
        )
        .bind(sub_campaign_id)
        .bind(limit)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(entries)
    }
}
