//! Badge awarder - idempotent threshold evaluation against the catalog
//!
//! Awarding checks for an existing badge before inserting, and the insert
//! itself is conditional on the (user_id, badge_name) uniqueness constraint,
//! so concurrent threshold crossings cannot produce duplicates.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::Badge;
use crate::rewards::badges_earned;

/// Badge persistence and evaluation service
#[derive(Clone)]
pub struct BadgeService {
    db_pool: PgPool,
}

impl BadgeService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Award every catalog badge the given cumulative token total qualifies
    /// for and the user does not already hold. Returns the newly awarded
    /// badges; calling twice with the same inputs awards nothing the second
    /// time.
    pub async fn award_badges(&self, user_id: Uuid, total_tokens: i64) -> ApiResult<Vec<Badge>> {
        let mut awarded = Vec::new();

        for spec in badges_earned(total_tokens) {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM badges WHERE user_id = $1 AND badge_name = $2",
            )
            .bind(user_id)
            .bind(spec.name)
            .fetch_one(&self.db_pool)
            .await?;

            if exists > 0 {
                continue;
            }

            let badge = sqlx::query_as::<_, Badge>(
                r#"
                INSERT INTO badges (id, user_id, badge_name, badge_pic, description, acquired, awarded_at)
                VALUES ($1, $2, $3, $4, $5, TRUE, now())
                ON CONFLICT (user_id, badge_name) DO NOTHING
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(spec.name)
            .bind(spec.picture_url)
            .bind(spec.description)
            .fetch_optional(&self.db_pool)
            .await?;

            // None means another request won the race; that is fine.
            if let Some(badge) = badge {
                tracing::info!(
                    user_id = %user_id,
                    badge = %badge.badge_name,
                    "Badge awarded"
                );
                awarded.push(badge);
            }
        }

        Ok(awarded)
    }

    /// Re-evaluate thresholds for one user against their current balance
    pub async fn check_user(&self, user_id: Uuid) -> ApiResult<Vec<Badge>> {
        let balance = sqlx::query_scalar::<_, i64>("SELECT token_balance FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        self.award_badges(user_id, balance).await
    }

    /// Re-evaluate thresholds for every user. Returns the number of badges
    /// awarded across the sweep.
    pub async fn check_all(&self) -> ApiResult<usize> {
        let users = sqlx::query_as::<_, (Uuid, i64)>("SELECT id, token_balance FROM users")
            .fetch_all(&self.db_pool)
            .await?;

        let mut total_awarded = 0;
        for (user_id, balance) in users {
            total_awarded += self.award_badges(user_id, balance).await?.len();
        }

        Ok(total_awarded)
    }

    /// All badges held by a user
    pub async fn user_badges(&self, user_id: Uuid) -> ApiResult<Vec<Badge>> {
        let badges = sqlx::query_as::<_, Badge>(
            "SELECT * FROM badges WHERE user_id = $1 ORDER BY awarded_at",
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(badges)
    }
}

/// Background reconciliation sweep: periodically re-runs the all-users badge
/// check so a badge missed by a failed post-donation evaluation is caught up
pub async fn badge_sweep(badge_service: Arc<BadgeService>, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // The first tick fires immediately; skip it so startup stays quiet.
    interval.tick().await;

    loop {
        interval.tick().await;
        match badge_service.check_all().await {
            Ok(0) => tracing::debug!("Badge sweep completed, nothing to award"),
            Ok(n) => tracing::info!(awarded = n, "Badge sweep awarded missing badges"),
            Err(e) => tracing::warn!(error = %e, "Badge sweep failed"),
        }
    }
}
