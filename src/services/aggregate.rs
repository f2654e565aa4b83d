//! Campaign aggregate updates applied inside a donation transaction
//!
//! All running-total updates are SQL-level atomic increments, never
//! read-modify-write, so concurrent donations to the same aggregate cannot
//! clobber each other's progress. The sub-campaign completion cascade is
//! guarded by the Active -> Ended transition: the parent campaign is credited
//! only by the one statement that wins that transition.

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{DonorKind, SubCampaignStatus};

/// Whether applying a donation completed the sub-campaign and cascaded its
/// total into the parent campaign
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeOutcome {
    Fired { total: i64 },
    NotFired,
}

#[derive(Debug, sqlx::FromRow)]
struct SubCampaignProgress {
    current_amount: i64,
    goal_amount: i64,
    status: SubCampaignStatus,
    parent_campaign_id: Uuid,
}

/// Add a donation amount to a campaign's running total
pub async fn apply_to_campaign(
    tx: &mut Transaction<'_, Postgres>,
    campaign_id: Uuid,
    amount: i64,
) -> ApiResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE campaigns
        SET current_amount = current_amount + $1, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(amount)
    .bind(campaign_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Campaign not found".to_string()));
    }

    Ok(())
}

/// Add a donation amount to a sub-campaign: running total, leaderboard entry
/// for attributed donors, and the completion cascade when the goal is met
pub async fn apply_to_sub_campaign(
    tx: &mut Transaction<'_, Postgres>,
    sub_campaign_id: Uuid,
    donor: DonorKind,
    amount: i64,
) -> ApiResult<CascadeOutcome> {
    let progress = sqlx::query_as::<_, SubCampaignProgress>(
        r#"
        UPDATE sub_campaigns
        SET current_amount = current_amount + $1, updated_at = now()
        WHERE id = $2
        RETURNING current_amount, goal_amount, status, parent_campaign_id
        "#,
    )
    .bind(amount)
    .bind(sub_campaign_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| ApiError::NotFound("Sub-campaign not found".to_string()))?;

    // Only attributed donors appear on the named leaderboard; anonymous and
    // non-registered donations still count toward current_amount above.
    if let DonorKind::Registered(donor_id) = donor {
        sqlx::query(
            r#"
            INSERT INTO sub_campaign_leaderboard (sub_campaign_id, donor_id, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (sub_campaign_id, donor_id)
            DO UPDATE SET amount = sub_campaign_leaderboard.amount + EXCLUDED.amount
            "#,
        )
        .bind(sub_campaign_id)
        .bind(donor_id)
        .bind(amount)
        .execute(&mut **tx)
        .await?;
    }

    if progress.current_amount >= progress.goal_amount
        && progress.status == SubCampaignStatus::Active
    {
        return end_and_cascade(tx, sub_campaign_id, progress.parent_campaign_id).await;
    }

    Ok(CascadeOutcome::NotFired)
}

/// End a sub-campaign and credit its donation total to the parent campaign.
///
/// The status transition is an atomic conditional update; callers racing on
/// the same sub-campaign observe at most one `Fired` outcome, so the parent
/// is never credited twice.
pub async fn end_and_cascade(
    tx: &mut Transaction<'_, Postgres>,
    sub_campaign_id: Uuid,
    parent_campaign_id: Uuid,
) -> ApiResult<CascadeOutcome> {
    let transitioned = sqlx::query(
        r#"
        UPDATE sub_campaigns
        SET status = 'ended', updated_at = now()
        WHERE id = $1 AND status = 'active'
        "#,
    )
    .bind(sub_campaign_id)
    .execute(&mut **tx)
    .await?;

    if transitioned.rows_affected() == 0 {
        return Ok(CascadeOutcome::NotFired);
    }

    let (total,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM donations WHERE sub_campaign_id = $1",
    )
    .bind(sub_campaign_id)
    .fetch_one(&mut **tx)
    .await?;

    let parent = sqlx::query(
        r#"
        UPDATE campaigns
        SET current_amount = current_amount + $1, updated_at = now()
        WHERE id = $2
        "#,
    )
    .bind(total)
    .bind(parent_campaign_id)
    .execute(&mut **tx)
    .await?;

    if parent.rows_affected() == 0 {
        return Err(ApiError::NotFound("Parent campaign not found".to_string()));
    }

    tracing::info!(
        sub_campaign_id = %sub_campaign_id,
        parent_campaign_id = %parent_campaign_id,
        total = total,
        "Sub-campaign completed, total cascaded into parent campaign"
    );

    Ok(CascadeOutcome::Fired { total })
}
