//! Donation pipeline - the write path for every contribution
//!
//! Sequence per donation: validate, resolve the target, write the ledger
//! entry, apply the aggregate update (with the sub-campaign cascade), credit
//! the donor's tokens, then evaluate badges and dispatch the confirmation
//! mail. Ledger write, aggregate update and token credit share one database
//! transaction; badge evaluation is idempotent and the mail is fire-and-
//! forget, so both run after commit.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    DonateRequest, Donation, DonorKind, NonRegisteredDonateRequest, SubCampaignDonateRequest,
};
use crate::notifier::{donation_confirmation, Mailer};
use crate::rewards::tokens_for_amount;
use crate::services::aggregate;
use crate::services::badges::BadgeService;

/// Donation target: exactly one of a campaign or a sub-campaign
#[derive(Debug, Clone, Copy)]
enum DonationTarget {
    Campaign(Uuid),
    SubCampaign(Uuid),
}

#[derive(Debug, sqlx::FromRow)]
struct CreditedUser {
    name: String,
    email: String,
    token_balance: i64,
}

/// Donation pipeline service
pub struct DonationService {
    db_pool: PgPool,
    badge_service: BadgeService,
    mailer: Arc<Mailer>,
}

impl DonationService {
    pub fn new(db_pool: PgPool, badge_service: BadgeService, mailer: Arc<Mailer>) -> Self {
        Self {
            db_pool,
            badge_service,
            mailer,
        }
    }

    /// Donate to a campaign
    pub async fn donate(&self, request: DonateRequest) -> ApiResult<Donation> {
        request.validate()?;
        let donor = DonorKind::classify(request.user_id, request.anonymous);

        self.process(
            DonationTarget::Campaign(request.campaign_id),
            donor,
            request.amount,
            request.payment_method,
        )
        .await
    }

    /// Donate to an influencer's sub-campaign
    pub async fn donate_to_sub_campaign(
        &self,
        request: SubCampaignDonateRequest,
    ) -> ApiResult<Donation> {
        request.validate()?;
        let donor = DonorKind::classify(request.user_id, request.anonymous);

        self.process(
            DonationTarget::SubCampaign(request.sub_campaign_id),
            donor,
            request.amount,
            request.payment_method,
        )
        .await
    }

    /// Donate without an account. No tokens accrue and no user is touched.
    pub async fn donate_non_registered(
        &self,
        request: NonRegisteredDonateRequest,
    ) -> ApiResult<Donation> {
        request.validate()?;

        self.process(
            DonationTarget::Campaign(request.campaign_id),
            DonorKind::NonRegistered,
            request.amount,
            None,
        )
        .await
    }

    /// Run the pipeline for a classified donor and resolved target
    async fn process(
        &self,
        target: DonationTarget,
        donor: DonorKind,
        amount: i64,
        payment_method: Option<String>,
    ) -> ApiResult<Donation> {
        let mut tx = self.db_pool.begin().await?;

        // The target must exist before anything is written; its display name
        // is kept for the confirmation mail.
        let target_name = match target {
            DonationTarget::Campaign(id) => {
                sqlx::query_scalar::<_, String>("SELECT campaign_name FROM campaigns WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Campaign not found".to_string()))?
            }
            DonationTarget::SubCampaign(id) => {
                sqlx::query_scalar::<_, String>("SELECT name FROM sub_campaigns WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Sub-campaign not found".to_string()))?
            }
        };

        let tokens = if donor.credited_user().is_some() {
            tokens_for_amount(amount)
        } else {
            0
        };

        let (campaign_id, sub_campaign_id) = match target {
            DonationTarget::Campaign(id) => (Some(id), None),
            DonationTarget::SubCampaign(id) => (None, Some(id)),
        };

        let donation = sqlx::query_as::<_, Donation>(
            r#"
            INSERT INTO donations (
                id, donor_id, anonymous, campaign_id, sub_campaign_id,
                amount, tokens, payment_method, donation_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(donor.ledger_donor_id())
        .bind(donor.is_anonymous())
        .bind(campaign_id)
        .bind(sub_campaign_id)
        .bind(amount)
        .bind(tokens)
        .bind(payment_method)
        .fetch_one(&mut *tx)
        .await?;

        match target {
            DonationTarget::Campaign(id) => {
                aggregate::apply_to_campaign(&mut tx, id, amount).await?;
            }
            DonationTarget::SubCampaign(id) => {
                aggregate::apply_to_sub_campaign(&mut tx, id, donor, amount).await?;
            }
        }

        let credited = match donor.credited_user() {
            Some(user_id) => {
                let user = sqlx::query_as::<_, CreditedUser>(
                    r#"
                    UPDATE users
                    SET token_balance = token_balance + $1, updated_at = now()
                    WHERE id = $2
                    RETURNING name, email, token_balance
                    "#,
                )
                .bind(tokens)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

                if user.is_none() {
                    tracing::warn!(user_id = %user_id, "Donor user not found, tokens not credited");
                }
                user
            }
            None => None,
        };

        tx.commit().await?;

        if let (Some(user_id), Some(user)) = (donor.credited_user(), &credited) {
            self.badge_service
                .award_badges(user_id, user.token_balance)
                .await?;
        }

        if let Some(user) = credited {
            let display_name = if donor.is_anonymous() {
                "Anonymous Donor".to_string()
            } else {
                user.name
            };
            let (subject, text, html) = donation_confirmation(&display_name, amount, &target_name);
            self.mailer.spawn_send(user.email, subject, text, html);
        }

        tracing::info!(
            donation_id = %donation.id,
            amount = amount,
            tokens = tokens,
            anonymous = donation.anonymous,
            "Donation recorded"
        );

        Ok(donation)
    }
}
