//! Donation pipeline tests
//!
//! Request validation and donor classification run anywhere; the pipeline
//! properties (aggregate totals, token credits, badges, cascade, and
//! leaderboards) require a database and are marked `#[ignore]`.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use sqlx::PgPool;
    use uuid::Uuid;
    use validator::Validate;

    use palhope_server::models::{
        Campaign, CreateCampaignRequest, CreateSubCampaignRequest, CreateUserRequest,
        DonateRequest, DonorKind, NonRegisteredDonateRequest, SubCampaign,
        SubCampaignDonateRequest, SubCampaignStatus, User, UserRole,
    };
    use palhope_server::notifier::Mailer;
    use palhope_server::services::{
        BadgeService, CampaignService, DonationService, LeaderboardService, SubCampaignService,
        UserService,
    };

    /// Helper to create a test database pool with the schema applied
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/palhope_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn donation_service(pool: &PgPool) -> DonationService {
        let mailer = Arc::new(Mailer::new(None, "PalHope <noreply@palhope.org>".to_string()));
        DonationService::new(pool.clone(), BadgeService::new(pool.clone()), mailer)
    }

    async fn create_donor(pool: &PgPool, name: &str) -> User {
        UserService::new(pool.clone())
            .create_user(CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@example.com", Uuid::new_v4()),
                address: None,
                phone_number: None,
                role: UserRole::Donor {
                    payment_method: None,
                },
            })
            .await
            .expect("Failed to create donor")
    }

    async fn create_campaign(pool: &PgPool, goal_amount: i64) -> Campaign {
        let organization = UserService::new(pool.clone())
            .create_user(CreateUserRequest {
                name: "Helping Hands".to_string(),
                email: format!("{}@example.org", Uuid::new_v4()),
                address: None,
                phone_number: None,
                role: UserRole::Organization {
                    organization_type: "NGO".to_string(),
                    industry: None,
                },
            })
            .await
            .expect("Failed to create organization");

        CampaignService::new(pool.clone(), LeaderboardService::new(pool.clone()))
            .create_campaign(CreateCampaignRequest {
                user_id: organization.id,
                campaign_name: "Clean Water".to_string(),
                campaign_image: "https://example.com/water.png".to_string(),
                goal_amount,
                start_date: chrono::Utc::now(),
                end_date: chrono::Utc::now() + chrono::Duration::days(30),
                description: None,
            })
            .await
            .expect("Failed to create campaign")
    }

    async fn create_sub_campaign(pool: &PgPool, parent: &Campaign, goal_amount: i64) -> SubCampaign {
        let influencer = UserService::new(pool.clone())
            .create_user(CreateUserRequest {
                name: "Influencer".to_string(),
                email: format!("{}@example.com", Uuid::new_v4()),
                address: None,
                phone_number: None,
                role: UserRole::Influencer { contract: None },
            })
            .await
            .expect("Failed to create influencer");

        SubCampaignService::new(pool.clone())
            .create_sub_campaign(CreateSubCampaignRequest {
                parent_campaign_id: parent.id,
                influencer_id: influencer.id,
                name: "Stream for Water".to_string(),
                description: "Influencer drive".to_string(),
                goal_amount,
                start_date: chrono::Utc::now(),
                end_date: chrono::Utc::now() + chrono::Duration::days(7),
            })
            .await
            .expect("Failed to create sub-campaign")
    }

    async fn campaign_amount(pool: &PgPool, id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT current_amount FROM campaigns WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .expect("Failed to read campaign amount")
    }

    async fn token_balance(pool: &PgPool, id: Uuid) -> i64 {
        sqlx::query_scalar("SELECT token_balance FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
            .expect("Failed to read token balance")
    }

    // ========================================================================
    // Validation and classification (no database required)
    // ========================================================================

    #[tokio::test]
    async fn test_donation_requests_reject_non_positive_amounts() {
        let request = DonateRequest {
            user_id: None,
            campaign_id: Uuid::new_v4(),
            amount: 0,
            anonymous: false,
            payment_method: None,
        };
        assert!(request.validate().is_err());

        let request = SubCampaignDonateRequest {
            user_id: None,
            sub_campaign_id: Uuid::new_v4(),
            amount: -10,
            anonymous: false,
            payment_method: None,
        };
        assert!(request.validate().is_err());

        let request = NonRegisteredDonateRequest {
            campaign_id: Uuid::new_v4(),
            amount: 0,
        };
        assert!(request.validate().is_err());
    }

    #[tokio::test]
    async fn test_donor_variants() {
        let id = Uuid::new_v4();

        let registered = DonorKind::classify(Some(id), false);
        assert_eq!(registered.ledger_donor_id(), Some(id));
        assert_eq!(registered.credited_user(), Some(id));

        let anonymous = DonorKind::classify(Some(id), true);
        assert_eq!(anonymous.ledger_donor_id(), None);
        assert_eq!(anonymous.credited_user(), Some(id));

        let non_registered = DonorKind::classify(None, false);
        assert_eq!(non_registered.ledger_donor_id(), None);
        assert_eq!(non_registered.credited_user(), None);
    }

    // ========================================================================
    // Pipeline properties (require database setup)
    // ========================================================================

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_registered_donation_updates_campaign_and_tokens() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);

        let campaign = create_campaign(&pool, 1000).await;
        let donor = create_donor(&pool, "Alice").await;

        let donation = service
            .donate(DonateRequest {
                user_id: Some(donor.id),
                campaign_id: campaign.id,
                amount: 100,
                anonymous: false,
                payment_method: Some("card".to_string()),
            })
            .await
            .expect("Donation should succeed");

        assert_eq!(donation.amount, 100);
        assert_eq!(donation.tokens, 1000);
        assert_eq!(donation.donor_id, Some(donor.id));
        assert!(!donation.anonymous);

        assert_eq!(campaign_amount(&pool, campaign.id).await, 100);
        assert_eq!(token_balance(&pool, donor.id).await, 1000);

        // The donation appears in the donor's records
        let records = UserService::new(pool.clone())
            .donation_records(donor.id)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, donation.id);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_badge_awarded_once_at_threshold_crossing() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);
        let badge_service = BadgeService::new(pool.clone());

        let campaign = create_campaign(&pool, 100_000).await;
        let donor = create_donor(&pool, "Bob").await;

        // 9 units -> 90 tokens, below the 100-token silver threshold
        service
            .donate(DonateRequest {
                user_id: Some(donor.id),
                campaign_id: campaign.id,
                amount: 9,
                anonymous: false,
                payment_method: None,
            })
            .await
            .unwrap();
        assert!(badge_service.user_badges(donor.id).await.unwrap().is_empty());

        // 2 more units -> 110 tokens, crossing the threshold
        service
            .donate(DonateRequest {
                user_id: Some(donor.id),
                campaign_id: campaign.id,
                amount: 2,
                anonymous: false,
                payment_method: None,
            })
            .await
            .unwrap();

        let badges = badge_service.user_badges(donor.id).await.unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].badge_name, "Silver Contributor");

        // A larger repeat donation never duplicates the badge
        service
            .donate(DonateRequest {
                user_id: Some(donor.id),
                campaign_id: campaign.id,
                amount: 50,
                anonymous: false,
                payment_method: None,
            })
            .await
            .unwrap();

        let badges = badge_service.user_badges(donor.id).await.unwrap();
        assert_eq!(badges.len(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_non_registered_donation_touches_no_user() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);

        let campaign = create_campaign(&pool, 1000).await;
        let bystander = create_donor(&pool, "Carol").await;

        let donation = service
            .donate_non_registered(NonRegisteredDonateRequest {
                campaign_id: campaign.id,
                amount: 20,
            })
            .await
            .expect("Donation should succeed");

        assert_eq!(donation.donor_id, None);
        assert!(!donation.anonymous);
        assert_eq!(donation.tokens, 0);

        assert_eq!(campaign_amount(&pool, campaign.id).await, 20);
        assert_eq!(token_balance(&pool, bystander.id).await, 0);
        assert!(UserService::new(pool.clone())
            .donation_records(bystander.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_anonymous_donation_credits_tokens_but_hides_identity() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);
        let badge_service = BadgeService::new(pool.clone());

        let campaign = create_campaign(&pool, 1000).await;
        let donor = create_donor(&pool, "Dora").await;

        let donation = service
            .donate(DonateRequest {
                user_id: Some(donor.id),
                campaign_id: campaign.id,
                amount: 15,
                anonymous: true,
                payment_method: None,
            })
            .await
            .unwrap();

        // Identity is withheld from the ledger entry
        assert_eq!(donation.donor_id, None);
        assert!(donation.anonymous);
        assert_eq!(donation.tokens, 150);

        // But the underlying account is still credited and badge-evaluated
        assert_eq!(token_balance(&pool, donor.id).await, 150);
        let badges = badge_service.user_badges(donor.id).await.unwrap();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].badge_name, "Silver Contributor");

        // And the donation is not attributed in the donor's records
        assert!(UserService::new(pool.clone())
            .donation_records(donor.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_sub_campaign_cascade_fires_exactly_once() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);

        let parent = create_campaign(&pool, 10_000).await;
        let sub = create_sub_campaign(&pool, &parent, 100).await;
        let donor = create_donor(&pool, "Eve").await;

        // Meeting the goal ends the sub-campaign and cascades its total
        service
            .donate_to_sub_campaign(SubCampaignDonateRequest {
                user_id: Some(donor.id),
                sub_campaign_id: sub.id,
                amount: 100,
                anonymous: false,
                payment_method: None,
            })
            .await
            .unwrap();

        let status: SubCampaignStatus =
            sqlx::query_scalar("SELECT status FROM sub_campaigns WHERE id = $1")
                .bind(sub.id)
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(status, SubCampaignStatus::Ended);
        assert_eq!(campaign_amount(&pool, parent.id).await, 100);

        // A later donation to the now-Ended sub-campaign must not re-apply
        // the cascade
        service
            .donate_to_sub_campaign(SubCampaignDonateRequest {
                user_id: Some(donor.id),
                sub_campaign_id: sub.id,
                amount: 50,
                anonymous: false,
                payment_method: None,
            })
            .await
            .unwrap();

        assert_eq!(campaign_amount(&pool, parent.id).await, 100);

        // And neither must a manual merge
        let merge = SubCampaignService::new(pool.clone())
            .merge_donations(sub.id)
            .await
            .unwrap();
        assert!(!merge.merged);
        assert_eq!(campaign_amount(&pool, parent.id).await, 100);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_campaign_leaderboard_excludes_anonymous_donors() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);
        let leaderboard_service = LeaderboardService::new(pool.clone());

        let campaign = create_campaign(&pool, 100_000).await;
        let a = create_donor(&pool, "A").await;
        let b = create_donor(&pool, "B").await;
        let hidden = create_donor(&pool, "Hidden").await;

        for (donor, amount, anonymous) in
            [(&a, 50, false), (&b, 120, false), (&hidden, 1000, true)]
        {
            service
                .donate(DonateRequest {
                    user_id: Some(donor.id),
                    campaign_id: campaign.id,
                    amount,
                    anonymous,
                    payment_method: None,
                })
                .await
                .unwrap();
        }

        let leaderboard = leaderboard_service
            .campaign_leaderboard(campaign.id, None)
            .await
            .unwrap();

        assert_eq!(leaderboard.len(), 2);
        assert_eq!(leaderboard[0].donor_id, b.id);
        assert_eq!(leaderboard[0].total_amount, 120);
        assert_eq!(leaderboard[1].donor_id, a.id);
        assert_eq!(leaderboard[1].total_amount, 50);

        // The anonymous 1000 still counted toward the campaign total
        assert_eq!(campaign_amount(&pool, campaign.id).await, 1170);

        // Reads are idempotent
        let again = leaderboard_service
            .campaign_leaderboard(campaign.id, None)
            .await
            .unwrap();
        assert_eq!(leaderboard, again);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_end_to_end_example() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);

        let campaign = create_campaign(&pool, 1000).await;
        let u1 = create_donor(&pool, "U1").await;

        service
            .donate(DonateRequest {
                user_id: Some(u1.id),
                campaign_id: campaign.id,
                amount: 100,
                anonymous: false,
                payment_method: None,
            })
            .await
            .unwrap();
        assert_eq!(campaign_amount(&pool, campaign.id).await, 100);
        assert_eq!(token_balance(&pool, u1.id).await, 1000);

        service
            .donate(DonateRequest {
                user_id: Some(u1.id),
                campaign_id: campaign.id,
                amount: 50,
                anonymous: true,
                payment_method: None,
            })
            .await
            .unwrap();
        assert_eq!(campaign_amount(&pool, campaign.id).await, 150);

        service
            .donate_non_registered(NonRegisteredDonateRequest {
                campaign_id: campaign.id,
                amount: 20,
            })
            .await
            .unwrap();
        assert_eq!(campaign_amount(&pool, campaign.id).await, 170);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_donation_to_missing_campaign_is_rejected_without_effects() {
        let pool = setup_test_db().await;
        let service = donation_service(&pool);

        let donor = create_donor(&pool, "Frank").await;

        let result = service
            .donate(DonateRequest {
                user_id: Some(donor.id),
                campaign_id: Uuid::new_v4(),
                amount: 100,
                anonymous: false,
                payment_method: None,
            })
            .await;

        assert!(result.is_err());
        assert_eq!(token_balance(&pool, donor.id).await, 0);
    }
}
