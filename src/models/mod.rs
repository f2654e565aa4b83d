//! Data models for the PalHope backend
//!
//! Monetary amounts and token counts are integer minor units (i64) to avoid
//! floating-point accumulation drift.

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// User model. The role payload is a tagged sum type stored as JSONB.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub token_balance: i64,
    pub role: Json<UserRole>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User roles with role-specific payload, dispatched by matching on the tag
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "role")]
pub enum UserRole {
    Donor {
        #[serde(skip_serializing_if = "Option::is_none")]
        payment_method: Option<String>,
    },
    Organization {
        organization_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        industry: Option<String>,
    },
    Influencer {
        #[serde(skip_serializing_if = "Option::is_none")]
        contract: Option<String>,
    },
    Admin,
}

impl UserRole {
    /// Role tag as shown in API responses and leaderboards
    pub fn tag(&self) -> &'static str {
        match self {
            UserRole::Donor { .. } => "Donor",
            UserRole::Organization { .. } => "Organization",
            UserRole::Influencer { .. } => "Influencer",
            UserRole::Admin => "Admin",
        }
    }

    pub fn is_organization(&self) -> bool {
        matches!(self, UserRole::Organization { .. })
    }
}

/// Campaign model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Campaign {
    pub id: Uuid,
    pub campaign_name: String,
    pub campaign_image: String,
    pub organization_name: String,
    pub goal_amount: i64,
    pub current_amount: i64,
    pub status: CampaignStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub description: Option<String>,
    pub news_dashboard: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Campaign status
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "PascalCase")]
pub enum CampaignStatus {
    Active,
    Suspended,
    Ended,
}

/// Influencer-run sub-campaign attached to a parent campaign
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct SubCampaign {
    pub id: Uuid,
    pub parent_campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub name: String,
    pub description: String,
    pub goal_amount: i64,
    pub current_amount: i64,
    pub status: SubCampaignStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sub-campaign status. Ended is terminal; the transition fires the cascade
/// into the parent campaign exactly once.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "sub_campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "PascalCase")]
pub enum SubCampaignStatus {
    Active,
    Ended,
}

/// Donation ledger entry, immutable once written.
///
/// Donor encoding: registered donors carry `donor_id` with `anonymous =
/// false`; anonymous donations discard the donor identity (`donor_id` NULL,
/// `anonymous = true`); non-registered donations carry neither.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Donation {
    pub id: Uuid,
    pub donor_id: Option<Uuid>,
    pub anonymous: bool,
    pub campaign_id: Option<Uuid>,
    pub sub_campaign_id: Option<Uuid>,
    pub amount: i64,
    pub tokens: i64,
    pub payment_method: Option<String>,
    pub donation_date: DateTime<Utc>,
}

/// Donor variant resolved from a donation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonorKind {
    /// Known donor, attributed in the ledger and on leaderboards
    Registered(Uuid),
    /// Known donor whose identity is withheld from the ledger
    AnonymousIdentified(Uuid),
    /// No account involved at all
    NonRegistered,
}

impl DonorKind {
    /// Classify a request's (user_id, anonymous) pair.
    ///
    /// An anonymous flag without a user id degrades to non-registered.
    pub fn classify(user_id: Option<Uuid>, anonymous: bool) -> Self {
        match (user_id, anonymous) {
            (Some(id), false) => DonorKind::Registered(id),
            (Some(id), true) => DonorKind::AnonymousIdentified(id),
            (None, _) => DonorKind::NonRegistered,
        }
    }

    /// User whose token balance is credited, if any
    pub fn credited_user(&self) -> Option<Uuid> {
        match self {
            DonorKind::Registered(id) | DonorKind::AnonymousIdentified(id) => Some(*id),
            DonorKind::NonRegistered => None,
        }
    }

    /// Donor reference recorded in the ledger entry
    pub fn ledger_donor_id(&self) -> Option<Uuid> {
        match self {
            DonorKind::Registered(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, DonorKind::AnonymousIdentified(_))
    }
}

/// Badge awarded to a user for crossing a cumulative token threshold
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Badge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub badge_name: String,
    pub badge_pic: String,
    pub description: String,
    pub acquired: bool,
    pub awarded_at: DateTime<Utc>,
}

/// Named leaderboard entry (anonymous and non-registered donations excluded)
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub donor_id: Uuid,
    pub donor_name: String,
    pub total_amount: i64,
}

// ===== Request / response DTOs =====

/// Request DTO for donating to a campaign
#[derive(Debug, Deserialize, Validate)]
pub struct DonateRequest {
    pub user_id: Option<Uuid>,
    pub campaign_id: Uuid,
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    #[serde(default)]
    pub anonymous: bool,
    pub payment_method: Option<String>,
}

/// Request DTO for donating to a sub-campaign
#[derive(Debug, Deserialize, Validate)]
pub struct SubCampaignDonateRequest {
    pub user_id: Option<Uuid>,
    pub sub_campaign_id: Uuid,
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
    #[serde(default)]
    pub anonymous: bool,
    pub payment_method: Option<String>,
}

/// Request DTO for a donation by a non-registered visitor
#[derive(Debug, Deserialize, Validate)]
pub struct NonRegisteredDonateRequest {
    pub campaign_id: Uuid,
    #[validate(range(min = 1, message = "amount must be positive"))]
    pub amount: i64,
}

/// Request DTO for creating a campaign
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCampaignRequest {
    /// The owning organization's user id
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub campaign_name: String,
    #[validate(url)]
    pub campaign_image: String,
    #[validate(range(min = 1))]
    pub goal_amount: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub description: Option<String>,
}

/// Request DTO for creating a sub-campaign
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSubCampaignRequest {
    pub parent_campaign_id: Uuid,
    pub influencer_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(range(min = 1))]
    pub goal_amount: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Request DTO for creating a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    #[serde(flatten)]
    pub role: UserRole,
}

/// Request DTO for appending a campaign announcement
#[derive(Debug, Deserialize, Validate)]
pub struct AddNewsRequest {
    #[validate(length(min = 1))]
    pub news: String,
}

/// Query parameters for leaderboard reads
#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// Donation as shown in campaign detail views, with the anonymity marker
/// surfaced as a flag
#[derive(Debug, Serialize)]
pub struct DonationView {
    #[serde(flatten)]
    pub donation: Donation,
    pub is_anonymous: bool,
}

/// Campaign detail: the campaign, its donations, and its computed leaderboard
#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub donations: Vec<DonationView>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Sub-campaign detail with its donation ledger entries
#[derive(Debug, Serialize)]
pub struct SubCampaignDetail {
    pub sub_campaign: SubCampaign,
    pub donations: Vec<Donation>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donor_classification() {
        let id = Uuid::new_v4();

        assert_eq!(
            DonorKind::classify(Some(id), false),
            DonorKind::Registered(id)
        );
        assert_eq!(
            DonorKind::classify(Some(id), true),
            DonorKind::AnonymousIdentified(id)
        );
        assert_eq!(DonorKind::classify(None, false), DonorKind::NonRegistered);

        // Anonymous without an account degrades to non-registered
        assert_eq!(DonorKind::classify(None, true), DonorKind::NonRegistered);
    }

    #[test]
    fn test_anonymous_identity_withheld_from_ledger() {
        let id = Uuid::new_v4();
        let donor = DonorKind::AnonymousIdentified(id);

        assert_eq!(donor.ledger_donor_id(), None);
        assert_eq!(donor.credited_user(), Some(id));
        assert!(donor.is_anonymous());
    }

    #[test]
    fn test_non_registered_credits_nobody() {
        let donor = DonorKind::NonRegistered;
        assert_eq!(donor.credited_user(), None);
        assert_eq!(donor.ledger_donor_id(), None);
    }

    #[test]
    fn test_donate_request_rejects_non_positive_amount() {
        let request = DonateRequest {
            user_id: None,
            campaign_id: Uuid::new_v4(),
            amount: 0,
            anonymous: false,
            payment_method: None,
        };
        assert!(request.validate().is_err());

        let request = DonateRequest {
            amount: -50,
            ..request
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_role_tags() {
        assert_eq!(
            UserRole::Donor {
                payment_method: None
            }
            .tag(),
            "Donor"
        );
        assert_eq!(UserRole::Admin.tag(), "Admin");
        assert!(UserRole::Organization {
            organization_type: "NGO".to_string(),
            industry: None
        }
        .is_organization());
    }

    #[test]
    fn test_role_round_trips_through_json() {
        let role = UserRole::Influencer {
            contract: Some("2026".to_string()),
        };
        let json = serde_json::to_value(&role).unwrap();
        assert_eq!(json["role"], "Influencer");

        let back: UserRole = serde_json::from_value(json).unwrap();
        assert_eq!(back, role);
    }
}
