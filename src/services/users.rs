//! User service layer - the store surface the donation pipeline relies on

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateUserRequest, Donation, User};

/// User store service
pub struct UserService {
    db_pool: PgPool,
}

impl UserService {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    /// Create a user profile with a role payload
    pub async fn create_user(&self, request: CreateUserRequest) -> ApiResult<User> {
        request.validate()?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, address, phone_number, token_balance, role)
            VALUES ($1, $2, $3, $4, $5, 0, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.address)
        .bind(&request.phone_number)
        .bind(Json(&request.role))
        .fetch_one(&self.db_pool)
        .await?;

        tracing::info!(user_id = %user.id, role = %user.role.tag(), "User created");

        Ok(user)
    }

    /// Fetch a user by id
    pub async fn get_user(&self, id: Uuid) -> ApiResult<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    /// A user's donation records. Anonymous donations are deliberately
    /// unattributed in the ledger, so only attributed donations appear here.
    pub async fn donation_records(&self, id: Uuid) -> ApiResult<Vec<Donation>> {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.db_pool)
            .await?;
        if exists == 0 {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        let donations = sqlx::query_as::<_, Donation>(
            "SELECT * FROM donations WHERE donor_id = $1 ORDER BY donation_date DESC",
        )
        .bind(id)
        .fetch_all(&self.db_pool)
        .await?;

        Ok(donations)
    }
}
