//! Repository for the `business_profiles` table.

use g1000_core::types::DbId;
use sqlx::PgPool;

use crate::models::business_profile::{
    BusinessProfile, CreateBusinessProfile, UpdateBusinessProfile,
};

const COLUMNS: &str = "user_id, company_name, contact_name, phone, website_url, industry_tags, \
                       description, logo_url, is_approved, created_at, updated_at";

pub struct BusinessProfileRepo;

impl BusinessProfileRepo {
    /// Insert the profile created at registration. Always starts unapproved.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBusinessProfile,
    ) -> Result<BusinessProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_profiles
                (user_id, company_name, contact_name, website_url, industry_tags, is_approved)
             VALUES ($1, $2, $3, $4, $5, false)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(input.user_id)
            .bind(&input.company_name)
            .bind(&input.contact_name)
            .bind(&input.website_url)
            .bind(&input.industry_tags)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<BusinessProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_profiles WHERE user_id = $1");
        sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or patch the owner's profile. Approval is never touched here.
    ///
    /// The caller must supply `company_name` when no profile exists yet.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdateBusinessProfile,
    ) -> Result<BusinessProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_profiles
                (user_id, company_name, contact_name, phone, website_url, industry_tags,
                 description, logo_url)
             VALUES ($1, COALESCE($2, ''), $3, $4, $5, COALESCE($6, '{{}}'), $7, $8)
             ON CONFLICT (user_id) DO UPDATE SET
                company_name = COALESCE($2, business_profiles.company_name),
                contact_name = COALESCE($3, business_profiles.contact_name),
                phone = COALESCE($4, business_profiles.phone),
                website_url = COALESCE($5, business_profiles.website_url),
                industry_tags = COALESCE($6, business_profiles.industry_tags),
                description = COALESCE($7, business_profiles.description),
                logo_url = COALESCE($8, business_profiles.logo_url)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(user_id)
            .bind(&input.company_name)
            .bind(&input.contact_name)
            .bind(&input.phone)
            .bind(&input.website_url)
            .bind(&input.industry_tags)
            .bind(&input.description)
            .bind(&input.logo_url)
            .fetch_one(pool)
            .await
    }

    /// Admin-only approval toggle. Returns `None` if no profile exists.
    pub async fn set_approved(
        pool: &PgPool,
        user_id: DbId,
        is_approved: bool,
    ) -> Result<Option<BusinessProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE business_profiles SET is_approved = $2 WHERE user_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessProfile>(&query)
            .bind(user_id)
            .bind(is_approved)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<BusinessProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM business_profiles ORDER BY created_at DESC");
        sqlx::query_as::<_, BusinessProfile>(&query)
            .fetch_all(pool)
            .await
    }
}
