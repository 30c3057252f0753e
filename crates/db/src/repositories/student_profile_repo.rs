//! Repository for the `student_profiles` table.

use g1000_core::types::DbId;
use sqlx::PgPool;

use crate::models::student_profile::{StudentProfile, UpsertStudentProfile};

const COLUMNS: &str = "user_id, bio, major, year, linkedin_url, github_url, \
                       personal_website_url, skills, proof_of_work_urls, created_at, updated_at";

pub struct StudentProfileRepo;

impl StudentProfileRepo {
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<StudentProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM student_profiles WHERE user_id = $1");
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create the profile or replace all of its editable fields.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        input: &UpsertStudentProfile,
    ) -> Result<StudentProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO student_profiles
                (user_id, bio, major, year, linkedin_url, github_url, personal_website_url,
                 skills, proof_of_work_urls)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (user_id) DO UPDATE SET
                bio = EXCLUDED.bio,
                major = EXCLUDED.major,
                year = EXCLUDED.year,
                linkedin_url = EXCLUDED.linkedin_url,
                github_url = EXCLUDED.github_url,
                personal_website_url = EXCLUDED.personal_website_url,
                skills = EXCLUDED.skills,
                proof_of_work_urls = EXCLUDED.proof_of_work_urls
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .bind(&input.bio)
            .bind(&input.major)
            .bind(&input.year)
            .bind(&input.linkedin_url)
            .bind(&input.github_url)
            .bind(&input.personal_website_url)
            .bind(&input.skills)
            .bind(&input.proof_of_work_urls)
            .fetch_one(pool)
            .await
    }
}
