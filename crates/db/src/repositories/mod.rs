//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument. Multi-row state changes
//! run in a single transaction; status changes are compare-and-swap on
//! the expected current status.

pub mod application_repo;
pub mod approval_repo;
pub mod business_profile_repo;
pub mod challenge_repo;
pub mod comment_repo;
pub mod identity_repo;
pub mod overview_repo;
pub mod project_repo;
pub mod reflection_repo;
pub mod review_repo;
pub mod roster_repo;
pub mod student_profile_repo;
pub mod update_repo;

pub use application_repo::ApplicationRepo;
pub use approval_repo::ApprovalRepo;
pub use business_profile_repo::BusinessProfileRepo;
pub use challenge_repo::ChallengeRepo;
pub use comment_repo::CommentRepo;
pub use identity_repo::IdentityRepo;
pub use overview_repo::OverviewRepo;
pub use project_repo::ProjectRepo;
pub use reflection_repo::ReflectionRepo;
pub use review_repo::ReviewRepo;
pub use roster_repo::RosterRepo;
pub use student_profile_repo::StudentProfileRepo;
pub use update_repo::UpdateRepo;
