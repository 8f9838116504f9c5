//! Kinarc DB Library
//!
//! Postgres repositories over `sqlx` for media records, users, and
//! articles. Queries are dynamic (`sqlx::query`/`query_as`) so builds do
//! not require a live `DATABASE_URL`; migrations live at the workspace
//! `migrations/` directory and run at startup.

mod articles;
mod media;
mod users;

pub use articles::ArticleRepository;
pub use media::{CreateOutcome, MediaListRow, MediaRepository, NewMedia};
pub use users::UserRepository;
