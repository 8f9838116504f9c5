//! Domain models shared across crates.

pub mod article;
pub mod media;
pub mod user;

pub use article::{Article, ArticleResponse, NewArticle};
pub use media::{
    MediaListItem, MediaListResponse, MediaRecord, MediaRecordResponse, MediaStatus,
    OptimizedVariant,
};
pub use user::{SessionIdentity, UploaderInfo, User};
