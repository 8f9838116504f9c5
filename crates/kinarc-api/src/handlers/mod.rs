//! HTTP request handlers.

pub mod articles;
pub mod health;
pub mod media_image;
pub mod media_list;
pub mod media_upload_complete;
pub mod media_upload_direct;
pub mod media_upload_url;
