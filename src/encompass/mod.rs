//! Encompass API
//!
//! Thin client over the five Encompass REST calls used to file a document
//! into a loan's eFolder:
//! - password-grant token exchange
//! - loan pipeline search by loan number
//! - document placeholder listing and creation
//! - attachment upload session plus the presigned binary PUT

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::EncompassApi;
pub use client::EncompassClient;
pub use error::{EncompassError, EncompassResult};
pub use types::{AccessToken, AttachmentUploadRequest, DocumentPlaceholder, FileMetadata, UploadSession};
