//! # archive-query
//!
//! Read reconciliation and mutation coordination for the image-archive
//! client.
//!
//! This crate provides:
//! - Query identities and the filter → read resolver
//! - An identity-keyed result cache with dedup, retry and invalidation
//! - The gallery view reconciler (search vs. recent feed)
//! - A trailing-edge debouncer and the gallery filter controller
//! - Upload and comparison coordinators with user-facing notices
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use archive_core::SearchFilters;
//! use archive_gateway::JsonRpcGateway;
//! use archive_query::ArchiveClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let gateway = Arc::new(JsonRpcGateway::from_env().unwrap());
//!     let client = ArchiveClient::new(gateway);
//!     let view = client.reconciler().reconcile(&SearchFilters::default()).await;
//!     println!("{} records", view.len());
//! }
//! ```

pub mod cache;
pub mod client;
pub mod debounce;
pub mod key;
pub mod mutation;
pub mod notify;
pub mod reconciler;
pub mod resolver;

pub use cache::{CacheConfig, CacheEvent, CacheStats, QueryCache, QuerySnapshot, QueryStatus};
pub use client::ArchiveClient;
pub use debounce::{Debouncer, FilterEdit, GalleryController};
pub use key::{QueryData, QueryKey};
pub use mutation::{
    CompareCoordinator, CompareSelection, DraftImage, MutationPhase, UploadCoordinator,
    UploadDraft,
};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use reconciler::{GalleryView, ViewReconciler};
pub use resolver::resolve;
