//! UI Components for the Arweave Gallery application.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with wallet connect/disconnect
//! - [`Hero`] - Main title and description
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadSection`] - Image staging with drag & drop and upload
//! - [`GallerySection`] - Images published by the connected address
//! - [`LogsPanel`] - Per-file progress of the current batch
//! - [`ToastView`] - Batch notification

mod footer;
mod gallery_grid;
mod header;
mod hero;
mod logs;
mod toast;
mod upload;

pub use footer::*;
pub use gallery_grid::*;
pub use header::*;
pub use hero::*;
pub use logs::*;
pub use toast::*;
pub use upload::*;
