//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod advertisement;
pub mod image;
pub mod group;

// Re-export repositories
pub use advertisement::AdvertisementRepository;
pub use image::ImageRepository;
pub use group::GroupRepository;
