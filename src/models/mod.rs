//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod advertisement;
pub mod image;
pub mod group;

// Re-export commonly used models
pub use advertisement::{Advertisement, NewAdvertisement, UpdateAdvertisementRequest, AdvertisementFilter};
pub use image::{Image, NewImage, UpdateImageRequest};
pub use group::{Group, NewGroup, UpdateGroupRequest};
