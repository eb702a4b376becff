// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod campground_service;
pub mod geocoder;
pub mod rate_limit;
pub mod review_service;
pub mod session_service;

pub use auth_service::*;
pub use campground_service::*;
pub use geocoder::*;
pub use rate_limit::*;
pub use review_service::*;
pub use session_service::*;
