// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod campground;
pub mod fields;
pub mod image;
pub mod review;
pub mod session;
pub mod user;
pub mod validators;

pub use campground::*;
pub use image::*;
pub use review::*;
pub use session::*;
pub use user::*;
