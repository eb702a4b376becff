// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod campground_repository;
pub mod memory;
pub mod repository;
pub mod review_repository;
pub mod session_repository;
pub mod user_repository;

pub use memory::MemoryStore;
pub use repository::*;
