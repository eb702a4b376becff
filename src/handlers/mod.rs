// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod campgrounds;
pub mod health;
pub mod home;
pub mod reviews;
pub mod users;
pub mod view;

pub use campgrounds::config as campgrounds_config;
pub use health::config as health_config;
pub use home::config as home_config;
pub use home::not_found;
pub use users::config as users_config;
