//! Route Handlers

pub mod analytics;
pub mod tracks;
