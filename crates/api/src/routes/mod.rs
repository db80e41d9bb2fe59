//! Route Handlers

pub mod ask;
pub mod auth;
pub mod progress;
pub mod questions;
