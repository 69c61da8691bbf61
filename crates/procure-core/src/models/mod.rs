//! Data models and configuration.

pub mod commodity;
pub mod config;
pub mod procurement;
pub mod request;
