//! REST client for the remote account service

pub mod client;

pub use client::{ApiClient, AuthResponse};
