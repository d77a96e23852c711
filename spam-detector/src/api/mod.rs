//! HTTP surface for spam-detector
//!
//! Provides the HTML form and the JSON API

pub mod handlers;
pub mod server;
pub mod web;

pub use server::ApiServer;
