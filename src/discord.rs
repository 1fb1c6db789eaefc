//! A thin client for the Discord REST API (v10).
//!
//! Only the routes the tools drive are wrapped: guild channels,
//! application-command interactions, and the identity/OAuth2 endpoints.
//! Request and response shapes are pass-through; this module adds
//! authentication, connection pooling, and classification of responses
//! into the dispatcher's retry contract.

pub mod api;
pub mod application;
pub mod auth;
pub mod channel;
pub mod error;
pub mod interaction;
