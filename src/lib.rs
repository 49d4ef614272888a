//! Library crate for tune-trivia, exposing modules for the binary and integration tests.

pub mod config;
pub mod dto;
pub mod error;
pub mod player;
pub mod routes;
pub mod services;
pub mod state;
