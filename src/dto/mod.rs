//! Request, response and event payloads.

pub mod game;
pub mod health;
pub mod sse;
pub mod validation;
