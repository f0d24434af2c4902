//! API endpoint handlers.
//!
//! One module per controller of the PDA front-end; `components` and the
//! shared half of `detection` hold the logic the per-kind handlers wrap.

pub mod components;
pub mod detection;
pub mod finger;
pub mod health;
pub mod motor;
pub mod palm;
pub mod split;
