//! Core types and logic for Salinha, a two-room booking system.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! holds the reservation model, form validation, day windows, the overlap
//! check, the per-room dashboard, the [`store::ReservationStore`] trait and
//! the conflict-gated [`service::ReservationService`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dashboard;
pub mod error;
pub mod memory;
pub mod overlap;
pub mod reservation;
pub mod service;
pub mod store;
pub mod validate;
pub mod window;

pub use error::{Error, Result};
