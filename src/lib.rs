//! Coursecraft - Course Platform Backend
//!
//! This crate implements the payment-webhook reconciliation core of a course
//! platform: an external payment provider asynchronously reports checkout
//! completion or payment failure, and the service transitions purchase
//! records through their state machine while idempotently linking users and
//! course rosters.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
