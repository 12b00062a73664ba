//! Wakalni Core - domain library for the restaurant ordering platform.
//!
//! This crate holds everything the web server computes, independent of HTTP:
//! - [`cart`] - the session cart store (line merging, quantities, totals)
//! - [`catalog`] - restaurants, menu items and supplements
//! - [`accounts`] - customers, restaurant staff and delivery drivers
//! - [`promo`] - promotion codes and discount validation
//! - [`orders`] - restaurant orders and their kitchen workflow
//! - [`inventory`] - stock items, stock levels and adjustments
//! - [`wallet`] - transaction ledgers, balances and withdrawals
//! - [`stats`] - dashboard aggregates for admins and superadmins
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no clocks except where a timestamp is passed in. This keeps it
//! lightweight and trivially testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod cart;
pub mod catalog;
pub mod inventory;
pub mod orders;
pub mod promo;
pub mod stats;
pub mod types;
pub mod wallet;

pub use types::*;
