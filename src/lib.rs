//! Tienda library
//!
//! Storefront client for the catalog and cart endpoints, exported for the
//! terminal front end and for testing.

pub mod action;
pub mod cart;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod event;
pub mod logging;
pub mod search;
pub mod session;
pub mod storefront;
pub mod tui;
