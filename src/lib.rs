//! Betta Wishlist - client-side wishlist synchronization
//!
//! This crate keeps a shopper's wishlist consistent across independent UI
//! consumers: a TTL cache avoids redundant reads, the store owns the one
//! authoritative snapshot, and a debounced bus fans changes out to every
//! registered view.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
