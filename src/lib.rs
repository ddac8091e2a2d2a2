//! Production Lists Library
//!
//! Fetches the commodity and country listings from the production data API,
//! caches them for a day and reshapes them into display-ready lists.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod fetcher;
pub mod links;
pub mod lists;
pub mod logging;
pub mod notify;
pub mod render;

pub use fetcher::{DataFetcher, RawRow, Resource};
pub use lists::ListService;
