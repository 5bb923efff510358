//! Content-based recommenders built on a fitted vector space model

pub mod hits;
pub mod search;
pub mod similar;
