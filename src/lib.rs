//! Waybill bookkeeping and passenger analytics for a small bus fleet.

pub mod aggregate;
pub mod cli;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod format;
pub mod journal;
pub mod models;
pub mod period;
pub mod rank;
pub mod report;
pub mod seed;
pub mod store;
