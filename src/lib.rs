//! PalHope backend library
//!
//! Backend for the PalHope donation platform: campaigns, influencer
//! sub-campaigns, the donation pipeline with token rewards and badges, and
//! donor leaderboards.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod notifier;
pub mod rewards;
pub mod routes;
pub mod services;
pub mod state;
