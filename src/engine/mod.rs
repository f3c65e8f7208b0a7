pub mod models;
pub mod activity;
pub mod authority;
pub mod config;
pub mod session;
pub mod simulator;
pub mod arena;
pub mod bot_strategy;
pub mod bot_profiles;
