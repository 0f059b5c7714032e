pub mod app;
pub mod auth;
pub mod components;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod photos;
pub mod state;
pub mod storage;
pub mod telemetry;
pub mod uploads;
