pub mod api;
pub mod app;
pub mod config;
pub mod fetch_error;
pub mod forecast;
pub mod geocoder;
pub mod historical_fetcher;
pub mod http_client;
pub mod models;
pub mod risk;
pub mod services;
pub mod simulation;
pub mod stats;
pub mod weather;
