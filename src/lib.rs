pub mod app_state;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod repositories;
pub mod services;

#[cfg(test)]
pub mod test_utils;
