pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fixture_fetch;
pub mod http_client;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod standings;
pub mod team_form;
pub mod win_prob;
