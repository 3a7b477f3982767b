// Library interface for the sociopedia client (also used by the integration tests)
#[macro_use]
pub mod logging;

pub mod actions;
pub mod api;
pub mod app;
pub mod config;
pub mod emoji;
pub mod follow_cache;
pub mod notify;
pub mod post_card;
pub mod server_config;
pub mod session;
pub mod storage;
pub mod store;
pub mod terminal;
pub mod ui;
