pub mod binance;
pub mod config;
pub mod delta;
pub mod error;
pub mod event;
pub mod input;
pub mod model;
pub mod poller;
pub mod ticker_set;
pub mod ui;
