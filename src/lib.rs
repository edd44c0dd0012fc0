// imgshift - HTTP image transformation service

pub mod config;
pub mod constants;
pub mod error;
pub mod fetcher;
pub mod filename;
pub mod logging;
pub mod proxy;
pub mod request;
pub mod scratch;
pub mod service;
pub mod transform;
