pub mod accounts;
pub mod api;
pub mod clock;
pub mod config;
pub mod faucet;
pub mod units;
pub mod wallet;
