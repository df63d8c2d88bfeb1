pub mod auth;
mod balance;
pub mod error;
pub mod faucet;
mod health;
pub mod models;
pub mod runtime;
mod wallet;


use actix_web::web::{self, ServiceConfig};

pub use auth::Signed;
pub use models::AppState;
pub use runtime::Runtime;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(faucet::get_status)
            .service(faucet::get_claim_status)
            .service(faucet::get_events)
            .service(faucet::post_claim)
            .service(faucet::post_donate)
            .service(faucet::post_fund)
            .service(faucet::post_config)
            .service(faucet::post_pause)
            .service(faucet::post_owner)
            .service(balance::get_balance)
            .service(balance::post_mint)
            .service(wallet::create_wallet),
    );
}
