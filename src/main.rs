use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::io;

use drip_faucet::api::{self, AppState, Runtime};
use drip_faucet::config::Settings;
use drip_faucet::units::format_ether;
use drip_faucet::wallet::generate_keypair_hex;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let settings =
        Settings::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let owner = match settings.owner {
        Some(owner) => owner,
        None => {
            let (sk, pk, addr) = generate_keypair_hex();
            warn!("FAUCET_OWNER not set; generated a dev owner keypair");
            println!("🔑 Dev owner address: {addr}");
            println!("   public key:  {pk}");
            println!("   private key: {sk}");
            addr
        }
    };

    let runtime = Runtime::deploy(owner, settings.drip, settings.initial_funds)
        .map_err(|e| io::Error::other(format!("deployment failed: {e}")))?;
    info!(
        "signature window {}s, dev mint {}",
        settings.signature_ttl_secs,
        if settings.dev_mint { "enabled" } else { "disabled" }
    );

    println!(
        "🚰 Starting faucet API at http://{}:{} (drip {}, balance {})",
        settings.host,
        settings.port,
        format_ether(settings.drip.drip_amount),
        format_ether(settings.initial_funds),
    );

    let state = web::Data::new(AppState::new(
        runtime,
        settings.signature_ttl_secs,
        settings.dev_mint,
    ));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((settings.host.as_str(), settings.port))?
    .run()
    .await
}
