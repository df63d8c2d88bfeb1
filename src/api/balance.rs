use actix_web::{HttpResponse, get, post, web};
use log::debug;

use super::error::ApiError;
use super::models::{AppState, BalanceResponse, MintRequest};
use crate::wallet::Address;

#[get("/balance/{address}/")]
pub async fn get_balance(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let address: Address = path
        .into_inner()
        .0
        .parse()
        .map_err(|e: &str| ApiError::BadRequest(e.to_string()))?;

    let balance = {
        let rt = state.runtime.lock().expect("mutex poisoned");
        rt.accounts.balance_of(&address)
    };

    Ok(HttpResponse::Ok().json(BalanceResponse { address, balance }))
}

/// DEV mint: credit an account directly so it can donate or fund the faucet.
#[post("/dev/mint/")]
pub async fn post_mint(
    state: web::Data<AppState>,
    body: web::Json<MintRequest>,
) -> Result<HttpResponse, ApiError> {
    if !state.dev_mint {
        return Err(ApiError::Forbidden("dev mint is disabled"));
    }
    if body.amount == 0 {
        return Err(ApiError::BadRequest("amount must be > 0".into()));
    }

    let balance = {
        let mut rt = state.runtime.lock().expect("mutex poisoned");
        let balance = rt.accounts.mint(body.address, body.amount)?;
        debug!(
            "MINT - credited {} to {}; {} accounts held",
            body.amount,
            body.address,
            rt.accounts.len()
        );
        balance
    };

    Ok(HttpResponse::Ok().json(BalanceResponse {
        address: body.address,
        balance,
    }))
}
