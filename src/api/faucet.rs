use actix_web::{HttpResponse, get, post, web};

use super::auth::Signed;
use super::error::ApiError;
use super::models::{
    AmountRequest, AppState, ClaimRequest, ClaimStatusResponse, EventsQuery, EventsResponse,
    FaucetStatusResponse, OwnerRequest, PauseRequest,
};
use crate::faucet::DripConfig;
use crate::wallet::Address;

/// Action names bound into each request signature.
pub mod actions {
    pub const CLAIM: &str = "claim";
    pub const DONATE: &str = "donate";
    pub const FUND: &str = "fund";
    pub const UPDATE_CONFIG: &str = "update_config";
    pub const SET_PAUSED: &str = "set_paused";
    pub const TRANSFER_OWNERSHIP: &str = "transfer_ownership";
}

#[get("/faucet/")]
pub async fn get_status(state: web::Data<AppState>) -> HttpResponse {
    let rt = state.runtime.lock().expect("mutex poisoned");
    let faucet = &rt.faucet;
    HttpResponse::Ok().json(FaucetStatusResponse {
        owner: faucet.owner(),
        paused: faucet.is_paused(),
        drip_amount: faucet.drip_amount(),
        cooldown_time: faucet.cooldown_time(),
        min_balance: faucet.min_balance(),
        balance: faucet.balance(),
        current_payout: faucet.payout_for(faucet.balance()),
        claimants: faucet.claimants(),
    })
}

#[get("/faucet/claims/{address}/")]
pub async fn get_claim_status(
    state: web::Data<AppState>,
    path: web::Path<(String,)>,
) -> Result<HttpResponse, ApiError> {
    let address: Address = path
        .into_inner()
        .0
        .parse()
        .map_err(|e: &str| ApiError::BadRequest(e.to_string()))?;

    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let now = rt.clock.now();
    let next_claim_at = rt.faucet.next_claim_at(&address);
    Ok(HttpResponse::Ok().json(ClaimStatusResponse {
        address,
        last_claim: rt.faucet.last_claim(&address),
        next_claim_at,
        cooldown_remaining: next_claim_at.map_or(0, |at| at.saturating_sub(now)),
        now,
    }))
}

/// Emitted events, oldest first. `?limit=n` keeps only the newest `n`.
#[get("/faucet/events/")]
pub async fn get_events(
    state: web::Data<AppState>,
    query: web::Query<EventsQuery>,
) -> HttpResponse {
    let rt = state.runtime.lock().expect("mutex poisoned");
    let skip = query
        .limit
        .map_or(0, |limit| rt.events.len().saturating_sub(limit));
    let events = rt.events.iter().skip(skip).cloned().collect::<Vec<_>>();
    HttpResponse::Ok().json(EventsResponse {
        size: events.len(),
        events,
    })
}

#[post("/faucet/claim/")]
pub async fn post_claim(
    state: web::Data<AppState>,
    body: web::Json<Signed<ClaimRequest>>,
) -> Result<HttpResponse, ApiError> {
    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let receipt = rt.execute(
        actions::CLAIM,
        &body.0,
        state.signature_ttl_secs,
        |faucet, accounts, ctx, _| faucet.claim(ctx, accounts),
    )?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[post("/faucet/donate/")]
pub async fn post_donate(
    state: web::Data<AppState>,
    body: web::Json<Signed<AmountRequest>>,
) -> Result<HttpResponse, ApiError> {
    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let receipt = rt.execute(
        actions::DONATE,
        &body.0,
        state.signature_ttl_secs,
        |faucet, accounts, ctx, req| faucet.donate(ctx, req.amount, accounts),
    )?;
    Ok(HttpResponse::Ok().json(receipt))
}

/// Plain transfer into the faucet. Succeeds silently: the receipt has no events.
#[post("/faucet/fund/")]
pub async fn post_fund(
    state: web::Data<AppState>,
    body: web::Json<Signed<AmountRequest>>,
) -> Result<HttpResponse, ApiError> {
    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let receipt = rt.execute(
        actions::FUND,
        &body.0,
        state.signature_ttl_secs,
        |faucet, accounts, ctx, req| faucet.receive(ctx, req.amount, accounts),
    )?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[post("/faucet/config/")]
pub async fn post_config(
    state: web::Data<AppState>,
    body: web::Json<Signed<DripConfig>>,
) -> Result<HttpResponse, ApiError> {
    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let receipt = rt.execute(
        actions::UPDATE_CONFIG,
        &body.0,
        state.signature_ttl_secs,
        |faucet, _, ctx, config| faucet.update_config(ctx, *config),
    )?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[post("/faucet/pause/")]
pub async fn post_pause(
    state: web::Data<AppState>,
    body: web::Json<Signed<PauseRequest>>,
) -> Result<HttpResponse, ApiError> {
    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let receipt = rt.execute(
        actions::SET_PAUSED,
        &body.0,
        state.signature_ttl_secs,
        |faucet, _, ctx, req| faucet.set_paused(ctx, req.paused),
    )?;
    Ok(HttpResponse::Ok().json(receipt))
}

#[post("/faucet/owner/")]
pub async fn post_owner(
    state: web::Data<AppState>,
    body: web::Json<Signed<OwnerRequest>>,
) -> Result<HttpResponse, ApiError> {
    let mut rt = state.runtime.lock().expect("mutex poisoned");
    let receipt = rt.execute(
        actions::TRANSFER_OWNERSHIP,
        &body.0,
        state.signature_ttl_secs,
        |faucet, _, ctx, req| faucet.transfer_ownership(ctx, req.new_owner),
    )?;
    Ok(HttpResponse::Ok().json(receipt))
}
