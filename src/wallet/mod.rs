mod address;

pub use address::{ADDRESS_LEN, Address};

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey, ecdsa::Signature};

/// Generate a new secp256k1 keypair and return (priv_hex, pub_hex_compressed, address).
/// The address is the compressed public key itself.
pub fn generate_keypair_hex() -> (String, String, Address) {
    let secp = Secp256k1::new();
    let (sk, pk) = secp.generate_keypair(&mut OsRng);
    let sk_hex = hex::encode(sk.secret_bytes());
    let pk_bytes = pk.serialize(); // compressed (33 bytes)
    (sk_hex, hex::encode(pk_bytes), Address::from_bytes(pk_bytes))
}

/// Derive the account address from a hex public key (compressed or uncompressed).
pub fn pubkey_to_address(pubkey_hex: &str) -> Result<Address, &'static str> {
    let bytes = hex::decode(pubkey_hex).map_err(|_| "invalid pubkey hex")?;
    let pk = PublicKey::from_slice(&bytes).map_err(|_| "invalid pubkey bytes")?;
    Ok(Address::from_bytes(pk.serialize()))
}

/// Sign a 32-byte message hash with a hex private key. Returns the hex DER signature.
pub fn sign_hex(secret_hex: &str, msg32: [u8; 32]) -> Result<String, &'static str> {
    let secp = Secp256k1::signing_only();

    let sk_bytes = hex::decode(secret_hex).map_err(|_| "invalid secret key hex")?;
    let sk = SecretKey::from_slice(&sk_bytes).map_err(|_| "invalid secret key bytes")?;

    let msg = Message::from_slice(&msg32).map_err(|_| "invalid message length")?;
    Ok(hex::encode(secp.sign_ecdsa(&msg, &sk).serialize_der()))
}

/// Verify a signature (hex DER) against the given pubkey (hex) and message hash (32 bytes).
pub fn verify_signature_hex(
    pubkey_hex: &str,
    sig_hex: &str,
    msg32: [u8; 32],
) -> Result<bool, &'static str> {
    let secp = Secp256k1::verification_only();

    let sig_bytes = hex::decode(sig_hex).map_err(|_| "invalid signature hex")?;
    let sig = Signature::from_der(&sig_bytes).map_err(|_| "invalid DER signature")?;

    let pk_bytes = hex::decode(pubkey_hex).map_err(|_| "invalid pubkey hex")?;
    let pk = PublicKey::from_slice(&pk_bytes).map_err(|_| "invalid pubkey bytes")?;

    let msg = Message::from_slice(&msg32).map_err(|_| "invalid message length")?;
    Ok(secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
}
