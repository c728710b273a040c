use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use tracing::debug;

/// Signed parameter names, as the image host spells them
pub const EAGER_PARAM: &str = "eager";
pub const PUBLIC_ID_PARAM: &str = "public_id";
pub const TIMESTAMP_PARAM: &str = "timestamp";

/// Build the `key=value&...` string that gets signed.
/// Keys are emitted in lexicographic order; the secret is not part of it.
pub fn build_signature_payload(timestamp: &str, public_id: &str, eager: &str) -> String {
    let params: BTreeMap<&str, &str> = BTreeMap::from([
        (EAGER_PARAM, eager),
        (PUBLIC_ID_PARAM, public_id),
        (TIMESTAMP_PARAM, timestamp),
    ]);

    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Sign upload parameters: SHA1(payload || secret), lowercase hex
pub fn sign_upload_params(timestamp: &str, public_id: &str, eager: &str, secret: &str) -> String {
    let payload = build_signature_payload(timestamp, public_id, eager);
    let digest = hex::encode(
        Sha1::new()
            .chain_update(payload.as_bytes())
            .chain_update(secret.as_bytes())
            .finalize(),
    );
    debug!(payload = %payload, signature = %digest, "Signed upload parameters");
    digest
}
