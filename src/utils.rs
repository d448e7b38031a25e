use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

const MODIFIERS: [&str; 4] = ["ctrl", "alt", "shift", "meta"];

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque value round-tripped through the authorization redirect.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Current time as a unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Canonical form of a key sequence such as `Shift+Right`.
///
/// Lowercases every part, maps `control`/`cmd` aliases, and orders modifiers
/// as ctrl, alt, shift, meta so `shift+CTRL+s` and `Ctrl+Shift+S` compare
/// equal. Returns `None` for an empty sequence or one without a key.
pub fn normalize_key_sequence(sequence: &str) -> Option<String> {
    let mut modifiers: Vec<&str> = Vec::new();
    let mut key: Option<String> = None;

    for part in sequence.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        let lower = part.to_lowercase();
        let canonical = match lower.as_str() {
            "control" => "ctrl",
            "option" => "alt",
            "cmd" | "command" | "super" | "win" => "meta",
            other => other,
        };

        if let Some(m) = MODIFIERS.iter().copied().find(|m| *m == canonical) {
            if !modifiers.contains(&m) {
                modifiers.push(m);
            }
        } else if key.is_none() {
            key = Some(canonical.to_string());
        } else {
            return None;
        }
    }

    let key = key?;
    modifiers.sort_by_key(|m| MODIFIERS.iter().position(|x| x == m));
    modifiers.push(&key);
    Some(modifiers.join("+"))
}

/// Formats milliseconds as `m:ss`.
pub fn format_duration_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
