use chrono::{DateTime, Utc};

pub mod constant;
pub mod logger;
pub mod pair;

pub use constant::*;
pub use pair::*;

pub type Symbol = String;

/// Uppercases and trims a user-supplied trading pair.
pub fn normalize_symbol(raw: &str) -> Symbol {
    raw.trim().to_ascii_uppercase()
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
