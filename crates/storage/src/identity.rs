//! Canonical driver identity.
//!
//! The telemetry source reports the same driver under multiple spellings
//! (most prominently "Andrea Kimi Antonelli" vs "Kimi Antonelli"). Every
//! name that crosses the ingestion boundary goes through [`resolve`] so that
//! exactly one row per driver exists for any (season, round). Storing a raw
//! name anywhere else is a bug.

use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Andrea Kimi Antonelli", "Kimi Antonelli");
        m.insert("Alex Albon", "Alexander Albon");
        m.insert("Carlos Sainz Jr.", "Carlos Sainz");
        m.insert("Nico Huelkenberg", "Nico Hulkenberg");
        m
    };
    static ref NATIONALITIES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Lando Norris", "British");
        m.insert("Max Verstappen", "Dutch");
        m.insert("George Russell", "British");
        m.insert("Kimi Antonelli", "Italian");
        m.insert("Alexander Albon", "Thai");
        m.insert("Lance Stroll", "Canadian");
        m.insert("Nico Hulkenberg", "German");
        m.insert("Charles Leclerc", "Monegasque");
        m.insert("Oscar Piastri", "Australian");
        m.insert("Lewis Hamilton", "British");
        m.insert("Pierre Gasly", "French");
        m.insert("Yuki Tsunoda", "Japanese");
        m.insert("Esteban Ocon", "French");
        m.insert("Oliver Bearman", "British");
        m.insert("Liam Lawson", "New Zealander");
        m.insert("Gabriel Bortoleto", "Brazilian");
        m.insert("Fernando Alonso", "Spanish");
        m.insert("Carlos Sainz", "Spanish");
        m.insert("Jack Doohan", "Australian");
        m.insert("Isack Hadjar", "French");
        m
    };
}

/// Resolves a raw driver name to its canonical form.
///
/// Unmapped names pass through unchanged, so the function is total and
/// idempotent: `resolve(resolve(x)) == resolve(x)`.
pub fn resolve(raw: &str) -> &str {
    ALIASES.get(raw).copied().unwrap_or(raw)
}

/// Nationality for a canonical driver name, when known.
pub fn nationality(canonical: &str) -> Option<&'static str> {
    NATIONALITIES.get(canonical).copied()
}
