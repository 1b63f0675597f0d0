use std::sync::OnceLock;

use regex::Regex;

use crate::pincode::{PinCode, PIN_LEN};

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_digit_run, r"[0-9]+");

// ── Extraction steps ─────────────────────────────────────────────────────────

/// Strip all whitespace from raw OCR output.
///
/// OCR engines routinely split a printed code across spaces or line breaks
/// ("500 001"); collapsing whitespace first lets the extractor see the code
/// as one run. No other transformation is applied.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// All maximal digit runs of exactly six digits, in text order.
///
/// The match is boundary-sensitive: a run of seven or more digits yields
/// nothing, rather than a spurious six-digit window out of its interior.
/// `find_iter` on `[0-9]+` returns maximal runs, so filtering on run length
/// enforces the boundary rule without lookaround.
pub fn candidates(normalized: &str) -> Vec<PinCode> {
    re_digit_run()
        .find_iter(normalized)
        .filter(|m| m.as_str().len() == PIN_LEN)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// First candidate wins; `None` means no code was found.
pub fn select(candidates: Vec<PinCode>) -> Option<PinCode> {
    candidates.into_iter().next()
}
