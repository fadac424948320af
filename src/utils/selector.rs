//! Static CSS selectors.

use scraper::Selector;

/// Selector that can never match.
const MATCH_NOTHING: &str = "*:not(*)";

/// Parses `selector`, degrading to a selector that matches nothing.
///
/// Every selector in this crate is a literal, so a parse failure is a bug;
/// it is logged with `purpose` and extraction carries on with empty results
/// instead of panicking inside a `LazyLock`.
pub fn parse_selector_with_fallback(selector: &str, purpose: &str) -> Selector {
    match Selector::parse(selector) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::error!("Invalid CSS selector {:?} for {}: {}", selector, purpose, e);
            Selector::parse(MATCH_NOTHING).expect("the match-nothing selector is valid")
        }
    }
}
