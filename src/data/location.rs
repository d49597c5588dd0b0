//! Free-text location parsing
//!
//! Accepts "City, State", "City State" or "City" and splits it into tokens.

use super::LocationQuery;

/// Splits raw input into city and state tokens.
///
/// Tokens are separated by whitespace and commas; empty tokens are dropped.
/// The last token becomes the state when there are two or more tokens. The
/// state token is not validated, so "New York City" parses with "City" as
/// the state and downstream filtering falls back to all candidates.
pub fn parse_location(raw: &str) -> LocationQuery {
    let parts: Vec<&str> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();

    match parts.split_last() {
        None => LocationQuery::default(),
        Some((only, [])) => LocationQuery {
            city: (*only).to_string(),
            state: String::new(),
        },
        Some((state, city)) => LocationQuery {
            city: city.join(" "),
            state: (*state).to_string(),
        },
    }
}
