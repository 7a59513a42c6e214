use rand::Rng;
use crate::views::types::PriceQuote;

pub const QUOTED_ROUTES: [&str; 10] = [
    "DEL ➝ BOM",
    "SYD ➝ MEL",
    "NYC ➝ LAX",
    "DXB ➝ LHR",
    "SIN ➝ BKK",
    "CDG ➝ AMS",
    "LAX ➝ SFO",
    "FRA ➝ DUB",
    "MAD ➝ BCN",
    "JFK ➝ ATL",
];

pub const MIN_PRICE: f64 = 80.0;
pub const MAX_PRICE: f64 = 400.0;

/// Simulated fares for the fixed route list, drawn uniformly and rounded to cents.
/// Nothing is remembered between calls.
pub fn price_trends<R: Rng + ?Sized>(rng: &mut R) -> Vec<PriceQuote> {
    QUOTED_ROUTES
        .iter()
        .map(|route| PriceQuote {
            route: route.to_string(),
            price: round_cents(rng.gen_range(MIN_PRICE..=MAX_PRICE)),
        })
        .collect()
}

fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
