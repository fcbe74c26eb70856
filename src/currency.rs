// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use crate::models::ExchangeRateTable;

/// Display symbols and the ISO codes they stand for.
pub const SYMBOLS: [(&str, &str); 6] = [
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("₺", "TRY"),
    ("¥", "JPY"),
    ("CN¥", "CNY"),
];

/// Code all rates are quoted against.
pub const REFERENCE_CODE: &str = "USD";

/// ISO code for a display symbol. Unknown symbols are treated as USD.
pub fn code_for_symbol(symbol: &str) -> &'static str {
    SYMBOLS
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, c)| *c)
        .unwrap_or(REFERENCE_CODE)
}

pub fn symbol_for_code(code: &str) -> Option<&'static str> {
    SYMBOLS
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code))
        .map(|(s, _)| *s)
}

pub fn is_known_symbol(symbol: &str) -> bool {
    SYMBOLS.iter().any(|(s, _)| *s == symbol)
}

/// Accepts a symbol (`€`) or an ISO code (`eur`) and returns the canonical symbol.
pub fn parse_currency(input: &str) -> Option<&'static str> {
    let input = input.trim();
    SYMBOLS
        .iter()
        .find(|(s, _)| *s == input)
        .map(|(s, _)| *s)
        .or_else(|| symbol_for_code(input))
}

/// Converts through the USD reference: `amount / rate[from] * rate[to]`.
/// Same-code conversions are returned untouched. Results out of `Decimal`
/// range saturate at `Decimal::MAX` or `Decimal::MIN`.
pub fn convert(amount: Decimal, from: &str, to: &str, rates: &ExchangeRateTable) -> Decimal {
    let from_code = code_for_symbol(from);
    let to_code = code_for_symbol(to);
    if from_code == to_code {
        return amount;
    }
    let saturated = if amount.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    amount
        .checked_div(rates.rate(from_code))
        .unwrap_or(saturated)
        .saturating_mul(rates.rate(to_code))
}

pub fn fmt_money(amount: Decimal, symbol: &str) -> String {
    format!("{}{:.2}", symbol, amount.round_dp(2))
}
