//! Currency symbol used for extra-usage amounts.
//!
//! Amounts are always US dollars; only the symbol varies with the locale.

pub const FALLBACK_SYMBOL: &str = "$";

/// Resolves the symbol: a non-empty override wins, then the locale's symbol
/// for US dollars, then `$`.
pub fn resolve_currency_symbol(override_symbol: Option<&str>, locale: Option<&str>) -> String {
    if let Some(symbol) = override_symbol.map(str::trim).filter(|s| !s.is_empty()) {
        return symbol.to_string();
    }

    locale
        .and_then(usd_symbol_for_locale)
        .unwrap_or(FALLBACK_SYMBOL)
        .to_string()
}

/// Accepts `en-US`, `en_US` and POSIX forms such as `en_US.UTF-8@euro`.
fn parse_locale(locale: &str) -> Option<(String, Option<String>)> {
    let tag = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();
    let mut parts = tag.split(['-', '_']);

    let language = parts.next()?.to_ascii_lowercase();
    if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    // Skip script subtags such as `Hant` in `zh-Hant-TW`
    let region = parts
        .find(|p| p.len() == 2 || (p.len() == 3 && p.chars().all(|c| c.is_ascii_digit())))
        .map(|p| p.to_ascii_uppercase());

    Some((language, region))
}

/// Symbol a locale uses when formatting US dollars.
fn usd_symbol_for_locale(locale: &str) -> Option<&'static str> {
    let (language, region) = parse_locale(locale)?;
    let region = region.as_deref();

    let symbol = match language.as_str() {
        "en" => match region {
            None | Some("US") | Some("PR") | Some("001") => "$",
            Some(_) => "US$",
        },
        "es" => match region {
            Some("US") | Some("PR") => "$",
            _ => "US$",
        },
        "fr" => "$US",
        "pt" | "zh" | "ko" | "nl" | "sv" | "da" | "nb" | "fi" => "US$",
        "it" | "pl" | "cs" | "hu" => "USD",
        "de" | "ja" | "ru" | "tr" | "uk" => "$",
        _ => return None,
    };

    Some(symbol)
}

#[cfg(test)]
#[path = "tests/currency_tests.rs"]
mod tests;
