use serde::Serialize;

/// Base unit of the rate table.
pub const BASE_CURRENCY: &str = "USD";

/// Symbol used for codes missing from the registry.
const FALLBACK_SYMBOL: &str = "$";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
    /// Units of this currency per one unit of [`BASE_CURRENCY`]
    pub rate: f64,
}

const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", name: "US Dollar", rate: 1.0 },
    Currency { code: "EUR", symbol: "€", name: "Euro", rate: 0.92 },
    Currency { code: "GBP", symbol: "£", name: "British Pound", rate: 0.79 },
    Currency { code: "INR", symbol: "₹", name: "Indian Rupee", rate: 83.0 },
    Currency { code: "JPY", symbol: "¥", name: "Japanese Yen", rate: 149.0 },
    Currency { code: "AUD", symbol: "A$", name: "Australian Dollar", rate: 1.52 },
    Currency { code: "CAD", symbol: "C$", name: "Canadian Dollar", rate: 1.36 },
    Currency { code: "CHF", symbol: "CHF", name: "Swiss Franc", rate: 0.88 },
    Currency { code: "CNY", symbol: "¥", name: "Chinese Yuan", rate: 7.24 },
    Currency { code: "AED", symbol: "AED", name: "UAE Dirham", rate: 3.67 },
    Currency { code: "SGD", symbol: "S$", name: "Singapore Dollar", rate: 1.34 },
    Currency { code: "THB", symbol: "฿", name: "Thai Baht", rate: 35.5 },
    Currency { code: "MYR", symbol: "RM", name: "Malaysian Ringgit", rate: 4.68 },
    Currency { code: "IDR", symbol: "Rp", name: "Indonesian Rupiah", rate: 15650.0 },
    Currency { code: "PHP", symbol: "₱", name: "Philippine Peso", rate: 55.5 },
    Currency { code: "VND", symbol: "₫", name: "Vietnamese Dong", rate: 24350.0 },
];

/// All registered currencies, in display order.
pub fn currencies() -> &'static [Currency] {
    CURRENCIES
}

pub fn lookup(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code == code)
}

pub fn is_supported(code: &str) -> bool {
    lookup(code).is_some()
}

/// Rate of `code` against the base unit; unknown codes count as base units.
fn rate(code: &str) -> f64 {
    lookup(code).map(|c| c.rate).unwrap_or(1.0)
}

/// Convert `amount` from one currency to another via the base unit.
///
/// Unknown codes are tolerated and treated as rate 1.0.
pub fn convert(amount: f64, from: &str, to: &str) -> f64 {
    if from == to {
        return amount;
    }
    amount / rate(from) * rate(to)
}

/// Render `amount` as an en-US currency string with no decimals, e.g. `€1,235`.
pub fn format(amount: f64, code: &str) -> String {
    let symbol = lookup(code).map(|c| c.symbol).unwrap_or(FALLBACK_SYMBOL);
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = group_thousands(rounded.abs() as u64);

    if symbol.chars().all(|c| c.is_ascii_alphabetic()) {
        format!("{}{} {}", sign, symbol, digits)
    } else {
        format!("{}{}{}", sign, symbol, digits)
    }
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_round_trip() {
        let eur = convert(100.0, "USD", "EUR");
        assert!((eur - 92.0).abs() < 1e-9);

        let usd = convert(eur, "EUR", "USD");
        assert!((usd - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_convert_same_code_is_identity() {
        assert_eq!(convert(123.45, "XYZ", "XYZ"), 123.45);
        assert_eq!(convert(99.0, "INR", "INR"), 99.0);
    }

    #[test]
    fn test_convert_unknown_code_uses_base_rate() {
        assert_eq!(convert(50.0, "XYZ", "USD"), 50.0);
        assert!((convert(10.0, "XYZ", "INR") - 830.0).abs() < 1e-9);
    }

    #[test]
    fn test_format() {
        assert_eq!(format(1234.56, "USD"), "$1,235");
        assert_eq!(format(92.0, "EUR"), "€92");
        assert_eq!(format(1500000.0, "INR"), "₹1,500,000");
        assert_eq!(format(880.4, "CHF"), "CHF 880");
        assert_eq!(format(-5.0, "USD"), "-$5");
        assert_eq!(format(0.0, "GBP"), "£0");
    }

    #[test]
    fn test_format_unregistered_code_falls_back() {
        assert_eq!(format(10.0, "XYZ"), "$10");
    }

    #[test]
    fn test_registry() {
        assert_eq!(currencies().len(), 16);
        assert!(is_supported("SGD"));
        assert!(!is_supported("usd"));
        assert_eq!(lookup(BASE_CURRENCY).unwrap().rate, 1.0);
    }
}
