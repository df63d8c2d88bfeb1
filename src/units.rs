use thiserror::Error;

/// Decimals of the native currency (smallest unit = 10^-18).
pub const NATIVE_DECIMALS: u8 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("empty amount")]
    Empty,
    #[error("invalid digit in amount '{0}'")]
    InvalidDigit(String),
    #[error("amount '{0}' has more than {1} fractional digits")]
    TooPrecise(String, u8),
    #[error("amount '{0}' does not fit in 128 bits")]
    Overflow(String),
}

fn scale(decimals: u8) -> Result<u128, UnitsError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or_else(|| UnitsError::Overflow(format!("10^{decimals}")))
}

/// Parse a decimal string like "0.1" into smallest units with `decimals` places.
pub fn parse_units(input: &str, decimals: u8) -> Result<u128, UnitsError> {
    let s = input.trim();
    if s.is_empty() || s == "." {
        return Err(UnitsError::Empty);
    }

    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, f),
        None => (s, ""),
    };
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return Err(UnitsError::InvalidDigit(s.to_string()));
    }
    if frac_part.len() > decimals as usize {
        return Err(UnitsError::TooPrecise(s.to_string(), decimals));
    }

    let overflow = || UnitsError::Overflow(s.to_string());
    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| overflow())?
    };
    let frac_value: u128 = if frac_part.is_empty() {
        0
    } else {
        let digits: u128 = frac_part.parse().map_err(|_| overflow())?;
        digits * scale(decimals - frac_part.len() as u8)?
    };

    int_value
        .checked_mul(scale(decimals)?)
        .and_then(|v| v.checked_add(frac_value))
        .ok_or_else(overflow)
}

/// Render smallest units as a decimal string, keeping at least one fractional digit.
pub fn format_units(value: u128, decimals: u8) -> String {
    let Ok(unit) = scale(decimals) else {
        return value.to_string();
    };
    if decimals == 0 {
        return value.to_string();
    }
    let int_part = value / unit;
    let frac = format!("{:0width$}", value % unit, width = decimals as usize);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{int_part}.0")
    } else {
        format!("{int_part}.{frac}")
    }
}

pub fn parse_ether(input: &str) -> Result<u128, UnitsError> {
    parse_units(input, NATIVE_DECIMALS)
}

pub fn format_ether(value: u128) -> String {
    format_units(value, NATIVE_DECIMALS)
}
