use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

static TRAILING_ZEROS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\.\d*?[1-9])0+$").expect("trailing zeros pattern is valid")
});

const MIN_FRACTION_DIGITS: usize = 4;

/// `"$ 1,234.5"`, `"- $ 20"`, or `"+ $ 15"` when `force_sign` is set.
/// Missing values render as `"$ 0"`.
pub fn format_currency(value: Option<Decimal>, force_sign: bool) -> String {
    let Some(value) = value else {
        return String::from("$ 0");
    };

    let magnitude = group_thousands(value.abs(), 3);
    if value.is_sign_negative() && !value.is_zero() {
        format!("- $ {}", magnitude)
    } else if force_sign && !value.is_zero() {
        format!("+ $ {}", magnitude)
    } else {
        format!("$ {}", magnitude)
    }
}

/// Compact quantity display: K/M/B above a thousand, full precision below one.
pub fn abbreviate(value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return String::from("-");
    };

    let abs = value.abs();
    if abs < Decimal::ONE {
        return fixed_point(value);
    }

    if abs >= dec!(1000000000) {
        format!("{}B", to_fixed(value / dec!(1000000000), 4))
    } else if abs >= dec!(1000000) {
        format!("{}M", to_fixed(value / dec!(1000000), 4))
    } else if abs >= dec!(1000) {
        format!("{}K", to_fixed(value / dec!(1000), 4))
    } else {
        to_fixed(value, 4)
    }
}

pub fn sign_prefix(value: Decimal) -> &'static str {
    if value > Decimal::ZERO {
        "+"
    } else if value < Decimal::ZERO {
        "-"
    } else {
        ""
    }
}

/// `"+"` or `"-"` by sign, then the abbreviated magnitude.
pub fn signed_abbreviation(value: Decimal) -> String {
    format!("{}{}", sign_prefix(value), abbreviate(Some(value.abs())))
}

fn to_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

fn fixed_point(value: Decimal) -> String {
    if value.round_dp(8).is_zero() {
        return to_fixed(Decimal::ZERO, MIN_FRACTION_DIGITS as u32);
    }

    let mut text = TRAILING_ZEROS
        .replace(&to_fixed(value, 8), "$1")
        .into_owned();

    let fraction_digits = text.split_once('.').map_or(0, |(_, f)| f.len());
    if (1..MIN_FRACTION_DIGITS).contains(&fraction_digits) {
        text.push_str(&"0".repeat(MIN_FRACTION_DIGITS - fraction_digits));
    }
    text
}

fn group_thousands(value: Decimal, max_dp: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
