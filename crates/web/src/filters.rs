//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Groups the integer digits of a rendered amount in thousands.
///
/// `12450.00 DZD` becomes `12,450.00 DZD`; text without a leading number is
/// returned unchanged.
///
/// Usage in templates: `{{ wallet.balance()|grouped }}`
#[askama::filter_fn]
pub fn grouped(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(group_thousands(&value.to_string()))
}

/// Signed percentage label for growth figures: `+12.5%`, `-3%`.
///
/// Usage in templates: `{{ point.growth|growth }}` inside an `if let`.
#[askama::filter_fn]
pub fn growth(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let rendered = value.to_string();
    Ok(if rendered.starts_with('-') {
        format!("{rendered}%")
    } else {
        format!("+{rendered}%")
    })
}

fn group_thousands(text: &str) -> String {
    let (sign, rest) = text
        .strip_prefix('-')
        .map_or(("", text), |rest| ("-", rest));
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return text.to_owned();
    }
    let (digits, tail) = rest.split_at(digits_end);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("12450.00 DZD"), "12,450.00 DZD");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands("950.50 DZD"), "950.50 DZD");
        assert_eq!(group_thousands("-1000.00 DZD"), "-1,000.00 DZD");
        assert_eq!(group_thousands("n/a"), "n/a");
    }
}
