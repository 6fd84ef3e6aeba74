use rust_decimal::Decimal;

use crate::error::{AppError, Result};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trims `value` and fails with 400 when it is missing or blank.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

/// Like [`require_text`], but only checks values that were sent.
pub fn optional_text(field: &str, value: Option<&str>) -> Result<Option<String>> {
    value.map(|v| require_text(field, Some(v))).transpose()
}

pub fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };

    if !valid || email.chars().any(char::is_whitespace) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

/// Rounds to cents and keeps the value inside `NUMERIC(12,2)`.
pub fn validate_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() {
        return Err(AppError::BadRequest("price cannot be negative".to_string()));
    }

    let price = price.round_dp(2);
    let max_price = Decimal::new(999_999_999_999, 2);

    if price > max_price {
        return Err(AppError::BadRequest(format!(
            "price cannot exceed {}",
            max_price
        )));
    }

    Ok(price)
}

pub fn validate_stock(stock: i32) -> Result<i32> {
    if stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".to_string()));
    }

    Ok(stock)
}

/// Splits a comma separated colour list, dropping blanks and duplicates.
pub fn parse_colours(raw: &str) -> Vec<String> {
    let mut colours: Vec<String> = Vec::new();

    for colour in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if !colours.iter().any(|c| c.eq_ignore_ascii_case(colour)) {
            colours.push(colour.to_string());
        }
    }

    colours
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn blank_required_text_is_bad_request() {
        assert!(matches!(
            require_text("name", Some("   ")),
            Err(AppError::BadRequest(_))
        ));
        assert!(require_text("name", None).is_err());
        assert_eq!(require_text("name", Some("  Shoes ")).unwrap(), "Shoes");
    }

    #[test]
    fn optional_text_skips_absent_values() {
        assert_eq!(optional_text("name", None).unwrap(), None);
        assert!(optional_text("name", Some("")).is_err());
    }

    #[test]
    fn email_checks() {
        assert!(validate_email("admin@shop.com").is_ok());
        assert!(validate_email("admin@localhost").is_err());
        assert!(validate_email("@shop.com").is_err());
        assert!(validate_email("ad min@shop.com").is_err());
        assert!(validate_email("admin.shop.com").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn price_is_rounded_and_must_be_positive() {
        let price = validate_price(Decimal::from_str("19.999").unwrap()).unwrap();
        assert_eq!(price, Decimal::from_str("20.00").unwrap());
        assert!(validate_price(Decimal::from_str("-1").unwrap()).is_err());
    }

    #[test]
    fn price_must_fit_the_column() {
        let max = Decimal::from_str("9999999999.99").unwrap();
        assert_eq!(validate_price(max).unwrap(), max);

        assert!(matches!(
            validate_price(Decimal::from(99_999_999_999_999_i64)),
            Err(AppError::BadRequest(_))
        ));
        assert!(validate_price(Decimal::from_str("9999999999.995").unwrap()).is_err());
    }

    #[test]
    fn negative_stock_is_rejected() {
        assert!(validate_stock(-1).is_err());
        assert_eq!(validate_stock(0).unwrap(), 0);
    }

    #[test]
    fn colours_are_deduplicated() {
        assert_eq!(
            parse_colours("Red, blue,,red , Green"),
            vec!["Red", "blue", "Green"]
        );
        assert!(parse_colours(" , ").is_empty());
    }
}
