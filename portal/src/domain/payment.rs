//! Payment method and amount validation.
//!
//! The add-payment-method form collects either a card or a bank account. All
//! checks here run before anything is sent: a number that fails the Luhn
//! check or an expired card never reaches the payments endpoint.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use mockable::Clock;
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use zeroize::Zeroizing;

/// Validation failures for payment input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentValidationError {
    /// Cardholder or account holder name was blank.
    #[error("holder name must not be empty")]
    EmptyHolderName,
    /// Card number had the wrong length or failed the Luhn check.
    #[error("card number is invalid")]
    InvalidCardNumber,
    /// Expiry was not `MM/YY`.
    #[error("expiry date must be in MM/YY format")]
    MalformedExpiry,
    /// Expiry month is in the past.
    #[error("card has expired")]
    CardExpired,
    /// CVV had the wrong length for the card brand.
    #[error("security code is invalid")]
    InvalidCvv,
    /// Routing number was not nine digits or failed its checksum.
    #[error("routing number is invalid")]
    InvalidRoutingNumber,
    /// Account number was not 4 to 17 digits.
    #[error("account number is invalid")]
    InvalidAccountNumber,
    /// Amount text was not a decimal number with at most two decimals.
    #[error("amount must be a number with at most two decimal places")]
    MalformedAmount,
    /// Amount was zero.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}

fn digits_only(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect()
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn digit_values(value: &str) -> impl DoubleEndedIterator<Item = u32> + '_ {
    value.chars().filter_map(|c| c.to_digit(10))
}

fn passes_luhn(number: &str) -> bool {
    let sum: u32 = digit_values(number)
        .rev()
        .enumerate()
        .map(|(index, digit)| {
            if index % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

fn passes_aba_checksum(routing: &str) -> bool {
    const WEIGHTS: [u32; 3] = [3, 7, 1];
    let sum: u32 = digit_values(routing)
        .zip(WEIGHTS.iter().cycle())
        .map(|(digit, weight)| digit * weight)
        .sum();
    sum % 10 == 0
}

fn last_four(digits: &str) -> String {
    let skip = digits.chars().count().saturating_sub(4);
    digits.chars().skip(skip).collect()
}

fn holder_name(raw: &str) -> Result<String, PaymentValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(PaymentValidationError::EmptyHolderName);
    }
    Ok(name.to_owned())
}

/// Card network inferred from the number prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardBrand {
    /// Numbers starting with 4.
    Visa,
    /// 51-55 and 2221-2720.
    Mastercard,
    /// 34 and 37.
    Amex,
    /// 6011 and 65.
    Discover,
    /// Anything else that passes the Luhn check.
    Other,
}

impl CardBrand {
    fn detect(digits: &str) -> Self {
        let prefix = |len: usize| -> u32 {
            digits
                .get(..len)
                .and_then(|head| head.parse().ok())
                .unwrap_or_default()
        };
        match (prefix(1), prefix(2), prefix(4)) {
            (4, _, _) => Self::Visa,
            (_, 34 | 37, _) => Self::Amex,
            (_, 51..=55, _) | (_, _, 2221..=2720) => Self::Mastercard,
            (_, 65, _) | (_, _, 6011) => Self::Discover,
            _ => Self::Other,
        }
    }

    /// Lowercase name sent to the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Discover => "discover",
            Self::Other => "other",
        }
    }

    const fn cvv_len(self) -> std::ops::RangeInclusive<usize> {
        match self {
            Self::Amex => 4..=4,
            _ => 3..=4,
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated card details.
///
/// ## Invariants
/// - `number` holds 13 to 19 digits and passes the Luhn check.
/// - the expiry month is the current month or later.
/// - `cvv` has 3 or 4 digits (exactly 4 for Amex).
#[derive(Clone, PartialEq, Eq)]
pub struct CardDetails {
    holder_name: String,
    number: Zeroizing<String>,
    brand: CardBrand,
    expiry_month: u32,
    expiry_year: i32,
    cvv: Zeroizing<String>,
}

impl CardDetails {
    /// Validate raw form input. `expiry` is `MM/YY`; spaces and dashes in the
    /// number are ignored.
    pub fn try_new(
        holder_name: &str,
        number: &str,
        expiry: &str,
        cvv: &str,
        clock: &dyn Clock,
    ) -> Result<Self, PaymentValidationError> {
        let holder_name = self::holder_name(holder_name)?;

        let number = Zeroizing::new(digits_only(number));
        if !all_digits(&number) || !(13..=19).contains(&number.len()) || !passes_luhn(&number) {
            return Err(PaymentValidationError::InvalidCardNumber);
        }
        let brand = CardBrand::detect(&number);

        let (expiry_month, expiry_year) = parse_expiry(expiry)?;
        let today = clock.utc().date_naive();
        if (expiry_year, expiry_month) < (today.year(), today.month()) {
            return Err(PaymentValidationError::CardExpired);
        }

        let cvv = cvv.trim();
        if !all_digits(cvv) || !brand.cvv_len().contains(&cvv.len()) {
            return Err(PaymentValidationError::InvalidCvv);
        }

        Ok(Self {
            holder_name,
            number,
            brand,
            expiry_month,
            expiry_year,
            cvv: Zeroizing::new(cvv.to_owned()),
        })
    }

    /// Detected brand.
    #[must_use]
    pub fn brand(&self) -> CardBrand {
        self.brand
    }

    /// Last four digits, for display.
    #[must_use]
    pub fn last_four(&self) -> String {
        last_four(&self.number)
    }

    /// Expiry as `MM/YY`.
    #[must_use]
    pub fn expiry(&self) -> String {
        format!("{:02}/{:02}", self.expiry_month, self.expiry_year.rem_euclid(100))
    }
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("holder_name", &self.holder_name)
            .field("brand", &self.brand)
            .field("last_four", &self.last_four())
            .field("expiry", &self.expiry())
            .finish_non_exhaustive()
    }
}

fn parse_expiry(raw: &str) -> Result<(u32, i32), PaymentValidationError> {
    let (month, year) = raw
        .trim()
        .split_once('/')
        .ok_or(PaymentValidationError::MalformedExpiry)?;
    let (month, year) = (month.trim(), year.trim());
    if month.len() != 2 || year.len() != 2 || !all_digits(month) || !all_digits(year) {
        return Err(PaymentValidationError::MalformedExpiry);
    }
    let month: u32 = month
        .parse()
        .map_err(|_| PaymentValidationError::MalformedExpiry)?;
    let year: i32 = year
        .parse()
        .map_err(|_| PaymentValidationError::MalformedExpiry)?;
    if !(1..=12).contains(&month) {
        return Err(PaymentValidationError::MalformedExpiry);
    }
    Ok((month, 2000 + year))
}

/// Kind of bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccountType {
    /// Checking account.
    #[default]
    Checking,
    /// Savings account.
    Savings,
}

impl AccountType {
    /// Lowercase name sent to the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
        }
    }
}

/// Validated bank account details.
#[derive(Clone, PartialEq, Eq)]
pub struct BankAccountDetails {
    holder_name: String,
    routing_number: String,
    account_number: Zeroizing<String>,
    account_type: AccountType,
}

impl BankAccountDetails {
    /// Validate raw form input.
    pub fn try_new(
        holder_name: &str,
        routing_number: &str,
        account_number: &str,
        account_type: AccountType,
    ) -> Result<Self, PaymentValidationError> {
        let holder_name = self::holder_name(holder_name)?;

        let routing_number = digits_only(routing_number);
        if routing_number.len() != 9
            || !all_digits(&routing_number)
            || !passes_aba_checksum(&routing_number)
        {
            return Err(PaymentValidationError::InvalidRoutingNumber);
        }

        let account_number = Zeroizing::new(digits_only(account_number));
        if !all_digits(&account_number) || !(4..=17).contains(&account_number.len()) {
            return Err(PaymentValidationError::InvalidAccountNumber);
        }

        Ok(Self {
            holder_name,
            routing_number,
            account_number,
            account_type,
        })
    }

    /// Last four digits of the account number.
    #[must_use]
    pub fn last_four(&self) -> String {
        last_four(&self.account_number)
    }

    /// Account kind.
    #[must_use]
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }
}

impl fmt::Debug for BankAccountDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BankAccountDetails")
            .field("holder_name", &self.holder_name)
            .field("routing_number", &self.routing_number)
            .field("last_four", &self.last_four())
            .field("account_type", &self.account_type)
            .finish_non_exhaustive()
    }
}

/// A new payment method as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentMethodInput {
    /// Credit or debit card.
    Card(CardDetails),
    /// ACH bank account.
    BankAccount(BankAccountDetails),
}

impl PaymentMethodInput {
    /// JSON body for the add-payment-method endpoint.
    #[must_use]
    pub fn to_payload(&self, make_default: bool) -> Value {
        match self {
            Self::Card(card) => json!({
                "type": "card",
                "cardholderName": card.holder_name,
                "cardNumber": card.number.as_str(),
                "expiryDate": card.expiry(),
                "cvv": card.cvv.as_str(),
                "brand": card.brand.as_str(),
                "last4": card.last_four(),
                "isDefault": make_default,
            }),
            Self::BankAccount(account) => json!({
                "type": "bank",
                "accountHolderName": account.holder_name,
                "routingNumber": account.routing_number,
                "accountNumber": account.account_number.as_str(),
                "accountType": account.account_type.as_str(),
                "last4": account.last_four(),
                "isDefault": make_default,
            }),
        }
    }
}

/// Positive amount of money in whole cents.
///
/// # Examples
/// ```
/// use portal::domain::PaymentAmount;
///
/// let amount: PaymentAmount = "1250.5".parse().unwrap();
/// assert_eq!(amount.cents(), 125_050);
/// assert_eq!(amount.to_string(), "1250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaymentAmount {
    cents: u64,
}

impl PaymentAmount {
    /// Construct from cents.
    pub const fn from_cents(cents: u64) -> Result<Self, PaymentValidationError> {
        if cents == 0 {
            return Err(PaymentValidationError::NonPositiveAmount);
        }
        Ok(Self { cents })
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.cents
    }
}

impl FromStr for PaymentAmount {
    type Err = PaymentValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let raw = raw.strip_prefix('$').unwrap_or(raw);
        let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
        if !all_digits(whole) || fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(PaymentValidationError::MalformedAmount);
        }
        let whole: u64 = whole
            .parse()
            .map_err(|_| PaymentValidationError::MalformedAmount)?;
        let fraction: u64 = format!("{fraction:0<2}")
            .parse()
            .map_err(|_| PaymentValidationError::MalformedAmount)?;
        let cents = whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .ok_or(PaymentValidationError::MalformedAmount)?;
        Self::from_cents(cents)
    }
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for PaymentAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let dollars = self.cents as f64 / 100.0;
        serializer.serialize_f64(dollars)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::MutableClock;

    #[fixture]
    fn clock() -> MutableClock {
        MutableClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).single().expect("time"))
    }

    #[rstest]
    #[case::visa("4111 1111 1111 1111", CardBrand::Visa, "1111")]
    #[case::mastercard("5555-5555-5555-4444", CardBrand::Mastercard, "4444")]
    #[case::mastercard_2_series("2223003122003222", CardBrand::Mastercard, "3222")]
    #[case::discover("6011111111111117", CardBrand::Discover, "1117")]
    fn accepts_valid_cards(
        clock: MutableClock,
        #[case] number: &str,
        #[case] brand: CardBrand,
        #[case] last_four: &str,
    ) {
        let card = CardDetails::try_new("Morgan Lee", number, "12/27", "123", &clock)
            .expect("valid card");
        assert_eq!(card.brand(), brand);
        assert_eq!(card.last_four(), last_four);
    }

    #[rstest]
    fn amex_requires_four_digit_cvv(clock: MutableClock) {
        let err = CardDetails::try_new("Morgan", "378282246310005", "12/27", "123", &clock)
            .expect_err("three digits");
        assert_eq!(err, PaymentValidationError::InvalidCvv);
        assert!(CardDetails::try_new("Morgan", "378282246310005", "12/27", "1234", &clock).is_ok());
    }

    #[rstest]
    #[case::luhn("4111111111111112", PaymentValidationError::InvalidCardNumber)]
    #[case::short("411111111111", PaymentValidationError::InvalidCardNumber)]
    #[case::letters("4111abcd11111111", PaymentValidationError::InvalidCardNumber)]
    fn rejects_bad_numbers(
        clock: MutableClock,
        #[case] number: &str,
        #[case] expected: PaymentValidationError,
    ) {
        let err = CardDetails::try_new("Morgan", number, "12/27", "123", &clock)
            .expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case::current_month("10/26", true)]
    #[case::last_month("09/26", false)]
    #[case::last_year("12/25", false)]
    fn expiry_is_valid_through_its_month(
        clock: MutableClock,
        #[case] expiry: &str,
        #[case] valid: bool,
    ) {
        let result = CardDetails::try_new("Morgan", "4111111111111111", expiry, "123", &clock);
        if valid {
            assert!(result.is_ok());
        } else {
            assert_eq!(result.expect_err("expired"), PaymentValidationError::CardExpired);
        }
    }

    #[rstest]
    #[case("1/27")]
    #[case("13/27")]
    #[case("1227")]
    #[case("ab/cd")]
    fn malformed_expiry(clock: MutableClock, #[case] expiry: &str) {
        let err = CardDetails::try_new("Morgan", "4111111111111111", expiry, "123", &clock)
            .expect_err("malformed");
        assert_eq!(err, PaymentValidationError::MalformedExpiry);
    }

    #[rstest]
    fn card_debug_hides_number_and_cvv(clock: MutableClock) {
        let card = CardDetails::try_new("Morgan", "4111111111111111", "12/27", "987", &clock)
            .expect("card");
        let debug = format!("{card:?}");
        assert!(!debug.contains("4111111111111111"));
        assert!(!debug.contains("987"));
        assert!(debug.contains("1111"));
    }

    #[rstest]
    fn card_payload_carries_brand_and_default_flag(clock: MutableClock) {
        let card = CardDetails::try_new("Morgan Lee", "4111111111111111", "03/28", "123", &clock)
            .expect("card");
        let payload = PaymentMethodInput::Card(card).to_payload(true);
        assert_eq!(payload["type"], "card");
        assert_eq!(payload["brand"], "visa");
        assert_eq!(payload["last4"], "1111");
        assert_eq!(payload["expiryDate"], "03/28");
        assert_eq!(payload["isDefault"], true);
    }

    #[test]
    fn bank_account_validates_routing_checksum() {
        let account =
            BankAccountDetails::try_new("Morgan", "011000015", "000123456789", AccountType::Savings)
                .expect("valid routing");
        assert_eq!(account.last_four(), "6789");

        let err = BankAccountDetails::try_new("Morgan", "011000016", "1234", AccountType::Checking)
            .expect_err("bad checksum");
        assert_eq!(err, PaymentValidationError::InvalidRoutingNumber);
    }

    #[rstest]
    #[case::too_short("123")]
    #[case::too_long("123456789012345678")]
    fn bank_account_length_bounds(#[case] account: &str) {
        let err = BankAccountDetails::try_new("Morgan", "011000015", account, AccountType::Checking)
            .expect_err("bad length");
        assert_eq!(err, PaymentValidationError::InvalidAccountNumber);
    }

    #[test]
    fn bank_payload_shape() {
        let account =
            BankAccountDetails::try_new("Morgan", "011000015", "12345678", AccountType::Checking)
                .expect("account");
        let payload = PaymentMethodInput::BankAccount(account).to_payload(false);
        assert_eq!(payload["type"], "bank");
        assert_eq!(payload["accountType"], "checking");
        assert_eq!(payload["last4"], "5678");
        assert_eq!(payload["isDefault"], false);
    }

    #[test]
    fn blank_holder_is_rejected() {
        let err = BankAccountDetails::try_new("  ", "011000015", "12345678", AccountType::Checking)
            .expect_err("blank");
        assert_eq!(err, PaymentValidationError::EmptyHolderName);
    }

    #[rstest]
    #[case("1250", 125_000)]
    #[case("1250.5", 125_050)]
    #[case("$0.99", 99)]
    #[case(" 42.00 ", 4_200)]
    fn parses_amounts(#[case] raw: &str, #[case] cents: u64) {
        let amount: PaymentAmount = raw.parse().expect("amount");
        assert_eq!(amount.cents(), cents);
    }

    #[rstest]
    #[case("0", PaymentValidationError::NonPositiveAmount)]
    #[case("0.00", PaymentValidationError::NonPositiveAmount)]
    #[case("-5", PaymentValidationError::MalformedAmount)]
    #[case("1.234", PaymentValidationError::MalformedAmount)]
    #[case("abc", PaymentValidationError::MalformedAmount)]
    #[case("", PaymentValidationError::MalformedAmount)]
    fn rejects_bad_amounts(#[case] raw: &str, #[case] expected: PaymentValidationError) {
        assert_eq!(raw.parse::<PaymentAmount>().expect_err("invalid"), expected);
    }

    #[test]
    fn amount_serialises_as_number() {
        let amount: PaymentAmount = "1250.50".parse().expect("amount");
        assert_eq!(serde_json::to_value(amount).expect("json"), json!(1250.5));
    }
}
