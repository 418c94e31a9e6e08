//! Locale settings for cell formatting

use chrono::FixedOffset;
use chrono::Offset;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

/// Formatting conventions applied when rendering cells.
///
/// # Example
///
/// ```
/// use backoffice_lib::columns::Locale;
/// use rust_decimal::Decimal;
///
/// let ru = Locale::ru();
/// assert_eq!(ru.format_decimal(Decimal::new(123456750, 2)), "1\u{a0}234\u{a0}567,5");
///
/// let en = Locale::en();
/// assert_eq!(en.format_decimal(Decimal::new(123456750, 2)), "1,234,567.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// `strftime` pattern for the date line.
    pub date_format: String,
    /// `strftime` pattern for the time line.
    pub time_format: String,
    /// Thousands separator.
    pub group_separator: char,
    /// Decimal separator.
    pub decimal_separator: char,
    /// Maximum fraction digits kept when formatting numbers.
    pub max_fraction_digits: u32,
    /// Currency symbol appended to money amounts.
    pub currency_symbol: String,
    /// Label for true.
    pub yes: String,
    /// Label for false.
    pub no: String,
    /// Unit appended to quantity badges.
    pub unit_suffix: String,
    /// Timezone timestamps are shown in; `None` uses the system timezone.
    ///
    /// The presets pin UTC so rendering does not depend on the host.
    pub offset: Option<FixedOffset>,
}

impl Locale {
    /// English conventions.
    pub fn en() -> Self {
        Self {
            date_format: "%m/%d/%Y".to_string(),
            time_format: "%I:%M %p".to_string(),
            group_separator: ',',
            decimal_separator: '.',
            max_fraction_digits: 3,
            currency_symbol: "₽".to_string(),
            yes: "Yes".to_string(),
            no: "No".to_string(),
            unit_suffix: "pcs".to_string(),
            offset: Some(Utc.fix()),
        }
    }

    /// Russian conventions, as the dashboard originally shipped.
    pub fn ru() -> Self {
        Self {
            date_format: "%d.%m.%Y".to_string(),
            time_format: "%H:%M".to_string(),
            group_separator: '\u{a0}',
            decimal_separator: ',',
            max_fraction_digits: 3,
            currency_symbol: "₽".to_string(),
            yes: "Да".to_string(),
            no: "Нет".to_string(),
            unit_suffix: "шт.".to_string(),
            offset: Some(Utc.fix()),
        }
    }

    /// Pins timestamps to a fixed offset.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Shows timestamps in the system timezone of the running process.
    pub fn with_system_timezone(mut self) -> Self {
        self.offset = None;
        self
    }

    /// Sets the currency symbol.
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Formats a number with digit grouping.
    ///
    /// Rounds half away from zero to `max_fraction_digits` and drops
    /// trailing fraction zeros.
    pub fn format_decimal(&self, value: Decimal) -> String {
        let rounded = value
            .round_dp_with_strategy(self.max_fraction_digits, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = rounded.abs().to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (digits.as_str(), None),
        };

        let mut out = String::with_capacity(digits.len() + 4);
        if negative {
            out.push('-');
        }
        out.push_str(&group_digits(int_part, self.group_separator));
        if let Some(frac) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac);
        }
        out
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en()
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
