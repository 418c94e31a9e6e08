//! Column type to presentation resolution

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use chrono::FixedOffset;
use chrono::Local;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;

use super::Cell;
use super::ColumnKind;
use super::Emphasis;
use super::Locale;
use super::Tone;
use super::kind::COUNT_HINTS;
use super::kind::INTEGER_MONEY_HINTS;
use super::kind::MONEY_HINTS;
use super::kind::field_matches;
use crate::model::Row;
use crate::model::Value;

/// Width hint for boolean columns, in pixels.
pub const BOOLEAN_WIDTH: u16 = 120;
/// Width hint for timestamp columns, in pixels.
pub const TIMESTAMP_WIDTH: u16 = 150;
/// Width hint for plain integer columns, in pixels.
pub const INTEGER_WIDTH: u16 = 80;

/// Quantities above this are plentiful.
const HIGH_STOCK: f64 = 10.0;
/// Quantities above this (and not plentiful) need attention.
const LOW_STOCK: f64 = 5.0;

/// A user-supplied rendering strategy for a column type.
pub trait CellRenderer: Send + Sync {
    /// Renders one value. `row` is the whole record the value came from.
    fn render(&self, value: &Value, row: &Row, locale: &Locale) -> Cell;

    /// Preferred width in pixels.
    fn width(&self) -> Option<u16> {
        None
    }
}

/// How a column's values are presented.
#[derive(Clone)]
pub enum Presentation {
    /// Yes/No badge with an indicator dot.
    YesNo,
    /// Date line plus time line.
    DateTime,
    /// `mailto:` link.
    MailLink,
    /// Grouped number with currency symbol.
    Currency,
    /// Grouped number.
    Number,
    /// Stock badge tiered by count.
    StockBadge,
    /// Registered custom strategy.
    Custom(Arc<dyn CellRenderer>),
}

impl fmt::Debug for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presentation::YesNo => f.write_str("YesNo"),
            Presentation::DateTime => f.write_str("DateTime"),
            Presentation::MailLink => f.write_str("MailLink"),
            Presentation::Currency => f.write_str("Currency"),
            Presentation::Number => f.write_str("Number"),
            Presentation::StockBadge => f.write_str("StockBadge"),
            Presentation::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Presentation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Presentation::Custom(a), Presentation::Custom(b)) => Arc::ptr_eq(a, b),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Presentation {
    /// Renders a value. Values the presentation cannot interpret fall back
    /// to plain text.
    pub fn render(&self, value: &Value, row: &Row, locale: &Locale) -> Cell {
        match self {
            Presentation::YesNo => {
                let yes = value.is_truthy();
                Cell::Badge {
                    text: if yes { locale.yes.clone() } else { locale.no.clone() },
                    tone: if yes { Tone::Positive } else { Tone::Danger },
                    indicator: true,
                }
            }
            Presentation::DateTime => match parse_timestamp(value) {
                Some(ts) => {
                    let (date, time) = match locale.offset {
                        Some(offset) => split(&ts.with_timezone(&offset), locale),
                        None => split(&ts.with_timezone(&Local), locale),
                    };
                    Cell::DateTime { date, time }
                }
                None => text(value),
            },
            Presentation::MailLink => {
                if value.is_null() {
                    return text(value);
                }
                let address = value.to_display_string();
                Cell::MailLink {
                    href: format!("mailto:{}", address),
                    address,
                }
            }
            Presentation::Currency => match value.as_decimal() {
                Some(amount) => Cell::Amount {
                    text: format!("{} {}", locale.format_decimal(amount), locale.currency_symbol),
                    emphasis: Emphasis::Strong,
                },
                None => text(value),
            },
            Presentation::Number => match value.as_decimal() {
                Some(amount) => Cell::Amount {
                    text: locale.format_decimal(amount),
                    emphasis: Emphasis::Medium,
                },
                None => text(value),
            },
            Presentation::StockBadge => match value.as_f64() {
                Some(count) => Cell::Badge {
                    text: format!("{} {}", value.to_display_string(), locale.unit_suffix),
                    tone: stock_tone(count),
                    indicator: false,
                },
                None => text(value),
            },
            Presentation::Custom(renderer) => renderer.render(value, row, locale),
        }
    }
}

/// Tier of a stock count: above 10 positive, 6 to 10 warning, 5 or less danger.
pub fn stock_tone(count: f64) -> Tone {
    if count > HIGH_STOCK {
        Tone::Positive
    } else if count > LOW_STOCK {
        Tone::Warning
    } else {
        Tone::Danger
    }
}

fn text(value: &Value) -> Cell {
    Cell::Text(value.to_display_string())
}

fn split<Tz: TimeZone>(ts: &DateTime<Tz>, locale: &Locale) -> (String, String)
where
    Tz::Offset: fmt::Display,
{
    (
        ts.format(&locale.date_format).to_string(),
        ts.format(&locale.time_format).to_string(),
    )
}

/// Parses RFC 3339 timestamps, falling back to naive forms read as UTC.
fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    let raw = value.as_str()?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(Utc.from_utc_datetime(&naive).fixed_offset())
}

/// The presentation rule resolved for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRule {
    /// Custom presentation, or `None` to show the stringified value.
    pub presentation: Option<Presentation>,
    /// Advisory width in pixels; `None` lets the caller pick.
    pub width: Option<u16>,
}

impl ColumnRule {
    /// A rule with no custom presentation and no width hint.
    pub fn plain() -> Self {
        Self {
            presentation: None,
            width: None,
        }
    }

    fn new(presentation: Presentation, width: Option<u16>) -> Self {
        Self {
            presentation: Some(presentation),
            width,
        }
    }

    /// Renders one value of this column.
    pub fn render(&self, value: &Value, row: &Row, locale: &Locale) -> Cell {
        match &self.presentation {
            Some(presentation) => presentation.render(value, row, locale),
            None => text(value),
        }
    }

    /// Returns `true` if this column has a custom presentation.
    pub fn has_renderer(&self) -> bool {
        self.presentation.is_some()
    }
}

/// Maps declared column types to presentation rules.
///
/// Resolution is a pure function of `(column_type, field)`: the declared type
/// picks a [`ColumnKind`], and field-name hints refine numeric kinds. New type
/// names can be registered as aliases of existing kinds or bound to a custom
/// [`CellRenderer`].
///
/// # Example
///
/// ```
/// use backoffice_lib::columns::{ColumnResolver, Presentation};
///
/// let resolver = ColumnResolver::new();
/// let rule = resolver.resolve("IntegerField", "quantity");
/// assert_eq!(rule.presentation, Some(Presentation::StockBadge));
///
/// let rule = resolver.resolve("CharField", "name");
/// assert!(!rule.has_renderer());
/// ```
#[derive(Clone)]
pub struct ColumnResolver {
    kinds: HashMap<String, ColumnKind>,
    custom: HashMap<String, Arc<dyn CellRenderer>>,
}

impl ColumnResolver {
    /// Creates a resolver with the built-in type names.
    pub fn new() -> Self {
        Self {
            kinds: ColumnKind::BUILTIN_ALIASES
                .iter()
                .map(|(alias, kind)| (alias.to_string(), *kind))
                .collect(),
            custom: HashMap::new(),
        }
    }

    /// Maps an additional type name onto a built-in kind.
    pub fn register(mut self, type_name: &str, kind: ColumnKind) -> Self {
        self.kinds.insert(type_name.to_lowercase(), kind);
        self
    }

    /// Binds a type name to a custom renderer. Takes precedence over kinds.
    pub fn register_renderer(mut self, type_name: &str, renderer: Arc<dyn CellRenderer>) -> Self {
        self.custom.insert(type_name.to_lowercase(), renderer);
        self
    }

    /// Returns the kind a type name maps to; unknown names are `Text`.
    pub fn kind_of(&self, column_type: &str) -> ColumnKind {
        self.kinds
            .get(&column_type.to_lowercase())
            .copied()
            .unwrap_or(ColumnKind::Text)
    }

    /// Resolves the presentation rule for one column.
    pub fn resolve(&self, column_type: &str, field: &str) -> ColumnRule {
        if let Some(renderer) = self.custom.get(&column_type.to_lowercase()) {
            return ColumnRule::new(Presentation::Custom(renderer.clone()), renderer.width());
        }
        Self::rule_for(self.kind_of(column_type), field)
    }

    /// Resolution rules for the built-in kinds.
    pub fn rule_for(kind: ColumnKind, field: &str) -> ColumnRule {
        match kind {
            ColumnKind::Boolean => ColumnRule::new(Presentation::YesNo, Some(BOOLEAN_WIDTH)),
            ColumnKind::Timestamp => ColumnRule::new(Presentation::DateTime, Some(TIMESTAMP_WIDTH)),
            ColumnKind::Email => ColumnRule::new(Presentation::MailLink, None),
            ColumnKind::Decimal if field_matches(field, MONEY_HINTS) => {
                ColumnRule::new(Presentation::Currency, None)
            }
            ColumnKind::Decimal => ColumnRule::new(Presentation::Number, None),
            ColumnKind::Integer if field_matches(field, INTEGER_MONEY_HINTS) => {
                ColumnRule::new(Presentation::Currency, None)
            }
            ColumnKind::Integer if field_matches(field, COUNT_HINTS) => {
                ColumnRule::new(Presentation::StockBadge, None)
            }
            ColumnKind::Integer => ColumnRule {
                presentation: None,
                width: Some(INTEGER_WIDTH),
            },
            ColumnKind::Currency => ColumnRule::new(Presentation::Currency, None),
            ColumnKind::Quantity => ColumnRule::new(Presentation::StockBadge, None),
            ColumnKind::Text => ColumnRule::plain(),
        }
    }
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ColumnResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnResolver")
            .field("kinds", &self.kinds.len())
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}
