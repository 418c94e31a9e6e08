//! Presentation categories

/// The presentation category a server-declared column type maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// True/false flag.
    Boolean,
    /// Date and time.
    Timestamp,
    /// Mail address.
    Email,
    /// Fractional number; money when the field name says so.
    Decimal,
    /// Whole number; money or stock count when the field name says so.
    Integer,
    /// Always money.
    Currency,
    /// Always a stock count.
    Quantity,
    /// No special presentation.
    Text,
}

impl ColumnKind {
    /// Built-in type names, matched case-insensitively.
    ///
    /// Covers the serializer field classes the backend reports and plain
    /// category names.
    pub const BUILTIN_ALIASES: &'static [(&'static str, ColumnKind)] = &[
        ("booleanfield", ColumnKind::Boolean),
        ("nullbooleanfield", ColumnKind::Boolean),
        ("boolean", ColumnKind::Boolean),
        ("bool", ColumnKind::Boolean),
        ("datetimefield", ColumnKind::Timestamp),
        ("timestamp", ColumnKind::Timestamp),
        ("datetime", ColumnKind::Timestamp),
        ("emailfield", ColumnKind::Email),
        ("email", ColumnKind::Email),
        ("decimalfield", ColumnKind::Decimal),
        ("floatfield", ColumnKind::Decimal),
        ("decimal", ColumnKind::Decimal),
        ("float", ColumnKind::Decimal),
        ("number", ColumnKind::Decimal),
        ("integerfield", ColumnKind::Integer),
        ("positiveintegerfield", ColumnKind::Integer),
        ("positivesmallintegerfield", ColumnKind::Integer),
        ("smallintegerfield", ColumnKind::Integer),
        ("bigintegerfield", ColumnKind::Integer),
        ("integer", ColumnKind::Integer),
        ("int", ColumnKind::Integer),
        ("currency", ColumnKind::Currency),
        ("money", ColumnKind::Currency),
        ("quantity", ColumnKind::Quantity),
    ];
}

/// Field name fragments that mark a money column.
pub(crate) const MONEY_HINTS: &[&str] = &["price", "cost", "amount"];
/// Money hints that also apply to integer columns.
pub(crate) const INTEGER_MONEY_HINTS: &[&str] = &["price", "cost"];
/// Field name fragments that mark a stock count column.
pub(crate) const COUNT_HINTS: &[&str] = &["quantity", "stock", "count"];

pub(crate) fn field_matches(field: &str, hints: &[&str]) -> bool {
    let field = field.to_lowercase();
    hints.iter().any(|hint| field.contains(hint))
}
