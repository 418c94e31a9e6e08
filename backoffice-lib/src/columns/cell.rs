//! Rendered cell values

use serde::Serialize;

/// Color tier of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Good state (active, plenty of stock).
    Positive,
    /// Needs attention.
    Warning,
    /// Bad state (inactive, almost out of stock).
    Danger,
}

/// Visual weight of a numeric amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Emphasis {
    /// Plain grouped number.
    Medium,
    /// Money.
    Strong,
}

/// A presentation-ready cell.
///
/// The table engine produces cells; a front end decides how each variant
/// looks. [`plain`](Cell::plain) gives a text-only rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// Unstyled text.
    Text(String),
    /// Colored pill, optionally with an indicator dot.
    Badge {
        text: String,
        tone: Tone,
        indicator: bool,
    },
    /// Date and time shown on two lines.
    DateTime { date: String, time: String },
    /// Clickable mail address.
    MailLink { address: String, href: String },
    /// Formatted number.
    Amount { text: String, emphasis: Emphasis },
}

impl Cell {
    /// Text-only rendering of the cell.
    pub fn plain(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Badge { text, .. } => text.clone(),
            Cell::DateTime { date, time } => format!("{} {}", date, time),
            Cell::MailLink { address, .. } => address.clone(),
            Cell::Amount { text, .. } => text.clone(),
        }
    }

    /// Badge tone, if this is a badge.
    pub fn tone(&self) -> Option<Tone> {
        match self {
            Cell::Badge { tone, .. } => Some(*tone),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_rendering() {
        let cell = Cell::DateTime {
            date: "01.02.2024".into(),
            time: "10:30".into(),
        };
        assert_eq!(cell.plain(), "01.02.2024 10:30");

        let cell = Cell::Badge {
            text: "Yes".into(),
            tone: Tone::Positive,
            indicator: true,
        };
        assert_eq!(cell.plain(), "Yes");
        assert_eq!(cell.tone(), Some(Tone::Positive));
        assert_eq!(Cell::Text("x".into()).tone(), None);
    }

    #[test]
    fn test_serialized_tagging() {
        let json = serde_json::to_value(Cell::Amount {
            text: "10 ₽".into(),
            emphasis: Emphasis::Strong,
        })
        .unwrap();
        assert_eq!(json["kind"], "amount");
        assert_eq!(json["emphasis"], "strong");
    }
}
