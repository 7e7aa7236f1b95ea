use ordered_float::NotNan;
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Int(i64),
    /// Exact numeric literal kept as written, e.g. `12.50`.
    Decimal(String),
    Real(NotNan<f64>),
    Money(String),
    String { value: String, unicode: bool },
    /// Hex digits of a `0x...` literal, without the prefix.
    Binary(String),
}

impl Literal {
    pub fn string(value: impl Into<String>) -> Self {
        Literal::String { value: value.into(), unicode: false }
    }

    pub fn nstring(value: impl Into<String>) -> Self {
        Literal::String { value: value.into(), unicode: true }
    }

    pub fn decimal(value: impl Into<String>) -> Self {
        Literal::Decimal(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    /// Precision and scale implied by the digits of an exact numeric literal.
    pub fn decimal_precision_scale(text: &str) -> (u8, u8) {
        let digits = text.trim_start_matches(['-', '+']);
        let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, ""));
        let int_digits = int_part.trim_start_matches('0').chars().filter(|c| c.is_ascii_digit()).count();
        let scale = frac_part.chars().filter(|c| c.is_ascii_digit()).count();
        let precision = (int_digits + scale).max(1).min(38);
        (precision as u8, scale.min(38) as u8)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Int(value) => write!(f, "{}", value),
            Literal::Decimal(value) => write!(f, "{}", value),
            Literal::Real(value) => write!(f, "{}", value),
            Literal::Money(value) => write!(f, "${}", value),
            Literal::String { value, unicode } => {
                write!(f, "{}'{}'", if *unicode { "N" } else { "" }, value.replace('\'', "''"))
            }
            Literal::Binary(value) => write!(f, "0x{}", value),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Literal({})", self)
    }
}
