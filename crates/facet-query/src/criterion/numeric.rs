//! Range filters over integer and decimal vocabularies.

use super::{field_path, is_blank, write_presence, FacetCriterion};
use crate::localize::Localize;
use crate::rql::{Operator, Query, Value};
use crate::vocabulary::Vocabulary;
use std::fmt;

/// `[low, high]` pair; a blank side is unbounded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bounds {
    pub low: String,
    pub high: String,
}

impl Bounds {
    pub fn new(low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            low: low.into(),
            high: high.into(),
        }
    }

    /// Neither side set
    pub fn is_empty(&self) -> bool {
        is_blank(&self.low) && is_blank(&self.high)
    }
}

/// Criterion over a numeric vocabulary
pub struct NumericCriterion<'a> {
    vocabulary: &'a Vocabulary,
    localizer: &'a dyn Localize,
    operator: Operator,
    bounds: Bounds,
}

impl<'a> NumericCriterion<'a> {
    pub fn new(vocabulary: &'a Vocabulary, localizer: &'a dyn Localize) -> Self {
        Self {
            vocabulary,
            localizer,
            operator: Operator::Between,
            bounds: Bounds::default(),
        }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn set_bounds(&mut self, low: impl Into<String>, high: impl Into<String>) {
        self.bounds = Bounds::new(low, high);
    }
}

impl FacetCriterion for NumericCriterion<'_> {
    fn vocabulary(&self) -> &Vocabulary {
        self.vocabulary
    }

    fn operator(&self) -> &Operator {
        &self.operator
    }

    fn set_operator(&mut self, operator: Operator) {
        self.operator = operator;
        if self.operator.is_presence() {
            self.bounds = Bounds::default();
        }
    }

    fn apply_query_node(&mut self, node: &Query) {
        self.operator = node.operator.clone();

        let bound = |value: Option<&Value>| value.and_then(Value::to_text).unwrap_or_default();

        match self.operator {
            Operator::Ge => self.bounds = Bounds::new(bound(node.arg(1)), ""),
            Operator::Le => self.bounds = Bounds::new("", bound(node.arg(1))),
            Operator::Between => {
                let pair: &[Value] = match node.arg(1) {
                    Some(Value::Array(items)) => items.as_slice(),
                    _ => &[],
                };
                self.bounds = Bounds::new(bound(pair.first()), bound(pair.get(1)));
            }
            // No other operator is ever emitted for a numeric facet
            _ => {}
        }
    }

    fn to_query_node(&self, taxonomy: &str) -> Query {
        let mut query = Query::new(self.operator.clone());
        query.push(field_path(taxonomy, self.vocabulary));

        if self.operator.is_presence() {
            query.push(Value::Array(Vec::new()));
            return query;
        }

        let Bounds { low, high } = &self.bounds;
        let value = match (is_blank(low), is_blank(high)) {
            (true, true) => Value::Array(Vec::new()),
            (false, true) => {
                query.operator = Operator::Ge;
                parse_integer(low)
            }
            (true, false) => {
                query.operator = Operator::Le;
                parse_integer(high)
            }
            (false, false) => {
                query.operator = Operator::Between;
                Value::Array(vec![parse_integer(low), parse_integer(high)])
            }
        };
        query.push(value);

        query
    }

    fn is_active(&self) -> bool {
        self.operator.is_presence() || !self.bounds.is_empty()
    }
}

impl fmt::Display for NumericCriterion<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.localizer.localize(&self.vocabulary.title);

        if self.operator.is_presence() {
            return write_presence(f, &title, &self.operator);
        }

        let Bounds { low, high } = &self.bounds;
        match (is_blank(low), is_blank(high)) {
            (false, true) => write!(f, "{}:>{}", title, low),
            (true, false) => write!(f, "{}:<{}", title, high),
            (false, false) => write!(f, "{}:[{},{}]", title, low, high),
            (true, true) => f.write_str(&title),
        }
    }
}

/// Leading-integer conversion: optional whitespace and sign, then digits;
/// trailing text is ignored. No leading digits gives [`Value::NotANumber`].
/// Digits beyond the `i64` range saturate to `i64::MAX` / `i64::MIN`.
pub(crate) fn parse_integer(text: &str) -> Value {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Value::NotANumber;
    }

    let literal = format!("{}{}", if negative { "-" } else { "" }, &rest[..digits]);
    match literal.parse::<i64>() {
        Ok(number) => Value::Integer(number),
        Err(_) if negative => Value::Integer(i64::MIN),
        Err(_) => Value::Integer(i64::MAX),
    }
}
