use serde_json::{json, Value as JsonValue};

use super::schema::{NumericColumn, NumericOperator, TextColumn, TextOperator};

/// How condition results combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Every condition must hold.
    #[default]
    All,
    /// At least one condition must hold.
    Any,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::All => "all",
            Mode::Any => "any",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NumericPredicate {
    Gt(f64),
    Ge(f64),
    Lt(f64),
    Le(f64),
    Eq(f64),
    Ne(f64),
    /// Inclusive on both ends.
    Between { low: f64, high: f64 },
}

impl NumericPredicate {
    pub fn operator(&self) -> NumericOperator {
        match self {
            NumericPredicate::Gt(_) => NumericOperator::Gt,
            NumericPredicate::Ge(_) => NumericOperator::Ge,
            NumericPredicate::Lt(_) => NumericOperator::Lt,
            NumericPredicate::Le(_) => NumericOperator::Le,
            NumericPredicate::Eq(_) => NumericOperator::Eq,
            NumericPredicate::Ne(_) => NumericOperator::Ne,
            NumericPredicate::Between { .. } => NumericOperator::Between,
        }
    }

    pub fn test(&self, v: f64) -> bool {
        match *self {
            NumericPredicate::Gt(x) => v > x,
            NumericPredicate::Ge(x) => v >= x,
            NumericPredicate::Lt(x) => v < x,
            NumericPredicate::Le(x) => v <= x,
            NumericPredicate::Eq(x) => v == x,
            NumericPredicate::Ne(x) => v != x,
            NumericPredicate::Between { low, high } => v >= low && v <= high,
        }
    }

    fn value_json(&self) -> JsonValue {
        match *self {
            NumericPredicate::Gt(x)
            | NumericPredicate::Ge(x)
            | NumericPredicate::Lt(x)
            | NumericPredicate::Le(x)
            | NumericPredicate::Eq(x)
            | NumericPredicate::Ne(x) => json!(x),
            NumericPredicate::Between { low, high } => json!([low, high]),
        }
    }
}

/// Text payloads are stored as given; case folding happens at execution.
#[derive(Debug, Clone, PartialEq)]
pub enum TextPredicate {
    Contains(String),
    Equals(String),
    In(Vec<String>),
    NotIn(Vec<String>),
}

impl TextPredicate {
    pub fn operator(&self) -> TextOperator {
        match self {
            TextPredicate::Contains(_) => TextOperator::Contains,
            TextPredicate::Equals(_) => TextOperator::Equals,
            TextPredicate::In(_) => TextOperator::In,
            TextPredicate::NotIn(_) => TextOperator::NotIn,
        }
    }

    fn value_json(&self) -> JsonValue {
        match self {
            TextPredicate::Contains(s) | TextPredicate::Equals(s) => json!(s),
            TextPredicate::In(items) | TextPredicate::NotIn(items) => json!(items),
        }
    }
}

/// A single validated condition. A numeric operator can only ever sit on a
/// numeric column, and a text operator on a text column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Numeric {
        column: NumericColumn,
        predicate: NumericPredicate,
    },
    Text {
        column: TextColumn,
        predicate: TextPredicate,
    },
}

impl Condition {
    pub fn column_name(&self) -> &'static str {
        match self {
            Condition::Numeric { column, .. } => column.name(),
            Condition::Text { column, .. } => column.name(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        let (operator, value) = match self {
            Condition::Numeric { predicate, .. } => {
                (predicate.operator().symbol(), predicate.value_json())
            }
            Condition::Text { predicate, .. } => {
                (predicate.operator().symbol(), predicate.value_json())
            }
        };
        json!({
            "column": self.column_name(),
            "operator": operator,
            "value": value,
        })
    }
}

// ---------------------------------------------------------------------------
// FilterSpec
// ---------------------------------------------------------------------------

/// A validated ad-hoc filter. Only [`validate`](super::validate) builds one.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    mode: Mode,
    conditions: Vec<Condition>,
    limit: usize,
}

impl FilterSpec {
    pub(crate) fn new(mode: Mode, conditions: Vec<Condition>, limit: usize) -> Self {
        FilterSpec {
            mode,
            conditions,
            limit,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The spec in the same JSON shape it was accepted in.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "mode": self.mode.as_str(),
            "limit": self.limit,
            "conditions": self.conditions.iter().map(Condition::to_json).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn between_is_inclusive() {
        let p = NumericPredicate::Between { low: 1.0, high: 3.0 };
        assert!(p.test(1.0));
        assert!(p.test(3.0));
        assert!(!p.test(3.0001));
        assert!(!NumericPredicate::Between { low: 5.0, high: 1.0 }.test(3.0));
    }

    #[test]
    fn to_json_echoes_accepted_shape() {
        let spec = FilterSpec::new(
            Mode::Any,
            vec![
                Condition::Numeric {
                    column: NumericColumn::Acos,
                    predicate: NumericPredicate::Between { low: 0.1, high: 0.5 },
                },
                Condition::Text {
                    column: TextColumn::MatchType,
                    predicate: TextPredicate::NotIn(vec!["Exact".into()]),
                },
            ],
            20,
        );

        assert_eq!(
            spec.to_json(),
            json!({
                "mode": "any",
                "limit": 20,
                "conditions": [
                    {"column": "ACOS", "operator": "between", "value": [0.1, 0.5]},
                    {"column": "Match Type", "operator": "not_in", "value": ["Exact"]}
                ]
            })
        );
    }
}
