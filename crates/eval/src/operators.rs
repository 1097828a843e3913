//! Operator catalog: which operators each field type admits, and their
//! human labels.

use crate::types::{FieldType, Operator};

const TEXT_OPERATORS: &[Operator] = &[
    Operator::IsFilled,
    Operator::IsEmpty,
    Operator::Contains,
    Operator::NotContains,
    Operator::Equals,
    Operator::NotEquals,
];

const ORDERED_OPERATORS: &[Operator] = &[
    Operator::IsFilled,
    Operator::IsEmpty,
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::GreaterOrEqual,
    Operator::LessThan,
    Operator::LessOrEqual,
];

const BOOLEAN_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::IsFilled,
    Operator::IsEmpty,
];

const SELECT_OPERATORS: &[Operator] = &[
    Operator::IsFilled,
    Operator::IsEmpty,
    Operator::Equals,
    Operator::NotEquals,
];

/// Legal operators for `field_type`, in picker order. The first entry is
/// the default an editor assigns to a new condition.
pub fn operators_for(field_type: FieldType) -> &'static [Operator] {
    match field_type {
        FieldType::Text => TEXT_OPERATORS,
        FieldType::Number | FieldType::Date => ORDERED_OPERATORS,
        FieldType::Boolean => BOOLEAN_OPERATORS,
        FieldType::Select => SELECT_OPERATORS,
    }
}

pub fn is_legal(field_type: FieldType, operator: Operator) -> bool {
    operators_for(field_type).contains(&operator)
}

pub fn operator_label(operator: Operator) -> &'static str {
    match operator {
        Operator::Equals => "equals",
        Operator::NotEquals => "is different from",
        Operator::GreaterThan => "is greater than",
        Operator::GreaterOrEqual => "is greater than or equal to",
        Operator::LessThan => "is less than",
        Operator::LessOrEqual => "is less than or equal to",
        Operator::Contains => "contains",
        Operator::NotContains => "does not contain",
        Operator::IsEmpty => "is empty",
        Operator::IsFilled => "is filled",
    }
}
