use crate::record::{FormData, ValidatedForm};
use crate::schema::{EntitySchema, FieldKind, FieldSpec};
use crate::statics;
use crate::value::FieldValue;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Integer,
    Decimal,
    Positive,
    Choice,
}

/// The first rule a form broke. `field` is the key of the input that should get focus.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub label: String,
    pub rule: Rule,
    pub message: String,
}

impl ValidationError {
    fn new(spec: &FieldSpec, rule: Rule) -> Self {
        let label = spec.display_label().to_string();
        let message = match rule {
            Rule::Required => format!("{label} {}", statics::EN_RULE_REQUIRED),
            Rule::Integer => format!("{label} {}", statics::EN_RULE_INTEGER),
            Rule::Decimal => format!("{label} {}", statics::EN_RULE_DECIMAL),
            Rule::Positive => format!("{label} {}", statics::EN_RULE_POSITIVE),
            Rule::Choice => format!(
                "{label} {} {}",
                statics::EN_RULE_CHOICE,
                spec.options.join(", ")
            ),
        };
        Self {
            field: spec.key.clone(),
            label,
            rule,
            message,
        }
    }
}

/// Check `form` against `schema` in declared field order, stopping at the first failure.
pub fn validate(schema: &EntitySchema, form: &FormData) -> Result<ValidatedForm, ValidationError> {
    let mut values = IndexMap::with_capacity(schema.fields.len());
    for spec in &schema.fields {
        let value = check_field(spec, form.get(&spec.key))?;
        values.insert(spec.key.clone(), value);
    }
    Ok(ValidatedForm::new(values))
}

/// Parse one input. `Ok(None)` means an optional numeric field left empty.
pub fn check_field(spec: &FieldSpec, raw: &str) -> Result<Option<FieldValue>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if spec.required {
            return Err(ValidationError::new(spec, Rule::Required));
        }
        return Ok(match spec.kind {
            FieldKind::Integer | FieldKind::Decimal => None,
            _ => Some(FieldValue::Text(String::new())),
        });
    }

    let value = match spec.kind {
        FieldKind::Text | FieldKind::Multiline => FieldValue::Text(trimmed.to_string()),
        FieldKind::Choice => {
            if !spec.free_values && !spec.options.iter().any(|o| o == trimmed) {
                return Err(ValidationError::new(spec, Rule::Choice));
            }
            FieldValue::Text(trimmed.to_string())
        }
        FieldKind::Integer => {
            let v: i64 = trimmed
                .parse()
                .map_err(|_| ValidationError::new(spec, Rule::Integer))?;
            if spec.positive && v <= 0 {
                return Err(ValidationError::new(spec, Rule::Positive));
            }
            FieldValue::Integer(v)
        }
        FieldKind::Decimal => {
            let v: f64 = trimmed
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .ok_or_else(|| ValidationError::new(spec, Rule::Decimal))?;
            if spec.positive && v <= 0.0 {
                return Err(ValidationError::new(spec, Rule::Positive));
            }
            FieldValue::Decimal(v)
        }
    };
    Ok(Some(value))
}
