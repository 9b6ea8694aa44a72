use std::fmt;

/// Constraint a field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    Required,
    Email,
}

impl ValidationRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationRule::Required => "required",
            ValidationRule::Email => "email",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: ValidationRule,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, rule: ValidationRule) -> Self {
        let message = match rule {
            ValidationRule::Required => format!("{} is required", field),
            ValidationRule::Email => format!("{} must be a valid email address", field),
        };
        Self {
            field,
            rule,
            message,
        }
    }
}

/// Ordered set of violations. Order is the order fields were checked in,
/// which is the declaration order of the entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, rule: ValidationRule) {
        self.violations.push(FieldViolation::new(field, rule));
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_messages_newline_joined_in_insertion_order() {
        let mut errors = ValidationErrors::new();
        errors.push("email", ValidationRule::Email);
        errors.push("country", ValidationRule::Required);

        assert_eq!(
            errors.to_string(),
            "email must be a valid email address\ncountry is required"
        );
        assert_eq!(errors.violations()[1].rule.as_str(), "required");
    }

    #[test]
    fn empty_errors_convert_to_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }
}
