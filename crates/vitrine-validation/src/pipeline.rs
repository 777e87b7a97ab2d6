//! Ordered rule sets per field
//!
//! A [`Validator`] describes one form: for each field, the normalized value and
//! the rules to run on it, in the order they must run. Running it applies every
//! rule of every field and returns the collected [`ErrorMap`].

use crate::error_map::ErrorMap;
use crate::password::PasswordPolicy;
use crate::rules;

/// One configured rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    NotEmpty,
    FullName,
    Password(PasswordPolicy),
    Matches {
        other_value: String,
        other_label: String,
    },
}

impl Rule {
    pub fn apply(&self, value: &str, field: &str, errors: &mut ErrorMap) {
        match self {
            Rule::NotEmpty => rules::is_not_empty(value, field, errors),
            Rule::FullName => rules::is_person_fullname(value, field, errors),
            Rule::Password(policy) => rules::is_password_with(value, field, policy, errors),
            Rule::Matches {
                other_value,
                other_label,
            } => rules::is_matching_fields(value, field, other_value, other_label, errors),
        }
    }
}

/// Rules for a single field, run in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldRules {
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn not_empty(self) -> Self {
        self.rule(Rule::NotEmpty)
    }

    pub fn full_name(self) -> Self {
        self.rule(Rule::FullName)
    }

    pub fn password(self, policy: PasswordPolicy) -> Self {
        self.rule(Rule::Password(policy))
    }

    pub fn matches(self, other_value: impl Into<String>, other_label: impl Into<String>) -> Self {
        self.rule(Rule::Matches {
            other_value: other_value.into(),
            other_label: other_label.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Apply every rule, regardless of earlier failures on the same field
    pub fn run(&self, value: &str, field: &str, errors: &mut ErrorMap) {
        for rule in &self.rules {
            rule.apply(value, field, errors);
        }
    }
}

#[derive(Debug, Clone)]
struct FieldEntry {
    name: String,
    value: String,
    rules: FieldRules,
}

/// One validation pass over a form
#[derive(Debug, Clone, Default)]
pub struct Validator {
    fields: Vec<FieldEntry>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a field; fields are validated in registration order
    pub fn field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        rules: FieldRules,
    ) -> Self {
        self.fields.push(FieldEntry {
            name: name.into(),
            value: value.into(),
            rules,
        });
        self
    }

    pub fn run(&self) -> ErrorMap {
        let mut errors = ErrorMap::new();
        self.run_into(&mut errors);
        errors
    }

    /// Run into an existing map, e.g. one that already holds caller errors
    pub fn run_into(&self, errors: &mut ErrorMap) {
        for entry in &self.fields {
            entry.rules.run(&entry.value, &entry.name, errors);
        }
    }

    pub fn validate(&self) -> Result<(), ErrorMap> {
        self.run().into_result()
    }
}
