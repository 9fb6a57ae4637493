//! Explicit `field → rules` mapping evaluated when a form is submitted.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::{CustomerForm, FormField};

/// Letters, with single spaces between words.
pub static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]+( [a-zA-Z]+)*$").expect("name pattern should compile")
});

/// A single constraint on a field value.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Value must contain something other than whitespace.
    Required,
    /// Non-empty values must match `regex`; `hint` completes "<label> ...".
    Pattern {
        regex: &'static LazyLock<Regex>,
        hint: &'static str,
    },
}

impl Rule {
    pub fn name_pattern() -> Self {
        Self::Pattern {
            regex: &NAME_PATTERN,
            hint: "may only contain letters separated by single spaces",
        }
    }

    /// `Err` carries the message shown next to the field.
    fn check(&self, field: FormField, value: &str) -> Result<(), String> {
        match self {
            Self::Required => {
                if value.trim().is_empty() {
                    Err(format!("{} is required", field.label()))
                } else {
                    Ok(())
                }
            }
            // Matched against the trimmed value, which is what gets sent.
            // Empty values are left to `Required`.
            Self::Pattern { regex, hint } => {
                let value = value.trim();
                if value.is_empty() || regex.is_match(value) {
                    Ok(())
                } else {
                    Err(format!("{} {hint}", field.label()))
                }
            }
        }
    }
}

/// Rules per field. Only the first failing rule of a field is reported.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(FormField, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules a record must satisfy before create/update.
    pub fn customer() -> Self {
        Self::new()
            .with(FormField::CompanyName, Rule::Required)
            .with(FormField::ContactName, Rule::Required)
            .with(FormField::ContactName, Rule::name_pattern())
            .with(FormField::ContactTitle, Rule::Required)
            .with(FormField::City, Rule::Required)
            .with(FormField::Country, Rule::Required)
    }

    /// Delete only needs an identifier.
    pub fn delete() -> Self {
        Self::new().with(FormField::CustomerId, Rule::Required)
    }

    pub fn with(mut self, field: FormField, rule: Rule) -> Self {
        match self.rules.iter_mut().find(|(f, _)| *f == field) {
            Some((_, rules)) => rules.push(rule),
            None => self.rules.push((field, vec![rule])),
        }
        self
    }

    pub fn rules_for(&self, field: FormField) -> &[Rule] {
        self.rules
            .iter()
            .find(|(f, _)| *f == field)
            .map_or(&[], |(_, rules)| rules.as_slice())
    }

    pub fn check(&self, form: &CustomerForm) -> ValidationReport {
        let mut report = ValidationReport::default();
        for field in FormField::ALL {
            let value = form.value(field);
            if let Some(message) = self
                .rules_for(field)
                .iter()
                .find_map(|rule| rule.check(field, value).err())
            {
                report.errors.push((field, message));
            }
        }
        report
    }
}

/// Per-field messages from one validation pass, in tab order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<(FormField, String)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn for_field(&self, field: FormField) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, msg)| msg.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.errors.iter().map(|(f, _)| *f)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, msg)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(msg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn filled_form() -> CustomerForm {
        let mut form = CustomerForm::new();
        form.set(FormField::CustomerId, "ALFKI");
        form.set(FormField::CompanyName, "Alfreds");
        form.set(FormField::ContactName, "Maria Anders");
        form.set(FormField::ContactTitle, "Sales Rep");
        form.set(FormField::City, "Berlin");
        form.set(FormField::Country, "Germany");
        form
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(RuleSet::customer().check(&filled_form()).is_valid());
    }

    #[test]
    fn customer_id_is_not_required_for_save() {
        let mut form = filled_form();
        form.set(FormField::CustomerId, "");
        assert!(RuleSet::customer().check(&form).is_valid());
    }

    #[test]
    fn whitespace_only_fails_required() {
        let mut form = filled_form();
        form.set(FormField::City, "   ");
        let report = RuleSet::customer().check(&form);
        assert_eq!(report.for_field(FormField::City), Some("City is required"));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn empty_contact_name_reports_required_not_pattern() {
        let mut form = filled_form();
        form.set(FormField::ContactName, "");
        let report = RuleSet::customer().check(&form);
        assert_eq!(
            report.for_field(FormField::ContactName),
            Some("Contact name is required")
        );
    }

    #[test]
    fn contact_name_pattern() {
        let rules = RuleSet::customer();
        for ok in ["Maria", "Maria Anders", "Ana Trujillo Moreno", " Maria", "Maria Anders "] {
            let mut form = filled_form();
            form.set(FormField::ContactName, ok);
            assert!(rules.check(&form).is_valid(), "{ok:?} should pass");
        }
        for bad in ["Maria  Anders", "O'Brien", "R2D2", "Frédérique"] {
            let mut form = filled_form();
            form.set(FormField::ContactName, bad);
            let report = rules.check(&form);
            assert_eq!(
                report.for_field(FormField::ContactName),
                Some("Contact name may only contain letters separated by single spaces"),
                "{bad:?} should fail"
            );
        }
    }

    #[test]
    fn report_lists_fields_in_tab_order() {
        let report = RuleSet::customer().check(&CustomerForm::new());
        assert_eq!(
            report.fields().collect::<Vec<_>>(),
            vec![
                FormField::CompanyName,
                FormField::ContactName,
                FormField::ContactTitle,
                FormField::City,
                FormField::Country,
            ]
        );
    }

    #[test]
    fn delete_rules_only_need_identifier() {
        let mut form = CustomerForm::new();
        assert!(!RuleSet::delete().check(&form).is_valid());
        form.set(FormField::CustomerId, "ALFKI");
        assert!(RuleSet::delete().check(&form).is_valid());
    }

    #[test]
    fn with_appends_to_existing_field() {
        let rules = RuleSet::new()
            .with(FormField::City, Rule::Required)
            .with(FormField::City, Rule::name_pattern());
        assert_eq!(rules.rules_for(FormField::City).len(), 2);
        assert!(rules.rules_for(FormField::Country).is_empty());
    }
}
