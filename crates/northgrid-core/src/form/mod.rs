//! Editable copy of a customer record.

pub mod validation;

use northgrid_api::{Address, CustomerRecord};

use self::validation::{RuleSet, ValidationReport};

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    CustomerId,
    CompanyName,
    ContactName,
    ContactTitle,
    City,
    Country,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        Self::CustomerId,
        Self::CompanyName,
        Self::ContactName,
        Self::ContactTitle,
        Self::City,
        Self::Country,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::CustomerId => "Customer ID",
            Self::CompanyName => "Company name",
            Self::ContactName => "Contact name",
            Self::ContactTitle => "Contact title",
            Self::City => "City",
            Self::Country => "Country",
        }
    }

    /// Next field in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous field in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The values being edited plus the errors from the last validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerForm {
    customer_id: String,
    company_name: String,
    contact_name: String,
    contact_title: String,
    city: String,
    country: String,
    errors: ValidationReport,
}

impl CustomerForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy a record's editable values into the form and clear errors.
    pub fn patch(&mut self, record: &CustomerRecord) {
        self.customer_id.clone_from(&record.customer_id);
        self.company_name.clone_from(&record.company_name);
        self.contact_name.clone_from(&record.contact_name);
        self.contact_title.clone_from(&record.contact_title);
        self.city.clone_from(&record.address.city);
        self.country.clone_from(&record.address.country);
        self.errors = ValidationReport::default();
    }

    /// Empty every field and drop validation errors.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::CustomerId => &self.customer_id,
            FormField::CompanyName => &self.company_name,
            FormField::ContactName => &self.contact_name,
            FormField::ContactTitle => &self.contact_title,
            FormField::City => &self.city,
            FormField::Country => &self.country,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::CustomerId => &mut self.customer_id,
            FormField::CompanyName => &mut self.company_name,
            FormField::ContactName => &mut self.contact_name,
            FormField::ContactTitle => &mut self.contact_title,
            FormField::City => &mut self.city,
            FormField::Country => &mut self.country,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.value_mut(field) = value.into();
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|&f| self.value(f).is_empty())
    }

    /// Run `rules` and remember the outcome for inline display.
    pub fn validate(&mut self, rules: &RuleSet) -> Result<(), ValidationReport> {
        let report = rules.check(self);
        self.errors = report.clone();
        if report.is_valid() {
            Ok(())
        } else {
            Err(report)
        }
    }

    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.for_field(field)
    }

    /// Assemble the full record sent on create/update.
    ///
    /// Values are trimmed. Address fields the form doesn't edit go out empty.
    pub fn to_record(&self) -> CustomerRecord {
        let trimmed = |field| self.value(field).trim().to_owned();
        CustomerRecord {
            customer_id: trimmed(FormField::CustomerId),
            company_name: trimmed(FormField::CompanyName),
            contact_name: trimmed(FormField::ContactName),
            contact_title: trimmed(FormField::ContactTitle),
            address: Address::city_country(trimmed(FormField::City), trimmed(FormField::Country)),
        }
    }
}
