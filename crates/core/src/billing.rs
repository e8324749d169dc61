//! Shipping-eligibility validation for members, offices and the company.
//!
//! A record is eligible when every field in the relevant required set is
//! present and non-empty after trimming. The company rule (used for the
//! session organisation and for offices) omits the personal fields that
//! only make sense for a person.

use crate::member::Member;
use crate::office::Office;
use crate::profile::UserProfile;
use crate::types::is_filled;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShippingField {
    Country,
    City,
    State,
    ZipCode,
    Address,
    Apartment,
    PersonalEmail,
    Phone,
    Dni,
}

impl ShippingField {
    /// Label shown in "missing data" dialogs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "Zip Code",
            Self::Address => "Address",
            Self::Apartment => "Apartment",
            Self::PersonalEmail => "Personal Email",
            Self::Phone => "Phone",
            Self::Dni => "DNI",
        }
    }
}

pub const COMPANY_REQUIRED_FIELDS: &[ShippingField] = &[
    ShippingField::Country,
    ShippingField::City,
    ShippingField::State,
    ShippingField::ZipCode,
    ShippingField::Address,
];

pub const MEMBER_REQUIRED_FIELDS: &[ShippingField] = &[
    ShippingField::Country,
    ShippingField::City,
    ShippingField::ZipCode,
    ShippingField::Address,
    ShippingField::Apartment,
    ShippingField::PersonalEmail,
    ShippingField::Phone,
    ShippingField::Dni,
];

/// Anything with address-like fields.
pub trait ShippingRecord {
    /// Raw value of `field`, or `None` if the record has no such field.
    fn shipping_field(&self, field: ShippingField) -> Option<&str>;
}

impl ShippingRecord for Member {
    fn shipping_field(&self, field: ShippingField) -> Option<&str> {
        match field {
            ShippingField::Country => self.country.as_deref(),
            ShippingField::City => self.city.as_deref(),
            ShippingField::State => None,
            ShippingField::ZipCode => self.zip_code.as_deref(),
            ShippingField::Address => self.address.as_deref(),
            ShippingField::Apartment => self.apartment.as_deref(),
            ShippingField::PersonalEmail => self.personal_email.as_deref(),
            ShippingField::Phone => self.phone.as_deref(),
            ShippingField::Dni => self.dni.as_deref(),
        }
    }
}

impl ShippingRecord for UserProfile {
    fn shipping_field(&self, field: ShippingField) -> Option<&str> {
        match field {
            ShippingField::Country => self.country.as_deref(),
            ShippingField::City => self.city.as_deref(),
            ShippingField::State => self.state.as_deref(),
            ShippingField::ZipCode => self.zip_code.as_deref(),
            ShippingField::Address => self.address.as_deref(),
            ShippingField::Apartment => self.apartment.as_deref(),
            ShippingField::Phone => self.phone.as_deref(),
            ShippingField::PersonalEmail | ShippingField::Dni => None,
        }
    }
}

impl ShippingRecord for Office {
    fn shipping_field(&self, field: ShippingField) -> Option<&str> {
        match field {
            ShippingField::Country => self.country.as_deref(),
            ShippingField::City => self.city.as_deref(),
            ShippingField::State => self.state.as_deref(),
            ShippingField::ZipCode => self.zip_code.as_deref(),
            ShippingField::Address => self.address.as_deref(),
            ShippingField::Apartment => self.apartment.as_deref(),
            ShippingField::Phone => self.phone.as_deref(),
            ShippingField::PersonalEmail => self.email.as_deref(),
            ShippingField::Dni => None,
        }
    }
}

/// Required fields of `record` that are absent or blank, in `required` order.
pub fn missing_fields<R: ShippingRecord + ?Sized>(
    record: &R,
    required: &[ShippingField],
) -> Vec<ShippingField> {
    required
        .iter()
        .copied()
        .filter(|f| !is_filled(record.shipping_field(*f)))
        .collect()
}

pub fn missing_company_fields<R: ShippingRecord + ?Sized>(record: &R) -> Vec<ShippingField> {
    missing_fields(record, COMPANY_REQUIRED_FIELDS)
}

pub fn missing_member_fields(member: &Member) -> Vec<ShippingField> {
    missing_fields(member, MEMBER_REQUIRED_FIELDS)
}

/// `true` if the organisation has everything needed to ship from or to it.
pub fn validate_company_billing_info(profile: &UserProfile) -> bool {
    missing_company_fields(profile).is_empty()
}

/// `true` if the member has everything needed to ship to them.
pub fn validate_member_billing_info(member: &Member) -> bool {
    missing_member_fields(member).is_empty()
}

/// Comma-separated labels for a dialog line.
pub fn labels(fields: &[ShippingField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}
