//! Add/edit member form.

use validator::Validate;

use crate::forms::errors::FieldErrors;
use crate::member::{CreateMember, Member};
use crate::types::{Date, EntityId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct MemberForm {
    #[validate(length(min = 1, max = 100, message = "First Name is required."))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last Name is required."))]
    pub last_name: String,
    #[validate(
        length(min = 1, message = "Email is required."),
        email(message = "Invalid email address.")
    )]
    pub email: String,
    #[validate(email(message = "Invalid personal email address."))]
    pub personal_email: Option<String>,
    #[validate(length(min = 6, max = 20, message = "Phone must have between 6 and 20 characters."))]
    pub phone: Option<String>,
    pub dni: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub address: Option<String>,
    pub apartment: Option<String>,
    pub team_id: Option<EntityId>,
    pub start_date: Option<Date>,
    pub birth_date: Option<Date>,
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl MemberForm {
    /// Prefill an edit form from an existing member.
    pub fn from_member(member: &Member) -> Self {
        Self {
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            email: member.email.clone(),
            personal_email: member.personal_email.clone(),
            phone: member.phone.clone(),
            dni: member.dni.clone(),
            country: member.country.clone(),
            city: member.city.clone(),
            zip_code: member.zip_code.clone(),
            address: member.address.clone(),
            apartment: member.apartment.clone(),
            team_id: member.team.as_ref().map(|t| t.id.clone()),
            start_date: member.start_date,
            birth_date: member.birth_date,
        }
    }

    /// Trimmed copy with blank optional fields turned into `None`.
    fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
            personal_email: blank_to_none(&self.personal_email),
            phone: blank_to_none(&self.phone),
            dni: blank_to_none(&self.dni),
            country: blank_to_none(&self.country),
            city: blank_to_none(&self.city),
            zip_code: blank_to_none(&self.zip_code),
            address: blank_to_none(&self.address),
            apartment: blank_to_none(&self.apartment),
            team_id: blank_to_none(&self.team_id),
            start_date: self.start_date,
            birth_date: self.birth_date,
        }
    }

    /// Validate and build the request body.
    pub fn submit(&self) -> Result<CreateMember, FieldErrors> {
        let form = self.normalized();
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(e),
        };
        if let (Some(birth), Some(start)) = (form.birth_date, form.start_date) {
            if birth >= start {
                errors.add("birthDate", "Birth date must be before the start date.");
            }
        }

        errors.into_result(CreateMember {
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            personal_email: form.personal_email,
            phone: form.phone,
            dni: form.dni,
            country: form.country,
            city: form.city,
            zip_code: form.zip_code,
            address: form.address,
            apartment: form.apartment,
            team: form.team_id,
            start_date: form.start_date,
            birth_date: form.birth_date,
        })
    }
}
