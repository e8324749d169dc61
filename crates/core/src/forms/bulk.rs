//! Bulk-create detail form: one row per unit, sharing the primary form's
//! category, attributes and pricing.
//!
//! "Apply to all" copies row 0's member/location to every other row. It is
//! one-way: edits to row 0 re-propagate while the toggle is on, and an edit
//! that makes any other row diverge from row 0 switches the toggle off.

use std::collections::HashMap;

use crate::category::ProductAttributes;
use crate::error::CoreError;
use crate::forms::errors::FieldErrors;
use crate::location::Location;
use crate::member::Member;
use crate::office::Office;
use crate::product::{CreateProduct, Price};
use crate::status::{calculate_status, ProductCondition};
use crate::types::{Date, EntityId};

/// Values every unit inherits from the primary form.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkTemplate {
    pub name: Option<String>,
    pub attributes: ProductAttributes,
    pub price: Option<Price>,
    pub condition: ProductCondition,
    pub recoverable: bool,
    pub acquisition_date: Option<Date>,
}

/// Who or where a single unit goes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowAssignment {
    pub location: Option<Location>,
    pub assigned_email: Option<String>,
    pub assigned_member: Option<String>,
    pub office_id: Option<EntityId>,
}

impl RowAssignment {
    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.assigned_email.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkRow {
    pub serial_number: String,
    pub assignment: RowAssignment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulkCreateForm {
    template: BulkTemplate,
    rows: Vec<BulkRow>,
    apply_to_all: bool,
}

impl BulkCreateForm {
    pub fn new(template: BulkTemplate, quantity: usize) -> Self {
        Self {
            template,
            rows: vec![BulkRow::default(); quantity],
            apply_to_all: false,
        }
    }

    pub fn template(&self) -> &BulkTemplate {
        &self.template
    }

    pub fn rows(&self) -> &[BulkRow] {
        &self.rows
    }

    pub fn apply_to_all(&self) -> bool {
        self.apply_to_all
    }

    /// Turn "apply to all" on or off. Turning it on with row 0 filled copies
    /// row 0's assignment to every row.
    pub fn set_apply_to_all(&mut self, on: bool) {
        self.apply_to_all = on;
        let first_filled = self.rows.first().is_some_and(|r| !r.assignment.is_empty());
        if on && first_filled {
            self.propagate_first_row();
        }
    }

    pub fn set_serial(&mut self, index: usize, serial: impl Into<String>) -> Result<(), CoreError> {
        self.row_mut(index)?.serial_number = serial.into();
        Ok(())
    }

    pub fn set_member(&mut self, index: usize, member: Option<&Member>) -> Result<(), CoreError> {
        let assignment = &mut self.row_mut(index)?.assignment;
        match member {
            Some(m) => {
                assignment.assigned_email = Some(m.email.clone());
                assignment.assigned_member = Some(m.full_name());
                assignment.location = Some(Location::Employee);
                assignment.office_id = None;
            }
            None => {
                assignment.assigned_email = None;
                assignment.assigned_member = None;
                if assignment.location == Some(Location::Employee) {
                    assignment.location = None;
                }
            }
        }
        self.after_row_edit(index);
        Ok(())
    }

    pub fn set_location(&mut self, index: usize, location: Option<Location>) -> Result<(), CoreError> {
        let assignment = &mut self.row_mut(index)?.assignment;
        assignment.location = location;
        if location != Some(Location::Employee) {
            assignment.assigned_email = None;
            assignment.assigned_member = None;
        }
        if location != Some(Location::OurOffice) {
            assignment.office_id = None;
        }
        self.after_row_edit(index);
        Ok(())
    }

    pub fn set_office(&mut self, index: usize, office: &Office) -> Result<(), CoreError> {
        let assignment = &mut self.row_mut(index)?.assignment;
        assignment.location = Some(Location::OurOffice);
        assignment.assigned_email = None;
        assignment.assigned_member = None;
        assignment.office_id = Some(office.id.clone());
        self.after_row_edit(index);
        Ok(())
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut BulkRow, CoreError> {
        let len = self.rows.len();
        self.rows.get_mut(index).ok_or_else(|| {
            CoreError::Validation(format!("Row {index} is out of range (0..{len})"))
        })
    }

    fn after_row_edit(&mut self, index: usize) {
        if !self.apply_to_all {
            return;
        }
        if index == 0 {
            self.propagate_first_row();
        } else if self.rows[index].assignment != self.rows[0].assignment {
            self.apply_to_all = false;
        }
    }

    fn propagate_first_row(&mut self) {
        let Some(first) = self.rows.first() else {
            return;
        };
        let assignment = first.assignment.clone();
        for row in self.rows.iter_mut().skip(1) {
            row.assignment = assignment.clone();
        }
    }

    /// Validate every row and build one create request per unit.
    pub fn submit(&self) -> Result<Vec<CreateProduct>, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut serials: HashMap<String, usize> = HashMap::new();

        for (i, row) in self.rows.iter().enumerate() {
            let mut row_errors = FieldErrors::new();
            match row.assignment.location {
                None => row_errors.add("location", "Location is required."),
                Some(Location::Employee) if row.assignment.assigned_email.is_none() => row_errors
                    .add(
                        "assignedMember",
                        "Assigned member is required for Employee location.",
                    ),
                _ => {}
            }

            let serial = row.serial_number.trim();
            if !serial.is_empty() {
                let key = serial.to_ascii_lowercase();
                if let Some(first) = serials.get(&key) {
                    row_errors.add(
                        "serialNumber",
                        format!("Serial number duplicates row {}.", first + 1),
                    );
                } else {
                    serials.insert(key, i);
                }
            }

            errors.extend_prefixed(&format!("rows[{i}]"), row_errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.rows.iter().map(|row| self.request_for(row)).collect())
    }

    fn request_for(&self, row: &BulkRow) -> CreateProduct {
        let location = row.assignment.location.unwrap_or(Location::FpWarehouse);
        let t = &self.template;
        let serial = row.serial_number.trim();
        CreateProduct {
            name: t.name.clone(),
            category: t.attributes.category(),
            attributes: t.attributes.to_pairs(),
            status: calculate_status(
                Some(t.condition),
                Some(location),
                row.assignment.assigned_email.as_deref(),
            ),
            product_condition: t.condition,
            location,
            assigned_email: row.assignment.assigned_email.clone().unwrap_or_default(),
            assigned_member: row.assignment.assigned_member.clone().unwrap_or_default(),
            price: t.price.clone(),
            serial_number: (!serial.is_empty()).then(|| serial.to_string()),
            recoverable: t.recoverable,
            office_id: row.assignment.office_id.clone(),
            acquisition_date: t.acquisition_date,
        }
    }
}
