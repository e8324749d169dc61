//! Add/edit product form.
//!
//! Stages: `CategoryUnselected` → `CategorySelected` → `AttributesComplete`,
//! then either a single create or, when quantity is above one,
//! `BulkCreatePending` which hands off to [`BulkCreateForm`].
//!
//! Changing the category of a new product resets every field that depends
//! on it (attributes, assignment, location, price). Picking a member forces
//! the Employee location; picking any other location drops the member.

use std::collections::HashMap;

use crate::category::{AttributeKey, Category, ProductAttributes};
use crate::error::CoreError;
use crate::forms::bulk::{BulkCreateForm, BulkTemplate};
use crate::forms::errors::FieldErrors;
use crate::location::Location;
use crate::member::Member;
use crate::office::Office;
use crate::product::{CreateProduct, Price, Product, ProductPatch};
use crate::status::{calculate_status, ProductCondition, ProductStatus};
use crate::types::{Date, EntityId};

/// Largest quantity a single bulk create accepts.
pub const MAX_BULK_QUANTITY: u32 = 10_000;

/// Tenant setting: whether products of a category must be recovered on
/// offboarding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableDefaults(HashMap<Category, bool>);

impl Default for RecoverableDefaults {
    fn default() -> Self {
        let mut map = HashMap::new();
        for category in crate::category::ALL_CATEGORIES {
            map.insert(category, category != Category::Merchandising);
        }
        Self(map)
    }
}

impl RecoverableDefaults {
    pub fn with(mut self, category: Category, recoverable: bool) -> Self {
        self.0.insert(category, recoverable);
        self
    }

    pub fn for_category(&self, category: Category) -> bool {
        self.0.get(&category).copied().unwrap_or(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update { product_id: EntityId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    CategoryUnselected,
    CategorySelected,
    AttributesComplete,
    BulkCreatePending,
}

/// What a valid create form turns into.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductSubmission {
    Single(CreateProduct),
    Bulk(BulkCreateForm),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    mode: FormMode,
    defaults: RecoverableDefaults,
    attributes: Option<ProductAttributes>,
    pub name: String,
    pub serial_number: String,
    price: Option<Price>,
    quantity: u32,
    pub condition: ProductCondition,
    pub recoverable: bool,
    location: Option<Location>,
    assigned_email: Option<String>,
    assigned_member: Option<String>,
    office_id: Option<EntityId>,
    pub acquisition_date: Option<Date>,
}

impl ProductForm {
    pub fn new(defaults: RecoverableDefaults) -> Self {
        Self {
            mode: FormMode::Create,
            defaults,
            attributes: None,
            name: String::new(),
            serial_number: String::new(),
            price: None,
            quantity: 1,
            condition: ProductCondition::Optimal,
            recoverable: true,
            location: None,
            assigned_email: None,
            assigned_member: None,
            office_id: None,
            acquisition_date: None,
        }
    }

    /// Prefill an edit form from an existing product.
    pub fn for_update(product: &Product, defaults: RecoverableDefaults) -> Self {
        Self {
            mode: FormMode::Update {
                product_id: product.id.clone(),
            },
            defaults,
            attributes: Some(product.attributes.clone()),
            name: product.name.clone().unwrap_or_default(),
            serial_number: product.serial_number.clone().unwrap_or_default(),
            price: product.price.clone(),
            quantity: 1,
            condition: product.condition,
            recoverable: product.recoverable,
            location: product.location,
            assigned_email: product.assigned_email.clone(),
            assigned_member: product.assigned_member.clone(),
            office_id: product.office_id.clone(),
            acquisition_date: product.acquisition_date,
        }
    }

    // ---- accessors ----

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn category(&self) -> Option<Category> {
        self.attributes.as_ref().map(ProductAttributes::category)
    }

    pub fn attributes(&self) -> Option<&ProductAttributes> {
        self.attributes.as_ref()
    }

    pub fn price(&self) -> Option<&Price> {
        self.price.as_ref()
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn assigned_email(&self) -> Option<&str> {
        self.assigned_email.as_deref()
    }

    pub fn assigned_member(&self) -> Option<&str> {
        self.assigned_member.as_deref()
    }

    pub fn office_id(&self) -> Option<&str> {
        self.office_id.as_deref()
    }

    /// Member and location are collected per unit once quantity exceeds one.
    pub fn is_assignment_disabled(&self) -> bool {
        self.quantity > 1
    }

    pub fn stage(&self) -> FormStage {
        let Some(attrs) = &self.attributes else {
            return FormStage::CategoryUnselected;
        };
        let name_ok = !attrs.category().requires_name() || !self.name.trim().is_empty();
        if !attrs.missing_required().is_empty() || !name_ok {
            return FormStage::CategorySelected;
        }
        if self.quantity > 1 {
            FormStage::BulkCreatePending
        } else {
            FormStage::AttributesComplete
        }
    }

    // ---- field changes ----

    /// Select a category, resetting every category-dependent field.
    pub fn set_category(&mut self, category: Category) -> Result<(), CoreError> {
        if let FormMode::Update { .. } = self.mode {
            if self.category() == Some(category) {
                return Ok(());
            }
            return Err(CoreError::Validation(
                "Category cannot change on an existing product".to_string(),
            ));
        }
        self.attributes = Some(ProductAttributes::empty(category));
        self.assigned_email = None;
        self.assigned_member = None;
        self.location = None;
        self.office_id = None;
        self.price = None;
        self.recoverable = self.defaults.for_category(category);
        Ok(())
    }

    pub fn set_attribute(&mut self, key: AttributeKey, value: Option<String>) -> Result<(), CoreError> {
        let attrs = self
            .attributes
            .as_mut()
            .ok_or_else(|| CoreError::Validation("Select a category first".to_string()))?;
        attrs.set(key, value)
    }

    pub fn set_price(&mut self, price: Option<Price>) {
        self.price = price;
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
        if quantity > 1 {
            self.assigned_email = None;
            self.assigned_member = None;
            self.location = None;
            self.office_id = None;
        }
    }

    /// Assign to a member (Employee location) or clear the assignment.
    pub fn set_member(&mut self, member: Option<&Member>) {
        match member {
            Some(m) => {
                self.assigned_email = Some(m.email.clone());
                self.assigned_member = Some(m.full_name());
                self.location = Some(Location::Employee);
                self.office_id = None;
            }
            None => {
                self.assigned_email = None;
                self.assigned_member = None;
                if self.location == Some(Location::Employee) {
                    self.location = None;
                }
            }
        }
    }

    /// Choose a location; any non-Employee location drops the member.
    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
        if location != Some(Location::Employee) {
            self.assigned_email = None;
            self.assigned_member = None;
        }
        if location != Some(Location::OurOffice) {
            self.office_id = None;
        }
    }

    pub fn set_office(&mut self, office: &Office) {
        self.set_location(Some(Location::OurOffice));
        self.office_id = Some(office.id.clone());
    }

    // ---- validation ----

    /// Field errors for the shared part of the form (everything except the
    /// per-unit member/location, which bulk rows validate themselves).
    fn shared_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        match &self.attributes {
            None => errors.add("category", "Category is required."),
            Some(attrs) => {
                for key in attrs.missing_required() {
                    errors.add(key.as_str(), format!("{} is required.", key.label()));
                }
                if attrs.category().requires_name() && self.name.trim().is_empty() {
                    errors.add("name", "Name is required.");
                }
            }
        }

        if self.quantity < 1 {
            errors.add("quantity", "Quantity must be at least 1.");
        } else if self.quantity > MAX_BULK_QUANTITY {
            errors.add(
                "quantity",
                format!("Quantity cannot exceed {MAX_BULK_QUANTITY}."),
            );
        }

        if let Some(price) = &self.price {
            if !price.amount.is_finite() || price.amount < 0.0 {
                errors.add("price", "Price must be a positive number.");
            } else if price.currency_code.trim().is_empty() {
                errors.add("price", "Currency is required.");
            }
        }

        errors
    }

    fn assignment_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match self.location {
            None => errors.add("location", "Location is required."),
            Some(Location::Employee) if self.assigned_email.is_none() => errors.add(
                "assignedMember",
                "Assigned member is required for Employee location.",
            ),
            _ => {}
        }
        errors
    }

    /// Validate a create form and route it to a single or bulk create.
    pub fn submit(&self) -> Result<ProductSubmission, FieldErrors> {
        if let FormMode::Update { .. } = self.mode {
            let mut errors = FieldErrors::new();
            errors.add("mode", "Use update_patch for existing products.");
            return Err(errors);
        }

        let mut errors = self.shared_errors();
        if self.quantity <= 1 {
            let assignment = self.assignment_errors();
            for (field, message) in assignment.iter() {
                errors.add(field, message);
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        // Shared errors are empty, so a category exists.
        let Some(attrs) = self.attributes.clone() else {
            return Err(errors);
        };

        if self.quantity > 1 {
            let template = BulkTemplate {
                name: non_blank(&self.name),
                attributes: attrs,
                price: self.price.clone(),
                condition: self.condition,
                recoverable: self.recoverable,
                acquisition_date: self.acquisition_date,
            };
            return Ok(ProductSubmission::Bulk(BulkCreateForm::new(
                template,
                self.quantity as usize,
            )));
        }

        Ok(ProductSubmission::Single(self.create_request(attrs)))
    }

    fn create_request(&self, attrs: ProductAttributes) -> CreateProduct {
        // Location presence was checked by assignment_errors.
        let location = self.location.unwrap_or(Location::FpWarehouse);
        CreateProduct {
            name: non_blank(&self.name),
            category: attrs.category(),
            attributes: attrs.to_pairs(),
            status: calculate_status(
                Some(self.condition),
                Some(location),
                self.assigned_email.as_deref(),
            ),
            product_condition: self.condition,
            location,
            assigned_email: self.assigned_email.clone().unwrap_or_default(),
            assigned_member: self.assigned_member.clone().unwrap_or_default(),
            price: self.price.clone(),
            serial_number: non_blank(&self.serial_number),
            recoverable: self.recoverable,
            office_id: self.office_id.clone(),
            acquisition_date: self.acquisition_date,
        }
    }

    /// Validate an edit form and diff it against the original product.
    ///
    /// Assignment changes go through the reassign flow, not this patch.
    pub fn update_patch(&self, original: &Product) -> Result<ProductPatch, FieldErrors> {
        let errors = self.shared_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let mut patch = ProductPatch::default();
        let name = non_blank(&self.name);
        if name != original.name {
            patch.name = Some(name.unwrap_or_default());
        }
        if let Some(attrs) = &self.attributes {
            if attrs != &original.attributes {
                patch.attributes = Some(attrs.to_pairs());
            }
        }
        if self.condition != original.condition {
            patch.product_condition = Some(self.condition);
            let server_owned =
                original.status.is_in_transit() || original.status == ProductStatus::Deprecated;
            if !server_owned {
                patch.status = Some(calculate_status(
                    Some(self.condition),
                    original.location,
                    original.assigned_email.as_deref(),
                ));
            }
        }
        if self.price != original.price {
            patch.price = Some(self.price.clone());
        }
        let serial = non_blank(&self.serial_number);
        if serial != original.serial_number {
            patch.serial_number = Some(serial.unwrap_or_default());
        }
        if self.recoverable != original.recoverable {
            patch.recoverable = Some(self.recoverable);
        }
        Ok(patch)
    }
}

fn non_blank(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::member::fixtures::complete_member;
    use crate::product::fixtures::laptop;

    fn computer_form() -> ProductForm {
        let mut form = ProductForm::new(RecoverableDefaults::default());
        form.set_category(Category::Computer).unwrap();
        form
    }

    #[test]
    fn starts_without_category() {
        let form = ProductForm::new(RecoverableDefaults::default());
        assert_eq!(form.stage(), FormStage::CategoryUnselected);
        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get("category"), Some("Category is required."));
    }

    #[test]
    fn computer_without_brand_and_model_is_blocked() {
        let mut form = computer_form();
        form.set_location(Some(Location::FpWarehouse));
        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get("brand"), Some("Brand is required."));
        assert_eq!(errors.get("model"), Some("Model is required."));
        assert_eq!(form.stage(), FormStage::CategorySelected);
    }

    #[test]
    fn category_change_resets_dependent_fields() {
        let member = complete_member("m1", "ana@acme.io");
        let mut form = computer_form();
        form.set_attribute(AttributeKey::Brand, Some("Apple".into())).unwrap();
        form.set_member(Some(&member));
        form.set_price(Some(Price {
            amount: 1500.0,
            currency_code: "USD".into(),
        }));

        form.set_category(Category::Monitor).unwrap();

        assert_eq!(form.attributes(), Some(&ProductAttributes::empty(Category::Monitor)));
        assert_eq!(form.assigned_email(), None);
        assert_eq!(form.assigned_member(), None);
        assert_eq!(form.location(), None);
        assert_eq!(form.price(), None);
    }

    #[test]
    fn merchandising_defaults_to_not_recoverable() {
        let mut form = ProductForm::new(RecoverableDefaults::default());
        form.set_category(Category::Merchandising).unwrap();
        assert!(!form.recoverable);
        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get("name"), Some("Name is required."));
    }

    #[test]
    fn member_forces_employee_location() {
        let member = complete_member("m1", "ana@acme.io");
        let mut form = computer_form();
        form.set_member(Some(&member));
        assert_eq!(form.location(), Some(Location::Employee));
        assert_eq!(form.assigned_member(), Some("Ana Diaz"));

        form.set_location(Some(Location::OurOffice));
        assert_eq!(form.assigned_email(), None);
    }

    #[test]
    fn employee_location_requires_member() {
        let mut form = computer_form();
        form.set_attribute(AttributeKey::Brand, Some("Apple".into())).unwrap();
        form.set_attribute(AttributeKey::Model, Some("Air".into())).unwrap();
        form.set_location(Some(Location::Employee));
        let errors = form.submit().unwrap_err();
        assert!(errors.get("assignedMember").is_some());
    }

    #[test]
    fn single_submit_derives_status() {
        let member = complete_member("m1", "ana@acme.io");
        let mut form = computer_form();
        form.set_attribute(AttributeKey::Brand, Some("Apple".into())).unwrap();
        form.set_attribute(AttributeKey::Model, Some("Air".into())).unwrap();
        form.set_member(Some(&member));
        form.serial_number = "  C02XYZ ".to_string();

        assert_matches!(form.submit(), Ok(ProductSubmission::Single(req)) => {
            assert_eq!(req.status, ProductStatus::Delivered);
            assert_eq!(req.serial_number.as_deref(), Some("C02XYZ"));
            assert_eq!(req.assigned_email, "ana@acme.io");
        });
    }

    #[test]
    fn quantity_above_one_routes_to_bulk() {
        let mut form = computer_form();
        form.set_attribute(AttributeKey::Brand, Some("Dell".into())).unwrap();
        form.set_attribute(AttributeKey::Model, Some("XPS 13".into())).unwrap();
        form.set_quantity(3);
        assert!(form.is_assignment_disabled());
        assert_eq!(form.stage(), FormStage::BulkCreatePending);

        assert_matches!(form.submit(), Ok(ProductSubmission::Bulk(bulk)) => {
            assert_eq!(bulk.rows().len(), 3);
            assert_eq!(bulk.template().attributes.get(AttributeKey::Brand), Some("Dell"));
        });
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut form = computer_form();
        form.set_price(Some(Price {
            amount: -1.0,
            currency_code: "USD".into(),
        }));
        let errors = form.submit().unwrap_err();
        assert_eq!(errors.get("price"), Some("Price must be a positive number."));
    }

    #[test]
    fn update_form_keeps_category_and_diffs() {
        let product = laptop("p1");
        let mut form = ProductForm::for_update(&product, RecoverableDefaults::default());
        assert!(form.set_category(Category::Audio).is_err());
        assert!(form.set_category(Category::Computer).is_ok());

        form.condition = ProductCondition::Defective;
        let patch = form.update_patch(&product).unwrap();
        assert_eq!(patch.product_condition, Some(ProductCondition::Defective));
        assert_eq!(patch.attributes, None);
        assert_eq!(patch.serial_number, None);
    }

    #[test]
    fn unusable_condition_sends_derived_status() {
        let product = laptop("p1");
        let mut form = ProductForm::for_update(&product, RecoverableDefaults::default());
        form.condition = ProductCondition::Unusable;

        let patch = form.update_patch(&product).unwrap();
        assert_eq!(patch.product_condition, Some(ProductCondition::Unusable));
        assert_eq!(patch.status, Some(ProductStatus::Unavailable));

        let mut shipped = laptop("p2");
        shipped.status = ProductStatus::InTransit;
        let mut form = ProductForm::for_update(&shipped, RecoverableDefaults::default());
        form.condition = ProductCondition::Unusable;
        assert_eq!(form.update_patch(&shipped).unwrap().status, None);
    }

    #[test]
    fn clearing_the_price_is_part_of_the_patch() {
        let mut product = laptop("p1");
        product.price = Some(Price {
            amount: 10.0,
            currency_code: "USD".into(),
        });
        let mut form = ProductForm::for_update(&product, RecoverableDefaults::default());
        form.set_price(None);

        let patch = form.update_patch(&product).unwrap();
        assert_eq!(patch.price, Some(None));
        assert_eq!(patch.apply_to(&product).unwrap().price, None);
    }
}
