// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form schemas of the management screens.

use sitedesk_config::model::DefaultsConfig;
use sitedesk_core::{Customer, Leave, Role, Site};

use crate::draft::{FieldSpec, FormSchema};

pub fn site() -> FormSchema<Site> {
    FormSchema::new(vec![
        FieldSpec::text("image", "Image"),
        FieldSpec::text("name", "Name").required("Name is required"),
        FieldSpec::text("address", "Address").required("Address is required"),
        FieldSpec::text("city", "City").required("City is required"),
        FieldSpec::text("state", "State").required("State is required"),
        FieldSpec::text("country", "Country").required("Country is required"),
        FieldSpec::text("postalCode", "Postal Code").required("Postal Code is required"),
    ])
}

/// Customer form. New drafts get the configured placeholder password.
pub fn customer(defaults: &DefaultsConfig) -> FormSchema<Customer> {
    FormSchema::new(vec![
        FieldSpec::text("image", "Image"),
        FieldSpec::text("fullName", "Full Name").required("Required"),
        FieldSpec::foreign_key("siteId", "Site"),
        FieldSpec::text("email", "Email")
            .required("Invalid email")
            .email("Invalid email"),
        FieldSpec::text("address", "Address").required("Required"),
        FieldSpec::text("phone", "Phone")
            .required("Invalid phone")
            .phone("Invalid phone"),
        FieldSpec::text("city", "City").required("Required"),
        FieldSpec::text("state", "State").required("Required"),
        FieldSpec::text("country", "Country").required("Required"),
        FieldSpec::text("role", "Role").required("Required"),
        FieldSpec::text("currentLocation", "Current Location").required("Required"),
        FieldSpec::text("password", "Password")
            .required("Required")
            .default_value(defaults.customer_password.clone())
            .secret(),
    ])
}

pub fn role() -> FormSchema<Role> {
    FormSchema::new(vec![
        FieldSpec::text("name", "Role Name").required("Role name is required"),
        FieldSpec::menus("menus", "Menus").default_value(Vec::<String>::new()),
    ])
}

/// Leave form. `ownerId` is set by the leave book, not the user.
pub fn leave() -> FormSchema<Leave> {
    FormSchema::new(vec![
        FieldSpec::text("type", "Leave Type").required("Leave type is required"),
        FieldSpec::text("startDate", "Start Date").required("Start date is required"),
        FieldSpec::text("endDate", "End Date").required("End date is required"),
        FieldSpec::text("description", "Description").required("Description is required"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_draft_defaults_password() {
        let defaults = DefaultsConfig {
            customer_password: "welcome1".into(),
        };
        let draft = customer(&defaults).blank();
        assert_eq!(draft.text("password"), "welcome1");
        assert_eq!(customer(&defaults).secret_fields(), ["password"]);
    }

    #[test]
    fn customer_without_email_fails_on_email() {
        let schema = customer(&DefaultsConfig::default());
        let mut draft = schema.blank();
        for (field, value) in [
            ("fullName", "Asha Rao"),
            ("address", "12 MG Road"),
            ("phone", "9876543210"),
            ("city", "Pune"),
            ("state", "MH"),
            ("country", "IND"),
            ("role", "customer"),
            ("currentLocation", "Pune"),
        ] {
            draft.set(field, value);
        }
        let errors = schema.validate(&draft).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Invalid email"));
    }

    #[test]
    fn empty_site_draft_flags_every_required_field() {
        let schema = site();
        let errors = schema.validate(&schema.blank()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert!(!errors.contains("image"));
        assert_eq!(errors.get("postalCode"), Some("Postal Code is required"));
    }

    #[test]
    fn leave_fields_are_all_required() {
        let schema = leave();
        let errors = schema.validate(&schema.blank()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|(f, _)| f).collect();
        assert_eq!(fields, ["description", "endDate", "startDate", "type"]);
    }

    #[test]
    fn role_draft_starts_with_no_menus() {
        let draft = role().blank();
        assert_eq!(draft.get("menus"), Some(&serde_json::json!([])));
    }
}
