// SPDX-FileCopyrightText: 2026 Sitedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Form drafts and declarative field rules.
//!
//! A [`FormDraft`] is the untyped field map a create/edit dialog works on.
//! A [`FormSchema`] lists each field's rules and default, validates a draft,
//! and normalizes it into the shape the collection stores.

use std::marker::PhantomData;
use std::str::FromStr;

use serde_json::Value;
use sitedesk_core::rules::{is_blank, is_valid_email, is_valid_phone};
use sitedesk_core::{Fields, Menu, Record, SitedeskError, ValidationErrors, to_fields};
use strum::IntoEnumIterator;

/// A check applied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Non-blank, with the message to show otherwise.
    Required(String),
    Email(String),
    Phone(String),
    MinLength(usize, String),
    /// Every entry is a catalogue menu name.
    Menus,
}

/// How a field is stored once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    #[default]
    Text,
    /// Optional id; blank becomes null, numeric strings become numbers.
    ForeignKey,
    /// Set of catalogue menus, de-duplicated and in catalogue order.
    MenuSet,
}

/// One field of a form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: Vec<FieldRule>,
    pub default: Option<Value>,
    /// Left out of list search.
    pub secret: bool,
}

impl FieldSpec {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            rules: Vec::new(),
            default: None,
            secret: false,
        }
    }

    pub fn foreign_key(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::ForeignKey,
            ..Self::text(name, label)
        }
    }

    pub fn menus(name: &'static str, label: &'static str) -> Self {
        Self {
            kind: FieldKind::MenuSet,
            rules: vec![FieldRule::Menus],
            ..Self::text(name, label)
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.rules.push(FieldRule::Required(message.into()));
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.rules.push(FieldRule::Email(message.into()));
        self
    }

    pub fn phone(mut self, message: impl Into<String>) -> Self {
        self.rules.push(FieldRule::Phone(message.into()));
        self
    }

    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.rules.push(FieldRule::MinLength(min, message.into()));
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    fn check(&self, value: Option<&Value>, errors: &mut ValidationErrors) {
        let text = value.map(as_text).unwrap_or_default();
        for rule in &self.rules {
            let failed = match rule {
                FieldRule::Required(message) => is_blank(&text).then_some(message.clone()),
                // Format rules only apply once something was entered.
                FieldRule::Email(message) => {
                    (!is_blank(&text) && !is_valid_email(text.trim())).then_some(message.clone())
                }
                FieldRule::Phone(message) => {
                    (!is_blank(&text) && !is_valid_phone(text.trim())).then_some(message.clone())
                }
                FieldRule::MinLength(min, message) => {
                    (!text.is_empty() && text.chars().count() < *min).then_some(message.clone())
                }
                FieldRule::Menus => unknown_menus(value),
            };
            if let Some(message) = failed {
                errors.add(self.name, message);
            }
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) if items.is_empty() => String::new(),
        other => other.to_string(),
    }
}

fn unknown_menus(value: Option<&Value>) -> Option<String> {
    let items = match value {
        None | Some(Value::Null) => return None,
        Some(Value::Array(items)) => items,
        Some(_) => return Some("Menus must be a list".to_string()),
    };
    let unknown: Vec<String> = items
        .iter()
        .map(as_text)
        .filter(|name| Menu::from_str(name).is_err())
        .collect();
    if unknown.is_empty() {
        None
    } else {
        Some(format!("Unknown menu: {}", unknown.join(", ")))
    }
}

/// Field rules and defaults for one entity's form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema<T> {
    fields: Vec<FieldSpec>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> FormSchema<T> {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            _marker: PhantomData,
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of fields excluded from list search.
    pub fn secret_fields(&self) -> Vec<&'static str> {
        self.fields.iter().filter(|f| f.secret).map(|f| f.name).collect()
    }

    /// A draft holding only the declared defaults.
    pub fn blank(&self) -> FormDraft<T> {
        let mut values = Fields::new();
        for field in &self.fields {
            if let Some(default) = &field.default {
                values.insert(field.name.to_string(), default.clone());
            }
        }
        FormDraft::from_fields(values)
    }

    /// A draft pre-filled from `record`, without its id.
    pub fn from_record(&self, record: &T) -> Result<FormDraft<T>, SitedeskError> {
        let mut values = to_fields(record).map_err(SitedeskError::storage)?;
        values.remove("id");
        Ok(FormDraft::from_fields(values))
    }

    /// Check every rule; one message per failing field.
    pub fn validate(&self, draft: &FormDraft<T>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for field in &self.fields {
            field.check(draft.get(field.name), &mut errors);
        }
        errors.into_result()
    }

    /// Validate, then coerce fields into their stored shape.
    pub fn finish(&self, draft: &FormDraft<T>) -> Result<Fields, SitedeskError> {
        self.validate(draft)?;
        let mut values = draft.values.clone();
        values.remove("id");
        for field in &self.fields {
            let Some(value) = values.get_mut(field.name) else {
                continue;
            };
            match field.kind {
                FieldKind::Text => {}
                FieldKind::ForeignKey => *value = normalize_foreign_key(value),
                FieldKind::MenuSet => *value = normalize_menus(value),
            }
        }
        Ok(values)
    }
}

fn normalize_foreign_key(value: &Value) -> Value {
    match value {
        Value::Number(n) => n.as_u64().map(Value::from).unwrap_or(Value::Null),
        Value::String(s) => s.trim().parse::<u64>().map(Value::from).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

fn normalize_menus(value: &Value) -> Value {
    let Value::Array(items) = value else {
        return Value::Array(Vec::new());
    };
    let chosen: Vec<Menu> = items
        .iter()
        .filter_map(|item| Menu::from_str(&as_text(item)).ok())
        .collect();
    Value::Array(
        Menu::iter()
            .filter(|menu| chosen.contains(menu))
            .map(|menu| Value::String(menu.to_string()))
            .collect(),
    )
}

/// The in-progress values of a create or edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft<T> {
    values: Fields,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Default for FormDraft<T> {
    fn default() -> Self {
        Self::from_fields(Fields::new())
    }
}

impl<T> FormDraft<T> {
    pub fn from_fields(values: Fields) -> Self {
        Self {
            values,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// The field as display text; blank when unset or null.
    pub fn text(&self, field: &str) -> String {
        self.values.get(field).map(as_text).unwrap_or_default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(field.into(), value.into());
        self
    }

    pub fn clear(&mut self, field: &str) -> &mut Self {
        self.values.remove(field);
        self
    }

    pub fn values(&self) -> &Fields {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sitedesk_core::{Customer, Role};

    fn customer_schema() -> FormSchema<Customer> {
        FormSchema::new(vec![
            FieldSpec::text("fullName", "Full Name").required("Required"),
            FieldSpec::foreign_key("siteId", "Site"),
            FieldSpec::text("email", "Email")
                .required("Invalid email")
                .email("Invalid email"),
            FieldSpec::text("phone", "Phone")
                .required("Invalid phone")
                .phone("Invalid phone"),
            FieldSpec::text("password", "Password")
                .required("Required")
                .default_value("default123")
                .secret(),
        ])
    }

    #[test]
    fn blank_draft_carries_defaults_only() {
        let draft = customer_schema().blank();
        assert_eq!(draft.text("password"), "default123");
        assert_eq!(draft.values().len(), 1);
    }

    #[test]
    fn validate_reports_first_failure_per_field() {
        let schema = customer_schema();
        let mut draft = schema.blank();
        draft.set("fullName", "Asha").set("phone", "12");
        let errors = schema.validate(&draft).unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email"));
        assert_eq!(errors.get("phone"), Some("Invalid phone"));
        assert!(!errors.contains("fullName"));
        assert!(!errors.contains("siteId"));
    }

    #[test]
    fn finish_coerces_foreign_keys() {
        let schema = customer_schema();
        let mut draft = schema.blank();
        draft
            .set("fullName", "Asha")
            .set("email", "asha@example.com")
            .set("phone", "9876543210")
            .set("siteId", "2")
            .set("id", 40);
        let fields = schema.finish(&draft).unwrap();
        assert_eq!(fields["siteId"], json!(2));
        assert!(!fields.contains_key("id"));

        draft.set("siteId", "");
        assert_eq!(schema.finish(&draft).unwrap()["siteId"], Value::Null);
    }

    #[test]
    fn from_record_drops_id() {
        let schema = customer_schema();
        let draft = schema
            .from_record(&Customer {
                id: 7,
                full_name: "Asha".into(),
                site_id: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert!(draft.get("id").is_none());
        assert_eq!(draft.text("fullName"), "Asha");
        assert_eq!(draft.get("siteId"), Some(&json!(1)));
    }

    #[test]
    fn menus_are_checked_and_normalized() {
        let schema: FormSchema<Role> = FormSchema::new(vec![
            FieldSpec::text("name", "Role Name").required("Role name is required"),
            FieldSpec::menus("menus", "Menus"),
        ]);
        let mut draft = schema.blank();
        draft
            .set("name", "Auditor")
            .set("menus", json!(["Billing", "Reports"]));
        let errors = schema.validate(&draft).unwrap_err();
        assert_eq!(errors.get("menus"), Some("Unknown menu: Billing"));

        draft.set("menus", json!(["Settings", "Dashboard", "Settings"]));
        let fields = schema.finish(&draft).unwrap();
        assert_eq!(fields["menus"], json!(["Dashboard", "Settings"]));
    }

    #[test]
    fn min_length_only_applies_to_entered_text() {
        let schema: FormSchema<Customer> = FormSchema::new(vec![
            FieldSpec::text("password", "Password").min_length(6, "Too short"),
        ]);
        let mut draft = schema.blank();
        assert!(schema.validate(&draft).is_ok());
        draft.set("password", "abc");
        assert_eq!(
            schema.validate(&draft).unwrap_err().get("password"),
            Some("Too short")
        );
    }
}
