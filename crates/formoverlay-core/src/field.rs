//! Form field data model
//!
//! Logical form fields as reported by a PDF field extractor, plus the
//! boundary-level value checks applied before a value is written back
//! into a document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of widget a form field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Checkbox,
    Radio,
    Dropdown,
    List,
    Signature,
}

/// A field's current value, tagged by shape
///
/// The shape must agree with the field's [`FieldType`]: `Text` for text
/// fields, `Checkbox` for checkboxes, `Choice` for radio groups and
/// dropdowns, `MultiChoice` for option lists. Signature fields carry no
/// value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Checkbox(bool),
    Choice(String),
    MultiChoice(Vec<String>),
    Signature,
}

impl FieldValue {
    /// The empty/default value for a field type
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Checkbox => FieldValue::Checkbox(false),
            FieldType::Radio | FieldType::Dropdown => FieldValue::Choice(String::new()),
            FieldType::List => FieldValue::MultiChoice(Vec::new()),
            FieldType::Signature => FieldValue::Signature,
        }
    }

    /// Whether this value counts as "not filled in" for required checks
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) => s.is_empty(),
            FieldValue::Checkbox(checked) => !checked,
            FieldValue::MultiChoice(selected) => selected.is_empty(),
            FieldValue::Signature => true,
        }
    }

    /// Whether this value's shape agrees with the given field type
    pub fn matches_type(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (FieldValue::Text(_), FieldType::Text)
                | (FieldValue::Checkbox(_), FieldType::Checkbox)
                | (FieldValue::Choice(_), FieldType::Radio)
                | (FieldValue::Choice(_), FieldType::Dropdown)
                | (FieldValue::MultiChoice(_), FieldType::List)
                | (FieldValue::Signature, FieldType::Signature)
        )
    }
}

/// A field's bounding box in PDF points
///
/// PDF coordinate convention: origin at the bottom-left corner of the
/// page, y increasing upward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PdfBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A logical form field in a document
///
/// A single field can have widgets on more than one page (a repeated
/// signature line, for example); `page_indices` lists every page with a
/// placed widget, zero-based. `bounds` and `page_indices` come from the
/// field extractor and may be absent when the document carries no usable
/// geometry for the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Fully-qualified field name, unique within the document
    pub name: String,
    pub field_type: FieldType,
    pub value: FieldValue,
    pub required: bool,
    /// Selectable options, present only for radio/dropdown/list fields
    pub options: Option<Vec<String>>,
    pub bounds: Option<PdfBounds>,
    /// Zero-based pages where this field has a visual widget
    pub page_indices: Option<Vec<u32>>,
    /// Maximum text length, text fields only
    pub max_length: Option<u32>,
    pub read_only: bool,
}

impl FormField {
    /// Create a field with no value, geometry, or constraints
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            value: FieldValue::default_for(field_type),
            required: false,
            options: None,
            bounds: None,
            page_indices: None,
            max_length: None,
            read_only: false,
        }
    }

    /// Check a candidate value against this field's constraints
    ///
    /// Boundary checks only: required-empty, value shape vs. field type,
    /// text length, and option membership for choice fields.
    pub fn validate_value(&self, value: &FieldValue) -> Result<(), ValueError> {
        if self.required && value.is_empty() {
            return Err(ValueError::Required {
                field: self.name.clone(),
            });
        }

        if !value.matches_type(self.field_type) {
            return Err(ValueError::TypeMismatch {
                field: self.name.clone(),
                expected: self.field_type,
            });
        }

        if let (FieldValue::Text(text), Some(max)) = (value, self.max_length) {
            if text.chars().count() as u32 > max {
                return Err(ValueError::TooLong {
                    field: self.name.clone(),
                    max,
                });
            }
        }

        if let Some(options) = &self.options {
            match value {
                FieldValue::Choice(selected) if !selected.is_empty() => {
                    if !options.contains(selected) {
                        return Err(ValueError::InvalidOption {
                            field: self.name.clone(),
                            option: selected.clone(),
                        });
                    }
                }
                FieldValue::MultiChoice(selected) => {
                    if let Some(bad) = selected.iter().find(|opt| !options.contains(opt)) {
                        return Err(ValueError::InvalidOption {
                            field: self.name.clone(),
                            option: bad.clone(),
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }
}

/// Why a candidate value was rejected at the interface boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} exceeds maximum length of {max}")]
    TooLong { field: String, max: u32 },

    #[error("{field} has invalid option {option:?}")]
    InvalidOption { field: String, option: String },

    #[error("{field} expects a {expected:?} value")]
    TypeMismatch { field: String, expected: FieldType },
}
