//! Writing values back into a document's form dictionary
//!
//! Best-effort, like the overlay registry: an unknown field name or a
//! value that fails the boundary checks is skipped into the report with
//! a warning, never an error, so one bad entry cannot abort a fill.

use std::collections::BTreeMap;

use formoverlay_core::{FieldType, FieldValue, ValueError};
use lopdf::{Document, Object, ObjectId};
use tracing::warn;

use crate::acroform::{detect_fields, widget_on_state, DetectedField};

/// Why one entry of a fill request was not applied
#[derive(Debug, Clone, PartialEq)]
pub enum FillSkipReason {
    /// No form field with that name exists in the document
    UnknownField,
    /// The value failed the field's boundary checks
    InvalidValue(ValueError),
    /// The field kind cannot be filled (signatures)
    Unsupported,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFill {
    pub name: String,
    pub reason: FillSkipReason,
}

/// Outcome of a [`fill_form`] call
#[derive(Debug, Clone, Default)]
pub struct FillReport {
    pub filled: usize,
    pub skipped: Vec<SkippedFill>,
}

/// Set `/V` (and widget `/AS` where applicable) for each named field
pub fn fill_form(doc: &mut Document, values: &BTreeMap<String, FieldValue>) -> FillReport {
    let detected = detect_fields(doc);
    let mut report = FillReport::default();

    for (name, value) in values {
        let Some(target) = detected.iter().find(|d| d.field.name == *name) else {
            warn!(field = %name, "no such form field, skipping");
            report.skipped.push(SkippedFill {
                name: name.clone(),
                reason: FillSkipReason::UnknownField,
            });
            continue;
        };

        if let Err(err) = target.field.validate_value(value) {
            warn!(field = %name, error = %err, "rejecting form value");
            report.skipped.push(SkippedFill {
                name: name.clone(),
                reason: FillSkipReason::InvalidValue(err),
            });
            continue;
        }

        match apply_value(doc, target, value) {
            Ok(()) => report.filled += 1,
            Err(reason) => {
                warn!(field = %name, reason = ?reason, "could not apply form value");
                report.skipped.push(SkippedFill {
                    name: name.clone(),
                    reason,
                });
            }
        }
    }

    report
}

fn apply_value(
    doc: &mut Document,
    target: &DetectedField,
    value: &FieldValue,
) -> Result<(), FillSkipReason> {
    match (target.field.field_type, value) {
        (FieldType::Text, FieldValue::Text(text)) => {
            set_entry(
                doc,
                target.field_id,
                "V",
                Object::String(text.clone().into_bytes(), lopdf::StringFormat::Literal),
            );
            Ok(())
        }
        (FieldType::Checkbox, FieldValue::Checkbox(checked)) => {
            let on_state = target
                .widget_ids
                .iter()
                .find_map(|&id| widget_on_state(doc, id))
                .unwrap_or_else(|| b"Yes".to_vec());
            let state = if *checked { on_state } else { b"Off".to_vec() };

            set_entry(doc, target.field_id, "V", Object::Name(state.clone()));
            for &widget_id in &target.widget_ids {
                set_entry(doc, widget_id, "AS", Object::Name(state.clone()));
            }
            Ok(())
        }
        (FieldType::Radio, FieldValue::Choice(selected)) => {
            let chosen: Vec<u8> = if selected.is_empty() {
                b"Off".to_vec()
            } else {
                selected.clone().into_bytes()
            };

            // Read every widget's on-state before mutating anything
            let on_states: Vec<Option<Vec<u8>>> = target
                .widget_ids
                .iter()
                .map(|&id| widget_on_state(doc, id))
                .collect();

            set_entry(doc, target.field_id, "V", Object::Name(chosen.clone()));
            for (&widget_id, on_state) in target.widget_ids.iter().zip(&on_states) {
                let state = if on_state.as_deref() == Some(chosen.as_slice()) {
                    chosen.clone()
                } else {
                    b"Off".to_vec()
                };
                set_entry(doc, widget_id, "AS", Object::Name(state));
            }
            Ok(())
        }
        (FieldType::Dropdown, FieldValue::Choice(selected)) => {
            set_entry(
                doc,
                target.field_id,
                "V",
                Object::String(selected.clone().into_bytes(), lopdf::StringFormat::Literal),
            );
            Ok(())
        }
        (FieldType::List, FieldValue::MultiChoice(selected)) => {
            let items = selected
                .iter()
                .map(|s| Object::String(s.clone().into_bytes(), lopdf::StringFormat::Literal))
                .collect();
            set_entry(doc, target.field_id, "V", Object::Array(items));
            Ok(())
        }
        _ => Err(FillSkipReason::Unsupported),
    }
}

fn set_entry(doc: &mut Document, id: ObjectId, key: &str, value: Object) {
    match doc.get_object_mut(id).and_then(|obj| obj.as_dict_mut()) {
        Ok(dict) => dict.set(key, value),
        Err(err) => warn!(object = ?id, key, %err, "failed to update dictionary"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acroform::detect_form_fields;
    use crate::test_pdf::form_test_pdf;
    use pretty_assertions::assert_eq;

    fn value_of(doc: &Document, name: &str) -> FieldValue {
        detect_form_fields(doc)
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
            .unwrap_or_else(|| panic!("field {} not detected", name))
    }

    #[test]
    fn test_fill_round_trips_through_detection() {
        let mut doc = form_test_pdf();
        let values: BTreeMap<String, FieldValue> = [
            ("name".to_string(), FieldValue::Text("Ada".to_string())),
            ("agree".to_string(), FieldValue::Checkbox(true)),
            ("state".to_string(), FieldValue::Choice("CA".to_string())),
            ("color".to_string(), FieldValue::Choice("Blue".to_string())),
        ]
        .into_iter()
        .collect();

        let report = fill_form(&mut doc, &values);
        assert_eq!(report.filled, 4);
        assert!(report.skipped.is_empty());

        assert_eq!(value_of(&doc, "name"), FieldValue::Text("Ada".to_string()));
        assert_eq!(value_of(&doc, "agree"), FieldValue::Checkbox(true));
        assert_eq!(
            value_of(&doc, "state"),
            FieldValue::Choice("CA".to_string())
        );
        assert_eq!(
            value_of(&doc, "color"),
            FieldValue::Choice("Blue".to_string())
        );
    }

    #[test]
    fn test_unknown_field_is_skipped_not_fatal() {
        let mut doc = form_test_pdf();
        let values: BTreeMap<String, FieldValue> = [
            ("name".to_string(), FieldValue::Text("Ada".to_string())),
            ("nonexistent".to_string(), FieldValue::Text("x".to_string())),
        ]
        .into_iter()
        .collect();

        let report = fill_form(&mut doc, &values);

        assert_eq!(report.filled, 1);
        assert_eq!(
            report.skipped,
            vec![SkippedFill {
                name: "nonexistent".to_string(),
                reason: FillSkipReason::UnknownField,
            }]
        );
    }

    #[test]
    fn test_invalid_option_is_rejected() {
        let mut doc = form_test_pdf();
        let values: BTreeMap<String, FieldValue> =
            [("state".to_string(), FieldValue::Choice("TX".to_string()))]
                .into_iter()
                .collect();

        let report = fill_form(&mut doc, &values);

        assert_eq!(report.filled, 0);
        assert!(matches!(
            report.skipped[0].reason,
            FillSkipReason::InvalidValue(_)
        ));
        // The stored value is untouched
        assert_eq!(
            value_of(&doc, "state"),
            FieldValue::Choice("FL".to_string())
        );
    }

    #[test]
    fn test_value_shape_mismatch_is_rejected() {
        let mut doc = form_test_pdf();
        let values: BTreeMap<String, FieldValue> =
            [("name".to_string(), FieldValue::Checkbox(true))]
                .into_iter()
                .collect();

        let report = fill_form(&mut doc, &values);

        assert_eq!(report.filled, 0);
        assert!(matches!(
            report.skipped[0].reason,
            FillSkipReason::InvalidValue(ValueError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unchecking_a_checkbox() {
        let mut doc = form_test_pdf();
        fill_form(
            &mut doc,
            &[("agree".to_string(), FieldValue::Checkbox(true))]
                .into_iter()
                .collect(),
        );
        fill_form(
            &mut doc,
            &[("agree".to_string(), FieldValue::Checkbox(false))]
                .into_iter()
                .collect(),
        );

        assert_eq!(value_of(&doc, "agree"), FieldValue::Checkbox(false));
    }
}
