//! AcroForm field detection and page geometry
//!
//! Walks `Root -> AcroForm -> Fields` and maps each terminal field to a
//! [`FormField`] the overlay core can place: name, type, current value,
//! options, widget bounds, and the pages carrying its widgets. Fields
//! that cannot be mapped are skipped with a warning; a malformed field
//! never fails detection of the rest of the document.

use std::collections::BTreeMap;

use formoverlay_core::{FieldType, FieldValue, FormField, PageDimensions, PdfBounds, US_LETTER};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::warn;

// Field flag bits (ISO 32000-1, tables 221/226/230)
const FF_READ_ONLY: i64 = 1 << 0;
const FF_REQUIRED: i64 = 1 << 1;
const FF_RADIO: i64 = 1 << 15;
const FF_COMBO: i64 = 1 << 17;

// Field trees are shallow in practice; a cycle through /Kids must not
// recurse forever.
const MAX_FIELD_TREE_DEPTH: usize = 32;

/// A terminal field together with the object ids needed to write it back
#[derive(Debug, Clone)]
pub(crate) struct DetectedField {
    pub field: FormField,
    pub field_id: ObjectId,
    pub widget_ids: Vec<ObjectId>,
}

/// Detect all fillable form fields in a document
///
/// Returns an empty list when the document has no AcroForm.
pub fn detect_form_fields(doc: &Document) -> Vec<FormField> {
    detect_fields(doc).into_iter().map(|d| d.field).collect()
}

pub(crate) fn detect_fields(doc: &Document) -> Vec<DetectedField> {
    let Some(field_ids) = acroform_field_ids(doc) else {
        return Vec::new();
    };
    let widget_pages = annotations_by_page(doc);

    let mut fields = Vec::new();
    for id in field_ids {
        collect_field(doc, id, None, &widget_pages, 0, &mut fields);
    }
    fields
}

/// Native page sizes from each page's MediaBox, keyed by zero-based index
///
/// MediaBox is inherited from the page tree when a page omits it;
/// US Letter is the last-resort default.
pub fn page_dimensions(doc: &Document) -> BTreeMap<u32, PageDimensions> {
    let mut out = BTreeMap::new();
    for (page_num, page_id) in doc.get_pages() {
        let dims = dict_of(doc, page_id)
            .and_then(|dict| media_box(doc, dict))
            .map(|mb| PageDimensions {
                width: mb[2] - mb[0],
                height: mb[3] - mb[1],
            })
            .unwrap_or(US_LETTER);
        out.insert(page_num - 1, dims);
    }
    out
}

fn acroform_field_ids(doc: &Document) -> Option<Vec<ObjectId>> {
    let root_id = doc.trailer.get(b"Root").ok()?.as_reference().ok()?;
    let catalog = dict_of(doc, root_id)?;
    let acroform = resolve(doc, catalog.get(b"AcroForm").ok()?).as_dict().ok()?;
    let fields = resolve(doc, acroform.get(b"Fields").ok()?).as_array().ok()?;
    Some(fields.iter().filter_map(|o| o.as_reference().ok()).collect())
}

/// Recurse through the field tree, emitting terminal fields
///
/// Kids carrying their own `/T` are child fields (dotted-name
/// hierarchy); kids without one are widget annotations of this field.
fn collect_field(
    doc: &Document,
    field_id: ObjectId,
    parent_name: Option<&str>,
    widget_pages: &BTreeMap<ObjectId, u32>,
    depth: usize,
    out: &mut Vec<DetectedField>,
) {
    if depth > MAX_FIELD_TREE_DEPTH {
        warn!(object = ?field_id, "field tree deeper than {MAX_FIELD_TREE_DEPTH}, skipping subtree");
        return;
    }
    let Some(dict) = dict_of(doc, field_id) else {
        warn!(object = ?field_id, "form field is not a dictionary, skipping");
        return;
    };

    let partial = dict.get(b"T").ok().and_then(|o| text_of(resolve(doc, o)));
    let name = match (parent_name, partial) {
        (Some(parent), Some(partial)) => format!("{}.{}", parent, partial),
        (None, Some(partial)) => partial,
        (Some(parent), None) => parent.to_string(),
        (None, None) => {
            warn!(object = ?field_id, "form field has no name, skipping");
            return;
        }
    };

    let kid_ids: Vec<ObjectId> = dict
        .get(b"Kids")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|kids| kids.iter().filter_map(|k| k.as_reference().ok()).collect())
        .unwrap_or_default();

    let child_fields: Vec<ObjectId> = kid_ids
        .iter()
        .copied()
        .filter(|&kid| dict_of(doc, kid).is_some_and(|d| d.has(b"T")))
        .collect();

    if !child_fields.is_empty() {
        for kid in child_fields {
            collect_field(doc, kid, Some(&name), widget_pages, depth + 1, out);
        }
        return;
    }

    // Terminal field: kids, if any, are its widgets
    let widget_ids = if kid_ids.is_empty() {
        vec![field_id]
    } else {
        kid_ids
    };

    let Some(ft) = dict.get(b"FT").ok().and_then(|o| name_bytes(resolve(doc, o))) else {
        warn!(field = %name, "form field has no /FT, skipping");
        return;
    };

    let flags = dict
        .get(b"Ff")
        .ok()
        .and_then(|o| resolve(doc, o).as_i64().ok())
        .unwrap_or(0);

    let field_type = match ft {
        b"Tx" => FieldType::Text,
        b"Btn" if flags & FF_RADIO != 0 => FieldType::Radio,
        b"Btn" => FieldType::Checkbox,
        b"Ch" if flags & FF_COMBO != 0 => FieldType::Dropdown,
        b"Ch" => FieldType::List,
        b"Sig" => FieldType::Signature,
        _ => FieldType::Text,
    };

    let options = match field_type {
        FieldType::Radio | FieldType::Dropdown | FieldType::List => field_options(doc, dict),
        _ => None,
    };

    let max_length = match field_type {
        FieldType::Text => dict
            .get(b"MaxLen")
            .ok()
            .and_then(|o| resolve(doc, o).as_i64().ok())
            .filter(|&n| n > 0)
            .map(|n| n as u32),
        _ => None,
    };

    let bounds = widget_ids
        .iter()
        .find_map(|&id| dict_of(doc, id))
        .and_then(|widget| widget_bounds(doc, widget));

    let mut pages: Vec<u32> = widget_ids
        .iter()
        .filter_map(|id| widget_pages.get(id).copied())
        .collect();
    pages.sort_unstable();
    pages.dedup();

    out.push(DetectedField {
        field: FormField {
            name,
            field_type,
            value: field_value(doc, dict, field_type),
            required: flags & FF_REQUIRED != 0,
            options,
            bounds,
            page_indices: (!pages.is_empty()).then_some(pages),
            max_length,
            read_only: flags & FF_READ_ONLY != 0,
        },
        field_id,
        widget_ids,
    });
}

/// Current `/V` of a terminal field, shaped by its type
fn field_value(doc: &Document, dict: &Dictionary, field_type: FieldType) -> FieldValue {
    let v = dict.get(b"V").ok().map(|o| resolve(doc, o));

    match field_type {
        FieldType::Text => FieldValue::Text(v.and_then(text_of).unwrap_or_default()),
        FieldType::Checkbox => {
            let checked = matches!(v, Some(Object::Name(state)) if state != b"Off");
            FieldValue::Checkbox(checked)
        }
        FieldType::Radio | FieldType::Dropdown => {
            let selected = v
                .and_then(text_of)
                .filter(|s| s != "Off")
                .unwrap_or_default();
            FieldValue::Choice(selected)
        }
        FieldType::List => {
            let selected = match v {
                Some(Object::Array(items)) => items.iter().filter_map(text_of).collect(),
                Some(other) => text_of(other).map(|s| vec![s]).unwrap_or_default(),
                None => Vec::new(),
            };
            FieldValue::MultiChoice(selected)
        }
        FieldType::Signature => FieldValue::Signature,
    }
}

/// `/Opt` entries; a pair entry `[export, display]` contributes its
/// display string
fn field_options(doc: &Document, dict: &Dictionary) -> Option<Vec<String>> {
    let opts = resolve(doc, dict.get(b"Opt").ok()?).as_array().ok()?;
    let options: Vec<String> = opts
        .iter()
        .map(|o| resolve(doc, o))
        .filter_map(|o| match o {
            Object::Array(pair) => pair.last().and_then(text_of),
            other => text_of(other),
        })
        .collect();
    (!options.is_empty()).then_some(options)
}

/// Widget `/Rect` normalized to an x/y/width/height box
fn widget_bounds(doc: &Document, widget: &Dictionary) -> Option<PdfBounds> {
    let rect = resolve(doc, widget.get(b"Rect").ok()?).as_array().ok()?;
    let [x1, y1, x2, y2] = parse_box_array(rect)?;
    Some(PdfBounds {
        x: x1.min(x2),
        y: y1.min(y2),
        width: (x2 - x1).abs(),
        height: (y2 - y1).abs(),
    })
}

/// Map widget annotation ids to the zero-based page that carries them
fn annotations_by_page(doc: &Document) -> BTreeMap<ObjectId, u32> {
    let mut out = BTreeMap::new();
    for (page_num, page_id) in doc.get_pages() {
        let Some(page_dict) = dict_of(doc, page_id) else {
            continue;
        };
        let Some(annots) = page_dict
            .get(b"Annots")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
        else {
            continue;
        };
        for annot in annots {
            if let Ok(id) = annot.as_reference() {
                out.insert(id, page_num - 1);
            }
        }
    }
    out
}

/// On-state of a checkbox/radio widget: the non-`Off` key of its
/// appearance dictionary
pub(crate) fn widget_on_state(doc: &Document, widget_id: ObjectId) -> Option<Vec<u8>> {
    let widget = dict_of(doc, widget_id)?;
    let ap = resolve(doc, widget.get(b"AP").ok()?).as_dict().ok()?;
    let normal = resolve(doc, ap.get(b"N").ok()?).as_dict().ok()?;
    normal
        .iter()
        .map(|(key, _)| key)
        .find(|key| key.as_slice() != b"Off")
        .cloned()
}

fn media_box(doc: &Document, page_dict: &Dictionary) -> Option<[f64; 4]> {
    let mut dict = page_dict;
    // Walk up the page tree; depth cap guards against reference cycles
    for _ in 0..32 {
        if let Some(mb) = dict
            .get(b"MediaBox")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .and_then(|a| parse_box_array(a))
        {
            return Some(mb);
        }
        let parent_id = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = dict_of(doc, parent_id)?;
    }
    None
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box_array(array: &[Object]) -> Option<[f64; 4]> {
    if array.len() != 4 {
        return None;
    }
    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => return None,
        };
    }
    Some(result)
}

fn dict_of(doc: &Document, id: ObjectId) -> Option<&Dictionary> {
    doc.get_object(id).ok()?.as_dict().ok()
}

/// Follow references until a direct object; cycles give up after a few
/// hops and return the last reference seen
fn resolve<'a>(doc: &'a Document, mut obj: &'a Object) -> &'a Object {
    for _ in 0..8 {
        match obj.as_reference().ok().and_then(|id| doc.get_object(id).ok()) {
            Some(target) => obj = target,
            None => break,
        }
    }
    obj
}

fn name_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::Name(bytes) => Some(bytes.as_slice()),
        _ => None,
    }
}

fn text_of(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) | Object::Name(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        _ => None,
    }
}
