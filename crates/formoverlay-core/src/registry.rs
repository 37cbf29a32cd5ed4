//! Per-document registry of placed form-field widgets
//!
//! The registry is the single source of truth the rendering layer queries
//! for "what to draw, where, on this page". It owns one entry per
//! (field, page) occurrence, each carrying validated, clamped display
//! coordinates and per-occurrence visibility/focus state.
//!
//! Placement is best-effort: an occurrence that cannot be placed (missing
//! bounds, unknown page, geometry outside the page) is dropped into the
//! returned [`PlacementReport`] with a warning instead of failing the
//! rebuild, so a malformed field never blocks the rest of a document.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::coords::{self, DisplayCoordinates, PageDimensions, DEFAULT_DISPLAY_SCALE};
use crate::field::{FieldValue, FormField};

/// Identifies one placed widget: a field name plus a zero-based page
///
/// A field appearing on three pages yields three keys sharing `name`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct OccurrenceKey {
    pub name: String,
    pub page_index: u32,
}

/// One placed widget with its computed geometry and per-page state
#[derive(Debug, Clone, Serialize)]
pub struct RegistryEntry {
    pub field: FormField,
    pub page_index: u32,
    pub display_coordinates: DisplayCoordinates,
    /// True iff `page_index` equals the registry's current page
    pub is_visible: bool,
    /// Set explicitly by the consumer; at most one focused entry is a
    /// caller convention, not enforced here
    pub is_focused: bool,
}

/// Why an occurrence was dropped during a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The field carries no bounds or no page occurrences
    MissingBounds,
    /// No pixel dimensions are known for the occurrence's page
    MissingPageDimensions,
    /// Converted coordinates failed bounds validation
    OutOfBounds,
}

/// An occurrence dropped from the registry, with the reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedOccurrence {
    pub name: String,
    pub page_index: u32,
    pub reason: SkipReason,
}

/// Outcome of a registry rebuild
///
/// Skipped occurrences are diagnostics, not errors; the rebuild itself
/// always succeeds.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlacementReport {
    /// Number of entries stored
    pub placed: usize,
    pub skipped: Vec<SkippedOccurrence>,
}

/// Entry counts for diagnostics and telemetry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStats {
    pub total_fields: usize,
    pub visible_fields: usize,
    pub current_page: u32,
    pub fields_by_page: BTreeMap<u32, usize>,
}

/// Full dump of registry state for debugging tooling
///
/// Not a stable persisted format.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub entries: Vec<EntrySnapshot>,
    pub current_page: u32,
    pub stats: RegistryStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntrySnapshot {
    pub key: OccurrenceKey,
    pub entry: RegistryEntry,
}

/// Registry of form-field widgets for one loaded document
#[derive(Debug)]
pub struct FieldRegistry {
    entries: BTreeMap<OccurrenceKey, RegistryEntry>,
    page_dimensions: BTreeMap<u32, PageDimensions>,
    pdf_page_dimensions: BTreeMap<u32, PageDimensions>,
    current_page: u32,
    display_scale: f64,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            page_dimensions: BTreeMap::new(),
            pdf_page_dimensions: BTreeMap::new(),
            current_page: 0,
            display_scale: DEFAULT_DISPLAY_SCALE,
        }
    }

    /// Replace the entire entry set
    ///
    /// For every (field, page) occurrence: convert, validate, clamp, and
    /// store. Occurrences that cannot be placed end up in the report.
    pub fn set_fields(
        &mut self,
        fields: &[FormField],
        page_dimensions: BTreeMap<u32, PageDimensions>,
        pdf_page_dimensions: Option<BTreeMap<u32, PageDimensions>>,
        display_scale: f64,
    ) -> PlacementReport {
        self.display_scale = display_scale;
        self.page_dimensions = page_dimensions;
        self.pdf_page_dimensions = pdf_page_dimensions.unwrap_or_default();
        self.rebuild(fields)
    }

    /// Update the current page and recompute every entry's visibility
    pub fn set_current_page(&mut self, page_index: u32) {
        self.current_page = page_index;
        self.update_visibility();
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// All entries, in key order
    pub fn all_fields(&self) -> Vec<&RegistryEntry> {
        self.entries.values().collect()
    }

    /// Entries on the current page
    pub fn visible_fields(&self) -> Vec<&RegistryEntry> {
        self.entries.values().filter(|e| e.is_visible).collect()
    }

    /// Look up one entry
    ///
    /// With a page index this is a direct keyed lookup; without one, the
    /// first visible entry with the given name is returned.
    pub fn get_field(&self, name: &str, page_index: Option<u32>) -> Option<&RegistryEntry> {
        match page_index {
            Some(page_index) => self.entries.get(&OccurrenceKey {
                name: name.to_string(),
                page_index,
            }),
            None => self
                .entries
                .iter()
                .find(|(key, entry)| key.name == name && entry.is_visible)
                .map(|(_, entry)| entry),
        }
    }

    /// Set the focus flag on one entry; no-op if the key is absent
    pub fn set_field_focus(&mut self, name: &str, page_index: u32, focused: bool) {
        if let Some(entry) = self.entry_mut(name, page_index) {
            entry.is_focused = focused;
        }
    }

    /// Replace one entry's value; no-op if the key is absent
    pub fn update_field_value(&mut self, name: &str, page_index: u32, value: FieldValue) {
        if let Some(entry) = self.entry_mut(name, page_index) {
            entry.field.value = value;
        }
    }

    /// Recompute every entry from scratch against new page dimensions
    ///
    /// Focus state is not preserved: after a resize the coordinates may
    /// shift enough that "the same on-screen element" is ambiguous.
    /// Occurrences that no longer validate under the new dimensions are
    /// dropped, so the entry count can shrink but never grow.
    pub fn handle_resize(
        &mut self,
        new_page_dimensions: BTreeMap<u32, PageDimensions>,
    ) -> PlacementReport {
        let mut fields: Vec<FormField> = Vec::new();
        for entry in self.entries.values() {
            if !fields.iter().any(|f| f.name == entry.field.name) {
                fields.push(entry.field.clone());
            }
        }

        self.page_dimensions = new_page_dimensions;
        self.rebuild(&fields)
    }

    /// Drop all entries and dimension tables, reset to page 0
    pub fn clear(&mut self) {
        self.entries.clear();
        self.page_dimensions.clear();
        self.pdf_page_dimensions.clear();
        self.current_page = 0;
    }

    pub fn stats(&self) -> RegistryStats {
        let mut fields_by_page: BTreeMap<u32, usize> = BTreeMap::new();
        for key in self.entries.keys() {
            *fields_by_page.entry(key.page_index).or_default() += 1;
        }

        RegistryStats {
            total_fields: self.entries.len(),
            visible_fields: self.entries.values().filter(|e| e.is_visible).count(),
            current_page: self.current_page,
            fields_by_page,
        }
    }

    /// Dump the full registry state for debugging
    pub fn export_state(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            entries: self
                .entries
                .iter()
                .map(|(key, entry)| EntrySnapshot {
                    key: key.clone(),
                    entry: entry.clone(),
                })
                .collect(),
            current_page: self.current_page,
            stats: self.stats(),
        }
    }

    fn entry_mut(&mut self, name: &str, page_index: u32) -> Option<&mut RegistryEntry> {
        self.entries.get_mut(&OccurrenceKey {
            name: name.to_string(),
            page_index,
        })
    }

    fn rebuild(&mut self, fields: &[FormField]) -> PlacementReport {
        self.entries.clear();
        let mut report = PlacementReport::default();

        for field in fields {
            let Some(pages) = &field.page_indices else {
                continue;
            };
            for &page_index in pages {
                match self.place(field, page_index) {
                    Ok(display_coordinates) => {
                        let key = OccurrenceKey {
                            name: field.name.clone(),
                            page_index,
                        };
                        self.entries.insert(
                            key,
                            RegistryEntry {
                                field: field.clone(),
                                page_index,
                                display_coordinates,
                                is_visible: page_index == self.current_page,
                                is_focused: false,
                            },
                        );
                        report.placed += 1;
                    }
                    Err(reason) => {
                        warn!(
                            field = %field.name,
                            page = page_index,
                            reason = ?reason,
                            "dropping form field occurrence"
                        );
                        report.skipped.push(SkippedOccurrence {
                            name: field.name.clone(),
                            page_index,
                            reason,
                        });
                    }
                }
            }
        }

        self.update_visibility();
        report
    }

    /// Compute the final clamped coordinates for one occurrence
    fn place(&self, field: &FormField, page_index: u32) -> Result<DisplayCoordinates, SkipReason> {
        let Some(&page_dims) = self.page_dimensions.get(&page_index) else {
            return Err(SkipReason::MissingPageDimensions);
        };
        let pdf_dims = self.pdf_page_dimensions.get(&page_index).copied();

        let coords = coords::pdf_bounds_to_display(field, page_dims, pdf_dims, self.display_scale)
            .ok_or(SkipReason::MissingBounds)?;

        if !coords::validate_display_coordinates(coords, page_dims) {
            return Err(SkipReason::OutOfBounds);
        }

        Ok(coords::sanitize_coordinates(coords, page_dims))
    }

    fn update_visibility(&mut self) {
        for (key, entry) in &mut self.entries {
            entry.is_visible = key.page_index == self.current_page;
        }
    }
}
