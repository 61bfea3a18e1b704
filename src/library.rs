//! Template library: the collection the template list works against.
//!
//! Records carry the document plus bookkeeping the list shows (category, date,
//! default flag, where it came from). The library starts with four built-in
//! templates.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::error::LabsheetError;
use crate::export;
use crate::geometry::Rect;
use crate::template::{
    Content, FontSize, FontWeight, HeaderContent, PatientInfoContent, ReportElement, Style, TemplateDocument,
    TextAlign,
};

pub const IMPORTED_CATEGORY: &str = "Imported";
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSource {
    Manual,
    Imported,
}

/// A document plus its library bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    #[serde(flatten)]
    pub document: TemplateDocument,
    pub category: String,
    pub last_modified: NaiveDate,
    pub is_default: bool,
    pub source: TemplateSource,
}

/// What the template list shows for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub last_modified: NaiveDate,
    pub is_default: bool,
    pub source: TemplateSource,
    pub element_count: usize,
}

impl TemplateRecord {
    pub fn new(document: TemplateDocument, category: impl Into<String>, last_modified: NaiveDate) -> Self {
        Self {
            document,
            category: category.into(),
            last_modified,
            is_default: false,
            source: TemplateSource::Manual,
        }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            id: self.document.id.clone(),
            name: self.document.name.clone(),
            description: self.document.description.clone(),
            category: self.category.clone(),
            last_modified: self.last_modified,
            is_default: self.is_default,
            source: self.source,
            element_count: self.document.elements.len(),
        }
    }
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    records: Vec<TemplateRecord>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Library holding the built-in templates.
    pub fn with_builtins() -> Self {
        Self {
            records: builtin_records(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn list(&self) -> &[TemplateRecord] {
        &self.records
    }

    pub fn summaries(&self) -> Vec<TemplateSummary> {
        self.records.iter().map(TemplateRecord::summary).collect()
    }

    pub fn get(&self, id: &str) -> Result<&TemplateRecord, LabsheetError> {
        self.records
            .iter()
            .find(|r| r.id() == id)
            .ok_or_else(|| LabsheetError::NotFound(format!("template '{}'", id)))
    }

    fn index_of(&self, id: &str) -> Result<usize, LabsheetError> {
        self.records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| LabsheetError::NotFound(format!("template '{}'", id)))
    }

    /// Add a record. The document must be valid and its id unused.
    pub fn insert(&mut self, record: TemplateRecord) -> Result<&TemplateRecord, LabsheetError> {
        record.document.validate()?;
        if self.records.iter().any(|r| r.id() == record.id()) {
            return Err(LabsheetError::MalformedTemplate(format!(
                "duplicate template id '{}'",
                record.id()
            )));
        }
        tracing::debug!(id = %record.id(), name = %record.document.name, "template added");
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Add a document produced by scan import.
    pub fn import(&mut self, document: TemplateDocument, date: NaiveDate) -> Result<&TemplateRecord, LabsheetError> {
        let record = TemplateRecord {
            source: TemplateSource::Imported,
            ..TemplateRecord::new(document, IMPORTED_CATEGORY, date)
        };
        self.insert(record)
    }

    /// Empty template in `category` with a fresh id.
    pub fn create_blank(
        &mut self,
        name: impl Into<String>,
        category: Option<&str>,
        date: NaiveDate,
    ) -> Result<&TemplateRecord, LabsheetError> {
        let record = TemplateRecord::new(
            TemplateDocument::blank(name),
            category.unwrap_or(DEFAULT_CATEGORY),
            date,
        );
        self.insert(record)
    }

    /// Copy a record under a fresh id. The copy is never the default.
    pub fn duplicate(&mut self, id: &str, date: NaiveDate) -> Result<&TemplateRecord, LabsheetError> {
        let source = self.get(id)?;
        let record = TemplateRecord {
            document: export::duplicate(&source.document)?,
            category: source.category.clone(),
            last_modified: date,
            is_default: false,
            source: source.source,
        };
        self.insert(record)
    }

    pub fn delete(&mut self, id: &str) -> Result<TemplateRecord, LabsheetError> {
        let index = self.index_of(id)?;
        let removed = self.records.remove(index);
        tracing::debug!(id = %id, "template deleted");
        Ok(removed)
    }

    /// Replace the stored document with the same id.
    pub fn update_document(
        &mut self,
        document: TemplateDocument,
        date: NaiveDate,
    ) -> Result<&TemplateRecord, LabsheetError> {
        document.validate()?;
        let index = self.index_of(&document.id)?;
        let record = &mut self.records[index];
        record.document = document;
        record.last_modified = date;
        Ok(record)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn builtin_records() -> Vec<TemplateRecord> {
    let header = ReportElement {
        id: "1".into(),
        content: Content::Header(HeaderContent {
            title: "BLOOD TEST REPORT".into(),
            subtitle: "Laboratory Analysis".into(),
        }),
        style: Style {
            font_size: Some(FontSize::Px24),
            font_weight: Some(FontWeight::Bold),
            text_align: Some(TextAlign::Center),
            padding: Some("20px".into()),
            ..Default::default()
        },
        position: Rect::new(0.0, 0.0, 100.0, 15.0),
    };
    let patient = ReportElement {
        id: "2".into(),
        content: Content::PatientInfo(PatientInfoContent {
            fields: ["Patient Name", "Age", "Gender", "Sample ID", "Collection Date"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }),
        style: Style {
            font_size: Some(FontSize::Px14),
            padding: Some("15px".into()),
            border: Some("1px solid #e5e7eb".into()),
            ..Default::default()
        },
        position: Rect::new(0.0, 20.0, 100.0, 25.0),
    };

    let blood = TemplateRecord {
        is_default: true,
        ..TemplateRecord::new(
            TemplateDocument {
                description: "Default template for blood test results".into(),
                elements: vec![header, patient],
                ..TemplateDocument::new("1", "Standard Blood Test Report")
            },
            "Blood Tests",
            date(2024, 1, 15),
        )
    };

    let empty = |id: &str, name: &str, description: &str, category: &str, day: u32| {
        TemplateRecord::new(
            TemplateDocument {
                description: description.into(),
                ..TemplateDocument::new(id, name)
            },
            category,
            date(2024, 1, day),
        )
    };

    vec![
        blood,
        empty(
            "2",
            "Comprehensive Health Panel",
            "Multi-test report with detailed sections",
            "Comprehensive",
            14,
        ),
        empty(
            "3",
            "Microbiology Report",
            "Template for culture and sensitivity tests",
            "Microbiology",
            13,
        ),
        empty(
            "4",
            "Histopathology Report",
            "Biopsy and tissue examination template",
            "Histopathology",
            12,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ElementKind;
    use pretty_assertions::assert_eq;

    fn day() -> NaiveDate {
        date(2024, 2, 1)
    }

    #[test]
    fn test_builtins() {
        let library = TemplateLibrary::with_builtins();
        let names: Vec<_> = library.list().iter().map(|r| r.document.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Standard Blood Test Report",
                "Comprehensive Health Panel",
                "Microbiology Report",
                "Histopathology Report",
            ]
        );
        let defaults: Vec<_> = library.list().iter().filter(|r| r.is_default).map(|r| r.id()).collect();
        assert_eq!(defaults, ["1"]);
        for record in library.list() {
            record.document.validate().unwrap();
        }
    }

    #[test]
    fn test_record_json_shape() {
        let library = TemplateLibrary::with_builtins();
        let json = serde_json::to_value(library.get("1").unwrap()).unwrap();
        assert_eq!(json["name"], "Standard Blood Test Report");
        assert_eq!(json["category"], "Blood Tests");
        assert_eq!(json["lastModified"], "2024-01-15");
        assert_eq!(json["isDefault"], true);
        assert_eq!(json["source"], "manual");
        assert_eq!(json["elements"][0]["type"], "header");
        assert_eq!(json["elements"][1]["content"]["fields"][3], "Sample ID");
    }

    #[test]
    fn test_get_unknown() {
        let library = TemplateLibrary::with_builtins();
        assert!(matches!(library.get("nope"), Err(LabsheetError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_is_never_default() {
        let mut library = TemplateLibrary::with_builtins();
        let copy = library.duplicate("1", day()).unwrap().clone();
        assert_ne!(copy.id(), "1");
        assert_eq!(copy.document.name, "Standard Blood Test Report (Copy)");
        assert_eq!(copy.document.elements, library.get("1").unwrap().document.elements);
        assert!(!copy.is_default);
        assert_eq!(copy.last_modified, day());
        assert_eq!(library.len(), 5);
    }

    #[test]
    fn test_delete() {
        let mut library = TemplateLibrary::with_builtins();
        let removed = library.delete("3").unwrap();
        assert_eq!(removed.document.name, "Microbiology Report");
        assert_eq!(library.len(), 3);
        assert!(matches!(library.delete("3"), Err(LabsheetError::NotFound(_))));
    }

    #[test]
    fn test_import_marks_source() {
        let mut library = TemplateLibrary::new();
        let record = library.import(TemplateDocument::default_report(), day()).unwrap();
        assert_eq!(record.source, TemplateSource::Imported);
        assert_eq!(record.category, IMPORTED_CATEGORY);
        assert!(!record.is_default);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut library = TemplateLibrary::with_builtins();
        let record = TemplateRecord::new(TemplateDocument::new("2", "Clash"), "Other", day());
        assert!(matches!(library.insert(record), Err(LabsheetError::MalformedTemplate(_))));
    }

    #[test]
    fn test_update_document() {
        let mut library = TemplateLibrary::with_builtins();
        let mut doc = library.get("2").unwrap().document.clone();
        doc.add_element(ElementKind::Footer);
        let record = library.update_document(doc, day()).unwrap();
        assert_eq!(record.document.elements.len(), 1);
        assert_eq!(record.last_modified, day());

        let stray = TemplateDocument::new("missing", "Stray");
        assert!(matches!(library.update_document(stray, day()), Err(LabsheetError::NotFound(_))));
    }

    #[test]
    fn test_create_blank() {
        let mut library = TemplateLibrary::new();
        let record = library.create_blank("Urinalysis", None, day()).unwrap();
        assert_eq!(record.category, DEFAULT_CATEGORY);
        assert_eq!(record.document.description, "Blank template");
        assert!(record.document.elements.is_empty());
    }
}
