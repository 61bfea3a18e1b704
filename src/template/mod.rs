//! # Template Document Model
//!
//! A [`TemplateDocument`] is a named, ordered list of [`ReportElement`]s. Each
//! element has a kind, kind-specific [`Content`], a [`Style`] and a position
//! rectangle in percentage-of-canvas units.
//!
//! ## Interchange format
//!
//! ```json
//! {
//!   "id": "1",
//!   "name": "Standard Blood Test Report",
//!   "description": "Basic blood test report template",
//!   "elements": [
//!     {
//!       "id": "header-1",
//!       "type": "header",
//!       "content": { "title": "PATHOLOGY LAB", "subtitle": "Blood Test Report" },
//!       "style": { "fontSize": "24px", "fontWeight": "bold", "textAlign": "center" },
//!       "position": { "x": 0, "y": 0, "width": 100, "height": 15 }
//!     }
//!   ]
//! }
//! ```
//!
//! Element order is draw order: later elements are drawn on top.
//!
//! ## Updates
//!
//! All mutation goes through [`TemplateDocument::apply`] with an
//! [`ElementUpdate`]. A failed update leaves the document untouched.

mod types;

pub use types::*;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

use crate::error::LabsheetError;
use crate::geometry::Rect;

/// Rectangle given to a freshly added element.
pub const DEFAULT_RECT: Rect = Rect::new(10.0, 10.0, 50.0, 10.0);

/// Field-wise content changes, applied all-or-nothing.
pub type ContentPatch = BTreeMap<Field, FieldValue>;

// ============================================================================
// ELEMENT
// ============================================================================

/// One positioned element on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportElement {
    pub id: String,
    pub content: Content,
    pub style: Style,
    pub position: Rect,
}

impl ReportElement {
    /// Element with the kind's editor defaults at [`DEFAULT_RECT`].
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            content: kind.default_content(),
            style: kind.default_style(),
            position: DEFAULT_RECT,
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.content.kind()
    }

    /// Copy with the content patch merged in.
    pub fn with_content(&self, patch: &ContentPatch) -> Result<Self, LabsheetError> {
        let mut content = self.content.clone();
        for (field, value) in patch {
            content.set(*field, value.clone())?;
        }
        Ok(Self {
            content,
            ..self.clone()
        })
    }

    /// Copy with the style patch merged in.
    pub fn with_style(&self, patch: &Style) -> Self {
        Self {
            style: self.style.merged(patch),
            ..self.clone()
        }
    }

    /// Copy at a new position. Rejects rectangles outside the canvas.
    pub fn with_position(&self, rect: Rect) -> Result<Self, LabsheetError> {
        rect.check(self.kind().min_size())?;
        Ok(Self {
            position: rect,
            ..self.clone()
        })
    }

    /// Style with kind fallbacks filled in.
    pub fn resolved_style(&self) -> ResolvedStyle {
        self.style.resolve(self.kind())
    }
}

impl Serialize for ReportElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("ReportElement", 5)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("type", &self.kind())?;
        s.serialize_field("content", &self.content)?;
        s.serialize_field("style", &self.style)?;
        s.serialize_field("position", &self.position)?;
        s.end()
    }
}

/// Wire shape of an element before the kind is checked.
#[derive(Deserialize)]
struct RawElement {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: serde_json::Value,
    #[serde(default)]
    style: Style,
    position: Rect,
}

impl<'de> Deserialize<'de> for ReportElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;
        let raw = RawElement::deserialize(deserializer)?;
        let kind: ElementKind = raw.kind.parse().map_err(D::Error::custom)?;
        let value = match raw.content {
            serde_json::Value::Null => serde_json::Value::Object(Default::default()),
            other => other,
        };
        let content = Content::from_value(kind, value)
            .map_err(|e| D::Error::custom(format!("content: {}", e)))?;
        Ok(Self {
            id: raw.id,
            content,
            style: raw.style,
            position: raw.position,
        })
    }
}

/// Deserialize elements one at a time so errors name the offending index.
fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<ReportElement>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            serde_json::from_value(v)
                .map_err(|e| serde::de::Error::custom(format!("elements[{}]: {}", i, e)))
        })
        .collect()
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// Page size of an imported scan, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

/// Provenance of a template built from an uploaded scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    pub original_file: String,
    pub import_date: String,
    pub detected_elements: usize,
    pub confidence: f64,
    pub analysis_method: String,
    pub template_type: String,
    pub page_size: PageSize,
}

/// A named layout: the unit of editing, export and sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "deserialize_elements")]
    pub elements: Vec<ReportElement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TemplateMetadata>,
}

/// A change to one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ElementUpdate {
    Content(ContentPatch),
    Style(Style),
    Position(Rect),
}

impl TemplateDocument {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            elements: Vec::new(),
            metadata: None,
        }
    }

    /// Empty template with a fresh id.
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            description: "Blank template".into(),
            ..Self::new(new_id(), name)
        }
    }

    /// Layout the editor opens when nothing was handed off.
    pub fn default_report() -> Self {
        let header = ReportElement {
            id: "header-1".into(),
            content: Content::Header(HeaderContent {
                title: "PATHOLOGY LABORATORY REPORT".into(),
                subtitle: "Comprehensive Medical Testing Services".into(),
            }),
            style: Style {
                font_size: Some(FontSize::Px24),
                font_weight: Some(FontWeight::Bold),
                text_align: Some(TextAlign::Center),
                color: Some("#1f2937".into()),
                padding: Some("20px".into()),
                ..Default::default()
            },
            position: Rect::new(0.0, 0.0, 100.0, 15.0),
        };
        let logo = ReportElement {
            id: "logo-1".into(),
            content: Content::Logo(LogoContent {
                src: "/placeholder.svg?height=80&width=200".into(),
                alt: "Lab Logo".into(),
            }),
            style: Style {
                text_align: Some(TextAlign::Right),
                padding: Some("10px".into()),
                ..Default::default()
            },
            position: Rect::new(70.0, 2.0, 25.0, 10.0),
        };
        let patient = ReportElement {
            id: "patient-info-1".into(),
            content: Content::PatientInfo(PatientInfoContent {
                fields: strings(&[
                    "Patient Name",
                    "Age",
                    "Gender",
                    "Sample ID",
                    "Collection Date",
                    "Report Date",
                ]),
            }),
            style: Style {
                font_size: Some(FontSize::Px14),
                padding: Some("15px".into()),
                border: Some("1px solid #e5e7eb".into()),
                ..Default::default()
            },
            position: Rect::new(0.0, 20.0, 100.0, 25.0),
        };
        let results = ReportElement {
            id: "test-results-1".into(),
            content: Content::TestResults(TestResultsContent {
                title: "TEST RESULTS".into(),
                columns: strings(&["Test Parameter", "Result", "Reference Range", "Units", "Flag"]),
            }),
            style: Style {
                font_size: Some(FontSize::Px14),
                padding: Some("15px".into()),
                ..Default::default()
            },
            position: Rect::new(0.0, 50.0, 100.0, 35.0),
        };
        let signature = ReportElement {
            id: "signature-1".into(),
            content: Content::Signature(SignatureContent {
                title: "Verified By:".into(),
                name: "Dr. [Name]".into(),
                designation: "Pathologist".into(),
                license: "License No: [Number]".into(),
            }),
            style: Style {
                font_size: Some(FontSize::Px12),
                text_align: Some(TextAlign::Right),
                padding: Some("20px".into()),
                ..Default::default()
            },
            position: Rect::new(60.0, 90.0, 40.0, 10.0),
        };

        Self {
            description: "Standard pathology report layout".into(),
            elements: vec![header, logo, patient, results, signature],
            ..Self::new("default", "Default Lab Report")
        }
    }

    pub fn element(&self, id: &str) -> Option<&ReportElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn position_of(&self, id: &str) -> Result<usize, LabsheetError> {
        self.elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LabsheetError::NotFound(format!("element '{}'", id)))
    }

    /// Append a new element of `kind` with editor defaults. Returns its id.
    pub fn add_element(&mut self, kind: ElementKind) -> String {
        let id = format!("{}-{}", kind.as_str(), new_id());
        debug!(kind = %kind, id = %id, "adding element");
        self.elements.push(ReportElement::new(id.clone(), kind));
        id
    }

    /// Append an existing element. Rejects duplicate ids and bad geometry.
    pub fn push_element(&mut self, element: ReportElement) -> Result<(), LabsheetError> {
        if self.element(&element.id).is_some() {
            return Err(LabsheetError::MalformedTemplate(format!(
                "duplicate element id '{}'",
                element.id
            )));
        }
        element.position.check(element.kind().min_size())?;
        self.elements.push(element);
        Ok(())
    }

    /// Remove an element by id.
    pub fn remove_element(&mut self, id: &str) -> Result<ReportElement, LabsheetError> {
        let index = self.position_of(id)?;
        Ok(self.elements.remove(index))
    }

    /// Apply one update to the element with the given id.
    pub fn apply(&mut self, id: &str, update: &ElementUpdate) -> Result<(), LabsheetError> {
        let index = self.position_of(id)?;
        let current = &self.elements[index];
        let next = match update {
            ElementUpdate::Content(patch) => current.with_content(patch)?,
            ElementUpdate::Style(patch) => current.with_style(patch),
            ElementUpdate::Position(rect) => current.with_position(*rect)?,
        };
        self.elements[index] = next;
        Ok(())
    }

    /// Check unique element ids and canvas bounds.
    ///
    /// Errors name the offending element index.
    pub fn validate(&self) -> Result<(), LabsheetError> {
        let mut seen = HashSet::new();
        for (i, element) in self.elements.iter().enumerate() {
            if !seen.insert(element.id.as_str()) {
                return Err(LabsheetError::MalformedTemplate(format!(
                    "elements[{}]: duplicate element id '{}'",
                    i, element.id
                )));
            }
            element
                .position
                .check(element.kind().min_size())
                .map_err(|e| LabsheetError::MalformedTemplate(format!("elements[{}]: {}", i, e)))?;
        }
        Ok(())
    }
}

/// Fresh opaque identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_header_uses_editor_defaults() {
        let mut doc = TemplateDocument::blank("New Template");
        let id = doc.add_element(ElementKind::Header);
        let el = doc.element(&id).unwrap();
        assert_eq!(el.position, Rect::new(10.0, 10.0, 50.0, 10.0));
        assert_eq!(el.content.text(Field::Title), Some("Report Title"));
        assert_eq!(el.content.text(Field::Subtitle), Some("Subtitle"));
        assert_eq!(el.style.font_size, Some(FontSize::Px20));
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let mut doc = TemplateDocument::blank("t");
        let a = doc.add_element(ElementKind::Text);
        let b = doc.add_element(ElementKind::Text);
        assert_ne!(a, b);
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_content_patch_is_atomic() {
        let mut doc = TemplateDocument::default_report();
        let before = doc.clone();
        let mut patch = ContentPatch::new();
        patch.insert(Field::Title, "NEW".into());
        patch.insert(Field::Columns, vec!["x".to_string()].into());
        let err = doc
            .apply("header-1", &ElementUpdate::Content(patch))
            .unwrap_err();
        assert!(matches!(err, LabsheetError::UnknownField { .. }));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_content_patch_merges_fields() {
        let mut doc = TemplateDocument::default_report();
        let mut patch = ContentPatch::new();
        patch.insert(Field::Subtitle, "Hematology".into());
        doc.apply("header-1", &ElementUpdate::Content(patch)).unwrap();
        let header = doc.element("header-1").unwrap();
        assert_eq!(header.content.text(Field::Title), Some("PATHOLOGY LABORATORY REPORT"));
        assert_eq!(header.content.text(Field::Subtitle), Some("Hematology"));
    }

    #[test]
    fn test_position_update_rejects_out_of_bounds() {
        let mut doc = TemplateDocument::default_report();
        let err = doc
            .apply(
                "logo-1",
                &ElementUpdate::Position(Rect::new(80.0, 0.0, 25.0, 10.0)),
            )
            .unwrap_err();
        assert!(matches!(err, LabsheetError::OutOfBoundsGeometry(_)));
        assert_eq!(doc.element("logo-1").unwrap().position, Rect::new(70.0, 2.0, 25.0, 10.0));
    }

    #[test]
    fn test_remove_unknown_element() {
        let mut doc = TemplateDocument::default_report();
        assert!(matches!(doc.remove_element("nope"), Err(LabsheetError::NotFound(_))));
        let removed = doc.remove_element("logo-1").unwrap();
        assert_eq!(removed.kind(), ElementKind::Logo);
        assert_eq!(doc.elements.len(), 4);
    }

    #[test]
    fn test_element_wire_format() {
        let json = r#"{
            "id": "t-1",
            "type": "test-results",
            "content": { "title": "CBC" },
            "position": { "x": 0, "y": 50, "width": 100, "height": 35 }
        }"#;
        let el: ReportElement = serde_json::from_str(json).unwrap();
        assert_eq!(el.kind(), ElementKind::TestResults);
        assert_eq!(el.content.get(Field::Columns), Some(FieldValue::List(vec![])));
        assert_eq!(el.style, Style::default());

        let value = serde_json::to_value(&el).unwrap();
        assert_eq!(value["type"], "test-results");
        assert_eq!(value["content"]["title"], "CBC");
    }

    #[test]
    fn test_unknown_kind_names_index() {
        let json = r#"{"id":"d","name":"n","elements":[
            {"id":"a","type":"text","position":{"x":0,"y":0,"width":50,"height":10}},
            {"id":"b","type":"bogus","position":{"x":0,"y":0,"width":50,"height":10}}
        ]}"#;
        let err = serde_json::from_str::<TemplateDocument>(json).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("elements[1]"), "{}", msg);
        assert!(msg.contains("Invalid element kind: 'bogus'"), "{}", msg);
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let mut doc = TemplateDocument::default_report();
        let mut copy = doc.elements[0].clone();
        copy.position = Rect::new(0.0, 0.0, 20.0, 10.0);
        doc.elements.push(copy);
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("elements[5]"));
    }

    #[test]
    fn test_update_wire_format() {
        let update: ElementUpdate =
            serde_json::from_str(r#"{"kind":"content","value":{"title":"X"}}"#).unwrap();
        let mut patch = ContentPatch::new();
        patch.insert(Field::Title, "X".into());
        assert_eq!(update, ElementUpdate::Content(patch));
    }

    #[test]
    fn test_default_report_is_valid() {
        let doc = TemplateDocument::default_report();
        assert_eq!(doc.name, "Default Lab Report");
        assert_eq!(doc.elements.len(), 5);
        doc.validate().unwrap();
    }
}
