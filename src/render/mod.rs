//! # Element Renderer
//!
//! `render(element, mode)` turns one [`ReportElement`] into an [`ElementView`]:
//! a small, back-end-neutral tree of [`Node`]s plus the element's rectangle
//! and resolved style. The editable canvas and the read-only preview both
//! call this function, so what the editor shows is what the preview shows.
//!
//! ## Modes
//!
//! | Mode | Extra content |
//! |------|---------------|
//! | [`RenderMode::Edit`] | none |
//! | [`RenderMode::Preview`] | bracketed patient-field placeholders, two sample result rows |
//!
//! Nothing else differs between the modes: same nodes, same order, same
//! rectangle, same style.
//!
//! ## Back-ends
//!
//! - [`html`]: absolutely positioned HTML page
//! - [`raster`]: grayscale PNG drawn with the Spleen bitmap font

pub mod html;
pub mod raster;

use serde::{Deserialize, Serialize};

use crate::error::LabsheetError;
use crate::geometry::Rect;
use crate::template::{
    Content, ElementKind, Field, FontSize, FontWeight, ReportElement, ResolvedStyle, Style, TemplateDocument,
};

/// Fallback image when a logo has no source.
pub const PLACEHOLDER_SRC: &str = "/placeholder.svg";

/// Signature underline size in canvas pixels.
pub const SIGNATURE_RULE: (u32, u32) = (128, 32);

/// Illustrative rows shown in preview tables.
const SAMPLE_ROWS: [[&str; 5]; 2] = [
    ["Hemoglobin", "14.2", "12.0-15.5", "g/dL", "Normal"],
    ["WBC Count", "7,200", "4,000-11,000", "/μL", "Normal"],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Edit,
    Preview,
}

impl RenderMode {
    pub fn is_preview(&self) -> bool {
        matches!(self, RenderMode::Preview)
    }
}

/// One label of a patient-info grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEntry {
    pub label: String,
    /// `[label]` in preview mode, absent while editing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Back-end-neutral visual node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum Node {
    /// A line (or paragraph) of text. `field` names the content field it
    /// shows, which is what the inline editor targets.
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<Field>,
        text: String,
        font_size: FontSize,
        bold: bool,
    },
    Image {
        src: String,
        alt: String,
    },
    LabelGrid {
        heading: String,
        entries: Vec<LabelEntry>,
    },
    Table {
        title: String,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Fixed-size underline (pixels).
    Rule {
        width: u32,
        height: u32,
    },
    /// Element whose kind is not recognized.
    Unrecognized {
        kind: String,
    },
}

/// Rendered element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementView {
    pub id: String,
    /// Wire name of the kind (kept as text so unknown kinds survive).
    pub kind: String,
    pub rect: Rect,
    pub style: ResolvedStyle,
    pub body: Vec<Node>,
}

impl ElementView {
    /// Text nodes that the inline editor can target.
    pub fn editable_fields(&self) -> Vec<Field> {
        self.body
            .iter()
            .filter_map(|n| match n {
                Node::Text { field, .. } => *field,
                _ => None,
            })
            .collect()
    }
}

fn text(field: Option<Field>, text: &str, font_size: FontSize, bold: bool) -> Node {
    Node::Text {
        field,
        text: text.to_string(),
        font_size,
        bold,
    }
}

/// Render one element.
pub fn render(element: &ReportElement, mode: RenderMode) -> ElementView {
    let style = element.resolved_style();
    let size = style.font_size;
    let bold = style.font_weight == FontWeight::Bold;

    let body = match &element.content {
        Content::Header(c) => {
            let mut nodes = vec![text(Some(Field::Title), &c.title, size, bold)];
            if !c.subtitle.is_empty() {
                nodes.push(text(Some(Field::Subtitle), &c.subtitle, FontSize::Px14, false));
            }
            nodes
        }
        Content::Logo(c) => {
            let src = if c.src.is_empty() {
                PLACEHOLDER_SRC.to_string()
            } else {
                c.src.clone()
            };
            vec![Node::Image {
                src,
                alt: c.alt.clone(),
            }]
        }
        Content::PatientInfo(c) => {
            let entries = c
                .fields
                .iter()
                .map(|label| LabelEntry {
                    label: format!("{}:", label),
                    placeholder: mode.is_preview().then(|| format!("[{}]", label)),
                })
                .collect();
            vec![Node::LabelGrid {
                heading: "Patient Information".into(),
                entries,
            }]
        }
        Content::TestResults(c) => {
            let rows = if mode.is_preview() {
                sample_rows(c.columns.len())
            } else {
                Vec::new()
            };
            vec![Node::Table {
                title: c.title.clone(),
                columns: c.columns.clone(),
                rows,
            }]
        }
        Content::Text(c) => vec![text(Some(Field::Text), &c.text, size, bold)],
        Content::Signature(c) => {
            let mut nodes = vec![
                text(Some(Field::Title), &c.title, size, true),
                Node::Rule {
                    width: SIGNATURE_RULE.0,
                    height: SIGNATURE_RULE.1,
                },
                text(Some(Field::Name), &c.name, size, true),
                text(Some(Field::Designation), &c.designation, size, false),
            ];
            if !c.license.is_empty() {
                nodes.push(text(Some(Field::License), &c.license, FontSize::Px12, false));
            }
            nodes
        }
        Content::Footer(c) => vec![text(Some(Field::Text), &c.text, size, bold)],
    };

    ElementView {
        id: element.id.clone(),
        kind: element.kind().as_str().to_string(),
        rect: element.position,
        style,
        body,
    }
}

/// Sample rows cut or padded to the column count.
fn sample_rows(columns: usize) -> Vec<Vec<String>> {
    SAMPLE_ROWS
        .iter()
        .map(|row| {
            (0..columns)
                .map(|i| row.get(i).map(|s| s.to_string()).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Render every element of a document in draw order.
pub fn render_document(doc: &TemplateDocument, mode: RenderMode) -> Vec<ElementView> {
    doc.elements.iter().map(|e| render(e, mode)).collect()
}

/// Render one raw interchange element.
///
/// Unknown kinds yield an [`Node::Unrecognized`] marker instead of an error
/// so that a document from a newer producer still shows every element.
pub fn render_value(value: &serde_json::Value, mode: RenderMode) -> Result<ElementView, LabsheetError> {
    let kind = value
        .get("type")
        .and_then(|k| k.as_str())
        .ok_or_else(|| LabsheetError::MalformedTemplate("element has no 'type'".into()))?;

    if kind.parse::<ElementKind>().is_ok() {
        let element: ReportElement = serde_json::from_value(value.clone())
            .map_err(|e| LabsheetError::MalformedTemplate(e.to_string()))?;
        return Ok(render(&element, mode));
    }

    let id = value
        .get("id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let rect = value
        .get("position")
        .and_then(|p| serde_json::from_value::<Rect>(p.clone()).ok())
        .unwrap_or(Rect::new(0.0, 0.0, 100.0, 5.0));

    Ok(ElementView {
        id,
        kind: kind.to_string(),
        rect,
        style: Style::default().resolve(ElementKind::Text),
        body: vec![Node::Unrecognized {
            kind: kind.to_string(),
        }],
    })
}

/// Render a raw interchange document leniently.
///
/// The document envelope must be well formed; elements of unknown kinds are
/// kept as markers.
pub fn render_document_value(
    value: &serde_json::Value,
    mode: RenderMode,
) -> Result<Vec<ElementView>, LabsheetError> {
    let elements = value
        .get("elements")
        .and_then(|e| e.as_array())
        .ok_or_else(|| LabsheetError::MalformedTemplate("missing 'elements'".into()))?;
    elements
        .iter()
        .enumerate()
        .map(|(i, e)| {
            render_value(e, mode).map_err(|err| {
                LabsheetError::MalformedTemplate(format!("elements[{}]: {}", i, err))
            })
        })
        .collect()
}

/// Remove preview-only content from a view.
///
/// Used to check that the modes differ only in placeholders.
pub fn strip_placeholders(view: &ElementView) -> ElementView {
    let body = view
        .body
        .iter()
        .map(|node| match node {
            Node::LabelGrid { heading, entries } => Node::LabelGrid {
                heading: heading.clone(),
                entries: entries
                    .iter()
                    .map(|e| LabelEntry {
                        label: e.label.clone(),
                        placeholder: None,
                    })
                    .collect(),
            },
            Node::Table { title, columns, .. } => Node::Table {
                title: title.clone(),
                columns: columns.clone(),
                rows: Vec::new(),
            },
            other => other.clone(),
        })
        .collect();
    ElementView {
        body,
        ..view.clone()
    }
}
