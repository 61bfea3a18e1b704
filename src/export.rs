//! # Serialization and export
//!
//! The interchange format is the template's JSON form, pretty-printed with
//! two-space indentation. [`serialize`] and [`deserialize`] round-trip every
//! well-formed document exactly; [`deserialize`] never returns a partial
//! document.
//!
//! The other export formats are one-way:
//!
//! | Format | Content | Round-trips |
//! |--------|---------|-------------|
//! | `pdf` | placeholder blob naming the template | no |
//! | `json` | interchange format | yes |
//! | `image` | 800×1000 PNG: template name and element outlines | no |
//! | `html` | styled page with name and description only | no |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LabsheetError;
use crate::render::html::escape;
use crate::render::raster::{BLACK, Canvas, Face};
use crate::template::{TemplateDocument, new_id};

/// Size of the image export.
pub const IMAGE_EXPORT_SIZE: (usize, usize) = (800, 1000);

/// Serialize to the interchange format.
pub fn serialize(doc: &TemplateDocument) -> Result<String, LabsheetError> {
    serde_json::to_string_pretty(doc).map_err(|e| LabsheetError::MalformedTemplate(e.to_string()))
}

/// Parse and validate an interchange document.
///
/// Unknown element kinds, missing required fields, duplicate element ids and
/// out-of-canvas rectangles all fail with [`LabsheetError::MalformedTemplate`].
pub fn deserialize(bytes: &[u8]) -> Result<TemplateDocument, LabsheetError> {
    let doc: TemplateDocument =
        serde_json::from_slice(bytes).map_err(|e| LabsheetError::MalformedTemplate(e.to_string()))?;
    doc.validate()?;
    Ok(doc)
}

/// Deep copy with a fresh id and `" (Copy)"` appended to the name.
pub fn duplicate(doc: &TemplateDocument) -> Result<TemplateDocument, LabsheetError> {
    let mut copy = deserialize(serialize(doc)?.as_bytes())?;
    copy.id = new_id();
    copy.name = format!("{} (Copy)", doc.name);
    Ok(copy)
}

// ============================================================================
// EXPORT ARTIFACTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Json,
    Image,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Pdf,
        ExportFormat::Json,
        ExportFormat::Image,
        ExportFormat::Html,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Image => "image",
            ExportFormat::Html => "html",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::Image => "png",
            ExportFormat::Html => "html",
        }
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_ext(self.extension())
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            "image" | "png" => Ok(ExportFormat::Image),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// File name without extension; derived from the template name if unset.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default = "default_true")]
    pub include_metadata: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: None,
            include_metadata: true,
        }
    }
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Template name lower-cased, whitespace runs replaced by `_`.
pub fn default_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.extend(ch.to_lowercase());
            in_space = false;
        }
    }
    out
}

/// Produce an export artifact.
pub fn export(doc: &TemplateDocument, format: ExportFormat, options: &ExportOptions) -> Result<Artifact, LabsheetError> {
    let stem = options
        .file_name
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default_file_name(&doc.name));

    let bytes = match format {
        ExportFormat::Pdf => format!("PDF Export of {}", doc.name).into_bytes(),
        ExportFormat::Json => {
            if options.include_metadata {
                serialize(doc)?.into_bytes()
            } else {
                let stripped = TemplateDocument {
                    metadata: None,
                    ..doc.clone()
                };
                serialize(&stripped)?.into_bytes()
            }
        }
        ExportFormat::Image => export_image(doc)?,
        ExportFormat::Html => export_html(doc).into_bytes(),
    };

    tracing::info!(template = %doc.id, %format, size = bytes.len(), "exported");
    Ok(Artifact {
        file_name: format!("{}.{}", stem, format.extension()),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Snapshot image: name at the top, one outline per element.
pub fn export_image(doc: &TemplateDocument) -> Result<Vec<u8>, LabsheetError> {
    let (width, height) = IMAGE_EXPORT_SIZE;
    let mut canvas = Canvas::new(width, height);
    let face = Face::LARGE;
    canvas.draw_text(50, 50 - face.char_height, &format!("Template: {}", doc.name), face, false, BLACK)?;

    // Page area below the title, letter aspect.
    let top = 80;
    let page_h = height - top - 20;
    let page_w = (page_h as f64 * 8.5 / 11.0) as usize;
    let left = (width - page_w) / 2;
    canvas.stroke_rect(left, top, page_w, page_h, 160);
    for element in &doc.elements {
        let r = &element.position;
        canvas.stroke_rect(
            left + (r.x / 100.0 * page_w as f64) as usize,
            top + (r.y / 100.0 * page_h as f64) as usize,
            (r.width / 100.0 * page_w as f64) as usize,
            (r.height / 100.0 * page_h as f64) as usize,
            BLACK,
        );
    }
    canvas.to_png()
}

/// Minimal descriptive page. Elements are not included.
pub fn export_html(doc: &TemplateDocument) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{name}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .template {{ width: 8.5in; min-height: 11in; border: 1px solid #ccc; padding: 20px; }}
    </style>
</head>
<body>
    <div class="template">
        <h1>{name}</h1>
        <p>{description}</p>
    </div>
</body>
</html>
"#,
        name = escape(&doc.name),
        description = escape(&doc.description),
    )
}

// ============================================================================
// SHARING
// ============================================================================

/// Public link to a template.
pub fn share_link(base_url: &str, id: &str) -> String {
    format!("{}/templates/shared/{}", base_url.trim_end_matches('/'), id)
}

/// QR code PNG for a share link.
pub fn share_qr_png(link: &str) -> Result<Vec<u8>, LabsheetError> {
    const CELL: usize = 6;
    let side = crate::render::raster::qr_side(link, CELL)?;
    let mut canvas = Canvas::new(side, side);
    canvas.draw_qr(0, 0, link, CELL)?;
    canvas.to_png()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{PageSize, TemplateMetadata};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_round_trip() {
        let doc = TemplateDocument::default_report();
        let json = serialize(&doc).unwrap();
        assert!(json.starts_with("{\n  \"id\""));
        assert_eq!(deserialize(json.as_bytes()).unwrap(), doc);
    }

    #[test]
    fn test_missing_required_fields() {
        for json in [
            r#"{"name":"x","elements":[]}"#,
            r#"{"id":"1","elements":[]}"#,
            r#"{"id":"1","name":"x"}"#,
            r#"{"id":"1","name":"x","elements":[{"id":"a","type":"text"}]}"#,
            r#"{"id":"1","name":"x","elements":[{"type":"text","position":{"x":0,"y":0,"width":10,"height":5}}]}"#,
        ] {
            let err = deserialize(json.as_bytes()).unwrap_err();
            assert!(matches!(err, LabsheetError::MalformedTemplate(_)), "{}", json);
        }
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let json = r#"{"id":"1","name":"x","elements":[
            {"id":"a","type":"text","position":{"x":95,"y":0,"width":10,"height":5}}
        ]}"#;
        let err = deserialize(json.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("elements[0]"));
    }

    #[test]
    fn test_duplicate() {
        let doc = TemplateDocument::default_report();
        let copy = duplicate(&doc).unwrap();
        assert_ne!(copy.id, doc.id);
        assert_eq!(copy.name, "Default Lab Report (Copy)");
        assert_eq!(copy.elements, doc.elements);
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(default_file_name("Standard Blood  Test\tReport"), "standard_blood_test_report");
    }

    #[test]
    fn test_formats() {
        assert_eq!(ExportFormat::Pdf.mime_type(), "application/pdf");
        assert_eq!(ExportFormat::Json.mime_type(), "application/json");
        assert_eq!(ExportFormat::Image.mime_type(), "image/png");
        assert_eq!(ExportFormat::Html.mime_type(), "text/html");
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Image);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_pdf_export() {
        let doc = TemplateDocument::default_report();
        let artifact = export(&doc, ExportFormat::Pdf, &ExportOptions::default()).unwrap();
        assert_eq!(artifact.file_name, "default_lab_report.pdf");
        assert_eq!(artifact.bytes, b"PDF Export of Default Lab Report");
    }

    #[test]
    fn test_json_export_metadata_toggle() {
        let mut doc = TemplateDocument::default_report();
        doc.metadata = Some(TemplateMetadata {
            original_file: "scan.png".into(),
            import_date: "2024-01-01T00:00:00+00:00".into(),
            detected_elements: 5,
            confidence: 0.9,
            analysis_method: "fixed".into(),
            template_type: "lab".into(),
            page_size: PageSize {
                width: 10,
                height: 10,
            },
        });
        let with = export(&doc, ExportFormat::Json, &ExportOptions::default()).unwrap();
        assert!(String::from_utf8(with.bytes).unwrap().contains("\"metadata\""));

        let options = ExportOptions {
            file_name: Some("cbc".into()),
            include_metadata: false,
        };
        let without = export(&doc, ExportFormat::Json, &options).unwrap();
        assert_eq!(without.file_name, "cbc.json");
        let parsed = deserialize(&without.bytes).unwrap();
        assert_eq!(parsed.metadata, None);
    }

    #[test]
    fn test_html_export_is_lossy_and_escaped() {
        let mut doc = TemplateDocument::default_report();
        doc.description = "<b>bold</b>".into();
        let html = export_html(&doc);
        assert!(html.contains("<h1>Default Lab Report</h1>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("PATHOLOGY"));
    }

    #[test]
    fn test_image_export_size() {
        let doc = TemplateDocument::default_report();
        let png = export_image(&doc).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (800, 1000));
    }

    #[test]
    fn test_share_link() {
        assert_eq!(
            share_link("https://lab.example/", "42"),
            "https://lab.example/templates/shared/42"
        );
        let png = share_qr_png(&share_link("http://localhost:8080", "42")).unwrap();
        assert!(image::load_from_memory(&png).is_ok());
    }
}
