//! # Layout analysis of uploaded report scans
//!
//! There is no document understanding here. [`FixedLayoutAnalyzer`] returns
//! the same nine regions of a typical letterhead lab report for every image,
//! only reading the image dimensions. It exists so the import flow
//! (upload → regions → template) can run end to end, and it sits behind the
//! [`LayoutAnalyzer`] trait so a real analyzer can replace it.
//!
//! ## Fixed regions (percent of page)
//!
//! ```text
//! ┌──────────────── header 0,0 100×15 ─────────┬─ contact 60,2 38×12 ─┐
//! ├─ patient 2,18 45×15 ─────┬─ barcode 50,18 47×15 ─────────────────┤
//! ├─ table 2,35 96×8 ─────────────────────────────────────────────────┤
//! ├─ interpretation text 2,45 96×35 ──────────────────────────────────┤
//! ├─ technician signature 2,82 45×12 ─┬─ doctor signature 52,82 45×12 ┤
//! └──────────────── footer 0,95 100×5 ────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Cursor;

use crate::error::LabsheetError;
use crate::geometry::Rect;
use crate::template::{
    Content, FontSize, FontWeight, FooterContent, HeaderContent, PageSize, PatientInfoContent, ReportElement,
    SignatureContent, Style, TemplateDocument, TemplateMetadata, TestResultsContent, TextAlign, TextContent,
    new_id,
};
use crate::upload::{Upload, UploadKind};

pub const ANALYSIS_METHOD: &str = "Advanced Medical Report Analysis";
pub const TEMPLATE_TYPE: &str = "Medical Laboratory Report";

/// What a detected region looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionKind {
    Header,
    ContactInfo,
    PatientInfo,
    Barcode,
    Table,
    Text,
    Signature,
    Footer,
}

impl RegionKind {
    /// Hints shown next to a detected region.
    pub fn suggestions(&self) -> &'static [&'static str] {
        match self {
            RegionKind::Header => &["Lab name and logo", "Company branding", "Report title"],
            RegionKind::ContactInfo => &["Phone number", "Email address", "Website URL"],
            RegionKind::PatientInfo => &["Patient name", "Age/Sex", "Reference doctor", "Registration number"],
            RegionKind::Barcode => &["Sample barcode", "QR code", "Registration dates", "Report dates"],
            RegionKind::Table => &["Test parameters", "Results values", "Reference ranges", "Units"],
            RegionKind::Signature => &["Doctor signature", "Lab technician", "Pathologist approval"],
            RegionKind::Footer => &["Legal disclaimer", "Work timings", "Contact for queries"],
            RegionKind::Text => &["Medical content", "Report information"],
        }
    }
}

/// One region found on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedRegion {
    pub kind: RegionKind,
    pub label: String,
    pub rect: Rect,
    pub confidence: f64,
    pub font_size: Option<u32>,
    pub font_weight: Option<FontWeight>,
    pub text_align: Option<TextAlign>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub suggestions: Vec<String>,
}

impl DetectedRegion {
    fn new(kind: RegionKind, label: &str, rect: Rect, confidence: f64) -> Self {
        Self {
            kind,
            label: label.to_string(),
            rect,
            confidence,
            font_size: None,
            font_weight: None,
            text_align: None,
            background_color: None,
            text_color: None,
            suggestions: kind.suggestions().iter().map(|s| s.to_string()).collect(),
        }
    }

    fn font(mut self, px: u32, align: TextAlign) -> Self {
        self.font_size = Some(px);
        self.text_align = Some(align);
        self
    }

    fn colors(mut self, background: Option<&str>, text: &str) -> Self {
        self.background_color = background.map(str::to_string);
        self.text_color = Some(text.to_string());
        self
    }
}

/// Result of analyzing one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub regions: Vec<DetectedRegion>,
    pub page_size: PageSize,
    /// Mean region confidence (0 when nothing was found).
    pub confidence: f64,
}

/// Finds layout regions on an uploaded page.
pub trait LayoutAnalyzer: Send + Sync {
    fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, LabsheetError>;
}

/// Returns a fixed letterhead layout for any image.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLayoutAnalyzer;

impl FixedLayoutAnalyzer {
    pub fn regions() -> Vec<DetectedRegion> {
        let mut header = DetectedRegion::new(
            RegionKind::Header,
            "Labsmart Software Sample Letterhead",
            Rect::new(0.0, 0.0, 100.0, 15.0),
            0.95,
        )
        .font(24, TextAlign::Left)
        .colors(Some("#1e40af"), "#ffffff");
        header.font_weight = Some(FontWeight::Bold);

        vec![
            header,
            DetectedRegion::new(
                RegionKind::ContactInfo,
                "Contact Information",
                Rect::new(60.0, 2.0, 38.0, 12.0),
                0.9,
            )
            .font(12, TextAlign::Right)
            .colors(None, "#ffffff"),
            DetectedRegion::new(
                RegionKind::PatientInfo,
                "Patient Information",
                Rect::new(2.0, 18.0, 45.0, 15.0),
                0.92,
            )
            .font(14, TextAlign::Left),
            DetectedRegion::new(
                RegionKind::Barcode,
                "Registration Details & QR Code",
                Rect::new(50.0, 18.0, 47.0, 15.0),
                0.88,
            )
            .font(12, TextAlign::Left),
            DetectedRegion::new(
                RegionKind::Table,
                "BIOCHEMISTRY Test Results Table",
                Rect::new(2.0, 35.0, 96.0, 8.0),
                0.94,
            )
            .font(14, TextAlign::Center),
            DetectedRegion::new(
                RegionKind::Text,
                "Physiologic Basis, Interpretation, and Comments",
                Rect::new(2.0, 45.0, 96.0, 35.0),
                0.89,
            )
            .font(12, TextAlign::Left),
            DetectedRegion::new(
                RegionKind::Signature,
                "Lab Technician Signature",
                Rect::new(2.0, 82.0, 45.0, 12.0),
                0.91,
            )
            .font(12, TextAlign::Left),
            DetectedRegion::new(
                RegionKind::Signature,
                "Doctor Signature",
                Rect::new(52.0, 82.0, 45.0, 12.0),
                0.91,
            )
            .font(12, TextAlign::Right),
            DetectedRegion::new(
                RegionKind::Footer,
                "Legal Disclaimer and Work Timings",
                Rect::new(0.0, 95.0, 100.0, 5.0),
                0.87,
            )
            .font(10, TextAlign::Center)
            .colors(Some("#1e40af"), "#ffffff"),
        ]
    }
}

impl LayoutAnalyzer for FixedLayoutAnalyzer {
    fn analyze(&self, upload: &Upload) -> Result<AnalysisResult, LabsheetError> {
        if upload.kind == UploadKind::Pdf {
            return Err(LabsheetError::Analysis("PDF analysis is not available".into()));
        }
        let (width, height) = image::ImageReader::new(Cursor::new(&upload.bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| LabsheetError::Analysis(format!("Failed to load image: {}", e)))?;

        let regions = Self::regions();
        let confidence = mean_confidence(&regions);
        Ok(AnalysisResult {
            regions,
            page_size: PageSize { width, height },
            confidence,
        })
    }
}

fn mean_confidence(regions: &[DetectedRegion]) -> f64 {
    if regions.is_empty() {
        return 0.0;
    }
    regions.iter().map(|r| r.confidence).sum::<f64>() / regions.len() as f64
}

fn region_content(region: &DetectedRegion) -> Content {
    let text = |s: &str| Content::Text(TextContent { text: s.to_string() });
    match region.kind {
        RegionKind::Header => Content::Header(HeaderContent {
            title: "LABSMART SOFTWARE".into(),
            subtitle: "Sample Letterhead".into(),
        }),
        RegionKind::ContactInfo => text("+91 12345 67890\nyourlabname@gmail.com\nhttps://www.yourlabname.in/"),
        RegionKind::PatientInfo => Content::PatientInfo(PatientInfoContent {
            fields: ["Patient Name", "Age / Sex", "Referred by", "Reg. no."]
                .map(String::from)
                .to_vec(),
        }),
        RegionKind::Barcode => {
            text("Registered on: [Date]\nCollected on: [Date]\nReceived on: [Date]\nReported on: [Date]")
        }
        RegionKind::Table => Content::TestResults(TestResultsContent {
            title: "BIOCHEMISTRY".into(),
            columns: ["TEST", "VALUE", "UNIT", "REFERENCE"].map(String::from).to_vec(),
        }),
        RegionKind::Signature => {
            let doctor = region.label.contains("Doctor");
            Content::Signature(SignatureContent {
                title: "Verified By:".into(),
                name: if doctor { "Dr. A. K. Asthana" } else { "Mr. Sachin Sharma" }.into(),
                designation: if doctor { "MBBS, MD Pathologist" } else { "DMLT, Lab Incharge" }.into(),
                license: String::new(),
            })
        }
        RegionKind::Footer => Content::Footer(FooterContent {
            text: "NOT VALID FOR MEDICO LEGAL PURPOSE\nWork timings: Monday to Sunday, 8 am to 8 pm\nPlease correlate clinically..."
                .into(),
        }),
        RegionKind::Text => text(&region.label),
    }
}

fn region_style(region: &DetectedRegion) -> Style {
    Style {
        font_size: Some(region.font_size.map(FontSize::nearest).unwrap_or(FontSize::Px14)),
        font_weight: Some(region.font_weight.unwrap_or_default()),
        text_align: Some(region.text_align.unwrap_or_default()),
        color: Some(region.text_color.clone().unwrap_or_else(|| "#000000".into())),
        background_color: Some(
            region
                .background_color
                .clone()
                .unwrap_or_else(|| "transparent".into()),
        ),
        padding: Some("10px".into()),
        margin: None,
        border: (region.kind == RegionKind::Table).then(|| "1px solid #e5e7eb".into()),
    }
}

fn round_rect(rect: &Rect) -> Rect {
    Rect::new(rect.x.round(), rect.y.round(), rect.width.round(), rect.height.round())
}

/// Build a template from analysis results.
///
/// Contact info and barcode regions become text elements; the table region
/// becomes a results table. Elements are numbered from 1 in region order.
pub fn generate_template(file_name: &str, result: &AnalysisResult, imported_at: DateTime<Utc>) -> TemplateDocument {
    let elements = result
        .regions
        .iter()
        .enumerate()
        .map(|(i, region)| ReportElement {
            id: (i + 1).to_string(),
            content: region_content(region),
            style: region_style(region),
            position: round_rect(&region.rect),
        })
        .collect();

    TemplateDocument {
        id: new_id(),
        name: format!("Medical Report Template - {}", file_name),
        description: "Professional medical laboratory report template with proper structure".into(),
        elements,
        metadata: Some(TemplateMetadata {
            original_file: file_name.to_string(),
            import_date: imported_at.to_rfc3339(),
            detected_elements: result.regions.len(),
            confidence: result.confidence,
            analysis_method: ANALYSIS_METHOD.into(),
            template_type: TEMPLATE_TYPE.into(),
            page_size: result.page_size,
        }),
    }
}

/// Analyze an upload and turn it into a template.
pub fn import(
    analyzer: &dyn LayoutAnalyzer,
    upload: &Upload,
) -> Result<(TemplateDocument, AnalysisResult), LabsheetError> {
    let result = analyzer.analyze(upload)?;
    let doc = generate_template(&upload.file_name, &result, Utc::now());
    doc.validate()?;
    tracing::info!(
        file = %upload.file_name,
        regions = result.regions.len(),
        confidence = result.confidence,
        "template imported"
    );
    Ok((doc, result))
}
