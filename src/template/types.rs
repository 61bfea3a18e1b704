//! Element types for the template document model.
//!
//! Every element kind has its own content struct. The set of kinds is closed:
//! [`define_elements!`] generates [`ElementKind`] and the [`Content`] union from
//! one list, so adding a kind means adding a struct that implements
//! [`ElementMeta`] and one line in that list. The compiler then points at
//! every exhaustive match that needs the new variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LabsheetError;
use crate::geometry::MinSize;

/// Metadata and field access that every content struct provides.
pub trait ElementMeta: Sized {
    /// Human-readable display label (e.g. "Patient Info").
    fn label() -> &'static str;

    /// Starter content for a freshly added element.
    ///
    /// Distinct from `Default`, which is the empty shape used when a
    /// serialized element omits fields.
    fn editor_default() -> Self;

    /// Read access to a named field.
    fn field(&self, field: Field) -> Option<FieldRef<'_>>;

    /// Write access to a named field.
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>>;
}

// ============================================================================
// FIELDS
// ============================================================================

/// Name of one content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Subtitle,
    Text,
    Src,
    Alt,
    Name,
    Designation,
    License,
    Fields,
    Columns,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Title,
        Field::Subtitle,
        Field::Text,
        Field::Src,
        Field::Alt,
        Field::Name,
        Field::Designation,
        Field::License,
        Field::Fields,
        Field::Columns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::Text => "text",
            Field::Src => "src",
            Field::Alt => "alt",
            Field::Name => "name",
            Field::Designation => "designation",
            Field::License => "license",
            Field::Fields => "fields",
            Field::Columns => "columns",
        }
    }

    /// List-valued fields are edited through the properties panel only.
    pub fn is_list(&self) -> bool {
        matches!(self, Field::Fields | Field::Columns)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// Owned field value, as carried by content patches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::List(v)
    }
}

/// Borrowed view of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef<'a> {
    Text(&'a str),
    List(&'a [String]),
}

impl FieldRef<'_> {
    pub fn to_owned_value(self) -> FieldValue {
        match self {
            FieldRef::Text(s) => FieldValue::Text(s.to_string()),
            FieldRef::List(l) => FieldValue::List(l.to_vec()),
        }
    }
}

/// Mutable slot for a field.
pub enum FieldSlot<'a> {
    Text(&'a mut String),
    List(&'a mut Vec<String>),
}

// ============================================================================
// CONTENT STRUCTS
// ============================================================================

/// Title block with an optional smaller subtitle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderContent {
    pub title: String,
    pub subtitle: String,
}

impl ElementMeta for HeaderContent {
    fn label() -> &'static str { "Header" }
    fn editor_default() -> Self {
        Self {
            title: "Report Title".into(),
            subtitle: "Subtitle".into(),
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Title => Some(FieldRef::Text(&self.title)),
            Field::Subtitle => Some(FieldRef::Text(&self.subtitle)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Title => Some(FieldSlot::Text(&mut self.title)),
            Field::Subtitle => Some(FieldSlot::Text(&mut self.subtitle)),
            _ => None,
        }
    }
}

/// Image reference. An empty `src` renders a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoContent {
    pub src: String,
    pub alt: String,
}

impl ElementMeta for LogoContent {
    fn label() -> &'static str { "Logo" }
    fn editor_default() -> Self {
        Self {
            src: "/placeholder.svg?height=60&width=150".into(),
            alt: "Logo".into(),
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Src => Some(FieldRef::Text(&self.src)),
            Field::Alt => Some(FieldRef::Text(&self.alt)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Src => Some(FieldSlot::Text(&mut self.src)),
            Field::Alt => Some(FieldSlot::Text(&mut self.alt)),
            _ => None,
        }
    }
}

/// Ordered list of patient field labels.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientInfoContent {
    pub fields: Vec<String>,
}

impl ElementMeta for PatientInfoContent {
    fn label() -> &'static str { "Patient Info" }
    fn editor_default() -> Self {
        Self {
            fields: vec!["Patient Name".into(), "Age".into(), "Gender".into()],
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Fields => Some(FieldRef::List(&self.fields)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Fields => Some(FieldSlot::List(&mut self.fields)),
            _ => None,
        }
    }
}

/// Results table: a title and its column headers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestResultsContent {
    pub title: String,
    pub columns: Vec<String>,
}

impl ElementMeta for TestResultsContent {
    fn label() -> &'static str { "Test Results" }
    fn editor_default() -> Self {
        Self {
            title: "Test Results".into(),
            columns: vec!["Parameter".into(), "Result".into(), "Range".into()],
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Title => Some(FieldRef::Text(&self.title)),
            Field::Columns => Some(FieldRef::List(&self.columns)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Title => Some(FieldSlot::Text(&mut self.title)),
            Field::Columns => Some(FieldSlot::List(&mut self.columns)),
            _ => None,
        }
    }
}

/// Free text block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextContent {
    pub text: String,
}

impl ElementMeta for TextContent {
    fn label() -> &'static str { "Text Block" }
    fn editor_default() -> Self {
        Self {
            text: "Enter your text here".into(),
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Text => Some(FieldRef::Text(&self.text)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Text => Some(FieldSlot::Text(&mut self.text)),
            _ => None,
        }
    }
}

/// Sign-off block. An empty `license` line is omitted when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureContent {
    pub title: String,
    pub name: String,
    pub designation: String,
    pub license: String,
}

impl ElementMeta for SignatureContent {
    fn label() -> &'static str { "Signature" }
    fn editor_default() -> Self {
        Self {
            title: "Signature".into(),
            name: "Dr. Name".into(),
            designation: "Title".into(),
            license: String::new(),
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Title => Some(FieldRef::Text(&self.title)),
            Field::Name => Some(FieldRef::Text(&self.name)),
            Field::Designation => Some(FieldRef::Text(&self.designation)),
            Field::License => Some(FieldRef::Text(&self.license)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Title => Some(FieldSlot::Text(&mut self.title)),
            Field::Name => Some(FieldSlot::Text(&mut self.name)),
            Field::Designation => Some(FieldSlot::Text(&mut self.designation)),
            Field::License => Some(FieldSlot::Text(&mut self.license)),
            _ => None,
        }
    }
}

/// Page footer text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterContent {
    pub text: String,
}

impl ElementMeta for FooterContent {
    fn label() -> &'static str { "Footer" }
    fn editor_default() -> Self {
        Self {
            text: "Footer information".into(),
        }
    }
    fn field(&self, field: Field) -> Option<FieldRef<'_>> {
        match field {
            Field::Text => Some(FieldRef::Text(&self.text)),
            _ => None,
        }
    }
    fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
        match field {
            Field::Text => Some(FieldSlot::Text(&mut self.text)),
            _ => None,
        }
    }
}

// ============================================================================
// KIND / CONTENT UNION
// ============================================================================

macro_rules! define_elements {
    ($($variant:ident($inner:ty) => $wire:literal),+ $(,)?) => {
        /// Closed set of report element kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ElementKind {
            $(#[serde(rename = $wire)] $variant,)+
        }

        impl ElementKind {
            /// Every kind, in palette order.
            pub const ALL: &'static [ElementKind] = &[$(ElementKind::$variant,)+];

            /// Wire name (`"patient-info"`, ...).
            pub fn as_str(&self) -> &'static str {
                match self { $(ElementKind::$variant => $wire,)+ }
            }

            /// Human-readable display label (from [`ElementMeta::label`]).
            pub fn label(&self) -> &'static str {
                match self { $(ElementKind::$variant => <$inner>::label(),)+ }
            }

            /// Starter content (from [`ElementMeta::editor_default`]).
            pub fn default_content(&self) -> Content {
                match self { $(ElementKind::$variant => Content::$variant(<$inner>::editor_default()),)+ }
            }
        }

        impl FromStr for ElementKind {
            type Err = LabsheetError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(ElementKind::$variant),)+
                    other => Err(LabsheetError::InvalidElementKind(other.to_string())),
                }
            }
        }

        /// Kind-specific element content.
        ///
        /// Serializes as the bare inner struct; the kind travels separately
        /// in the element's `type` field.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(untagged)]
        pub enum Content {
            $($variant($inner),)+
        }

        impl Content {
            pub fn kind(&self) -> ElementKind {
                match self { $(Content::$variant(_) => ElementKind::$variant,)+ }
            }

            /// Deserialize the content object for a known kind.
            pub fn from_value(kind: ElementKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
                match kind {
                    $(ElementKind::$variant => serde_json::from_value(value).map(Content::$variant),)+
                }
            }

            pub fn field(&self, field: Field) -> Option<FieldRef<'_>> {
                match self { $(Content::$variant(c) => c.field(field),)+ }
            }

            fn field_mut(&mut self, field: Field) -> Option<FieldSlot<'_>> {
                match self { $(Content::$variant(c) => c.field_mut(field),)+ }
            }
        }
    };
}

define_elements! {
    Header(HeaderContent) => "header",
    Logo(LogoContent) => "logo",
    PatientInfo(PatientInfoContent) => "patient-info",
    TestResults(TestResultsContent) => "test-results",
    Text(TextContent) => "text",
    Signature(SignatureContent) => "signature",
    Footer(FooterContent) => "footer",
}

impl ElementKind {
    /// Smallest size a resize may produce.
    pub fn min_size(&self) -> MinSize {
        MinSize::default()
    }

    /// Style attached to a freshly added element.
    pub fn default_style(&self) -> Style {
        match self {
            ElementKind::Header => Style {
                font_size: Some(FontSize::Px20),
                font_weight: Some(FontWeight::Bold),
                text_align: Some(TextAlign::Center),
                padding: Some("15px".into()),
                ..Default::default()
            },
            _ => Style {
                font_size: Some(FontSize::Px14),
                padding: Some("10px".into()),
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Content {
    /// Read a field as an owned value.
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        self.field(field).map(FieldRef::to_owned_value)
    }

    /// Read a text field; `None` for list fields and fields the kind lacks.
    pub fn text(&self, field: Field) -> Option<&str> {
        match self.field(field) {
            Some(FieldRef::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Replace one field.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<(), LabsheetError> {
        let kind = self.kind();
        match (self.field_mut(field), value) {
            (Some(FieldSlot::Text(slot)), FieldValue::Text(v)) => {
                *slot = v;
                Ok(())
            }
            (Some(FieldSlot::List(slot)), FieldValue::List(v)) => {
                *slot = v;
                Ok(())
            }
            (Some(FieldSlot::Text(_)), FieldValue::List(_)) => Err(LabsheetError::FieldType {
                field: field.to_string(),
                expected: "text",
            }),
            (Some(FieldSlot::List(_)), FieldValue::Text(_)) => Err(LabsheetError::FieldType {
                field: field.to_string(),
                expected: "a list of strings",
            }),
            (None, _) => Err(LabsheetError::UnknownField {
                kind: kind.to_string(),
                field: field.to_string(),
            }),
        }
    }

    /// Fields this content carries, in display order.
    pub fn fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_some())
            .collect()
    }
}

// ============================================================================
// STYLE
// ============================================================================

/// Font size from the fixed set offered by the style editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontSize {
    #[serde(rename = "10px")]
    Px10,
    #[serde(rename = "12px")]
    Px12,
    #[serde(rename = "14px")]
    Px14,
    #[serde(rename = "16px")]
    Px16,
    #[serde(rename = "18px")]
    Px18,
    #[serde(rename = "20px")]
    Px20,
    #[serde(rename = "24px")]
    Px24,
    #[serde(rename = "28px")]
    Px28,
}

impl FontSize {
    pub const ALL: [FontSize; 8] = [
        FontSize::Px10,
        FontSize::Px12,
        FontSize::Px14,
        FontSize::Px16,
        FontSize::Px18,
        FontSize::Px20,
        FontSize::Px24,
        FontSize::Px28,
    ];

    pub fn px(&self) -> u32 {
        match self {
            FontSize::Px10 => 10,
            FontSize::Px12 => 12,
            FontSize::Px14 => 14,
            FontSize::Px16 => 16,
            FontSize::Px18 => 18,
            FontSize::Px20 => 20,
            FontSize::Px24 => 24,
            FontSize::Px28 => 28,
        }
    }

    /// Nearest size in the set (ties go to the smaller size).
    pub fn nearest(px: u32) -> FontSize {
        let mut best = FontSize::Px14;
        let mut best_delta = u32::MAX;
        for size in FontSize::ALL {
            let delta = size.px().abs_diff(px);
            if delta < best_delta {
                best = size;
                best_delta = delta;
            }
        }
        best
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px", self.px())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Visual attributes of an element. Every attribute is optional; absent ones
/// fall back to the kind's defaults (see [`Style::resolve`]).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
}

/// Style with every attribute filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_size: FontSize,
    pub font_weight: FontWeight,
    pub text_align: TextAlign,
    pub color: String,
    pub background_color: Option<String>,
    pub padding: String,
    pub margin: Option<String>,
    pub border: Option<String>,
}

impl Style {
    /// Shallow merge: attributes set in `patch` win.
    pub fn merged(&self, patch: &Style) -> Style {
        Style {
            font_size: patch.font_size.or(self.font_size),
            font_weight: patch.font_weight.or(self.font_weight),
            text_align: patch.text_align.or(self.text_align),
            color: patch.color.clone().or_else(|| self.color.clone()),
            background_color: patch
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            padding: patch.padding.clone().or_else(|| self.padding.clone()),
            margin: patch.margin.clone().or_else(|| self.margin.clone()),
            border: patch.border.clone().or_else(|| self.border.clone()),
        }
    }

    /// Fill absent attributes from the kind's fallbacks.
    pub fn resolve(&self, kind: ElementKind) -> ResolvedStyle {
        let header = kind == ElementKind::Header;
        ResolvedStyle {
            font_size: self
                .font_size
                .unwrap_or(if header { FontSize::Px20 } else { FontSize::Px14 }),
            font_weight: self
                .font_weight
                .unwrap_or(if header { FontWeight::Bold } else { FontWeight::Normal }),
            text_align: self
                .text_align
                .unwrap_or(if header { TextAlign::Center } else { TextAlign::Left }),
            color: self.color.clone().unwrap_or_else(|| "#000000".into()),
            background_color: self.background_color.clone(),
            padding: self
                .padding
                .clone()
                .unwrap_or_else(|| if header { "15px" } else { "10px" }.into()),
            margin: self.margin.clone(),
            border: self.border.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names() {
        let names: Vec<&str> = ElementKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(
            names,
            ["header", "logo", "patient-info", "test-results", "text", "signature", "footer"]
        );
        for kind in ElementKind::ALL {
            assert_eq!(kind.as_str().parse::<ElementKind>().unwrap(), *kind);
            assert_eq!(kind.default_content().kind(), *kind);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "bogus".parse::<ElementKind>().unwrap_err();
        assert!(matches!(err, LabsheetError::InvalidElementKind(ref k) if k == "bogus"));
        assert!("Header".parse::<ElementKind>().is_err());
    }

    #[test]
    fn test_content_set_checks_field_and_shape() {
        let mut content = ElementKind::Header.default_content();
        content.set(Field::Title, "CBC".into()).unwrap();
        assert_eq!(content.text(Field::Title), Some("CBC"));

        let err = content.set(Field::Columns, vec!["A".to_string()].into()).unwrap_err();
        assert!(matches!(err, LabsheetError::UnknownField { .. }));

        let mut table = ElementKind::TestResults.default_content();
        let err = table.set(Field::Columns, "A".into()).unwrap_err();
        assert!(matches!(err, LabsheetError::FieldType { .. }));
        table
            .set(Field::Columns, vec!["Test".to_string(), "Value".to_string()].into())
            .unwrap();
        assert_eq!(
            table.get(Field::Columns),
            Some(FieldValue::List(vec!["Test".into(), "Value".into()]))
        );
    }

    #[test]
    fn test_content_fields_listing() {
        let fields = ElementKind::Signature.default_content().fields();
        assert_eq!(
            fields,
            [Field::Title, Field::Name, Field::Designation, Field::License]
        );
    }

    #[test]
    fn test_style_merge_only_overrides_set_attributes() {
        let base = ElementKind::Header.default_style();
        let patch = Style {
            text_align: Some(TextAlign::Right),
            color: Some("#1f2937".into()),
            ..Default::default()
        };
        let merged = base.merged(&patch);
        assert_eq!(merged.font_size, Some(FontSize::Px20));
        assert_eq!(merged.font_weight, Some(FontWeight::Bold));
        assert_eq!(merged.text_align, Some(TextAlign::Right));
        assert_eq!(merged.color.as_deref(), Some("#1f2937"));
    }

    #[test]
    fn test_style_resolution_falls_back_per_kind() {
        let empty = Style::default();
        let header = empty.resolve(ElementKind::Header);
        assert_eq!(header.font_size, FontSize::Px20);
        assert_eq!(header.text_align, TextAlign::Center);
        let text = empty.resolve(ElementKind::Text);
        assert_eq!(text.font_size, FontSize::Px14);
        assert_eq!(text.font_weight, FontWeight::Normal);
        assert_eq!(text.padding, "10px");
        assert_eq!(text.color, "#000000");
    }

    #[test]
    fn test_style_wire_format() {
        let style: Style = serde_json::from_str(
            r##"{"fontSize":"24px","fontWeight":"bold","textAlign":"center","backgroundColor":"#1e40af"}"##,
        )
        .unwrap();
        assert_eq!(style.font_size, Some(FontSize::Px24));
        assert_eq!(style.background_color.as_deref(), Some("#1e40af"));
        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains("\"fontSize\":\"24px\""));
        assert!(!json.contains("padding"));

        assert!(serde_json::from_str::<Style>(r#"{"fontSize":"13px"}"#).is_err());
    }

    #[test]
    fn test_font_size_nearest() {
        assert_eq!(FontSize::nearest(24), FontSize::Px24);
        assert_eq!(FontSize::nearest(11), FontSize::Px10);
        assert_eq!(FontSize::nearest(40), FontSize::Px28);
    }
}
