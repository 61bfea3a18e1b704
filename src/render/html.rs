//! HTML back-end: one absolutely positioned `<div>` per element on an
//! 8.5:11 page.

use std::fmt::Write;

use super::{ElementView, Node, RenderMode, render_document};
use crate::template::{FontWeight, ResolvedStyle, TemplateDocument};

const PAGE_CSS: &str = "body{font-family:Arial,sans-serif;margin:0;padding:24px;background:#f3f4f6}\
.page{position:relative;width:8.5in;aspect-ratio:8.5/11;margin:0 auto;background:#fff;box-shadow:0 1px 3px rgba(0,0,0,.2)}\
.element{position:absolute;box-sizing:border-box;overflow:hidden}\
.element p{margin:0}\
.element table{width:100%;border-collapse:collapse}\
.element th,.element td{border:1px solid #d1d5db;padding:4px;text-align:left}\
.rule{border-bottom:1px solid #000;margin:4px 0}\
.unrecognized{border:1px dashed #dc2626;color:#dc2626}";

/// Escape text for HTML element and attribute content.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Full HTML page for a document.
pub fn render_page(doc: &TemplateDocument, mode: RenderMode) -> String {
    render_views(&doc.name, &render_document(doc, mode))
}

/// Full HTML page for already rendered views.
pub fn render_views(title: &str, views: &[ElementView]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape(title));
    let _ = writeln!(html, "<style>{}</style>", PAGE_CSS);
    html.push_str("</head>\n<body>\n<div class=\"page\">\n");
    for view in views {
        html.push_str(&render_element(view));
        html.push('\n');
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}

/// One positioned element.
pub fn render_element(view: &ElementView) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<div class=\"element element-{}\" data-id=\"{}\" style=\"left:{}%;top:{}%;width:{}%;height:{}%;{}\">",
        escape(&view.kind),
        escape(&view.id),
        view.rect.x,
        view.rect.y,
        view.rect.width,
        view.rect.height,
        style_css(&view.style),
    );
    for node in &view.body {
        render_node(&mut out, node);
    }
    out.push_str("</div>");
    out
}

fn style_css(style: &ResolvedStyle) -> String {
    let mut css = format!(
        "font-size:{};font-weight:{};text-align:{};color:{};padding:{};",
        style.font_size,
        match style.font_weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        },
        style.text_align.as_str(),
        escape(&style.color),
        escape(&style.padding),
    );
    if let Some(bg) = &style.background_color {
        let _ = write!(css, "background-color:{};", escape(bg));
    }
    if let Some(margin) = &style.margin {
        let _ = write!(css, "margin:{};", escape(margin));
    }
    if let Some(border) = &style.border {
        let _ = write!(css, "border:{};", escape(border));
    }
    css
}

fn render_node(out: &mut String, node: &Node) {
    match node {
        Node::Text {
            field,
            text,
            font_size,
            bold,
        } => {
            let field_attr = field
                .map(|f| format!(" data-field=\"{}\"", f))
                .unwrap_or_default();
            let weight = if *bold { "bold" } else { "normal" };
            let _ = write!(
                out,
                "<p{} style=\"font-size:{};font-weight:{};white-space:pre-wrap\">{}</p>",
                field_attr,
                font_size,
                weight,
                escape(text)
            );
        }
        Node::Image { src, alt } => {
            let _ = write!(
                out,
                "<img src=\"{}\" alt=\"{}\" style=\"max-width:100%;max-height:100%\">",
                escape(src),
                escape(alt)
            );
        }
        Node::LabelGrid { heading, entries } => {
            let _ = write!(out, "<h3>{}</h3><dl>", escape(heading));
            for entry in entries {
                let _ = write!(
                    out,
                    "<dt>{}</dt><dd>{}</dd>",
                    escape(&entry.label),
                    escape(entry.placeholder.as_deref().unwrap_or(""))
                );
            }
            out.push_str("</dl>");
        }
        Node::Table {
            title,
            columns,
            rows,
        } => {
            let _ = write!(out, "<h3>{}</h3><table><thead><tr>", escape(title));
            for col in columns {
                let _ = write!(out, "<th>{}</th>", escape(col));
            }
            out.push_str("</tr></thead><tbody>");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape(cell));
                }
                out.push_str("</tr>");
            }
            out.push_str("</tbody></table>");
        }
        Node::Rule { width, height } => {
            let _ = write!(
                out,
                "<div class=\"rule\" style=\"width:{}px;height:{}px\"></div>",
                width, height
            );
        }
        Node::Unrecognized { kind } => {
            let _ = write!(
                out,
                "<div class=\"unrecognized\">Unrecognized element: {}</div>",
                escape(kind)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{ElementKind, Field};

    #[test]
    fn test_escape() {
        assert_eq!(escape("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn test_page_positions_elements() {
        let doc = TemplateDocument::default_report();
        let html = render_page(&doc, RenderMode::Preview);
        assert!(html.contains("<title>Default Lab Report</title>"));
        assert!(html.contains("data-id=\"logo-1\" style=\"left:70%;top:2%;width:25%;height:10%;"));
        assert!(html.contains("<dd>[Patient Name]</dd>"));
        assert!(html.contains("<td>Hemoglobin</td>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = TemplateDocument::blank("x");
        let id = doc.add_element(ElementKind::Text);
        let mut patch = crate::template::ContentPatch::new();
        patch.insert(Field::Text, "<script>alert(1)</script>".into());
        doc.apply(&id, &crate::template::ElementUpdate::Content(patch))
            .unwrap();
        let html = render_page(&doc, RenderMode::Edit);
        assert!(!html.contains("<script>"));
        assert!(html.contains("data-field=\"text\""));
    }
}
