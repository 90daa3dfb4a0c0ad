//! SVG renderer: converts `RenderCommand` lists into standalone SVG strings.

use std::fmt::Write as _;

use tracelane_protocol::{Color, LineStyle, Paint, RenderCommand, TextAlign};

/// Render a list of commands as an SVG document string.
///
/// `width` and `height` define the SVG viewBox dimensions.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64) -> String {
    let mut svg = String::with_capacity(commands.len() * 120);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:monospace">"#,
    );

    let mut open_groups = 0usize;
    for cmd in commands {
        match cmd {
            RenderCommand::FillRect {
                rect,
                paint,
                corner_radius,
            } => {
                let _ = write!(
                    svg,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" {}"#,
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h,
                    fill_attrs(*paint),
                );
                if *corner_radius > 0.0 {
                    let _ = write!(svg, r#" rx="{corner_radius}""#);
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawLine {
                from,
                to,
                paint,
                width: line_width,
                style,
            } => {
                let color = paint.resolve();
                let _ = write!(
                    svg,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-opacity="{}" stroke-width="{line_width}""#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    hex(color),
                    color.a,
                );
                if *style == LineStyle::Dotted {
                    svg.push_str(r#" stroke-dasharray="2,2""#);
                }
                svg.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                paint,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    svg,
                    r#"<text x="{}" y="{}" font-size="{font_size}" text-anchor="{anchor}" {}>{}</text>"#,
                    position.x,
                    position.y,
                    fill_attrs(*paint),
                    escape_xml(text),
                );
            }
            RenderCommand::BeginGroup { id, label } => {
                let _ = write!(svg, r#"<g id="{}">"#, escape_xml(id));
                if let Some(label) = label {
                    let _ = write!(svg, "<title>{}</title>", escape_xml(label));
                }
                open_groups += 1;
            }
            RenderCommand::EndGroup => {
                if open_groups > 0 {
                    svg.push_str("</g>");
                    open_groups -= 1;
                }
            }
        }
    }
    for _ in 0..open_groups {
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn fill_attrs(paint: Paint) -> String {
    let color = paint.resolve();
    format!(r#"fill="{}" fill-opacity="{}""#, hex(color), color.a)
}

fn hex(color: Color) -> String {
    let [r, g, b, _] = color.to_rgba8();
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
