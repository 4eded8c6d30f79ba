//! Drawing surface that records SVG markup and rasterizes it with resvg.
//!
//! Every card is built as one SVG document. Fills, strokes, clips and text
//! are appended in paint order; [`Surface::finish`] parses the document with
//! usvg against the shared font database and renders it into a pixmap.

use std::fmt::Write as _;
use std::path::Path;

use fonts::{Font, FontRegistry};
use log::debug;
use tiny_skia::Pixmap;

use crate::color::{Color, GradientStop, Paint};
use crate::error::{CardError, Result};
use crate::geometry::{LayoutBox, Point};
use crate::raster;
use crate::text::{Align, Baseline, TextCanvas, TextStyle};

/// SVG path data built from absolute commands.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    d: String,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.push(format_args!("M{} {}", num(x), num(y)));
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.push(format_args!("L{} {}", num(x), num(y)));
        self
    }

    pub fn quad_to(mut self, cx: f64, cy: f64, x: f64, y: f64) -> Self {
        self.push(format_args!(
            "Q{} {} {} {}",
            num(cx),
            num(cy),
            num(x),
            num(y)
        ));
        self
    }

    pub fn close(mut self) -> Self {
        self.push(format_args!("Z"));
        self
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = PathData::new();
        for (i, p) in points.iter().enumerate() {
            path = if i == 0 {
                path.move_to(p.x, p.y)
            } else {
                path.line_to(p.x, p.y)
            };
        }
        if points.is_empty() { path } else { path.close() }
    }

    pub fn rect(b: LayoutBox) -> Self {
        PathData::polygon(&[
            Point::new(b.x, b.y),
            Point::new(b.right(), b.y),
            Point::new(b.right(), b.bottom()),
            Point::new(b.x, b.bottom()),
        ])
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.d
    }

    fn push(&mut self, cmd: std::fmt::Arguments<'_>) {
        if !self.d.is_empty() {
            self.d.push(' ');
        }
        let _ = self.d.write_fmt(cmd);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    fn as_svg(self) -> &'static str {
        match self {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub cap: LineCap,
}

impl Stroke {
    pub const fn new(color: Color, width: f64) -> Self {
        Stroke {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub const fn cap(self, cap: LineCap) -> Self {
        Stroke { cap, ..self }
    }
}

/// Gaussian drop shadow; `blur` follows the canvas `shadowBlur` convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

pub struct Surface<'a> {
    width: u32,
    height: u32,
    fonts: &'a FontRegistry,
    defs: String,
    body: String,
    next_id: usize,
}

impl<'a> Surface<'a> {
    pub fn new(width: u32, height: u32, fonts: &'a FontRegistry) -> Self {
        Surface {
            width,
            height,
            fonts,
            defs: String::new(),
            body: String::new(),
            next_id: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fonts(&self) -> &'a FontRegistry {
        self.fonts
    }

    pub fn fill_rect(&mut self, b: LayoutBox, paint: &Paint) {
        let fill = self.fill_attrs(paint);
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" {fill}/>"#,
            num(b.x),
            num(b.y),
            num(b.width.max(0.0)),
            num(b.height.max(0.0))
        );
    }

    pub fn stroke_rect(&mut self, b: LayoutBox, stroke: &Stroke) {
        let stroke = stroke_attrs(stroke);
        let _ = writeln!(
            self.body,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" {stroke}/>"#,
            num(b.x),
            num(b.y),
            num(b.width.max(0.0)),
            num(b.height.max(0.0))
        );
    }

    pub fn fill_path(&mut self, path: &PathData, paint: &Paint) {
        self.draw_path(path, Some(paint), None, None);
    }

    pub fn stroke_path(&mut self, path: &PathData, stroke: &Stroke) {
        self.draw_path(path, None, Some(stroke), None);
    }

    pub fn fill_and_stroke_path(&mut self, path: &PathData, paint: &Paint, stroke: &Stroke) {
        self.draw_path(path, Some(paint), Some(stroke), None);
    }

    /// Fill `path` over a blurred shadow of itself, then stroke it without one.
    pub fn fill_path_with_shadow(
        &mut self,
        path: &PathData,
        paint: &Paint,
        shadow: &Shadow,
        stroke: Option<&Stroke>,
    ) {
        let id = self.next_id("shadow");
        // Canvas shadowBlur is twice the Gaussian standard deviation.
        let _ = writeln!(
            self.defs,
            r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="{}" dy="{}" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
            num(shadow.offset_x),
            num(shadow.offset_y),
            num(shadow.blur / 2.0),
            shadow.color.to_hex(),
            num(shadow.color.alpha)
        );
        self.draw_path(path, Some(paint), None, Some(&id));
        if let Some(stroke) = stroke {
            self.stroke_path(path, stroke);
        }
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        let stroke = stroke_attrs(stroke);
        let _ = writeln!(
            self.body,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {stroke}/>"#,
            num(from.x),
            num(from.y),
            num(to.x),
            num(to.y)
        );
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, paint: &Paint) {
        let fill = self.fill_attrs(paint);
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" {fill}/>"#,
            num(center.x),
            num(center.y),
            num(radius.max(0.0))
        );
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f64, stroke: &Stroke) {
        let stroke = stroke_attrs(stroke);
        let _ = writeln!(
            self.body,
            r#"<circle cx="{}" cy="{}" r="{}" fill="none" {stroke}/>"#,
            num(center.x),
            num(center.y),
            num(radius.max(0.0))
        );
    }

    /// Run `draw` with everything it paints clipped to `clip`.
    pub fn with_clip(&mut self, clip: &PathData, draw: impl FnOnce(&mut Self)) {
        let id = self.next_id("clip");
        let _ = writeln!(
            self.defs,
            r#"<clipPath id="{id}"><path d="{}"/></clipPath>"#,
            clip.as_str()
        );
        let _ = writeln!(self.body, r#"<g clip-path="url(#{id})">"#);
        draw(self);
        self.body.push_str("</g>\n");
    }

    /// Run `draw` as one group composited at `opacity`.
    pub fn with_opacity(&mut self, opacity: f64, draw: impl FnOnce(&mut Self)) {
        let _ = writeln!(self.body, r#"<g opacity="{}">"#, num(opacity.clamp(0.0, 1.0)));
        draw(self);
        self.body.push_str("</g>\n");
    }

    /// The recorded document.
    pub fn svg(&self) -> String {
        let mut out = String::with_capacity(self.defs.len() + self.body.len() + 256);
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );
        if !self.defs.is_empty() {
            out.push_str("<defs>\n");
            out.push_str(&self.defs);
            out.push_str("</defs>\n");
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    pub fn finish(&self) -> Result<Pixmap> {
        let svg = self.svg();
        let mut opt = usvg::Options::default();
        opt.fontdb = self.fonts.database();
        let tree = usvg::Tree::from_str(&svg, &opt)?;
        let mut pixmap = Pixmap::new(self.width, self.height).ok_or(CardError::Canvas {
            width: self.width,
            height: self.height,
        })?;
        resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    pub fn write_png(&self, path: &Path) -> Result<()> {
        let pixmap = self.finish()?;
        raster::encode_png(&pixmap, path)?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn draw_path(
        &mut self,
        path: &PathData,
        paint: Option<&Paint>,
        stroke: Option<&Stroke>,
        filter: Option<&str>,
    ) {
        if path.is_empty() {
            return;
        }
        let fill = match paint {
            Some(paint) => self.fill_attrs(paint),
            None => r#"fill="none""#.to_string(),
        };
        let stroke = stroke.map(stroke_attrs).unwrap_or_default();
        let filter = filter
            .map(|id| format!(r#" filter="url(#{id})""#))
            .unwrap_or_default();
        let _ = writeln!(
            self.body,
            r#"<path d="{}" {fill} {stroke}{filter}/>"#,
            path.as_str()
        );
    }

    /// `fill` attributes for `paint`, registering gradients in `<defs>`.
    fn fill_attrs(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => color_attrs("fill", color),
            Paint::Linear(gradient) => {
                let id = self.next_id("lg");
                let _ = writeln!(
                    self.defs,
                    r#"<linearGradient id="{id}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{}</linearGradient>"#,
                    num(gradient.start.x),
                    num(gradient.start.y),
                    num(gradient.end.x),
                    num(gradient.end.y),
                    stops_markup(&gradient.stops)
                );
                format!(r#"fill="url(#{id})""#)
            }
            Paint::Radial(gradient) => {
                let id = self.next_id("rg");
                let _ = writeln!(
                    self.defs,
                    r#"<radialGradient id="{id}" gradientUnits="userSpaceOnUse" cx="{cx}" cy="{cy}" fx="{cx}" fy="{cy}" r="{}">{}</radialGradient>"#,
                    num(gradient.outer_radius),
                    stops_markup(&gradient.remapped_stops()),
                    cx = num(gradient.center.x),
                    cy = num(gradient.center.y),
                );
                format!(r#"fill="url(#{id})""#)
            }
        }
    }
}

impl TextCanvas for Surface<'_> {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        self.fonts.measure(text, font)
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        let metrics = self.fonts.vertical_metrics(&style.font);
        let baseline_y = match style.baseline {
            Baseline::Top => y + metrics.ascent,
            Baseline::Middle => y + (metrics.ascent + metrics.descent) / 2.0,
            Baseline::Bottom => y + metrics.descent,
            Baseline::Alphabetic => y,
        };
        let anchor = match style.align {
            Align::Left => "start",
            Align::Center => "middle",
            Align::Right => "end",
        };
        let font = &style.font;
        let _ = writeln!(
            self.body,
            r#"<text x="{}" y="{}" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" text-anchor="{anchor}" {} xml:space="preserve">{}</text>"#,
            num(x),
            num(baseline_y),
            escape_attr(&font.family_list()),
            num(font.size),
            font.weight,
            if font.italic { "italic" } else { "normal" },
            color_attrs("fill", &style.color),
            escape_text(text)
        );
    }
}

fn color_attrs(kind: &str, color: &Color) -> String {
    if color.is_opaque() {
        format!(r#"{kind}="{}""#, color.to_hex())
    } else {
        format!(
            r#"{kind}="{}" {kind}-opacity="{}""#,
            color.to_hex(),
            num(color.alpha.max(0.0))
        )
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    format!(
        r#"{} stroke-width="{}" stroke-linecap="{}""#,
        color_attrs("stroke", &stroke.color),
        num(stroke.width),
        stroke.cap.as_svg()
    )
}

fn stops_markup(stops: &[GradientStop]) -> String {
    let mut out = String::new();
    for stop in stops {
        let _ = write!(
            out,
            r#"<stop offset="{}" stop-color="{}" stop-opacity="{}"/>"#,
            num(stop.offset.clamp(0.0, 1.0)),
            stop.color.to_hex(),
            num(stop.color.alpha)
        );
    }
    out
}

/// Format a coordinate: integers without a fraction, otherwise up to 3 decimals.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v.round() + 0.0)
    } else {
        format!("{v:.3}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

/// Escape markup and replace characters XML 1.0 forbids with a space.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if c < '\u{20}' || c == '\u{fffe}' || c == '\u{ffff}' => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
