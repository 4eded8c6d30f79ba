//! Reusable card decorations built on [`Surface`].

use std::f64::consts::PI;

use fonts::Font;

use crate::color::{Color, Paint};
use crate::geometry::{CardLayout, LayoutBox, Point};
use crate::surface::{PathData, Stroke, Surface};
use crate::text::{Align, Baseline, TextCanvas, TextStyle};

pub const EDGE_A: Color = Color::hex(0xff6b6b);
pub const EDGE_B: Color = Color::hex(0x4ecdc4);
pub const EDGE_C: Color = Color::hex(0xffd166);
pub const EDGE_UNKNOWN: Color = Color::hex(0xcbd5e0);
pub const STRIPE_COLORS: [Color; 3] = [EDGE_A, EDGE_B, EDGE_C];
const CORNER_DIVIDER: Color = Color::hex(0x333333);

/// Rounded rectangle outline with quadratic corners.
pub fn rounded_rect_path(b: LayoutBox, radius: f64) -> PathData {
    let r = radius.min(b.width / 2.0).min(b.height / 2.0).max(0.0);
    let (x, y, right, bottom) = (b.x, b.y, b.right(), b.bottom());
    PathData::new()
        .move_to(x + r, y)
        .line_to(right - r, y)
        .quad_to(right, y, right, y + r)
        .line_to(right, bottom - r)
        .quad_to(right, bottom, right - r, bottom)
        .line_to(x + r, bottom)
        .quad_to(x, bottom, x, bottom - r)
        .line_to(x, y + r)
        .quad_to(x, y, x + r, y)
        .close()
}

pub fn fill_rounded_rect(surface: &mut Surface<'_>, b: LayoutBox, radius: f64, paint: &Paint) {
    surface.fill_path(&rounded_rect_path(b, radius), paint);
}

pub fn fill_stroke_rounded_rect(
    surface: &mut Surface<'_>,
    b: LayoutBox,
    radius: f64,
    paint: &Paint,
    stroke: &Stroke,
) {
    surface.fill_and_stroke_path(&rounded_rect_path(b, radius), paint, stroke);
}

pub fn stroke_rounded_rect(surface: &mut Surface<'_>, b: LayoutBox, radius: f64, stroke: &Stroke) {
    surface.stroke_path(&rounded_rect_path(b, radius), stroke);
}

/// Where a pill's label sits horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PillLabel {
    Centered,
    /// Left-aligned, inset by the horizontal padding.
    Inset,
}

/// A rounded label holder sized to its text.
#[derive(Clone, Debug, PartialEq)]
pub struct Pill {
    pub font: Font,
    pub padding_x: f64,
    pub height: f64,
    pub radius: f64,
    pub fill: Color,
    pub border: Option<Stroke>,
    pub text_color: Color,
    pub label: PillLabel,
}

impl Pill {
    /// Width for a label: measured text plus padding on both sides.
    pub fn width_for<C: TextCanvas + ?Sized>(&self, canvas: &C, sizing_text: &str) -> f64 {
        canvas.measure_text(sizing_text, &self.font) + self.padding_x * 2.0
    }

    /// Draw the pill at `origin` with `width`. An empty `text` draws only the shape.
    pub fn draw(&self, surface: &mut Surface<'_>, origin: Point, width: f64, text: &str) -> LayoutBox {
        let b = LayoutBox::new(origin.x, origin.y, width, self.height);
        let fill = Paint::Solid(self.fill);
        match &self.border {
            Some(stroke) => fill_stroke_rounded_rect(surface, b, self.radius, &fill, stroke),
            None => fill_rounded_rect(surface, b, self.radius, &fill),
        }
        if !text.trim().is_empty() {
            let style = TextStyle::new(self.font.clone(), self.text_color).baseline(Baseline::Middle);
            match self.label {
                PillLabel::Centered => {
                    surface.fill_text(text, b.center_x(), b.center_y(), &style.align(Align::Center))
                }
                PillLabel::Inset => {
                    surface.fill_text(text, b.x + self.padding_x, b.center_y(), &style)
                }
            }
        }
        b
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgePosition {
    North,
    East,
    South,
    West,
}

impl EdgePosition {
    pub const ALL: [EdgePosition; 4] = [
        EdgePosition::North,
        EdgePosition::East,
        EdgePosition::South,
        EdgePosition::West,
    ];

    /// Trapezoid joining the card corners to the corners inset by the edge thickness.
    pub fn clip_path(self, layout: &CardLayout) -> PathData {
        let (w, h, e) = (layout.width_f(), layout.height_f(), layout.edge);
        let points = match self {
            EdgePosition::North => [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w - e, e),
                Point::new(e, e),
            ],
            EdgePosition::South => [
                Point::new(e, h - e),
                Point::new(w - e, h - e),
                Point::new(w, h),
                Point::new(0.0, h),
            ],
            EdgePosition::East => [
                Point::new(w - e, e),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(w - e, h - e),
            ],
            EdgePosition::West => [
                Point::new(0.0, 0.0),
                Point::new(e, e),
                Point::new(e, h - e),
                Point::new(0.0, h),
            ],
        };
        PathData::polygon(&points)
    }

    /// Full band the clipped fill is painted into.
    pub fn band(self, layout: &CardLayout) -> LayoutBox {
        let (w, h, e) = (layout.width_f(), layout.height_f(), layout.edge);
        match self {
            EdgePosition::North => LayoutBox::new(0.0, 0.0, w, e),
            EdgePosition::South => LayoutBox::new(0.0, h - e, w, e),
            EdgePosition::East => LayoutBox::new(w - e, 0.0, e, h),
            EdgePosition::West => LayoutBox::new(0.0, 0.0, e, h),
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, EdgePosition::North | EdgePosition::South)
    }
}

/// Edge code colour: `A`, `B`, `C`, or neutral grey for anything else.
pub fn edge_color(code: &str) -> Color {
    match code {
        "A" => EDGE_A,
        "B" => EDGE_B,
        "C" => EDGE_C,
        _ => EDGE_UNKNOWN,
    }
}

/// Paint one edge band. `*` gives repeating A/B/C stripes.
pub fn paint_edge(surface: &mut Surface<'_>, layout: &CardLayout, position: EdgePosition, code: &str) {
    let band = position.band(layout);
    let stripe = layout.s(10.0).max(1.0);
    surface.with_clip(&position.clip_path(layout), |s| {
        if code != "*" {
            s.fill_rect(band, &Paint::Solid(edge_color(code)));
            return;
        }
        let length = if position.is_horizontal() {
            band.width
        } else {
            band.height
        };
        let count = (length / stripe).ceil() as usize;
        for i in 0..count {
            let offset = i as f64 * stripe;
            let rect = if position.is_horizontal() {
                LayoutBox::new(band.x + offset, band.y, stripe, band.height)
            } else {
                LayoutBox::new(band.x, band.y + offset, band.width, stripe)
            };
            s.fill_rect(rect, &Paint::Solid(STRIPE_COLORS[i % STRIPE_COLORS.len()]));
        }
    });
}

pub fn paint_corner_dividers(surface: &mut Surface<'_>, layout: &CardLayout) {
    let (w, h, e) = (layout.width_f(), layout.height_f(), layout.edge);
    let stroke = Stroke::new(CORNER_DIVIDER, layout.s(4.0));
    let lines = [
        (Point::new(0.0, 0.0), Point::new(e, e)),
        (Point::new(w - e, e), Point::new(w, 0.0)),
        (Point::new(0.0, h), Point::new(e, h - e)),
        (Point::new(w - e, h - e), Point::new(w, h)),
    ];
    for (from, to) in lines {
        surface.line(from, to, &stroke);
    }
}

/// Paint every non-empty edge code, then the corner dividers.
pub fn paint_edges(surface: &mut Surface<'_>, layout: &CardLayout, codes: [&str; 4]) {
    for (position, code) in EdgePosition::ALL.into_iter().zip(codes) {
        let code = code.trim();
        if !code.is_empty() {
            paint_edge(surface, layout, position, code);
        }
    }
    paint_corner_dividers(surface, layout);
}

/// Star with `points` spikes, first vertex straight up from the centre.
pub fn star_path(center: Point, points: usize, outer_radius: f64, inner_radius: f64) -> PathData {
    let spikes = points.max(2);
    let step = PI / spikes as f64;
    let mut angle = PI * 1.5;
    let mut vertices = Vec::with_capacity(spikes * 2);
    for i in 0..spikes * 2 {
        let radius = if i % 2 == 0 { outer_radius } else { inner_radius };
        vertices.push(Point::new(
            center.x + angle.cos() * radius,
            center.y + angle.sin() * radius,
        ));
        angle += step;
    }
    PathData::polygon(&vertices)
}
