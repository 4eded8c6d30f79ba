//! Per-category card renderers.
//!
//! Each renderer is a pure function of the [`RenderContext`], one record and a
//! `blank` flag, returning the recorded [`Surface`]. Blank renders keep the
//! structural template (backgrounds, edges, category colours, dividers) and
//! suppress record text.

pub mod ability;
pub mod feature;
pub mod goal;
pub mod keystone;
pub mod milestone;
pub mod misc;
pub mod palette;
pub mod problem;
pub mod role;
pub mod ticket;

use fonts::FontRegistry;

use crate::color::{Color, Paint};
use crate::config::Locale;
use crate::geometry::{CardLayout, Generation, LayoutBox, Point};
use crate::surface::{Stroke, Surface};

pub(crate) const NOTO_EMOJI: &[&str] = &["Noto Sans", "Noto Color Emoji", "Montserrat", "sans-serif"];
pub(crate) const NOTO: &[&str] = &["Noto Sans", "Montserrat", "sans-serif"];
pub(crate) const MONTSERRAT: &[&str] = &["Montserrat", "Noto Color Emoji", "sans-serif"];
pub(crate) const MONTSERRAT_PLAIN: &[&str] = &["Montserrat", "sans-serif"];
pub(crate) const INTER: &[&str] = &["Inter", "sans-serif"];
pub(crate) const INTER_WIDE: &[&str] = &[
    "Inter",
    "Noto Color Emoji",
    "Noto Sans",
    "Montserrat",
    "sans-serif",
];

/// Everything a renderer may read besides the record itself.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub fonts: &'a FontRegistry,
    pub locale: Locale,
    pub generation: Generation,
}

impl<'a> RenderContext<'a> {
    pub fn new(fonts: &'a FontRegistry, locale: Locale, generation: Generation) -> Self {
        RenderContext {
            fonts,
            locale,
            generation,
        }
    }

    pub fn square(&self) -> CardLayout {
        self.generation.square()
    }

    pub fn rect(&self) -> CardLayout {
        self.generation.rect()
    }

    pub fn surface(&self, layout: &CardLayout) -> Surface<'a> {
        Surface::new(layout.width, layout.height, self.fonts)
    }
}

/// Solid background plus the outline stroked along the frame box.
pub(crate) fn paint_framed_background(
    surface: &mut Surface<'_>,
    layout: &CardLayout,
    background: Color,
    frame: Color,
) {
    surface.fill_rect(layout.bounds(), &Paint::Solid(background));
    surface.stroke_rect(layout.frame_box(), &Stroke::new(frame, layout.s(4.0)));
}

/// Horizontal rule across `span` at `y`.
pub(crate) fn paint_divider(surface: &mut Surface<'_>, span: LayoutBox, y: f64, stroke: &Stroke) {
    surface.line(Point::new(span.x, y), Point::new(span.right(), y), stroke);
}

/// The trimmed value, or `fallback` when it is empty.
pub(crate) fn or_default<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    let trimmed = value.trim();
    if trimmed.is_empty() { fallback } else { trimmed }
}
