//! Keystone faces and their shared back.
//!
//! The face template is authored for a 1050 px card and scaled to the active
//! generation, so positions are expressed through [`Template::at`].

use fonts::Font;

use crate::cards::palette::BODY_TEXT;
use crate::cards::{INTER, RenderContext};
use crate::color::{Color, GradientStop, LinearGradient, Paint};
use crate::geometry::{CardLayout, Point};
use crate::record::{CardRecord, TextField};
use crate::shapes::paint_edges;
use crate::surface::Surface;
use crate::text::{Align, Baseline, FontFit, TextBlock, TextCanvas, TextStyle, draw_text_block, fit_font_size};

use super::feature::edge_codes;

pub const BACK_FILE_NAME: &str = "keystone-back.png";

const FACE_BACKGROUND: Color = Color::hex(0xe3f2ff);
const BACK_BORDER: Color = Color::hex(0xb3caf6);
const BACK_GRADIENT_START: Color = Color::hex(0xf8fbff);
const BACK_GRADIENT_END: Color = Color::hex(0xbed5ff);
const BACK_TEXT: Color = Color::hex(0x1f2d46);
const FUNNY_TEXT: Color = Color::hex(0x949494);

const TEMPLATE_SIZE: f64 = 1050.0;
const TITLE_Y: f64 = 159.0;
const TITLE_INSET: f64 = 119.0;
const BODY_X: f64 = 167.0;
const BODY_Y: f64 = 428.0;
const FUNNY_Y: f64 = 777.0;

struct Template {
    ratio: f64,
}

impl Template {
    fn new(layout: &CardLayout) -> Self {
        Template {
            ratio: layout.width_f() / TEMPLATE_SIZE,
        }
    }

    fn at(&self, value: f64) -> f64 {
        (value * self.ratio).round()
    }
}

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.square();
    let mut surface = ctx.surface(&layout);
    surface.fill_rect(layout.bounds(), &Paint::Solid(FACE_BACKGROUND));
    paint_edges(&mut surface, &layout, edge_codes(record));
    if blank {
        return surface;
    }

    let t = Template::new(&layout);
    let width = layout.width_f();
    let center_x = width / 2.0;
    let narrow = width - t.at(TITLE_INSET) * 2.0;

    let title = record.title();
    let base = Font::new(INTER, 500, t.at(64.0));
    let size = fit_font_size(
        &surface,
        title,
        narrow,
        &base,
        FontFit {
            max: t.at(64.0),
            min: t.at(40.0),
            step: t.at(2.0).max(1.0),
        },
    );
    let title_style = TextStyle::new(base.with_size(size), BODY_TEXT).align(Align::Center);
    surface.fill_text(title, center_x, t.at(TITLE_Y), &title_style);

    let line_height = layout.s(28.0);
    let body_x = t.at(BODY_X);
    let body = TextBlock::new(body_x, t.at(BODY_Y), width - body_x * 2.0, line_height);
    let body_style = TextStyle::new(Font::new(INTER, 400, t.at(40.0)), BODY_TEXT);
    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    draw_text_block(&mut surface, text, &body, &body_style);

    let funny = record.funny_text();
    if !funny.is_empty() {
        let block = TextBlock::new(center_x, t.at(FUNNY_Y), narrow, line_height);
        let style = TextStyle::new(Font::new(INTER, 400, t.at(36.0)).italic(), FUNNY_TEXT)
            .align(Align::Center);
        draw_text_block(&mut surface, funny, &block, &style);
    }
    surface
}

/// Shared back written once per run into the misc directory.
pub fn render_back<'a>(ctx: &RenderContext<'a>, blank: bool) -> Surface<'a> {
    let layout = ctx.square();
    let mut surface = ctx.surface(&layout);
    let inner = layout.inner_box();
    surface.fill_rect(layout.bounds(), &Paint::Solid(BACK_BORDER));
    surface.fill_rect(
        inner,
        &Paint::Linear(LinearGradient {
            start: Point::new(inner.x, inner.y),
            end: Point::new(inner.right(), inner.bottom()),
            stops: vec![
                GradientStop::new(0.0, BACK_GRADIENT_START),
                GradientStop::new(1.0, BACK_GRADIENT_END),
            ],
        }),
    );
    if blank {
        return surface;
    }
    let style = TextStyle::new(Font::new(INTER, 700, layout.s(58.0)), BACK_TEXT)
        .align(Align::Center)
        .baseline(Baseline::Middle);
    surface.fill_text(
        "Keystone",
        layout.width_f() / 2.0,
        layout.height_f() / 2.0,
        &style,
    );
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, record, texts};
    use crate::config::Locale;
    use crate::geometry::Generation;
    use fonts::FontRegistry;

    #[test]
    fn large_face_uses_template_coordinates() {
        let fonts = FontRegistry::empty();
        let ctx = RenderContext::new(&fonts, Locale::Default, Generation::Large);
        let rec = record(&[("Title", "Core"), ("Text", "Hold the line."), ("Funny text", "ha")]);
        let svg = render(&ctx, &rec, false).svg();
        assert_eq!(texts(&svg), vec!["Core", "Hold the line.", "ha"]);
        assert!(svg.contains(r#"x="167""#));
        assert!(svg.contains(r#"font-size="64""#));
    }

    #[test]
    fn legacy_face_scales_template_down() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[("Title", "Core"), ("Text", "Body")]);
        let svg = render(&ctx, &rec, false).svg();
        // 167 * 490 / 1050
        assert!(svg.contains(r#"x="78""#));
    }

    #[test]
    fn back_has_label_unless_blank() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        assert_eq!(texts(&render_back(&ctx, false).svg()), vec!["Keystone"]);
        assert!(texts(&render_back(&ctx, true).svg()).is_empty());
    }
}
