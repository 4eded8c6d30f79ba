use fonts::Font;

use crate::cards::palette::{BODY_TEXT, DIVIDER, FRAME, FUNNY_TEXT};
use crate::cards::{INTER, RenderContext, or_default, paint_divider, paint_framed_background};
use crate::color::{Color, GradientStop, LinearGradient, Paint, RadialGradient};
use crate::geometry::{CardLayout, Point};
use crate::record::{CardRecord, TextField};
use crate::shapes::star_path;
use crate::surface::{Shadow, Stroke, Surface};
use crate::text::{Align, Baseline, FontFit, TextBlock, TextCanvas, TextStyle, draw_text_block, fit_font_size};

pub const BACK_FILE_NAME: &str = "role-back.png";
pub const FOUNDER_TITLE: &str = "The Founder";

const ROLE_BACKGROUND: Color = Color::hex(0xf6f2ff);
const ROLE_ACCENT: Color = Color::hex(0x7d6bff);
const STAR_TOP: Color = Color::hex(0xfff3b0);
const STAR_BOTTOM: Color = Color::hex(0xf6a328);
const STAR_OUTLINE: Color = Color::hex(0xd08a00);

pub fn is_founder(record: &CardRecord) -> bool {
    record.title().eq_ignore_ascii_case(FOUNDER_TITLE)
}

fn paint_background(surface: &mut Surface<'_>, layout: &CardLayout) {
    paint_framed_background(surface, layout, ROLE_BACKGROUND, FRAME);
    surface.fill_rect(
        layout.inner_box(),
        &Paint::Linear(LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(layout.width_f(), layout.height_f()),
            stops: vec![
                GradientStop::new(0.0, ROLE_ACCENT.with_alpha_byte(0x10)),
                GradientStop::new(1.0, ROLE_ACCENT.with_alpha_byte(0x00)),
            ],
        }),
    );
}

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.rect();
    let mut surface = ctx.surface(&layout);
    paint_background(&mut surface, &layout);

    let safe = layout.safe_box();
    let mut title_size = None;
    if !blank {
        let title = or_default(record.title(), "Role");
        let base = Font::new(INTER, 800, layout.s(42.0));
        let size = fit_font_size(
            &surface,
            title,
            safe.width,
            &base,
            FontFit {
                max: layout.s(42.0),
                min: layout.s(22.0),
                step: layout.s(2.0),
            },
        );
        let style = TextStyle::new(base.with_size(size), BODY_TEXT).align(Align::Center);
        surface.fill_text(title, layout.width_f() / 2.0, safe.y, &style);
        title_size = Some(size);
    }

    let divider_y = safe.y + title_size.unwrap_or(layout.s(44.0)) + layout.s(18.0);
    paint_divider(&mut surface, safe, divider_y, &Stroke::new(DIVIDER, layout.s(2.0)));
    if blank {
        return surface;
    }

    let body = TextBlock::new(safe.x, divider_y + layout.s(24.0), safe.width, layout.s(28.0))
        .blank_line_height(layout.s(24.0));
    let body_style = TextStyle::new(Font::new(INTER, 500, layout.s(20.0)), BODY_TEXT);
    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    let mut cursor = draw_text_block(&mut surface, text, &body, &body_style);

    let funny = record.funny_text();
    if !funny.is_empty() {
        let block = TextBlock::new(safe.x, cursor + layout.s(24.0), safe.width, layout.s(24.0))
            .blank_line_height(layout.s(20.0));
        let style = TextStyle::new(Font::new(INTER, 500, layout.s(18.0)).italic(), FUNNY_TEXT);
        cursor = draw_text_block(&mut surface, funny, &block, &style);
    }

    if is_founder(record) {
        paint_founder_star(&mut surface, &layout, cursor + layout.s(40.0));
    }
    surface
}

/// Star below the text, kept off the bottom edge and below the title area.
fn paint_founder_star(surface: &mut Surface<'_>, layout: &CardLayout, cursor: f64) {
    let safe = layout.safe_box();
    let preferred = layout.height_f() - layout.edge - layout.padding - layout.s(40.0);
    let lowest = cursor + layout.s(34.0);
    let top = preferred.min(lowest.max(safe.y + layout.s(80.0)));
    let center = Point::new(layout.width_f() / 2.0, top + layout.s(40.0));
    let outer = layout.s(36.0);
    let path = star_path(center, 5, outer, layout.s(18.0));
    let fill = Paint::Linear(LinearGradient {
        start: Point::new(center.x, center.y - outer),
        end: Point::new(center.x, center.y + outer),
        stops: vec![
            GradientStop::new(0.0, STAR_TOP),
            GradientStop::new(1.0, STAR_BOTTOM),
        ],
    });
    let shadow = Shadow {
        color: Color::BLACK.with_alpha_byte(0x33),
        blur: layout.s(12.0),
        offset_x: 0.0,
        offset_y: 0.0,
    };
    let outline = Stroke::new(STAR_OUTLINE, layout.s(4.0));
    surface.fill_path_with_shadow(&path, &fill, &shadow, Some(&outline));
}

/// Shared back written once per run into the misc directory.
pub fn render_back<'a>(ctx: &RenderContext<'a>, blank: bool) -> Surface<'a> {
    let layout = ctx.rect();
    let mut surface = ctx.surface(&layout);
    paint_background(&mut surface, &layout);

    let (width, height) = (layout.width_f(), layout.height_f());
    let center = Point::new(width / 2.0, height / 2.0);
    surface.fill_rect(
        layout.inner_box(),
        &Paint::Radial(RadialGradient {
            center,
            inner_radius: layout.s(40.0),
            outer_radius: height / 2.0,
            stops: vec![
                GradientStop::new(0.0, ROLE_ACCENT.with_alpha_byte(0x33)),
                GradientStop::new(1.0, ROLE_ACCENT.with_alpha_byte(0x00)),
            ],
        }),
    );
    surface.stroke_circle(
        center,
        width * 0.32,
        &Stroke::new(ROLE_ACCENT.with_alpha_byte(0x66), layout.s(6.0)),
    );
    surface.fill_circle(center, width * 0.28, &Paint::Solid(ROLE_ACCENT.with_alpha_byte(0x10)));
    if blank {
        return surface;
    }

    let style = TextStyle::new(Font::new(INTER, 600, layout.s(20.0)), ROLE_ACCENT)
        .align(Align::Center)
        .baseline(Baseline::Middle);
    surface.fill_text("ROLE CARD", center.x, center.y, &style);
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, record, texts};
    use fonts::FontRegistry;

    #[test]
    fn founder_match_ignores_case() {
        assert!(is_founder(&record(&[("Title", "the founder")])));
        assert!(is_founder(&record(&[("Title", " THE FOUNDER ")])));
        assert!(!is_founder(&record(&[("Title", "Founder")])));
    }

    #[test]
    fn only_the_founder_gets_a_star() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let founder = render(&ctx, &record(&[("Title", "The Founder"), ("Text", "Lead.")]), false).svg();
        assert!(founder.contains("<feDropShadow"));
        assert!(founder.contains(r##"stroke="#d08a00""##));

        let engineer = render(&ctx, &record(&[("Title", "Engineer"), ("Text", "Build.")]), false).svg();
        assert!(!engineer.contains("<feDropShadow"));
        assert_eq!(texts(&engineer), vec!["Engineer", "Build."]);
    }

    #[test]
    fn blank_face_skips_star_and_text() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = render(&ctx, &record(&[("Title", "The Founder")]), true).svg();
        assert!(texts(&svg).is_empty());
        assert!(!svg.contains("<feDropShadow"));
        assert!(svg.contains("<line"));
    }

    #[test]
    fn back_draws_ring_and_label() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = render_back(&ctx, false).svg();
        assert_eq!(texts(&svg), vec!["ROLE CARD"]);
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(texts(&render_back(&ctx, true).svg()).is_empty());
    }
}
