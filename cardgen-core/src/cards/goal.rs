use fonts::Font;

use crate::cards::palette::BODY_TEXT;
use crate::cards::{NOTO_EMOJI, RenderContext, or_default, paint_divider, paint_framed_background};
use crate::color::{Color, GradientStop, LinearGradient, Paint};
use crate::geometry::Point;
use crate::record::{CardRecord, TextField};
use crate::surface::{Stroke, Surface};
use crate::text::{Align, FontFit, TextBlock, TextCanvas, TextStyle, draw_text_block, fit_font_size};

const GOAL_BACKGROUND: Color = Color::hex(0xcbd6e6);
const GOAL_ACCENT: Color = Color::hex(0x1f3b68);
const GOAL_OUTLINE: Color = Color::hex(0x0e1083);

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.rect();
    let mut surface = ctx.surface(&layout);
    paint_framed_background(&mut surface, &layout, GOAL_BACKGROUND, GOAL_OUTLINE);
    surface.fill_rect(
        layout.inner_box(),
        &Paint::Linear(LinearGradient {
            start: Point::new(0.0, 0.0),
            end: Point::new(layout.width_f(), layout.height_f()),
            stops: vec![
                GradientStop::new(0.0, GOAL_ACCENT.with_alpha_byte(0x22)),
                GradientStop::new(0.5, GOAL_ACCENT.with_alpha_byte(0x00)),
                GradientStop::new(1.0, GOAL_ACCENT.with_alpha_byte(0x18)),
            ],
        }),
    );

    let safe = layout.safe_box();
    let mut title_size = None;
    if !blank {
        let title = or_default(record.title(), "Goal");
        let base = Font::new(NOTO_EMOJI, 700, layout.s(30.0));
        let size = fit_font_size(
            &surface,
            title,
            safe.width,
            &base,
            FontFit {
                max: layout.s(30.0),
                min: layout.s(20.0),
                step: layout.s(2.0),
            },
        );
        let style = TextStyle::new(base.with_size(size), BODY_TEXT).align(Align::Center);
        surface.fill_text(title, layout.width_f() / 2.0, safe.y, &style);
        title_size = Some(size);
    }

    let divider_y = safe.y + title_size.unwrap_or(layout.s(44.0)) + layout.s(18.0);
    paint_divider(
        &mut surface,
        safe,
        divider_y,
        &Stroke::new(GOAL_OUTLINE, layout.s(2.0)),
    );
    if blank {
        return surface;
    }

    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    if !text.is_empty() {
        let block = TextBlock::new(safe.x, divider_y + layout.s(24.0), safe.width, layout.s(28.0))
            .blank_line_height(layout.s(24.0));
        let style = TextStyle::new(Font::new(NOTO_EMOJI, 500, layout.s(20.0)), BODY_TEXT);
        draw_text_block(&mut surface, text, &block, &style);
    }
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, record, texts};
    use fonts::FontRegistry;

    #[test]
    fn long_titles_shrink_to_the_minimum() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let long = "An extraordinarily long goal title that cannot fit";
        let svg = render(&ctx, &record(&[("Title", long)]), false).svg();
        assert!(svg.contains(r#"font-size="20""#));
        assert_eq!(texts(&svg), vec![long]);
    }

    #[test]
    fn short_titles_keep_the_maximum() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = render(&ctx, &record(&[("Title", "Ship"), ("Text", "Launch v1.")]), false).svg();
        assert!(svg.contains(r#"font-size="30""#));
        assert_eq!(texts(&svg), vec!["Ship", "Launch v1."]);
    }

    #[test]
    fn blank_draws_wash_and_divider() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = render(&ctx, &record(&[("Title", "Ship")]), true).svg();
        assert!(texts(&svg).is_empty());
        assert!(svg.contains("<linearGradient"));
        assert!(svg.contains("<line"));
    }
}
