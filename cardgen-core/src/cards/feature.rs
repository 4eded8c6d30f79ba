use fonts::Font;

use crate::cards::ability::{BLANK_SCORE_TOKEN, score_pill};
use crate::cards::palette::{self, BACKGROUND, BODY_TEXT, FRAME, FUNNY_TEXT};
use crate::cards::{MONTSERRAT_PLAIN, NOTO, RenderContext, or_default, paint_framed_background};
use crate::geometry::{CardLayout, Point};
use crate::record::{CardRecord, TextField, field, format_feature_score};
use crate::shapes::{Pill, PillLabel, paint_edges};
use crate::surface::Surface;
use crate::text::{TextBlock, TextCanvas, TextStyle, draw_text_block};

const UNKNOWN_CATEGORY: &str = "ERROR!!!";

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.square();
    let mut surface = ctx.surface(&layout);
    paint_framed_background(&mut surface, &layout, BACKGROUND, FRAME);
    paint_edges(&mut surface, &layout, edge_codes(record));

    let safe = layout.safe_box();
    let header_bottom = paint_header(&mut surface, &layout, record, blank);
    if blank {
        return surface;
    }

    let title_style = TextStyle::new(Font::new(NOTO, 700, layout.s(30.0)), BODY_TEXT);
    let title = or_default(record.title(), "Untitled Feature");
    surface.fill_text(title, safe.x, header_bottom + layout.s(16.0), &title_style);

    let body = TextBlock::new(safe.x, header_bottom + layout.s(60.0), safe.width, layout.s(26.0))
        .blank_line_height(layout.s(24.0));
    let body_style = TextStyle::new(Font::new(NOTO, 500, layout.s(19.0)), BODY_TEXT);
    let text = record.localized_text(ctx.locale, &[TextField::AbilityText, TextField::Text]);
    let mut cursor = draw_text_block(&mut surface, text, &body, &body_style);

    let funny = record.funny_text();
    if !funny.is_empty() {
        cursor += layout.s(18.0);
        let block = TextBlock::new(safe.x, cursor, safe.width, layout.s(22.0))
            .blank_line_height(layout.s(20.0));
        let style = TextStyle::new(Font::new(NOTO, 500, layout.s(18.0)).italic(), FUNNY_TEXT);
        draw_text_block(&mut surface, funny, &block, &style);
    }
    surface
}

pub(crate) fn edge_codes(record: &CardRecord) -> [&str; 4] {
    [
        field(&record.north_edge),
        field(&record.east_edge),
        field(&record.south_edge),
        field(&record.west_edge),
    ]
}

/// Category badge on the left, signed score pill on the right. Returns the lower bottom.
fn paint_header(surface: &mut Surface<'_>, layout: &CardLayout, record: &CardRecord, blank: bool) -> f64 {
    let safe = layout.safe_box();
    let category = or_default(record.category(), UNKNOWN_CATEGORY).to_uppercase();
    let colors = palette::feature_category(&category);
    let badge = Pill {
        font: Font::new(MONTSERRAT_PLAIN, 700, layout.s(18.0)),
        padding_x: layout.s(14.0),
        height: layout.s(36.0),
        radius: layout.s(12.0),
        fill: colors.background,
        border: None,
        text_color: colors.foreground,
        label: PillLabel::Inset,
    };
    let badge_y = layout.edge + layout.s(12.0);
    let badge_width = badge.width_for(&*surface, &category);
    let label = if blank { "" } else { category.as_str() };
    let badge_box = badge.draw(surface, Point::new(safe.x, badge_y), badge_width, label);

    let pill = score_pill(layout);
    let score = format_feature_score(record.score_points.as_deref());
    let sizing = if blank { BLANK_SCORE_TOKEN } else { score.as_str() };
    let pill_width = pill.width_for(&*surface, sizing);
    let origin = Point::new(safe.right() - pill_width, badge_y - layout.s(4.0));
    let label = if blank { "" } else { score.as_str() };
    let pill_box = pill.draw(surface, origin, pill_width, label);

    badge_box.bottom().max(pill_box.bottom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, record, texts};
    use fonts::FontRegistry;

    #[test]
    fn header_shows_category_and_signed_score() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[
            ("Title", "Dark Mode"),
            ("Category", "design"),
            ("Score Points", "3"),
            ("Text", "Short text"),
            ("Text (SA - Special Ability; OC - On Completion)", "SA: Long text"),
        ]);
        let svg = render(&ctx, &rec, false).svg();
        assert_eq!(texts(&svg), vec!["DESIGN", "+3", "Dark Mode", "SA: Long text"]);
        assert!(svg.contains(r##"fill="#ffe3f3""##));
    }

    #[test]
    fn unknown_category_gets_placeholder_and_neutral_badge() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[("Title", "Mystery"), ("Text", "Body")]);
        let svg = render(&ctx, &rec, false).svg();
        let drawn = texts(&svg);
        assert_eq!(drawn[0], "ERROR!!!");
        assert_eq!(drawn[1], "0");
        assert!(svg.contains(r##"fill="#edf2f7""##));
    }

    #[test]
    fn blank_keeps_edges_and_category_colour() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[("Category", "TECH"), ("North edge", "A"), ("Title", "x")]);
        let svg = render(&ctx, &rec, true).svg();
        assert!(texts(&svg).is_empty());
        assert!(svg.contains(r##"fill="#d9f5ff""##));
        assert!(svg.contains(r##"fill="#ff6b6b""##));
    }
}
