use fonts::Font;

use crate::cards::palette::{BACKGROUND, BODY_TEXT, DIVIDER, FRAME, FUNNY_TEXT};
use crate::cards::{MONTSERRAT, NOTO_EMOJI, RenderContext, or_default, paint_divider, paint_framed_background};
use crate::color::Color;
use crate::geometry::{CardLayout, Point};
use crate::record::{CardRecord, TextField, normalize_points};
use crate::shapes::{Pill, PillLabel};
use crate::surface::{Stroke, Surface};
use crate::text::{Align, TextBlock, TextCanvas, TextStyle, draw_text_block};

/// Six figure spaces: sizes the score pill on blank templates.
pub const BLANK_SCORE_TOKEN: &str = "\u{2007}\u{2007}\u{2007}\u{2007}\u{2007}\u{2007}";

pub(crate) fn score_pill(layout: &CardLayout) -> Pill {
    Pill {
        font: Font::new(MONTSERRAT, 700, layout.s(24.0)),
        padding_x: layout.s(18.0),
        height: layout.s(44.0),
        radius: layout.s(14.0),
        fill: Color::WHITE,
        border: Some(Stroke::new(Color::hex(0xd8cbbb), layout.s(2.0))),
        text_color: Color::hex(0xa0692b),
        label: PillLabel::Centered,
    }
}

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.square();
    let mut surface = ctx.surface(&layout);
    paint_framed_background(&mut surface, &layout, BACKGROUND, FRAME);

    let safe = layout.safe_box();
    let header_bottom = paint_score(&mut surface, &layout, record, blank);
    let title_y = safe.y.max(header_bottom + layout.s(12.0));

    if !blank {
        let style = TextStyle::new(Font::new(NOTO_EMOJI, 700, layout.s(34.0)), BODY_TEXT)
            .align(Align::Center);
        let title = or_default(record.title(), "Untitled Ability");
        surface.fill_text(title, layout.width_f() / 2.0, title_y, &style);
    }

    let divider_y = title_y + layout.s(48.0);
    paint_divider(
        &mut surface,
        safe,
        divider_y,
        &Stroke::new(DIVIDER, layout.s(2.0)),
    );
    if blank {
        return surface;
    }

    let body = TextBlock::new(safe.x, divider_y + layout.s(12.0), safe.width, layout.s(28.0))
        .blank_line_height(layout.s(24.0));
    let body_style = TextStyle::new(Font::new(NOTO_EMOJI, 500, layout.s(20.0)), BODY_TEXT);
    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    let mut cursor = draw_text_block(&mut surface, text, &body, &body_style);

    let funny = record.funny_text();
    if !funny.is_empty() {
        cursor += layout.s(20.0);
        let block = TextBlock::new(safe.x, cursor, safe.width, layout.s(24.0))
            .blank_line_height(layout.s(20.0));
        let style = TextStyle::new(Font::new(NOTO_EMOJI, 500, layout.s(18.0)).italic(), FUNNY_TEXT);
        draw_text_block(&mut surface, funny, &block, &style);
    }
    surface
}

/// Score pill anchored to the top right of the safe zone. Returns its bottom.
fn paint_score(surface: &mut Surface<'_>, layout: &CardLayout, record: &CardRecord, blank: bool) -> f64 {
    let pill = score_pill(layout);
    let points = if blank {
        String::new()
    } else {
        normalize_points(record.points.as_deref())
    };
    let sizing = if blank {
        BLANK_SCORE_TOKEN
    } else if points.is_empty() {
        "1"
    } else {
        points.as_str()
    };
    let width = pill.width_for(&*surface, sizing);
    let origin = Point::new(layout.safe_box().right() - width, layout.edge + layout.s(6.0));
    pill.draw(surface, origin, width, &points).bottom()
}
