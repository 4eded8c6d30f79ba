//! Ticket cards. Coordinates are native to the fixed 768 px template.

use fonts::Font;

use crate::cards::palette::{self, BODY_TEXT};
use crate::cards::{INTER, RenderContext, or_default};
use crate::color::{Color, Paint};
use crate::geometry::{CardLayout, LayoutBox, Point};
use crate::record::{CardRecord, TextField, field, normalize_slot_count, sanitize_file_name};
use crate::shapes::{Pill, PillLabel, fill_rounded_rect, stroke_rounded_rect};
use crate::surface::{LineCap, Stroke, Surface};
use crate::text::{
    Align, Baseline, TextBlock, TextCanvas, TextStyle, draw_text_block, draw_wrapped_line, normalize_text,
    wrapped_line_height,
};

const BORDER_INSET: f64 = 10.0;
const CORNER_RADIUS: f64 = 40.0;

const PILL_ORIGIN: Point = Point::new(54.0, 47.0);
const PILL_TEXT: Point = Point::new(70.0, 51.0);
const TITLE_ORIGIN: Point = Point::new(70.0, 128.0);

const SLOT_X: [f64; 6] = [70.0, 185.0, 300.0, 415.0, 530.0, 645.0];
const SLOT_Y: f64 = 252.0;
const SLOT_SIZE: f64 = 50.0;

const DIVIDER_FROM: Point = Point::new(127.0, 383.0);
const DIVIDER_TO: Point = Point::new(640.0, 383.0);
const DIVIDER_COLOR: Color = Color::hex(0xa3a3a3);

const BODY_X: f64 = 70.0;
const BODY_Y: f64 = 481.0;
const BODY_ICON_X: f64 = 190.0;
const BODY_RIGHT_PADDING: f64 = 70.0;
const FUNNY_TEXT: Color = Color::hex(0x574334);

const ICON_SIZE: f64 = 71.0;

/// A body line prefix that is drawn as a coloured letter badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Open,
    Close,
    Action,
}

impl Directive {
    const ALL: [Directive; 3] = [Directive::Open, Directive::Close, Directive::Action];

    pub fn marker(self) -> &'static str {
        match self {
            Directive::Open => "[Open]:",
            Directive::Close => "[Close]:",
            Directive::Action => "[Action]:",
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Directive::Open => "O",
            Directive::Close => "C",
            Directive::Action => "A",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Directive::Open => Color::hex(0x4c83c3),
            Directive::Close => Color::hex(0xd02626),
            Directive::Action => Color::hex(0x7ac34c),
        }
    }

    /// Match a marker after leading whitespace. Returns the directive and the rest of the line.
    pub fn parse(line: &str) -> Option<(Directive, &str)> {
        let trimmed = line.trim_start();
        Directive::ALL.into_iter().find_map(|directive| {
            trimmed
                .strip_prefix(directive.marker())
                .map(|rest| (directive, rest.trim_start()))
        })
    }
}

/// `{CATEGORY}.{Title}`, sanitized.
pub fn file_slug(record: &CardRecord) -> String {
    let category = or_default(record.category(), "ticket").to_uppercase();
    let title = or_default(record.title(), "ticket");
    sanitize_file_name(&format!("{category}.{title}"))
}

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = CardLayout::ticket();
    let mut surface = ctx.surface(&layout);
    let category = field(&record.category).to_uppercase();
    let colors = palette::ticket_category(&category);

    surface.fill_rect(layout.bounds(), &Paint::Solid(colors.background));
    fill_rounded_rect(
        &mut surface,
        layout.bounds().inset(BORDER_INSET),
        CORNER_RADIUS,
        &Paint::Solid(Color::WHITE),
    );

    if !blank {
        let pill = Pill {
            font: Font::new(INTER, 700, 36.0),
            padding_x: 16.0,
            height: 52.0,
            radius: 12.0,
            fill: colors.background,
            border: None,
            text_color: colors.foreground,
            label: PillLabel::Inset,
        };
        let width = pill.width_for(&surface, &category);
        pill.draw(&mut surface, PILL_ORIGIN, width, "");
        let label = TextStyle::new(pill.font.clone(), colors.foreground);
        surface.fill_text(&category, PILL_TEXT.x, PILL_TEXT.y, &label);

        let title = TextStyle::new(Font::new(INTER, 500, 48.0), BODY_TEXT);
        surface.fill_text(or_default(record.title(), "Ticket"), TITLE_ORIGIN.x, TITLE_ORIGIN.y, &title);

        let slot_stroke = Stroke::new(Color::BLACK, 3.0);
        let slots = normalize_slot_count(record.counter_slots.as_deref());
        for x in SLOT_X.iter().take(slots) {
            stroke_rounded_rect(
                &mut surface,
                LayoutBox::new(*x, SLOT_Y, SLOT_SIZE, SLOT_SIZE),
                5.0,
                &slot_stroke,
            );
        }
    }

    surface.line(
        DIVIDER_FROM,
        DIVIDER_TO,
        &Stroke::new(DIVIDER_COLOR, 1.0).cap(LineCap::Round),
    );
    if blank {
        return surface;
    }

    let line_height = layout.s(28.0);
    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    let mut cursor = paint_body(&mut surface, &layout, text, line_height);

    let funny = record.funny_text();
    if !funny.is_empty() {
        cursor += layout.s(16.0);
        let block = TextBlock::new(BODY_X, cursor, body_width(&layout, BODY_X), line_height);
        let style = TextStyle::new(Font::new(INTER, 500, layout.s(16.0)).italic(), FUNNY_TEXT);
        draw_text_block(&mut surface, funny, &block, &style);
    }
    surface
}

fn body_width(layout: &CardLayout, x: f64) -> f64 {
    layout.width_f() - x - BODY_RIGHT_PADDING
}

/// Body paragraphs; directive lines get an icon and a narrower column.
fn paint_body(surface: &mut Surface<'_>, layout: &CardLayout, raw: &str, line_height: f64) -> f64 {
    let text = normalize_text(raw);
    if text.trim().is_empty() {
        return BODY_Y;
    }
    let style = TextStyle::new(Font::new(INTER, 500, layout.s(18.0)), BODY_TEXT);
    let regular_width = body_width(layout, BODY_X);
    let icon_width = body_width(layout, BODY_ICON_X);
    let mut cursor = BODY_Y;
    for line in text.split('\n') {
        if line.trim().is_empty() {
            cursor += line_height;
            continue;
        }
        cursor = match Directive::parse(line) {
            Some((directive, rest)) => {
                let height = wrapped_line_height(&*surface, rest, icon_width, line_height, &style.font);
                paint_directive_icon(surface, directive, cursor + height / 2.0);
                draw_wrapped_line(surface, rest, BODY_ICON_X, cursor, icon_width, line_height, &style)
            }
            None => draw_wrapped_line(surface, line, BODY_X, cursor, regular_width, line_height, &style),
        };
    }
    cursor
}

fn paint_directive_icon(surface: &mut Surface<'_>, directive: Directive, center_y: f64) {
    let radius = ICON_SIZE / 2.0;
    let center = Point::new(BODY_X + radius, center_y);
    surface.fill_circle(center, radius, &Paint::Solid(directive.color()));
    let style = TextStyle::new(Font::new(INTER, 900, 48.0), Color::WHITE)
        .align(Align::Center)
        .baseline(Baseline::Middle);
    surface.fill_text(directive.letter(), center.x, center.y, &style);
}
