//! Generic deck backs. These carry no record data.

use fonts::Font;

use crate::cards::palette::{BODY_TEXT, FRAME};
use crate::cards::{INTER_WIDE, RenderContext};
use crate::color::{Color, Paint};
use crate::geometry::CardLayout;
use crate::surface::{Stroke, Surface};
use crate::text::{Align, Baseline, TextCanvas, TextStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MiscCard {
    Role,
    PlayerDeck,
    WorkDeck,
}

struct BackStyle {
    background: Color,
    text: Color,
    label: &'static str,
    wrap_words: bool,
}

impl MiscCard {
    pub const ALL: [MiscCard; 3] = [MiscCard::Role, MiscCard::PlayerDeck, MiscCard::WorkDeck];

    pub fn file_name(self) -> &'static str {
        match self {
            MiscCard::Role => "role.png",
            MiscCard::PlayerDeck => "player-deck.png",
            MiscCard::WorkDeck => "work-deck.png",
        }
    }

    fn layout(self, ctx: &RenderContext<'_>) -> CardLayout {
        match self {
            MiscCard::Role => ctx.rect(),
            MiscCard::PlayerDeck | MiscCard::WorkDeck => ctx.square(),
        }
    }

    pub fn render<'a>(self, ctx: &RenderContext<'a>) -> Surface<'a> {
        let layout = self.layout(ctx);
        let mut surface = ctx.surface(&layout);
        match self {
            MiscCard::Role => paint_generic_back(
                &mut surface,
                &layout,
                &BackStyle {
                    background: Color::hex(0xdceeff),
                    text: Color::hex(0x0c356b),
                    label: "Role",
                    wrap_words: false,
                },
            ),
            MiscCard::WorkDeck => paint_generic_back(
                &mut surface,
                &layout,
                &BackStyle {
                    background: Color::hex(0xffe0df),
                    text: BODY_TEXT,
                    label: "Work Deck",
                    wrap_words: true,
                },
            ),
            MiscCard::PlayerDeck => paint_runway_back(&mut surface, &layout),
        }
        surface
    }
}

fn border(layout: &CardLayout) -> f64 {
    layout.s(4.0).max(1.0)
}

fn min_side(layout: &CardLayout) -> f64 {
    layout.width_f().min(layout.height_f())
}

fn paint_generic_back(surface: &mut Surface<'_>, layout: &CardLayout, style: &BackStyle) {
    surface.fill_rect(layout.bounds(), &Paint::Solid(style.background));
    surface.stroke_rect(layout.frame_box(), &Stroke::new(FRAME, border(layout)));

    let (cx, cy) = (layout.width_f() / 2.0, layout.height_f() / 2.0);
    let side = min_side(layout);
    let monogram: String = style.label.chars().take(1).collect();
    let watermark = TextStyle::new(
        Font::new(INTER_WIDE, 900, (side * 0.55).floor()),
        Color::WHITE.with_alpha_byte(0x18),
    )
    .align(Align::Center)
    .baseline(Baseline::Middle);
    surface.fill_text(&monogram, cx, cy, &watermark);

    let size = (side * 0.16).floor();
    let label = TextStyle::new(Font::new(INTER_WIDE, 800, size), style.text)
        .align(Align::Center)
        .baseline(Baseline::Middle);
    let lines: Vec<&str> = if style.wrap_words {
        style.label.split_whitespace().collect()
    } else {
        vec![style.label]
    };
    let line_height = size * 1.2;
    let mut y = cy - line_height * lines.len() as f64 / 2.0 + line_height / 2.0;
    for line in lines {
        surface.fill_text(line, cx, y, &label);
        y += line_height;
    }
}

fn paint_runway_back(surface: &mut Surface<'_>, layout: &CardLayout) {
    let (width, height) = (layout.width_f(), layout.height_f());
    let side = min_side(layout);
    surface.fill_rect(layout.bounds(), &Paint::Solid(Color::hex(0x45c080)));

    let dollar = TextStyle::new(Font::new(INTER_WIDE, 900, (side * 0.9).floor()), Color::WHITE)
        .align(Align::Center)
        .baseline(Baseline::Middle);
    surface.with_opacity(0.12, |s| {
        s.fill_text("$", width / 2.0, height / 2.0 - (height * 0.03).floor(), &dollar);
    });

    surface.stroke_rect(
        layout.frame_box(),
        &Stroke::new(Color::hex(0x7fd6a6), border(layout)),
    );

    let label = TextStyle::new(
        Font::new(INTER_WIDE, 900, (side * 0.16).floor()),
        Color::hex(0x0b3b22),
    )
    .align(Align::Center)
    .baseline(Baseline::Middle);
    surface.fill_text("RUNWAY", width / 2.0, height / 2.0, &label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, texts};
    use fonts::FontRegistry;

    #[test]
    fn sizes_follow_card_shape() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let role = MiscCard::Role.render(&ctx);
        assert_eq!((role.width(), role.height()), (368, 490));
        let deck = MiscCard::WorkDeck.render(&ctx);
        assert_eq!((deck.width(), deck.height()), (490, 490));
    }

    #[test]
    fn work_deck_wraps_per_word() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = MiscCard::WorkDeck.render(&ctx).svg();
        assert_eq!(texts(&svg), vec!["W", "Work", "Deck"]);
        // floor(490 * 0.16) = 78, so lines sit 93.6 apart
        assert!(svg.contains(r#"font-size="78""#));
    }

    #[test]
    fn player_deck_has_faded_watermark() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = MiscCard::PlayerDeck.render(&ctx).svg();
        assert_eq!(texts(&svg), vec!["$", "RUNWAY"]);
        assert!(svg.contains(r#"<g opacity="0.12">"#));
    }

    #[test]
    fn file_names_are_distinct() {
        let names: Vec<_> = MiscCard::ALL.iter().map(|c| c.file_name()).collect();
        assert_eq!(names, vec!["role.png", "player-deck.png", "work-deck.png"]);
    }
}
