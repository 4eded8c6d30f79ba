use fonts::Font;

use crate::cards::{INTER, RenderContext};
use crate::color::{Color, Paint};
use crate::geometry::{CardLayout, Point};
use crate::record::{CardRecord, TextField, field, sanitize_file_name};
use crate::surface::{LineCap, Stroke, Surface};
use crate::text::{TextBlock, TextCanvas, TextStyle, draw_text_block};

const TITLE_COLOR: Color = Color::hex(0xd02626);
const DELIMITER_COLOR: Color = Color::hex(0xa3a3a3);
const TEXT_X: f64 = 61.0;
const TITLE_Y: f64 = 66.0;
const TEXT_Y: f64 = 226.0;
const LINE_HEIGHT: f64 = 42.0;

/// Lower-cased `{addon}.{title}`, or `problem-card` when both are empty.
pub fn file_slug(record: &CardRecord) -> String {
    let title = match record.title() {
        "" => "problem".to_string(),
        title => title.to_lowercase(),
    };
    let addon = field(&record.addon).to_lowercase();
    let joined = [addon.as_str(), title.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    let slug = sanitize_file_name(&joined);
    if slug.is_empty() {
        "problem-card".to_string()
    } else {
        slug
    }
}

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = CardLayout::ticket();
    let mut surface = ctx.surface(&layout);
    surface.fill_rect(layout.bounds(), &Paint::Solid(Color::WHITE));

    if !blank {
        let title = match record.title() {
            "" => "PROBLEM".to_string(),
            title => title.to_uppercase(),
        };
        let style = TextStyle::new(Font::new(INTER, 900, 64.0), TITLE_COLOR);
        surface.fill_text(&title, TEXT_X, TITLE_Y, &style);
    }

    surface.line(
        Point::new(127.0, 189.0),
        Point::new(640.0, 189.0),
        &Stroke::new(DELIMITER_COLOR, 1.0).cap(LineCap::Round),
    );
    if blank {
        return surface;
    }

    let block = TextBlock::new(TEXT_X, TEXT_Y, layout.width_f() - TEXT_X * 2.0, LINE_HEIGHT);
    let style = TextStyle::new(Font::new(INTER, 400, 36.0), Color::BLACK);
    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    draw_text_block(&mut surface, text, &block, &style);
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, record, texts};
    use fonts::FontRegistry;

    #[test]
    fn slug_is_lowercase_addon_then_title() {
        assert_eq!(
            file_slug(&record(&[("Title", "Scope Creep"), ("Addon", "Chaos")])),
            "chaos.scope_creep"
        );
        assert_eq!(file_slug(&record(&[("Title", "Outage")])), "outage");
        assert_eq!(file_slug(&record(&[("Title", "")])), "problem");
        assert_eq!(file_slug(&record(&[("Title", "!!!")])), "_");
    }

    #[test]
    fn title_is_upper_cased_in_red() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[("Title", "Scope creep"), ("Text", "Everything grows.\n\nAgain.")]);
        let svg = render(&ctx, &rec, false).svg();
        assert_eq!(texts(&svg), vec!["SCOPE CREEP", "Everything grows.", "Again."]);
        assert!(svg.contains(r##"fill="#d02626""##));
        assert!(svg.contains(r#"font-weight="900""#));
    }

    #[test]
    fn blank_is_delimiter_only() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let svg = render(&ctx, &record(&[("Title", "x"), ("Text", "y")]), true).svg();
        assert!(texts(&svg).is_empty());
        assert_eq!(svg.matches("<line").count(), 1);
    }
}
