use fonts::Font;

use crate::cards::palette::{self, BACKGROUND, BODY_TEXT, DIVIDER, FRAME, FUNNY_TEXT};
use crate::cards::{MONTSERRAT, NOTO, RenderContext, or_default, paint_divider, paint_framed_background};
use crate::color::{Color, GradientStop, Paint, RadialGradient};
use crate::geometry::{CardLayout, LayoutBox, Point};
use crate::record::{CardRecord, TextField, normalize_points, normalize_stat, normalize_tier};
use crate::shapes::{fill_rounded_rect, paint_edges};
use crate::surface::{Stroke, Surface};
use crate::text::{Align, Baseline, TextBlock, TextCanvas, TextStyle, draw_text_block};

use super::feature::edge_codes;

const BACK_BACKGROUND: Color = Color::hex(0xfbf4ec);
const STAT_BOX: Color = Color::hex(0xf1e3d4);
const STAT_TEXT: Color = Color::hex(0x3a3028);
const TIER_CAPTION: Color = Color::hex(0x675748);

/// File name of the per-record back for a face slug.
pub fn back_file_name(slug: &str) -> String {
    format!("back-{slug}.png")
}

/// Stat lines in display order; hidden stats are left out.
pub fn stat_lines(record: &CardRecord) -> Vec<String> {
    let counters = [
        ("Completed Features", record.tcf.as_deref()),
        ("Adjacent Features", record.acf.as_deref()),
        ("Total Product Score", record.mts.as_deref()),
    ];
    let mut lines: Vec<String> = counters
        .into_iter()
        .filter_map(|(label, raw)| normalize_stat(raw).map(|value| format!("{label}: {value}+")))
        .collect();
    let thresholds = [
        ("Minimum Score", record.minimum_score.as_deref()),
        ("Deadline", record.deadline.as_deref()),
    ];
    for (label, raw) in thresholds {
        let value = normalize_points(raw);
        if !value.is_empty() {
            lines.push(format!("{label}: {value}"));
        }
    }
    lines
}

pub fn render<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.square();
    let mut surface = ctx.surface(&layout);
    paint_framed_background(&mut surface, &layout, BACKGROUND, FRAME);
    paint_edges(&mut surface, &layout, edge_codes(record));

    let safe = layout.safe_box();
    if !blank {
        let style = TextStyle::new(Font::new(NOTO, 700, layout.s(28.0)), BODY_TEXT).align(Align::Center);
        let title = or_default(record.title(), "Milestone");
        surface.fill_text(title, layout.width_f() / 2.0, layout.edge + layout.s(16.0), &style);
    }
    paint_divider(
        &mut surface,
        safe,
        layout.edge + layout.s(56.0),
        &Stroke::new(DIVIDER, layout.s(2.0)),
    );
    if blank {
        return surface;
    }

    let body = TextBlock::new(safe.x, layout.edge + layout.s(70.0), safe.width, layout.s(24.0))
        .blank_line_height(layout.s(22.0));
    let body_style = TextStyle::new(Font::new(NOTO, 500, layout.s(18.0)), BODY_TEXT);
    let text = record.localized_text(ctx.locale, &[TextField::Text]);
    let mut cursor = draw_text_block(&mut surface, text, &body, &body_style);

    let stats = stat_lines(record);
    if !stats.is_empty() {
        cursor = paint_stats(&mut surface, &layout, cursor + layout.s(30.0), &stats);
    }

    let funny = record.funny_text();
    if !funny.is_empty() {
        let block = TextBlock::new(safe.x, cursor + layout.s(18.0), safe.width, layout.s(22.0))
            .blank_line_height(layout.s(20.0));
        let style = TextStyle::new(Font::new(NOTO, 500, layout.s(18.0)).italic(), FUNNY_TEXT);
        draw_text_block(&mut surface, funny, &block, &style);
    }
    surface
}

/// Rounded box listing the stats from `top`. Returns the y to continue from.
fn paint_stats(surface: &mut Surface<'_>, layout: &CardLayout, top: f64, lines: &[String]) -> f64 {
    let safe = layout.safe_box();
    let pad_x = layout.s(12.0);
    let pad_y = layout.s(10.0);
    let line_height = layout.s(22.0);
    let gap = layout.s(4.0);
    let count = lines.len() as f64;
    let height = pad_y * 2.0 + count * line_height + (count - 1.0).max(0.0) * gap;
    let panel = LayoutBox::new(safe.x, top, safe.width, height);
    fill_rounded_rect(surface, panel, layout.s(10.0), &Paint::Solid(STAT_BOX));

    let style = TextStyle::new(Font::new(NOTO, 600, layout.s(16.0)), STAT_TEXT);
    let mut y = top + pad_y;
    for line in lines {
        surface.fill_text(line, panel.x + pad_x, y, &style);
        y += line_height + gap;
    }
    y - gap + pad_y + layout.s(6.0)
}

/// Per-record back coloured by tier. Tier is structural, so blank keeps the colour.
pub fn render_back<'a>(ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
    let layout = ctx.square();
    let mut surface = ctx.surface(&layout);
    paint_framed_background(&mut surface, &layout, BACK_BACKGROUND, FRAME);

    let tier = normalize_tier(record.tier.as_deref());
    let accent = palette::tier(tier);
    let (width, height) = (layout.width_f(), layout.height_f());
    surface.fill_rect(
        layout.inner_box(),
        &Paint::Radial(RadialGradient {
            center: Point::new(width / 2.0, height / 2.0),
            inner_radius: layout.s(40.0),
            outer_radius: width / 2.0,
            stops: vec![
                GradientStop::new(0.0, accent.with_alpha_byte(0x33)),
                GradientStop::new(1.0, Color::WHITE.with_alpha(0.0)),
            ],
        }),
    );
    if blank {
        return surface;
    }

    let heading = TextStyle::new(Font::new(NOTO, 700, layout.s(40.0)), STAT_TEXT).align(Align::Center);
    surface.fill_text("Milestone", width / 2.0, layout.edge + layout.s(20.0), &heading);

    let number = TextStyle::new(Font::new(MONTSERRAT, 800, layout.s(200.0)), accent)
        .align(Align::Center)
        .baseline(Baseline::Middle);
    surface.fill_text(&tier.to_string(), width / 2.0, height / 2.0 + layout.s(40.0), &number);

    let caption = TextStyle::new(Font::new(NOTO, 600, layout.s(28.0)), TIER_CAPTION)
        .align(Align::Center)
        .baseline(Baseline::Bottom);
    surface.fill_text(
        &format!("Tier {tier}"),
        width / 2.0,
        height - layout.edge - layout.s(20.0),
        &caption,
    );
    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::test_support::{legacy, record, texts};
    use fonts::FontRegistry;

    #[test]
    fn stats_hide_zero_and_non_numeric_values() {
        let rec = record(&[
            ("TCF", "3"),
            ("ACF", "0"),
            ("MTS", "lots"),
            ("Minimum Score", "12.9"),
            ("Deadline", ""),
        ]);
        assert_eq!(
            stat_lines(&rec),
            vec!["Completed Features: 3+", "Minimum Score: 12"]
        );
        assert!(stat_lines(&record(&[("Title", "x")])).is_empty());
    }

    #[test]
    fn face_draws_stats_between_body_and_aside() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[
            ("Title", "Beta"),
            ("Text", "Reach users."),
            ("MTS", "2.5"),
            ("Funny text", "Soon."),
        ]);
        let svg = render(&ctx, &rec, false).svg();
        assert_eq!(
            texts(&svg),
            vec!["Beta", "Reach users.", "Total Product Score: 2.5+", "Soon."]
        );
        assert!(svg.contains(r##"fill="#f1e3d4""##));
    }

    #[test]
    fn back_is_tinted_by_tier_even_when_blank() {
        let fonts = FontRegistry::empty();
        let ctx = legacy(&fonts);
        let rec = record(&[("Title", "Beta"), ("Tier", "2")]);
        let svg = render_back(&ctx, &rec, false).svg();
        assert_eq!(texts(&svg), vec!["Milestone", "2", "Tier 2"]);
        assert!(svg.contains(r##"stop-color="#ffb169""##));

        let blank = render_back(&ctx, &rec, true).svg();
        assert!(texts(&blank).is_empty());
        assert!(blank.contains(r##"stop-color="#ffb169""##));
    }

    #[test]
    fn back_name_prefixes_slug() {
        assert_eq!(back_file_name("M1"), "back-M1.png");
    }
}
