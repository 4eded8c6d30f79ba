use cardgen_core::atlas::{Grid, plan_sheets};
use cardgen_core::color::Color;
use cardgen_core::record::{copy_file_names, normalize_copies, sanitize_file_name};
use cardgen_core::text::{FontFit, TextBlock, TextCanvas, TextStyle, draw_text_block, fit_font_size, wrap_paragraph};
use fonts::Font;
use proptest::prelude::*;

const FAMILY: &[&str] = &["sans-serif"];

/// Every character is half an em wide.
#[derive(Default)]
struct Monospace {
    drawn: Vec<(String, f64)>,
}

impl TextCanvas for Monospace {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size * 0.5
    }

    fn fill_text(&mut self, text: &str, _x: f64, y: f64, _style: &TextStyle) {
        self.drawn.push((text.to_string(), y));
    }
}

proptest! {
    #[test]
    fn copies_floor_numbers_and_default_to_one(raw in -50.0f64..500.0) {
        let text = raw.to_string();
        let expected = if raw < 1.0 { 1 } else { raw.floor() as u32 };
        prop_assert_eq!(normalize_copies(Some(&text)), expected);
        prop_assert_eq!(copy_file_names("x", expected).len(), expected as usize);
    }

    #[test]
    fn non_numeric_copies_are_one(raw in "[a-zA-Z ]{0,12}") {
        prop_assert_eq!(normalize_copies(Some(&raw)), 1);
    }

    #[test]
    fn sanitized_names_are_safe_and_stable(raw in "\\PC{0,40}") {
        let once = sanitize_file_name(&raw);
        prop_assert!(once.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')));
        prop_assert_eq!(sanitize_file_name(&once), once.clone());
    }

    #[test]
    fn wrapped_lines_fit_when_every_word_fits(
        words in prop::collection::vec("[a-z]{1,8}", 1..30),
        max_chars in 8usize..40,
    ) {
        let canvas = Monospace::default();
        let font = Font::new(FAMILY, 400, 2.0);
        let max_width = max_chars as f64;
        let paragraph = words.join(" ");
        for line in wrap_paragraph(&canvas, &paragraph, max_width, &font) {
            prop_assert!(canvas.measure_text(&line, &font) <= max_width, "{line:?} overflows");
        }
    }

    #[test]
    fn blank_lines_advance_without_drawing(blanks in 1usize..5) {
        let mut canvas = Monospace::default();
        let text = format!("first{}last", "\n".repeat(blanks + 1));
        let block = TextBlock::new(0.0, 10.0, 1000.0, 20.0).blank_line_height(7.0);
        let style = TextStyle::new(Font::new(FAMILY, 400, 2.0), Color::BLACK);
        let bottom = draw_text_block(&mut canvas, &text, &block, &style);
        prop_assert_eq!(canvas.drawn.len(), 2);
        let expected_last = 10.0 + 20.0 + 7.0 * blanks as f64;
        prop_assert_eq!(canvas.drawn[1].1, expected_last);
        prop_assert_eq!(bottom, expected_last + 20.0);
    }

    #[test]
    fn shorter_text_never_fits_smaller(text in "[a-zA-Z ]{1,40}", cut in 0usize..40) {
        let canvas = Monospace::default();
        let font = Font::new(FAMILY, 700, 30.0);
        let fit = FontFit { max: 30.0, min: 12.0, step: 2.0 };
        let prefix: String = text.chars().take(cut).collect();
        let full = fit_font_size(&canvas, &text, 200.0, &font, fit);
        let shorter = fit_font_size(&canvas, &prefix, 200.0, &font, fit);
        prop_assert!(shorter >= full);
        prop_assert!((fit.min..=fit.max).contains(&full));
    }

    #[test]
    fn atlas_plan_packs_in_order(count in 0usize..300, columns in 1u32..12, rows in 1u32..9) {
        let files: Vec<String> = (0..count).map(|i| format!("{i:04}.png")).collect();
        let grid = Grid::new(columns, rows);
        let capacity = grid.capacity();
        let sheets = plan_sheets("p", &files, grid);
        prop_assert_eq!(sheets.len(), count.div_ceil(capacity));
        if let Some(last) = sheets.last() {
            let expected = if count % capacity == 0 { capacity } else { count % capacity };
            prop_assert_eq!(last.cells.len(), expected);
        }
        for (s, sheet) in sheets.iter().enumerate() {
            for (i, cell) in sheet.cells.iter().enumerate() {
                prop_assert_eq!(&cell.source, &files[s * capacity + i]);
                prop_assert_eq!(cell.row * columns + cell.column, i as u32);
            }
        }
    }
}
