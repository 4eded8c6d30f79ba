//! Greedy word-wrap, multi-paragraph text blocks and font-size fitting.

use fonts::Font;

use crate::color::Color;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Baseline {
    #[default]
    Top,
    Middle,
    Bottom,
    Alphabetic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub align: Align,
    pub baseline: Baseline,
}

impl TextStyle {
    /// Left aligned, top baseline: the block layout default.
    pub fn new(font: Font, color: Color) -> Self {
        TextStyle {
            font,
            color,
            align: Align::Left,
            baseline: Baseline::Top,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Anything text can be measured on and drawn to.
pub trait TextCanvas {
    fn measure_text(&self, text: &str, font: &Font) -> f64;
    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBlock {
    pub x: f64,
    pub y: f64,
    pub max_width: f64,
    pub line_height: f64,
    pub blank_line_height: f64,
}

impl TextBlock {
    pub fn new(x: f64, y: f64, max_width: f64, line_height: f64) -> Self {
        TextBlock {
            x,
            y,
            max_width,
            line_height,
            blank_line_height: line_height,
        }
    }

    pub fn blank_line_height(mut self, height: f64) -> Self {
        self.blank_line_height = height;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontFit {
    pub max: f64,
    pub min: f64,
    pub step: f64,
}

/// Strip carriage returns and expand tabs to four spaces.
pub fn normalize_text(raw: &str) -> String {
    raw.replace('\r', "").replace('\t', "    ")
}

/// Split a paragraph into `\S+\s*` runs; each token keeps its trailing whitespace.
pub fn tokenize(paragraph: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_space = false;
    for (i, c) in paragraph.char_indices() {
        let space = c.is_whitespace();
        match start {
            None if !space => {
                start = Some(i);
                in_space = false;
            }
            Some(s) if !space && in_space => {
                tokens.push(&paragraph[s..i]);
                start = Some(i);
                in_space = false;
            }
            Some(_) if space => in_space = true,
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(&paragraph[s..]);
    }
    tokens
}

/// Lines the greedy wrapper produces for one paragraph, trailing whitespace trimmed.
pub fn wrap_paragraph<C: TextCanvas + ?Sized>(
    canvas: &C,
    paragraph: &str,
    max_width: f64,
    font: &Font,
) -> Vec<String> {
    let tokens = tokenize(paragraph);
    let mut lines = Vec::new();
    let mut line = String::new();
    for token in tokens {
        let candidate = format!("{line}{token}");
        if !line.is_empty() && canvas.measure_text(&candidate, font) > max_width {
            lines.push(line.trim_end().to_string());
            line = token.trim_start().to_string();
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Draw one paragraph, wrapping greedily. Returns the y below the last line.
///
/// A paragraph without tokens still issues one empty draw and advances a line.
pub fn draw_wrapped_line<C: TextCanvas + ?Sized>(
    canvas: &mut C,
    text: &str,
    x: f64,
    y: f64,
    max_width: f64,
    line_height: f64,
    style: &TextStyle,
) -> f64 {
    let lines = wrap_paragraph(canvas, text, max_width, &style.font);
    if lines.is_empty() {
        canvas.fill_text("", x, y, style);
        return y + line_height;
    }
    let mut cursor = y;
    for line in &lines {
        canvas.fill_text(line, x, cursor, style);
        cursor += line_height;
    }
    cursor
}

/// Height [`draw_wrapped_line`] would use for `text`, without drawing.
pub fn wrapped_line_height<C: TextCanvas + ?Sized>(
    canvas: &C,
    text: &str,
    max_width: f64,
    line_height: f64,
    font: &Font,
) -> f64 {
    let count = wrap_paragraph(canvas, text, max_width, font).len().max(1);
    count as f64 * line_height
}

/// Lay out multi-paragraph text. Returns the y immediately below the last line.
pub fn draw_text_block<C: TextCanvas + ?Sized>(
    canvas: &mut C,
    raw: &str,
    block: &TextBlock,
    style: &TextStyle,
) -> f64 {
    let text = normalize_text(raw);
    if text.trim().is_empty() {
        return block.y;
    }
    let mut cursor = block.y;
    for paragraph in text.split('\n') {
        if paragraph.trim().is_empty() {
            cursor += block.blank_line_height;
            continue;
        }
        cursor = draw_wrapped_line(
            canvas,
            paragraph,
            block.x,
            cursor,
            block.max_width,
            block.line_height,
            style,
        );
    }
    cursor
}

/// Largest size from `fit.max` down by `fit.step` whose width fits, else `fit.min`.
pub fn fit_font_size<C: TextCanvas + ?Sized>(
    canvas: &C,
    text: &str,
    max_width: f64,
    font: &Font,
    fit: FontFit,
) -> f64 {
    if fit.step <= 0.0 {
        let fits = canvas.measure_text(text, &font.with_size(fit.max)) <= max_width;
        return if fits { fit.max } else { fit.min };
    }
    let mut size = fit.max;
    while size >= fit.min {
        if canvas.measure_text(text, &font.with_size(size)) <= max_width {
            return size;
        }
        size -= fit.step;
    }
    fit.min
}
