//! Card size presets and the boxes content is laid out in.

/// Reference edge length all template values are authored against.
pub const BASE_CARD_SIZE: f64 = 490.0;
pub const BASE_EDGE_THICKNESS: f64 = 40.0;
pub const BASE_CONTENT_PADDING: f64 = 30.0;
/// Rect cards are three quarters as wide as they are tall.
pub const RECT_ASPECT: f64 = 0.75;
pub const TICKET_CARD_SIZE: u32 = 768;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Generation {
    /// 490 px square cards, 368x490 rect cards.
    Legacy,
    /// 1050 px square cards, 788x1050 rect cards.
    #[default]
    Large,
}

impl Generation {
    fn card_size(self) -> u32 {
        match self {
            Generation::Legacy => 490,
            Generation::Large => 1050,
        }
    }

    pub fn square(self) -> CardLayout {
        let size = self.card_size();
        CardLayout::scaled(size, size)
    }

    pub fn rect(self) -> CardLayout {
        let height = self.card_size();
        let width = (f64::from(height) * RECT_ASPECT).round() as u32;
        CardLayout::scaled(width, height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        LayoutBox {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Shrink by `amount` on every side, never below zero size.
    pub fn inset(&self, amount: f64) -> Self {
        LayoutBox {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }
}

/// Geometry of one physical card size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub edge: f64,
    pub padding: f64,
    pub scale: f64,
}

impl CardLayout {
    /// A layout whose scale is the long side over the 490 px reference.
    pub fn scaled(width: u32, height: u32) -> Self {
        let scale = f64::from(width.max(height)) / BASE_CARD_SIZE;
        CardLayout {
            width,
            height,
            edge: (BASE_EDGE_THICKNESS * scale).round(),
            padding: (BASE_CONTENT_PADDING * scale).round(),
            scale,
        }
    }

    /// Tickets and problems share one 768 px template regardless of generation.
    pub fn ticket() -> Self {
        Self::scaled(TICKET_CARD_SIZE, TICKET_CARD_SIZE)
    }

    /// Scale a reference value, rounded to whole pixels.
    pub fn s(&self, value: f64) -> f64 {
        (value * self.scale).round()
    }

    pub fn width_f(&self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f(&self) -> f64 {
        f64::from(self.height)
    }

    pub fn bounds(&self) -> LayoutBox {
        LayoutBox::new(0.0, 0.0, self.width_f(), self.height_f())
    }

    /// Rectangle the outline stroke is centred on.
    pub fn frame_box(&self) -> LayoutBox {
        self.bounds().inset(self.edge / 2.0)
    }

    /// Area inside the edge band.
    pub fn inner_box(&self) -> LayoutBox {
        self.bounds().inset(self.edge)
    }

    /// Content zone: inside the edge band and the padding.
    pub fn safe_box(&self) -> LayoutBox {
        self.bounds().inset(self.edge + self.padding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_presets_match_reference_sizes() {
        let square = Generation::Legacy.square();
        assert_eq!((square.width, square.height), (490, 490));
        assert_eq!(square.scale, 1.0);
        assert_eq!(square.edge, 40.0);
        assert_eq!(square.padding, 30.0);
        let rect = Generation::Legacy.rect();
        assert_eq!((rect.width, rect.height), (368, 490));
    }

    #[test]
    fn large_presets_scale_constants() {
        let square = Generation::Large.square();
        assert_eq!((square.width, square.height), (1050, 1050));
        assert_eq!(square.edge, 86.0);
        assert_eq!(square.padding, 64.0);
        assert_eq!(square.s(34.0), 73.0);
        let rect = Generation::Large.rect();
        assert_eq!((rect.width, rect.height), (788, 1050));
        assert_eq!(rect.scale, square.scale);
        assert_eq!(Generation::default(), Generation::Large);
    }

    #[test]
    fn ticket_layout_is_fixed() {
        let ticket = CardLayout::ticket();
        assert_eq!(ticket.width, 768);
        assert_eq!(ticket.s(18.0), 28.0);
        assert_eq!(ticket.s(28.0), 44.0);
    }

    #[test]
    fn safe_box_is_inside_frame() {
        let layout = Generation::Legacy.square();
        let safe = layout.safe_box();
        assert_eq!(safe, LayoutBox::new(70.0, 70.0, 350.0, 350.0));
        assert_eq!(layout.frame_box().x, 20.0);
        assert_eq!(layout.inner_box().right(), 450.0);
    }

    #[test]
    fn inset_never_goes_negative() {
        let b = LayoutBox::new(0.0, 0.0, 10.0, 4.0).inset(3.0);
        assert_eq!(b.height, 0.0);
        assert_eq!(b.width, 4.0);
    }
}
