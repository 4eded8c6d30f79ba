use crate::geometry::Point;

/// An sRGB colour with straight (non-premultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);

    pub const fn hex(rgb: u32) -> Self {
        Color {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
            alpha: 1.0,
        }
    }

    pub const fn with_alpha(self, alpha: f64) -> Self {
        Color { alpha, ..self }
    }

    /// Alpha given as the trailing byte of an `#rrggbbaa` literal.
    pub fn with_alpha_byte(self, alpha: u8) -> Self {
        self.with_alpha(f64::from(alpha) / 255.0)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha >= 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
}

impl GradientStop {
    pub const fn new(offset: f64, color: Color) -> Self {
        GradientStop { offset, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    pub start: Point,
    pub end: Point,
    pub stops: Vec<GradientStop>,
}

/// Radial gradient between two concentric circles.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Stops re-expressed against a gradient that starts at radius zero.
    ///
    /// SVG radial gradients have no start radius, so the ring between zero and
    /// `inner_radius` is covered by the first stop via pad spreading.
    pub fn remapped_stops(&self) -> Vec<GradientStop> {
        if self.outer_radius <= 0.0 {
            return self.stops.clone();
        }
        let inner = self.inner_radius.clamp(0.0, self.outer_radius);
        let span = self.outer_radius - inner;
        self.stops
            .iter()
            .map(|stop| GradientStop {
                offset: ((inner + stop.offset * span) / self.outer_radius).clamp(0.0, 1.0),
                color: stop.color,
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Solid(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_to_svg_string() {
        let c = Color::hex(0x1f3b68);
        assert_eq!((c.r, c.g, c.b), (0x1f, 0x3b, 0x68));
        assert_eq!(c.to_hex(), "#1f3b68");
        assert!(c.is_opaque());
        let faded = c.with_alpha_byte(0x33);
        assert!((faded.alpha - 0.2).abs() < 1e-9);
        assert!(!faded.is_opaque());
    }

    #[test]
    fn radial_stops_start_at_inner_radius() {
        let gradient = RadialGradient {
            center: Point::new(0.0, 0.0),
            inner_radius: 40.0,
            outer_radius: 200.0,
            stops: vec![
                GradientStop::new(0.0, Color::BLACK),
                GradientStop::new(1.0, Color::WHITE),
            ],
        };
        let stops = gradient.remapped_stops();
        assert!((stops[0].offset - 0.2).abs() < 1e-9);
        assert_eq!(stops[1].offset, 1.0);
    }
}
