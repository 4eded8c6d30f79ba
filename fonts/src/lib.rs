//! Font loading and text measurement shared by the card renderers.
//!
//! Fonts are registered once by the process entry point and the resulting
//! [`FontRegistry`] is handed to every renderer. The same `fontdb` database is
//! later given to usvg, so the widths used for layout come from the faces
//! that end up rasterized.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};
use usvg::fontdb::{Database, Family, ID, Query, Stretch, Style, Weight};

/// Families mapped to the generic `sans-serif` slot, in preference order.
const PREFERRED_SANS: [&str; 3] = ["Inter", "Noto Sans", "Montserrat"];

// Used when no face resolves at all (e.g. a host without fonts).
const FALLBACK_ADVANCE_EM: f64 = 0.55;
const FALLBACK_SPACE_EM: f64 = 0.28;
const FALLBACK_ASCENT_EM: f64 = 0.8;
const FALLBACK_DESCENT_EM: f64 = -0.2;

/// A CSS-like font request: family stack, weight, style and pixel size.
#[derive(Clone, Debug, PartialEq)]
pub struct Font {
    pub families: &'static [&'static str],
    pub weight: u16,
    pub italic: bool,
    pub size: f64,
}

impl Font {
    pub const fn new(families: &'static [&'static str], weight: u16, size: f64) -> Self {
        Font {
            families,
            weight,
            italic: false,
            size,
        }
    }

    pub const fn italic(self) -> Self {
        Font {
            italic: true,
            ..self
        }
    }

    pub fn with_size(&self, size: f64) -> Self {
        Font {
            size,
            ..self.clone()
        }
    }

    /// Family stack formatted for an SVG `font-family` attribute.
    pub fn family_list(&self) -> String {
        self.families
            .iter()
            .map(|name| {
                if is_generic(name) {
                    (*name).to_string()
                } else {
                    format!("'{name}'")
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Ascent (positive, above the baseline) and descent (negative) in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VerticalMetrics {
    pub ascent: f64,
    pub descent: f64,
}

struct FaceCache {
    units_per_em: f64,
    ascender: f64,
    descender: f64,
    notdef: f64,
    advances: HashMap<char, f64>,
}

type QueryKey = (String, u16, bool);

pub struct FontRegistry {
    db: Arc<Database>,
    queries: Mutex<HashMap<QueryKey, Option<ID>>>,
    faces: Mutex<HashMap<ID, Option<FaceCache>>>,
}

impl FontRegistry {
    /// Load system fonts plus every face found in `extra_dir`.
    pub fn load(extra_dir: Option<&Path>) -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        if let Some(dir) = extra_dir {
            if dir.is_dir() {
                let before = db.len();
                db.load_fonts_dir(dir);
                info!(
                    "registered {} font faces from {}",
                    db.len() - before,
                    dir.display()
                );
            } else {
                warn!("font directory {} not found; using system fonts only", dir.display());
            }
        }
        Self::from_database(db)
    }

    /// A registry with no faces. Measurement falls back to fixed em advances.
    pub fn empty() -> Self {
        Self::from_database(Database::new())
    }

    pub fn from_database(mut db: Database) -> Self {
        if let Some(name) = pick_sans_family(&db) {
            debug!("mapping sans-serif to {name}");
            db.set_sans_serif_family(name);
        }
        if db.is_empty() {
            warn!("no font faces available; text will not be rasterized");
        }
        FontRegistry {
            db: Arc::new(db),
            queries: Mutex::new(HashMap::new()),
            faces: Mutex::new(HashMap::new()),
        }
    }

    /// Shared handle for usvg's `Options::fontdb`.
    pub fn database(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Horizontal advance of `text` in pixels.
    pub fn measure(&self, text: &str, font: &Font) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let Some(id) = self.resolve(font) else {
            return fallback_width(text, font.size);
        };
        let mut faces = lock(&self.faces);
        let Some(face) = faces.entry(id).or_insert_with(|| self.load_face(id)) else {
            return fallback_width(text, font.size);
        };
        let missing: Vec<char> = text
            .chars()
            .filter(|c| !face.advances.contains_key(c))
            .collect();
        if !missing.is_empty() {
            self.fill_advances(id, face, &missing);
        }
        let units: f64 = text
            .chars()
            .map(|c| face.advances.get(&c).copied().unwrap_or(face.notdef))
            .sum();
        units * font.size / face.units_per_em
    }

    pub fn vertical_metrics(&self, font: &Font) -> VerticalMetrics {
        let fallback = VerticalMetrics {
            ascent: FALLBACK_ASCENT_EM * font.size,
            descent: FALLBACK_DESCENT_EM * font.size,
        };
        let Some(id) = self.resolve(font) else {
            return fallback;
        };
        let mut faces = lock(&self.faces);
        match faces.entry(id).or_insert_with(|| self.load_face(id)) {
            Some(face) => VerticalMetrics {
                ascent: face.ascender * font.size / face.units_per_em,
                descent: face.descender * font.size / face.units_per_em,
            },
            None => fallback,
        }
    }

    fn resolve(&self, font: &Font) -> Option<ID> {
        let key = (font.families.join(","), font.weight, font.italic);
        let mut queries = lock(&self.queries);
        *queries.entry(key).or_insert_with(|| {
            let families: Vec<Family<'_>> =
                font.families.iter().map(|name| to_family(name)).collect();
            let query = Query {
                families: &families,
                weight: Weight(font.weight),
                stretch: Stretch::Normal,
                style: if font.italic {
                    Style::Italic
                } else {
                    Style::Normal
                },
            };
            self.db.query(&query)
        })
    }

    fn load_face(&self, id: ID) -> Option<FaceCache> {
        self.db
            .with_face_data(id, |data, index| {
                let face = ttf_parser::Face::parse(data, index).ok()?;
                let units_per_em = f64::from(face.units_per_em());
                let notdef = face
                    .glyph_hor_advance(ttf_parser::GlyphId(0))
                    .map(f64::from)
                    .unwrap_or(units_per_em * 0.5);
                Some(FaceCache {
                    units_per_em,
                    ascender: f64::from(face.ascender()),
                    descender: f64::from(face.descender()),
                    notdef,
                    advances: HashMap::new(),
                })
            })
            .flatten()
    }

    fn fill_advances(&self, id: ID, cache: &mut FaceCache, missing: &[char]) {
        self.db.with_face_data(id, |data, index| {
            let Ok(face) = ttf_parser::Face::parse(data, index) else {
                return;
            };
            for &c in missing {
                if let Some(advance) = face
                    .glyph_index(c)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                {
                    cache.advances.insert(c, f64::from(advance));
                }
            }
        });
        // Characters the face lacks are pinned to .notdef so they are not re-queried.
        for &c in missing {
            cache.advances.entry(c).or_insert(cache.notdef);
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

fn is_generic(name: &str) -> bool {
    matches!(name, "sans-serif" | "serif" | "monospace" | "cursive" | "fantasy")
}

fn to_family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

fn pick_sans_family(db: &Database) -> Option<String> {
    let has_family = |wanted: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(name, _)| name == wanted))
    };
    if let Some(name) = PREFERRED_SANS.iter().find(|name| has_family(name)) {
        return Some((*name).to_string());
    }
    db.faces()
        .next()
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
}

fn fallback_width(text: &str, size: f64) -> f64 {
    text.chars()
        .map(|c| {
            if c.is_whitespace() {
                FALLBACK_SPACE_EM
            } else {
                FALLBACK_ADVANCE_EM
            }
        })
        .sum::<f64>()
        * size
}
