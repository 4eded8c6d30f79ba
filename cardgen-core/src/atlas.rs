//! Print sheets: rendered cards tiled into fixed grids.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use futures::executor::block_on;
use futures::future::try_join_all;
use log::{debug, info, warn};
use tiny_skia::{Color as SkColor, FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::config::Config;
use crate::error::{CardError, Result};
use crate::geometry::Generation;
use crate::pipeline::Category;
use crate::raster::{encode_png, load_png};

/// Columns and rows of one sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    pub columns: u32,
    pub rows: u32,
}

impl Grid {
    pub const fn new(columns: u32, rows: u32) -> Self {
        Grid { columns, rows }
    }

    pub fn capacity(&self) -> usize {
        (self.columns * self.rows) as usize
    }

    /// The grid itself, or an error when it has no cells.
    pub fn validated(self) -> Result<Self> {
        if self.columns == 0 || self.rows == 0 {
            return Err(CardError::EmptyGrid {
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok(self)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(10, 7)
    }
}

/// Which files in a source directory belong to a group.
///
/// Card directories only ever mix faces with `back-` prefixed backs, so these
/// three cover every group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    AllPng,
    /// PNGs without the `back-` prefix.
    Faces,
    /// PNGs with the `back-` prefix.
    Backs,
}

impl Selection {
    pub fn matches(self, name: &str) -> bool {
        if !name.ends_with(".png") {
            return false;
        }
        match self {
            Selection::AllPng => true,
            Selection::Faces => !name.starts_with("back-"),
            Selection::Backs => name.starts_with("back-"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardGroup {
    pub label: String,
    /// Sheet names are `{prefix}-{NN}.png`.
    pub prefix: String,
    pub source_dir: PathBuf,
    pub selection: Selection,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl CardGroup {
    pub fn new(label: &str, prefix: &str, source_dir: PathBuf, selection: Selection, cell: (u32, u32)) -> Self {
        CardGroup {
            label: label.to_string(),
            prefix: prefix.to_string(),
            source_dir,
            selection,
            cell_width: cell.0,
            cell_height: cell.1,
        }
    }
}

/// The sheets every build produces, in the reference cell sizes.
pub fn default_groups(config: &Config) -> Vec<CardGroup> {
    let (square, rect) = (Generation::Legacy.square(), Generation::Legacy.rect());
    let square = (square.width, square.height);
    let rect = (rect.width, rect.height);
    let dir = |category: Category| config.output_path(category.name());
    vec![
        CardGroup::new("Milestone faces", "milestone-faces", dir(Category::Milestones), Selection::Faces, square),
        CardGroup::new("Milestone backs", "milestone-backs", dir(Category::Milestones), Selection::Backs, square),
        CardGroup::new("Feature faces", "feature-faces", dir(Category::Features), Selection::AllPng, square),
        CardGroup::new("Ability faces", "ability-faces", dir(Category::Abilities), Selection::AllPng, square),
        CardGroup::new("Keystone faces", "keystone-faces", dir(Category::Keystones), Selection::AllPng, square),
        CardGroup::new("Goal faces", "goal-faces", dir(Category::Goals), Selection::AllPng, rect),
        CardGroup::new("Role faces", "role-faces", dir(Category::Roles), Selection::AllPng, rect),
        CardGroup::new("Ticket faces", "ticket-faces", dir(Category::Tickets), Selection::AllPng, square),
        CardGroup::new("Problem faces", "problem-faces", dir(Category::Problems), Selection::AllPng, square),
    ]
}

/// Where one source image lands, in grid units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub source: String,
    pub column: u32,
    pub row: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetPlan {
    pub file_name: String,
    pub cells: Vec<Cell>,
}

/// Chunk `files` in order into sheets, filling rows left to right.
pub fn plan_sheets(prefix: &str, files: &[String], grid: Grid) -> Vec<SheetPlan> {
    let capacity = grid.capacity().max(1);
    let columns = grid.columns.max(1);
    files
        .chunks(capacity)
        .enumerate()
        .map(|(sheet, batch)| SheetPlan {
            file_name: format!("{prefix}-{:02}.png", sheet + 1),
            cells: batch
                .iter()
                .enumerate()
                .map(|(i, source)| Cell {
                    source: source.clone(),
                    column: i as u32 % columns,
                    row: i as u32 / columns,
                })
                .collect(),
        })
        .collect()
}

/// Sorted matching file names. A missing directory lists as empty.
pub fn list_sources(group: &CardGroup) -> Result<Vec<String>> {
    let entries = match fs::read_dir(&group.source_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CardError::io(&group.source_dir, e)),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CardError::io(&group.source_dir, e))?;
        if let Some(name) = entry.file_name().to_str() {
            if group.selection.matches(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Sheet number of `name` if it is `{prefix}-NN.png`.
fn sheet_number(prefix: &str, name: &str) -> Option<usize> {
    let digits = name.strip_prefix(prefix)?.strip_prefix('-')?.strip_suffix(".png")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Delete `{prefix}-NN.png` sheets numbered above `keep`, left by a larger earlier run.
fn remove_stale_sheets(prefix: &str, dest_dir: &Path, keep: usize) -> Result<()> {
    let entries = match fs::read_dir(dest_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(CardError::io(dest_dir, e)),
    };
    for entry in entries {
        let entry = entry.map_err(|e| CardError::io(dest_dir, e))?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if sheet_number(prefix, &name).is_some_and(|n| n > keep) {
            let path = entry.path();
            fs::remove_file(&path).map_err(|e| CardError::io(&path, e))?;
            debug!("removed stale sheet {name}");
        }
    }
    Ok(())
}

/// Build every sheet for `group` into `dest_dir`. Returns the sheet paths.
pub fn build_atlas(group: &CardGroup, dest_dir: &Path, grid: Grid) -> Result<Vec<PathBuf>> {
    let grid = grid.validated()?;
    let files = list_sources(group)?;
    let sheets = plan_sheets(&group.prefix, &files, grid);
    remove_stale_sheets(&group.prefix, dest_dir, sheets.len())?;
    if sheets.is_empty() {
        warn!("no cards found for {}, skipping", group.label);
        return Ok(Vec::new());
    }
    fs::create_dir_all(dest_dir).map_err(|e| CardError::io(dest_dir, e))?;

    let (cell_w, cell_h) = (group.cell_width, group.cell_height);
    let (width, height) = (grid.columns * cell_w, grid.rows * cell_h);
    let mut written = Vec::new();
    for sheet in sheets {
        let mut canvas = Pixmap::new(width, height).ok_or(CardError::Canvas { width, height })?;
        canvas.fill(SkColor::WHITE);
        for cell in &sheet.cells {
            let image = load_png(&group.source_dir.join(&cell.source))?;
            let sx = f64::from(cell_w) / f64::from(image.width());
            let sy = f64::from(cell_h) / f64::from(image.height());
            let transform = Transform::from_row(
                sx as f32,
                0.0,
                0.0,
                sy as f32,
                (cell.column * cell_w) as f32,
                (cell.row * cell_h) as f32,
            );
            let paint = PixmapPaint {
                quality: FilterQuality::Bicubic,
                ..PixmapPaint::default()
            };
            canvas.draw_pixmap(0, 0, image.as_ref(), &paint, transform, None);
        }
        let path = dest_dir.join(&sheet.file_name);
        encode_png(&canvas, &path)?;
        info!("saved {} with {} cards", sheet.file_name, sheet.cells.len());
        written.push(path);
    }
    Ok(written)
}

/// Build all `groups` jointly. Sheets come back in group order.
pub fn build_all_atlases(groups: &[CardGroup], dest_dir: &Path, grid: Grid) -> Result<Vec<PathBuf>> {
    let grid = grid.validated()?;
    let builds = groups
        .iter()
        .map(|group| async move { build_atlas(group, dest_dir, grid) });
    let sheets = block_on(try_join_all(builds))?;
    Ok(sheets.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i:03}.png")).collect()
    }

    #[test]
    fn selection_splits_faces_from_backs() {
        assert!(Selection::Faces.matches("M1.png"));
        assert!(!Selection::Faces.matches("back-M1.png"));
        assert!(Selection::Backs.matches("back-M1.png"));
        assert!(!Selection::AllPng.matches("notes.txt"));
    }

    #[test]
    fn sheets_are_numbered_from_one_with_padding() {
        let plan = plan_sheets("ability-faces", &files(71), Grid::default());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].file_name, "ability-faces-01.png");
        assert_eq!(plan[1].file_name, "ability-faces-02.png");
        assert_eq!(plan[0].cells.len(), 70);
        assert_eq!(plan[1].cells, vec![Cell { source: "070.png".into(), column: 0, row: 0 }]);
    }

    #[test]
    fn cells_fill_rows_left_to_right() {
        let plan = plan_sheets("x", &files(12), Grid::default());
        let eleventh = &plan[0].cells[11];
        assert_eq!((eleventh.column, eleventh.row), (1, 1));
    }

    #[test]
    fn default_groups_use_reference_cells() {
        let config = Config::resolve(Path::new("/proj"), None, None);
        let groups = default_groups(&config);
        assert_eq!(groups.len(), 9);
        let goal = groups.iter().find(|g| g.prefix == "goal-faces").unwrap();
        assert_eq!((goal.cell_width, goal.cell_height), (368, 490));
        assert_eq!(goal.source_dir, Path::new("/proj/outputs/goals"));
    }

    #[test]
    fn sheet_numbers_need_the_exact_prefix() {
        assert_eq!(sheet_number("goal-faces", "goal-faces-03.png"), Some(3));
        assert_eq!(sheet_number("goal-faces", "goal-faces-extra-03.png"), None);
        assert_eq!(sheet_number("goal", "goal-faces-03.png"), None);
        assert_eq!(sheet_number("goal-faces", "goal-faces-.png"), None);
    }

    #[test]
    fn empty_grid_is_rejected_before_touching_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("goals");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("G1.png"), b"not decoded").unwrap();
        let group = CardGroup::new("Goals", "goal-faces", src, Selection::AllPng, (4, 4));
        let dest = tmp.path().join("atlases");

        let err = build_atlas(&group, &dest, Grid::new(0, 7)).unwrap_err();
        assert!(matches!(err, CardError::EmptyGrid { columns: 0, rows: 7 }));
        assert!(build_all_atlases(&[group], &dest, Grid::new(10, 0)).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn missing_source_builds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let group = CardGroup::new(
            "Ghosts",
            "ghost",
            tmp.path().join("missing"),
            Selection::AllPng,
            (4, 4),
        );
        let sheets = build_atlas(&group, &tmp.path().join("atlases"), Grid::default()).unwrap();
        assert!(sheets.is_empty());
        assert!(!tmp.path().join("atlases").exists());
    }
}
