//! CSV to PNG generation, one category at a time.
//!
//! Planning (filters, slugs, copy expansion) is pure and lives in
//! [`plan_outputs`]; [`Pipeline`] reads the CSV, renders the plan and writes
//! every file as a joint set of futures.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use fonts::FontRegistry;
use futures::executor::block_on;
use futures::future::try_join_all;
use log::{info, warn};

use crate::cards::{
    RenderContext, ability, feature, goal, keystone, milestone, misc::MiscCard, problem, role, ticket,
};
use crate::config::Config;
use crate::error::{CardError, Result};
use crate::record::{CardRecord, copy_file_names, field, read_records, slug_from};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Abilities,
    Features,
    Goals,
    Keystones,
    Milestones,
    Roles,
    Tickets,
    Problems,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Abilities,
        Category::Features,
        Category::Goals,
        Category::Keystones,
        Category::Milestones,
        Category::Roles,
        Category::Tickets,
        Category::Problems,
    ];

    /// Directory and CSV stem.
    pub fn name(self) -> &'static str {
        match self {
            Category::Abilities => "abilities",
            Category::Features => "features",
            Category::Goals => "goals",
            Category::Keystones => "keystones",
            Category::Milestones => "milestones",
            Category::Roles => "roles",
            Category::Tickets => "tickets",
            Category::Problems => "problems",
        }
    }

    /// Singular noun, also the last-resort slug.
    pub fn word(self) -> &'static str {
        match self {
            Category::Abilities => "ability",
            Category::Features => "feature",
            Category::Goals => "goal",
            Category::Keystones => "keystone",
            Category::Milestones => "milestone",
            Category::Roles => "role",
            Category::Tickets => "ticket",
            Category::Problems => "problem",
        }
    }

    pub fn csv_file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    /// Whether the `Copies` column multiplies faces.
    pub fn expands_copies(self) -> bool {
        !matches!(
            self,
            Category::Keystones | Category::Milestones | Category::Roles
        )
    }

    fn requires_title(self) -> bool {
        matches!(self, Category::Goals | Category::Roles)
    }

    pub fn slug(self, record: &CardRecord) -> String {
        match self {
            Category::Roles => slug_from(&[record.title()], "Role"),
            Category::Tickets => ticket::file_slug(record),
            Category::Problems => problem::file_slug(record),
            _ => slug_from(
                &[field(&record.id), record.title()],
                self.word(),
            ),
        }
    }

    pub fn render<'a>(self, ctx: &RenderContext<'a>, record: &CardRecord, blank: bool) -> Surface<'a> {
        match self {
            Category::Abilities => ability::render(ctx, record, blank),
            Category::Features => feature::render(ctx, record, blank),
            Category::Goals => goal::render(ctx, record, blank),
            Category::Keystones => keystone::render(ctx, record, blank),
            Category::Milestones => milestone::render(ctx, record, blank),
            Category::Roles => role::render(ctx, record, blank),
            Category::Tickets => ticket::render(ctx, record, blank),
            Category::Problems => problem::render(ctx, record, blank),
        }
    }

    /// Back shared by every card of the category, written to the misc directory.
    fn shared_back<'a>(self, ctx: &RenderContext<'a>, blank: bool) -> Option<(&'static str, Surface<'a>)> {
        match self {
            Category::Keystones => Some((keystone::BACK_FILE_NAME, keystone::render_back(ctx, blank))),
            Category::Roles => Some((role::BACK_FILE_NAME, role::render_back(ctx, blank))),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the plural directory name or the singular noun, in any case.
    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.word() == wanted)
            .ok_or_else(|| format!("unknown category `{raw}`"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Face,
    Back,
}

/// One file the category will produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedCard {
    /// Index into the parsed record list.
    pub record: usize,
    pub file_name: String,
    pub side: Side,
}

/// Files to write for `records`, after the ignore rule and category filters.
///
/// Fails only when roles lack The Founder.
pub fn plan_outputs(
    category: Category,
    records: &[CardRecord],
    ignore_addon_records: bool,
) -> Result<Vec<PlannedCard>> {
    let kept: Vec<(usize, &CardRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_ignored(ignore_addon_records))
        .filter(|(_, r)| !category.requires_title() || !r.title().is_empty())
        .collect();

    if category == Category::Roles && !kept.iter().any(|(_, r)| role::is_founder(r)) {
        return Err(CardError::MissingRecord(format!(
            "{} has no \"{}\" record",
            category.csv_file_name(),
            role::FOUNDER_TITLE
        )));
    }

    let mut planned: Vec<PlannedCard> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut push = |card: PlannedCard| match by_name.get(&card.file_name) {
        // Later rows win, as they would by overwriting the file.
        Some(&at) => {
            warn!(
                "{}: rows {} and {} both write {}, keeping the later one",
                category.csv_file_name(),
                planned[at].record + 1,
                card.record + 1,
                card.file_name
            );
            planned[at] = card;
        }
        None => {
            by_name.insert(card.file_name.clone(), planned.len());
            planned.push(card);
        }
    };
    for (index, record) in kept {
        let slug = category.slug(record);
        let names = if category.expands_copies() {
            copy_file_names(&slug, record.copy_count())
        } else {
            vec![format!("{slug}.png")]
        };
        for file_name in names {
            push(PlannedCard {
                record: index,
                file_name,
                side: Side::Face,
            });
        }
        if category == Category::Milestones {
            push(PlannedCard {
                record: index,
                file_name: milestone::back_file_name(&slug),
                side: Side::Back,
            });
        }
    }
    Ok(planned)
}

/// Remove `dir` if present and recreate it empty.
pub(crate) fn reset_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(CardError::io(dir, e)),
    }
    fs::create_dir_all(dir).map_err(|e| CardError::io(dir, e))
}

pub struct Pipeline<'a> {
    config: &'a Config,
    fonts: &'a FontRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, fonts: &'a FontRegistry) -> Self {
        Pipeline { config, fonts }
    }

    pub fn context(&self) -> RenderContext<'a> {
        RenderContext::new(self.fonts, self.config.locale, self.config.generation)
    }

    /// Render every planned file for `csv_path` into a fresh `output_dir`.
    /// Returns the number of files written there.
    pub fn generate_category(&self, category: Category, csv_path: &Path, output_dir: &Path) -> Result<usize> {
        let records = read_records(csv_path)?;
        let plan = plan_outputs(category, &records, self.config.ignore_addon_records)?;
        reset_dir(output_dir)?;

        let ctx = self.context();
        let writes = plan.iter().map(|card| {
            let record = &records[card.record];
            let path = output_dir.join(&card.file_name);
            async move {
                let surface = match card.side {
                    Side::Face => category.render(&ctx, record, false),
                    Side::Back => milestone::render_back(&ctx, record, false),
                };
                surface.write_png(&path)
            }
        });
        block_on(try_join_all(writes))?;
        info!(
            "generated {} {} in {}",
            plan.len(),
            category,
            output_dir.display()
        );

        if let Some((name, surface)) = category.shared_back(&ctx, false) {
            let misc = self.config.misc_dir();
            fs::create_dir_all(&misc).map_err(|e| CardError::io(&misc, e))?;
            surface.write_png(&misc.join(name))?;
        }
        Ok(plan.len())
    }

    /// `data/{category}.csv` into `{output_root}/{category}`.
    pub fn generate(&self, category: Category) -> Result<usize> {
        let csv_path = self.config.data_dir.join(category.csv_file_name());
        let output_dir = self.config.output_path(category.name());
        self.generate_category(category, &csv_path, &output_dir)
    }

    /// Deck backs plus the shared keystone and role backs.
    pub fn generate_misc(&self) -> Result<usize> {
        let dir = self.config.misc_dir();
        fs::create_dir_all(&dir).map_err(|e| CardError::io(&dir, e))?;
        let ctx = self.context();

        let mut surfaces: Vec<(&'static str, Surface<'a>)> = MiscCard::ALL
            .into_iter()
            .map(|card| (card.file_name(), card.render(&ctx)))
            .collect();
        for category in [Category::Keystones, Category::Roles] {
            surfaces.extend(category.shared_back(&ctx, false));
        }
        let writes = surfaces.iter().map(|(name, surface)| {
            let path = dir.join(name);
            async move { surface.write_png(&path) }
        });
        block_on(try_join_all(writes))?;
        info!("generated {} misc cards in {}", surfaces.len(), dir.display());
        Ok(surfaces.len())
    }

    /// Blank render of every category into a fresh templates directory.
    pub fn render_templates(&self) -> Result<usize> {
        let dir = self.config.templates_dir();
        reset_dir(&dir)?;
        let ctx = self.context();
        let record = CardRecord::default();

        let mut surfaces: Vec<(String, Surface<'a>)> = Category::ALL
            .into_iter()
            .map(|category| (format!("{category}.png"), category.render(&ctx, &record, true)))
            .collect();
        surfaces.push((
            "milestones-back.png".to_string(),
            milestone::render_back(&ctx, &record, true),
        ));
        for category in [Category::Keystones, Category::Roles] {
            if let Some((_, surface)) = category.shared_back(&ctx, true) {
                surfaces.push((format!("{category}-back.png"), surface));
            }
        }

        let writes = surfaces.iter().map(|(name, surface)| {
            let path = dir.join(name);
            async move { surface.write_png(&path) }
        });
        block_on(try_join_all(writes))?;
        info!("rendered {} blank templates in {}", surfaces.len(), dir.display());
        Ok(surfaces.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_records;

    fn names(plan: &[PlannedCard]) -> Vec<&str> {
        plan.iter().map(|p| p.file_name.as_str()).collect()
    }

    #[test]
    fn categories_parse_from_either_form() {
        assert_eq!("abilities".parse::<Category>(), Ok(Category::Abilities));
        assert_eq!(" Milestone ".parse::<Category>(), Ok(Category::Milestones));
        assert!("cards".parse::<Category>().is_err());
        assert_eq!(Category::Tickets.csv_file_name(), "tickets.csv");
    }

    #[test]
    fn copies_expand_for_abilities() {
        let records = parse_records("ID,Title,Text,Copies\n101,Fix Bug,Resolve the crash.,2\n102,Ship,,\n").unwrap();
        let plan = plan_outputs(Category::Abilities, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["101-copy1.png", "101-copy2.png", "102.png"]);
        assert_eq!(plan[2].record, 1);
    }

    #[test]
    fn slug_falls_back_from_id_to_title_to_word() {
        let records = parse_records("ID,Title\n,Dark Mode!\n,\n").unwrap();
        let plan = plan_outputs(Category::Features, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["Dark_Mode_.png", "feature.png"]);
    }

    #[test]
    fn duplicate_slugs_keep_the_later_row() {
        let records = parse_records("ID,Title,Copies\nA1,First,2\nA1,Second,1\nA2,Other,1\n").unwrap();
        let plan = plan_outputs(Category::Abilities, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["A1-copy1.png", "A1-copy2.png", "A1.png", "A2.png"]);

        let records = parse_records("Title\nThe Founder\nEngineer\nEngineer\n").unwrap();
        let plan = plan_outputs(Category::Roles, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["The_Founder.png", "Engineer.png"]);
        assert_eq!(plan[1].record, 2);
    }

    #[test]
    fn keystones_ignore_copies() {
        let records = parse_records("ID,Title,Copies\nK1,Core,4\n").unwrap();
        let plan = plan_outputs(Category::Keystones, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["K1.png"]);
    }

    #[test]
    fn milestones_plan_face_and_back() {
        let records = parse_records("ID,Title,Tier\nM1,Beta,2\n").unwrap();
        let plan = plan_outputs(Category::Milestones, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["M1.png", "back-M1.png"]);
        assert_eq!(plan[1].side, Side::Back);
    }

    #[test]
    fn addon_rows_are_dropped_when_ignoring() {
        let records = parse_records("ID,Title,Addon,Copies\nA,One,,1\nB,Two,Chaos,3\n").unwrap();
        assert_eq!(names(&plan_outputs(Category::Abilities, &records, true).unwrap()), vec!["A.png"]);
        assert_eq!(plan_outputs(Category::Abilities, &records, false).unwrap().len(), 4);
    }

    #[test]
    fn roles_need_the_founder() {
        let records = parse_records("Title\nEngineer\n\n").unwrap();
        let err = plan_outputs(Category::Roles, &records, false).unwrap_err();
        assert!(matches!(err, CardError::MissingRecord(_)));

        let records = parse_records("Title,Copies\nthe founder,3\nEngineer,2\n").unwrap();
        let plan = plan_outputs(Category::Roles, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["the_founder.png", "Engineer.png"]);
    }

    #[test]
    fn founder_in_an_ignored_addon_does_not_count() {
        let records = parse_records("Title,Addon\nThe Founder,Extra\nEngineer,\n").unwrap();
        assert!(plan_outputs(Category::Roles, &records, true).is_err());
    }

    #[test]
    fn goals_skip_untitled_rows() {
        let records = parse_records("ID,Title\nG1,\nG2,Launch\n").unwrap();
        let plan = plan_outputs(Category::Goals, &records, false).unwrap();
        assert_eq!(names(&plan), vec!["G2.png"]);
    }

    #[test]
    fn reset_dir_empties_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("out");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("stale.png"), b"x").unwrap();
        reset_dir(&dir).unwrap();
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
    }
}
