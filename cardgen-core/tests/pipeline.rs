use std::fs;
use std::path::Path;

use cardgen_core::raster::load_png;
use cardgen_core::{CardError, Category, Config, Generation, Pipeline};
use fonts::FontRegistry;

fn project(csvs: &[(&str, &str)]) -> (tempfile::TempDir, Config) {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    for (name, body) in csvs {
        fs::write(data.join(name), body).unwrap();
    }
    let mut config = Config::resolve(tmp.path(), None, None);
    config.generation = Generation::Legacy;
    (tmp, config)
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn copies_become_numbered_files() {
    let (_tmp, config) = project(&[(
        "abilities.csv",
        "ID,Title,Text,Copies\n101,Fix Bug,Resolve the crash.,2\n",
    )]);
    let fonts = FontRegistry::empty();
    let written = Pipeline::new(&config, &fonts).generate(Category::Abilities).unwrap();
    assert_eq!(written, 2);

    let dir = config.output_path("abilities");
    assert_eq!(listing(&dir), vec!["101-copy1.png", "101-copy2.png"]);
    let card = load_png(&dir.join("101-copy1.png")).unwrap();
    assert_eq!((card.width(), card.height()), (490, 490));
}

#[test]
fn control_characters_in_cells_still_render() {
    let (_tmp, config) = project(&[(
        "abilities.csv",
        "ID,Title,Text,Copies\n101,Fix Bug,Resolve the crash.,1\n102,Bad\u{8}Title,Body\u{b}text,1\n",
    )]);
    let fonts = FontRegistry::empty();
    let written = Pipeline::new(&config, &fonts).generate(Category::Abilities).unwrap();
    assert_eq!(written, 2);
    assert_eq!(listing(&config.output_path("abilities")), vec!["101.png", "102.png"]);
}

#[test]
fn byte_order_mark_does_not_hide_the_first_column() {
    let (_tmp, config) = project(&[("features.csv", "\u{feff}ID,Title\nF7,Dark Mode\n")]);
    let fonts = FontRegistry::empty();
    Pipeline::new(&config, &fonts).generate(Category::Features).unwrap();
    assert_eq!(listing(&config.output_path("features")), vec!["F7.png"]);
}

#[test]
fn regenerating_replaces_stale_output() {
    let (_tmp, config) = project(&[("goals.csv", "ID,Title\nG1,Launch\n")]);
    let stale = config.output_path("goals");
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join("old.png"), b"stale").unwrap();

    let fonts = FontRegistry::empty();
    Pipeline::new(&config, &fonts).generate(Category::Goals).unwrap();
    assert_eq!(listing(&stale), vec!["G1.png"]);
    let goal = load_png(&stale.join("G1.png")).unwrap();
    assert_eq!((goal.width(), goal.height()), (368, 490));
}

#[test]
fn addon_rows_produce_nothing_when_ignored() {
    let (_tmp, mut config) = project(&[(
        "tickets.csv",
        "Title,Category,Addon,Copies\nLogin,TECH,Chaos,3\n",
    )]);
    config.ignore_addon_records = true;
    let fonts = FontRegistry::empty();
    let written = Pipeline::new(&config, &fonts).generate(Category::Tickets).unwrap();
    assert_eq!(written, 0);
    assert!(listing(&config.output_path("tickets")).is_empty());
}

#[test]
fn missing_founder_aborts_roles() {
    let (_tmp, config) = project(&[("roles.csv", "Title,Text\nEngineer,Builds things.\n")]);
    let fonts = FontRegistry::empty();
    let err = Pipeline::new(&config, &fonts).generate(Category::Roles).unwrap_err();
    assert!(matches!(err, CardError::MissingRecord(_)));
    assert!(err.to_string().contains("The Founder"));
}

#[test]
fn roles_write_shared_back_outside_the_count() {
    let (_tmp, config) = project(&[(
        "roles.csv",
        "Title,Text\nThe Founder,Starts it all.\nEngineer,Builds things.\n,\n",
    )]);
    let fonts = FontRegistry::empty();
    let written = Pipeline::new(&config, &fonts).generate(Category::Roles).unwrap();
    assert_eq!(written, 2);
    assert_eq!(
        listing(&config.output_path("roles")),
        vec!["Engineer.png", "The_Founder.png"]
    );
    assert!(config.misc_dir().join("role-back.png").exists());
}

#[test]
fn milestones_count_faces_and_backs() {
    let (_tmp, config) = project(&[("milestones.csv", "ID,Title,Tier,Copies\nM1,Beta,1,5\n")]);
    let fonts = FontRegistry::empty();
    let written = Pipeline::new(&config, &fonts).generate(Category::Milestones).unwrap();
    assert_eq!(written, 2);
    assert_eq!(
        listing(&config.output_path("milestones")),
        vec!["M1.png", "back-M1.png"]
    );
}

#[test]
fn missing_csv_is_an_io_error() {
    let (_tmp, config) = project(&[]);
    let fonts = FontRegistry::empty();
    let err = Pipeline::new(&config, &fonts).generate(Category::Problems).unwrap_err();
    assert!(matches!(err, CardError::Io { .. }));
}

#[test]
fn misc_and_templates_cover_every_card_type() {
    let (_tmp, config) = project(&[]);
    let fonts = FontRegistry::empty();
    let pipeline = Pipeline::new(&config, &fonts);

    assert_eq!(pipeline.generate_misc().unwrap(), 5);
    assert_eq!(
        listing(&config.misc_dir()),
        vec![
            "keystone-back.png",
            "player-deck.png",
            "role-back.png",
            "role.png",
            "work-deck.png"
        ]
    );

    assert_eq!(pipeline.render_templates().unwrap(), 11);
    let templates = listing(&config.templates_dir());
    assert!(templates.contains(&"tickets.png".to_string()));
    assert!(templates.contains(&"milestones-back.png".to_string()));
    let ticket = load_png(&config.templates_dir().join("tickets.png")).unwrap();
    assert_eq!(ticket.width(), 768);
}
