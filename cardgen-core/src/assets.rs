//! Output housekeeping: cleaning, mirroring into `public/`, and the download listing.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::config::Config;
use crate::error::{CardError, Result};
use crate::pipeline::reset_dir;

const SYNCED_DIRS: [&str; 2] = ["atlases", "misc"];

/// Remove the output root and recreate it empty.
pub fn clean_output_root(config: &Config) -> Result<()> {
    reset_dir(&config.output_root)?;
    info!("cleaned output root at {}", config.output_root.display());
    Ok(())
}

/// Mirror `atlases/` and `misc/` into the public root. Returns how many were copied.
pub fn sync_public_assets(config: &Config) -> Result<usize> {
    let mut synced = 0;
    for dir in SYNCED_DIRS {
        let src = config.output_path(dir);
        if !src.is_dir() {
            warn!("source directory not found: {}, skipping", src.display());
            continue;
        }
        let dest = config.public_root.join(dir);
        reset_dir(&dest)?;
        copy_dir(&src, &dest)?;
        synced += 1;
    }
    info!("synced {synced} asset directories into {}", config.public_root.display());
    Ok(synced)
}

fn copy_dir(src: &Path, dest: &Path) -> Result<()> {
    for entry in fs::read_dir(src).map_err(|e| CardError::io(src, e))? {
        let entry = entry.map_err(|e| CardError::io(src, e))?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if from.is_dir() {
            fs::create_dir_all(&to).map_err(|e| CardError::io(&to, e))?;
            copy_dir(&from, &to)?;
        } else {
            fs::copy(&from, &to).map_err(|e| CardError::io(&from, e))?;
        }
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssetEntry {
    pub file_name: String,
    pub href: String,
    pub card_count: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub atlases: Vec<AssetEntry>,
    pub misc: Vec<AssetEntry>,
}

/// `N` from a name ending in `-count-N.png`, any case. Zero counts as unknown.
pub fn parse_card_count(file_name: &str) -> Option<u32> {
    let lower = file_name.to_ascii_lowercase();
    let stem = lower.strip_suffix(".png")?;
    let (_, digits) = stem.rsplit_once("-count-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|n| *n > 0)
}

fn sorted_names(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CardError::io(dir, e)),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CardError::io(dir, e))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Everything downloadable under `public_root`, sorted by name.
pub fn build_listing(public_root: &Path) -> Result<Listing> {
    let atlases = sorted_names(&public_root.join("atlases"))?
        .into_iter()
        .map(|name| AssetEntry {
            href: format!("/atlases/{name}"),
            card_count: parse_card_count(&name),
            file_name: name,
        })
        .collect();
    let misc = sorted_names(&public_root.join("misc"))?
        .into_iter()
        .map(|name| AssetEntry {
            href: format!("/misc/{name}"),
            card_count: None,
            file_name: name,
        })
        .collect();
    Ok(Listing { atlases, misc })
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_index_html(listing: &Listing) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Card Atlases</title>\n</head>\n<body>\n<main>\n\
         <h1>Card Atlases &amp; Misc Assets</h1>\n\
         <p>Click any link below to download the raw artwork.</p>\n",
    );
    html.push_str("<section>\n<h2>Atlases</h2>\n");
    if listing.atlases.is_empty() {
        html.push_str("<p>No atlases have been generated yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for entry in &listing.atlases {
            let badge = match entry.card_count {
                Some(n) => format!("{n} cards"),
                None => "card count unknown".to_string(),
            };
            let _ = writeln!(
                html,
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a> <span class=\"badge\">{badge}</span></li>",
                escape_html(&entry.href),
                escape_html(&entry.file_name)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n<section>\n<h2>Misc Assets</h2>\n");
    if listing.misc.is_empty() {
        html.push_str("<p>No misc files have been generated yet.</p>\n");
    } else {
        html.push_str("<ul>\n");
        for entry in &listing.misc {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
                escape_html(&entry.href),
                escape_html(&entry.file_name)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str("</section>\n</main>\n</body>\n</html>\n");
    html
}

/// Write `index.html` and `listing.json` into `public_root`. Returns both paths.
pub fn write_listing(public_root: &Path, listing: &Listing) -> Result<[PathBuf; 2]> {
    fs::create_dir_all(public_root).map_err(|e| CardError::io(public_root, e))?;
    let html_path = public_root.join("index.html");
    fs::write(&html_path, render_index_html(listing)).map_err(|e| CardError::io(&html_path, e))?;
    let json_path = public_root.join("listing.json");
    let json = serde_json::to_string_pretty(listing)?;
    fs::write(&json_path, json).map_err(|e| CardError::io(&json_path, e))?;
    info!(
        "listed {} atlases and {} misc files in {}",
        listing.atlases.len(),
        listing.misc.len(),
        public_root.display()
    );
    Ok([html_path, json_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_count_needs_the_exact_suffix() {
        assert_eq!(parse_card_count("features-count-42.png"), Some(42));
        assert_eq!(parse_card_count("FEATURES-COUNT-7.PNG"), Some(7));
        assert_eq!(parse_card_count("features-count-0.png"), None);
        assert_eq!(parse_card_count("features-count-4b.png"), None);
        assert_eq!(parse_card_count("features-count-.png"), None);
        assert_eq!(parse_card_count("ability-faces-01.png"), None);
    }

    #[test]
    fn html_escapes_names_and_reports_empty_sections() {
        let listing = Listing {
            atlases: vec![AssetEntry {
                file_name: "a<b>-count-3.png".into(),
                href: "/atlases/a<b>-count-3.png".into(),
                card_count: Some(3),
            }],
            misc: Vec::new(),
        };
        let html = render_index_html(&listing);
        assert!(html.contains("a&lt;b&gt;-count-3.png"));
        assert!(!html.contains("a<b>"));
        assert!(html.contains("3 cards"));
        assert!(html.contains("No misc files have been generated yet."));
    }

    #[test]
    fn listing_is_sorted_and_tolerates_missing_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let atlases = tmp.path().join("atlases");
        fs::create_dir_all(&atlases).unwrap();
        fs::write(atlases.join("b-02.png"), b"").unwrap();
        fs::write(atlases.join("a-count-5.png"), b"").unwrap();

        let listing = build_listing(tmp.path()).unwrap();
        let names: Vec<_> = listing.atlases.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(names, vec!["a-count-5.png", "b-02.png"]);
        assert_eq!(listing.atlases[0].card_count, Some(5));
        assert_eq!(listing.atlases[1].href, "/atlases/b-02.png");
        assert!(listing.misc.is_empty());

        let [html, json] = write_listing(tmp.path(), &listing).unwrap();
        assert!(html.exists());
        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(parsed["atlases"][0]["card_count"], 5);
    }

    #[test]
    fn sync_replaces_destination_and_skips_missing_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::resolve(tmp.path(), None, None);
        let src = config.output_path("atlases");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("sheet-01.png"), b"png").unwrap();
        fs::write(src.join("nested").join("x.png"), b"x").unwrap();
        let stale = config.public_root.join("atlases");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("old.png"), b"old").unwrap();

        assert_eq!(sync_public_assets(&config).unwrap(), 1);
        assert_eq!(fs::read(stale.join("sheet-01.png")).unwrap(), b"png");
        assert!(stale.join("nested").join("x.png").exists());
        assert!(!stale.join("old.png").exists());
        assert!(!config.public_root.join("misc").exists());
    }

    #[test]
    fn clean_leaves_an_empty_root() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::resolve(tmp.path(), Some("out"), None);
        fs::create_dir_all(config.output_path("abilities")).unwrap();
        clean_output_root(&config).unwrap();
        assert!(config.output_root.is_dir());
        assert_eq!(fs::read_dir(&config.output_root).unwrap().count(), 0);
    }
}
