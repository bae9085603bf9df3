//! Command-line interface

use crate::config::{PackSelection, Settings};
use crate::game::budget::Speed;
use crate::game::pack::{WordPack, DEFAULT_LANGUAGE};
use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Last Word - take turns naming words from a pack, or be eliminated
#[derive(Parser, Debug)]
#[command(name = "lastword")]
#[command(about = "Elimination word game for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Player name, in turn order (repeat for each player)
    #[arg(short, long = "player", value_name = "NAME")]
    pub players: Vec<String>,

    /// Pack to play, by name
    #[arg(long)]
    pub pack: Option<String>,

    /// Load an extra pack from a JSON file and play it
    #[arg(long, value_name = "PATH", conflicts_with = "pack")]
    pub pack_file: Option<PathBuf>,

    /// Language code for the pack's words
    #[arg(short, long)]
    pub language: Option<String>,

    /// Turn speed: slow, medium or fast
    #[arg(short, long)]
    pub speed: Option<Speed>,

    /// Play without a turn timer
    #[arg(long)]
    pub no_timer: bool,

    /// Where to keep the database and log file
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// List the built-in packs and exit
    #[arg(long)]
    pub list_packs: bool,
}

impl Cli {
    /// Layer command-line choices over saved settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(speed) = self.speed {
            settings.speed = speed;
        }
        if self.no_timer {
            settings.has_timer = false;
        }
    }

    /// Read the pack named by `--pack-file`, if any
    pub fn load_pack_file(&self) -> Result<Option<WordPack>> {
        let Some(path) = &self.pack_file else {
            return Ok(None);
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading pack file {}", path.display()))?;
        let pack = WordPack::from_json(&json)
            .with_context(|| format!("parsing pack file {}", path.display()))?;
        Ok(Some(pack))
    }
}

/// Decide which pack and language to play.
///
/// Explicit requests must resolve or fail; a saved choice that no longer
/// resolves falls back to the first pack and one of its languages.
pub fn resolve_selection(
    requested_pack: Option<&str>,
    requested_language: Option<&str>,
    saved: Option<&PackSelection>,
    packs: &[WordPack],
) -> Result<PackSelection> {
    let find = |name: &str| packs.iter().find(|p| p.name.eq_ignore_ascii_case(name));

    let pack = match requested_pack {
        Some(name) => match find(name) {
            Some(pack) => pack,
            None => bail!("unknown pack '{}', try --list-packs", name),
        },
        None => match saved.and_then(|s| find(&s.name)).or_else(|| packs.first()) {
            Some(pack) => pack,
            None => bail!("no packs available"),
        },
    };

    let saved_language = saved
        .filter(|s| s.name.eq_ignore_ascii_case(&pack.name))
        .map(|s| s.language.as_str());
    let language = match requested_language {
        Some(code) => {
            pack.lookup(code)?;
            code.to_string()
        }
        None => saved_language
            .filter(|code| pack.has_language(code))
            .or_else(|| Some(DEFAULT_LANGUAGE).filter(|code| pack.has_language(code)))
            .or_else(|| pack.languages().next())
            .context("pack has no words")?
            .to_string(),
    };

    Ok(PackSelection::new(pack.name.clone(), language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::packs;

    fn catalogue() -> Vec<WordPack> {
        packs::all().to_vec()
    }

    #[test]
    fn test_parse_players_and_flags() {
        let cli = Cli::try_parse_from([
            "lastword", "-p", "Ann", "--player", "Bob", "--speed", "fast", "--no-timer",
        ])
        .unwrap();
        assert_eq!(cli.players, vec!["Ann", "Bob"]);

        let mut settings = Settings::default();
        cli.apply(&mut settings);
        assert_eq!(settings.speed, Speed::Fast);
        assert!(!settings.has_timer);
    }

    #[test]
    fn test_bad_speed_rejected() {
        assert!(Cli::try_parse_from(["lastword", "--speed", "warp"]).is_err());
    }

    #[test]
    fn test_pack_and_pack_file_conflict() {
        assert!(Cli::try_parse_from(["lastword", "--pack", "x", "--pack-file", "y.json"]).is_err());
    }

    #[test]
    fn test_defaults_to_first_pack() {
        let packs = catalogue();
        let selection = resolve_selection(None, None, None, &packs).unwrap();
        assert_eq!(selection, PackSelection::new(packs[0].name.clone(), "en"));
    }

    #[test]
    fn test_requested_pack_and_language() {
        let selection =
            resolve_selection(Some("zodiac signs"), Some("az"), None, &catalogue()).unwrap();
        assert_eq!(selection, PackSelection::new("Zodiac Signs", "az"));
    }

    #[test]
    fn test_unknown_requests_fail() {
        let packs = catalogue();
        assert!(resolve_selection(Some("Nope"), None, None, &packs).is_err());
        assert!(resolve_selection(Some("US States"), Some("az"), None, &packs).is_err());
    }

    #[test]
    fn test_saved_choice_used_then_dropped() {
        let packs = catalogue();
        let saved = PackSelection::new("Zodiac Signs", "az");
        assert_eq!(
            resolve_selection(None, None, Some(&saved), &packs).unwrap(),
            saved
        );

        let stale = PackSelection::new("Gone", "az");
        let selection = resolve_selection(None, None, Some(&stale), &packs).unwrap();
        assert_eq!(selection.name, packs[0].name);
        assert_eq!(selection.language, "en");
    }
}
