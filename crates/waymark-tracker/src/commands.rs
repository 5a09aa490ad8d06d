//! Tracker commands and the session they run against.
//!
//! A [`Session`] owns the loaded tree, the diagnostics gathered while
//! loading it, and the persistence settings. Each [`Command`] reads or
//! mutates the tree, writes a human-readable (or JSON) report, and, when
//! something changed, saves the snapshot if autosave is on.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;
use tracing::{debug, info};
use waymark_core::{LoadedPack, PackLoader, TrackerConfig, state};
use waymark_types::RuleSet;
use waymark_world::{
    Diagnostics, LocationTree, PropertyBridge, PropertyValue, Section, SectionProperty,
};

use crate::error::TrackerError;

/// One tracker operation.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show overall clearing progress
    Summary {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every section with its counter and access rules
    List {
        /// Only sections with items left
        #[arg(long)]
        remaining: bool,
    },

    /// Mark one item of a section collected
    Clear {
        /// Section path, `[@]<location id>/<section name>`
        path: String,

        /// Clear the whole section at once
        #[arg(long)]
        all: bool,
    },

    /// Undo one collected item of a section
    Unclear {
        /// Section path, `[@]<location id>/<section name>`
        path: String,
    },

    /// Set how many items of a section are still available
    SetAvailable {
        /// Section path, `[@]<location id>/<section name>`
        path: String,

        /// Remaining item count
        #[arg(allow_negative_numbers = true)]
        available: i64,
    },

    /// Print load diagnostics as JSON
    Check,
}

impl Command {
    const fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Clear { .. } | Self::Unclear { .. } | Self::SetAvailable { .. }
        )
    }
}

/// Totals reported by `summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Locations in the pack.
    pub locations: usize,
    /// Sections across all locations.
    pub sections: usize,
    /// Items across all sections.
    pub item_count: i64,
    /// Items collected.
    pub cleared: i64,
    /// Items left.
    pub remaining: i64,
    /// Diagnostics recorded while loading.
    pub diagnostics: usize,
}

/// A loaded tree plus persistence settings.
#[derive(Debug)]
pub struct Session {
    tree: LocationTree,
    diagnostics: Diagnostics,
    save_file: Option<PathBuf>,
    autosave: bool,
}

impl Session {
    /// Wrap an already-built tree; nothing is persisted.
    pub const fn new(tree: LocationTree, diagnostics: Diagnostics) -> Self {
        Self {
            tree,
            diagnostics,
            save_file: None,
            autosave: false,
        }
    }

    /// Load the configured pack and restore saved state if present.
    pub fn open(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let LoadedPack {
            mut tree,
            mut diagnostics,
        } = PackLoader::from_config(&config.pack).load()?;

        let saved = match &config.state.save_file {
            Some(path) => state::read_snapshot_if_exists(path)?,
            None => None,
        };
        if let Some(snapshot) = saved {
            let mut mismatches = state::restore(&mut tree, &snapshot);
            diagnostics.append(&mut mismatches);
        }

        Ok(Self {
            tree,
            diagnostics,
            save_file: config.state.save_file.clone(),
            autosave: config.state.autosave,
        })
    }

    /// Current totals.
    pub fn summary(&self) -> Summary {
        let progress = self.tree.progress();
        Summary {
            locations: self.tree.len(),
            sections: progress.sections,
            item_count: progress.item_count,
            cleared: progress.cleared,
            remaining: progress.remaining(),
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Run one command, writing its report to `out`.
    ///
    /// Returns whether the tree changed.
    pub fn run(&mut self, command: &Command, out: &mut impl Write) -> Result<bool, TrackerError> {
        let changed = match command {
            Command::Summary { json } => {
                self.write_summary(*json, out)?;
                false
            }
            Command::List { remaining } => {
                self.write_list(*remaining, out)?;
                false
            }
            Command::Check => {
                serde_json::to_writer_pretty(&mut *out, &self.diagnostics)?;
                writeln!(out)?;
                false
            }
            Command::Clear { path, all } => {
                let section = self.tree.find_section_mut(path)?;
                let changed = section.state_mut().clear_item(*all);
                report(out, path, section, changed, "already fully cleared")?;
                changed
            }
            Command::Unclear { path } => {
                let section = self.tree.find_section_mut(path)?;
                let changed = section.state_mut().unclear_item();
                report(out, path, section, changed, "nothing cleared")?;
                changed
            }
            Command::SetAvailable { path, available } => {
                let section = self.tree.find_section_mut(path)?;
                let changed = section.set_property(
                    SectionProperty::AvailableChestCount,
                    PropertyValue::Integer(*available),
                )?;
                report(out, path, section, changed, "unchanged")?;
                changed
            }
        };

        if changed && command.mutates() {
            self.autosave()?;
        }
        Ok(changed)
    }

    fn autosave(&self) -> Result<(), TrackerError> {
        match (&self.save_file, self.autosave) {
            (Some(path), true) => {
                state::write_snapshot(path, &state::capture(&self.tree))?;
            }
            (Some(_), false) => debug!("Autosave disabled"),
            (None, _) => debug!("No save file configured"),
        }
        Ok(())
    }

    fn write_summary(&self, json: bool, out: &mut impl Write) -> Result<(), TrackerError> {
        let summary = self.summary();
        if json {
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
        } else {
            writeln!(out, "locations:   {}", summary.locations)?;
            writeln!(out, "sections:    {}", summary.sections)?;
            writeln!(out, "items:       {}/{} cleared", summary.cleared, summary.item_count)?;
            writeln!(out, "remaining:   {}", summary.remaining)?;
            if summary.diagnostics > 0 {
                writeln!(out, "diagnostics: {} (run `check`)", summary.diagnostics)?;
            }
        }
        Ok(())
    }

    fn write_list(&self, remaining_only: bool, out: &mut impl Write) -> Result<(), TrackerError> {
        let mut shown = 0_usize;
        for (_, location) in self.tree.iter() {
            for section in location.sections() {
                let state = section.state();
                if remaining_only && state.is_fully_cleared() {
                    continue;
                }
                writeln!(
                    out,
                    "{}/{}  {}/{}  {}",
                    location.id(),
                    section.name(),
                    state.cleared(),
                    state.item_count(),
                    format_rules(section.access_rules()),
                )?;
                shown = shown.saturating_add(1);
            }
        }
        info!(shown, "Listed sections");
        Ok(())
    }
}

/// Print the outcome of a mutating command.
fn report(
    out: &mut impl Write,
    path: &str,
    section: &Section,
    changed: bool,
    unchanged: &str,
) -> Result<(), TrackerError> {
    let state = section.state();
    if changed {
        writeln!(out, "{path}: {}/{} cleared", state.cleared(), state.item_count())?;
    } else {
        writeln!(out, "{path}: {unchanged}")?;
    }
    Ok(())
}

/// `a+b | c`, or `always` for an empty rule set.
fn format_rules(rules: &RuleSet) -> String {
    if rules.is_empty() {
        return "always".to_owned();
    }
    rules
        .clauses()
        .iter()
        .map(|clause| clause.tokens().join("+"))
        .collect::<Vec<_>>()
        .join(" | ")
}
