//! Artifact rendering and writing.
//!
//! Every artifact is rendered to a string in full before its file is
//! touched, so a failure never leaves a half-written file behind.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use data_loader::RecordSet;
use pipeline::Exporter;
use schedule::{PROCESSED_COLUMNS, ProcessedGame};
use serde::Serialize;
use tracing::info;

use crate::orchestrator::RunOutcome;

/// Paths written by [`ArtifactWriter::write_run`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts {
    pub top_csv: PathBuf,
    pub top_json: PathBuf,
    pub players_json: PathBuf,
    pub games_json: Option<PathBuf>,
}

impl Artifacts {
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths = vec![self.top_csv.as_path(), self.top_json.as_path(), self.players_json.as_path()];
        paths.extend(self.games_json.as_deref());
        paths
    }
}

fn csv_text<I, R>(header: &[&str], rows: I) -> Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(header).context("Failed to write CSV header")?;
    for row in rows {
        writer.write_record(row).context("Failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Same columns as the set, one line per record, in order
pub fn render_csv(set: &RecordSet) -> Result<String> {
    let header: Vec<&str> = set.columns().iter().map(String::as_str).collect();
    csv_text(&header, set.iter().map(|record| set.row_values(record)))
}

/// `Date, Original_Timezone, School_1, School_2, Recruits`
pub fn render_processed_schedule(games: &[ProcessedGame]) -> Result<String> {
    csv_text(&PROCESSED_COLUMNS, games.iter().map(ProcessedGame::to_row))
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write a processed schedule table to `path`
pub fn write_processed_schedule(path: &Path, games: &[ProcessedGame]) -> Result<()> {
    let text = render_processed_schedule(games)?;
    write_text(path, &text)?;
    info!("wrote {} games to {}", games.len(), path.display());
    Ok(())
}

/// Writes the run artifacts into one output directory
pub struct ArtifactWriter {
    out_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.out_dir.join(name);
        write_text(&path, contents)?;
        info!("saved {}", path.display());
        Ok(path)
    }

    /// `top{N}.csv`, `top{N}.json`, `players.json` and, when a schedule was
    /// enriched, `games.json`
    pub fn write_run(&self, outcome: &RunOutcome, top_exporter: &Exporter, top_n: usize) -> Result<Artifacts> {
        let top_csv = self.write(&format!("top{top_n}.csv"), &render_csv(&outcome.selected)?)?;

        let top = top_exporter.project(&outcome.selected);
        let top_json = self.write(&format!("top{top_n}.json"), &render_json(&top)?)?;

        let players = outcome.players_exporter().project(&outcome.players);
        let players_json = self.write("players.json", &render_json(&players)?)?;
        info!("projected {} players", players.len());

        let games_json = match &outcome.schedule {
            Some(schedule) => Some(self.write("games.json", &render_json(&schedule.games)?)?),
            None => None,
        };

        Ok(Artifacts {
            top_csv,
            top_json,
            players_json,
            games_json,
        })
    }
}
