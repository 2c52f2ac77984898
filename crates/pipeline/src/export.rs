//! Projection of records into output documents.
//!
//! This module turns classified records into the shapes the call-list
//! pages read: either a full player card or just the player's name.

use data_loader::{FATHER_FULL_NAME, FULL_NAME, LogicalField, MOTHER_FULL_NAME, Record, RosterSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What each `players` entry contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// A [`PlayerProjection`] object per player
    #[default]
    Detailed,
    /// The player's full name only
    Names,
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "detailed" | "full" => Ok(ProjectionMode::Detailed),
            "names" | "name" => Ok(ProjectionMode::Names),
            other => Err(format!("unknown projection mode: {other}")),
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Detailed => f.write_str("detailed"),
            ProjectionMode::Names => f.write_str("names"),
        }
    }
}

/// Everything a caller needs on one card.
///
/// Missing fields are empty strings rather than `null` so the page never
/// has to special-case them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProjection {
    pub name: String,
    pub phone: String,
    pub position: String,
    pub state: String,
    pub color: String,
    pub has_transcript: String,
    pub last_eval: String,
    pub last_called: String,
    pub last_call_with: String,
    pub mother_name: String,
    pub mother_phone: String,
    pub mother_email: String,
    pub father_name: String,
    pub father_phone: String,
    pub father_email: String,
    pub hs_name: String,
    pub hs_phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerEntry {
    Name(String),
    Detail(PlayerProjection),
}

/// `{"players": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersDocument {
    pub players: Vec<PlayerEntry>,
}

impl PlayersDocument {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Projects records using the headers resolved for this roster.
#[derive(Debug, Clone)]
pub struct Exporter {
    schema: RosterSchema,
    mode: ProjectionMode,
}

impl Exporter {
    pub fn new(schema: RosterSchema, mode: ProjectionMode) -> Self {
        Self { schema, mode }
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    /// Project every record, in the order given
    pub fn project<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> PlayersDocument {
        let players = records
            .into_iter()
            .map(|record| match self.mode {
                ProjectionMode::Names => PlayerEntry::Name(record.value(FULL_NAME).to_string()),
                ProjectionMode::Detailed => PlayerEntry::Detail(self.project_single(record)),
            })
            .collect();
        PlayersDocument { players }
    }

    /// Build the detailed card for one record
    pub fn project_single(&self, record: &Record) -> PlayerProjection {
        PlayerProjection {
            name: record.value(FULL_NAME).to_string(),
            phone: self.field(record, LogicalField::MobilePhone),
            position: self.field(record, LogicalField::BoardPosition),
            state: self.field(record, LogicalField::State),
            color: self.field(record, LogicalField::ContactSheetColor),
            has_transcript: self.field(record, LogicalField::HasTranscript),
            last_eval: self.field(record, LogicalField::LastEvaluation),
            last_called: self.field(record, LogicalField::LastCalled),
            last_call_with: self.field(record, LogicalField::LastCallWith),
            mother_name: record.value(MOTHER_FULL_NAME).to_string(),
            mother_phone: self.field(record, LogicalField::MotherPhone),
            mother_email: self.field(record, LogicalField::MotherEmail),
            father_name: record.value(FATHER_FULL_NAME).to_string(),
            father_phone: self.field(record, LogicalField::FatherPhone),
            father_email: self.field(record, LogicalField::FatherEmail),
            hs_name: self.field(record, LogicalField::HsName),
            hs_phone: self.field(record, LogicalField::HsPhone),
        }
    }

    fn field(&self, record: &Record, field: LogicalField) -> String {
        self.schema
            .column(field)
            .map(|column| record.value(column).trim().to_string())
            .unwrap_or_default()
    }
}
