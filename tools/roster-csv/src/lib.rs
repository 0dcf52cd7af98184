//! Class list to roster conversion
//!
//! Input is the `;`-separated export of a course management system with (at
//! least) the columns `Name`, `Vorname` and `E-Mail`. Every row becomes one
//! user of a single team; the username is the local part of the e-mail
//! address.

use std::io::Read;

use gitea_admin::{Roster, TeamEntry, UserEntry};
use thiserror::Error;

const LAST_NAME: &str = "Name";
const FIRST_NAME: &str = "Vorname";
const EMAIL: &str = "E-Mail";

#[derive(Error, Debug)]
pub enum ConvertError {
    /// The CSV could not be read or parsed
    #[error("failed to read class list: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row
    #[error("class list has no `{0}` column")]
    MissingColumn(&'static str),

    /// A row has no e-mail address to derive the username from
    #[error("row {row} has no e-mail address")]
    MissingEmail { row: usize },

    /// The class list could not be read from its source
    #[error("failed to read class list: {0}")]
    Io(#[from] std::io::Error),
}

/// Team metadata for the generated roster
#[derive(Debug, Clone)]
pub struct TeamInfo {
    pub name: String,
    pub description: String,
}

/// Username derived from an e-mail address
pub fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Read a class list and build a one-team roster from it
pub fn convert<R: Read>(mut source: R, team: &TeamInfo) -> Result<Roster, ConvertError> {
    let mut content = String::new();
    source.read_to_string(&mut content)?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(ConvertError::MissingColumn(name))
    };
    let last_name = column(LAST_NAME)?;
    let first_name = column(FIRST_NAME)?;
    let email = column(EMAIL)?;

    let mut users = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let field = |index: usize| record.get(index).unwrap_or_default().trim();

        let address = field(email);
        if address.is_empty() {
            // header is row 1
            return Err(ConvertError::MissingEmail { row: i + 2 });
        }

        users.push(UserEntry {
            username: username_from_email(address).to_string(),
            fullname: format!("{} {}", field(first_name), field(last_name)),
            email: address.to_string(),
        });
    }

    tracing::debug!(users = users.len(), team = %team.name, "converted class list");

    Ok(Roster {
        teams: vec![TeamEntry {
            teamname: team.name.clone(),
            description: team.description.clone(),
            users,
        }],
    })
}
