use super::LoadError;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("{state}: column '{column}' holds '{value}', expected a percentage like 36.3%")]
    InvalidPercentage {
        state: String,
        column: &'static str,
        value: String,
    },
    #[error("{state}: column '{column}' holds {value}%, outside 0-100%")]
    OutOfRange {
        state: String,
        column: &'static str,
        value: f64,
    },
}

#[derive(Debug)]
pub(crate) struct ParsedRow {
    pub(crate) name: String,
    pub(crate) metrics: [f64; 2],
}

const OBESITY_COLUMN: &str = "Obesity Rate%";
const VOTE_COLUMN: &str = "Trump Vote %";

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ParsedRow>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<StateRow>() {
        let row = record.map_err(LoadError::Csv)?;
        let obesity =
            normalize(&row.name, OBESITY_COLUMN, &row.obesity_rate).map_err(LoadError::Record)?;
        let vote = normalize(&row.name, VOTE_COLUMN, &row.trump_vote).map_err(LoadError::Record)?;

        rows.push(ParsedRow {
            name: row.name,
            metrics: [obesity, vote],
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct StateRow {
    #[serde(rename = "State Name")]
    name: String,
    #[serde(rename = "Obesity Rate%")]
    obesity_rate: String,
    #[serde(rename = "Trump Vote %")]
    trump_vote: String,
}

fn normalize(state: &str, column: &'static str, raw: &str) -> Result<f64, RecordError> {
    let percent = parse_percentage(raw).ok_or_else(|| RecordError::InvalidPercentage {
        state: state.to_string(),
        column,
        value: raw.to_string(),
    })?;

    if !(0.0..=100.0).contains(&percent) {
        return Err(RecordError::OutOfRange {
            state: state.to_string(),
            column,
            value: percent,
        });
    }

    Ok(percent / 100.0)
}

/// Parse `"36.3%"` (percent sign optional) into `36.3`.
pub(crate) fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
    digits.parse::<f64>().ok().filter(|value| value.is_finite())
}
