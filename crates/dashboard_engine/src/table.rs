use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("upload has no data rows")]
    Empty,
    #[error("missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("row {row}: {reason}")]
    BadRow { row: usize, reason: String },
}

/// One normalized media-mention record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionRecord {
    pub date: NaiveDate,
    pub platform: String,
    pub sentiment: String,
    pub location: String,
    pub engagements: u64,
    pub media_type: String,
}

/// Normalized in-memory table the aggregators consume.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MentionTable {
    records: Vec<MentionRecord>,
}

impl MentionTable {
    /// Decode CSV text into mention records.
    ///
    /// The first non-empty line is the header; column lookup tolerates casing
    /// and space/underscore differences. Row numbers in errors are 1-based
    /// physical line numbers.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(TableError::Empty)?;
        let columns = split_fields(header);
        let index = ColumnIndex::locate(&columns)?;

        let mut records = Vec::new();
        for (line_no, line) in lines {
            let row = line_no + 1;
            let fields = split_fields(line);
            if fields.len() != columns.len() {
                return Err(TableError::BadRow {
                    row,
                    reason: format!("expected {} fields, found {}", columns.len(), fields.len()),
                });
            }
            records.push(index.record(&fields, row)?);
        }
        if records.is_empty() {
            return Err(TableError::Empty);
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[MentionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct ColumnIndex {
    date: usize,
    platform: usize,
    sentiment: usize,
    location: usize,
    engagements: usize,
    media_type: usize,
}

impl ColumnIndex {
    fn locate(columns: &[String]) -> Result<Self, TableError> {
        let find = |name: &'static str| {
            columns
                .iter()
                .position(|column| normalize(column) == normalize(name))
                .ok_or(TableError::MissingColumn(name))
        };
        Ok(Self {
            date: find("Date")?,
            platform: find("Platform")?,
            sentiment: find("Sentiment")?,
            location: find("Location")?,
            engagements: find("Engagements")?,
            media_type: find("Media Type")?,
        })
    }

    fn record(&self, fields: &[String], row: usize) -> Result<MentionRecord, TableError> {
        let date = parse_date(&fields[self.date]).ok_or_else(|| TableError::BadRow {
            row,
            reason: format!("unrecognized date {:?}", fields[self.date]),
        })?;
        let engagements =
            parse_engagements(&fields[self.engagements]).ok_or_else(|| TableError::BadRow {
                row,
                reason: format!("invalid engagement count {:?}", fields[self.engagements]),
            })?;
        Ok(MentionRecord {
            date,
            platform: fields[self.platform].clone(),
            sentiment: fields[self.sentiment].clone(),
            location: fields[self.location].clone(),
            engagements,
            media_type: fields[self.media_type].clone(),
        })
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split one CSV line, honoring double-quoted fields with `""` escapes.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
        .into_iter()
        .map(|field| field.trim().to_string())
        .collect()
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
}

fn parse_engagements(value: &str) -> Option<u64> {
    let cleaned: String = value.chars().filter(|c| *c != ',').collect();
    cleaned.trim().parse().ok()
}
