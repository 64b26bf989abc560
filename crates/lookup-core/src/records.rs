//! CSV input and output of establishment records

use crate::config::ColumnsConfig;
use crate::error::{LookupError, Result};
use lookup_types::EstablishmentRecord;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Establishment rows together with the header order they were read in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstablishmentTable {
    pub headers: Vec<String>,
    pub records: Vec<EstablishmentRecord>,
}

/// Reads and writes establishment tables using the configured column names
pub struct RecordStore {
    columns: ColumnsConfig,
}

impl RecordStore {
    pub fn new(columns: ColumnsConfig) -> Self {
        Self { columns }
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<EstablishmentTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            LookupError::NotFound(format!("Cannot open input {}: {}", path.display(), e))
        })?;
        self.read_from(file)
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<EstablishmentTable> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        if !headers.iter().any(|h| *h == self.columns.name) {
            return Err(LookupError::Validation(format!(
                "Input is missing the '{}' column",
                self.columns.name
            )));
        }

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = EstablishmentRecord::default();
            for (header, value) in headers.iter().zip(row.iter()) {
                let value = value.to_string();
                if *header == self.columns.name {
                    record.name = value;
                } else if *header == self.columns.street {
                    record.street = value;
                } else if *header == self.columns.postal_code {
                    record.postal_code = value;
                } else if *header == self.columns.city {
                    record.city = value;
                } else {
                    record.extra.insert(header.clone(), value);
                }
            }
            records.push(record);
        }

        log::info!("Read {} records", records.len());
        Ok(EstablishmentTable { headers, records })
    }

    pub fn write_path<P: AsRef<Path>>(&self, path: P, table: &EstablishmentTable) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file, table)
    }

    /// Write all rows; address columns missing from the input header are appended
    pub fn write_to<W: Write>(&self, writer: W, table: &EstablishmentTable) -> Result<()> {
        let mut headers = table.headers.clone();
        if !headers.contains(&self.columns.name) {
            headers.insert(0, self.columns.name.clone());
        }
        for column in self.columns.address_columns() {
            if !headers.iter().any(|h| h == column) {
                headers.push(column.to_string());
            }
        }

        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&headers)?;
        for record in &table.records {
            let row: Vec<&str> = headers.iter().map(|h| self.value_for(record, h)).collect();
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn value_for<'a>(&self, record: &'a EstablishmentRecord, header: &str) -> &'a str {
        if header == self.columns.name {
            &record.name
        } else if header == self.columns.street {
            &record.street
        } else if header == self.columns.postal_code {
            &record.postal_code
        } else if header == self.columns.city {
            &record.city
        } else {
            record.extra.get(header).map(String::as_str).unwrap_or_default()
        }
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new(ColumnsConfig::default())
    }
}
