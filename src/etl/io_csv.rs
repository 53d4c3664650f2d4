// Primitives for reading and writing CSV files.

use std::fs::File;
use std::io::{Read, Write};

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snafu::prelude::*;

use organogram::OutputRecord;

use crate::etl::*;

/// Writes a table with its canonical header. Every field is quoted.
pub fn write_table<W: Write, R: OutputRecord>(out: W, rows: &[R]) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out);
    wtr.write_record(R::output_header())?;
    for row in rows {
        wtr.write_record(row.output_values())?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn table_to_string<R: OutputRecord>(rows: &[R]) -> Result<String, csv::Error> {
    let mut buf: Vec<u8> = Vec::new();
    write_table(&mut buf, rows)?;
    Ok(String::from_utf8_lossy(&buf).to_string())
}

pub fn write_table_file<R: OutputRecord>(path: &str, rows: &[R]) -> EtlResult<()> {
    debug!("write_table_file: path: {:?} rows: {}", path, rows.len());
    let file = File::create(path).context(WritingFileSnafu { path })?;
    write_table(file, rows).context(WritingCsvSnafu { path })
}

/// One row of the combined metadata of the legacy uploads.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct TsoRecord {
    /// DD/MM/YYYY
    pub graph: String,
    pub body_title: String,
    #[serde(default)]
    pub original_xls_filepath: String,
    pub xls_path: String,
    #[serde(default)]
    pub upload_date: String,
    #[serde(default)]
    pub publish_date: String,
    pub state: String,
}

/// One row of the uploads report.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct UploadRecord {
    pub xls_path: String,
    pub submitter_email: String,
}

/// Reads the records of a CSV file with a header. Unknown columns are ignored.
pub fn read_records<T: DeserializeOwned, R: Read>(input: R) -> Result<Vec<T>, csv::Error> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(input);
    rdr.deserialize().collect()
}

pub fn read_records_file<T: DeserializeOwned>(path: &str) -> EtlResult<Vec<T>> {
    let file = File::open(path).context(ReadingFileSnafu { path })?;
    let records = read_records(file).context(ReadingMetadataSnafu { path })?;
    debug!("read_records_file: path: {:?} records: {}", path, records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use organogram::{Field, JuniorPost};

    fn junior_post() -> JuniorPost {
        JuniorPost {
            row: 2,
            parent_department: Field::Disclosed("Department for Transport".to_string()),
            organisation: Field::Disclosed("Department for Transport".to_string()),
            unit: Field::Disclosed("Finance".to_string()),
            reporting_senior_post: "1".to_string(),
            grade: Field::Disclosed("Grade 7".to_string()),
            pay_min: Field::Disclosed(50000),
            pay_max: Field::NotDisclosed,
            generic_job_title: Field::Disclosed("Policy \"Lead\"".to_string()),
            fte_count: Field::Disclosed("2.00".to_string()),
            professional_group: Field::Blank,
            valid: Field::Disclosed("1".to_string()),
        }
    }

    #[test]
    fn tables_are_fully_quoted() {
        let text = table_to_string(&[junior_post()]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("\"Parent Department\",\"Organisation\",\"Unit\""));
        assert_eq!(
            lines[1],
            "\"Department for Transport\",\"Department for Transport\",\"Finance\",\"1\",\"Grade 7\",\"50000\",\"N/D\",\"Policy \"\"Lead\"\"\",\"2.00\",\"\""
        );
    }

    #[test]
    fn empty_tables_have_a_header() {
        let rows: Vec<JuniorPost> = vec![];
        let text = table_to_string(&rows).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn metadata_records() {
        let data = "\
graph,body_title,original_xls_filepath,xls_path,upload_date,publish_date,state,extra
30/09/2011,Acas,/data/acas/2011-09-30/org.xls,/acas/org.xls,2011-10-01 10:00:00.0,,published,x
";
        let records: Vec<TsoRecord> = read_records(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].graph, "30/09/2011");
        assert_eq!(records[0].body_title, "Acas");
        assert_eq!(records[0].publish_date, "");
        assert_eq!(records[0].state, "published");

        let data = "xls_path,submitter_email\n/acas/org.xls,someone@acas.org.uk\n";
        let uploads: Vec<UploadRecord> = read_records(data.as_bytes()).unwrap();
        assert_eq!(uploads[0].submitter_email, "someone@acas.org.uk");
    }

    #[test]
    fn missing_metadata_columns() {
        let data = "graph,body_title\n30/09/2011,Acas\n";
        let records: Result<Vec<TsoRecord>, csv::Error> = read_records(data.as_bytes());
        assert!(records.is_err());
    }
}
