// Migration of the legacy uploads: every workbook is converted again and
// recorded as a snapshot of its publisher.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use organogram::{run, verify_level_for, Workbook};

use crate::args::MigrateArgs;
use crate::etl::io_common::*;
use crate::etl::io_csv::*;
use crate::etl::io_xls::read_workbook;
use crate::etl::*;

pub const LEGACY_USER: &str = "(extracted from legacy triplestore)";

const MAX_EXAMPLES: usize = 5;

/// One organogram of one publisher at one date, with the files it was
/// converted to. Paths are relative to the organogram directory.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub publisher_id: String,
    pub date: NaiveDate,
    pub original_xls_filepath: Option<String>,
    pub xls_filepath: String,
    pub csv_senior_filepath: String,
    pub csv_junior_filepath: String,
    pub upload_user: String,
    pub upload_date: Option<NaiveDateTime>,
    pub signoff_user: Option<String>,
    pub signoff_date: Option<NaiveDateTime>,
    pub publish_user: Option<String>,
    pub publish_date: Option<NaiveDateTime>,
    pub state: String,
}

impl Snapshot {
    pub fn file_paths(&self) -> Vec<&str> {
        vec![
            self.xls_filepath.as_str(),
            self.csv_senior_filepath.as_str(),
            self.csv_junior_filepath.as_str(),
        ]
    }
}

/// The snapshots, stored as a JSON file.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    pub snapshots: Vec<Snapshot>,
}

impl SnapshotStore {
    /// An empty store if the file does not exist yet.
    pub fn open(path: PathBuf) -> EtlResult<SnapshotStore> {
        if !path.exists() {
            return Ok(SnapshotStore {
                path,
                snapshots: Vec::new(),
            });
        }
        let path_s = path.to_string_lossy().to_string();
        let contents = fs::read_to_string(&path).context(ReadingFileSnafu { path: path_s })?;
        let snapshots: Vec<Snapshot> =
            serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
        debug!("SnapshotStore::open: {} snapshots", snapshots.len());
        Ok(SnapshotStore { path, snapshots })
    }

    pub fn save(&self) -> EtlResult<()> {
        let js = serde_json::to_string_pretty(&self.snapshots).context(ParsingJsonSnafu {})?;
        let path = self.path.to_string_lossy().to_string();
        fs::write(&self.path, js).context(WritingFileSnafu { path })
    }

    pub fn get(&self, publisher_id: &str, date: NaiveDate) -> Option<&Snapshot> {
        self.snapshots
            .iter()
            .find(|s| s.publisher_id == publisher_id && s.date == date)
    }

    /// A snapshot of another publisher at another date that already uses
    /// this file path.
    pub fn path_conflict(
        &self,
        relative_path: &str,
        publisher_id: &str,
        date: NaiveDate,
    ) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| {
            s.file_paths().contains(&relative_path)
                && s.publisher_id != publisher_id
                && s.date != date
        })
    }

    /// Replaces the snapshot with the same publisher and date, if any.
    pub fn upsert(&mut self, snapshot: Snapshot) {
        match self
            .snapshots
            .iter_mut()
            .find(|s| s.publisher_id == snapshot.publisher_id && s.date == snapshot.date)
        {
            Some(existing) => *existing = snapshot,
            None => self.snapshots.push(snapshot),
        }
    }
}

/// Counts of what happened to each row, with a few examples per category.
#[derive(Default, Debug)]
pub struct Stats {
    categories: BTreeMap<String, (usize, Vec<String>)>,
}

impl Stats {
    /// Records an event and returns a line describing it.
    pub fn add(&mut self, category: &str, example: &str) -> String {
        let entry = self
            .categories
            .entry(category.to_string())
            .or_insert((0, Vec::new()));
        entry.0 += 1;
        if entry.1.len() < MAX_EXAMPLES {
            entry.1.push(example.to_string());
        }
        format!("{}: {}", category, example)
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut categories: Vec<(&String, &(usize, Vec<String>))> =
            self.categories.iter().collect();
        categories.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));
        for (category, (count, examples)) in categories {
            writeln!(f, "{}: {} {}", category, count, examples.join(" / "))?;
        }
        Ok(())
    }
}

/// Who did what and when, depending on the state of the upload.
#[derive(PartialEq, Debug, Clone)]
struct Provenance {
    upload_user: String,
    upload_date: Option<NaiveDateTime>,
    signoff_user: Option<String>,
    signoff_date: Option<NaiveDateTime>,
    publish_user: Option<String>,
    publish_date: Option<NaiveDateTime>,
}

fn provenance(record: &TsoRecord, uploads: &HashMap<String, UploadRecord>) -> Provenance {
    let upload_user = if record.original_xls_filepath.is_empty() {
        LEGACY_USER.to_string()
    } else {
        match uploads.get(&record.original_xls_filepath) {
            Some(upload) => upload.submitter_email.clone(),
            None => {
                warn!(
                    "provenance: no upload found for {:?}",
                    record.original_xls_filepath
                );
                LEGACY_USER.to_string()
            }
        }
    };
    let upload_date = parse_timestamp(&record.upload_date);
    let action_date = parse_timestamp(&record.publish_date);
    let (signoff_user, signoff_date, publish_user, publish_date) = match record.state.as_str() {
        "signed off" => (Some(upload_user.clone()), action_date, None, None),
        "published" => (
            Some(upload_user.clone()),
            None,
            Some(upload_user.clone()),
            action_date,
        ),
        _ => (None, None, None, None),
    };
    Provenance {
        upload_user,
        upload_date,
        signoff_user,
        signoff_date,
        publish_user,
        publish_date,
    }
}

/// The storage name of the workbook, relative to the organogram directory.
fn xls_relative_path(record: &TsoRecord) -> Option<String> {
    if record.original_xls_filepath.is_empty() {
        Some(format!(
            "xls/from-triplestore-{}",
            simplify_file_name(&record.xls_path)
        ))
    } else {
        munge_xls_path(&record.original_xls_filepath).map(|name| format!("xls/{}", name))
    }
}

fn remove_files(organogram_dir: &Path, snapshot: &Snapshot) -> EtlResult<()> {
    for relative_path in snapshot.file_paths() {
        let p = organogram_dir.join(relative_path);
        if p.exists() {
            debug!("remove_files: {:?}", p);
            let path = p.to_string_lossy().to_string();
            fs::remove_file(&p).context(WritingFileSnafu { path })?;
        }
    }
    Ok(())
}

type ReadWorkbook = fn(&str) -> EtlResult<Workbook>;

struct Migration<'a> {
    read: ReadWorkbook,
    source_data_dir: &'a Path,
    organogram_dir: &'a Path,
    uploads: HashMap<String, UploadRecord>,
    store: SnapshotStore,
    stats: Stats,
}

impl<'a> Migration<'a> {
    fn report(&mut self, category: &str, example: &str) {
        println!("{}", self.stats.add(category, example));
    }

    fn migrate_record(&mut self, record: &TsoRecord) -> EtlResult<()> {
        let graph = date_to_year_first(&record.graph);
        let label = format!("{:?} {}", record.body_title, graph);
        let date = match NaiveDate::parse_from_str(&graph, "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                self.report("Error: could not parse graph date", &label);
                return Ok(());
            }
        };
        let verify_level = verify_level_for(date);
        let org_name = munge_org(&record.body_title, '_');
        if org_name.is_empty() {
            self.report("Error: no publisher", &label);
            return Ok(());
        }
        let provenance = provenance(record, &self.uploads);

        let source_path = self
            .source_data_dir
            .join(record.xls_path.trim_start_matches('/'));
        let workbook = match (self.read)(&source_path.to_string_lossy()) {
            Ok(wb) => wb,
            Err(e) => {
                warn!("migrate_record: {}", e);
                self.report("Error: could not read the workbook", &label);
                return Ok(());
            }
        };
        let outcome = run(&workbook, verify_level);
        let tables = match outcome.tables {
            Some(tables) if outcome.failure.is_none() => tables,
            _ => {
                let messages: Vec<String> =
                    outcome.errors.iter().map(|e| e.message.clone()).collect();
                self.report(
                    &format!("ETL error: {}", messages.join(" / ")),
                    &label,
                );
                return Ok(());
            }
        };

        let csv_senior = format!("csv/{}-{}-senior.csv", org_name, graph);
        let csv_junior = format!("csv/{}-{}-junior.csv", org_name, graph);
        let xls = match xls_relative_path(record) {
            Some(p) => p,
            None => {
                self.report(
                    "Error: unexpected original path",
                    &record.original_xls_filepath,
                );
                return Ok(());
            }
        };
        for relative_path in [&csv_senior, &csv_junior, &xls] {
            if let Some(other) = self.store.path_conflict(relative_path, &org_name, date) {
                let example = format!(
                    "{} {} is already used by {} {}",
                    label, relative_path, other.publisher_id, other.date
                );
                self.report("Error: filename collision", &example);
                return Ok(());
            }
        }

        // Re-running replaces the snapshot and its files.
        if let Some(existing) = self.store.get(&org_name, date) {
            info!("migrate_record: replacing the snapshot {}", label);
            remove_files(self.organogram_dir, existing)?;
        }

        let full = |relative_path: &str| {
            self.organogram_dir
                .join(relative_path)
                .to_string_lossy()
                .to_string()
        };
        write_table_file(&full(&csv_senior), &tables.senior)?;
        write_table_file(&full(&csv_junior), &tables.junior)?;
        let xls_full = full(&xls);
        fs::copy(&source_path, &xls_full).context(WritingFileSnafu { path: xls_full })?;

        self.store.upsert(Snapshot {
            publisher_id: org_name,
            date,
            original_xls_filepath: Some(record.original_xls_filepath.clone())
                .filter(|p| !p.is_empty()),
            xls_filepath: xls,
            csv_senior_filepath: csv_senior,
            csv_junior_filepath: csv_junior,
            upload_user: provenance.upload_user,
            upload_date: provenance.upload_date,
            signoff_user: provenance.signoff_user,
            signoff_date: provenance.signoff_date,
            publish_user: provenance.publish_user,
            publish_date: provenance.publish_date,
            state: record.state.clone(),
        });
        self.report(&format!("Migrated ({})", verify_level), &label);
        Ok(())
    }
}

pub fn run_migration(args: &MigrateArgs) -> EtlResult<Stats> {
    migrate_with(args, read_workbook)
}

fn migrate_with(args: &MigrateArgs, read: ReadWorkbook) -> EtlResult<Stats> {
    let records: Vec<TsoRecord> = read_records_file(&args.tso_combined)?;
    let uploads: HashMap<String, UploadRecord> =
        read_records_file::<UploadRecord>(&args.uploads_report)?
            .into_iter()
            .map(|u| (u.xls_path.clone(), u))
            .collect();
    info!(
        "run_migration: {} records, {} uploads",
        records.len(),
        uploads.len()
    );

    let organogram_dir = Path::new(&args.organogram_dir);
    for sub in ["csv", "xls"] {
        let p = organogram_dir.join(sub);
        let path = p.to_string_lossy().to_string();
        fs::create_dir_all(&p).context(WritingFileSnafu { path })?;
    }

    let mut migration = Migration {
        read,
        source_data_dir: Path::new(&args.source_data_dir),
        organogram_dir,
        uploads,
        store: SnapshotStore::open(organogram_dir.join("organograms.json"))?,
        stats: Stats::default(),
    };
    for record in records.iter() {
        if let Some(body) = &args.body {
            if &record.body_title != body {
                continue;
            }
        }
        if let Some(graph) = &args.graph {
            if &date_to_year_first(&record.graph) != graph {
                continue;
            }
        }
        if let Err(e) = migration.migrate_record(record) {
            warn!("run_migration: {}", e);
            let example = format!("{:?} {}: {}", record.body_title, record.graph, e);
            migration.report("Error: exception", &example);
        }
    }
    migration.store.save()?;

    println!("\nMigrate:\n{}", migration.stats);
    Ok(migration.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use organogram::builder::WorkbookBuilder;
    use organogram::{
        Cell, ColumnSpec, JuniorPost, SeniorPost, SheetRecord, JUNIOR_SHEET_NAME,
        SENIOR_SHEET_NAME, UNITS_SHEET_NAME,
    };

    fn record(state: &str) -> TsoRecord {
        TsoRecord {
            graph: "30/09/2011".to_string(),
            body_title: "Advisory, Conciliation and Arbitration Service".to_string(),
            original_xls_filepath: "/data/acas/2011-09-30/Organogram.xls".to_string(),
            xls_path: "/acas/organogram.xls".to_string(),
            upload_date: "2011-10-01 10:00:00.0".to_string(),
            publish_date: "2011-10-02 11:30:00.0".to_string(),
            state: state.to_string(),
        }
    }

    fn uploads() -> HashMap<String, UploadRecord> {
        let u = UploadRecord {
            xls_path: "/data/acas/2011-09-30/Organogram.xls".to_string(),
            submitter_email: "someone@acas.org.uk".to_string(),
        };
        HashMap::from([(u.xls_path.clone(), u)])
    }

    fn at(y: i32, m: u32, d: u32, h: u32, mi: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(h, mi, 0))
    }

    fn snapshot(publisher_id: &str, date: NaiveDate, xls: &str) -> Snapshot {
        Snapshot {
            publisher_id: publisher_id.to_string(),
            date,
            original_xls_filepath: None,
            xls_filepath: xls.to_string(),
            csv_senior_filepath: format!("csv/{}-{}-senior.csv", publisher_id, date),
            csv_junior_filepath: format!("csv/{}-{}-junior.csv", publisher_id, date),
            upload_user: LEGACY_USER.to_string(),
            upload_date: None,
            signoff_user: None,
            signoff_date: None,
            publish_user: None,
            publish_date: None,
            state: "uploaded".to_string(),
        }
    }

    #[test]
    fn provenance_by_state() {
        let p = provenance(&record("uploaded"), &uploads());
        assert_eq!(p.upload_user, "someone@acas.org.uk");
        assert_eq!(p.upload_date, at(2011, 10, 1, 10, 0));
        assert_eq!(p.signoff_user, None);
        assert_eq!(p.publish_user, None);

        let p = provenance(&record("signed off"), &uploads());
        assert_eq!(p.signoff_user, Some("someone@acas.org.uk".to_string()));
        assert_eq!(p.signoff_date, at(2011, 10, 2, 11, 30));
        assert_eq!(p.publish_date, None);

        let p = provenance(&record("published"), &uploads());
        assert_eq!(p.signoff_user, Some("someone@acas.org.uk".to_string()));
        assert_eq!(p.signoff_date, None);
        assert_eq!(p.publish_user, Some("someone@acas.org.uk".to_string()));
        assert_eq!(p.publish_date, at(2011, 10, 2, 11, 30));
    }

    #[test]
    fn uploads_are_found_by_original_path() {
        let r = record("uploaded");
        let u = UploadRecord {
            xls_path: r.xls_path.clone(),
            submitter_email: "someone@acas.org.uk".to_string(),
        };
        let by_storage_path = HashMap::from([(u.xls_path.clone(), u)]);
        assert_eq!(provenance(&r, &by_storage_path).upload_user, LEGACY_USER);
    }

    #[test]
    fn legacy_uploads() {
        let mut r = record("published");
        r.original_xls_filepath = "".to_string();
        let p = provenance(&r, &uploads());
        assert_eq!(p.upload_user, LEGACY_USER);
        assert_eq!(
            xls_relative_path(&r),
            Some("xls/from-triplestore-organogram.xls".to_string())
        );
        assert_eq!(
            xls_relative_path(&record("published")),
            Some("xls/acas_2011-09-30_Organogram".to_string())
        );
    }

    #[test]
    fn store_upserts_by_publisher_and_date() {
        let mut store = SnapshotStore {
            path: PathBuf::from("organograms.json"),
            snapshots: Vec::new(),
        };
        let d1 = NaiveDate::from_ymd_opt(2011, 9, 30).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2012, 3, 31).unwrap();
        store.upsert(snapshot("acas", d1, "xls/a"));
        store.upsert(snapshot("acas", d2, "xls/b"));
        store.upsert(snapshot("acas", d1, "xls/c"));
        assert_eq!(store.snapshots.len(), 2);
        assert_eq!(
            store.get("acas", d1).map(|s| s.xls_filepath.as_str()),
            Some("xls/c")
        );
        assert_eq!(store.get("dft", d1), None);
    }

    #[test]
    fn path_conflicts() {
        let d1 = NaiveDate::from_ymd_opt(2011, 9, 30).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2012, 3, 31).unwrap();
        let store = SnapshotStore {
            path: PathBuf::from("organograms.json"),
            snapshots: vec![snapshot("acas", d1, "xls/shared")],
        };
        // Another publisher at another date.
        assert!(store.path_conflict("xls/shared", "dft", d2).is_some());
        // The same publisher, or the same date, may reuse the path.
        assert!(store.path_conflict("xls/shared", "acas", d2).is_none());
        assert!(store.path_conflict("xls/shared", "dft", d1).is_none());
        assert!(store.path_conflict("xls/other", "dft", d2).is_none());
    }

    #[test]
    fn snapshots_serialize() {
        let d1 = NaiveDate::from_ymd_opt(2011, 9, 30).unwrap();
        let s = snapshot("acas", d1, "xls/a");
        let js = serde_json::to_string(&s).unwrap();
        assert!(js.contains("\"date\":\"2011-09-30\""));
        let back: Snapshot = serde_json::from_str(&js).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn stats() {
        let mut stats = Stats::default();
        assert_eq!(stats.add("Migrated", "acas"), "Migrated: acas");
        stats.add("Migrated", "dft");
        stats.add("Error: filename collision", "x");
        assert_eq!(
            stats.to_string(),
            "Migrated: 2 acas / dft\nError: filename collision: 1 x\n"
        );
    }

    const ACAS: &str = "Advisory, Conciliation and Arbitration Service";

    fn senior_row() -> Vec<Cell> {
        vec![
            Cell::from("1"),
            Cell::from("Bob"),
            Cell::from("SCS1"),
            Cell::from("Director"),
            Cell::from("Policy"),
            Cell::from("Department for Business"),
            Cell::from(ACAS),
            Cell::from("Finance"),
            Cell::from("0300 123 4567"),
            Cell::from("bob@acas.org.uk"),
            Cell::from("XX"),
            Cell::Float(100000.0),
            Cell::Float(1.0),
            Cell::Float(85000.0),
            Cell::Float(89999.0),
            Cell::Float(89999.0),
            Cell::from("Policy"),
            Cell::Empty,
            Cell::Int(1),
        ]
    }

    fn junior_row() -> Vec<Cell> {
        vec![
            Cell::from("Department for Business"),
            Cell::from(ACAS),
            Cell::from("Finance"),
            Cell::from("1"),
            Cell::from("Grade 7"),
            Cell::Float(50000.0),
            Cell::Float(60000.0),
            Cell::from("Policy Advisor"),
            Cell::Float(2.0),
            Cell::from("Policy"),
            Cell::Int(1),
        ]
    }

    fn valid_workbook() -> Workbook {
        WorkbookBuilder::new()
            .sheet(SENIOR_SHEET_NAME, &titles(SeniorPost::columns()), vec![senior_row()])
            .sheet(JUNIOR_SHEET_NAME, &titles(JuniorPost::columns()), vec![junior_row()])
            .list_sheet(UNITS_SHEET_NAME, "Unit", &["Finance"])
            .build()
    }

    fn titles(columns: &[ColumnSpec]) -> Vec<&'static str> {
        columns.iter().map(|c| c.title).collect()
    }

    // Workbooks are picked by the name of the source file. Any other file
    // goes through calamine.
    fn read_fixture(path: &str) -> EtlResult<Workbook> {
        if path.ends_with("good.xls") {
            Ok(valid_workbook())
        } else if path.ends_with("broken.xls") {
            // No junior sheet.
            Ok(WorkbookBuilder::new()
                .sheet(SENIOR_SHEET_NAME, &titles(SeniorPost::columns()), vec![senior_row()])
                .build())
        } else {
            read_workbook(path)
        }
    }

    struct Fixture {
        root: PathBuf,
        args: MigrateArgs,
    }

    impl Fixture {
        /// `rows` are (graph, original path, source path, state).
        fn new(name: &str, rows: &[(&str, &str, &str, &str)]) -> Fixture {
            let root = std::env::temp_dir().join(format!(
                "organogram-migrate-{}-{}",
                name,
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&root);
            fs::create_dir_all(root.join("source/acas")).unwrap();
            fs::create_dir_all(root.join("organograms/csv")).unwrap();
            fs::create_dir_all(root.join("organograms/xls")).unwrap();

            let mut tso = String::from(
                "graph,body_title,original_xls_filepath,xls_path,upload_date,publish_date,state\n",
            );
            for (graph, original, source, state) in rows {
                tso.push_str(&format!(
                    "{},\"{}\",{},{},2011-10-01 10:00:00.0,2011-10-02 11:30:00.0,{}\n",
                    graph, ACAS, original, source, state
                ));
                fs::write(root.join("source").join(source.trim_start_matches('/')), "xls").unwrap();
            }
            // The unreadable workbook is not there at all.
            let _ = fs::remove_file(root.join("source/acas/missing.xls"));
            fs::write(root.join("tso_combined.csv"), tso).unwrap();
            fs::write(
                root.join("uploads.csv"),
                "xls_path,submitter_email\n/data/acas/2011-09-30/Organogram.xls,someone@acas.org.uk\n",
            )
            .unwrap();

            let s = |p: &str| root.join(p).to_string_lossy().to_string();
            let args = MigrateArgs {
                tso_combined: s("tso_combined.csv"),
                uploads_report: s("uploads.csv"),
                source_data_dir: s("source"),
                organogram_dir: s("organograms"),
                body: None,
                graph: None,
            };
            Fixture { root, args }
        }

        fn dir(&self) -> PathBuf {
            self.root.join("organograms")
        }

        fn store(&self) -> SnapshotStore {
            SnapshotStore::open(self.dir().join("organograms.json")).unwrap()
        }

        fn run(&self) -> Stats {
            migrate_with(&self.args, read_fixture).unwrap()
        }

        /// Records a snapshot whose files exist, as left by an earlier run.
        fn seed(&self, snapshot: Snapshot) {
            for p in snapshot.file_paths() {
                fs::write(self.dir().join(p), "stale").unwrap();
            }
            let mut store = self.store();
            store.upsert(snapshot);
            store.save().unwrap();
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    fn count(stats: &Stats, prefix: &str) -> usize {
        stats
            .categories
            .iter()
            .filter(|(category, _)| category.starts_with(prefix))
            .map(|(_, (n, _))| n)
            .sum()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn failures_are_counted_and_the_run_continues() {
        let f = Fixture::new(
            "failures",
            &[
                ("31/03/2011", "/data/acas/2011-03-31/Org.xls", "/acas/broken.xls", "uploaded"),
                ("30/06/2011", "/data/acas/2011-06-30/Org.xls", "/acas/missing.xls", "uploaded"),
                ("30/09/2011", "/data/acas/2011-09-30/Organogram.xls", "/acas/good.xls", "published"),
            ],
        );
        let stats = f.run();
        assert_eq!(count(&stats, "ETL error: No sheet named"), 1);
        assert_eq!(count(&stats, "Error: could not read the workbook"), 1);
        assert_eq!(count(&stats, "Migrated"), 1);

        let store = f.store();
        assert_eq!(store.snapshots.len(), 1);
        let s = &store.snapshots[0];
        assert_eq!(s.publisher_id, munge_org(ACAS, '_'));
        assert_eq!(s.date, d(2011, 9, 30));
        assert_eq!(s.xls_filepath, "xls/acas_2011-09-30_Organogram");
        assert_eq!(s.upload_user, "someone@acas.org.uk");
        assert_eq!(s.publish_user, Some("someone@acas.org.uk".to_string()));
        for p in s.file_paths() {
            assert!(f.dir().join(p).exists(), "{}", p);
        }
        let senior = fs::read_to_string(f.dir().join(&s.csv_senior_filepath)).unwrap();
        assert!(senior.lines().nth(1).unwrap().starts_with("\"1\",\"Bob\""));
    }

    #[test]
    fn rerun_replaces_the_snapshot_and_its_files() {
        let f = Fixture::new(
            "rerun",
            &[("30/09/2011", "/data/acas/2011-09-30/Organogram.xls", "/acas/good.xls", "uploaded")],
        );
        let publisher = munge_org(ACAS, '_');
        let mut old = snapshot(&publisher, d(2011, 9, 30), "xls/old-upload");
        old.csv_senior_filepath = "csv/old-senior.csv".to_string();
        old.csv_junior_filepath = "csv/old-junior.csv".to_string();
        f.seed(old);

        let stats = f.run();
        assert_eq!(count(&stats, "Migrated"), 1);
        for p in ["xls/old-upload", "csv/old-senior.csv", "csv/old-junior.csv"] {
            assert!(!f.dir().join(p).exists(), "{}", p);
        }
        let store = f.store();
        assert_eq!(store.snapshots.len(), 1);
        assert_eq!(store.snapshots[0].xls_filepath, "xls/acas_2011-09-30_Organogram");
        assert_eq!(store.snapshots[0].upload_user, "someone@acas.org.uk");
    }

    #[test]
    fn rejected_rows_keep_the_previous_files() {
        let f = Fixture::new(
            "rejected",
            &[("30/09/2011", "/data/acas/2011-09-30/Organogram.xls", "/acas/broken.xls", "uploaded")],
        );
        let publisher = munge_org(ACAS, '_');
        f.seed(snapshot(&publisher, d(2011, 9, 30), "xls/old-upload"));

        let stats = f.run();
        assert_eq!(count(&stats, "ETL error"), 1);
        assert!(f.dir().join("xls/old-upload").exists());
        assert_eq!(f.store().snapshots[0].xls_filepath, "xls/old-upload");
    }

    #[test]
    fn collisions_skip_the_row() {
        let f = Fixture::new(
            "collision",
            &[("30/09/2011", "/data/acas/2011-09-30/Organogram.xls", "/acas/good.xls", "uploaded")],
        );
        let publisher = munge_org(ACAS, '_');
        f.seed(snapshot("another_body", d(2012, 3, 31), "xls/acas_2011-09-30_Organogram"));
        f.seed(snapshot(&publisher, d(2011, 9, 30), "xls/old-upload"));

        let stats = f.run();
        assert_eq!(count(&stats, "Error: filename collision"), 1);
        assert_eq!(count(&stats, "Migrated"), 0);
        assert!(f.dir().join("xls/old-upload").exists());
        assert_eq!(
            fs::read_to_string(f.dir().join("xls/acas_2011-09-30_Organogram")).unwrap(),
            "stale"
        );
        let store = f.store();
        assert_eq!(store.snapshots.len(), 2);
        assert_eq!(
            store.get(&publisher, d(2011, 9, 30)).map(|s| s.xls_filepath.as_str()),
            Some("xls/old-upload")
        );
    }

    #[test]
    fn body_and_graph_filters() {
        let mut f = Fixture::new(
            "filters",
            &[
                ("31/03/2011", "/data/acas/2011-03-31/Org.xls", "/acas/good.xls", "uploaded"),
                ("30/09/2011", "/data/acas/2011-09-30/Organogram.xls", "/acas/good.xls", "uploaded"),
            ],
        );
        f.args.body = Some("Department for Transport".to_string());
        let stats = f.run();
        assert_eq!(stats.to_string(), "");
        assert!(f.store().snapshots.is_empty());

        f.args.body = Some(ACAS.to_string());
        f.args.graph = Some("2011-03-31".to_string());
        let stats = f.run();
        assert_eq!(count(&stats, "Migrated"), 1);
        let store = f.store();
        assert_eq!(store.snapshots.len(), 1);
        assert_eq!(store.snapshots[0].date, d(2011, 3, 31));
    }
}
