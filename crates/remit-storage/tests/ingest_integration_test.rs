//! Ingest pipeline against file-backed stores: idempotence, identity
//! collapse, batching and progress, schema growth, collision policies,
//! skip accounting, and the backfill path.

use remit_core::catalog::{
    CLAIM_STATUS, INTERCHANGE_CONTROL_NUMBER, PAYER_CLAIM_CONTROL_NUMBER, SEQUENCE, TRACE_NUMBER,
};
use remit_core::config::{CollisionPolicy, SkipAccounting, StoreConfig};
use remit_core::errors::StorageError;
use remit_core::types::records::{FileRow, NewProcessedFile, Row};
use remit_storage::{generate_transaction_uid, InsertOptions, RemitStore};
use tempfile::TempDir;

fn config(extra: &str) -> StoreConfig {
    StoreConfig::from_toml(&format!("[schema]\nprecreate_catalog = false\n{extra}")).unwrap()
}

fn temp_store_with(cfg: StoreConfig) -> (TempDir, RemitStore) {
    let dir = TempDir::new().unwrap();
    let store = RemitStore::open_with_config(&dir.path().join("remit.db"), cfg).unwrap();
    (dir, store)
}

fn temp_store() -> (TempDir, RemitStore) {
    temp_store_with(config(""))
}

fn register(store: &RemitStore, hash: &str) -> i64 {
    store
        .register_processed_file(&NewProcessedFile {
            filename: format!("{hash}.835"),
            file_hash: hash.to_string(),
            interchange_control_number: "000000123".to_string(),
            file_size_bytes: 2048,
            record_count: 0,
            source_folder: "/inbox".to_string(),
        })
        .unwrap()
}

fn claim(seq: usize, extra: &[(&str, &str)]) -> Row {
    let mut row = Row::new();
    row.insert(INTERCHANGE_CONTROL_NUMBER.to_string(), "000000123".to_string());
    row.insert(TRACE_NUMBER.to_string(), "TRN-1".to_string());
    row.insert(PAYER_CLAIM_CONTROL_NUMBER.to_string(), format!("PCN{seq}"));
    row.insert(CLAIM_STATUS.to_string(), "1".to_string());
    row.insert(SEQUENCE.to_string(), seq.to_string());
    for (k, v) in extra {
        row.insert(k.to_string(), v.to_string());
    }
    row
}

fn journal_mode(store: &RemitStore) -> String {
    store
        .with_connection(|conn| {
            Ok(conn.pragma_query_value(None, "journal_mode", |row| row.get::<_, String>(0))?)
        })
        .unwrap()
}

#[test]
fn reingesting_the_same_rows_is_a_no_op() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let rows: Vec<_> = (0..50).map(|i| claim(i, &[("RUN", "2024-01")])).collect();

    let first = store.insert_transactions(&rows, file_id, None).unwrap();
    assert_eq!(first.inserted, 50);
    assert_eq!(first.skipped, 0);

    let second = store.insert_transactions(&rows, file_id, None).unwrap();
    assert_eq!(second.total, 50);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 50);
    assert_eq!(second.columns_added, 0);
    assert_eq!(store.get_transaction_count(None, &[]).unwrap(), 50);
}

#[test]
fn rows_sharing_identity_collapse_to_the_first() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let rows = vec![
        claim(1, &[("CLAIM PAYMENT", "10.00")]),
        claim(1, &[("CLAIM PAYMENT", "20.00")]),
        claim(1, &[("CLAIM PAYMENT", "30.00")]),
    ];

    let report = store.insert_transactions(&rows, file_id, None).unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(report.skipped, 2);

    let stored = store
        .query_transactions(None, &[], None, Some(&["CLAIM PAYMENT"]))
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["CLAIM_PAYMENT"], "10.00");
}

#[test]
fn batch_boundary_commits_twice_with_monotonic_progress() {
    let mut cfg = config("");
    cfg.ingest.batch_size = Some(100_000);
    let (_dir, mut store) = temp_store_with(cfg);
    let file_id = register(&store, "big");
    let rows: Vec<_> = (0..100_001).map(|i| claim(i, &[])).collect();

    let mut calls = Vec::new();
    let mut progress = |done: usize, total: usize| calls.push((done, total));
    let report = store
        .insert_transactions(&rows, file_id, Some(&mut progress))
        .unwrap();

    assert_eq!(report.batches_committed, 2);
    assert_eq!(report.inserted, 100_001);
    assert_eq!(calls, vec![(100_000, 100_001), (100_001, 100_001)]);
    assert!(calls.windows(2).all(|w| w[0].0 < w[1].0));
}

#[test]
fn progress_can_be_scoped_to_a_run() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let rows: Vec<_> = (0..6).map(|i| claim(i, &[])).collect();

    let options = InsertOptions {
        batch_size: Some(4),
        progress_offset: 10,
        progress_total: Some(16),
    };
    let mut calls = Vec::new();
    let mut progress = |done: usize, total: usize| calls.push((done, total));
    store
        .insert_transactions_with(&rows, file_id, &options, Some(&mut progress))
        .unwrap();

    assert_eq!(calls, vec![(14, 16), (16, 16)]);
}

#[test]
fn missing_identity_fields_still_insert() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let mut row = Row::new();
    row.insert("RUN".to_string(), "2024-03".to_string());

    let report = store
        .insert_transactions(std::slice::from_ref(&row), file_id, None)
        .unwrap();
    assert_eq!(report.inserted, 1);

    let stored = store
        .query_transactions(None, &[], None, Some(&["transaction_uid"]))
        .unwrap();
    assert_eq!(stored[0]["transaction_uid"], generate_transaction_uid(&row));
    assert_eq!(stored[0]["transaction_uid"].len(), 32);
}

#[test]
fn new_columns_do_not_disturb_existing_rows() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");

    store
        .insert_transactions(&[claim(1, &[("A", "first")])], file_id, None)
        .unwrap();
    let before = store.get_column_count().unwrap();

    let report = store
        .insert_transactions(&[claim(2, &[("B", "second")])], file_id, None)
        .unwrap();
    assert_eq!(report.columns_added, 1);
    assert_eq!(store.get_column_count().unwrap(), before + 1);

    let old = store
        .query_transactions(Some("SEQ = ?1"), &[&"1"], None, Some(&["A", "B"]))
        .unwrap();
    assert_eq!(old[0]["A"], "first");
    assert_eq!(old[0]["B"], "");
}

#[test]
fn strict_durability_is_restored_after_ingest() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    store.insert_transactions(&[claim(1, &[])], file_id, None).unwrap();
    assert_eq!(journal_mode(&store), "delete");
}

#[test]
fn secondary_indexes_are_built_after_first_insert() {
    let (_dir, mut store) = temp_store();
    assert!(!store.schema().indexes_created());
    let file_id = register(&store, "h1");
    store
        .insert_transactions(&[claim(1, &[("RUN", "2024-01")])], file_id, None)
        .unwrap();
    assert!(store.schema().indexes_created());

    let indexes: Vec<String> = store
        .with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type = 'index'")?;
            let names = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(names)
        })
        .unwrap();
    assert!(indexes.contains(&"idx_RUN".to_string()));
    assert!(indexes.contains(&format!("idx_{TRACE_NUMBER}")));
}

#[test]
fn colliding_names_are_rejected_by_default() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let columns_before = store.get_column_count().unwrap();

    let err = store
        .insert_transactions(&[claim(1, &[("A B", "x"), ("A-B", "y")])], file_id, None)
        .unwrap_err();
    assert!(matches!(err, StorageError::ColumnCollision { ref column, .. } if column == "A_B"));
    assert_eq!(store.get_transaction_count(None, &[]).unwrap(), 0);
    assert_eq!(store.get_column_count().unwrap(), columns_before);
}

#[test]
fn merge_policy_shares_the_column() {
    let (_dir, mut store) = temp_store_with(config("[ingest]\ncollision_policy = \"merge\"\n"));
    let file_id = register(&store, "h1");

    store
        .insert_transactions(
            &[claim(1, &[("A B", "space")]), claim(2, &[("A-B", "dash")])],
            file_id,
            None,
        )
        .unwrap();

    let values: Vec<String> = store
        .query_transactions(None, &[], None, Some(&["A_B"]))
        .unwrap()
        .into_iter()
        .map(|mut row| row.remove("A_B").unwrap())
        .collect();
    assert_eq!(values, ["space", "dash"]);
    assert_eq!(store.schema().source_of("A_B"), Some("A B"));
}

#[test]
fn case_only_variants_are_rejected_across_calls() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    store
        .insert_transactions(&[claim(1, &[("Payer Name", "ACME")])], file_id, None)
        .unwrap();

    let err = store
        .insert_transactions(&[claim(2, &[("PAYER NAME", "OTHER")])], file_id, None)
        .unwrap_err();
    match err {
        StorageError::ColumnCollision { column, first, second } => {
            assert_eq!(column, "Payer_Name");
            assert_eq!(first, "Payer Name");
            assert_eq!(second, "PAYER NAME");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.get_transaction_count(None, &[]).unwrap(), 1);
    let columns = store.get_all_columns().unwrap();
    assert!(columns.contains(&"Payer_Name".to_string()));
    assert!(!columns.iter().any(|c| c == "PAYER_NAME"));
}

#[test]
fn case_only_variants_are_rejected_within_a_batch() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let err = store
        .insert_transactions(&[claim(1, &[("a", "x"), ("A", "y")])], file_id, None)
        .unwrap_err();
    assert!(matches!(err, StorageError::ColumnCollision { .. }));
    assert_eq!(store.get_transaction_count(None, &[]).unwrap(), 0);
}

#[test]
fn merge_policy_folds_case_variants_into_one_column() {
    let (_dir, mut store) = temp_store_with(config("[ingest]\ncollision_policy = \"merge\"\n"));
    let file_id = register(&store, "h1");
    store
        .insert_transactions(&[claim(1, &[("Payer Name", "ACME")])], file_id, None)
        .unwrap();
    store
        .insert_transactions(&[claim(2, &[("PAYER NAME", "OTHER")])], file_id, None)
        .unwrap();

    let values: Vec<String> = store
        .query_transactions(None, &[], None, Some(&["payer name"]))
        .unwrap()
        .into_iter()
        .map(|mut row| row.remove("Payer_Name").unwrap())
        .collect();
    assert_eq!(values, ["ACME", "OTHER"]);
    assert_eq!(store.schema().source_of("PAYER_NAME"), Some("Payer Name"));
}

/// Tables as written by a store that predates the column registry.
fn create_registry_less_database(path: &std::path::Path) {
    let conn = rusqlite::Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE schema_version (
             version INTEGER PRIMARY KEY,
             applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
             description TEXT
         );
         INSERT INTO schema_version (version, description) VALUES (2, 'full column storage');
         CREATE TABLE processed_files (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             filename TEXT NOT NULL,
             file_hash TEXT NOT NULL UNIQUE,
             interchange_control_number TEXT,
             file_size_bytes INTEGER,
             record_count INTEGER,
             processed_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
             source_folder TEXT
         );
         CREATE TABLE edi_transactions (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             transaction_uid TEXT NOT NULL UNIQUE,
             processed_file_id INTEGER,
             imported_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
             FOREIGN KEY (processed_file_id) REFERENCES processed_files(id)
         );
         ALTER TABLE edi_transactions ADD COLUMN CLAIM_CHARGE TEXT;
         ALTER TABLE edi_transactions ADD COLUMN LEGACY_NOTE TEXT;",
    )
    .unwrap();
}

#[test]
fn registry_less_database_ingests_display_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.db");
    create_registry_less_database(&path);

    let mut store = RemitStore::open_with_config(&path, config("")).unwrap();
    assert_eq!(store.schema().source_of("CLAIM_CHARGE"), None);
    let file_id = register(&store, "h1");

    let report = store
        .insert_transactions(
            &[claim(1, &[("CLAIM CHARGE", "10.00"), ("Legacy Note", "n")])],
            file_id,
            None,
        )
        .unwrap();
    assert_eq!(report.inserted, 1);
    let columns = store.get_all_columns().unwrap();
    assert!(columns.contains(&"LEGACY_NOTE".to_string()));
    assert!(!columns.contains(&"Legacy_Note".to_string()));
    assert_eq!(store.schema().source_of("CLAIM_CHARGE"), Some("CLAIM CHARGE"));
    assert_eq!(store.schema().source_of("LEGACY_NOTE"), Some("Legacy Note"));

    // The claim is durable: a competing spelling is refused after reopen.
    let mut reopened = RemitStore::open_with_config(&path, config("")).unwrap();
    let err = reopened
        .insert_transactions(&[claim(2, &[("CLAIM-CHARGE", "1.00")])], file_id, None)
        .unwrap_err();
    assert!(matches!(err, StorageError::ColumnCollision { .. }));
}

#[test]
fn registry_less_database_opens_with_the_catalog() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.db");
    create_registry_less_database(&path);

    let mut store = RemitStore::open(&path).unwrap();
    assert_eq!(store.schema().source_of("CLAIM_CHARGE"), Some("CLAIM CHARGE"));
    let file_id = register(&store, "h1");
    store
        .insert_transactions(&[claim(1, &[("CLAIM CHARGE", "10.00")])], file_id, None)
        .unwrap();

    let rows = store
        .query_transactions(None, &[], None, Some(&["CLAIM CHARGE"]))
        .unwrap();
    assert_eq!(rows[0]["CLAIM_CHARGE"], "10.00");
}

#[test]
fn reserved_field_names_are_rejected() {
    let (_dir, mut store) = temp_store();
    let file_id = register(&store, "h1");
    let err = store
        .insert_transactions(&[claim(1, &[("imported at", "now")])], file_id, None)
        .unwrap_err();
    assert!(matches!(err, StorageError::ReservedColumn { .. }));
}

#[test]
fn exact_accounting_reports_duplicates() {
    let (_dir, mut store) = temp_store_with(config("[ingest]\nskip_accounting = \"exact\"\n"));
    assert_eq!(store.config().ingest.effective_skip_accounting(), SkipAccounting::Exact);
    let file_id = register(&store, "h1");

    let rows = vec![claim(1, &[]), claim(1, &[]), claim(2, &[])];
    let report = store.insert_transactions(&rows, file_id, None).unwrap();
    assert_eq!(report.inserted, 2);
    assert_eq!(report.duplicates, Some(1));
    assert_eq!(report.skipped, 1);
}

#[test]
fn backfill_ingests_many_files_and_restores_durability() {
    let (_dir, mut store) = temp_store();
    assert_eq!(
        store.config().ingest.effective_collision_policy(),
        CollisionPolicy::Reject
    );
    let first = register(&store, "a");
    let second = register(&store, "b");
    let rows = vec![
        FileRow::new(first, claim(1, &[])),
        FileRow::new(first, claim(2, &[])),
        FileRow::new(second, claim(3, &[])),
    ];

    let mut calls = Vec::new();
    let mut progress = |done: usize, total: usize| calls.push((done, total));
    let report = store
        .insert_transactions_bulk(&rows, Some(&mut progress))
        .unwrap();
    assert_eq!(report.inserted, 3);
    assert_eq!(calls, vec![(3, 3)]);

    let for_second = store
        .get_transaction_count(Some("processed_file_id = ?1"), &[&second])
        .unwrap();
    assert_eq!(for_second, 1);
    assert_eq!(journal_mode(&store), "delete");
}

#[test]
fn unknown_file_id_fails_and_rolls_back() {
    let (_dir, mut store) = temp_store();
    let err = store.insert_transactions(&[claim(1, &[])], 9_999, None).unwrap_err();
    assert!(matches!(err, StorageError::SqliteError { .. }));
    assert_eq!(store.get_transaction_count(None, &[]).unwrap(), 0);
    assert_eq!(journal_mode(&store), "delete");
}

#[test]
fn reopened_store_remembers_columns_and_sources() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("remit.db");
    {
        let mut store = RemitStore::open_with_config(&path, config("")).unwrap();
        let file_id = register(&store, "h1");
        store
            .insert_transactions(&[claim(1, &[("CLAIM PAYMENT", "1")])], file_id, None)
            .unwrap();
    }

    let store = RemitStore::open_with_config(&path, config("")).unwrap();
    assert!(store.schema().has_column("CLAIM_PAYMENT"));
    assert_eq!(store.schema().source_of("CLAIM_PAYMENT"), Some("CLAIM PAYMENT"));
    assert_eq!(store.get_transaction_count(None, &[]).unwrap(), 1);
}

#[test]
fn default_open_precreates_the_catalog() {
    let dir = TempDir::new().unwrap();
    let store = RemitStore::open(&dir.path().join("nested/dir/remit.db")).unwrap();
    assert!(store.schema().has_column("CLAIM_CHARGE"));
    assert!(store.schema().has_column("CLM_ChargeAmount_L2100_CLP"));
}
