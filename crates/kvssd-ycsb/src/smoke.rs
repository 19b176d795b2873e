//! Scripted smoke runs against a row store
//!
//! The literal scenario exercises every row operation on two keys and ends
//! by reading a deleted key, which must fail with the device's not-found
//! message. The bulk run does the same for generated rows.

use kvssd::{KvsError, KvssdDevice};
use thiserror::Error;
use tracing::info;

use crate::error::RowError;
use crate::field::Field;
use crate::row::RowStore;

/// A smoke step that did not produce the expected outcome.
#[derive(Debug, Error)]
pub enum Deviation {
    /// A step that should succeed failed
    #[error("{step}: unexpected failure: {source}")]
    Failed {
        /// Step description
        step: String,
        /// Error returned by the row store
        #[source]
        source: RowError,
    },

    /// A read returned different fields than were written
    #[error("{step}: expected {expected:?}, read {actual:?}")]
    Mismatch {
        /// Step description
        step: String,
        /// Fields that should have been read
        expected: Vec<Field>,
        /// Fields actually read
        actual: Vec<Field>,
    },

    /// A step that should fail succeeded, or failed differently
    #[error("{step}: expected error '{expected}', got {actual}")]
    WrongOutcome {
        /// Step description
        step: String,
        /// Expected error message
        expected: &'static str,
        /// What happened instead
        actual: String,
    },
}

/// Counters from a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmokeReport {
    /// Row operations issued
    pub operations: usize,
    /// Operations that failed as expected
    pub expected_failures: usize,
}

struct Runner<'a, D> {
    store: &'a RowStore<D>,
    report: SmokeReport,
    verbose: bool,
}

impl<'a, D: KvssdDevice> Runner<'a, D> {
    const fn new(store: &'a RowStore<D>, verbose: bool) -> Self {
        Self {
            store,
            report: SmokeReport {
                operations: 0,
                expected_failures: 0,
            },
            verbose,
        }
    }

    fn step<T>(&mut self, step: String, result: Result<T, RowError>) -> Result<T, Deviation> {
        self.report.operations += 1;
        result.map_err(|source| Deviation::Failed { step, source })
    }

    fn insert(&mut self, key: &str, fields: &[Field]) -> Result<(), Deviation> {
        self.step(format!("insert {key}"), self.store.insert_row(key, fields))?;
        info!("Insert {key}...{}", kvssd::KVS_SUCCESS_MESSAGE);
        Ok(())
    }

    fn update(&mut self, key: &str, fields: &[Field]) -> Result<(), Deviation> {
        self.step(format!("update {key}"), self.store.update_row(key, fields))?;
        info!("Update {key}...{}", kvssd::KVS_SUCCESS_MESSAGE);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), Deviation> {
        self.step(format!("delete {key}"), self.store.delete_row(key))?;
        info!("Delete {key}...{}", kvssd::KVS_SUCCESS_MESSAGE);
        Ok(())
    }

    fn read_expect(&mut self, key: &str, expected: &[Field]) -> Result<(), Deviation> {
        let step = format!("read {key}");
        let actual = self.step(step.clone(), self.store.read_row(key))?;
        if actual != expected {
            return Err(Deviation::Mismatch {
                step,
                expected: expected.to_vec(),
                actual,
            });
        }
        if self.verbose {
            info!("Read {key}...{}", kvssd::KVS_SUCCESS_MESSAGE);
            for field in &actual {
                info!("  {}: {}", field.name, field.value);
            }
        }
        Ok(())
    }

    fn read_missing(&mut self, key: &str) -> Result<(), Deviation> {
        let expected = KvsError::KeyNotExist.message();
        self.report.operations += 1;
        match self.store.read_row(key) {
            Err(err) if err.to_string() == expected => {
                self.report.expected_failures += 1;
                if self.verbose {
                    info!("Read {key}...{err}");
                }
                Ok(())
            }
            Err(err) => Err(Deviation::WrongOutcome {
                step: format!("read {key}"),
                expected,
                actual: format!("error '{err}'"),
            }),
            Ok(fields) => Err(Deviation::WrongOutcome {
                step: format!("read {key}"),
                expected,
                actual: format!("{} fields", fields.len()),
            }),
        }
    }
}

/// Replay the two-key scenario.
pub fn run_literal<D: KvssdDevice>(store: &RowStore<D>) -> Result<SmokeReport, Deviation> {
    let value1 = vec![
        Field::new("field1", "value1_1"),
        Field::new("field2", "value1_2"),
    ];
    let value2 = vec![
        Field::new("field1", "value2_1"),
        Field::new("field2", "value2_2"),
    ];

    let mut run = Runner::new(store, true);

    run.insert("key1", &value1)?;
    run.insert("key2", &value2)?;
    run.read_expect("key1", &value1)?;
    run.read_expect("key2", &value2)?;

    run.update("key1", &value2)?;
    run.read_expect("key1", &value2)?;
    run.read_expect("key2", &value2)?;

    run.delete("key2")?;
    run.read_expect("key1", &value2)?;
    run.read_missing("key2")?;

    Ok(run.report)
}

/// Generated row `index`: three fields whose values embed the index.
pub fn generated_row(index: usize) -> Vec<Field> {
    (1..=3)
        .map(|n| {
            Field::new(
                format!("field{index}_{n}"),
                format!("value{index}_{n}_{}", "x".repeat((index * 7 + n) % 32)),
            )
        })
        .collect()
}

/// Key of generated row `index`.
pub fn generated_key(index: usize) -> String {
    format!("key{index}")
}

/// Insert, read, update, read, delete and re-read `count` generated rows.
///
/// Each row is updated with the contents of the row half the range away.
pub fn run_bulk<D: KvssdDevice>(store: &RowStore<D>, count: usize) -> Result<SmokeReport, Deviation> {
    let rows: Vec<_> = (0..count).map(generated_row).collect();
    let keys: Vec<_> = (0..count).map(generated_key).collect();
    let mut run = Runner::new(store, false);

    for (key, row) in keys.iter().zip(&rows) {
        run.step(format!("insert {key}"), store.insert_row(key, row))?;
    }
    for (key, row) in keys.iter().zip(&rows) {
        run.read_expect(key, row)?;
    }

    let shift = count / 2;
    for (i, key) in keys.iter().enumerate() {
        let source = &rows[(i + shift) % count];
        run.step(format!("update {key}"), store.update_row(key, source))?;
    }
    for (i, key) in keys.iter().enumerate() {
        run.read_expect(key, &rows[(i + shift) % count])?;
    }

    for key in &keys {
        run.step(format!("delete {key}"), store.delete_row(key))?;
    }
    for key in &keys {
        run.read_missing(key)?;
    }

    info!(
        rows = count,
        operations = run.report.operations,
        "Bulk run complete"
    );
    Ok(run.report)
}
