//! The mission control database and its single bucket.

use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};

use crate::batch::{run_worker, BatchJob, QueuedJob};
use crate::error::{Result, StoreError};

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the database file. Created (mode 0700) if missing.
    pub dir_path: PathBuf,
    /// Database file name.
    pub file: String,
    /// How long to wait for the database file lock before giving up.
    pub file_lock_timeout_ms: u64,
    /// Maximum number of write jobs coalesced into one commit.
    pub max_batch_size: usize,
    /// Maximum delay before a non-full batch is committed.
    pub max_batch_delay_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir_path: PathBuf::from("data"),
            file: "mission_control.db".to_string(),
            file_lock_timeout_ms: 5_000,
            max_batch_size: 1_000,
            max_batch_delay_ms: 10,
        }
    }
}

impl StoreConfig {
    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.dir_path.join(&self.file)
    }
}

/// A scoped handle on the mission control bucket, valid for the duration of
/// one transaction.
pub struct Bucket<'a> {
    conn: &'a Connection,
}

impl<'a> Bucket<'a> {
    pub(crate) fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert or overwrite a record.
    pub fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO mission_control (pair_key, history) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Fetch a record, or `None` if the key is absent.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT history FROM mission_control WHERE pair_key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Delete a record. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        self.conn.execute(
            "DELETE FROM mission_control WHERE pair_key = ?1",
            [key],
        )?;
        Ok(())
    }

    /// Iterate over every record in the bucket.
    ///
    /// An error returned by the callback aborts the iteration and propagates
    /// to the caller, rolling the surrounding transaction back.
    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Result<()>,
    {
        let mut stmt = self
            .conn
            .prepare("SELECT pair_key, history FROM mission_control")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let key: Vec<u8> = row.get(0)?;
            let value: Vec<u8> = row.get(1)?;
            f(&key, &value)?;
        }
        Ok(())
    }

    /// Number of records in the bucket. Used for capacity hints.
    pub fn key_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM mission_control", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

/// The mission control database: one SQLite file, one bucket, one
/// connection shared behind a mutex, plus a batching worker for writes.
#[derive(Debug)]
pub struct MissionControlDb {
    conn: Arc<Mutex<Connection>>,
    batch_tx: Mutex<Option<mpsc::Sender<QueuedJob>>>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl MissionControlDb {
    /// Open (creating if necessary) the database file described by the
    /// configuration.
    ///
    /// The connection runs in exclusive locking mode: if another process
    /// holds the file, the open waits up to `file_lock_timeout` and then
    /// fails with [`StoreError::LockTimeout`].
    pub fn open(config: &StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.dir_path)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(
                &config.dir_path,
                std::fs::Permissions::from_mode(0o700),
            )?;
        }

        let path = config.db_path();
        let conn = Connection::open(&path)?;
        conn.busy_timeout(Duration::from_millis(config.file_lock_timeout_ms))?;

        // Exclusive locking keeps the file lock for the lifetime of the
        // connection, giving cross-process exclusion equivalent to a lock
        // file. The immediate transaction below is what actually acquires
        // the write lock, bounded by the busy timeout.
        conn.query_row("PRAGMA locking_mode = exclusive", [], |_row| Ok(()))?;
        init_schema(&conn).map_err(|err| map_lock_error(err, &path))?;

        tracing::info!(path = %path.display(), "mission control database opened");

        Self::with_connection(
            conn,
            config.max_batch_size,
            Duration::from_millis(config.max_batch_delay_ms),
        )
    }

    /// Open an in-memory database. Same code paths as the file-backed store;
    /// intended for tests.
    pub fn open_in_memory() -> Result<Self> {
        let config = StoreConfig::default();
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Self::with_connection(
            conn,
            config.max_batch_size,
            Duration::from_millis(config.max_batch_delay_ms),
        )
    }

    fn with_connection(
        conn: Connection,
        max_batch_size: usize,
        max_batch_delay: Duration,
    ) -> Result<Self> {
        let conn = Arc::new(Mutex::new(conn));
        let (batch_tx, batch_rx) = mpsc::channel();
        let worker_conn = Arc::clone(&conn);
        let worker = thread::Builder::new()
            .name("lncoord-batch".to_string())
            .spawn(move || run_worker(worker_conn, batch_rx, max_batch_size, max_batch_delay))?;

        Ok(Self {
            conn,
            batch_tx: Mutex::new(Some(batch_tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Run a read-only transaction.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Bucket<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let tx = conn.transaction()?;
        let out = f(&Bucket::new(&tx))?;
        tx.commit()?;
        Ok(out)
    }

    /// Run a read-write transaction. Committed on success, rolled back if
    /// the closure returns an error.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Bucket<'_>) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&Bucket::new(&tx))?;
        tx.commit()?;
        Ok(out)
    }

    /// Queue a write job for batched execution and wait for its result.
    ///
    /// Concurrent jobs are coalesced into a single physical commit. Jobs
    /// must tolerate re-execution: when a batch-mate fails, the batch is
    /// rolled back and every job is rerun in its own transaction.
    pub async fn batch<F>(&self, job: F) -> Result<()>
    where
        F: Fn(&Bucket<'_>) -> Result<()> + Send + 'static,
    {
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        {
            let sender = self.batch_tx.lock().map_err(|_| StoreError::LockPoisoned)?;
            let sender = sender.as_ref().ok_or(StoreError::Closed)?;
            sender
                .send(QueuedJob {
                    job: Box::new(job) as BatchJob,
                    reply: reply_tx,
                })
                .map_err(|_| StoreError::Closed)?;
        }
        reply_rx.await.map_err(|_| StoreError::Closed)?
    }

    /// Shut the store down: stop accepting batch jobs, drain the queue, and
    /// join the worker. Idempotent.
    pub fn close(&self) {
        let sender = match self.batch_tx.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        drop(sender);

        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => None,
        };
        if let Some(handle) = worker {
            if handle.join().is_err() {
                tracing::error!("batch worker panicked during shutdown");
            }
        }
        tracing::info!("mission control database closed");
    }
}

impl Drop for MissionControlDb {
    fn drop(&mut self) {
        self.close();
    }
}

fn init_schema(conn: &Connection) -> std::result::Result<(), rusqlite::Error> {
    conn.execute_batch(
        "BEGIN IMMEDIATE;
         CREATE TABLE IF NOT EXISTS mission_control (
             pair_key BLOB PRIMARY KEY,
             history  BLOB NOT NULL
         );
         COMMIT;",
    )
}

fn map_lock_error(err: rusqlite::Error, path: &Path) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == rusqlite::ErrorCode::DatabaseBusy
                || inner.code == rusqlite::ErrorCode::DatabaseLocked =>
        {
            StoreError::LockTimeout {
                path: path.to_path_buf(),
            }
        }
        _ => StoreError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> Vec<u8> {
        vec![seed; 66]
    }

    #[test]
    fn test_put_get_delete_round_trip() {
        let db = MissionControlDb::open_in_memory().unwrap();

        db.update(|bucket| bucket.put(&key(1), b"{\"fail_time\":1}"))
            .unwrap();

        let value = db.view(|bucket| bucket.get(&key(1))).unwrap();
        assert_eq!(value, Some(b"{\"fail_time\":1}".to_vec()));

        db.update(|bucket| bucket.delete(&key(1))).unwrap();
        let value = db.view(|bucket| bucket.get(&key(1))).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let db = MissionControlDb::open_in_memory().unwrap();
        db.update(|bucket| bucket.delete(&key(9))).unwrap();
    }

    #[test]
    fn test_put_overwrites() {
        let db = MissionControlDb::open_in_memory().unwrap();
        db.update(|bucket| {
            bucket.put(&key(1), b"old")?;
            bucket.put(&key(1), b"new")
        })
        .unwrap();

        let value = db.view(|bucket| bucket.get(&key(1))).unwrap();
        assert_eq!(value, Some(b"new".to_vec()));
    }

    #[test]
    fn test_for_each_and_key_count() {
        let db = MissionControlDb::open_in_memory().unwrap();
        db.update(|bucket| {
            bucket.put(&key(1), b"a")?;
            bucket.put(&key(2), b"b")?;
            bucket.put(&key(3), b"c")
        })
        .unwrap();

        let (seen, count) = db
            .view(|bucket| {
                let mut seen = 0;
                bucket.for_each(|k, v| {
                    assert_eq!(k.len(), 66);
                    assert_eq!(v.len(), 1);
                    seen += 1;
                    Ok(())
                })?;
                Ok((seen, bucket.key_count()?))
            })
            .unwrap();
        assert_eq!(seen, 3);
        assert_eq!(count, 3);
    }

    #[test]
    fn test_for_each_callback_error_aborts() {
        let db = MissionControlDb::open_in_memory().unwrap();
        db.update(|bucket| {
            bucket.put(&key(1), b"a")?;
            bucket.put(&key(2), b"b")
        })
        .unwrap();

        let mut visited = 0;
        let err = db.view(|bucket| {
            bucket.for_each(|_, _| {
                visited += 1;
                Err(StoreError::invalid_record("boom"))
            })
        });
        assert!(matches!(err, Err(StoreError::InvalidRecord(_))));
        assert_eq!(visited, 1);
    }

    #[test]
    fn test_update_rolls_back_on_error() {
        let db = MissionControlDb::open_in_memory().unwrap();
        let err = db.update(|bucket| {
            bucket.put(&key(1), b"a")?;
            Err::<(), _>(StoreError::invalid_record("abort"))
        });
        assert!(err.is_err());

        let value = db.view(|bucket| bucket.get(&key(1))).unwrap();
        assert_eq!(value, None);
    }

    #[test]
    fn test_file_backed_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            dir_path: dir.path().join("data"),
            ..Default::default()
        };

        {
            let db = MissionControlDb::open(&config).unwrap();
            db.update(|bucket| bucket.put(&key(7), b"persisted")).unwrap();
            db.close();
        }

        let db = MissionControlDb::open(&config).unwrap();
        let value = db.view(|bucket| bucket.get(&key(7))).unwrap();
        assert_eq!(value, Some(b"persisted".to_vec()));
    }

    #[test]
    fn test_second_open_times_out_on_lock() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            dir_path: dir.path().join("data"),
            file_lock_timeout_ms: 100,
            ..Default::default()
        };

        let _held = MissionControlDb::open(&config).unwrap();
        let err = MissionControlDb::open(&config).unwrap_err();
        assert!(matches!(err, StoreError::LockTimeout { .. }));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_batch_jobs_are_applied() {
        let db = Arc::new(MissionControlDb::open_in_memory().unwrap());

        let mut handles = Vec::new();
        for i in 0..20u8 {
            let db = Arc::clone(&db);
            handles.push(tokio::spawn(async move {
                db.batch(move |bucket| bucket.put(&key(i), b"v")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let count = db.view(|bucket| bucket.key_count()).unwrap();
        assert_eq!(count, 20);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failing_batch_job_does_not_poison_others() {
        let db = Arc::new(MissionControlDb::open_in_memory().unwrap());

        let good = {
            let db = Arc::clone(&db);
            tokio::spawn(async move { db.batch(|bucket| bucket.put(&key(1), b"ok")).await })
        };
        let bad = {
            let db = Arc::clone(&db);
            tokio::spawn(async move {
                db.batch(|_bucket| Err(StoreError::invalid_record("bad job")))
                    .await
            })
        };

        good.await.unwrap().unwrap();
        let err = bad.await.unwrap();
        assert!(matches!(err, Err(StoreError::InvalidRecord(_))));

        let value = db.view(|bucket| bucket.get(&key(1))).unwrap();
        assert_eq!(value, Some(b"ok".to_vec()));
    }

    #[tokio::test]
    async fn test_batch_after_close_fails() {
        let db = MissionControlDb::open_in_memory().unwrap();
        db.close();
        let err = db.batch(|_bucket| Ok(())).await;
        assert!(matches!(err, Err(StoreError::Closed)));
    }
}
