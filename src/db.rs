#[cfg(feature = "ssr")]
mod db_impl {
    use crate::error::StorageError;
    use crate::storage::KeyValueStorage;
    use leptos::logging;
    use leptos::logging::log;
    use rusqlite::{params, Connection, OptionalExtension};
    use std::sync::{Arc, Mutex, MutexGuard};

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::models::review::ReviewDraft;
        use crate::models::session::{Session, SubscriptionTier};
        use crate::services::Services;
        use crate::storage::REVIEWS_KEY;

        // Helper function to create test database
        fn create_test_db() -> SqliteStorage {
            log!("[TEST] Creating in-memory test database");
            let db = SqliteStorage::new(":memory:").unwrap();
            db.create_schema().unwrap();
            log!("[TEST] Database schema created");
            db
        }

        #[test]
        fn test_schema_creation() {
            log!("[TEST] Starting test_schema_creation");
            let db = create_test_db();

            let conn = db.conn().unwrap();
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table'")
                .unwrap();
            let tables: Vec<String> = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<Result<_, _>>()
                .unwrap();

            assert!(tables.contains(&"kv_store".to_string()));
        }

        #[test]
        fn test_key_lifecycle() {
            log!("[TEST] Starting test_key_lifecycle");
            let db = create_test_db();

            assert_eq!(db.get("reviews").unwrap(), None);

            db.set("reviews", "[]").unwrap();
            assert_eq!(db.get("reviews").unwrap().as_deref(), Some("[]"));
            log!("[TEST] Key insertion - PASSED");

            db.set("reviews", "[1]").unwrap();
            assert_eq!(db.get("reviews").unwrap().as_deref(), Some("[1]"));
            log!("[TEST] Key overwrite - PASSED");

            db.remove("reviews").unwrap();
            assert_eq!(db.get("reviews").unwrap(), None);
            log!("[TEST] Key removal - PASSED");
        }

        #[test]
        fn test_services_persist_through_sqlite() {
            log!("[TEST] Starting test_services_persist_through_sqlite");
            let db = create_test_db();
            let session = Session {
                user_id: "student-1".into(),
                name: "Student".into(),
                email: "student@example.com".into(),
                tier: SubscriptionTier::Free,
            };

            let mut services = Services::load(db.clone()).unwrap();
            let review = services
                .reviews
                .add_review(
                    Some(&session),
                    ReviewDraft {
                        service_id: "svc-1".into(),
                        provider_id: "tutor-1".into(),
                        rating: 5,
                        comment: "Great session".into(),
                    },
                )
                .unwrap();

            assert!(db.get(REVIEWS_KEY).unwrap().unwrap().contains(&review.id));

            let reloaded = Services::load(db).unwrap();
            assert_eq!(reloaded.reviews.store().records(), services.reviews.store().records());
            log!("[TEST] test_services_persist_through_sqlite completed successfully");
        }
    }

    /// Key-value table in a sqlite database; the server-side counterpart of
    /// the browser's localStorage.
    #[derive(Debug, Clone)]
    pub struct SqliteStorage {
        conn: Arc<Mutex<Connection>>,
    }

    impl SqliteStorage {
        // Create a new database connection
        pub fn new(db_path: &str) -> Result<Self, StorageError> {
            let conn = Connection::open(db_path)?;
            logging::log!("Database connection established at: {}", db_path);
            Ok(SqliteStorage {
                conn: Arc::new(Mutex::new(conn)),
            })
        }

        pub fn create_schema(&self) -> Result<(), StorageError> {
            let conn = self.conn()?;
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );",
            )
            .map_err(|e| {
                logging::error!("[DB] Failed creating kv_store table: {}", e);
                e
            })?;
            Ok(())
        }

        fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
            self.conn
                .lock()
                .map_err(|_| StorageError::Unavailable("sqlite connection lock poisoned".into()))
        }

        // function to log database state
        pub fn debug_dump(&self) -> Result<(), StorageError> {
            let conn = self.conn()?;
            log!("[DATABASE DEBUG] Keys:");
            let mut stmt = conn.prepare("SELECT key, length(value), updated_at FROM kv_store")?;
            let rows = stmt.query_map([], |row| {
                Ok(format!(
                    "Key: {}, Bytes: {}, Updated: {}",
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?
                ))
            })?;
            for row in rows {
                log!("[DATABASE DEBUG] {}", row?);
            }
            Ok(())
        }
    }

    impl KeyValueStorage for SqliteStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            let conn = self.conn()?;
            let value = conn
                .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |row| row.get(0))
                .optional()?;
            Ok(value)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO kv_store (key, value) VALUES (?, ?)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = CURRENT_TIMESTAMP",
                params![key, value],
            )?;
            log!("[DB] Wrote {} bytes under '{}'", value.len(), key);
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            let conn = self.conn()?;
            conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
            Ok(())
        }
    }
}

#[cfg(feature = "ssr")]
pub use db_impl::SqliteStorage;
