use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;
use tracing::{info, trace};

const BOOTSTRAP: &str = "
    DEFINE TABLE IF NOT EXISTS migration SCHEMAFULL;
    DEFINE FIELD IF NOT EXISTS slice ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS version ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS checksum ON migration TYPE string;
    DEFINE FIELD IF NOT EXISTS applied_at ON migration TYPE datetime DEFAULT time::now();
    DEFINE INDEX IF NOT EXISTS migration_slice_version ON migration FIELDS slice, version UNIQUE;
";

/// A schema script contributed by a feature slice.
///
/// Scripts are applied once per `(slice, version)` in the order they are supplied; the
/// SHA-256 checksum of an applied script is recorded and verified on every start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Hex-encoded SHA-256 of the script.
    #[must_use]
    pub fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

/// Outcome of a migration run, as `slice:version` keys.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        self.db
            .query(BOOTSTRAP)
            .await
            .context("Bootstrapping migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let applied = self.applied_checksums().await?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            let checksum = migration.checksum();
            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, existing, &checksum)?;
                trace!(slice = migration.slice, version = migration.version, "Skipping migration");
                report.skipped.push(migration.key());
                continue;
            }

            self.apply(migration, checksum).await?;
            info!(slice = migration.slice, version = migration.version, "Applied migration");
            report.applied.push(migration.key());
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration, checksum: String) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum }};
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum))
            .await
            .context(format!("SQL execution failed at {}", migration.key()))?
            .check()
            .map_err(|e| DatabaseError::Migration {
                message: surrealdb::Error::from(e).to_string().into(),
                context: Some(migration.key().into()),
            })?;

        Ok(())
    }

    async fn applied_checksums(&self) -> Result<FxHashMap<String, String>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries
            .into_iter()
            .map(|entry| (format!("{}:{}", entry.slice, entry.version), entry.checksum))
            .collect())
    }
}

fn ensure_checksum_match(
    migration: &Migration,
    existing: &str,
    checksum: &str,
) -> Result<(), DatabaseError> {
    if existing != checksum {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {} (recorded {existing}, found {checksum})",
                migration.key()
            )
            .into(),
            context: Some("Migration already applied with different script".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_is_stable_hex_sha256() {
        let migration = Migration::new("homepage", "0001", "DEFINE TABLE t;");
        let checksum = migration.checksum();
        assert_eq!(checksum.len(), 64);
        assert_eq!(checksum, migration.checksum());
        assert_ne!(checksum, Migration::new("homepage", "0001", "DEFINE TABLE u;").checksum());
    }

    #[test]
    fn mismatch_is_reported() {
        let migration = Migration::new("homepage", "0001", "DEFINE TABLE t;");
        let err = ensure_checksum_match(&migration, "abc", &migration.checksum()).unwrap_err();
        assert_eq!(err.kind(), "Migration");
        assert!(err.to_string().contains("homepage:0001"));
    }
}
