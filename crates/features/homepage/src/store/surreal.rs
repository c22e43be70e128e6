use super::LayoutStore;
use crate::catalog::SectionId;
use crate::error::HomepageError;
use crate::model::{Layout, LayoutVersion, Section};
use chrono::{DateTime, SecondsFormat, Utc};
use folio_database::Database;
use folio_kernel::domain::constants::{HOMEPAGE_LAYOUT_RECORD, HOMEPAGE_LAYOUT_TABLE};
use std::str::FromStr;
use surrealdb::types::SurrealValue;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, SurrealValue)]
struct SectionRecord {
    id: String,
    order: i64,
    visible: bool,
}

#[derive(Debug, Clone, SurrealValue)]
struct LayoutRecord {
    sections: Vec<SectionRecord>,
    version: i64,
    updated_at: String,
}

/// Layout persisted as the single record `homepage_layout:current`.
///
/// Swaps are a conditional `UPDATE ... WHERE version = $expected`, which `SurrealDB` applies
/// atomically per record.
#[derive(Debug, Clone)]
pub struct SurrealLayoutStore {
    db: Database,
    record: String,
}

impl SurrealLayoutStore {
    /// Binds to the layout record, seeding it with the catalog defaults when absent.
    ///
    /// The `homepage_layout` table must already be defined by the slice migrations.
    ///
    /// # Errors
    /// [`HomepageError::StoreUnavailable`] if the record cannot be read or created.
    #[instrument(skip_all, fields(ns = db.namespace(), db = db.database()))]
    pub async fn open(db: Database) -> Result<Self, HomepageError> {
        let store =
            Self { db, record: format!("{HOMEPAGE_LAYOUT_TABLE}:{HOMEPAGE_LAYOUT_RECORD}") };
        if store.fetch().await?.is_none() {
            store.seed().await?;
        }
        Ok(store)
    }

    async fn seed(&self) -> Result<(), HomepageError> {
        let seed = LayoutRecord::try_from(&Layout::seed(Utc::now()))?;
        let created = self
            .db
            .query(format!("CREATE {} CONTENT $seed", self.record))
            .bind(("seed", seed))
            .await?
            .check()
            .map_err(surrealdb::Error::from);

        if let Err(err) = created {
            // Another instance may have seeded first.
            if self.fetch().await?.is_some() {
                return Ok(());
            }
            return Err(err.into());
        }
        info!(record = %self.record, "Seeded default homepage layout");
        Ok(())
    }

    async fn fetch(&self) -> Result<Option<Layout>, HomepageError> {
        let record = self
            .db
            .query(format!("SELECT sections, version, updated_at FROM ONLY {}", self.record))
            .await?
            .take::<Option<LayoutRecord>>(0)?;
        record.map(Layout::try_from).transpose()
    }
}

impl LayoutStore for SurrealLayoutStore {
    async fn load(&self) -> Result<Layout, HomepageError> {
        self.fetch().await?.ok_or_else(|| HomepageError::Corrupted {
            message: "layout record is missing".into(),
            context: Some(self.record.clone().into()),
        })
    }

    #[instrument(skip(self, sections), fields(record = %self.record, %expected))]
    async fn compare_and_swap(
        &self,
        expected: LayoutVersion,
        sections: Vec<Section>,
    ) -> Result<Layout, HomepageError> {
        // Stored versions never exceed i64::MAX, so such a base can only be stale.
        let Ok(expected_raw) = i64::try_from(expected.get()) else {
            let current = self.load().await?.version;
            return Err(HomepageError::Conflict { expected, current, context: None });
        };
        let sections: Vec<SectionRecord> = sections.iter().map(SectionRecord::from).collect();

        let swapped = self
            .db
            .query(format!(
                "UPDATE {} SET sections = $sections, version += 1, updated_at = $updated_at
                WHERE version = $expected
                RETURN sections, version, updated_at",
                self.record
            ))
            .bind(("sections", sections))
            .bind(("updated_at", rfc3339(Utc::now())))
            .bind(("expected", expected_raw))
            .await?
            .take::<Vec<LayoutRecord>>(0)?;

        if let Some(record) = swapped.into_iter().next() {
            let layout = Layout::try_from(record)?;
            debug!(version = %layout.version, "Layout swapped in database");
            return Ok(layout);
        }

        let current = self.load().await?.version;
        Err(HomepageError::Conflict { expected, current, context: None })
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&Section> for SectionRecord {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.as_str().to_owned(),
            order: i64::from(section.order),
            visible: section.visible,
        }
    }
}

impl TryFrom<&Layout> for LayoutRecord {
    type Error = HomepageError;

    fn try_from(layout: &Layout) -> Result<Self, Self::Error> {
        let version = i64::try_from(layout.version.get()).map_err(|_| HomepageError::Internal {
            message: format!("version {} out of range", layout.version).into(),
            context: Some("Encoding homepage layout".into()),
        })?;
        Ok(Self {
            sections: layout.sections.iter().map(SectionRecord::from).collect(),
            version,
            updated_at: rfc3339(layout.updated_at),
        })
    }
}

impl TryFrom<SectionRecord> for Section {
    type Error = HomepageError;

    fn try_from(record: SectionRecord) -> Result<Self, Self::Error> {
        let id = SectionId::from_str(&record.id).map_err(|_| corrupted("section id", &record.id))?;
        let order = u32::try_from(record.order)
            .map_err(|_| corrupted("section order", &record.order.to_string()))?;
        Ok(Self { id, order, visible: record.visible })
    }
}

impl TryFrom<LayoutRecord> for Layout {
    type Error = HomepageError;

    fn try_from(record: LayoutRecord) -> Result<Self, Self::Error> {
        let version = u64::try_from(record.version)
            .map_err(|_| corrupted("version", &record.version.to_string()))?;
        let updated_at = DateTime::parse_from_rfc3339(&record.updated_at)
            .map_err(|_| corrupted("updated_at", &record.updated_at))?
            .with_timezone(&Utc);
        let sections =
            record.sections.into_iter().map(Section::try_from).collect::<Result<_, _>>()?;
        Ok(Self { sections, version: LayoutVersion(version), updated_at })
    }
}

fn corrupted(field: &'static str, value: &str) -> HomepageError {
    HomepageError::Corrupted {
        message: format!("unreadable {field} `{value}`").into(),
        context: Some("Decoding homepage layout".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_sections;

    #[test]
    fn records_decode_back_to_layout() {
        let layout = Layout::seed(DateTime::UNIX_EPOCH);
        let decoded = Layout::try_from(LayoutRecord::try_from(&layout).unwrap()).unwrap();
        assert_eq!(decoded, layout);
    }

    #[test]
    fn unknown_stored_id_is_corruption() {
        let mut record = LayoutRecord::try_from(&Layout::seed(Utc::now())).unwrap();
        record.sections[0].id = "pricing".to_owned();
        let err = Layout::try_from(record).unwrap_err();
        assert_eq!(err.kind(), "Corrupted");
    }

    #[test]
    fn unencodable_version_is_rejected() {
        let layout = Layout { version: LayoutVersion(u64::MAX), ..Layout::seed(Utc::now()) };
        let err = LayoutRecord::try_from(&layout).unwrap_err();
        assert_eq!(err.kind(), "Internal");
    }

    #[test]
    fn negative_version_is_corruption() {
        let record = LayoutRecord {
            sections: default_sections().iter().map(SectionRecord::from).collect(),
            version: -3,
            updated_at: rfc3339(Utc::now()),
        };
        assert!(matches!(Layout::try_from(record), Err(HomepageError::Corrupted { .. })));
    }
}
