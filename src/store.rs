use std::future::Future;
use std::path::Path;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use tracing::{debug, info, instrument};

use crate::config::{DbConfig, SqlScripts};
use crate::error::{HarvestError, Result};
use crate::model::{EventRow, SpeciesRow, StandingEntry, Tables};

/// Rows per INSERT statement. Keeps every statement well under the 65535
/// bind parameter limit of the Postgres protocol.
const INSERT_CHUNK: usize = 1000;

/// Destination of a full-refresh load.
///
/// The loader always calls `reset_schema`, the three `append_*` methods in
/// table order, `commit`, and finally `run_ranking`.
pub trait Store {
    /// Drop and recreate the destination tables.
    fn reset_schema(&mut self) -> impl Future<Output = Result<()>>;
    fn append_events(&mut self, rows: &[EventRow]) -> impl Future<Output = Result<()>>;
    fn append_species(&mut self, rows: &[SpeciesRow]) -> impl Future<Output = Result<()>>;
    fn append_standings(&mut self, rows: &[StandingEntry]) -> impl Future<Output = Result<()>>;
    /// Make the reset and appends visible.
    fn commit(&mut self) -> impl Future<Output = Result<()>>;
    /// Rebuild the derived ranking tables from the loaded data.
    fn run_ranking(&mut self) -> impl Future<Output = Result<()>>;
}

/// PostgreSQL store. DDL is transactional in Postgres, so the reset and all
/// appends share one transaction and a failed run leaves the previous data
/// in place.
pub struct PgStore {
    pool: PgPool,
    scripts: SqlScripts,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgStore {
    /// Open a single connection to the destination database.
    #[instrument(skip_all, fields(host = %config.host, port = config.port, db = %config.name))]
    pub async fn connect(config: &DbConfig, scripts: SqlScripts) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(config.connect_options())
            .await?;
        info!("connected to database");
        Ok(Self {
            pool,
            scripts,
            tx: None,
        })
    }

    async fn transaction(&mut self) -> Result<&mut Transaction<'static, Postgres>> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(self.tx.insert(tx))
    }
}

async fn read_script(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| HarvestError::Script {
            path: path.to_path_buf(),
            source,
        })
}

impl Store for PgStore {
    #[instrument(skip(self))]
    async fn reset_schema(&mut self) -> Result<()> {
        let drop_sql = read_script(&self.scripts.drop_tables).await?;
        let create_sql = read_script(&self.scripts.create_tables).await?;
        let tx = self.transaction().await?;
        sqlx::raw_sql(&drop_sql).execute(&mut **tx).await?;
        sqlx::raw_sql(&create_sql).execute(&mut **tx).await?;
        info!("destination tables recreated");
        Ok(())
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    async fn append_events(&mut self, rows: &[EventRow]) -> Result<()> {
        let tx = self.transaction().await?;
        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO events (event_id, event_date, event_country, event_name, num_players, winner, format) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.event_id)
                    .push_bind(&row.event_date)
                    .push_bind(&row.event_country)
                    .push_bind(&row.event_name)
                    .push_bind(&row.num_players)
                    .push_bind(&row.winner)
                    .push_bind(row.format.to_string());
            });
            qb.build().execute(&mut **tx).await?;
            debug!(count = chunk.len(), "inserted events");
        }
        Ok(())
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    async fn append_species(&mut self, rows: &[SpeciesRow]) -> Result<()> {
        let tx = self.transaction().await?;
        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO pokemon (pokemon_id, pokemon_name, type_1, type_2, img_url) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.pokemon_id)
                    .push_bind(&row.pokemon_name)
                    .push_bind(&row.type_1)
                    .push_bind(&row.type_2)
                    .push_bind(&row.img_url);
            });
            qb.build().execute(&mut **tx).await?;
            debug!(count = chunk.len(), "inserted species");
        }
        Ok(())
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    async fn append_standings(&mut self, rows: &[StandingEntry]) -> Result<()> {
        let tx = self.transaction().await?;
        for chunk in rows.chunks(INSERT_CHUNK) {
            let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
                "INSERT INTO pokemon_stats (event_id, placement, player_name, player_country, pokemon_name) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.event_id)
                    .push_bind(&row.placement)
                    .push_bind(&row.player_name)
                    .push_bind(&row.player_country)
                    .push_bind(&row.pokemon_name);
            });
            qb.build().execute(&mut **tx).await?;
            debug!(count = chunk.len(), "inserted standings");
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            info!("load committed");
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn run_ranking(&mut self) -> Result<()> {
        let ranking_sql = read_script(&self.scripts.ranking).await?;
        sqlx::raw_sql(&ranking_sql).execute(&self.pool).await?;
        info!("ranking tables rebuilt");
        Ok(())
    }
}

/// Full refresh: reset, then append events, species and standings, in that
/// order, and commit.
#[instrument(skip_all, fields(
    events = tables.events.len(),
    species = tables.species.len(),
    standings = tables.standings.len(),
))]
pub async fn load_tables(store: &mut impl Store, tables: &Tables) -> Result<()> {
    store.reset_schema().await?;
    store.append_events(&tables.events).await?;
    store.append_species(&tables.species).await?;
    store.append_standings(&tables.standings).await?;
    store.commit().await?;
    info!("tables loaded");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::Generation;

    /// Records every call so tests can check what reached the store.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryStore {
        pub(crate) calls: Vec<&'static str>,
        pub(crate) tables: Tables,
        pub(crate) fail_on: Option<&'static str>,
    }

    impl MemoryStore {
        fn record(&mut self, call: &'static str) -> Result<()> {
            self.calls.push(call);
            if self.fail_on == Some(call) {
                return Err(HarvestError::Database(sqlx::Error::PoolClosed));
            }
            Ok(())
        }
    }

    impl Store for MemoryStore {
        async fn reset_schema(&mut self) -> Result<()> {
            self.record("reset")?;
            self.tables = Tables::default();
            Ok(())
        }

        async fn append_events(&mut self, rows: &[EventRow]) -> Result<()> {
            self.record("events")?;
            self.tables.events.extend_from_slice(rows);
            Ok(())
        }

        async fn append_species(&mut self, rows: &[SpeciesRow]) -> Result<()> {
            self.record("species")?;
            self.tables.species.extend_from_slice(rows);
            Ok(())
        }

        async fn append_standings(&mut self, rows: &[StandingEntry]) -> Result<()> {
            self.record("standings")?;
            self.tables.standings.extend_from_slice(rows);
            Ok(())
        }

        async fn commit(&mut self) -> Result<()> {
            self.record("commit")
        }

        async fn run_ranking(&mut self) -> Result<()> {
            self.record("ranking")
        }
    }

    fn sample_tables() -> Tables {
        Tables {
            events: vec![EventRow {
                event_id: 1,
                event_date: "01 Jun 24".to_string(),
                event_country: "Peru".to_string(),
                event_name: "Lima Regional".to_string(),
                num_players: "90".to_string(),
                winner: "Ana".to_string(),
                format: Generation::Gen9,
            }],
            species: vec![SpeciesRow {
                pokemon_id: 25,
                pokemon_name: "Pikachu".to_string(),
                type_1: "Electric".to_string(),
                type_2: None,
                img_url: "https://img/25.png".to_string(),
            }],
            standings: vec![StandingEntry {
                event_id: 1,
                placement: "1".to_string(),
                player_name: "Ana".to_string(),
                player_country: "Peru".to_string(),
                pokemon_name: "Pikachu".to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_load_order() {
        let mut store = MemoryStore::default();
        let tables = sample_tables();

        load_tables(&mut store, &tables).await.unwrap();

        assert_eq!(
            store.calls,
            vec!["reset", "events", "species", "standings", "commit"]
        );
        assert_eq!(store.tables, tables);
    }

    #[tokio::test]
    async fn test_load_stops_at_first_failure() {
        let mut store = MemoryStore {
            fail_on: Some("species"),
            ..Default::default()
        };

        let err = load_tables(&mut store, &sample_tables()).await.unwrap_err();

        assert!(matches!(err, HarvestError::Database(_)));
        assert_eq!(store.calls, vec!["reset", "events", "species"]);
    }

    #[tokio::test]
    async fn test_missing_script() {
        let err = read_script(Path::new("/definitely/not/here.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, HarvestError::Script { .. }));
    }
}
