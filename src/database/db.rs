use super::db_structs::{Contest, ContestCandidate, Politician, RunningMate};
use crate::{model::structures::contest_type::ContestType, utils::progress_utils::progress_bar};
use chrono::{NaiveDate, Utc};
use indexmap::IndexMap;
use itertools::{multiunzip, Itertools};
use postgres_types::ToSql;
use std::collections::HashMap;
use tokio_postgres::{Client, Error, NoTls, Row, Transaction};
use tracing::{error, info, warn};

const HISTORY_BATCH_SIZE: usize = 50_000;

pub struct DbClient {
    client: Client
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, Error> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient { client })
    }

    /// Date of the most recent data refresh. Contests after this date are
    /// upcoming. Falls back to today when no refresh has been recorded.
    pub async fn get_latest_data_date(&self) -> Result<NaiveDate, Error> {
        let row = self
            .client
            .query_one("SELECT MAX(refreshed_on) AS latest FROM data_refreshes", &[])
            .await?;

        match row.get::<_, Option<NaiveDate>>("latest") {
            Some(date) => Ok(date),
            None => {
                let today = Utc::now().date_naive();
                warn!("No data refresh recorded, treating {} as the latest data date", today);
                Ok(today)
            }
        }
    }

    /// Fetches every contest with its candidate entries, ordered by date then id.
    /// Running mate entries are attached to their ticket lead rather than
    /// returned as candidates.
    pub async fn get_contests(&self, latest_data_date: NaiveDate) -> Result<Vec<Contest>, Error> {
        info!("Fetching contests...");
        let rows = self
            .client
            .query(
                "
            SELECT
                c.id AS contest_id, c.name AS contest_name, c.contest_type AS contest_type, c.date AS contest_date,
                cc.id AS candidate_id, cc.politician_id AS politician_id, cc.name AS candidate_name,
                cc.party AS party, cc.votes AS votes, cc.won AS won, cc.incumbent AS incumbent,
                cc.running_mate_of AS running_mate_of
            FROM contests c
                     LEFT JOIN contest_candidates cc ON c.id = cc.contest_id
            ORDER BY c.date, c.id, cc.id;",
                &[]
            )
            .await?;

        info!("Contests fetched, linking candidates...");

        let mut contests: IndexMap<i32, Contest> = IndexMap::new();
        let mut running_mates: HashMap<i32, Vec<RunningMate>> = HashMap::new();

        for row in &rows {
            let contest_id = row.get::<_, i32>("contest_id");
            let contest = contests
                .entry(contest_id)
                .or_insert_with(|| Self::contest_from_row(row, latest_data_date));

            // Contest without candidate entries
            let Some(candidate_id) = row.get::<_, Option<i32>>("candidate_id") else {
                continue;
            };

            match row.get::<_, Option<i32>>("running_mate_of") {
                Some(lead_id) => running_mates.entry(lead_id).or_default().push(RunningMate {
                    politician_id: row.get("politician_id"),
                    name: row.get("candidate_name")
                }),
                None => contest.candidates.push(Self::candidate_from_row(row, candidate_id))
            }
        }

        for candidate in contests.values_mut().flat_map(|c| c.candidates.iter_mut()) {
            if let Some(mates) = running_mates.remove(&candidate.id) {
                candidate.running_mates = mates;
            }
        }

        if !running_mates.is_empty() {
            warn!(
                "{} running mate entries reference a ticket lead that does not exist",
                running_mates.values().map(|m| m.len()).sum::<usize>()
            );
        }

        let contests = contests.into_values().collect_vec();
        info!(
            "Contest fetching complete: {} contests, {} upcoming",
            contests.len(),
            contests.iter().filter(|c| c.upcoming).count()
        );

        Ok(contests)
    }

    fn contest_from_row(row: &Row, latest_data_date: NaiveDate) -> Contest {
        let date = row.get::<_, NaiveDate>("contest_date");

        Contest {
            id: row.get("contest_id"),
            name: row.get("contest_name"),
            contest_type: ContestType::parse(row.get::<_, &str>("contest_type")),
            date,
            candidates: Vec::new(),
            upcoming: date > latest_data_date
        }
    }

    fn candidate_from_row(row: &Row, candidate_id: i32) -> ContestCandidate {
        ContestCandidate {
            id: candidate_id,
            politician_id: row.get("politician_id"),
            name: row.get("candidate_name"),
            party: row.get("party"),
            votes: row.get("votes"),
            won: row.get("won"),
            incumbent: row.get("incumbent"),
            running_mates: Vec::new(),
            projected_rating: None
        }
    }

    /// Publishes the run's results in a single transaction: replaces every
    /// politician and its rating history, and writes projected ratings onto
    /// the candidates of upcoming contests. Nothing is written if any step fails.
    pub async fn save_results(&mut self, politicians: &[Politician], upcoming_contests: &[Contest]) -> Result<(), Error> {
        let transaction = self.client.transaction().await?;

        Self::truncate_table(&transaction, "politician_rating_history").await?;
        Self::truncate_table(&transaction, "politicians").await?;

        Self::save_politicians(&transaction, politicians).await?;
        Self::save_rating_history(&transaction, politicians).await?;
        Self::save_projected_ratings(&transaction, upcoming_contests).await?;

        transaction.commit().await?;

        info!("Results committed for {} politicians", politicians.len());
        Ok(())
    }

    async fn save_politicians(transaction: &Transaction<'_>, politicians: &[Politician]) -> Result<(), Error> {
        if politicians.is_empty() {
            warn!("No politicians to save");
            return Ok(());
        }

        let ids = politicians.iter().map(|p| p.id).collect_vec();
        let names = politicians.iter().map(|p| p.name.as_str()).collect_vec();
        let searchable_names = politicians.iter().map(|p| p.searchable_name.as_str()).collect_vec();
        let parties = politicians.iter().map(|p| p.party.as_str()).collect_vec();
        let last_ran_in = politicians.iter().map(|p| p.last_ran_in).collect_vec();
        let mus = politicians.iter().map(|p| p.rating().mu).collect_vec();
        let sigmas = politicians.iter().map(|p| p.rating().sigma).collect_vec();
        let rankings = politicians.iter().map(|p| p.ranking as i32).collect_vec();
        let previous_rankings = politicians
            .iter()
            .map(|p| p.previous_ranking.map(|r| r as i32))
            .collect_vec();
        let retired = politicians.iter().map(|p| p.retired).collect_vec();
        let low_confidence = politicians.iter().map(|p| p.low_confidence).collect_vec();

        let query = "INSERT INTO politicians (id, name, searchable_name, party, last_ran_in, mu, sigma, \
        ranking, previous_ranking, retired, low_confidence) \
        SELECT * FROM UNNEST($1::int4[], $2::text[], $3::text[], $4::text[], $5::int4[], $6::float8[], \
        $7::float8[], $8::int4[], $9::int4[], $10::bool[], $11::bool[])";
        let values: &[&(dyn ToSql + Sync)] = &[
            &ids,
            &names,
            &searchable_names,
            &parties,
            &last_ran_in,
            &mus,
            &sigmas,
            &rankings,
            &previous_rankings,
            &retired,
            &low_confidence
        ];

        let inserted = transaction.execute(query, values).await?;
        info!("Saved {} politicians", inserted);

        Ok(())
    }

    /// Saves every rating history entry in batches, preserving replay order
    /// through the sequence column
    async fn save_rating_history(transaction: &Transaction<'_>, politicians: &[Politician]) -> Result<(), Error> {
        let entries = politicians
            .iter()
            .flat_map(|p| {
                p.rating_history
                    .iter()
                    .enumerate()
                    .map(move |(i, e)| (p.id, i as i32, e.contest_id, e.rating.mu, e.rating.sigma))
            })
            .collect_vec();

        let query = "INSERT INTO politician_rating_history (politician_id, sequence, contest_id, mu, sigma) \
        SELECT * FROM UNNEST($1::int4[], $2::int4[], $3::int4[], $4::float8[], $5::float8[])";

        let n_batches = entries.len().div_ceil(HISTORY_BATCH_SIZE);
        let p_bar = progress_bar(n_batches as u64, "Saving rating history".to_string());

        for batch in entries.chunks(HISTORY_BATCH_SIZE) {
            let (politician_ids, sequences, contest_ids, mus, sigmas): (
                Vec<i32>,
                Vec<i32>,
                Vec<Option<i32>>,
                Vec<f64>,
                Vec<f64>
            ) = multiunzip(batch.iter().copied());

            let values: &[&(dyn ToSql + Sync)] = &[&politician_ids, &sequences, &contest_ids, &mus, &sigmas];
            transaction.execute(query, values).await?;

            p_bar.inc(1);
        }

        p_bar.finish();
        info!("Saved {} rating history entries", entries.len());

        Ok(())
    }

    /// Clears stale projections, then annotates the candidates of upcoming contests
    async fn save_projected_ratings(transaction: &Transaction<'_>, upcoming_contests: &[Contest]) -> Result<(), Error> {
        transaction
            .execute(
                "UPDATE contest_candidates SET projected_mu = NULL, projected_sigma = NULL, \
                projected_low_confidence = NULL WHERE projected_mu IS NOT NULL",
                &[]
            )
            .await?;

        let statement = transaction
            .prepare(
                "UPDATE contest_candidates SET projected_mu = $1, projected_sigma = $2, \
                projected_low_confidence = $3 WHERE id = $4"
            )
            .await?;

        let mut n_annotated = 0;
        for contest in upcoming_contests.iter().filter(|c| c.upcoming) {
            for candidate in &contest.candidates {
                if let Some(projected) = candidate.projected_rating {
                    let values: &[&(dyn ToSql + Sync)] =
                        &[&projected.mu, &projected.sigma, &projected.low_confidence, &candidate.id];
                    transaction.execute(&statement, values).await?;
                    n_annotated += 1;
                }
            }
        }

        info!("Projected ratings written for {} upcoming candidates", n_annotated);
        Ok(())
    }

    async fn truncate_table(transaction: &Transaction<'_>, table: &str) -> Result<(), Error> {
        transaction
            .batch_execute(format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", table).as_str())
            .await?;

        info!("Truncated the {} table!", table);
        Ok(())
    }
}
