//! Cube repository contract and SQLite implementation.
//!
//! # Invariants
//! - Cubes are listed in insertion (`id ASC`) order.
//! - Color filters are exact, case-sensitive matches.

use crate::db::ensure_tables;
use crate::model::cube::{Cube, CubeId, NewCube};
use crate::model::group::{GroupId, GroupValidationError};
use crate::repo::{count_from_db, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const CUBE_SELECT_SQL: &str = "SELECT
    id,
    group_id,
    color,
    face,
    individual_time,
    created_at,
    updated_at
FROM cubes";

/// Group ids bound per `IN (...)` query, well under SQLite's variable limit.
const GROUP_ID_BATCH_SIZE: usize = 500;

/// Repository interface for cube timing records.
pub trait CubeRepository {
    /// Inserts one cube and returns its generated id.
    fn create_cube(&self, group_id: Option<GroupId>, cube: &NewCube) -> RepoResult<CubeId>;
    fn get_cube(&self, id: CubeId) -> RepoResult<Option<Cube>>;
    /// Cubes owned by any of `group_ids`, in `id` order within each group.
    ///
    /// Any number of ids is accepted; they are queried in batches.
    fn list_cubes_for_groups(&self, group_ids: &[GroupId]) -> RepoResult<Vec<Cube>>;
    fn individual_times_by_color(&self, color: &str) -> RepoResult<Vec<f64>>;
    fn count_cubes(&self) -> RepoResult<u64>;
}

/// SQLite-backed cube repository.
pub struct SqliteCubeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCubeRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["cubes"])?;
        Ok(Self { conn })
    }
}

impl CubeRepository for SqliteCubeRepository<'_> {
    fn create_cube(&self, group_id: Option<GroupId>, cube: &NewCube) -> RepoResult<CubeId> {
        let mut errors = Vec::new();
        cube.collect_errors("", &mut errors);
        GroupValidationError::check(errors)?;

        self.conn.execute(
            "INSERT INTO cubes (group_id, color, face, individual_time)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                group_id,
                cube.color.as_str(),
                cube.face.as_str(),
                cube.individual_time
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_cube(&self, id: CubeId) -> RepoResult<Option<Cube>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CUBE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_cube_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_cubes_for_groups(&self, group_ids: &[GroupId]) -> RepoResult<Vec<Cube>> {
        let mut cubes = Vec::new();
        for batch in group_ids.chunks(GROUP_ID_BATCH_SIZE) {
            let placeholders = vec!["?"; batch.len()].join(", ");
            let sql = format!(
                "{CUBE_SELECT_SQL} WHERE group_id IN ({placeholders}) ORDER BY group_id ASC, id ASC;"
            );
            let bind_values = batch.iter().map(|id| Value::Integer(*id));

            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                cubes.push(parse_cube_row(row)?);
            }
        }
        Ok(cubes)
    }

    fn individual_times_by_color(&self, color: &str) -> RepoResult<Vec<f64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT individual_time FROM cubes WHERE color = ?1 ORDER BY id ASC;")?;
        let mut rows = stmt.query([color])?;
        let mut times = Vec::new();
        while let Some(row) = rows.next()? {
            times.push(row.get::<_, f64>(0)?);
        }
        Ok(times)
    }

    fn count_cubes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cubes;", [], |row| row.get(0))?;
        count_from_db(count, "cubes")
    }
}

fn parse_cube_row(row: &Row<'_>) -> RepoResult<Cube> {
    Ok(Cube {
        id: row.get("id")?,
        group_id: row.get("group_id")?,
        color: row.get("color")?,
        face: row.get("face")?,
        individual_time: row.get("individual_time")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
