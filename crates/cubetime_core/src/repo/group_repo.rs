//! Group-of-three repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create a group and its three cubes as one atomic unit.
//! - Load groups with their cubes eagerly attached.
//!
//! # Invariants
//! - `create_group` runs every insert/update in one immediate transaction;
//!   a failure leaves no group or cube rows behind.
//! - Recency order is `created_at DESC, id DESC`.
//! - Loaded groups satisfy `Group::check_links()`.

use crate::db::ensure_tables;
use crate::model::cube::{Cube, CubeId};
use crate::model::group::{Group, GroupId, GroupSummary, GroupTime, NewGroup};
use crate::repo::cube_repo::{CubeRepository, SqliteCubeRepository};
use crate::repo::{count_from_db, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::collections::HashMap;

const GROUP_SELECT_SQL: &str = "SELECT
    id,
    cube_1,
    cube_2,
    cube_3,
    group_time,
    created_at,
    updated_at
FROM group_of_three";

const RECENCY_ORDER_SQL: &str = "ORDER BY created_at DESC, id DESC";

/// Repository interface for group-of-three records.
pub trait GroupRepository {
    /// Persists the group, its three cubes and the `cube_1..3` links.
    fn create_group(&mut self, group: &NewGroup) -> RepoResult<Group>;
    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>>;
    /// Most recent groups first, at most `limit`.
    fn list_recent_groups(&self, limit: u32) -> RepoResult<Vec<Group>>;
    /// Every group, most recent first.
    fn list_all_groups(&self) -> RepoResult<Vec<Group>>;
    /// `id` + `group_time` of the most recent groups, at most `limit`.
    fn latest_group_times(&self, limit: u32) -> RepoResult<Vec<GroupTime>>;
    fn summary(&self) -> RepoResult<GroupSummary>;
}

/// SQLite-backed group repository.
pub struct SqliteGroupRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteGroupRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["group_of_three", "cubes"])?;
        Ok(Self { conn })
    }

    fn conn(&self) -> &Connection {
        &*self.conn
    }
}

impl GroupRepository for SqliteGroupRepository<'_> {
    fn create_group(&mut self, group: &NewGroup) -> RepoResult<Group> {
        group.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO group_of_three (group_time) VALUES (?1);",
            params![group.group_time],
        )?;
        let group_id = tx.last_insert_rowid();

        let cube_ids = {
            let cubes = SqliteCubeRepository::try_new(&tx)?;
            group
                .cubes
                .iter()
                .map(|cube| cubes.create_cube(Some(group_id), cube))
                .collect::<RepoResult<Vec<CubeId>>>()?
        };
        let [cube_1, cube_2, cube_3] = <[CubeId; 3]>::try_from(cube_ids).map_err(|ids| {
            RepoError::InvalidData(format!(
                "group {group_id} received {} cube ids, expected 3",
                ids.len()
            ))
        })?;

        let changed = tx.execute(
            "UPDATE group_of_three
             SET
                cube_1 = ?1,
                cube_2 = ?2,
                cube_3 = ?3,
                updated_at = CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)
             WHERE id = ?4;",
            params![cube_1, cube_2, cube_3, group_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "group",
                id: group_id,
            });
        }

        let created = load_groups(&tx, &format!("{GROUP_SELECT_SQL} WHERE id = ?1;"), [group_id])?
            .pop()
            .ok_or_else(|| {
                RepoError::InvalidData(format!("group {group_id} missing in read-back"))
            })?;

        tx.commit()?;
        Ok(created)
    }

    fn get_group(&self, id: GroupId) -> RepoResult<Option<Group>> {
        let mut groups = load_groups(
            self.conn(),
            &format!("{GROUP_SELECT_SQL} WHERE id = ?1;"),
            [id],
        )?;
        Ok(groups.pop())
    }

    fn list_recent_groups(&self, limit: u32) -> RepoResult<Vec<Group>> {
        load_groups(
            self.conn(),
            &format!("{GROUP_SELECT_SQL} {RECENCY_ORDER_SQL} LIMIT ?1;"),
            [i64::from(limit)],
        )
    }

    fn list_all_groups(&self) -> RepoResult<Vec<Group>> {
        load_groups(
            self.conn(),
            &format!("{GROUP_SELECT_SQL} {RECENCY_ORDER_SQL};"),
            [],
        )
    }

    fn latest_group_times(&self, limit: u32) -> RepoResult<Vec<GroupTime>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT id, group_time FROM group_of_three {RECENCY_ORDER_SQL} LIMIT ?1;"
        ))?;
        let mut rows = stmt.query([i64::from(limit)])?;
        let mut times = Vec::new();
        while let Some(row) = rows.next()? {
            times.push(GroupTime {
                id: row.get("id")?,
                group_time: row.get("group_time")?,
            });
        }
        Ok(times)
    }

    fn summary(&self) -> RepoResult<GroupSummary> {
        let (groups, group_time): (i64, f64) = self.conn().query_row(
            "SELECT COUNT(*), COALESCE(SUM(group_time), 0.0) FROM group_of_three;",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let total_cubes = SqliteCubeRepository::try_new(self.conn())?.count_cubes()?;

        Ok(GroupSummary {
            total_groups: count_from_db(groups, "group_of_three")?,
            total_cubes,
            total_group_time: group_time,
        })
    }
}

/// Runs a group query and attaches each row's cubes with one extra query.
fn load_groups<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> RepoResult<Vec<Group>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut groups = Vec::new();
    while let Some(row) = rows.next()? {
        groups.push(parse_group_row(row)?);
    }

    let group_ids: Vec<GroupId> = groups.iter().map(|group| group.id).collect();
    let mut cubes_by_group: HashMap<GroupId, Vec<Cube>> = HashMap::new();
    for cube in SqliteCubeRepository::try_new(conn)?.list_cubes_for_groups(&group_ids)? {
        if let Some(group_id) = cube.group_id {
            cubes_by_group.entry(group_id).or_default().push(cube);
        }
    }

    for group in &mut groups {
        group.cubes = cubes_by_group.remove(&group.id).unwrap_or_default();
        group.check_links().map_err(RepoError::InvalidData)?;
    }

    Ok(groups)
}

fn parse_group_row(row: &Row<'_>) -> RepoResult<Group> {
    Ok(Group {
        id: row.get("id")?,
        cube_1: row.get("cube_1")?,
        cube_2: row.get("cube_2")?,
        cube_3: row.get("cube_3")?,
        group_time: row.get("group_time")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        cubes: Vec::new(),
    })
}
