#![allow(dead_code)]

use cubetime_core::{Group, GroupRepository, NewCube, NewGroup, SqliteGroupRepository};
use rusqlite::{params, Connection};

pub fn new_group(group_time: f64, times: [f64; 3]) -> NewGroup {
    NewGroup::new(
        group_time,
        vec![
            NewCube::new("red", "Encima", times[0]),
            NewCube::new("blue", "Direita", times[1]),
            NewCube::new("green", "Esquerda", times[2]),
        ],
    )
}

pub fn create(conn: &mut Connection, input: &NewGroup) -> Group {
    let mut repo = SqliteGroupRepository::try_new(conn).unwrap();
    repo.create_group(input).unwrap()
}

pub fn set_created_at(conn: &Connection, group_id: i64, created_at: i64) {
    conn.execute(
        "UPDATE group_of_three SET created_at = ?1 WHERE id = ?2;",
        params![created_at, group_id],
    )
    .unwrap();
}

pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}
