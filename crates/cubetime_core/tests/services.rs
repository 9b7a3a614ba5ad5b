mod common;

use common::{create, new_group, row_count};
use cubetime_core::db::open_db_in_memory;
use cubetime_core::{
    GroupService, GroupServiceError, NewCube, NewGroup, NotificationKind, NotificationService,
    Pace, SqliteCubeRepository, SqliteGroupRepository, StatsService,
};

#[test]
fn create_group_through_service_returns_linked_group() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let mut service = GroupService::new(repo);

    let group = service
        .create_group(&new_group(7.0, [2.0, 2.5, 2.5]))
        .unwrap();
    assert_eq!(group.cubes.len(), 3);
    assert_eq!(
        group.linked_cube_ids(),
        [
            Some(group.cubes[0].id),
            Some(group.cubes[1].id),
            Some(group.cubes[2].id)
        ]
    );
}

#[test]
fn invalid_input_maps_to_validation_error_without_writes() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
        let mut service = GroupService::new(repo);
        let input = NewGroup::new(-2.0, vec![NewCube::new("red", "Encima", 1.0)]);
        let err = service.create_group(&input).unwrap_err();
        match err {
            GroupServiceError::Validation(validation) => {
                assert!(validation.has_field("group_time"));
                assert!(validation.has_field("cubes"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(row_count(&conn, "group_of_three"), 0);
    assert_eq!(row_count(&conn, "cubes"), 0);
}

#[test]
fn storage_failure_maps_to_internal_error() {
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_groups BEFORE INSERT ON group_of_three
         BEGIN
             SELECT RAISE(ABORT, 'disk on fire');
         END;",
    )
    .unwrap();

    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let mut service = GroupService::new(repo);
    let err = service
        .create_group(&new_group(3.0, [1.0, 1.0, 1.0]))
        .unwrap_err();
    assert!(matches!(err, GroupServiceError::Internal(_)));
}

#[test]
fn get_group_reports_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let service = GroupService::new(repo);
    assert!(matches!(
        service.get_group(42),
        Err(GroupServiceError::NotFound(42))
    ));
}

#[test]
fn listings_never_exceed_fixed_limits() {
    let mut conn = open_db_in_memory().unwrap();
    for index in 0..10 {
        create(&mut conn, &new_group(index as f64, [0.0, 0.0, 0.0]));
    }

    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let service = GroupService::new(repo);
    assert_eq!(service.list_recent_groups(None).unwrap().len(), 5);
    assert_eq!(service.list_recent_groups(Some(100)).unwrap().len(), 5);
    assert_eq!(service.list_recent_groups(Some(2)).unwrap().len(), 2);
    assert_eq!(service.latest_group_times(None).unwrap().len(), 7);
    assert_eq!(service.latest_group_times(Some(70)).unwrap().len(), 7);
}

#[test]
fn average_by_color_uses_exact_color_and_zero_default() {
    let mut conn = open_db_in_memory().unwrap();
    create(&mut conn, &new_group(6.0, [1.0, 4.0, 4.0]));
    create(&mut conn, &new_group(6.0, [2.0, 4.0, 4.0]));
    create(&mut conn, &new_group(6.0, [3.0, 4.0, 4.0]));

    let repo = SqliteCubeRepository::try_new(&conn).unwrap();
    let service = StatsService::new(repo);

    let red = service.average_by_color("red").unwrap();
    assert_eq!(red.color, "red");
    assert_eq!(red.average_individual_time, 2.0);

    let missing = service.average_by_color("purple").unwrap();
    assert_eq!(missing.color, "purple");
    assert_eq!(missing.average_individual_time, 0.0);

    let json = serde_json::to_value(&missing).unwrap();
    assert_eq!(json["average_individual_time"].as_f64(), Some(0.0));
}

#[test]
fn notifications_classify_and_merge_by_group_id() {
    let mut conn = open_db_in_memory().unwrap();
    let slow = create(&mut conn, &new_group(15.0, [4.0, 8.0, 3.0]));
    let fast = create(&mut conn, &new_group(1.0, [0.4, 0.2, 0.4]));
    let normal = create(&mut conn, &new_group(6.0, [2.0, 2.0, 2.0]));
    let slower = create(&mut conn, &new_group(11.0, [3.0, 3.0, 5.0]));

    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let service = NotificationService::new(repo);

    let delayed = service.delayed().unwrap();
    assert_eq!(delayed.len(), 2);
    let slow_note = delayed
        .iter()
        .find(|notification| notification.group_id == slow.id)
        .unwrap();
    assert_eq!(slow_note.kind, NotificationKind::HighTime);
    assert_eq!(slow_note.diff, 5.0);
    assert_eq!(slow_note.cube_id, slow.cubes[1].id);

    let early = service.early().unwrap();
    assert_eq!(early.len(), 1);
    assert_eq!(early[0].group_id, fast.id);
    assert_eq!(early[0].diff, 1.0);
    assert_eq!(early[0].cube_id, fast.cubes[1].id);

    let merged = service.notifications().unwrap();
    let merged_ids: Vec<_> = merged.iter().map(|n| n.group_id).collect();
    assert_eq!(merged_ids, vec![slower.id, fast.id, slow.id]);
    assert!(merged.iter().all(|n| n.group_id != normal.id));

    let mut expected = delayed;
    expected.extend(early);
    expected.sort_by(|a, b| b.group_id.cmp(&a.group_id));
    assert_eq!(merged, expected);
}

#[test]
fn analyze_group_and_summary_through_service() {
    let mut conn = open_db_in_memory().unwrap();
    let group = create(&mut conn, &new_group(24.0, [11.0, 6.0, 7.0]));

    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let service = GroupService::new(repo);

    let analysis = service.analyze_group(group.id).unwrap();
    assert_eq!(analysis.verdict, Pace::Delayed);
    assert_eq!(analysis.causes.len(), 1);
    assert_eq!(analysis.causes[0].cube_id, group.cubes[0].id);
    assert!(matches!(
        service.analyze_group(group.id + 1),
        Err(GroupServiceError::NotFound(_))
    ));

    let summary = service.summary().unwrap();
    assert_eq!(summary.total_groups, 1);
    assert_eq!(summary.total_cubes, 3);
    assert_eq!(summary.total_group_time, 24.0);
}

#[test]
fn notifications_scan_stores_larger_than_one_bind_list() {
    const GROUPS: i64 = 33_000;
    let mut conn = open_db_in_memory().unwrap();
    conn.execute_batch(&format!(
        "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {GROUPS})
         INSERT INTO group_of_three (id, cube_1, cube_2, cube_3, group_time)
         SELECT n, n * 3 - 2, n * 3 - 1, n * 3, 6.0 FROM seq;
         WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < {GROUPS} * 3)
         INSERT INTO cubes (id, group_id, color, face, individual_time)
         SELECT n, (n + 2) / 3, 'red', 'Encima', 2.0 FROM seq;
         UPDATE group_of_three SET group_time = 15.0 WHERE id = {GROUPS};
         UPDATE group_of_three SET group_time = 1.0 WHERE id = 1;
         UPDATE cubes SET individual_time = 9.0 WHERE id = {GROUPS} * 3;"
    ))
    .unwrap();
    assert_eq!(row_count(&conn, "cubes"), GROUPS * 3);

    let repo = SqliteGroupRepository::try_new(&mut conn).unwrap();
    let service = NotificationService::new(repo);

    let merged = service.notifications().unwrap();
    let ids: Vec<_> = merged.iter().map(|n| n.group_id).collect();
    assert_eq!(ids, vec![GROUPS, 1]);
    assert_eq!(merged[0].cube_id, GROUPS * 3);
    assert_eq!(merged[1].cube_id, 1);
}
