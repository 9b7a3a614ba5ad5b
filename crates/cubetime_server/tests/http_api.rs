use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use cubetime_core::open_db_in_memory;
use cubetime_server::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_router(AppState::new(open_db_in_memory().unwrap()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post_raw(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/groups")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    send(app, request).await
}

async fn post_group(app: &Router, group_time: f64, times: [f64; 3]) -> Value {
    let body = json!({
        "group_time": group_time,
        "cubes": [
            {"color": "red", "face": "Encima", "individual_time": times[0]},
            {"color": "blue", "face": "Direita", "individual_time": times[1]},
            {"color": "green", "face": "Esquerda", "individual_time": times[2]},
        ]
    });
    let (status, created) = post_raw(app, body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {created}");
    created
}

#[tokio::test]
async fn create_group_returns_201_with_linked_cubes() {
    let app = app();
    let group = post_group(&app, 12.5, [4.0, 5.0, 3.5]).await;

    let cubes = group["cubes"].as_array().unwrap();
    assert_eq!(cubes.len(), 3);
    for (slot, cube) in cubes.iter().enumerate() {
        assert_eq!(cube["group_id"], group["id"]);
        assert_eq!(cube["id"], group[format!("cube_{}", slot + 1).as_str()]);
    }
    assert_eq!(cubes[0]["color"], "red");
    assert_eq!(group["group_time"].as_f64(), Some(12.5));
}

#[tokio::test]
async fn wrong_cube_count_is_422_and_persists_nothing() {
    let app = app();
    let body = json!({
        "group_time": 4.0,
        "cubes": [
            {"color": "red", "face": "Encima", "individual_time": 2.0},
            {"color": "blue", "face": "Direita", "individual_time": 2.0},
        ]
    });

    let (status, error) = post_raw(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["message"], "The given data was invalid.");
    assert!(error["errors"]["cubes"].is_array());

    let (_, summary) = get(&app, "/summary").await;
    assert_eq!(summary["total_groups"], 0);
    assert_eq!(summary["total_cubes"], 0);
}

#[tokio::test]
async fn field_level_errors_are_reported() {
    let app = app();
    let body = json!({
        "group_time": -1,
        "cubes": [
            {"color": "", "face": "Encima", "individual_time": 2.0},
            {"color": "blue", "individual_time": "slow"},
            {"color": "green", "face": "Esquerda", "individual_time": 1.0},
        ]
    });

    let (status, error) = post_raw(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = error["errors"].as_object().unwrap();
    assert!(errors.contains_key("cubes.1.face"));
    assert!(errors.contains_key("cubes.1.individual_time"));

    let (status, _) = post_raw(&app, "{not json").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn semantic_errors_are_reported_once_types_are_valid() {
    let app = app();
    let body = json!({
        "group_time": -1,
        "cubes": [
            {"color": "", "face": "Encima", "individual_time": 2.0},
            {"color": "blue", "face": "Direita", "individual_time": 1.0},
            {"color": "green", "face": "Esquerda", "individual_time": 1.0},
        ]
    });

    let (status, error) = post_raw(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let errors = error["errors"].as_object().unwrap();
    assert!(errors.contains_key("group_time"));
    assert!(errors.contains_key("cubes.0.color"));
}

#[tokio::test]
async fn list_groups_is_capped_at_five_and_times_at_seven() {
    let app = app();
    for index in 0..9 {
        post_group(&app, 3.0 + index as f64 * 0.1, [1.0, 1.0, 1.0]).await;
    }

    let (status, groups) = get(&app, "/groups").await;
    assert_eq!(status, StatusCode::OK);
    let groups = groups.as_array().unwrap();
    assert_eq!(groups.len(), 5);
    assert!(groups
        .iter()
        .all(|group| group["cubes"].as_array().unwrap().len() == 3));

    let (status, times) = get(&app, "/latest-group-times").await;
    assert_eq!(status, StatusCode::OK);
    let times = times.as_array().unwrap();
    assert_eq!(times.len(), 7);
    for entry in times {
        let keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 2);
        assert!(entry.get("id").is_some());
        assert!(entry.get("group_time").is_some());
    }
}

#[tokio::test]
async fn get_group_by_id_and_not_found() {
    let app = app();
    let created = post_group(&app, 6.0, [2.0, 2.0, 2.0]).await;
    let id = created["id"].as_i64().unwrap();

    let (status, group) = get(&app, &format!("/groups/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group, created);

    let (status, error) = get(&app, "/groups/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["message"], "Group not found");

    let (status, _) = get(&app, "/groups/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn average_by_color_defaults_to_zero() {
    let app = app();
    post_group(&app, 6.0, [1.0, 2.0, 3.0]).await;
    post_group(&app, 6.0, [2.0, 2.0, 2.0]).await;
    post_group(&app, 6.0, [3.0, 2.0, 1.0]).await;

    let (status, red) = get(&app, "/average/red").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(red["color"], "red");
    assert_eq!(red["average_individual_time"].as_f64(), Some(2.0));

    let (status, purple) = get(&app, "/average/purple").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(purple["color"], "purple");
    assert_eq!(purple["average_individual_time"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn notification_endpoints_classify_and_sort() {
    let app = app();
    let slow = post_group(&app, 15.0, [4.0, 8.0, 3.0]).await;
    let fast = post_group(&app, 1.0, [0.4, 0.2, 0.4]).await;
    post_group(&app, 6.0, [2.0, 2.0, 2.0]).await;

    let (status, delayed) = get(&app, "/notifications/delayed").await;
    assert_eq!(status, StatusCode::OK);
    let delayed = delayed.as_array().unwrap();
    assert_eq!(delayed.len(), 1);
    assert_eq!(delayed[0]["type"], "high_time");
    assert_eq!(delayed[0]["group_id"], slow["id"]);
    assert_eq!(delayed[0]["cube_id"], slow["cubes"][1]["id"]);
    assert_eq!(delayed[0]["diff"].as_f64(), Some(5.0));

    let (_, early) = get(&app, "/notifications/early").await;
    let early = early.as_array().unwrap();
    assert_eq!(early.len(), 1);
    assert_eq!(early[0]["type"], "low_time");
    assert_eq!(early[0]["group_id"], fast["id"]);
    assert_eq!(early[0]["face"], "Direita");
    assert_eq!(early[0]["diff"].as_f64(), Some(1.0));

    let (_, all) = get(&app, "/notifications").await;
    let ids: Vec<_> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["group_id"].as_i64().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![fast["id"].as_i64().unwrap(), slow["id"].as_i64().unwrap()]
    );
}

#[tokio::test]
async fn analysis_summary_and_health() {
    let app = app();
    let group = post_group(&app, 24.0, [11.0, 6.0, 7.0]).await;
    let id = group["id"].as_i64().unwrap();

    let (status, analysis) = get(&app, &format!("/groups/{id}/analysis")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["verdict"], "delayed");
    assert_eq!(analysis["causes"][0]["color"], "red");

    let (_, summary) = get(&app, "/summary").await;
    assert_eq!(summary["total_groups"], 1);
    assert_eq!(summary["total_cubes"], 3);
    assert_eq!(summary["total_group_time"].as_f64(), Some(24.0));

    let (status, health) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
}

#[tokio::test]
async fn numeric_strings_are_accepted_as_times() {
    let app = app();
    let body = json!({
        "group_time": "12.5",
        "cubes": [
            {"color": "red", "face": "Encima", "individual_time": "4"},
            {"color": "blue", "face": "Direita", "individual_time": "5.5"},
            {"color": "green", "face": "Esquerda", "individual_time": 3},
        ]
    });

    let (status, group) = post_raw(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {group}");
    assert_eq!(group["group_time"].as_f64(), Some(12.5));
    assert_eq!(group["cubes"][0]["individual_time"].as_f64(), Some(4.0));
    assert_eq!(group["cubes"][1]["individual_time"].as_f64(), Some(5.5));

    let bad = json!({
        "group_time": "twelve",
        "cubes": [
            {"color": "red", "face": "Encima", "individual_time": "4"},
            {"color": "blue", "face": "Direita", "individual_time": "5"},
            {"color": "green", "face": "Esquerda", "individual_time": "3"},
        ]
    });
    let (status, error) = post_raw(&app, bad.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(error["errors"]["group_time"].is_array());
}

#[tokio::test]
async fn storage_failure_returns_generic_500() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_groups BEFORE INSERT ON group_of_three
         BEGIN
             SELECT RAISE(ABORT, 'secret storage detail');
         END;",
    )
    .unwrap();
    let app = build_router(AppState::new(conn));

    let body = json!({
        "group_time": 6.0,
        "cubes": [
            {"color": "red", "face": "Encima", "individual_time": 2.0},
            {"color": "blue", "face": "Direita", "individual_time": 2.0},
            {"color": "green", "face": "Esquerda", "individual_time": 2.0},
        ]
    });
    let (status, error) = post_raw(&app, body.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error,
        json!({"message": "An error occurred while processing your request."})
    );
    assert!(!error.to_string().contains("secret"));
}
