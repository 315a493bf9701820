use axum::http::StatusCode;
use campus_vote::api::{self, AppState};
use campus_vote::config::Config;
use campus_vote::db::init_db;
use campus_vote::Repository;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    repo: Arc<Repository>,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let mut env = HashMap::new();
    env.insert("DATABASE_PATH".to_string(), db_path);
    env.insert("SEED_SAMPLE_ELECTIONS".to_string(), "false".to_string());
    let config = Config::from_env_map(env).unwrap();
    let app = api::create_router(AppState::new(repo.clone(), config));

    TestApp {
        app,
        repo,
        _temp: temp_dir,
    }
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn election_body(name: &str, election_type: &str, status: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{} description", name),
        "electionType": election_type,
        "school": ["all"],
        "program": ["3", "8"],
        "academicYear": [],
        "startDate": "2025-05-01T08:00",
        "endDate": "2025-05-02T17:00",
        "status": status,
    })
}

async fn create_election(app: &axum::Router, body: Value) -> i64 {
    let (status, json) = request(app.clone(), "POST", "/admin/elections", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["id"].as_i64().unwrap()
}

async fn register(app: &axum::Router, student_number: &str) -> i64 {
    let body = json!({
        "firstName": "Test",
        "lastName": student_number,
        "dateOfBirth": "2002-02-02",
        "program": "BSc Computer Science",
        "academicYear": "Y1",
        "studentNumber": student_number,
        "nrcNumber": format!("NRC-{}", student_number),
        "gender": "Male",
        "email": format!("{}@example.com", student_number),
        "phone": "0977000000",
        "addressType": "Campus",
    });
    let (status, json) = request(app.clone(), "POST", "/api/voters", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["id"].as_i64().unwrap()
}

async fn nominate(app: &axum::Router, election_id: i64, student_number: &str) -> i64 {
    let body = json!({
        "electionId": election_id,
        "studentNumber": student_number,
        "position": "President",
    });
    let (status, json) = request(app.clone(), "POST", "/admin/candidates", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["id"].as_i64().unwrap()
}

async fn vote(app: &axum::Router, election_id: i64, voter_id: i64, candidate_id: i64) {
    let body = json!({
        "electionId": election_id,
        "voterId": voter_id,
        "candidateId": candidate_id,
    });
    let (status, json) = request(app.clone(), "POST", "/api/votes", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
}

#[tokio::test]
async fn test_create_inserts_default_positions() {
    let test_app = setup_test_app().await;
    let su = create_election(
        &test_app.app,
        election_body("SU 2025", "Student Union", "draft"),
    )
    .await;
    let reps = create_election(
        &test_app.app,
        election_body("Reps 2025", "Class Representative", "draft"),
    )
    .await;
    let assoc = create_election(
        &test_app.app,
        election_body("Assoc 2025", "Association", "draft"),
    )
    .await;

    let (_, su_positions) = request(
        test_app.app.clone(),
        "GET",
        &format!("/api/elections/{}/positions", su),
        None,
    )
    .await;
    let names: Vec<&str> = su_positions
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["President", "Academics Minister", "Prime Minister"]);

    let (_, rep_positions) = request(
        test_app.app.clone(),
        "GET",
        &format!("/api/elections/{}/positions", reps),
        None,
    )
    .await;
    let names: Vec<&str> = rep_positions
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Male Class Representative", "Female Class Representative"]
    );

    let (_, assoc_positions) = request(
        test_app.app,
        "GET",
        &format!("/api/elections/{}/positions", assoc),
        None,
    )
    .await;
    assert_eq!(assoc_positions, json!([]));
}

#[tokio::test]
async fn test_hydrate_returns_scopes_as_form_values() {
    let test_app = setup_test_app().await;
    let id = create_election(
        &test_app.app,
        election_body("SU 2025", "Student Union", "upcoming"),
    )
    .await;

    let (status, json) = request(
        test_app.app,
        "GET",
        &format!("/admin/elections/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["school"], json!(["all"]));
    assert_eq!(json["program"], json!(["3", "8"]));
    assert_eq!(json["academicYear"], json!([]));
    assert_eq!(json["electionType"], "Student Union");
    assert_eq!(json["status"], "upcoming");
    assert_eq!(json["positions"].as_array().unwrap().len(), 3);

    let (stored,): (String,) = sqlx::query_as("SELECT program FROM elections WHERE id = ?")
        .bind(id)
        .fetch_one(test_app.repo.pool())
        .await
        .unwrap();
    assert_eq!(stored, r#"["3","8"]"#);

    let (stored,): (String,) = sqlx::query_as("SELECT academic_year FROM elections WHERE id = ?")
        .bind(id)
        .fetch_one(test_app.repo.pool())
        .await
        .unwrap();
    assert_eq!(stored, "");
}

#[tokio::test]
async fn test_numeric_scope_ids_accepted() {
    let test_app = setup_test_app().await;
    let mut body = election_body("Class reps", "Class Representative", "upcoming");
    body["program"] = json!([2, 5]);
    body["academicYear"] = json!([4]);
    let id = create_election(&test_app.app, body).await;

    let (status, json) = request(
        test_app.app,
        "GET",
        &format!("/admin/elections/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["program"], json!(["2", "5"]));
    assert_eq!(json["academicYear"], json!(["4"]));

    let (stored,): (String,) = sqlx::query_as("SELECT program FROM elections WHERE id = ?")
        .bind(id)
        .fetch_one(test_app.repo.pool())
        .await
        .unwrap();
    assert_eq!(stored, r#"["2","5"]"#);
}

#[tokio::test]
async fn test_status_filter_with_counts() {
    let test_app = setup_test_app().await;
    let a = create_election(
        &test_app.app,
        election_body("Budget referendum", "Association", "active"),
    )
    .await;
    create_election(
        &test_app.app,
        election_body("Sports council", "Association", "active"),
    )
    .await;
    create_election(
        &test_app.app,
        election_body("Budget committee", "Association", "draft"),
    )
    .await;

    let v1 = register(&test_app.app, "S1").await;
    register(&test_app.app, "S2").await;
    let c1 = nominate(&test_app.app, a, "S1").await;
    nominate(&test_app.app, a, "S2").await;
    vote(&test_app.app, a, v1, c1).await;

    let (status, json) = request(
        test_app.app.clone(),
        "GET",
        "/admin/elections?status=active",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r["status"] == "active"));

    let budget = rows.iter().find(|r| r["id"] == a).unwrap();
    assert_eq!(budget["candidateCount"], 2);
    assert_eq!(budget["voteCount"], 1);

    let (_, json) = request(
        test_app.app.clone(),
        "GET",
        "/admin/elections?status=active&search=Budget",
        None,
    )
    .await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Budget referendum");

    let (_, json) = request(test_app.app, "GET", "/admin/elections?status=", None).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_listing_newest_first_and_limited() {
    let test_app = setup_test_app().await;
    let first = create_election(&test_app.app, election_body("One", "Association", "draft")).await;
    let second = create_election(&test_app.app, election_body("Two", "Association", "draft")).await;

    let (_, json) = request(test_app.app.clone(), "GET", "/admin/elections", None).await;
    let ids: Vec<i64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);

    let (_, json) = request(test_app.app, "GET", "/admin/elections?limit=1", None).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_filters_rejected() {
    let test_app = setup_test_app().await;
    let (status, json) = request(
        test_app.app.clone(),
        "GET",
        "/admin/elections?status=paused",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("paused"));

    let (status, _) = request(test_app.app, "GET", "/admin/elections?limit=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let test_app = setup_test_app().await;

    let mut body = election_body("Backwards", "Association", "draft");
    body["endDate"] = json!("2025-04-30T08:00");
    let (status, json) = request(test_app.app.clone(), "POST", "/admin/elections", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "End date must be after start date");

    let body = election_body("Odd", "Referendum", "draft");
    let (status, _) = request(test_app.app.clone(), "POST", "/admin/elections", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = election_body("", "Association", "draft");
    body["name"] = json!("   ");
    let (status, json) = request(test_app.app, "POST", "/admin/elections", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "name is required");
}

#[tokio::test]
async fn test_update_and_status_change() {
    let test_app = setup_test_app().await;
    let id = create_election(&test_app.app, election_body("Old", "Association", "draft")).await;

    let mut body = election_body("New name", "Association", "upcoming");
    body["school"] = json!(["2"]);
    let (status, json) = request(
        test_app.app.clone(),
        "PUT",
        &format!("/admin/elections/{}", id),
        Some(body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "New name");
    assert_eq!(json["school"], json!(["2"]));

    let (status, _) = request(
        test_app.app.clone(),
        "PUT",
        "/admin/elections/9999",
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = request(
        test_app.app.clone(),
        "POST",
        &format!("/admin/elections/{}/status", id),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "completed");

    let (status, _) = request(
        test_app.app,
        "POST",
        &format!("/admin/elections/{}/status", id),
        Some(json!({"status": "archived"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_removes_dependents() {
    let test_app = setup_test_app().await;
    let id = create_election(
        &test_app.app,
        election_body("SU 2025", "Student Union", "active"),
    )
    .await;
    let voter = register(&test_app.app, "S1").await;
    let candidate = nominate(&test_app.app, id, "S1").await;
    vote(&test_app.app, id, voter, candidate).await;

    let (status, _) = request(
        test_app.app.clone(),
        "DELETE",
        &format!("/admin/elections/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    for table in ["votes", "candidates", "positions"] {
        let (n,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM {} WHERE election_id = ?", table))
                .bind(id)
                .fetch_one(test_app.repo.pool())
                .await
                .unwrap();
        assert_eq!(n, 0, "{} left behind", table);
    }

    let (status, _) = request(
        test_app.app.clone(),
        "GET",
        &format!("/admin/elections/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = request(
        test_app.app,
        "DELETE",
        &format!("/admin/elections/{}", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_add_position_and_results() {
    let test_app = setup_test_app().await;
    let id = create_election(&test_app.app, election_body("Club", "Association", "active")).await;

    let (status, _) = request(
        test_app.app.clone(),
        "POST",
        &format!("/admin/elections/{}/positions", id),
        Some(json!({"name": "Treasurer"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = request(
        test_app.app.clone(),
        "POST",
        "/admin/elections/9999/positions",
        Some(json!({"name": "Treasurer"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let v1 = register(&test_app.app, "S1").await;
    let v2 = register(&test_app.app, "S2").await;
    let c1 = nominate(&test_app.app, id, "S1").await;
    let c2 = nominate(&test_app.app, id, "S2").await;
    vote(&test_app.app, id, v1, c2).await;
    vote(&test_app.app, id, v2, c2).await;

    let (status, json) = request(
        test_app.app.clone(),
        "GET",
        &format!("/admin/elections/{}/results", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = json.as_array().unwrap();
    assert_eq!(rows[0]["candidateId"], c2);
    assert_eq!(rows[0]["votes"], 2);
    assert_eq!(rows[1]["candidateId"], c1);
    assert_eq!(rows[1]["votes"], 0);

    let (status, _) = request(test_app.app, "GET", "/admin/elections/9999/results", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
