use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a minimal GrifoBoard project inside the given temp directory.
fn init_project(dir: &TempDir) {
    grifo_core::state::init(dir.path(), "canteiro-teste").unwrap();
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a PUT request with a JSON body via `oneshot`.
async fn put_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Create an obra with one week plan holding a single mon/tue task.
/// Returns the task id.
fn seed_week(dir: &TempDir, obra: &str, week: &str) -> String {
    grifo_core::obra::Obra::create(dir.path(), obra, "Obra Teste").unwrap();
    let mut plan = grifo_core::week::WeekPlan::create(dir.path(), obra, week).unwrap();
    let id = grifo_core::task::add_task(
        &mut plan.tasks,
        grifo_core::task::TaskSpec {
            sector: "torre-a".into(),
            description: "Alvenaria 3o pavimento".into(),
            discipline: "alvenaria".into(),
            team: "equipe-1".into(),
            responsible: "mestre".into(),
            executor: "joao".into(),
            planned_days: vec![
                grifo_core::types::Weekday::Mon,
                grifo_core::types::Weekday::Tue,
            ],
        },
    );
    plan.save(dir.path()).unwrap();
    id
}

// ---------------------------------------------------------------------------
// State and init
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_state_returns_project_summary() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/state").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["project"], "canteiro-teste");
    assert!(json["obras"].is_array());
}

#[tokio::test]
async fn get_state_errors_when_not_initialized() {
    let dir = TempDir::new().unwrap();
    // Deliberately do NOT call init_project.

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _json) = get(app, "/api/state").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn init_endpoint_bootstraps_project() {
    let dir = TempDir::new().unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/init",
        serde_json::json!({ "project": "obra-nova" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["created"], true);
    assert_eq!(json["project"], "obra-nova");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/state").await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Obras
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_obra() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/obras",
        serde_json::json!({ "slug": "torre-norte", "name": "Torre Norte" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["slug"], "torre-norte");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/obras/torre-norte").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Torre Norte");
    assert_eq!(json["status"], "active");
}

#[tokio::test]
async fn duplicate_obra_returns_conflict() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/obras",
        serde_json::json!({ "slug": "torre", "name": "Torre" }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn missing_obra_returns_not_found() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/obras/nao-existe").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Weeks, tasks, PCP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_week_add_task_and_check() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/obras/torre/weeks",
        serde_json::json!({ "week": "2026-W35" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/obras/torre/weeks/2026-W35/tasks",
        serde_json::json!({
            "sector": "torre-a",
            "description": "Contrapiso",
            "executor": "maria",
            "planned_days": ["mon"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = json["id"].as_str().unwrap().to_string();
    assert_eq!(id, "T1");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        &format!("/api/obras/torre/weeks/2026-W35/tasks/{id}/check"),
        serde_json::json!({ "day": "mon", "status": "completed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fully_completed"], true);
}

#[tokio::test]
async fn check_unplanned_day_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = seed_week(&dir, "torre", "2026-W35");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        &format!("/api/obras/torre/weeks/2026-W35/tasks/{id}/check"),
        serde_json::json!({ "day": "sun", "status": "completed" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn not_done_without_cause_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = seed_week(&dir, "torre", "2026-W35");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        &format!("/api/obras/torre/weeks/2026-W35/tasks/{id}/check"),
        serde_json::json!({ "day": "mon", "status": "not_done" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invalid_week_label_is_bad_request() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/obras/torre/weeks",
        serde_json::json!({ "week": "week-35" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pcp_reflects_checked_days() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = seed_week(&dir, "torre", "2026-W35");

    // Complete both planned days.
    for day in ["mon", "tue"] {
        let app = grifo_server::build_router(dir.path().to_path_buf());
        let (status, _) = post_json(
            app,
            &format!("/api/obras/torre/weeks/2026-W35/tasks/{id}/check"),
            serde_json::json!({ "day": day, "status": "completed" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/obras/torre/weeks/2026-W35/pcp").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["overall"]["completed_tasks"], 1);
    assert_eq!(json["overall"]["total_tasks"], 1);
    assert_eq!(json["overall"]["percentage"], 100.0);
    assert_eq!(json["by_executor"]["joao"]["percentage"], 100.0);
}

#[tokio::test]
async fn weekly_report_includes_goal() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    seed_week(&dir, "torre", "2026-W35");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/obras/torre/weeks/2026-W35/report").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["goal_percentage"], 80.0);
    assert_eq!(json["goal_met"], false);
}

// ---------------------------------------------------------------------------
// Playbook
// ---------------------------------------------------------------------------

const CSV: &str = "\
level;code;description;unit;quantity;labor;materials;equipment;fees
0;1;Estrutura;;;;;;
2;1.1;Concreto;m3;10;50;50;0;0
2;1.2;Armacao;kg;100;1;1;0;0
";

#[tokio::test]
async fn import_and_get_playbook() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/obras/torre/playbook/import",
        serde_json::json!({ "csv": CSV }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"], 3);
    // Default config coefficient is the first alternative, 1.0.
    assert_eq!(json["coefficient"], 1.0);
    assert_eq!(json["grand_total"], 1200.0);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/obras/torre/playbook").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["grand_total"], 1200.0);
}

#[tokio::test]
async fn set_coefficient_reprojects_meta_totals() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();
    grifo_core::playbook::Playbook::import(dir.path(), "torre", CSV, 1.0).unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = put_json(
        app,
        "/api/obras/torre/playbook/coefficient",
        serde_json::json!({ "coefficient": 0.85 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["grand_total"], 1200.0);
    assert_eq!(json["grand_total_meta"], 1020.0);
}

#[tokio::test]
async fn malformed_csv_is_unprocessable() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/obras/torre/playbook/import",
        serde_json::json!({ "csv": "level;code\nnot-a-level;1.1\n" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Agenda and diary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn agenda_add_list_and_done() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/obras/torre/agenda",
        serde_json::json!({
            "title": "Entrega de concreto",
            "description": "usina confirma pela manha",
            "date": "2026-08-24",
            "time": "08:00"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["description"], "usina confirma pela manha");
    let id = json["id"].as_str().unwrap().to_string();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/obras/torre/agenda").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["description"], "usina confirma pela manha");

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        &format!("/api/obras/torre/agenda/{id}/done"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["done"], true);
}

#[tokio::test]
async fn diary_covers_checked_tasks_and_events() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    // 2026-08-24 is the Monday of 2026-W35.
    let id = seed_week(&dir, "torre", "2026-W35");
    let mut plan = grifo_core::week::WeekPlan::load(dir.path(), "torre", "2026-W35").unwrap();
    grifo_core::task::check_day(
        &mut plan.tasks,
        &id,
        grifo_core::types::Weekday::Mon,
        grifo_core::types::DayStatus::Completed,
        None,
    )
    .unwrap();
    plan.save(dir.path()).unwrap();
    grifo_core::agenda::AgendaEvent::create(
        dir.path(),
        "torre",
        "Visita do engenheiro",
        None,
        chrono::NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
        None,
    )
    .unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/obras/torre/diary/2026-08-24").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["weekday"], "mon");
    assert_eq!(json["tasks_worked"].as_array().unwrap().len(), 1);
    assert_eq!(json["events"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn diary_rejects_malformed_date() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::obra::Obra::create(dir.path(), "torre", "Torre").unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = get(app, "/api/obras/torre/diary/24-08-2026").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Partners and ranking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn partner_create_rate_and_filter() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/partners",
        serde_json::json!({ "slug": "concreteira-sul", "name": "Concreteira Sul", "category": "materials" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/partners/concreteira-sul/rate",
        serde_json::json!({ "rating": 4 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["rating"], 4);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/partners?category=workforce").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn rating_out_of_range_is_bad_request() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    grifo_core::marketplace::Partner::create(
        dir.path(),
        "empreiteira",
        "Empreiteira",
        grifo_core::marketplace::PartnerCategory::Workforce,
    )
    .unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, _) = post_json(
        app,
        "/api/partners/empreiteira/rate",
        serde_json::json!({ "rating": 6 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn award_week_feeds_ranking() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let id = seed_week(&dir, "torre", "2026-W35");
    let mut plan = grifo_core::week::WeekPlan::load(dir.path(), "torre", "2026-W35").unwrap();
    for day in [grifo_core::types::Weekday::Mon, grifo_core::types::Weekday::Tue] {
        grifo_core::task::check_day(
            &mut plan.tasks,
            &id,
            day,
            grifo_core::types::DayStatus::Completed,
            None,
        )
        .unwrap();
    }
    plan.save(dir.path()).unwrap();

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = post_json(
        app,
        "/api/obras/torre/weeks/2026-W35/award",
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["awards"][0]["executor"], "joao");
    assert_eq!(json["awards"][0]["points"], 10);

    let app = grifo_server::build_router(dir.path().to_path_buf());
    let (status, json) = get(app, "/api/ranking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["slug"], "joao");
    assert_eq!(json[0]["position"], 1);
    assert_eq!(json[0]["points"], 10);
}
