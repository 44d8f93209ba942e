use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{cookie::Key, middleware, web, App, HttpResponse, HttpServer, Result};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::display::{export_selection_csv, render_grid, time_headers, GridRow};
use crate::parser::parse_catalog;
use crate::planner::{
    ConflictMap, CourseCatalog, CourseKind, ResetOutcome, SelectionError, SelectionState,
};
use crate::timetable::Color;

/// Everything one browser session owns: its uploaded catalogs and its
/// current selection. Sessions never share state.
#[derive(Default)]
pub struct SessionState {
    pub catalog: CourseCatalog,
    pub selection: SelectionState,
}

/// Process-wide state: the conflict map, built once at startup, and the
/// per-session stores. Handlers hold the sessions lock for the whole
/// mutation, so each operation runs to completion against a consistent
/// store.
pub struct AppState {
    pub conflict_map: ConflictMap,
    pub sessions: Mutex<HashMap<String, SessionState>>,
}

const SESSION_ID_KEY: &str = "classsync-session";

/// Returns this browser's session id, minting one on first contact.
fn session_id(session: &Session) -> Result<String> {
    if let Some(id) = session.get::<String>(SESSION_ID_KEY)? {
        return Ok(id);
    }
    let id: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    session.insert(SESSION_ID_KEY, &id)?;
    Ok(id)
}

fn rejection(err: &SelectionError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": err.to_string(),
    }))
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    course_code: String,
    slot: String,
    color: String,
}

#[derive(Deserialize)]
pub struct CourseRequest {
    course_code: String,
}

#[derive(Serialize)]
pub struct AppliedCourse {
    course_code: String,
    slot: String,
    offered: Vec<String>,
}

#[derive(Serialize)]
pub struct CourseOption {
    course_code: String,
    slots: Vec<String>,
}

#[derive(Serialize)]
pub struct ColorOption {
    name: &'static str,
    hex: &'static str,
}

#[derive(Serialize)]
pub struct StateResponse {
    time_headers: Vec<String>,
    grid: Vec<GridRow>,
    applied: Vec<AppliedCourse>,
    theory_courses: Vec<CourseOption>,
    lab_courses: Vec<CourseOption>,
    colors: Vec<ColorOption>,
    editing: Option<String>,
    theory_loaded: bool,
    lab_loaded: bool,
}

fn course_options(
    catalog: &CourseCatalog,
    kind: CourseKind,
    selection: &SelectionState,
) -> Vec<CourseOption> {
    catalog
        .selectable(kind, selection)
        .into_iter()
        .map(|course_code| {
            let slots = catalog
                .offered_slots(&course_code)
                .unwrap_or_default()
                .to_vec();
            CourseOption { course_code, slots }
        })
        .collect()
}

// CSV upload endpoint: replaces the catalog of one kind for this session.
async fn upload_catalog(
    kind: web::Path<String>,
    body: web::Bytes,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let Some(kind) = CourseKind::from_path(&kind) else {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Invalid course kind; expected 'theory' or 'lab'",
        })));
    };

    let sid = session_id(&session)?;
    match parse_catalog(&body[..]) {
        Ok(courses) => {
            let count = courses.len();
            let mut sessions = state.sessions.lock().unwrap();
            sessions.entry(sid).or_default().catalog.replace(kind, courses);
            info!("{} catalog uploaded: {} courses", kind.label(), count);
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": format!("{} slots processed successfully ({} courses).", kind.label(), count),
            })))
        }
        // Parse failure keeps the previously loaded catalog for this kind.
        Err(e) => {
            warn!("{} catalog upload failed: {}", kind.label(), e);
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Failed to process {} slots: {}", kind.label(), e),
            })))
        }
    }
}

// Read endpoint: everything the page renders.
async fn get_state(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();

    let mut applied: Vec<AppliedCourse> = entry
        .selection
        .applied_courses()
        .iter()
        .map(|(course_code, slot)| AppliedCourse {
            course_code: course_code.clone(),
            slot: slot.clone(),
            offered: entry
                .catalog
                .offered_slots(course_code)
                .unwrap_or_default()
                .to_vec(),
        })
        .collect();
    applied.sort_by(|a, b| a.course_code.cmp(&b.course_code));

    Ok(HttpResponse::Ok().json(StateResponse {
        time_headers: time_headers(),
        grid: render_grid(&entry.selection),
        applied,
        theory_courses: course_options(&entry.catalog, CourseKind::Theory, &entry.selection),
        lab_courses: course_options(&entry.catalog, CourseKind::Lab, &entry.selection),
        colors: Color::ALL
            .into_iter()
            .map(|c| ColorOption {
                name: c.name(),
                hex: c.hex(),
            })
            .collect(),
        editing: entry.selection.editing().map(str::to_string),
        theory_loaded: entry.catalog.is_loaded(CourseKind::Theory),
        lab_loaded: entry.catalog.is_loaded(CourseKind::Lab),
    }))
}

async fn apply_course(
    req: web::Json<ApplyRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let Some(color) = Color::from_name(&req.color) else {
        return Ok(rejection(&SelectionError::NothingSelected));
    };

    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();
    match entry
        .selection
        .apply(&state.conflict_map, &req.course_code, &req.slot, color)
    {
        Ok(()) => {
            info!("applied {} -> {}", req.course_code.trim(), req.slot.trim());
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": format!("Slot for {} added successfully.", req.course_code.trim()),
            })))
        }
        Err(e) => {
            warn!("apply rejected for {}: {}", req.course_code.trim(), e);
            Ok(rejection(&e))
        }
    }
}

async fn delete_course(
    req: web::Json<CourseRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();
    match entry.selection.delete(&req.course_code) {
        Ok(()) => {
            info!("deleted {}", req.course_code.trim());
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": format!("Course {} deleted successfully.", req.course_code.trim()),
            })))
        }
        Err(e) => {
            warn!("delete rejected for {}: {}", req.course_code.trim(), e);
            Ok(rejection(&e))
        }
    }
}

async fn edit_course(
    req: web::Json<CourseRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();
    match entry.selection.edit(&req.course_code) {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": format!("Editing course {}.", req.course_code.trim()),
        }))),
        Err(e) => Ok(rejection(&e)),
    }
}

async fn update_course(
    req: web::Json<ApplyRequest>,
    session: Session,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let Some(color) = Color::from_name(&req.color) else {
        return Ok(rejection(&SelectionError::NothingSelected));
    };

    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();
    match entry
        .selection
        .update(&state.conflict_map, &req.course_code, &req.slot, color)
    {
        Ok(()) => {
            info!("updated {} -> {}", req.course_code.trim(), req.slot.trim());
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": format!("Course {} updated successfully.", req.course_code.trim()),
            })))
        }
        Err(e) => {
            warn!("update rejected for {}: {}", req.course_code.trim(), e);
            Ok(rejection(&e))
        }
    }
}

async fn reset_table(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();
    match entry.selection.reset() {
        ResetOutcome::Cleared => {
            info!("selection reset");
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Table reset successfully.",
            })))
        }
        ResetOutcome::AlreadyEmpty => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "No courses to reset.",
        }))),
    }
}

// Selection download endpoint.
async fn export_selection(session: Session, state: web::Data<AppState>) -> Result<HttpResponse> {
    let sid = session_id(&session)?;
    let mut sessions = state.sessions.lock().unwrap();
    let entry = sessions.entry(sid).or_default();

    if entry.selection.applied_courses().is_empty() {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "No courses applied yet.",
        })));
    }

    match export_selection_csv(&entry.selection) {
        Ok(csv) => {
            let filename = format!(
                "classsync-selection-{}.csv",
                chrono::Utc::now().format("%Y%m%d-%H%M%S")
            );
            Ok(HttpResponse::Ok()
                .content_type("text/csv")
                .insert_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(csv))
        }
        Err(e) => {
            warn!("export failed: {}", e);
            Ok(HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to export selection.",
            })))
        }
    }
}

async fn index() -> Result<HttpResponse> {
    let html = include_str!("../templates/index.html");
    Ok(HttpResponse::Ok().content_type("text/html").body(html))
}

pub async fn start_server(port: u16) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        conflict_map: ConflictMap::from_grid(),
        sessions: Mutex::new(HashMap::new()),
    });
    let session_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                session_key.clone(),
            ))
            .route("/", web::get().to(index))
            .route("/api/state", web::get().to(get_state))
            .route("/api/apply", web::post().to(apply_course))
            .route("/api/delete", web::post().to(delete_course))
            .route("/api/edit", web::post().to(edit_course))
            .route("/api/update", web::post().to(update_course))
            .route("/api/reset", web::post().to(reset_table))
            .route("/api/export", web::get().to(export_selection))
            .service(web::resource("/api/upload/{kind}").route(web::post().to(upload_catalog)))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
