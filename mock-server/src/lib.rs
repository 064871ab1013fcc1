use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, value::RawValue, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Token accepted by `app()`.
pub const DEFAULT_TOKEN: &str = "mock-developer-token";

pub const DEFAULT_NOTEBOOK_NAME: &str = "My Notebook";

const RATES_DATE: &str = "2017-01-20";

/// Rate literals per base currency, kept as text so the wire carries them
/// exactly as written (trailing zeros included).
const RATE_TABLE: &[(&str, &[(&str, &str)])] = &[
    (
        "USD",
        &[
            ("CAD", "1.3315"),
            ("CNY", "6.578600"),
            ("EUR", "0.92013"),
            ("GBP", "0.70365"),
            ("JPY", "117.89"),
            ("KRW", "1165.20"),
        ],
    ),
    (
        "EUR",
        &[
            ("CAD", "1.4471"),
            ("CNY", "7.1496"),
            ("GBP", "0.76474"),
            ("JPY", "128.13"),
            ("KRW", "1266.4"),
            ("USD", "1.0868"),
        ],
    ),
    (
        "JPY",
        &[
            ("CAD", "0.011294"),
            ("CNY", "0.055802"),
            ("EUR", "0.0078046"),
            ("GBP", "0.0059687"),
            ("KRW", "9.8838"),
            ("USD", "0.0084825"),
        ],
    ),
];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    pub guid: String,
    pub name: String,
    pub default_notebook: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub guid: String,
    pub title: String,
    pub content: String,
    pub notebook_guid: String,
    pub created: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    pub title: String,
    pub content: String,
    pub notebook_guid: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateNotebook {
    pub name: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NoteFilter {
    pub notebook_guid: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub ascending: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindNotes {
    #[serde(default)]
    pub filter: NoteFilter,
    #[serde(default)]
    pub offset: usize,
    pub max_notes: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteList {
    pub start_index: usize,
    pub total_notes: usize,
    pub notes: Vec<Note>,
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub base: Option<String>,
    pub symbols: Option<String>,
}

#[derive(Serialize)]
struct Latest {
    base: String,
    date: &'static str,
    rates: BTreeMap<String, Box<RawValue>>,
}

#[derive(Default)]
struct Store {
    notebooks: HashMap<String, Notebook>,
    notes: HashMap<String, Note>,
    clock: i64,
}

impl Store {
    fn with_default_notebook() -> Self {
        let mut store = Store::default();
        let notebook = Notebook {
            guid: Uuid::new_v4().to_string(),
            name: DEFAULT_NOTEBOOK_NAME.to_string(),
            default_notebook: true,
        };
        store.notebooks.insert(notebook.guid.clone(), notebook);
        store
    }

    fn default_notebook_guid(&self) -> Option<String> {
        self.notebooks
            .values()
            .find(|nb| nb.default_notebook)
            .map(|nb| nb.guid.clone())
    }

    /// Monotonic creation stamp so ordering by creation is deterministic.
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        1_484_870_400_000 + self.clock
    }
}

pub struct AppState {
    token: String,
    store: RwLock<Store>,
}

pub type Db = Arc<AppState>;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

/// Note-store routes guarded by `token`, plus the unauthenticated
/// `/latest` rates route.
pub fn app_with_token(token: &str) -> Router {
    let db: Db = Arc::new(AppState {
        token: token.to_string(),
        store: RwLock::new(Store::with_default_notebook()),
    });
    let notes = Router::new()
        .route("/user", get(get_user))
        .route("/notebooks", get(list_notebooks).post(create_notebook))
        .route("/notebooks/{guid}", get(get_notebook))
        .route("/notes", post(create_note))
        .route("/notes/search", post(find_notes))
        .route("/notes/{guid}", get(get_note).delete(delete_note))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_token))
        .with_state(db);
    Router::new()
        .merge(notes)
        .route("/latest", get(latest_rates))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_token(State(db): State<Db>, request: Request, next: Next) -> Result<Response, StatusCode> {
    let expected = format!("Bearer {}", db.token);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

async fn get_user() -> Json<User> {
    Json(User {
        id: 1,
        username: "mock-user".to_string(),
    })
}

async fn list_notebooks(State(db): State<Db>) -> Json<Vec<Notebook>> {
    let store = db.store.read().await;
    let mut notebooks: Vec<Notebook> = store.notebooks.values().cloned().collect();
    notebooks.sort_by(|a, b| a.name.cmp(&b.name));
    Json(notebooks)
}

async fn get_notebook(State(db): State<Db>, Path(guid): Path<String>) -> Result<Json<Notebook>, StatusCode> {
    let store = db.store.read().await;
    store.notebooks.get(&guid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_notebook(
    State(db): State<Db>,
    Json(input): Json<CreateNotebook>,
) -> Result<(StatusCode, Json<Notebook>), ApiError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "notebook name must not be empty"));
    }
    let mut store = db.store.write().await;
    if store.notebooks.values().any(|nb| nb.name.eq_ignore_ascii_case(name)) {
        return Err(api_error(StatusCode::CONFLICT, "a notebook with that name already exists"));
    }
    let notebook = Notebook {
        guid: Uuid::new_v4().to_string(),
        name: name.to_string(),
        default_notebook: false,
    };
    store.notebooks.insert(notebook.guid.clone(), notebook.clone());
    Ok((StatusCode::CREATED, Json(notebook)))
}

async fn create_note(State(db): State<Db>, Json(input): Json<CreateNote>) -> Result<(StatusCode, Json<Note>), ApiError> {
    let mut store = db.store.write().await;
    let notebook_guid = match input.notebook_guid {
        Some(guid) if store.notebooks.contains_key(&guid) => guid,
        Some(_) => return Err(api_error(StatusCode::NOT_FOUND, "notebook not found")),
        None => store
            .default_notebook_guid()
            .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "no default notebook"))?,
    };
    let note = Note {
        guid: Uuid::new_v4().to_string(),
        title: input.title,
        content: input.content,
        notebook_guid,
        created: store.tick(),
    };
    store.notes.insert(note.guid.clone(), note.clone());
    Ok((StatusCode::CREATED, Json(note)))
}

async fn find_notes(State(db): State<Db>, Json(input): Json<FindNotes>) -> Json<NoteList> {
    let store = db.store.read().await;
    let mut matching: Vec<Note> = store
        .notes
        .values()
        .filter(|note| {
            input
                .filter
                .notebook_guid
                .as_ref()
                .is_none_or(|guid| &note.notebook_guid == guid)
        })
        .cloned()
        .collect();
    match input.filter.order.as_deref() {
        Some("TITLE") => matching.sort_by(|a, b| a.title.cmp(&b.title)),
        _ => matching.sort_by_key(|note| note.created),
    }
    if !input.filter.ascending {
        matching.reverse();
    }
    let total_notes = matching.len();
    let notes = matching
        .into_iter()
        .skip(input.offset)
        .take(input.max_notes)
        .collect();
    Json(NoteList {
        start_index: input.offset,
        total_notes,
        notes,
    })
}

async fn get_note(State(db): State<Db>, Path(guid): Path<String>) -> Result<Json<Note>, StatusCode> {
    let store = db.store.read().await;
    store.notes.get(&guid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_note(State(db): State<Db>, Path(guid): Path<String>) -> Result<StatusCode, StatusCode> {
    let mut store = db.store.write().await;
    store
        .notes
        .remove(&guid)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn latest_rates(Query(query): Query<LatestQuery>) -> Result<Json<Latest>, ApiError> {
    let base = query.base.unwrap_or_else(|| "EUR".to_string());
    let table = RATE_TABLE
        .iter()
        .find(|(code, _)| *code == base)
        .map(|(_, rates)| *rates)
        .ok_or_else(|| api_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid base"))?;

    let wanted: Option<Vec<&str>> = query
        .symbols
        .as_deref()
        .map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).collect());

    let mut rates = BTreeMap::new();
    for (code, literal) in table {
        if wanted.as_ref().is_some_and(|w| !w.contains(code)) {
            continue;
        }
        let raw = RawValue::from_string(literal.to_string())
            .map_err(|_| api_error(StatusCode::INTERNAL_SERVER_ERROR, "bad rate literal"))?;
        rates.insert(code.to_string(), raw);
    }
    Ok(Json(Latest {
        base,
        date: RATES_DATE,
        rates,
    }))
}
