//! In-memory remote store.
//!
//! Answers the same routes as the real preference store with the same body
//! shapes, so controllers can run end to end without a server. State is
//! shared between clones.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::ports::{RawResponse, StoreTransport, TransportError};

const SELECTION_KEYS: [&str; 5] = ["brands", "budget", "fuel", "types", "transmission"];

#[derive(Debug, Default)]
struct StoreState {
    signed_in: bool,
    email: String,
    offline: bool,
    selections: Map<String, Value>,
    profile: Map<String, Value>,
    theme: Option<String>,
    favorites: Vec<Value>,
    recommendations: Vec<Value>,
    forced: HashMap<String, RawResponse>,
    requests: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates a store with a signed-in user `driver@example.com`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                signed_in: true,
                email: "driver@example.com".to_string(),
                ..StoreState::default()
            })),
        }
    }

    pub fn signed_out(self) -> Self {
        self.with_state(|s| s.signed_in = false);
        self
    }

    pub fn with_email(self, email: &str) -> Self {
        self.with_state(|s| s.email = email.to_string());
        self
    }

    /// Results served by `/api/recommendations` once every selection is saved.
    pub fn with_recommendations(self, items: Vec<Value>) -> Self {
        self.with_state(|s| s.recommendations = items);
        self
    }

    pub fn with_favorites(self, items: Vec<Value>) -> Self {
        self.with_state(|s| s.favorites = items);
        self
    }

    pub fn with_theme(self, theme: &str) -> Self {
        self.with_state(|s| s.theme = Some(theme.to_string()));
        self
    }

    pub fn with_profile(self, profile: Value) -> Self {
        self.with_state(|s| {
            if let Value::Object(map) = profile {
                s.profile = map;
            }
        });
        self
    }

    /// Stores a selection as if it had been saved earlier.
    pub fn with_selection(self, key: &str, value: Value) -> Self {
        self.with_state(|s| {
            s.selections.insert(key.to_string(), value);
        });
        self
    }

    /// Answers every request to `path` with `status` and `body` until cleared.
    pub fn force_response(&self, path: &str, status: u16, body: Value) {
        self.with_state(|s| {
            s.forced
                .insert(path.to_string(), RawResponse::json(status, &body));
        });
    }

    pub fn clear_forced(&self, path: &str) {
        self.with_state(|s| {
            s.forced.remove(path);
        });
    }

    /// Makes every request fail before a response arrives.
    pub fn set_offline(&self, offline: bool) {
        self.with_state(|s| s.offline = offline);
    }

    /// Saved selection under `key` (`brands`, `budget`, ...).
    pub fn selection(&self, key: &str) -> Option<Value> {
        self.with_state(|s| s.selections.get(key).cloned())
    }

    pub fn profile(&self) -> Value {
        self.with_state(|s| Value::Object(s.profile.clone()))
    }

    pub fn theme(&self) -> Option<String> {
        self.with_state(|s| s.theme.clone())
    }

    /// Ids of stored favorites, in insertion order.
    pub fn favorite_ids(&self) -> Vec<String> {
        self.with_state(|s| s.favorites.iter().filter_map(item_id).collect())
    }

    /// Requests received, formatted `METHOD path`.
    pub fn requests(&self) -> Vec<String> {
        self.with_state(|s| s.requests.clone())
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut StoreState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn handle(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
    ) -> Result<RawResponse, TransportError> {
        self.with_state(|state| {
            state.requests.push(format!("{} {}", method, path));

            if state.offline {
                return Err(TransportError::Connection("store unreachable".to_string()));
            }
            if let Some(forced) = state.forced.get(path) {
                return Ok(forced.clone());
            }

            let body = body.unwrap_or(Value::Null);
            Ok(match (method, path) {
                ("GET", "/api/user-theme") => {
                    let theme = if state.signed_in {
                        state.theme.clone().unwrap_or_else(|| "light".to_string())
                    } else {
                        "light".to_string()
                    };
                    RawResponse::json(200, &json!({ "theme": theme }))
                }
                _ if !state.signed_in => unauthenticated(method),
                ("GET", "/api/user-info") => user_info(state),
                ("GET", "/api/user-favorites") => {
                    RawResponse::json(200, &json!({ "favorites": state.favorites }))
                }
                ("GET", "/api/recommendations") => recommendations(state),
                ("POST", "/api/save-profile") => {
                    for key in ["displayName", "gender", "ageRange"] {
                        state
                            .profile
                            .insert(key.to_string(), body.get(key).cloned().unwrap_or(Value::Null));
                    }
                    acknowledged()
                }
                ("POST", "/api/save-theme") => match body.get("theme").and_then(Value::as_str) {
                    Some(theme) => {
                        state.theme = Some(theme.to_string());
                        acknowledged()
                    }
                    None => bad_request("theme is required"),
                },
                ("POST", "/api/add-favorite") => add_favorite(state, body),
                ("POST", "/api/remove-favorite") => {
                    let car_id = body.get("carId").map(id_string);
                    state.favorites.retain(|f| item_id(f) != car_id);
                    acknowledged()
                }
                ("POST", p) if p.starts_with("/api/save-") => save_selection(state, p, body),
                _ => RawResponse::json(404, &json!({ "error": "Not found" })),
            })
        })
    }
}

fn acknowledged() -> RawResponse {
    RawResponse::json(200, &json!({ "success": true }))
}

fn bad_request(error: &str) -> RawResponse {
    RawResponse::json(400, &json!({ "success": false, "error": error }))
}

fn unauthenticated(method: &str) -> RawResponse {
    if method == "GET" {
        RawResponse::json(401, &json!({ "error": "Not authenticated" }))
    } else {
        RawResponse::json(401, &json!({ "success": false, "error": "Not authenticated" }))
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn item_id(item: &Value) -> Option<String> {
    item.get("id").map(id_string)
}

fn user_info(state: &StoreState) -> RawResponse {
    let username = state.email.split('@').next().unwrap_or_default();
    RawResponse::json(
        200,
        &json!({
            "email": state.email,
            "username": username,
            "displayName": state.profile.get("displayName").cloned().unwrap_or(Value::Null),
            "gender": state.profile.get("gender").cloned().unwrap_or(Value::Null),
            "ageRange": state.profile.get("ageRange").cloned().unwrap_or(Value::Null),
        }),
    )
}

fn recommendations(state: &StoreState) -> RawResponse {
    let missing: Vec<&str> = SELECTION_KEYS
        .iter()
        .copied()
        .filter(|key| !has_value(state.selections.get(*key)))
        .collect();

    if missing.is_empty() {
        RawResponse::json(200, &Value::Array(state.recommendations.clone()))
    } else {
        RawResponse::json(
            400,
            &json!({
                "error": format!("Missing selection data: {}", missing.join(", ")),
                "missing": missing,
            }),
        )
    }
}

fn has_value(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

fn add_favorite(state: &mut StoreState, body: Value) -> RawResponse {
    let Some(car) = body.get("car").filter(|c| c.is_object()).cloned() else {
        return bad_request("car is required");
    };
    let id = item_id(&car);
    if id.is_none() {
        return bad_request("car id is required");
    }
    if state.favorites.iter().any(|f| item_id(f) == id) {
        return RawResponse::json(
            200,
            &json!({ "success": false, "message": "Already in favorites" }),
        );
    }
    state.favorites.push(car);
    acknowledged()
}

fn save_selection(state: &mut StoreState, path: &str, body: Value) -> RawResponse {
    let key = path.trim_start_matches("/api/save-");
    if !SELECTION_KEYS.contains(&key) {
        return RawResponse::json(404, &json!({ "error": "Not found" }));
    }
    match body.get(key) {
        Some(value) if has_value(Some(value)) => {
            state.selections.insert(key.to_string(), value.clone());
            acknowledged()
        }
        _ => bad_request(&format!("{} is required", key)),
    }
}

#[async_trait]
impl StoreTransport for InMemoryStore {
    async fn get(&self, path: &str) -> Result<RawResponse, TransportError> {
        self.handle("GET", path, None)
    }

    async fn post(&self, path: &str, body: Value) -> Result<RawResponse, TransportError> {
        self.handle("POST", path, Some(body))
    }
}
