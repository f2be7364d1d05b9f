//! # In-process REST Backend
//!
//! `BackendActor` is a small, schema-less implementation of the REST contract the console
//! talks to. It runs as an actor: one Tokio task owns every collection and processes requests
//! sequentially, so no locks guard the store. Its [`BackendHandle`] implements [`Transport`],
//! which lets tests and the demo binary drive the whole console without a network.
//!
//! ## Contract
//!
//! | Route | Behavior |
//! |-------|----------|
//! | `POST /auth/admin/login` | opens the session when credentials match, else 401 |
//! | `POST /auth/admin/logout` | closes the session |
//! | `GET /admins/me` | the signed-in admin |
//! | `GET /<c>?page&limit` | `{ data, total, page, limit }`, ordered by id |
//! | `GET /<c>/<id>` | the record or 404 |
//! | `POST /<c>` | creates, assigns the next id |
//! | `PATCH /<c>/<id>` | merges present keys; `null` clears |
//! | `DELETE /<c>/<id>` | 204; 403 for `isSystem` records |
//!
//! Every route except login and logout answers 401 without a session.
//!
//! ## Usage
//!
//! ```rust
//! use console_framework::backend::BackendActor;
//! use console_framework::transport::{ApiRequest, Transport};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (backend, handle) = BackendActor::new("root", "secret", 32);
//!     tokio::spawn(backend.run());
//!
//!     // No session yet.
//!     let response = handle.send(ApiRequest::get("/users?page=1&limit=10")).await.unwrap();
//!     assert_eq!(response.status, 401);
//! }
//! ```

use crate::error::GatewayError;
use crate::resource::ResourceId;
use crate::session::{LOGIN_ENDPOINT, LOGOUT_ENDPOINT, PROBE_ENDPOINT};
use crate::transport::{ApiRequest, ApiResponse, FormPart, Method, RequestBody, Transport};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

type Record = Map<String, Value>;

/// Messages accepted by the backend actor.
#[derive(Debug)]
pub enum BackendRequest {
    Http {
        request: ApiRequest,
        respond_to: oneshot::Sender<ApiResponse>,
    },
    Seed {
        collection: String,
        record: Value,
        respond_to: oneshot::Sender<Result<ResourceId, String>>,
    },
    ExpireSession,
    RequestLog {
        respond_to: oneshot::Sender<Vec<(Method, String)>>,
    },
}

pub struct BackendActor {
    receiver: mpsc::Receiver<BackendRequest>,
    collections: HashMap<String, BTreeMap<ResourceId, Record>>,
    next_ids: HashMap<String, ResourceId>,
    username: String,
    password: String,
    signed_in: bool,
    log: Vec<(Method, String)>,
}

impl BackendActor {
    /// Creates the backend and its handle.
    ///
    /// The admin account is stored as `admins/1` and flagged `isSystem`.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        buffer_size: usize,
    ) -> (Self, BackendHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let mut actor = Self {
            receiver,
            collections: HashMap::new(),
            next_ids: HashMap::new(),
            username: username.into(),
            password: password.into(),
            signed_in: false,
            log: Vec::new(),
        };
        let admin = json!({ "username": actor.username.clone(), "isSystem": true });
        // Cannot fail: the value is an object.
        let _ = actor.seed("admins", admin);
        (actor, BackendHandle { sender })
    }

    /// Processes requests until every handle is dropped.
    pub async fn run(mut self) {
        info!("Backend started");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                BackendRequest::Http {
                    request,
                    respond_to,
                } => {
                    self.log.push((request.method, request.path.clone()));
                    let method = request.method;
                    let path = request.path.clone();
                    let response = self.handle(request);
                    debug!(%method, %path, status = response.status, "Handled");
                    let _ = respond_to.send(response);
                }
                BackendRequest::Seed {
                    collection,
                    record,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.seed(&collection, record));
                }
                BackendRequest::ExpireSession => {
                    info!("Session expired");
                    self.signed_in = false;
                }
                BackendRequest::RequestLog { respond_to } => {
                    let _ = respond_to.send(self.log.clone());
                }
            }
        }
        let size: usize = self.collections.values().map(BTreeMap::len).sum();
        info!(size, "Backend shutdown");
    }

    fn seed(&mut self, collection: &str, record: Value) -> Result<ResourceId, String> {
        let Value::Object(mut record) = record else {
            return Err(format!("seed record for {collection} must be an object"));
        };
        let next = self.next_ids.entry(collection.to_string()).or_insert(1);
        let id = match record.get("id").and_then(Value::as_i64) {
            Some(id) => id,
            None => *next,
        };
        *next = (*next).max(id + 1);
        record.insert("id".to_string(), json!(id));
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, record);
        Ok(id)
    }

    fn handle(&mut self, request: ApiRequest) -> ApiResponse {
        let (path, query) = match request.path.split_once('?') {
            Some((path, query)) => (path.to_string(), query.to_string()),
            None => (request.path.clone(), String::new()),
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if request.method == Method::Post && path == LOGIN_ENDPOINT {
            return self.login(request.body);
        }
        if request.method == Method::Post && path == LOGOUT_ENDPOINT {
            self.signed_in = false;
            return ApiResponse::empty(201);
        }
        if !self.signed_in {
            return error(401, "Unauthorized");
        }
        if request.method == Method::Get && path == PROBE_ENDPOINT {
            return self.find("admins", 1);
        }

        match (request.method, segments.as_slice()) {
            (Method::Get, [collection]) => self.list(collection, &query),
            (Method::Post, [collection]) => self.create(collection, request.body),
            (method, [collection, id]) => match id.parse::<ResourceId>() {
                Ok(id) => match method {
                    Method::Get => self.find(collection, id),
                    Method::Patch => self.update(collection, id, request.body),
                    Method::Delete => self.delete(collection, id),
                    Method::Post => route_not_found(method, &path),
                },
                Err(_) => error(400, "Validation failed (numeric string is expected)"),
            },
            (method, _) => route_not_found(method, &path),
        }
    }

    fn login(&mut self, body: RequestBody) -> ApiResponse {
        let fields = decode_body(body);
        let matches = fields.get("username").and_then(Value::as_str) == Some(self.username.as_str())
            && fields.get("password").and_then(Value::as_str) == Some(self.password.as_str());
        if !matches {
            return error(401, "Invalid credentials");
        }
        self.signed_in = true;
        info!(username = %self.username, "Admin signed in");
        self.find("admins", 1)
    }

    fn list(&self, collection: &str, query: &str) -> ApiResponse {
        let param = |key: &str, default: u32| -> Result<u32, String> {
            match query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == key)
            {
                None => Ok(default),
                Some((_, v)) => match v.parse::<u32>() {
                    Ok(n) if n > 0 => Ok(n),
                    _ => Err(format!("{key} must be a positive integer")),
                },
            }
        };
        let (page, limit) = match (param("page", 1), param("limit", 10)) {
            (Ok(page), Ok(limit)) => (page, limit),
            (Err(message), _) | (_, Err(message)) => return error(400, &message),
        };

        let records = self.collections.get(collection);
        let total = records.map(BTreeMap::len).unwrap_or(0);
        let skip = (page as usize - 1).saturating_mul(limit as usize);
        let data: Vec<Value> = records
            .into_iter()
            .flat_map(BTreeMap::values)
            .skip(skip)
            .take(limit as usize)
            .map(|r| Value::Object(r.clone()))
            .collect();
        ApiResponse::json(
            200,
            &json!({ "data": data, "total": total, "page": page, "limit": limit }),
        )
    }

    fn find(&self, collection: &str, id: ResourceId) -> ApiResponse {
        match self.collections.get(collection).and_then(|c| c.get(&id)) {
            Some(record) => ApiResponse::json(200, &Value::Object(record.clone())),
            None => not_found(collection, id),
        }
    }

    fn create(&mut self, collection: &str, body: RequestBody) -> ApiResponse {
        let mut record = decode_body(body);
        record.remove("id");
        match self.seed(collection, Value::Object(record)) {
            Ok(id) => {
                info!(collection, id, "Created");
                let mut response = self.find(collection, id);
                response.status = 201;
                response
            }
            Err(message) => error(400, &message),
        }
    }

    fn update(&mut self, collection: &str, id: ResourceId, body: RequestBody) -> ApiResponse {
        let Some(record) = self
            .collections
            .get_mut(collection)
            .and_then(|c| c.get_mut(&id))
        else {
            return not_found(collection, id);
        };
        for (key, value) in decode_body(body) {
            if key != "id" {
                record.insert(key, value);
            }
        }
        info!(collection, id, "Updated");
        ApiResponse::json(200, &Value::Object(record.clone()))
    }

    fn delete(&mut self, collection: &str, id: ResourceId) -> ApiResponse {
        let Some(records) = self.collections.get_mut(collection) else {
            return not_found(collection, id);
        };
        let protected = match records.get(&id) {
            None => return not_found(collection, id),
            Some(record) => record.get("isSystem") == Some(&Value::Bool(true)),
        };
        if protected {
            return error(403, &format!("{collection} #{id} is protected"));
        }
        records.remove(&id);
        info!(collection, id, size = records.len(), "Deleted");
        ApiResponse::empty(204)
    }
}

fn decode_body(body: RequestBody) -> Record {
    match body {
        RequestBody::Empty => Record::new(),
        RequestBody::Json(Value::Object(map)) => map,
        RequestBody::Json(_) => Record::new(),
        RequestBody::Multipart(parts) => parts
            .into_iter()
            .map(|part| match part {
                // Text parts carry JSON text; a bare unquoted string from a plain form is kept as is.
                FormPart::Text { name, value } => {
                    let parsed = serde_json::from_str::<Value>(&value)
                        .unwrap_or(Value::String(value));
                    (name, parsed)
                }
                FormPart::File {
                    name, file_name, ..
                } => (name, Value::String(format!("uploads/{file_name}"))),
            })
            .collect(),
    }
}

fn error(status: u16, message: &str) -> ApiResponse {
    ApiResponse::json(status, &json!({ "statusCode": status, "message": message }))
}

fn not_found(collection: &str, id: ResourceId) -> ApiResponse {
    error(404, &format!("{collection} #{id} not found"))
}

fn route_not_found(method: Method, path: &str) -> ApiResponse {
    error(404, &format!("Cannot {method} {path}"))
}

/// Cloneable client side of the backend actor.
#[derive(Clone)]
pub struct BackendHandle {
    sender: mpsc::Sender<BackendRequest>,
}

impl BackendHandle {
    async fn call<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> BackendRequest,
    ) -> Result<R, GatewayError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| GatewayError::Network("backend closed".to_string()))?;
        response
            .await
            .map_err(|_| GatewayError::Network("backend dropped response".to_string()))
    }

    /// Inserts a fixture record. A missing `id` gets the next free one.
    pub async fn seed(&self, collection: &str, record: Value) -> Result<ResourceId, GatewayError> {
        let collection = collection.to_string();
        self.call(|respond_to| BackendRequest::Seed {
            collection,
            record,
            respond_to,
        })
        .await?
        .map_err(GatewayError::Serialization)
    }

    /// Drops the current session; the next protected request answers 401.
    pub async fn expire_session(&self) -> Result<(), GatewayError> {
        self.sender
            .send(BackendRequest::ExpireSession)
            .await
            .map_err(|_| GatewayError::Network("backend closed".to_string()))
    }

    /// Every HTTP request received so far, oldest first.
    pub async fn requests(&self) -> Result<Vec<(Method, String)>, GatewayError> {
        self.call(|respond_to| BackendRequest::RequestLog { respond_to })
            .await
    }
}

#[async_trait]
impl Transport for BackendHandle {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.call(|respond_to| BackendRequest::Http {
            request,
            respond_to,
        })
        .await
    }
}
