//! # Resource Gateway
//!
//! `ResourceGateway<T>` maps the five operations of a browsing screen onto the REST routes of
//! `T::COLLECTION`:
//!
//! | Operation | Route |
//! |-----------|-------|
//! | [`list`](ResourceGateway::list) | `GET /<collection>?page=<n>&limit=<m>` |
//! | [`get_by_id`](ResourceGateway::get_by_id) | `GET /<collection>/<id>` |
//! | [`create`](ResourceGateway::create) | `POST /<collection>` |
//! | [`update`](ResourceGateway::update) | `PATCH /<collection>/<id>` |
//! | [`delete`](ResourceGateway::delete) | `DELETE /<collection>/<id>` |
//!
//! Create and update send JSON unless attachments are given, in which case the body becomes
//! `multipart/form-data` built by [`encode_multipart`].

use crate::error::GatewayError;
use crate::resource::{ListEnvelope, Page, Pagination, Resource, ResourceId};
use crate::session::SessionClient;
use crate::transport::{ApiRequest, FormPart, Method, RequestBody};
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, instrument};

/// A binary asset uploaded alongside a patch (e.g. a shop item image).
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// Form field the file is sent under.
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Type-safe REST adapter for one entity.
///
/// Cheap to clone: it only holds the shared [`SessionClient`].
pub struct ResourceGateway<T: Resource> {
    client: Arc<SessionClient>,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Resource> Clone for ResourceGateway<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Resource> ResourceGateway<T> {
    pub fn new(client: Arc<SessionClient>) -> Self {
        Self {
            client,
            _entity: PhantomData,
        }
    }

    fn collection_path() -> String {
        format!("/{}", T::COLLECTION)
    }

    fn record_path(id: ResourceId) -> String {
        format!("/{}/{}", T::COLLECTION, id)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn list(&self, pagination: Pagination) -> Result<Page<T>, GatewayError> {
        let path = format!("{}?{}", Self::collection_path(), pagination.query());
        let response = self.client.request(ApiRequest::get(path)).await?;
        let envelope: ListEnvelope<T> = response.decode()?;
        Ok(envelope.into())
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn get_by_id(&self, id: ResourceId) -> Result<T, GatewayError> {
        let response = self
            .client
            .request(ApiRequest::get(Self::record_path(id)))
            .await?;
        response.decode()
    }

    #[instrument(skip(self, patch, attachments), fields(collection = T::COLLECTION))]
    pub async fn create(
        &self,
        patch: &T::Patch,
        attachments: &[Attachment],
    ) -> Result<T, GatewayError> {
        let body = encode_body(patch, attachments)?;
        let request = ApiRequest::new(Method::Post, Self::collection_path()).with_body(body);
        let created: T = self.client.request(request).await?.decode()?;
        info!(id = created.id(), "Created");
        Ok(created)
    }

    #[instrument(skip(self, patch, attachments), fields(collection = T::COLLECTION))]
    pub async fn update(
        &self,
        id: ResourceId,
        patch: &T::Patch,
        attachments: &[Attachment],
    ) -> Result<T, GatewayError> {
        let body = encode_body(patch, attachments)?;
        let request = ApiRequest::new(Method::Patch, Self::record_path(id)).with_body(body);
        let updated: T = self.client.request(request).await?.decode()?;
        info!(id, "Updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(collection = T::COLLECTION))]
    pub async fn delete(&self, id: ResourceId) -> Result<(), GatewayError> {
        self.client
            .request(ApiRequest::delete(Self::record_path(id)))
            .await?;
        info!(id, "Deleted");
        Ok(())
    }
}

fn encode_body<P: Serialize>(
    patch: &P,
    attachments: &[Attachment],
) -> Result<RequestBody, GatewayError> {
    if attachments.is_empty() {
        Ok(RequestBody::Json(serde_json::to_value(patch)?))
    } else {
        Ok(RequestBody::Multipart(encode_multipart(patch, attachments)?))
    }
}

/// Builds the multipart parts for a patch plus its files.
///
/// Only keys present in the serialized patch become parts, so an absent field is omitted
/// rather than sent empty. Every present value is sent as compact JSON text: a clear is `null`,
/// the string "null" is `"null"` and a numeric-looking string such as "1984" stays quoted.
///
/// Files follow the fields, in the order given.
pub fn encode_multipart<P: Serialize>(
    patch: &P,
    attachments: &[Attachment],
) -> Result<Vec<FormPart>, GatewayError> {
    let fields = match serde_json::to_value(patch)? {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(GatewayError::Serialization(format!(
                "patch must serialize to an object, got {other}"
            )))
        }
    };

    let mut parts: Vec<FormPart> = fields
        .into_iter()
        .map(|(name, value)| FormPart::Text {
            name,
            value: value.to_string(),
        })
        .collect();

    parts.extend(attachments.iter().map(|a| FormPart::File {
        name: a.field.clone(),
        file_name: a.file_name.clone(),
        content_type: a.content_type.clone(),
        bytes: a.bytes.clone(),
    }));
    Ok(parts)
}
