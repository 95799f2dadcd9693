//! Request dispatcher
//!
//! `dispatch` is the single entry point for every adapter:
//!
//! 1. look the operation up in `OPERATIONS` (unknown → INVALID_PARAMS)
//! 2. validate parameters (failure → INVALID_PARAMS, no filesystem access)
//! 3. run the handler on the blocking pool
//! 4. seal the handler output through the redactor and wrap it
//!
//! Handlers return `RedactedText`, so there is no path from a handler
//! to the caller that skips redaction.

use crate::core::error::{ErrorCode, GatewayError, Result, GENERIC_INTERNAL_MESSAGE};
use crate::core::files;
use crate::core::redact::{RedactedText, Redactor};
use crate::core::registry::{ServiceDescriptor, ServiceOp};
use crate::core::resolver::to_slash_relative;
use crate::core::search::{CancelFlag, SearchQuery};
use crate::core::services::Services;
use crate::gateway::operation::OperationKind;
use crate::gateway::response::{OperationResponse, TextContent};
use crate::gateway::validate::{SchemaValidator, ValidatedRequest, ValidatedSearch};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// Routes requests to operation handlers
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    services: Services,
    validator: SchemaValidator,
}

impl RequestDispatcher {
    pub fn new(services: Services) -> Self {
        let validator = SchemaValidator::new(
            services.registry.clone(),
            services.config.limits.clone(),
        );
        Self {
            services,
            validator,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    /// Run one operation and build its response envelope.
    ///
    /// Dropping the returned future raises the cancellation flag seen
    /// by the running handler.
    pub async fn dispatch(&self, operation: &str, params: &Value) -> OperationResponse {
        self.dispatch_with_cancel(operation, params, CancelFlag::new())
            .await
    }

    /// Like [`dispatch`](Self::dispatch), with a flag the caller can
    /// raise to stop the running handler.
    pub async fn dispatch_with_cancel(
        &self,
        operation: &str,
        params: &Value,
        cancel: CancelFlag,
    ) -> OperationResponse {
        let Some(kind) = OperationKind::from_name(operation) else {
            tracing::debug!("Unknown operation requested: {:?}", operation);
            return OperationResponse::failure(
                ErrorCode::InvalidParams,
                &format!("unknown operation '{operation}'"),
            );
        };

        let request = match self.validator.validate(kind, params) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!("Rejected {} request: {}", kind, e);
                return OperationResponse::from_error(&e);
            }
        };

        let start = Instant::now();
        let guard = cancel.guard();
        let services = self.services.clone();

        let joined =
            tokio::task::spawn_blocking(move || execute(&services, request, &cancel)).await;
        guard.disarm();

        let response = match joined {
            Ok(Ok(texts)) => OperationResponse::Success {
                content: texts
                    .into_iter()
                    .map(|text| TextContent { text })
                    .collect(),
            },
            Ok(Err(e)) => {
                log_failure(kind, &e);
                OperationResponse::from_error(&e)
            }
            Err(join_error) => {
                tracing::error!("Handler for {} did not complete: {}", kind, join_error);
                OperationResponse::failure(ErrorCode::InternalError, GENERIC_INTERNAL_MESSAGE)
            }
        };

        tracing::debug!(
            "{} finished in {}ms (error: {})",
            kind,
            start.elapsed().as_millis(),
            response.is_error()
        );

        response
    }
}

fn log_failure(kind: OperationKind, err: &GatewayError) {
    match err {
        GatewayError::AccessDenied(violation) => {
            tracing::warn!("{} denied: {}", kind, violation);
        }
        e if e.is_internal() => {
            tracing::error!("{} failed: {:?}", kind, e);
        }
        e => {
            tracing::debug!("{} failed: {}", kind, e);
        }
    }
}

/// Blocking part of a request
fn execute(
    services: &Services,
    request: ValidatedRequest,
    cancel: &CancelFlag,
) -> Result<Vec<RedactedText>> {
    match request {
        ValidatedRequest::Read { service, file_path } => read(services, &service, &file_path),
        ValidatedRequest::List { service, dir_path } => {
            list(services, &service, &dir_path).map(|text| vec![text])
        }
        ValidatedRequest::Search(search_params) => {
            search(services, search_params, cancel).map(|text| vec![text])
        }
        ValidatedRequest::Structure => structure(services).map(|text| vec![text]),
    }
}

fn descriptor_for<'a>(services: &'a Services, name: &str, op: ServiceOp) -> Result<&'a ServiceDescriptor> {
    services.registry.get_for(name, op).ok_or_else(|| {
        GatewayError::InvalidParams(format!("service '{name}' is not available for {}", op.as_str()))
    })
}

fn seal_json<T: Serialize>(value: &T) -> Result<RedactedText> {
    Ok(Redactor::global().seal_json(value)?)
}

fn read(services: &Services, name: &str, file_path: &str) -> Result<Vec<RedactedText>> {
    let descriptor = descriptor_for(services, name, ServiceOp::Read)?;
    let resolved = services.resolver.resolve(descriptor, file_path)?;
    let max_bytes = services.config.limits.max_bytes_per_file;
    let content = files::read_file(&resolved.absolute_path, max_bytes)?;

    let redactor = Redactor::global();
    let mut texts = vec![redactor.seal(&format!(
        "File: {}/{}\n\n{}",
        resolved.service, resolved.relative_path, content.text
    ))];

    // Separate block: an unterminated key block at the cut is redacted
    // to end of text and would swallow a trailing notice.
    if content.truncated {
        texts.push(redactor.seal(&format!(
            "[truncated: showing the first {} of {} bytes]",
            max_bytes, content.total_bytes
        )));
    }

    Ok(texts)
}

fn list(services: &Services, name: &str, dir_path: &str) -> Result<RedactedText> {
    let descriptor = descriptor_for(services, name, ServiceOp::List)?;
    let resolved = services.resolver.resolve(descriptor, dir_path)?;
    let listing = files::list_dir(
        &resolved.absolute_path,
        &resolved.relative_path,
        services.resolver.policy(),
        services.config.limits.max_list_entries,
    )?;

    seal_json(&json!({
        "service": resolved.service,
        "path": resolved.relative_path,
        "total": listing.total,
        "truncated": listing.truncated,
        "entries": listing.entries,
    }))
}

fn search(
    services: &Services,
    params: ValidatedSearch,
    cancel: &CancelFlag,
) -> Result<RedactedText> {
    let (root, scope) = match &params.service {
        Some(name) => {
            let descriptor = descriptor_for(services, name, ServiceOp::Search)?;
            let root = services
                .resolver
                .resolve_safe_path(&descriptor.root_path, ".")?;
            (root, name.clone())
        }
        None => {
            let root = services
                .resolver
                .resolve_safe_path(services.registry.project_root(), ".")?;
            (root, "project".to_string())
        }
    };

    let query = SearchQuery {
        text: params.query,
        file_types: params.file_types,
        max_results: params.max_results,
        max_bytes_per_file: services.config.limits.max_bytes_per_file,
    };

    let outcome = services.search.search(&root, &scope, &query, cancel)?;
    seal_json(&outcome)
}

fn structure(services: &Services) -> Result<RedactedText> {
    let project_root = services.registry.project_root();

    let entries: Vec<Value> = services
        .registry
        .iter()
        .map(|descriptor| {
            // Roots outside the project are not shown
            let root = to_slash_relative(&descriptor.root_path, project_root)
                .unwrap_or_else(|| "(outside project root)".to_string());
            let operations: Vec<&str> = descriptor
                .allowed_operations
                .iter()
                .map(|op| op.as_str())
                .collect();

            json!({
                "name": descriptor.name,
                "root": root,
                "operations": operations,
                "exists": descriptor.root_path.is_dir(),
            })
        })
        .collect();

    seal_json(&json!({
        "services": entries,
        "total": entries.len(),
    }))
}
