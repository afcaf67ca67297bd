//! `reqwest`-backed remote task client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header::AUTHORIZATION};
use tracing::{debug, warn};

use super::models::{CreateTaskBody, FieldValueBody, TaskDto, TaskPageDto, UpdateTaskBody};
use crate::lead::{
    domain::{
        IntegrationSettings, ListId, RemoteFieldValue, RemoteTaskId, RemoteTaskSummary, TaskDraft,
    },
    ports::{RemoteTaskClient, RemoteTaskClientError, RemoteTaskClientResult},
};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_LIST_PAGES: u32 = 100;

/// Remote task client speaking the list/task REST API.
#[derive(Clone)]
pub struct HttpRemoteTaskClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpRemoteTaskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteTaskClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpRemoteTaskClient {
    /// Creates a client from integration settings.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteTaskClientError::Transport`] when the underlying HTTP
    /// client cannot be built.
    pub fn new(settings: &IntegrationSettings) -> RemoteTaskClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(RemoteTaskClientError::transport)?;
        Ok(Self {
            base_url: settings.normalized_base_url().to_owned(),
            access_token: settings.access_token.trim().to_owned(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(AUTHORIZATION, &self.access_token)
    }

    async fn send(&self, request: RequestBuilder) -> RemoteTaskClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(RemoteTaskClientError::transport)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    async fn read_task(response: Response) -> RemoteTaskClientResult<RemoteTaskSummary> {
        let task = response
            .json::<TaskDto>()
            .await
            .map_err(RemoteTaskClientError::transport)?;
        task.into_summary().ok_or_else(|| RemoteTaskClientError::Status {
            status: StatusCode::OK.as_u16(),
            message: "response task has no identifier".to_owned(),
        })
    }
}

/// Maps a non-success HTTP status onto a client error.
fn classify_status(status: StatusCode, body: &str) -> RemoteTaskClientError {
    let message = error_message(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RemoteTaskClientError::Unauthorized(message)
        }
        StatusCode::NOT_FOUND => RemoteTaskClientError::NotFound(message),
        StatusCode::CONFLICT => RemoteTaskClientError::Conflict(message),
        _ => RemoteTaskClientError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

/// Interprets a 2xx delete response body.
///
/// An empty or non-JSON body confirms deletion. A JSON body reporting
/// `"deleted": false` or `"success": false` does not.
fn delete_confirmed(body: &str) -> bool {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return true;
    };
    !["deleted", "success"]
        .iter()
        .any(|key| value.get(key).and_then(serde_json::Value::as_bool) == Some(false))
}

fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["err", "message", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_owned))
        });
    let text = from_json.unwrap_or_else(|| body.trim().to_owned());
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        text
    }
}

#[async_trait]
impl RemoteTaskClient for HttpRemoteTaskClient {
    async fn create_task(
        &self,
        list_id: &ListId,
        draft: &TaskDraft,
    ) -> RemoteTaskClientResult<RemoteTaskSummary> {
        let body = CreateTaskBody::from(draft);
        let response = self
            .send(
                self.request(Method::POST, &format!("list/{list_id}/task"))
                    .json(&body),
            )
            .await?;
        Self::read_task(response).await
    }

    async fn update_task(
        &self,
        task_id: &RemoteTaskId,
        draft: &TaskDraft,
    ) -> RemoteTaskClientResult<RemoteTaskSummary> {
        let body = UpdateTaskBody::from(draft);
        let response = self
            .send(
                self.request(Method::PUT, &format!("task/{task_id}"))
                    .json(&body),
            )
            .await?;
        let mut updated = Self::read_task(response).await?;

        for assignment in &draft.field_assignments {
            let field_body = FieldValueBody {
                value: assignment.value().to_owned(),
            };
            self.send(
                self.request(
                    Method::POST,
                    &format!("task/{task_id}/field/{}", assignment.field_id()),
                )
                .json(&field_body),
            )
            .await?;
        }
        debug!(
            task_id = %task_id,
            fields = draft.field_assignments.len(),
            "updated remote task fields"
        );

        updated.fields = draft
            .field_assignments
            .iter()
            .map(|assignment| {
                RemoteFieldValue::new(
                    assignment.field_id().clone(),
                    serde_json::Value::String(assignment.value().to_owned()),
                )
            })
            .collect();
        Ok(updated)
    }

    async fn delete_task(&self, task_id: &RemoteTaskId) -> RemoteTaskClientResult<bool> {
        let response = self
            .send(self.request(Method::DELETE, &format!("task/{task_id}")))
            .await?;
        let body = response.text().await.unwrap_or_default();
        Ok(delete_confirmed(&body))
    }

    async fn list_tasks(&self, list_id: &ListId) -> RemoteTaskClientResult<Vec<RemoteTaskSummary>> {
        let mut tasks = Vec::new();
        for page in 0..MAX_LIST_PAGES {
            let response = self
                .send(
                    self.request(Method::GET, &format!("list/{list_id}/task"))
                        .query(&[("page", page.to_string()), ("include_closed", "true".to_owned())]),
                )
                .await?;
            let listing = response
                .json::<TaskPageDto>()
                .await
                .map_err(RemoteTaskClientError::transport)?;
            tasks.extend(listing.tasks.into_iter().filter_map(TaskDto::into_summary));
            if listing.last_page {
                return Ok(tasks);
            }
        }
        warn!(
            list_id = %list_id,
            pages = MAX_LIST_PAGES,
            "task listing truncated at page limit"
        );
        Ok(tasks)
    }
}
