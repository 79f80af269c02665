//! HTTP client for the event service.
//!
//! Endpoints (relative to the base URL):
//! - `GET /events`, `POST /events`
//! - `GET|PUT|DELETE /events/{id}`
//! - `GET /events/date/{YYYY-MM-DD}`
//! - `GET /events/upcoming?count=N`

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::EventRepository;
use crate::day::DAY_FORMAT;
use crate::error::{DaybookError, DaybookResult};
use crate::event::{Event, EventDraft};

/// Error reply body of the event service
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

pub struct RemoteRepository {
    http: reqwest::Client,
    base_url: Url,
}

impl RemoteRepository {
    pub fn new(base_url: &str, timeout: Duration) -> DaybookResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DaybookError::Config(format!("Could not build HTTP client: {e}")))?;

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| DaybookError::Config(format!("Invalid event service URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(DaybookError::Config(format!(
                "Invalid event service URL '{base_url}'"
            )));
        }

        Ok(RemoteRepository { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// The base URL extended by `segments`, each percent-encoded as a single
    /// path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and check its status. `id` names the event the request
    /// is about, so a 404 can be reported as `NotFound`.
    async fn send(&self, request: RequestBuilder, id: Option<&str>) -> DaybookResult<Response> {
        let resp = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "event service unreachable");
            DaybookError::from(e)
        })?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };

        Err(match (status, id) {
            (StatusCode::NOT_FOUND, Some(id)) => DaybookError::NotFound(id.to_string()),
            (StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY, _) => {
                DaybookError::Validation(message)
            }
            _ => DaybookError::Transport(format!("{status}: {message}")),
        })
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        id: Option<&str>,
    ) -> DaybookResult<T> {
        let resp = self.send(request, id).await?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl EventRepository for RemoteRepository {
    async fn list_all(&self) -> DaybookResult<Vec<Event>> {
        tracing::debug!(url = %self.base_url, "GET /events");
        self.fetch(self.http.get(self.url(&["events"])), None).await
    }

    async fn get_by_id(&self, id: &str) -> DaybookResult<Event> {
        self.fetch(self.http.get(self.url(&["events", id])), Some(id))
            .await
    }

    async fn create(&self, draft: EventDraft) -> DaybookResult<Event> {
        draft.validate()?;
        self.fetch(self.http.post(self.url(&["events"])).json(&draft), None)
            .await
    }

    async fn update(&self, event: Event) -> DaybookResult<Event> {
        event.validate()?;
        let request = self
            .http
            .put(self.url(&["events", &event.id]))
            .json(&event);
        self.fetch(request, Some(&event.id)).await
    }

    async fn delete(&self, id: &str) -> DaybookResult<()> {
        self.send(self.http.delete(self.url(&["events", id])), Some(id))
            .await?;
        Ok(())
    }

    async fn list_by_date(&self, date: NaiveDate) -> DaybookResult<Vec<Event>> {
        let day = date.format(DAY_FORMAT).to_string();
        self.fetch(self.http.get(self.url(&["events", "date", &day])), None)
            .await
    }

    async fn list_upcoming(&self, count: usize) -> DaybookResult<Vec<Event>> {
        let request = self
            .http
            .get(self.url(&["events", "upcoming"]))
            .query(&[("count", count)]);
        self.fetch(request, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn event_json(id: &str, title: &str, start: &str, end: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "startTime": start,
            "endTime": end,
        })
    }

    fn repo_for(server: &MockServer) -> RemoteRepository {
        RemoteRepository::new(&format!("{}/api/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_all_parses_iso_timestamps() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                event_json("1", "Team Meeting", "2024-03-15T09:00:00", "2024-03-15T10:00:00"),
                event_json("2", "Lunch", "2024-03-15T12:00:00.000", "2024-03-15T13:00:00"),
            ])))
            .mount(&server)
            .await;

        let events = repo_for(&server).list_all().await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start_hour(), 9);
        assert_eq!(events[1].day_key(), "2024-03-15");
    }

    #[tokio::test]
    async fn test_create_posts_draft() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/events"))
            .and(body_partial_json(json!({
                "title": "Dentist",
                "startTime": "2024-03-17T09:00:00",
                "reminder": 60,
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "event-42",
                "title": "Dentist",
                "description": "",
                "startTime": "2024-03-17T09:00:00",
                "endTime": "2024-03-17T10:00:00",
                "reminder": 60,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let start = NaiveDate::from_ymd_opt(2024, 3, 17)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let draft = EventDraft::new("Dentist", start, start + chrono::Duration::hours(1))
            .with_reminder(60);

        let created = repo_for(&server).create(draft).await.unwrap();
        assert_eq!(created.id, "event-42");
        assert_eq!(created.reminder, Some(60));
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let start = NaiveDate::from_ymd_opt(2024, 3, 17)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let result = repo_for(&server)
            .create(EventDraft::new("", start, start))
            .await;

        assert!(matches!(result, Err(DaybookError::Validation(_))));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/events/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Event not found"})),
            )
            .mount(&server)
            .await;

        let result = repo_for(&server).delete("missing").await;
        assert!(matches!(result, Err(DaybookError::NotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = repo_for(&server).list_all().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"events": []})))
            .mount(&server)
            .await;

        let err = repo_for(&server).list_all().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_unreachable_service_maps_to_transport() {
        let repo = RemoteRepository::new("http://127.0.0.1:9/api", Duration::from_secs(2)).unwrap();
        let err = repo.list_all().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_date_and_upcoming_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events/date/2024-03-05"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/events/upcoming"))
            .and(query_param("count", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                event_json("9", "Soon", "2099-01-01T08:00:00", "2099-01-01T09:00:00"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let repo = repo_for(&server);
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert!(repo.list_by_date(date).await.unwrap().is_empty());
        assert_eq!(repo.list_upcoming(3).await.unwrap()[0].id, "9");
    }

    #[tokio::test]
    async fn test_update_puts_full_record() {
        let server = MockServer::start().await;
        let body = event_json("7", "Renamed", "2024-03-15T09:00:00", "2024-03-15T10:00:00");
        Mock::given(method("PUT"))
            .and(path("/api/events/7"))
            .and(body_partial_json(json!({"id": "7", "title": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let event: Event = serde_json::from_value(body).unwrap();
        let updated = repo_for(&server).update(event.clone()).await.unwrap();
        assert_eq!(updated, event);
    }

    #[tokio::test]
    async fn test_ids_are_sent_as_single_path_segments() {
        let server = MockServer::start().await;
        let body = event_json("team/sync?x#y", "Sync", "2024-03-15T09:00:00", "2024-03-15T10:00:00");
        Mock::given(method("GET"))
            .and(path("/api/events/team%2Fsync%3Fx%23y"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/events/team%2Fsync%3Fx%23y"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let repo = repo_for(&server);
        assert_eq!(repo.get_by_id("team/sync?x#y").await.unwrap().title, "Sync");
        repo.delete("team/sync?x#y").await.unwrap();
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        for url in ["not a url", "mailto:events@example.com"] {
            assert!(matches!(
                RemoteRepository::new(url, Duration::from_secs(1)),
                Err(DaybookError::Config(_))
            ));
        }
        let repo = RemoteRepository::new("http://localhost:8080/api/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(repo.base_url(), "http://localhost:8080/api");
    }
}
