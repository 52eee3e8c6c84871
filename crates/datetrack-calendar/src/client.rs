//! Google Calendar API client.

use async_trait::async_trait;
use datetrack_core::config::CalendarConfig;
use std::time::Duration;
use tracing::instrument;

use crate::error::CalendarError;
use crate::remote::{EventQuery, RemoteCalendar};
use crate::types::*;

pub struct CalendarClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
    calendar_id: String,
    time_zone: String,
}

impl CalendarClient {
    /// Build a client for the configured calendar.
    ///
    /// Fails when there is no token, since every call would be rejected.
    pub fn new(access_token: &str, config: &CalendarConfig) -> Result<Self, CalendarError> {
        if access_token.trim().is_empty() {
            return Err(CalendarError::Initialization(
                "no access token available".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| CalendarError::Initialization(e.to_string()))?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            calendar_id: config.calendar_id.clone(),
            time_zone: config.time_zone.clone(),
        })
    }

    fn auth_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(&self.calendar_id),
        )
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }

    /// List all calendars.
    #[instrument(skip(self), level = "info")]
    pub async fn list_calendars(&self) -> Result<Vec<Calendar>, CalendarError> {
        let url = format!("{}/users/me/calendarList", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let resp: CalendarListResponse = self.handle_response(response).await?;
        Ok(resp.items.into_iter().map(Calendar::from).collect())
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let response = self.check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| CalendarError::ApiError(format!("JSON parse error: {}", e)))
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, CalendarError> {
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else if status.as_u16() == 401 {
            Err(CalendarError::TokenExpired)
        } else if status.as_u16() == 403 {
            Err(CalendarError::AuthRequired)
        } else if status.as_u16() == 404 || status.as_u16() == 410 {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::EventNotFound(text))
        } else if status.as_u16() == 409 {
            Err(CalendarError::Conflict)
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(CalendarError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(CalendarError::ApiError(format!("{}: {}", status, text)))
        }
    }
}

#[async_trait]
impl RemoteCalendar for CalendarClient {
    #[instrument(skip(self, event), fields(summary = %event.summary), level = "info")]
    async fn create_event(&self, event: &EventDescriptor) -> Result<String, CalendarError> {
        let body = ApiEventBody::from_descriptor(event, &self.time_zone);

        let response = self
            .client
            .post(self.events_url())
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;

        let api_event: ApiEvent = self.handle_response(response).await?;
        Ok(api_event.id)
    }

    #[instrument(skip(self, event), level = "info")]
    async fn update_event(
        &self,
        event_id: &str,
        event: &EventDescriptor,
    ) -> Result<(), CalendarError> {
        let body = ApiEventBody::from_descriptor(event, &self.time_zone);

        // PUT replaces the whole event, so fields dropped locally disappear remotely too
        let response = self
            .client
            .put(self.event_url(event_id))
            .header("Authorization", self.auth_header())
            .json(&body)
            .send()
            .await?;

        self.check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self), level = "info")]
    async fn delete_event(&self, event_id: &str) -> Result<(), CalendarError> {
        let response = self
            .client
            .delete(self.event_url(event_id))
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        // Delete returns 204 No Content on success
        self.check_status(response).await?;
        Ok(())
    }

    #[instrument(skip(self), level = "info")]
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<RemoteEvent>, CalendarError> {
        let mut url = format!(
            "{}?timeMin={}&singleEvents=true&orderBy=startTime&maxResults={}",
            self.events_url(),
            urlencoding::encode(&query.time_min.to_rfc3339()),
            query.max_results,
        );
        if let Some(max) = query.time_max {
            url.push_str(&format!("&timeMax={}", urlencoding::encode(&max.to_rfc3339())));
        }
        if let Some(text) = query.text.as_deref().filter(|t| !t.is_empty()) {
            url.push_str(&format!("&q={}", urlencoding::encode(text)));
        }

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.auth_header())
            .send()
            .await?;

        let resp: EventListResponse = self.handle_response(response).await?;
        Ok(resp
            .items
            .into_iter()
            .filter_map(RemoteEvent::from_api)
            .collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn probe(&self) -> Result<(), CalendarError> {
        self.list_calendars().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> CalendarConfig {
        CalendarConfig {
            api_base_url: base_url.to_string(),
            time_zone: "America/Los_Angeles".to_string(),
            ..CalendarConfig::default()
        }
    }

    fn client(server: &MockServer) -> CalendarClient {
        CalendarClient::new("test_token", &config(&server.uri())).unwrap()
    }

    fn descriptor() -> EventDescriptor {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        EventDescriptor {
            summary: "Coffee Date - Starbucks".to_string(),
            description: "Date Type: Coffee".to_string(),
            start,
            end: start + chrono::Duration::hours(2),
            location: "Starbucks".to_string(),
            color: ColorTag::Green,
        }
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let result = CalendarClient::new("  ", &CalendarConfig::default());
        assert!(matches!(result, Err(CalendarError::Initialization(_))));
    }

    #[tokio::test]
    async fn test_list_calendars() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/calendarList"))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {"id": "primary", "summary": "My Calendar", "primary": true, "accessRole": "owner"},
                    {"id": "cal2", "summary": "Work", "accessRole": "writer"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let calendars = client(&mock_server).list_calendars().await.unwrap();

        assert_eq!(calendars.len(), 2);
        assert!(calendars[0].is_primary);
    }

    #[tokio::test]
    async fn test_create_event_sends_local_time_and_color() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .and(header("Authorization", "Bearer test_token"))
            .and(body_partial_json(serde_json::json!({
                "summary": "Coffee Date - Starbucks",
                "location": "Starbucks",
                "colorId": "10",
                "start": {"dateTime": "2024-01-15T14:00:00", "timeZone": "America/Los_Angeles"},
                "end": {"dateTime": "2024-01-15T16:00:00", "timeZone": "America/Los_Angeles"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt1",
                "summary": "Coffee Date - Starbucks"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let id = client(&mock_server).create_event(&descriptor()).await.unwrap();
        assert_eq!(id, "evt1");
    }

    #[tokio::test]
    async fn test_update_event_replaces_with_put() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/calendars/primary/events/evt1"))
            .and(body_partial_json(serde_json::json!({"colorId": "10"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt1"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        client(&mock_server)
            .update_event("evt1", &descriptor())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/calendars/primary/events/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).update_event("gone", &descriptor()).await;
        assert!(matches!(result, Err(CalendarError::EventNotFound(_))));
    }

    #[tokio::test]
    async fn test_list_events_with_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("q", "Dating Tracker"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("maxResults", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [
                    {
                        "id": "event1",
                        "summary": "Coffee Date - Starbucks",
                        "start": {"dateTime": "2024-02-01T10:00:00Z"},
                        "end": {"dateTime": "2024-02-01T12:00:00Z"},
                        "colorId": "10"
                    },
                    {"id": "no-start"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let time_min = DateTime::parse_from_rfc3339("2024-02-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let query = EventQuery::upcoming(time_min, Some("Dating Tracker".to_string()));

        let events = client(&mock_server).list_events(&query).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary, "Coffee Date - Starbucks");
        assert_eq!(events[0].color, ColorTag::Green);
    }

    #[tokio::test]
    async fn test_token_expired() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/calendarList"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).probe().await;

        assert!(matches!(result, Err(CalendarError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(429).append_header("Retry-After", "30"))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).create_event(&descriptor()).await;

        assert!(matches!(result, Err(CalendarError::RateLimited(30))));
    }

    #[tokio::test]
    async fn test_delete_event() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/calendars/primary/events/event123"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).delete_event("event123").await;

        assert!(result.is_ok());
    }
}
