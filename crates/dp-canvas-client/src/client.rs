//! Main Canvas REST client implementation

use dp_canvas_api::*;
use reqwest::{Client as HttpClient, Method, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::AuthConfig;
use crate::error::{CanvasClientError, CanvasResult};
use crate::paging::drain_pages;

/// REST API client for a Canvas LMS instance.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    http_client: HttpClient,
    base_url: Url,
    auth: AuthConfig,
}

impl CanvasClient {
    /// Create a new Canvas client.
    pub fn new(base_url: Url, auth: AuthConfig) -> Self {
        let http_client = HttpClient::builder()
            .user_agent("dp-tools/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
            auth,
        }
    }

    /// Create a client from a host name, e.g. `canvas.kth.se`.
    pub fn from_host(host: &str, auth: AuthConfig) -> CanvasResult<Self> {
        let base_url = Url::parse(&format!("https://{}/", host))?;
        Ok(Self::new(base_url, auth))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Custom gradebook columns

    pub async fn list_custom_columns(&self, course_id: u64) -> CanvasResult<Vec<CustomColumn>> {
        self.get_paginated(&format!(
            "/api/v1/courses/{}/custom_gradebook_columns",
            course_id
        ))
        .await
    }

    pub async fn list_column_entries(
        &self,
        course_id: u64,
        column_id: u64,
    ) -> CanvasResult<Vec<ColumnDatum>> {
        self.get_paginated(&format!(
            "/api/v1/courses/{}/custom_gradebook_columns/{}/data",
            course_id, column_id
        ))
        .await
    }

    pub async fn put_column_entry(
        &self,
        course_id: u64,
        column_id: u64,
        user_id: u64,
        content: &str,
    ) -> CanvasResult<ColumnDatum> {
        let path = format!(
            "/api/v1/courses/{}/custom_gradebook_columns/{}/data/{}",
            course_id, column_id, user_id
        );
        self.request(Method::PUT, &path, Some(&ColumnDatumUpdate::new(content)))
            .await
    }

    // Sections and enrollments

    pub async fn list_sections(&self, course_id: u64) -> CanvasResult<Vec<Section>> {
        self.get_paginated(&format!("/api/v1/courses/{}/sections", course_id)).await
    }

    pub async fn create_section(&self, course_id: u64, name: &str) -> CanvasResult<Section> {
        let path = format!("/api/v1/courses/{}/sections", course_id);
        self.request(Method::POST, &path, Some(&CreateSectionRequest::named(name))).await
    }

    pub async fn list_enrollments(&self, course_id: u64) -> CanvasResult<Vec<Enrollment>> {
        self.get_paginated(&format!("/api/v1/courses/{}/enrollments", course_id)).await
    }

    pub async fn enroll_user(
        &self,
        course_id: u64,
        request: &CreateEnrollmentRequest,
    ) -> CanvasResult<Enrollment> {
        let path = format!("/api/v1/courses/{}/enrollments", course_id);
        self.request(Method::POST, &path, Some(request)).await
    }

    // Assignments, submissions, peer reviews

    pub async fn list_assignments(&self, course_id: u64) -> CanvasResult<Vec<Assignment>> {
        self.get_paginated(&format!("/api/v1/courses/{}/assignments", course_id)).await
    }

    pub async fn get_submission(
        &self,
        course_id: u64,
        assignment_id: u64,
        user_id: u64,
    ) -> CanvasResult<Submission> {
        let path = format!(
            "/api/v1/courses/{}/assignments/{}/submissions/{}",
            course_id, assignment_id, user_id
        );
        self.request(Method::GET, &path, None::<&()>).await
    }

    pub async fn list_peer_reviews(
        &self,
        course_id: u64,
        assignment_id: u64,
    ) -> CanvasResult<Vec<PeerReview>> {
        self.get_paginated(&format!(
            "/api/v1/courses/{}/assignments/{}/peer_reviews",
            course_id, assignment_id
        ))
        .await
    }

    // Announcements and calendar events

    pub async fn create_announcement(
        &self,
        course_id: u64,
        request: &CreateAnnouncementRequest,
    ) -> CanvasResult<DiscussionTopic> {
        let path = format!("/api/v1/courses/{}/discussion_topics", course_id);
        self.request(Method::POST, &path, Some(request)).await
    }

    pub async fn create_calendar_event(
        &self,
        user_id: u64,
        request: &CreateCalendarEventRequest,
    ) -> CanvasResult<CalendarEvent> {
        let path = format!("/api/v1/calendar_events?as_user_id={}", user_id);
        self.request(Method::POST, &path, Some(request)).await
    }

    // Users and the program-of-study blob

    pub async fn get_user_profile(&self, user_id: u64) -> CanvasResult<UserProfile> {
        let path = format!("/api/v1/users/{}/profile", user_id);
        self.request(Method::GET, &path, None::<&()>).await
    }

    pub async fn get_user_profile_by_sis_id(&self, sis_id: &str) -> CanvasResult<UserProfile> {
        let path = format!("/api/v1/users/sis_user_id:{}/profile", sis_id);
        self.request(Method::GET, &path, None::<&()>).await
    }

    /// Read the namespaced program-of-study blob for a user. A 404 means the
    /// user has no stored program data, which is an expected outcome, not an
    /// error.
    pub async fn get_program_of_study(&self, sis_id: &str) -> CanvasResult<Option<ProgramOfStudy>> {
        let path = format!(
            "/api/v1/users/sis_user_id:{}/custom_data/program_of_study?ns={}",
            sis_id, PROGRAM_OF_STUDY_NS
        );
        let result: CanvasResult<CustomDataEnvelope<ProgramOfStudy>> =
            self.request(Method::GET, &path, None::<&()>).await;
        match result {
            Ok(envelope) => Ok(Some(envelope.data)),
            Err(CanvasClientError::ServerError { status, .. })
                if status == reqwest::StatusCode::NOT_FOUND =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn put_program_of_study(
        &self,
        sis_id: &str,
        data: &ProgramOfStudy,
    ) -> CanvasResult<()> {
        let path = format!("/api/v1/users/sis_user_id:{}/custom_data/program_of_study", sis_id);
        let payload = CustomDataUpdate::program_of_study(data);
        let _: CustomDataEnvelope<serde_json::Value> =
            self.request(Method::PUT, &path, Some(&payload)).await?;
        Ok(())
    }

    // Private helper methods

    /// GET a collection endpoint, following `Link: rel="next"` until the
    /// collection is drained. Always returns the accumulated `Vec`, for
    /// single-page responses too.
    async fn get_paginated<T: DeserializeOwned>(&self, path: &str) -> CanvasResult<Vec<T>> {
        let url = self.base_url.join(path)?;
        let first = self.get_page(url).await?;
        drain_pages(first, |next| self.get_page(next)).await
    }

    async fn get_page<T: DeserializeOwned>(&self, url: Url) -> CanvasResult<Page<T>> {
        debug!(%url, "canvas GET");
        let auth_headers =
            self.auth.headers().map_err(|e| CanvasClientError::Auth(e.to_string()))?;
        let response = self.http_client.get(url).headers(auth_headers).send().await?;

        let links = response
            .headers()
            .get(reqwest::header::LINK)
            .and_then(|v| v.to_str().ok())
            .map(PageLinks::parse)
            .unwrap_or_default();

        let items: Vec<T> = self.handle_response(response).await?;
        Ok(Page { items, links })
    }

    async fn request<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> CanvasResult<T> {
        let url = self.base_url.join(path)?;
        debug!(%url, %method, "canvas request");

        let mut request = self.http_client.request(method, url);

        let auth_headers =
            self.auth.headers().map_err(|e| CanvasClientError::Auth(e.to_string()))?;
        request = request.headers(auth_headers);

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> CanvasResult<T> {
        let status = response.status();

        if status.is_success() {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(CanvasClientError::from)
        } else {
            let text = response.text().await?;
            let body = serde_json::from_str::<CanvasErrorBody>(&text).unwrap_or_else(|_| {
                CanvasErrorBody {
                    message: Some(text),
                    errors: None,
                }
            });
            Err(CanvasClientError::ServerError { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_base_url_from_host() {
        let client =
            CanvasClient::from_host("canvas.example.com", AuthConfig::bearer("t")).unwrap();
        assert_eq!(client.base_url().as_str(), "https://canvas.example.com/");
    }

    #[test]
    fn paths_join_against_the_base() {
        let client =
            CanvasClient::from_host("canvas.example.com", AuthConfig::bearer("t")).unwrap();
        let url = client.base_url().join("/api/v1/courses/5/sections").unwrap();
        assert_eq!(url.as_str(), "https://canvas.example.com/api/v1/courses/5/sections");
    }
}
