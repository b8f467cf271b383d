//! HTTP client for the Academic Scheduler API.
//!
//! Every call forwards the caller's bearer token. Nothing is cached: each
//! timetable render or validation works from a freshly fetched snapshot.

use super::error::ApiError;
use crate::config::ConsoleConfig;
use crate::schedule::{
    preferences_for_instructor, Instructor, InstructorPreferences, Preference,
    PreferencesResponse, ScheduleResponse, TimeSlot, TimetableView,
};
use rand::Rng;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};
use url::Url;

const TIMESLOTS_PATH: &str = "timeslots";
const MY_TIMETABLE_PATH: &str = "schedule/myTimetable";
const INSTRUCTOR_TIMETABLE_PATH: &str = "schedule/instructor";
const INSTRUCTORS_PATH: &str = "instructors";
const ALL_PREFERENCES_PATH: &str = "instructors/preferences";
const MY_PREFERENCES_PATH: &str = "instructors/me/preferences";
const MY_REPORTS_PATH: &str = "instructors/me/reports";

/// Server-generated CSV reports available to instructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Courses,
    AvailabilityGaps,
    Workload,
}

impl ReportKind {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "courses" => Some(ReportKind::Courses),
            "availability-gaps" => Some(ReportKind::AvailabilityGaps),
            "workload" => Some(ReportKind::Workload),
            _ => None,
        }
    }

    pub fn as_segment(&self) -> &'static str {
        match self {
            ReportKind::Courses => "courses",
            ReportKind::AvailabilityGaps => "availability-gaps",
            ReportKind::Workload => "workload",
        }
    }

    /// Download name, e.g. `availability_gaps_report.csv`.
    pub fn filename(&self) -> String {
        format!("{}_report.csv", self.as_segment().replace('-', "_"))
    }
}

/// Client for the scheduler service.
pub struct SchedulerClient {
    client: Client,
    base_url: Url,
}

impl SchedulerClient {
    /// Creates a client from the console configuration.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Network {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, base_url })
    }

    /// Resolves an API path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn request(&self, method: Method, path: &str, token: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// Sends a request and maps non-success statuses to [`ApiError`].
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, ApiError> {
        let correlation_id = generate_correlation_id();
        let start = Instant::now();

        info!(
            correlation_id = %correlation_id,
            path = %path,
            "Calling scheduler API"
        );

        let response = request.send().await.map_err(|e| {
            error!(
                correlation_id = %correlation_id,
                path = %path,
                error = %e,
                "Scheduler API request failed"
            );
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(
            correlation_id = %correlation_id,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Scheduler API responded"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::from_status(status, path, body);
            error!(
                correlation_id = %correlation_id,
                path = %path,
                error = %err,
                "Scheduler API returned an error"
            );
            return Err(err);
        }

        Ok(response)
    }

    /// GETs `path` and decodes the JSON body. An empty body decodes as `null`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, path, token)?;
        let text = self.send(request, path).await?.text().await?;
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        Ok(serde_json::from_str(body)?)
    }

    /// `GET /timeslots`
    pub async fn fetch_time_slots(&self, token: &str) -> Result<Vec<TimeSlot>, ApiError> {
        self.get_json(TIMESLOTS_PATH, token).await
    }

    /// `GET /schedule/myTimetable` or `GET /schedule/instructor`
    pub async fn fetch_timetable(
        &self,
        token: &str,
        view: TimetableView,
    ) -> Result<ScheduleResponse, ApiError> {
        let path = match view {
            TimetableView::Student => MY_TIMETABLE_PATH,
            TimetableView::Instructor => INSTRUCTOR_TIMETABLE_PATH,
        };
        self.get_json(path, token).await
    }

    /// `GET /instructors/me/preferences`
    pub async fn fetch_my_preferences(&self, token: &str) -> Result<Vec<Preference>, ApiError> {
        let response: PreferencesResponse = self.get_json(MY_PREFERENCES_PATH, token).await?;
        Ok(response.into_vec())
    }

    /// `GET /instructors/{instructor_id}`
    pub async fn fetch_instructor(
        &self,
        token: &str,
        instructor_id: i64,
    ) -> Result<Instructor, ApiError> {
        let path = format!("{}/{}", INSTRUCTORS_PATH, instructor_id);
        self.get_json(&path, token).await
    }

    /// `GET /instructors/preferences`, one entry per instructor with preferences.
    pub async fn fetch_all_preferences(
        &self,
        token: &str,
    ) -> Result<Vec<InstructorPreferences>, ApiError> {
        let listing: Option<Vec<InstructorPreferences>> =
            self.get_json(ALL_PREFERENCES_PATH, token).await?;
        Ok(listing.unwrap_or_default())
    }

    /// Preferences of the given instructor. The listing is keyed by name,
    /// so the instructor record is fetched alongside it.
    pub async fn fetch_instructor_preferences(
        &self,
        token: &str,
        instructor_id: i64,
    ) -> Result<Vec<Preference>, ApiError> {
        let (instructor, listing) = tokio::join!(
            self.fetch_instructor(token, instructor_id),
            self.fetch_all_preferences(token)
        );
        let instructor = instructor?;
        debug!(
            instructor_id,
            name = %instructor.full_name(),
            "Selecting instructor preferences"
        );
        Ok(preferences_for_instructor(&listing?, &instructor.full_name()))
    }

    /// `POST /instructors/{instructor_id}/preferences/{timeslot_id}`
    pub async fn add_preference(
        &self,
        token: &str,
        instructor_id: i64,
        timeslot_id: i64,
    ) -> Result<(), ApiError> {
        let path = format!("instructors/{}/preferences/{}", instructor_id, timeslot_id);
        let request = self.request(Method::POST, &path, token)?;
        self.send(request, &path).await?;
        Ok(())
    }

    /// `DELETE /instructors/{instructor_id}/preferences/{preference_id}`
    pub async fn remove_preference(
        &self,
        token: &str,
        instructor_id: i64,
        preference_id: i64,
    ) -> Result<(), ApiError> {
        let path = format!("instructors/{}/preferences/{}", instructor_id, preference_id);
        let request = self.request(Method::DELETE, &path, token)?;
        self.send(request, &path).await?;
        Ok(())
    }

    /// `GET /instructors/me/reports/{kind}`, returned as raw CSV bytes.
    pub async fn download_report(&self, token: &str, kind: ReportKind) -> Result<Vec<u8>, ApiError> {
        let path = format!("{}/{}", MY_REPORTS_PATH, kind.as_segment());
        let request = self.request(Method::GET, &path, token)?;
        let bytes = self.send(request, &path).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SchedulerClient {
        SchedulerClient::new(&ConsoleConfig::default()).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_api_prefix() {
        let client = client();
        assert_eq!(
            client.endpoint(INSTRUCTOR_TIMETABLE_PATH).unwrap().as_str(),
            "http://localhost:8080/api/schedule/instructor"
        );
        assert_eq!(
            client.endpoint("instructors/4/preferences/9").unwrap().as_str(),
            "http://localhost:8080/api/instructors/4/preferences/9"
        );
    }

    #[test]
    fn test_report_kinds() {
        let kind = ReportKind::from_segment("availability-gaps").unwrap();
        assert_eq!(kind, ReportKind::AvailabilityGaps);
        assert_eq!(kind.filename(), "availability_gaps_report.csv");
        assert_eq!(ReportKind::Workload.filename(), "workload_report.csv");
        assert!(ReportKind::from_segment("grades").is_none());
    }

    #[test]
    fn test_correlation_ids_differ() {
        let a = generate_correlation_id();
        let b = generate_correlation_id();
        assert!(a.contains('-'));
        assert_ne!(a, b);
    }

    #[test]
    fn test_base_url_without_trailing_slash() {
        let config = ConsoleConfig {
            api_base_url: "http://scheduler.local/api".to_string(),
            ..Default::default()
        };
        let client = SchedulerClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(ALL_PREFERENCES_PATH).unwrap().as_str(),
            "http://scheduler.local/api/instructors/preferences"
        );
    }
}
