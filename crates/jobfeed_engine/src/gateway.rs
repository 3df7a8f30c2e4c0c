//! Typed wrapper over the backend job endpoints. Owns no state: every
//! operation is a single request/response with no retry and no caching.
//! Caching is strictly the saved-status cache's responsibility.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use jobfeed_core::{Category, EmploymentType, Job, JobId};

use crate::error::{ApiError, ErrorKind};

#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Bearer token for the authenticated session, attached to every request.
    pub session_token: Option<String>,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            session_token: None,
        }
    }
}

/// Outcome of the one-way apply action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub applied: bool,
    /// Where to send the user to complete the application, when the posting
    /// is handled off-site.
    pub external_url: Option<String>,
}

#[async_trait::async_trait]
pub trait JobGateway: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Job>, ApiError>;
    async fn list_recommended(&self) -> Result<Vec<Job>, ApiError>;
    async fn list_applied(&self) -> Result<Vec<Job>, ApiError>;
    async fn list_saved(&self) -> Result<Vec<Job>, ApiError>;
    async fn get_by_id(&self, id: &JobId) -> Result<Job, ApiError>;
    async fn search(&self, term: &str, category: Category) -> Result<Vec<Job>, ApiError>;
    async fn applied_status(&self, id: &JobId) -> Result<bool, ApiError>;
    async fn saved_status_batch(&self, ids: &[JobId]) -> Result<HashMap<JobId, bool>, ApiError>;
    async fn toggle_saved(&self, id: &JobId) -> Result<bool, ApiError>;
    async fn apply(&self, id: &JobId) -> Result<ApplyOutcome, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, settings: GatewaySettings) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|err| ApiError::new(ErrorKind::Network, err.to_string()))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &settings.session_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|err| ApiError::new(ErrorKind::Network, err.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| ApiError::new(ErrorKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base))
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(check_status(response)?).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base))
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(check_status(response)?).await
    }
}

#[async_trait::async_trait]
impl JobGateway for HttpGateway {
    async fn list_all(&self) -> Result<Vec<Job>, ApiError> {
        let jobs: Vec<JobDto> = self.get_json("/jobs", &[]).await?;
        Ok(jobs.into_iter().map(Job::from).collect())
    }

    async fn list_recommended(&self) -> Result<Vec<Job>, ApiError> {
        let jobs: Vec<JobDto> = self.get_json("/jobs/recommended", &[]).await?;
        Ok(jobs.into_iter().map(Job::from).collect())
    }

    async fn list_applied(&self) -> Result<Vec<Job>, ApiError> {
        let jobs: Vec<JobDto> = self.get_json("/jobs/applied", &[]).await?;
        Ok(jobs.into_iter().map(Job::from).collect())
    }

    async fn list_saved(&self) -> Result<Vec<Job>, ApiError> {
        let jobs: Vec<JobDto> = self.get_json("/jobs/saved", &[]).await?;
        Ok(jobs.into_iter().map(Job::from).collect())
    }

    async fn get_by_id(&self, id: &JobId) -> Result<Job, ApiError> {
        require_id(id)?;
        let job: JobDto = self.get_json(&format!("/jobs/{id}"), &[]).await?;
        Ok(job.into())
    }

    async fn search(&self, term: &str, category: Category) -> Result<Vec<Job>, ApiError> {
        // A blank term always yields an empty result set, locally.
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        let jobs: Vec<JobDto> = self
            .get_json("/jobs/search", &[("q", term), ("category", category.as_param())])
            .await?;
        Ok(jobs.into_iter().map(Job::from).collect())
    }

    async fn applied_status(&self, id: &JobId) -> Result<bool, ApiError> {
        require_id(id)?;
        let status: AppliedDto = self.get_json(&format!("/jobs/{id}/applied"), &[]).await?;
        Ok(status.applied)
    }

    async fn saved_status_batch(&self, ids: &[JobId]) -> Result<HashMap<JobId, bool>, ApiError> {
        for id in ids {
            require_id(id)?;
        }
        let joined = ids.join(",");
        self.get_json("/jobs/saved-status", &[("ids", joined.as_str())])
            .await
    }

    async fn toggle_saved(&self, id: &JobId) -> Result<bool, ApiError> {
        require_id(id)?;
        let status: SavedDto = self.post_json(&format!("/jobs/{id}/save")).await?;
        Ok(status.saved)
    }

    async fn apply(&self, id: &JobId) -> Result<ApplyOutcome, ApiError> {
        require_id(id)?;
        let outcome: ApplyDto = self.post_json(&format!("/jobs/{id}/apply")).await?;
        Ok(ApplyOutcome {
            applied: outcome.success,
            external_url: outcome.external_url,
        })
    }
}

fn require_id(id: &JobId) -> Result<(), ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::new(ErrorKind::NotFound, "empty job identifier"));
    }
    Ok(())
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.as_u16() == 401 {
        return Err(ApiError::new(ErrorKind::Auth, "session expired"));
    }
    if status.as_u16() == 404 {
        return Err(ApiError::new(ErrorKind::NotFound, "job no longer available"));
    }
    if !status.is_success() {
        return Err(ApiError::new(
            ErrorKind::Network,
            format!("http status {status}"),
        ));
    }
    Ok(response)
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|err| {
        ApiError::new(ErrorKind::Network, format!("malformed response body: {err}"))
    })
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ErrorKind::Network, format!("timeout: {err}"));
    }
    ApiError::new(ErrorKind::Network, err.to_string())
}

/// Wire shape of a job posting. Field names are a backend contract; the
/// client maps them into the core model and never writes job content back.
#[derive(Debug, Deserialize)]
struct JobDto {
    id: String,
    title: String,
    company: String,
    #[serde(default)]
    location: String,
    #[serde(default, alias = "type")]
    employment_type: String,
    #[serde(default, alias = "url")]
    apply_url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    logo_background: Option<String>,
}

impl From<JobDto> for Job {
    fn from(dto: JobDto) -> Self {
        // Unknown employment types must not fail list rendering.
        let employment_type = match dto.employment_type.to_ascii_lowercase().as_str() {
            "internship" | "intern" => EmploymentType::Internship,
            _ => EmploymentType::FullTime,
        };
        Job {
            id: dto.id,
            title: dto.title,
            company: dto.company,
            location: dto.location,
            employment_type,
            apply_url: dto.apply_url,
            summary: dto.description,
            requirements: dto.requirements,
            responsibilities: dto.responsibilities,
            logo_url: dto.logo,
            logo_background: dto.logo_background,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SavedDto {
    saved: bool,
}

#[derive(Debug, Deserialize)]
struct AppliedDto {
    applied: bool,
}

#[derive(Debug, Deserialize)]
struct ApplyDto {
    success: bool,
    #[serde(default)]
    external_url: Option<String>,
}
