use crate::errors::ClientError;
use crate::models::{
    EntryId, ExercisePlanEntry, FilterCriteria, MutationResponse, NewExercise, RemoveRequest,
    SessionSummaryRow, SummaryMethod, WeeklySummaryRow,
};
use reqwest::{Client, Response, Url, header};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// A file returned by the export endpoint.
#[derive(Debug)]
pub struct Download {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Thin typed wrapper over the workout server's JSON routes.
#[derive(Debug, Clone)]
pub struct WorkoutApi {
    http: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl WorkoutApi {
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::validation(format!("invalid endpoint {path}: {err}")))
    }

    pub async fn add_exercise(&self, payload: &NewExercise) -> Result<MutationResponse, ClientError> {
        let url = self.endpoint("/add_exercise")?;
        let response = self.send(self.http.post(url).json(payload), "/add_exercise").await?;
        decode(response).await
    }

    pub async fn remove_exercise(&self, id: &EntryId) -> Result<MutationResponse, ClientError> {
        let url = self.endpoint("/remove_exercise")?;
        let request = self.http.post(url).json(&RemoveRequest { id });
        let response = self.send(request, "/remove_exercise").await?;
        decode(response).await
    }

    pub async fn filter_exercises(&self, criteria: &FilterCriteria) -> Result<Vec<String>, ClientError> {
        let url = self.endpoint("/filter_exercises")?;
        let response = self
            .send(self.http.post(url).json(criteria), "/filter_exercises")
            .await?;
        decode(response).await
    }

    pub async fn workout_plan(&self) -> Result<Vec<ExercisePlanEntry>, ClientError> {
        let url = self.endpoint("/get_workout_plan")?;
        let response = self.send(self.http.get(url), "/get_workout_plan").await?;
        decode(response).await
    }

    pub async fn weekly_summary(&self, method: SummaryMethod) -> Result<Vec<WeeklySummaryRow>, ClientError> {
        let url = self.endpoint("/weekly_summary")?;
        let request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(&[("method", method.as_str())]);
        let response = self.send(request, "/weekly_summary").await?;
        decode(response).await
    }

    pub async fn session_summary(
        &self,
        routine: Option<&str>,
        method: SummaryMethod,
    ) -> Result<Vec<SessionSummaryRow>, ClientError> {
        let url = self.endpoint("/session_summary")?;
        let request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .query(&[("routine", routine.unwrap_or_default()), ("method", method.as_str())]);
        let response = self.send(request, "/session_summary").await?;
        decode(response).await
    }

    pub async fn export_to_excel(&self) -> Result<Download, ClientError> {
        let url = self.endpoint("/export_to_excel")?;
        let response = self.send(self.http.get(url), "/export_to_excel").await?;
        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename);
        let bytes = response.bytes().await.map_err(ClientError::transport)?;
        Ok(Download {
            filename,
            bytes: bytes.to_vec(),
        })
    }

    /// Sends the request and turns transport errors and non-2xx statuses
    /// into `ClientError`s.
    async fn send(&self, request: reqwest::RequestBuilder, route: &str) -> Result<Response, ClientError> {
        debug!("sending request to {route}");
        let response = request.send().await.map_err(|err| {
            debug!("request to {route} failed: {err}");
            ClientError::transport(err)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);
        debug!("{route} returned {status}");
        Err(ClientError::server(status, message))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(ClientError::transport)?;
    serde_json::from_slice(&bytes).map_err(|err| {
        debug!("failed to parse response body: {err}");
        ClientError::decode(err)
    })
}

fn attachment_filename(disposition: &str) -> Option<String> {
    disposition
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty() && !name.contains(['/', '\\']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_filename_reads_quoted_and_bare_names() {
        assert_eq!(
            attachment_filename("attachment; filename=\"plan.xlsx\""),
            Some("plan.xlsx".to_string())
        );
        assert_eq!(
            attachment_filename("attachment; filename=plan.xlsx"),
            Some("plan.xlsx".to_string())
        );
        assert_eq!(attachment_filename("attachment"), None);
        assert_eq!(attachment_filename("attachment; filename=\"../etc/passwd\""), None);
    }
}
