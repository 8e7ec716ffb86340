use anyhow::bail;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tenggat_types::{
    CreateTask, Deleted, EditTask, ErrorBody, ReminderSettings, StatusFilter, Summary, Task, TaskSort,
    TestMessage,
};
use url::Url;
use uuid::Uuid;

#[derive(Debug)]
pub struct TenggatClient {
    endpoints: Vec<Url>,
    http_client: reqwest::Client,
}

impl TenggatClient {
    pub fn new(endpoints: Vec<Url>) -> anyhow::Result<Self> {
        Ok(Self {
            endpoints,
            http_client: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(3))
                .timeout(Duration::from_secs(3))
                .build()?,
        })
    }

    async fn execute<T, F>(&self, make_request: F) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
        F: Fn(Url) -> RequestBuilder,
    {
        for url in &self.endpoints {
            let request = make_request(url.clone()).build()?;

            let Ok(response) = self.http_client.execute(request).await else {
                continue;
            };

            let status = response.status();
            if !status.is_success() {
                let text = response.text().await?;
                match serde_json::from_str::<ErrorBody>(&text) {
                    Ok(body) => bail!("{} ({status})", body.error),
                    Err(_) => bail!("{text} ({status})"),
                }
            }

            return Ok(response.json().await?);
        }

        bail!("All API endpoints are dead");
    }

    fn request(&self, method: Method, mut url: Url, path: &str) -> RequestBuilder {
        url.set_path(path);
        self.http_client.request(method, url)
    }

    pub async fn create(&self, payload: CreateTask) -> anyhow::Result<Task> {
        self.execute(|url| self.request(Method::POST, url, "/api/tasks").json(&payload))
            .await
    }

    pub async fn list(
        &self,
        status: Option<StatusFilter>,
        sort: Option<TaskSort>,
    ) -> anyhow::Result<Vec<Task>> {
        self.execute(|mut url| {
            if let Some(status) = &status {
                url.query_pairs_mut()
                    .append_pair("status", &status.to_string());
            }

            if let Some(sort) = &sort {
                url.query_pairs_mut().append_pair("sort", &sort.to_string());
            }

            self.request(Method::GET, url, "/api/tasks")
        })
        .await
    }

    pub async fn find(&self, id: Uuid) -> anyhow::Result<Task> {
        let path = format!("/api/tasks/{id}");
        self.execute(|url| self.request(Method::GET, url, &path))
            .await
    }

    pub async fn edit(&self, id: Uuid, payload: EditTask) -> anyhow::Result<Task> {
        let path = format!("/api/tasks/{id}");
        self.execute(|url| self.request(Method::PUT, url, &path).json(&payload))
            .await
    }

    pub async fn toggle(&self, id: Uuid) -> anyhow::Result<Task> {
        let path = format!("/api/tasks/{id}/toggle");
        self.execute(|url| self.request(Method::POST, url, &path))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> anyhow::Result<Task> {
        let path = format!("/api/tasks/{id}");
        self.execute(|url| self.request(Method::DELETE, url, &path))
            .await
    }

    pub async fn delete_all(&self) -> anyhow::Result<Deleted> {
        self.execute(|url| self.request(Method::DELETE, url, "/api/tasks"))
            .await
    }

    pub async fn summary(&self) -> anyhow::Result<Summary> {
        self.execute(|url| self.request(Method::GET, url, "/api/summary"))
            .await
    }

    pub async fn settings(&self) -> anyhow::Result<ReminderSettings> {
        self.execute(|url| self.request(Method::GET, url, "/api/settings"))
            .await
    }

    pub async fn update_settings(
        &self,
        settings: ReminderSettings,
    ) -> anyhow::Result<ReminderSettings> {
        self.execute(|url| self.request(Method::PUT, url, "/api/settings").json(&settings))
            .await
    }

    pub async fn test_settings(&self) -> anyhow::Result<TestMessage> {
        self.execute(|url| self.request(Method::POST, url, "/api/settings/test"))
            .await
    }
}
