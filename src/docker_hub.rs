use crate::config::{Config, Credentials};
use crate::error::HubError;
use crate::image_reference::ImageRef;
use crate::tags::Tag;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info};

static PAGE_SIZE: &str = "100";

/// Repository metadata returned by `GET /repositories/{namespace}/{name}/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pull_count: u64,
    #[serde(default)]
    pub star_count: u64,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    next: Option<String>,
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct RepositoryName {
    name: String,
}

/// Client for the Docker Hub REST API.
#[derive(Debug, Clone)]
pub struct DockerHub {
    client: Client,
    api_url: String,
    credentials: Option<Credentials>,
}

pub fn create_client() -> Result<Client, HubError> {
    info!("Initializing Docker Hub HTTP client");
    // System certificates are loaded automatically with rustls-tls-native-roots
    Ok(Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

impl DockerHub {
    pub fn new(config: &Config) -> Result<Self, HubError> {
        Ok(Self::with_client(create_client()?, config))
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        DockerHub {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
        }
    }

    fn repository_url(&self, image: &ImageRef) -> String {
        format!("{}/repositories/{}/", self.api_url, image.repository())
    }

    /// Attaches Basic Auth when credentials are configured, anonymous otherwise.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.user, Some(credentials.pass.expose_secret()))
            }
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, HubError> {
        let response = self
            .authorize(request)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        debug!("Docker Hub responded with status {}", response.status());
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, HubError> {
        info!("Fetching {}", url);
        let response = self.send(self.client.get(url)).await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Follows `next` links until the listing is exhausted.
    async fn get_all_pages<T: DeserializeOwned>(&self, first: String) -> Result<Vec<T>, HubError> {
        let mut results = Vec::new();
        let mut next = Some(first);
        while let Some(url) = next {
            let page: Page<T> = self.get_json(&url).await?;
            results.extend(page.results);
            next = page.next.filter(|url| !url.is_empty());
        }
        Ok(results)
    }

    pub async fn list_tags(&self, image: &ImageRef) -> Result<Vec<Tag>, HubError> {
        let url = format!("{}tags?page_size={}", self.repository_url(image), PAGE_SIZE);
        let tags: Vec<Tag> = self.get_all_pages(url).await?;
        info!("Found {} tags for {}", tags.len(), image.without_tag());
        Ok(tags)
    }

    pub async fn repository(&self, image: &ImageRef) -> Result<Repository, HubError> {
        self.get_json(&self.repository_url(image)).await
    }

    pub async fn list_repositories(&self, namespace: &str) -> Result<Vec<String>, HubError> {
        let url = format!(
            "{}/repositories/{}/?page_size={}",
            self.api_url, namespace, PAGE_SIZE
        );
        let repositories: Vec<RepositoryName> = self.get_all_pages(url).await?;
        Ok(repositories.into_iter().map(|r| r.name).collect())
    }

    /// Returns `Ok(true)` when Docker Hub knows the tag, `ImageTagNotFound`
    /// for any other status.
    pub async fn tag_exists(&self, image: &ImageRef) -> Result<bool, HubError> {
        let url = format!("{}tags/{}", self.repository_url(image), image.tag);
        info!("Checking tag {}", url);
        let response = self.send(self.client.get(url)).await?;

        if response.status() == StatusCode::OK {
            Ok(true)
        } else {
            Err(HubError::ImageTagNotFound(image.to_string()))
        }
    }

    /// Sets the repository's short description. Requires credentials.
    pub async fn update_summary(
        &self,
        image: &ImageRef,
        summary: &str,
    ) -> Result<StatusCode, HubError> {
        if self.credentials.is_none() {
            return Err(HubError::MissingCredentials);
        }

        let url = self.repository_url(image);
        let body = json!({ "description": summary });
        debug!("Patching {} with {}", url, body);

        let response = self.send(self.client.patch(url).json(&body)).await?;
        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(HubError::UnexpectedStatus(status));
        }

        info!("Updated summary of {}", image.without_tag());
        Ok(status)
    }
}
