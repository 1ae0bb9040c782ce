//! Transport seam for the remote point collection.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method};

use shared::domain::PointId;
use shared::protocol::{WireDestination, WireOfferGroup, WirePoint};

/// Remote CRUD contract the points model depends on. Any call may fail with
/// an opaque transport/status error; callers treat every failure alike.
#[async_trait]
pub trait PointsGateway: Send + Sync {
    async fn points(&self) -> Result<Vec<WirePoint>>;
    async fn destinations(&self) -> Result<Vec<WireDestination>>;
    async fn offer_groups(&self) -> Result<Vec<WireOfferGroup>>;
    async fn create_point(&self, point: WirePoint) -> Result<WirePoint>;
    async fn update_point(&self, id: PointId, point: WirePoint) -> Result<WirePoint>;
    async fn delete_point(&self, id: PointId) -> Result<()>;
}

pub struct HttpPointsGateway {
    http: Client,
    base_url: String,
    authorization: String,
}

impl HttpPointsGateway {
    pub fn new(base_url: impl Into<String>, authorization: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: authorization.into(),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}/{path}", self.base_url))
            .header(AUTHORIZATION, &self.authorization)
    }
}

#[async_trait]
impl PointsGateway for HttpPointsGateway {
    async fn points(&self) -> Result<Vec<WirePoint>> {
        let response = self
            .request(Method::GET, "points")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn destinations(&self) -> Result<Vec<WireDestination>> {
        let response = self
            .request(Method::GET, "destinations")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn offer_groups(&self) -> Result<Vec<WireOfferGroup>> {
        let response = self
            .request(Method::GET, "offers")
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn create_point(&self, point: WirePoint) -> Result<WirePoint> {
        let response = self
            .request(Method::POST, "points")
            .json(&point)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn update_point(&self, id: PointId, point: WirePoint) -> Result<WirePoint> {
        let response = self
            .request(Method::PUT, &format!("points/{}", id.0))
            .json(&point)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn delete_point(&self, id: PointId) -> Result<()> {
        self.request(Method::DELETE, &format!("points/{}", id.0))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
