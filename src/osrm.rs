//! OSRM HTTP adapter for route queries.

use serde::Deserialize;
use tracing::debug;

use crate::error::RoutingError;
use crate::polyline::Polyline;
use crate::traits::{RouteQuery, RouteResult, RoutingProvider, TravelMode};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    /// Profile used for `TravelMode::Any`. Driving queries always use `driving`.
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE` and `OSRM_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("OSRM_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(profile) = std::env::var("OSRM_PROFILE") {
            config.profile = profile;
        }
        if let Some(timeout) = std::env::var("OSRM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = timeout;
        }
        config
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn profile_for(&self, mode: TravelMode) -> &str {
        match mode {
            TravelMode::Driving => "driving",
            TravelMode::Any => self.config.profile.as_str(),
        }
    }

    fn route_url(&self, query: &RouteQuery) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?alternatives={}&overview=full&geometries=polyline",
            self.config.base_url.trim_end_matches('/'),
            self.profile_for(query.mode),
            query.source.longitude,
            query.source.latitude,
            query.destination.longitude,
            query.destination.latitude,
            query.allow_alternates,
        )
    }
}

impl RoutingProvider for OsrmClient {
    fn route(&self, query: &RouteQuery) -> Result<Vec<RouteResult>, RoutingError> {
        let url = self.route_url(query);
        debug!(%url, "requesting OSRM route");

        // Error statuses still carry a JSON body with the OSRM code.
        let body = self.client.get(url).send()?.json::<OsrmRouteResponse>()?;
        body.into_routes()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: String,
    duration: f64,
}

impl OsrmRouteResponse {
    pub(crate) fn into_routes(self) -> Result<Vec<RouteResult>, RoutingError> {
        match self.code.as_str() {
            "Ok" => {}
            "NoRoute" | "NoSegment" => return Err(RoutingError::NoRouteFound),
            code => {
                return Err(RoutingError::ProviderUnavailable(
                    self.message.unwrap_or_else(|| code.to_string()),
                ));
            }
        }

        if self.routes.is_empty() {
            return Err(RoutingError::NoRouteFound);
        }

        self.routes
            .into_iter()
            .map(|route| {
                let path = Polyline::decode(&route.geometry).map_err(|err| {
                    RoutingError::ProviderUnavailable(format!("malformed geometry: {}", err))
                })?;
                Ok(RouteResult {
                    path,
                    travel_time_seconds: route.duration,
                })
            })
            .collect()
    }
}
