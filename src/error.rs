use thiserror::Error;

/// Failures a routing provider can report.
///
/// The coordinator treats both variants the same way: nothing is drawn and
/// the failure is logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Routing provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("No route found")]
    NoRouteFound,
}

impl From<reqwest::Error> for RoutingError {
    fn from(err: reqwest::Error) -> Self {
        RoutingError::ProviderUnavailable(err.to_string())
    }
}
