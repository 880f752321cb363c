//! Free-text place search.
//!
//! Only the request and the application of its result live here; matching
//! is the geocoder's business. Results are restricted to the service region
//! through Nominatim's `viewbox` + `bounded=1`.

use std::sync::Arc;

use foundation::{GeoRect, LatLon};
use session::{Alert, DEFAULT_ZOOM, SessionHandle, Viewport};
use tracing::{debug, info, warn};

use crate::protocol::GeocodeHit;
use crate::service::{BoxFuture, ServiceConfig, ServiceError, ServiceErrorKind};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

/// Resolves a query to a single position inside `region`.
pub trait Geocoder: Send + Sync {
    fn lookup(
        &self,
        query: String,
        region: GeoRect,
    ) -> BoxFuture<'_, Result<Option<LatLon>, ServiceError>>;
}

/// [`Geocoder`] backed by a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl NominatimGeocoder {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = config.build_client()?;
        Ok(Self { config, client })
    }

    pub fn public() -> Result<Self, ServiceError> {
        Self::new(ServiceConfig::default().with_base_url(DEFAULT_GEOCODER_URL))
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(
        &self,
        query: String,
        region: GeoRect,
    ) -> BoxFuture<'_, Result<Option<LatLon>, ServiceError>> {
        Box::pin(async move {
            let viewbox = region.viewbox();
            let resp = self
                .client
                .get(self.config.url("search"))
                .query(&[
                    ("q", query.as_str()),
                    ("format", "json"),
                    ("addressdetails", "1"),
                    ("bounded", "1"),
                    ("viewbox", viewbox.as_str()),
                ])
                .send()
                .await
                .map_err(|e| {
                    ServiceError::with_source(ServiceErrorKind::Transport, "geocoder request failed", e)
                })?;

            let status = resp.status();
            if !status.is_success() {
                return Err(ServiceError::status(status.as_u16(), "GET /search"));
            }
            let hits: Vec<GeocodeHit> = resp.json().await.map_err(|e| {
                ServiceError::with_source(
                    ServiceErrorKind::Decode,
                    "geocoder returned an unexpected body",
                    e,
                )
            })?;
            debug!(hits = hits.len(), "geocoder response");
            Ok(hits.first().and_then(GeocodeHit::position))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// Blank query; nothing was sent.
    EmptyQuery,
    Found(LatLon),
    NotFound,
}

/// Runs the session's search query and recentres the map on the hit.
pub struct GeocodeSearch {
    session: SessionHandle,
    geocoder: Arc<dyn Geocoder>,
}

impl GeocodeSearch {
    pub fn new(session: SessionHandle, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { session, geocoder }
    }

    pub async fn search(&self) -> Result<SearchOutcome, ServiceError> {
        let (query, region) = self
            .session
            .read(|s| (s.search_query().trim().to_string(), s.validator().region()));
        if query.is_empty() {
            return Ok(SearchOutcome::EmptyQuery);
        }

        info!(%query, "searching location");
        let hit = match self.geocoder.lookup(query, region).await {
            Ok(hit) => hit.filter(|p| region.contains(*p)),
            Err(err) => {
                warn!(error = %err, "location search failed");
                return Err(err);
            }
        };

        Ok(self.session.update(|s| match hit {
            Some(center) => {
                s.set_viewport(Viewport {
                    center,
                    zoom: DEFAULT_ZOOM,
                });
                s.clear_alert();
                SearchOutcome::Found(center)
            }
            None => {
                s.set_alert(Alert::LocationNotFound);
                SearchOutcome::NotFound
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{GeocodeSearch, SearchOutcome};
    use crate::testing::{FakeGeocoder, transport_error};
    use foundation::{GeoRect, LatLon};
    use pretty_assertions::assert_eq;
    use session::{Alert, SessionHandle, Viewport};

    #[tokio::test]
    async fn hit_recentres_map() {
        let session = SessionHandle::default();
        session.update(|s| s.set_search_query("  Kyiv "));
        let geocoder = Arc::new(FakeGeocoder::default());
        geocoder.push(Ok(Some(LatLon::new(50.45, 30.52))));
        let search = GeocodeSearch::new(session.clone(), geocoder.clone());

        assert_eq!(
            search.search().await.unwrap(),
            SearchOutcome::Found(LatLon::new(50.45, 30.52))
        );
        assert_eq!(
            geocoder.queries(),
            vec![("Kyiv".to_string(), GeoRect::SERVICE_REGION)]
        );
        assert_eq!(
            session.read(|s| s.viewport()),
            Viewport {
                center: LatLon::new(50.45, 30.52),
                zoom: 13
            }
        );
    }

    #[tokio::test]
    async fn miss_raises_alert_and_keeps_view() {
        let session = SessionHandle::default();
        session.update(|s| s.set_search_query("Atlantis"));
        let geocoder = Arc::new(FakeGeocoder::default());
        geocoder.push(Ok(None));
        let search = GeocodeSearch::new(session.clone(), geocoder);

        assert_eq!(search.search().await.unwrap(), SearchOutcome::NotFound);
        session.read(|s| {
            assert_eq!(s.viewport(), Viewport::default());
            assert_eq!(s.alert(), Some(&Alert::LocationNotFound));
            assert_eq!(
                s.alert_message().as_deref(),
                Some("Location not found in Ukraine.")
            );
        });
    }

    #[tokio::test]
    async fn hit_outside_region_counts_as_miss() {
        let session = SessionHandle::default();
        session.update(|s| s.set_search_query("Warsaw"));
        let geocoder = Arc::new(FakeGeocoder::default());
        geocoder.push(Ok(Some(LatLon::new(52.23, 21.01))));
        let search = GeocodeSearch::new(session.clone(), geocoder);

        assert_eq!(search.search().await.unwrap(), SearchOutcome::NotFound);
        session.read(|s| {
            assert_eq!(s.viewport(), Viewport::default());
            assert_eq!(s.alert(), Some(&Alert::LocationNotFound));
        });
    }

    #[tokio::test]
    async fn blank_query_is_not_sent() {
        let session = SessionHandle::default();
        session.update(|s| s.set_search_query("   "));
        let geocoder = Arc::new(FakeGeocoder::default());
        let search = GeocodeSearch::new(session, geocoder.clone());

        assert_eq!(search.search().await.unwrap(), SearchOutcome::EmptyQuery);
        assert!(geocoder.queries().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_leaves_state() {
        let session = SessionHandle::default();
        session.update(|s| s.set_search_query("Lviv"));
        let geocoder = Arc::new(FakeGeocoder::default());
        geocoder.push(Err(transport_error()));
        let search = GeocodeSearch::new(session.clone(), geocoder);

        assert!(search.search().await.is_err());
        session.read(|s| {
            assert_eq!(s.viewport(), Viewport::default());
            assert_eq!(s.alert(), None);
        });
    }
}
