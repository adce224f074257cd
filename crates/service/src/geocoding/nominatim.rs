use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{GeocodeError, Geocoder, Place};
use crate::proximity::GeoPoint;

/// OpenStreetMap Nominatim client with an in-process result cache.
///
/// Misses are cached too, so repeated lookups of an unknown address do not
/// hit the public endpoint again.
#[derive(Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    cache: Cache<String, Option<Place>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ReverseHit {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration, cache_capacity: u64, cache_ttl: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| GeocodeError::Http(e.to_string()))?;
        let cache = Cache::builder().max_capacity(cache_capacity).time_to_live(cache_ttl).build();
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string(), cache })
    }

    pub fn from_config(cfg: &configs::GeocoderConfig) -> Result<Self, GeocodeError> {
        Self::new(
            &cfg.base_url,
            &cfg.user_agent,
            Duration::from_secs(cfg.timeout_secs),
            cfg.cache_capacity,
            Duration::from_secs(cfg.cache_ttl_secs),
        )
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str, query: &[(&str, String)]) -> Result<T, GeocodeError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| GeocodeError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            warn!(status = resp.status().as_u16(), %url, "geocoder upstream error");
            return Err(GeocodeError::Status(resp.status().as_u16()));
        }
        resp.json::<T>().await.map_err(|e| GeocodeError::Decode(e.to_string()))
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, GeocodeError> {
    raw.parse::<f64>().map_err(|_| GeocodeError::Decode(format!("bad coordinate {raw:?}")))
}

fn search_key(address: &str) -> String {
    format!("fwd:{}", address.trim().to_lowercase())
}

fn reverse_key(point: GeoPoint) -> String {
    format!("rev:{:.6},{:.6}", point.latitude, point.longitude)
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Place>, GeocodeError> {
        let key = search_key(address);
        if let Some(hit) = self.cache.get(&key).await {
            debug!(%key, "geocode cache hit");
            return Ok(hit);
        }
        let hits: Vec<SearchHit> = self
            .get_json("search", &[("q", address.trim().to_string()), ("format", "jsonv2".into()), ("limit", "1".into())])
            .await?;
        let place = match hits.into_iter().next() {
            Some(h) => Some(Place {
                point: GeoPoint::try_new(parse_coordinate(&h.lat)?, parse_coordinate(&h.lon)?)
                    .map_err(|e| GeocodeError::Decode(e.to_string()))?,
                display_name: h.display_name,
            }),
            None => None,
        };
        self.cache.insert(key, place.clone()).await;
        Ok(place)
    }

    async fn reverse(&self, point: GeoPoint) -> Result<Option<Place>, GeocodeError> {
        let key = reverse_key(point);
        // Nearby points share a key; the answer carries the caller's point.
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit.map(|p| Place { point, ..p }));
        }
        let hit: ReverseHit = self
            .get_json(
                "reverse",
                &[("lat", point.latitude.to_string()), ("lon", point.longitude.to_string()), ("format", "jsonv2".into())],
            )
            .await?;
        let place = match (hit.error, hit.display_name) {
            (None, Some(name)) => Some(Place { point, display_name: Some(name) }),
            _ => None,
        };
        self.cache.insert(key, place.clone()).await;
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Local stand-in for Nominatim. Answers by query text and counts requests.
    async fn upstream(hits: Arc<AtomicUsize>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let hits = hits.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match sock.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    hits.fetch_add(1, Ordering::SeqCst);
                    let head = String::from_utf8_lossy(&buf);
                    let target = head.split_whitespace().nth(1).unwrap_or_default().to_string();
                    let (status, body) = if target.contains("q=boom") {
                        ("500 Internal Server Error", "{}")
                    } else if target.contains("q=nowhere") {
                        ("200 OK", "[]")
                    } else if target.starts_with("/reverse") {
                        ("200 OK", r#"{"display_name":"Monas, Jakarta"}"#)
                    } else {
                        ("200 OK", r#"[{"lat":"-6.1751","lon":"106.8650","display_name":"Monas"}]"#)
                    };
                    let resp = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(resp.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    async fn geocoder() -> (NominatimGeocoder, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let base = upstream(hits.clone()).await;
        let g = NominatimGeocoder::new(&base, "test", Duration::from_secs(5), 100, Duration::from_secs(60)).unwrap();
        (g, hits)
    }

    #[test]
    fn cache_keys_normalize_input() {
        assert_eq!(search_key("  Jl. Sudirman "), search_key("jl. sudirman"));
        assert_eq!(reverse_key(GeoPoint::new(-6.17510001, 106.865)), "rev:-6.175100,106.865000");
    }

    #[test]
    fn search_hits_decode_string_coordinates() {
        let hits: Vec<SearchHit> = serde_json::from_str(r#"[{"lat":"-6.1751","lon":"106.8650","display_name":"Monas"}]"#).unwrap();
        assert_eq!(parse_coordinate(&hits[0].lat).unwrap(), -6.1751);
        assert!(parse_coordinate("north").is_err());
    }

    #[test]
    fn reverse_error_payload_decodes() {
        let hit: ReverseHit = serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(hit.display_name.is_none());
        assert!(hit.error.is_some());
    }

    #[tokio::test]
    async fn base_url_trailing_slash_is_trimmed() {
        let g = NominatimGeocoder::new("http://localhost:9/", "test", Duration::from_secs(1), 10, Duration::from_secs(60)).unwrap();
        assert_eq!(g.base_url, "http://localhost:9");
    }

    #[tokio::test]
    async fn repeated_geocode_hits_upstream_once() {
        let (g, hits) = geocoder().await;
        let first = g.geocode("Monas").await.unwrap().unwrap();
        let second = g.geocode("  monas ").await.unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.point, GeoPoint::new(-6.1751, 106.8650));
        assert_eq!(first.display_name.as_deref(), Some("Monas"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upstream_error_status_is_reported_and_not_cached() {
        let (g, hits) = geocoder().await;
        assert!(matches!(g.geocode("boom").await, Err(GeocodeError::Status(500))));
        assert!(matches!(g.geocode("boom").await, Err(GeocodeError::Status(500))));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_result_is_cached_as_none() {
        let (g, hits) = geocoder().await;
        assert_eq!(g.geocode("nowhere").await.unwrap(), None);
        assert_eq!(g.geocode("nowhere").await.unwrap(), None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reverse_cache_hit_returns_the_requested_point() {
        let (g, hits) = geocoder().await;
        let a = GeoPoint::new(-6.1751, 106.865);
        let b = GeoPoint::new(-6.17510001, 106.86500002);
        assert_eq!(reverse_key(a), reverse_key(b));

        let first = g.reverse(a).await.unwrap().unwrap();
        let second = g.reverse(b).await.unwrap().unwrap();
        assert_eq!(first.point, a);
        assert_eq!(second.point, b);
        assert_eq!(second.display_name.as_deref(), Some("Monas, Jakarta"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
