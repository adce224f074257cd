//! Process-wide Prometheus registry.
//!
//! Nearby-search handlers record how many candidates were scanned and how
//! many matched, labelled by the kind of entity being ranked.

use once_cell::sync::Lazy;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

const SIZE_BUCKETS: &[f64] = &[0.0, 1.0, 5.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0];

static NEARBY_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    let c = IntCounterVec::new(
        Opts::new("nearby_queries_total", "Nearby searches served"),
        &["kind"],
    )
    .expect("valid nearby_queries_total definition");
    let _ = REGISTRY.register(Box::new(c.clone()));
    c
});

static NEARBY_CANDIDATES: Lazy<HistogramVec> = Lazy::new(|| {
    let h = HistogramVec::new(
        HistogramOpts::new("nearby_candidates", "Candidates scanned per nearby search")
            .buckets(SIZE_BUCKETS.to_vec()),
        &["kind"],
    )
    .expect("valid nearby_candidates definition");
    let _ = REGISTRY.register(Box::new(h.clone()));
    h
});

static NEARBY_MATCHES: Lazy<HistogramVec> = Lazy::new(|| {
    let h = HistogramVec::new(
        HistogramOpts::new("nearby_matches", "Results returned per nearby search")
            .buckets(SIZE_BUCKETS.to_vec()),
        &["kind"],
    )
    .expect("valid nearby_matches definition");
    let _ = REGISTRY.register(Box::new(h.clone()));
    h
});

/// Record one nearby search of `kind` (`workers`, `services`, `locations`).
pub fn observe_nearby(kind: &str, candidates: usize, matches: usize) {
    NEARBY_QUERIES.with_label_values(&[kind]).inc();
    NEARBY_CANDIDATES.with_label_values(&[kind]).observe(candidates as f64);
    NEARBY_MATCHES.with_label_values(&[kind]).observe(matches as f64);
}

/// Encode every registered metric in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    Lazy::force(&NEARBY_QUERIES);
    Lazy::force(&NEARBY_CANDIDATES);
    Lazy::force(&NEARBY_MATCHES);

    let mut buf = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observed_queries_show_up_in_render() {
        observe_nearby("workers", 12, 3);
        let text = render().unwrap();
        assert!(text.contains("nearby_queries_total"));
        assert!(text.contains("kind=\"workers\""));
        assert!(text.contains("nearby_candidates"));
    }
}
