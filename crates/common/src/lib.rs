//! Shared building blocks for the marketplace crates: response types,
//! logging setup and the process-wide metrics registry.

pub mod types;
pub mod utils;
pub mod metrics;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn welcome_mentions_docs() {
        let w = types::Welcome::default();
        assert!(w.message.contains("/api-docs"));
    }
}
