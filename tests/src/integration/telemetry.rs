//! # Telemetry Tests
//!
//! Installs the global subscriber and registry once, then checks that engine
//! activity shows up in the Prometheus export.

#[cfg(test)]
mod tests {
    use tm_mint_engine::prelude::*;
    use tm_telemetry::{encode_metrics, init_telemetry, mint_metrics, TelemetryConfig, TelemetryError};

    #[tokio::test]
    async fn test_engine_activity_is_exported() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::for_instance("it")
        };
        let _guard = init_telemetry(&config).expect("first initialization succeeds");

        // The global registry and subscriber are set once per process
        assert!(matches!(
            init_telemetry(&config),
            Err(TelemetryError::MetricsInit(_))
        ));

        let metrics = mint_metrics().unwrap();
        let minted_before = metrics.units_minted.with_label_values(&["public"]).get();
        let rejected_before = metrics.rejections.with_label_values(&["lifecycle_violation"]).get();

        let service = create_test_service();
        let owner = service.sale_status().await.owner;
        let buyer = Address::repeat_byte(0xbe);

        assert_eq!(
            service.mint_public(buyer, 1, milli_ether(50)).await,
            Err(MintError::NotPublic)
        );
        service.go_public(owner).await.unwrap();
        service.mint_public(buyer, 2, milli_ether(120)).await.unwrap();

        assert_eq!(
            metrics.units_minted.with_label_values(&["public"]).get(),
            minted_before + 2
        );
        assert_eq!(
            metrics.rejections.with_label_values(&["lifecycle_violation"]).get(),
            rejected_before + 1
        );
        assert!(metrics.refunds_paid.get() >= 1);

        let exported = encode_metrics().unwrap();
        for name in [
            "tm_mint_units_minted_total",
            "tm_mint_rejections_total",
            "tm_settlement_refunds_total",
            "tm_tier_remaining",
            "tm_mint_request_duration_seconds",
        ] {
            assert!(exported.contains(name), "{name} missing from export");
        }
    }
}
