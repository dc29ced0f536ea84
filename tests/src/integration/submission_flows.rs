//! # Write Path Flows
//!
//! Endorsement, ordering and commit confirmation end to end, including the
//! exit paths that must leave no subscription behind.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::Instant;

    use lg_01_submission::{
        CommitBehavior, GatewayConfig, OrdererBehavior, PeerBehavior, SubmissionError,
        TransactionSubmissionApi,
    };
    use ledger_telemetry::{encode_metrics, register_metrics};
    use shared_types::{OrderStatus, ValidationCode};

    use crate::harness::{init_employee, TestGateway};

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_init_employee_commits_at_500ms() -> anyhow::Result<()> {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger
            .set_commit(CommitBehavior::valid_after(Duration::from_millis(500)));

        let started = Instant::now();
        let outcome = gw.service.submit(init_employee("e1")).await?;

        assert!(outcome.is_success());
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(3_000));
        assert_eq!(gw.ledger.order_calls(), vec![outcome.tx_id().clone()]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_peer_response_never_orders() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_peer("peer0", PeerBehavior::Silent);

        let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

        assert!(matches!(err, SubmissionError::PeerUnreachable { .. }));
        assert!(gw.ledger.order_calls().is_empty());
        assert_eq!(gw.hub.stats().registered(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_commit_times_out_at_3000ms() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_commit(CommitBehavior::Withhold);

        let started = Instant::now();
        let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

        assert!(matches!(err, SubmissionError::CommitTimeout { .. }));
        assert!(err.is_final_state_unknown());
        assert!(started.elapsed() >= Duration::from_millis(3_000));
        assert_eq!(gw.hub.active_subscriptions(), 0);
        assert_eq!(gw.hub.stats().released(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_rejection_not_overridden_by_valid_commit() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_orderer(OrdererBehavior::Reject {
            status: OrderStatus::ServiceUnavailable,
            info: "backlog full".into(),
        });
        gw.ledger
            .set_commit(CommitBehavior::valid_after(Duration::from_millis(200)));

        let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

        match err {
            SubmissionError::OrderRejected { reason, .. } => {
                assert!(reason.contains("SERVICE_UNAVAILABLE"));
            }
            other => panic!("expected OrderRejected, got {other:?}"),
        }
        assert_eq!(gw.hub.stats().delivered(), 1);
    }

    // =========================================================================
    // ENDORSEMENT
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_any_refusing_peer_blocks_ordering() {
        let behaviors = [
            PeerBehavior::Refuse {
                status: 500,
                message: "Employee already exists".into(),
            },
            PeerBehavior::Unreachable,
            PeerBehavior::Silent,
        ];

        for behavior in behaviors {
            let gw = TestGateway::with_peers(&["peer0", "peer1", "peer2"]);
            gw.ledger.set_peer("peer2", behavior.clone());

            let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

            assert!(
                matches!(err, SubmissionError::EndorsementRejected { .. }),
                "{behavior:?} gave {err:?}"
            );
            assert!(gw.ledger.order_calls().is_empty());
            assert_eq!(gw.hub.stats().registered(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_configured_peer_is_asked() -> anyhow::Result<()> {
        let gw = TestGateway::with_peers(&["peer0", "peer1", "peer2"]);

        gw.service.submit(init_employee("e1")).await?;

        assert_eq!(gw.ledger.endorse_calls(), 3);
        Ok(())
    }

    // =========================================================================
    // SUBSCRIPTION LIFECYCLE
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_subscription_released_once_on_every_exit() {
        let exits = [
            CommitBehavior::valid_after(Duration::from_millis(10)),
            CommitBehavior::Emit {
                code: ValidationCode::EndorsementPolicyFailure,
                after: Duration::from_millis(10),
            },
            CommitBehavior::Withhold,
        ];

        for exit in exits {
            let gw = TestGateway::with_peers(&["peer0"]);
            gw.ledger.set_commit(exit);

            let _ = gw.service.submit(init_employee("e1")).await;

            assert_eq!(gw.hub.stats().registered(), 1, "{exit:?}");
            assert_eq!(gw.hub.stats().released(), 1, "{exit:?}");
            assert_eq!(gw.hub.active_subscriptions(), 0, "{exit:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_commit_is_known_failure() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_commit(CommitBehavior::Emit {
            code: ValidationCode::DuplicateTxid,
            after: Duration::from_millis(100),
        });

        let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

        assert_eq!(err.label(), "commit_invalid");
        assert!(!err.is_final_state_unknown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hub_shutdown_mid_wait_is_unknown_state() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_commit(CommitBehavior::Withhold);

        let hub = gw.hub.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            hub.shutdown();
        });

        let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

        assert!(matches!(err, SubmissionError::CommitStreamClosed { .. }));
        assert!(err.is_final_state_unknown());
    }

    // =========================================================================
    // TELEMETRY
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_outcomes_show_up_in_metrics() -> anyhow::Result<()> {
        register_metrics()?;
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_commit_for("e1", CommitBehavior::Withhold);

        gw.service.submit(init_employee("e2")).await?;
        let _ = gw.service.submit(init_employee("e1")).await;

        let text = encode_metrics()?;
        assert!(text.contains(r#"lg_submissions_total{outcome="committed"}"#));
        assert!(text.contains(r#"lg_submissions_total{outcome="commit_timeout"}"#));
        Ok(())
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_custom_commit_timeout_from_toml() -> anyhow::Result<()> {
        let config = GatewayConfig::from_toml_str(
            r#"
            [[network.peers]]
            name = "peer0.org1"
            url = "grpc://org1:7051"

            [[network.peers]]
            name = "peer0.org2"
            url = "grpc://org2:9051"

            [submission]
            commit_timeout_ms = 1000
            "#,
        )?;
        config.validate()?;

        let gw = TestGateway::from_config(&config)?;
        gw.ledger.set_commit(CommitBehavior::Withhold);

        let started = Instant::now();
        let err = gw.service.submit(init_employee("e1")).await.unwrap_err();

        assert!(matches!(err, SubmissionError::CommitTimeout { .. }));
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(1_000));
        assert!(elapsed < Duration::from_millis(3_000));
        assert_eq!(gw.ledger.endorse_calls(), 2);
        Ok(())
    }
}
