//! # Concurrent Submissions
//!
//! Many submissions share one service and one commit event hub. Each must
//! see only its own commit event.

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use std::collections::HashSet;
    use std::time::Duration;
    use tokio::time::Instant;

    use lg_01_submission::{
        CommitBehavior, ConfigError, GatewayConfig, SubmissionError, TransactionSubmissionApi,
    };
    use shared_types::{PeerEndpoint, ValidationCode};

    use crate::harness::{init_employee, TestGateway};

    #[tokio::test(start_paused = true)]
    async fn test_events_reach_only_their_own_submission() {
        let gw = TestGateway::with_peers(&["peer0", "peer1"]);
        gw.ledger
            .set_commit_for("e1", CommitBehavior::valid_after(Duration::from_millis(300)));
        gw.ledger.set_commit_for(
            "e2",
            CommitBehavior::Emit {
                code: ValidationCode::MvccReadConflict,
                after: Duration::from_millis(100),
            },
        );
        gw.ledger.set_commit_for("e3", CommitBehavior::Withhold);

        let (first, second, third) = tokio::join!(
            gw.service.submit(init_employee("e1")),
            gw.service.submit(init_employee("e2")),
            gw.service.submit(init_employee("e3")),
        );

        assert!(first.unwrap().is_success());
        assert!(matches!(
            second,
            Err(SubmissionError::CommitInvalid {
                code: ValidationCode::MvccReadConflict,
                ..
            })
        ));
        assert!(matches!(third, Err(SubmissionError::CommitTimeout { .. })));
        assert_eq!(gw.hub.active_subscriptions(), 0);
        assert_eq!(gw.hub.stats().released(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifty_submissions_have_distinct_ids() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger
            .set_commit(CommitBehavior::valid_after(Duration::from_millis(250)));

        let outcomes = join_all(
            (0..50).map(|i| gw.service.submit(init_employee(&format!("e{i}")))),
        )
        .await;

        let ids: HashSet<_> = outcomes
            .into_iter()
            .map(|outcome| outcome.unwrap().tx_id().clone())
            .collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(gw.hub.stats().registered(), 50);
        assert_eq!(gw.hub.stats().duplicates(), 0);
        assert_eq!(gw.hub.active_subscriptions(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_permit_serializes_submissions() {
        let mut config = GatewayConfig::default();
        config.network.peers = vec![PeerEndpoint::new("peer0", "grpc://localhost:7051")];
        config.submission.max_in_flight = 1;

        let gw = TestGateway::from_config(&config).unwrap();
        gw.ledger
            .set_commit(CommitBehavior::valid_after(Duration::from_millis(500)));

        let started = Instant::now();
        let (first, second) = tokio::join!(
            gw.service.submit(init_employee("e1")),
            gw.service.submit(init_employee("e2")),
        );

        assert!(first.unwrap().is_success());
        assert!(second.unwrap().is_success());
        assert!(started.elapsed() >= Duration::from_millis(1_000));
        assert_eq!(gw.service.available_permits(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_permits_never_reach_a_running_gateway() {
        let mut config = GatewayConfig::default();
        config.submission.max_in_flight = 0;

        match TestGateway::from_config(&config) {
            Err(ConfigError::Invalid(reason)) => assert!(reason.contains("max_in_flight")),
            Err(other) => panic!("unexpected config error {other:?}"),
            Ok(_) => panic!("a gateway without admission permits was built"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_refuses_new_work_only() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger
            .set_commit(CommitBehavior::valid_after(Duration::from_millis(200)));

        let service = gw.service.clone();
        let in_flight = tokio::spawn(async move { service.submit(init_employee("e1")).await });
        tokio::time::sleep(Duration::from_millis(50)).await;

        gw.service.close();
        let refused = gw.service.submit(init_employee("e2")).await;

        assert_eq!(refused.unwrap_err(), SubmissionError::ShuttingDown);
        assert!(in_flight.await.unwrap().unwrap().is_success());
    }
}
