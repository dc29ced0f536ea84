//! # Registry Flows
//!
//! The typed registry client over the real submission service.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use lg_01_submission::{CommitBehavior, OrdererBehavior, PeerBehavior, SubmissionError};
    use lg_02_registry::{DomainChange, RegistryError};
    use shared_types::OrderStatus;

    use crate::harness::{new_employee, TestGateway};

    #[tokio::test(start_paused = true)]
    async fn test_add_employee_commits() -> anyhow::Result<()> {
        let gw = TestGateway::with_peers(&["peer0", "peer1"]);
        gw.ledger
            .set_commit(CommitBehavior::valid_after(Duration::from_millis(500)));

        let outcome = gw.registry.add_employee(new_employee("e7")).await?;

        assert!(outcome.is_success());
        assert_eq!(gw.ledger.order_calls().len(), 1);
        assert_eq!(gw.ledger.endorse_calls(), 2);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_read_all_decodes_snapshot() -> anyhow::Result<()> {
        let gw = TestGateway::with_peers(&["peer0", "peer1"]);
        gw.ledger.set_peer("peer0", PeerBehavior::Unreachable);
        gw.ledger.set_query_result(
            "read_all_data",
            Vec::<String>::new(),
            br#"{
                "employee": [{
                    "docType": "employee",
                    "id": "e1",
                    "employeeName": "Asha",
                    "domain": {"id": "d1", "domainName": "Engineering"},
                    "company": {"id": "c1", "companyName": "Acme"}
                }],
                "domain": [{"docType": "domain", "id": "d1", "domainName": "Engineering", "enabled": true}],
                "company": null
            }"#
            .to_vec(),
        );

        let snapshot = gw.registry.read_all_data().await?;

        assert_eq!(snapshot.employee.len(), 1);
        assert_eq!(snapshot.employee[0].company.company_name, "Acme");
        assert!(snapshot.domain[0].enabled);
        assert!(snapshot.company.is_empty());
        assert!(gw.ledger.order_calls().is_empty());
        assert_eq!(gw.hub.stats().registered(), 0);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_employee_is_not_found() {
        let gw = TestGateway::with_peers(&["peer0"]);

        let result = gw.registry.employee_by_id("e404").await;

        assert!(matches!(result, Err(RegistryError::NotFound(id)) if id == "e404"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_disable_domain_surfaces_order_rejection() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_orderer(OrdererBehavior::Reject {
            status: OrderStatus::Forbidden,
            info: "policy".into(),
        });

        let result = gw.registry.disable_domain("d1", "Engineering").await;

        assert!(matches!(
            result,
            Err(RegistryError::Submission(SubmissionError::OrderRejected { .. }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_withheld_commit_leaves_change_unknown() {
        let gw = TestGateway::with_peers(&["peer0"]);
        gw.ledger.set_commit(CommitBehavior::Withhold);

        let err = gw
            .registry
            .change_employee_domain(DomainChange {
                id: "e1".into(),
                new_domain_id: "d2".into(),
                domain_name: "Research".into(),
            })
            .await
            .unwrap_err();

        assert!(err.is_final_state_unknown());
        assert_eq!(gw.hub.active_subscriptions(), 0);
    }
}
