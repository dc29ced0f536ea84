//! # Ledger Gateway Submission Benchmarks
//!
//! | Stage | What is measured |
//! |-------|------------------|
//! | Endorsement policy | Unanimous evaluation over N peer replies |
//! | Commit hub | Subscribe, publish, receive for one transaction |
//! | Write path | Full submit against the simulated ledger |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lg_01_submission::{EndorsementPolicy, TransactionSubmissionApi};
use lg_tests::harness::{init_employee, TestGateway};
use shared_bus::{CommitEventHub, CommitEventPublisher};
use shared_types::{
    CommitEvent, EndorsementResponse, TransactionId, TransactionProposal, ValidationCode,
};
use std::time::Duration;

fn proposal() -> TransactionProposal {
    TransactionProposal {
        tx_id: TransactionId::from_hex("be9c"),
        channel: "mychannel".into(),
        chaincode_id: "test-app".into(),
        operation: init_employee("e1"),
        creator_msp: "Org1MSP".into(),
        nonce: vec![7; 24],
        timestamp_ms: 0,
    }
}

// ============================================================================
// Endorsement policy
// ============================================================================

fn bench_endorsement_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("lg-01-endorsement-policy");

    for peers in [1usize, 4, 16, 64] {
        let policy = EndorsementPolicy::unanimous(peers);
        let replies: Vec<_> = (0..peers)
            .map(|i| Ok(EndorsementResponse::success(format!("peer{i}"), None)))
            .collect();

        group.throughput(Throughput::Elements(peers as u64));
        group.bench_with_input(BenchmarkId::new("unanimous", peers), &replies, |b, replies| {
            b.iter(|| black_box(policy.evaluate(proposal(), replies.clone()).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// Commit hub
// ============================================================================

fn bench_commit_hub(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let hub = CommitEventHub::new();
    let mut serial = 0u64;

    c.bench_function("shared-bus-subscribe-publish-recv", |b| {
        b.iter(|| {
            serial += 1;
            let tx_id = TransactionId::from_hex(format!("{serial:064x}"));
            rt.block_on(async {
                let mut subscription = hub.subscribe(tx_id.clone()).expect("fresh id");
                hub.publish(CommitEvent::new(tx_id, ValidationCode::Valid))
                    .await;
                let event = subscription.recv().await.expect("delivered");
                subscription.close();
                black_box(event.code)
            })
        })
    });
}

// ============================================================================
// Write path
// ============================================================================

fn bench_full_submit(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("lg-01-write-path");
    group.measurement_time(Duration::from_secs(10));

    for peers in [1usize, 3] {
        let names: Vec<String> = (0..peers).map(|i| format!("peer{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let gw = TestGateway::with_peers(&refs);

        group.bench_with_input(BenchmarkId::new("submit", peers), &gw, |b, gw| {
            b.iter(|| {
                rt.block_on(async {
                    let outcome = gw.service.submit(init_employee("e1")).await;
                    black_box(outcome.is_ok())
                })
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_endorsement_policy,
    bench_commit_hub,
    bench_full_submit
);
criterion_main!(benches);
