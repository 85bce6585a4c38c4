use crate::{
    StatePoller, TokioSleeper, VmStatus,
    tests::support::{CountingSleeper, FakeHypervisor},
};

use std::{sync::Arc, time::Duration};

/// WHAT: Poll resolves exactly on the call that reports the target
/// WHY: A lifecycle action must wait for the effect, and no longer
#[tokio::test]
async fn given_stopped_on_third_query_when_waiting_for_stopped_then_resolves_after_third() {
    // Given: Status source reports "stopped" only on the third call
    let hypervisor = Arc::new(FakeHypervisor::default().with_statuses(vec![
        Some("VM web1 exist running"),
        Some("VM web1 exist stopping"),
        Some("VM web1 exist stopped"),
        Some("VM web1 exist stopped"),
    ]));
    let sleeper = Arc::new(CountingSleeper::default());
    let poller = StatePoller::new(hypervisor.clone(), sleeper.clone());

    // When: Waiting for stopped
    let attempts = poller.wait_for_status("web1", &VmStatus::Stopped).await;

    // Then: Exactly three queries were issued, with a pause between each
    assert_eq!(attempts, 3);
    assert_eq!(hypervisor.status_calls(), 3);
    assert_eq!(sleeper.sleeps(), vec![Duration::ZERO, Duration::ZERO]);
}

/// WHAT: Failed status queries are treated as not yet transitioned
/// WHY: The poll loop never fails; it keeps querying until matched
#[tokio::test]
async fn given_transient_query_failure_when_waiting_then_polling_continues() {
    // Given: First query fails, second reports running
    let hypervisor = Arc::new(
        FakeHypervisor::default().with_statuses(vec![None, Some("VM web1 exist running")]),
    );
    let poller = StatePoller::new(hypervisor.clone(), Arc::new(CountingSleeper::default()));

    // When: Waiting for running
    let attempts = poller.wait_for_status("web1", &VmStatus::Running).await;

    // Then: The failure did not end the loop
    assert_eq!(attempts, 2);
}

/// WHAT: Configured interval is passed to the sleeper
/// WHY: The pause between queries is injectable and testable without delays
#[tokio::test]
async fn given_interval_when_polling_then_sleeper_receives_interval() {
    // Given: A poller with a 250ms interval
    let hypervisor = Arc::new(
        FakeHypervisor::default().with_statuses(vec![Some(""), Some("running")]),
    );
    let sleeper = Arc::new(CountingSleeper::default());
    let poller = StatePoller::new(hypervisor, sleeper.clone())
        .with_interval(Duration::from_millis(250));

    // When: Waiting for running
    poller.wait_for_status("web1", &VmStatus::Running).await;

    // Then: One pause of the configured length happened
    assert_eq!(poller.interval(), Duration::from_millis(250));
    assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(250)]);
}

/// WHAT: Poll loop has no bound while the target is never observed
/// WHY: A VM stuck transitioning keeps the loop alive indefinitely
#[tokio::test]
async fn given_vm_never_transitions_when_waiting_then_still_polling_after_many_queries() {
    // Given: Status never contains the target marker
    let hypervisor = Arc::new(FakeHypervisor::default());
    let poller = StatePoller::new(hypervisor.clone(), Arc::new(TokioSleeper));

    // When: Waiting with a timeout well beyond many iterations
    let result = tokio::time::timeout(
        Duration::from_millis(50),
        poller.wait_for_status("web1", &VmStatus::Running),
    )
    .await;

    // Then: Still polling when the timeout fires
    assert!(result.is_err());
    assert!(hypervisor.status_calls() > 1);
}
