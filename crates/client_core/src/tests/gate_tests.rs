use super::*;

fn limits(lower_ms: u64, upper_ms: u64) -> GateLimits {
    GateLimits {
        lower: Duration::from_millis(lower_ms),
        upper: Duration::from_millis(upper_ms),
    }
}

#[tokio::test(start_paused = true)]
async fn busy_window_stays_up_for_the_lower_bound() {
    let gate = MutationGate::new(limits(350, 1000));
    let started = Instant::now();

    gate.block();
    assert!(gate.busy());

    // The mutation finished instantly; the indicator still waits out the
    // anti-flicker window.
    gate.unblock().await;
    assert!(started.elapsed() >= Duration::from_millis(350));
    assert!(!gate.busy());
}

#[tokio::test(start_paused = true)]
async fn nested_windows_clear_only_at_depth_zero() {
    let gate = MutationGate::new(limits(0, 1000));

    gate.block();
    gate.block();
    gate.unblock().await;
    assert!(gate.busy());

    gate.unblock().await;
    assert!(!gate.busy());
}

#[tokio::test(start_paused = true)]
async fn still_working_signal_fires_at_the_upper_bound() {
    let gate = MutationGate::new(limits(0, 1000));
    let mut state = gate.subscribe();

    gate.block();
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(*state.borrow_and_update(), BusyState::StillWorking);

    // The signal never cancels anything; the window still closes normally.
    gate.unblock().await;
    assert_eq!(*state.borrow_and_update(), BusyState::Idle);
}

#[tokio::test(start_paused = true)]
async fn stale_watchdog_does_not_fire_into_a_later_window() {
    let gate = MutationGate::new(limits(0, 1000));

    gate.block();
    gate.unblock().await;
    sleep(Duration::from_millis(600)).await;

    // Second window opens; the first window's watchdog fires mid-flight and
    // must not mark it as still working.
    gate.block();
    sleep(Duration::from_millis(500)).await;
    assert_eq!(*gate.subscribe().borrow(), BusyState::Busy);

    gate.unblock().await;
    assert!(!gate.busy());
}

#[tokio::test(start_paused = true)]
async fn unblock_without_a_block_is_ignored() {
    let gate = MutationGate::new(GateLimits::default());
    gate.unblock().await;
    assert!(!gate.busy());
}
