use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("proofchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("proofchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("proofchat.client.request_duration_seconds");

pub(crate) static PROJECT_LIST_LOADS: Counter = Counter::new("proofchat.selector.loads");
pub(crate) static PROJECT_LIST_FAILURES: Counter = Counter::new("proofchat.selector.failures");

pub(crate) static SESSION_SENDS: Counter = Counter::new("proofchat.session.sends");
pub(crate) static SESSION_REJECTED_SENDS: Counter =
    Counter::new("proofchat.session.rejected_sends");
pub(crate) static SESSION_FAILED_REPLIES: Counter =
    Counter::new("proofchat.session.failed_replies");
pub(crate) static SESSION_STALE_REPLIES: Counter =
    Counter::new("proofchat.session.stale_replies");
pub(crate) static SESSION_RESETS: Counter = Counter::new("proofchat.session.resets");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&PROJECT_LIST_LOADS);
    collector.register_counter(&PROJECT_LIST_FAILURES);

    collector.register_counter(&SESSION_SENDS);
    collector.register_counter(&SESSION_REJECTED_SENDS);
    collector.register_counter(&SESSION_FAILED_REPLIES);
    collector.register_counter(&SESSION_STALE_REPLIES);
    collector.register_counter(&SESSION_RESETS);
}
