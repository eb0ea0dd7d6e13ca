use biometrics::{Collector, Counter};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("routerchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("routerchat.client.request_errors");
pub(crate) static CATALOG_FETCHES: Counter = Counter::new("routerchat.catalog.fetches");
pub(crate) static CATALOG_FALLBACKS: Counter = Counter::new("routerchat.catalog.fallbacks");

pub(crate) static STREAM_EVENTS: Counter = Counter::new("routerchat.stream.events");
pub(crate) static STREAM_ERRORS: Counter = Counter::new("routerchat.stream.errors");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CATALOG_FETCHES);
    collector.register_counter(&CATALOG_FALLBACKS);

    collector.register_counter(&STREAM_EVENTS);
    collector.register_counter(&STREAM_ERRORS);
}
