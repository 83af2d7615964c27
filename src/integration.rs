use crate::multiplier::{MultiplierEvent, MultiplierObserver};
use crate::types::MultiplierKind;

pub trait ExternalAnalyticsSink {
    fn record_multiplier_session(&mut self, session_type: &str, start_time: u32, end_time: u32, source: &str);
}

pub struct AnalyticsObserverAdapter<S> {
    sink: S,
}

impl<S> AnalyticsObserverAdapter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}

impl<S> MultiplierObserver for AnalyticsObserverAdapter<S>
where
    S: ExternalAnalyticsSink,
{
    fn on_event(&mut self, event: &MultiplierEvent) {
        if let MultiplierEvent::SessionExpired { session } = event {
            self.sink.record_multiplier_session(
                &session.kind.to_string(),
                session.start_time,
                session.end_time(),
                &session.source,
            );
        }
    }
}

pub struct ExpiryCallbackAdapter<F> {
    on_session_expired: F,
}

impl<F> ExpiryCallbackAdapter<F> {
    pub fn new(on_session_expired: F) -> Self {
        Self { on_session_expired }
    }
}

impl<F> MultiplierObserver for ExpiryCallbackAdapter<F>
where
    F: FnMut(MultiplierKind, u32, u32, &str),
{
    fn on_event(&mut self, event: &MultiplierEvent) {
        if let MultiplierEvent::SessionExpired { session } = event {
            (self.on_session_expired)(
                session.kind,
                session.start_time,
                session.end_time(),
                &session.source,
            );
        }
    }
}
