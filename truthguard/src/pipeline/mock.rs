use crate::models::{EvidenceSignal, SignalKind};
use crate::pipeline::traits::EvidenceProvider;
use async_trait::async_trait;
use std::marker::PhantomData;

/// Answers every request with the same payload.
pub struct StaticProvider<T> {
    kind: SignalKind,
    payload: T,
}

impl<T> StaticProvider<T> {
    pub fn new(kind: SignalKind, payload: T) -> Self {
        Self { kind, payload }
    }
}

#[async_trait]
impl<T> EvidenceProvider for StaticProvider<T>
where
    T: Clone + Send + Sync,
{
    type Payload = T;

    fn kind(&self) -> SignalKind {
        self.kind
    }

    async fn fetch(&self, _content: &str, _source_url: Option<&str>) -> EvidenceSignal<T> {
        EvidenceSignal::available(self.kind, self.payload.clone())
    }
}

/// Never answers; stands in for an unconfigured or failing provider.
pub struct UnavailableProvider<T> {
    kind: SignalKind,
    _payload: PhantomData<fn() -> T>,
}

impl<T> UnavailableProvider<T> {
    pub fn new(kind: SignalKind) -> Self {
        Self {
            kind,
            _payload: PhantomData,
        }
    }
}

#[async_trait]
impl<T> EvidenceProvider for UnavailableProvider<T>
where
    T: Send,
{
    type Payload = T;

    fn kind(&self) -> SignalKind {
        self.kind
    }

    async fn fetch(&self, _content: &str, _source_url: Option<&str>) -> EvidenceSignal<T> {
        EvidenceSignal::unavailable(self.kind)
    }
}
