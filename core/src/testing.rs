//! Recording fakes for the collaborator traits.
//!
//! One shared [`World`] backs all fakes so tests can inspect the exact call
//! sequence across network and platform.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use tokio::sync::Notify;

use crate::engine::ReconciliationEngine;
use crate::error::{PushError, Result};
use crate::key::PublicKey;
use crate::platform::{EndpointRegistrar, KeyFetcher, PushPlatform, RegistrationRequest, Subscription};

/// Key material whose URL-safe encoding is `ABC123_-`.
pub(crate) fn abc_key_material() -> Vec<u8> {
    BASE64.decode("ABC123/+").expect("valid standard base64")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    FetchKey,
    CurrentSubscription,
    RegisterWorker(String),
    Subscribe(String),
    Unsubscribe(String),
    Register(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Existing {
    pub endpoint: String,
    pub key_material: Option<Vec<u8>>,
    pub unsubscribe_result: Result<bool>,
}

impl Existing {
    pub fn new(endpoint: &str, key_material: Option<Vec<u8>>) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            key_material,
            unsubscribe_result: Ok(true),
        }
    }
}

pub(crate) struct World {
    pub key: RefCell<Result<PublicKey>>,
    pub readiness: RefCell<Result<()>>,
    pub worker_result: RefCell<Result<()>>,
    pub subscribe_result: RefCell<Result<()>>,
    pub register_result: RefCell<Result<()>>,
    /// When set, the key fetch parks until notified.
    pub hold: RefCell<Option<Rc<Notify>>>,
    pub new_endpoint: String,
    existing: RefCell<Option<Existing>>,
    calls: RefCell<Vec<Call>>,
}

impl World {
    pub fn with_key(key: &str) -> Rc<Self> {
        Self::with_key_result(Ok(PublicKey::new(key)))
    }

    pub fn with_key_error(err: PushError) -> Rc<Self> {
        Self::with_key_result(Err(err))
    }

    fn with_key_result(key: Result<PublicKey>) -> Rc<Self> {
        Rc::new(Self {
            key: RefCell::new(key),
            readiness: RefCell::new(Ok(())),
            worker_result: RefCell::new(Ok(())),
            subscribe_result: RefCell::new(Ok(())),
            register_result: RefCell::new(Ok(())),
            hold: RefCell::new(None),
            new_endpoint: "https://push.example.com/new".to_string(),
            existing: RefCell::new(None),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn set_existing(&self, existing: Existing) {
        self.existing.replace(Some(existing));
    }

    /// Drop the subscription behind the engine's back, as another tab would.
    pub fn clear_existing(&self) {
        self.existing.replace(None);
    }

    pub fn existing(&self) -> Option<Existing> {
        self.existing.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn registrations(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Register(endpoint) => Some(endpoint.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

pub(crate) struct FakeFetcher(pub Rc<World>);
pub(crate) struct FakePlatform(pub Rc<World>);
pub(crate) struct FakeRegistrar(pub Rc<World>);

pub(crate) struct FakeSubscription {
    world: Rc<World>,
    endpoint: String,
    key_material: Option<Vec<u8>>,
}

pub(crate) type FakeEngine = ReconciliationEngine<FakeFetcher, FakePlatform, FakeRegistrar>;

pub(crate) fn engine(world: &Rc<World>) -> FakeEngine {
    ReconciliationEngine::new(
        FakeFetcher(Rc::clone(world)),
        FakePlatform(Rc::clone(world)),
        FakeRegistrar(Rc::clone(world)),
    )
}

#[async_trait(?Send)]
impl KeyFetcher for FakeFetcher {
    async fn fetch_key(&self) -> Result<PublicKey> {
        self.0.record(Call::FetchKey);
        let hold = self.0.hold.borrow().clone();
        if let Some(hold) = hold {
            hold.notified().await;
        }
        self.0.key.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PushPlatform for FakePlatform {
    type Subscription = FakeSubscription;

    async fn current_subscription(&self) -> Result<Option<FakeSubscription>> {
        self.0.record(Call::CurrentSubscription);
        self.0.readiness.borrow().clone()?;
        Ok(self.0.existing().map(|existing| FakeSubscription {
            world: Rc::clone(&self.0),
            endpoint: existing.endpoint,
            key_material: existing.key_material,
        }))
    }

    async fn register_worker(&self, script_url: &str) -> Result<()> {
        self.0.record(Call::RegisterWorker(script_url.to_string()));
        self.0.worker_result.borrow().clone()
    }

    async fn subscribe(&self, key: &PublicKey) -> Result<FakeSubscription> {
        self.0.record(Call::Subscribe(key.as_str().to_string()));
        self.0.subscribe_result.borrow().clone()?;
        let created = Existing::new(&self.0.new_endpoint, key.to_bytes().ok());
        self.0.set_existing(created.clone());
        Ok(FakeSubscription {
            world: Rc::clone(&self.0),
            endpoint: created.endpoint,
            key_material: created.key_material,
        })
    }
}

#[async_trait(?Send)]
impl Subscription for FakeSubscription {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
    }

    fn key_material(&self) -> Option<Vec<u8>> {
        self.key_material.clone()
    }

    async fn unsubscribe(&self) -> Result<bool> {
        self.world.record(Call::Unsubscribe(self.endpoint.clone()));
        let result = self
            .world
            .existing()
            .map_or(Ok(false), |existing| existing.unsubscribe_result);
        if result == Ok(true) {
            self.world.existing.replace(None);
        }
        result
    }
}

#[async_trait(?Send)]
impl EndpointRegistrar for FakeRegistrar {
    async fn register(&self, endpoint: &str) -> Result<()> {
        self.0.record(Call::Register(endpoint.to_string()));
        RegistrationRequest::new(endpoint)?;
        self.0.register_result.borrow().clone()
    }
}
