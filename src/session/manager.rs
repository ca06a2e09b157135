use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use libspa::param::ParamType;
use libspa::pod::Pod;
use libspa::utils::dict::DictRef;
use pipewire::{
    context::ContextRc,
    core::{CoreRc, PW_ID_CORE},
    main_loop::MainLoopRc,
    metadata::{Metadata, MetadataListener},
    node::{Node, NodeListener},
    registry::{GlobalObject, RegistryRc},
    types::ObjectType,
};

use super::props;
use super::startup::{self, PendingOp, StartupSequence};
use super::state::SessionStore;
use super::types::*;
use crate::error::MonitorError;
use crate::launcher::Launch;
use crate::monitor::Monitor;

/// Name of the metadata object carrying the default nodes.
const DEFAULT_METADATA_NAME: &str = "default";

struct BoundSink {
    proxy: Node,
    _listener: NodeListener,
}

struct BoundMetadata {
    id: ObjectId,
    _proxy: Metadata,
    _listener: MetadataListener,
}

/// Connection to the PipeWire daemon.
pub struct SessionLink {
    mainloop: MainLoopRc,
    _context: ContextRc,
    core: CoreRc,
    registry: RegistryRc,
}

impl SessionLink {
    pub fn connect() -> Result<Self, MonitorError> {
        pipewire::init();

        let mainloop = MainLoopRc::new(None)?;
        let context = ContextRc::new(&mainloop, None)?;
        let core = context.connect_rc(None)?;
        let registry = core.get_registry_rc()?;

        Ok(Self {
            mainloop,
            _context: context,
            core,
            registry,
        })
    }

    /// Run the startup sequence and then the event loop until a fatal error.
    pub fn run<L: Launch + 'static>(self, monitor: Monitor<L>) -> Result<(), MonitorError> {
        let session = Rc::new(Session {
            mainloop: self.mainloop.clone(),
            core: self.core.clone(),
            store: RefCell::new(SessionStore::new()),
            startup: RefCell::new(StartupSequence::new()),
            pending: RefCell::new(HashMap::new()),
            sinks: RefCell::new(HashMap::new()),
            metadata: RefCell::new(None),
            mixer_subscribed: Cell::new(false),
            monitor: RefCell::new(monitor),
            fatal: RefCell::new(None),
        });

        let core_listener = self
            .core
            .add_listener_local()
            .done({
                let session = session.clone();
                move |id, seq| {
                    if id == PW_ID_CORE {
                        session.on_done(seq.seq());
                    }
                }
            })
            .error({
                let session = session.clone();
                move |id, seq, res, message| session.on_error(id, seq, res, message)
            })
            .register();

        let registry_listener = self
            .registry
            .add_listener_local()
            .global({
                let session = session.clone();
                let registry = self.registry.clone();
                move |global| match global.type_ {
                    ObjectType::Node => session.add_sink(&registry, global),
                    ObjectType::Metadata => session.add_metadata(&registry, global),
                    _ => {}
                }
            })
            .global_remove({
                let session = session.clone();
                move |id| session.remove_global(id)
            })
            .register();

        let first = session.startup.borrow().first();
        session.request(first)?;

        log::info!("Waiting for PipeWire components");
        self.mainloop.run();

        // Proxies and their listeners hold the session; release them first.
        drop(registry_listener);
        drop(core_listener);
        session.sinks.borrow_mut().clear();
        session.metadata.borrow_mut().take();

        match session.fatal.borrow_mut().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// State shared by every PipeWire callback. Everything runs on the main
/// loop thread, so plain `RefCell`s are enough.
struct Session<L> {
    mainloop: MainLoopRc,
    core: CoreRc,
    store: RefCell<SessionStore>,
    startup: RefCell<StartupSequence>,
    /// Outstanding round-trips keyed by sync sequence number
    pending: RefCell<HashMap<i32, PendingOp>>,
    sinks: RefCell<HashMap<ObjectId, BoundSink>>,
    metadata: RefCell<Option<BoundMetadata>>,
    /// Set once mixer activation has subscribed the known sinks
    mixer_subscribed: Cell<bool>,
    monitor: RefCell<Monitor<L>>,
    fatal: RefCell<Option<MonitorError>>,
}

impl<L: Launch + 'static> Session<L> {
    fn request(&self, op: PendingOp) -> Result<(), MonitorError> {
        let seq = self
            .core
            .sync(0)
            .map_err(|e| op.failure(e.to_string()))?
            .seq();
        log::debug!("Requested {:?} (seq {})", op, seq);
        self.pending.borrow_mut().insert(seq, op);
        Ok(())
    }

    fn fail(&self, error: MonitorError) {
        let mut fatal = self.fatal.borrow_mut();
        if fatal.is_none() {
            *fatal = Some(error);
        }
        self.mainloop.quit();
    }

    fn on_done(&self, seq: i32) {
        let op = self.pending.borrow_mut().remove(&seq);
        if let Some(op) = op
            && let Err(e) = self.complete(op, Ok(()))
        {
            self.fail(e);
        }
    }

    fn on_error(&self, id: u32, seq: i32, res: i32, message: &str) {
        let op = self.pending.borrow_mut().remove(&seq);
        match op {
            Some(op) => {
                let reason = format!("{} ({})", message, res);
                if let Err(e) = self.complete(op, Err(reason)) {
                    self.fail(e);
                }
            }
            None if id == PW_ID_CORE => {
                self.fail(MonitorError::Disconnected(format!("{} ({})", message, res)));
            }
            None => log::warn!("PipeWire error on object {}: {} ({})", id, message, res),
        }
    }

    fn complete(&self, op: PendingOp, result: Result<(), String>) -> Result<(), MonitorError> {
        let next = {
            let mut store = self.store.borrow_mut();
            let mut monitor = self.monitor.borrow_mut();
            self.startup
                .borrow_mut()
                .complete(op, result, &mut store, &mut monitor)?
        };
        for op in next {
            self.issue(op)?;
        }
        Ok(())
    }

    fn issue(&self, op: PendingOp) -> Result<(), MonitorError> {
        if op == PendingOp::Activate(Component::Mixer) {
            for sink in self.sinks.borrow().values() {
                sink.proxy.subscribe_params(&[ParamType::Props]);
            }
            self.mixer_subscribed.set(true);
        }
        self.request(op)
    }

    fn dispatch(&self, event: SessionEvent) {
        if self.fatal.borrow().is_some() {
            return;
        }

        let result = {
            let store = self.store.borrow();
            startup::deliver(&store, &mut self.monitor.borrow_mut(), event)
        };

        if let Err(e) = result {
            self.fail(e);
        }
    }

    fn on_props(&self, id: ObjectId, pod: &Pod) {
        let Some(update) = props::parse_props(pod) else {
            return;
        };
        let changed = self.store.borrow_mut().update_volume(id, update);
        if changed {
            self.dispatch(SessionEvent::MixerChanged(id));
        }
    }

    fn on_metadata_property(&self, subject: u32, key: Option<&str>, value: Option<&str>) {
        if subject != PW_ID_CORE {
            return;
        }
        let changed = self.store.borrow_mut().set_default_metadata(key, value);
        if changed {
            self.dispatch(SessionEvent::DefaultChanged);
        }
    }
}

impl<L: Launch + 'static> Session<L> {
    fn add_sink(self: &Rc<Self>, registry: &RegistryRc, global: &GlobalObject<&DictRef>) {
        let Some(sink) = parse_sink(global) else {
            return;
        };

        let proxy = match registry.bind::<Node, _>(global) {
            Ok(proxy) => proxy,
            Err(e) => {
                log::warn!("Failed to bind sink {}: {}", global.id, e);
                return;
            }
        };

        let id = global.id;
        let listener = proxy
            .add_listener_local()
            .param({
                let session = self.clone();
                move |_seq, param_id, _index, _next, param| {
                    if param_id == ParamType::Props
                        && let Some(pod) = param
                    {
                        session.on_props(id, pod);
                    }
                }
            })
            .register();

        if self.mixer_subscribed.get() {
            proxy.subscribe_params(&[ParamType::Props]);
        }

        log::debug!("Sink added: id={} name={:?}", id, sink.name);
        self.store.borrow_mut().sinks.insert(sink);
        self.sinks.borrow_mut().insert(
            id,
            BoundSink {
                proxy,
                _listener: listener,
            },
        );
    }

    fn add_metadata(self: &Rc<Self>, registry: &RegistryRc, global: &GlobalObject<&DictRef>) {
        let name = global.props.as_ref().and_then(|p| p.get("metadata.name"));
        if name != Some(DEFAULT_METADATA_NAME) || self.metadata.borrow().is_some() {
            return;
        }

        let proxy = match registry.bind::<Metadata, _>(global) {
            Ok(proxy) => proxy,
            Err(e) => {
                log::warn!("Failed to bind default metadata {}: {}", global.id, e);
                return;
            }
        };

        let listener = proxy
            .add_listener_local()
            .property({
                let session = self.clone();
                move |subject, key, _type, value| {
                    session.on_metadata_property(subject, key, value);
                    0
                }
            })
            .register();

        log::debug!("Default metadata bound: id={}", global.id);
        *self.metadata.borrow_mut() = Some(BoundMetadata {
            id: global.id,
            _proxy: proxy,
            _listener: listener,
        });
    }

    fn remove_global(&self, id: ObjectId) {
        if let Some(sink) = self.store.borrow_mut().remove_sink(id) {
            log::debug!("Sink removed: id={} name={:?}", id, sink.name);
        }
        self.sinks.borrow_mut().remove(&id);

        let metadata_gone = self.metadata.borrow().as_ref().is_some_and(|m| m.id == id);
        if metadata_gone {
            log::warn!("Default metadata object {} removed", id);
            self.metadata.borrow_mut().take();
            if self.store.borrow_mut().set_default_metadata(None, None) {
                self.dispatch(SessionEvent::DefaultChanged);
            }
        }
    }
}

fn parse_sink(global: &GlobalObject<&DictRef>) -> Option<SinkRecord> {
    let props = global.props.as_ref()?;

    if props.get("media.class") != Some(AUDIO_SINK_CLASS) {
        return None;
    }

    let name = props.get("node.name").unwrap_or_default().to_string();
    let description = props
        .get("node.description")
        .or_else(|| props.get("node.nick"))
        .unwrap_or_default()
        .to_string();

    Some(SinkRecord {
        id: global.id,
        name,
        description,
    })
}
