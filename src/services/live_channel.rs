// ============================================================================
// CANAL EN VIVO - Un único transporte compartido + registro de listeners
// ============================================================================
// DISCONNECTED → CONNECTING → CONNECTED → DISCONNECTED (cierre/error)
//              → CONNECTING (tras la espera fija)
//
// El registro es el dueño del transporte: se abre con el primer listener y se
// cierra en cuanto se va el último. Cada conexión lleva un número; los eventos
// de una conexión abandonada se ignoran.
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::models::live::{frame_lines, LiveMessage};
use crate::services::scheduler::{PendingTask, Scheduler};
use crate::services::socket::{SocketFactory, SocketHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Rc<dyn Fn(&LiveMessage)>;

struct Registry {
    state: ChannelState,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    /// Número de la conexión vigente
    connection: u64,
    socket: Option<Box<dyn SocketHandle>>,
    /// Único temporizador de reconexión
    reconnect: Option<Box<dyn PendingTask>>,
    reconnect_attempts: u64,
}

struct Shared {
    registry: RefCell<Registry>,
    url: String,
    backoff: Duration,
    sockets: Rc<dyn SocketFactory>,
    scheduler: Rc<dyn Scheduler>,
}

/// Canal de actualizaciones en vivo (clonar es barato; todos los clones
/// comparten transporte y registro)
#[derive(Clone)]
pub struct LiveUpdateChannel {
    shared: Rc<Shared>,
}

impl LiveUpdateChannel {
    pub fn new(
        url: impl Into<String>,
        backoff: Duration,
        sockets: Rc<dyn SocketFactory>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            shared: Rc::new(Shared {
                registry: RefCell::new(Registry {
                    state: ChannelState::Disconnected,
                    listeners: Vec::new(),
                    next_listener: 0,
                    connection: 0,
                    socket: None,
                    reconnect: None,
                    reconnect_attempts: 0,
                }),
                url: url.into(),
                backoff,
                sockets,
                scheduler,
            }),
        }
    }

    /// Registra un listener y abre el transporte si hace falta.
    /// El listener vive hasta `unsubscribe()` o hasta que se suelta la suscripción.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&LiveMessage) + 'static,
    {
        let id = {
            let mut registry = self.shared.registry.borrow_mut();
            registry.next_listener += 1;
            let id = ListenerId(registry.next_listener);
            registry.listeners.push((id, Rc::new(callback)));
            log::debug!("👂 [LIVE] Listener {:?} registrado ({} en total)", id, registry.listeners.len());
            id
        };

        self.shared.connect();

        Subscription {
            channel: Rc::downgrade(&self.shared),
            id: Some(id),
        }
    }

    /// Quita todos los listeners y cierra el transporte
    pub fn shutdown(&self) {
        let ids: Vec<ListenerId> = self
            .shared
            .registry
            .borrow()
            .listeners
            .iter()
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.shared.remove(id);
        }
    }

    pub fn state(&self) -> ChannelState {
        self.shared.registry.borrow().state
    }

    pub fn listener_count(&self) -> usize {
        self.shared.registry.borrow().listeners.len()
    }

    pub fn reconnect_attempts(&self) -> u64 {
        self.shared.registry.borrow().reconnect_attempts
    }

    pub fn has_pending_reconnect(&self) -> bool {
        self.shared.registry.borrow().reconnect.is_some()
    }

    pub fn url(&self) -> &str {
        &self.shared.url
    }
}

impl Shared {
    /// Abre una conexión si hay listeners, no hay transporte y no hay un
    /// reintento ya programado
    fn connect(self: &Rc<Self>) {
        let connection = {
            let mut registry = self.registry.borrow_mut();
            if registry.listeners.is_empty()
                || registry.state != ChannelState::Disconnected
                || registry.reconnect.is_some()
            {
                return;
            }
            registry.state = ChannelState::Connecting;
            registry.connection += 1;
            registry.connection
        };

        log::info!("🔌 [LIVE] Conectando a {} (conexión #{})", self.url, connection);
        let events = SocketEvents {
            channel: Rc::downgrade(self),
            connection,
        };

        match self.sockets.open(&self.url, events) {
            Ok(handle) => {
                let mut registry = self.registry.borrow_mut();
                if registry.connection == connection && registry.state != ChannelState::Disconnected {
                    registry.socket = Some(handle);
                } else {
                    // Abandonada mientras se abría
                    drop(registry);
                    handle.close();
                }
            }
            Err(e) => {
                log::error!("❌ [LIVE] No se pudo abrir el transporte: {}", e);
                self.on_closed(connection);
            }
        }
    }

    fn remove(self: &Rc<Self>, id: ListenerId) {
        let (socket, reconnect) = {
            let mut registry = self.registry.borrow_mut();
            let before = registry.listeners.len();
            registry.listeners.retain(|(listener, _)| *listener != id);
            if registry.listeners.len() == before {
                return;
            }
            log::debug!("👋 [LIVE] Listener {:?} eliminado ({} restantes)", id, registry.listeners.len());
            if !registry.listeners.is_empty() {
                return;
            }
            registry.state = ChannelState::Disconnected;
            // Cualquier evento tardío de la conexión actual queda obsoleto
            registry.connection += 1;
            (registry.socket.take(), registry.reconnect.take())
        };

        if let Some(task) = reconnect {
            log::info!("⏹️ [LIVE] Reintento pendiente cancelado (sin listeners)");
            task.cancel();
        }
        if let Some(socket) = socket {
            log::info!("🔌 [LIVE] Sin listeners - cerrando transporte");
            socket.close();
        }
    }

    fn is_current(&self, connection: u64) -> bool {
        let registry = self.registry.borrow();
        registry.connection == connection && registry.state != ChannelState::Disconnected
    }

    fn on_opened(&self, connection: u64) {
        let mut registry = self.registry.borrow_mut();
        if registry.connection == connection && registry.state == ChannelState::Connecting {
            registry.state = ChannelState::Connected;
            log::info!("✅ [LIVE] Conectado (conexión #{})", connection);
        }
    }

    fn on_message(&self, connection: u64, frame: &str) {
        for line in frame_lines(frame) {
            // Un listener puede haber cerrado el canal durante el despacho
            if !self.is_current(connection) {
                return;
            }
            match LiveMessage::parse(line) {
                Ok(message) => self.dispatch(&message),
                Err(e) => log::warn!("⚠️ [LIVE] Mensaje ilegible descartado: {}", e),
            }
        }
    }

    /// Entrega a todos los listeners registrados, en orden de registro.
    /// No se mantiene ningún borrow mientras corren los callbacks; un listener
    /// quitado por otro durante el despacho ya no recibe el mensaje.
    fn dispatch(&self, message: &LiveMessage) {
        let listeners: Vec<(ListenerId, Listener)> = self.registry.borrow().listeners.clone();
        for (id, listener) in listeners {
            if !self.is_registered(id) {
                continue;
            }
            listener(message);
        }
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.registry
            .borrow()
            .listeners
            .iter()
            .any(|(listener, _)| *listener == id)
    }

    fn on_closed(self: &Rc<Self>, connection: u64) {
        let (socket, retry) = {
            let mut registry = self.registry.borrow_mut();
            if registry.connection != connection || registry.state == ChannelState::Disconnected {
                return;
            }
            registry.state = ChannelState::Disconnected;
            (registry.socket.take(), !registry.listeners.is_empty())
        };
        // Liberar la conexión caída sin dejar handlers vivos
        if let Some(socket) = socket {
            socket.close();
        }

        if retry {
            log::warn!(
                "📴 [LIVE] Conexión #{} perdida - reintento en {}ms",
                connection,
                self.backoff.as_millis()
            );
            self.schedule_reconnect();
        }
    }

    fn schedule_reconnect(self: &Rc<Self>) {
        let channel = Rc::downgrade(self);
        let task = self.scheduler.schedule(
            self.backoff,
            Box::new(move || {
                if let Some(shared) = channel.upgrade() {
                    shared.reconnect_due();
                }
            }),
        );

        let previous = self.registry.borrow_mut().reconnect.replace(task);
        if let Some(previous) = previous {
            previous.cancel();
        }
    }

    fn reconnect_due(self: &Rc<Self>) {
        let attempt = {
            let mut registry = self.registry.borrow_mut();
            // `None` = cancelado por el último unsubscribe
            if registry.reconnect.take().is_none() || registry.listeners.is_empty() {
                return;
            }
            registry.reconnect_attempts += 1;
            registry.reconnect_attempts
        };
        log::info!("🔄 [LIVE] Reintento de conexión #{}", attempt);
        self.connect();
    }
}

/// Eventos de una conexión concreta hacia el canal
#[derive(Clone)]
pub struct SocketEvents {
    channel: Weak<Shared>,
    connection: u64,
}

impl SocketEvents {
    pub fn opened(&self) {
        if let Some(shared) = self.channel.upgrade() {
            shared.on_opened(self.connection);
        }
    }

    pub fn message(&self, frame: &str) {
        if let Some(shared) = self.channel.upgrade() {
            shared.on_message(self.connection, frame);
        }
    }

    /// Cierre o error inesperado
    pub fn closed(&self) {
        if let Some(shared) = self.channel.upgrade() {
            shared.on_closed(self.connection);
        }
    }
}

impl fmt::Debug for SocketEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketEvents")
            .field("connection", &self.connection)
            .finish()
    }
}

/// Suscripción al canal. Soltarla equivale a `unsubscribe()`.
#[must_use = "soltar la suscripción elimina el listener"]
pub struct Subscription {
    channel: Weak<Shared>,
    id: Option<ListenerId>,
}

impl Subscription {
    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(id), Some(shared)) = (self.id.take(), self.channel.upgrade()) {
            shared.remove(id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
