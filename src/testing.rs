// Dobles de prueba para las costuras del navegador

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{Identity, Role};
use crate::routing::Navigator;
use crate::services::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::services::live_channel::SocketEvents;
use crate::services::scheduler::{PendingTask, Scheduler};
use crate::services::socket::{SocketFactory, SocketHandle};

pub fn identity(role: Role) -> Identity {
    let name = match role {
        Role::Admin => "admin",
        Role::Manager => "manager",
        Role::Technician => "tech",
    };
    Identity {
        id: format!("{}-1", name),
        name: name.to_string(),
        email: format!("{}@netsite.test", name),
        role,
        organization_unit: "Dakar".to_string(),
    }
}

/// JSON de `/auth/login` o `/auth/me`
pub fn login_body(role: Role, token: &str) -> String {
    serde_json::json!({
        "token": token,
        "user": identity(role),
    })
    .to_string()
}

// ==========================================
// HTTP
// ==========================================

/// Respuestas encoladas, una por petición
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<HttpResponse, String>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, reason: &str) {
        self.replies.borrow_mut().push_back(Err(reason.to_string()));
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply".to_string()))
    }
}

// ==========================================
// NAVEGACIÓN
// ==========================================

pub struct RecordingNavigator {
    path: RefCell<String>,
    history: RefCell<Vec<String>>,
    hook: RefCell<Option<Rc<dyn Fn(&str)>>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            path: RefCell::new(path.to_string()),
            history: RefCell::new(Vec::new()),
            hook: RefCell::new(None),
        }
    }

    /// Se llama tras cada redirección efectiva (como `routechange`)
    pub fn on_replace(&self, hook: impl Fn(&str) + 'static) {
        *self.hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// Redirecciones efectivas, en orden
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn replace(&self, path: &str) {
        if *self.path.borrow() == path {
            return;
        }
        *self.path.borrow_mut() = path.to_string();
        self.history.borrow_mut().push(path.to_string());
        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook(path);
        }
    }
}

// ==========================================
// SOCKETS
// ==========================================

pub struct FakeConnection {
    pub url: String,
    events: SocketEvents,
    closed: Rc<Cell<bool>>,
}

impl FakeConnection {
    pub fn opened(&self) {
        self.events.opened();
    }

    pub fn message(&self, frame: &str) {
        self.events.message(frame);
    }

    pub fn closed(&self) {
        self.events.closed();
    }

    /// Liberada por el canal (cierre intencionado o conexión caída)
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }
}

struct FakeHandle(Rc<Cell<bool>>);

impl SocketHandle for FakeHandle {
    fn close(&self) {
        self.0.set(true);
    }
}

/// Registra cada apertura; los eventos se disparan a mano desde el test
#[derive(Default)]
pub struct FakeSocketFactory {
    connections: RefCell<Vec<Rc<FakeConnection>>>,
    fail_next: Cell<bool>,
}

impl FakeSocketFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_count(&self) -> usize {
        self.connections.borrow().len()
    }

    pub fn connection(&self, index: usize) -> Rc<FakeConnection> {
        self.connections.borrow()[index].clone()
    }

    pub fn last_url(&self) -> Option<String> {
        self.connections.borrow().last().map(|c| c.url.clone())
    }

    pub fn fail_next_open(&self) {
        self.fail_next.set(true);
    }
}

impl SocketFactory for FakeSocketFactory {
    fn open(&self, url: &str, events: SocketEvents) -> Result<Box<dyn SocketHandle>, String> {
        if self.fail_next.replace(false) {
            return Err("connection refused".to_string());
        }
        let closed = Rc::new(Cell::new(false));
        self.connections.borrow_mut().push(Rc::new(FakeConnection {
            url: url.to_string(),
            events,
            closed: closed.clone(),
        }));
        Ok(Box::new(FakeHandle(closed)))
    }
}

// ==========================================
// TIEMPO
// ==========================================

struct ScheduledTask {
    due: Duration,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

struct ManualTask(Rc<Cell<bool>>);

impl PendingTask for ManualTask {
    fn cancel(self: Box<Self>) {
        self.0.set(true);
    }
}

/// Reloj manual: las tareas solo corren dentro de `advance`
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    tasks: RefCell<Vec<ScheduledTask>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tareas programadas, sin cancelar y aún sin ejecutar
    pub fn pending(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);

        loop {
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                tasks.retain(|t| !t.cancelled.get());
                tasks
                    .iter()
                    .position(|t| t.due <= now)
                    .map(|index| tasks.remove(index))
            };
            match next {
                Some(scheduled) => (scheduled.task)(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Box<dyn PendingTask> {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ScheduledTask {
            due: self.now.get() + delay,
            cancelled: cancelled.clone(),
            task,
        });
        Box::new(ManualTask(cancelled))
    }
}
