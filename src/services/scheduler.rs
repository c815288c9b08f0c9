use std::time::Duration;

use gloo_timers::callback::Timeout;

/// Tarea programada pendiente
pub trait PendingTask {
    /// Cancela la tarea; si ya se ejecutó no hace nada
    fn cancel(self: Box<Self>);
}

/// Temporizador de un solo disparo
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Box<dyn PendingTask>;
}

/// `setTimeout` vía gloo-timers
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserScheduler;

struct BrowserTimeout(Timeout);

impl PendingTask for BrowserTimeout {
    fn cancel(self: Box<Self>) {
        // Timeout::cancel devuelve el closure sin ejecutarlo
        let _ = self.0.cancel();
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Box<dyn PendingTask> {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Box::new(BrowserTimeout(Timeout::new(millis, task)))
    }
}
