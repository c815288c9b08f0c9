// ============================================================================
// SOCKET - Transporte dúplex del canal en vivo (WebSocket del navegador)
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use crate::services::live_channel::SocketEvents;

/// Conexión abierta. Tras `close` no debe llegar ningún evento más al canal,
/// tanto en un cierre intencionado como al liberar una conexión caída.
pub trait SocketHandle {
    fn close(&self);
}

/// Abre conexiones. Los eventos de la conexión llegan por `events`.
pub trait SocketFactory {
    fn open(&self, url: &str, events: SocketEvents) -> Result<Box<dyn SocketHandle>, String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSocketFactory;

/// WebSocket + closures que deben vivir tanto como él
struct BrowserSocket {
    ws: WebSocket,
    _on_open: Closure<dyn FnMut(Event)>,
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    _on_error: Closure<dyn FnMut(Event)>,
}

impl SocketFactory for BrowserSocketFactory {
    fn open(&self, url: &str, events: SocketEvents) -> Result<Box<dyn SocketHandle>, String> {
        let ws = WebSocket::new(url).map_err(|e| format!("WebSocket error: {:?}", e))?;

        let on_open = Closure::wrap(Box::new({
            let events = events.clone();
            move |_event: Event| events.opened()
        }) as Box<dyn FnMut(Event)>);

        let on_message = Closure::wrap(Box::new({
            let events = events.clone();
            move |event: MessageEvent| match event.data().as_string() {
                Some(text) => events.message(&text),
                None => log::warn!("⚠️ [LIVE] Frame no textual ignorado"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        let on_close = Closure::wrap(Box::new({
            let events = events.clone();
            move |event: CloseEvent| {
                log::info!("🔌 [LIVE] WebSocket cerrado (code {})", event.code());
                events.closed();
            }
        }) as Box<dyn FnMut(CloseEvent)>);

        let on_error = Closure::wrap(Box::new(move |_event: Event| {
            log::warn!("⚠️ [LIVE] Error de WebSocket");
            events.closed();
        }) as Box<dyn FnMut(Event)>);

        ws.set_onopen(Some(on_open.as_ref().unchecked_ref::<js_sys::Function>()));
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref::<js_sys::Function>()));
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref::<js_sys::Function>()));
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref::<js_sys::Function>()));

        Ok(Box::new(BrowserSocket {
            ws,
            _on_open: on_open,
            _on_message: on_message,
            _on_close: on_close,
            _on_error: on_error,
        }))
    }
}

impl BrowserSocket {
    /// Desengancha los handlers. Tras un `error` el navegador siempre dispara
    /// `close`, y llegaría a closures ya liberados.
    fn detach(&self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
    }
}

impl SocketHandle for BrowserSocket {
    fn close(&self) {
        self.detach();
        // Sobre un socket ya en CLOSING/CLOSED no hace nada
        if let Err(e) = self.ws.close() {
            log::warn!("⚠️ [LIVE] Error cerrando WebSocket: {:?}", e);
        }
    }
}

impl Drop for BrowserSocket {
    fn drop(&mut self) {
        self.detach();
    }
}
