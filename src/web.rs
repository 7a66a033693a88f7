//! Browser [`Platform`] backed by `web-sys` (feature `web`).
//!
//! [`WebPlatform`] maps the platform contract onto `window.history`,
//! `window.location` and document scrolling. History state crosses the JS
//! boundary as JSON. [`attach`] installs the `popstate` and `scroll`
//! listeners that feed a shared [`Router`].
//!
//! ```ignore
//! use spa_navigator::web::{attach, WebPlatform};
//! use spa_navigator::{Router, RouterConfig};
//! use std::rc::Rc;
//!
//! let platform = WebPlatform::new().expect("no window");
//! let router = Rc::new(Router::new(config, platform));
//! // Listeners first, then the initial navigation.
//! let listeners = attach(&router).expect("listener registration failed");
//! wasm_bindgen_futures::spawn_local(async move {
//!     let _ = router.initialize().await;
//! });
//! // Keep `listeners` alive for as long as the router should react.
//! ```
//!
//! [`start`] does the same in one call:
//!
//! ```ignore
//! let listeners = spa_navigator::web::start(&router).expect("listener registration failed");
//! ```

use crate::history::ScrollPosition;
use crate::platform::{ElementRect, Platform, RenderCycle, Viewport};
use crate::router::Router;
use crate::scroll::SCROLL_DEBOUNCE;
use crate::{debug_log, error_log, warn_log};
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, History, ScrollRestoration, ScrollToOptions, Window};

/// The real browser window.
#[derive(Debug, Clone)]
pub struct WebPlatform {
    window: Window,
}

impl WebPlatform {
    /// `None` outside a browser main thread.
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn history(&self) -> Option<History> {
        match self.window.history() {
            Ok(history) => Some(history),
            Err(err) => {
                error_log!("window.history unavailable: {:?}", err);
                None
            }
        }
    }
}

fn state_to_js(state: &Value) -> JsValue {
    serde_json::to_string(state)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::NULL)
}

fn state_from_js(state: &JsValue) -> Option<Value> {
    if state.is_null() || state.is_undefined() {
        return None;
    }
    let json: String = js_sys::JSON::stringify(state).ok()?.into();
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            warn_log!("History state is not JSON: {}", err);
            None
        }
    }
}

impl Platform for WebPlatform {
    fn location(&self) -> String {
        let location = self.window.location();
        let pathname = location.pathname().unwrap_or_default();
        let search = location.search().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        format!("{pathname}{search}{hash}")
    }

    fn history_state(&self) -> Option<Value> {
        let state = self.history()?.state().ok()?;
        state_from_js(&state)
    }

    fn push_state(&self, state: Value, url: &str) {
        let Some(history) = self.history() else {
            return;
        };
        if let Err(err) = history.push_state_with_url(&state_to_js(&state), "", Some(url)) {
            error_log!("pushState('{}') failed: {:?}", url, err);
        }
    }

    fn replace_state(&self, state: Option<Value>, url: &str) {
        let Some(history) = self.history() else {
            return;
        };
        let state = state.as_ref().map_or(JsValue::NULL, state_to_js);
        if let Err(err) = history.replace_state_with_url(&state, "", Some(url)) {
            error_log!("replaceState('{}') failed: {:?}", url, err);
        }
    }

    fn history_back(&self) {
        if let Some(history) = self.history() {
            if let Err(err) = history.back() {
                error_log!("history.back() failed: {:?}", err);
            }
        }
    }

    fn scroll_position(&self) -> ScrollPosition {
        ScrollPosition::new(
            self.window.scroll_x().unwrap_or_default(),
            self.window.scroll_y().unwrap_or_default(),
        )
    }

    fn scroll_to(&self, position: ScrollPosition) {
        let options = ScrollToOptions::new();
        options.set_left(position.x);
        options.set_top(position.y);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn element_rect(&self, id: &str) -> Option<ElementRect> {
        let element = self.window.document()?.get_element_by_id(id)?;
        let rect = element.get_bounding_client_rect();
        Some(ElementRect {
            top: rect.top(),
            left: rect.left(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|value| value.as_f64()).unwrap_or_default()
        };
        Viewport {
            width: dimension(self.window.inner_width()),
            height: dimension(self.window.inner_height()),
        }
    }

    fn set_page_scroll_blocked(&self, blocked: bool) {
        let Some(body) = self.window.document().and_then(|document| document.body()) else {
            return;
        };
        let style = body.style();
        let result = if blocked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(err) = result {
            error_log!("Failed to update body overflow: {:?}", err);
        }
    }

    fn set_manual_scroll_restoration(&self) {
        if let Some(history) = self.history() {
            if let Err(err) = history.set_scroll_restoration(ScrollRestoration::Manual) {
                warn_log!("Could not disable native scroll restoration: {:?}", err);
            }
        }
    }
}

// ============================================================================
// Event wiring
// ============================================================================

type EventCallback = Closure<dyn FnMut(web_sys::Event)>;

/// Registered window listeners. Dropping this removes them.
pub struct Listeners {
    window: Window,
    popstate: EventCallback,
    scroll: EventCallback,
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("popstate", self.popstate.as_ref().unchecked_ref());
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.scroll.as_ref().unchecked_ref());
        debug_log!("Router listeners removed");
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners").finish_non_exhaustive()
    }
}

/// Route back/forward events and debounced scroll events into `router`.
pub fn attach<R>(router: &Rc<Router<WebPlatform, R>>) -> Result<Listeners, JsValue>
where
    R: RenderCycle + 'static,
{
    let window = router.platform().window().clone();

    let popstate = {
        let router = Rc::clone(router);
        EventCallback::wrap(Box::new(move |event: web_sys::Event| {
            let state = event
                .dyn_ref::<web_sys::PopStateEvent>()
                .and_then(|event| state_from_js(&event.state()));
            let router = Rc::clone(&router);
            wasm_bindgen_futures::spawn_local(async move {
                let event = crate::platform::PopStateEvent::new(state);
                if let Err(err) = router.handle_pop_state(event).await {
                    error_log!("Back/forward navigation failed: {}", err);
                }
            });
        }))
    };
    window.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())?;

    let scroll = {
        let router = Rc::clone(router);
        let window = window.clone();
        EventCallback::wrap(Box::new(move |_event: web_sys::Event| {
            let ticket = router.on_scroll();
            let router = Rc::clone(&router);
            let settle = Closure::once_into_js(move || {
                router.settle_scroll(ticket);
            });
            #[allow(clippy::cast_possible_truncation)]
            let delay = SCROLL_DEBOUNCE.as_millis() as i32;
            if let Err(err) = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(settle.unchecked_ref(), delay)
            {
                error_log!("Failed to schedule scroll capture: {:?}", err);
            }
        }))
    };
    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    window.add_event_listener_with_callback_and_add_event_listener_options(
        "scroll",
        scroll.as_ref().unchecked_ref(),
        &options,
    )?;

    debug_log!("Router listeners attached");
    Ok(Listeners {
        window,
        popstate,
        scroll,
    })
}

/// Attach the listeners, then run [`Router::initialize`] on the local
/// executor.
///
/// The listeners are registered before the initial navigation, so a
/// back/forward event fired while the first page renders is not lost.
pub fn start<R>(router: &Rc<Router<WebPlatform, R>>) -> Result<Listeners, JsValue>
where
    R: RenderCycle + 'static,
{
    let listeners = attach(router)?;
    let router = Rc::clone(router);
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(err) = router.initialize().await {
            error_log!("Initial navigation failed: {}", err);
        }
    });
    Ok(listeners)
}
