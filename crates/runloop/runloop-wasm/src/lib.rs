use std::cell::RefCell;
use std::collections::BTreeMap;

use js_sys::{Array, Function, Object};
use log::debug;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use runloop_core::{
    duration_from_f64, parse_duration, Config, KeyframeScheduler, RunControl, RunState,
    VERSION,
};

/// JS handle around a single keyframe scheduler driven by the host's frame loop.
///
/// Methods take `&self` so keyframe callbacks can call back into the same object
/// while `update` is dispatching. Re-entrant `pause`/`reset` calls are queued and
/// applied once the firing chain returns; other re-entrant calls are ignored.
#[wasm_bindgen]
pub struct Runloop {
    core: RefCell<KeyframeScheduler>,
    control: RunControl,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Labels may be strings (`"25%"`) or numbers (`25`); anything else is not a label.
fn label_from_js(v: &JsValue) -> Option<String> {
    if let Some(s) = v.as_string() {
        return Some(s);
    }
    v.as_f64().map(|n| n.to_string())
}

/// Numbers and numeric strings are accepted; anything else means the default.
fn duration_from_js(v: &JsValue) -> Option<u64> {
    if let Some(n) = v.as_f64() {
        return Some(duration_from_f64(n));
    }
    v.as_string().map(|s| parse_duration(&s))
}

/// Wrap a JS function as a keyframe callback. Exceptions are reported, not propagated.
fn js_callback(f: Function) -> impl FnMut() + 'static {
    move || {
        if let Err(err) = f.call0(&JsValue::UNDEFINED) {
            web_sys::console::error_2(&JsValue::from_str("runloop keyframe threw:"), &err);
        }
    }
}

#[wasm_bindgen]
impl Runloop {
    /// Create a scheduler. Pass `{ roundType, base }`, its JSON text, or
    /// undefined/null for defaults.
    /// Example:
    ///   new Runloop({ roundType: "round" })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Runloop, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else if let Some(json) = config.as_string() {
            Config::from_json(&json).map_err(|e| JsError::new(&format!("config error: {e}")))?
        } else {
            swb::from_value::<Config>(config)
                .map_err(|e| JsError::new(&format!("config error: {e}")))?
                .validate()
                .map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        let core = KeyframeScheduler::new(cfg);
        let control = core.control();
        Ok(Runloop {
            core: RefCell::new(core),
            control,
        })
    }

    /// Register `callback` at `label`. Non-function callbacks and unusable labels are ignored.
    #[wasm_bindgen(js_name = addKey)]
    pub fn add_key(&self, label: JsValue, callback: JsValue) {
        let Some(label) = label_from_js(&label) else {
            debug!("addKey ignored: label is neither string nor number");
            return;
        };
        match callback.dyn_into::<Function>() {
            Ok(f) => {
                self.with_core("addKey", |core| core.add_key(label, js_callback(f)));
            }
            Err(_) => debug!("addKey ignored: callback for {label:?} is not a function"),
        }
    }

    #[wasm_bindgen(js_name = removeKey)]
    pub fn remove_key(&self, label: JsValue) {
        if let Some(label) = label_from_js(&label) {
            self.with_core("removeKey", |core| core.remove_key(label));
        }
    }

    /// Register every `label: function` pair of a plain object, skipping the rest.
    #[wasm_bindgen(js_name = addMap)]
    pub fn add_map(&self, map: JsValue) {
        if !map.is_object() {
            return;
        }
        let entries = Object::entries(&Object::from(map));
        let pairs = entries.iter().filter_map(|entry| {
            let pair = Array::from(&entry);
            let label = pair.get(0).as_string()?;
            let f = pair.get(1).dyn_into::<Function>().ok()?;
            Some((label, js_callback(f)))
        });
        self.with_core("addMap", |core| core.add_map(pairs));
    }

    /// Registered keyframes as `{ "<tick>": <callback count> }`.
    #[wasm_bindgen(js_name = getMap)]
    pub fn get_map(&self) -> Result<JsValue, JsError> {
        let core = self
            .core
            .try_borrow()
            .map_err(|_| JsError::new("getMap error: runloop is dispatching"))?;
        let map: BTreeMap<String, usize> = core
            .get_map()
            .chain_lengths()
            .map(|(tick, len)| (tick.get().to_string(), len))
            .collect();
        map.serialize(&swb::Serializer::json_compatible())
            .map_err(|e| JsError::new(&format!("getMap error: {e}")))
    }

    /// Start or resume. `duration` defaults to 500 ms; `callback` joins the 100% keyframe.
    #[wasm_bindgen]
    pub fn play(&self, duration: JsValue, callback: JsValue) {
        let on_complete = callback
            .dyn_into::<Function>()
            .ok()
            .map(|f| Box::new(js_callback(f)) as runloop_core::KeyframeFn);
        let duration = duration_from_js(&duration);
        self.with_core("play", |core| core.play(duration, on_complete));
    }

    /// Pause now, or right after the current keyframe chain when called from one.
    #[wasm_bindgen]
    pub fn pause(&self) {
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.pause(),
            Err(_) => self.control.pause(),
        }
    }

    /// Reset now, or right after the current keyframe chain when called from one.
    #[wasm_bindgen]
    pub fn reset(&self) {
        match self.core.try_borrow_mut() {
            Ok(mut core) => core.reset(),
            Err(_) => self.control.reset(),
        }
    }

    /// Advance by `elapsed_ms` (e.g. the delta between animation frames). Returns the state name.
    #[wasm_bindgen]
    pub fn update(&self, elapsed_ms: f64) -> String {
        self.with_core("update", |core| core.update(elapsed_ms))
            .unwrap_or_else(|| self.state_now())
            .name()
            .to_string()
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.state_now().is_playing()
    }

    #[wasm_bindgen(getter, js_name = currentStep)]
    pub fn current_step(&self) -> f64 {
        self.core.try_borrow().map_or(0.0, |core| core.current_step())
    }

    /// "idle" | "running" | "paused"
    #[wasm_bindgen]
    pub fn state(&self) -> String {
        self.state_now().name().to_string()
    }
}

impl Runloop {
    fn with_core<R>(&self, op: &str, f: impl FnOnce(&mut KeyframeScheduler) -> R) -> Option<R> {
        match self.core.try_borrow_mut() {
            Ok(mut core) => Some(f(&mut core)),
            Err(_) => {
                debug!("{op} ignored: called from inside a keyframe callback");
                None
            }
        }
    }

    /// State as seen by JS; inside a dispatch the run is still running.
    fn state_now(&self) -> RunState {
        self.core
            .try_borrow()
            .map_or(RunState::Running, |core| core.state())
    }
}

#[wasm_bindgen]
pub fn version() -> String {
    VERSION.to_string()
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
