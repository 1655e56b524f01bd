use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Element, Event, TouchEvent, WheelEvent, Window};
use yew::prelude::*;

use super::animator::{Animator, DriverOptions, Orientation};
use crate::config::scroll as tuning;

const LINE_HEIGHT_PX: f64 = 16.0;

/// Wheel input inside an element carrying this attribute keeps its native behaviour.
pub const SCROLL_PREVENT_ATTR: &str = "data-scroll-prevent";

#[derive(Clone, Debug, PartialEq)]
pub enum ScrollTarget {
    Offset(f64),
    /// CSS selector of the element to bring to the top of the viewport.
    Selector(String),
}

impl From<f64> for ScrollTarget {
    fn from(offset: f64) -> Self {
        ScrollTarget::Offset(offset)
    }
}

impl From<&str> for ScrollTarget {
    fn from(selector: &str) -> Self {
        ScrollTarget::Selector(selector.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollOptions {
    pub offset: Option<f64>,
    /// Seconds.
    pub duration: Option<f64>,
}

impl ScrollOptions {
    fn resolve(&self) -> (f64, f64) {
        (
            self.offset.unwrap_or(0.0),
            self.duration.unwrap_or(tuning::DURATION_SECS),
        )
    }
}

pub fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(tuning::REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

/// Converts a wheel delta to pixels given its `deltaMode`.
fn normalize_wheel(delta: f64, delta_mode: u32, viewport: f64) -> f64 {
    match delta_mode {
        WheelEvent::DOM_DELTA_LINE => delta * LINE_HEIGHT_PX,
        WheelEvent::DOM_DELTA_PAGE => delta * viewport,
        _ => delta,
    }
}

/// Whether the event started inside a subtree that opted out of smooth scrolling.
fn opted_out(event: &Event) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .and_then(|element| element.closest(&format!("[{}]", SCROLL_PREVENT_ATTR)).ok().flatten())
        .is_some()
}

fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|height| height.as_f64())
        .unwrap_or(0.0)
}

fn scroll_limit(window: &Window) -> f64 {
    let document_height = window
        .document()
        .and_then(|document| document.document_element())
        .map(|root| f64::from(root.scroll_height()))
        .unwrap_or(0.0);
    (document_height - viewport_height(window)).max(0.0)
}

/// Applies animator output to the window scroll position.
struct Driver {
    window: Window,
    animator: Animator,
}

impl Driver {
    fn new(window: Window, options: DriverOptions) -> Self {
        let position = match options.orientation {
            Orientation::Vertical => window.scroll_y(),
            Orientation::Horizontal => window.scroll_x(),
        }
        .unwrap_or(0.0);
        let limit = scroll_limit(&window);
        Self {
            window,
            animator: Animator::new(options, position, limit),
        }
    }

    fn current_position(&self) -> f64 {
        let position = match self.animator.options().orientation {
            Orientation::Vertical => self.window.scroll_y(),
            Orientation::Horizontal => self.window.scroll_x(),
        };
        position.unwrap_or_else(|_| self.animator.position())
    }

    fn apply(&self, position: f64) {
        match self.animator.options().orientation {
            Orientation::Vertical => {
                let x = self.window.scroll_x().unwrap_or(0.0);
                self.window.scroll_to_with_x_and_y(x, position);
            }
            Orientation::Horizontal => {
                let y = self.window.scroll_y().unwrap_or(0.0);
                self.window.scroll_to_with_x_and_y(position, y);
            }
        }
    }

    fn raf(&mut self, timestamp: f64) {
        match self.animator.tick(timestamp) {
            Some(position) => self.apply(position),
            None => {
                let position = self.current_position();
                self.animator.sync(position);
            }
        }
    }

    fn resolve(&self, target: &ScrollTarget) -> Option<f64> {
        match target {
            ScrollTarget::Offset(offset) => Some(*offset),
            ScrollTarget::Selector(selector) => {
                let element = self.window.document()?.query_selector(selector).ok().flatten()?;
                let rect = element.get_bounding_client_rect();
                let edge = match self.animator.options().orientation {
                    Orientation::Vertical => rect.top(),
                    Orientation::Horizontal => rect.left(),
                };
                Some(edge + self.current_position())
            }
        }
    }

    fn scroll_to(&mut self, target: &ScrollTarget, options: ScrollOptions) {
        let Some(base) = self.resolve(target) else {
            log::debug!("Scroll target {:?} not found", target);
            return;
        };
        let (offset, duration) = options.resolve();
        self.animator.set_limit(scroll_limit(&self.window));
        self.animator.sync(self.current_position());
        self.animator.animate_to(base + offset, duration);
        if !self.animator.is_animating() {
            self.apply(self.animator.position());
        }
    }

    fn wheel(&mut self, delta: f64) {
        self.animator.set_limit(scroll_limit(&self.window));
        self.animator.wheel(delta);
    }

    fn touch(&mut self, delta: f64) {
        self.animator.set_limit(scroll_limit(&self.window));
        self.animator.touch(delta);
    }

    fn destroy(&mut self) {
        self.animator.stop();
    }
}

struct Listener {
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Inertia scrolling for the page. Owns its driver, the input listeners and
/// the frame callback; `stop` (or drop) releases all of them.
pub struct SmoothScroll {
    window: Window,
    driver: Rc<RefCell<Driver>>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    frame_id: Rc<Cell<Option<i32>>>,
    listeners: Vec<Listener>,
}

impl SmoothScroll {
    pub fn new(window: Window, options: DriverOptions) -> Self {
        let driver = Driver::new(window.clone(), options);
        Self {
            window,
            driver: Rc::new(RefCell::new(driver)),
            frame: Rc::new(RefCell::new(None)),
            frame_id: Rc::new(Cell::new(None)),
            listeners: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.frame.borrow().is_some()
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }
        self.listen_wheel()?;
        if self.driver.borrow().animator.options().smooth_touch {
            self.listen_touch()?;
        }

        let driver = self.driver.clone();
        let window = self.window.clone();
        let frame = self.frame.clone();
        let frame_id = self.frame_id.clone();
        let callback = Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            driver.borrow_mut().raf(timestamp);
            if let Some(next) = frame.borrow().as_ref() {
                frame_id.set(window.request_animation_frame(next.as_ref().unchecked_ref()).ok());
            }
        });
        let id = self.window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        self.frame_id.set(Some(id));
        *self.frame.borrow_mut() = Some(callback);
        log::debug!("Smooth scrolling started");
        Ok(())
    }

    pub fn stop(&mut self) {
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the callback's reference to its own slot
        let callback = self.frame.borrow_mut().take();
        drop(callback);
        for listener in self.listeners.drain(..) {
            let _ = self.window.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        self.driver.borrow_mut().destroy();
    }

    pub fn scroll_to(&self, target: &ScrollTarget, options: ScrollOptions) {
        self.driver.borrow_mut().scroll_to(target, options);
    }

    pub fn scroll_to_top(&self) {
        self.scroll_to(
            &ScrollTarget::Offset(0.0),
            ScrollOptions {
                offset: None,
                duration: Some(tuning::TOP_DURATION_SECS),
            },
        );
    }

    fn add_listener(
        &mut self,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<(), JsValue> {
        // Not passive: intercepted input has its default prevented
        let mut options = AddEventListenerOptions::new();
        options.passive(false);
        self.window.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        self.listeners.push(Listener { kind, callback });
        Ok(())
    }

    fn listen_wheel(&mut self) -> Result<(), JsValue> {
        let gesture = self.driver.borrow().animator.options().gesture_orientation;
        let driver = Rc::downgrade(&self.driver);
        let window = self.window.clone();
        let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            // Pinch zoom
            if wheel.ctrl_key() {
                return;
            }
            let Some(driver) = driver.upgrade() else {
                return;
            };
            let raw = match gesture {
                Orientation::Vertical => wheel.delta_y(),
                Orientation::Horizontal => wheel.delta_x(),
            };
            if raw == 0.0 || opted_out(&event) {
                return;
            }
            event.prevent_default();
            let delta = normalize_wheel(raw, wheel.delta_mode(), viewport_height(&window));
            driver.borrow_mut().wheel(delta);
        });
        self.add_listener("wheel", callback)
    }

    fn listen_touch(&mut self) -> Result<(), JsValue> {
        let gesture = self.driver.borrow().animator.options().gesture_orientation;
        let last = Rc::new(Cell::new(None::<f64>));

        let touch_point = move |event: &TouchEvent| {
            event.touches().get(0).map(|touch| match gesture {
                Orientation::Vertical => f64::from(touch.client_y()),
                Orientation::Horizontal => f64::from(touch.client_x()),
            })
        };

        let start = {
            let last = last.clone();
            Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                if let Some(touch) = event.dyn_ref::<TouchEvent>() {
                    last.set(touch_point(touch));
                }
            })
        };

        let driver = Rc::downgrade(&self.driver);
        let moved = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(touch) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let (Some(previous), Some(current)) = (last.get(), touch_point(touch)) else {
                return;
            };
            let Some(driver) = driver.upgrade() else {
                return;
            };
            last.set(Some(current));
            if opted_out(&event) {
                return;
            }
            event.prevent_default();
            driver.borrow_mut().touch(previous - current);
        });

        self.add_listener("touchstart", start)?;
        self.add_listener("touchmove", moved)
    }
}

impl Drop for SmoothScroll {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Shared access to the page's scroll controller. Every operation is a
/// no-op while no controller is installed (reduced motion, or not mounted).
#[derive(Clone, Default)]
pub struct ScrollHandle {
    controller: Rc<RefCell<Option<SmoothScroll>>>,
}

impl PartialEq for ScrollHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
    }
}

impl ScrollHandle {
    pub fn is_active(&self) -> bool {
        self.controller.borrow().is_some()
    }

    pub fn scroll_to(&self, target: impl Into<ScrollTarget>, options: ScrollOptions) {
        if let Some(controller) = self.controller.borrow().as_ref() {
            controller.scroll_to(&target.into(), options);
        }
    }

    pub fn scroll_to_top(&self) {
        if let Some(controller) = self.controller.borrow().as_ref() {
            controller.scroll_to_top();
        }
    }

    /// Brings a section into view: animated when active, an instant jump otherwise.
    pub fn reveal(&self, selector: &str, options: ScrollOptions) {
        if self.is_active() {
            self.scroll_to(selector, options);
            return;
        }
        let element = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.query_selector(selector).ok().flatten());
        match element {
            Some(element) => element.scroll_into_view(),
            None => log::debug!("Scroll target {} not found", selector),
        }
    }

    /// Installs a running controller unless reduced motion is preferred.
    fn activate(&self, reduced: bool) {
        if reduced {
            log::info!("Reduced motion preferred, smooth scrolling disabled");
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut controller = SmoothScroll::new(window, DriverOptions::default());
        match controller.start() {
            Ok(()) => self.install(controller),
            Err(err) => log::warn!("Smooth scrolling unavailable: {:?}", err),
        }
    }

    fn install(&self, controller: SmoothScroll) {
        let previous = self.controller.borrow_mut().replace(controller);
        drop(previous);
    }

    fn release(&self) {
        let controller = self.controller.borrow_mut().take();
        if controller.is_some() {
            log::debug!("Smooth scrolling released");
        }
        drop(controller);
    }
}

#[hook]
fn use_reduced_motion() -> bool {
    let reduced = use_state(|| {
        web_sys::window()
            .map(|window| prefers_reduced_motion(&window))
            .unwrap_or(true)
    });

    {
        let reduced = reduced.clone();
        use_effect_with_deps(
            move |_| {
                let query = web_sys::window()
                    .and_then(|window| window.match_media(tuning::REDUCED_MOTION_QUERY).ok().flatten());
                let listener = query.as_ref().map(|query| {
                    let list = query.clone();
                    let listener = Closure::<dyn Fn()>::new(move || reduced.set(list.matches()));
                    let _ = query
                        .add_event_listener_with_callback("change", listener.as_ref().unchecked_ref());
                    listener
                });
                move || {
                    if let (Some(query), Some(listener)) = (query, listener) {
                        let _ = query.remove_event_listener_with_callback(
                            "change",
                            listener.as_ref().unchecked_ref(),
                        );
                    }
                }
            },
            (),
        );
    }

    *reduced
}

/// Owns a [`SmoothScroll`] for the lifetime of the calling component. The
/// controller is rebuilt or released whenever the reduced-motion preference flips.
#[hook]
pub fn use_smooth_scroll() -> ScrollHandle {
    let handle = use_state(ScrollHandle::default);
    let reduced = use_reduced_motion();

    {
        let handle = (*handle).clone();
        use_effect_with_deps(
            move |reduced: &bool| {
                handle.activate(*reduced);
                move || handle.release()
            },
            reduced,
        );
    }

    (*handle).clone()
}

#[derive(Properties, PartialEq)]
pub struct SmoothScrollProviderProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(SmoothScrollProvider)]
pub fn smooth_scroll_provider(props: &SmoothScrollProviderProps) -> Html {
    let handle = use_smooth_scroll();
    html! {
        <ContextProvider<ScrollHandle> context={handle}>
            { for props.children.iter() }
        </ContextProvider<ScrollHandle>>
    }
}

#[hook]
pub fn use_scroll() -> ScrollHandle {
    use_context::<ScrollHandle>().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_zero_offset_and_driver_duration() {
        assert_eq!(ScrollOptions::default().resolve(), (0.0, 1.2));
        let custom = ScrollOptions {
            offset: Some(-80.0),
            duration: Some(0.4),
        };
        assert_eq!(custom.resolve(), (-80.0, 0.4));
    }

    #[test]
    fn targets_from_numbers_and_selectors() {
        assert_eq!(ScrollTarget::from(250.0), ScrollTarget::Offset(250.0));
        assert_eq!(
            ScrollTarget::from("#leaks"),
            ScrollTarget::Selector("#leaks".to_string())
        );
    }

    #[test]
    fn wheel_modes_are_normalized_to_pixels() {
        assert_eq!(normalize_wheel(100.0, WheelEvent::DOM_DELTA_PIXEL, 800.0), 100.0);
        assert_eq!(normalize_wheel(3.0, WheelEvent::DOM_DELTA_LINE, 800.0), 48.0);
        assert_eq!(normalize_wheel(-1.0, WheelEvent::DOM_DELTA_PAGE, 800.0), -800.0);
    }

    #[test]
    fn inactive_handle_ignores_scroll_requests() {
        let handle = ScrollHandle::default();
        assert!(!handle.is_active());
        handle.scroll_to_top();
        handle.scroll_to("#leaks", ScrollOptions::default());
        handle.scroll_to(400.0, ScrollOptions { offset: Some(10.0), duration: None });
        handle.release();
        assert!(!handle.is_active());
    }

    #[test]
    fn handles_compare_by_shared_controller() {
        let handle = ScrollHandle::default();
        assert!(handle == handle.clone());
        assert!(handle != ScrollHandle::default());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    fn document() -> web_sys::Document {
        web_sys::window().and_then(|window| window.document()).expect("document")
    }

    #[wasm_bindgen_test]
    fn reduced_motion_installs_nothing() {
        let window = web_sys::window().expect("window");
        let before = window.scroll_y().unwrap_or(0.0);
        let handle = ScrollHandle::default();

        handle.activate(true);
        assert!(!handle.is_active());
        handle.scroll_to_top();
        handle.scroll_to(500.0, ScrollOptions::default());
        assert_eq!(window.scroll_y().unwrap_or(0.0), before);
    }

    #[wasm_bindgen_test]
    fn full_motion_installs_and_releases_a_controller() {
        let handle = ScrollHandle::default();
        handle.activate(false);
        assert!(handle.is_active());
        handle.scroll_to_top();
        handle.release();
        assert!(!handle.is_active());
    }

    #[wasm_bindgen_test]
    fn opted_out_subtrees_keep_native_wheel() {
        let document = document();
        let body = document.body().expect("body");
        let overlay = document.create_element("div").expect("overlay");
        overlay.set_attribute(SCROLL_PREVENT_ATTR, "").expect("attribute");
        let inner = document.create_element("p").expect("inner");
        overlay.append_child(&inner).expect("append inner");
        let outside = document.create_element("p").expect("outside");
        body.append_child(&overlay).expect("append overlay");
        body.append_child(&outside).expect("append outside");

        let event_on = |element: &Element| {
            let event = Event::new("wheel").expect("event");
            let _ = element.dispatch_event(&event);
            event
        };
        // target() stays set after dispatch
        assert!(opted_out(&event_on(&inner)));
        assert!(opted_out(&event_on(&overlay)));
        assert!(!opted_out(&event_on(&outside)));

        overlay.remove();
        outside.remove();
    }
}
