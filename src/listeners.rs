use js_sys::Function;
use tracing::{error, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::EventTarget;

/// One registration made through [`ListenerSet::listen`].
///
/// Holds the target and event name alongside the [`Closure`] so that release
/// removes exactly the listener that was added, rather than re-querying for
/// the control by name.
struct Registration {
	target: EventTarget,
	event: &'static str,
	closure: Closure<dyn Fn(web_sys::Event)>,
}

/// An owned list of event-listener registrations.
///
/// Every handler registered through [`listen`](`ListenerSet::listen`) is
/// released by [`release_all`](`ListenerSet::release_all`), or on drop if the
/// set still holds registrations then. The closures stay alive exactly as
/// long as they are registered, so the browser never invokes a freed handler.
#[derive(Default)]
pub struct ListenerSet(Vec<Registration>);

impl ListenerSet {
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Adds `closure` as a listener for `event` on `target` and records the
	/// registration for later release.
	///
	/// Registration failures are logged and the closure is dropped; the
	/// widget then simply lacks that affordance.
	pub fn listen(&mut self, target: &EventTarget, event: &'static str, closure: Closure<dyn Fn(web_sys::Event)>) {
		match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref::<Function>()) {
			Ok(()) => {
				trace!("Added {:?} listener.", event);
				self.0.push(Registration {
					target: target.clone(),
					event,
					closure,
				});
			}
			Err(error) => error!("Failed to add {:?} listener: {:?}", event, error),
		}
	}

	/// Removes every recorded listener from its target and drops the
	/// closures. Returns the number of releases performed.
	pub fn release_all(&mut self) -> usize {
		let mut released = 0;
		for Registration { target, event, closure } in self.0.drain(..) {
			match target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref::<Function>()) {
				Ok(()) => {
					trace!("Removed {:?} listener.", event);
					released += 1;
				}
				Err(error) => error!("Failed to remove {:?} listener: {:?}", event, error),
			}
		}
		released
	}
}

impl Drop for ListenerSet {
	fn drop(&mut self) {
		if !self.0.is_empty() {
			trace!("Releasing {} listener(s) on drop.", self.0.len());
			self.release_all();
		}
	}
}
