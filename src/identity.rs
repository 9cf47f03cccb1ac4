use tracing::warn;

/// The [***sessionStorage***](https://developer.mozilla.org/en-US/docs/Web/API/Window/sessionStorage) key
/// the surrounding page writes the current user's name to.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Ambient identity, read once per submission to label the comment's author.
///
/// The widget never writes identity state. Passing the provider in explicitly
/// (rather than reading a process-wide store from within the widget) lets
/// tests substitute values without touching shared browser state.
pub trait IdentityProvider {
	/// The current user's name, or [`None`] if no identity is established.
	fn current_user(&self) -> Option<String>;
}

/// Reads [`CURRENT_USER_KEY`] from the window's session storage.
///
/// Every platform failure (no window, storage access denied, key absent)
/// resolves to [`None`]; the widget then falls back to an empty author label.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionIdentity;

impl IdentityProvider for SessionIdentity {
	fn current_user(&self) -> Option<String> {
		let window = match web_sys::window() {
			Some(window) => window,
			None => {
				warn!("No window available to read session storage from.");
				return None;
			}
		};
		let storage = match window.session_storage() {
			Ok(Some(storage)) => storage,
			Ok(None) => return None,
			Err(error) => {
				warn!("Failed to access session storage: {:?}", error);
				return None;
			}
		};
		match storage.get_item(CURRENT_USER_KEY) {
			Ok(user) => user,
			Err(error) => {
				warn!("Failed to read {:?} from session storage: {:?}", CURRENT_USER_KEY, error);
				None
			}
		}
	}
}

/// A fixed identity for tests and headless use.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub String);

impl IdentityProvider for FixedIdentity {
	fn current_user(&self) -> Option<String> {
		Some(self.0.clone())
	}
}

/// Writes `name` under [`CURRENT_USER_KEY`] in the window's session storage.
/// A page bootstrap calls this once to establish ambient identity before the
/// first comment box is created.
///
/// Storage failures are logged and ignored; a later submission without an
/// identity falls back to an empty author label.
pub fn seed_current_user(name: &str) {
	let storage = web_sys::window().and_then(|window| match window.session_storage() {
		Ok(storage) => storage,
		Err(error) => {
			warn!("Failed to access session storage: {:?}", error);
			None
		}
	});
	match storage {
		Some(storage) => {
			if let Err(error) = storage.set_item(CURRENT_USER_KEY, name) {
				warn!("Failed to write {:?} to session storage: {:?}", CURRENT_USER_KEY, error);
			}
		}
		None => warn!("No session storage available to seed {:?} into.", CURRENT_USER_KEY),
	}
}
