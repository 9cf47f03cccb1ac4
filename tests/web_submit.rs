#![cfg(target_arch = "wasm32")]

use comment_box::{identity::seed_current_user, CommentBox, IdentityProvider, SessionIdentity};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, HtmlBodyElement, HtmlElement, HtmlInputElement};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn body() -> HtmlBodyElement {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
	window().unwrap().document().unwrap().body().unwrap().dyn_into::<HtmlBodyElement>().unwrap()
}

fn control<T: JsCast>(root: &HtmlElement, selector: &str) -> T {
	root.query_selector(selector).unwrap().unwrap().dyn_into::<T>().unwrap()
}

#[wasm_bindgen_test]
fn submit_shows_comment_author_and_likes() {
	let body = body();
	seed_current_user("John");

	let root = CommentBox::new_root(Rc::new(SessionIdentity));
	root.mount(body.as_ref());

	control::<HtmlInputElement>(root.element(), ".comment-input").set_value("hello");
	control::<HtmlElement>(root.element(), ".submit-btn").click();

	assert_eq!(root.comment_text().as_deref(), Some("hello"));
	assert_eq!(root.author_name().as_deref(), Some("John"));
	assert!(!root.is_editable());
	assert_eq!(root.like_count(), 0);

	assert_eq!(control::<HtmlElement>(root.element(), ".comment").text_content().unwrap(), "hello");
	assert_eq!(control::<HtmlElement>(root.element(), ".author").text_content().unwrap(), "Author: John");
	assert_eq!(control::<HtmlElement>(root.element(), ".likes").text_content().unwrap(), "Likes: 0");

	root.unmount();
}

#[wasm_bindgen_test]
fn submit_without_identity_falls_back_to_empty_author() {
	struct NoIdentity;
	impl IdentityProvider for NoIdentity {
		fn current_user(&self) -> Option<String> {
			None
		}
	}

	let body = body();
	let root = CommentBox::new_root(Rc::new(NoIdentity));
	root.mount(body.as_ref());

	control::<HtmlInputElement>(root.element(), ".comment-input").set_value("orphaned");
	control::<HtmlElement>(root.element(), ".submit-btn").click();

	assert_eq!(root.author_name().as_deref(), Some(""));
	assert_eq!(control::<HtmlElement>(root.element(), ".author").text_content().unwrap(), "Author: ");

	root.unmount();
}

#[wasm_bindgen_test]
fn submit_accepts_empty_text() {
	let body = body();
	seed_current_user("John");

	let root = CommentBox::new_root(Rc::new(SessionIdentity));
	root.mount(body.as_ref());

	control::<HtmlElement>(root.element(), ".submit-btn").click();

	assert_eq!(root.comment_text().as_deref(), Some(""));
	assert!(!root.is_editable());
	assert_eq!(control::<HtmlElement>(root.element(), ".comment").text_content().unwrap(), "");

	root.unmount();
}
