use crate::{identity::IdentityProvider, listeners::ListenerSet};
use core::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{error, info, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, UnwrapThrowExt};
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement};

/// The maximum nesting depth. A box at this depth can never spawn replies:
/// its reply button is disabled on attach and [`CommentBox::reply`] refuses
/// defensively besides.
pub const NESTING_LIMIT: u8 = 3;

/// One comment (root or reply) with its own edit/display state.
///
/// A `CommentBox` owns its visual structure and zero or more child boxes of
/// the same type, forming a tree whose depth is bounded by [`NESTING_LIMIT`].
/// Construction builds the DOM structure but wires no event handling; that is
/// deferred to [`attach`](`CommentBox::attach`), mirroring a mount lifecycle.
///
/// # Correct use
///
/// Keep the returned [`Rc`] alive for as long as the box is on the page.
/// Event handlers hold only [`Weak`] references, so once the last handle is
/// dropped the buttons go dead (the handlers themselves are released, they
/// don't start throwing into JavaScript).
pub struct CommentBox {
	depth: u8,
	like_count: Cell<u32>,
	editable: Cell<bool>,
	comment_text: RefCell<Option<String>>,
	author_name: RefCell<Option<String>>,
	children: RefCell<Vec<Rc<CommentBox>>>,
	identity: Rc<dyn IdentityProvider>,
	listeners: RefCell<ListenerSet>,
	dom: WidgetDom,
}

/// The per-instance structure, built fresh for each box (no shared template).
///
/// Class names are the only contract with the external stylesheet.
struct WidgetDom {
	root: HtmlElement,
	edit: HtmlElement,
	input: HtmlInputElement,
	submit_btn: HtmlButtonElement,
	display: HtmlElement,
	comment: HtmlElement,
	author: HtmlElement,
	likes: HtmlElement,
	like_btn: HtmlButtonElement,
	reply_btn: HtmlButtonElement,
	reply_box: HtmlElement,
}

impl WidgetDom {
	fn build(document: &Document) -> Self {
		let root = div(document, "comment-box");

		let edit = div(document, "comment-edit");
		let input = document
			.create_element("input")
			.unwrap_throw()
			.dyn_into::<HtmlInputElement>()
			.unwrap_throw();
		input.set_type("text");
		input.set_class_name("comment-input");
		let submit_btn = button(document, "submit-btn", "Submit");
		append(&edit, &input);
		append(&edit, &submit_btn);

		let display = div(document, "comment-display");
		let comment = paragraph(document, "comment", "Comment");
		let author = paragraph(document, "author", "Author:");
		let likes = paragraph(document, "likes", &likes_label(0));
		let like_btn = button(document, "like-btn", "Like");
		let reply_btn = button(document, "reply-btn", "Reply");
		let reply_box = div(document, "reply-box");
		append(&display, &comment);
		append(&display, &author);
		append(&display, &likes);
		append(&display, &like_btn);
		append(&display, &reply_btn);
		append(&display, &reply_box);

		append(&root, &edit);
		append(&root, &display);

		Self {
			root,
			edit,
			input,
			submit_btn,
			display,
			comment,
			author,
			likes,
			like_btn,
			reply_btn,
			reply_box,
		}
	}
}

impl CommentBox {
	/// Creates a box at `depth` in the editing state: no text, no author,
	/// zero likes, no children, nothing wired.
	#[must_use]
	pub fn new(depth: u8, identity: Rc<dyn IdentityProvider>) -> Rc<Self> {
		let document = web_sys::window()
			.expect_throw("comment-box: No window to create elements in.")
			.document()
			.expect_throw("comment-box: No document to create elements in.");
		Rc::new(Self {
			depth,
			like_count: Cell::new(0),
			editable: Cell::new(true),
			comment_text: RefCell::new(None),
			author_name: RefCell::new(None),
			children: RefCell::new(Vec::new()),
			identity,
			listeners: RefCell::new(ListenerSet::new()),
			dom: WidgetDom::build(&document),
		})
	}

	/// A top-level box, depth 0.
	#[must_use]
	pub fn new_root(identity: Rc<dyn IdentityProvider>) -> Rc<Self> {
		Self::new(0, identity)
	}

	/// Wires the box for use once it is part of the live page: click handlers
	/// for submit and like, a click handler for reply only below
	/// [`NESTING_LIMIT`] (at the ceiling the button is disabled instead), and
	/// the initial visibility (edit shown, display hidden).
	///
	/// Calling `attach` on an already attached box is a logged no-op.
	pub fn attach(self: &Rc<Self>) {
		let mut listeners = self.listeners.borrow_mut();
		if !listeners.is_empty() {
			warn!("attach() called on an already attached comment box. Ignoring.");
			return;
		}

		listeners.listen(self.dom.submit_btn.as_ref(), "click", self.handler(Self::submit));
		listeners.listen(self.dom.like_btn.as_ref(), "click", self.handler(Self::like));
		if self.depth < NESTING_LIMIT {
			listeners.listen(self.dom.reply_btn.as_ref(), "click", self.handler(Self::reply));
		} else {
			trace!("Depth {} is at the nesting limit. Disabling the reply button.", self.depth);
			self.dom.reply_btn.set_disabled(true);
		}

		hide(&self.dom.display);
		show(&self.dom.edit);
	}

	/// Releases exactly the handlers [`attach`](`CommentBox::attach`)
	/// registered, for the whole subtree. Safe without a prior attach and
	/// safe to call twice.
	pub fn detach(&self) {
		for child in self.children.borrow().iter() {
			child.detach();
		}
		let mut listeners = self.listeners.borrow_mut();
		if listeners.is_empty() {
			warn!("detach() called on a comment box with no registered listeners. Ignoring.");
			return;
		}
		let released = listeners.release_all();
		info!("Released {} event listener(s).", released);
	}

	/// Appends the box to `parent` and attaches it. This is how a page
	/// instantiates a root box.
	pub fn mount(self: &Rc<Self>, parent: &web_sys::Element) {
		if let Err(error) = parent.append_child(self.dom.root.as_ref()) {
			error!("Failed to append comment box to parent: {:?}", error);
			return;
		}
		self.attach();
	}

	/// Detaches the subtree and removes the box's element from the page.
	pub fn unmount(&self) {
		self.detach();
		self.dom.root.remove();
	}

	/// Captures the input's current value as the comment text and the ambient
	/// identity as the author, then flips from the edit view to the display
	/// view. Empty submissions are accepted and displayed as empty.
	///
	/// Not guarded against re-invocation: a second call overwrites text and
	/// author again. The hidden edit view prevents this in normal UI flow.
	pub fn submit(&self) {
		let text = self.dom.input.value();
		let user = self.identity.current_user();
		if user.is_none() {
			warn!("No ambient identity at submission time. Using an empty author label.");
		}

		self.dom.comment.set_text_content(Some(&text));
		self.dom.author.set_text_content(Some(&author_label(user.as_deref())));
		hide(&self.dom.edit);
		show(&self.dom.display);

		trace!("Submitted comment at depth {} by {:?}.", self.depth, user);
		*self.comment_text.borrow_mut() = Some(text);
		*self.author_name.borrow_mut() = Some(user.unwrap_or_default());
		self.editable.set(false);
	}

	/// Increments the like count by exactly 1 and re-renders the label.
	/// No upper bound, no debounce, no state guard: liking an unsubmitted
	/// box counts too.
	pub fn like(&self) {
		let count = self.like_count.get().saturating_add(1);
		self.like_count.set(count);
		self.dom.likes.set_text_content(Some(&likes_label(count)));
	}

	/// Spawns a reply box at `depth + 1` and prepends it into the reply
	/// container, newest-first. The new box is independently editable and
	/// independently subject to the nesting rule.
	///
	/// Past the nesting ceiling this is a logged no-op, not an error. The
	/// disabled reply button already makes it unreachable from the UI.
	pub fn reply(&self) {
		if self.depth >= NESTING_LIMIT {
			warn!("reply() called at depth {} (nesting limit {}). Ignoring.", self.depth, NESTING_LIMIT);
			return;
		}

		let child = Self::new(self.depth + 1, Rc::clone(&self.identity));
		let first = self.dom.reply_box.first_child();
		if let Err(error) = self.dom.reply_box.insert_before(child.dom.root.as_ref(), first.as_ref()) {
			error!("Failed to insert reply box: {:?}", error);
			return;
		}
		child.attach();
		self.children.borrow_mut().insert(0, child);
	}

	/// Wraps a method in a JS-callable handler holding only a [`Weak`]
	/// reference to this box.
	fn handler(self: &Rc<Self>, method: fn(&Self)) -> Closure<dyn Fn(web_sys::Event)> {
		let weak: Weak<Self> = Rc::downgrade(self);
		Closure::wrap(Box::new(move |_event: web_sys::Event| match weak.upgrade() {
			Some(node) => method(&node),
			None => warn!("Event arrived after the comment box was dropped. Ignoring."),
		}) as Box<dyn Fn(web_sys::Event)>)
	}

	#[must_use]
	pub fn depth(&self) -> u8 {
		self.depth
	}

	#[must_use]
	pub fn like_count(&self) -> u32 {
		self.like_count.get()
	}

	#[must_use]
	pub fn is_editable(&self) -> bool {
		self.editable.get()
	}

	/// The submitted text, or [`None`] before submission.
	#[must_use]
	pub fn comment_text(&self) -> Option<String> {
		self.comment_text.borrow().clone()
	}

	/// The author captured at submission time, or [`None`] before submission.
	/// A submission without ambient identity yields an empty string.
	#[must_use]
	pub fn author_name(&self) -> Option<String> {
		self.author_name.borrow().clone()
	}

	/// The reply boxes, newest-first.
	#[must_use]
	pub fn replies(&self) -> Vec<Rc<CommentBox>> {
		self.children.borrow().clone()
	}

	/// The box's root element, `div.comment-box`.
	#[must_use]
	pub fn element(&self) -> &HtmlElement {
		&self.dom.root
	}
}

fn append(parent: &HtmlElement, child: &impl AsRef<web_sys::Node>) {
	if let Err(error) = parent.append_child(child.as_ref()) {
		error!("Failed to append element: {:?}", error);
	}
}

fn div(document: &Document, class: &str) -> HtmlElement {
	let element = document
		.create_element("div")
		.unwrap_throw()
		.dyn_into::<HtmlElement>()
		.unwrap_throw();
	element.set_class_name(class);
	element
}

fn paragraph(document: &Document, class: &str, text: &str) -> HtmlElement {
	let element = document
		.create_element("p")
		.unwrap_throw()
		.dyn_into::<HtmlElement>()
		.unwrap_throw();
	element.set_class_name(class);
	element.set_text_content(Some(text));
	element
}

fn button(document: &Document, class: &str, label: &str) -> HtmlButtonElement {
	let element = document
		.create_element("button")
		.unwrap_throw()
		.dyn_into::<HtmlButtonElement>()
		.unwrap_throw();
	element.set_class_name(class);
	element.set_text_content(Some(label));
	element
}

fn hide(element: &HtmlElement) {
	if let Err(error) = element.style().set_property("display", "none") {
		error!("Failed to hide element: {:?}", error);
	}
}

fn show(element: &HtmlElement) {
	if let Err(error) = element.style().set_property("display", "block") {
		error!("Failed to show element: {:?}", error);
	}
}

fn author_label(user: Option<&str>) -> String {
	format!("Author: {}", user.unwrap_or(""))
}

fn likes_label(count: u32) -> String {
	format!("Likes: {}", count)
}

#[cfg(test)]
mod tests {
	use super::{author_label, likes_label, NESTING_LIMIT};

	#[test]
	fn author_label_includes_user() {
		assert_eq!(author_label(Some("John")), "Author: John");
	}

	#[test]
	fn author_label_without_identity_is_empty_after_colon() {
		assert_eq!(author_label(None), "Author: ");
	}

	#[test]
	fn likes_label_renders_count() {
		assert_eq!(likes_label(0), "Likes: 0");
		assert_eq!(likes_label(5), "Likes: 5");
	}

	#[test]
	fn nesting_limit_is_three_levels() {
		assert_eq!(NESTING_LIMIT, 3);
	}
}
