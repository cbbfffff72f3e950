use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Caller-owned event handler stored in a node descriptor.
///
/// Cloning shares the same closure. The builder never invokes it; only the
/// listener attached by the renderer does.
pub struct Callback<A> {
    handler: Rc<dyn Fn(A)>,
}

impl<A> Callback<A> {
    pub fn new(handler: impl Fn(A) + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }

    pub fn call(&self, argument: A) {
        (self.handler)(argument)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handler, &other.handler)
    }
}

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
        }
    }
}

impl<A> Debug for Callback<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Callback(..)")
    }
}

pub type ClickCallback = Callback<()>;
pub type ValueCallback = Callback<String>;
pub type CheckedCallback = Callback<bool>;
