use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Payload of a widget's custom event (`event.detail`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDetail {
    pub value: Option<String>,
    pub checked: Option<bool>,
}

impl EventDetail {
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            checked: None,
        }
    }

    pub fn checked(checked: bool) -> Self {
        Self {
            value: None,
            checked: Some(checked),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomEvent {
    kind: String,
    detail: Option<EventDetail>,
    /// Current `value` property of the event target, filled in at dispatch.
    target_value: Option<String>,
}

impl DomEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            detail: None,
            target_value: None,
        }
    }

    pub fn click() -> Self {
        Self::new("click")
    }

    pub fn input() -> Self {
        Self::new("input")
    }

    pub fn change() -> Self {
        Self::new("change")
    }

    pub fn custom(kind: impl Into<String>, detail: EventDetail) -> Self {
        Self::new(kind).with_detail(detail)
    }

    pub fn with_detail(mut self, detail: EventDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_target_value(mut self, value: Option<String>) -> Self {
        self.target_value = value;
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn detail(&self) -> Option<&EventDetail> {
        self.detail.as_ref()
    }

    pub fn detail_value(&self) -> Option<&str> {
        self.detail.as_ref()?.value.as_deref()
    }

    pub fn detail_checked(&self) -> Option<bool> {
        self.detail.as_ref()?.checked
    }

    pub fn target_value(&self) -> Option<&str> {
        self.target_value.as_deref()
    }
}

/// Event listener registered on a document node.
#[derive(Clone)]
pub struct Listener {
    handler: Rc<dyn Fn(&DomEvent)>,
}

impl Listener {
    pub fn new(handler: impl Fn(&DomEvent) + 'static) -> Self {
        Self {
            handler: Rc::new(handler),
        }
    }

    pub fn handle(&self, event: &DomEvent) {
        (self.handler)(event)
    }
}

impl Debug for Listener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Listener(..)")
    }
}
