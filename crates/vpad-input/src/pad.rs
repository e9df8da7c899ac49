//! Button pad
//!
//! Owns a set of virtual buttons, the press arbiter and the input sink, and
//! routes pointer events to the addressed widget.

use crate::arbiter::{PressArbiter, WidgetId};
use crate::identity::ButtonIdentity;
use crate::sink::InputSink;
use crate::widget::{Dispatch, VirtualButton};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum PadError {
    #[error("Unknown widget: {0}")]
    UnknownWidget(WidgetId),

    #[error("Duplicate button name: {0}")]
    DuplicateName(String),

    #[error("Invalid identity for button {name}: {identity}")]
    InvalidIdentity {
        name: String,
        identity: ButtonIdentity,
    },
}

/// Pointer events as delivered by the UI layer, one contact at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Contact went down inside the widget
    Down(WidgetId),
    /// Contact lifted over the widget
    Up(WidgetId),
    /// Contact moved into the widget; `from` is what the source reports as
    /// the previous contact holder
    Enter {
        target: WidgetId,
        from: Option<WidgetId>,
    },
    /// Contact left the widget; `entered` is what it moved into, if anything
    Exit {
        target: WidgetId,
        entered: Option<WidgetId>,
    },
}

impl PointerEvent {
    /// Widget the event is addressed to
    pub fn target(&self) -> WidgetId {
        match *self {
            PointerEvent::Down(id) | PointerEvent::Up(id) => id,
            PointerEvent::Enter { target, .. } | PointerEvent::Exit { target, .. } => target,
        }
    }
}

/// A set of virtual buttons sharing one press
pub struct ButtonPad<S: InputSink> {
    widgets: Vec<Option<VirtualButton>>,
    arbiter: PressArbiter,
    sink: S,
}

impl<S: InputSink> ButtonPad<S> {
    pub fn new(sink: S) -> Self {
        Self {
            widgets: Vec::new(),
            arbiter: PressArbiter::new(),
            sink,
        }
    }

    /// Register a button. Names must be unique among live buttons.
    pub fn add(&mut self, button: VirtualButton) -> Result<WidgetId, PadError> {
        if self.find(button.name()).is_some() {
            return Err(PadError::DuplicateName(button.name().to_string()));
        }
        if !button.identity().is_valid() {
            return Err(PadError::InvalidIdentity {
                name: button.name().to_string(),
                identity: button.identity().clone(),
            });
        }

        let id = WidgetId(self.widgets.len());
        debug!("registered {} as {} ({})", button.name(), id, button.identity());
        self.widgets.push(Some(button));
        Ok(id)
    }

    /// Register a button without a feedback handle
    pub fn add_button(
        &mut self,
        name: &str,
        identity: ButtonIdentity,
    ) -> Result<WidgetId, PadError> {
        self.add(VirtualButton::new(name, identity))
    }

    /// Tear a button down. A held press is released first.
    pub fn remove(&mut self, id: WidgetId) -> Result<VirtualButton, PadError> {
        let slot = self
            .widgets
            .get_mut(id.index())
            .ok_or(PadError::UnknownWidget(id))?;
        let widget = slot.as_mut().ok_or(PadError::UnknownWidget(id))?;

        let mut ctx = Dispatch {
            arbiter: &mut self.arbiter,
            sink: &mut self.sink,
        };
        widget.on_deactivate(id, &mut ctx);

        info!("removed button {} ({})", widget.name(), id);
        slot.take().ok_or(PadError::UnknownWidget(id))
    }

    /// Route a pointer event. Returns true if the logical press state changed.
    ///
    /// Events for unknown or removed widgets are ignored.
    pub fn dispatch(&mut self, event: PointerEvent) -> bool {
        let Self {
            widgets,
            arbiter,
            sink,
        } = self;

        match event {
            PointerEvent::Down(id) => {
                let (widget, holder) = with_holder(widgets, id, arbiter.current());
                let Some(widget) = widget else {
                    return ignore(event);
                };
                widget.on_pointer_down(id, holder, &mut Dispatch { arbiter, sink })
            }
            PointerEvent::Up(id) => {
                let Some(widget) = slot_mut(widgets, id) else {
                    return ignore(event);
                };
                widget.on_pointer_up(id, &mut Dispatch { arbiter, sink })
            }
            PointerEvent::Enter { target, from } => {
                let owner = arbiter.current();
                if let Some(from) = from
                    && Some(from) != owner
                {
                    debug!("{} entered from {}, arbiter holder is {:?}", target, from, owner);
                }

                let (widget, holder) = with_holder(widgets, target, owner);
                let Some(widget) = widget else {
                    return ignore(event);
                };
                widget.on_pointer_enter(target, holder, &mut Dispatch { arbiter, sink })
            }
            PointerEvent::Exit { target, entered } => {
                let into_widget = entered.is_some_and(|e| is_live(widgets, e));
                let Some(widget) = slot_mut(widgets, target) else {
                    return ignore(event);
                };
                widget.on_pointer_exit(target, into_widget, &mut Dispatch { arbiter, sink })
            }
        }
    }

    pub fn dispatch_all(&mut self, events: impl IntoIterator<Item = PointerEvent>) {
        for event in events {
            self.dispatch(event);
        }
    }

    /// Per-frame update: held directional buttons re-assert their axis
    pub fn tick(&mut self) {
        for widget in self.widgets.iter().flatten() {
            widget.tick(&mut self.sink);
        }
    }

    /// Hide a button. Returns true if a held press had to be released.
    pub fn deactivate(&mut self, id: WidgetId) -> Result<bool, PadError> {
        let widget = slot_mut(&mut self.widgets, id).ok_or(PadError::UnknownWidget(id))?;
        let mut ctx = Dispatch {
            arbiter: &mut self.arbiter,
            sink: &mut self.sink,
        };
        Ok(widget.on_deactivate(id, &mut ctx))
    }

    pub fn activate(&mut self, id: WidgetId) -> Result<(), PadError> {
        let widget = slot_mut(&mut self.widgets, id).ok_or(PadError::UnknownWidget(id))?;
        widget.on_activate();
        Ok(())
    }

    /// Force every held press up
    pub fn release_all(&mut self) {
        let mut ctx = Dispatch {
            arbiter: &mut self.arbiter,
            sink: &mut self.sink,
        };
        for (index, slot) in self.widgets.iter_mut().enumerate() {
            if let Some(widget) = slot {
                widget.release(WidgetId(index), &mut ctx);
            }
        }
    }

    pub fn widget(&self, id: WidgetId) -> Option<&VirtualButton> {
        self.widgets.get(id.index()).and_then(|w| w.as_ref())
    }

    pub fn find(&self, name: &str) -> Option<WidgetId> {
        self.iter()
            .find(|(_, w)| w.name() == name)
            .map(|(id, _)| id)
    }

    /// Live buttons with their ids
    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &VirtualButton)> {
        self.widgets
            .iter()
            .enumerate()
            .filter_map(|(i, w)| w.as_ref().map(|w| (WidgetId(i), w)))
    }

    pub fn len(&self) -> usize {
        self.widgets.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_pressed(&self, id: WidgetId) -> bool {
        self.widget(id).is_some_and(|w| w.is_pressed())
    }

    /// All buttons whose local flag is set. Never more than one.
    pub fn pressed(&self) -> Vec<WidgetId> {
        self.iter()
            .filter(|(_, w)| w.is_pressed())
            .map(|(id, _)| id)
            .collect()
    }

    /// Press owner according to the arbiter
    pub fn current(&self) -> Option<WidgetId> {
        self.arbiter.current()
    }

    pub fn arbiter(&self) -> &PressArbiter {
        &self.arbiter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: InputSink> Drop for ButtonPad<S> {
    fn drop(&mut self) {
        self.release_all();
    }
}

fn ignore(event: PointerEvent) -> bool {
    debug!("ignoring {:?}: no button {}", event, event.target());
    false
}

fn slot_mut(widgets: &mut [Option<VirtualButton>], id: WidgetId) -> Option<&mut VirtualButton> {
    widgets.get_mut(id.index()).and_then(|w| w.as_mut())
}

fn is_live(widgets: &[Option<VirtualButton>], id: WidgetId) -> bool {
    widgets
        .get(id.index())
        .and_then(|w| w.as_ref())
        .is_some_and(|w| w.is_active())
}

/// Borrow `target` together with the press owner, when that is another widget
fn with_holder(
    widgets: &mut [Option<VirtualButton>],
    target: WidgetId,
    owner: Option<WidgetId>,
) -> (Option<&mut VirtualButton>, Option<&mut VirtualButton>) {
    let owner = owner.filter(|o| *o != target);
    let mut first = None;
    let mut second = None;
    for (index, slot) in widgets.iter_mut().enumerate() {
        if index == target.index() {
            first = slot.as_mut();
        } else if Some(index) == owner.map(WidgetId::index) {
            second = slot.as_mut();
        }
    }
    (first, second)
}
