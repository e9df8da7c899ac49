//! Pointer routing
//!
//! Turns raw samples of the single active contact into per-widget
//! [`PointerEvent`]s by hit-testing rectangular regions. Because the router
//! knows both the region being left and the one being entered, every `Exit`
//! carries an accurate `entered` target.

use crate::arbiter::WidgetId;
use crate::pad::PointerEvent;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Screen position of the contact
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned hit region, half-open on the far edges
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    /// Zero, negative or non-finite sizes can never be hit
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Hit-tests the single contact against registered regions
#[derive(Debug, Default)]
pub struct PointerRouter {
    regions: Vec<(WidgetId, Region)>,
    /// `Some(over)` while the contact is down
    contact: Option<Option<WidgetId>>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a widget's region. Later regions win overlaps.
    pub fn set_region(&mut self, id: WidgetId, region: Region) {
        self.regions.retain(|(w, _)| *w != id);
        self.regions.push((id, region));
    }

    pub fn remove_region(&mut self, id: WidgetId) {
        self.regions.retain(|(w, _)| *w != id);
        if self.contact == Some(Some(id)) {
            self.contact = Some(None);
        }
    }

    pub fn region(&self, id: WidgetId) -> Option<Region> {
        self.regions
            .iter()
            .find(|(w, _)| *w == id)
            .map(|(_, r)| *r)
    }

    pub fn hit_test(&self, p: Point) -> Option<WidgetId> {
        self.regions
            .iter()
            .rev()
            .find(|(_, r)| r.contains(p))
            .map(|(id, _)| *id)
    }

    pub fn is_down(&self) -> bool {
        self.contact.is_some()
    }

    /// Widget currently under the contact
    pub fn over(&self) -> Option<WidgetId> {
        self.contact.flatten()
    }

    /// Contact touched down at `p`
    pub fn contact_down(&mut self, p: Point) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if self.contact.is_some() {
            // Single contact only: a second down implies we missed the up
            debug!("contact down while already down, lifting first");
            events.extend(self.contact_cancel());
        }

        let hit = self.hit_test(p);
        self.contact = Some(hit);
        if let Some(id) = hit {
            events.push(PointerEvent::Down(id));
        }
        events
    }

    /// Contact moved to `p`
    pub fn contact_move(&mut self, p: Point) -> Vec<PointerEvent> {
        let Some(over) = self.contact else {
            return Vec::new();
        };

        let hit = self.hit_test(p);
        if hit == over {
            return Vec::new();
        }

        let mut events = Vec::with_capacity(2);
        if let Some(target) = over {
            events.push(PointerEvent::Exit {
                target,
                entered: hit,
            });
        }
        if let Some(target) = hit {
            events.push(PointerEvent::Enter { target, from: over });
        }
        self.contact = Some(hit);
        events
    }

    /// Contact lifted at `p`
    pub fn contact_up(&mut self, p: Point) -> Vec<PointerEvent> {
        let mut events = self.contact_move(p);
        events.extend(self.contact_cancel());
        events
    }

    /// Contact lost without a position (focus loss, touch cancel)
    pub fn contact_cancel(&mut self) -> Vec<PointerEvent> {
        match self.contact.take() {
            Some(Some(id)) => vec![PointerEvent::Up(id)],
            _ => Vec::new(),
        }
    }
}
