use rapier2d::prelude::*;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// The player character
    Player = 0b0000_0001,

    /// Static platforms and walls
    Platform = 0b0000_0010,

    /// Enemies: stomp from above, lethal from the side
    Hazard = 0b0000_0100,

    /// Finish flag zone
    Goal = 0b0000_1000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // The player meets everything in the level
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Platform as u32
                    | CollisionGroups::Hazard as u32
                    | CollisionGroups::Goal as u32,
            ),

            // Level pieces only care about the player
            CollisionGroups::Platform | CollisionGroups::Hazard | CollisionGroups::Goal => {
                Group::from_bits_truncate(CollisionGroups::Player as u32)
            }
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Collision event reported by the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

impl CollisionEvent {
    /// The collider paired with `subject`, if the event involves it
    pub fn other(&self, subject: ColliderHandle) -> Option<ColliderHandle> {
        let (a, b) = match *self {
            Self::Started {
                collider1,
                collider2,
            }
            | Self::Stopped {
                collider1,
                collider2,
            } => (collider1, collider2),
        };

        if a == subject {
            Some(b)
        } else if b == subject {
            Some(a)
        } else {
            None
        }
    }
}

/// Queue for storing collision events during a physics step.
///
/// Rapier's event handler must be `Sync`, hence the mutex.
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))), // Pre-allocate for common case
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this step
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Whether a contact just began or is continuing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// First step of the contact
    Started,
    /// Every later step while the contact persists
    Sustained,
}

/// A contact between the tracked collider and another one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub other: ColliderHandle,
    pub phase: ContactPhase,
}

/// Turns start/stop events into per-step contact phases for one collider
#[derive(Debug)]
pub struct ContactTracker {
    subject: ColliderHandle,
    touching: HashSet<ColliderHandle>,
}

impl ContactTracker {
    pub fn new(subject: ColliderHandle) -> Self {
        Self {
            subject,
            touching: HashSet::new(),
        }
    }

    /// Feed one physics step's events; returns every contact the subject
    /// has after the step. A contact that starts and stops within the same
    /// step is reported once as `Started`.
    pub fn process(&mut self, events: &[CollisionEvent]) -> Vec<Contact> {
        let mut contacts = Vec::new();
        let mut started = HashSet::new();

        for event in events {
            let Some(other) = event.other(self.subject) else {
                continue;
            };

            match event {
                CollisionEvent::Started { .. } => {
                    if self.touching.insert(other) {
                        started.insert(other);
                        contacts.push(Contact {
                            other,
                            phase: ContactPhase::Started,
                        });
                    }
                }
                CollisionEvent::Stopped { .. } => {
                    self.touching.remove(&other);
                }
            }
        }

        contacts.extend(
            self.touching
                .iter()
                .filter(|other| !started.contains(*other))
                .map(|&other| Contact {
                    other,
                    phase: ContactPhase::Sustained,
                }),
        );
        contacts
    }
}
