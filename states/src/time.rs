use std::any::Any;

use chrono::{DateTime, Utc};

use crate::state::{State, state_assign_impl};

/// Virtual clock state.
///
/// The app writes the wall clock into it every frame; tests pin it to fixed
/// instants so time-dependent logic stays deterministic.
#[derive(Debug, Clone, Default)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Time {
    pub fn new(virt: DateTime<Utc>) -> Self {
        Self { virt }
    }
}

impl State for Time {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn snapshot(&self) -> Option<Box<dyn Any + Send + 'static>> {
        Some(Box::new(self.clone()))
    }

    fn assign_box(&mut self, new_self: Box<dyn Any + Send>) {
        state_assign_impl(self, new_self);
    }
}

impl AsMut<DateTime<Utc>> for Time {
    fn as_mut(&mut self) -> &mut DateTime<Utc> {
        &mut self.virt
    }
}

impl AsRef<DateTime<Utc>> for Time {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.virt
    }
}
