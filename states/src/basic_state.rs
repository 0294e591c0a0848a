use std::any::Any;

use chrono::{DateTime, Utc};

use crate::{SnapshotClone, State};

/// Wall-clock time as last observed by the front end.
///
/// The front end advances it once per frame; anything time-based reads it from here so
/// tests can pin the clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct Time {
    virt: DateTime<Utc>,
}

impl Time {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { virt: now }
    }

    pub fn now() -> Self {
        Self::new(Utc::now())
    }
}

impl SnapshotClone for Time {
    fn clone_boxed(&self) -> Option<Box<dyn Any + Send>> {
        Some(Box::new(*self))
    }
}

impl State for Time {}

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
