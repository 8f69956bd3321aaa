//! Observers notified when a value's payload changes.

use thicket_core::{Datum, ValueId};

/// Receives every payload stored into the value it is attached to.
///
/// Listeners are called after generation and after
/// [`Model::set_value`](crate::Model::set_value); they are never called on
/// [`Model::reset`](crate::Model::reset).
pub trait ValueListener: Send + 'static {
    /// A new payload was stored.
    fn value_set(&mut self, id: ValueId, datum: &Datum);
}
