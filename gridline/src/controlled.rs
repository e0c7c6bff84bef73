//! Controlled/uncontrolled state adapter.
//!
//! Selection, expansion, sorting and pagination each hold their value in
//! a [`Controlled`]. Uncontrolled, the adapter owns the value and `set`
//! stores it. Controlled, the caller owns the truth: the adapter mirrors
//! whatever [`Controlled::sync`] last supplied and `set` only hands the
//! proposed value back so it can be reported upward.

/// Who owns the current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ownership {
    #[default]
    Uncontrolled,
    Controlled,
}

#[derive(Debug, Clone, Default)]
pub struct Controlled<V> {
    value: V,
    ownership: Ownership,
}

impl<V: Clone> Controlled<V> {
    /// Locally owned state starting at `initial`.
    pub fn uncontrolled(initial: V) -> Self {
        Self {
            value: initial,
            ownership: Ownership::Uncontrolled,
        }
    }

    /// Caller-owned state mirroring `external`.
    pub fn controlled(external: V) -> Self {
        Self {
            value: external,
            ownership: Ownership::Controlled,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn is_controlled(&self) -> bool {
        self.ownership == Ownership::Controlled
    }

    /// Propose a new value.
    ///
    /// Stored only when uncontrolled. Either way the proposed value is
    /// returned for reporting.
    pub fn set(&mut self, next: V) -> V {
        if self.ownership == Ownership::Uncontrolled {
            self.value = next.clone();
        }
        next
    }

    /// Mirror an externally supplied value. Switches to controlled.
    pub fn sync(&mut self, external: V) {
        self.value = external;
        self.ownership = Ownership::Controlled;
    }

    /// Hand ownership back to the adapter, keeping the current value.
    pub fn release(&mut self) {
        self.ownership = Ownership::Uncontrolled;
    }
}
