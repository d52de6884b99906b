//! The Randomizer trait and its forwarding impls.
//!
//! RULE: Every value strategy implements Randomizer<T>.
//! Randomizers are configured once at construction and never fail
//! while generating. Any draw they need comes from the SharedSource
//! they were built with.

use std::rc::Rc;

/// The contract every randomizer must fulfill.
pub trait Randomizer<T> {
    /// Produce one value. Consumes zero or more draws from the shared source.
    fn random_value(&self) -> T;
}

impl<T, R: Randomizer<T> + ?Sized> Randomizer<T> for &R {
    fn random_value(&self) -> T {
        (**self).random_value()
    }
}

impl<T, R: Randomizer<T> + ?Sized> Randomizer<T> for Box<R> {
    fn random_value(&self) -> T {
        (**self).random_value()
    }
}

impl<T, R: Randomizer<T> + ?Sized> Randomizer<T> for Rc<R> {
    fn random_value(&self) -> T {
        (**self).random_value()
    }
}

/// Always yields a clone of the same value. Draws nothing.
#[derive(Debug, Clone)]
pub struct ConstantRandomizer<T> {
    value: T,
}

impl<T: Clone> ConstantRandomizer<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> Randomizer<T> for ConstantRandomizer<T> {
    fn random_value(&self) -> T {
        self.value.clone()
    }
}
