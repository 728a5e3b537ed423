use crate::core::component::impl_component;
use serde::Serialize;

/// A unit flowing through the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Set once, by the server that processes the product
    pub filled: bool,
}

impl_component!(Product);
