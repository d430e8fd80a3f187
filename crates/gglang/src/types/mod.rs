//! Runtime object types backing the value model.

pub(crate) mod class;
pub(crate) mod dict;

pub(crate) use class::{Class, Instance, SuperBinding};
pub(crate) use dict::Dict;
