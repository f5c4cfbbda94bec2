//! Swappable tree policies.
//!
//! A tree is parameterized by two independent policies:
//!
//! | Policy | Implementations | Governs |
//! |--------|-----------------|---------|
//! | [`Lookup`] | [`Strict`], [`Nullable`] | failed id / property lookups |
//! | [`Mutability`] | [`ReadOnly`], [`Writable`] | whether mutation methods exist |
//!
//! Build-time parent inconsistencies go through a third, injected strategy:
//! [`BuildWarningPolicy`].

use crate::error::{ParentFault, TreeError};
use crate::id::NodeId;
use crate::node::Node;

/// What a failed lookup turns into.
pub trait Lookup: 'static {
    type Output<T>;

    fn found<T>(value: T) -> Self::Output<T>;

    fn missing<T>(error: TreeError) -> Self::Output<T>;
}

/// Failed lookups are errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl Lookup for Strict {
    type Output<T> = Result<T, TreeError>;

    fn found<T>(value: T) -> Self::Output<T> {
        Ok(value)
    }

    fn missing<T>(error: TreeError) -> Self::Output<T> {
        Err(error)
    }
}

/// Failed lookups are `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nullable;

impl Lookup for Nullable {
    type Output<T> = Option<T>;

    fn found<T>(value: T) -> Self::Output<T> {
        Some(value)
    }

    fn missing<T>(_error: TreeError) -> Self::Output<T> {
        None
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Capability marker: [`Writable`] trees expose the mutation methods.
pub trait Mutability: sealed::Sealed + 'static {
    const WRITABLE: bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

#[derive(Debug, Clone, Copy, Default)]
pub struct Writable;

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for Writable {}

impl Mutability for ReadOnly {
    const WRITABLE: bool = false;
}

impl Mutability for Writable {
    const WRITABLE: bool = true;
}

/// A parent link the builder could not make.
#[derive(Debug, Clone, Copy)]
pub struct BuildWarning<'a> {
    /// The record whose parent link failed.
    pub node: &'a Node,
    /// The parent id the record declared.
    pub parent_id: &'a NodeId,
    pub fault: ParentFault,
}

impl BuildWarning<'_> {
    /// The invalid-parent error describing this warning.
    pub fn to_error(&self) -> TreeError {
        TreeError::InvalidParent {
            id: self.node.id().clone(),
            parent: self.parent_id.clone(),
            fault: self.fault,
        }
    }
}

/// Decides what happens to a record whose parent link is invalid.
///
/// Returning `Ok(())` skips the link and leaves the record registered but
/// unreachable from the root. Returning an error aborts the build.
pub trait BuildWarningPolicy: Send + Sync {
    fn on_warning(&self, warning: &BuildWarning<'_>) -> Result<(), TreeError>;
}

/// Default policy: every warning aborts the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailFast;

impl BuildWarningPolicy for FailFast {
    fn on_warning(&self, warning: &BuildWarning<'_>) -> Result<(), TreeError> {
        Err(warning.to_error())
    }
}

/// Permissive policy: skip the link and keep building.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipInvalid;

impl BuildWarningPolicy for SkipInvalid {
    fn on_warning(&self, warning: &BuildWarning<'_>) -> Result<(), TreeError> {
        tracing::warn!(
            id = %warning.node.id(),
            parent = %warning.parent_id,
            fault = %warning.fault,
            "Skipping invalid parent link"
        );
        Ok(())
    }
}

impl<F> BuildWarningPolicy for F
where
    F: Fn(&BuildWarning<'_>) -> Result<(), TreeError> + Send + Sync,
{
    fn on_warning(&self, warning: &BuildWarning<'_>) -> Result<(), TreeError> {
        self(warning)
    }
}
