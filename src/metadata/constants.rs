//! Enumerated mapping constants.
//!
//! Every attribute whose value selects one of a fixed set of behaviours is
//! parsed through one of these enums. The `parse` functions differ only in how
//! they treat case, and that difference is part of the document format:
//! inheritance type, change tracking, generator strategy and cache usage are
//! uppercased before lookup while fetch mode and lifecycle events must match
//! exactly.

use crate::error::{MappingError, MappingResult};
use serde::Serialize;
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

fn lookup<T: FromStr>(kind: &'static str, value: &str) -> MappingResult<T> {
    T::from_str(value).map_err(|_| MappingError::unknown_constant(kind, value))
}

/// How a class hierarchy is laid out over tables.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InheritanceType {
    #[default]
    None,
    SingleTable,
    Joined,
    TablePerClass,
}

impl InheritanceType {
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("inheritance type", &value.to_uppercase())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeTrackingPolicy {
    #[default]
    DeferredImplicit,
    DeferredExplicit,
    Notify,
}

impl ChangeTrackingPolicy {
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("change tracking policy", &value.to_uppercase())
    }
}

/// When the associated side of a relation is loaded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FetchMode {
    #[default]
    Lazy,
    Eager,
    ExtraLazy,
}

impl FetchMode {
    /// Case-sensitive: `fetch="lazy"` is rejected.
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("fetch mode", value)
    }
}

/// Identifier value generation strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratorType {
    None,
    #[default]
    Auto,
    Sequence,
    Identity,
    Table,
    Custom,
}

impl GeneratorType {
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("generator type", &value.to_uppercase())
    }
}

/// Second level cache concurrency strategy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheUsage {
    #[default]
    ReadOnly,
    NonstrictReadWrite,
    ReadWrite,
}

impl CacheUsage {
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("cache usage", &value.to_uppercase())
    }
}

/// Operations propagated from an entity to its associated entities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum CascadeAction {
    Persist,
    Remove,
    Merge,
    Detach,
    Refresh,
    All,
}

impl CascadeAction {
    /// Accepts both the document spelling (`cascade-persist`) and the bare
    /// action name (`persist`).
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("cascade action", &value.replace("cascade-", ""))
    }
}

/// Entity lifecycle events a callback method can be bound to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum LifecycleEvent {
    PrePersist,
    PostPersist,
    PreUpdate,
    PostUpdate,
    PreRemove,
    PostRemove,
    PostLoad,
    PreFlush,
}

impl LifecycleEvent {
    pub fn parse(value: &str) -> MappingResult<Self> {
        lookup("lifecycle event", value)
    }
}
