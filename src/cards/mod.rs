//! Catalog: building definitions, card instances, workplaces.
//!
//! ## Key Types
//!
//! - `CardDefinition`: cost, VP, tags, sellability, effect
//! - `Card`: one physical copy (building, consumable goods, or hidden)
//! - `WorkplaceDefinition` / `Workplace`: board slots for workers
//! - `Catalog`: read-only lookup, shared by engine and bots

pub mod definition;
pub mod instance;
pub mod registry;
pub mod standard;
pub mod workplace;

pub use definition::{CardDefId, CardDefinition, CardTag, Effect, Passive, ScoreBonus};
pub use instance::{BuiltStructure, Card, CardInstanceId, CardKind};
pub use registry::Catalog;
pub use workplace::{Workplace, WorkplaceDefinition, WorkplaceId};
