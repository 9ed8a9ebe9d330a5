//! Domain Layer
//!
//! The core of ftpdeploy - deployment rules without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Core domain entities (FileToUpload, Inventory, Step)
//! - `value_objects/` - Immutable value types (UtcOffset, ProjectType, IgnorePatterns)
//! - `services/` - Domain services (change detection, upload summary)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Services are stateless and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
