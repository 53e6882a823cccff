//! Domain model for the degree-project administration tools.
//!
//! This crate provides the pieces shared by every tool: the immutable LTI
//! launch context, the cookie-keyed session store, the explicit wizard state
//! machine, the tagged custom-column value type, the program/course reference
//! tables with their atomic-reload snapshot store, and service configuration.

pub mod column_value;
pub mod config;
pub mod error;
pub mod launch;
pub mod reference;
pub mod session;
pub mod wizard;

/// Core result type used throughout the tools.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type that encompasses domain operations.
pub use error::Error;

/// Immutable launch context captured at LTI verification time.
pub use launch::LaunchContext;

/// Session lifecycle management.
pub use session::{Session, SessionId, SessionManager};

/// Wizard state machine.
pub use wizard::{GeneralInfo, GradingScale, Wizard, WizardAction, WizardError, WizardState};

/// Tagged custom-column values.
pub use column_value::ColumnValue;

/// Reference tables and the reloadable snapshot store.
pub use reference::{ProgramInfo, ReferenceData, SnapshotStore};

/// Service configuration loaded from `config.json`.
pub use config::ServiceConfig;
