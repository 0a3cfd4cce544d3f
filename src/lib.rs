//! nuget-inspector - NuGet dependency graphs for .NET solutions and projects
//!
//! Given a solution or project file, the inspector decides which of the
//! dependency manifests present next to each project to trust, resolves it
//! into packages and dependency edges, and assembles the projects of a
//! solution into a single [`model::Container`] tree.
//!
//! # Example Usage
//!
//! ```no_run
//! use nuget_inspector::{dispatch_target, InspectionContext, InspectionOptions};
//!
//! let options = InspectionOptions {
//!     excluded_modules: Some(r".*\.Tests$".to_string()),
//!     ..InspectionOptions::for_target("src/App.sln")
//! };
//! let context = InspectionContext::for_options(&options);
//!
//! for result in dispatch_target(&options, &context)? {
//!     println!("{}", serde_json::to_string_pretty(&result)?);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Project Structure
//!
//! - [`inspection`]: solution and project inspectors, resolver dispatch
//! - [`resolvers`]: one reader per manifest format
//! - [`config`]: raw options and their resolved forms
//! - [`model`]: containers and inspection results

pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod inspection;
pub mod model;
pub mod registry;
pub mod resolvers;
pub mod util;

pub use config::{ConfigError, InspectionOptions, ProjectOptions, SolutionOptions};
pub use error::InspectionError;
pub use inspection::{
    dispatch_target, InspectionContext, ModuleFilter, ProjectInspector, ResolverDispatch,
    SolutionInspector,
};
pub use model::{Container, ContainerKind, InspectionResult, InspectionStatus, PackageId};
pub use registry::{OfflineRegistry, PackageRegistry};
pub use resolvers::{ManifestResolver, ResolutionError, ResolverTable, Strategy};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
