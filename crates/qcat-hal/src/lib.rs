//! qcat Hardware Abstraction Layer
//!
//! This crate defines what a provider backend is: how operation kinds map
//! to native gates, how a circuit is translated and drawn, and how it is
//! executed locally or remotely.
//!
//! # Overview
//!
//! - [`Provider`] names a backend family
//! - [`GateMap`] records how each [`OperationKind`](qcat_ir::OperationKind)
//!   is realized: native gate, unitary-defined custom gate, or sentinel
//! - [`Backend`] translates, draws, and executes; [`DynBackend`] erases the
//!   native type so backends can live in a [`BackendRegistry`]
//! - [`ExecuteOptions`] selects sampling or statevector simulation, local
//!   or remote
//! - [`ExecutionResult`] carries [`Counts`] or amplitudes
//!
//! # Supported Backends
//!
//! | Provider | Crate | Remote authentication |
//! |----------|-------|-----------------------|
//! | IBM | `qcat-adapter-ibm` | `IBM_QUANTUM_TOKEN` env var |
//! | Google | `qcat-adapter-google` | local only |
//! | Braket | `qcat-adapter-braket` | AWS credential chain + `QCAT_BRAKET_S3_BUCKET` |
//!
//! # Example: Routing a Run
//!
//! ```
//! use qcat_hal::{Credentials, ExecuteOptions, Provider, Target};
//!
//! let local = ExecuteOptions::new().with_repetitions(100);
//! assert_eq!(local.target(Provider::Ibm).unwrap(), Target::Local);
//!
//! let remote = ExecuteOptions::new().with_credentials(Credentials::api_token("token"));
//! assert!(matches!(remote.target(Provider::Ibm).unwrap(), Target::Remote { .. }));
//!
//! let orphan = ExecuteOptions::new().with_device("ibm_brisbane");
//! assert!(orphan.target(Provider::Ibm).is_err());
//! ```

pub mod backend;
pub mod diagram;
pub mod error;
pub mod gate_map;
pub mod job;
pub mod native;
pub mod options;
pub mod provider;
pub mod registry;
pub mod result;
pub mod runtime;
pub mod translate;

pub use backend::{Backend, DynBackend};
pub use diagram::{DiagramStyle, TextDiagram, format_params, leading_controls};
pub use error::{HalError, HalResult};
pub use gate_map::{CustomGateDef, GateEntry, GateMap, GateMapBuilder, NativeCtor};
pub use job::{JobId, JobStatus, poll_until_terminal};
pub use native::NativeCircuit;
pub use options::{Credentials, DEFAULT_REPETITIONS, ExecuteOptions, SimulatorKind, Target};
pub use provider::Provider;
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionOutput, ExecutionResult};
pub use runtime::block_on;
pub use translate::validate_operation;
