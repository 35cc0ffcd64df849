//! qcat Local Statevector Engine
//!
//! This crate is the simulation core behind every provider's local
//! simulator. Adapters lower their native circuits into a [`Program`] and
//! run it on a [`Simulator`], either sampling shots or reading back the
//! final amplitudes.
//!
//! # Features
//!
//! - **Exact amplitudes**: full statevector, no truncation
//! - **Either index convention**: [`BitOrder`] picks whether qubit 0 is the
//!   least or most significant bit of an amplitude index
//! - **Projective measurement**: mid-circuit measurements collapse the state;
//!   circuits measured only at the end are evolved once and sampled
//! - **Seedable**: a fixed seed reproduces every count
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```
//! use qcat_adapter_sim::{BitOrder, Program, Simulator};
//! use qcat_ir::Unitary;
//!
//! let mut program = Program::new(2, 2, BitOrder::LittleEndian);
//! program
//!     .gate(Unitary::h(), vec![0])
//!     .gate(Unitary::cx(), vec![0, 1])
//!     .measure(0, 0)
//!     .measure(1, 1);
//!
//! let counts = Simulator::new(Some(7)).sample(&program, 100);
//! assert_eq!(counts.get("00") + counts.get("11"), 100);
//! ```

pub mod program;
pub mod run;
pub mod simulator;
pub mod statevector;

pub use program::{Program, Step};
pub use run::run_local;
pub use simulator::{Simulator, bitstring};
pub use statevector::{BitOrder, Statevector};

/// Largest register the local simulator accepts.
pub const MAX_QUBITS: usize = 24;
