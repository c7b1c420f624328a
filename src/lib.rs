//! Procedural indexed-mesh construction and soap-film surface relaxation.
//!
//! Surface generators describe a triangle mesh through a [`MeshBuilder`],
//! which finalizes into a renderer-agnostic [`IndexedMesh`]. The
//! [`film`] module relaxes a hexagonal fan spanning a closed boundary curve
//! into an approximate minimal surface and emits it through the same
//! contract.
//!
//! ```
//! use lamina::film::{relax, Circle};
//! use lamina::Generator;
//!
//! let mesh = relax(Circle::unit(), 2, 1).build()?;
//! assert_eq!(mesh.triangle_count(), 96);
//! # Ok::<(), lamina::LaminaError>(())
//! ```

pub mod error;
pub mod film;
pub mod generators;
pub mod math;
pub mod mesh;

pub use error::{LaminaError, Result};
pub use mesh::{Generator, IndexedMesh, MeshBuilder};
