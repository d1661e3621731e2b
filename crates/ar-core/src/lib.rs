//! Platform-independent core of the AR greenscreen viewer.
//!
//! Nothing in here touches the browser. The web front-end feeds hit-test
//! samples, playback time, gestures and frame deltas into a
//! [`SessionOrchestrator`] and receives back a [`SceneFrame`] to draw and a
//! [`UiState`] to mirror into the DOM.

pub mod chroma;
pub mod constants;
pub mod error;
pub mod fade;
pub mod placement;
pub mod ply;
pub mod pose;
pub mod reveal;
pub mod session;
pub mod shadow;

pub use chroma::*;
pub use error::*;
pub use fade::*;
pub use placement::*;
pub use pose::*;
pub use reveal::*;
pub use session::*;
pub use shadow::*;
