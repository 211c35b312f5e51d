//! Occlude - image occlusion annotation engine
//!
//! Annotate a raster image with occlusion masks and burned-in text labels to
//! build reveal-on-demand study cards. The host application owns the window
//! and widgets; this crate owns the editing state: normalized annotation
//! geometry, the pointer gesture state machine, undo/redo, rotate and crop,
//! and the final text burn-in.
//!
//! The entry point is [`EditorSession`]:
//!
//! 1. [`EditorSession::open`] with an [`EditorConfig`] and an [`EventHost`].
//! 2. [`EditorSession::load_image`], then [`EditorSession::finish_decode`].
//! 3. Feed pointer, wheel and key events; draw [`EditorSession::overlay`].
//! 4. [`EditorSession::save`] for the flattened image and mask records.
//! 5. [`EditorSession::close`] to release the host listeners.
//!
//! The crate logs through the `log` facade and installs no logger itself.

pub mod compose;
pub mod config;
pub mod constants;
pub mod error;
pub mod history;
pub mod image_source;
pub mod interaction;
pub mod keybindings;
pub mod model;
pub mod overlay;
pub mod records;
pub mod session;
pub mod transform;
pub mod viewport;

pub use config::{EditorConfig, LogLevel, Platform};
pub use error::{EditorError, Result};
pub use interaction::{PointerEvent, PointerEventKind, Tool};
pub use keybindings::{Key, Modifiers};
pub use model::{AnnotationId, Mask, MaskShape, NormRect, TextBox, TextStyle};
pub use overlay::Overlay;
pub use records::{MaskRecord, RevealMode, SaveOutput};
pub use session::{EditorSession, EventHost, ListenerChannel, ListenerId};
pub use transform::RotateDirection;
