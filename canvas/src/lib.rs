//! Annotation core for the screen overlay.
//!
//! This crate owns everything between "a remote agent sent us some drawing
//! instructions" and "pixels on a transparent canvas": the serializable
//! annotation model, the renderer that turns documents into surface visuals,
//! and the pointer-driven tool state machine that lets the local user draw,
//! select, move and erase with the same primitives. Transport, window chrome
//! and screen capture live in the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing [`engine::EngineCore`] and the browser-bound [`engine::Engine`] |
//! | [`doc`] | Annotation documents, element variants and the wire contract |
//! | [`geom`] | Points, bounds and segment math |
//! | [`color`] | Color parsing and the fill rule |
//! | [`style`] | Centralized style defaults shared by renderer and tools |
//! | [`surface`] | Arena of live visuals keyed by element id |
//! | [`render`] | Document → surface visuals, plus capture back to documents |
//! | [`input`] | Tool, button, key and gesture state types |
//! | [`tools`] | Pointer-event tool manager |
//! | [`hit`] | Hit-testing against surface visuals |
//! | [`paint`] | Draws surfaces to a 2D canvas context |
//! | [`inbox`] | Single-consumer queue for documents arriving off-thread |
//! | [`message`] | Remote message envelopes carrying documents |
//! | [`calibration`] | Diagnostic grid and marker documents |
//! | [`consts`] | Shared numeric constants |

pub mod calibration;
pub mod color;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod inbox;
pub mod input;
pub mod message;
pub mod paint;
pub mod render;
pub mod style;
pub mod surface;
pub mod tools;
