//! Pipeline stages for rasterising and stacking PDF pages.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own with synthetic images and no pdfium library.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ write ──▶ group ──▶ composite
//! (path)    (pdfium)   (PNGs)    (chunks)  (stacked PNGs)
//! ```
//!
//! 1. [`input`]: check the path exists, is readable and is a PDF
//! 2. [`render`]: rasterise pages lazily, one per iterator step
//! 3. [`write`]: persist `page_NNN.png` files, collecting their paths
//! 4. [`group`]: split the path list into runs of `group_size`
//! 5. [`composite`]: decode each run, stack it on a white canvas, write
//!    `concat_NN.png`
//!
//! [`encode`] holds the PNG writer shared by steps 3 and 5.

pub mod composite;
pub mod encode;
pub mod group;
pub mod input;
pub mod render;
pub mod write;
