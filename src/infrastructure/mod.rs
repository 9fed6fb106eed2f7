pub mod pdf_renderer;

pub use pdf_renderer::{ChromePdfRenderer, PdfRenderer};
