// Documents module: resume text extraction on the way in, export on the way out.

pub mod export;
pub mod extract;
pub mod handlers;
