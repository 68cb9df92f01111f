pub mod history;
pub mod library;
pub mod segmenter;
pub mod session;
