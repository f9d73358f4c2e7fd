pub mod refresh;

pub use refresh::RefreshHandler;
