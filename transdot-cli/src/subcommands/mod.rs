mod extract;
pub use extract::ExtractApp;

mod filter_proj;
pub use filter_proj::FilterProjApp;

mod parse;
pub use parse::ParseApp;

mod train;
pub use train::TrainApp;
