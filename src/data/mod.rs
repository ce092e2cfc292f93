//! @acp:module "Data"
//! @acp:summary "Bundle, source pack and author registry records and loaders"
//! @acp:domain content
//! @acp:layer model

pub mod loader;
pub mod models;
pub mod sourcepack;

pub use loader::{load_authors, load_bundle, load_source_pack, read_document, InputFormat};
pub use models::{ArticlePlan, Author, Bundle, DanglingInterlink, EditorialTargets, Methodology};
pub use sourcepack::{PackArticle, Product, SourcePack, SourceRef};
