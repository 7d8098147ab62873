pub mod import;
pub mod modifier;
pub mod parameter;
pub mod range;
pub mod symbol;

pub use import::Import;
pub use modifier::{Annotation, Modifier, Visibility};
pub use parameter::{Binding, Parameter, TypeParameter};
pub use range::SourceRange;
pub use symbol::{Symbol, SymbolKind};
