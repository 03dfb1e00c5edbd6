mod common;
mod script;
mod style;

pub use common::{preorder, unquote, ExtractError, FactExtractor};
pub use script::{ScriptDialect, ScriptParser};
pub use style::{unescape, StyleParser};
