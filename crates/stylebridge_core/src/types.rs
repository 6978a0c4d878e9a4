mod hook;
pub use self::hook::*;

mod namespace;
pub use self::namespace::*;

mod options;
pub use self::options::*;

use std::collections::BTreeMap;

/// Original class name to scoped class name, as exported by a CSS-Modules stylesheet
pub type ClassMap = BTreeMap<String, String>;
