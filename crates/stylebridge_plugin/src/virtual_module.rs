//! Source text of the JavaScript modules handed back to the bundler at load time.
use std::path::Path;

use stylebridge_core::types::ClassMap;

/// `import "<css>"; export default <class map>;`
pub fn module_with_import(temp_css_path: &Path, class_map: &ClassMap) -> serde_json::Result<String> {
  Ok(format!(
    "import {};\nexport default {};\n",
    serde_json::to_string(&temp_css_path.to_string_lossy())?,
    serde_json::to_string(class_map)?
  ))
}

/// Class map plus the stylesheet as a string, nothing is imported
pub fn module_with_inline_css(class_map: &ClassMap, css: &str) -> serde_json::Result<String> {
  Ok(format!(
    "export default {};\nexport const stylesheet = {};\n",
    serde_json::to_string(class_map)?,
    serde_json::to_string(css)?
  ))
}

pub fn inline_text(css: &str) -> serde_json::Result<String> {
  Ok(format!(
    "export const stylesheet = {};\nexport default stylesheet;\n",
    serde_json::to_string(css)?
  ))
}
