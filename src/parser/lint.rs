use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref IMPORT_SPECIFIER: Regex =
        Regex::new(r#"(?m)^\s*import\s+[^;]*?from\s+["']([^"']+)["']"#).unwrap();
}

/// Import paths that cannot resolve once the artifact runs standalone:
/// local `@/` aliases and UI-library-internal component paths.
fn is_unresolvable(specifier: &str) -> bool {
    specifier.starts_with("@/") || specifier.contains("components/ui/")
}

/// An advisory finding tied to the artifact it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportWarning {
    pub title: String,
    pub specifier: String,
}

/// Scan artifact content for import specifiers that will not resolve outside
/// the authoring app. Advisory only; extraction proceeds regardless.
pub fn scan_imports(title: &str, content: &str) -> Vec<ImportWarning> {
    let mut warnings = Vec::new();
    for caps in IMPORT_SPECIFIER.captures_iter(content) {
        let specifier = &caps[1];
        if is_unresolvable(specifier) {
            tracing::warn!(
                "artifact '{}' imports unresolvable path: {}",
                title,
                specifier
            );
            warnings.push(ImportWarning {
                title: title.to_string(),
                specifier: specifier.to_string(),
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_local_alias_imports() {
        let warnings = scan_imports("App", "import { cn } from \"@/lib/utils\";");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].title, "App");
        assert_eq!(warnings[0].specifier, "@/lib/utils");
    }

    #[test]
    fn test_flags_ui_internal_imports() {
        let warnings = scan_imports(
            "App",
            "import { Card } from 'src/components/ui/card';",
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].specifier, "src/components/ui/card");
    }

    #[test]
    fn test_registry_packages_are_fine() {
        let content = "import React from \"react\";\nimport { motion } from \"framer-motion\";";
        assert!(scan_imports("App", content).is_empty());
    }

    #[test]
    fn test_multiple_findings_in_one_body() {
        let content = "\
import { Button } from \"@/components/ui/button\";
import { useToast } from \"@/hooks/use-toast\";
import React from \"react\";";
        let warnings = scan_imports("Panel", content);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].specifier, "@/components/ui/button");
        assert_eq!(warnings[1].specifier, "@/hooks/use-toast");
    }

    #[test]
    fn test_non_import_mentions_are_ignored() {
        assert!(scan_imports("App", "the string \"@/thing\" appears in prose").is_empty());
    }
}
