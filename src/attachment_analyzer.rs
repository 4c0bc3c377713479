use serde::Serialize;

/// Risk class of a single attachment filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttachmentRisk {
    /// Directly executable content
    Dangerous,
    /// Macro-enabled Office document
    MacroEnabled,
    /// Decoy extension hiding the real one (invoice.pdf.zip)
    DoubleExtension,
    Benign,
}

// Extensions commonly used as the visible half of a double-extension name
const DECOY_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "txt", "jpg", "jpeg", "png", "gif",
    "html", "csv",
];

pub struct AttachmentAnalyzer {
    dangerous_extensions: Vec<String>,
    macro_extensions: Vec<String>,
}

impl AttachmentAnalyzer {
    pub fn new(dangerous_extensions: &[String], macro_extensions: &[String]) -> Self {
        let normalize = |exts: &[String]| {
            exts.iter()
                .map(|e| {
                    let e = e.to_lowercase();
                    if e.starts_with('.') {
                        e
                    } else {
                        format!(".{e}")
                    }
                })
                .collect()
        };
        Self {
            dangerous_extensions: normalize(dangerous_extensions),
            macro_extensions: normalize(macro_extensions),
        }
    }

    pub fn classify(&self, filename: &str) -> AttachmentRisk {
        let name = filename.trim().to_lowercase();
        if name.is_empty() {
            return AttachmentRisk::Benign;
        }

        if self
            .dangerous_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
        {
            return AttachmentRisk::Dangerous;
        }

        if self
            .macro_extensions
            .iter()
            .any(|ext| name.ends_with(ext.as_str()))
        {
            return AttachmentRisk::MacroEnabled;
        }

        // statement.pdf.zip has segments ["statement", "pdf", "zip"]; a decoy
        // extension in a non-final position is the tell
        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() > 2
            && segments[1..segments.len() - 1]
                .iter()
                .any(|s| DECOY_EXTENSIONS.contains(s))
        {
            return AttachmentRisk::DoubleExtension;
        }

        AttachmentRisk::Benign
    }

    pub fn has_dangerous_files(&self, filenames: &[String]) -> bool {
        filenames
            .iter()
            .any(|f| self.classify(f) == AttachmentRisk::Dangerous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfig;

    fn analyzer() -> AttachmentAnalyzer {
        let config = AnalyzerConfig::default();
        AttachmentAnalyzer::new(&config.dangerous_extensions, &config.macro_extensions)
    }

    #[test]
    fn test_dangerous_extensions() {
        let analyzer = analyzer();
        assert_eq!(analyzer.classify("setup.exe"), AttachmentRisk::Dangerous);
        assert_eq!(analyzer.classify("Run.BAT"), AttachmentRisk::Dangerous);
        assert_eq!(analyzer.classify("payload.scr"), AttachmentRisk::Dangerous);
    }

    #[test]
    fn test_macro_documents() {
        let analyzer = analyzer();
        assert_eq!(
            analyzer.classify("report.docm"),
            AttachmentRisk::MacroEnabled
        );
        assert_eq!(
            analyzer.classify("budget.xlsm"),
            AttachmentRisk::MacroEnabled
        );
    }

    #[test]
    fn test_double_extension() {
        let analyzer = analyzer();
        assert_eq!(
            analyzer.classify("invoice.pdf.zip"),
            AttachmentRisk::DoubleExtension
        );
        // dangerous wins over double-extension
        assert_eq!(
            analyzer.classify("invoice.pdf.exe"),
            AttachmentRisk::Dangerous
        );
    }

    #[test]
    fn test_benign_files() {
        let analyzer = analyzer();
        assert_eq!(analyzer.classify("statement.pdf"), AttachmentRisk::Benign);
        assert_eq!(analyzer.classify("photo.jpg"), AttachmentRisk::Benign);
        assert_eq!(analyzer.classify("archive.tar.gz"), AttachmentRisk::Benign);
        assert_eq!(analyzer.classify(""), AttachmentRisk::Benign);
    }

    #[test]
    fn test_has_dangerous_files() {
        let analyzer = analyzer();
        let files = vec!["notes.txt".to_string(), "tool.exe".to_string()];
        assert!(analyzer.has_dangerous_files(&files));
        assert!(!analyzer.has_dangerous_files(&["notes.txt".to_string()]));
    }
}
