use std::fmt;

/// Document format, decided from the filename extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
    Csv,
    Unsupported,
}

impl DocumentKind {
    /// Case-insensitive match on the text after the last `.`.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        let ext = match lower.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => return Self::Unsupported,
        };

        match ext {
            "pdf" => Self::Pdf,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" => Self::Image,
            "csv" => Self::Csv,
            _ => Self::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Csv => "csv",
            Self::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_extensions() {
        assert_eq!(DocumentKind::from_filename("report.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("scan.JPEG"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_filename("Photo.Png"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_filename("anim.gif"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_filename("old.bmp"), DocumentKind::Image);
        assert_eq!(DocumentKind::from_filename("data.CSV"), DocumentKind::Csv);
    }

    #[test]
    fn test_only_last_extension_counts() {
        assert_eq!(DocumentKind::from_filename("data.csv.pdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_filename("report.pdf.txt"), DocumentKind::Unsupported);
    }

    #[test]
    fn test_unsupported() {
        assert_eq!(DocumentKind::from_filename("notes.txt"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_filename("pdf"), DocumentKind::Unsupported);
        assert_eq!(DocumentKind::from_filename(""), DocumentKind::Unsupported);
    }
}
