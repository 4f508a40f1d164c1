/// Image formats recognised from file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    Webp,
    Svg,
}

impl ImageKind {
    /// Detect the image format from the leading bytes of a file.
    ///
    /// Returns `None` for anything that is not an image, regardless of the
    /// name or content type the client claimed.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Some(Self::Png);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(Self::Gif);
        }
        if bytes.starts_with(b"BM") && bytes.len() >= 14 {
            return Some(Self::Bmp);
        }
        if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            return Some(Self::Webp);
        }

        let head = &bytes[..bytes.len().min(1024)];
        let text = String::from_utf8_lossy(head);
        let trimmed = text.trim_start_matches('\u{feff}').trim_start();
        if trimmed.starts_with("<svg")
            || (trimmed.starts_with("<?xml") && trimmed.contains("<svg"))
        {
            return Some(Self::Svg);
        }

        None
    }

    /// Canonical file extension for stored files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Webp => "webp",
            Self::Svg => "svg",
        }
    }

    /// Whether the format matches one of the given extension names.
    /// `jpg` and `jpeg` are treated as the same format.
    pub fn matches_any(self, extensions: &[&str]) -> bool {
        extensions.iter().any(|ext| match self {
            Self::Jpeg => ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"),
            _ => ext.eq_ignore_ascii_case(self.extension()),
        })
    }
}
