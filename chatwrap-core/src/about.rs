/// Details shown in the About window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AboutInfo {
    pub application_name: &'static str,
    pub version: &'static str,
    pub developer: &'static str,
    pub website: &'static str,
}

pub const ABOUT: AboutInfo = AboutInfo {
    application_name: "ChatGPT Wrapper",
    version: env!("CARGO_PKG_VERSION"),
    developer: "Chillcarne",
    website: "https://github.com/chillcarne/chatgpt-wrapper",
};

impl AboutInfo {
    /// Plain-text body for toolkits without a dedicated about widget.
    pub fn detail(&self) -> String {
        format!(
            "Version: {}\nAuthor: {}\nGitHub: {}",
            self.version, self.developer, self.website
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_lists_version_author_and_site() {
        let detail = ABOUT.detail();
        let lines: Vec<&str> = detail.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("Version: {}", env!("CARGO_PKG_VERSION")));
        assert!(lines[2].starts_with("GitHub: https://"));
    }
}
